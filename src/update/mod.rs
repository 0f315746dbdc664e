//! Update resolution for dependencies
//!
//! This module provides:
//! - The candidate filter pipeline (ignores, prereleases, advisories,
//!   cooldown)
//! - Candidate ordering and selection
//! - Format-preserving requirement rewriting
//! - The `UpdateChecker` resolution engine tying it together

mod checker;
mod filters;
mod rewriter;
mod selector;

pub use checker::{fetch_catalog, UpdateChecker};
pub use filters::{AdvisoryFilter, CooldownFilter, CooldownOutcome, IgnoreList, PrereleasePolicy};
pub use rewriter::rewrite;
pub use selector::{select, Candidates, Direction};
