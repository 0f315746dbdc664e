//! depres - Multi-ecosystem dependency version resolution engine
//!
//! This library decides what version a single dependency should move to and
//! how to spell that in its requirement strings, across incompatible
//! versioning grammars:
//! - npm-style semver (carets, tildes, wildcards, `||` alternation)
//! - Cargo requirements
//! - RubyGems pessimistic constraints
//! - Maven bracket ranges / Gradle dynamic versions
//! - Go module versions (pseudo-versions, `+incompatible`)
//! - Toolchain channels (`stable`, `nightly-2024-05-01`, ...)
//!
//! Lockfile regeneration, manifest parsing and pull-request creation are the
//! job of external collaborators; this crate consumes and produces in-memory
//! records only.

pub mod cli;
pub mod domain;
pub mod error;
pub mod grammar;
pub mod registry;
pub mod update;
