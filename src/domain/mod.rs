//! Domain value objects for dependency version resolution
//!
//! Everything here is constructed fresh per update check; there is no shared
//! mutable state between resolutions.

mod advisory;
mod cooldown;
mod dependency;
mod ecosystem;
mod release;
mod requirement;
mod version;

pub use advisory::{any_vulnerable, SecurityAdvisory};
pub use cooldown::CooldownPolicy;
pub use dependency::{Dependency, RequirementOccurrence};
pub use ecosystem::Ecosystem;
pub use release::{Release, ReleaseCatalog};
pub use requirement::{Constraint, Op, Requirement, RequirementSet};
pub use version::{Channel, Identifier, Segment, Version, VersionStyle};
