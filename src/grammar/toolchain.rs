//! Rust toolchain grammar
//!
//! A rust-toolchain pin is either a channel label (`stable`, `beta`,
//! `nightly-2024-05-01`) or a released version number (`1.79.0`). Either way
//! the pin is exact; there is no range syntax.

use crate::domain::{Constraint, Ecosystem, Op, RequirementSet, Version, VersionStyle};
use crate::error::ParseError;
use crate::grammar::{RequirementGrammar, VersionGrammar};

static STYLE: VersionStyle = VersionStyle::toolchain();

/// Toolchain version grammar (channels and numeric versions)
pub struct ToolchainVersionGrammar;

impl VersionGrammar for ToolchainVersionGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::RustToolchain
    }

    fn style(&self) -> &VersionStyle {
        &STYLE
    }
}

/// Toolchain requirement grammar: exact channel or version pins
pub struct ToolchainRequirementGrammar;

impl RequirementGrammar for ToolchainRequirementGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::RustToolchain
    }

    fn parse(&self, raw: &str) -> Result<RequirementSet, ParseError> {
        let version = Version::parse(raw, &STYLE).map_err(|_| {
            ParseError::requirement(raw, Ecosystem::RustToolchain, "invalid toolchain pin")
        })?;
        Ok(RequirementSet::single(vec![Constraint::new(
            Op::Exact,
            version,
        )]))
    }
}
