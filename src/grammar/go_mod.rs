//! Go modules grammar
//!
//! go.mod records a single minimum version per module and the resolver's
//! minimal version selection makes it behave as an exact pin from this
//! engine's point of view. Versions carry the mandatory `v` prefix, pseudo
//! versions (`v0.0.0-20210101000000-abcdef123456`) order by their timestamp
//! as prereleases, and `+incompatible` is ignored in ordering.

use crate::domain::{Constraint, Ecosystem, Op, RequirementSet, Version, VersionStyle};
use crate::error::ParseError;
use crate::grammar::{RequirementGrammar, VersionGrammar};

static STYLE: VersionStyle = VersionStyle::go();

/// Go module version grammar
pub struct GoModVersionGrammar;

impl VersionGrammar for GoModVersionGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::GoModules
    }

    fn style(&self) -> &VersionStyle {
        &STYLE
    }
}

/// Go module requirement grammar: every requirement is an exact pin
pub struct GoModRequirementGrammar;

impl RequirementGrammar for GoModRequirementGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::GoModules
    }

    fn parse(&self, raw: &str) -> Result<RequirementSet, ParseError> {
        let version = Version::parse(raw, &STYLE).map_err(|_| {
            ParseError::requirement(raw, Ecosystem::GoModules, "invalid module version")
        })?;
        Ok(RequirementSet::single(vec![Constraint::new(
            Op::Exact,
            version,
        )]))
    }
}
