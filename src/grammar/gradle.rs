//! Gradle requirement grammar
//!
//! Handles:
//! - Dynamic versions: `+`, `1.+`, `1.2.+`
//! - Status placeholders: `latest.release`, `latest.integration`
//! - Maven-style bracket ranges: `[1.0,2.0)`, `(,1.0]`
//! - Bare versions as exact preferences
//!
//! Dynamic `1.+` forms are treated as a lower bound only; resolution still
//! picks the highest eligible release, so an upper bound adds nothing here.

use crate::domain::{Constraint, Ecosystem, Op, RequirementSet, Version, VersionStyle};
use crate::error::ParseError;
use crate::grammar::maven::parse_range_list;
use crate::grammar::{match_anything, RequirementGrammar, VersionGrammar};

static STYLE: VersionStyle = VersionStyle::maven();

/// Gradle version grammar (same model as Maven)
pub struct GradleVersionGrammar;

impl VersionGrammar for GradleVersionGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Gradle
    }

    fn style(&self) -> &VersionStyle {
        &STYLE
    }
}

/// Gradle requirement grammar
pub struct GradleRequirementGrammar;

impl RequirementGrammar for GradleRequirementGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Gradle
    }

    fn parse(&self, raw: &str) -> Result<RequirementSet, ParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed == "+"
            || trimmed == "latest.release"
            || trimmed == "latest.integration"
        {
            return Ok(RequirementSet::single(match_anything()));
        }
        if trimmed.starts_with(['[', '(']) {
            return parse_range_list(trimmed, Ecosystem::Gradle, &STYLE);
        }
        if let Some(prefix) = trimmed.strip_suffix(".+") {
            let segments = prefix
                .split('.')
                .map(|p| p.parse::<u64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| {
                    ParseError::requirement(raw, Ecosystem::Gradle, "invalid dynamic version")
                })?;
            if segments.is_empty() {
                return Err(ParseError::requirement(
                    raw,
                    Ecosystem::Gradle,
                    "invalid dynamic version",
                ));
            }
            return Ok(RequirementSet::single(vec![Constraint::new(
                Op::GreaterOrEqual,
                Version::from_numeric(&segments),
            )]));
        }
        let version = Version::parse(trimmed, &STYLE).map_err(|_| {
            ParseError::requirement(raw, Ecosystem::Gradle, "invalid version literal")
        })?;
        Ok(RequirementSet::single(vec![Constraint::new(
            Op::Exact,
            version,
        )]))
    }
}
