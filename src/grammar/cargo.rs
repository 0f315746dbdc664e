//! Cargo requirement grammar
//!
//! Handles:
//! - Bare versions with caret meaning: `1.2.3` == `^1.2.3`
//! - Explicit caret and tilde: `^1.2`, `~1.2.3`
//! - Exact pins: `=1.2.3`
//! - Comparison: `>=1.2, <1.5`
//! - Wildcards: `*`, `1.*`, `1.2.*`
//! - Comma-separated ANDs

use crate::domain::{Constraint, Ecosystem, Op, RequirementSet, Version, VersionStyle};
use crate::error::ParseError;
use crate::grammar::{
    expand_caret, expand_tilde, expand_wildcard, has_wildcard, match_anything, RequirementGrammar,
    VersionGrammar,
};

static STYLE: VersionStyle = VersionStyle::semver();

/// Cargo version grammar (semver)
pub struct CargoVersionGrammar;

impl VersionGrammar for CargoVersionGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cargo
    }

    fn style(&self) -> &VersionStyle {
        &STYLE
    }
}

/// Cargo requirement grammar
pub struct CargoRequirementGrammar;

impl CargoRequirementGrammar {
    fn parse_token(&self, token: &str) -> Result<Vec<Constraint>, ParseError> {
        if token == "*" {
            return Ok(match_anything());
        }
        if let Some(rest) = token.strip_prefix('^') {
            return Ok(expand_caret(self.version(rest.trim())?, false));
        }
        if let Some(rest) = token.strip_prefix('~') {
            return Ok(expand_tilde(self.version(rest.trim())?));
        }
        for (prefix, op) in [
            (">=", Op::GreaterOrEqual),
            ("<=", Op::LessOrEqual),
            (">", Op::Greater),
            ("<", Op::Less),
            ("=", Op::Exact),
        ] {
            if let Some(rest) = token.strip_prefix(prefix) {
                return Ok(vec![Constraint::new(op, self.version(rest.trim())?)]);
            }
        }
        if has_wildcard(token) {
            return expand_wildcard(token, Ecosystem::Cargo);
        }
        // A bare version is caret-compatible
        Ok(expand_caret(self.version(token)?, false))
    }

    fn version(&self, raw: &str) -> Result<Version, ParseError> {
        Version::parse(raw, &STYLE)
            .map_err(|_| ParseError::requirement(raw, Ecosystem::Cargo, "invalid version literal"))
    }
}

impl RequirementGrammar for CargoRequirementGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cargo
    }

    fn parse(&self, raw: &str) -> Result<RequirementSet, ParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(RequirementSet::single(match_anything()));
        }
        let mut constraints = Vec::new();
        for token in trimmed.split(',') {
            let token = token.trim();
            if token.is_empty() {
                return Err(ParseError::requirement(
                    raw,
                    Ecosystem::Cargo,
                    "empty constraint in list",
                ));
            }
            constraints.extend(self.parse_token(token)?);
        }
        Ok(RequirementSet::single(constraints))
    }
}
