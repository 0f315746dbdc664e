//! RubyGems requirement grammar
//!
//! Handles:
//! - Pessimistic operator: `~> 1.5` (compatible up to the next truncated bump)
//! - Comparison: `>= 1.0`, `> 1.0`, `<= 2.0`, `< 2.0`
//! - Equality and exclusion: `= 1.0`, `!= 1.2`
//! - Bare versions as equality: `1.0.3`
//! - Comma-separated ANDs: `>= 1.0, < 2.0`

use crate::domain::{Constraint, Ecosystem, Op, RequirementSet, Version, VersionStyle};
use crate::error::ParseError;
use crate::grammar::{match_anything, RequirementGrammar, VersionGrammar};

static STYLE: VersionStyle = VersionStyle::semver();

/// RubyGems version grammar
pub struct RubyGemsVersionGrammar;

impl VersionGrammar for RubyGemsVersionGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::RubyGems
    }

    fn style(&self) -> &VersionStyle {
        &STYLE
    }
}

/// RubyGems requirement grammar
pub struct RubyGemsRequirementGrammar;

impl RubyGemsRequirementGrammar {
    fn parse_token(&self, token: &str) -> Result<Constraint, ParseError> {
        for (prefix, op) in [
            ("~>", Op::Compatible),
            (">=", Op::GreaterOrEqual),
            ("<=", Op::LessOrEqual),
            ("!=", Op::NotEqual),
            (">", Op::Greater),
            ("<", Op::Less),
            ("=", Op::Exact),
        ] {
            if let Some(rest) = token.strip_prefix(prefix) {
                return Ok(Constraint::new(op, self.version(rest.trim())?));
            }
        }
        Ok(Constraint::new(Op::Exact, self.version(token)?))
    }

    fn version(&self, raw: &str) -> Result<Version, ParseError> {
        Version::parse(raw, &STYLE).map_err(|_| {
            ParseError::requirement(raw, Ecosystem::RubyGems, "invalid version literal")
        })
    }
}

impl RequirementGrammar for RubyGemsRequirementGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::RubyGems
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
                    Ecosystem::RubyGems,
                    "empty constraint in list",
                ));
            }
            constraints.push(self.parse_token(token)?);
        }
        Ok(RequirementSet::single(constraints))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> RequirementSet {
        RubyGemsRequirementGrammar.parse(raw).unwrap()
    }

    fn v(s: &str) -> Version {
        Version::parse(s, &VersionStyle::semver()).unwrap()
    }

    #[test]
    fn test_pessimistic_three_segments() {
        let set = parse("~> 1.5.0");
        assert!(set.satisfied_by(&v("1.5.0")));
        assert!(set.satisfied_by(&v("1.5.9")));
        assert!(!set.satisfied_by(&v("1.6.0")));
    }

    #[test]
    fn test_pessimistic_two_segments() {
        let set = parse("~> 1.5");
        assert!(set.satisfied_by(&v("1.5.0")));
        assert!(set.satisfied_by(&v("1.9.0")));
        assert!(!set.satisfied_by(&v("2.0.0")));
    }

    #[test]
    fn test_not_equal() {
        let set = parse(">= 1.0, != 1.2.0");
        assert!(set.satisfied_by(&v("1.1.0")));
        assert!(!set.satisfied_by(&v("1.2.0")));
        assert!(set.satisfied_by(&v("1.2.1")));
    }

    #[test]
    fn test_bare_version_is_exact() {
        let set = parse("1.0.3");
        assert!(set.satisfied_by(&v("1.0.3")));
        assert!(!set.satisfied_by(&v("1.0.4")));
    }

    #[test]
    fn test_comma_ands() {
        let set = parse(">= 1.0, < 2.0");
        assert!(set.satisfied_by(&v("1.5.0")));
        assert!(!set.satisfied_by(&v("2.0.0")));
    }

    #[test]
    fn test_operator_without_space() {
        let set = parse("~>1.5");
        assert!(set.satisfied_by(&v("1.9.0")));
        assert!(!set.satisfied_by(&v("2.0.0")));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(RubyGemsRequirementGrammar.parse("~> banana").is_err());
        assert!(RubyGemsRequirementGrammar.parse(">= 1.0,,< 2.0").is_err());
    }
}
