//! npm requirement grammar
//!
//! Handles:
//! - Exact: `1.2.3`
//! - Caret: `^1.2.3` (pre-1.0 narrowing: `^0.2.3` < 0.3.0)
//! - Tilde: `~1.2.3`
//! - Comparison: `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`, `=1.2.3`
//! - Wildcard: `*`, `1.x`, `1.2.*`
//! - Compound ANDs: `>=1.0.0 <2.0.0`
//! - Hyphen ranges: `1.0.0 - 2.0.0`
//! - Alternation: `^1.0.0 || ^2.0.0`

use crate::domain::{Constraint, Ecosystem, Op, Requirement, RequirementSet, Version, VersionStyle};
use crate::error::ParseError;
use crate::grammar::{
    expand_caret, expand_tilde, expand_wildcard, has_wildcard, match_anything, RequirementGrammar,
    VersionGrammar,
};
use regex::Regex;
use std::sync::LazyLock;

static STYLE: VersionStyle = VersionStyle::semver();

static HYPHEN_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap());

/// npm version grammar (strict semver with optional `v` prefix)
pub struct NpmVersionGrammar;

impl VersionGrammar for NpmVersionGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn style(&self) -> &VersionStyle {
        &STYLE
    }
}

/// npm requirement grammar
///
/// Whether caret and hyphen upper bounds exclude prereleases of the next
/// major (the way wildcard bounds always do) varies between observed
/// resolver behaviors, so it is configuration here rather than hard-coded.
pub struct NpmRequirementGrammar {
    /// Caret upper bounds carry the least-prerelease marker
    pub caret_excludes_next_prereleases: bool,
    /// Hyphen-range upper bounds carry the least-prerelease marker
    pub hyphen_excludes_next_prereleases: bool,
}

impl Default for NpmRequirementGrammar {
    fn default() -> Self {
        Self {
            caret_excludes_next_prereleases: false,
            hyphen_excludes_next_prereleases: false,
        }
    }
}

impl NpmRequirementGrammar {
    fn parse_alternative(&self, raw: &str) -> Result<Requirement, ParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "*" || trimmed == "x" {
            return Ok(Requirement::new(match_anything()));
        }

        if let Some(caps) = HYPHEN_RANGE_RE.captures(trimmed) {
            let lower = self.version(caps.get(1).unwrap().as_str())?;
            let upper = self.version(caps.get(2).unwrap().as_str())?;
            let upper = if self.hyphen_excludes_next_prereleases {
                let precision = upper.precision().max(1);
                Version::prerelease_floor(&upper.numeric_segments(precision))
            } else {
                upper
            };
            return Ok(Requirement::new(vec![
                Constraint::new(Op::GreaterOrEqual, lower),
                Constraint::new(Op::LessOrEqual, upper),
            ]));
        }

        let mut constraints = Vec::new();
        for token in trimmed.split_whitespace() {
            constraints.extend(self.parse_token(token)?);
        }
        Ok(Requirement::new(constraints))
    }

    fn parse_token(&self, token: &str) -> Result<Vec<Constraint>, ParseError> {
        if let Some(rest) = token.strip_prefix('^') {
            return Ok(expand_caret(
                self.version(rest)?,
                self.caret_excludes_next_prereleases,
            ));
        }
        if let Some(rest) = token.strip_prefix('~') {
            return Ok(expand_tilde(self.version(rest)?));
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
            return expand_wildcard(token, Ecosystem::Npm);
        }
        Ok(vec![Constraint::new(Op::Exact, self.version(token)?)])
    }

    fn version(&self, raw: &str) -> Result<Version, ParseError> {
        Version::parse(raw, &STYLE)
            .map_err(|_| ParseError::requirement(raw, Ecosystem::Npm, "invalid version literal"))
    }
}

impl RequirementGrammar for NpmRequirementGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn parse(&self, raw: &str) -> Result<RequirementSet, ParseError> {
        let alternatives = raw
            .split("||")
            .map(|alt| self.parse_alternative(alt))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RequirementSet::new(alternatives))
    }
}
