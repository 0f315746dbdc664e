//! Maven requirement grammar
//!
//! Handles:
//! - Soft requirements: `1.2.3` (recorded as an exact preference)
//! - Hard pins: `[1.2.3]`
//! - Bracket ranges: `[1.0,2.0)`, `(,1.0]`, `[1.5,)`
//! - Range unions: `(,1.0],[1.2,)` (alternatives)
//!
//! The version grammar understands Maven qualifiers (`1.0.0.alpha1` below
//! the release, `1.8.0u40` above it).

use crate::domain::{Constraint, Ecosystem, Op, Requirement, RequirementSet, Version, VersionStyle};
use crate::error::ParseError;
use crate::grammar::{match_anything, RequirementGrammar, VersionGrammar};

static STYLE: VersionStyle = VersionStyle::maven();

/// Maven version grammar (qualifiers and post-release suffixes)
pub struct MavenVersionGrammar;

impl VersionGrammar for MavenVersionGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Maven
    }

    fn style(&self) -> &VersionStyle {
        &STYLE
    }
}

/// Maven requirement grammar
pub struct MavenRequirementGrammar;

impl RequirementGrammar for MavenRequirementGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Maven
    }

    fn parse(&self, raw: &str) -> Result<RequirementSet, ParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(RequirementSet::single(match_anything()));
        }
        if trimmed.starts_with(['[', '(']) {
            return parse_range_list(trimmed, Ecosystem::Maven, &STYLE);
        }
        // Soft requirement: a preference, recorded as an exact match
        let version = Version::parse(trimmed, &STYLE)
            .map_err(|_| ParseError::requirement(raw, Ecosystem::Maven, "invalid version literal"))?;
        Ok(RequirementSet::single(vec![Constraint::new(
            Op::Exact,
            version,
        )]))
    }
}

/// Parse a comma-separated union of bracket range groups. Shared by the
/// Maven and Gradle grammars.
pub(crate) fn parse_range_list(
    raw: &str,
    ecosystem: Ecosystem,
    style: &VersionStyle,
) -> Result<RequirementSet, ParseError> {
    let mut alternatives = Vec::new();
    let mut rest = raw.trim();
    while !rest.is_empty() {
        let open = rest.chars().next().unwrap();
        if !matches!(open, '[' | '(') {
            return Err(ParseError::requirement(raw, ecosystem, "expected '[' or '('"));
        }
        let close_idx = rest.find([']', ')']).ok_or_else(|| {
            ParseError::requirement(raw, ecosystem, "unterminated range group")
        })?;
        let close = rest.as_bytes()[close_idx] as char;
        let body = &rest[1..close_idx];
        alternatives.push(parse_group(raw, body, open, close, ecosystem, style)?);

        rest = rest[close_idx + 1..].trim_start();
        if let Some(after) = rest.strip_prefix(',') {
            rest = after.trim_start();
            if rest.is_empty() {
                return Err(ParseError::requirement(raw, ecosystem, "trailing comma"));
            }
        } else if !rest.is_empty() {
            return Err(ParseError::requirement(
                raw,
                ecosystem,
                "expected ',' between range groups",
            ));
        }
    }
    if alternatives.is_empty() {
        return Err(ParseError::requirement(raw, ecosystem, "empty range list"));
    }
    Ok(RequirementSet::new(alternatives))
}

fn parse_group(
    raw: &str,
    body: &str,
    open: char,
    close: char,
    ecosystem: Ecosystem,
    style: &VersionStyle,
) -> Result<Requirement, ParseError> {
    let parse_version = |s: &str| {
        Version::parse(s, style)
            .map_err(|_| ParseError::requirement(raw, ecosystem, "invalid version in range"))
    };

    match body.split_once(',') {
        None => {
            // `[1.0]` pins exactly; `(1.0)` is meaningless
            if open != '[' || close != ']' {
                return Err(ParseError::requirement(
                    raw,
                    ecosystem,
                    "single-version range must use square brackets",
                ));
            }
            Ok(Requirement::new(vec![Constraint::new(
                Op::Exact,
                parse_version(body.trim())?,
            )]))
        }
        Some((lower, upper)) => {
            let mut constraints = Vec::new();
            let lower = lower.trim();
            let upper = upper.trim();
            if !lower.is_empty() {
                let op = if open == '[' {
                    Op::GreaterOrEqual
                } else {
                    Op::Greater
                };
                constraints.push(Constraint::new(op, parse_version(lower)?));
            }
            if !upper.is_empty() {
                let op = if close == ']' { Op::LessOrEqual } else { Op::Less };
                constraints.push(Constraint::new(op, parse_version(upper)?));
            }
            if constraints.is_empty() {
                constraints = match_anything();
            }
            Ok(Requirement::new(constraints))
        }
    }
}
