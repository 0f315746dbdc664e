//! Per-ecosystem version and requirement grammars
//!
//! Each ecosystem contributes a `VersionGrammar`/`RequirementGrammar` pair:
//! - npm (carets, tildes, wildcards, hyphen ranges, `||` alternation)
//! - cargo (bare-caret default, comma ANDs)
//! - rubygems (pessimistic `~>`, comma ANDs)
//! - maven (bracket inclusive/exclusive ranges)
//! - gradle (dynamic `1.+` forms plus maven ranges)
//! - go_modules (exact `v`-prefixed pins)
//! - rust_toolchain (channel labels)
//!
//! Grammars are selected through an explicitly constructed
//! `GrammarRegistry`; there are no process-wide mutable registration tables.

mod cargo;
mod go_mod;
mod gradle;
mod maven;
mod npm;
mod rubygems;
mod toolchain;

pub use cargo::{CargoRequirementGrammar, CargoVersionGrammar};
pub use go_mod::{GoModRequirementGrammar, GoModVersionGrammar};
pub use gradle::{GradleRequirementGrammar, GradleVersionGrammar};
pub use maven::{MavenRequirementGrammar, MavenVersionGrammar};
pub use npm::{NpmRequirementGrammar, NpmVersionGrammar};
pub use rubygems::{RubyGemsRequirementGrammar, RubyGemsVersionGrammar};
pub use toolchain::{ToolchainRequirementGrammar, ToolchainVersionGrammar};

use crate::domain::{Constraint, Ecosystem, Op, RequirementSet, Version, VersionStyle};
use crate::error::ParseError;
use std::collections::HashMap;

/// Strategy for parsing one ecosystem's version strings
pub trait VersionGrammar: Send + Sync {
    /// The ecosystem this grammar handles
    fn ecosystem(&self) -> Ecosystem;

    /// Parsing quirks for this ecosystem
    fn style(&self) -> &VersionStyle;

    /// Parse a raw version string
    fn parse(&self, raw: &str) -> Result<Version, ParseError> {
        Version::parse(raw, self.style())
    }
}

/// Strategy for parsing one ecosystem's constraint strings into canonical
/// requirement sets
pub trait RequirementGrammar: Send + Sync {
    /// The ecosystem this grammar handles
    fn ecosystem(&self) -> Ecosystem;

    /// Parse a raw constraint string. Total over the grammar's input
    /// language: every legal input yields a non-empty set, everything else
    /// is a `ParseError`.
    fn parse(&self, raw: &str) -> Result<RequirementSet, ParseError>;
}

/// Constructed-once lookup of grammars keyed by ecosystem
pub struct GrammarRegistry {
    entries: HashMap<Ecosystem, GrammarEntry>,
}

struct GrammarEntry {
    version: Box<dyn VersionGrammar>,
    requirement: Box<dyn RequirementGrammar>,
}

impl GrammarRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Creates a registry with every built-in ecosystem registered
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(
            Box::new(NpmVersionGrammar),
            Box::new(NpmRequirementGrammar::default()),
        );
        registry.register(
            Box::new(CargoVersionGrammar),
            Box::new(CargoRequirementGrammar),
        );
        registry.register(
            Box::new(RubyGemsVersionGrammar),
            Box::new(RubyGemsRequirementGrammar),
        );
        registry.register(
            Box::new(MavenVersionGrammar),
            Box::new(MavenRequirementGrammar),
        );
        registry.register(
            Box::new(GradleVersionGrammar),
            Box::new(GradleRequirementGrammar),
        );
        registry.register(
            Box::new(GoModVersionGrammar),
            Box::new(GoModRequirementGrammar),
        );
        registry.register(
            Box::new(ToolchainVersionGrammar),
            Box::new(ToolchainRequirementGrammar),
        );
        registry
    }

    /// Registers a grammar pair, replacing any previous entry
    pub fn register(
        &mut self,
        version: Box<dyn VersionGrammar>,
        requirement: Box<dyn RequirementGrammar>,
    ) {
        let ecosystem = version.ecosystem();
        self.entries
            .insert(ecosystem, GrammarEntry { version, requirement });
    }

    /// Look up the version grammar for an ecosystem
    pub fn version_grammar(&self, ecosystem: Ecosystem) -> Result<&dyn VersionGrammar, ParseError> {
        self.entries
            .get(&ecosystem)
            .map(|e| e.version.as_ref())
            .ok_or(ParseError::UnknownEcosystem { ecosystem })
    }

    /// Look up the requirement grammar for an ecosystem
    pub fn requirement_grammar(
        &self,
        ecosystem: Ecosystem,
    ) -> Result<&dyn RequirementGrammar, ParseError> {
        self.entries
            .get(&ecosystem)
            .map(|e| e.requirement.as_ref())
            .ok_or(ParseError::UnknownEcosystem { ecosystem })
    }

    /// Parse a version under the ecosystem's grammar
    pub fn parse_version(&self, ecosystem: Ecosystem, raw: &str) -> Result<Version, ParseError> {
        self.version_grammar(ecosystem)?.parse(raw)
    }

    /// Parse a requirement under the ecosystem's grammar
    pub fn parse_requirement(
        &self,
        ecosystem: Ecosystem,
        raw: &str,
    ) -> Result<RequirementSet, ParseError> {
        self.requirement_grammar(ecosystem)?.parse(raw)
    }
}

impl Default for GrammarRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// `>= 0` — matches any version
pub(crate) fn match_anything() -> Vec<Constraint> {
    vec![Constraint::new(Op::GreaterOrEqual, Version::from_numeric(&[0]))]
}

/// Expand a wildcard literal (`*`, `1.x`, `1.2.*`) into `>= lower, < upper`
/// where the upper bound carries a least-prerelease marker so prereleases of
/// the next major are excluded.
pub(crate) fn expand_wildcard(
    literal: &str,
    ecosystem: Ecosystem,
) -> Result<Vec<Constraint>, ParseError> {
    let parts: Vec<&str> = literal.split('.').collect();
    let mut lower: Vec<u64> = Vec::new();
    let mut saw_wildcard = false;
    for part in &parts {
        if matches!(*part, "x" | "X" | "*") {
            saw_wildcard = true;
            continue;
        }
        if saw_wildcard {
            return Err(ParseError::requirement(
                literal,
                ecosystem,
                "numeric segment after wildcard",
            ));
        }
        lower.push(part.parse().map_err(|_| {
            ParseError::requirement(literal, ecosystem, "invalid wildcard segment")
        })?);
    }
    if !saw_wildcard {
        return Err(ParseError::requirement(
            literal,
            ecosystem,
            "not a wildcard literal",
        ));
    }
    if lower.is_empty() {
        return Ok(match_anything());
    }

    let mut upper = lower.clone();
    *upper.last_mut().unwrap() += 1;
    Ok(vec![
        Constraint::new(Op::GreaterOrEqual, Version::from_numeric(&lower)),
        Constraint::new(Op::Less, Version::prerelease_floor(&upper)),
    ])
}

/// Expand a caret requirement. Pre-1.0 the allowed bump narrows to the next
/// nonzero lowest segment (`^0.2.3` < 0.3.0). `floor_upper` selects whether
/// the upper bound excludes prereleases of itself.
pub(crate) fn expand_caret(version: Version, floor_upper: bool) -> Vec<Constraint> {
    let precision = version.precision().max(1);
    let segments = version.numeric_segments(precision);

    let upper = match segments.iter().position(|&s| s != 0) {
        Some(i) => {
            let mut upper = segments[..=i].to_vec();
            upper[i] += 1;
            upper
        }
        // ^0.0.0 (or all-zero prefix): only the last explicit segment moves
        None => {
            let mut upper = segments.clone();
            *upper.last_mut().unwrap() += 1;
            upper
        }
    };

    let upper = if floor_upper {
        Version::prerelease_floor(&upper)
    } else {
        Version::from_numeric(&upper)
    };
    vec![
        Constraint::new(Op::GreaterOrEqual, version),
        Constraint::new(Op::Less, upper),
    ]
}

/// Expand a tilde requirement: only the last explicit segment may move
/// (`~1.2.3` < 1.3.0, `~1.2` < 1.3, `~1` < 2).
pub(crate) fn expand_tilde(version: Version) -> Vec<Constraint> {
    let precision = version.precision().max(1);
    let segments = version.numeric_segments(precision);
    let upper = if precision == 1 {
        vec![segments[0] + 1]
    } else {
        let mut upper = segments[..precision - 1].to_vec();
        *upper.last_mut().unwrap() += 1;
        upper
    };
    vec![
        Constraint::new(Op::GreaterOrEqual, version),
        Constraint::new(Op::Less, Version::from_numeric(&upper)),
    ]
}

/// True if the literal contains a wildcard placeholder segment
pub(crate) fn has_wildcard(literal: &str) -> bool {
    literal
        .split('.')
        .any(|p| matches!(p, "x" | "X" | "*"))
}
