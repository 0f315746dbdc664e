//! Dependency information structures

use super::Ecosystem;
use serde::Serialize;
use std::fmt;

/// One declaration site of a dependency's constraint, distinct from the
/// canonical parsed requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementOccurrence {
    /// Declaring file (e.g. `package.json`, `Cargo.toml`)
    pub file: String,
    /// Raw requirement string; `None` for source-pinned dependencies
    pub requirement: Option<String>,
    /// Dependency groups this occurrence belongs to (e.g. `dev`)
    pub groups: Vec<String>,
    /// Declared source, if any (registry URL, git remote)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl RequirementOccurrence {
    /// Creates a new occurrence
    pub fn new(file: impl Into<String>, requirement: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            requirement: Some(requirement.into()),
            groups: Vec::new(),
            source: None,
        }
    }

    /// Creates an occurrence without a requirement string
    pub fn without_requirement(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            requirement: None,
            groups: Vec::new(),
            source: None,
        }
    }

    /// Sets the groups (builder pattern)
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    /// Sets the source (builder pattern)
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Represents a package dependency under resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Current resolved version, if known (unset for range-only deps)
    pub version: Option<String>,
    /// Every declaration site of this dependency, in file order
    pub requirements: Vec<RequirementOccurrence>,
    /// The ecosystem this dependency belongs to
    pub ecosystem: Ecosystem,
}

impl Dependency {
    /// Creates a new dependency
    pub fn new(
        name: impl Into<String>,
        version: Option<String>,
        requirements: Vec<RequirementOccurrence>,
        ecosystem: Ecosystem,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            requirements,
            ecosystem,
        }
    }

    /// Raw requirement strings across all occurrences
    pub fn requirement_strings(&self) -> impl Iterator<Item = &str> {
        self.requirements
            .iter()
            .filter_map(|o| o.requirement.as_deref())
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{} [{}]", self.name, version, self.ecosystem),
            None => write!(f, "{} [{}]", self.name, self.ecosystem),
        }
    }
}
