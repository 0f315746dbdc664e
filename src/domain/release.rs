//! Release records and the candidate catalog
//!
//! A `Release` is produced once per registry query and never mutated after
//! construction. The `ReleaseCatalog` owns the candidate set for a single
//! resolution: ordered ascending, deduplicated by version (the first entry
//! for a version wins, so callers combine pages highest-precedence-first).

use super::Version;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// One candidate release of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    /// The release version
    pub version: Version,
    /// Publication timestamp, when the registry reports one
    pub released_at: Option<DateTime<Utc>>,
    /// Whether the release has been yanked/unpublished
    pub yanked: bool,
    /// Reason given for yanking, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yanked_reason: Option<String>,
    /// Download count, when the registry reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,
    /// Registry URL for this release
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Source-language runtime requirement (e.g. `>= 2.7.0`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_requirement: Option<String>,
}

impl Release {
    /// Creates a plain release
    pub fn new(version: Version) -> Self {
        Self {
            version,
            released_at: None,
            yanked: false,
            yanked_reason: None,
            downloads: None,
            url: None,
            language_requirement: None,
        }
    }

    /// Sets the publication timestamp (builder pattern)
    pub fn with_released_at(mut self, released_at: DateTime<Utc>) -> Self {
        self.released_at = Some(released_at);
        self
    }

    /// Marks the release yanked (builder pattern)
    pub fn with_yanked(mut self, reason: Option<String>) -> Self {
        self.yanked = true;
        self.yanked_reason = reason;
        self
    }

    /// Sets the download count (builder pattern)
    pub fn with_downloads(mut self, downloads: u64) -> Self {
        self.downloads = Some(downloads);
        self
    }

    /// Sets the language runtime requirement (builder pattern)
    pub fn with_language_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.language_requirement = Some(requirement.into());
        self
    }
}

/// Ordered, deduplicated collection of candidate releases
#[derive(Debug, Clone, Default)]
pub struct ReleaseCatalog {
    releases: Vec<Release>,
}

impl ReleaseCatalog {
    /// Build a catalog: deduplicate by version (first entry wins), then sort
    /// ascending
    pub fn new(releases: Vec<Release>) -> Self {
        let mut seen = HashSet::new();
        let mut unique: Vec<Release> = releases
            .into_iter()
            .filter(|r| seen.insert(r.version.raw().to_string()))
            .collect();
        unique.sort_by(|a, b| a.version.cmp(&b.version));
        Self { releases: unique }
    }

    /// Number of cataloged releases
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    /// True if no releases were cataloged
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Releases in ascending version order
    pub fn ascending(&self) -> impl Iterator<Item = &Release> {
        self.releases.iter()
    }

    /// Releases in descending version order
    pub fn descending(&self) -> impl Iterator<Item = &Release> {
        self.releases.iter().rev()
    }

    /// Look up a release by version
    pub fn get(&self, version: &Version) -> Option<&Release> {
        self.releases.iter().find(|r| &r.version == version)
    }
}
