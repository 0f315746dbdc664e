//! Release cooldown policy
//!
//! A cooldown suppresses very recently published releases from being
//! selected as update targets. The window can differ by semver tier of the
//! jump (major/minor/patch relative to the current version) and can be
//! overridden per dependency.

use super::Version;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Cooldown configuration for one resolution
#[derive(Debug, Clone, Default)]
pub struct CooldownPolicy {
    /// Suppression window in days when no tier-specific window applies
    pub default_days: u32,
    /// Window for major-version jumps
    pub semver_major_days: Option<u32>,
    /// Window for minor-version jumps
    pub semver_minor_days: Option<u32>,
    /// Window for patch-version jumps
    pub semver_patch_days: Option<u32>,
    /// Per-dependency override of the window
    pub overrides: HashMap<String, u32>,
}

impl CooldownPolicy {
    /// Creates a policy with a flat default window
    pub fn new(default_days: u32) -> Self {
        Self {
            default_days,
            ..Self::default()
        }
    }

    /// Sets the semver-tier windows (builder pattern)
    pub fn with_semver_days(mut self, major: u32, minor: u32, patch: u32) -> Self {
        self.semver_major_days = Some(major);
        self.semver_minor_days = Some(minor);
        self.semver_patch_days = Some(patch);
        self
    }

    /// Adds a per-dependency override (builder pattern)
    pub fn with_override(mut self, name: impl Into<String>, days: u32) -> Self {
        self.overrides.insert(name.into(), days);
        self
    }

    /// The window in days that applies to moving `dependency_name` from
    /// `current` to `candidate`
    pub fn window_days(
        &self,
        dependency_name: &str,
        current: Option<&Version>,
        candidate: &Version,
    ) -> u32 {
        if let Some(days) = self.overrides.get(dependency_name) {
            return *days;
        }
        let Some(current) = current else {
            return self.default_days;
        };

        let from = current.numeric_segments(3);
        let to = candidate.numeric_segments(3);
        let tier_days = if from[0] != to[0] {
            self.semver_major_days
        } else if from[1] != to[1] {
            self.semver_minor_days
        } else {
            self.semver_patch_days
        };
        tier_days.unwrap_or(self.default_days)
    }

    /// Whether a release published at `released_at` is still suppressed at
    /// `now`. A release exactly at `now - window` is NOT suppressed.
    pub fn suppressed(
        &self,
        dependency_name: &str,
        current: Option<&Version>,
        candidate: &Version,
        released_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        let days = self.window_days(dependency_name, current, candidate);
        now.signed_duration_since(released_at) < Duration::days(i64::from(days))
    }
}
