//! Candidate filter pipeline
//!
//! Filters narrow the release catalog before selection:
//! - `IgnoreList` removes versions matched by user-supplied ignore specs
//! - `PrereleasePolicy` removes prereleases unless the dependency opted in
//! - `AdvisoryFilter` removes versions still vulnerable to known advisories
//! - `CooldownFilter` removes versions published too recently
//!
//! The cooldown filter is the only one that may need extra registry
//! round-trips (per-release timestamps); it walks candidates lazily in the
//! caller's preference order and stops at the first eligible release.

use crate::domain::{
    any_vulnerable, CooldownPolicy, Dependency, Release, RequirementSet, SecurityAdvisory, Version,
};
use crate::grammar::GrammarRegistry;
use crate::registry::RegistryClient;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// A requirement string like `1.2.3-beta1` or `>=1.0.0-0` hints that the
/// author is already consuming prereleases. Hyphen ranges are space-delimited
/// and do not match.
static PRERELEASE_HINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d-[\dA-Za-z]").unwrap());

/// User-supplied versions and ranges to skip
#[derive(Default)]
pub struct IgnoreList {
    sets: Vec<RequirementSet>,
}

impl IgnoreList {
    /// Parse ignore specs under the dependency's grammar. A spec that does
    /// not parse is skipped with a warning; an unparseable ignore must never
    /// widen the candidate set by aborting the whole list.
    pub fn parse(specs: &[String], dependency: &Dependency, grammars: &GrammarRegistry) -> Self {
        let mut sets = Vec::new();
        for spec in specs {
            match grammars.parse_requirement(dependency.ecosystem, spec) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!(dependency = %dependency.name, spec = %spec, error = %e, "skipping unparseable ignore spec");
                }
            }
        }
        Self { sets }
    }

    /// True if no usable ignore specs were supplied
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// True if the version is matched by any ignore spec
    pub fn matches(&self, version: &Version) -> bool {
        self.sets.iter().any(|s| s.satisfied_by(version))
    }
}

/// Whether prerelease candidates are eligible for this dependency
#[derive(Debug, Clone, Copy)]
pub struct PrereleasePolicy {
    allow: bool,
}

impl PrereleasePolicy {
    /// Prereleases are eligible when the dependency is already on one, or
    /// when any of its requirement strings names one
    pub fn for_dependency(dependency: &Dependency, current: Option<&Version>) -> Self {
        let allow = current.is_some_and(|v| v.is_prerelease())
            || dependency
                .requirement_strings()
                .any(|r| PRERELEASE_HINT_RE.is_match(r));
        Self { allow }
    }

    /// Build a policy with an explicit decision
    pub fn explicit(allow: bool) -> Self {
        Self { allow }
    }

    /// True if the candidate passes this policy
    pub fn permits(&self, candidate: &Version) -> bool {
        self.allow || !candidate.is_prerelease()
    }
}

/// Keeps only candidates no longer vulnerable to the given advisories
pub struct AdvisoryFilter<'a> {
    advisories: &'a [SecurityAdvisory],
}

impl<'a> AdvisoryFilter<'a> {
    pub fn new(advisories: &'a [SecurityAdvisory]) -> Self {
        Self { advisories }
    }

    /// True if the candidate is free of every advisory
    pub fn permits(&self, candidate: &Version) -> bool {
        !any_vulnerable(self.advisories, candidate)
    }
}

/// Outcome of the lazy cooldown walk
#[derive(Debug)]
pub enum CooldownOutcome<'a> {
    /// First candidate (in the caller's order) outside its cooldown window.
    /// A candidate whose publication time cannot be determined counts as
    /// outside: cooldown suppresses known-recent releases, nothing else.
    Eligible(&'a Release),
    /// Every candidate was still inside its window (or there were none)
    AllSuppressed,
}

/// Cooldown gate over a single resolution
pub struct CooldownFilter<'a> {
    policy: &'a CooldownPolicy,
    now: DateTime<Utc>,
}

impl<'a> CooldownFilter<'a> {
    pub fn new(policy: &'a CooldownPolicy, now: DateTime<Utc>) -> Self {
        Self { policy, now }
    }

    /// Walk candidates in the caller's preference order and return the first
    /// one outside its cooldown window. Timestamps missing from the catalog
    /// are fetched on demand through `metadata`, so the walk touches only as
    /// many releases as it must.
    pub async fn first_eligible<'r>(
        &self,
        dependency: &Dependency,
        current: Option<&Version>,
        candidates: impl Iterator<Item = &'r Release>,
        metadata: Option<&dyn RegistryClient>,
    ) -> CooldownOutcome<'r> {
        for release in candidates {
            let released_at = match release.released_at {
                Some(t) => Some(t),
                None => match metadata {
                    Some(client) => {
                        match client.fetch_release_metadata(&dependency.name, release).await {
                            Ok(fetched) => fetched.released_at,
                            Err(e) => {
                                tracing::warn!(dependency = %dependency.name, version = %release.version, error = %e, "failed to fetch release metadata");
                                None
                            }
                        }
                    }
                    None => None,
                },
            };

            let Some(released_at) = released_at else {
                // An undated release cannot be known to be recent
                return CooldownOutcome::Eligible(release);
            };

            if !self.policy.suppressed(
                &dependency.name,
                current,
                &release.version,
                released_at,
                self.now,
            ) {
                return CooldownOutcome::Eligible(release);
            }
        }

        CooldownOutcome::AllSuppressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Constraint, Ecosystem, Op, RequirementOccurrence, VersionStyle};
    use chrono::{Duration, TimeZone};

    fn v(s: &str) -> Version {
        Version::parse(s, &VersionStyle::semver()).unwrap()
    }

    fn dependency(requirement: &str) -> Dependency {
        Dependency::new(
            "lodash",
            Some("1.0.0".to_string()),
            vec![RequirementOccurrence::new("package.json", requirement)],
            Ecosystem::Npm,
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_ignore_list_matches() {
        let grammars = GrammarRegistry::standard();
        let dep = dependency("^1.0.0");
        let list = IgnoreList::parse(
            &[">= 2.0.0".to_string(), "1.5.0".to_string()],
            &dep,
            &grammars,
        );
        assert!(list.matches(&v("2.1.0")));
        assert!(list.matches(&v("1.5.0")));
        assert!(!list.matches(&v("1.4.0")));
    }

    #[test]
    fn test_ignore_list_skips_unparseable_spec() {
        let grammars = GrammarRegistry::standard();
        let dep = dependency("^1.0.0");
        let list = IgnoreList::parse(
            &["not a spec".to_string(), ">= 2.0.0".to_string()],
            &dep,
            &grammars,
        );
        assert!(list.matches(&v("2.1.0")));
        assert!(!list.matches(&v("1.0.0")));
    }

    #[test]
    fn test_prerelease_policy_default_blocks() {
        let policy = PrereleasePolicy::for_dependency(&dependency("^1.0.0"), Some(&v("1.0.0")));
        assert!(policy.permits(&v("1.1.0")));
        assert!(!policy.permits(&v("1.1.0-beta.1")));
    }

    #[test]
    fn test_prerelease_policy_current_prerelease_allows() {
        let policy =
            PrereleasePolicy::for_dependency(&dependency("^1.0.0"), Some(&v("1.0.0-rc.1")));
        assert!(policy.permits(&v("1.1.0-beta.1")));
    }

    #[test]
    fn test_prerelease_policy_requirement_hint_allows() {
        let policy =
            PrereleasePolicy::for_dependency(&dependency("^1.1.0-beta"), Some(&v("1.0.0")));
        assert!(policy.permits(&v("1.1.0-beta.2")));
    }

    #[test]
    fn test_prerelease_policy_numeric_prerelease_hint_allows() {
        let policy = PrereleasePolicy::for_dependency(&dependency(">=1.0.0-0"), Some(&v("1.0.0")));
        assert!(policy.permits(&v("1.1.0-beta.1")));
    }

    #[test]
    fn test_prerelease_policy_hyphen_range_is_not_a_hint() {
        let policy =
            PrereleasePolicy::for_dependency(&dependency("1.2.3 - 2.0.0"), Some(&v("1.2.3")));
        assert!(!policy.permits(&v("1.9.0-beta.1")));
    }

    #[test]
    fn test_advisory_filter() {
        let advisories = vec![SecurityAdvisory::new(
            "lodash",
            vec![RequirementSet::single(vec![Constraint::new(
                Op::Less,
                v("1.3.0"),
            )])],
        )];
        let filter = AdvisoryFilter::new(&advisories);
        assert!(!filter.permits(&v("1.2.0")));
        assert!(filter.permits(&v("1.3.0")));
    }

    #[tokio::test]
    async fn test_cooldown_walk_picks_first_aged_release() {
        let policy = CooldownPolicy::new(7);
        let filter = CooldownFilter::new(&policy, now());
        let fresh = Release::new(v("2.0.0")).with_released_at(now() - Duration::days(1));
        let aged = Release::new(v("1.9.0")).with_released_at(now() - Duration::days(30));
        let candidates = [&fresh, &aged];

        let outcome = filter
            .first_eligible(
                &dependency("^1.0.0"),
                Some(&v("1.0.0")),
                candidates.into_iter(),
                None,
            )
            .await;
        match outcome {
            CooldownOutcome::Eligible(release) => assert_eq!(release.version.raw(), "1.9.0"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cooldown_walk_all_suppressed() {
        let policy = CooldownPolicy::new(7);
        let filter = CooldownFilter::new(&policy, now());
        let fresh = Release::new(v("2.0.0")).with_released_at(now() - Duration::days(1));
        let candidates = [&fresh];

        let outcome = filter
            .first_eligible(&dependency("^1.0.0"), None, candidates.into_iter(), None)
            .await;
        assert!(matches!(outcome, CooldownOutcome::AllSuppressed));
    }

    #[tokio::test]
    async fn test_cooldown_walk_undated_release_is_eligible() {
        let policy = CooldownPolicy::new(7);
        let filter = CooldownFilter::new(&policy, now());
        let undated = Release::new(v("2.0.0"));
        let aged = Release::new(v("1.9.0")).with_released_at(now() - Duration::days(60));
        let candidates = [&undated, &aged];

        let outcome = filter
            .first_eligible(&dependency("^1.0.0"), None, candidates.into_iter(), None)
            .await;
        match outcome {
            CooldownOutcome::Eligible(release) => assert_eq!(release.version.raw(), "2.0.0"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    /// Stub adapter that serves canned timestamps and records which releases
    /// were asked about
    struct RecordingClient {
        dates: std::collections::HashMap<String, DateTime<Utc>>,
        fetched: std::sync::Mutex<Vec<String>>,
    }

    impl RecordingClient {
        fn new(dates: &[(&str, DateTime<Utc>)]) -> Self {
            Self {
                dates: dates
                    .iter()
                    .map(|(version, date)| (version.to_string(), *date))
                    .collect(),
                fetched: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl RegistryClient for RecordingClient {
        fn ecosystem(&self) -> Ecosystem {
            Ecosystem::Npm
        }

        fn registry_name(&self) -> &'static str {
            "recording"
        }

        async fn fetch_releases(
            &self,
            _package: &str,
        ) -> Result<Vec<Release>, crate::error::RegistryError> {
            Ok(Vec::new())
        }

        async fn fetch_release_metadata(
            &self,
            _package: &str,
            release: &Release,
        ) -> Result<Release, crate::error::RegistryError> {
            self.fetched
                .lock()
                .unwrap()
                .push(release.version.raw().to_string());
            let mut enriched = release.clone();
            enriched.released_at = self.dates.get(release.version.raw()).copied();
            Ok(enriched)
        }
    }

    #[tokio::test]
    async fn test_cooldown_walk_fetches_metadata_lazily() {
        let policy = CooldownPolicy::new(7);
        let filter = CooldownFilter::new(&policy, now());
        let client = RecordingClient::new(&[
            ("2.0.0", now() - Duration::days(1)),
            ("1.9.5", now() - Duration::days(30)),
            ("1.9.0", now() - Duration::days(90)),
        ]);
        let newest = Release::new(v("2.0.0"));
        let middle = Release::new(v("1.9.5"));
        let oldest = Release::new(v("1.9.0"));
        let candidates = [&newest, &middle, &oldest];

        let outcome = filter
            .first_eligible(
                &dependency("^1.0.0"),
                Some(&v("1.0.0")),
                candidates.into_iter(),
                Some(&client),
            )
            .await;

        // The fetched timestamp suppresses 2.0.0 and admits 1.9.5; the walk
        // stops there and 1.9.0 is never asked about
        match outcome {
            CooldownOutcome::Eligible(release) => assert_eq!(release.version.raw(), "1.9.5"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(*client.fetched.lock().unwrap(), vec!["2.0.0", "1.9.5"]);
    }

    #[tokio::test]
    async fn test_cooldown_walk_metadata_without_date_is_eligible() {
        let policy = CooldownPolicy::new(7);
        let filter = CooldownFilter::new(&policy, now());
        let client = RecordingClient::new(&[("2.0.0", now() - Duration::days(1))]);
        let fresh = Release::new(v("2.0.0"));
        let unknown = Release::new(v("1.9.5"));
        let candidates = [&fresh, &unknown];

        let outcome = filter
            .first_eligible(
                &dependency("^1.0.0"),
                Some(&v("1.0.0")),
                candidates.into_iter(),
                Some(&client),
            )
            .await;
        match outcome {
            CooldownOutcome::Eligible(release) => assert_eq!(release.version.raw(), "1.9.5"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
