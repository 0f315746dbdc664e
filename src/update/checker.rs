//! Update resolution engine for a single dependency
//!
//! An `UpdateChecker` owns everything one resolution needs: the dependency,
//! its release catalog, the grammar registry, and the configured filters.
//! It answers three questions:
//! - `latest_version`: the highest installable candidate
//! - `lowest_security_fix_version`: the smallest safe jump past advisories
//! - `updated_requirements`: the dependency's requirement strings rewritten
//!   for a chosen target
//!
//! Registry failures never invent updates: a catalog that could not be
//! fetched resolves as if no newer versions exist.

use crate::domain::{
    CooldownPolicy, Dependency, ReleaseCatalog, RequirementOccurrence, SecurityAdvisory, Version,
};
use crate::error::UpdateError;
use crate::grammar::GrammarRegistry;
use crate::registry::RegistryClient;
use crate::update::filters::{
    AdvisoryFilter, CooldownFilter, CooldownOutcome, IgnoreList, PrereleasePolicy,
};
use crate::update::rewriter;
use crate::update::selector::{self, Candidates, Direction};
use chrono::{DateTime, Utc};

/// Fetch a dependency's release catalog, treating registry failure as an
/// empty catalog so a flaky registry can never produce an update.
pub async fn fetch_catalog(client: &dyn RegistryClient, dependency: &Dependency) -> ReleaseCatalog {
    match client.fetch_releases(&dependency.name).await {
        Ok(releases) => ReleaseCatalog::new(releases),
        Err(e) => {
            tracing::warn!(dependency = %dependency.name, registry = client.registry_name(), error = %e, "catalog fetch failed; treating as empty");
            ReleaseCatalog::default()
        }
    }
}

/// Resolution engine for one dependency
pub struct UpdateChecker<'a> {
    dependency: &'a Dependency,
    catalog: &'a ReleaseCatalog,
    grammars: &'a GrammarRegistry,
    ignored_versions: Vec<String>,
    raise_on_ignored: bool,
    advisories: Vec<SecurityAdvisory>,
    cooldown: Option<CooldownPolicy>,
    metadata_client: Option<&'a dyn RegistryClient>,
    now: DateTime<Utc>,
}

impl<'a> UpdateChecker<'a> {
    /// Create a checker with no filters configured
    pub fn new(
        dependency: &'a Dependency,
        catalog: &'a ReleaseCatalog,
        grammars: &'a GrammarRegistry,
    ) -> Self {
        Self {
            dependency,
            catalog,
            grammars,
            ignored_versions: Vec::new(),
            raise_on_ignored: false,
            advisories: Vec::new(),
            cooldown: None,
            metadata_client: None,
            now: Utc::now(),
        }
    }

    /// Set versions and ranges to ignore (builder pattern)
    pub fn with_ignored_versions(mut self, specs: Vec<String>) -> Self {
        self.ignored_versions = specs;
        self
    }

    /// Surface an error instead of standing pat when the ignore list removes
    /// every candidate (builder pattern)
    pub fn with_raise_on_ignored(mut self, raise: bool) -> Self {
        self.raise_on_ignored = raise;
        self
    }

    /// Set the advisories to resolve against (builder pattern)
    pub fn with_advisories(mut self, advisories: Vec<SecurityAdvisory>) -> Self {
        self.advisories = advisories;
        self
    }

    /// Set the release cooldown policy (builder pattern)
    pub fn with_cooldown(mut self, policy: CooldownPolicy) -> Self {
        self.cooldown = Some(policy);
        self
    }

    /// Set a client for fetching per-release timestamps the catalog lacks
    /// (builder pattern)
    pub fn with_metadata_client(mut self, client: &'a dyn RegistryClient) -> Self {
        self.metadata_client = Some(client);
        self
    }

    /// Override the clock (for testing cooldown windows)
    pub fn with_time(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// The dependency's current version under its grammar, if it parses
    pub fn current_version(&self) -> Option<Version> {
        let raw = self.dependency.version.as_deref()?;
        match self.grammars.parse_version(self.dependency.ecosystem, raw) {
            Ok(version) => Some(version),
            Err(e) => {
                tracing::warn!(dependency = %self.dependency.name, version = %raw, error = %e, "current version does not parse");
                None
            }
        }
    }

    /// The highest installable candidate, or the current version when every
    /// newer release is filtered away. `None` only when the catalog is empty
    /// and no current version is known.
    pub async fn latest_version(&self) -> Result<Option<Version>, UpdateError> {
        let current = self.current_version();
        let candidates = self.candidates(Direction::HighestFirst, current.as_ref(), false)?;
        self.resolve(candidates, current).await
    }

    /// The smallest candidate clearing every advisory, strictly above the
    /// current version. `None` when no such candidate exists.
    pub async fn lowest_security_fix_version(&self) -> Result<Option<Version>, UpdateError> {
        let current = self.current_version();
        let candidates = self.candidates(Direction::LowestFirst, current.as_ref(), true)?;
        self.resolve(candidates, None).await
    }

    /// True when no installable candidate is newer than the current version
    pub async fn up_to_date(&self) -> Result<bool, UpdateError> {
        let Some(latest) = self.latest_version().await? else {
            return Ok(true);
        };
        Ok(self.current_version().map_or(false, |current| current >= latest))
    }

    /// True when resolution found a candidate above the current version
    pub async fn can_update(&self) -> Result<bool, UpdateError> {
        let Some(latest) = self.latest_version().await? else {
            return Ok(false);
        };
        Ok(self.current_version().map_or(true, |current| latest > current))
    }

    /// Rewrite every requirement occurrence to admit `target`, preserving
    /// each occurrence's format. An occurrence whose requirement does not
    /// parse passes through unchanged; if none parse, resolution fails.
    pub fn updated_requirements(
        &self,
        target: &Version,
    ) -> Result<Vec<RequirementOccurrence>, UpdateError> {
        let current = self.current_version();
        let mut updated = Vec::with_capacity(self.dependency.requirements.len());
        let mut with_requirement = 0usize;
        let mut malformed = 0usize;

        for occurrence in &self.dependency.requirements {
            let Some(raw) = occurrence.requirement.as_deref() else {
                updated.push(occurrence.clone());
                continue;
            };
            with_requirement += 1;

            match self.grammars.parse_requirement(self.dependency.ecosystem, raw) {
                Ok(_) => {
                    let mut occurrence = occurrence.clone();
                    occurrence.requirement =
                        Some(rewriter::rewrite(raw, current.as_ref(), target));
                    updated.push(occurrence);
                }
                Err(e) => {
                    tracing::warn!(dependency = %self.dependency.name, requirement = %raw, error = %e, "leaving unparseable requirement unchanged");
                    malformed += 1;
                    updated.push(occurrence.clone());
                }
            }
        }

        if with_requirement > 0 && malformed == with_requirement {
            return Err(UpdateError::unresolvable(&self.dependency.name));
        }
        Ok(updated)
    }

    fn candidates(
        &self,
        direction: Direction,
        current: Option<&Version>,
        security: bool,
    ) -> Result<Candidates<'a>, UpdateError> {
        let ignores = IgnoreList::parse(&self.ignored_versions, self.dependency, self.grammars);
        let prereleases = PrereleasePolicy::for_dependency(self.dependency, current);
        let advisory_filter = AdvisoryFilter::new(&self.advisories);
        let advisories = security.then_some(&advisory_filter);
        let min_exclusive = if security { current } else { None };

        let candidates = selector::select(
            self.catalog,
            direction,
            &ignores,
            prereleases,
            advisories,
            min_exclusive,
        );

        if candidates.all_ignored && self.raise_on_ignored {
            return Err(UpdateError::all_versions_ignored(&self.dependency.name));
        }
        Ok(candidates)
    }

    /// Apply the cooldown gate to an ordered candidate list; `fallback` is
    /// returned when every candidate is suppressed or filtered away.
    async fn resolve(
        &self,
        candidates: Candidates<'a>,
        fallback: Option<Version>,
    ) -> Result<Option<Version>, UpdateError> {
        let first = match &self.cooldown {
            Some(policy) => {
                let gate = CooldownFilter::new(policy, self.now);
                let current = self.current_version();
                match gate
                    .first_eligible(
                        self.dependency,
                        current.as_ref(),
                        candidates.releases.iter().copied(),
                        self.metadata_client,
                    )
                    .await
                {
                    CooldownOutcome::Eligible(release) => Some(release),
                    CooldownOutcome::AllSuppressed => None,
                }
            }
            None => candidates.releases.first().copied(),
        };

        Ok(first.map(|r| r.version.clone()).or(fallback))
    }
}
