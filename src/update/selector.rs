//! Candidate ordering and synchronous filtering
//!
//! Produces the ordered list of installable candidates a resolution walks:
//! yanked releases are dropped, then the ignore, prerelease and advisory
//! filters apply. The cooldown filter runs later, against this order, so it
//! can stop at the first eligible release.

use crate::domain::{Release, ReleaseCatalog, Version};
use crate::update::filters::{AdvisoryFilter, IgnoreList, PrereleasePolicy};

/// Preference order for the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Newest first: ordinary version updates
    HighestFirst,
    /// Oldest first: minimal security fixes
    LowestFirst,
}

/// Result of the synchronous filter pass
pub struct Candidates<'a> {
    /// Surviving releases in preference order
    pub releases: Vec<&'a Release>,
    /// True if installable candidates existed but the ignore list removed
    /// every one of them
    pub all_ignored: bool,
}

/// Apply the synchronous filters in preference order
pub fn select<'a>(
    catalog: &'a ReleaseCatalog,
    direction: Direction,
    ignores: &IgnoreList,
    prereleases: PrereleasePolicy,
    advisories: Option<&AdvisoryFilter<'_>>,
    min_exclusive: Option<&Version>,
) -> Candidates<'a> {
    let ordered: Vec<&Release> = match direction {
        Direction::HighestFirst => catalog.descending().collect(),
        Direction::LowestFirst => catalog.ascending().collect(),
    };

    let live: Vec<&Release> = ordered
        .into_iter()
        .filter(|r| !r.yanked)
        .filter(|r| min_exclusive.map_or(true, |min| &r.version > min))
        .collect();

    let not_ignored: Vec<&Release> = live
        .iter()
        .copied()
        .filter(|r| !ignores.matches(&r.version))
        .collect();
    let all_ignored = !live.is_empty() && not_ignored.is_empty() && !ignores.is_empty();

    let releases = not_ignored
        .into_iter()
        .filter(|r| prereleases.permits(&r.version))
        .filter(|r| advisories.map_or(true, |a| a.permits(&r.version)))
        .collect();

    Candidates {
        releases,
        all_ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Constraint, Op, RequirementSet, SecurityAdvisory, VersionStyle};

    fn v(s: &str) -> Version {
        Version::parse(s, &VersionStyle::semver()).unwrap()
    }

    fn catalog() -> ReleaseCatalog {
        ReleaseCatalog::new(vec![
            Release::new(v("1.0.0")),
            Release::new(v("1.2.0")),
            Release::new(v("1.5.0")).with_yanked(None),
            Release::new(v("2.0.0-beta")),
            Release::new(v("2.0.0")),
        ])
    }

    fn versions<'a>(candidates: &'a Candidates<'a>) -> Vec<&'a str> {
        candidates.releases.iter().map(|r| r.version.raw()).collect()
    }

    #[test]
    fn test_highest_first_skips_yanked_and_prereleases() {
        let catalog = catalog();
        let candidates = select(
            &catalog,
            Direction::HighestFirst,
            &IgnoreList::default(),
            PrereleasePolicy::explicit(false),
            None,
            None,
        );
        assert_eq!(versions(&candidates), vec!["2.0.0", "1.2.0", "1.0.0"]);
        assert!(!candidates.all_ignored);
    }

    #[test]
    fn test_lowest_first_order() {
        let catalog = catalog();
        let candidates = select(
            &catalog,
            Direction::LowestFirst,
            &IgnoreList::default(),
            PrereleasePolicy::explicit(false),
            None,
            None,
        );
        assert_eq!(versions(&candidates), vec!["1.0.0", "1.2.0", "2.0.0"]);
    }

    #[test]
    fn test_prereleases_allowed_when_opted_in() {
        let catalog = catalog();
        let candidates = select(
            &catalog,
            Direction::HighestFirst,
            &IgnoreList::default(),
            PrereleasePolicy::explicit(true),
            None,
            None,
        );
        assert!(versions(&candidates).contains(&"2.0.0-beta"));
    }

    #[test]
    fn test_min_exclusive_bound() {
        let catalog = catalog();
        let min = v("1.2.0");
        let candidates = select(
            &catalog,
            Direction::LowestFirst,
            &IgnoreList::default(),
            PrereleasePolicy::explicit(false),
            None,
            Some(&min),
        );
        assert_eq!(versions(&candidates), vec!["2.0.0"]);
    }

    #[test]
    fn test_advisory_filter_applies() {
        let catalog = catalog();
        let advisories = vec![SecurityAdvisory::new(
            "pkg",
            vec![RequirementSet::single(vec![Constraint::new(
                Op::Less,
                v("2.0.0"),
            )])],
        )];
        let filter = AdvisoryFilter::new(&advisories);
        let candidates = select(
            &catalog,
            Direction::LowestFirst,
            &IgnoreList::default(),
            PrereleasePolicy::explicit(false),
            Some(&filter),
            None,
        );
        assert_eq!(versions(&candidates), vec!["2.0.0"]);
    }
}
