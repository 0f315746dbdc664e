//! Security advisory records
//!
//! A version is vulnerable iff it satisfies at least one vulnerable-version
//! predicate and is not inside a safe range. When an advisory provides only
//! safe ranges, anything outside them counts as vulnerable.

use super::{RequirementSet, Version};

/// A security advisory scoped to one dependency
#[derive(Debug, Clone)]
pub struct SecurityAdvisory {
    /// The dependency this advisory applies to
    pub dependency_name: String,
    /// Version ranges known to be vulnerable
    pub vulnerable_versions: Vec<RequirementSet>,
    /// Version ranges known to be safe
    pub safe_versions: Vec<RequirementSet>,
}

impl SecurityAdvisory {
    /// Creates an advisory with vulnerable ranges only
    pub fn new(dependency_name: impl Into<String>, vulnerable_versions: Vec<RequirementSet>) -> Self {
        Self {
            dependency_name: dependency_name.into(),
            vulnerable_versions,
            safe_versions: Vec::new(),
        }
    }

    /// Sets the safe ranges (builder pattern)
    pub fn with_safe_versions(mut self, safe_versions: Vec<RequirementSet>) -> Self {
        self.safe_versions = safe_versions;
        self
    }

    /// Whether the given version is vulnerable under this advisory
    pub fn vulnerable(&self, version: &Version) -> bool {
        // A version inside a safe range is never vulnerable
        if self.safe_versions.iter().any(|r| r.satisfied_by(version)) {
            return false;
        }

        if self
            .vulnerable_versions
            .iter()
            .any(|r| r.satisfied_by(version))
        {
            return true;
        }

        // A vulnerable range exists but is not met
        if !self.vulnerable_versions.is_empty() {
            return false;
        }

        // Only safe ranges were given and this version is outside all of them
        !self.safe_versions.is_empty()
    }
}

/// Whether any advisory in the slice marks the version vulnerable
pub fn any_vulnerable(advisories: &[SecurityAdvisory], version: &Version) -> bool {
    advisories.iter().any(|a| a.vulnerable(version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Constraint, Op, VersionStyle};

    fn v(s: &str) -> Version {
        Version::parse(s, &VersionStyle::semver()).unwrap()
    }

    fn range(op: Op, s: &str) -> RequirementSet {
        RequirementSet::single(vec![Constraint::new(op, v(s))])
    }

    #[test]
    fn test_vulnerable_range_matches() {
        let advisory = SecurityAdvisory::new("rails", vec![range(Op::Less, "1.3.0")]);
        assert!(advisory.vulnerable(&v("1.2.0")));
        assert!(!advisory.vulnerable(&v("1.3.0")));
        assert!(!advisory.vulnerable(&v("1.4.0")));
    }

    #[test]
    fn test_safe_range_overrides_vulnerable() {
        let advisory = SecurityAdvisory::new("rails", vec![range(Op::Less, "2.0.0")])
            .with_safe_versions(vec![range(Op::Exact, "1.9.9")]);
        assert!(advisory.vulnerable(&v("1.5.0")));
        assert!(!advisory.vulnerable(&v("1.9.9")));
    }

    #[test]
    fn test_safe_ranges_only() {
        let advisory = SecurityAdvisory::new("rails", vec![])
            .with_safe_versions(vec![range(Op::GreaterOrEqual, "2.0.0")]);
        assert!(advisory.vulnerable(&v("1.9.0")));
        assert!(!advisory.vulnerable(&v("2.1.0")));
    }

    #[test]
    fn test_no_ranges_at_all() {
        let advisory = SecurityAdvisory::new("rails", vec![]);
        assert!(!advisory.vulnerable(&v("1.0.0")));
    }

    #[test]
    fn test_any_vulnerable() {
        let advisories = vec![
            SecurityAdvisory::new("rails", vec![range(Op::Less, "1.3.0")]),
            SecurityAdvisory::new("rails", vec![range(Op::Exact, "2.0.0")]),
        ];
        assert!(any_vulnerable(&advisories, &v("1.0.0")));
        assert!(any_vulnerable(&advisories, &v("2.0.0")));
        assert!(!any_vulnerable(&advisories, &v("1.5.0")));
    }
}
