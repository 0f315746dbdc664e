//! Canonical requirement form shared by every ecosystem grammar
//!
//! All ecosystem shorthand (caret, tilde, wildcard, hyphen range, bracket
//! range, dynamic `+`) is translated into a disjunction (`RequirementSet`)
//! of conjunctions (`Requirement`) of `(operator, version)` constraints at
//! parse time. Satisfaction checks then work identically for every
//! ecosystem.

use super::Version;
use serde::Serialize;
use std::fmt;

/// Comparison operator of one constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// Exact match (`=`)
    Exact,
    /// Exclusion (`!=`)
    NotEqual,
    /// Strictly greater (`>`)
    Greater,
    /// Greater or equal (`>=`)
    GreaterOrEqual,
    /// Strictly less (`<`)
    Less,
    /// Less or equal (`<=`)
    LessOrEqual,
    /// Pessimistic/compatible (`~>`): bump of the last explicit segment
    Compatible,
}

impl Op {
    /// Canonical operator spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Exact => "=",
            Op::NotEqual => "!=",
            Op::Greater => ">",
            Op::GreaterOrEqual => ">=",
            Op::Less => "<",
            Op::LessOrEqual => "<=",
            Op::Compatible => "~>",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One `(operator, version)` predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constraint {
    pub op: Op,
    pub version: Version,
}

impl Constraint {
    /// Creates a new constraint
    pub fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    /// Check whether a candidate version satisfies this constraint
    pub fn matches(&self, candidate: &Version) -> bool {
        match self.op {
            Op::Exact => candidate == &self.version,
            Op::NotEqual => candidate != &self.version,
            Op::Greater => candidate > &self.version,
            Op::GreaterOrEqual => candidate >= &self.version,
            Op::Less => candidate < &self.version,
            Op::LessOrEqual => candidate <= &self.version,
            Op::Compatible => {
                candidate >= &self.version && candidate < &self.compatible_upper_bound()
            }
        }
    }

    /// Upper bound implied by `~>`: drop the last explicit segment and
    /// increment the one before it (`~> 1.5.3` < 1.6, `~> 1.5` < 2)
    fn compatible_upper_bound(&self) -> Version {
        let precision = self.version.precision().max(1);
        let segments = self.version.numeric_segments(precision);
        if precision == 1 {
            Version::from_numeric(&[segments[0] + 1])
        } else {
            let mut upper = segments[..precision - 1].to_vec();
            *upper.last_mut().unwrap() += 1;
            Version::from_numeric(&upper)
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.version)
    }
}

/// A conjunction of constraints (all must hold)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    constraints: Vec<Constraint>,
}

impl Requirement {
    /// Creates a requirement from ANDed constraints
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Self { constraints }
    }

    /// The ANDed constraints
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// True if the candidate satisfies every constraint
    pub fn satisfied_by(&self, candidate: &Version) -> bool {
        self.constraints.iter().all(|c| c.matches(candidate))
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.constraints.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// A disjunction of requirements (any may hold), e.g. npm `||` alternation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementSet {
    alternatives: Vec<Requirement>,
}

impl RequirementSet {
    /// Creates a set from ORed alternatives
    pub fn new(alternatives: Vec<Requirement>) -> Self {
        Self { alternatives }
    }

    /// Creates a set with a single ANDed alternative
    pub fn single(constraints: Vec<Constraint>) -> Self {
        Self {
            alternatives: vec![Requirement::new(constraints)],
        }
    }

    /// The ORed alternatives
    pub fn alternatives(&self) -> &[Requirement] {
        &self.alternatives
    }

    /// True if the candidate satisfies at least one alternative
    pub fn satisfied_by(&self, candidate: &Version) -> bool {
        self.alternatives.iter().any(|r| r.satisfied_by(candidate))
    }

    /// All versions named by any constraint in the set
    pub fn constraint_versions(&self) -> impl Iterator<Item = &Version> {
        self.alternatives
            .iter()
            .flat_map(|r| r.constraints.iter().map(|c| &c.version))
    }
}

impl fmt::Display for RequirementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.alternatives.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(" || "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VersionStyle;

    fn v(s: &str) -> Version {
        Version::parse(s, &VersionStyle::semver()).unwrap()
    }

    fn c(op: Op, s: &str) -> Constraint {
        Constraint::new(op, v(s))
    }

    #[test]
    fn test_exact_matches_equal_versions() {
        assert!(c(Op::Exact, "1.2.3").matches(&v("1.2.3")));
        assert!(c(Op::Exact, "1.5").matches(&v("1.5.0")));
        assert!(!c(Op::Exact, "1.2.3").matches(&v("1.2.4")));
    }

    #[test]
    fn test_not_equal() {
        assert!(c(Op::NotEqual, "1.2.3").matches(&v("1.2.4")));
        assert!(!c(Op::NotEqual, "1.2.3").matches(&v("1.2.3")));
    }

    #[test]
    fn test_comparison_operators() {
        assert!(c(Op::Greater, "1.0.0").matches(&v("1.0.1")));
        assert!(!c(Op::Greater, "1.0.0").matches(&v("1.0.0")));
        assert!(c(Op::GreaterOrEqual, "1.0.0").matches(&v("1.0.0")));
        assert!(c(Op::Less, "2.0.0").matches(&v("1.9.9")));
        assert!(c(Op::LessOrEqual, "2.0.0").matches(&v("2.0.0")));
    }

    #[test]
    fn test_compatible_three_segments() {
        let constraint = c(Op::Compatible, "1.5.3");
        assert!(constraint.matches(&v("1.5.3")));
        assert!(constraint.matches(&v("1.5.9")));
        assert!(!constraint.matches(&v("1.6.0")));
        assert!(!constraint.matches(&v("1.5.2")));
    }

    #[test]
    fn test_compatible_two_segments() {
        let constraint = c(Op::Compatible, "1.5");
        assert!(constraint.matches(&v("1.5.0")));
        assert!(constraint.matches(&v("1.9.9")));
        assert!(!constraint.matches(&v("2.0.0")));
    }

    #[test]
    fn test_compatible_single_segment() {
        let constraint = c(Op::Compatible, "2");
        assert!(constraint.matches(&v("2.9.0")));
        assert!(!constraint.matches(&v("3.0.0")));
    }

    #[test]
    fn test_requirement_conjunction() {
        let req = Requirement::new(vec![
            c(Op::GreaterOrEqual, "1.0.0"),
            c(Op::Less, "2.0.0"),
        ]);
        assert!(req.satisfied_by(&v("1.5.0")));
        assert!(!req.satisfied_by(&v("2.0.0")));
        assert!(!req.satisfied_by(&v("0.9.0")));
    }

    #[test]
    fn test_requirement_set_disjunction() {
        let set = RequirementSet::new(vec![
            Requirement::new(vec![c(Op::Compatible, "1.0")]),
            Requirement::new(vec![c(Op::Compatible, "3.0")]),
        ]);
        assert!(set.satisfied_by(&v("1.5.0")));
        assert!(set.satisfied_by(&v("3.2.0")));
        assert!(!set.satisfied_by(&v("2.0.0")));
    }

    #[test]
    fn test_prerelease_excluded_by_floor_bound() {
        // `>= 1.0.0, < 2.0.0-0` rejects every prerelease of 2.0.0
        let req = Requirement::new(vec![
            c(Op::GreaterOrEqual, "1.0.0"),
            Constraint::new(Op::Less, Version::prerelease_floor(&[2, 0, 0])),
        ]);
        assert!(req.satisfied_by(&v("1.9.9")));
        assert!(!req.satisfied_by(&v("2.0.0-alpha")));
        assert!(!req.satisfied_by(&v("2.0.0")));
    }

    #[test]
    fn test_display() {
        let set = RequirementSet::single(vec![
            c(Op::GreaterOrEqual, "1.0.0"),
            c(Op::Less, "2.0.0"),
        ]);
        assert_eq!(format!("{}", set), ">= 1.0.0, < 2.0.0");
    }

    #[test]
    fn test_constraint_versions_iterates_all() {
        let set = RequirementSet::new(vec![
            Requirement::new(vec![c(Op::GreaterOrEqual, "1.0.0")]),
            Requirement::new(vec![c(Op::Less, "2.0.0")]),
        ]);
        assert_eq!(set.constraint_versions().count(), 2);
    }
}
