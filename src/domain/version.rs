//! Canonical version model shared by every ecosystem grammar
//!
//! A `Version` is an ordered tuple of release segments, an optional
//! prerelease marker, optional build metadata (ignored in ordering) and an
//! optional channel (toolchain-style stability label plus date). Ecosystem
//! quirks are configuration on `VersionStyle`, not new types:
//! - strip a leading `v` (Go, git tags)
//! - split off `+build` metadata before comparing (semver, `+incompatible`)
//! - treat post-release suffixes like `u1`/`sp2` as greater than the base
//!   (Maven)
//! - accept channel strings like `nightly-2024-05-01` (rust-toolchain)

use crate::error::ParseError;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Ecosystem-specific parsing quirks, expressed as configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionStyle {
    /// Strip a leading `v`/`V` before a digit
    pub strip_leading_v: bool,
    /// Split off a `+suffix` as build metadata before comparing
    pub split_build_metadata: bool,
    /// Alphabetic suffixes ordered *after* the base version (e.g. Maven `u1`)
    pub post_release_suffixes: &'static [&'static str],
    /// Accept channel strings (`stable`, `beta`, `nightly-YYYY-MM-DD`)
    pub channels: bool,
}

impl VersionStyle {
    /// Semver-flavored style (npm, cargo, rubygems)
    pub const fn semver() -> Self {
        Self {
            strip_leading_v: true,
            split_build_metadata: true,
            post_release_suffixes: &[],
            channels: false,
        }
    }

    /// Maven/Gradle style: no `v` prefix, `u`/`sp` post-release suffixes
    pub const fn maven() -> Self {
        Self {
            strip_leading_v: false,
            split_build_metadata: false,
            post_release_suffixes: &["u", "sp", "cr"],
            channels: false,
        }
    }

    /// Go module style: mandatory `v` prefix, `+incompatible` metadata
    pub const fn go() -> Self {
        Self {
            strip_leading_v: true,
            split_build_metadata: true,
            post_release_suffixes: &[],
            channels: false,
        }
    }

    /// Toolchain style: channel labels alongside numeric versions
    pub const fn toolchain() -> Self {
        Self {
            strip_leading_v: false,
            split_build_metadata: false,
            post_release_suffixes: &[],
            channels: true,
        }
    }
}

impl Default for VersionStyle {
    fn default() -> Self {
        Self::semver()
    }
}

/// One release segment of a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Numeric segment (`1`, `0`, `20210101`)
    Number(u64),
    /// Alphabetic segment, sorted *before* numbers (prerelease-ish: `beta`)
    Text(String),
    /// Post-release segment, sorted *after* numbers (Maven `u1`)
    Post(u64),
}

impl Segment {
    fn rank(&self) -> u8 {
        match self {
            Segment::Text(_) => 0,
            Segment::Number(_) => 1,
            Segment::Post(_) => 2,
        }
    }

    fn cmp_segment(&self, other: &Segment) -> Ordering {
        match (self, other) {
            (Segment::Number(a), Segment::Number(b)) => a.cmp(b),
            (Segment::Post(a), Segment::Post(b)) => a.cmp(b),
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// One prerelease identifier (`beta`, `1`, `rc`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Number(u64),
    Text(String),
}

impl Identifier {
    fn cmp_identifier(&self, other: &Identifier) -> Ordering {
        match (self, other) {
            (Identifier::Number(a), Identifier::Number(b)) => a.cmp(b),
            (Identifier::Text(a), Identifier::Text(b)) => a.cmp(b),
            // Numeric identifiers sort before alphanumeric ones (semver §11)
            (Identifier::Number(_), Identifier::Text(_)) => Ordering::Less,
            (Identifier::Text(_), Identifier::Number(_)) => Ordering::Greater,
        }
    }
}

/// Toolchain channel: stability label plus optional pin date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub name: String,
    pub date: Option<NaiveDate>,
}

/// A parsed, comparable version
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    segments: Vec<Segment>,
    prerelease: Option<Vec<Identifier>>,
    build: Option<String>,
    channel: Option<Channel>,
    precision: usize,
}

impl Version {
    /// Parse a raw version string under the given style
    pub fn parse(raw: &str, style: &VersionStyle) -> Result<Self, ParseError> {
        let original = raw.trim();
        if original.is_empty() {
            return Err(ParseError::version(raw, "empty version string"));
        }

        if style.channels {
            if let Some(channel) = parse_channel(original) {
                return Ok(Self {
                    raw: original.to_string(),
                    segments: Vec::new(),
                    prerelease: None,
                    build: None,
                    channel: Some(channel),
                    precision: 0,
                });
            }
        }

        let mut rest = original;
        if style.strip_leading_v {
            if let Some(stripped) = rest.strip_prefix(['v', 'V']) {
                if stripped.starts_with(|c: char| c.is_ascii_digit()) {
                    rest = stripped;
                }
            }
        }

        let mut build = None;
        if style.split_build_metadata {
            if let Some((main, meta)) = rest.split_once('+') {
                if meta.is_empty() {
                    return Err(ParseError::version(original, "empty build metadata"));
                }
                build = Some(meta.to_string());
                rest = main;
            }
        }

        let (main, pre) = match rest.split_once('-') {
            Some((m, p)) => (m, Some(p)),
            None => (rest, None),
        };

        if !main.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ParseError::version(
                original,
                "must start with a numeric segment",
            ));
        }

        let parts: Vec<&str> = main.split('.').collect();
        let precision = parts.len();
        let mut segments = Vec::new();
        for part in parts {
            parse_dot_part(part, style, &mut segments)
                .map_err(|msg| ParseError::version(original, msg))?;
        }

        let prerelease = match pre {
            Some(p) => Some(parse_prerelease(p).map_err(|msg| ParseError::version(original, msg))?),
            None => None,
        };

        Ok(Self {
            raw: original.to_string(),
            segments,
            prerelease,
            build,
            channel: None,
            precision,
        })
    }

    /// Build a version from plain numeric segments (used by range expansion)
    pub fn from_numeric(segments: &[u64]) -> Self {
        let raw = segments
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".");
        Self {
            raw,
            segments: segments.iter().map(|&n| Segment::Number(n)).collect(),
            prerelease: None,
            build: None,
            channel: None,
            precision: segments.len(),
        }
    }

    /// Build a version carrying the least possible prerelease marker (`-0`),
    /// used as a range upper bound that excludes every prerelease of itself
    pub fn prerelease_floor(segments: &[u64]) -> Self {
        let mut version = Self::from_numeric(segments);
        version.raw.push_str("-0");
        version.prerelease = Some(vec![Identifier::Number(0)]);
        version
    }

    /// The original (trimmed) string this version was parsed from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Number of explicit dot-separated segments in the source string
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// True if this version is a prerelease (or a non-stable channel)
    pub fn is_prerelease(&self) -> bool {
        if let Some(channel) = &self.channel {
            return channel.name != "stable";
        }
        self.prerelease.is_some() || self.segments.iter().any(|s| matches!(s, Segment::Text(_)))
    }

    /// The channel, for toolchain-style versions
    pub fn channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    /// Build metadata, if any (never participates in ordering)
    pub fn build_metadata(&self) -> Option<&str> {
        self.build.as_deref()
    }

    /// Leading numeric segments, zero-padded to `len`
    pub fn numeric_segments(&self, len: usize) -> Vec<u64> {
        let mut out: Vec<u64> = self
            .segments
            .iter()
            .map_while(|s| match s {
                Segment::Number(n) => Some(*n),
                _ => None,
            })
            .collect();
        if out.len() < len {
            out.resize(len, 0);
        }
        out
    }

    /// This version without its prerelease marker and build metadata
    pub fn release(&self) -> Version {
        let mut v = self.clone();
        if v.prerelease.is_some() || v.build.is_some() {
            v.prerelease = None;
            v.build = None;
            let main = v.raw.split(['-', '+']).next().unwrap_or("").to_string();
            v.raw = main;
        }
        v
    }

    fn segment_at(&self, index: usize) -> Segment {
        self.segments
            .get(index)
            .cloned()
            .unwrap_or(Segment::Number(0))
    }
}

fn parse_channel(raw: &str) -> Option<Channel> {
    let (name, date) = match raw.split_once('-') {
        Some((n, d)) => (n, Some(d)),
        None => (raw, None),
    };
    if !matches!(name, "stable" | "beta" | "nightly") {
        return None;
    }
    let date = match date {
        Some(d) => Some(NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()?),
        None => None,
    };
    Some(Channel {
        name: name.to_string(),
        date,
    })
}

/// Split one dot-separated part into alternating digit/alpha segments
fn parse_dot_part(
    part: &str,
    style: &VersionStyle,
    out: &mut Vec<Segment>,
) -> Result<(), String> {
    if part.is_empty() {
        return Err("empty segment".to_string());
    }
    let mut chars = part.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            let mut digits = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() {
                    digits.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            let n: u64 = digits
                .parse()
                .map_err(|_| format!("numeric segment '{}' out of range", digits))?;
            out.push(Segment::Number(n));
        } else if c.is_ascii_alphabetic() {
            let mut letters = String::new();
            while let Some(&a) = chars.peek() {
                if a.is_ascii_alphabetic() {
                    letters.push(a.to_ascii_lowercase());
                    chars.next();
                } else {
                    break;
                }
            }
            if style
                .post_release_suffixes
                .iter()
                .any(|s| s.eq_ignore_ascii_case(&letters))
            {
                // Consume the trailing number into the post-release segment
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        digits.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let n: u64 = if digits.is_empty() {
                    0
                } else {
                    digits
                        .parse()
                        .map_err(|_| format!("numeric segment '{}' out of range", digits))?
                };
                out.push(Segment::Post(n));
            } else {
                out.push(Segment::Text(letters));
            }
        } else {
            return Err(format!("invalid character '{}' in segment '{}'", c, part));
        }
    }
    Ok(())
}

fn parse_prerelease(pre: &str) -> Result<Vec<Identifier>, String> {
    if pre.is_empty() {
        return Err("empty prerelease marker".to_string());
    }
    let mut identifiers = Vec::new();
    for ident in pre.split(['.', '-']) {
        if ident.is_empty() {
            return Err("empty prerelease identifier".to_string());
        }
        if !ident.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!("invalid prerelease identifier '{}'", ident));
        }
        if ident.chars().all(|c| c.is_ascii_digit()) {
            let n: u64 = ident
                .parse()
                .map_err(|_| format!("prerelease identifier '{}' out of range", ident))?;
            identifiers.push(Identifier::Number(n));
        } else {
            identifiers.push(Identifier::Text(ident.to_ascii_lowercase()));
        }
    }
    Ok(identifiers)
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // Channel versions order among themselves by label then date;
        // numeric versions sort below any channel for determinism.
        match (&self.channel, &other.channel) {
            (Some(a), Some(b)) => {
                return a.name.cmp(&b.name).then_with(|| a.date.cmp(&b.date));
            }
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => {}
        }

        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let ord = self.segment_at(i).cmp_segment(&other.segment_at(i));
            if ord != Ordering::Equal {
                return ord;
            }
        }

        match (&self.prerelease, &other.prerelease) {
            (None, None) => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(a), Some(b)) => {
                for i in 0..a.len().max(b.len()) {
                    match (a.get(i), b.get(i)) {
                        (Some(x), Some(y)) => {
                            let ord = x.cmp_identifier(y);
                            if ord != Ordering::Equal {
                                return ord;
                            }
                        }
                        (None, Some(_)) => return Ordering::Less,
                        (Some(_), None) => return Ordering::Greater,
                        (None, None) => unreachable!(),
                    }
                }
                Ordering::Equal
            }
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn semver(s: &str) -> Version {
        Version::parse(s, &VersionStyle::semver()).unwrap()
    }

    #[test]
    fn test_parse_basic() {
        let v = semver("1.2.3");
        assert_eq!(v.raw(), "1.2.3");
        assert_eq!(v.precision(), 3);
        assert!(!v.is_prerelease());
    }

    #[test]
    fn test_parse_strips_leading_v() {
        assert_eq!(semver("v1.2.3"), semver("1.2.3"));
    }

    #[test]
    fn test_parse_prerelease() {
        let v = semver("1.2.3-beta.1");
        assert!(v.is_prerelease());
        assert_eq!(v.precision(), 3);
    }

    #[test]
    fn test_parse_empty_rejected() {
        assert!(Version::parse("", &VersionStyle::semver()).is_err());
        assert!(Version::parse("   ", &VersionStyle::semver()).is_err());
    }

    #[test]
    fn test_parse_garbage_rejected() {
        assert!(Version::parse("not-a-version", &VersionStyle::semver()).is_err());
        assert!(Version::parse("1.2.3!", &VersionStyle::semver()).is_err());
        assert!(Version::parse("1..3", &VersionStyle::semver()).is_err());
    }

    #[test]
    fn test_ordering_totality() {
        let cases = [("1.0.0", "2.0.0"), ("1.9.0", "1.10.0"), ("1.0.0", "1.0.1")];
        for (a, b) in cases {
            assert!(semver(a) < semver(b), "{} < {}", a, b);
            assert!(semver(b) > semver(a), "{} > {}", b, a);
        }
        assert_eq!(semver("1.0.0"), semver("1.0.0"));
    }

    #[test]
    fn test_trailing_zero_segments_equal() {
        assert_eq!(semver("1.0"), semver("1.0.0"));
        assert_eq!(semver("1"), semver("1.0.0"));
        assert!(semver("1.0") < semver("1.0.1"));
    }

    #[test]
    fn test_prerelease_orders_below_release() {
        assert!(semver("1.0.0-alpha") < semver("1.0.0"));
        assert!(semver("1.0.0-alpha") < semver("1.0.0-beta"));
        assert!(semver("1.0.0-alpha") < semver("1.0.0-alpha.1"));
        assert!(semver("1.0.0-alpha.1") < semver("1.0.0-alpha.beta"));
        assert!(semver("1.0.0-rc.1") < semver("1.0.0"));
        assert!(semver("1.0.0") < semver("1.0.1-alpha"));
    }

    #[test]
    fn test_build_metadata_ignored_in_ordering() {
        assert_eq!(semver("1.0.0+build1"), semver("1.0.0+build2"));
        assert_eq!(semver("1.0.0+build1"), semver("1.0.0"));
        assert_eq!(semver("1.0.0+build1").build_metadata(), Some("build1"));
    }

    #[test]
    fn test_prerelease_floor_is_least() {
        let floor = Version::prerelease_floor(&[2, 0, 0]);
        assert_eq!(floor.raw(), "2.0.0-0");
        assert!(floor < semver("2.0.0-alpha"));
        assert!(floor < semver("2.0.0"));
        assert!(floor > semver("1.9.9"));
    }

    #[test]
    fn test_go_pseudo_version_ordering() {
        let style = VersionStyle::go();
        let base = Version::parse("v0.0.0-20200101000000-abcdef123456", &style).unwrap();
        let newer = Version::parse("v0.0.0-20210101000000-abcdef123456", &style).unwrap();
        assert!(base < newer);
        assert!(base.is_prerelease());
    }

    #[test]
    fn test_go_incompatible_suffix_is_metadata() {
        let style = VersionStyle::go();
        let v = Version::parse("v2.0.0+incompatible", &style).unwrap();
        assert_eq!(v.build_metadata(), Some("incompatible"));
        assert_eq!(v, Version::parse("v2.0.0", &style).unwrap());
    }

    #[test]
    fn test_maven_post_release_suffix_greater() {
        let style = VersionStyle::maven();
        let base = Version::parse("1.8.0", &style).unwrap();
        let update = Version::parse("1.8.0u40", &style).unwrap();
        let later = Version::parse("1.8.0u60", &style).unwrap();
        assert!(update > base);
        assert!(later > update);
        assert!(!update.is_prerelease());
    }

    #[test]
    fn test_maven_qualifier_orders_below_release() {
        let style = VersionStyle::maven();
        let alpha = Version::parse("1.0.0.alpha1", &style).unwrap();
        let release = Version::parse("1.0.0", &style).unwrap();
        assert!(alpha < release);
        assert!(alpha.is_prerelease());
    }

    #[test]
    fn test_channel_parsing() {
        let style = VersionStyle::toolchain();
        let nightly = Version::parse("nightly-2024-05-01", &style).unwrap();
        assert_eq!(nightly.channel().unwrap().name, "nightly");
        assert!(nightly.is_prerelease());

        let stable = Version::parse("stable", &style).unwrap();
        assert!(!stable.is_prerelease());
        assert!(stable.channel().unwrap().date.is_none());
    }

    #[test]
    fn test_channel_date_ordering() {
        let style = VersionStyle::toolchain();
        let older = Version::parse("nightly-2024-01-01", &style).unwrap();
        let newer = Version::parse("nightly-2024-05-01", &style).unwrap();
        assert!(older < newer);
    }

    #[test]
    fn test_toolchain_numeric_version_still_parses() {
        let style = VersionStyle::toolchain();
        let v = Version::parse("1.79.0", &style).unwrap();
        assert!(v.channel().is_none());
        assert!(v < Version::parse("1.80.0", &style).unwrap());
    }

    #[test]
    fn test_numeric_segments_padding() {
        let v = semver("1.2");
        assert_eq!(v.numeric_segments(3), vec![1, 2, 0]);
        assert_eq!(semver("1.2.3").numeric_segments(2), vec![1, 2, 3]);
    }

    #[test]
    fn test_release_strips_prerelease() {
        let v = semver("1.2.3-beta.1");
        assert_eq!(v.release(), semver("1.2.3"));
        assert_eq!(v.release().raw(), "1.2.3");
    }

    #[test]
    fn test_display_preserves_raw() {
        assert_eq!(format!("{}", semver("v1.2.3")), "v1.2.3");
    }

    #[test]
    fn test_serialize_as_raw_string() {
        let json = serde_json::to_string(&semver("1.2.3")).unwrap();
        assert_eq!(json, "\"1.2.3\"");
    }
}
