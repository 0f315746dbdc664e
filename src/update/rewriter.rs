//! Format-preserving requirement rewriting
//!
//! Rewrites a requirement string so it admits the chosen update target
//! while keeping the author's operators, spacing, wildcard placeholders and
//! segment precision intact:
//! - `~> 1.5` moved to 1.6.3 becomes `~> 1.6` (not `~> 1.6.3`)
//! - `^1.2.3` moved to 2.0.1 becomes `^2.0.1`
//! - `1.x` moved to 2.3.0 becomes `2.x`
//!
//! The rewrite works on the string, never on a re-rendered canonical form,
//! and is idempotent: rewriting its own output with the same target is a
//! no-op.

use crate::domain::Version;
use regex::Regex;
use std::sync::LazyLock;

/// A version-shaped literal inside a requirement string. The hyphen of a
/// range separator (` - `) is never consumed because `-` must be followed
/// directly by an alphanumeric.
static VERSION_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[vV]?\d[\dA-Za-z]*(?:\.[\dA-Za-z]+|\.[xX*])*(?:-[\dA-Za-z.]+)?(?:\+[\dA-Za-z.]+)?")
        .unwrap()
});

/// Rewrite every relevant version literal in `old_req` to point at
/// `new_version`.
///
/// With a single literal the rewrite applies unconditionally. With several
/// (compound ranges like `>= 1.0, < 2.0`), only literals equal to
/// `old_version` are touched; without a known `old_version` the string is
/// returned unchanged, since guessing which bound to move could corrupt the
/// range.
pub fn rewrite(old_req: &str, old_version: Option<&Version>, new_version: &Version) -> String {
    let matches: Vec<_> = VERSION_LITERAL_RE
        .find_iter(old_req)
        .map(|m| (m.start(), m.end()))
        .collect();

    match matches.len() {
        0 => old_req.to_string(),
        1 => {
            let (start, end) = matches[0];
            let mut out = String::new();
            out.push_str(&old_req[..start]);
            out.push_str(&rewrite_literal(&old_req[start..end], new_version));
            out.push_str(&old_req[end..]);
            out
        }
        _ => {
            let Some(old_version) = old_version else {
                return old_req.to_string();
            };
            let mut out = String::new();
            let mut cursor = 0;
            for (start, end) in matches {
                out.push_str(&old_req[cursor..start]);
                let literal = &old_req[start..end];
                if literal_equals(literal, old_version) {
                    out.push_str(&rewrite_literal(literal, new_version));
                } else {
                    out.push_str(literal);
                }
                cursor = end;
            }
            out.push_str(&old_req[cursor..]);
            out
        }
    }
}

/// True if the literal parses to exactly `version`
fn literal_equals(literal: &str, version: &Version) -> bool {
    if has_wildcard_part(literal) {
        return false;
    }
    Version::parse(literal, &crate::domain::VersionStyle::semver())
        .map(|v| &v == version)
        .unwrap_or(false)
}

fn has_wildcard_part(literal: &str) -> bool {
    literal.split('.').any(|p| matches!(p, "x" | "X" | "*"))
}

fn is_wildcard_part(part: &str) -> bool {
    matches!(part, "x" | "X" | "*")
}

/// Rewrite one literal at its own precision
fn rewrite_literal(literal: &str, new_version: &Version) -> String {
    let (prefix, body) = match literal.strip_prefix(['v', 'V']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => (&literal[..1], rest),
        _ => ("", literal),
    };

    // A prerelease or metadata-carrying target cannot be truncated without
    // changing its meaning; emit it whole.
    if new_version.is_prerelease() || new_version.build_metadata().is_some() {
        let raw = match new_version.raw().strip_prefix(['v', 'V']) {
            Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
            _ => new_version.raw(),
        };
        return format!("{}{}", prefix, raw);
    }

    // Precision of the release part of the old literal
    let release = body.split(['-', '+']).next().unwrap_or(body);
    let old_parts: Vec<&str> = release.split('.').collect();
    let count = old_parts.len().min(new_version.precision().max(1));
    let segments = new_version.numeric_segments(count);

    let parts: Vec<String> = old_parts[..count]
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if is_wildcard_part(part) {
                (*part).to_string()
            } else {
                segments[i].to_string()
            }
        })
        .collect();
    format!("{}{}", prefix, parts.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VersionStyle;

    fn v(s: &str) -> Version {
        Version::parse(s, &VersionStyle::semver()).unwrap()
    }

    #[test]
    fn test_pessimistic_precision_preserved() {
        assert_eq!(rewrite("~> 1.5", Some(&v("1.5.0")), &v("1.6.3")), "~> 1.6");
        assert_eq!(
            rewrite("~> 1.5.0", Some(&v("1.5.0")), &v("1.6.3")),
            "~> 1.6.3"
        );
    }

    #[test]
    fn test_caret_keeps_operator_and_spacing() {
        assert_eq!(rewrite("^1.2.3", Some(&v("1.2.3")), &v("2.0.1")), "^2.0.1");
        assert_eq!(rewrite(">= 1.2", Some(&v("1.2.0")), &v("1.4.0")), ">= 1.4");
    }

    #[test]
    fn test_wildcard_placeholder_preserved() {
        assert_eq!(rewrite("1.x", None, &v("2.3.0")), "2.x");
        assert_eq!(rewrite("1.2.*", None, &v("1.3.0")), "1.3.*");
    }

    #[test]
    fn test_bare_star_unchanged() {
        assert_eq!(rewrite("*", None, &v("9.9.9")), "*");
    }

    #[test]
    fn test_old_precision_beyond_target_uses_target_precision() {
        assert_eq!(rewrite("1.1.0.1", None, &v("1.5.0")), "1.5.0");
        assert_eq!(rewrite("1", None, &v("4.0.0")), "4");
    }

    #[test]
    fn test_compound_range_moves_matching_bound_only() {
        assert_eq!(
            rewrite(">= 1.0.0, < 2.0.0", Some(&v("1.0.0")), &v("1.5.0")),
            ">= 1.5.0, < 2.0.0"
        );
    }

    #[test]
    fn test_compound_range_without_current_unchanged() {
        assert_eq!(
            rewrite(">= 1.0.0, < 2.0.0", None, &v("1.5.0")),
            ">= 1.0.0, < 2.0.0"
        );
    }

    #[test]
    fn test_prerelease_target_emitted_whole() {
        assert_eq!(
            rewrite("~> 1.5", Some(&v("1.5.0")), &v("2.0.0-rc.1")),
            "~> 2.0.0-rc.1"
        );
    }

    #[test]
    fn test_leading_v_preserved() {
        assert_eq!(rewrite("v1.2.3", Some(&v("1.2.3")), &v("1.3.0")), "v1.3.0");
    }

    #[test]
    fn test_idempotent() {
        let target = v("1.6.3");
        let once = rewrite("~> 1.5", Some(&v("1.5.0")), &target);
        let twice = rewrite(&once, Some(&target), &target);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_literal_unchanged() {
        assert_eq!(rewrite("latest.release", None, &v("2.0.0")), "latest.release");
    }
}
