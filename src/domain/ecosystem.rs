//! Ecosystem type definitions for supported packaging ecosystems

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported packaging ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ecosystem {
    /// npm/yarn/pnpm (package.json)
    Npm,
    /// Cargo (Cargo.toml)
    Cargo,
    /// RubyGems/Bundler (Gemfile, *.gemspec)
    RubyGems,
    /// Maven (pom.xml)
    Maven,
    /// Gradle (build.gradle)
    Gradle,
    /// Go modules (go.mod)
    GoModules,
    /// Rust toolchain channels (rust-toolchain.toml)
    RustToolchain,
}

impl Ecosystem {
    /// Returns the canonical identifier for this ecosystem
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Cargo => "cargo",
            Ecosystem::RubyGems => "rubygems",
            Ecosystem::Maven => "maven",
            Ecosystem::Gradle => "gradle",
            Ecosystem::GoModules => "go_modules",
            Ecosystem::RustToolchain => "rust_toolchain",
        }
    }

    /// Returns the default registry name for this ecosystem
    pub fn registry_name(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Cargo => "crates.io",
            Ecosystem::RubyGems => "RubyGems",
            Ecosystem::Maven | Ecosystem::Gradle => "Maven Central",
            Ecosystem::GoModules => "Go Proxy",
            Ecosystem::RustToolchain => "static.rust-lang.org",
        }
    }

    /// Returns all supported ecosystems
    pub fn all() -> &'static [Ecosystem] {
        &[
            Ecosystem::Npm,
            Ecosystem::Cargo,
            Ecosystem::RubyGems,
            Ecosystem::Maven,
            Ecosystem::Gradle,
            Ecosystem::GoModules,
            Ecosystem::RustToolchain,
        ]
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Ecosystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "npm" | "node" => Ok(Ecosystem::Npm),
            "cargo" | "rust" => Ok(Ecosystem::Cargo),
            "rubygems" | "bundler" | "ruby" => Ok(Ecosystem::RubyGems),
            "maven" => Ok(Ecosystem::Maven),
            "gradle" => Ok(Ecosystem::Gradle),
            "go_modules" | "gomod" | "go" => Ok(Ecosystem::GoModules),
            "rust_toolchain" | "toolchain" => Ok(Ecosystem::RustToolchain),
            other => Err(format!("unknown ecosystem '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str() {
        assert_eq!(Ecosystem::Npm.as_str(), "npm");
        assert_eq!(Ecosystem::GoModules.as_str(), "go_modules");
        assert_eq!(Ecosystem::RustToolchain.as_str(), "rust_toolchain");
    }

    #[test]
    fn test_registry_names() {
        assert_eq!(Ecosystem::Npm.registry_name(), "npm");
        assert_eq!(Ecosystem::Cargo.registry_name(), "crates.io");
        assert_eq!(Ecosystem::RubyGems.registry_name(), "RubyGems");
        assert_eq!(Ecosystem::Gradle.registry_name(), "Maven Central");
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("node".parse::<Ecosystem>().unwrap(), Ecosystem::Npm);
        assert_eq!("rust".parse::<Ecosystem>().unwrap(), Ecosystem::Cargo);
        assert_eq!("go".parse::<Ecosystem>().unwrap(), Ecosystem::GoModules);
        assert!("cobol".parse::<Ecosystem>().is_err());
    }

    #[test]
    fn test_all_contains_every_ecosystem() {
        assert_eq!(Ecosystem::all().len(), 7);
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&Ecosystem::GoModules).unwrap();
        assert_eq!(json, "\"go_modules\"");
        let parsed: Ecosystem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Ecosystem::GoModules);
    }
}
