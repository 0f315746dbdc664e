//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ParseError: Malformed version or requirement strings
//! - RegistryError: Issues with package registry communication
//! - UpdateError: Resolution-level failures surfaced to the orchestrator
//!
//! Data-quality problems in registry responses never panic; the offending
//! release or requirement is dropped from consideration instead.

use thiserror::Error;

use crate::domain::Ecosystem;

/// Errors raised while parsing version or requirement strings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Malformed version string
    #[error("malformed version '{input}': {message}")]
    Version { input: String, message: String },

    /// Malformed requirement string
    #[error("malformed {ecosystem} requirement '{input}': {message}")]
    Requirement {
        input: String,
        ecosystem: Ecosystem,
        message: String,
    },

    /// No grammar registered for the ecosystem
    #[error("no grammar registered for ecosystem '{ecosystem}'")]
    UnknownEcosystem { ecosystem: Ecosystem },
}

impl ParseError {
    /// Creates a new malformed-version error
    pub fn version(input: impl Into<String>, message: impl Into<String>) -> Self {
        ParseError::Version {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Creates a new malformed-requirement error
    pub fn requirement(
        input: impl Into<String>,
        ecosystem: Ecosystem,
        message: impl Into<String>,
    ) -> Self {
        ParseError::Requirement {
            input: input.into(),
            ecosystem,
            message: message.into(),
        }
    }
}

/// Errors related to package registry communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Returns true if retrying the request could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RegistryError::Timeout { .. }
                | RegistryError::RateLimitExceeded { .. }
                | RegistryError::InvalidResponse { .. }
        )
    }
}

/// Resolution-level errors surfaced to the orchestrator
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Parse failure that could not be skipped
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Registry failure that could not be absorbed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Every installable candidate is matched by an ignored-version spec.
    /// Only raised when the caller opted in via `raise_on_ignored`.
    #[error("all candidate versions of '{package}' are ignored")]
    AllVersionsIgnored { package: String },

    /// Every requirement occurrence for the dependency failed to parse
    #[error("no parseable requirements for '{package}'")]
    Unresolvable { package: String },
}

impl UpdateError {
    /// Creates a new AllVersionsIgnored error
    pub fn all_versions_ignored(package: impl Into<String>) -> Self {
        UpdateError::AllVersionsIgnored {
            package: package.into(),
        }
    }

    /// Creates a new Unresolvable error
    pub fn unresolvable(package: impl Into<String>) -> Self {
        UpdateError::Unresolvable {
            package: package.into(),
        }
    }
}
