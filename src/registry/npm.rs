//! npm registry adapter
//!
//! Fetches package release information from the npm registry.
//! API endpoint: https://registry.npmjs.org/{package}
//!
//! The packument's `versions` map lists installable versions and the `time`
//! map carries publication timestamps. A version present in `time` but
//! missing from `versions` has been unpublished and is surfaced as yanked.

use crate::domain::{Ecosystem, Release, Version, VersionStyle};
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryClient};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// npm registry base URL
const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// npm registry adapter
pub struct NpmClient {
    client: HttpClient,
}

/// npm packument response
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    /// Publication timestamps keyed by version (plus `created`/`modified`)
    #[serde(default)]
    time: HashMap<String, String>,
    /// Installable versions
    versions: HashMap<String, serde_json::Value>,
}

impl NpmClient {
    /// Create a new npm adapter
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}", NPM_REGISTRY_URL, package)
    }
}

#[async_trait]
impl RegistryClient for NpmClient {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn registry_name(&self) -> &'static str {
        "npm"
    }

    async fn fetch_releases(&self, package: &str) -> Result<Vec<Release>, RegistryError> {
        let url = self.build_url(package);
        let response: NpmPackageResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        let style = VersionStyle::semver();
        let mut releases = Vec::new();
        for (raw, timestamp) in &response.time {
            if raw == "created" || raw == "modified" {
                continue;
            }
            let version = match Version::parse(raw, &style) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(package, version = %raw, error = %e, "skipping unparseable release");
                    continue;
                }
            };

            let mut release = Release::new(version);
            if let Ok(released_at) = timestamp.parse::<DateTime<Utc>>() {
                release = release.with_released_at(released_at);
            }
            if !response.versions.contains_key(raw) {
                release = release.with_yanked(Some("unpublished".to_string()));
            }
            releases.push(release);
        }

        Ok(releases)
    }
}
