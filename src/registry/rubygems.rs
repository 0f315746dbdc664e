//! RubyGems API adapter
//!
//! Fetches gem release information from rubygems.org.
//! API endpoint: https://rubygems.org/api/v1/versions/{gem}.json

use crate::domain::{Ecosystem, Release, Version, VersionStyle};
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryClient};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// RubyGems API base URL
const RUBYGEMS_API_URL: &str = "https://rubygems.org/api/v1/versions";

/// RubyGems adapter
pub struct RubyGemsClient {
    client: HttpClient,
}

/// One entry of the versions listing
#[derive(Debug, Deserialize)]
struct GemVersion {
    /// Version number
    number: String,
    /// Creation timestamp
    created_at: Option<String>,
    /// Whether the gem version was yanked
    #[serde(default)]
    yanked: bool,
    /// Download count for this version
    downloads_count: Option<u64>,
    /// Required Ruby version constraint
    ruby_version: Option<String>,
}

impl RubyGemsClient {
    /// Create a new RubyGems adapter
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Build the URL for a gem
    fn build_url(&self, gem: &str) -> String {
        format!("{}/{}.json", RUBYGEMS_API_URL, gem)
    }
}

#[async_trait]
impl RegistryClient for RubyGemsClient {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::RubyGems
    }

    fn registry_name(&self) -> &'static str {
        "rubygems"
    }

    async fn fetch_releases(&self, gem: &str) -> Result<Vec<Release>, RegistryError> {
        let url = self.build_url(gem);
        let response: Vec<GemVersion> = self.client.get_json(&url, gem, self.registry_name()).await?;

        let style = VersionStyle::semver();
        let mut releases = Vec::new();
        for entry in response {
            let version = match Version::parse(&entry.number, &style) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(gem, version = %entry.number, error = %e, "skipping unparseable release");
                    continue;
                }
            };

            let mut release = Release::new(version);
            if let Some(created_at) = &entry.created_at {
                if let Ok(released_at) = created_at.parse::<DateTime<Utc>>() {
                    release = release.with_released_at(released_at);
                }
            }
            if entry.yanked {
                release = release.with_yanked(None);
            }
            if let Some(downloads) = entry.downloads_count {
                release = release.with_downloads(downloads);
            }
            if let Some(ruby_version) = entry.ruby_version {
                release = release.with_language_requirement(ruby_version);
            }
            releases.push(release);
        }

        Ok(releases)
    }
}
