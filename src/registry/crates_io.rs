//! crates.io API adapter
//!
//! Fetches crate release information from crates.io.
//! API endpoint: https://crates.io/api/v1/crates/{crate}
//!
//! Note: crates.io requires a User-Agent header (handled by HttpClient)
//! and has rate limiting (1 request/second).

use crate::domain::{Ecosystem, Release, Version, VersionStyle};
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryClient};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::{Duration, Instant};

/// crates.io API base URL
const CRATES_IO_API_URL: &str = "https://crates.io/api/v1/crates";

/// Rate limit: 1 request per second
const RATE_LIMIT_INTERVAL: Duration = Duration::from_secs(1);

/// crates.io adapter with rate limiting
pub struct CratesIoClient {
    client: HttpClient,
    rate_limiter: Arc<Semaphore>,
    last_request: std::sync::Mutex<Option<Instant>>,
}

/// crates.io crate response
#[derive(Debug, Deserialize)]
struct CratesIoResponse {
    versions: Vec<CrateVersion>,
}

/// Crate version information
#[derive(Debug, Deserialize)]
struct CrateVersion {
    /// Version number
    num: String,
    /// Created at timestamp
    created_at: String,
    /// Whether this version is yanked
    yanked: bool,
    /// Download count for this version
    downloads: Option<u64>,
}

impl CratesIoClient {
    /// Create a new crates.io adapter
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            rate_limiter: Arc::new(Semaphore::new(1)),
            last_request: std::sync::Mutex::new(None),
        }
    }

    /// Build the URL for a crate
    fn build_url(&self, crate_name: &str) -> String {
        format!("{}/{}", CRATES_IO_API_URL, crate_name)
    }

    /// Apply rate limiting before making a request
    async fn apply_rate_limit(&self) {
        let _permit = self.rate_limiter.acquire().await.unwrap();

        let elapsed = {
            let last_request = self.last_request.lock().unwrap();
            last_request.map(|t| t.elapsed())
        };

        if let Some(elapsed) = elapsed {
            if elapsed < RATE_LIMIT_INTERVAL {
                tokio::time::sleep(RATE_LIMIT_INTERVAL - elapsed).await;
            }
        }

        *self.last_request.lock().unwrap() = Some(Instant::now());
    }
}

#[async_trait]
impl RegistryClient for CratesIoClient {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cargo
    }

    fn registry_name(&self) -> &'static str {
        "crates.io"
    }

    async fn fetch_releases(&self, crate_name: &str) -> Result<Vec<Release>, RegistryError> {
        self.apply_rate_limit().await;

        let url = self.build_url(crate_name);
        let response: CratesIoResponse = self
            .client
            .get_json(&url, crate_name, self.registry_name())
            .await?;

        let style = VersionStyle::semver();
        let mut releases = Vec::new();
        for entry in response.versions {
            let version = match Version::parse(&entry.num, &style) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(crate_name, version = %entry.num, error = %e, "skipping unparseable release");
                    continue;
                }
            };

            let mut release = Release::new(version);
            if let Ok(released_at) = entry.created_at.parse::<DateTime<Utc>>() {
                release = release.with_released_at(released_at);
            }
            if entry.yanked {
                release = release.with_yanked(None);
            }
            if let Some(downloads) = entry.downloads {
                release = release.with_downloads(downloads);
            }
            releases.push(release);
        }

        Ok(releases)
    }
}
