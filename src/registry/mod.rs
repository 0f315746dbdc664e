//! Registry adapters for fetching release catalogs
//!
//! This module provides:
//! - HTTP client shared foundation with bounded retry logic
//! - npm registry adapter
//! - crates.io API adapter
//! - RubyGems API adapter
//!
//! Adapters return plain `Release` lists; catalog ordering and
//! deduplication happen in `ReleaseCatalog::new`. A release whose version
//! string does not parse is dropped with a warning rather than failing the
//! whole fetch.

mod client;
mod crates_io;
mod npm;
mod rubygems;

pub use client::HttpClient;
pub use crates_io::CratesIoClient;
pub use npm::NpmClient;
pub use rubygems::RubyGemsClient;

use crate::domain::{Ecosystem, Release};
use crate::error::RegistryError;
use async_trait::async_trait;

/// Trait for registry adapters
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// The ecosystem this client serves
    fn ecosystem(&self) -> Ecosystem;

    /// Human-readable registry name for error messages
    fn registry_name(&self) -> &'static str;

    /// Fetch every known release of a package
    async fn fetch_releases(&self, package: &str) -> Result<Vec<Release>, RegistryError>;

    /// Fetch per-release metadata (publication timestamp and the like) when
    /// the listing endpoint does not include it. The default assumes the
    /// listing was already complete.
    async fn fetch_release_metadata(
        &self,
        _package: &str,
        release: &Release,
    ) -> Result<Release, RegistryError> {
        Ok(release.clone())
    }
}

/// Create a registry client for the given ecosystem, if one is built in
pub fn create_client(ecosystem: Ecosystem, client: HttpClient) -> Option<Box<dyn RegistryClient>> {
    match ecosystem {
        Ecosystem::Npm => Some(Box::new(NpmClient::new(client))),
        Ecosystem::Cargo => Some(Box::new(CratesIoClient::new(client))),
        Ecosystem::RubyGems => Some(Box::new(RubyGemsClient::new(client))),
        _ => None,
    }
}
