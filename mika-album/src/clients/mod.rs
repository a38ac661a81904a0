//! External catalog clients
//!
//! The pipeline talks to both catalogs through the traits below so that
//! stages can be exercised against in-memory catalogs.
//!
//! - `PrimaryCatalog`: authoritative discography database (Discogs)
//! - `SecondaryCatalog`: streaming catalog consulted for enrichment (Spotify)

pub mod discogs;
pub mod spotify;

pub use discogs::DiscogsClient;
pub use spotify::SpotifyClient;

use crate::types::{
    CatalogRecord, MasterDetail, ReleaseDetail, SearchAttempt, SecondaryAlbum,
};
use async_trait::async_trait;
use thiserror::Error;

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Parse(err.to_string())
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Primary catalog: master search, artist search, master and release detail
#[async_trait]
pub trait PrimaryCatalog: Send + Sync {
    /// Catalog name for logging
    fn name(&self) -> &'static str;

    /// Search master releases constrained by the attempt's fields
    async fn search_masters(
        &self,
        attempt: &SearchAttempt,
        per_page: u32,
    ) -> CatalogResult<Vec<CatalogRecord>>;

    /// Search artist names, best-ranked first
    async fn search_artists(&self, query: &str, limit: u32) -> CatalogResult<Vec<String>>;

    /// Fetch master detail by id
    async fn master(&self, master_id: u64) -> CatalogResult<MasterDetail>;

    /// Fetch release detail by id
    async fn release(&self, release_id: u64) -> CatalogResult<ReleaseDetail>;

    /// Public web page for a master
    fn master_page_url(&self, master_id: u64) -> String;
}

/// Secondary catalog: bearer-token album search and album tracks
#[async_trait]
pub trait SecondaryCatalog: Send + Sync {
    /// Catalog name for logging
    fn name(&self) -> &'static str;

    /// Obtain a fresh bearer token (never cached)
    async fn fetch_token(&self) -> CatalogResult<String>;

    /// Search albums with a free-form query
    async fn search_albums(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> CatalogResult<Vec<SecondaryAlbum>>;

    /// Track names of an album in order
    async fn album_tracks(&self, token: &str, album_id: &str) -> CatalogResult<Vec<String>>;
}
