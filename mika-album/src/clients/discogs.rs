//! Discogs API client
//!
//! Primary catalog implementation over the Discogs REST API.
//!
//! # API Reference
//! - Search: `GET /database/search?type=master|artist&...`
//! - Master: `GET /masters/{id}`
//! - Release: `GET /releases/{id}`
//! - Authentication: personal access token passed as `token` query parameter

use super::{CatalogError, CatalogResult, PrimaryCatalog};
use crate::http::HttpContext;
use crate::types::{CatalogRecord, MasterDetail, ReleaseDetail, SearchAttempt};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::debug;

/// Discogs API base URL
const DISCOGS_API_URL: &str = "https://api.discogs.com";

/// Discogs public site base URL
const DISCOGS_WEB_URL: &str = "https://www.discogs.com";

/// Discogs API client
pub struct DiscogsClient {
    http: Arc<HttpContext>,
    token: String,
    base_url: String,
}

impl DiscogsClient {
    pub fn new(http: Arc<HttpContext>, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
            base_url: DISCOGS_API_URL.to_string(),
        }
    }

    /// Point the client at a different API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// GET a JSON document with token authentication
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> CatalogResult<T> {
        let client = self.http.client().await?;
        let url = format!("{}{}", self.base_url, path);

        debug!(url = %url, params = ?params, "Querying Discogs API");

        let response = client
            .get(&url)
            .query(params)
            .query(&[("token", self.token.as_str())])
            .send()
            .await?;

        let status = response.status();

        if status == 404 {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        if status == 401 || status == 403 {
            return Err(CatalogError::Auth(format!(
                "Discogs rejected the token ({})",
                status.as_u16()
            )));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api(status.as_u16(), error_text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(format!("Failed to parse Discogs response: {}", e)))
    }
}

/// Build query parameters for a master search
fn master_search_params(attempt: &SearchAttempt, per_page: u32) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("type", "master".to_string()),
        ("per_page", per_page.to_string()),
    ];
    if let Some(artist) = &attempt.artist {
        params.push(("artist", artist.clone()));
    }
    if let Some(style) = &attempt.style {
        params.push(("style", style.clone()));
    }
    if let Some(year) = &attempt.year {
        params.push(("year", year.clone()));
    }
    params
}

#[async_trait]
impl PrimaryCatalog for DiscogsClient {
    fn name(&self) -> &'static str {
        "Discogs"
    }

    async fn search_masters(
        &self,
        attempt: &SearchAttempt,
        per_page: u32,
    ) -> CatalogResult<Vec<CatalogRecord>> {
        let params = master_search_params(attempt, per_page);
        let response: SearchResponse<MasterHit> =
            self.get_json("/database/search", &params).await?;
        Ok(response.results.into_iter().map(CatalogRecord::from).collect())
    }

    async fn search_artists(&self, query: &str, limit: u32) -> CatalogResult<Vec<String>> {
        let params = [
            ("type", "artist".to_string()),
            ("q", query.to_string()),
            ("per_page", limit.to_string()),
        ];
        let response: SearchResponse<ArtistHit> =
            self.get_json("/database/search", &params).await?;
        Ok(response.results.into_iter().map(|hit| hit.title).collect())
    }

    async fn master(&self, master_id: u64) -> CatalogResult<MasterDetail> {
        let master: MasterResponse = self.get_json(&format!("/masters/{}", master_id), &[]).await?;
        Ok(master.into())
    }

    async fn release(&self, release_id: u64) -> CatalogResult<ReleaseDetail> {
        let release: ReleaseResponse =
            self.get_json(&format!("/releases/{}", release_id), &[]).await?;
        Ok(release.into())
    }

    fn master_page_url(&self, master_id: u64) -> String {
        format!("{}/master/{}", DISCOGS_WEB_URL, master_id)
    }
}

// ============================================================================
// Discogs API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct MasterHit {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default, deserialize_with = "lenient_year")]
    year: Option<String>,
    #[serde(default)]
    genre: Vec<String>,
    #[serde(default)]
    style: Vec<String>,
    #[serde(default)]
    cover_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtistHit {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct MasterResponse {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artists: Vec<ArtistCredit>,
    #[serde(default, deserialize_with = "lenient_year")]
    year: Option<String>,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    styles: Vec<String>,
    #[serde(default)]
    images: Vec<Image>,
    #[serde(default)]
    tracklist: Vec<Track>,
    #[serde(default)]
    main_release: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    id: u64,
    #[serde(default)]
    tracklist: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct ArtistCredit {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Image {
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Track {
    #[serde(default)]
    title: String,
}

/// Discogs reports years as numbers on detail endpoints, strings in search
/// results, and 0 or "" when unknown.
fn lenient_year<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<Year>::deserialize(deserializer)? {
        Some(Year::Number(n)) if n > 0 => Some(n.to_string()),
        Some(Year::Text(s)) if !s.trim().is_empty() && s.trim() != "0" => {
            Some(s.trim().to_string())
        }
        _ => None,
    })
}

fn non_empty(values: Vec<String>) -> Vec<String> {
    values.into_iter().filter(|v| !v.trim().is_empty()).collect()
}

impl From<MasterHit> for CatalogRecord {
    fn from(hit: MasterHit) -> Self {
        Self {
            id: hit.id,
            title: hit.title,
            artist: hit.artist.filter(|a| !a.trim().is_empty()),
            year: hit.year,
            genres: hit.genre,
            styles: hit.style,
            cover_image: hit.cover_image.filter(|u| !u.is_empty()),
        }
    }
}

impl From<MasterResponse> for MasterDetail {
    fn from(master: MasterResponse) -> Self {
        Self {
            id: master.id,
            title: master.title.filter(|t| !t.trim().is_empty()),
            artists: non_empty(master.artists.into_iter().map(|a| a.name).collect()),
            year: master.year,
            genres: master.genres,
            styles: master.styles,
            images: master.images.into_iter().filter_map(|i| i.uri).filter(|u| !u.is_empty()).collect(),
            tracklist: non_empty(master.tracklist.into_iter().map(|t| t.title).collect()),
            main_release: master.main_release,
        }
    }
}

impl From<ReleaseResponse> for ReleaseDetail {
    fn from(release: ReleaseResponse) -> Self {
        Self {
            id: release.id,
            tracklist: non_empty(release.tracklist.into_iter().map(|t| t.title).collect()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
