//! Spotify Web API client
//!
//! Secondary catalog implementation. Authenticates with the
//! client-credentials grant on every lookup; tokens are never cached.
//!
//! # API Reference
//! - Token: `POST https://accounts.spotify.com/api/token` (Basic auth)
//! - Search: `GET /v1/search?q=...&type=album&limit=N`
//! - Album: `GET /v1/albums/{id}`

use super::{CatalogError, CatalogResult, SecondaryCatalog};
use crate::http::HttpContext;
use crate::types::SecondaryAlbum;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use mika_common::config::SpotifyCredentials;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Spotify accounts token endpoint
const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Spotify Web API base URL
const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// Spotify Web API client
pub struct SpotifyClient {
    http: Arc<HttpContext>,
    credentials: SpotifyCredentials,
    token_url: String,
    api_url: String,
}

impl SpotifyClient {
    pub fn new(http: Arc<HttpContext>, credentials: SpotifyCredentials) -> Self {
        Self {
            http,
            credentials,
            token_url: SPOTIFY_TOKEN_URL.to_string(),
            api_url: SPOTIFY_API_URL.to_string(),
        }
    }

    /// Point the client at different token/API hosts
    pub fn with_urls(mut self, token_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// `Authorization` header value for the client-credentials grant
    fn basic_auth_header(&self) -> String {
        let raw = format!(
            "{}:{}",
            self.credentials.client_id, self.credentials.client_secret
        );
        format!("Basic {}", general_purpose::STANDARD.encode(raw))
    }

    /// GET a JSON document with bearer authentication
    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> CatalogResult<T> {
        let client = self.http.client().await?;
        let url = format!("{}{}", self.api_url, path);

        debug!(url = %url, params = ?params, "Querying Spotify API");

        let response = client
            .get(&url)
            .bearer_auth(token)
            .query(params)
            .send()
            .await?;

        let status = response.status();

        if status == 401 {
            return Err(CatalogError::Auth("Spotify rejected the bearer token".to_string()));
        }

        if status == 404 {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api(status.as_u16(), error_text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(format!("Failed to parse Spotify response: {}", e)))
    }
}

#[async_trait]
impl SecondaryCatalog for SpotifyClient {
    fn name(&self) -> &'static str {
        "Spotify"
    }

    async fn fetch_token(&self) -> CatalogResult<String> {
        let client = self.http.client().await?;

        let response = client
            .post(&self.token_url)
            .header(reqwest::header::AUTHORIZATION, self.basic_auth_header())
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Auth(format!(
                "Token request failed ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            CatalogError::Parse(format!("Failed to parse Spotify token response: {}", e))
        })?;

        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CatalogError::Auth("Token response carried no access_token".to_string()))
    }

    async fn search_albums(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> CatalogResult<Vec<SecondaryAlbum>> {
        let params = [
            ("q", query.to_string()),
            ("type", "album".to_string()),
            ("limit", limit.to_string()),
        ];
        let response: SearchResponse = self.get_json(token, "/search", &params).await?;
        Ok(response
            .albums
            .map(|page| page.items.into_iter().map(SecondaryAlbum::from).collect())
            .unwrap_or_default())
    }

    async fn album_tracks(&self, token: &str, album_id: &str) -> CatalogResult<Vec<String>> {
        let album: AlbumResponse = self
            .get_json(token, &format!("/albums/{}", album_id), &[])
            .await?;
        Ok(album.track_names())
    }
}

// ============================================================================
// Spotify API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    albums: Option<AlbumPage>,
}

#[derive(Debug, Deserialize)]
struct AlbumPage {
    #[serde(default)]
    items: Vec<AlbumItem>,
}

#[derive(Debug, Deserialize)]
struct AlbumItem {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<Named>,
    #[serde(default)]
    external_urls: ExternalUrls,
    #[serde(default)]
    images: Vec<ImageItem>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    #[serde(default)]
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageItem {
    url: String,
}

#[derive(Debug, Deserialize)]
struct AlbumResponse {
    #[serde(default)]
    tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<Named>,
}

impl AlbumResponse {
    fn track_names(self) -> Vec<String> {
        self.tracks
            .map(|page| page.items)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|t| t.name)
            .filter(|n| !n.trim().is_empty())
            .collect()
    }
}

impl From<AlbumItem> for SecondaryAlbum {
    fn from(item: AlbumItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            artists: item.artists.into_iter().filter_map(|a| a.name).collect(),
            url: item.external_urls.spotify,
            images: item.images.into_iter().map(|i| i.url).collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
