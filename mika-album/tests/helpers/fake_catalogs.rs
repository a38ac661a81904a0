//! In-memory catalogs
//!
//! Both fakes answer from tables filled by the test and record every call,
//! so tests can assert which requests a stage made (and which it skipped).

use async_trait::async_trait;
use mika_album::clients::{CatalogError, CatalogResult, PrimaryCatalog, SecondaryCatalog};
use mika_album::types::{CatalogRecord, MasterDetail, ReleaseDetail, SearchAttempt, SecondaryAlbum};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub fn attempt(artist: Option<&str>, style: Option<&str>, year: Option<&str>) -> SearchAttempt {
    SearchAttempt {
        artist: artist.map(str::to_string),
        style: style.map(str::to_string),
        year: year.map(str::to_string),
    }
}

pub fn record(id: u64, title: &str) -> CatalogRecord {
    CatalogRecord {
        id,
        title: title.to_string(),
        artist: None,
        year: Some("2015".to_string()),
        genres: vec!["Hip Hop".to_string()],
        styles: vec!["Trap".to_string()],
        cover_image: Some(format!("https://img.discogs.com/{}-thumb.jpg", id)),
    }
}

pub fn album(id: &str, name: &str, artist: &str) -> SecondaryAlbum {
    SecondaryAlbum {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec![artist.to_string()],
        url: Some(format!("https://open.spotify.com/album/{}", id)),
        images: vec![format!("https://i.scdn.co/{}.jpg", id)],
    }
}

fn network_error() -> CatalogError {
    CatalogError::Network("connection refused".to_string())
}

// ============================================================================
// Primary catalog
// ============================================================================

#[derive(Default)]
pub struct FakePrimary {
    searches: HashMap<SearchAttempt, Vec<CatalogRecord>>,
    failing_searches: HashSet<SearchAttempt>,
    artists: HashMap<String, Vec<String>>,
    artist_search_fails: bool,
    masters: HashMap<u64, MasterDetail>,
    releases: HashMap<u64, ReleaseDetail>,
    calls: Mutex<Vec<String>>,
}

impl FakePrimary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, attempt: SearchAttempt, results: Vec<CatalogRecord>) -> Self {
        self.searches.insert(attempt, results);
        self
    }

    pub fn with_failing_search(mut self, attempt: SearchAttempt) -> Self {
        self.failing_searches.insert(attempt);
        self
    }

    pub fn with_artists(mut self, query: &str, names: &[&str]) -> Self {
        self.artists
            .insert(query.to_string(), names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn with_failing_artist_search(mut self) -> Self {
        self.artist_search_fails = true;
        self
    }

    pub fn with_master(mut self, master: MasterDetail) -> Self {
        self.masters.insert(master.id, master);
        self
    }

    pub fn with_release(mut self, id: u64, tracks: &[&str]) -> Self {
        self.releases.insert(
            id,
            ReleaseDetail {
                id,
                tracklist: tracks.iter().map(|t| t.to_string()).collect(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls whose description starts with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record_call(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PrimaryCatalog for FakePrimary {
    fn name(&self) -> &'static str {
        "FakePrimary"
    }

    async fn search_masters(
        &self,
        attempt: &SearchAttempt,
        _per_page: u32,
    ) -> CatalogResult<Vec<CatalogRecord>> {
        self.record_call(format!("search_masters {}", attempt));
        if self.failing_searches.contains(attempt) {
            return Err(network_error());
        }
        Ok(self.searches.get(attempt).cloned().unwrap_or_default())
    }

    async fn search_artists(&self, query: &str, limit: u32) -> CatalogResult<Vec<String>> {
        self.record_call(format!("search_artists {}", query));
        if self.artist_search_fails {
            return Err(network_error());
        }
        let mut names = self.artists.get(query).cloned().unwrap_or_default();
        names.truncate(limit as usize);
        Ok(names)
    }

    async fn master(&self, master_id: u64) -> CatalogResult<MasterDetail> {
        self.record_call(format!("master {}", master_id));
        self.masters
            .get(&master_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("/masters/{}", master_id)))
    }

    async fn release(&self, release_id: u64) -> CatalogResult<ReleaseDetail> {
        self.record_call(format!("release {}", release_id));
        self.releases
            .get(&release_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("/releases/{}", release_id)))
    }

    fn master_page_url(&self, master_id: u64) -> String {
        format!("https://www.discogs.com/master/{}", master_id)
    }
}

// ============================================================================
// Secondary catalog
// ============================================================================

pub struct FakeSecondary {
    reachable: bool,
    searches: HashMap<String, Vec<SecondaryAlbum>>,
    failing_queries: HashSet<String>,
    tracks: HashMap<String, Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl Default for FakeSecondary {
    fn default() -> Self {
        Self {
            reachable: true,
            searches: HashMap::new(),
            failing_queries: HashSet::new(),
            tracks: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeSecondary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with a network error
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, query: &str, albums: Vec<SecondaryAlbum>) -> Self {
        self.searches.insert(query.to_string(), albums);
        self
    }

    pub fn with_failing_query(mut self, query: &str) -> Self {
        self.failing_queries.insert(query.to_string());
        self
    }

    pub fn with_tracks(mut self, album_id: &str, tracks: &[&str]) -> Self {
        self.tracks
            .insert(album_id.to_string(), tracks.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record_call(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SecondaryCatalog for FakeSecondary {
    fn name(&self) -> &'static str {
        "FakeSecondary"
    }

    async fn fetch_token(&self) -> CatalogResult<String> {
        self.record_call("fetch_token".to_string());
        if !self.reachable {
            return Err(network_error());
        }
        Ok("test-token".to_string())
    }

    async fn search_albums(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> CatalogResult<Vec<SecondaryAlbum>> {
        self.record_call(format!("search_albums {}", query));
        assert_eq!(token, "test-token");
        if !self.reachable || self.failing_queries.contains(query) {
            return Err(network_error());
        }
        let mut albums = self.searches.get(query).cloned().unwrap_or_default();
        albums.truncate(limit as usize);
        Ok(albums)
    }

    async fn album_tracks(&self, _token: &str, album_id: &str) -> CatalogResult<Vec<String>> {
        self.record_call(format!("album_tracks {}", album_id));
        if !self.reachable {
            return Err(network_error());
        }
        self.tracks
            .get(album_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("/albums/{}", album_id)))
    }
}
