//! Secondary catalog matcher
//!
//! Looks the chosen album up in the streaming catalog with progressively
//! relaxed queries and accepts the first query whose best candidate clears
//! the match threshold. A missing match is an ordinary outcome; the caller
//! then relies on the primary catalog alone.

use crate::clients::SecondaryCatalog;
use crate::normalize::{clean_artist, clean_title};
use crate::similarity::token_set_ratio;
use crate::types::{MatchCandidate, SecondaryAlbum, SecondaryMatch};
use tracing::{debug, info, warn};

/// Candidates requested per query
pub const SECONDARY_CANDIDATES: u32 = 10;

/// Minimum combined score (0-100) for a candidate to be accepted
pub const MATCH_THRESHOLD: f64 = 80.0;

/// Relaxed query list, strictest first, duplicates removed
pub fn build_queries(title: &str, artist: &str) -> Vec<String> {
    let cleaned_title = clean_title(title);
    let cleaned_artist = clean_artist(artist);

    let candidates = [
        format!("album:{} artist:{}", title, artist),
        format!("album:{} artist:{}", title, cleaned_artist),
        format!("album:{} artist:{}", cleaned_title, cleaned_artist),
        format!("album:{}", title),
        format!("album:{}", cleaned_title),
    ];

    let mut queries: Vec<String> = Vec::with_capacity(candidates.len());
    for query in candidates {
        if !queries.contains(&query) {
            queries.push(query);
        }
    }
    queries
}

/// Score a candidate against the target title and artist
///
/// Mean of the title and primary-artist token-set ratios, both compared in
/// their cleaned forms.
pub fn score_candidate(album: &SecondaryAlbum, title: &str, artist: &str) -> f64 {
    let title_score = token_set_ratio(&clean_title(&album.name), &clean_title(title));
    let artist_score = token_set_ratio(&clean_artist(album.primary_artist()), &clean_artist(artist));
    (title_score + artist_score) / 2.0
}

/// Highest-scoring candidate (the earliest one on ties)
pub fn best_candidate(albums: Vec<SecondaryAlbum>, title: &str, artist: &str) -> Option<MatchCandidate> {
    let mut best: Option<MatchCandidate> = None;
    for album in albums {
        let score = score_candidate(&album, title, artist);
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(MatchCandidate { album, score });
        }
    }
    best
}

/// Find and accept a match using an already issued token
///
/// A failed search call ends the lookup with no match. A failed track
/// fetch still returns the accepted link and image, with no tracks.
pub async fn find_secondary_match(
    catalog: &dyn SecondaryCatalog,
    token: &str,
    title: &str,
    artist: &str,
) -> Option<SecondaryMatch> {
    for query in build_queries(title, artist) {
        let albums = match catalog.search_albums(token, &query, SECONDARY_CANDIDATES).await {
            Ok(albums) => albums,
            Err(e) => {
                warn!(query = %query, catalog = catalog.name(), error = %e, "Secondary search failed, skipping enrichment");
                return None;
            }
        };

        let Some(best) = best_candidate(albums, title, artist) else {
            debug!(query = %query, "No secondary candidates");
            continue;
        };

        if best.score < MATCH_THRESHOLD {
            debug!(query = %query, best = %best.album.name, score = best.score, "Best candidate below threshold");
            continue;
        }

        info!(
            query = %query,
            album = %best.album.name,
            score = best.score,
            "Secondary catalog match accepted"
        );

        let tracks = match catalog.album_tracks(token, &best.album.id).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(album_id = %best.album.id, error = %e, "Failed to fetch secondary tracklist");
                Vec::new()
            }
        };

        return Some(SecondaryMatch {
            album_id: best.album.id,
            url: best.album.url,
            image_url: best.album.images.into_iter().next(),
            tracks,
            score: best.score,
        });
    }

    debug!(title = %title, artist = %artist, "No secondary query reached the threshold");
    None
}

/// Enrich from the secondary catalog with a freshly fetched token
///
/// Never fails; every problem downgrades to `None`.
pub async fn enrich(catalog: &dyn SecondaryCatalog, title: &str, artist: &str) -> Option<SecondaryMatch> {
    let token = match catalog.fetch_token().await {
        Ok(token) => token,
        Err(e) => {
            warn!(catalog = catalog.name(), error = %e, "Token fetch failed, skipping enrichment");
            return None;
        }
    };

    find_secondary_match(catalog, &token, title, artist).await
}
