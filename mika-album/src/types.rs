//! Core types shared by the lookup stages
//!
//! All values here are request-scoped: they are created and dropped within a
//! single pipeline invocation.

use serde::{Serialize, Serializer};
use std::fmt;

// ============================================================================
// Search input
// ============================================================================

/// One concrete constraint combination tried against the primary catalog
///
/// An attempt with every field `None` is the unconstrained search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchAttempt {
    pub artist: Option<String>,
    pub style: Option<String>,
    /// Four-digit release year
    pub year: Option<String>,
}

impl SearchAttempt {
    /// Attempt with no constraints at all
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// True if no field constrains the search
    pub fn is_unconstrained(&self) -> bool {
        self.artist.is_none() && self.style.is_none() && self.year.is_none()
    }
}

impl fmt::Display for SearchAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unconstrained() {
            return write!(f, "<unconstrained>");
        }
        let parts: Vec<String> = [
            ("artist", &self.artist),
            ("style", &self.style),
            ("year", &self.year),
        ]
        .iter()
        .filter_map(|(k, v)| v.as_ref().map(|v| format!("{}={}", k, v)))
        .collect();
        write!(f, "{}", parts.join(" "))
    }
}

// ============================================================================
// Primary catalog (Discogs) records
// ============================================================================

/// Master summary as returned by the primary catalog search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogRecord {
    pub id: u64,
    /// Combined title, usually "Artist - Title"
    pub title: String,
    /// Artist field, often absent or disambiguated ("Name (2)")
    pub artist: Option<String>,
    pub year: Option<String>,
    pub genres: Vec<String>,
    pub styles: Vec<String>,
    /// Cover thumbnail URL
    pub cover_image: Option<String>,
}

/// Full master release detail
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterDetail {
    pub id: u64,
    pub title: Option<String>,
    pub artists: Vec<String>,
    pub year: Option<String>,
    pub genres: Vec<String>,
    pub styles: Vec<String>,
    /// Image URIs, primary image first
    pub images: Vec<String>,
    /// Track titles in source order (may be empty)
    pub tracklist: Vec<String>,
    /// Canonical release id for this master
    pub main_release: Option<u64>,
}

/// Release detail (only the tracklist is consumed)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseDetail {
    pub id: u64,
    pub tracklist: Vec<String>,
}

// ============================================================================
// Secondary catalog (Spotify) records
// ============================================================================

/// Album item returned by the secondary catalog search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecondaryAlbum {
    pub id: String,
    pub name: String,
    /// Artist names, primary artist first
    pub artists: Vec<String>,
    /// Public album link
    pub url: Option<String>,
    /// Image URLs, largest first
    pub images: Vec<String>,
}

impl SecondaryAlbum {
    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or("")
    }
}

/// Secondary catalog candidate with its similarity score (0-100)
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub album: SecondaryAlbum,
    pub score: f64,
}

/// Accepted secondary catalog match with its tracklist
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryMatch {
    pub album_id: String,
    pub url: Option<String>,
    pub image_url: Option<String>,
    /// Track names in album order (empty if the detail fetch failed)
    pub tracks: Vec<String>,
    pub score: f64,
}

// ============================================================================
// Output
// ============================================================================

/// Text shown in place of a tracklist when no source had one
pub const NO_TRACKLIST: &str = "No tracklist available.";

/// Numbered track (1-based)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackEntry {
    pub index: usize,
    pub name: String,
}

impl fmt::Display for TrackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.index, self.name)
    }
}

/// Resolved tracklist, or the explicit "unavailable" sentinel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tracklist {
    Tracks(Vec<TrackEntry>),
    Unavailable,
}

impl Tracklist {
    pub fn tracks(&self) -> &[TrackEntry] {
        match self {
            Tracklist::Tracks(tracks) => tracks,
            Tracklist::Unavailable => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Tracklist::Tracks(_))
    }
}

impl fmt::Display for Tracklist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tracklist::Tracks(tracks) => {
                let lines: Vec<String> = tracks.iter().map(ToString::to_string).collect();
                write!(f, "{}", lines.join("\n"))
            }
            Tracklist::Unavailable => write!(f, "{}", NO_TRACKLIST),
        }
    }
}

impl Serialize for Tracklist {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tracklist::Tracks(tracks) => tracks.serialize(serializer),
            Tracklist::Unavailable => serializer.serialize_str(NO_TRACKLIST),
        }
    }
}

/// Final album record handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumRecord {
    pub title: String,
    pub artist: String,
    pub year: String,
    /// Comma-joined genre list
    pub genres: String,
    /// Comma-joined style list
    pub styles: String,
    pub tracklist: Tracklist,
    pub cover_url: Option<String>,
    pub link_url: String,
}
