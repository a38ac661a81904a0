//! Album record assembly
//!
//! Pure merge over data that has already been fetched. No I/O.

use crate::normalize::{has_disambiguation, strip_disambiguation};
use crate::types::{AlbumRecord, CatalogRecord, MasterDetail, SecondaryMatch, Tracklist};
use once_cell::sync::Lazy;
use regex::Regex;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_YEAR: &str = "Unknown Year";

/// "Artist - Title", "Artist – Title" or "Artist: Title"
static COMBINED_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)[–:-]\s+(.+)$").expect("valid combined title pattern"));

/// Title and artist as they should be displayed and matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub title: String,
    pub artist: String,
}

/// Derive title and artist from a search summary
///
/// The combined title is split only when the record's own artist field
/// looks unreliable: empty, disambiguated, or already contained in the
/// artist half of the combined title.
pub fn reconcile_identity(record: &CatalogRecord) -> Identity {
    let title = record.title.trim();
    let artist = record.artist.as_deref().unwrap_or("").trim();

    let mut identity = Identity {
        title: if title.is_empty() { UNKNOWN_TITLE } else { title }.to_string(),
        artist: artist.to_string(),
    };

    if let Some(captures) = COMBINED_TITLE.captures(title) {
        let possible_artist = captures[1].trim();
        let possible_title = captures[2].trim();
        let unreliable = artist.is_empty()
            || has_disambiguation(artist)
            || possible_artist.to_lowercase().contains(&artist.to_lowercase());
        if unreliable {
            identity.artist = possible_artist.to_string();
            identity.title = possible_title.to_string();
        }
    }

    identity
}

/// Everything the assembler merges
pub struct AssemblyInput<'a> {
    pub record: &'a CatalogRecord,
    pub identity: Identity,
    /// Year constraint from the filter
    pub filter_year: Option<&'a str>,
    pub master: Option<&'a MasterDetail>,
    pub secondary: Option<&'a SecondaryMatch>,
    pub tracklist: Tracklist,
    /// Primary catalog page for the master
    pub master_page_url: String,
}

/// Merge all sources into the final record
///
/// Master detail fields win over the search summary. The secondary match
/// wins for link and cover.
pub fn assemble(input: AssemblyInput<'_>) -> AlbumRecord {
    let AssemblyInput {
        record,
        identity,
        filter_year,
        master,
        secondary,
        tracklist,
        master_page_url,
    } = input;

    let title = master
        .and_then(|m| m.title.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or(identity.title);

    let artist = master
        .map(|m| m.artists.join(", "))
        .filter(|a| !a.trim().is_empty())
        .unwrap_or(identity.artist);
    let artist = strip_disambiguation(&artist);
    let artist = if artist.is_empty() {
        UNKNOWN_ARTIST.to_string()
    } else {
        artist
    };

    let year = master
        .and_then(|m| m.year.clone())
        .or_else(|| record.year.clone())
        .or_else(|| filter_year.map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_YEAR.to_string());

    let genres = master.map_or(&record.genres, |m| &m.genres).join(", ");
    let styles = master.map_or(&record.styles, |m| &m.styles).join(", ");

    // Cover and link come from the secondary match only as a pair
    let linked = secondary.filter(|s| s.url.is_some());

    let cover_url = linked
        .and_then(|s| s.image_url.clone())
        .or_else(|| master.and_then(|m| m.images.first().cloned()))
        .or_else(|| record.cover_image.clone());

    let link_url = linked
        .and_then(|s| s.url.clone())
        .unwrap_or(master_page_url);

    AlbumRecord {
        title,
        artist,
        year,
        genres,
        styles,
        tracklist,
        cover_url,
        link_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackEntry;

    fn record(title: &str, artist: Option<&str>) -> CatalogRecord {
        CatalogRecord {
            id: 42,
            title: title.to_string(),
            artist: artist.map(str::to_string),
            year: Some("2015".to_string()),
            genres: vec!["Hip Hop".to_string()],
            styles: vec!["Trap".to_string(), "Cloud Rap".to_string()],
            cover_image: Some("https://img.discogs.com/thumb.jpg".to_string()),
        }
    }

    fn input<'a>(record: &'a CatalogRecord) -> AssemblyInput<'a> {
        AssemblyInput {
            record,
            identity: reconcile_identity(record),
            filter_year: None,
            master: None,
            secondary: None,
            tracklist: Tracklist::Unavailable,
            master_page_url: "https://www.discogs.com/master/42".to_string(),
        }
    }

    #[test]
    fn test_split_when_artist_missing() {
        let identity = reconcile_identity(&record("Young Thug - Barter 6", None));
        assert_eq!(identity.artist, "Young Thug");
        assert_eq!(identity.title, "Barter 6");
    }

    #[test]
    fn test_split_when_artist_disambiguated() {
        let identity = reconcile_identity(&record("Future – DS2", Some("Future (4)")));
        assert_eq!(identity.artist, "Future");
        assert_eq!(identity.title, "DS2");
    }

    #[test]
    fn test_split_when_artist_contained() {
        let identity = reconcile_identity(&record("Metro Boomin: Not All Heroes Wear Capes", Some("metro")));
        assert_eq!(identity.artist, "Metro Boomin");
        assert_eq!(identity.title, "Not All Heroes Wear Capes");
    }

    #[test]
    fn test_reliable_artist_keeps_title() {
        let identity = reconcile_identity(&record("Jay-Z - Blueprint", Some("Shawn Carter")));
        assert_eq!(identity.title, "Jay-Z - Blueprint");
        assert_eq!(identity.artist, "Shawn Carter");
    }

    #[test]
    fn test_no_separator_keeps_title() {
        let identity = reconcile_identity(&record("Nevermind", None));
        assert_eq!(identity.title, "Nevermind");
        assert_eq!(identity.artist, "");
    }

    #[test]
    fn test_empty_title_falls_back() {
        let identity = reconcile_identity(&record("  ", None));
        assert_eq!(identity.title, UNKNOWN_TITLE);
    }

    #[test]
    fn test_primary_only_record() {
        let record = record("Young Thug (2) - Barter 6", None);
        let album = assemble(input(&record));

        assert_eq!(album.title, "Barter 6");
        assert_eq!(album.artist, "Young Thug");
        assert_eq!(album.year, "2015");
        assert_eq!(album.genres, "Hip Hop");
        assert_eq!(album.styles, "Trap, Cloud Rap");
        assert_eq!(album.cover_url.as_deref(), Some("https://img.discogs.com/thumb.jpg"));
        assert_eq!(album.link_url, "https://www.discogs.com/master/42");
        assert_eq!(album.tracklist, Tracklist::Unavailable);
    }

    #[test]
    fn test_master_detail_overrides_summary() {
        let record = record("Young Thug - Barter 6", None);
        let master = MasterDetail {
            id: 42,
            title: Some("Barter 6".to_string()),
            artists: vec!["Young Thug (2)".to_string()],
            year: Some("2016".to_string()),
            genres: vec!["Hip Hop".to_string(), "Funk / Soul".to_string()],
            styles: vec![],
            images: vec!["https://img.discogs.com/full.jpg".to_string()],
            ..Default::default()
        };

        let album = assemble(AssemblyInput {
            master: Some(&master),
            ..input(&record)
        });

        assert_eq!(album.artist, "Young Thug");
        assert_eq!(album.year, "2016");
        assert_eq!(album.genres, "Hip Hop, Funk / Soul");
        assert_eq!(album.styles, "");
        assert_eq!(album.cover_url.as_deref(), Some("https://img.discogs.com/full.jpg"));
    }

    #[test]
    fn test_secondary_wins_link_and_cover() {
        let record = record("Young Thug - Barter 6", None);
        let secondary = SecondaryMatch {
            album_id: "abc".to_string(),
            url: Some("https://open.spotify.com/album/abc".to_string()),
            image_url: Some("https://i.scdn.co/abc.jpg".to_string()),
            tracks: vec!["Constantly Hating".to_string()],
            score: 100.0,
        };
        let tracklist = Tracklist::Tracks(vec![TrackEntry {
            index: 1,
            name: "Constantly Hating".to_string(),
        }]);

        let album = assemble(AssemblyInput {
            secondary: Some(&secondary),
            tracklist: tracklist.clone(),
            ..input(&record)
        });

        assert_eq!(album.link_url, "https://open.spotify.com/album/abc");
        assert_eq!(album.cover_url.as_deref(), Some("https://i.scdn.co/abc.jpg"));
        assert_eq!(album.tracklist, tracklist);
    }

    #[test]
    fn test_secondary_without_link_keeps_primary_cover() {
        let record = record("Young Thug - Barter 6", None);
        let secondary = SecondaryMatch {
            album_id: "abc".to_string(),
            url: None,
            image_url: Some("https://i.scdn.co/abc.jpg".to_string()),
            tracks: vec![],
            score: 90.0,
        };

        let album = assemble(AssemblyInput {
            secondary: Some(&secondary),
            ..input(&record)
        });

        assert_eq!(album.link_url, "https://www.discogs.com/master/42");
        assert_eq!(album.cover_url.as_deref(), Some("https://img.discogs.com/thumb.jpg"));
    }

    #[test]
    fn test_year_and_artist_fallbacks() {
        let mut bare = record("Nevermind", None);
        bare.year = None;

        let album = assemble(input(&bare));
        assert_eq!(album.artist, UNKNOWN_ARTIST);
        assert_eq!(album.year, UNKNOWN_YEAR);

        let album = assemble(AssemblyInput {
            filter_year: Some("1991"),
            ..input(&bare)
        });
        assert_eq!(album.year, "1991");
    }
}
