//! Title and artist cleanup
//!
//! Discogs disambiguates identically named artists with a trailing numeral
//! ("Future (4)"), and both catalogs decorate titles with edition
//! qualifiers ("(Deluxe)", "[Remastered]"). These helpers strip that noise
//! before display or fuzzy comparison.

use once_cell::sync::Lazy;
use regex::Regex;

static DISAMBIGUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(\d+\)").expect("valid disambiguation pattern"));
static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^)]+\)").expect("valid parenthetical pattern"));
static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\[[^\]]+\]").expect("valid bracketed pattern"));
static FEATURING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)feat\.|,").expect("valid featuring pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// True if the name carries a disambiguation numeral such as "(2)"
pub fn has_disambiguation(name: &str) -> bool {
    DISAMBIGUATION.is_match(name)
}

/// Remove disambiguation numerals for display: "Future (4)" -> "Future"
pub fn strip_disambiguation(name: &str) -> String {
    DISAMBIGUATION.replace_all(name, "").trim().to_string()
}

/// Comparison form of an album title
///
/// Drops parenthetical and bracketed qualifiers, collapses whitespace and
/// lowercases.
pub fn clean_title(title: &str) -> String {
    let title = PARENTHETICAL.replace_all(title, "");
    let title = BRACKETED.replace_all(&title, "");
    collapse_whitespace(&title).to_lowercase()
}

/// Comparison form of an artist name
///
/// Drops disambiguation numerals and keeps only the part before the first
/// "feat." marker or comma, lowercased.
pub fn clean_artist(artist: &str) -> String {
    let artist = DISAMBIGUATION.replace_all(artist, "");
    let head = FEATURING.split(&artist).next().unwrap_or("");
    collapse_whitespace(head).to_lowercase()
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
