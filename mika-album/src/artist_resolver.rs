//! Artist name resolution against the primary catalog
//!
//! Discogs disambiguates identically named artists ("Young Thug (2)"), so a
//! raw user-supplied name rarely matches its artist constraint verbatim.
//! Resolution is best-effort and never fails: on any error or an empty
//! result the raw input is used unchanged.

use crate::clients::PrimaryCatalog;
use crate::similarity::ratio;
use tracing::{debug, warn};

/// Artist candidates requested per resolution
pub const ARTIST_CANDIDATES: u32 = 5;

/// Minimum similarity (0-100) for a candidate to win on score
pub const ARTIST_MATCH_THRESHOLD: f64 = 75.0;

/// Choose a candidate for `raw`
///
/// The best-scoring candidate wins if it reaches the threshold (ties go to
/// the earlier candidate); otherwise the catalog's first result is used.
/// Returns the chosen name and its score, or `None` for no candidates.
pub fn pick_artist_candidate(raw: &str, candidates: &[String]) -> Option<(String, f64)> {
    let mut best: Option<(&String, f64)> = None;
    for candidate in candidates {
        let score = ratio(raw, candidate);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }

    match best {
        Some((name, score)) if score >= ARTIST_MATCH_THRESHOLD => Some((name.clone(), score)),
        Some(_) => {
            let first = &candidates[0];
            Some((first.clone(), ratio(raw, first)))
        }
        None => None,
    }
}

/// Resolve a raw artist name to the catalog's own spelling
pub async fn resolve_artist_name(catalog: &dyn PrimaryCatalog, raw: &str) -> String {
    let candidates = match catalog.search_artists(raw, ARTIST_CANDIDATES).await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(artist = %raw, catalog = catalog.name(), error = %e, "Artist search failed, using raw name");
            return raw.to_string();
        }
    };

    let candidates: Vec<String> = candidates
        .into_iter()
        .filter(|c| !c.trim().is_empty())
        .collect();

    match pick_artist_candidate(raw, &candidates) {
        Some((resolved, score)) => {
            debug!(artist = %raw, resolved = %resolved, score, "Artist name resolved");
            resolved
        }
        None => {
            debug!(artist = %raw, "No artist candidates, using raw name");
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_name_wins() {
        let candidates = names(&["Young Thug (2)", "Young Thug", "Young Thugga"]);
        let (name, score) = pick_artist_candidate("Young Thug", &candidates).unwrap();
        assert_eq!(name, "Young Thug");
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_below_threshold_uses_first_result() {
        let candidates = names(&["Completely Different", "Another Name"]);
        let (name, score) = pick_artist_candidate("Young Thug", &candidates).unwrap();
        assert_eq!(name, "Completely Different");
        assert!(score < ARTIST_MATCH_THRESHOLD);
    }

    #[test]
    fn test_tie_keeps_earlier_candidate() {
        let candidates = names(&["Future (4)", "Future (2)"]);
        let (name, _) = pick_artist_candidate("Future", &candidates).unwrap();
        assert_eq!(name, "Future (4)");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let candidates = names(&["Future Islands", "Future (4)"]);
        let (name, score) = pick_artist_candidate("Future", &candidates).unwrap();
        assert_eq!(name, "Future (4)");
        assert_eq!(score, ARTIST_MATCH_THRESHOLD);
    }

    #[test]
    fn test_no_candidates() {
        assert!(pick_artist_candidate("Anyone", &[]).is_none());
    }
}
