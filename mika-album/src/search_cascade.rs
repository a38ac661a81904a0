//! Primary catalog search cascade
//!
//! Tries each search attempt in order and stops at the first one with a
//! non-empty result page. Artist names are resolved just before their
//! attempt runs, so attempts that are never reached cost nothing.

use crate::artist_resolver::resolve_artist_name;
use crate::clients::PrimaryCatalog;
use crate::error::{LookupError, LookupResult};
use crate::fallback::{first_success, Step};
use crate::types::{CatalogRecord, SearchAttempt};
use futures::FutureExt;
use rand::Rng;
use tracing::{debug, info, warn};

/// Master search page size
pub const MASTER_PAGE_SIZE: u32 = 15;

/// Outcome of a successful cascade
#[derive(Debug, Clone)]
pub struct CascadeHit {
    /// Position of the winning attempt in the attempt list
    pub attempt_index: usize,
    /// Winning attempt, with the resolved artist substituted
    pub attempt: SearchAttempt,
    /// Non-empty result page
    pub results: Vec<CatalogRecord>,
}

/// Run `attempts` in order against the primary catalog
///
/// A failed search call counts as an empty page. Returns `NotFound` only
/// once every attempt has come back empty.
pub async fn run_cascade<'a>(
    catalog: &'a dyn PrimaryCatalog,
    attempts: &'a [SearchAttempt],
) -> LookupResult<CascadeHit> {
    let steps = attempts
        .iter()
        .enumerate()
        .map(|(index, attempt)| -> Step<'a, CascadeHit> {
            async move {
                let mut attempt = attempt.clone();
                if let Some(raw) = attempt.artist.take() {
                    attempt.artist = Some(resolve_artist_name(catalog, &raw).await);
                }

                debug!(index, attempt = %attempt, "Searching primary catalog");
                match catalog.search_masters(&attempt, MASTER_PAGE_SIZE).await {
                    Ok(results) if !results.is_empty() => Some(CascadeHit {
                        attempt_index: index,
                        attempt,
                        results,
                    }),
                    Ok(_) => {
                        debug!(index, attempt = %attempt, "Attempt returned no results");
                        None
                    }
                    Err(e) => {
                        warn!(index, attempt = %attempt, error = %e, "Search attempt failed");
                        None
                    }
                }
            }
            .boxed()
        })
        .collect::<Vec<_>>();

    match first_success(steps).await {
        Some(hit) => {
            info!(
                attempt = %hit.attempt,
                results = hit.results.len(),
                "Primary catalog search succeeded"
            );
            Ok(hit)
        }
        None => Err(LookupError::NotFound(format!(
            "{} search attempt(s) returned no results",
            attempts.len()
        ))),
    }
}

/// Pick one record uniformly at random
pub fn choose_record<R: Rng + ?Sized>(
    results: &[CatalogRecord],
    rng: &mut R,
) -> Option<CatalogRecord> {
    if results.is_empty() {
        return None;
    }
    Some(results[rng.gen_range(0..results.len())].clone())
}
