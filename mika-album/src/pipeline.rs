//! Album lookup pipeline
//!
//! Wires the stages together for one raw filter string:
//!
//! ```text
//! filter -> attempts -> primary search cascade -> random pick
//!        -> identity reconciliation -> secondary enrichment (optional)
//!        -> tracklist fallback -> assembled record
//! ```
//!
//! Stages run strictly one after another. Only a missing Discogs token and
//! an exhausted search cascade are reported as errors.

use crate::assembler::{assemble, reconcile_identity, AssemblyInput};
use crate::clients::{DiscogsClient, PrimaryCatalog, SecondaryCatalog, SpotifyClient};
use crate::error::{LookupError, LookupResult};
use crate::filter_parser::parse_filter;
use crate::http::HttpContext;
use crate::normalize::strip_disambiguation;
use crate::search_cascade::{choose_record, run_cascade};
use crate::secondary_matcher::enrich;
use crate::tracklist::{TracklistResolver, TERTIARY_DELAY};
use crate::types::{AlbumRecord, CatalogRecord};
use mika_common::config::Credentials;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

/// Tunables for a pipeline instance
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Pause before the main-release tracklist request
    pub tertiary_delay: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            tertiary_delay: TERTIARY_DELAY,
        }
    }
}

/// Album lookup over a primary and an optional secondary catalog
///
/// Safe to share between concurrent lookups; the only mutable state is the
/// random source, locked briefly while a search result is picked.
pub struct AlbumPipeline {
    primary: Arc<dyn PrimaryCatalog>,
    secondary: Option<Arc<dyn SecondaryCatalog>>,
    rng: Mutex<Box<dyn RngCore + Send>>,
    settings: PipelineSettings,
}

impl AlbumPipeline {
    pub fn new(
        primary: Arc<dyn PrimaryCatalog>,
        secondary: Option<Arc<dyn SecondaryCatalog>>,
    ) -> Self {
        Self {
            primary,
            secondary,
            rng: Mutex::new(Box::new(StdRng::from_entropy())),
            settings: PipelineSettings::default(),
        }
    }

    /// Replace the random source (seeded sources make picks reproducible)
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the production pipeline over Discogs and, if configured, Spotify
    ///
    /// Fails with `Configuration` before any request when no Discogs token
    /// is available.
    pub fn from_credentials(http: Arc<HttpContext>, credentials: &Credentials) -> LookupResult<Self> {
        let token = credentials.require_discogs_token()?;
        let primary: Arc<dyn PrimaryCatalog> = Arc::new(DiscogsClient::new(Arc::clone(&http), token));

        let secondary = credentials.spotify.clone().map(|spotify| {
            Arc::new(SpotifyClient::new(Arc::clone(&http), spotify)) as Arc<dyn SecondaryCatalog>
        });
        if secondary.is_none() {
            debug!("Spotify credentials not configured, enrichment disabled");
        }

        Ok(Self::new(primary, secondary))
    }

    /// Look up one album for a raw filter string
    pub async fn lookup(&self, raw_filter: &str) -> LookupResult<AlbumRecord> {
        let filter = parse_filter(raw_filter);
        let attempts = filter.attempts();
        debug!(filter = %raw_filter, attempts = attempts.len(), "Parsed filter");

        let hit = run_cascade(self.primary.as_ref(), &attempts).await?;
        let record = self.pick(&hit.results).ok_or_else(|| {
            LookupError::NotFound(format!("no usable result for '{}'", raw_filter))
        })?;
        info!(master_id = record.id, title = %record.title, "Selected master");

        let identity = reconcile_identity(&record);

        let secondary = match &self.secondary {
            Some(catalog) => {
                let artist = strip_disambiguation(&identity.artist);
                enrich(catalog.as_ref(), &identity.title, &artist).await
            }
            None => None,
        };

        let resolution = TracklistResolver::new(self.primary.as_ref(), self.settings.tertiary_delay)
            .resolve(record.id, secondary.as_ref())
            .await;

        Ok(assemble(AssemblyInput {
            record: &record,
            identity,
            filter_year: filter.year.as_deref(),
            master: resolution.master.as_ref(),
            secondary: secondary.as_ref(),
            tracklist: resolution.tracklist,
            master_page_url: self.primary.master_page_url(record.id),
        }))
    }

    fn pick(&self, results: &[CatalogRecord]) -> Option<CatalogRecord> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        choose_record(results, &mut **rng)
    }
}

/// One-shot lookup with externally supplied credentials
pub async fn find_album(
    http: Arc<HttpContext>,
    raw_filter: &str,
    credentials: &Credentials,
) -> LookupResult<AlbumRecord> {
    AlbumPipeline::from_credentials(http, credentials)?
        .lookup(raw_filter)
        .await
}
