//! Tracklist resolution
//!
//! Three sources, tried in order until one yields a named track:
//!
//! 1. The accepted secondary catalog match
//! 2. The tracklist embedded in the primary master detail
//! 3. The master's main release, fetched after a short courtesy delay
//!
//! The master detail is fetched at most once and handed back with the
//! resolution so the assembler can use its fields.

use crate::clients::PrimaryCatalog;
use crate::fallback::{first_success, Step};
use crate::types::{MasterDetail, SecondaryMatch, TrackEntry, Tracklist};
use futures::FutureExt;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Pause before the main-release request (Discogs rate limiting)
pub const TERTIARY_DELAY: Duration = Duration::from_millis(1500);

/// Number track names 1..N, dropping empty names first
pub fn number_tracks<I, S>(names: I) -> Vec<TrackEntry>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref().trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .enumerate()
        .map(|(i, name)| TrackEntry { index: i + 1, name })
        .collect()
}

/// Where the tracklist came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracklistSource {
    Secondary,
    MasterInline,
    MainRelease,
}

/// Resolved tracklist plus the master detail, if it was fetched
#[derive(Debug, Clone)]
pub struct TracklistResolution {
    pub tracklist: Tracklist,
    /// `None` when every source was empty
    pub source: Option<TracklistSource>,
    pub master: Option<MasterDetail>,
}

pub struct TracklistResolver<'a> {
    primary: &'a dyn PrimaryCatalog,
    delay: Duration,
}

impl<'a> TracklistResolver<'a> {
    pub fn new(primary: &'a dyn PrimaryCatalog, delay: Duration) -> Self {
        Self { primary, delay }
    }

    pub async fn resolve(
        &self,
        master_id: u64,
        secondary: Option<&SecondaryMatch>,
    ) -> TracklistResolution {
        let master_cell: OnceCell<Option<MasterDetail>> = OnceCell::new();
        let master_cell = &master_cell;

        let steps: Vec<Step<'_, (Vec<TrackEntry>, TracklistSource)>> = vec![
            async move {
                let tracks = number_tracks(&secondary?.tracks);
                (!tracks.is_empty()).then_some((tracks, TracklistSource::Secondary))
            }
            .boxed(),
            async move {
                let master = master_cell
                    .get_or_init(|| self.load_master(master_id))
                    .await
                    .as_ref()?;
                let tracks = number_tracks(&master.tracklist);
                (!tracks.is_empty()).then_some((tracks, TracklistSource::MasterInline))
            }
            .boxed(),
            async move {
                let master = master_cell
                    .get_or_init(|| self.load_master(master_id))
                    .await
                    .as_ref()?;
                let release_id = master.main_release?;
                self.load_release(release_id)
                    .await
                    .map(|tracks| (tracks, TracklistSource::MainRelease))
            }
            .boxed(),
        ];

        let found = first_success(steps).await;
        let master = master_cell.get().cloned().flatten();

        match found {
            Some((tracks, source)) => {
                info!(master_id, ?source, tracks = tracks.len(), "Tracklist resolved");
                TracklistResolution {
                    tracklist: Tracklist::Tracks(tracks),
                    source: Some(source),
                    master,
                }
            }
            None => {
                info!(master_id, "No tracklist available from any source");
                TracklistResolution {
                    tracklist: Tracklist::Unavailable,
                    source: None,
                    master,
                }
            }
        }
    }

    async fn load_master(&self, master_id: u64) -> Option<MasterDetail> {
        match self.primary.master(master_id).await {
            Ok(master) => Some(master),
            Err(e) => {
                warn!(master_id, error = %e, "Failed to fetch master detail");
                None
            }
        }
    }

    async fn load_release(&self, release_id: u64) -> Option<Vec<TrackEntry>> {
        debug!(release_id, delay_ms = self.delay.as_millis() as u64, "Falling back to main release");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.primary.release(release_id).await {
            Ok(release) => {
                let tracks = number_tracks(&release.tracklist);
                (!tracks.is_empty()).then_some(tracks)
            }
            Err(e) => {
                warn!(release_id, error = %e, "Failed to fetch main release");
                None
            }
        }
    }
}
