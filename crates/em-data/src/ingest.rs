//! Snapshot ingestion pipeline
//!
//! Loads the nine snapshot domains into a staged `StoreData` and publishes
//! it with one atomic swap. Domains are decoded independently and row
//! failures only shrink the affected domain; nothing here propagates an
//! error to the caller.
//!
//! A writer mutex enforces the single-writer discipline: a second
//! `load_all` or `delete_all_data` waits for the one in progress instead of
//! interleaving with it.

use std::sync::Arc;

use ahash::AHashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use em_core::model::ExtendedInfo;
use em_core::CircleId;

use crate::cache::QueryCache;
use crate::images::ImageStore;
use crate::snapshot::{Decoded, SnapshotHandle};
use crate::store::{CatalogStore, StoreData};
use crate::DataError;

/// Row accounting for one ingest phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: &'static str,
    pub rows: usize,
    pub skipped: usize,
}

/// Accounting for one whole `load_all` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub phases: Vec<PhaseReport>,
}

impl IngestReport {
    pub fn rows(&self) -> usize {
        self.phases.iter().map(|p| p.rows).sum()
    }

    pub fn skipped(&self) -> usize {
        self.phases.iter().map(|p| p.skipped).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    fn checkpoint(&mut self, phase: &'static str, counter: PhaseCounter) {
        info!(
            phase,
            rows = counter.rows,
            skipped = counter.skipped,
            "ingest checkpoint"
        );
        self.phases.push(PhaseReport {
            phase,
            rows: counter.rows,
            skipped: counter.skipped,
        });
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct PhaseCounter {
    rows: usize,
    skipped: usize,
}

/// Fold one domain read into the phase counter; a failed domain read is
/// logged and contributes nothing.
fn take<T>(
    result: Result<Decoded<T>, DataError>,
    domain: &'static str,
    counter: &mut PhaseCounter,
) -> Vec<T> {
    match result {
        Ok(decoded) => {
            counter.rows += decoded.rows.len();
            counter.skipped += decoded.skipped;
            decoded.rows
        }
        Err(e) => {
            warn!(domain, error = %e, "domain read failed, skipping domain");
            Vec::new()
        }
    }
}

/// The single writer over the catalog store.
pub struct IngestPipeline {
    store: Arc<CatalogStore>,
    cache: Arc<QueryCache>,
    images: Arc<ImageStore>,
    writer: Mutex<()>,
}

impl IngestPipeline {
    pub fn new(store: Arc<CatalogStore>, cache: Arc<QueryCache>, images: Arc<ImageStore>) -> Self {
        Self {
            store,
            cache,
            images,
            writer: Mutex::new(()),
        }
    }

    /// Load every domain of the snapshot into the store.
    ///
    /// With no handle this is a no-op. Completion invalidates the query
    /// cache; that invalidation is the synchronization point the query
    /// engine relies on.
    pub async fn load_all(&self, snapshot: Option<SnapshotHandle>) -> IngestReport {
        let Some(snap) = snapshot else {
            debug!("no snapshot handle, nothing to ingest");
            return IngestReport::default();
        };

        let _writer = self.writer.lock().await;
        let mut staging = StoreData::default();
        let mut report = IngestReport::default();

        // Event configuration
        let mut counter = PhaseCounter::default();
        staging.events = take(snap.read_events(), "events", &mut counter);
        staging.dates = take(snap.read_dates(), "dates", &mut counter);
        report.checkpoint("event", counter);

        // Geography
        let mut counter = PhaseCounter::default();
        staging.maps = take(snap.read_maps(), "maps", &mut counter)
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
        staging.areas = take(snap.read_areas(), "areas", &mut counter)
            .into_iter()
            .map(|a| (a.id, a))
            .collect();
        staging.blocks = take(snap.read_blocks(), "blocks", &mut counter)
            .into_iter()
            .map(|b| (b.id, b))
            .collect();
        staging.map_links = take(snap.read_map_links(), "map_links", &mut counter);
        report.checkpoint("geography", counter);

        // Genres
        let mut counter = PhaseCounter::default();
        staging.genres = take(snap.read_genres(), "genres", &mut counter)
            .into_iter()
            .map(|g| (g.id, g))
            .collect();
        report.checkpoint("genre", counter);

        // Layouts
        let mut counter = PhaseCounter::default();
        staging.layouts = take(snap.read_layouts(), "layouts", &mut counter)
            .into_iter()
            .map(|l| (l.key, l))
            .collect();
        report.checkpoint("layout", counter);

        // Circles, merged left-outer with their extended rows by shared id
        let mut counter = PhaseCounter::default();
        let mut extends: AHashMap<CircleId, ExtendedInfo> =
            take(snap.read_circle_extends(), "circle_extends", &mut counter)
                .into_iter()
                .collect();
        for mut circle in take(snap.read_circles(), "circles", &mut counter) {
            circle.extended = extends.remove(&circle.id);
            staging.circles.insert(circle.id, circle);
        }
        if !extends.is_empty() {
            debug!(
                orphaned = extends.len(),
                "dropping extended rows without a matching circle"
            );
        }
        report.checkpoint("circle", counter);

        self.store.swap(staging);
        self.cache.invalidate_all();
        info!(
            rows = report.rows(),
            skipped = report.skipped(),
            "ingest complete"
        );
        report
    }

    /// Remove every catalog entity and the image blobs.
    ///
    /// Extended information lives inside its circle, so it goes with it;
    /// the favorites mirror is owned by favorites sync and survives.
    pub async fn delete_all_data(&self) {
        let _writer = self.writer.lock().await;
        self.store.clear();
        self.images.clear();
        self.cache.invalidate_all();
        info!("catalog data deleted");
    }
}
