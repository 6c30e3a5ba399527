//! Command-line inspection tool for downloaded event snapshots
//!
//! Ingests a relational snapshot (and optionally an image snapshot), then
//! runs one query, one layout resolution and one popover placement to show
//! the pipeline working end to end.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use em_core::geometry::Size;
use em_core::state::{MapResolution, SelectionState, ViewSelection, ZoomDivisor};
use em_data::{
    CatalogQuery, CatalogStore, CircleFilter, ImageSnapshot, ImageStore, IngestPipeline,
    QueryCache, SnapshotHandle, SortOrder,
};
use em_map::{place, resolve_layout, LayoutParams};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let Some(snapshot_path) = args.next() else {
        bail!("usage: expomap <snapshot.db> [images.db]");
    };
    let images_path = args.next();

    let store = Arc::new(CatalogStore::new());
    let cache = Arc::new(QueryCache::new());
    let images = Arc::new(ImageStore::new());
    let pipeline = IngestPipeline::new(store.clone(), cache.clone(), images.clone());

    let snapshot = SnapshotHandle::open(&snapshot_path)
        .with_context(|| format!("opening snapshot {snapshot_path}"))?;
    let report = pipeline.load_all(Some(snapshot)).await;
    info!(
        rows = report.rows(),
        skipped = report.skipped(),
        "snapshot ingested"
    );

    if let Some(path) = images_path {
        let image_snapshot =
            ImageSnapshot::open(&path).with_context(|| format!("opening image snapshot {path}"))?;
        if let Err(e) = images.load_all(&image_snapshot) {
            warn!(error = %e, "image snapshot load failed, continuing without images");
        }
    }

    let data = store.snapshot();
    info!(
        events = data.events.len(),
        maps = data.maps.len(),
        genres = data.genres.len(),
        circles = data.circles.len(),
        layouts = data.layouts.len(),
        "store contents"
    );

    let query = CatalogQuery::new(store.clone(), cache);
    if let Some(genre) = query.genres().first() {
        let circles = query
            .circles(
                CircleFilter {
                    genre: Some(genre.id),
                    ..CircleFilter::default()
                },
                SortOrder::Ascending,
            )
            .await
            .context("genre query")?;
        info!(genre = %genre.name, matches = circles.len(), "sample genre query");
    }

    let Some(map) = query.maps().first().cloned() else {
        warn!("snapshot has no maps, stopping after queries");
        return Ok(());
    };

    let selection = SelectionState::new();
    selection.set(ViewSelection {
        map_id: Some(map.id),
        day: data.dates.first().map(|d| d.day),
        zoom: ZoomDivisor::new(1),
        resolution: MapResolution::Full,
    });
    let ticket = selection.begin_request();
    let current = selection.current();

    let layout = resolve_layout(
        &data,
        LayoutParams {
            map_id: map.id,
            day: current.day.unwrap_or(1),
            zoom: current.zoom,
            resolution: current.resolution,
        },
    );
    if !selection.is_current(ticket) {
        warn!("selection changed mid-resolve, discarding layout");
        return Ok(());
    }
    info!(map = %map.name, cells = layout.cells.len(), "layout resolved");

    if let Some(cell) = layout.cells.first() {
        let canvas = Size::new(
            map.config.full.width as f32,
            map.config.full.height as f32,
        );
        let point = place(cell.frame, Size::new(240.0, 160.0), 8.0, 16.0, canvas);
        let hit = layout.hit_test(cell.frame.center()).is_some();
        info!(
            block_id = cell.key.block_id,
            space_no = cell.key.space_no,
            occupants = cell.occupants.len(),
            hit_test = hit,
            popover_x = point.x,
            popover_y = point.y,
            "sample cell"
        );
    }

    Ok(())
}
