//! In-memory catalog store
//!
//! The store publishes immutable `Arc<StoreData>` snapshots. The ingestion
//! pipeline stages a complete replacement and swaps it in atomically, so
//! readers observe either the previous event's data or the new one, never a
//! half-loaded mix.

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

use em_core::model::{
    Area, Block, CellKey, Circle, EventDate, EventInfo, Genre, LayoutCell, MapInfo, MapLink,
};
use em_core::{AreaId, BlockId, CircleId, GenreId, MapId};

/// One consistent view of the loaded event data.
///
/// Circles live in a `BTreeMap` so iteration yields ascending circle id,
/// the catalog's default ordering.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StoreData {
    pub events: Vec<EventInfo>,
    pub dates: Vec<EventDate>,
    pub maps: AHashMap<MapId, MapInfo>,
    pub areas: AHashMap<AreaId, Area>,
    pub blocks: AHashMap<BlockId, Block>,
    pub map_links: Vec<MapLink>,
    pub genres: AHashMap<GenreId, Genre>,
    pub layouts: AHashMap<CellKey, LayoutCell>,
    pub circles: BTreeMap<CircleId, Circle>,

    // Derived indices, rebuilt on every swap.
    by_genre: AHashMap<GenreId, Vec<CircleId>>,
    by_block: AHashMap<BlockId, Vec<CircleId>>,
    occupants: AHashMap<CellKey, Vec<CircleId>>,
    blocks_by_map: AHashMap<MapId, Vec<BlockId>>,
}

impl StoreData {
    /// Rebuild the derived indices from the entity tables.
    ///
    /// Index vectors inherit the ascending-id iteration order of `circles`.
    pub(crate) fn rebuild_indices(&mut self) {
        self.by_genre.clear();
        self.by_block.clear();
        self.occupants.clear();
        self.blocks_by_map.clear();

        for circle in self.circles.values() {
            self.by_genre
                .entry(circle.genre_id)
                .or_default()
                .push(circle.id);
            self.by_block
                .entry(circle.block_id)
                .or_default()
                .push(circle.id);
            self.occupants
                .entry(circle.cell_key())
                .or_default()
                .push(circle.id);
        }

        for link in &self.map_links {
            let blocks = self.blocks_by_map.entry(link.map_id).or_default();
            if !blocks.contains(&link.block_id) {
                blocks.push(link.block_id);
            }
        }
    }

    pub fn circles_in_genre(&self, genre_id: GenreId) -> &[CircleId] {
        self.by_genre.get(&genre_id).map_or(&[], Vec::as_slice)
    }

    pub fn circles_in_block(&self, block_id: BlockId) -> &[CircleId] {
        self.by_block.get(&block_id).map_or(&[], Vec::as_slice)
    }

    /// Circles sharing one cell, across all days, ascending by id.
    pub fn cell_occupants(&self, key: CellKey) -> &[CircleId] {
        self.occupants.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Blocks appearing on a map on any day.
    pub fn blocks_on_map(&self, map_id: MapId) -> &[BlockId] {
        self.blocks_by_map.get(&map_id).map_or(&[], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.circles.is_empty()
    }
}

/// Shared store handle publishing copy-on-write snapshots.
pub struct CatalogStore {
    data: RwLock<Arc<StoreData>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(Arc::new(StoreData::default())),
        }
    }

    /// Current snapshot; cheap to clone and safe to read during ingestion.
    pub fn snapshot(&self) -> Arc<StoreData> {
        self.data.read().clone()
    }

    /// Publish a fully staged replacement; the ingestion pipeline's commit
    /// point. Derived indices are rebuilt before the swap.
    pub fn swap(&self, mut data: StoreData) {
        data.rebuild_indices();
        *self.data.write() = Arc::new(data);
    }

    /// Drop everything.
    pub fn clear(&self) {
        *self.data.write() = Arc::new(StoreData::default());
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
