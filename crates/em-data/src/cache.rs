//! Query result caching
//!
//! Results are cached per filter tuple. Each key owns a `tokio` once-cell,
//! so concurrent identical queries collapse into a single computation.
//! Invalidation is always whole-cache: ingestion completion and event
//! switches are the only triggers, favorites changes never are.

use std::future::Future;
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;
use tokio::sync::OnceCell;
use tracing::debug;

use em_core::{BlockId, CircleId, DayIndex, GenreId, MapId};

/// Tuple of active filter identifiers: (genre, map, block, day).
pub type FilterKey = (
    Option<GenreId>,
    Option<MapId>,
    Option<BlockId>,
    Option<DayIndex>,
);

type CachedIds = Arc<Vec<CircleId>>;

/// Cache of resolved circle-id lists keyed by filter tuple.
pub struct QueryCache {
    entries: RwLock<AHashMap<FilterKey, Arc<OnceCell<CachedIds>>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(AHashMap::new()),
        }
    }

    /// Return the cached value for `key`, computing it at most once even
    /// under concurrent identical queries.
    pub async fn get_or_compute<F, Fut>(&self, key: FilterKey, compute: F) -> CachedIds
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CachedIds>,
    {
        let cell = {
            let mut entries = self.entries.write();
            entries.entry(key).or_default().clone()
        };
        cell.get_or_init(compute).await.clone()
    }

    /// Drop every cached result.
    pub fn invalidate_all(&self) {
        self.entries.write().clear();
        debug!("query cache invalidated");
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
