//! Catalog query engine
//!
//! Filtered lookups run against an immutable store snapshot. Genre, map and
//! block criteria resolve to circle-id sets independently and intersect;
//! the day criterion is applied afterwards over the materialized circles.
//! Failure and emptiness are distinct: every lookup returns a `Result`.

use std::sync::Arc;

use ahash::AHashSet;
use tracing::trace;

use em_core::model::{Circle, Genre, MapInfo};
use em_core::{BlockId, CircleId, DayIndex, GenreId, MapId};

use crate::cache::{FilterKey, QueryCache};
use crate::store::{CatalogStore, StoreData};
use crate::DataError;

/// Minimum searched-term length for free-text search to activate.
const SEARCH_MIN_CHARS: usize = 2;

/// Criteria of one filtered circle lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CircleFilter {
    pub genre: Option<GenreId>,
    pub map: Option<MapId>,
    pub block: Option<BlockId>,
    pub day: Option<DayIndex>,
}

impl CircleFilter {
    /// Whether any set-resolving criterion is active. The day criterion is
    /// only a post-filter and does not activate a query on its own.
    pub fn has_active_criterion(&self) -> bool {
        self.genre.is_some() || self.map.is_some() || self.block.is_some()
    }

    fn key(&self) -> FilterKey {
        (self.genre, self.map, self.block, self.day)
    }
}

/// Result ordering over circle ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    /// End-to-end reading order for right/bottom-oriented contexts.
    Descending,
}

/// Outcome of a free-text search.
///
/// `Inactive` means the term was below the activation threshold; callers
/// must not render it as "no results".
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Inactive,
    Matched(Vec<Circle>),
}

/// Read-only query engine over the catalog store.
pub struct CatalogQuery {
    store: Arc<CatalogStore>,
    cache: Arc<QueryCache>,
}

impl CatalogQuery {
    pub fn new(store: Arc<CatalogStore>, cache: Arc<QueryCache>) -> Self {
        Self { store, cache }
    }

    /// Circles matching the filter, ordered by id.
    ///
    /// With no active criterion the result is empty by convention; callers
    /// are expected to activate at least one filter before querying.
    pub async fn circles(
        &self,
        filter: CircleFilter,
        order: SortOrder,
    ) -> Result<Vec<Circle>, DataError> {
        if !filter.has_active_criterion() {
            return Ok(Vec::new());
        }

        let data = self.store.snapshot();
        let ids = {
            let data = data.clone();
            self.cache
                .get_or_compute(filter.key(), move || async move {
                    Arc::new(resolve_ids(&data, &filter))
                })
                .await
        };
        trace!(?filter, candidates = ids.len(), "filter resolved");

        let mut circles: Vec<Circle> = ids
            .iter()
            .filter_map(|id| data.circles.get(id).cloned())
            .filter(|c| filter.day.map_or(true, |day| c.day == day))
            .collect();
        if order == SortOrder::Descending {
            circles.reverse();
        }
        Ok(circles)
    }

    /// Case-insensitive substring search over name, phonetic name and pen
    /// name. Terms shorter than two characters leave the search inactive.
    pub fn search(&self, term: &str) -> SearchOutcome {
        let term = term.trim();
        if term.chars().count() < SEARCH_MIN_CHARS {
            return SearchOutcome::Inactive;
        }
        let needle = term.to_lowercase();

        let data = self.store.snapshot();
        let matched = data
            .circles
            .values()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.name_kana.to_lowercase().contains(&needle)
                    || c.pen_name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        SearchOutcome::Matched(matched)
    }

    /// Single circle lookup.
    pub fn circle(&self, id: CircleId) -> Option<Circle> {
        self.store.snapshot().circles.get(&id).cloned()
    }

    /// All genres, ascending by id.
    pub fn genres(&self) -> Vec<Genre> {
        let data = self.store.snapshot();
        let mut genres: Vec<Genre> = data.genres.values().cloned().collect();
        genres.sort_by_key(|g| g.id);
        genres
    }

    /// All hall maps, ascending by id.
    pub fn maps(&self) -> Vec<MapInfo> {
        let data = self.store.snapshot();
        let mut maps: Vec<MapInfo> = data.maps.values().cloned().collect();
        maps.sort_by_key(|m| m.id);
        maps
    }
}

/// Resolve the set-based criteria into an ascending circle-id list.
///
/// The day criterion is deliberately not part of this step.
fn resolve_ids(data: &StoreData, filter: &CircleFilter) -> Vec<CircleId> {
    let mut sets: Vec<AHashSet<CircleId>> = Vec::new();

    if let Some(genre) = filter.genre {
        sets.push(data.circles_in_genre(genre).iter().copied().collect());
    }
    if let Some(map) = filter.map {
        sets.push(
            data.blocks_on_map(map)
                .iter()
                .flat_map(|block| data.circles_in_block(*block).iter().copied())
                .collect(),
        );
    }
    if let Some(block) = filter.block {
        sets.push(data.circles_in_block(block).iter().copied().collect());
    }

    let Some(combined) = sets
        .into_iter()
        .reduce(|a, b| a.intersection(&b).copied().collect())
    else {
        return Vec::new();
    };

    let mut ids: Vec<CircleId> = combined.into_iter().collect();
    ids.sort_unstable();
    ids
}
