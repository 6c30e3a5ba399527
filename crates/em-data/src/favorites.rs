//! Favorites mirror
//!
//! The remote favorites service owns the source of truth; the mirror is a
//! local wholesale copy keyed by web catalog id. A successful sync replaces
//! the mirror entirely, a failed one keeps whatever is cached. An empty
//! mirror just renders an empty overlay.

use ahash::AHashMap;
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, warn};

use em_core::model::{FavoriteColor, FavoriteEntry};
use em_core::WebCatalogId;

/// Remote favorites service seam.
#[async_trait]
pub trait FavoritesService: Send + Sync {
    /// Fetch the complete favorites list.
    async fn fetch_all(&self) -> anyhow::Result<Vec<FavoriteEntry>>;

    /// Register one favorite remotely.
    async fn add(&self, entry: &FavoriteEntry) -> anyhow::Result<()>;

    /// Delete one favorite remotely.
    async fn remove(&self, web_catalog_id: WebCatalogId) -> anyhow::Result<()>;
}

/// Local mirror of the remote favorites list.
pub struct FavoritesMirror {
    entries: RwLock<AHashMap<WebCatalogId, FavoriteEntry>>,
}

impl FavoritesMirror {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(AHashMap::new()),
        }
    }

    /// Restore a mirror persisted by the preference collaborator.
    pub fn from_entries(entries: Vec<FavoriteEntry>) -> Self {
        let mirror = Self::new();
        mirror.replace_all(entries);
        mirror
    }

    /// Replace the whole mirror; favorites are never merged incrementally.
    pub fn replace_all(&self, list: Vec<FavoriteEntry>) {
        let mut entries = self.entries.write();
        entries.clear();
        for entry in list {
            entries.insert(entry.web_catalog_id, entry);
        }
        debug!(count = entries.len(), "favorites mirror replaced");
    }

    pub fn entry(&self, web_catalog_id: WebCatalogId) -> Option<FavoriteEntry> {
        self.entries.read().get(&web_catalog_id).cloned()
    }

    pub fn color_of(&self, web_catalog_id: WebCatalogId) -> Option<FavoriteColor> {
        self.entries.read().get(&web_catalog_id).map(|e| e.color)
    }

    /// Sparse id→color assignment snapshot for the overlay compositor.
    pub fn color_map(&self) -> AHashMap<WebCatalogId, FavoriteColor> {
        self.entries
            .read()
            .values()
            .map(|e| (e.web_catalog_id, e.color))
            .collect()
    }

    /// All entries, ascending by id, for stable persistence.
    pub fn to_entries(&self) -> Vec<FavoriteEntry> {
        let mut entries: Vec<FavoriteEntry> = self.entries.read().values().cloned().collect();
        entries.sort_by_key(|e| e.web_catalog_id);
        entries
    }

    /// Serialize the mirror for the preference collaborator.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_entries())
    }

    /// Restore a mirror from the preference collaborator's serialized form.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::from_entries(serde_json::from_str(json)?))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Refresh from the remote service. Returns whether the mirror was
    /// replaced; on failure the cached mirror stays in place.
    pub async fn sync_from(&self, service: &dyn FavoritesService) -> bool {
        match service.fetch_all().await {
            Ok(list) => {
                self.replace_all(list);
                true
            }
            Err(e) => {
                warn!(error = %e, "favorites sync failed, keeping cached mirror");
                false
            }
        }
    }

    /// Add a favorite remotely, then locally once the service accepted it.
    pub async fn push_add(
        &self,
        service: &dyn FavoritesService,
        entry: FavoriteEntry,
    ) -> anyhow::Result<()> {
        service.add(&entry).await?;
        self.entries.write().insert(entry.web_catalog_id, entry);
        Ok(())
    }

    /// Remove a favorite remotely, then locally once the service accepted it.
    pub async fn push_remove(
        &self,
        service: &dyn FavoritesService,
        web_catalog_id: WebCatalogId,
    ) -> anyhow::Result<()> {
        service.remove(web_catalog_id).await?;
        self.entries.write().remove(&web_catalog_id);
        Ok(())
    }
}

impl Default for FavoritesMirror {
    fn default() -> Self {
        Self::new()
    }
}
