//! Data layer for the event catalog platform
//!
//! Reads the downloaded relational snapshot, ingests it into the in-memory
//! catalog store, and answers filtered queries over it. Also owns the
//! favorites mirror and the binary image store.

use thiserror::Error;

pub mod cache;
pub mod favorites;
pub mod images;
pub mod ingest;
pub mod query;
pub mod snapshot;
pub mod store;

#[cfg(test)]
pub(crate) mod test_fixtures;

// Re-exports
pub use cache::{FilterKey, QueryCache};
pub use favorites::{FavoritesMirror, FavoritesService};
pub use images::{ImageSnapshot, ImageStore};
pub use ingest::{IngestPipeline, IngestReport, PhaseReport};
pub use query::{CatalogQuery, CircleFilter, SearchOutcome, SortOrder};
pub use snapshot::SnapshotHandle;
pub use store::{CatalogStore, StoreData};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<rusqlite::Error> for DataError {
    fn from(error: rusqlite::Error) -> Self {
        DataError::Sqlite(error.to_string())
    }
}
