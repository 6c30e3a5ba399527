//! Binary image store
//!
//! The image snapshot ships two key→blob tables: common images keyed by
//! name and circle-cut images keyed by circle id. Both are loaded wholesale
//! into memory once per sync; decoding of the bytes is someone else's job.

use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;
use rusqlite::{Connection, OpenFlags};
use tracing::{info, warn};

use em_core::CircleId;

use crate::DataError;

/// Read-only handle over the binary image snapshot.
pub struct ImageSnapshot {
    conn: Connection,
}

impl ImageSnapshot {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Wrap an already open connection (in-memory fixtures).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    fn read_common(&self) -> Result<AHashMap<String, Arc<Vec<u8>>>, DataError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, data FROM common_images")?;
        let mut out = AHashMap::new();
        for row in stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
        })? {
            match row {
                Ok((name, data)) => {
                    out.insert(name, Arc::new(data));
                }
                Err(e) => warn!(error = %e, "skipping undecodable common image row"),
            }
        }
        Ok(out)
    }

    fn read_cuts(&self) -> Result<AHashMap<CircleId, Arc<Vec<u8>>>, DataError> {
        let mut stmt = self
            .conn
            .prepare("SELECT circle_id, data FROM circle_images")?;
        let mut out = AHashMap::new();
        for row in stmt.query_map([], |row| {
            Ok((row.get::<_, CircleId>(0)?, row.get::<_, Vec<u8>>(1)?))
        })? {
            match row {
                Ok((id, data)) => {
                    out.insert(id, Arc::new(data));
                }
                Err(e) => warn!(error = %e, "skipping undecodable circle image row"),
            }
        }
        Ok(out)
    }
}

/// In-memory blob store for map assets and circle cuts.
pub struct ImageStore {
    common: RwLock<AHashMap<String, Arc<Vec<u8>>>>,
    cuts: RwLock<AHashMap<CircleId, Arc<Vec<u8>>>>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self {
            common: RwLock::new(AHashMap::new()),
            cuts: RwLock::new(AHashMap::new()),
        }
    }

    /// Replace both blob tables from the snapshot.
    pub fn load_all(&self, snapshot: &ImageSnapshot) -> Result<(), DataError> {
        let common = snapshot.read_common()?;
        let cuts = snapshot.read_cuts()?;
        info!(
            common = common.len(),
            cuts = cuts.len(),
            "image store loaded"
        );
        *self.common.write() = common;
        *self.cuts.write() = cuts;
        Ok(())
    }

    pub fn common(&self, name: &str) -> Option<Arc<Vec<u8>>> {
        self.common.read().get(name).cloned()
    }

    pub fn circle_cut(&self, id: CircleId) -> Option<Arc<Vec<u8>>> {
        self.cuts.read().get(&id).cloned()
    }

    pub fn clear(&self) {
        self.common.write().clear();
        self.cuts.write().clear();
    }
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new()
    }
}
