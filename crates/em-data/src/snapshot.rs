//! Relational snapshot access
//!
//! The download collaborator hands over a SQLite database holding the nine
//! tabular domains of one event. `SnapshotHandle` opens it read-only and
//! decodes each domain into model rows. Decoding is deliberately lenient:
//! a row that fails to decode is skipped with a warning and counted, never
//! propagated, so one corrupt row cannot sink a whole sync.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{types::Type, Connection, OpenFlags, Row};
use tracing::warn;

use em_core::model::{
    Area, Block, CellKey, CellOrientation, Circle, EventDate, EventInfo, ExtendedInfo, Genre,
    LayoutCell, MapInfo, MapLink, PixelConfig, ResolutionPair,
};
use em_core::CircleId;

use crate::DataError;

/// Rows decoded from one domain, plus the number of rows skipped.
#[derive(Debug)]
pub struct Decoded<T> {
    pub rows: Vec<T>,
    pub skipped: usize,
}

impl<T> Default for Decoded<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            skipped: 0,
        }
    }
}

/// Read-only handle over the relational snapshot.
pub struct SnapshotHandle {
    conn: Connection,
}

impl SnapshotHandle {
    /// Open a snapshot database read-only.
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

    /// Run one domain query, decoding rows leniently.
    fn read_domain<T, F>(&self, domain: &str, sql: &str, decode: F) -> Result<Decoded<T>, DataError>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let mut out = Decoded::default();
        for row in stmt.query_map([], decode)? {
            match row {
                Ok(value) => out.rows.push(value),
                Err(e) => {
                    out.skipped += 1;
                    warn!(domain, error = %e, "skipping undecodable row");
                }
            }
        }
        Ok(out)
    }

    pub fn read_events(&self) -> Result<Decoded<EventInfo>, DataError> {
        self.read_domain(
            "events",
            "SELECT number, name, \
             cut_w, cut_h, cut_ox, cut_oy, cut_dx, cut_dy, \
             cut_w2, cut_h2, cut_ox2, cut_oy2, cut_dx2, cut_dy2, \
             map_w, map_h, map_ox, map_oy, map_dx, map_dy, \
             map_w2, map_h2, map_ox2, map_oy2, map_dx2, map_dy2 \
             FROM events",
            |row| {
                Ok(EventInfo {
                    number: row.get(0)?,
                    name: row.get(1)?,
                    cut: resolution_pair(row, 2)?,
                    map: resolution_pair(row, 14)?,
                })
            },
        )
    }

    pub fn read_dates(&self) -> Result<Decoded<EventDate>, DataError> {
        self.read_domain(
            "dates",
            "SELECT event_number, day, date FROM dates",
            |row| {
                let text: String = row.get(2)?;
                let date = NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e))
                })?;
                Ok(EventDate {
                    event_number: row.get(0)?,
                    day: row.get(1)?,
                    date,
                })
            },
        )
    }

    pub fn read_maps(&self) -> Result<Decoded<MapInfo>, DataError> {
        self.read_domain(
            "maps",
            "SELECT event_number, id, name, image_file, full_image_file, \
             w, h, ox, oy, dx, dy, w2, h2, ox2, oy2, dx2, dy2, rotation \
             FROM maps",
            |row| {
                Ok(MapInfo {
                    event_number: row.get(0)?,
                    id: row.get(1)?,
                    name: row.get(2)?,
                    image_file: row.get(3)?,
                    full_image_file: row.get(4)?,
                    config: resolution_pair(row, 5)?,
                    rotation: row.get(17)?,
                })
            },
        )
    }

    pub fn read_areas(&self) -> Result<Decoded<Area>, DataError> {
        self.read_domain("areas", "SELECT id, name FROM areas", |row| {
            Ok(Area {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
    }

    pub fn read_blocks(&self) -> Result<Decoded<Block>, DataError> {
        self.read_domain("blocks", "SELECT id, area_id, name FROM blocks", |row| {
            Ok(Block {
                id: row.get(0)?,
                area_id: row.get(1)?,
                name: row.get(2)?,
            })
        })
    }

    pub fn read_map_links(&self) -> Result<Decoded<MapLink>, DataError> {
        self.read_domain(
            "map_links",
            "SELECT day, map_id, area_id, block_id FROM map_links",
            |row| {
                Ok(MapLink {
                    day: row.get(0)?,
                    map_id: row.get(1)?,
                    area_id: row.get(2)?,
                    block_id: row.get(3)?,
                })
            },
        )
    }

    pub fn read_genres(&self) -> Result<Decoded<Genre>, DataError> {
        self.read_domain(
            "genres",
            "SELECT id, name, code, day FROM genres",
            |row| {
                Ok(Genre {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    code: row.get(2)?,
                    day: row.get(3)?,
                })
            },
        )
    }

    pub fn read_layouts(&self) -> Result<Decoded<LayoutCell>, DataError> {
        self.read_domain(
            "layouts",
            "SELECT block_id, space_no, x, y, orientation, map_id FROM layouts",
            |row| {
                Ok(LayoutCell {
                    key: CellKey {
                        block_id: row.get(0)?,
                        space_no: row.get(1)?,
                    },
                    x: row.get(2)?,
                    y: row.get(3)?,
                    orientation: CellOrientation::from_code(row.get(4)?),
                    map_id: row.get(5)?,
                })
            },
        )
    }

    /// Circle rows without their extended information; the pipeline merges
    /// the two domains by shared id.
    pub fn read_circles(&self) -> Result<Decoded<Circle>, DataError> {
        self.read_domain(
            "circles",
            "SELECT id, day, block_id, space_no, space_no_sub, genre_id, \
             name, name_kana, pen_name FROM circles",
            |row| {
                Ok(Circle {
                    id: row.get(0)?,
                    day: row.get(1)?,
                    block_id: row.get(2)?,
                    space_no: row.get(3)?,
                    space_no_sub: row.get(4)?,
                    genre_id: row.get(5)?,
                    name: row.get(6)?,
                    name_kana: row.get(7)?,
                    pen_name: row.get(8)?,
                    extended: None,
                })
            },
        )
    }

    pub fn read_circle_extends(&self) -> Result<Decoded<(CircleId, ExtendedInfo)>, DataError> {
        self.read_domain(
            "circle_extends",
            "SELECT circle_id, web_catalog_id, site_url, twitter_url, pixiv_url \
             FROM circle_extends",
            |row| {
                Ok((
                    row.get(0)?,
                    ExtendedInfo {
                        web_catalog_id: row.get(1)?,
                        site_url: row.get(2)?,
                        twitter_url: row.get(3)?,
                        pixiv_url: row.get(4)?,
                    },
                ))
            },
        )
    }
}

fn pixel_config(row: &Row<'_>, base: usize) -> rusqlite::Result<PixelConfig> {
    Ok(PixelConfig {
        width: row.get(base)?,
        height: row.get(base + 1)?,
        origin_x: row.get(base + 2)?,
        origin_y: row.get(base + 3)?,
        offset_x: row.get(base + 4)?,
        offset_y: row.get(base + 5)?,
    })
}

fn resolution_pair(row: &Row<'_>, base: usize) -> rusqlite::Result<ResolutionPair> {
    Ok(ResolutionPair {
        full: pixel_config(row, base)?,
        reduced: pixel_config(row, base + 6)?,
    })
}
