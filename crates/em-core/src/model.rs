//! Catalog data model
//!
//! Entities mirror the relational snapshot one-to-one except for `Circle`,
//! which owns its optional `ExtendedInfo` after the ingest-time merge.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Circle identifier, unique within one event.
pub type CircleId = u32;
/// Hall map identifier.
pub type MapId = u32;
/// Area identifier.
pub type AreaId = u32;
/// Block identifier.
pub type BlockId = u32;
/// Genre identifier.
pub type GenreId = u32;
/// Event day index (1-based).
pub type DayIndex = u32;
/// Identifier used by the remote favorites service.
pub type WebCatalogId = u64;

/// Pixel metadata for one image resource: size, origin and offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelConfig {
    pub width: i32,
    pub height: i32,
    pub origin_x: i32,
    pub origin_y: i32,
    pub offset_x: i32,
    pub offset_y: i32,
}

/// The same pixel configuration at the two shipped resolutions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPair {
    pub full: PixelConfig,
    pub reduced: PixelConfig,
}

/// One event (a single edition of the exhibition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    /// Event number, unique across editions.
    pub number: u32,
    pub name: String,
    /// Circle-cut image configuration.
    pub cut: ResolutionPair,
    /// Hall map image configuration.
    pub map: ResolutionPair,
}

/// Calendar date of one event day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDate {
    pub event_number: u32,
    pub day: DayIndex,
    pub date: NaiveDate,
}

/// One hall map of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapInfo {
    pub event_number: u32,
    pub id: MapId,
    pub name: String,
    /// Filename of the standard map image.
    pub image_file: String,
    /// Filename of the full-hall map image.
    pub full_image_file: String,
    pub config: ResolutionPair,
    /// Rotation applied when the hall is drawn, in degrees.
    pub rotation: i32,
}

/// Grouping of blocks within a hall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
}

/// Grouping of booth spaces; belongs to an area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub area_id: AreaId,
    pub name: String,
}

/// Day/area/block mapping row: which block appears on which map on which day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapLink {
    pub day: DayIndex,
    pub map_id: MapId,
    pub area_id: AreaId,
    pub block_id: BlockId,
}

/// Exhibit genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
    /// Category code grouping related genres.
    pub code: u32,
    /// Day the genre is placed on.
    pub day: DayIndex,
}

/// Composite key of a physical booth cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    pub block_id: BlockId,
    pub space_no: u32,
}

/// How a shared cell subdivides between its occupants.
///
/// The variant names the side the first occupant's sub-rectangle sits on;
/// `Unknown` covers single-occupant cells and unrecognized codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellOrientation {
    Unknown,
    Top,
    Bottom,
    Left,
    Right,
}

impl CellOrientation {
    /// Decode the snapshot's integer orientation code.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Top,
            2 => Self::Bottom,
            3 => Self::Left,
            4 => Self::Right,
            _ => Self::Unknown,
        }
    }

    /// Whether the occupant list reads back-to-front for this orientation.
    pub fn reverses_reading_order(self) -> bool {
        matches!(self, Self::Bottom | Self::Right)
    }

    /// Whether the cell subdivides along the vertical axis.
    pub fn subdivides_vertically(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// One booth cell placed on a hall map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutCell {
    pub key: CellKey,
    pub map_id: MapId,
    /// Position in unscaled pixel space.
    pub x: i32,
    pub y: i32,
    pub orientation: CellOrientation,
}

/// Extended circle information from the web catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedInfo {
    pub web_catalog_id: WebCatalogId,
    pub site_url: Option<String>,
    pub twitter_url: Option<String>,
    pub pixiv_url: Option<String>,
}

/// One exhibitor record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub id: CircleId,
    pub day: DayIndex,
    pub block_id: BlockId,
    pub space_no: u32,
    /// 0-based sub-position within a shared cell.
    pub space_no_sub: u32,
    pub genre_id: GenreId,
    pub name: String,
    /// Phonetic reading of the name.
    pub name_kana: String,
    pub pen_name: String,
    /// Owned by exactly one circle; dropped together with it.
    pub extended: Option<ExtendedInfo>,
}

impl Circle {
    /// Key of the cell this circle occupies.
    pub fn cell_key(&self) -> CellKey {
        CellKey {
            block_id: self.block_id,
            space_no: self.space_no,
        }
    }

    /// Remote favorites identifier, if the circle has a web catalog entry.
    pub fn web_catalog_id(&self) -> Option<WebCatalogId> {
        self.extended.as_ref().map(|e| e.web_catalog_id)
    }
}

/// Closed palette of favorite marker colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FavoriteColor {
    Blue,
    Orange,
    Green,
    Pink,
    Purple,
    Yellow,
    Cyan,
    Red,
}

impl FavoriteColor {
    /// All palette entries in display order.
    pub const ALL: [FavoriteColor; 8] = [
        Self::Blue,
        Self::Orange,
        Self::Green,
        Self::Pink,
        Self::Purple,
        Self::Yellow,
        Self::Cyan,
        Self::Red,
    ];

    /// Stable numeric code used by the remote service (1-based).
    pub fn code(self) -> u8 {
        match self {
            Self::Blue => 1,
            Self::Orange => 2,
            Self::Green => 3,
            Self::Pink => 4,
            Self::Purple => 5,
            Self::Yellow => 6,
            Self::Cyan => 7,
            Self::Red => 8,
        }
    }

    /// Decode a service color code; 0 and out-of-range codes mean "no color".
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Blue),
            2 => Some(Self::Orange),
            3 => Some(Self::Green),
            4 => Some(Self::Pink),
            5 => Some(Self::Purple),
            6 => Some(Self::Yellow),
            7 => Some(Self::Cyan),
            8 => Some(Self::Red),
            _ => None,
        }
    }

    /// Marker color as RGB.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Blue => (100, 150, 250),
            Self::Orange => (250, 150, 100),
            Self::Green => (150, 250, 100),
            Self::Pink => (250, 100, 150),
            Self::Purple => (150, 100, 250),
            Self::Yellow => (250, 250, 100),
            Self::Cyan => (100, 250, 250),
            Self::Red => (250, 100, 100),
        }
    }
}

/// One entry of the local favorites mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub web_catalog_id: WebCatalogId,
    pub color: FavoriteColor,
    pub memo: Option<String>,
}
