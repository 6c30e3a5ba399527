//! Core types for the event catalog platform
//!
//! This crate provides the catalog data model, the pixel geometry
//! primitives shared by the map components, and the view selection state.

pub mod geometry;
pub mod model;
pub mod state;

// Re-export commonly used types
pub use geometry::{Point, Rect, Size};
pub use model::{
    Area, Block, CellKey, CellOrientation, Circle, EventDate, EventInfo, ExtendedInfo,
    FavoriteColor, FavoriteEntry, Genre, LayoutCell, MapInfo, MapLink, PixelConfig,
    ResolutionPair,
};
pub use model::{AreaId, BlockId, CircleId, DayIndex, GenreId, MapId, WebCatalogId};
pub use state::{MapResolution, RequestTicket, SelectionState, ViewSelection, ZoomDivisor};
