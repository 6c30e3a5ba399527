//! View selection state
//!
//! Holds the map/day/zoom/resolution selection shared between the query,
//! layout and overlay layers, and issues monotonically increasing request
//! tickets so async workers can drop results that a newer selection has
//! superseded.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::model::{DayIndex, MapId};

/// Nominal cell footprint variant of the hall map images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapResolution {
    #[default]
    Full,
    Reduced,
}

impl MapResolution {
    /// Nominal booth cell footprint in unscaled pixels.
    pub fn cell_size(self) -> f32 {
        match self {
            Self::Full => 40.0,
            Self::Reduced => 20.0,
        }
    }
}

/// Integer divisor applied to all map geometry, clamped into `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomDivisor(u32);

impl ZoomDivisor {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 4;

    pub fn new(divisor: u32) -> Self {
        Self(divisor.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for ZoomDivisor {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

/// The current map view selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSelection {
    pub map_id: Option<MapId>,
    pub day: Option<DayIndex>,
    pub zoom: ZoomDivisor,
    pub resolution: MapResolution,
}

/// Ticket identifying one layout/overlay request; newer tickets supersede
/// older ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Shared selection state with stale-request detection.
pub struct SelectionState {
    selection: RwLock<ViewSelection>,
    generation: AtomicU64,
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            selection: RwLock::new(ViewSelection::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Get a copy of the current selection.
    pub fn current(&self) -> ViewSelection {
        *self.selection.read()
    }

    /// Replace the whole selection, superseding in-flight requests.
    pub fn set(&self, selection: ViewSelection) {
        *self.selection.write() = selection;
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn select_map(&self, map_id: Option<MapId>) {
        self.selection.write().map_id = map_id;
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn select_day(&self, day: Option<DayIndex>) {
        self.selection.write().day = day;
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn set_zoom(&self, zoom: ZoomDivisor) {
        self.selection.write().zoom = zoom;
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn set_resolution(&self, resolution: MapResolution) {
        self.selection.write().resolution = resolution;
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Issue a ticket for a request derived from the current selection.
    pub fn begin_request(&self) -> RequestTicket {
        RequestTicket(self.generation.load(Ordering::SeqCst))
    }

    /// Whether a result computed under `ticket` still reflects the current
    /// selection. Callers discard results for which this is false.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}
