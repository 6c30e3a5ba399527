//! Spatial layout resolver
//!
//! Resolves the booth cells of one map and day into pixel rectangles.
//! Occupants of a shared cell split its footprint evenly along one axis;
//! the ordering follows the space-number suffix and flips for bottom- and
//! right-oriented cells so visual order matches physical reading direction.
//! All geometry is divided by the zoom divisor before it leaves this
//! module, so hit testing and rendering share one coordinate space.

use tracing::trace;

use em_core::geometry::{Point, Rect};
use em_core::model::{CellKey, CellOrientation, Circle, LayoutCell};
use em_core::state::{MapResolution, ZoomDivisor};
use em_core::{CircleId, DayIndex, MapId};
use em_data::store::StoreData;

/// Inputs of one layout resolution pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub map_id: MapId,
    pub day: DayIndex,
    pub zoom: ZoomDivisor,
    pub resolution: MapResolution,
}

/// One occupant's sub-rectangle, already zoom-scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccupantRect {
    pub circle_id: CircleId,
    pub rect: Rect,
}

/// One resolved booth cell with at least one occupant.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCell {
    pub key: CellKey,
    pub orientation: CellOrientation,
    /// Full cell footprint, zoom-scaled.
    pub frame: Rect,
    /// Occupant sub-rectangles in reading order.
    pub occupants: Vec<OccupantRect>,
}

impl ResolvedCell {
    /// Occupant circle ids in reading order.
    pub fn circle_ids(&self) -> Vec<CircleId> {
        self.occupants.iter().map(|o| o.circle_id).collect()
    }
}

/// Output of one layout resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLayout {
    pub params: LayoutParams,
    pub cells: Vec<ResolvedCell>,
}

impl ResolvedLayout {
    /// First cell whose scaled `[min, max)` bounding box contains the
    /// point. Cells without occupants were never resolved and can't be hit.
    pub fn hit_test(&self, point: Point) -> Option<&ResolvedCell> {
        self.cells.iter().find(|cell| cell.frame.contains(point))
    }
}

/// Resolve every occupied cell of the selected map and day.
pub fn resolve_layout(data: &StoreData, params: LayoutParams) -> ResolvedLayout {
    // Deterministic cell order regardless of map iteration order.
    let mut layout_cells: Vec<&LayoutCell> = data
        .layouts
        .values()
        .filter(|cell| cell.map_id == params.map_id)
        .collect();
    layout_cells.sort_by_key(|cell| cell.key);

    let size = params.resolution.cell_size();
    let cells = layout_cells
        .into_iter()
        .filter_map(|cell| resolve_cell(data, cell, size, params.day, params.zoom))
        .collect::<Vec<_>>();

    trace!(
        map_id = params.map_id,
        day = params.day,
        cells = cells.len(),
        "layout resolved"
    );
    ResolvedLayout { params, cells }
}

/// Resolve one cell; `None` when nobody occupies it on the selected day.
fn resolve_cell(
    data: &StoreData,
    cell: &LayoutCell,
    size: f32,
    day: DayIndex,
    zoom: ZoomDivisor,
) -> Option<ResolvedCell> {
    let mut occupants: Vec<&Circle> = data
        .cell_occupants(cell.key)
        .iter()
        .filter_map(|id| data.circles.get(id))
        .filter(|c| c.day == day)
        .collect();
    if occupants.is_empty() {
        return None;
    }

    occupants.sort_by_key(|c| c.space_no_sub);
    if cell.orientation.reverses_reading_order() {
        occupants.reverse();
    }

    let base_x = cell.x as f32;
    let base_y = cell.y as f32;
    let count = occupants.len();
    let step = size / count as f32;
    let divisor = zoom.get();

    let occupants = occupants
        .into_iter()
        .enumerate()
        .map(|(i, circle)| {
            // Sub-rectangle i spans [base + i*step, base + (i+1)*step) on
            // the subdivided axis and the full footprint on the other.
            let lo = i as f32 * step;
            let hi = (i + 1) as f32 * step;
            let rect = if cell.orientation.subdivides_vertically() {
                Rect::new(base_x, base_y + lo, size, hi - lo)
            } else {
                Rect::new(base_x + lo, base_y, hi - lo, size)
            };
            OccupantRect {
                circle_id: circle.id,
                rect: rect.scaled_down(divisor),
            }
        })
        .collect();

    Some(ResolvedCell {
        key: cell.key,
        orientation: cell.orientation,
        frame: Rect::new(base_x, base_y, size, size).scaled_down(divisor),
        occupants,
    })
}
