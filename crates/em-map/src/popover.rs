//! Popover placement solver
//!
//! Places a detail card next to a tapped cell. The solver prefers the side
//! with room, biases vertically when the anchor sits near the top or
//! bottom of the canvas, and finishes with a clamp that keeps the card
//! inside the padded canvas. It always returns a point.

use em_core::geometry::{Point, Rect, Size};

/// Fraction of the canvas height treated as "near the edge" for the
/// vertical placement bias.
const EDGE_BIAS_FRACTION: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Right,
    Left,
    Below,
    Above,
}

/// Compute the popover center for the given anchor.
///
/// `clearance` is the gap between anchor and popover, `edge_padding` the
/// margin the popover must keep from the canvas boundary.
pub fn place(
    anchor: Rect,
    popover: Size,
    clearance: f32,
    edge_padding: f32,
    canvas: Size,
) -> Point {
    // Signed free space per direction: what remains between the cleared
    // anchor edge and the padded canvas boundary once the popover is in.
    let free_right = (canvas.width - edge_padding) - (anchor.max_x() + clearance) - popover.width;
    let free_left = (anchor.min_x() - clearance) - edge_padding - popover.width;
    let free_below = (canvas.height - edge_padding) - (anchor.max_y() + clearance) - popover.height;
    let free_above = (anchor.min_y() - clearance) - edge_padding - popover.height;

    let anchor_center = anchor.center();
    let direction = if anchor_center.y < canvas.height * EDGE_BIAS_FRACTION && free_below >= 0.0 {
        Direction::Below
    } else if anchor_center.y > canvas.height * (1.0 - EDGE_BIAS_FRACTION) && free_above >= 0.0 {
        Direction::Above
    } else if free_right >= 0.0 {
        Direction::Right
    } else if free_left >= 0.0 {
        Direction::Left
    } else if free_below >= 0.0 {
        Direction::Below
    } else if free_above >= 0.0 {
        Direction::Above
    } else {
        // Nothing fits; fall back to the right and let the clamp settle it.
        Direction::Right
    };

    let center = match direction {
        Direction::Right => Point::new(
            anchor.max_x() + clearance + popover.width / 2.0,
            clamp_axis(anchor_center.y, popover.height, edge_padding, canvas.height),
        ),
        Direction::Left => Point::new(
            anchor.min_x() - clearance - popover.width / 2.0,
            clamp_axis(anchor_center.y, popover.height, edge_padding, canvas.height),
        ),
        Direction::Below => Point::new(
            anchor_center.x,
            anchor.max_y() + clearance + popover.height / 2.0,
        ),
        Direction::Above => Point::new(
            anchor_center.x,
            anchor.min_y() - clearance - popover.height / 2.0,
        ),
    };

    // Final clamp: the implied popover box may never leave the padded
    // canvas, whatever direction was picked.
    Point::new(
        clamp_axis(center.x, popover.width, edge_padding, canvas.width),
        clamp_axis(center.y, popover.height, edge_padding, canvas.height),
    )
}

/// Clamp a center coordinate so an extent around it stays inside
/// `[edge_padding, canvas_extent - edge_padding]`. When the extent cannot
/// fit at all, the canvas middle is the least bad answer.
fn clamp_axis(center: f32, extent: f32, edge_padding: f32, canvas_extent: f32) -> f32 {
    let lo = edge_padding + extent / 2.0;
    let hi = canvas_extent - edge_padding - extent / 2.0;
    if lo > hi {
        return canvas_extent / 2.0;
    }
    center.clamp(lo, hi)
}
