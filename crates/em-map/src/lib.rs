//! Map geometry for the event catalog platform
//!
//! Turns booth-layout records into pixel rectangles, paints the favorites
//! overlay, and places detail popovers. Everything here is a pure
//! computation over a store snapshot; callers run it on any worker and use
//! request tickets to discard superseded results.

pub mod layout;
pub mod overlay;
pub mod popover;

// Re-export commonly used types
pub use layout::{resolve_layout, LayoutParams, OccupantRect, ResolvedCell, ResolvedLayout};
pub use overlay::{cell_color_assignments, compose_overlay, ColorRegion};
pub use popover::place;
