//! Favorites overlay compositor
//!
//! Joins the resolved layout with the favorites color assignment and
//! accumulates one drawable region per palette color. Output order follows
//! the closed palette, and cells arrive in the resolver's deterministic
//! order, so equal inputs always compose equal regions.

use ahash::AHashMap;

use em_core::geometry::Rect;
use em_core::model::FavoriteColor;
use em_core::{CircleId, WebCatalogId};
use em_data::store::StoreData;

use crate::layout::{ResolvedCell, ResolvedLayout};

/// All sub-rectangles assigned one color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRegion {
    pub color: FavoriteColor,
    pub rects: Vec<Rect>,
}

/// Color assignment of one cell's occupants in reading order; occupants
/// without a favorite entry get no color.
pub fn cell_color_assignments(
    cell: &ResolvedCell,
    data: &StoreData,
    colors: &AHashMap<WebCatalogId, FavoriteColor>,
) -> Vec<(CircleId, Option<FavoriteColor>)> {
    cell.occupants
        .iter()
        .map(|occupant| (occupant.circle_id, color_of(occupant.circle_id, data, colors)))
        .collect()
}

/// Group every color-assigned occupant sub-rectangle into one region per
/// palette color. Colors nobody uses produce no region.
pub fn compose_overlay(
    layout: &ResolvedLayout,
    data: &StoreData,
    colors: &AHashMap<WebCatalogId, FavoriteColor>,
) -> Vec<ColorRegion> {
    let mut buckets: AHashMap<FavoriteColor, Vec<Rect>> = AHashMap::new();
    for cell in &layout.cells {
        for occupant in &cell.occupants {
            if let Some(color) = color_of(occupant.circle_id, data, colors) {
                buckets.entry(color).or_default().push(occupant.rect);
            }
        }
    }

    FavoriteColor::ALL
        .iter()
        .filter_map(|color| {
            buckets.remove(color).map(|rects| ColorRegion {
                color: *color,
                rects,
            })
        })
        .collect()
}

fn color_of(
    circle_id: CircleId,
    data: &StoreData,
    colors: &AHashMap<WebCatalogId, FavoriteColor>,
) -> Option<FavoriteColor> {
    let web_id = data.circles.get(&circle_id)?.web_catalog_id()?;
    colors.get(&web_id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use em_core::model::{CellKey, CellOrientation, Circle, ExtendedInfo, LayoutCell};
    use em_core::state::{MapResolution, ZoomDivisor};
    use em_data::store::CatalogStore;

    use crate::layout::{resolve_layout, LayoutParams};

    fn circle(id: CircleId, key: CellKey, sub: u32, web_id: Option<WebCatalogId>) -> Circle {
        Circle {
            id,
            day: 1,
            block_id: key.block_id,
            space_no: key.space_no,
            space_no_sub: sub,
            genre_id: 101,
            name: format!("circle {id}"),
            name_kana: String::new(),
            pen_name: String::new(),
            extended: web_id.map(|web_catalog_id| ExtendedInfo {
                web_catalog_id,
                site_url: None,
                twitter_url: None,
                pixiv_url: None,
            }),
        }
    }

    /// Two cells: a shared one with circles 1/2 (web ids 901/902) and a
    /// single one with circle 3 (no web catalog entry).
    fn staged() -> Arc<StoreData> {
        let shared = CellKey {
            block_id: 10,
            space_no: 1,
        };
        let single = CellKey {
            block_id: 10,
            space_no: 2,
        };
        let mut data = StoreData::default();
        data.layouts.insert(
            shared,
            LayoutCell {
                key: shared,
                map_id: 1,
                x: 100,
                y: 100,
                orientation: CellOrientation::Left,
            },
        );
        data.layouts.insert(
            single,
            LayoutCell {
                key: single,
                map_id: 1,
                x: 140,
                y: 100,
                orientation: CellOrientation::Unknown,
            },
        );
        data.circles.insert(1, circle(1, shared, 0, Some(901)));
        data.circles.insert(2, circle(2, shared, 1, Some(902)));
        data.circles.insert(3, circle(3, single, 0, None));
        let store = CatalogStore::new();
        store.swap(data);
        store.snapshot()
    }

    fn resolved(data: &StoreData) -> ResolvedLayout {
        resolve_layout(
            data,
            LayoutParams {
                map_id: 1,
                day: 1,
                zoom: ZoomDivisor::new(1),
                resolution: MapResolution::Full,
            },
        )
    }

    #[test]
    fn test_assigned_rects_land_in_exactly_one_matching_region() {
        let data = staged();
        let layout = resolved(&data);
        let colors: AHashMap<WebCatalogId, FavoriteColor> =
            [(901, FavoriteColor::Pink), (902, FavoriteColor::Pink)]
                .into_iter()
                .collect();

        let regions = compose_overlay(&layout, &data, &colors);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].color, FavoriteColor::Pink);

        // Both halves of the shared cell, each appearing exactly once.
        let shared = &layout.cells[0];
        assert_eq!(regions[0].rects.len(), 2);
        for occupant in &shared.occupants {
            let hits = regions[0]
                .rects
                .iter()
                .filter(|r| **r == occupant.rect)
                .count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn test_unassigned_occupants_appear_in_no_region() {
        let data = staged();
        let layout = resolved(&data);
        // 902 favorited, 901 not; circle 3 has no web catalog id at all.
        let colors: AHashMap<WebCatalogId, FavoriteColor> =
            [(902, FavoriteColor::Green)].into_iter().collect();

        let regions = compose_overlay(&layout, &data, &colors);
        let total: usize = regions.iter().map(|r| r.rects.len()).sum();
        assert_eq!(total, 1);
        assert_eq!(regions[0].color, FavoriteColor::Green);
    }

    #[test]
    fn test_composition_is_deterministic_across_insertion_orders() {
        let data = staged();
        let layout = resolved(&data);

        let forward: AHashMap<WebCatalogId, FavoriteColor> =
            [(901, FavoriteColor::Blue), (902, FavoriteColor::Red)]
                .into_iter()
                .collect();
        let reversed: AHashMap<WebCatalogId, FavoriteColor> =
            [(902, FavoriteColor::Red), (901, FavoriteColor::Blue)]
                .into_iter()
                .collect();

        let a = compose_overlay(&layout, &data, &forward);
        let b = compose_overlay(&layout, &data, &reversed);
        assert_eq!(a, b);

        // Palette order, not insertion order: blue precedes red.
        assert_eq!(a[0].color, FavoriteColor::Blue);
        assert_eq!(a[1].color, FavoriteColor::Red);
    }

    #[test]
    fn test_cell_color_assignments_default_to_none() {
        let data = staged();
        let layout = resolved(&data);
        let colors: AHashMap<WebCatalogId, FavoriteColor> =
            [(901, FavoriteColor::Cyan)].into_iter().collect();

        let shared = &layout.cells[0];
        assert_eq!(
            cell_color_assignments(shared, &data, &colors),
            vec![(1, Some(FavoriteColor::Cyan)), (2, None)]
        );

        let single = &layout.cells[1];
        assert_eq!(
            cell_color_assignments(single, &data, &colors),
            vec![(3, None)]
        );
    }
}
