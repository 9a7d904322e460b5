//! Viewport fitting for a set of area boundaries.
//!
//! This is a lookup-table heuristic, not a projection fit: the larger of
//! the union bounding box's width and height (in degrees) is compared
//! against a fixed ladder of breakpoints to pick a zoom level.

use territory_map_geometry_models::{Polygon, Viewport};

use crate::bounds::bounding_rect;

/// Viewport used when no area has a usable boundary: Seoul City Hall.
pub const DEFAULT_VIEWPORT: Viewport = Viewport {
    center_lng: 126.9780,
    center_lat: 37.5665,
    zoom_level: 10,
};

/// `(max span in degrees, zoom level)`, ascending by span.
pub const ZOOM_BREAKPOINTS: &[(f64, u8)] = &[
    (0.005, 3),
    (0.01, 4),
    (0.02, 5),
    (0.05, 6),
    (0.1, 7),
    (0.2, 8),
    (0.5, 9),
    (1.0, 10),
    (2.0, 11),
    (4.0, 12),
];

/// Zoom level for spans wider than the last breakpoint.
pub const MAX_ZOOM_LEVEL: u8 = 13;

/// Picks the zoom level for a span (degrees). Breakpoints are inclusive.
#[must_use]
pub fn zoom_level_for_span(span: f64) -> u8 {
    ZOOM_BREAKPOINTS
        .iter()
        .find(|(max_span, _)| span <= *max_span)
        .map_or(MAX_ZOOM_LEVEL, |(_, level)| *level)
}

/// Centers on the union bounding box of every polygon's vertices and
/// picks a zoom level from [`ZOOM_BREAKPOINTS`].
///
/// Empty polygons contribute nothing. With no vertices at all, returns
/// [`DEFAULT_VIEWPORT`].
#[must_use]
pub fn compute_viewport<'a>(polygons: impl IntoIterator<Item = &'a Polygon>) -> Viewport {
    let Some(rect) = bounding_rect(polygons.into_iter().flat_map(Polygon::points)) else {
        return DEFAULT_VIEWPORT;
    };

    let span = rect.width().max(rect.height());
    let center = rect.center();

    Viewport {
        center_lng: center.x,
        center_lat: center.y,
        zoom_level: zoom_level_for_span(span),
    }
}

#[cfg(test)]
mod tests {
    use territory_map_geometry_models::LngLat;

    use super::*;

    fn square(min_lng: f64, min_lat: f64, size: f64) -> Polygon {
        Polygon::new([
            LngLat::new(min_lng, min_lat),
            LngLat::new(min_lng + size, min_lat),
            LngLat::new(min_lng + size, min_lat + size),
            LngLat::new(min_lng, min_lat + size),
        ])
    }

    #[test]
    fn no_polygons_yield_default_viewport() {
        assert_eq!(
            compute_viewport(std::iter::empty::<&Polygon>()),
            DEFAULT_VIEWPORT
        );
        let empty = Polygon::empty();
        assert_eq!(compute_viewport([&empty]), DEFAULT_VIEWPORT);
    }

    #[test]
    fn centers_on_union_bounding_box() {
        let a = square(126.9, 37.5, 0.1);
        let b = square(127.1, 37.5, 0.1);
        let viewport = compute_viewport([&a, &b]);
        assert!((viewport.center_lng - 127.05).abs() < 1e-9);
        assert!((viewport.center_lat - 37.55).abs() < 1e-9);
        // span 0.3 degrees
        assert_eq!(viewport.zoom_level, 9);
    }

    #[test]
    fn uses_larger_of_the_two_spans() {
        let tall = Polygon::new([
            LngLat::new(127.0, 36.0),
            LngLat::new(127.01, 36.0),
            LngLat::new(127.01, 37.5),
        ]);
        assert_eq!(compute_viewport([&tall]).zoom_level, 11);
    }

    #[test]
    fn zoom_ladder_thresholds() {
        assert_eq!(zoom_level_for_span(0.0), 3);
        assert_eq!(zoom_level_for_span(0.005), 3);
        assert_eq!(zoom_level_for_span(0.006), 4);
        assert_eq!(zoom_level_for_span(0.05), 6);
        assert_eq!(zoom_level_for_span(1.5), 11);
        assert_eq!(zoom_level_for_span(4.0), 12);
        assert_eq!(zoom_level_for_span(8.0), MAX_ZOOM_LEVEL);
    }

    #[test]
    fn breakpoints_are_ascending() {
        for pair in ZOOM_BREAKPOINTS.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert!(pair[0].1 < pair[1].1);
        }
    }
}
