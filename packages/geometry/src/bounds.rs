//! Service-area bounds and bounding rectangles.

use std::ops::RangeInclusive;

use geo::{BoundingRect, MultiPoint, Point, Rect};
use territory_map_geometry_models::LngLat;

/// Latitudes covered by the service area (South Korea).
pub const SERVICE_LAT_RANGE: RangeInclusive<f64> = 33.0..=43.0;

/// Longitudes covered by the service area (South Korea).
pub const SERVICE_LNG_RANGE: RangeInclusive<f64> = 124.0..=132.0;

/// Coarse sanity check for partner coordinates. This is a pre-filter
/// for obviously wrong data, not a substitute for containment.
#[must_use]
pub fn within_service_bounds(point: LngLat) -> bool {
    point.is_finite()
        && SERVICE_LAT_RANGE.contains(&point.lat)
        && SERVICE_LNG_RANGE.contains(&point.lng)
}

/// Bounding rectangle of a set of vertices, or `None` if there are none.
#[must_use]
pub fn bounding_rect<'a>(points: impl IntoIterator<Item = &'a LngLat>) -> Option<Rect<f64>> {
    let multi: MultiPoint<f64> = points
        .into_iter()
        .filter(|p| p.is_finite())
        .map(|p| Point::new(p.lng, p.lat))
        .collect();

    multi.bounding_rect()
}
