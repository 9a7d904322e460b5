//! Point-in-polygon containment by ray casting.
//!
//! A horizontal ray is cast from the test point and every edge crossing
//! toggles the inside/outside state. Horizontal edges never satisfy the
//! straddle test, so the crossing formula never divides by zero.
//!
//! Points lying exactly on an edge or vertex are contained. "Exactly"
//! means the `f64` cross product of the point against the edge evaluates
//! to zero and the point falls within the edge's extent; no tolerance is
//! applied.

use territory_map_geometry_models::{LngLat, MIN_RING_POINTS, Polygon};

/// Returns whether `point` lies inside `polygon` or on its boundary.
///
/// Returns `false` for a non-finite point or a polygon with fewer than
/// three vertices.
#[must_use]
pub fn contains(point: LngLat, polygon: &Polygon) -> bool {
    if !point.is_finite() || polygon.len() < MIN_RING_POINTS {
        return false;
    }

    let (x, y) = (point.lng, point.lat);
    let mut inside = false;

    for (current, previous) in polygon.edges() {
        if on_edge(point, current, previous) {
            return true;
        }

        let (xi, yi) = (current.lng, current.lat);
        let (xj, yj) = (previous.lng, previous.lat);

        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
    }

    inside
}

#[allow(clippy::float_cmp)]
fn on_edge(p: LngLat, a: LngLat, b: LngLat) -> bool {
    let cross = (b.lng - a.lng) * (p.lat - a.lat) - (b.lat - a.lat) * (p.lng - a.lng);
    if cross != 0.0 {
        return false;
    }

    p.lng >= a.lng.min(b.lng)
        && p.lng <= a.lng.max(b.lng)
        && p.lat >= a.lat.min(b.lat)
        && p.lat <= a.lat.max(b.lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        Polygon::new([
            LngLat::new(0.0, 0.0),
            LngLat::new(1.0, 0.0),
            LngLat::new(1.0, 1.0),
            LngLat::new(0.0, 1.0),
        ])
    }

    #[test]
    fn center_of_unit_square_is_inside() {
        assert!(contains(LngLat::new(0.5, 0.5), &unit_square()));
    }

    #[test]
    fn far_point_is_outside() {
        assert!(!contains(LngLat::new(2.0, 2.0), &unit_square()));
        assert!(!contains(LngLat::new(-0.5, 0.5), &unit_square()));
        assert!(!contains(LngLat::new(0.5, 1.5), &unit_square()));
    }

    #[test]
    fn non_finite_point_is_outside() {
        let square = unit_square();
        assert!(!contains(LngLat::new(f64::NAN, 0.5), &square));
        assert!(!contains(LngLat::new(0.5, f64::NAN), &square));
        assert!(!contains(LngLat::new(f64::INFINITY, 0.5), &square));
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let segment = Polygon::new([LngLat::new(0.0, 0.0), LngLat::new(1.0, 1.0)]);
        for point in [
            LngLat::new(0.0, 0.0),
            LngLat::new(0.5, 0.5),
            LngLat::new(1.0, 1.0),
            LngLat::new(0.2, 0.7),
        ] {
            assert!(!contains(point, &segment));
        }
        assert!(!contains(LngLat::new(0.0, 0.0), &Polygon::empty()));
    }

    #[test]
    fn boundary_points_are_contained() {
        let square = unit_square();
        // every side, including the right and top sides that plain ray
        // casting would report as outside
        assert!(contains(LngLat::new(0.0, 0.5), &square));
        assert!(contains(LngLat::new(1.0, 0.5), &square));
        assert!(contains(LngLat::new(0.5, 0.0), &square));
        assert!(contains(LngLat::new(0.5, 1.0), &square));
        // vertices
        assert!(contains(LngLat::new(1.0, 1.0), &square));
        assert!(contains(LngLat::new(0.0, 0.0), &square));
    }

    #[test]
    fn diagonal_edge_point_is_contained() {
        let triangle = Polygon::new([
            LngLat::new(0.0, 0.0),
            LngLat::new(1.0, 0.0),
            LngLat::new(1.0, 1.0),
        ]);
        assert!(contains(LngLat::new(0.5, 0.5), &triangle));
        assert!(!contains(LngLat::new(0.25, 0.5), &triangle));
    }

    #[test]
    fn collinear_point_beyond_edge_is_outside() {
        assert!(!contains(LngLat::new(1.5, 0.0), &unit_square()));
    }

    #[test]
    fn concave_polygon_notch_is_outside() {
        // U shape opening upward
        let u_shape = Polygon::new([
            LngLat::new(0.0, 0.0),
            LngLat::new(3.0, 0.0),
            LngLat::new(3.0, 3.0),
            LngLat::new(2.0, 3.0),
            LngLat::new(2.0, 1.0),
            LngLat::new(1.0, 1.0),
            LngLat::new(1.0, 3.0),
            LngLat::new(0.0, 3.0),
        ]);
        assert!(contains(LngLat::new(0.5, 2.0), &u_shape));
        assert!(contains(LngLat::new(2.5, 2.0), &u_shape));
        assert!(!contains(LngLat::new(1.5, 2.0), &u_shape));
        assert!(contains(LngLat::new(1.5, 0.5), &u_shape));
    }

    #[test]
    fn explicitly_closed_ring_behaves_like_open_ring() {
        let closed = Polygon::new([
            LngLat::new(0.0, 0.0),
            LngLat::new(1.0, 0.0),
            LngLat::new(1.0, 1.0),
            LngLat::new(0.0, 1.0),
            LngLat::new(0.0, 0.0),
        ]);
        assert!(contains(LngLat::new(0.5, 0.5), &closed));
        assert!(!contains(LngLat::new(1.5, 0.5), &closed));
    }
}
