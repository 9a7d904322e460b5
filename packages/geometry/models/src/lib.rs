#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate, polygon, and viewport types.
//!
//! These types are the canonical geometry shared by every stage of the
//! territory pipeline. Raw, heterogeneous coordinate data is classified
//! into a [`RawCoordinateSet`] once at ingestion and normalized into a
//! [`Polygon`], which is immutable from then on.

use serde::{Deserialize, Serialize};

/// Minimum number of valid vertices for a ring to be usable as a boundary.
pub const MIN_RING_POINTS: usize = 3;

/// A longitude/latitude pair in decimal degrees.
///
/// Serialized as a `[lng, lat]` array, which is what map renderers expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    /// Longitude (x).
    pub lng: f64,
    /// Latitude (y).
    pub lat: f64,
}

impl LngLat {
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Both components are finite (not NaN, not infinite).
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(value: LngLat) -> Self {
        [value.lng, value.lat]
    }
}

impl From<(f64, f64)> for LngLat {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self { lng, lat }
    }
}

/// A single boundary ring of `(lng, lat)` vertices.
///
/// A polygon is either empty or holds at least [`MIN_RING_POINTS`] finite
/// vertices. The ring may be explicitly closed (last vertex repeats the
/// first) or implicitly closed; both are treated the same.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LngLat>", into = "Vec<LngLat>")]
pub struct Polygon {
    ring: Vec<LngLat>,
}

impl Polygon {
    /// Builds a polygon from candidate vertices.
    ///
    /// Non-finite vertices are dropped. If fewer than [`MIN_RING_POINTS`]
    /// vertices remain, the result is the empty polygon.
    #[must_use]
    pub fn new(points: impl IntoIterator<Item = LngLat>) -> Self {
        let ring: Vec<LngLat> = points.into_iter().filter(LngLat::is_finite).collect();

        if ring.len() < MIN_RING_POINTS {
            return Self::empty();
        }

        Self { ring }
    }

    /// The empty polygon, meaning "no boundary available".
    #[must_use]
    pub const fn empty() -> Self {
        Self { ring: Vec::new() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// The ring's vertices in order.
    #[must_use]
    pub fn points(&self) -> &[LngLat] {
        &self.ring
    }

    /// Iterates over the ring's edges as `(current, previous)` vertex pairs,
    /// starting with the edge that closes the ring.
    pub fn edges(&self) -> impl Iterator<Item = (LngLat, LngLat)> + '_ {
        let n = self.ring.len();
        (0..n).map(move |i| (self.ring[i], self.ring[(i + n - 1) % n]))
    }
}

impl From<Vec<LngLat>> for Polygon {
    fn from(points: Vec<LngLat>) -> Self {
        Self::new(points)
    }
}

impl From<Polygon> for Vec<LngLat> {
    fn from(polygon: Polygon) -> Self {
        polygon.ring
    }
}

/// Raw coordinate data, classified once by the shape of its first element.
///
/// Classification happens at ingestion; normalization consumes the
/// classified value without re-inspecting its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCoordinateSet {
    /// Absent, `null`, or an empty array.
    Empty,
    /// `[{ "lat": .., "lng": .. }, ...]`
    LatLngObjects(Vec<serde_json::Value>),
    /// `[[lng, lat], ...]`
    LngLatPairs(Vec<serde_json::Value>),
    /// `[[[lng, lat], ...], ...]`, a `GeoJSON` polygon's rings. Only the
    /// first (outer) ring is used.
    NestedRings(Vec<serde_json::Value>),
    /// Any other shape, including a single flat `[lng, lat]` pair.
    Unrecognized,
}

impl RawCoordinateSet {
    /// Short name of the detected shape, for logging.
    #[must_use]
    pub const fn shape_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::LatLngObjects(_) => "lat/lng objects",
            Self::LngLatPairs(_) => "lng/lat pairs",
            Self::NestedRings(_) => "nested rings",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// A map viewport: center point and zoom level.
///
/// Zoom levels follow the Kakao Maps convention, where a larger number is
/// more zoomed out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Center longitude.
    pub center_lng: f64,
    /// Center latitude.
    pub center_lat: f64,
    /// Map zoom level.
    pub zoom_level: u8,
}
