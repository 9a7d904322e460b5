#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `TopoJSON` topology types and stored geometry references.
//!
//! A [`Topology`] stores boundaries as shared, delta-encoded arcs plus an
//! optional affine [`Transform`]. Areas persisted by the bulk upload do
//! not embed a topology; they carry a [`TopologyReference`] naming a
//! geometry inside a separately loaded shared topology.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One arc: a list of positions. The first position is absolute, each
/// later one is a delta from the previous decoded position.
pub type TopoArc = Vec<Vec<f64>>;

/// A `TopoJSON` topology.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default, deserialize_with = "null_as_default")]
    pub arcs: Vec<TopoArc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    /// Named geometry objects, usually one `GeometryCollection` each.
    pub objects: BTreeMap<String, TopoGeometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
}

impl Topology {
    /// Looks up a named object. With no key, returns the first object in
    /// key order.
    #[must_use]
    pub fn object(&self, key: Option<&str>) -> Option<&TopoGeometry> {
        match key {
            Some(key) => self.objects.get(key),
            None => self.objects.values().next(),
        }
    }

    /// The key of the first object in key order.
    #[must_use]
    pub fn first_object_key(&self) -> Option<&str> {
        self.objects.keys().next().map(String::as_str)
    }
}

/// Affine transform from quantized to real coordinates:
/// `(x * sx + tx, y * sy + ty)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Transform {
    #[must_use]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x.mul_add(self.scale[0], self.translate[0]),
            y.mul_add(self.scale[1], self.translate[1]),
        )
    }
}

/// A geometry inside a topology object.
///
/// Arc indices may be negative: `!i` (the bitwise complement of `i`)
/// means arc `i` traversed in reverse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TopoGeometry {
    Polygon(PolygonGeometry),
    MultiPolygon(MultiPolygonGeometry),
    GeometryCollection(GeometryCollection),
    /// Points, lines, and anything else. Carries no boundary.
    #[serde(other)]
    Unsupported,
}

impl TopoGeometry {
    /// The geometry's properties, if it is a polygonal geometry.
    #[must_use]
    pub const fn properties(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Polygon(g) => Some(&g.properties),
            Self::MultiPolygon(g) => Some(&g.properties),
            Self::GeometryCollection(_) | Self::Unsupported => None,
        }
    }

    /// Member geometries of a collection. A non-collection geometry is its
    /// own single member.
    #[must_use]
    pub fn members(&self) -> &[Self] {
        match self {
            Self::GeometryCollection(c) => &c.geometries,
            other => std::slice::from_ref(other),
        }
    }
}

/// A polygon: a list of rings, each a list of arc indices. The first ring
/// is the outer boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeometry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub arcs: Vec<Vec<i64>>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Map::is_empty"
    )]
    pub properties: Map<String, Value>,
}

/// A multi-polygon: a list of polygons, each a list of rings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiPolygonGeometry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub arcs: Vec<Vec<Vec<i64>>>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Map::is_empty"
    )]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryCollection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub geometries: Vec<TopoGeometry>,
}

/// A stored pointer to one geometry of a shared topology.
///
/// Written by the bulk area upload in place of a full topology to keep
/// area rows small.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyReference {
    /// Index into the referenced object's `geometries`.
    pub geometry_index: usize,
    /// Key of the object within the shared topology.
    pub object_key: String,
    /// Geometry properties cached at upload time.
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Map<String, Value>,
    /// Name of the shared topology. `None` means the default one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// The `topojson` field of a stored area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AreaTopology {
    Reference(TopologyReference),
    Inline(Box<Topology>),
}
