//! Splits a shared topology object into per-geometry features.
//!
//! The bulk area upload walks every geometry of one object, stores a
//! [`TopologyReference`] per geometry, and keeps the topology itself as a
//! shared file. [`split_object`] performs the walk and decodes each
//! boundary so callers can build areas directly or write references.

use serde_json::{Map, Value};
use territory_map_geometry_models::Polygon;
use territory_map_topology_models::{Topology, TopologyReference};

use crate::decode::decode_geometry;

/// One polygonal geometry of a topology object.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyFeature {
    /// Position within the object's geometries.
    pub index: usize,
    pub properties: Map<String, Value>,
    pub polygon: Polygon,
}

impl TopologyFeature {
    /// A compact reference to this feature, for storing with an area.
    #[must_use]
    pub fn to_reference(&self, object_key: &str, source: Option<&str>) -> TopologyReference {
        TopologyReference {
            geometry_index: self.index,
            object_key: object_key.to_string(),
            properties: self.properties.clone(),
            source: source.map(str::to_string),
        }
    }
}

/// Decodes every polygonal geometry of an object (the first object when
/// `object_key` is `None`).
///
/// Non-polygonal geometries are skipped but keep their slot in the
/// numbering, so each [`TopologyFeature::index`] stays a valid
/// `geometryIndex` into the original object.
#[must_use]
pub fn split_object(topology: &Topology, object_key: Option<&str>) -> Vec<TopologyFeature> {
    let Some(object) = topology.object(object_key) else {
        log::warn!(
            "Topology has no object {}",
            object_key.unwrap_or("(first)")
        );
        return Vec::new();
    };

    let features: Vec<TopologyFeature> = object
        .members()
        .iter()
        .enumerate()
        .filter_map(|(index, geometry)| {
            let properties = geometry.properties()?.clone();
            Some(TopologyFeature {
                index,
                properties,
                polygon: decode_geometry(geometry, topology),
            })
        })
        .collect();

    let empty = features.iter().filter(|f| f.polygon.is_empty()).count();
    if empty > 0 {
        log::warn!(
            "{empty} of {} geometries decoded to an empty boundary",
            features.len()
        );
    }

    features
}
