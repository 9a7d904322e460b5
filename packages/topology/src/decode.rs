//! Arc decoding and ring assembly.
//!
//! Each arc is a cumulative sum of its positions: the first position is
//! absolute and every following one is a delta from the previous decoded
//! position. When the topology has a transform, it is applied to every
//! accumulated position. Rings are assembled by concatenating their arcs
//! and dropping the first point of every arc after the first, since
//! consecutive arcs share that endpoint.
//!
//! Only outer boundaries are decoded: the first ring of a `Polygon`, and
//! the first ring of the first polygon of a `MultiPolygon`. Holes and
//! additional parts are ignored.

use serde_json::{Map, Value};
use territory_map_geometry_models::{LngLat, Polygon};
use territory_map_topology_models::{AreaTopology, TopoGeometry, Topology, Transform};

use crate::cache::TopologyCache;

/// Decodes one delta-encoded arc into absolute positions.
///
/// Positions with fewer than two components are skipped and do not move
/// the running position.
#[must_use]
pub fn decode_arc(arc: &[Vec<f64>], transform: Option<&Transform>) -> Vec<LngLat> {
    let (mut x, mut y) = (0.0_f64, 0.0_f64);

    arc.iter()
        .filter_map(|position| {
            let (dx, dy) = (*position.first()?, *position.get(1)?);
            x += dx;
            y += dy;
            let (lng, lat) = transform.map_or((x, y), |t| t.apply(x, y));
            Some(LngLat::new(lng, lat))
        })
        .collect()
}

/// Decodes the arc at `index`, reversed if the index is a bitwise
/// complement (negative).
fn resolve_arc(index: i64, topology: &Topology) -> Option<Vec<LngLat>> {
    let (arc_index, reversed) = if index < 0 {
        (!index, true)
    } else {
        (index, false)
    };

    let arc = usize::try_from(arc_index)
        .ok()
        .and_then(|i| topology.arcs.get(i))?;

    let mut points = decode_arc(arc, topology.transform.as_ref());
    if reversed {
        points.reverse();
    }
    Some(points)
}

/// Assembles a ring from arc indices.
///
/// Out-of-range indices are skipped.
#[must_use]
pub fn decode_geometry_ring(arc_indices: &[i64], topology: &Topology) -> Polygon {
    let mut ring: Vec<LngLat> = Vec::new();

    for &index in arc_indices {
        let Some(points) = resolve_arc(index, topology) else {
            log::debug!(
                "Arc index {index} out of range (topology has {} arcs)",
                topology.arcs.len()
            );
            continue;
        };

        let shared_endpoint = usize::from(!ring.is_empty());
        ring.extend(points.into_iter().skip(shared_endpoint));
    }

    Polygon::new(ring)
}

/// Decodes the outer boundary of a polygonal geometry.
#[must_use]
pub fn decode_geometry(geometry: &TopoGeometry, topology: &Topology) -> Polygon {
    let outer_ring = match geometry {
        TopoGeometry::Polygon(polygon) => polygon.arcs.first(),
        TopoGeometry::MultiPolygon(multi) => multi.arcs.first().and_then(|rings| rings.first()),
        TopoGeometry::GeometryCollection(_) | TopoGeometry::Unsupported => None,
    };

    outer_ring.map_or_else(Polygon::empty, |ring| decode_geometry_ring(ring, topology))
}

/// Decodes the first geometry of an object (the first object when `key`
/// is `None`).
#[must_use]
pub fn decode_object(topology: &Topology, key: Option<&str>) -> Polygon {
    topology
        .object(key)
        .and_then(|object| object.members().first())
        .map_or_else(Polygon::empty, |geometry| {
            decode_geometry(geometry, topology)
        })
}

/// A decoded area boundary with the properties found alongside it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedBoundary {
    pub polygon: Polygon,
    pub properties: Map<String, Value>,
}

/// Decodes stored area topologies, resolving references through a
/// shared [`TopologyCache`].
#[derive(Debug, Clone, Copy)]
pub struct TopologyDecoder<'a> {
    cache: &'a TopologyCache,
}

impl<'a> TopologyDecoder<'a> {
    #[must_use]
    pub const fn new(cache: &'a TopologyCache) -> Self {
        Self { cache }
    }

    /// Decodes an area's stored topology.
    ///
    /// For a reference, the cached properties stored with the reference
    /// take precedence over the shared geometry's own properties. An
    /// unresolvable reference yields an empty polygon with the cached
    /// properties.
    #[must_use]
    pub fn decode(&self, topology: &AreaTopology) -> DecodedBoundary {
        match topology {
            AreaTopology::Inline(inline) => {
                let geometry = inline.object(None).and_then(|o| o.members().first());
                DecodedBoundary {
                    polygon: geometry
                        .map_or_else(Polygon::empty, |g| decode_geometry(g, inline)),
                    properties: geometry
                        .and_then(TopoGeometry::properties)
                        .cloned()
                        .unwrap_or_default(),
                }
            }
            AreaTopology::Reference(reference) => {
                let mut properties = reference.properties.clone();

                let Some((shared, geometry)) = self.cache.resolve(reference) else {
                    log::debug!(
                        "Unresolved topology reference {}[{}] (source: {})",
                        reference.object_key,
                        reference.geometry_index,
                        reference.source.as_deref().unwrap_or("default"),
                    );
                    return DecodedBoundary {
                        polygon: Polygon::empty(),
                        properties,
                    };
                };

                if let Some(own) = geometry.properties() {
                    for (key, value) in own {
                        properties
                            .entry(key.clone())
                            .or_insert_with(|| value.clone());
                    }
                }

                DecodedBoundary {
                    polygon: decode_geometry(geometry, shared),
                    properties,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use territory_map_topology_models::{
        GeometryCollection, MultiPolygonGeometry, PolygonGeometry, TopologyReference,
    };

    use super::*;

    fn delta_encode(points: &[(f64, f64)]) -> Vec<Vec<f64>> {
        let mut previous = (0.0, 0.0);
        points
            .iter()
            .map(|&(x, y)| {
                let delta = vec![x - previous.0, y - previous.1];
                previous = (x, y);
                delta
            })
            .collect()
    }

    fn assert_points_close(actual: &[LngLat], expected: &[(f64, f64)]) {
        assert_eq!(actual.len(), expected.len());
        for (a, &(x, y)) in actual.iter().zip(expected) {
            assert!((a.lng - x).abs() < 1e-9, "{a:?} != ({x}, {y})");
            assert!((a.lat - y).abs() < 1e-9, "{a:?} != ({x}, {y})");
        }
    }

    fn topology_with_arcs(arcs: Vec<Vec<Vec<f64>>>, transform: Option<Transform>) -> Topology {
        Topology {
            arcs,
            transform,
            ..Topology::default()
        }
    }

    #[test]
    fn decode_arc_recovers_delta_encoded_points() {
        let points = [(126.95, 37.55), (126.97, 37.56), (126.99, 37.52), (126.93, 37.50)];
        let decoded = decode_arc(&delta_encode(&points), None);
        assert_points_close(&decoded, &points);
    }

    #[test]
    fn decode_arc_applies_transform_to_accumulated_points() {
        let transform = Transform {
            scale: [0.001, 0.002],
            translate: [126.0, 37.0],
        };
        let quantized = [(0.0, 0.0), (100.0, 50.0), (250.0, 75.0)];
        let decoded = decode_arc(&delta_encode(&quantized), Some(&transform));

        let expected: Vec<(f64, f64)> = quantized
            .iter()
            .map(|&(x, y)| (x * 0.001 + 126.0, y * 0.002 + 37.0))
            .collect();
        assert_points_close(&decoded, &expected);
    }

    #[test]
    fn decode_arc_skips_malformed_positions() {
        let arc = vec![vec![1.0, 1.0], vec![2.0], vec![1.0, 1.0]];
        let decoded = decode_arc(&arc, None);
        assert_points_close(&decoded, &[(1.0, 1.0), (2.0, 2.0)]);
    }

    #[test]
    fn splicing_drops_shared_endpoint() {
        let a = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)];
        let b = [(1.0, 1.0), (0.5, 1.5), (0.0, 1.0), (0.0, 0.0)];
        let topology = topology_with_arcs(vec![delta_encode(&a), delta_encode(&b)], None);

        let ring = decode_geometry_ring(&[0, 1], &topology);
        assert_eq!(ring.len(), a.len() + b.len() - 1);
        assert_points_close(
            ring.points(),
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.5, 1.5), (0.0, 1.0), (0.0, 0.0)],
        );
    }

    #[test]
    fn complemented_index_reverses_arc() {
        let points = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];
        let topology = topology_with_arcs(vec![vec![], delta_encode(&points)], None);

        let forward = decode_geometry_ring(&[1], &topology);
        let reversed = decode_geometry_ring(&[!1], &topology);

        let mut expected: Vec<LngLat> = forward.points().to_vec();
        expected.reverse();
        assert_eq!(reversed.points(), expected.as_slice());
        assert_eq!(!1_i64, -2);
    }

    #[test]
    fn out_of_range_arcs_are_skipped() {
        let points = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)];
        let topology = topology_with_arcs(vec![delta_encode(&points)], None);
        let ring = decode_geometry_ring(&[7, 0, !9], &topology);
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn multipolygon_uses_first_ring_of_first_polygon() {
        let outer = [(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 0.0)];
        let other = [(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 5.0)];
        let topology = topology_with_arcs(vec![delta_encode(&outer), delta_encode(&other)], None);

        let geometry = TopoGeometry::MultiPolygon(MultiPolygonGeometry {
            arcs: vec![vec![vec![0]], vec![vec![1]]],
            properties: Map::new(),
        });
        let polygon = decode_geometry(&geometry, &topology);
        assert_points_close(polygon.points(), &outer);
    }

    #[test]
    fn missing_objects_or_arcs_yield_empty_polygon() {
        let empty = Topology::default();
        assert!(decode_object(&empty, None).is_empty());

        let mut topology = topology_with_arcs(vec![], None);
        topology.objects.insert(
            "areas".to_string(),
            TopoGeometry::GeometryCollection(GeometryCollection {
                geometries: vec![TopoGeometry::Polygon(PolygonGeometry::default())],
            }),
        );
        assert!(decode_object(&topology, Some("areas")).is_empty());
        assert!(decode_object(&topology, Some("missing")).is_empty());
    }

    fn shared_topology() -> Topology {
        serde_json::from_value(json!({
            "type": "Topology",
            "transform": { "scale": [0.01, 0.01], "translate": [126.9, 37.5] },
            "arcs": [
                [[0, 0], [10, 0], [0, 10], [-10, 0], [0, -10]],
                [[0, 0], [5, 0], [0, 5], [-5, -5]]
            ],
            "objects": {
                "seoul": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "arcs": [[0]], "properties": { "adm_cd": "11010", "adm_nm": "A" } },
                        { "type": "Polygon", "arcs": [[1]], "properties": { "adm_cd": "11020", "adm_nm": "B" } }
                    ]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn decoder_resolves_reference_through_cache() {
        let cache = TopologyCache::new().with_topology("seoul-areas", shared_topology());
        let decoder = TopologyDecoder::new(&cache);

        let reference = AreaTopology::Reference(TopologyReference {
            geometry_index: 1,
            object_key: "seoul".to_string(),
            properties: serde_json::from_value(json!({ "adm_nm": "cached" })).unwrap(),
            source: None,
        });

        let decoded = decoder.decode(&reference);
        assert_points_close(
            decoded.polygon.points(),
            &[(126.9, 37.5), (126.95, 37.5), (126.95, 37.55), (126.9, 37.5)],
        );
        assert_eq!(decoded.properties["adm_nm"], json!("cached"));
        assert_eq!(decoded.properties["adm_cd"], json!("11020"));
    }

    #[test]
    fn unresolved_reference_keeps_cached_properties() {
        let cache = TopologyCache::new();
        let decoder = TopologyDecoder::new(&cache);
        let reference = AreaTopology::Reference(TopologyReference {
            geometry_index: 0,
            object_key: "seoul".to_string(),
            properties: serde_json::from_value(json!({ "adm_cd": "11010" })).unwrap(),
            source: Some("nowhere".to_string()),
        });

        let decoded = decoder.decode(&reference);
        assert!(decoded.polygon.is_empty());
        assert_eq!(decoded.properties["adm_cd"], json!("11010"));
    }

    #[test]
    fn decoder_uses_first_geometry_of_inline_topology() {
        let cache = TopologyCache::new();
        let decoder = TopologyDecoder::new(&cache);
        let decoded = decoder.decode(&AreaTopology::Inline(Box::new(shared_topology())));
        assert_eq!(decoded.polygon.len(), 5);
        assert_eq!(decoded.properties["adm_nm"], json!("A"));
    }
}
