//! Builds validated areas and partner locations from stored records.
//!
//! Boundaries are taken from the first source that yields a non-empty
//! polygon, in order: `coordinates`, `topojson`, `geojson`. Records that
//! share an administrative code are collapsed and the first one wins.

use std::collections::BTreeSet;

use geojson::GeoJson;
use serde_json::{Map, Value};
use territory_map_area_models::{Area, AreaRecord, PartnerLocation, PartnerRecord, code_text};
use territory_map_geometry::normalize::{normalize_value, parse_number};
use territory_map_geometry_models::{LngLat, Polygon};
use territory_map_topology::TopologyDecoder;
use territory_map_topology::features::{TopologyFeature, split_object};
use territory_map_topology_models::{AreaTopology, Topology};

/// Property keys holding an administrative code.
const CODE_KEYS: &[&str] = &["adm_cd", "ADM_CD", "admCd"];

/// Property keys holding a display name, in preference order.
const NAME_KEYS: &[&str] = &["ADM_NM", "adm_nm", "name", "DONG_NM", "dong_nm"];

/// Parses a value that may be JSON serialized into a string.
fn unwrap_json_string(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) => serde_json::from_str(&s).ok(),
        other => Some(other),
    }
}

fn properties_map(value: Option<Value>) -> Map<String, Value> {
    match value.and_then(unwrap_json_string) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn text_property(properties: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match properties.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn code_property(properties: &Map<String, Value>) -> Option<String> {
    CODE_KEYS
        .iter()
        .find_map(|key| properties.get(*key).and_then(code_text))
}

fn parse_topology(value: Option<Value>) -> Option<AreaTopology> {
    let value = value.and_then(unwrap_json_string)?;
    match serde_json::from_value(value) {
        Ok(topology) => Some(topology),
        Err(e) => {
            log::debug!("Ignoring unrecognized topojson value: {e}");
            None
        }
    }
}

/// Outer ring of a `GeoJSON` `Polygon` or `MultiPolygon`, given as a bare
/// geometry or wrapped in a feature.
fn geojson_polygon(value: Option<Value>) -> Polygon {
    let Some(value) = value.and_then(unwrap_json_string) else {
        return Polygon::empty();
    };

    let geometry = match serde_json::from_value::<GeoJson>(value) {
        Ok(GeoJson::Geometry(geometry)) => geometry,
        Ok(GeoJson::Feature(feature)) => match feature.geometry {
            Some(geometry) => geometry,
            None => return Polygon::empty(),
        },
        Ok(GeoJson::FeatureCollection(_)) => {
            log::debug!("Ignoring GeoJSON feature collection on a single area");
            return Polygon::empty();
        }
        Err(e) => {
            log::debug!("Ignoring invalid GeoJSON value: {e}");
            return Polygon::empty();
        }
    };

    let exterior = match geo::Geometry::<f64>::try_from(geometry) {
        Ok(geo::Geometry::Polygon(polygon)) => polygon.exterior().clone(),
        Ok(geo::Geometry::MultiPolygon(multi)) => match multi.0.first() {
            Some(polygon) => polygon.exterior().clone(),
            None => return Polygon::empty(),
        },
        Ok(_) | Err(_) => return Polygon::empty(),
    };

    Polygon::new(exterior.coords().map(|c| LngLat::new(c.x, c.y)))
}

/// Builds one area from a stored record.
///
/// The record's own properties win over properties found alongside its
/// topology. The administrative code falls back to `properties.adm_cd`
/// and the name to the usual name properties, then to `구역 {code|id}`.
#[must_use]
pub fn build_area(record: AreaRecord, decoder: &TopologyDecoder<'_>) -> Area {
    let AreaRecord {
        id,
        name,
        coordinates,
        topojson,
        geojson,
        administrative_code,
        properties,
    } = record;

    let mut raw_properties = properties_map(properties);

    let decoded = parse_topology(topojson).map(|topology| decoder.decode(&topology));
    if let Some(decoded) = &decoded {
        for (key, value) in &decoded.properties {
            raw_properties
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    let mut polygon = normalize_value(coordinates);
    if polygon.is_empty() {
        polygon = decoded.map(|d| d.polygon).unwrap_or_default();
    }
    if polygon.is_empty() {
        polygon = geojson_polygon(geojson);
    }

    let administrative_code =
        administrative_code.or_else(|| code_property(&raw_properties));
    let id = id
        .or_else(|| administrative_code.clone())
        .unwrap_or_default();
    let name = name
        .or_else(|| text_property(&raw_properties, NAME_KEYS))
        .unwrap_or_else(|| format!("구역 {}", administrative_code.as_deref().unwrap_or(&id)));

    if polygon.is_empty() {
        log::debug!("Area {id} ({name}) has no usable boundary");
    }

    Area {
        id,
        name,
        polygon,
        administrative_code,
        raw_properties,
    }
}

/// Drops areas whose key (administrative code, else id) was already seen.
fn dedup_areas(areas: impl IntoIterator<Item = Area>) -> Vec<Area> {
    let mut seen: BTreeSet<String> = BTreeSet::new();

    areas
        .into_iter()
        .filter(|area| {
            let key = area.administrative_code.as_deref().unwrap_or(&area.id);
            key.is_empty() || seen.insert(key.to_string())
        })
        .collect()
}

/// Builds areas from stored records, collapsing duplicates.
#[must_use]
pub fn build_areas(
    records: impl IntoIterator<Item = AreaRecord>,
    decoder: &TopologyDecoder<'_>,
) -> Vec<Area> {
    let built: Vec<Area> = records
        .into_iter()
        .map(|record| build_area(record, decoder))
        .collect();
    let total = built.len();

    let areas = dedup_areas(built);
    let without_boundary = areas.iter().filter(|a| a.polygon.is_empty()).count();

    log::info!(
        "Built {} areas from {total} records ({} duplicates, {without_boundary} without boundary)",
        areas.len(),
        total - areas.len(),
    );

    areas
}

/// Id, name, and administrative code of one geometry of a shared
/// topology object.
fn feature_identity(
    object_key: &str,
    feature: &TopologyFeature,
) -> (String, String, Option<String>) {
    let administrative_code = code_property(&feature.properties);
    let id = administrative_code
        .clone()
        .unwrap_or_else(|| format!("{object_key}-{}", feature.index));
    let name =
        text_property(&feature.properties, NAME_KEYS).unwrap_or_else(|| format!("구역 {id}"));
    (id, name, administrative_code)
}

/// Builds one area per polygonal geometry of a shared topology object,
/// the way the bulk area upload does.
#[must_use]
pub fn areas_from_topology(topology: &Topology, object_key: Option<&str>) -> Vec<Area> {
    let key = object_key
        .or_else(|| topology.first_object_key())
        .unwrap_or_default();

    let areas = split_object(topology, object_key).into_iter().map(|feature| {
        let (id, name, administrative_code) = feature_identity(key, &feature);
        Area {
            id,
            name,
            polygon: feature.polygon,
            administrative_code,
            raw_properties: feature.properties,
        }
    });

    let areas = dedup_areas(areas);
    log::info!("Split topology object '{key}' into {} areas", areas.len());
    areas
}

/// Area records for storage, one per polygonal geometry of a shared
/// topology object. Each record points into the topology named `source`
/// (the default one for `None`) instead of embedding its boundary.
#[must_use]
pub fn area_records_from_topology(
    topology: &Topology,
    object_key: Option<&str>,
    source: Option<&str>,
) -> Vec<AreaRecord> {
    let key = object_key
        .or_else(|| topology.first_object_key())
        .unwrap_or_default();

    let records: Vec<AreaRecord> = split_object(topology, object_key)
        .iter()
        .filter_map(|feature| {
            let reference = match serde_json::to_value(feature.to_reference(key, source)) {
                Ok(reference) => reference,
                Err(e) => {
                    log::warn!(
                        "Failed to serialize reference to geometry {}: {e}",
                        feature.index
                    );
                    return None;
                }
            };
            let (id, name, administrative_code) = feature_identity(key, feature);

            Some(AreaRecord {
                id: Some(id),
                name: Some(name),
                topojson: Some(reference),
                administrative_code,
                ..AreaRecord::default()
            })
        })
        .collect();

    log::info!(
        "Prepared {} area records referencing topology object '{key}'",
        records.len()
    );
    records
}

/// Parses one partner's coordinates. Returns `None` when either
/// coordinate is missing, non-numeric, not finite, or zero.
#[must_use]
pub fn partner_location(record: PartnerRecord, fallback_id: usize) -> Option<PartnerLocation> {
    let coordinate = |value: Option<&Value>| value.and_then(parse_number).filter(|n| *n != 0.0);

    let latitude = coordinate(record.latitude.as_ref())?;
    let longitude = coordinate(record.longitude.as_ref())?;

    Some(PartnerLocation {
        id: record
            .id
            .unwrap_or_else(|| format!("partner-{fallback_id}")),
        name: record.name,
        longitude,
        latitude,
        manager_id: record.manager_id,
        manager_name: record.manager_name,
    })
}

/// Parses partner records, skipping those without usable coordinates.
#[must_use]
pub fn partner_locations(records: impl IntoIterator<Item = PartnerRecord>) -> Vec<PartnerLocation> {
    let mut skipped = 0_usize;

    let partners: Vec<PartnerLocation> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let location = partner_location(record, index);
            if location.is_none() {
                skipped += 1;
            }
            location
        })
        .collect();

    if skipped > 0 {
        log::warn!("Skipped {skipped} partners without usable coordinates");
    }
    log::debug!("Parsed {} partner locations", partners.len());

    partners
}
