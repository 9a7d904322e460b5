//! Classifies and normalizes raw coordinate data into [`Polygon`] rings.
//!
//! Stored areas carry their boundary in whichever shape the importing
//! script happened to write: `{lat, lng}` objects, `[lng, lat]` pairs,
//! `GeoJSON` polygon rings, or the same thing serialized into a string.
//! [`classify`] inspects the first element once and tags the data;
//! [`normalize`] then maps the tagged elements to vertices, skipping any
//! element whose coordinates are missing, non-numeric, or not finite.

use serde_json::{Map, Value};
use territory_map_geometry_models::{LngLat, Polygon, RawCoordinateSet};

const LAT_KEYS: &[&str] = &["lat", "latitude"];
const LNG_KEYS: &[&str] = &["lng", "lon", "longitude"];

/// Parses a JSON number or numeric string. Returns `None` if the value is
/// neither, or if it is not finite.
#[must_use]
pub fn parse_number(value: &Value) -> Option<f64> {
    numeric(value).filter(|n| n.is_finite())
}

/// Like [`parse_number`], but keeps NaN and infinities. Used for shape
/// detection, where "looks numeric" matters more than validity.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn is_lat_lng_object(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|o| field(o, LAT_KEYS).is_some() && field(o, LNG_KEYS).is_some())
}

fn is_numeric_pair(items: &[Value]) -> bool {
    items.len() >= 2 && items[..2].iter().all(|v| numeric(v).is_some())
}

/// Classifies raw coordinate data by the shape of its first element.
///
/// A string is parsed as JSON first. A single flat `[lng, lat]` pair is
/// [`RawCoordinateSet::Unrecognized`]: one point cannot be told apart
/// from a degenerate ring, so it is never promoted to a boundary.
#[must_use]
pub fn classify(raw: Option<Value>) -> RawCoordinateSet {
    let Some(raw) = raw else {
        return RawCoordinateSet::Empty;
    };

    match raw {
        Value::Null => RawCoordinateSet::Empty,
        Value::String(s) if s.trim().is_empty() => RawCoordinateSet::Empty,
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(parsed @ (Value::Array(_) | Value::Null)) => classify(Some(parsed)),
            Ok(_) => RawCoordinateSet::Unrecognized,
            Err(e) => {
                log::debug!("Coordinate string is not valid JSON: {e}");
                RawCoordinateSet::Unrecognized
            }
        },
        Value::Array(items) => classify_items(items),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => RawCoordinateSet::Unrecognized,
    }
}

fn classify_items(items: Vec<Value>) -> RawCoordinateSet {
    let Some(first) = items.first() else {
        return RawCoordinateSet::Empty;
    };

    if is_lat_lng_object(first) {
        return RawCoordinateSet::LatLngObjects(items);
    }

    match first {
        Value::Array(inner) if is_numeric_pair(inner) => RawCoordinateSet::LngLatPairs(items),
        Value::Array(inner) if inner.first().is_some_and(Value::is_array) => {
            RawCoordinateSet::NestedRings(items)
        }
        _ => RawCoordinateSet::Unrecognized,
    }
}

fn lat_lng_object(value: &Value) -> Option<LngLat> {
    let object = value.as_object()?;
    let lat = parse_number(field(object, LAT_KEYS)?)?;
    let lng = parse_number(field(object, LNG_KEYS)?)?;
    Some(LngLat::new(lng, lat))
}

fn lng_lat_pair(value: &Value) -> Option<LngLat> {
    let pair = value.as_array()?;
    let lng = parse_number(pair.first()?)?;
    let lat = parse_number(pair.get(1)?)?;
    Some(LngLat::new(lng, lat))
}

/// Maps classified coordinate data to a polygon ring.
///
/// Invalid elements are skipped; if fewer than three valid vertices
/// remain the result is the empty polygon.
#[must_use]
pub fn normalize(raw: &RawCoordinateSet) -> Polygon {
    match raw {
        RawCoordinateSet::Empty | RawCoordinateSet::Unrecognized => Polygon::empty(),
        RawCoordinateSet::LatLngObjects(items) => {
            Polygon::new(items.iter().filter_map(lat_lng_object))
        }
        RawCoordinateSet::LngLatPairs(items) => Polygon::new(items.iter().filter_map(lng_lat_pair)),
        RawCoordinateSet::NestedRings(rings) => rings
            .first()
            .and_then(Value::as_array)
            .map_or_else(Polygon::empty, |ring| {
                Polygon::new(ring.iter().filter_map(lng_lat_pair))
            }),
    }
}

/// Classifies and normalizes in one step.
#[must_use]
pub fn normalize_value(raw: Option<Value>) -> Polygon {
    let classified = classify(raw);
    if classified == RawCoordinateSet::Unrecognized {
        log::debug!("Unrecognized coordinate shape, treating as no boundary");
    }
    normalize(&classified)
}
