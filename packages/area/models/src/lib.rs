#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Area and partner types.
//!
//! [`AreaRecord`] and [`PartnerRecord`] mirror what the storage layer hands
//! over: loosely typed, with nullable and stringly fields. Ingestion turns
//! them into the validated [`Area`] and [`PartnerLocation`] used by the
//! matching and aggregation stages.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use territory_map_geometry_models::{LngLat, Polygon};

/// Deserializes an optional identifier that may arrive as a string or a
/// number. Blank strings become `None`.
///
/// # Errors
///
/// Returns an error only if the input is not valid JSON.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// Deserializes an administrative code. Strings are kept verbatim so the
/// territory join stays an exact string comparison; numbers are rendered
/// as text. Blank strings become `None`.
///
/// # Errors
///
/// Returns an error only if the input is not valid JSON.
pub fn optional_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| code_text(&value)))
}

/// An administrative code from a JSON value, without trimming.
#[must_use]
pub fn code_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// An area as persisted by the storage layer.
///
/// At most one of `coordinates`, `topojson`, and `geojson` is usually
/// present, but older rows carry several.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaRecord {
    #[serde(default, deserialize_with = "optional_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub name: Option<String>,
    /// Any of the coordinate shapes understood by the normalizer, possibly
    /// serialized as a string.
    #[serde(default)]
    pub coordinates: Option<Value>,
    /// A full topology or a reference into a shared one, possibly
    /// serialized as a string.
    #[serde(default)]
    pub topojson: Option<Value>,
    /// A `GeoJSON` `Polygon` or `MultiPolygon` geometry.
    #[serde(default)]
    pub geojson: Option<Value>,
    #[serde(
        default,
        alias = "admCd",
        alias = "adm_cd",
        deserialize_with = "optional_code"
    )]
    pub administrative_code: Option<String>,
    /// Free-form properties, as an object or a JSON string.
    #[serde(default)]
    pub properties: Option<Value>,
}

/// A validated area with its decoded boundary.
///
/// The polygon may be empty when no usable boundary was found; such an
/// area still takes part in matching but contains no partners.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: String,
    pub name: String,
    pub polygon: Polygon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_code: Option<String>,
    #[serde(default)]
    pub raw_properties: Map<String, Value>,
}

impl Area {
    /// A string property, trimmed, if present and non-blank.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.raw_properties
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A partner as persisted by the storage layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRecord {
    #[serde(
        default,
        alias = "partnerCode",
        deserialize_with = "optional_text"
    )]
    pub id: Option<String>,
    #[serde(default, alias = "partnerName", deserialize_with = "optional_text")]
    pub name: Option<String>,
    /// Number, numeric string, or `null`.
    #[serde(default)]
    pub latitude: Option<Value>,
    /// Number, numeric string, or `null`.
    #[serde(default)]
    pub longitude: Option<Value>,
    #[serde(
        default,
        alias = "currentManagerEmployeeId",
        alias = "managerEmployeeId",
        deserialize_with = "optional_text"
    )]
    pub manager_id: Option<String>,
    #[serde(
        default,
        alias = "currentManagerName",
        deserialize_with = "optional_text"
    )]
    pub manager_name: Option<String>,
}

/// A partner with parsed, finite coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerLocation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
}

impl PartnerLocation {
    #[must_use]
    pub const fn point(&self) -> LngLat {
        LngLat::new(self.longitude, self.latitude)
    }
}

/// Contained-partner count for one manager within an area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSummary {
    pub manager_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
    pub partner_count: usize,
}

/// Partners contained in one area.
///
/// `manager_breakdown` is sparse: only managers with at least one
/// contained partner appear. Partners without a manager are counted in
/// `contained_partners` but not in the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaMembership<'a> {
    pub area: &'a Area,
    pub contained_partners: Vec<&'a PartnerLocation>,
    pub manager_breakdown: BTreeMap<String, usize>,
    /// Managers in order of their first contained partner.
    pub managers: Vec<ManagerSummary>,
}

impl<'a> AreaMembership<'a> {
    /// A membership with no contained partners.
    #[must_use]
    pub const fn empty(area: &'a Area) -> Self {
        Self {
            area,
            contained_partners: Vec::new(),
            manager_breakdown: BTreeMap::new(),
            managers: Vec::new(),
        }
    }

    /// Builds a membership from contained partners, counting them per
    /// manager.
    #[must_use]
    pub fn from_partners(area: &'a Area, contained_partners: Vec<&'a PartnerLocation>) -> Self {
        let mut manager_breakdown: BTreeMap<String, usize> = BTreeMap::new();
        let mut managers: Vec<ManagerSummary> = Vec::new();

        for partner in &contained_partners {
            let Some(manager_id) = partner.manager_id.as_deref() else {
                continue;
            };

            *manager_breakdown.entry(manager_id.to_string()).or_default() += 1;

            match managers.iter_mut().find(|m| m.manager_id == manager_id) {
                Some(summary) => summary.partner_count += 1,
                None => managers.push(ManagerSummary {
                    manager_id: manager_id.to_string(),
                    manager_name: partner.manager_name.clone(),
                    partner_count: 1,
                }),
            }
        }

        Self {
            area,
            contained_partners,
            manager_breakdown,
            managers,
        }
    }

    #[must_use]
    pub fn partner_count(&self) -> usize {
        self.contained_partners.len()
    }

    #[must_use]
    pub fn manager_count(&self) -> usize {
        self.manager_breakdown.len()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn partner(id: &str, manager: Option<(&str, &str)>) -> PartnerLocation {
        PartnerLocation {
            id: id.to_string(),
            name: None,
            longitude: 126.95,
            latitude: 37.55,
            manager_id: manager.map(|(id, _)| id.to_string()),
            manager_name: manager.map(|(_, name)| name.to_string()),
        }
    }

    #[test]
    fn area_record_accepts_persisted_field_names() {
        let record: AreaRecord = serde_json::from_value(json!({
            "id": 42,
            "name": "사직동",
            "admCd": "11010",
            "coordinates": "[[126.9, 37.5], [127.0, 37.5], [127.0, 37.6]]",
            "properties": { "sidonm": "서울특별시" }
        }))
        .unwrap();

        assert_eq!(record.id.as_deref(), Some("42"));
        assert_eq!(record.administrative_code.as_deref(), Some("11010"));
        assert!(record.coordinates.unwrap().is_string());
        assert!(record.topojson.is_none());
    }

    #[test]
    fn blank_and_numeric_codes() {
        let blank: AreaRecord =
            serde_json::from_value(json!({ "administrativeCode": "  " })).unwrap();
        assert!(blank.administrative_code.is_none());

        let numeric: AreaRecord = serde_json::from_value(json!({ "adm_cd": 11010 })).unwrap();
        assert_eq!(numeric.administrative_code.as_deref(), Some("11010"));

        let padded: AreaRecord = serde_json::from_value(json!({ "admCd": "11010 " })).unwrap();
        assert_eq!(padded.administrative_code.as_deref(), Some("11010 "));
    }

    #[test]
    fn partner_record_accepts_current_manager_fields() {
        let record: PartnerRecord = serde_json::from_value(json!({
            "partnerCode": "P-1",
            "partnerName": "Store",
            "latitude": "37.55",
            "longitude": null,
            "currentManagerEmployeeId": "E100",
            "currentManagerName": "Kim"
        }))
        .unwrap();

        assert_eq!(record.id.as_deref(), Some("P-1"));
        assert_eq!(record.name.as_deref(), Some("Store"));
        assert_eq!(record.latitude, Some(json!("37.55")));
        assert_eq!(record.longitude, None);
        assert_eq!(record.manager_id.as_deref(), Some("E100"));
        assert_eq!(record.manager_name.as_deref(), Some("Kim"));
    }

    #[test]
    fn membership_counts_managers_sparsely_in_first_seen_order() {
        let area = Area::default();
        let partners = [
            partner("a", Some(("M2", "Lee"))),
            partner("b", Some(("M1", "Kim"))),
            partner("c", None),
            partner("d", Some(("M2", "Lee"))),
        ];

        let membership = AreaMembership::from_partners(&area, partners.iter().collect());

        assert_eq!(membership.partner_count(), 4);
        assert_eq!(membership.manager_count(), 2);
        assert_eq!(membership.manager_breakdown["M2"], 2);
        assert_eq!(membership.manager_breakdown["M1"], 1);

        let order: Vec<&str> = membership
            .managers
            .iter()
            .map(|m| m.manager_id.as_str())
            .collect();
        assert_eq!(order, vec!["M2", "M1"]);
        assert_eq!(membership.managers[0].partner_count, 2);
    }

    #[test]
    fn empty_membership_has_no_managers() {
        let area = Area::default();
        let membership = AreaMembership::empty(&area);
        assert_eq!(membership.partner_count(), 0);
        assert!(membership.manager_breakdown.is_empty());
    }

    #[test]
    fn area_property_trims_and_skips_blanks() {
        let area = Area {
            raw_properties: serde_json::from_value(json!({ "sidonm": " 서울특별시 ", "sggnm": "" }))
                .unwrap(),
            ..Area::default()
        };
        assert_eq!(area.property("sidonm"), Some("서울특별시"));
        assert_eq!(area.property("sggnm"), None);
        assert_eq!(area.property("missing"), None);
    }
}
