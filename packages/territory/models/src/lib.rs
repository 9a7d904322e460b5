#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Sales-territory records and the result of matching an area to one.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use territory_map_area_models::{Area, optional_code, optional_text};

/// Appended to a donor manager's name on region-fallback assignments.
pub const FALLBACK_MARKER: &str = " (관리 구역 담당 없음)";

/// Length of the district (si/gun/gu) prefix of an administrative code.
pub const DISTRICT_CODE_LEN: usize = 5;

/// A sales territory: one administrative area and its manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Territory {
    #[serde(
        default,
        alias = "territoryId",
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        default,
        alias = "admCd",
        alias = "adm_cd",
        deserialize_with = "optional_code"
    )]
    pub administrative_code: Option<String>,
    #[serde(default, alias = "admNm", deserialize_with = "optional_text")]
    pub administrative_name: Option<String>,
    /// Province (sido).
    #[serde(default, alias = "sido", deserialize_with = "optional_text")]
    pub region_major: Option<String>,
    /// District (gungu).
    #[serde(default, alias = "gungu", deserialize_with = "optional_text")]
    pub region_minor: Option<String>,
    #[serde(default, alias = "managerId", deserialize_with = "optional_text")]
    pub manager_employee_id: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub manager_name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub branch_name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub office_name: Option<String>,
}

impl Territory {
    /// Whether a real manager is assigned. A name that already carries
    /// [`FALLBACK_MARKER`] is a borrowed manager and does not count.
    #[must_use]
    pub fn has_manager(&self) -> bool {
        match self.manager_name.as_deref() {
            Some(name) => !name.contains(FALLBACK_MARKER.trim()),
            None => self.manager_employee_id.is_some(),
        }
    }

    #[must_use]
    pub fn region_key(&self) -> Option<RegionKey> {
        RegionKey::new(self.region_major.as_deref()?, self.region_minor.as_deref()?)
    }

    /// The district prefix of the administrative code.
    #[must_use]
    pub fn district_code(&self) -> Option<&str> {
        self.administrative_code.as_deref().and_then(district_code)
    }
}

/// The first [`DISTRICT_CODE_LEN`] characters of an administrative code,
/// or `None` if the code is shorter.
#[must_use]
pub fn district_code(code: &str) -> Option<&str> {
    let end = code
        .char_indices()
        .nth(DISTRICT_CODE_LEN)
        .map_or(code.len(), |(end, _)| end);
    let prefix = &code[..end];
    (prefix.chars().count() == DISTRICT_CODE_LEN).then_some(prefix)
}

/// `(province, district)` pair used by the region fallback.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionKey {
    pub major: String,
    pub minor: String,
}

impl RegionKey {
    /// Builds a key from trimmed names. Returns `None` if either is blank.
    #[must_use]
    pub fn new(major: &str, minor: &str) -> Option<Self> {
        let (major, minor) = (major.trim(), minor.trim());
        if major.is_empty() || minor.is_empty() {
            return None;
        }
        Some(Self {
            major: major.to_string(),
            minor: minor.to_string(),
        })
    }
}

impl std::fmt::Display for RegionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.major, self.minor)
    }
}

/// Which matching tier produced an assignment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchKind {
    /// A territory with the area's administrative code.
    Exact,
    /// A manager borrowed from another territory in the same region.
    RegionFallback,
    /// No territory found.
    Unmatched,
}

/// An area joined to its sales territory.
///
/// Exact matches borrow the territory record. Region fallbacks own a
/// synthesized record built from the area and the donor territory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaAssignment<'a> {
    pub area: &'a Area,
    pub territory: Option<Cow<'a, Territory>>,
    pub match_kind: MatchKind,
}

impl<'a> AreaAssignment<'a> {
    #[must_use]
    pub const fn unmatched(area: &'a Area) -> Self {
        Self {
            area,
            territory: None,
            match_kind: MatchKind::Unmatched,
        }
    }

    /// The assigned territory has a real manager.
    #[must_use]
    pub fn is_managed(&self) -> bool {
        self.territory.as_deref().is_some_and(Territory::has_manager)
    }

    #[must_use]
    pub fn manager_name(&self) -> Option<&str> {
        self.territory.as_deref()?.manager_name.as_deref()
    }
}
