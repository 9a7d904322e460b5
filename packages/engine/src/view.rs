//! Map-view payloads.
//!
//! An [`AreaView`] is what the map component draws for one area: the ring
//! as `[lng, lat]` pairs, fill and stroke styling, and a `data` bag with
//! the territory assignment and partner counts.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};
use territory_map_area_models::{AreaMembership, ManagerSummary, PartnerLocation};
use territory_map_geometry_models::{LngLat, Polygon};
use territory_map_territory_models::{AreaAssignment, MatchKind, Territory};

use crate::palette::ManagerPalette;

pub const DEFAULT_STROKE_WEIGHT: u8 = 2;
pub const DEFAULT_FILL_OPACITY: f64 = 0.2;

/// Assignment state shown on an area's badge.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaStatus {
    /// Managed through the area's own territory.
    Direct,
    /// Managed by a manager borrowed from the same region.
    Related,
    /// Nobody manages the area.
    Unassigned,
}

impl AreaStatus {
    #[must_use]
    pub fn from_assignment(assignment: &AreaAssignment<'_>) -> Self {
        match assignment.match_kind {
            MatchKind::Exact if assignment.is_managed() => Self::Direct,
            MatchKind::RegionFallback => Self::Related,
            MatchKind::Exact | MatchKind::Unmatched => Self::Unassigned,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Direct => "직접 담당",
            Self::Related => "관련 구역",
            Self::Unassigned => "미배정",
        }
    }

    /// Fill and stroke color.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Direct => "#667eea",
            Self::Related => "#ff9800",
            Self::Unassigned => "#ff6b6b",
        }
    }
}

/// A manager's partner count with its legend color.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerView {
    #[serde(flatten)]
    pub summary: ManagerSummary,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaViewData<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_code: Option<&'a str>,
    pub territory: Option<Cow<'a, Territory>>,
    pub match_kind: MatchKind,
    pub status: AreaStatus,
    pub status_label: &'static str,
    pub partner_count: usize,
    pub manager_count: usize,
    pub manager_breakdown: BTreeMap<String, usize>,
    pub managers: Vec<ManagerView>,
    pub partner_ids: Vec<&'a str>,
}

/// One area as drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub polygon: &'a Polygon,
    pub color: &'static str,
    pub stroke_color: &'static str,
    pub stroke_weight: u8,
    pub fill_opacity: f64,
    pub data: AreaViewData<'a>,
}

impl<'a> AreaView<'a> {
    /// Combines an area's assignment and membership. Both must describe
    /// the same area; the assignment's area is the one drawn.
    #[must_use]
    pub fn new(
        assignment: AreaAssignment<'a>,
        membership: AreaMembership<'a>,
        palette: &ManagerPalette,
    ) -> Self {
        let area = assignment.area;
        let status = AreaStatus::from_assignment(&assignment);
        let partner_count = membership.partner_count();
        let manager_count = membership.manager_count();

        let managers = membership
            .managers
            .into_iter()
            .map(|summary| ManagerView {
                color: palette.color_for(Some(&summary.manager_id)),
                summary,
            })
            .collect();

        Self {
            id: &area.id,
            name: &area.name,
            polygon: &area.polygon,
            color: status.color(),
            stroke_color: status.color(),
            stroke_weight: DEFAULT_STROKE_WEIGHT,
            fill_opacity: DEFAULT_FILL_OPACITY,
            data: AreaViewData {
                administrative_code: area.administrative_code.as_deref(),
                territory: assignment.territory,
                match_kind: assignment.match_kind,
                status,
                status_label: status.label(),
                partner_count,
                manager_count,
                manager_breakdown: membership.manager_breakdown,
                managers,
                partner_ids: membership
                    .contained_partners
                    .iter()
                    .map(|p| p.id.as_str())
                    .collect(),
            },
        }
    }
}

/// A partner pin, colored by manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerMarker<'a> {
    pub id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub position: LngLat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<&'a str>,
    pub color: &'static str,
}

impl<'a> PartnerMarker<'a> {
    #[must_use]
    pub fn new(partner: &'a PartnerLocation, palette: &ManagerPalette) -> Self {
        Self {
            id: &partner.id,
            name: partner.name.as_deref(),
            position: partner.point(),
            manager_name: partner.manager_name.as_deref(),
            color: palette.color_for(partner.manager_id.as_deref()),
        }
    }
}
