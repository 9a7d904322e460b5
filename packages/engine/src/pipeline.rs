//! End-to-end enrichment of one batch of areas.
//!
//! A [`TerritoryMap`] owns the validated areas, partners, and territories
//! of a batch. [`TerritoryMap::enrich`] matches and aggregates them and
//! returns views that borrow from the map.

use serde::Serialize;
use territory_map_area::{aggregate, build_areas, compute_viewport, partner_locations};
use territory_map_area_models::{Area, AreaRecord, PartnerLocation, PartnerRecord};
use territory_map_geometry_models::Viewport;
use territory_map_territory::match_all;
use territory_map_territory_models::Territory;
use territory_map_topology::{TopologyCache, TopologyDecoder};

use crate::palette::{LegendEntry, ManagerPalette};
use crate::view::{AreaStatus, AreaView, PartnerMarker};

/// Batch-level counts shown above the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub area_count: usize,
    pub direct_count: usize,
    pub related_count: usize,
    pub unassigned_count: usize,
    /// Partners with usable coordinates.
    pub partner_count: usize,
    /// Sum of per-area contained partners. A partner inside overlapping
    /// areas is counted once per area.
    pub contained_partner_count: usize,
    pub viewport: Viewport,
}

/// The enriched payload for one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMap<'a> {
    pub areas: Vec<AreaView<'a>>,
    pub markers: Vec<PartnerMarker<'a>>,
    pub legend: Vec<LegendEntry>,
    pub summary: BatchSummary,
}

/// Validated input for one batch.
#[derive(Debug, Clone, Default)]
pub struct TerritoryMap {
    areas: Vec<Area>,
    partners: Vec<PartnerLocation>,
    territories: Vec<Territory>,
}

impl TerritoryMap {
    #[must_use]
    pub const fn new(
        areas: Vec<Area>,
        partners: Vec<PartnerLocation>,
        territories: Vec<Territory>,
    ) -> Self {
        Self {
            areas,
            partners,
            territories,
        }
    }

    /// Ingests stored records. Topology references are resolved against
    /// `cache`.
    #[must_use]
    pub fn from_records(
        area_records: Vec<AreaRecord>,
        partner_records: Vec<PartnerRecord>,
        territories: Vec<Territory>,
        cache: &TopologyCache,
    ) -> Self {
        let decoder = TopologyDecoder::new(cache);
        Self::new(
            build_areas(area_records, &decoder),
            partner_locations(partner_records),
            territories,
        )
    }

    #[must_use]
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    #[must_use]
    pub fn partners(&self) -> &[PartnerLocation] {
        &self.partners
    }

    #[must_use]
    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        compute_viewport(&self.areas)
    }

    /// Matches every area to a territory, finds the partners inside each,
    /// and builds the map payload. Areas keep their input order.
    #[must_use]
    pub fn enrich(&self) -> EnrichedMap<'_> {
        let assignments = match_all(&self.areas, &self.territories);
        let memberships = aggregate(&self.areas, &self.partners);
        let palette = ManagerPalette::from_partners(&self.partners);

        let contained_partner_count: usize = memberships.iter().map(|m| m.partner_count()).sum();

        let areas: Vec<AreaView<'_>> = assignments
            .into_iter()
            .zip(memberships)
            .map(|(assignment, membership)| AreaView::new(assignment, membership, &palette))
            .collect();

        let count = |status: AreaStatus| areas.iter().filter(|a| a.data.status == status).count();
        let summary = BatchSummary {
            area_count: areas.len(),
            direct_count: count(AreaStatus::Direct),
            related_count: count(AreaStatus::Related),
            unassigned_count: count(AreaStatus::Unassigned),
            partner_count: self.partners.len(),
            contained_partner_count,
            viewport: self.viewport(),
        };

        log::info!(
            "Enriched {} areas: {} direct, {} related, {} unassigned; {} partners, {} containments; viewport ({:.4}, {:.4}) level {}",
            summary.area_count,
            summary.direct_count,
            summary.related_count,
            summary.unassigned_count,
            summary.partner_count,
            summary.contained_partner_count,
            summary.viewport.center_lng,
            summary.viewport.center_lat,
            summary.viewport.zoom_level,
        );

        EnrichedMap {
            areas,
            markers: self
                .partners
                .iter()
                .map(|partner| PartnerMarker::new(partner, &palette))
                .collect(),
            legend: palette.legend().to_vec(),
            summary,
        }
    }
}
