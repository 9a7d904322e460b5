//! Three-tier territory matching.
//!
//! 1. **Exact**: a territory with the area's administrative code and a
//!    real manager.
//! 2. **Region fallback**: a manager borrowed from the first managed
//!    territory of the area's region. The region is taken from the first
//!    of these that names a managed region: the code-equal territory's own
//!    region, the area's `sidonm`/`sggnm` properties, or the region of a
//!    territory sharing the area code's district prefix.
//! 3. **Unmatched**.
//!
//! A code-equal territory without a manager whose region has no donor
//! stays an exact match, so the join is kept even though nobody manages
//! the area.

use std::borrow::Cow;
use std::collections::BTreeMap;

use territory_map_area_models::Area;
use territory_map_territory_models::{
    AreaAssignment, FALLBACK_MARKER, MatchKind, RegionKey, Territory, district_code,
};

/// Area property holding the province name.
const REGION_MAJOR_PROPERTY: &str = "sidonm";

/// Area property holding the district name.
const REGION_MINOR_PROPERTY: &str = "sggnm";

/// Lookup tables over a territory list, built once per batch.
#[derive(Debug, Clone, Default)]
pub struct TerritoryIndex<'a> {
    /// First territory per administrative code.
    by_code: BTreeMap<&'a str, &'a Territory>,
    /// First managed territory per region.
    by_region: BTreeMap<RegionKey, &'a Territory>,
    /// Region of the first territory per district code.
    region_by_district: BTreeMap<&'a str, RegionKey>,
}

impl<'a> TerritoryIndex<'a> {
    #[must_use]
    pub fn new(territories: &'a [Territory]) -> Self {
        let mut index = Self::default();

        for territory in territories {
            let region = territory.region_key();

            if let Some(code) = territory.administrative_code.as_deref() {
                index.by_code.entry(code).or_insert(territory);
            }

            if let (Some(district), Some(region)) = (territory.district_code(), &region) {
                index
                    .region_by_district
                    .entry(district)
                    .or_insert_with(|| region.clone());
            }

            if let Some(region) = region
                && territory.has_manager()
            {
                index.by_region.entry(region).or_insert(territory);
            }
        }

        log::debug!(
            "Indexed {} territories: {} codes, {} managed regions, {} districts",
            territories.len(),
            index.by_code.len(),
            index.by_region.len(),
            index.region_by_district.len(),
        );

        index
    }

    /// Candidate regions for an area, most authoritative first.
    fn region_hints(&self, area: &Area, code_match: Option<&Territory>) -> Vec<RegionKey> {
        let from_territory = code_match.and_then(Territory::region_key);

        let from_properties = area
            .property(REGION_MAJOR_PROPERTY)
            .zip(area.property(REGION_MINOR_PROPERTY))
            .and_then(|(major, minor)| RegionKey::new(major, minor));

        let from_district = area
            .administrative_code
            .as_deref()
            .and_then(district_code)
            .and_then(|district| self.region_by_district.get(district))
            .cloned();

        [from_territory, from_properties, from_district]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Finds the first hinted region with a managed territory.
    fn donor(&self, hints: Vec<RegionKey>) -> Option<(RegionKey, &'a Territory)> {
        hints.into_iter().find_map(|region| {
            let donor = *self.by_region.get(&region)?;
            Some((region, donor))
        })
    }

    /// Matches one area.
    #[must_use]
    pub fn match_area<'b>(&self, area: &'b Area) -> AreaAssignment<'b>
    where
        'a: 'b,
    {
        let code_match = area
            .administrative_code
            .as_deref()
            .and_then(|code| self.by_code.get(code).copied());

        if let Some(territory) = code_match
            && territory.has_manager()
        {
            return AreaAssignment {
                area,
                territory: Some(Cow::Borrowed(territory)),
                match_kind: MatchKind::Exact,
            };
        }

        if let Some((region, donor)) = self.donor(self.region_hints(area, code_match)) {
            return AreaAssignment {
                area,
                territory: Some(Cow::Owned(fallback_territory(
                    area, code_match, region, donor,
                ))),
                match_kind: MatchKind::RegionFallback,
            };
        }

        match code_match {
            Some(territory) => AreaAssignment {
                area,
                territory: Some(Cow::Borrowed(territory)),
                match_kind: MatchKind::Exact,
            },
            None => AreaAssignment::unmatched(area),
        }
    }
}

/// Territory record shown for a region-fallback assignment: the area's
/// identity with the donor's manager.
fn fallback_territory(
    area: &Area,
    code_match: Option<&Territory>,
    region: RegionKey,
    donor: &Territory,
) -> Territory {
    let donor_name = donor
        .manager_name
        .as_deref()
        .or(donor.manager_employee_id.as_deref())
        .unwrap_or_default();

    Territory {
        id: code_match.and_then(|t| t.id.clone()),
        administrative_code: area.administrative_code.clone(),
        administrative_name: Some(area.name.clone()),
        region_major: Some(region.major),
        region_minor: Some(region.minor),
        manager_employee_id: donor.manager_employee_id.clone(),
        manager_name: Some(format!("{donor_name}{FALLBACK_MARKER}")),
        branch_name: donor.branch_name.clone(),
        office_name: donor.office_name.clone(),
    }
}

/// Matches one area against a territory list.
///
/// Builds a fresh [`TerritoryIndex`]; use [`match_all`] or an index
/// directly when matching many areas.
#[must_use]
pub fn match_area<'a>(area: &'a Area, territories: &'a [Territory]) -> AreaAssignment<'a> {
    TerritoryIndex::new(territories).match_area(area)
}

/// Matches every area, in input order.
#[must_use]
pub fn match_all<'a>(areas: &'a [Area], territories: &'a [Territory]) -> Vec<AreaAssignment<'a>> {
    let index = TerritoryIndex::new(territories);
    let assignments: Vec<AreaAssignment<'a>> =
        areas.iter().map(|area| index.match_area(area)).collect();

    let count = |kind: MatchKind| {
        assignments
            .iter()
            .filter(|a| a.match_kind == kind)
            .count()
    };
    log::info!(
        "Matched {} areas: {} exact, {} region fallback, {} unmatched",
        assignments.len(),
        count(MatchKind::Exact),
        count(MatchKind::RegionFallback),
        count(MatchKind::Unmatched),
    );

    assignments
}
