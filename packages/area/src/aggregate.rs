//! Partner containment per area.
//!
//! Partners outside the service bounds are dropped once, up front. The
//! rest go into an R-tree so each area only ray-casts against partners
//! inside its bounding box. Areas are independent, so they are processed
//! in parallel; results come back in input order.

use rayon::prelude::*;
use rstar::{AABB, RTree, RTreeObject};
use territory_map_area_models::{Area, AreaMembership, PartnerLocation};
use territory_map_geometry::bounds::{bounding_rect, within_service_bounds};
use territory_map_geometry::contains;
use territory_map_geometry_models::{Polygon, Viewport};

/// A partner stored in the R-tree with its position in the input slice.
struct IndexedPartner<'a> {
    position: usize,
    partner: &'a PartnerLocation,
}

impl RTreeObject for IndexedPartner<'_> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.partner.longitude, self.partner.latitude])
    }
}

/// Spatial index over the partners that pass the service-bounds check.
pub struct PartnerIndex<'a> {
    tree: RTree<IndexedPartner<'a>>,
}

impl<'a> PartnerIndex<'a> {
    /// Indexes every partner with finite coordinates inside the service
    /// bounds.
    #[must_use]
    pub fn new(partners: &'a [PartnerLocation]) -> Self {
        let entries: Vec<IndexedPartner<'a>> = partners
            .iter()
            .enumerate()
            .filter(|(_, partner)| within_service_bounds(partner.point()))
            .map(|(position, partner)| IndexedPartner { position, partner })
            .collect();

        let dropped = partners.len() - entries.len();
        if dropped > 0 {
            log::debug!("{dropped} partners fall outside the service bounds");
        }

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed partners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Partners inside `polygon`, in input order.
    #[must_use]
    pub fn contained_in(&self, polygon: &Polygon) -> Vec<&'a PartnerLocation> {
        let Some(rect) = bounding_rect(polygon.points()) else {
            return Vec::new();
        };
        let envelope = AABB::from_corners(
            [rect.min().x, rect.min().y],
            [rect.max().x, rect.max().y],
        );

        let mut hits: Vec<&IndexedPartner<'a>> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| contains(entry.partner.point(), polygon))
            .collect();
        hits.sort_unstable_by_key(|entry| entry.position);

        hits.into_iter().map(|entry| entry.partner).collect()
    }

    /// Membership of one area. An area without a boundary contains nothing.
    #[must_use]
    pub fn membership<'b>(&self, area: &'b Area) -> AreaMembership<'b>
    where
        'a: 'b,
    {
        if area.polygon.is_empty() {
            return AreaMembership::empty(area);
        }
        AreaMembership::from_partners(area, self.contained_in(&area.polygon))
    }
}

/// Computes one membership per area, in input order.
#[must_use]
pub fn aggregate<'a>(
    areas: &'a [Area],
    partners: &'a [PartnerLocation],
) -> Vec<AreaMembership<'a>> {
    let index = PartnerIndex::new(partners);
    if index.is_empty() {
        log::debug!("No partners inside the service bounds");
        return areas.iter().map(AreaMembership::empty).collect();
    }

    let memberships: Vec<AreaMembership<'a>> =
        areas.par_iter().map(|area| index.membership(area)).collect();

    let contained: usize = memberships.iter().map(AreaMembership::partner_count).sum();
    log::debug!(
        "Aggregated {} areas against {} indexed partners ({contained} containments)",
        areas.len(),
        index.len(),
    );

    memberships
}

/// Viewport fitted around the boundaries of `areas`.
#[must_use]
pub fn compute_viewport(areas: &[Area]) -> Viewport {
    territory_map_geometry::compute_viewport(areas.iter().map(|area| &area.polygon))
}

#[cfg(test)]
mod tests {
    use territory_map_geometry::viewport::DEFAULT_VIEWPORT;
    use territory_map_geometry_models::LngLat;

    use super::*;

    fn area(id: &str, ring: &[(f64, f64)]) -> Area {
        Area {
            id: id.to_string(),
            name: id.to_string(),
            polygon: Polygon::new(ring.iter().copied().map(LngLat::from)),
            ..Area::default()
        }
    }

    fn partner(id: &str, lng: f64, lat: f64, manager: Option<&str>) -> PartnerLocation {
        PartnerLocation {
            id: id.to_string(),
            name: None,
            longitude: lng,
            latitude: lat,
            manager_id: manager.map(str::to_string),
            manager_name: manager.map(|m| format!("{m} name")),
        }
    }

    fn sample_square() -> Area {
        area(
            "square",
            &[(126.9, 37.5), (127.0, 37.5), (127.0, 37.6), (126.9, 37.6)],
        )
    }

    #[test]
    fn square_area_contains_two_partners_of_one_manager() {
        let areas = [sample_square()];
        let partners = [
            partner("p1", 126.95, 37.55, Some("M1")),
            partner("p2", 126.95, 37.58, Some("M1")),
            partner("p3", 128.0, 38.0, Some("M2")),
        ];

        let memberships = aggregate(&areas, &partners);
        assert_eq!(memberships.len(), 1);

        let membership = &memberships[0];
        let ids: Vec<&str> = membership
            .contained_partners
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(membership.manager_breakdown.len(), 1);
        assert_eq!(membership.manager_breakdown["M1"], 2);
    }

    #[test]
    fn aggregate_is_idempotent() {
        let areas = [
            sample_square(),
            area("east", &[(127.0, 37.5), (127.1, 37.5), (127.1, 37.6)]),
        ];
        let partners = [
            partner("p1", 126.95, 37.55, Some("M1")),
            partner("p2", 127.08, 37.51, Some("M2")),
            partner("p3", 127.05, 37.55, None),
        ];

        assert_eq!(aggregate(&areas, &partners), aggregate(&areas, &partners));
    }

    #[test]
    fn out_of_bounds_and_non_finite_partners_are_ignored() {
        let areas = [area("wide", &[(0.0, 0.0), (180.0, 0.0), (180.0, 80.0), (0.0, 80.0)])];
        let partners = [
            partner("korea", 126.95, 37.55, None),
            partner("abroad", 10.0, 10.0, None),
            partner("nan", f64::NAN, 37.55, None),
        ];

        let index = PartnerIndex::new(&partners);
        assert_eq!(index.len(), 1);

        let memberships = aggregate(&areas, &partners);
        assert_eq!(memberships[0].partner_count(), 1);
        assert!(memberships[0].manager_breakdown.is_empty());
    }

    #[test]
    fn no_partners_in_bounds_yields_empty_memberships() {
        let areas = [sample_square(), sample_square()];
        let partners = [partner("abroad", 10.0, 10.0, Some("M1"))];

        assert!(PartnerIndex::new(&partners).is_empty());
        let memberships = aggregate(&areas, &partners);
        assert_eq!(memberships.len(), 2);
        assert!(memberships.iter().all(|m| m.partner_count() == 0));
    }

    #[test]
    fn area_without_boundary_gets_empty_membership() {
        let areas = [area("empty", &[(126.9, 37.5), (127.0, 37.5)]), sample_square()];
        let partners = [partner("p1", 126.95, 37.55, Some("M1"))];

        let memberships = aggregate(&areas, &partners);
        assert_eq!(memberships.len(), 2);
        assert_eq!(memberships[0].area.id, "empty");
        assert_eq!(memberships[0].partner_count(), 0);
        assert_eq!(memberships[1].partner_count(), 1);
    }

    #[test]
    fn partner_on_boundary_is_contained() {
        let areas = [sample_square()];
        let partners = [partner("edge", 126.9, 37.55, Some("M1"))];
        assert_eq!(aggregate(&areas, &partners)[0].partner_count(), 1);
    }

    #[test]
    fn viewport_centers_on_areas() {
        let viewport = compute_viewport(&[sample_square()]);
        assert!((viewport.center_lng - 126.95).abs() < 1e-9);
        assert!((viewport.center_lat - 37.55).abs() < 1e-9);
        assert_eq!(viewport.zoom_level, 8);

        assert_eq!(compute_viewport(&[]), DEFAULT_VIEWPORT);
    }
}
