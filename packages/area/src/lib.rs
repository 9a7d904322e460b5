#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Area ingestion and partner aggregation.
//!
//! [`ingest`] turns stored area and partner records into validated
//! [`Area`](territory_map_area_models::Area) and
//! [`PartnerLocation`](territory_map_area_models::PartnerLocation) values.
//! [`aggregate`] finds the partners inside each area and fits a viewport
//! around a set of areas.

pub mod aggregate;
pub mod ingest;

pub use aggregate::{PartnerIndex, aggregate, compute_viewport};
pub use ingest::{
    area_records_from_topology, areas_from_topology, build_area, build_areas, partner_locations,
};
