#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Matching areas to sales territories.
//!
//! An area is matched by administrative code first, then by borrowing a
//! manager from a territory in the same `(province, district)` region,
//! and is otherwise left unmatched. The tier that produced the result is
//! kept on every [`AreaAssignment`](territory_map_territory_models::AreaAssignment).

pub mod matcher;

pub use matcher::{TerritoryIndex, match_all, match_area};
