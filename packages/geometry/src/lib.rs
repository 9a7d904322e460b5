#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Planar geometry primitives for sales-territory boundaries.
//!
//! Turns heterogeneous stored coordinate data into canonical
//! [`Polygon`](territory_map_geometry_models::Polygon) rings, tests partner
//! points against those rings, and fits a map viewport around a set of
//! rings. Every operation here is pure: malformed input degrades to an
//! empty polygon, a `false` containment answer, or the default viewport.

pub mod bounds;
pub mod containment;
pub mod normalize;
pub mod viewport;

pub use containment::contains;
pub use normalize::{classify, normalize, normalize_value};
pub use viewport::compute_viewport;
