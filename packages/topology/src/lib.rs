#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `TopoJSON` decoding for area boundaries.
//!
//! Decodes delta-encoded arcs into absolute coordinates, stitches arcs
//! into rings, and resolves stored geometry references against shared
//! topologies held in an explicit, read-only [`cache::TopologyCache`].
//! Decoding never fails: a missing object, geometry, or arc yields an
//! empty polygon. Only loading a topology file can fail.

pub mod cache;
pub mod decode;
pub mod features;

use thiserror::Error;

pub use cache::TopologyCache;
pub use decode::{DecodedBoundary, TopologyDecoder, decode_arc, decode_geometry_ring};

/// Errors that can occur while loading shared topologies.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// Reading the topology file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The topology file is not a valid `TopoJSON` topology.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
