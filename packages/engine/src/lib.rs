#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Area enrichment for the territory map.
//!
//! Ties the stages together: stored records are ingested into areas and
//! partner locations, areas are matched to sales territories, partners are
//! aggregated per area, and the results are shaped into the payload the
//! map renders. Everything past loading the input files is infallible.

pub mod input;
pub mod palette;
pub mod pipeline;
pub mod view;

use thiserror::Error;
use territory_map_topology::TopologyError;

pub use pipeline::{BatchSummary, EnrichedMap, TerritoryMap};

/// Errors that can occur while loading engine input.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Reading an input file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An input file is not valid JSON of the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Loading a shared topology failed.
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    /// A shared topology argument is not of the form `name=path`.
    #[error("Invalid topology spec '{0}': expected NAME=PATH")]
    InvalidTopologySpec(String),
}
