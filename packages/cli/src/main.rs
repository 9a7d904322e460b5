#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the territory map engine.
//!
//! Reads area, territory, and partner exports as JSON, runs them through
//! the engine, and writes the result as JSON to stdout or a file. Shared
//! topologies referenced by stored areas are passed as `NAME=PATH`.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use territory_map_area::{
    area_records_from_topology, areas_from_topology, build_areas, compute_viewport,
};
use territory_map_area_models::{AreaRecord, PartnerRecord};
use territory_map_engine::TerritoryMap;
use territory_map_engine::input::{load_topologies, read_records};
use territory_map_territory_models::Territory;
use territory_map_topology::TopologyDecoder;
use territory_map_topology_models::Topology;

/// Match areas to sales territories and count the partners inside them.
#[derive(Parser)]
#[command(name = "territory_map")]
#[command(about = "Match areas to sales territories and count the partners inside them")]
struct Cli {
    /// Write output to this file instead of stdout.
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Build the full map payload: area views, partner markers, legend,
    /// and summary.
    Enrich {
        /// Area records (JSON array or `{ "data": [...] }`).
        #[arg(long)]
        areas: PathBuf,

        /// Sales-territory records.
        #[arg(long)]
        territories: PathBuf,

        /// Partner records.
        #[arg(long)]
        partners: PathBuf,

        /// Shared topology as `NAME=PATH`. The first one is the default
        /// for references without a source. Repeatable.
        #[arg(long = "topology")]
        topologies: Vec<String>,
    },

    /// Split one object of a `TopoJSON` file into areas.
    Decode {
        /// `TopoJSON` file.
        topology: PathBuf,

        /// Object to split (default: first object by key).
        #[arg(long)]
        object: Option<String>,

        /// Emit storable area records that reference the topology instead
        /// of decoded boundaries.
        #[arg(long)]
        references: bool,

        /// Topology name written into references (default: the default
        /// topology). Only used with `--references`.
        #[arg(long, requires = "references")]
        source: Option<String>,
    },

    /// Fit a map viewport around a set of areas.
    Viewport {
        /// Area records.
        #[arg(long)]
        areas: PathBuf,

        /// Shared topology as `NAME=PATH`. Repeatable.
        #[arg(long = "topology")]
        topologies: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let output = cli.output.as_deref();

    match cli.command {
        Commands::Enrich {
            areas,
            territories,
            partners,
            topologies,
        } => {
            let cache = load_topologies(&topologies)?;
            let area_records: Vec<AreaRecord> = read_records(&areas)?;
            let partner_records: Vec<PartnerRecord> = read_records(&partners)?;
            let territories: Vec<Territory> = read_records(&territories)?;

            let map =
                TerritoryMap::from_records(area_records, partner_records, territories, &cache);
            write_json(&map.enrich(), output, cli.pretty)
        }
        Commands::Decode {
            topology,
            object,
            references,
            source,
        } => {
            let json = std::fs::read_to_string(&topology)?;
            let topology: Topology = serde_json::from_str(&json)?;
            if references {
                let records =
                    area_records_from_topology(&topology, object.as_deref(), source.as_deref());
                write_json(&records, output, cli.pretty)
            } else {
                let areas = areas_from_topology(&topology, object.as_deref());
                write_json(&areas, output, cli.pretty)
            }
        }
        Commands::Viewport { areas, topologies } => {
            let cache = load_topologies(&topologies)?;
            let records: Vec<AreaRecord> = read_records(&areas)?;
            let areas = build_areas(records, &TopologyDecoder::new(&cache));
            write_json(&compute_viewport(&areas), output, cli.pretty)
        }
    }
}

/// Serializes `value` to `path`, or to stdout when no path is given.
fn write_json<T: Serialize>(
    value: &T,
    path: Option<&Path>,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match path {
        Some(path) => {
            std::fs::write(path, json)?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}
