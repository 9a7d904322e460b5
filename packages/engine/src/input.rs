//! Loading engine input from JSON files.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use territory_map_topology::TopologyCache;

use crate::EngineError;

/// A record list as exported by the API: a bare array, or an envelope
/// with the array under `data`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordList<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

/// Parses a record list from JSON text.
///
/// # Errors
///
/// Returns an error if the text is neither an array of records nor an
/// object with a `data` array.
pub fn parse_records<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, EngineError> {
    Ok(match serde_json::from_str(json)? {
        RecordList::Bare(records) | RecordList::Wrapped { data: records } => records,
    })
}

/// Reads a record list from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, EngineError> {
    let json = std::fs::read_to_string(path)?;
    let records: Vec<T> = parse_records(&json)?;
    log::debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Splits a `name=path` topology argument. A bare path is named after its
/// file stem.
///
/// # Errors
///
/// Returns an error if the name or path is empty.
pub fn parse_topology_spec(spec: &str) -> Result<(String, PathBuf), EngineError> {
    let (name, path) = match spec.split_once('=') {
        Some((name, path)) => (name.trim().to_string(), PathBuf::from(path.trim())),
        None => {
            let path = PathBuf::from(spec.trim());
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            (stem, path)
        }
    };

    if name.is_empty() || path.as_os_str().is_empty() {
        return Err(EngineError::InvalidTopologySpec(spec.to_string()));
    }
    Ok((name, path))
}

/// Loads shared topologies into a cache. The first one becomes the default
/// for references that do not name a source.
///
/// # Errors
///
/// Returns an error if any argument is malformed or any file cannot be
/// loaded.
pub fn load_topologies(specs: &[String]) -> Result<TopologyCache, EngineError> {
    let mut cache = TopologyCache::new();
    for spec in specs {
        let (name, path) = parse_topology_spec(spec)?;
        cache.load_file(name, &path)?;
    }
    Ok(cache)
}
