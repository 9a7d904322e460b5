//! Read-only store of shared topologies.
//!
//! Bulk-uploaded areas point into one large shared topology instead of
//! embedding their own. The cache is built once by the caller (usually at
//! startup) and then handed to a [`TopologyDecoder`](crate::TopologyDecoder)
//! by reference; nothing in this crate keeps process-wide state.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use territory_map_topology_models::{TopoGeometry, Topology, TopologyReference};

use crate::TopologyError;

/// Shared topologies keyed by name.
///
/// The first topology inserted is the default, used by references that
/// do not name a source.
#[derive(Debug, Clone, Default)]
pub struct TopologyCache {
    topologies: BTreeMap<String, Arc<Topology>>,
    default_name: Option<String>,
}

impl TopologyCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a topology under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, topology: Topology) {
        let name = name.into();
        if self.default_name.is_none() {
            self.default_name = Some(name.clone());
        }
        self.topologies.insert(name, Arc::new(topology));
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with_topology(mut self, name: impl Into<String>, topology: Topology) -> Self {
        self.insert(name, topology);
        self
    }

    /// Parses a `TopoJSON` document and adds it under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid topology.
    pub fn insert_json(&mut self, name: impl Into<String>, json: &str) -> Result<(), TopologyError> {
        let topology: Topology = serde_json::from_str(json)?;
        self.insert(name, topology);
        Ok(())
    }

    /// Reads a `TopoJSON` file and adds it under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// topology.
    pub fn load_file(&mut self, name: impl Into<String>, path: &Path) -> Result<(), TopologyError> {
        let name = name.into();
        let json = std::fs::read_to_string(path)?;
        self.insert_json(name.clone(), &json)?;

        if let Some(topology) = self.topologies.get(&name) {
            log::info!(
                "Loaded topology '{name}' from {} ({} arcs, {} objects)",
                path.display(),
                topology.arcs.len(),
                topology.objects.len()
            );
        }
        Ok(())
    }

    /// Looks up a topology by name, or the default one for `None`.
    #[must_use]
    pub fn get(&self, name: Option<&str>) -> Option<&Topology> {
        let name = name.or(self.default_name.as_deref())?;
        self.topologies.get(name).map(Arc::as_ref)
    }

    /// Resolves a stored reference to its topology and geometry.
    #[must_use]
    pub fn resolve(&self, reference: &TopologyReference) -> Option<(&Topology, &TopoGeometry)> {
        let topology = self.get(reference.source.as_deref())?;
        let geometry = topology
            .object(Some(&reference.object_key))?
            .members()
            .get(reference.geometry_index)?;
        Some((topology, geometry))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.topologies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topologies.is_empty()
    }
}
