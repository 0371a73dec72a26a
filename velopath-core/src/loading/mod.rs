//! Loading the network and crash data into a store.
//!
//! The heavy ingestion (turning raw map data into a routable node/edge set)
//! happens upstream, once; this module only reads its exported artifacts:
//! a GeoJSON edge file and a geocoded crash CSV.

mod incidents;
mod network;

pub use incidents::load_incidents;
pub use network::load_network;

use std::path::Path;

use log::info;

use crate::Error;
use crate::store::MemoryStore;

/// Build an in-memory store from the exported network and, optionally, the
/// geocoded crash export. The derived layers start empty; run the batch
/// stages to populate them.
pub fn load_store(network_path: &Path, incidents_path: Option<&Path>) -> Result<MemoryStore, Error> {
    let (nodes, edges) = load_network(network_path)?;
    let incidents = match incidents_path {
        Some(path) => load_incidents(path)?,
        None => Vec::new(),
    };

    let store = MemoryStore::new(nodes, edges, incidents);
    info!(
        "store loaded: {} nodes, {} edges, {} incidents",
        store.node_count(),
        store.edge_count(),
        store.incident_count()
    );
    Ok(store)
}
