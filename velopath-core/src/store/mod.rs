//! Network store: the base graph plus derived attribute layers.
//!
//! The base graph (nodes, edges) is immutable after construction. The two
//! derived layers, elevation grades and crash links, are owned exclusively by
//! their batch stages and written as full atomic replaces keyed by a
//! generation tag, so concurrent readers never observe a torn run.

mod memory;

pub use memory::MemoryStore;

use crate::model::{CrashExposure, CrashLink, Edge, ElevationGrade, Incident, Node};
use crate::{EdgeId, Error, IncidentId, NodeId};

/// Read/write interface over the base graph and its derived layers.
///
/// Only the elevation deriver may call [`write_elevation_grades`] and only
/// the crash linker may call [`write_crash_links`]; route queries are
/// read-only.
///
/// [`write_elevation_grades`]: NetworkStore::write_elevation_grades
/// [`write_crash_links`]: NetworkStore::write_crash_links
pub trait NetworkStore: Send + Sync {
    fn get_node(&self, id: NodeId) -> Option<Node>;

    /// Full node set, in no particular order.
    fn list_nodes(&self) -> Vec<Node>;

    /// Full edge set, in stable ingestion order.
    fn list_edges(&self) -> Vec<Edge>;

    fn get_incident(&self, id: IncidentId) -> Option<Incident>;

    /// Full imported incident set, in no particular order.
    fn list_incidents(&self) -> Vec<Incident>;

    /// Derived grade for an edge, if the active terrain run covered it.
    fn get_elevation_grade(&self, edge_id: EdgeId) -> Option<ElevationGrade>;

    /// Crash links for an edge, sorted by ascending distance.
    fn get_crash_links(&self, edge_id: EdgeId) -> Vec<CrashLink>;

    /// Replace the whole elevation layer for the given terrain source tag.
    /// The swap is atomic: readers see either the previous generation or the
    /// new one, never a mix.
    fn write_elevation_grades(
        &self,
        source: &str,
        grades: Vec<(EdgeId, ElevationGrade)>,
    ) -> Result<(), Error>;

    /// Replace the whole crash link layer for the imported incident set.
    /// Re-running the linker never accumulates duplicate (incident, edge)
    /// pairs.
    fn write_crash_links(&self, links: Vec<CrashLink>) -> Result<(), Error>;

    /// Aggregate crash exposure for an edge: link count plus the sum of
    /// severity weights of the linked incidents. Derived by grouping at read
    /// time, never stored on the edge.
    fn crash_exposure(&self, edge_id: EdgeId) -> CrashExposure {
        let links = self.get_crash_links(edge_id);
        let score = links
            .iter()
            .filter_map(|link| self.get_incident(link.incident_id))
            .map(|incident| incident.severity.weight())
            .sum();
        CrashExposure {
            count: links.len(),
            score,
        }
    }
}
