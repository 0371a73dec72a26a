//! Crash exposure linking.
//!
//! Associates each crash incident with the K nearest edges within a distance
//! threshold. Candidates come from an R-tree over edge bounding boxes queried
//! at the threshold radius, then get refined by exact great-circle
//! point-to-polyline distance. Geocoding is imprecise, so the K-nearest cap
//! deliberately favors precision over exhaustive recall; both the threshold
//! and K are tunables.

use geo::BoundingRect;
use log::{debug, info, warn};
use rayon::prelude::*;
use rstar::{AABB, RTree, RTreeObject};

use crate::geometry::{meters_per_deg_lat, meters_per_deg_lon, point_to_polyline_distance};
use crate::model::{CrashLink, Edge, Incident};
use crate::store::NetworkStore;
use crate::Error;

/// Tunables for the spatial join.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrashLinkParams {
    /// Links farther than this from the edge geometry are discarded
    pub max_distance_m: f64,
    /// At most this many nearest edges are kept per incident
    pub max_edges_per_incident: usize,
}

impl Default for CrashLinkParams {
    fn default() -> Self {
        Self {
            max_distance_m: 50.0,
            max_edges_per_incident: 5,
        }
    }
}

/// Outcome of one linking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrashLinkSummary {
    /// Total (incident, edge) links written
    pub links: usize,
    /// Incidents that matched at least one edge
    pub incidents_linked: usize,
    /// Off-network incidents with no edge within the threshold
    pub incidents_skipped: usize,
}

/// Bounding box entry for one edge in the candidate index.
struct IndexedEdge {
    envelope: AABB<[f64; 2]>,
    edge_idx: usize,
}

impl RTreeObject for IndexedEdge {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Link the full incident set against the store's edges and replace the
/// crash link layer.
///
/// The scatter over incidents is parallel with no shared mutable state; the
/// single bulk write at the end replaces any previous run, so duplicate
/// (incident, edge) pairs never accumulate. Incidents with no edge within
/// the threshold produce zero links and count as skips, which is expected
/// for off-network geocodes.
pub fn link_crash_incidents<S: NetworkStore>(
    store: &S,
    params: &CrashLinkParams,
) -> Result<CrashLinkSummary, Error> {
    let edges = store.list_edges();
    let incidents: Vec<Incident> = store.list_incidents();
    info!(
        "linking {} incidents against {} edges (threshold {} m, k = {})",
        incidents.len(),
        edges.len(),
        params.max_distance_m,
        params.max_edges_per_incident
    );

    let tree = build_edge_index(&edges);

    let per_incident: Vec<Vec<CrashLink>> = incidents
        .par_iter()
        .map(|incident| nearest_edges(incident, &edges, &tree, params))
        .collect();

    let incidents_linked = per_incident.iter().filter(|links| !links.is_empty()).count();
    let incidents_skipped = per_incident.len() - incidents_linked;
    let links: Vec<CrashLink> = per_incident.into_iter().flatten().collect();

    let summary = CrashLinkSummary {
        links: links.len(),
        incidents_linked,
        incidents_skipped,
    };

    store.write_crash_links(links)?;
    info!(
        "crash linking complete: {} links, {} incidents matched, {} off-network",
        summary.links, summary.incidents_linked, summary.incidents_skipped
    );
    if summary.incidents_skipped > summary.incidents_linked {
        warn!("more incidents off-network than linked; check geocoding quality or threshold");
    }
    Ok(summary)
}

fn build_edge_index(edges: &[Edge]) -> RTree<IndexedEdge> {
    let entries: Vec<IndexedEdge> = edges
        .iter()
        .enumerate()
        .filter_map(|(edge_idx, edge)| {
            let rect = edge.geometry.bounding_rect()?;
            Some(IndexedEdge {
                envelope: AABB::from_corners(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                ),
                edge_idx,
            })
        })
        .collect();
    RTree::bulk_load(entries)
}

/// Coarse envelope query at the threshold radius, refined to exact geodesic
/// distance, filtered to the threshold, sorted ascending and truncated to K.
fn nearest_edges(
    incident: &Incident,
    edges: &[Edge],
    tree: &RTree<IndexedEdge>,
    params: &CrashLinkParams,
) -> Vec<CrashLink> {
    let lon = incident.location.x();
    let lat = incident.location.y();
    let dlat = params.max_distance_m / meters_per_deg_lat(lat);
    let dlon = params.max_distance_m / meters_per_deg_lon(lat);

    let search = AABB::from_corners([lon - dlon, lat - dlat], [lon + dlon, lat + dlat]);

    let mut candidates: Vec<CrashLink> = tree
        .locate_in_envelope_intersecting(&search)
        .filter_map(|entry| {
            let edge = &edges[entry.edge_idx];
            let distance_m = point_to_polyline_distance(incident.location, &edge.geometry);
            (distance_m <= params.max_distance_m).then_some(CrashLink {
                incident_id: incident.id,
                edge_id: edge.id,
                distance_m,
            })
        })
        .collect();

    if candidates.is_empty() {
        debug!("incident {} has no edge within threshold", incident.id);
        return candidates;
    }

    candidates.sort_by(|a, b| {
        a.distance_m
            .total_cmp(&b.distance_m)
            .then(a.edge_id.cmp(&b.edge_id))
    });
    candidates.truncate(params.max_edges_per_incident);
    candidates
}
