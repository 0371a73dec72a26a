//! Elevation grade derivation.
//!
//! For every edge, samples the terrain at the source and target node
//! positions and records the signed grade along the source-to-target
//! direction. Endpoint sampling (rather than walking the polyline) is the
//! accepted approximation. Runs once per network/terrain pairing and is
//! idempotent: the write is a full replace for the given terrain source tag.

use log::{debug, info};
use rayon::prelude::*;

use crate::model::ElevationGrade;
use crate::store::NetworkStore;
use crate::terrain::TerrainSampler;
use crate::{EdgeId, Error};

/// Outcome of one derivation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevationRunSummary {
    /// Edges that received a grade record
    pub derived: usize,
    /// Edges skipped because an endpoint lacked terrain coverage or a node
    pub skipped: usize,
}

/// Derive grades for the full edge set and replace the store's elevation
/// layer for `source`.
///
/// An edge where either endpoint sample is absent gets no record, is logged
/// as a skip and is treated as flat downstream; this is expected at raster
/// boundaries, never a hard failure. The compute phase is parallel over
/// edges with no shared mutable state.
pub fn derive_elevation_grades<S, T>(
    store: &S,
    sampler: &T,
    source: &str,
) -> Result<ElevationRunSummary, Error>
where
    S: NetworkStore,
    T: TerrainSampler,
{
    let edges = store.list_edges();
    info!(
        "deriving elevation grades for {} edges from terrain source {source:?}",
        edges.len()
    );

    let grades: Vec<(EdgeId, ElevationGrade)> = edges
        .par_iter()
        .filter_map(|edge| {
            let start = store.get_node(edge.source)?;
            let end = store.get_node(edge.target)?;

            let start_m = sampler.elevation_at(start.geometry.x(), start.geometry.y());
            let end_m = sampler.elevation_at(end.geometry.x(), end.geometry.y());
            match (start_m, end_m) {
                (Some(start_m), Some(end_m)) => {
                    Some((edge.id, ElevationGrade::from_samples(start_m, end_m, edge.length_m)))
                }
                _ => {
                    debug!("edge {} outside terrain coverage, skipping", edge.id);
                    None
                }
            }
        })
        .collect();

    let summary = ElevationRunSummary {
        derived: grades.len(),
        skipped: edges.len() - grades.len(),
    };

    store.write_elevation_grades(source, grades)?;
    info!(
        "elevation run complete: {} grades derived, {} edges skipped",
        summary.derived, summary.skipped
    );
    Ok(summary)
}
