//! Elevation profile along a computed route.

use serde::Serialize;

use crate::routing::Route;

/// One row of the profile: a segment in path order with its oriented
/// endpoint elevations and the distance covered so far.
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePoint {
    pub seq: u32,
    pub name: Option<String>,
    /// Elevation where the segment is entered; `None` without terrain coverage
    pub elevation_start_m: Option<f64>,
    pub elevation_end_m: Option<f64>,
    pub grade_percent: f64,
    pub length_m: f64,
    pub cumulative_distance_m: f64,
}

/// Join the per-edge elevation records along the route, in path order.
/// Segments without a grade record keep their place in the profile with
/// absent elevations and a flat grade.
pub fn elevation_profile(route: &Route) -> Vec<ProfilePoint> {
    route
        .segments
        .iter()
        .map(|segment| ProfilePoint {
            seq: segment.seq,
            name: segment.name.clone(),
            elevation_start_m: segment.elevation.map(|g| g.elevation_start_m),
            elevation_end_m: segment.elevation.map(|g| g.elevation_end_m),
            grade_percent: segment.grade_percent(),
            length_m: segment.length_m,
            cumulative_distance_m: segment.cumulative_distance_m,
        })
        .collect()
}
