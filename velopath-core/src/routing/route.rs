//! Route result types.

use geo::LineString;

use crate::cost::Policy;
use crate::model::{CrashExposure, Edge, ElevationGrade};
use crate::{EdgeId, NodeId};

/// One traversed edge, oriented along the direction of travel.
#[derive(Debug, Clone)]
pub struct RouteSegment {
    pub edge_id: EdgeId,
    /// 1-based position within the route
    pub seq: u32,
    pub name: Option<String>,
    pub road_class: String,
    pub length_m: f64,
    /// Node the segment is entered from
    pub start_node: NodeId,
    /// Node the segment leads to; equals the next segment's `start_node`
    pub end_node: NodeId,
    /// Geometry reversed where needed so consecutive segments chain
    pub geometry: LineString<f64>,
    /// Grade record oriented along travel; `None` when the edge has no
    /// terrain coverage
    pub elevation: Option<ElevationGrade>,
    pub exposure: CrashExposure,
    /// Distance from the route start to the end of this segment
    pub cumulative_distance_m: f64,
}

impl RouteSegment {
    /// Oriented grade, with missing terrain coverage read as flat.
    pub fn grade_percent(&self) -> f64 {
        self.elevation.map_or(0.0, |g| g.grade_percent)
    }

    pub fn elevation_change_m(&self) -> f64 {
        self.elevation.map_or(0.0, |g| g.elevation_change_m)
    }

    pub(crate) fn from_edge(
        edge: &Edge,
        seq: u32,
        forward: bool,
        elevation: Option<ElevationGrade>,
        exposure: CrashExposure,
        cumulative_distance_m: f64,
    ) -> Self {
        let geometry = if forward {
            edge.geometry.clone()
        } else {
            LineString::new(edge.geometry.0.iter().rev().copied().collect())
        };
        let elevation = elevation.map(|g| if forward { g } else { g.reversed() });
        let (start_node, end_node) = if forward {
            (edge.source, edge.target)
        } else {
            (edge.target, edge.source)
        };

        Self {
            edge_id: edge.id,
            seq,
            name: edge.name.clone(),
            road_class: edge.road_class.clone(),
            length_m: edge.length_m,
            start_node,
            end_node,
            geometry,
            elevation,
            exposure,
            cumulative_distance_m,
        }
    }
}

/// A computed route: an ordered, connected walk from source to target.
///
/// `segments` is empty exactly when `source == target`; a disconnected pair
/// never produces a `Route` at all.
#[derive(Debug, Clone)]
pub struct Route {
    pub source: NodeId,
    pub target: NodeId,
    pub policy: Policy,
    pub segments: Vec<RouteSegment>,
    /// Total traversal cost under the requested policy
    pub total_cost: f64,
    /// Sum of segment lengths in meters
    pub total_length_m: f64,
}

impl Route {
    /// Zero-edge, zero-length route for a source == target query.
    pub(crate) fn trivial(node: NodeId, policy: Policy) -> Self {
        Self {
            source: node,
            target: node,
            policy,
            segments: Vec::new(),
            total_cost: 0.0,
            total_length_m: 0.0,
        }
    }
}
