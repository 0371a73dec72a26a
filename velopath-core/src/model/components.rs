//! Street network components and derived attribute records.

use chrono::{NaiveDate, NaiveTime};
use geo::{LineString, Point};
use serde::{Deserialize, Serialize};

use crate::{EdgeId, IncidentId, NodeId};

/// Intersection or endpoint in the street network graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    /// Position as (lon, lat) degrees
    pub geometry: Point<f64>,
    /// Count of incident edges
    pub degree: u32,
}

/// Street segment connecting two nodes. Undirected for routing purposes.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    /// Polyline geometry ordered source to target
    pub geometry: LineString<f64>,
    pub length_m: f64,
    /// Road classification tag, e.g. "cycleway" or "residential"
    pub road_class: String,
    /// Static per-class cost multiplier; lower is more bike-friendly
    pub class_priority: f64,
    pub name: Option<String>,
}

/// Derived elevation record, one per edge with terrain coverage.
///
/// The sign of `elevation_change_m` and `grade_percent` follows the
/// source-to-target direction of the edge; consumers traversing the edge in
/// reverse negate both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationGrade {
    pub elevation_start_m: f64,
    pub elevation_end_m: f64,
    pub elevation_change_m: f64,
    /// Rise over run as a percentage; exactly 0 for zero-length edges
    pub grade_percent: f64,
}

impl ElevationGrade {
    /// Build a grade record from endpoint samples. A zero-length edge gets
    /// grade 0 rather than a division by zero; this is the documented
    /// approximation for degenerate geometry.
    pub fn from_samples(start_m: f64, end_m: f64, length_m: f64) -> Self {
        let change = end_m - start_m;
        let grade_percent = if length_m > 0.0 {
            change / length_m * 100.0
        } else {
            0.0
        };
        Self {
            elevation_start_m: start_m,
            elevation_end_m: end_m,
            elevation_change_m: change,
            grade_percent,
        }
    }

    /// The same record as seen when traversing the edge target to source.
    pub fn reversed(self) -> Self {
        Self {
            elevation_start_m: self.elevation_end_m,
            elevation_end_m: self.elevation_start_m,
            elevation_change_m: -self.elevation_change_m,
            grade_percent: -self.grade_percent,
        }
    }
}

/// Association between a crash incident and a nearby edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrashLink {
    pub incident_id: IncidentId,
    pub edge_id: EdgeId,
    /// Great-circle distance from the incident location to the edge geometry
    pub distance_m: f64,
}

/// Crash severity classes, ordered from worst to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Fatal,
    SeriousInjury,
    PersonalInjury,
    Unknown,
}

impl Severity {
    /// Classify a free-text severity field from the crash export.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.contains("fatal") {
            Self::Fatal
        } else if lower.contains("serious") || lower.contains("disabling") {
            Self::SeriousInjury
        } else if lower.contains("injury") {
            Self::PersonalInjury
        } else {
            Self::Unknown
        }
    }

    /// Contribution of one incident of this severity to an edge's
    /// exposure score.
    pub fn weight(self) -> f64 {
        match self {
            Self::Fatal => 5.0,
            Self::SeriousInjury => 3.0,
            Self::PersonalInjury => 1.0,
            Self::Unknown => 0.5,
        }
    }
}

/// Imported crash incident. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Incident {
    pub id: IncidentId,
    /// Geocoded location as (lon, lat) degrees
    pub location: Point<f64>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub severity: Severity,
    pub on_street: Option<String>,
    pub at_street: Option<String>,
    pub light_condition: Option<String>,
    pub injured: u32,
    pub killed: u32,
}

/// Per-edge aggregate over crash links, computed by grouping at read time so
/// newly linked incidents show up without touching the edge table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CrashExposure {
    /// Number of incidents linked to the edge
    pub count: usize,
    /// Sum of severity weights of the linked incidents
    pub score: f64,
}
