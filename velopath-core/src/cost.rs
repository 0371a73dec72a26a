//! Edge cost model.
//!
//! A pure function from an edge's static and derived attributes plus a
//! routing policy to a non-negative scalar weight. Keeping the policy a
//! closed enum (rather than a templated cost expression) makes each variant
//! independently unit-testable and rejects unknown policies before any
//! search starts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::model::{CrashExposure, Edge, ElevationGrade};

/// Multiplier applied per percent of uphill grade under the safest policy.
pub const GRADE_PENALTY_FACTOR: f64 = 0.3;

/// Cost-model variant selectable per route request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Shortest by distance. Ignores class, grade and crash data.
    Fastest,
    /// Distance scaled by road-class priority and an uphill-grade penalty.
    Safest,
}

impl FromStr for Policy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fastest" => Ok(Self::Fastest),
            "safest" => Ok(Self::Safest),
            other => Err(Error::InvalidPolicy(other.to_owned())),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fastest => write!(f, "fastest"),
            Self::Safest => write!(f, "safest"),
        }
    }
}

/// Traversal weight of an edge under a policy.
///
/// * `fastest`: plain length in meters.
/// * `safest`: `length * class_priority * (1 + max(0, grade) * 0.3)`.
///   Uphill grade raises the cost in proportion to its magnitude; downhill
///   never drops it below the flat baseline, so descents are not rewarded.
///
/// An edge without a grade record is costed as flat. The result is
/// monotonically non-decreasing in length and strictly positive for
/// positive-length edges, which the shortest-path search relies on.
pub fn edge_cost(edge: &Edge, grade: Option<&ElevationGrade>, policy: Policy) -> f64 {
    match policy {
        Policy::Fastest => edge.length_m,
        Policy::Safest => {
            let grade_percent = grade.map_or(0.0, |g| g.grade_percent);
            edge.length_m * edge.class_priority * (1.0 + grade_percent.max(0.0) * GRADE_PENALTY_FACTOR)
        }
    }
}

/// Extension point: the safest cost with crash exposure folded in as a
/// `(1 + score * k)` multiplier.
///
/// The deployed cost model surfaces exposure as display metadata only and
/// does not feed it into the search weight; this variant exists so the
/// penalty can be enabled deliberately rather than wired in by accident.
/// It is not called by [`crate::routing::find_route`].
pub fn edge_cost_with_exposure(
    edge: &Edge,
    grade: Option<&ElevationGrade>,
    exposure: &CrashExposure,
    policy: Policy,
    exposure_factor: f64,
) -> f64 {
    edge_cost(edge, grade, policy) * (1.0 + exposure.score * exposure_factor)
}
