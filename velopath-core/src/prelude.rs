// Re-export of key components
pub use crate::cost::{GRADE_PENALTY_FACTOR, Policy, edge_cost, edge_cost_with_exposure};
pub use crate::derive::{
    CrashLinkParams, CrashLinkSummary, ElevationRunSummary, derive_elevation_grades,
    link_crash_incidents,
};
pub use crate::loading::{load_incidents, load_network, load_store};
pub use crate::model::{
    CrashExposure, CrashLink, Edge, ElevationGrade, Incident, Node, RoutingModel, Severity,
};
pub use crate::routing::{ProfilePoint, Route, RouteSegment, elevation_profile, find_route};
pub use crate::store::{MemoryStore, NetworkStore};
pub use crate::terrain::{GridTerrain, TerrainSampler};

// Identifier types
pub use crate::{EdgeId, Error, IncidentId, NodeId};
