//! REST API: route queries, elevation profiles and the demo node picker.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::json;
use velopath_core::prelude::*;

use crate::error::ApiError;

pub struct AppState {
    pub model: RoutingModel<MemoryStore>,
}

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/route", get(route))
        .route("/api/elevation-profile", get(profile))
        .route("/api/nodes/random", get(random_nodes))
}

#[derive(Debug, Deserialize)]
struct RouteQuery {
    start: NodeId,
    end: NodeId,
    /// Routing policy; "fastest" when omitted, matching the reference UI
    #[serde(rename = "type")]
    policy: Option<String>,
}

async fn route(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RouteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let policy: Policy = query.policy.as_deref().unwrap_or("fastest").parse()?;

    let route = find_route(&state.model, query.start, query.end, policy)?
        .ok_or_else(ApiError::no_route)?;

    let collection = route
        .to_geojson()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(json!(collection)))
}

#[derive(Debug, Deserialize)]
struct ProfileQuery {
    start: NodeId,
    end: NodeId,
}

/// Elevation profile along the shortest-by-distance route, one row per
/// segment in path order.
async fn profile(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<Vec<ProfilePoint>>, ApiError> {
    let route = find_route(&state.model, query.start, query.end, Policy::Fastest)?
        .ok_or_else(ApiError::no_route)?;
    Ok(Json(elevation_profile(&route)))
}

#[derive(Debug, Serialize)]
struct NodeSummary {
    id: NodeId,
    lat: f64,
    lon: f64,
}

impl From<Node> for NodeSummary {
    fn from(node: Node) -> Self {
        Self {
            id: node.id,
            lat: node.geometry.y(),
            lon: node.geometry.x(),
        }
    }
}

/// Two well-connected nodes for demo queries.
async fn random_nodes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NodeSummary>>, ApiError> {
    let (a, b) = state
        .model
        .random_node_pair()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(vec![a.into(), b.into()]))
}
