//! Route queries over the weighted graph view.

mod dijkstra;
pub mod profile;
mod route;
mod to_geojson;

pub use profile::{ProfilePoint, elevation_profile};
pub use route::{Route, RouteSegment};

use crate::cost::{Policy, edge_cost};
use crate::store::NetworkStore;
use crate::{Error, NodeId, model::RoutingModel};

/// Shortest route between two nodes under a policy.
///
/// Node ids are validated against the store before any search: an unknown id
/// is an input error. A pair with no connecting walk (including a source or
/// target with no incident edges) yields `Ok(None)`, the explicit no-route
/// outcome; `source == target` yields a zero-edge route. Each query holds
/// only local search state, so any number can run concurrently against the
/// same model.
pub fn find_route<S: NetworkStore>(
    model: &RoutingModel<S>,
    source: NodeId,
    target: NodeId,
    policy: Policy,
) -> Result<Option<Route>, Error> {
    let store = model.store();
    store.get_node(source).ok_or(Error::NodeNotFound(source))?;
    store.get_node(target).ok_or(Error::NodeNotFound(target))?;

    if source == target {
        return Ok(Some(Route::trivial(source, policy)));
    }

    // Isolated nodes exist in the store but not in the graph
    let (Some(start_ix), Some(target_ix)) = (model.node_ix(source), model.node_ix(target)) else {
        return Ok(None);
    };

    let graph = model.graph();
    let result = dijkstra::shortest_path(graph, start_ix, target_ix, |edge_idx| {
        let edge = model.edge(edge_idx);
        edge_cost(edge, store.get_elevation_grade(edge.id).as_ref(), policy)
    });
    let Some(search) = result else {
        return Ok(None);
    };

    let mut segments = Vec::with_capacity(search.edges.len());
    let mut cumulative = 0.0;
    for (i, &edge_idx) in search.edges.iter().enumerate() {
        let edge = model.edge(edge_idx);
        let entered_from = graph[search.nodes[i]];
        let forward = entered_from == edge.source;

        cumulative += edge.length_m;
        segments.push(RouteSegment::from_edge(
            edge,
            (i + 1) as u32,
            forward,
            store.get_elevation_grade(edge.id),
            store.crash_exposure(edge.id),
            cumulative,
        ));
    }

    Ok(Some(Route {
        source,
        target,
        policy,
        segments,
        total_cost: search.total_cost,
        total_length_m: cumulative,
    }))
}
