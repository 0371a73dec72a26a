//! Graph view over a network store.

use hashbrown::HashMap;
use log::info;
use petgraph::graph::{NodeIndex, UnGraph};
use rand::seq::IndexedRandom;

use crate::model::{Edge, Node};
use crate::store::NetworkStore;
use crate::{Error, NodeId};

/// Minimum degree for a node to count as well-connected when picking demo
/// node pairs.
pub const WELL_CONNECTED_DEGREE: u32 = 3;

/// Immutable graph view used by route queries.
///
/// Built once from the store's edge set; the undirected petgraph topology and
/// the edge snapshot never change afterwards, so any number of concurrent
/// queries can share a `RoutingModel` without locking. Derived attributes
/// (grades, crash links) are read from the store at query time and may be
/// rebuilt underneath by the batch stages.
pub struct RoutingModel<S: NetworkStore> {
    store: S,
    graph: UnGraph<NodeId, usize>,
    edges: Vec<Edge>,
    node_index: HashMap<NodeId, NodeIndex>,
}

impl<S: NetworkStore> RoutingModel<S> {
    pub fn new(store: S) -> Self {
        let edges = store.list_edges();
        let mut graph = UnGraph::default();
        let mut node_index: HashMap<NodeId, NodeIndex> = HashMap::new();

        for (idx, edge) in edges.iter().enumerate() {
            let a = *node_index
                .entry(edge.source)
                .or_insert_with(|| graph.add_node(edge.source));
            let b = *node_index
                .entry(edge.target)
                .or_insert_with(|| graph.add_node(edge.target));
            graph.add_edge(a, b, idx);
        }

        info!(
            "routing graph built: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Self {
            store,
            graph,
            edges,
            node_index,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn graph(&self) -> &UnGraph<NodeId, usize> {
        &self.graph
    }

    /// Edge snapshot by its position in the graph's edge weights.
    pub(crate) fn edge(&self, idx: usize) -> &Edge {
        &self.edges[idx]
    }

    /// Graph index of a node, if any edge touches it. Isolated nodes exist
    /// in the store but not in the graph.
    pub(crate) fn node_ix(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_index.get(&id).copied()
    }

    /// Two distinct node ids for test or demo queries, biased toward
    /// well-connected nodes (degree >= 3) so the pair is unlikely to sit on
    /// a trivially disconnected fragment.
    pub fn random_node_pair(&self) -> Result<(Node, Node), Error> {
        let all = self.store.list_nodes();
        let well_connected: Vec<&Node> = all
            .iter()
            .filter(|node| node.degree >= WELL_CONNECTED_DEGREE)
            .collect();

        let pool: Vec<&Node> = if well_connected.len() >= 2 {
            well_connected
        } else {
            all.iter().collect()
        };
        if pool.len() < 2 {
            return Err(Error::InvalidData(
                "network has fewer than two nodes".to_owned(),
            ));
        }

        let mut rng = rand::rng();
        let picked: Vec<&&Node> = pool.choose_multiple(&mut rng, 2).collect();
        Ok(((*picked[0]).clone(), (*picked[1]).clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use geo::{Point, line_string};

    fn edge(id: i64, source: i64, target: i64) -> Edge {
        Edge {
            id,
            source,
            target,
            geometry: line_string![(x: 0.0, y: 0.0), (x: 0.001, y: 0.0)],
            length_m: 111.0,
            road_class: "residential".to_owned(),
            class_priority: 1.0,
            name: None,
        }
    }

    fn node(id: i64, degree: u32) -> Node {
        Node {
            id,
            geometry: Point::new(0.0, 0.0),
            degree,
        }
    }

    #[test]
    fn graph_covers_all_edge_endpoints() {
        let store = MemoryStore::new(
            vec![node(1, 1), node(2, 2), node(3, 1)],
            vec![edge(10, 1, 2), edge(11, 2, 3)],
            vec![],
        );
        let model = RoutingModel::new(store);
        assert!(model.node_ix(1).is_some());
        assert!(model.node_ix(3).is_some());
        assert!(model.node_ix(99).is_none());
    }

    #[test]
    fn random_pair_prefers_well_connected_nodes() {
        let nodes = vec![node(1, 4), node(2, 3), node(3, 1), node(4, 1)];
        let edges = vec![edge(10, 1, 2), edge(11, 2, 3), edge(12, 1, 4)];
        let model = RoutingModel::new(MemoryStore::new(nodes, edges, vec![]));

        for _ in 0..20 {
            let (a, b) = model.random_node_pair().unwrap();
            assert_ne!(a.id, b.id);
            assert!(a.degree >= WELL_CONNECTED_DEGREE);
            assert!(b.degree >= WELL_CONNECTED_DEGREE);
        }
    }

    #[test]
    fn random_pair_falls_back_when_few_connected_nodes() {
        let nodes = vec![node(1, 1), node(2, 1)];
        let edges = vec![edge(10, 1, 2)];
        let model = RoutingModel::new(MemoryStore::new(nodes, edges, vec![]));
        let (a, b) = model.random_node_pair().unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn random_pair_fails_on_single_node_network() {
        let model = RoutingModel::new(MemoryStore::new(vec![node(1, 0)], vec![], vec![]));
        assert!(model.random_node_pair().is_err());
    }
}
