//! Single-source shortest path over the undirected street graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::HashMap;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::NodeId;

/// Frontier entry. Ordered as a min-heap by cost; equal costs fall back to
/// discovery order so ties resolve deterministically to the edge seen first.
#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    order: u64,
    node: NodeIndex,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap (reversed from the standard max BinaryHeap)
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest walk from `start` to `target`.
#[derive(Debug, Clone)]
pub(crate) struct SearchResult {
    /// Visited nodes, start first, target last
    pub nodes: Vec<NodeIndex>,
    /// Graph edge weights (edge snapshot indices) between consecutive nodes
    pub edges: Vec<usize>,
    pub total_cost: f64,
}

/// Dijkstra with early exit once the target pops off the frontier. Edge
/// weights come from `edge_cost`, keyed by the graph's edge weight (the
/// snapshot index); weights must be non-negative. Returns `None` when the
/// target is unreachable.
pub(crate) fn shortest_path<F>(
    graph: &UnGraph<NodeId, usize>,
    start: NodeIndex,
    target: NodeIndex,
    mut edge_cost: F,
) -> Option<SearchResult>
where
    F: FnMut(usize) -> f64,
{
    let estimated = graph.node_count().min(1000);
    let mut distances: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated);
    let mut predecessors: HashMap<NodeIndex, (NodeIndex, usize)> =
        HashMap::with_capacity(estimated);
    let mut heap = BinaryHeap::with_capacity(estimated / 4);
    let mut next_order: u64 = 0;

    distances.insert(start, 0.0);
    heap.push(State {
        cost: 0.0,
        order: next_order,
        node: start,
    });

    let mut reached = false;
    while let Some(State { cost, node, .. }) = heap.pop() {
        if node == target {
            reached = true;
            break;
        }

        // Stale frontier entry, a cheaper path was already settled
        if distances.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }

        for edge in graph.edges(node) {
            let next = edge.target();
            let edge_idx = *edge.weight();
            let next_cost = cost + edge_cost(edge_idx);

            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    next_order += 1;
                    heap.push(State {
                        cost: next_cost,
                        order: next_order,
                        node: next,
                    });
                    predecessors.insert(next, (node, edge_idx));
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        next_order += 1;
                        heap.push(State {
                            cost: next_cost,
                            order: next_order,
                            node: next,
                        });
                        predecessors.insert(next, (node, edge_idx));
                    }
                }
            }
        }
    }

    if !reached && !predecessors.contains_key(&target) && start != target {
        return None;
    }

    // Follow predecessors backward from the target
    let mut nodes = vec![target];
    let mut edges = Vec::new();
    let mut current = target;
    while current != start {
        let &(prev, edge_idx) = predecessors.get(&current)?;
        edges.push(edge_idx);
        nodes.push(prev);
        current = prev;
    }
    nodes.reverse();
    edges.reverse();

    Some(SearchResult {
        nodes,
        edges,
        total_cost: distances.get(&target).copied()?,
    })
}
