use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use petgraph::{
    graph::{EdgeIndex, NodeIndex},
    visit::EdgeRef,
};

use super::state::State;
use crate::RoadGraph;
use crate::routing::weights::{EdgeWeight, sanitized_cost};

/// Settled part of a Dijkstra search
pub(super) struct SearchTree {
    pub(super) distances: HashMap<NodeIndex, f64>,
    pub(super) predecessors: HashMap<NodeIndex, (NodeIndex, EdgeIndex)>,
    pub(super) settled: FixedBitSet,
}

impl SearchTree {
    /// Final distance of a settled node
    pub(super) fn distance(&self, node: NodeIndex) -> Option<f64> {
        if self.settled.contains(node.index()) {
            self.distances.get(&node).copied()
        } else {
            None
        }
    }
}

/// Dijkstra from `start`, stopping once `target` is settled (or the
/// frontier is exhausted when no target is given).
///
/// Stale frontier entries are skipped on pop instead of being decreased
/// in place.
pub(super) fn search<W: EdgeWeight + ?Sized>(
    graph: &RoadGraph,
    start: NodeIndex,
    target: Option<NodeIndex>,
    weight: &W,
) -> SearchTree {
    let inner = &graph.graph;
    let estimated_nodes = inner.node_count().min(1000);
    let mut distances: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> =
        HashMap::with_capacity(estimated_nodes);
    let mut settled = FixedBitSet::with_capacity(inner.node_count());
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);
    let mut seq = 0;

    // Start node has distance 0
    heap.push(State {
        cost: 0.0,
        seq,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node, .. }) = heap.pop() {
        // Skip stale entries
        if settled.put(node.index()) {
            continue;
        }

        if target == Some(node) {
            break;
        }

        for edge in inner.edges(node) {
            let next = edge.target();

            // Graph snapshots may reference nodes that no longer exist
            if inner.node_weight(next).is_none() || settled.contains(next.index()) {
                continue;
            }

            let next_cost = cost + sanitized_cost(weight, edge.weight());
            if !next_cost.is_finite() {
                continue;
            }

            if distances.get(&next).is_none_or(|&best| next_cost < best) {
                distances.insert(next, next_cost);
                predecessors.insert(next, (node, edge.id()));
                seq += 1;
                heap.push(State {
                    cost: next_cost,
                    seq,
                    node: next,
                });
            }
        }
    }

    SearchTree {
        distances,
        predecessors,
        settled,
    }
}
