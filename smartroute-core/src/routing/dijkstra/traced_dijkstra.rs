use petgraph::graph::EdgeIndex;
use serde::Serialize;

use super::search::search;
use crate::RoadGraph;
use crate::routing::weights::EdgeWeight;

/// Node path from source to target (inclusive) with its total cost
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortestPath {
    pub path: Vec<String>,
    pub distance: f64,
    #[serde(skip)]
    pub(crate) edges: Vec<EdgeIndex>,
}

impl ShortestPath {
    pub fn source(&self) -> &str {
        &self.path[0]
    }

    pub fn target(&self) -> &str {
        &self.path[self.path.len() - 1]
    }

    /// Number of edges traversed
    pub fn hops(&self) -> usize {
        self.edges.len()
    }
}

/// Dijkstra's algorithm between two nodes, stopping as soon as the target
/// distance is final.
///
/// Returns `None` when either node is unknown or the target is unreachable.
/// Among equal-cost paths the one discovered first is returned; only the
/// total distance is guaranteed.
pub fn shortest_path<W: EdgeWeight + ?Sized>(
    graph: &RoadGraph,
    source: &str,
    target: &str,
    weight: &W,
) -> Option<ShortestPath> {
    let start = graph.node_index(source)?;
    let end = graph.node_index(target)?;

    let tree = search(graph, start, Some(end), weight);
    let distance = tree.distance(end)?;

    // Follow predecessors backward from target to start
    let mut nodes = vec![end];
    let mut edges = Vec::new();
    let mut current = end;
    while current != start {
        let &(prev, edge) = tree.predecessors.get(&current)?;
        nodes.push(prev);
        edges.push(edge);
        current = prev;
    }
    nodes.reverse();
    edges.reverse();

    let path = nodes
        .into_iter()
        .map(|idx| graph.node_weight(idx).map(|node| node.id.clone()))
        .collect::<Option<Vec<_>>>()?;

    Some(ShortestPath {
        path,
        distance,
        edges,
    })
}
