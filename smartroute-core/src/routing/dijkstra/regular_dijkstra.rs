use hashbrown::HashMap;
use petgraph::graph::NodeIndex;

use super::search::search;
use crate::RoadGraph;
use crate::routing::weights::EdgeWeight;

/// Dijkstra's algorithm run to exhaustion from `source`.
/// Returns final distances (meters) to every reachable node, keyed by node
/// ID, or `None` if `source` is not in the graph.
pub fn shortest_distances<W: EdgeWeight + ?Sized>(
    graph: &RoadGraph,
    source: &str,
    weight: &W,
) -> Option<HashMap<String, f64>> {
    let start = graph.node_index(source)?;
    let distances = dijkstra_path_weights(graph, start, weight);

    Some(
        distances
            .into_iter()
            .filter_map(|(idx, distance)| {
                graph
                    .node_weight(idx)
                    .map(|node| (node.id.clone(), distance))
            })
            .collect(),
    )
}

/// Index-keyed one-to-all distances, used by the distance matrix
pub(crate) fn dijkstra_path_weights<W: EdgeWeight + ?Sized>(
    graph: &RoadGraph,
    start: NodeIndex,
    weight: &W,
) -> HashMap<NodeIndex, f64> {
    let tree = search(graph, start, None, weight);
    let settled = tree.settled;

    tree.distances
        .into_iter()
        .filter(|(idx, _)| settled.contains(idx.index()))
        .collect()
}
