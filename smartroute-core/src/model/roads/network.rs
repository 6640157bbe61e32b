//! Road network graph with node-ID lookup and a spatial index

use geo::{LineString, Point};
use hashbrown::HashMap;
use log::debug;
use petgraph::{
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};
use rstar::{RTree, primitives::GeomWithData};
use serde::Serialize;

use super::components::{RoadEdge, RoadNode};

/// Node position in `[lon, lat]` order tagged with its graph index
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Road network graph
///
/// Nodes are addressed by their string ID. Every edge has a reverse twin
/// with reversed geometry. The graph is never mutated after construction:
/// pruning and reloading produce a new instance.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    pub(crate) graph: DiGraph<RoadNode, RoadEdge>,
    index: HashMap<String, NodeIndex>,
    rtree: RTree<IndexedPoint>,
}

/// Summary numbers for logging and the stats endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub isolated_nodes: usize,
    pub average_degree: f64,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_graph(graph: DiGraph<RoadNode, RoadEdge>) -> Self {
        let index = graph
            .node_indices()
            .map(|idx| (graph[idx].id.clone(), idx))
            .collect();
        let rtree = build_rtree(&graph);

        Self {
            graph,
            index,
            rtree,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&RoadNode> {
        self.node_index(id).map(|idx| &self.graph[idx])
    }

    pub(crate) fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub(crate) fn node_weight(&self, idx: NodeIndex) -> Option<&RoadNode> {
        self.graph.node_weight(idx)
    }

    pub(crate) fn rtree(&self) -> &RTree<IndexedPoint> {
        &self.rtree
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RoadNode> {
        self.graph.node_weights()
    }

    /// All directed edges as `(source, target, edge)`
    pub fn edges(&self) -> impl Iterator<Item = (&RoadNode, &RoadNode, &RoadEdge)> {
        self.graph.edge_references().map(|edge| {
            (
                &self.graph[edge.source()],
                &self.graph[edge.target()],
                edge.weight(),
            )
        })
    }

    /// Outgoing edges of a node; empty for unknown IDs
    pub fn outgoing<'a>(
        &'a self,
        id: &str,
    ) -> impl Iterator<Item = (&'a RoadNode, &'a RoadEdge)> + 'a {
        self.node_index(id).into_iter().flat_map(move |idx| {
            self.graph
                .edges(idx)
                .map(move |edge| (&self.graph[edge.target()], edge.weight()))
        })
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.outgoing(id).count()
    }

    pub(crate) fn has_outgoing(&self, idx: NodeIndex) -> bool {
        self.graph.edges(idx).next().is_some()
    }

    /// Edge from `source` to `target`, if the two nodes are adjacent
    pub fn edge(&self, source: &str, target: &str) -> Option<&RoadEdge> {
        let a = self.node_index(source)?;
        let b = self.node_index(target)?;
        self.graph
            .find_edge(a, b)
            .and_then(|edge| self.graph.edge_weight(edge))
    }

    /// Road shape of an edge; the straight node-to-node line when none was loaded
    pub(crate) fn edge_geometry(&self, edge: EdgeIndex) -> Option<LineString<f64>> {
        let (source, target) = self.graph.edge_endpoints(edge)?;
        let weight = self.graph.edge_weight(edge)?;

        match &weight.geometry {
            Some(line) if line.0.len() >= 2 => Some(line.clone()),
            _ => {
                let from: Point<f64> = self.graph[source].geometry;
                let to: Point<f64> = self.graph[target].geometry;
                Some(LineString::from(vec![from.0, to.0]))
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> GraphStats {
        let nodes = self.graph.node_count();
        let edges = self.graph.edge_count();
        let isolated_nodes = self
            .graph
            .node_indices()
            .filter(|&idx| is_isolated(&self.graph, idx))
            .count();
        let average_degree = if nodes == 0 {
            0.0
        } else {
            edges as f64 / nodes as f64
        };

        GraphStats {
            nodes,
            edges,
            isolated_nodes,
            average_degree,
        }
    }

    /// New graph without nodes that have neither incoming nor outgoing edges.
    ///
    /// Removal is repeated until nothing changes, so the result is a fixed
    /// point and pruning it again is a no-op.
    pub fn pruned(&self) -> RoadGraph {
        let mut graph = self.graph.clone();
        let mut removed_total = 0;

        loop {
            let before = graph.node_count();
            let next = graph.filter_map(
                |idx, node| (!is_isolated(&graph, idx)).then(|| node.clone()),
                |_, edge| Some(edge.clone()),
            );
            graph = next;

            let removed = before - graph.node_count();
            if removed == 0 {
                break;
            }
            removed_total += removed;
        }

        debug!("Pruned {removed_total} isolated nodes");
        RoadGraph::from_graph(graph)
    }
}

fn is_isolated(graph: &DiGraph<RoadNode, RoadEdge>, idx: NodeIndex) -> bool {
    graph.neighbors_undirected(idx).next().is_none()
}

fn build_rtree(graph: &DiGraph<RoadNode, RoadEdge>) -> RTree<IndexedPoint> {
    let points = graph
        .node_indices()
        .map(|idx| {
            let point = graph[idx].geometry;
            GeomWithData::new([point.x(), point.y()], idx)
        })
        .collect();

    RTree::bulk_load(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::RoadGraphBuilder;

    fn chain_with_loners() -> RoadGraph {
        let mut builder = RoadGraphBuilder::new();
        builder.add_node(RoadNode::new("a", 0.0, 0.0));
        builder.add_node(RoadNode::new("b", 0.0, 0.001));
        builder.add_node(RoadNode::new("c", 0.0, 0.002));
        builder.add_node(RoadNode::new("lonely", 1.0, 1.0));
        builder.add_node(RoadNode::new("hermit", 2.0, 2.0));
        builder.add_road("a", "b", RoadEdge::new(10.0, None));
        builder.add_road("b", "c", RoadEdge::new(10.0, None));
        builder.build()
    }

    #[test]
    fn lookups_by_id() {
        let graph = chain_with_loners();

        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.contains("b"));
        assert!(!graph.contains("z"));
        assert_eq!(graph.out_degree("b"), 2);
        assert_eq!(graph.out_degree("lonely"), 0);
        assert_eq!(graph.out_degree("missing"), 0);
        assert_eq!(graph.edge("a", "b").map(|e| e.weight), Some(10.0));
        assert!(graph.edge("a", "c").is_none());
    }

    #[test]
    fn stats_count_isolated_nodes() {
        let stats = chain_with_loners().stats();

        assert_eq!(stats.nodes, 5);
        assert_eq!(stats.edges, 4);
        assert_eq!(stats.isolated_nodes, 2);
        assert!((stats.average_degree - 0.8).abs() < 1e-9);
    }

    #[test]
    fn pruning_removes_isolated_nodes_and_is_idempotent() {
        let graph = chain_with_loners();
        let once = graph.pruned();
        let twice = once.pruned();

        assert_eq!(once.node_count(), 3);
        assert!(!once.contains("lonely"));
        assert!(!once.contains("hermit"));
        assert_eq!(once.stats().isolated_nodes, 0);

        assert_eq!(twice.node_count(), once.node_count());
        assert_eq!(twice.edge_count(), once.edge_count());
        let mut ids_once: Vec<_> = once.nodes().map(|n| n.id.clone()).collect();
        let mut ids_twice: Vec<_> = twice.nodes().map(|n| n.id.clone()).collect();
        ids_once.sort();
        ids_twice.sort();
        assert_eq!(ids_once, ids_twice);
    }

    #[test]
    fn pruning_keeps_edges_addressable() {
        let pruned = chain_with_loners().pruned();
        assert_eq!(pruned.edge("b", "c").map(|e| e.weight), Some(10.0));
        assert_eq!(pruned.outgoing("b").count(), 2);
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = RoadGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.stats().average_degree, 0.0);
        assert_eq!(graph.pruned().node_count(), 0);
    }

    #[test]
    fn implied_geometry_is_straight_line() {
        let graph = chain_with_loners();
        let a = graph.node_index("a").unwrap();
        let b = graph.node_index("b").unwrap();
        let edge = graph.graph.find_edge(a, b).unwrap();
        let line = graph.edge_geometry(edge).unwrap();

        assert_eq!(line.0.len(), 2);
        assert_eq!(line.0[0], graph.node("a").unwrap().geometry.0);
        assert_eq!(line.0[1], graph.node("b").unwrap().geometry.0);
    }
}
