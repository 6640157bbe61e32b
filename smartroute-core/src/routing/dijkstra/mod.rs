pub mod regular_dijkstra;
mod search;
mod state;
pub mod traced_dijkstra;

pub(crate) use regular_dijkstra::dijkstra_path_weights;
pub use regular_dijkstra::shortest_distances;
pub use traced_dijkstra::{ShortestPath, shortest_path};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{RoadGraphBuilder, synthetic_grid};
    use crate::routing::weights::{BaseWeight, TrafficLevel};
    use crate::{RoadEdge, RoadGraph, RoadNode};

    /// N1(0,0) N2(0,1) N3(1,1) N4(1,0) joined in a cycle with unit weights
    fn square() -> RoadGraph {
        let mut builder = RoadGraphBuilder::new();
        builder.add_node(RoadNode::new("N1", 0.0, 0.0));
        builder.add_node(RoadNode::new("N2", 0.0, 1.0));
        builder.add_node(RoadNode::new("N3", 1.0, 1.0));
        builder.add_node(RoadNode::new("N4", 1.0, 0.0));
        for (a, b) in [("N1", "N2"), ("N2", "N3"), ("N3", "N4"), ("N4", "N1")] {
            builder.add_road(a, b, RoadEdge::new(1.0, None));
        }
        builder.build()
    }

    fn path_cost(graph: &RoadGraph, path: &[String], weight: impl Fn(&RoadEdge) -> f64) -> f64 {
        path.windows(2)
            .map(|pair| weight(graph.edge(&pair[0], &pair[1]).unwrap()))
            .sum()
    }

    #[test]
    fn square_opposite_corner() {
        let graph = square();
        let result = shortest_path(&graph, "N1", "N3", &BaseWeight).unwrap();

        assert_eq!(result.distance, 2.0);
        assert_eq!(result.path.len(), 3);
        assert_eq!(result.source(), "N1");
        assert_eq!(result.target(), "N3");
        assert!(result.path[1] == "N2" || result.path[1] == "N4");
        assert_eq!(result.hops(), 2);
    }

    #[test]
    fn same_source_and_target() {
        let graph = square();
        let result = shortest_path(&graph, "N2", "N2", &BaseWeight).unwrap();

        assert_eq!(result.path, vec!["N2".to_string()]);
        assert_eq!(result.distance, 0.0);
        assert_eq!(result.hops(), 0);
    }

    #[test]
    fn unreachable_target_is_none() {
        let mut builder = RoadGraphBuilder::new();
        builder.add_node(RoadNode::new("a", 0.0, 0.0));
        builder.add_node(RoadNode::new("b", 0.0, 0.001));
        builder.add_node(RoadNode::new("island", 1.0, 1.0));
        builder.add_node(RoadNode::new("shore", 1.0, 1.001));
        builder.add_road("a", "b", RoadEdge::new(5.0, None));
        builder.add_road("island", "shore", RoadEdge::new(5.0, None));
        let graph = builder.build();

        assert!(shortest_path(&graph, "a", "island", &BaseWeight).is_none());
        assert!(shortest_path(&graph, "a", "nowhere", &BaseWeight).is_none());
        assert!(shortest_path(&graph, "nowhere", "a", &BaseWeight).is_none());
    }

    #[test]
    fn prefers_cheaper_detour() {
        let mut builder = RoadGraphBuilder::new();
        for (id, lon) in [("s", 0.0), ("m", 0.5), ("t", 1.0)] {
            builder.add_node(RoadNode::new(id, 0.0, lon));
        }
        builder.add_road("s", "t", RoadEdge::new(10.0, None));
        builder.add_road("s", "m", RoadEdge::new(3.0, None));
        builder.add_road("m", "t", RoadEdge::new(3.0, None));
        let graph = builder.build();

        let result = shortest_path(&graph, "s", "t", &BaseWeight).unwrap();
        assert_eq!(result.path, vec!["s", "m", "t"]);
        assert_eq!(result.distance, 6.0);
    }

    #[test]
    fn weight_function_changes_the_route() {
        let mut builder = RoadGraphBuilder::new();
        for (id, lon) in [("s", 0.0), ("m", 0.5), ("t", 1.0)] {
            builder.add_node(RoadNode::new(id, 0.0, lon));
        }
        builder.add_road("s", "t", RoadEdge::new(10.0, None));
        builder.add_road("s", "m", RoadEdge::new(3.0, None));
        builder.add_road("m", "t", RoadEdge::new(3.0, None));
        let graph = builder.build();

        // Short segments are congested
        let congested = |edge: &RoadEdge| {
            if edge.weight < 5.0 {
                edge.weight * 4.0
            } else {
                edge.weight
            }
        };
        let result = shortest_path(&graph, "s", "t", &congested).unwrap();
        assert_eq!(result.path, vec!["s", "t"]);
        assert_eq!(result.distance, 10.0);
    }

    #[test]
    fn distance_equals_sum_of_edge_costs() {
        let graph = synthetic_grid((37.2153, 28.3636), 8, 0.002);
        let ids: Vec<String> = graph.nodes().map(|n| n.id.clone()).collect();

        for (source, target) in [(0, 63), (5, 40), (17, 17), (62, 1)] {
            for level in [TrafficLevel::Light, TrafficLevel::Heavy] {
                let result = shortest_path(&graph, &ids[source], &ids[target], &level).unwrap();
                let summed = path_cost(&graph, &result.path, |e| e.weight * level.multiplier());
                assert!(
                    (summed - result.distance).abs() < 1e-6,
                    "{source}->{target}: {summed} vs {}",
                    result.distance
                );
            }
        }
    }

    #[test]
    fn early_exit_matches_exhaustive_search() {
        let graph = synthetic_grid((0.0, 0.0), 6, 0.001);
        let all = shortest_distances(&graph, "1", &BaseWeight).unwrap();

        assert_eq!(all.len(), graph.node_count());
        assert_eq!(all["1"], 0.0);
        for node in graph.nodes() {
            let single = shortest_path(&graph, "1", &node.id, &BaseWeight).unwrap();
            assert!((single.distance - all[&node.id]).abs() < 1e-9);
        }
    }

    #[test]
    fn exhaustive_search_omits_unreachable_nodes() {
        let mut builder = RoadGraphBuilder::new();
        builder.add_node(RoadNode::new("a", 0.0, 0.0));
        builder.add_node(RoadNode::new("b", 0.0, 0.001));
        builder.add_node(RoadNode::new("c", 1.0, 1.0));
        builder.add_road("a", "b", RoadEdge::new(2.0, None));
        let graph = builder.build();

        let all = shortest_distances(&graph, "a", &BaseWeight).unwrap();
        assert_eq!(all.len(), 2);
        assert!(!all.contains_key("c"));
        assert!(shortest_distances(&graph, "zzz", &BaseWeight).is_none());
    }

    #[test]
    fn impassable_edges_are_skipped() {
        let graph = square();
        let closed = |_: &RoadEdge| f64::INFINITY;
        assert!(shortest_path(&graph, "N1", "N3", &closed).is_none());
        assert!(shortest_path(&graph, "N1", "N1", &closed).is_some());
    }
}
