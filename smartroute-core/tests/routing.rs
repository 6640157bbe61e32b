// End-to-end checks over the public API: load, route, sequence, snap
use std::fs;
use std::path::PathBuf;

use geo::{Distance, Haversine};
use serde_json::json;
use smartroute_core::loading::{RawGraphData, road_graph_from_raw};
use smartroute_core::prelude::*;

/// Small town: a loop a-b-c-d, a spur d-e, and an unconnected node "x"
fn town_json() -> serde_json::Value {
    json!({
        "nodes": {
            "a": {"lat": 37.2150, "lon": 28.3630},
            "b": {"lat": 37.2150, "lon": 28.3650},
            "c": {"lat": 37.2165, "lon": 28.3650},
            "d": {"lat": 37.2165, "lon": 28.3630},
            "e": {"lat": 37.2180, "lon": 28.3630},
            "x": {"lat": 37.3000, "lon": 28.4000},
        },
        "edges": {
            "a": [{"node": "b", "weight": 170}, ["d", 167]],
            "b": [{"to": "c", "distance": 167}],
            "c": [{"v": "d", "cost": 177}],
            "d": [{"node": "e", "length": "not a number"}],
        },
    })
}

fn write_fixture(name: &str, value: &serde_json::Value) -> PathBuf {
    let path = std::env::temp_dir().join(format!("smartroute-{}-{name}.json", std::process::id()));
    fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_load_from_file_prunes_and_defaults() {
    let path = write_fixture("town", &town_json());
    let graph = load_road_graph(&GraphConfig::new(&path)).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(graph.node_count(), 5);
    assert!(!graph.contains("x"));
    assert_eq!(graph.edge_count(), 10);
    assert_eq!(graph.edge("e", "d").map(|e| e.weight), Some(DEFAULT_EDGE_WEIGHT));
}

#[test]
fn test_every_edge_has_reverse_twin() {
    let raw: RawGraphData = serde_json::from_value(town_json()).unwrap();
    let (graph, report) = road_graph_from_raw(&raw, DEFAULT_EDGE_WEIGHT);

    assert_eq!(report.reverse_synthesized, report.edges_loaded);
    for (source, target, edge) in graph.edges() {
        let back = graph
            .edge(&target.id, &source.id)
            .unwrap_or_else(|| panic!("missing {} -> {}", target.id, source.id));
        assert_eq!(back.weight, edge.weight);
    }
}

#[test]
fn test_routes_around_the_loop() {
    let raw: RawGraphData = serde_json::from_value(town_json()).unwrap();
    let (graph, _) = road_graph_from_raw(&raw, DEFAULT_EDGE_WEIGHT);

    let path = shortest_path(&graph, "b", "e", &BaseWeight).unwrap();
    assert_eq!(path.path, ids(&["b", "a", "d", "e"]));
    assert_eq!(path.distance, 170.0 + 167.0 + 50.0);

    let heavy = shortest_path(&graph, "b", "e", &TrafficLevel::Heavy).unwrap();
    assert!((heavy.distance - path.distance * 1.5).abs() < 1e-9);

    assert!(shortest_path(&graph, "a", "x", &BaseWeight).is_none());
}

#[test]
fn test_plan_through_town() {
    let raw: RawGraphData = serde_json::from_value(town_json()).unwrap();
    let (graph, _) = road_graph_from_raw(&raw, DEFAULT_EDGE_WEIGHT);
    let graph = graph.pruned();
    let service = RoutingService::new(graph);

    let plan = service
        .plan(&ids(&["a", "e", "b"]), &RouteOptions::default())
        .unwrap();
    assert_eq!(plan.stops, ids(&["a", "b", "e"]));
    assert_eq!(plan.sequence_status, SequenceStatus::Optimized);
    assert_eq!(plan.total_distance, 170.0 + 170.0 + 167.0 + 50.0);

    let collection = plan.to_geojson().unwrap();
    assert_eq!(collection.features.len(), 2);
    assert!(plan.road_length() > 0.0);
}

#[test]
fn test_snapping_between_nodes() {
    let raw: RawGraphData = serde_json::from_value(town_json()).unwrap();
    let (graph, _) = road_graph_from_raw(&raw, DEFAULT_EDGE_WEIGHT);

    // Just south of the middle of a-b
    let snap = nearest_location(&graph, 37.2149, 28.3640).unwrap();
    match &snap {
        SnapResult::Projected { source, target, .. } => {
            let mut ends = [source.as_str(), target.as_str()];
            ends.sort_unstable();
            assert_eq!(ends, ["a", "b"]);
        }
        other => panic!("expected an edge projection, got {other:?}"),
    }

    let a = graph.node("a").unwrap().geometry;
    let b = graph.node("b").unwrap().geometry;
    let point = snap.point();
    assert!((Haversine.distance(point, a) - Haversine.distance(point, b)).abs() < 1.0);

    // Far from every road: the disconnected node is nearest but not connected
    let connected = nearest_connected_node(&graph, 37.2999, 28.3999).unwrap();
    assert!(connected.fallback);
    assert_eq!(connected.id, "x");
}

#[test]
fn test_fallback_grid_when_file_is_empty() {
    let path = write_fixture("empty", &json!({}));
    let mut config = GraphConfig::new(&path);
    config.fallback_grid = true;
    let graph = load_road_graph(&config).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(graph.node_count(), 400);
    assert!(shortest_path(&graph, "1", "400", &BaseWeight).is_some());
}

#[test]
fn test_null_edge_section_loads_nodes_only() {
    let path = write_fixture(
        "null-edges",
        &json!({"nodes": {"a": {"lat": 0, "lon": 0}, "b": {"lat": 0, "lon": 0.001}}, "edges": null}),
    );
    let mut config = GraphConfig::new(&path);
    config.prune_isolated = false;
    let graph = load_road_graph(&config);
    fs::remove_file(&path).ok();

    let graph = graph.unwrap();
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 0);
}
