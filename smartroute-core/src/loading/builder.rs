use std::fs::File;
use std::io::BufReader;

use hashbrown::HashMap;
use log::{debug, info, warn};
use petgraph::graph::{DiGraph, NodeIndex};
use serde_json::Value;

use super::config::GraphConfig;
use super::normalize::{EdgeRecord, normalize_edges, normalize_id, parse_coordinate};
use super::raw_types::{RawGraphData, RawNodes};
use super::resolver::{CoordinateResolver, CoordinateTable};
use super::synthetic::{DEFAULT_GRID_CENTER, DEFAULT_GRID_SIZE, DEFAULT_GRID_SPACING, synthetic_grid};
use crate::{Error, RoadEdge, RoadGraph, RoadNode};

/// Counters collected while turning raw data into a graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub nodes_loaded: usize,
    /// Nodes without valid coordinates, or IDs the resolver could not place
    pub nodes_dropped: usize,
    pub edges_loaded: usize,
    /// Malformed records and unknown endpoints
    pub edges_dropped: usize,
    /// Records for a node pair that already had a road, in either direction
    pub duplicates_merged: usize,
    /// Reverse edges added to keep the graph symmetric
    pub reverse_synthesized: usize,
}

/// Incremental construction of a symmetric [`RoadGraph`]
#[derive(Debug, Default)]
pub struct RoadGraphBuilder {
    graph: DiGraph<RoadNode, RoadEdge>,
    index: HashMap<String, NodeIndex>,
    report: LoadReport,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node; the first node with a given ID wins
    pub fn add_node(&mut self, node: RoadNode) -> bool {
        if self.index.contains_key(&node.id) {
            self.report.nodes_dropped += 1;
            return false;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        self.report.nodes_loaded += 1;
        true
    }

    /// Adds `source -> target` together with its reverse twin.
    ///
    /// A record for a pair that is already connected, in either direction,
    /// is merged: the cheaper road wins and both directions take its weight
    /// and geometry. Records referencing unknown nodes are dropped and
    /// `false` is returned.
    pub fn add_road(&mut self, source: &str, target: &str, edge: RoadEdge) -> bool {
        let (Some(&a), Some(&b)) = (self.index.get(source), self.index.get(target)) else {
            debug!("Dropping edge {source} -> {target}: unknown endpoint");
            self.report.edges_dropped += 1;
            return false;
        };

        if let Some(existing) = self.graph.find_edge(a, b) {
            self.report.duplicates_merged += 1;
            if edge.weight < self.graph[existing].weight {
                debug!(
                    "Cheaper duplicate {source} -> {target}: {} replaces {}",
                    edge.weight, self.graph[existing].weight
                );
                let reverse = edge.reversed();
                self.graph[existing] = edge;
                match self.graph.find_edge(b, a) {
                    Some(twin) => self.graph[twin] = reverse,
                    None => {
                        self.graph.add_edge(b, a, reverse);
                    }
                }
            }
            return true;
        }

        let reverse = edge.reversed();
        self.graph.add_edge(a, b, edge);
        self.report.edges_loaded += 1;
        self.graph.add_edge(b, a, reverse);
        self.report.reverse_synthesized += 1;
        true
    }

    pub(crate) fn add_record(&mut self, record: EdgeRecord) -> bool {
        let edge = RoadEdge::new(record.weight, record.geometry);
        self.add_road(&record.source, &record.target, edge)
    }

    pub fn report(&self) -> LoadReport {
        self.report
    }

    pub fn build(self) -> RoadGraph {
        RoadGraph::from_graph(self.graph)
    }
}

/// Builds a road graph from a parsed export.
///
/// List-of-ID node sections are placed through `resolver`; unresolved IDs
/// are left out. Malformed records are dropped, never fatal.
pub fn build_road_graph(
    raw: &RawGraphData,
    resolver: &dyn CoordinateResolver,
    default_weight: f64,
) -> (RoadGraph, LoadReport) {
    let mut builder = RoadGraphBuilder::new();

    match &raw.nodes {
        RawNodes::Table(table) => {
            for (id, value) in table {
                match parse_coordinate(value) {
                    Some(point) => {
                        builder.add_node(RoadNode {
                            id: id.clone(),
                            geometry: point,
                        });
                    }
                    None => builder.report.nodes_dropped += 1,
                }
            }
        }
        RawNodes::Ids(ids) => {
            let ids: Vec<String> = ids.iter().filter_map(normalize_id).collect();
            builder.report.nodes_dropped += raw.nodes.len() - ids.len();

            let resolved = resolver.resolve(&ids);
            for id in ids {
                match resolved.get(&id) {
                    Some(point) => {
                        builder.add_node(RoadNode {
                            id,
                            geometry: *point,
                        });
                    }
                    None => builder.report.nodes_dropped += 1,
                }
            }
        }
    }

    let (records, malformed) = normalize_edges(&raw.edges, default_weight);
    builder.report.edges_dropped += malformed;
    for record in records {
        builder.add_record(record);
    }

    let report = builder.report();
    info!(
        "Loaded {} nodes ({} dropped) and {} edges ({} dropped, {} duplicates merged, {} reverse edges synthesized)",
        report.nodes_loaded,
        report.nodes_dropped,
        report.edges_loaded,
        report.edges_dropped,
        report.duplicates_merged,
        report.reverse_synthesized
    );

    (builder.build(), report)
}

/// Builds a road graph using the export's own `coordinates` table as resolver
pub fn road_graph_from_raw(raw: &RawGraphData, default_weight: f64) -> (RoadGraph, LoadReport) {
    let table = CoordinateTable::from_json(&raw.coordinates);
    build_road_graph(raw, &table, default_weight)
}

/// Loads, normalizes and optionally prunes a road graph from a JSON file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed and no fallback
/// grid is configured
pub fn load_road_graph(config: &GraphConfig) -> Result<RoadGraph, Error> {
    info!("Loading road graph: {}", config.path.display());

    let graph = match read_graph(config) {
        Ok(graph) if graph.is_empty() && config.fallback_grid => {
            warn!("Road graph is empty, building a synthetic grid instead");
            fallback_grid()
        }
        Ok(graph) => graph,
        Err(e) if config.fallback_grid => {
            warn!("Failed to load road graph ({e}), building a synthetic grid instead");
            fallback_grid()
        }
        Err(e) => return Err(e),
    };

    let graph = if config.prune_isolated {
        graph.pruned()
    } else {
        graph
    };

    let stats = graph.stats();
    info!(
        "Road graph ready: {} nodes, {} edges, average degree {:.1}",
        stats.nodes, stats.edges, stats.average_degree
    );

    Ok(graph)
}

fn read_graph(config: &GraphConfig) -> Result<RoadGraph, Error> {
    if !config.path.exists() {
        return Err(Error::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Graph file not found: {}", config.path.display()),
        )));
    }

    let file = File::open(&config.path)?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;
    if !value.is_object() {
        return Err(Error::InvalidData(
            "Graph document must be a JSON object".to_string(),
        ));
    }
    let raw: RawGraphData = serde_json::from_value(value)?;

    let (graph, _) = road_graph_from_raw(&raw, config.default_weight);
    Ok(graph)
}

fn fallback_grid() -> RoadGraph {
    synthetic_grid(DEFAULT_GRID_CENTER, DEFAULT_GRID_SIZE, DEFAULT_GRID_SPACING)
}
