use log::info;

use crate::algo::snapping::{ConnectedSnap, SnapResult, nearest_connected_node, nearest_location};
use crate::loading::{GraphConfig, load_road_graph};
use crate::routing::dijkstra::{ShortestPath, shortest_path};
use crate::routing::itinerary::{RouteOptions, RoutePlan, plan_route};
use crate::routing::sequencer::{StopSequence, sequence_stops};
use crate::routing::weights::EdgeWeight;
use crate::{Error, GraphStats, RoadGraph};

/// Owns the active road graph and answers queries against it.
///
/// Queries borrow the graph immutably; `reload` and `prune` replace it
/// wholesale, so callers sharing a service across threads wrap it in a
/// read/write lock.
#[derive(Debug, Clone, Default)]
pub struct RoutingService {
    graph: RoadGraph,
}

impl RoutingService {
    pub fn new(graph: RoadGraph) -> Self {
        Self { graph }
    }

    /// Loads the graph described by `config`
    pub fn load(config: &GraphConfig) -> Result<Self, Error> {
        load_road_graph(config).map(Self::new)
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }

    /// Swaps in a new graph, returning the previous one
    pub fn reload(&mut self, graph: RoadGraph) -> RoadGraph {
        let stats = graph.stats();
        info!(
            "Replacing road graph: {} nodes, {} edges",
            stats.nodes, stats.edges
        );
        std::mem::replace(&mut self.graph, graph)
    }

    /// Drops isolated nodes; returns how many were removed
    pub fn prune(&mut self) -> usize {
        let pruned = self.graph.pruned();
        let removed = self.graph.node_count() - pruned.node_count();
        self.graph = pruned;
        removed
    }

    pub fn shortest_path<W: EdgeWeight + ?Sized>(
        &self,
        source: &str,
        target: &str,
        weight: &W,
    ) -> Option<ShortestPath> {
        shortest_path(&self.graph, source, target, weight)
    }

    pub fn sequence<W: EdgeWeight + ?Sized>(&self, stops: &[String], weight: &W) -> StopSequence {
        sequence_stops(&self.graph, stops, weight)
    }

    /// # Errors
    ///
    /// [`Error::NoPointsFound`] when the graph has no nodes
    pub fn snap(&self, lat: f64, lon: f64) -> Result<SnapResult, Error> {
        nearest_location(&self.graph, lat, lon).ok_or(Error::NoPointsFound)
    }

    pub fn snap_connected(&self, lat: f64, lon: f64) -> Result<ConnectedSnap, Error> {
        nearest_connected_node(&self.graph, lat, lon).ok_or(Error::NoPointsFound)
    }

    pub fn plan(&self, stops: &[String], options: &RouteOptions) -> Result<RoutePlan, Error> {
        plan_route(&self.graph, stops, options)
    }
}
