pub use crate::{DEFAULT_EDGE_WEIGHT, MAX_RECOMMENDED_STOPS, Meters};
pub use crate::{Error, RoutingService};

// Graph model and loading
pub use crate::loading::{GraphConfig, LoadReport, RoadGraphBuilder, load_road_graph, synthetic_grid};
pub use crate::model::{GraphStats, RoadEdge, RoadGraph, RoadNode};

// Queries
pub use crate::algo::snapping::{
    ConnectedSnap, SnapResult, nearest_connected_node, nearest_location,
};
pub use crate::routing::dijkstra::{ShortestPath, shortest_distances, shortest_path};
pub use crate::routing::itinerary::{RouteOptions, RoutePlan, TravelMode, plan_route};
pub use crate::routing::sequencer::{SequenceStatus, StopSequence, sequence_stops};
pub use crate::routing::weights::{BaseWeight, EdgeWeight, TrafficLevel};
