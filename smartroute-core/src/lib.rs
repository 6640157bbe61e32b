//! Road-network route planning.
//!
//! Loads a road graph from a JSON export, finds weighted shortest paths with
//! Dijkstra's algorithm, orders multi-stop trips exactly by brute force and
//! snaps free coordinates onto the network.
//!
//! ```no_run
//! use smartroute_core::prelude::*;
//!
//! let graph = load_road_graph(&GraphConfig::new("graph.json"))?;
//! let path = shortest_path(&graph, "1", "42", &TrafficLevel::Heavy);
//! # Ok::<(), smartroute_core::Error>(())
//! ```

pub mod algo;
mod error;
pub mod geodesy;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
mod service;

pub use error::Error;
pub use model::{GraphStats, RoadEdge, RoadGraph, RoadNode};
pub use routing::sequencer::MAX_RECOMMENDED_STOPS;
pub use service::RoutingService;

/// Distances and edge weights, in meters
pub type Meters = f64;

/// Weight given to edge records without a usable numeric weight
pub const DEFAULT_EDGE_WEIGHT: Meters = 50.0;
