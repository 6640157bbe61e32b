//! This module is responsible for loading road graph exports
//! and building a routable [`RoadGraph`](crate::RoadGraph).

mod builder;
mod config;
pub mod normalize;
pub mod raw_types;
pub mod resolver;
pub mod synthetic;

pub use builder::{
    LoadReport, RoadGraphBuilder, build_road_graph, load_road_graph, road_graph_from_raw,
};
pub use config::GraphConfig;
pub use normalize::EdgeRecord;
pub use raw_types::RawGraphData;
pub use resolver::{CoordinateResolver, CoordinateTable};
pub use synthetic::synthetic_grid;
