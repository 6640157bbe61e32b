//! Road network model

pub mod components;
pub mod network;

pub use components::{RoadEdge, RoadNode};
pub use network::{GraphStats, IndexedPoint, RoadGraph};
