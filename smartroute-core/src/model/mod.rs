//! Data model for road routing
//!
//! Contains types and structures for representing a road network.

pub mod roads;

// Re-export of basic types for convenience
pub use roads::{GraphStats, RoadEdge, RoadGraph, RoadNode};
