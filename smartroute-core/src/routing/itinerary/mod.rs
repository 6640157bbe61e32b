//! Multi-stop route plans built on top of sequencing and shortest paths

mod directions;
mod plan;
mod to_geojson;

pub use directions::{Direction, Instruction, TravelMode, TravelTime, directions_along};
pub use plan::{RouteLeg, RouteOptions, RoutePlan, plan_route};
