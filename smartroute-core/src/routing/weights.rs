//! Edge cost functions applied during relaxation

use log::debug;
use serde::{Deserialize, Serialize};

use crate::RoadEdge;

/// Cost of traversing an edge.
///
/// Implementations must be pure and return non-negative values; negative
/// or NaN costs are clamped to zero and infinite costs make the edge
/// impassable.
pub trait EdgeWeight: Sync {
    fn cost(&self, edge: &RoadEdge) -> f64;
}

/// The stored edge weight, unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseWeight;

impl EdgeWeight for BaseWeight {
    fn cost(&self, edge: &RoadEdge) -> f64 {
        edge.weight
    }
}

/// Caller-selected congestion multiplier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    Light,
    #[default]
    Medium,
    Heavy,
}

impl TrafficLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            TrafficLevel::Light => 0.8,
            TrafficLevel::Medium => 1.0,
            TrafficLevel::Heavy => 1.5,
        }
    }
}

impl EdgeWeight for TrafficLevel {
    fn cost(&self, edge: &RoadEdge) -> f64 {
        edge.weight * self.multiplier()
    }
}

impl<F> EdgeWeight for F
where
    F: Fn(&RoadEdge) -> f64 + Sync,
{
    fn cost(&self, edge: &RoadEdge) -> f64 {
        self(edge)
    }
}

/// Cost as used by the search: NaN and negative values become zero
pub(crate) fn sanitized_cost<W: EdgeWeight + ?Sized>(weight: &W, edge: &RoadEdge) -> f64 {
    let cost = weight.cost(edge);
    if cost.is_nan() || cost < 0.0 {
        debug!("Edge cost {cost} is not usable, clamping to 0");
        0.0
    } else {
        cost
    }
}
