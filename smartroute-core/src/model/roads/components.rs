//! Road network components - nodes and edges

use geo::{LineString, Point};
use serde::Serialize;

use crate::Meters;

/// Road graph node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadNode {
    /// Stable node identifier (OSM ID in string form)
    pub id: String,
    /// Node coordinates, `x` = longitude, `y` = latitude
    pub geometry: Point<f64>,
}

impl RoadNode {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            geometry: Point::new(lon, lat),
        }
    }

    pub fn lat(&self) -> f64 {
        self.geometry.y()
    }

    pub fn lon(&self) -> f64 {
        self.geometry.x()
    }
}

/// Road graph edge (directed road segment)
#[derive(Debug, Clone, PartialEq)]
pub struct RoadEdge {
    /// Segment cost in meters
    pub weight: Meters,
    /// Road shape from source to target; a straight line is implied when absent
    pub geometry: Option<LineString<f64>>,
}

impl RoadEdge {
    pub fn new(weight: Meters, geometry: Option<LineString<f64>>) -> Self {
        Self { weight, geometry }
    }

    /// The edge for the opposite direction, with geometry reversed point for point
    pub fn reversed(&self) -> Self {
        Self {
            weight: self.weight,
            geometry: self.geometry.as_ref().map(|line| {
                let mut coords = line.0.clone();
                coords.reverse();
                LineString::new(coords)
            }),
        }
    }
}
