//! Snapping arbitrary coordinates onto the road network.
//!
//! Two strategies: [`nearest_location`] considers nodes and every point
//! along edge geometry, [`nearest_connected_node`] only returns nodes with
//! outgoing edges, widening the search radius step by step.

use geo::{Closest, ClosestPoint, Distance, Haversine, Line, Point};
use log::debug;
use petgraph::{graph::NodeIndex, visit::EdgeRef};
use rstar::AABB;
use serde::Serialize;

use crate::geodesy::EARTH_RADIUS_M;
use crate::{RoadGraph, RoadNode};

/// Radii in meters tried in turn by [`nearest_connected_node`]
pub const SEARCH_RADIUS_STEPS: [f64; 5] = [50.0, 100.0, 200.0, 300.0, 500.0];

/// Relative slack added to the envelope prefilter
const ENVELOPE_MARGIN: f64 = 1.05;

/// Where a query coordinate landed on the network
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapResult {
    /// An existing node was the closest candidate
    Node {
        id: String,
        point: Point<f64>,
        distance: f64,
    },
    /// A point on the edge between `source` and `target`
    Projected {
        point: Point<f64>,
        distance: f64,
        source: String,
        target: String,
    },
}

impl SnapResult {
    pub fn point(&self) -> Point<f64> {
        match self {
            SnapResult::Node { point, .. } | SnapResult::Projected { point, .. } => *point,
        }
    }

    /// Haversine distance from the query in meters
    pub fn distance(&self) -> f64 {
        match self {
            SnapResult::Node { distance, .. } | SnapResult::Projected { distance, .. } => *distance,
        }
    }

    pub fn node_id(&self) -> Option<&str> {
        match self {
            SnapResult::Node { id, .. } => Some(id),
            SnapResult::Projected { .. } => None,
        }
    }
}

/// Node chosen by [`nearest_connected_node`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectedSnap {
    pub id: String,
    pub point: Point<f64>,
    pub distance: f64,
    /// Search radius that produced the match; `None` on fallback
    pub radius: Option<f64>,
    /// No connected node was within the largest radius, so the globally
    /// nearest node was returned, connected or not
    pub fallback: bool,
}

/// Nearest node by haversine distance. `None` for an empty graph.
pub fn nearest_node(graph: &RoadGraph, lat: f64, lon: f64) -> Option<(String, f64)> {
    let query = Point::new(lon, lat);
    graph
        .nodes()
        .map(|node| (node, Haversine.distance(query, node.geometry)))
        .fold(None, |best: Option<(&RoadNode, f64)>, (node, distance)| match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((node, distance)),
        })
        .map(|(node, distance)| (node.id.clone(), distance))
}

/// Closest point of the network to `(lat, lon)`: a node, or a projection
/// onto an edge segment when that is strictly closer.
///
/// Projection happens in lon/lat space and is scored by haversine
/// distance, which is accurate for the short segments of a road graph.
pub fn nearest_location(graph: &RoadGraph, lat: f64, lon: f64) -> Option<SnapResult> {
    let query = Point::new(lon, lat);
    let (id, distance) = nearest_node(graph, lat, lon)?;
    let node_point = graph.node(&id)?.geometry;

    let mut best = SnapResult::Node {
        id,
        point: node_point,
        distance,
    };
    let mut best_distance = distance;

    let inner = &graph.graph;
    for edge in inner.edge_references() {
        // Reverse twins share the geometry
        if edge.source().index() > edge.target().index() {
            continue;
        }
        let Some(line) = graph.edge_geometry(edge.id()) else {
            continue;
        };

        for segment in line.lines() {
            let Some(point) = closest_on_segment(&segment, &query) else {
                continue;
            };
            let distance = Haversine.distance(query, point);
            if distance < best_distance {
                best_distance = distance;
                best = SnapResult::Projected {
                    point,
                    distance,
                    source: inner[edge.source()].id.clone(),
                    target: inner[edge.target()].id.clone(),
                };
            }
        }
    }

    debug!("Snapped ({lat}, {lon}) to {best:?}");
    Some(best)
}

fn closest_on_segment(segment: &Line<f64>, query: &Point<f64>) -> Option<Point<f64>> {
    match segment.closest_point(query) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => Some(p),
        Closest::Indeterminate => None,
    }
}

/// Nearest node that has at least one outgoing edge, searching within
/// [`SEARCH_RADIUS_STEPS`] in order. Falls back to [`nearest_node`] with
/// `fallback = true` when every radius comes up empty.
pub fn nearest_connected_node(graph: &RoadGraph, lat: f64, lon: f64) -> Option<ConnectedSnap> {
    let query = Point::new(lon, lat);

    for radius in SEARCH_RADIUS_STEPS {
        let candidates = graph
            .rtree()
            .locate_in_envelope(&radius_envelope(lat, lon, radius));

        let mut best: Option<(NodeIndex, f64)> = None;
        for candidate in candidates {
            let idx = candidate.data;
            if !graph.has_outgoing(idx) {
                continue;
            }
            let Some(node) = graph.node_weight(idx) else {
                continue;
            };
            let distance = Haversine.distance(query, node.geometry);
            if distance <= radius && best.is_none_or(|(_, d)| distance < d) {
                best = Some((idx, distance));
            }
        }

        if let Some((idx, distance)) = best
            && let Some(node) = graph.node_weight(idx)
        {
            debug!("Connected node {} found within {radius} m", node.id);
            return Some(ConnectedSnap {
                id: node.id.clone(),
                point: node.geometry,
                distance,
                radius: Some(radius),
                fallback: false,
            });
        }
    }

    let (id, distance) = nearest_node(graph, lat, lon)?;
    let point = graph.node(&id)?.geometry;
    debug!("No connected node within 500 m of ({lat}, {lon}), falling back to {id}");

    Some(ConnectedSnap {
        id,
        point,
        distance,
        radius: None,
        fallback: true,
    })
}

/// Lon/lat box that contains every point within `radius` meters
fn radius_envelope(lat: f64, lon: f64, radius: f64) -> AABB<[f64; 2]> {
    let d_lat = (radius / EARTH_RADIUS_M).to_degrees() * ENVELOPE_MARGIN;
    let cos_lat = lat.to_radians().cos().abs();
    let d_lon = if cos_lat < 1e-9 {
        180.0
    } else {
        (d_lat / cos_lat).min(180.0)
    };

    AABB::from_corners([lon - d_lon, lat - d_lat], [lon + d_lon, lat + d_lat])
}
