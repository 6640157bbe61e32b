use geo::{Coord, Haversine, Length, LineString};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::directions::{Direction, TravelMode, TravelTime, directions_along};
use crate::routing::dijkstra::{ShortestPath, shortest_path};
use crate::routing::sequencer::{SequenceStatus, sequence_stops};
use crate::routing::weights::TrafficLevel;
use crate::{Error, RoadGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteOptions {
    /// Reorder intermediate stops before routing
    pub optimize: bool,
    pub traffic: TrafficLevel,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            traffic: TrafficLevel::default(),
        }
    }
}

/// Shortest path between two consecutive stops
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    pub from: String,
    pub to: String,
    pub path: Vec<String>,
    /// Weighted distance in meters
    pub distance: f64,
    pub geometry: LineString<f64>,
}

/// Multi-stop route: ordered stops and one leg per consecutive pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub stops: Vec<String>,
    pub sequence_status: SequenceStatus,
    pub traffic: TrafficLevel,
    pub legs: Vec<RouteLeg>,
    pub total_distance: f64,
}

impl RoutePlan {
    /// All leg geometries joined into one line
    pub fn geometry(&self) -> LineString<f64> {
        let mut coords: Vec<Coord<f64>> = Vec::new();
        for leg in &self.legs {
            append_coords(&mut coords, &leg.geometry.0);
        }
        LineString::new(coords)
    }

    /// Physical length of the route in meters, independent of traffic
    pub fn road_length(&self) -> f64 {
        self.legs.iter().map(|leg| Haversine.length(&leg.geometry)).sum()
    }

    /// Duration estimates over the weighted total distance
    pub fn travel_times(&self) -> Vec<TravelTime> {
        TravelMode::ALL
            .into_iter()
            .map(|mode| TravelTime {
                mode,
                minutes: mode.minutes(self.total_distance),
            })
            .collect()
    }

    pub fn directions(&self) -> Vec<Direction> {
        directions_along(&self.geometry())
    }
}

/// Routes through `stops` in order, after optionally reordering every stop
/// but the first.
///
/// # Errors
///
/// `InvalidData` for fewer than two stops, `UnknownNode` for a stop missing
/// from the graph and `NoRoute` for the first leg with no path.
pub fn plan_route(
    graph: &RoadGraph,
    stops: &[String],
    options: &RouteOptions,
) -> Result<RoutePlan, Error> {
    if stops.len() < 2 {
        return Err(Error::InvalidData(format!(
            "a route needs at least 2 stops, got {}",
            stops.len()
        )));
    }
    if let Some(unknown) = stops.iter().find(|id| !graph.contains(id)) {
        return Err(Error::UnknownNode(unknown.clone()));
    }

    let weight = options.traffic;
    let (ordered, sequence_status) = if options.optimize {
        let sequence = sequence_stops(graph, stops, &weight);
        (sequence.stops, sequence.status)
    } else {
        (stops.to_vec(), SequenceStatus::Unchanged)
    };

    let mut legs = Vec::with_capacity(ordered.len() - 1);
    for (leg, pair) in ordered.windows(2).enumerate() {
        let (from, to) = (&pair[0], &pair[1]);
        let Some(path) = shortest_path(graph, from, to, &weight) else {
            warn!("No path for leg {leg}: {from} -> {to}");
            return Err(Error::NoRoute {
                leg,
                from: from.clone(),
                to: to.clone(),
            });
        };

        legs.push(RouteLeg {
            from: from.clone(),
            to: to.clone(),
            geometry: leg_geometry(graph, &path),
            distance: path.distance,
            path: path.path,
        });
    }

    let total_distance = legs.iter().map(|leg| leg.distance).sum();
    info!(
        "Planned route through {} stops: {:.0} m over {} legs",
        ordered.len(),
        total_distance,
        legs.len()
    );

    Ok(RoutePlan {
        stops: ordered,
        sequence_status,
        traffic: options.traffic,
        legs,
        total_distance,
    })
}

/// Edge shapes along a path stitched end to end; a zero-length path
/// becomes a degenerate two-point line at the node
fn leg_geometry(graph: &RoadGraph, path: &ShortestPath) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = Vec::new();
    for &edge in &path.edges {
        if let Some(line) = graph.edge_geometry(edge) {
            append_coords(&mut coords, &line.0);
        }
    }

    if coords.len() < 2
        && let Some(node) = graph.node(path.source())
    {
        coords = vec![node.geometry.0, node.geometry.0];
    }
    LineString::new(coords)
}

/// Appends `next`, skipping its first point when it repeats the last one
fn append_coords(coords: &mut Vec<Coord<f64>>, next: &[Coord<f64>]) {
    let skip = usize::from(coords.last().is_some() && coords.last() == next.first());
    coords.extend_from_slice(&next[skip.min(next.len())..]);
}
