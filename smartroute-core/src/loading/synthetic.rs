//! Synthetic lattice road graph, used when no export is available and in tests

use geo::{Distance, Haversine, LineString};

use super::builder::RoadGraphBuilder;
use crate::{RoadEdge, RoadGraph, RoadNode};

/// `(lat, lon)` of the default grid centre
pub const DEFAULT_GRID_CENTER: (f64, f64) = (37.2153, 28.3636);
pub const DEFAULT_GRID_SIZE: usize = 20;
/// Degrees between neighbouring grid nodes (about 200 m)
pub const DEFAULT_GRID_SPACING: f64 = 0.002;

/// Square `size` x `size` lattice centred on `center` (`(lat, lon)`).
///
/// Nodes are numbered `"1"` upwards row by row. Each node links to its right
/// and lower neighbour, plus a diagonal link whenever `(row + col) % 3 == 0`.
/// Weights are haversine lengths in meters.
#[allow(clippy::cast_precision_loss)]
pub fn synthetic_grid(center: (f64, f64), size: usize, spacing: f64) -> RoadGraph {
    let (center_lat, center_lon) = center;
    let half = (size / 2) as f64;
    let id = |row: usize, col: usize| (row * size + col + 1).to_string();

    let mut builder = RoadGraphBuilder::new();
    let mut nodes = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            let lat = center_lat + (row as f64 - half) * spacing;
            let lon = center_lon + (col as f64 - half) * spacing;
            let node = RoadNode::new(id(row, col), lat, lon);
            nodes.push(node.clone());
            builder.add_node(node);
        }
    }

    let mut link = |from: usize, to: usize| {
        let a = &nodes[from];
        let b = &nodes[to];
        let weight = Haversine.distance(a.geometry, b.geometry);
        let geometry = LineString::from(vec![a.geometry.0, b.geometry.0]);
        builder.add_road(&a.id, &b.id, RoadEdge::new(weight, Some(geometry)));
    };

    for row in 0..size {
        for col in 0..size {
            let here = row * size + col;
            if col + 1 < size {
                link(here, here + 1);
            }
            if row + 1 < size {
                link(here, here + size);
            }
            if row + 1 < size && col + 1 < size && (row + col) % 3 == 0 {
                link(here, here + size + 1);
            }
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_shape() {
        let graph = synthetic_grid(DEFAULT_GRID_CENTER, 4, DEFAULT_GRID_SPACING);

        assert_eq!(graph.node_count(), 16);
        // 12 horizontal + 12 vertical + diagonals at (0,0), (1,2), (2,1)
        let diagonals = 3;
        assert_eq!(graph.edge_count(), 2 * (12 + 12 + diagonals));
        assert!(graph.edge("1", "6").is_some());
        assert!(graph.edge("6", "1").is_some());
        assert!(graph.edge("2", "7").is_none());
    }

    #[test]
    fn grid_weights_are_haversine_lengths() {
        let graph = synthetic_grid((0.0, 0.0), 2, 0.001);
        let weight = graph.edge("1", "2").unwrap().weight;
        // 0.001 degree of longitude at the equator
        assert!((weight - 111.19).abs() < 0.1, "got {weight}");
    }
}
