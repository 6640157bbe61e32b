//! Exact multi-stop ordering with a fixed start.
//!
//! Brute force over every permutation of the non-fixed stops: O(n!)
//! permutations at O(n) matrix lookups each, on top of one exhaustive
//! Dijkstra per stop for the distance matrix. Callers must bound the stop
//! count; [`MAX_RECOMMENDED_STOPS`] is the practical ceiling.

use itertools::Itertools;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::RoadGraph;
use crate::routing::dijkstra::dijkstra_path_weights;
use crate::routing::weights::EdgeWeight;

/// Stop count above which sequencing latency becomes noticeable
pub const MAX_RECOMMENDED_STOPS: usize = 9;

/// Pairwise shortest-path distances between stops.
/// Missing paths are `f64::INFINITY`; the diagonal is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    distances: Vec<f64>,
}

impl DistanceMatrix {
    pub fn compute<W: EdgeWeight + ?Sized>(graph: &RoadGraph, stops: &[String], weight: &W) -> Self {
        let size = stops.len();
        let indices: Vec<_> = stops.iter().map(|id| graph.node_index(id)).collect();

        let rows: Vec<Vec<f64>> = (0..size)
            .into_par_iter()
            .map(|from| {
                let reached = indices[from].map(|start| dijkstra_path_weights(graph, start, weight));

                (0..size)
                    .map(|to| {
                        if from == to {
                            return 0.0;
                        }
                        match (&reached, indices[to]) {
                            (Some(reached), Some(target)) => {
                                reached.get(&target).copied().unwrap_or(f64::INFINITY)
                            }
                            _ => f64::INFINITY,
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            size,
            distances: rows.into_iter().flatten().collect(),
        }
    }

    /// Matrix from explicit rows; every row must have `rows.len()` entries
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            distances: rows.into_iter().flatten().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Distance from stop `from` to stop `to`, `None` outside the matrix
    pub fn get(&self, from: usize, to: usize) -> Option<f64> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.distances.get(from * self.size + to).copied()
    }

    /// Total distance of visiting stops in `order` (indices into the matrix);
    /// `None` if any leg is missing or an index is out of range
    pub fn route_distance(&self, order: &[usize]) -> Option<f64> {
        let mut total = 0.0;
        for pair in order.windows(2) {
            let leg = self.get(pair[0], pair[1])?;
            if !leg.is_finite() {
                return None;
            }
            total += leg;
        }
        Some(total)
    }
}

/// Outcome of sequencing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStatus {
    /// Fewer than three stops, nothing to reorder
    Unchanged,
    /// The minimal-distance order was found
    Optimized,
    /// Every order has a missing leg; the input order is returned
    Infeasible,
}

/// Stops in visiting order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopSequence {
    pub stops: Vec<String>,
    pub status: SequenceStatus,
    /// Total distance of the returned order, when it was computed and finite
    pub distance: Option<f64>,
}

/// Best order over a precomputed matrix. The first index stays fixed; ties
/// keep the first order found in lexicographic enumeration.
pub fn best_order(matrix: &DistanceMatrix) -> Option<(Vec<usize>, f64)> {
    let size = matrix.len();
    if size == 0 {
        return None;
    }

    let mut best: Option<(Vec<usize>, f64)> = None;
    for rest in (1..size).permutations(size - 1) {
        let mut order = Vec::with_capacity(size);
        order.push(0);
        order.extend(rest);

        if let Some(total) = matrix.route_distance(&order)
            && best.as_ref().is_none_or(|(_, best_total)| total < *best_total)
        {
            best = Some((order, total));
        }
    }

    best
}

/// Reorders `stops[1..]` to minimize total path distance from `stops[0]`.
///
/// Fewer than three stops are returned unchanged. When no order has every
/// leg connected, the input order is returned with
/// [`SequenceStatus::Infeasible`].
pub fn sequence_stops<W: EdgeWeight + ?Sized>(
    graph: &RoadGraph,
    stops: &[String],
    weight: &W,
) -> StopSequence {
    if stops.len() < 3 {
        return StopSequence {
            stops: stops.to_vec(),
            status: SequenceStatus::Unchanged,
            distance: None,
        };
    }

    if stops.len() > MAX_RECOMMENDED_STOPS {
        warn!(
            "Sequencing {} stops exhaustively; more than {MAX_RECOMMENDED_STOPS} can take a long time",
            stops.len()
        );
    }

    let matrix = DistanceMatrix::compute(graph, stops, weight);
    let identity: Vec<usize> = (0..stops.len()).collect();
    let original = matrix.route_distance(&identity);

    match best_order(&matrix) {
        Some((order, total)) => {
            info!(
                "Sequenced {} stops: {:.0} m (input order: {})",
                stops.len(),
                total,
                original.map_or_else(|| "unreachable".to_string(), |d| format!("{d:.0} m"))
            );
            debug!("Stop order {order:?}");

            StopSequence {
                stops: order.into_iter().map(|idx| stops[idx].clone()).collect(),
                status: SequenceStatus::Optimized,
                distance: Some(total),
            }
        }
        None => {
            warn!("No stop order connects every leg, keeping the input order");
            StopSequence {
                stops: stops.to_vec(),
                status: SequenceStatus::Infeasible,
                distance: None,
            }
        }
    }
}
