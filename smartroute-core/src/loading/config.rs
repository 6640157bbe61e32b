use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_EDGE_WEIGHT;

/// Configuration for loading a road graph from a JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Path to the graph JSON file
    pub path: PathBuf,
    /// Weight for edge records without a usable numeric weight
    #[serde(default = "default_edge_weight")]
    pub default_weight: f64,
    /// Remove nodes without any edges after loading
    #[serde(default = "default_true")]
    pub prune_isolated: bool,
    /// Build a synthetic grid when the file is missing, unreadable or empty
    #[serde(default)]
    pub fallback_grid: bool,
}

impl GraphConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_weight: DEFAULT_EDGE_WEIGHT,
            prune_isolated: true,
            fallback_grid: false,
        }
    }
}

fn default_edge_weight() -> f64 {
    DEFAULT_EDGE_WEIGHT
}

fn default_true() -> bool {
    true
}
