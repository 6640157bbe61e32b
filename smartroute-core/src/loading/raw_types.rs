//! Loosely typed graph export as produced by the graph builders.
//!
//! Individual records stay as `serde_json::Value` so a single malformed
//! entry is dropped by the normalizer instead of failing the whole file.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Top-level graph document. A section that is `null` or of the wrong
/// shape is treated as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGraphData {
    #[serde(default, deserialize_with = "lenient")]
    pub nodes: RawNodes,
    #[serde(default, deserialize_with = "lenient")]
    pub edges: RawEdges,
    /// `{id: [lat, lon]}` table shipped alongside list-of-ID node exports
    #[serde(default, deserialize_with = "lenient")]
    pub coordinates: Map<String, Value>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(T::deserialize(value).unwrap_or_else(|e| {
        warn!("Ignoring malformed graph section: {e}");
        T::default()
    }))
}

/// Node section: either `{id: {lat, lon}}` or a bare list of IDs
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNodes {
    Ids(Vec<Value>),
    Table(Map<String, Value>),
}

impl Default for RawNodes {
    fn default() -> Self {
        RawNodes::Table(Map::new())
    }
}

impl RawNodes {
    pub fn len(&self) -> usize {
        match self {
            RawNodes::Ids(ids) => ids.len(),
            RawNodes::Table(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Edge section: a flat list of records, or a mapping keyed by source ID
/// (or by arbitrary keys holding standalone records)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawEdges {
    List(Vec<Value>),
    Table(Map<String, Value>),
}

impl Default for RawEdges {
    fn default() -> Self {
        RawEdges::List(Vec::new())
    }
}

impl RawGraphData {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
