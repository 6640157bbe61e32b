//! Ingestion-boundary normalizer.
//!
//! Graph exports carry edges as tuples, objects with several possible field
//! names, or bare target IDs. Everything is converted here into one
//! [`EdgeRecord`] shape so routing code never re-checks record layouts.

use geo::{Coord, LineString, Point};
use log::trace;
use serde_json::{Map, Value};

use super::raw_types::RawEdges;

const SOURCE_KEYS: [&str; 3] = ["u", "source", "from"];
const TARGET_KEYS: [&str; 5] = ["node", "target", "to", "v", "id"];
const WEIGHT_KEYS: [&str; 4] = ["weight", "distance", "cost", "length"];

/// Canonical edge record
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub weight: f64,
    /// Road shape from source to target, `x` = longitude, `y` = latitude
    pub geometry: Option<LineString<f64>>,
}

/// Layouts an edge record may arrive in
enum RawEdgeShape<'a> {
    /// `[target, weight]` under a source key, or `[source, target, weight]` in a flat list
    Tuple(&'a [Value]),
    /// `{u, v, weight, geometry}` and field-name variants
    Object(&'a Map<String, Value>),
    /// A bare target ID under a source key
    Scalar(&'a Value),
}

impl<'a> RawEdgeShape<'a> {
    fn of(value: &'a Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(RawEdgeShape::Tuple(items)),
            Value::Object(fields) => Some(RawEdgeShape::Object(fields)),
            Value::String(_) | Value::Number(_) => Some(RawEdgeShape::Scalar(value)),
            Value::Null | Value::Bool(_) => None,
        }
    }
}

/// Normalize every edge record, returning the accepted records and the
/// number of dropped ones.
pub fn normalize_edges(edges: &RawEdges, default_weight: f64) -> (Vec<EdgeRecord>, usize) {
    let mut records = Vec::new();
    let mut dropped = 0;

    let mut accept = |record: Option<EdgeRecord>| match record {
        Some(record) => records.push(record),
        None => dropped += 1,
    };

    match edges {
        RawEdges::List(items) => {
            for item in items {
                accept(normalize_record(None, item, default_weight));
            }
        }
        RawEdges::Table(table) => {
            for (key, value) in table {
                match value {
                    Value::Array(items) => {
                        for item in items {
                            accept(normalize_record(Some(key), item, default_weight));
                        }
                    }
                    Value::Object(_) => accept(normalize_record(Some(key), value, default_weight)),
                    _ => {
                        trace!("Dropping edge entry '{key}': unsupported layout");
                        accept(None);
                    }
                }
            }
        }
    }

    (records, dropped)
}

fn normalize_record(
    context_source: Option<&str>,
    value: &Value,
    default_weight: f64,
) -> Option<EdgeRecord> {
    let record = match RawEdgeShape::of(value)? {
        RawEdgeShape::Tuple(items) => match context_source {
            Some(source) => EdgeRecord {
                source: source.to_string(),
                target: normalize_id(items.first()?)?,
                weight: resolve_weight(items.get(1), default_weight),
                geometry: None,
            },
            None => EdgeRecord {
                source: normalize_id(items.first()?)?,
                target: normalize_id(items.get(1)?)?,
                weight: resolve_weight(items.get(2), default_weight),
                geometry: None,
            },
        },
        RawEdgeShape::Object(fields) => {
            let source = first_id(fields, &SOURCE_KEYS).or_else(|| context_source.map(String::from))?;
            let target = first_id(fields, &TARGET_KEYS)?;
            let weight = resolve_weight(
                WEIGHT_KEYS.iter().find_map(|key| {
                    fields.get(*key).filter(|value| numeric(value).is_some())
                }),
                default_weight,
            );
            let geometry = fields.get("geometry").and_then(parse_geometry);

            EdgeRecord {
                source,
                target,
                weight,
                geometry,
            }
        }
        RawEdgeShape::Scalar(target) => EdgeRecord {
            source: context_source?.to_string(),
            target: normalize_id(target)?,
            weight: default_weight,
            geometry: None,
        },
    };

    Some(record)
}

/// Stringified node ID; numeric IDs are accepted as-is
pub fn normalize_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn first_id(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| fields.get(*key).and_then(normalize_id))
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Weight for a record; falls back to `default_weight` when the value is
/// missing, non-numeric, negative or not finite.
fn resolve_weight(value: Option<&Value>, default_weight: f64) -> f64 {
    match value.and_then(numeric) {
        Some(weight) if weight.is_finite() && weight >= 0.0 => weight,
        other => {
            trace!("Edge weight {other:?} unusable, using default {default_weight}");
            default_weight
        }
    }
}

/// Coordinate given as `[lat, lon]` or `{lat, lon|lng}`
pub fn parse_coordinate(value: &Value) -> Option<Point<f64>> {
    let (lat, lon) = match value {
        Value::Array(pair) if pair.len() >= 2 => (pair[0].as_f64()?, pair[1].as_f64()?),
        Value::Object(fields) => (
            fields.get("lat")?.as_f64()?,
            fields.get("lon").or_else(|| fields.get("lng"))?.as_f64()?,
        ),
        _ => return None,
    };

    (lat.is_finite() && lon.is_finite()).then(|| Point::new(lon, lat))
}

/// Geometry as a list of `[lat, lon]` points; rejected entirely if any
/// point is malformed or fewer than two points remain
fn parse_geometry(value: &Value) -> Option<LineString<f64>> {
    let points = value.as_array()?;
    if points.len() < 2 {
        return None;
    }

    let coords = points
        .iter()
        .map(|point| parse_coordinate(point).map(|p| Coord { x: p.x(), y: p.y() }))
        .collect::<Option<Vec<_>>>()?;

    Some(LineString::new(coords))
}
