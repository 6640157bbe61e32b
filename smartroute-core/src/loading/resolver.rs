//! Coordinate resolution for list-of-ID node exports

use geo::Point;
use hashbrown::HashMap;
use serde_json::{Map, Value};

use super::normalize::parse_coordinate;

/// Supplies coordinates for node IDs that arrive without them.
///
/// IDs missing from the returned map are excluded from the graph.
pub trait CoordinateResolver {
    fn resolve(&self, ids: &[String]) -> HashMap<String, Point<f64>>;
}

/// Resolver backed by an in-memory `{id: point}` table
#[derive(Debug, Clone, Default)]
pub struct CoordinateTable {
    points: HashMap<String, Point<f64>>,
}

impl CoordinateTable {
    pub fn new(points: HashMap<String, Point<f64>>) -> Self {
        Self { points }
    }

    /// Table from the `coordinates` section of a graph export.
    /// Malformed entries are skipped.
    pub fn from_json(table: &Map<String, Value>) -> Self {
        let points = table
            .iter()
            .filter_map(|(id, value)| parse_coordinate(value).map(|point| (id.clone(), point)))
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl CoordinateResolver for CoordinateTable {
    fn resolve(&self, ids: &[String]) -> HashMap<String, Point<f64>> {
        ids.iter()
            .filter_map(|id| self.points.get(id).map(|point| (id.clone(), *point)))
            .collect()
    }
}

impl<F> CoordinateResolver for F
where
    F: Fn(&[String]) -> HashMap<String, Point<f64>>,
{
    fn resolve(&self, ids: &[String]) -> HashMap<String, Point<f64>> {
        self(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn table_resolves_known_ids_only() {
        let raw = json!({"1": [37.0, 28.0], "2": {"lat": 37.1, "lon": 28.1}, "3": "bad"});
        let table = CoordinateTable::from_json(raw.as_object().unwrap());

        assert_eq!(table.len(), 2);

        let resolved = table.resolve(&["1".to_string(), "3".to_string(), "9".to_string()]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved["1"], Point::new(28.0, 37.0));
    }

    #[test]
    fn closures_act_as_resolvers() {
        let resolver = |ids: &[String]| {
            ids.iter()
                .map(|id| (id.clone(), Point::new(0.0, 0.0)))
                .collect::<HashMap<_, _>>()
        };
        let resolved = resolver.resolve(&["a".to_string()]);
        assert!(resolved.contains_key("a"));
    }
}
