use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::Error;

use super::{RouteLeg, RoutePlan};

impl RoutePlan {
    /// Converts the route to a `GeoJSON` `FeatureCollection` with one
    /// `LineString` feature per leg.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let features = self
            .legs
            .iter()
            .enumerate()
            .map(|(idx, leg)| leg.to_feature(idx))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

impl RouteLeg {
    fn to_feature(&self, leg_idx: usize) -> Result<Feature, Error> {
        let geometry = Geometry::new(GeoJsonValue::from(&self.geometry));

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "leg_index": leg_idx,
                "from": self.from,
                "to": self.to,
                "distance": self.distance,
                "nodes": self.path.len(),
            }
        });

        serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::loading::synthetic_grid;
    use crate::routing::itinerary::{RouteOptions, plan_route};

    #[test]
    fn one_feature_per_leg() {
        let graph = synthetic_grid((37.2153, 28.3636), 4, 0.002);
        let stops: Vec<String> = ["1", "16", "4"].iter().map(|s| (*s).to_string()).collect();
        let options = RouteOptions {
            optimize: false,
            ..RouteOptions::default()
        };
        let plan = plan_route(&graph, &stops, &options).unwrap();

        let collection = plan.to_geojson().unwrap();
        assert_eq!(collection.features.len(), 2);

        let second = &collection.features[1];
        let props = second.properties.as_ref().unwrap();
        assert_eq!(props["leg_index"], 1);
        assert_eq!(props["from"], "16");
        assert_eq!(props["to"], "4");
        assert!(second.geometry.is_some());

        let text = plan.to_geojson_string().unwrap();
        assert!(text.contains("\"FeatureCollection\""));
        assert!(text.contains("\"LineString\""));
    }
}
