use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utility::geo::polyline_length_km;

use crate::{coordinate::Coordinate, ExampleData};

/// Layer and source id of the route overlay on the map.
pub const ROUTE_LAYER_ID: &str = "route";

/// Road geometry of a route between waypoints, as returned by the
/// directions service.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteGeometry {
    pub coordinates: Vec<Coordinate>,
    pub distance_m: Option<f64>,
    pub duration_s: Option<f64>,
}

impl RouteGeometry {
    pub fn new(coordinates: Vec<Coordinate>) -> Self {
        Self {
            coordinates,
            distance_m: None,
            duration_s: None,
        }
    }

    /// Great-circle length along the line.
    pub fn length_km(&self) -> f64 {
        polyline_length_km(
            self.coordinates
                .iter()
                .map(|point| (point.latitude(), point.longitude())),
        )
    }

    /// The geometry as a GeoJSON `Feature` holding a `LineString`.
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "LineString",
                "coordinates": self.coordinates,
            }
        })
    }
}

impl ExampleData for RouteGeometry {
    fn example_data() -> Self {
        Self {
            coordinates: vec![
                Coordinate::example_data(),
                Coordinate::new(139.76, 38.69).unwrap_or(Coordinate::example_data()),
            ],
            distance_m: Some(1203.4),
            duration_s: Some(152.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayStyle {
    pub color: String,
    pub width: f64,
    pub line_join: String,
    pub line_cap: String,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: "#ff5e5e".to_owned(),
            width: 4.0,
            line_join: "round".to_owned(),
            line_cap: "round".to_owned(),
        }
    }
}
