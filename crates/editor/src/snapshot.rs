use model::{
    coordinate::Coordinate, map::MapOptions, route::RouteGeometry, ExampleData,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::{list::WaypointRow, surface::MarkerHandle};

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RegisteredMarker {
    pub id: String,
    pub handle: MarkerHandle,
}

/// Read-only copy of everything an editor currently shows.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub waypoints: Vec<Coordinate>,
    pub landmarks: Vec<Coordinate>,
    /// In the order they were drawn: waypoints first, then landmarks.
    pub markers: Vec<RegisteredMarker>,
    pub rows: Vec<WaypointRow>,
    pub route: Option<RouteGeometry>,
    pub route_length_km: Option<f64>,
    /// Value of the waypoints form field, if the editor has one.
    pub waypoints_field: Option<String>,
    pub map: MapOptions,
}

impl ExampleData for EditorSnapshot {
    fn example_data() -> Self {
        let route = RouteGeometry::example_data();
        Self {
            waypoints: route.coordinates.clone(),
            landmarks: vec![],
            markers: vec![
                RegisteredMarker {
                    id: "waypoint-0".to_owned(),
                    handle: MarkerHandle(1),
                },
                RegisteredMarker {
                    id: "waypoint-1".to_owned(),
                    handle: MarkerHandle(2),
                },
            ],
            rows: vec![WaypointRow::new(0), WaypointRow::new(1)],
            route_length_km: Some(route.length_km()),
            waypoints_field: Some(
                utility::serde::to_string_lossy(&route.coordinates),
            ),
            route: Some(route),
            map: MapOptions::default(),
        }
    }
}
