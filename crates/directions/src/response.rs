use model::{coordinate::Coordinate, route::RouteGeometry};
use serde::Deserialize;

use crate::ApiError;

/// Body of a directions response. Only the parts the editor uses are read.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub code: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    pub geometry: LineString,
    /// meters
    pub distance: Option<f64>,
    /// seconds
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineString {
    pub coordinates: Vec<Coordinate>,
}

impl DirectionsResponse {
    /// The geometry of the first (best) route.
    pub fn into_first_route(self) -> Result<RouteGeometry, ApiError> {
        let Some(route) = self.routes.into_iter().next() else {
            return Err(ApiError::NoRoute {
                code: self.code,
                message: self.message,
            });
        };

        Ok(RouteGeometry {
            coordinates: route.geometry.coordinates,
            distance_m: route.distance,
            duration_s: route.duration,
        })
    }
}
