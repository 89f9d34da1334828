use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Construction-time options of the map the editor draws on. None of these
/// influence editor behavior; they are handed through to the map surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MapOptions {
    pub style: String,
    /// `[longitude, latitude]`
    pub center: [f64; 2],
    pub zoom: f64,
    pub controls: MapControls,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            style: "mapbox://styles/chikas/cm00elyc0007101pw2mloe5uw".to_owned(),
            center: [139.759455, 38.6828391],
            zoom: 4.5,
            controls: MapControls::standard(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MapControls {
    pub geolocate: Option<GeolocateControl>,
    pub geocoder: Option<GeocoderControl>,
}

impl MapControls {
    pub fn standard() -> Self {
        Self {
            geolocate: Some(GeolocateControl::default()),
            geocoder: Some(GeocoderControl::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GeolocateControl {
    pub enable_high_accuracy: bool,
    pub track_user_location: bool,
    pub show_user_heading: bool,
    pub position: String,
}

impl Default for GeolocateControl {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            track_user_location: true,
            show_user_heading: false,
            position: "top-left".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GeocoderControl {
    pub types: String,
    pub countries: String,
    pub placeholder: String,
    pub class_name: String,
}

impl Default for GeocoderControl {
    fn default() -> Self {
        Self {
            types: "country,region,place,postcode,locality,neighborhood,address,poi"
                .to_owned(),
            countries: "jp".to_owned(),
            placeholder: "Search for a place".to_owned(),
            class_name: "custom-geocoder".to_owned(),
        }
    }
}
