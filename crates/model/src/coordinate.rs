use std::{error, fmt};

use schemars::{gen::SchemaGenerator, schema::Schema, JsonSchema};
use serde::{Deserialize, Serialize};
use utility::geo::{is_valid_latitude, is_valid_longitude};

use crate::ExampleData;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    NotFinite,
    LongitudeOutOfRange(f64),
    LatitudeOutOfRange(f64),
}

impl error::Error for CoordinateError {}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotFinite => write!(f, "Coordinates must be finite numbers."),
            Self::LongitudeOutOfRange(longitude) => {
                write!(f, "Longitude {longitude} is not within [-180, 180].")
            }
            Self::LatitudeOutOfRange(latitude) => {
                write!(f, "Latitude {latitude} is not within [-90, 90].")
            }
        }
    }
}

/// A WGS84 position. Encoded on the wire as `[longitude, latitude]`, the
/// order used by GeoJSON and the directions service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    longitude: f64,
    latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, CoordinateError> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !is_valid_longitude(longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        if !is_valid_latitude(latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// `lng,lat` as used in directions request paths.
    pub fn to_path_segment(&self) -> String {
        format!("{},{}", self.longitude, self.latitude)
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = CoordinateError;

    fn try_from([longitude, latitude]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(longitude, latitude)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coordinate: Coordinate) -> Self {
        [coordinate.longitude, coordinate.latitude]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.longitude, self.latitude)
    }
}

impl JsonSchema for Coordinate {
    fn schema_name() -> String {
        "Coordinate".to_owned()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <[f64; 2]>::json_schema(gen)
    }
}

impl ExampleData for Coordinate {
    fn example_data() -> Self {
        Self {
            longitude: 139.759455,
            latitude: 38.6828391,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            Coordinate::new(180.5, 0.0),
            Err(CoordinateError::LongitudeOutOfRange(180.5))
        );
        assert_eq!(
            Coordinate::new(0.0, -91.0),
            Err(CoordinateError::LatitudeOutOfRange(-91.0))
        );
        assert_eq!(
            Coordinate::new(f64::NAN, 0.0),
            Err(CoordinateError::NotFinite)
        );
        assert!(Coordinate::new(-180.0, 90.0).is_ok());
    }

    #[test]
    fn encodes_as_longitude_latitude_pair() {
        let coordinate = Coordinate::new(139.759455, 38.6828391).unwrap();
        assert_eq!(
            serde_json::to_string(&coordinate).unwrap(),
            "[139.759455,38.6828391]"
        );
        assert_eq!(coordinate.to_path_segment(), "139.759455,38.6828391");
    }

    #[test]
    fn decoding_validates_ranges() {
        let parsed: Coordinate = serde_json::from_str("[10.5, 54.3]").unwrap();
        assert_eq!(parsed.longitude(), 10.5);
        assert_eq!(parsed.latitude(), 54.3);

        assert!(serde_json::from_str::<Coordinate>("[200, 54.3]").is_err());
        assert!(serde_json::from_str::<Coordinate>("[10.5]").is_err());
        assert!(serde_json::from_str::<Coordinate>("{\"lng\": 1}").is_err());
    }
}
