use model::coordinate::Coordinate;
use utility::serde::{from_str_or_default, to_string_lossy};

/// Ordered waypoints of the route being drawn. A waypoint's index is its
/// position, so removing one shifts everything behind it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaypointStore {
    waypoints: Vec<Coordinate>,
}

impl WaypointStore {
    /// Seeds the store from a JSON array of `[lng, lat]` pairs. Anything
    /// missing or unparseable, including a single invalid coordinate, yields
    /// an empty store.
    pub fn initialize(seed: Option<&str>) -> Self {
        Self {
            waypoints: from_str_or_default(seed),
        }
    }

    pub fn append(&mut self, coordinate: Coordinate) {
        self.waypoints.push(coordinate);
    }

    /// Removes the waypoint at `index`. Out of range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<Coordinate> {
        (index < self.waypoints.len()).then(|| self.waypoints.remove(index))
    }

    /// JSON array of `[lng, lat]` pairs, readable by `initialize`.
    pub fn serialize(&self) -> String {
        to_string_lossy(&self.waypoints)
    }

    pub fn as_slice(&self) -> &[Coordinate] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Landmarks only ever grow; there is no way to remove one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkStore {
    landmarks: Vec<Coordinate>,
}

impl LandmarkStore {
    pub fn add(&mut self, coordinate: Coordinate) {
        self.landmarks.push(coordinate);
    }

    pub fn as_slice(&self) -> &[Coordinate] {
        &self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}
