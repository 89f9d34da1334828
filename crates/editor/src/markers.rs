use indexmap::IndexMap;
use model::{
    coordinate::Coordinate,
    marker::{IconSet, MarkerId, MANAGED_MARKER_CLASS},
};

use crate::surface::{MapSurface, MarkerHandle};

/// Markers currently on the map, by positional identity.
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    markers: IndexMap<MarkerId, MarkerHandle>,
}

impl MarkerRegistry {
    /// Registers a marker, returning the handle it replaced.
    pub fn insert(&mut self, id: MarkerId, handle: MarkerHandle) -> Option<MarkerHandle> {
        self.markers.insert(id, handle)
    }

    pub fn get(&self, id: &MarkerId) -> Option<MarkerHandle> {
        self.markers.get(id).copied()
    }

    pub fn contains(&self, id: &MarkerId) -> bool {
        self.markers.contains_key(id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &MarkerId> {
        self.markers.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MarkerId, &MarkerHandle)> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }
}

pub struct MarkerRenderer {
    icons: IconSet,
}

impl MarkerRenderer {
    pub fn new(icons: IconSet) -> Self {
        Self { icons }
    }

    /// Tears down every managed marker and draws all waypoints and landmarks
    /// again. Afterwards the registry holds exactly one entry per waypoint
    /// and landmark.
    pub fn rebuild(
        &self,
        map: &mut dyn MapSurface,
        registry: &mut MarkerRegistry,
        waypoints: &[Coordinate],
        landmarks: &[Coordinate],
    ) {
        let removed = map.remove_markers_with_class(MANAGED_MARKER_CLASS);
        registry.clear();

        for (index, coordinate) in waypoints.iter().enumerate() {
            let id = MarkerId::waypoint(index);
            let handle = map.add_marker(id, *coordinate, &self.icons.waypoint_style(index));
            registry.insert(id, handle);
        }

        let landmark_style = self.icons.landmark_style();
        for (index, coordinate) in landmarks.iter().enumerate() {
            let id = MarkerId::landmark(index);
            let handle = map.add_marker(id, *coordinate, &landmark_style);
            registry.insert(id, handle);
        }

        log::debug!(
            "Rendered {} waypoint and {} landmark markers, removed {} stale ones.",
            waypoints.len(),
            landmarks.len(),
            removed
        );
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use model::marker::{Appearance, MarkerStyle, LANDMARK_COLOR, START_COLOR};

    use super::*;
    use crate::surface::HeadlessMap;

    fn coordinate(longitude: f64, latitude: f64) -> Coordinate {
        Coordinate::new(longitude, latitude).unwrap()
    }

    fn ids(registry: &MarkerRegistry) -> HashSet<String> {
        registry.keys().map(MarkerId::to_string).collect()
    }

    #[test]
    fn registry_matches_current_waypoints_and_landmarks() {
        let mut map = HeadlessMap::default();
        let mut registry = MarkerRegistry::default();
        let renderer = MarkerRenderer::new(IconSet::new());
        let waypoints = [coordinate(1.0, 1.0), coordinate(2.0, 2.0), coordinate(3.0, 3.0)];
        let landmarks = [coordinate(9.0, 9.0)];

        renderer.rebuild(&mut map, &mut registry, &waypoints, &landmarks);
        renderer.rebuild(&mut map, &mut registry, &waypoints[..1], &landmarks);

        assert_eq!(
            ids(&registry),
            HashSet::from(["waypoint-0".to_owned(), "landmark-0".to_owned()])
        );
        assert_eq!(map.markers().len(), 2);
    }

    #[test]
    fn registry_points_at_displayed_markers() {
        let mut map = HeadlessMap::default();
        let mut registry = MarkerRegistry::default();
        let renderer = MarkerRenderer::new(IconSet::new());

        renderer.rebuild(
            &mut map,
            &mut registry,
            &[coordinate(1.0, 1.0), coordinate(2.0, 2.0)],
            &[coordinate(9.0, 9.0)],
        );

        for marker in map.markers() {
            let id = registry
                .iter()
                .find(|(_, handle)| **handle == marker.handle)
                .map(|(id, _)| id.to_string());
            assert_eq!(id, Some(marker.id));
        }
    }

    #[test]
    fn duplicate_coordinates_get_distinct_markers() {
        let mut map = HeadlessMap::default();
        let mut registry = MarkerRegistry::default();
        let renderer = MarkerRenderer::new(IconSet::new());
        let same = coordinate(4.0, 4.0);

        renderer.rebuild(&mut map, &mut registry, &[same, same], &[same]);

        assert_eq!(registry.len(), 3);
        assert_ne!(
            registry.get(&MarkerId::waypoint(0)),
            registry.get(&MarkerId::waypoint(1))
        );
        assert_eq!(map.markers().len(), 3);
    }

    #[test]
    fn styles_follow_position() {
        let mut map = HeadlessMap::default();
        let mut registry = MarkerRegistry::default();
        let renderer = MarkerRenderer::new(IconSet::new());

        renderer.rebuild(
            &mut map,
            &mut registry,
            &[coordinate(1.0, 1.0), coordinate(2.0, 2.0)],
            &[coordinate(9.0, 9.0)],
        );

        let markers = map.markers();
        assert_eq!(markers[0].style, MarkerStyle::color(START_COLOR));
        assert_ne!(markers[1].style, markers[0].style);
        assert_eq!(
            markers[2].style.appearance,
            Appearance::Color {
                color: LANDMARK_COLOR.to_owned()
            }
        );
    }
}
