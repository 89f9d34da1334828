use directions::ApiError;
use model::{coordinate::Coordinate, map::MapOptions, route::RouteGeometry};

use crate::{
    config::EditorConfig,
    list::{RemoveControl, WaypointListView, WaypointRow},
    markers::{MarkerRegistry, MarkerRenderer},
    route::{RouteFetcher, RouteRequest, RouteUpdate},
    snapshot::{EditorSnapshot, RegisteredMarker},
    store::{LandmarkStore, WaypointStore},
    surface::EditorContext,
};

/// The route editor. Every waypoint mutation re-renders synchronously before
/// returning; the only thing left to the caller is issuing the directions
/// request it hands back.
pub struct RouteEditor {
    context: EditorContext,
    map_options: MapOptions,
    waypoints: WaypointStore,
    landmarks: LandmarkStore,
    registry: MarkerRegistry,
    renderer: MarkerRenderer,
    route: RouteFetcher,
    list: WaypointListView,
}

impl RouteEditor {
    /// Seeds the waypoints from the form field and renders everything once.
    pub fn new(context: EditorContext, config: &EditorConfig) -> (Self, Option<RouteRequest>) {
        let seed = context
            .waypoints_field
            .as_ref()
            .and_then(|field| field.value());

        let mut editor = Self {
            context,
            map_options: config.map.clone(),
            waypoints: WaypointStore::initialize(seed.as_deref()),
            landmarks: LandmarkStore::default(),
            registry: MarkerRegistry::default(),
            renderer: MarkerRenderer::new(config.icons.clone()),
            route: RouteFetcher::new(config.overlay.clone(), config.discard_stale_routes),
            list: WaypointListView::default(),
        };
        log::debug!("Editor starts with {} waypoint(s).", editor.waypoints.len());

        let request = editor.refresh();
        (editor, request)
    }

    pub fn add_waypoint(&mut self, coordinate: Coordinate) -> Option<RouteRequest> {
        self.waypoints.append(coordinate);
        self.refresh()
    }

    /// Out of range indices change nothing and render nothing.
    pub fn remove_waypoint(&mut self, index: usize) -> Option<RouteRequest> {
        match self.waypoints.remove_at(index) {
            Some(_) => self.refresh(),
            None => {
                log::debug!(
                    "Ignoring removal of waypoint {index}, there are only {}.",
                    self.waypoints.len()
                );
                None
            }
        }
    }

    /// Runs a list row's remove control.
    pub fn activate(&mut self, control: RemoveControl) -> Option<RouteRequest> {
        self.remove_waypoint(control.index())
    }

    /// Landmarks only redraw the markers. The route and the waypoint list
    /// stay as they are.
    pub fn add_landmark(&mut self, coordinate: Coordinate) {
        self.landmarks.add(coordinate);
        self.render_markers();
    }

    pub fn route_resolved(
        &mut self,
        generation: u64,
        result: Result<RouteGeometry, ApiError>,
    ) -> RouteUpdate {
        self.route.apply(self.context.map.as_mut(), generation, result)
    }

    pub fn waypoints(&self) -> &[Coordinate] {
        self.waypoints.as_slice()
    }

    pub fn landmarks(&self) -> &[Coordinate] {
        self.landmarks.as_slice()
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn rows(&self) -> &[WaypointRow] {
        self.list.rows()
    }

    pub fn route(&self) -> Option<&RouteGeometry> {
        self.route.current()
    }

    pub fn map_options(&self) -> &MapOptions {
        &self.map_options
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        let route = self.route.current().cloned();
        EditorSnapshot {
            waypoints: self.waypoints.as_slice().to_vec(),
            landmarks: self.landmarks.as_slice().to_vec(),
            markers: self
                .registry
                .iter()
                .map(|(id, handle)| RegisteredMarker {
                    id: id.to_string(),
                    handle: *handle,
                })
                .collect(),
            rows: self.list.rows().to_vec(),
            route_length_km: route.as_ref().map(RouteGeometry::length_km),
            route,
            waypoints_field: self
                .context
                .waypoints_field
                .as_ref()
                .and_then(|field| field.value()),
            map: self.map_options.clone(),
        }
    }

    fn render_markers(&mut self) {
        self.renderer.rebuild(
            self.context.map.as_mut(),
            &mut self.registry,
            self.waypoints.as_slice(),
            self.landmarks.as_slice(),
        );
    }

    fn refresh(&mut self) -> Option<RouteRequest> {
        self.render_markers();

        let request = self
            .route
            .reconcile(self.context.map.as_mut(), self.waypoints.as_slice());

        match self.context.waypoints_field.as_mut() {
            Some(field) => field.set_value(&self.waypoints.serialize()),
            None => log::debug!("No waypoints field to write to."),
        }

        self.list
            .rebuild(self.context.waypoint_list.as_deref_mut(), self.waypoints.as_slice());

        request
    }
}

#[cfg(test)]
mod tests {
    use model::marker::{IconSet, MarkerId};

    use super::*;
    use crate::surface::{FormField, HeadlessList, HeadlessMap, HiddenField};

    fn coordinate(longitude: f64, latitude: f64) -> Coordinate {
        Coordinate::new(longitude, latitude).unwrap()
    }

    struct Fixture {
        map: HeadlessMap,
        field: HiddenField,
        list: HeadlessList,
        editor: RouteEditor,
        initial_request: Option<RouteRequest>,
    }

    fn fixture(seed: Option<&str>) -> Fixture {
        let map = HeadlessMap::default();
        let field = HiddenField::new(seed.map(str::to_owned));
        let list = HeadlessList::new();
        let context = EditorContext::new(map.clone())
            .with_waypoints_field(field.clone())
            .with_waypoint_list(list.clone());
        let (editor, initial_request) = RouteEditor::new(context, &EditorConfig::default());
        Fixture {
            map,
            field,
            list,
            editor,
            initial_request,
        }
    }

    #[test]
    fn initial_render_follows_the_seed() {
        let fixture = fixture(Some("[[1, 1], [2, 2]]"));

        assert_eq!(fixture.editor.waypoints().len(), 2);
        assert_eq!(fixture.map.markers().len(), 2);
        assert_eq!(fixture.list.rows().len(), 2);
        assert_eq!(fixture.field.value().as_deref(), Some("[[1.0,1.0],[2.0,2.0]]"));
        assert_eq!(
            fixture.initial_request.map(|request| request.waypoints),
            Some(vec![coordinate(1.0, 1.0), coordinate(2.0, 2.0)])
        );
    }

    #[test]
    fn invalid_seed_starts_empty() {
        let fixture = fixture(Some("[[1, 1], \"oops\"]"));

        assert!(fixture.editor.waypoints().is_empty());
        assert!(fixture.initial_request.is_none());
        assert_eq!(fixture.field.value().as_deref(), Some("[]"));
    }

    #[test]
    fn every_mutation_updates_field_and_list() {
        let mut fixture = fixture(None);

        assert!(fixture.editor.add_waypoint(coordinate(1.0, 1.0)).is_none());
        let request = fixture.editor.add_waypoint(coordinate(2.0, 2.0));
        assert!(request.is_some());
        assert_eq!(fixture.field.value().as_deref(), Some("[[1.0,1.0],[2.0,2.0]]"));
        assert_eq!(fixture.list.rows().len(), 2);

        let control = fixture.editor.rows()[0].remove;
        assert!(fixture.editor.activate(control).is_none());
        assert_eq!(fixture.field.value().as_deref(), Some("[[2.0,2.0]]"));
        assert_eq!(fixture.list.rows()[0].label, "Waypoint: 1");
    }

    #[test]
    fn removal_shifts_marker_identities() {
        let mut fixture = fixture(Some("[[1, 1], [2, 2], [3, 3]]"));

        fixture.editor.remove_waypoint(1);

        let registry = fixture.editor.registry();
        assert_eq!(registry.len(), 2);
        assert!(!registry.contains(&MarkerId::waypoint(2)));
        let markers = fixture.map.markers();
        let at = |id: MarkerId| {
            let handle = registry.get(&id).unwrap();
            markers
                .iter()
                .find(|marker| marker.handle == handle)
                .map(|marker| marker.coordinate)
        };
        assert_eq!(at(MarkerId::waypoint(0)), Some(coordinate(1.0, 1.0)));
        assert_eq!(at(MarkerId::waypoint(1)), Some(coordinate(3.0, 3.0)));
    }

    #[test]
    fn out_of_range_removal_renders_nothing() {
        let mut fixture = fixture(Some("[[1, 1]]"));
        let before = fixture.map.markers();

        assert!(fixture.editor.remove_waypoint(5).is_none());

        assert_eq!(fixture.map.markers(), before);
        assert_eq!(fixture.editor.waypoints().len(), 1);
    }

    #[test]
    fn landmarks_leave_waypoints_route_and_list_alone() {
        let mut fixture = fixture(Some("[[1, 1], [2, 2]]"));
        let generation = fixture.editor.route.generation();
        let rows = fixture.list.rows();
        let field = fixture.field.value();

        fixture.editor.add_landmark(coordinate(9.0, 9.0));

        assert_eq!(fixture.editor.waypoints().len(), 2);
        assert_eq!(fixture.editor.route.generation(), generation);
        assert_eq!(fixture.list.rows(), rows);
        assert_eq!(fixture.field.value(), field);
        assert!(fixture.editor.registry().contains(&MarkerId::landmark(0)));
        assert_eq!(fixture.map.markers().len(), 3);
    }

    #[test]
    fn missing_field_and_list_are_tolerated() {
        let map = HeadlessMap::default();
        let (mut editor, request) =
            RouteEditor::new(EditorContext::new(map.clone()), &EditorConfig::default());

        assert!(request.is_none());
        editor.add_waypoint(coordinate(1.0, 1.0));
        editor.add_waypoint(coordinate(2.0, 2.0));
        editor.remove_waypoint(0);

        assert_eq!(map.markers().len(), 1);
        assert_eq!(editor.rows().len(), 1);
        assert_eq!(editor.snapshot().waypoints_field, None);
    }

    #[test]
    fn configured_icons_are_used() {
        let map = HeadlessMap::default();
        let config = EditorConfig {
            icons: IconSet::from_base_url("https://cdn.example.org/pins"),
            ..EditorConfig::default()
        };
        let (mut editor, _) = RouteEditor::new(EditorContext::new(map.clone()), &config);

        for index in 0..11 {
            editor.add_waypoint(coordinate(index as f64, 0.0));
        }

        let urls = map
            .markers()
            .iter()
            .map(|marker| marker.style.icon_url().map(str::to_owned))
            .collect::<Vec<_>>();
        assert_eq!(
            urls[0].as_deref(),
            Some("https://cdn.example.org/pins/pin-one.png")
        );
        assert_eq!(
            urls[9].as_deref(),
            Some("https://cdn.example.org/pins/pin-ten.png")
        );
        assert_eq!(urls[10].as_deref(), Some("https://cdn.example.org/pins/logo.png"));
    }

    #[test]
    fn snapshot_reflects_the_route() {
        let mut fixture = fixture(Some("[[1, 1], [2, 2]]"));
        let request = fixture.initial_request.take().unwrap();
        let geometry = RouteGeometry::new(vec![
            coordinate(1.0, 1.0),
            coordinate(1.5, 1.2),
            coordinate(2.0, 2.0),
        ]);

        let update = fixture
            .editor
            .route_resolved(request.generation, Ok(geometry.clone()));

        let snapshot = fixture.editor.snapshot();
        assert_eq!(update, RouteUpdate::Created);
        assert_eq!(snapshot.route, Some(geometry));
        assert!(snapshot.route_length_km.unwrap() > 0.0);
        assert_eq!(
            snapshot
                .markers
                .iter()
                .map(|marker| marker.id.as_str())
                .collect::<Vec<_>>(),
            ["waypoint-0", "waypoint-1"]
        );
        assert_eq!(snapshot.waypoints_field, fixture.field.value());
    }
}
