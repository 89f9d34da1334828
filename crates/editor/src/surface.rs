//! The outside world the editor draws into: the map, the hidden form field
//! holding the serialized waypoints and the waypoint list. Each comes with a
//! headless implementation that just records what was drawn.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use model::{
    coordinate::Coordinate,
    marker::{MarkerId, MarkerStyle},
    route::{OverlayStyle, RouteGeometry, ROUTE_LAYER_ID},
};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

use crate::list::WaypointRow;

/// Opaque handle of a marker shown on a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
pub struct MarkerHandle(pub u64);

pub trait MapSurface: Send {
    fn add_marker(
        &mut self,
        id: MarkerId,
        coordinate: Coordinate,
        style: &MarkerStyle,
    ) -> MarkerHandle;

    /// Removes every displayed marker carrying `class`, returning how many
    /// were removed.
    fn remove_markers_with_class(&mut self, class: &str) -> usize;

    fn has_route_layer(&self) -> bool;

    fn add_route_layer(&mut self, geometry: &RouteGeometry, style: &OverlayStyle);

    /// Replaces the data of the existing route layer.
    fn set_route_data(&mut self, geometry: &RouteGeometry);

    fn remove_route_layer(&mut self);
}

pub trait FormField: Send {
    fn value(&self) -> Option<String>;
    fn set_value(&mut self, value: &str);
}

pub trait ListContainer: Send {
    fn replace_rows(&mut self, rows: &[WaypointRow]);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayedMarker {
    pub handle: MarkerHandle,
    pub id: String,
    pub coordinate: Coordinate,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLayer {
    /// Shared by the layer and its GeoJSON source.
    pub id: String,
    pub geometry: RouteGeometry,
    /// The source data, a GeoJSON `Feature`.
    pub source: Value,
    pub style: OverlayStyle,
    /// How often the layer's data was replaced since it was added.
    pub data_updates: usize,
}

#[derive(Debug, Default)]
struct MapState {
    next_handle: u64,
    markers: IndexMap<MarkerHandle, DisplayedMarker>,
    route: Option<RouteLayer>,
}

/// A map without a screen. Clones share the same state, so a caller can keep
/// one to look at what the editor drew.
#[derive(Debug, Clone, Default)]
pub struct HeadlessMap {
    state: Arc<Mutex<MapState>>,
}

impl HeadlessMap {
    /// Displayed markers in the order they were added.
    pub fn markers(&self) -> Vec<DisplayedMarker> {
        lock(&self.state).markers.values().cloned().collect()
    }

    pub fn route_layer(&self) -> Option<RouteLayer> {
        lock(&self.state).route.clone()
    }
}

impl MapSurface for HeadlessMap {
    fn add_marker(
        &mut self,
        id: MarkerId,
        coordinate: Coordinate,
        style: &MarkerStyle,
    ) -> MarkerHandle {
        let mut state = lock(&self.state);
        state.next_handle += 1;
        let handle = MarkerHandle(state.next_handle);
        state.markers.insert(
            handle,
            DisplayedMarker {
                handle,
                id: id.to_string(),
                coordinate,
                style: style.clone(),
            },
        );
        handle
    }

    fn remove_markers_with_class(&mut self, class: &str) -> usize {
        let mut state = lock(&self.state);
        let before = state.markers.len();
        state.markers.retain(|_, marker| marker.style.class != class);
        before - state.markers.len()
    }

    fn has_route_layer(&self) -> bool {
        lock(&self.state).route.is_some()
    }

    fn add_route_layer(&mut self, geometry: &RouteGeometry, style: &OverlayStyle) {
        lock(&self.state).route = Some(RouteLayer {
            id: ROUTE_LAYER_ID.to_owned(),
            geometry: geometry.clone(),
            source: geometry.to_geojson(),
            style: style.clone(),
            data_updates: 0,
        });
    }

    fn set_route_data(&mut self, geometry: &RouteGeometry) {
        if let Some(route) = lock(&self.state).route.as_mut() {
            route.geometry = geometry.clone();
            route.source = geometry.to_geojson();
            route.data_updates += 1;
        }
    }

    fn remove_route_layer(&mut self) {
        lock(&self.state).route = None;
    }
}

/// A hidden input field. Clones share the value.
#[derive(Debug, Clone, Default)]
pub struct HiddenField {
    value: Arc<Mutex<Option<String>>>,
}

impl HiddenField {
    pub fn new(value: Option<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(value)),
        }
    }
}

impl FormField for HiddenField {
    fn value(&self) -> Option<String> {
        lock(&self.value).clone()
    }

    fn set_value(&mut self, value: &str) {
        *lock(&self.value) = Some(value.to_owned());
    }
}

/// A list element. Clones share the rows.
#[derive(Debug, Clone, Default)]
pub struct HeadlessList {
    rows: Arc<Mutex<Vec<WaypointRow>>>,
}

impl HeadlessList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<WaypointRow> {
        lock(&self.rows).clone()
    }
}

impl ListContainer for HeadlessList {
    fn replace_rows(&mut self, rows: &[WaypointRow]) {
        *lock(&self.rows) = rows.to_vec();
    }
}

/// Everything the editor renders into, handed over at construction.
pub struct EditorContext {
    pub map: Box<dyn MapSurface>,
    pub waypoints_field: Option<Box<dyn FormField>>,
    pub waypoint_list: Option<Box<dyn ListContainer>>,
}

impl EditorContext {
    pub fn new<M: MapSurface + 'static>(map: M) -> Self {
        Self {
            map: Box::new(map),
            waypoints_field: None,
            waypoint_list: None,
        }
    }

    pub fn with_waypoints_field<F: FormField + 'static>(mut self, field: F) -> Self {
        self.waypoints_field = Some(Box::new(field));
        self
    }

    pub fn with_waypoint_list<L: ListContainer + 'static>(mut self, list: L) -> Self {
        self.waypoint_list = Some(Box::new(list));
        self
    }
}
