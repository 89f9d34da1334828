use model::coordinate::Coordinate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::surface::ListContainer;

/// The remove button of a list row. It remembers the waypoint index at the
/// time the row was rendered, so rows must be re-rendered after every change
/// to the waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RemoveControl {
    index: usize,
}

impl RemoveControl {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaypointRow {
    /// 1-based
    pub ordinal: usize,
    pub label: String,
    pub remove: RemoveControl,
}

impl WaypointRow {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            ordinal: index + 1,
            label: format!("Waypoint: {}", index + 1),
            remove: RemoveControl { index },
        }
    }
}

#[derive(Debug, Default)]
pub struct WaypointListView {
    rows: Vec<WaypointRow>,
}

impl WaypointListView {
    pub fn rows(&self) -> &[WaypointRow] {
        &self.rows
    }

    /// Replaces all rows, one per waypoint. Without a container only the
    /// view's own rows are updated.
    pub fn rebuild(
        &mut self,
        container: Option<&mut (dyn ListContainer + 'static)>,
        waypoints: &[Coordinate],
    ) {
        self.rows = (0..waypoints.len()).map(WaypointRow::new).collect();

        match container {
            Some(container) => container.replace_rows(&self.rows),
            None => log::debug!("No waypoint list to render {} rows into.", self.rows.len()),
        }
    }
}
