use directions::ApiError;
use model::{
    coordinate::Coordinate,
    route::{OverlayStyle, RouteGeometry},
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::surface::MapSurface;

/// A directions request the caller is expected to issue. The result is fed
/// back through `RouteFetcher::apply` together with the generation.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub generation: u64,
    pub waypoints: Vec<Coordinate>,
}

/// What applying a directions result did to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum RouteUpdate {
    Created,
    Updated,
    /// The request failed, the overlay was left as it was.
    Failed,
    /// A newer request was issued in the meantime.
    Discarded,
}

pub struct RouteFetcher {
    style: OverlayStyle,
    discard_stale: bool,
    generation: u64,
    current: Option<RouteGeometry>,
}

impl RouteFetcher {
    /// With `discard_stale` unset, responses apply in the order they arrive,
    /// so the last response wins even if it answers an older request.
    pub fn new(style: OverlayStyle, discard_stale: bool) -> Self {
        Self {
            style,
            discard_stale,
            generation: 0,
            current: None,
        }
    }

    /// Geometry of the overlay currently on the map.
    pub fn current(&self) -> Option<&RouteGeometry> {
        self.current.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Removes the overlay when there are fewer than two waypoints, otherwise
    /// asks for a route through all of them.
    pub fn reconcile(
        &mut self,
        map: &mut dyn MapSurface,
        waypoints: &[Coordinate],
    ) -> Option<RouteRequest> {
        self.generation += 1;

        if waypoints.len() < 2 {
            if map.has_route_layer() {
                map.remove_route_layer();
                log::debug!("Removed route overlay, {} waypoint(s) left.", waypoints.len());
            }
            self.current = None;
            return None;
        }

        Some(RouteRequest {
            generation: self.generation,
            waypoints: waypoints.to_vec(),
        })
    }

    pub fn apply(
        &mut self,
        map: &mut dyn MapSurface,
        generation: u64,
        result: Result<RouteGeometry, ApiError>,
    ) -> RouteUpdate {
        if self.discard_stale && generation != self.generation {
            log::debug!(
                "Dropping route of request {generation}, request {} is newer.",
                self.generation
            );
            return RouteUpdate::Discarded;
        }

        let geometry = match result {
            Ok(geometry) => geometry,
            Err(why) => {
                log::warn!("Could not fetch route of request {generation}: {why}");
                return RouteUpdate::Failed;
            }
        };

        let update = if map.has_route_layer() {
            map.set_route_data(&geometry);
            RouteUpdate::Updated
        } else {
            map.add_route_layer(&geometry, &self.style);
            RouteUpdate::Created
        };
        self.current = Some(geometry);
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessMap;

    fn coordinate(longitude: f64, latitude: f64) -> Coordinate {
        Coordinate::new(longitude, latitude).unwrap()
    }

    fn geometry(offset: f64) -> RouteGeometry {
        RouteGeometry::new(vec![
            coordinate(10.0 + offset, 54.0),
            coordinate(10.2 + offset, 54.1),
            coordinate(10.4 + offset, 54.3),
        ])
    }

    #[test]
    fn fewer_than_two_waypoints_need_no_request() {
        let mut map = HeadlessMap::default();
        let mut fetcher = RouteFetcher::new(OverlayStyle::default(), false);

        assert_eq!(fetcher.reconcile(&mut map, &[]), None);
        assert_eq!(fetcher.reconcile(&mut map, &[coordinate(1.0, 1.0)]), None);
        assert!(!map.has_route_layer());
    }

    #[test]
    fn request_carries_all_waypoints_in_order() {
        let mut map = HeadlessMap::default();
        let mut fetcher = RouteFetcher::new(OverlayStyle::default(), false);
        let waypoints = [coordinate(1.0, 1.0), coordinate(3.0, 3.0), coordinate(2.0, 2.0)];

        let request = fetcher.reconcile(&mut map, &waypoints).unwrap();

        assert_eq!(request.waypoints, waypoints.to_vec());
        assert_eq!(request.generation, fetcher.generation());
    }

    #[test]
    fn first_response_creates_then_updates_in_place() {
        let mut map = HeadlessMap::default();
        let mut fetcher = RouteFetcher::new(OverlayStyle::default(), false);
        let waypoints = [coordinate(1.0, 1.0), coordinate(2.0, 2.0)];

        let first = fetcher.reconcile(&mut map, &waypoints).unwrap();
        assert_eq!(
            fetcher.apply(&mut map, first.generation, Ok(geometry(0.0))),
            RouteUpdate::Created
        );
        let second = fetcher.reconcile(&mut map, &waypoints).unwrap();
        assert_eq!(
            fetcher.apply(&mut map, second.generation, Ok(geometry(0.0))),
            RouteUpdate::Updated
        );

        let layer = map.route_layer().unwrap();
        assert_eq!(layer.geometry, geometry(0.0));
        assert_eq!(layer.style, OverlayStyle::default());
        assert_eq!(layer.data_updates, 1);
        assert_eq!(fetcher.current(), Some(&geometry(0.0)));
    }

    #[test]
    fn failures_leave_the_overlay_alone() {
        let mut map = HeadlessMap::default();
        let mut fetcher = RouteFetcher::new(OverlayStyle::default(), false);
        let waypoints = [coordinate(1.0, 1.0), coordinate(2.0, 2.0)];

        let first = fetcher.reconcile(&mut map, &waypoints).unwrap();
        fetcher.apply(&mut map, first.generation, Ok(geometry(0.0)));
        let second = fetcher.reconcile(&mut map, &waypoints).unwrap();
        let update = fetcher.apply(
            &mut map,
            second.generation,
            Err(ApiError::NoRoute {
                code: Some("NoRoute".to_owned()),
                message: None,
            }),
        );

        assert_eq!(update, RouteUpdate::Failed);
        assert_eq!(map.route_layer().unwrap().geometry, geometry(0.0));
    }

    #[test]
    fn last_response_wins_by_default() {
        let mut map = HeadlessMap::default();
        let mut fetcher = RouteFetcher::new(OverlayStyle::default(), false);
        let waypoints = [coordinate(1.0, 1.0), coordinate(2.0, 2.0)];

        let older = fetcher.reconcile(&mut map, &waypoints).unwrap();
        let newer = fetcher.reconcile(&mut map, &waypoints).unwrap();
        fetcher.apply(&mut map, newer.generation, Ok(geometry(1.0)));
        fetcher.apply(&mut map, older.generation, Ok(geometry(0.0)));

        assert_eq!(map.route_layer().unwrap().geometry, geometry(0.0));
    }

    #[test]
    fn stale_responses_can_be_discarded() {
        let mut map = HeadlessMap::default();
        let mut fetcher = RouteFetcher::new(OverlayStyle::default(), true);
        let waypoints = [coordinate(1.0, 1.0), coordinate(2.0, 2.0)];

        let older = fetcher.reconcile(&mut map, &waypoints).unwrap();
        let newer = fetcher.reconcile(&mut map, &waypoints).unwrap();
        fetcher.apply(&mut map, newer.generation, Ok(geometry(1.0)));

        assert_eq!(
            fetcher.apply(&mut map, older.generation, Ok(geometry(0.0))),
            RouteUpdate::Discarded
        );
        assert_eq!(map.route_layer().unwrap().geometry, geometry(1.0));
    }

    #[test]
    fn stale_response_after_dropping_below_two_waypoints() {
        let waypoints = [coordinate(1.0, 1.0), coordinate(2.0, 2.0)];

        // baseline: the late response brings the overlay back
        let mut map = HeadlessMap::default();
        let mut fetcher = RouteFetcher::new(OverlayStyle::default(), false);
        let request = fetcher.reconcile(&mut map, &waypoints).unwrap();
        fetcher.reconcile(&mut map, &waypoints[..1]);
        fetcher.apply(&mut map, request.generation, Ok(geometry(0.0)));
        assert!(map.has_route_layer());

        // with stale discarding it stays gone
        let mut map = HeadlessMap::default();
        let mut fetcher = RouteFetcher::new(OverlayStyle::default(), true);
        let request = fetcher.reconcile(&mut map, &waypoints).unwrap();
        fetcher.reconcile(&mut map, &waypoints[..1]);
        fetcher.apply(&mut map, request.generation, Ok(geometry(0.0)));
        assert!(!map.has_route_layer());
    }
}
