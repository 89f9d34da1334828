//! A running editor. The session actor handles one message at a time, so
//! every mutation and its re-render happen without interleaving. Directions
//! requests run on their own tasks and report back with `RouteResolved`.

use std::sync::Arc;

use actors::{
    actor::{Actor, ActorError},
    actor_ref::ActorRef,
    handler::{Context, Handler, Message},
};
use async_trait::async_trait;
use directions::{ApiError, DirectionsService};
use model::{coordinate::Coordinate, route::RouteGeometry};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::{sync::broadcast, task::JoinHandle};
use utility::id::HasId;

use crate::{
    route::{RouteRequest, RouteUpdate},
    route_editor::RouteEditor,
    snapshot::EditorSnapshot,
};

pub struct EditorSession {
    editor: RouteEditor,
    directions: Arc<dyn DirectionsService>,
}

impl Actor for EditorSession {}

impl HasId for EditorSession {
    type IdType = u64;
}

impl EditorSession {
    fn fetch_route(&self, request: Option<RouteRequest>, ctx: &Context<Self>) {
        let Some(request) = request else {
            return;
        };
        match ctx.myself() {
            Some(myself) => spawn_route_fetch(myself, self.directions.clone(), request),
            None => log::debug!("Session is shutting down, skipping route request."),
        }
    }
}

/// Starts the session actor. `initial_request` is the request handed out by
/// `RouteEditor::new`.
pub fn start(
    editor: RouteEditor,
    initial_request: Option<RouteRequest>,
    directions: Arc<dyn DirectionsService>,
) -> ActorRef<EditorSession> {
    let session = actors::run(EditorSession {
        editor,
        directions: directions.clone(),
    });
    if let Some(request) = initial_request {
        spawn_route_fetch(session.clone(), directions, request);
    }
    session
}

fn spawn_route_fetch(
    session: ActorRef<EditorSession>,
    directions: Arc<dyn DirectionsService>,
    request: RouteRequest,
) {
    tokio::spawn(async move {
        log::debug!(
            "Requesting route {} through {} waypoints.",
            request.generation,
            request.waypoints.len()
        );
        let result = directions.route(&request.waypoints).await;
        let resolved = RouteResolved {
            generation: request.generation,
            result,
        };
        if let Err(why) = session.tell(resolved).await {
            log::debug!("Route {} arrived too late: {}", request.generation, why);
        }
    });
}

// - Messages -

/// A click on the map.
pub struct AddWaypoint(pub Coordinate);

impl Message for AddWaypoint {
    type Response = EditorSnapshot;
}

/// A list row's remove control, by index.
pub struct RemoveWaypoint(pub usize);

impl Message for RemoveWaypoint {
    type Response = EditorSnapshot;
}

pub struct AddLandmark(pub Coordinate);

impl Message for AddLandmark {
    type Response = ();
}

pub struct RouteResolved {
    pub generation: u64,
    pub result: Result<RouteGeometry, ApiError>,
}

impl Message for RouteResolved {
    type Response = RouteUpdate;
}

pub struct Snapshot;

impl Message for Snapshot {
    type Response = EditorSnapshot;
}

#[async_trait]
impl Handler<AddWaypoint> for EditorSession {
    async fn handle(&mut self, message: AddWaypoint, ctx: &Context<Self>) -> EditorSnapshot {
        let request = self.editor.add_waypoint(message.0);
        self.fetch_route(request, ctx);
        self.editor.snapshot()
    }
}

#[async_trait]
impl Handler<RemoveWaypoint> for EditorSession {
    async fn handle(&mut self, message: RemoveWaypoint, ctx: &Context<Self>) -> EditorSnapshot {
        let request = self.editor.remove_waypoint(message.0);
        self.fetch_route(request, ctx);
        self.editor.snapshot()
    }
}

#[async_trait]
impl Handler<AddLandmark> for EditorSession {
    async fn handle(&mut self, message: AddLandmark, _: &Context<Self>) {
        self.editor.add_landmark(message.0);
    }
}

#[async_trait]
impl Handler<RouteResolved> for EditorSession {
    async fn handle(&mut self, message: RouteResolved, _: &Context<Self>) -> RouteUpdate {
        self.editor
            .route_resolved(message.generation, message.result)
    }
}

#[async_trait]
impl Handler<Snapshot> for EditorSession {
    async fn handle(&mut self, _: Snapshot, _: &Context<Self>) -> EditorSnapshot {
        self.editor.snapshot()
    }
}

// - Landmark events -

/// The external notification that places a landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LandmarkEvent {
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

/// Forwards every landmark event to the session until either side goes away.
/// Events with invalid coordinates are skipped.
pub fn subscribe_landmarks(
    session: ActorRef<EditorSession>,
    mut events: broadcast::Receiver<LandmarkEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("Landmark subscriber fell behind, {skipped} event(s) lost.");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            let coordinate = match Coordinate::try_from(event.coordinates) {
                Ok(coordinate) => coordinate,
                Err(why) => {
                    log::warn!("Ignoring landmark event {:?}: {}", event.coordinates, why);
                    continue;
                }
            };

            if session.tell(AddLandmark(coordinate)).await.is_err() {
                break;
            }
        }
        log::debug!("Landmark subscription ended.");
    })
}

#[async_trait]
pub trait SessionRef {
    async fn add_waypoint(&self, coordinate: Coordinate) -> Result<EditorSnapshot, ActorError>;
    async fn remove_waypoint(&self, index: usize) -> Result<EditorSnapshot, ActorError>;
    async fn add_landmark(&self, coordinate: Coordinate) -> Result<(), ActorError>;
    async fn snapshot(&self) -> Result<EditorSnapshot, ActorError>;
}

#[async_trait]
impl SessionRef for ActorRef<EditorSession> {
    async fn add_waypoint(&self, coordinate: Coordinate) -> Result<EditorSnapshot, ActorError> {
        self.ask(AddWaypoint(coordinate)).await
    }

    async fn remove_waypoint(&self, index: usize) -> Result<EditorSnapshot, ActorError> {
        self.ask(RemoveWaypoint(index)).await
    }

    async fn add_landmark(&self, coordinate: Coordinate) -> Result<(), ActorError> {
        self.ask(AddLandmark(coordinate)).await
    }

    async fn snapshot(&self) -> Result<EditorSnapshot, ActorError> {
        self.ask(Snapshot).await
    }
}
