use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode},
    routing::{delete, get, on, post},
    Extension, Json, Router,
};
use editor::{
    session::{EditorSession, LandmarkEvent, SessionRef},
    snapshot::EditorSnapshot,
};
use model::{coordinate::Coordinate, ExampleData};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::{
    common::{
        route_not_found, schema, HateoasResult, RouteErrorResponse, RouteResult,
        VecResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    sessions::{SessionEntry, SessionRegistry},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/sessions{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<SessionDto>))
        .route("/:id/waypoints/:index", delete(remove_waypoint))
        .route("/:id/waypoints", post(add_waypoint))
        .route("/:id/landmarks", post(publish_landmark))
        .route("/:id", get(get_session))
        .route("/", get(get_sessions).post(create_session))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionDto {
    id: u64,
    #[serde(flatten)]
    editor: EditorSnapshot,
}

impl ExampleData for SessionDto {
    fn example_data() -> Self {
        Self {
            id: 1,
            editor: EditorSnapshot::example_data(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionBody {
    /// Seed, as a hidden form field would hold it.
    #[serde(default)]
    waypoints: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaypointBody {
    longitude: f64,
    latitude: f64,
}

async fn find_session(
    sessions: &SessionRegistry,
    id: u64,
    method: &Method,
    uri: &str,
) -> RouteResult<SessionEntry> {
    sessions.get(Id::new(id)).await.ok_or_else(|| {
        RouteErrorResponse::not_found(method, uri)
            .with_message(format!("There is no editor session {}.", id))
    })
}

async fn create_session(
    OriginalUri(original_uri): OriginalUri,
    State(WebState {
        sessions,
        config,
        directions,
    }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(body): Json<CreateSessionBody>,
) -> RouteResult<(StatusCode, Json<hateoas::Response<SessionDto>>)> {
    let (id, entry) = sessions.create(body.waypoints, &config, directions).await;
    let snapshot = entry.session.snapshot().await.map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    })?;

    Ok((
        StatusCode::CREATED,
        session_hateoas(id, snapshot, base_url).json(),
    ))
}

async fn get_sessions(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { sessions, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<SessionDto>>> {
    let mut data = vec![];
    for (id, entry) in sessions.all().await {
        let snapshot = entry.session.snapshot().await.map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })?;
        data.push(session_hateoas(id, snapshot, base_url.clone()));
    }

    Ok(VecResponse::new(data).hateoas().json())
}

async fn get_session(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<u64>,
    state: State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<SessionDto> {
    let entry = find_session(&state.sessions, id, &Method::GET, original_uri.path()).await?;
    entry
        .session
        .snapshot()
        .await
        .map(|snapshot| session_hateoas(Id::new(id), snapshot, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

/// A click on the map.
async fn add_waypoint(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<u64>,
    state: State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(body): Json<WaypointBody>,
) -> HateoasResult<SessionDto> {
    let entry = find_session(&state.sessions, id, &Method::POST, original_uri.path()).await?;
    let coordinate = Coordinate::new(body.longitude, body.latitude).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    })?;

    entry
        .session
        .add_waypoint(coordinate)
        .await
        .map(|snapshot| session_hateoas(Id::new(id), snapshot, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

/// A list row's remove control. Unknown indices leave the session as it is.
async fn remove_waypoint(
    OriginalUri(original_uri): OriginalUri,
    Path((id, index)): Path<(u64, usize)>,
    state: State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<SessionDto> {
    let entry = find_session(&state.sessions, id, &Method::DELETE, original_uri.path()).await?;
    entry
        .session
        .remove_waypoint(index)
        .await
        .map(|snapshot| session_hateoas(Id::new(id), snapshot, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::DELETE)
                .with_uri(original_uri.path())
        })
}

/// Publishes a landmark event on the session's bus. The landmark shows up
/// once the session has picked the event up.
async fn publish_landmark(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<u64>,
    state: State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(event): Json<LandmarkEvent>,
) -> RouteResult<(StatusCode, Json<hateoas::Response<LandmarkEvent>>)> {
    let entry = find_session(&state.sessions, id, &Method::POST, original_uri.path()).await?;
    Coordinate::try_from(event.coordinates).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    })?;

    let receivers = entry.landmarks.send(event).map_err(|_| {
        RouteErrorResponse::new(StatusCode::GONE)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
            .with_message("The session no longer listens for landmarks.")
    })?;

    let response = hateoas::Response::builder(event, base_url)
        .link("session", resource!("/{}", id))
        .debug_info("receivers", receivers)
        .build();
    Ok((StatusCode::ACCEPTED, response.json()))
}

fn session_hateoas(
    id: Id<EditorSession>,
    editor: EditorSnapshot,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<SessionDto> {
    let id = id.raw();
    hateoas::Response::builder(SessionDto { id, editor }, base_url)
        .link("self", resource!("/{}", id))
        .link("waypoints", resource!("/{}/waypoints", id))
        .link("landmarks", resource!("/{}/landmarks", id))
        .link("schema", resource!("/schema"))
        .build()
}
