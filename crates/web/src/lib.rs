pub use crate::common::RouteResult;

use std::{env, sync::Arc};

use axum::{extract::FromRef, Router};
use directions::DirectionsService;
use editor::EditorConfig;
use sessions::SessionRegistry;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod common;
pub mod hateoas;
pub mod middleware;
pub mod sessions;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Clone, FromRef)]
pub struct WebState {
    pub sessions: SessionRegistry,
    pub config: Arc<EditorConfig>,
    pub directions: Arc<dyn DirectionsService>,
}

impl WebState {
    pub fn new(config: EditorConfig, directions: Arc<dyn DirectionsService>) -> Self {
        Self {
            sessions: SessionRegistry::default(),
            config: Arc::new(config),
            directions,
        }
    }
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .layer(TraceLayer::new_for_http())
}

/// Serves the api on `WEB_BIND_ADDRESS`, or on `0.0.0.0:8080`.
pub async fn start_web_server(state: WebState) -> std::io::Result<()> {
    let address = env::var("WEB_BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_owned());
    let listener = TcpListener::bind(&address).await?;
    log::info!("Listening on {}", address);

    axum::serve(listener, router(state).into_make_service()).await
}
