use std::error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use model::{coordinate::Coordinate, route::RouteGeometry};

pub mod client;
pub mod response;

/// Something that can find a road route through an ordered list of waypoints.
#[async_trait]
pub trait DirectionsService: Send + Sync {
    async fn route(&self, waypoints: &[Coordinate]) -> Result<RouteGeometry, ApiError>;
}

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    NoRoute {
        code: Option<String>,
        message: Option<String>,
    },
    NotEnoughWaypoints(usize),
    RateLimitReached,
    MissingConfiguration(String),
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response({}) {}", status_code, url),
            },
            ApiError::NoRoute { code, message } => write!(
                f,
                "No route found ({}): {}",
                code.as_deref().unwrap_or("no code"),
                message.as_deref().unwrap_or("routes are empty")
            ),
            ApiError::NotEnoughWaypoints(count) => {
                write!(f, "A route needs at least two waypoints, got {count}.")
            }
            ApiError::RateLimitReached => write!(f, "Rate limit reached."),
            ApiError::MissingConfiguration(what) => {
                write!(f, "Missing configuration: {what}")
            }
        }
    }
}

/// The request url carries the access token, so it is stripped from the error.
impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e.without_url()))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}
