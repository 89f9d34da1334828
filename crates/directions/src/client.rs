use std::env;

use async_trait::async_trait;
use chrono::Local;
use itertools::Itertools;
use model::{coordinate::Coordinate, route::RouteGeometry};
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::{response::DirectionsResponse, ApiError, DirectionsService};

pub const MAPBOX_API_URL: &str = "https://api.mapbox.com";
pub const DEFAULT_PROFILE: &str = "mapbox/driving-traffic";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsCredentials {
    pub access_token: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_profile")]
    pub profile: String,
    pub rate_limit_per_minute: Option<u64>,
    pub proxy: Option<String>,
}

fn default_base_url() -> String {
    MAPBOX_API_URL.to_owned()
}

fn default_profile() -> String {
    DEFAULT_PROFILE.to_owned()
}

impl DirectionsCredentials {
    pub fn new<S: Into<String>>(access_token: S) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: default_base_url(),
            profile: default_profile(),
            rate_limit_per_minute: None,
            proxy: None,
        }
    }

    /// Reads `MAPBOX_ACCESS_TOKEN` (required) and the optional
    /// `DIRECTIONS_BASE_URL`, `DIRECTIONS_PROFILE`,
    /// `DIRECTIONS_RATE_LIMIT_PER_MINUTE` and `DIRECTIONS_PROXY`.
    pub fn env() -> Result<Self, ApiError> {
        let access_token = env::var("MAPBOX_ACCESS_TOKEN").map_err(|_| {
            ApiError::MissingConfiguration("Expected MAPBOX_ACCESS_TOKEN.".to_owned())
        })?;

        let rate_limit_per_minute = match env::var("DIRECTIONS_RATE_LIMIT_PER_MINUTE") {
            Ok(value) => Some(value.parse().map_err(|_| {
                ApiError::MissingConfiguration(format!(
                    "DIRECTIONS_RATE_LIMIT_PER_MINUTE is not a number: {value}"
                ))
            })?),
            Err(_) => None,
        };

        Ok(Self {
            access_token,
            base_url: env::var("DIRECTIONS_BASE_URL").unwrap_or_else(|_| default_base_url()),
            profile: env::var("DIRECTIONS_PROFILE").unwrap_or_else(|_| default_profile()),
            rate_limit_per_minute,
            proxy: env::var("DIRECTIONS_PROXY").ok(),
        })
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_rate_limit_per_minute(mut self, rate_limit: u64) -> Self {
        self.rate_limit_per_minute = Some(rate_limit);
        self
    }
}

struct DirectionsClientState {
    pub avaliable_requests: u64,
    pub last_refill: chrono::DateTime<Local>,
}

pub struct DirectionsClient {
    pub credentials: DirectionsCredentials,
    http: reqwest::Client,
    state: RwLock<DirectionsClientState>,
}

impl DirectionsClient {
    pub fn new(credentials: &DirectionsCredentials) -> Result<Self, ApiError> {
        /* build the http client once, with optional proxy */
        let http = if let Some(proxy_url) = &credentials.proxy {
            log::info!("Requesting directions using proxy '{proxy_url}'.");
            reqwest::Client::builder()
                .proxy(reqwest::Proxy::all(proxy_url)?)
                .build()?
        } else {
            reqwest::Client::new()
        };

        Ok(Self {
            credentials: credentials.clone(),
            http,
            state: RwLock::new(DirectionsClientState {
                avaliable_requests: credentials.rate_limit_per_minute.unwrap_or(0),
                last_refill: chrono::offset::Local::now(),
            }),
        })
    }

    pub async fn avaliable_requests(&self) -> u64 {
        self.state.read().await.avaliable_requests
    }

    async fn try_decrement_avaliable_requests(&self) -> Result<(), ApiError> {
        if let Some(rate_limit_minutes) = self.credentials.rate_limit_per_minute {
            let mut state = self.state.write().await;

            let minutes_since_last_request =
                (chrono::offset::Local::now() - state.last_refill).num_minutes();
            if minutes_since_last_request >= 1 {
                state.avaliable_requests = rate_limit_minutes;
                state.last_refill = chrono::offset::Local::now();
            }

            if state.avaliable_requests != 0 {
                state.avaliable_requests -= 1;
            } else {
                return Err(ApiError::RateLimitReached);
            }
        }
        Ok(())
    }

    /// Request url without the query, so it is safe to log.
    pub fn endpoint(&self, waypoints: &[Coordinate]) -> String {
        let waypoints = waypoints
            .iter()
            .map(Coordinate::to_path_segment)
            .join(";");
        format!(
            "{}/directions/v5/{}/{}",
            self.credentials.base_url.trim_end_matches('/'),
            self.credentials.profile,
            waypoints
        )
    }

    /// Fetch the route geometry through all waypoints, in order.
    pub async fn get_route(&self, waypoints: &[Coordinate]) -> Result<RouteGeometry, ApiError> {
        if waypoints.len() < 2 {
            return Err(ApiError::NotEnoughWaypoints(waypoints.len()));
        }
        self.try_decrement_avaliable_requests().await?;

        /* perform get-request */
        let url = self.endpoint(waypoints);
        log::debug!("Requesting route through {} waypoints: {url}", waypoints.len());
        let response = self
            .http
            .get(&url)
            .query(&[
                ("steps", "true"),
                ("geometries", "geojson"),
                ("access_token", self.credentials.access_token.as_str()),
            ])
            .send()
            .await?;

        /* parse response */
        match response.status() {
            reqwest::StatusCode::OK => {
                let body = response.text().await?;
                serde_json::from_str::<DirectionsResponse>(&body)?.into_first_route()
            }
            other => match response.text().await {
                Ok(val) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: Some(val),
                }),
                Err(_) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: None,
                }),
            },
        }
    }
}

#[async_trait]
impl DirectionsService for DirectionsClient {
    async fn route(&self, waypoints: &[Coordinate]) -> Result<RouteGeometry, ApiError> {
        self.get_route(waypoints).await
    }
}
