//! Google Directions web service client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{DirectionsProvider, DirectionsRequest, DirectionsResponse};
use crate::config::DirectionsConfig;
use crate::models::{BoundingBox, Leg, RouteCandidate, Step};
use crate::{FareError, Result};

pub struct GoogleDirectionsClient {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
    region: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Debug, Deserialize)]
struct ApiRoute {
    bounds: ApiBounds,
    #[serde(default)]
    legs: Vec<ApiLeg>,
}

#[derive(Debug, Deserialize)]
struct ApiBounds {
    northeast: ApiLatLng,
    southwest: ApiLatLng,
}

#[derive(Debug, Deserialize)]
struct ApiLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct ApiLeg {
    #[serde(default)]
    start_address: String,
    #[serde(default)]
    end_address: String,
    distance: ApiDistance,
    #[serde(default)]
    steps: Vec<ApiStep>,
}

#[derive(Debug, Deserialize)]
struct ApiDistance {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct ApiStep {
    #[serde(default)]
    html_instructions: String,
    #[serde(default)]
    maneuver: Option<String>,
}

impl From<ApiRoute> for RouteCandidate {
    fn from(route: ApiRoute) -> Self {
        Self {
            bounds: BoundingBox {
                north: route.bounds.northeast.lat,
                south: route.bounds.southwest.lat,
                east: route.bounds.northeast.lng,
                west: route.bounds.southwest.lng,
            },
            legs: route
                .legs
                .into_iter()
                .map(|leg| Leg {
                    start_address: leg.start_address,
                    end_address: leg.end_address,
                    distance_meters: leg.distance.value,
                    steps: leg
                        .steps
                        .into_iter()
                        .map(|step| Step {
                            instructions: step.html_instructions,
                            maneuver: step.maneuver,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl From<ApiResponse> for DirectionsResponse {
    fn from(response: ApiResponse) -> Self {
        Self {
            status: response.status,
            routes: response.routes.into_iter().map(RouteCandidate::from).collect(),
        }
    }
}

impl GoogleDirectionsClient {
    /// Create a new client. Requires `directions.api_key`.
    pub fn new(config: &DirectionsConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| FareError::config("directions.api_key is required for Google Directions"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("stdfare/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FareError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            region: config.region.clone(),
        })
    }

    fn request_url(&self, request: &DirectionsRequest) -> String {
        let avoid: Vec<&str> = [
            request.avoid_highways.then_some("highways"),
            request.avoid_ferries.then_some("ferries"),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut url = format!(
            "{}?origin={}&destination={}&mode=driving&alternatives=true&language={}&region={}",
            self.base_url,
            urlencoding::encode(&request.origin.to_query_value()),
            urlencoding::encode(&request.destination.to_query_value()),
            urlencoding::encode(&self.language),
            urlencoding::encode(&self.region),
        );
        if !avoid.is_empty() {
            url.push_str("&avoid=");
            url.push_str(&urlencoding::encode(&avoid.join("|")));
        }
        url.push_str("&key=");
        url.push_str(&urlencoding::encode(&self.api_key));
        url
    }
}

#[async_trait]
impl DirectionsProvider for GoogleDirectionsClient {
    #[instrument(skip(self), fields(origin = %request.origin.format_coordinates(), destination = %request.destination.format_coordinates()))]
    async fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse> {
        debug!("Calling the directions API");

        let response = self.client.get(self.request_url(request)).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FareError::api(format!(
                "Directions API HTTP {status}: {body}"
            )));
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| FareError::api(format!("Failed to parse directions response: {e}")))?;

        if let Some(message) = &body.error_message {
            warn!("Directions API {}: {}", body.status, message);
        }
        info!(
            "Directions API returned {} with {} route(s)",
            body.status,
            body.routes.len()
        );

        Ok(body.into())
    }
}
