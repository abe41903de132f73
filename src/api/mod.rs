use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::FareError;
use crate::models::{BoundingBox, FareQuoteResult, GeoPoint, RegionCode, Selection, VehicleClass};
use crate::workflow::{FareQuoteService, QuoteSession};

#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<FareQuoteService>,
    pub defaults: Selection,
}

#[derive(Serialize, Deserialize)]
pub struct ApiRegion {
    pub code: u8,
    pub slug: String,
    pub name: String,
    pub bounds: BoundingBox,
}

#[derive(Serialize, Deserialize)]
pub struct ApiVehicle {
    pub code: u8,
    pub slug: String,
    pub label: String,
}

/// Body of `POST /quote`. Omitted selections fall back to the defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub origin: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
    pub vehicle: Option<VehicleClass>,
    pub region: Option<RegionCode>,
    pub use_highway: Option<bool>,
}

#[derive(Serialize, Deserialize)]
pub struct ApiQuote {
    #[serde(flatten)]
    pub result: FareQuoteResult,
    pub display: ApiQuoteDisplay,
}

#[derive(Serialize, Deserialize)]
pub struct ApiQuoteDisplay {
    pub fare: String,
    pub raw_distance: String,
    pub billing_distance: String,
    pub vehicle: String,
    pub bureau: String,
    pub highway: String,
}

#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
}

impl From<FareQuoteResult> for ApiQuote {
    fn from(result: FareQuoteResult) -> Self {
        let display = ApiQuoteDisplay {
            fare: result.format_fare(),
            raw_distance: format!("{}km", result.format_distance()),
            billing_distance: format!("{}km", result.billing_distance_km),
            vehicle: result.vehicle.label().to_string(),
            bureau: result.region.bureau_name(),
            highway: result.format_highway().to_string(),
        };
        Self { result, display }
    }
}

impl IntoResponse for FareError {
    fn into_response(self) -> Response {
        let status = match &self {
            FareError::MissingEndpoints | FareError::OriginNotSet | FareError::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
            FareError::RouteUnavailable { .. }
            | FareError::FerryRegionMismatch
            | FareError::NoLandRoute
            | FareError::FareNotFound { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            FareError::QuoteInProgress => StatusCode::CONFLICT,
            FareError::Api { .. } => StatusCode::BAD_GATEWAY,
            FareError::Config { .. } | FareError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ApiError {
            error: self.kind().to_string(),
            message: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/regions", get(get_regions))
        .route("/vehicles", get(get_vehicles))
        .route("/defaults", get(get_defaults))
        .route("/quote", post(post_quote))
        .with_state(state)
}

async fn get_health() -> &'static str {
    "ok"
}

async fn get_regions() -> Json<Vec<ApiRegion>> {
    let regions = RegionCode::ALL
        .into_iter()
        .map(|region| ApiRegion {
            code: region.code(),
            slug: region.slug().to_string(),
            name: region.name().to_string(),
            bounds: region.bounds(),
        })
        .collect();
    Json(regions)
}

async fn get_vehicles() -> Json<Vec<ApiVehicle>> {
    let vehicles = VehicleClass::ALL
        .into_iter()
        .map(|vehicle| ApiVehicle {
            code: vehicle.code(),
            slug: vehicle.slug().to_string(),
            label: vehicle.label().to_string(),
        })
        .collect();
    Json(vehicles)
}

async fn get_defaults(State(state): State<ApiState>) -> Json<Selection> {
    Json(state.defaults)
}

async fn post_quote(
    State(state): State<ApiState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<ApiQuote>, FareError> {
    let Json(request) = payload.map_err(|rejection| FareError::validation(rejection.body_text()))?;
    let selection = Selection {
        vehicle: request.vehicle.unwrap_or(state.defaults.vehicle),
        region: request.region.unwrap_or(state.defaults.region),
        use_highway: request.use_highway.unwrap_or(state.defaults.use_highway),
    };
    let session = QuoteSession::new(state.service.clone(), selection);

    if let Some(origin) = request.origin {
        session.set_origin(origin).await?;
    }
    if let Some(destination) = request.destination {
        session.set_destination(destination).await?;
    }

    let result = session.compute().await?;
    Ok(Json(ApiQuote::from(result)))
}
