//! Route resolution
//!
//! Asks a [`DirectionsProvider`] for driving routes and picks the one a fare
//! can be computed for: no Hokkaido↔Honshu crossing and no ferry segment.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::models::{BoundingBox, GeoPoint, RouteCandidate};
use crate::{FareError, Result};

pub mod fixed;
pub mod google;

pub use fixed::FixedDirectionsProvider;
pub use google::GoogleDirectionsClient;

/// Status a provider reports when routing succeeded
pub const STATUS_OK: &str = "OK";
/// Status reported when the provider succeeded but found nothing
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

const HOKKAIDO_MARKERS: [&str; 2] = ["北海道", "Hokkaido"];
const COUNTRY_PREFIXES: [&str; 2] = ["日本、", "Japan, "];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub avoid_highways: bool,
    pub avoid_ferries: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    pub routes: Vec<RouteCandidate>,
}

impl DirectionsResponse {
    #[must_use]
    pub fn ok(routes: Vec<RouteCandidate>) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            routes,
        }
    }

    #[must_use]
    pub fn failed(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            routes: Vec::new(),
        }
    }
}

/// Source of driving directions
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Request route alternatives. Transport failures are errors; routing
    /// failures are reported through the response status.
    async fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsResponse>;
}

/// The route a fare is computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRoute {
    pub route: RouteCandidate,
    /// Driving distance of the selected route's first leg
    pub raw_distance_km: f64,
    pub origin_address: String,
    pub destination_address: String,
}

impl ResolvedRoute {
    /// Area the display should be reframed to
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        self.route.bounds
    }
}

/// Resolve a land-only driving route between two points.
///
/// Ferries are always avoided in the request; highways only when
/// `allow_highway` is false.
#[instrument(skip(provider))]
pub async fn resolve_route(
    provider: &dyn DirectionsProvider,
    origin: GeoPoint,
    destination: GeoPoint,
    allow_highway: bool,
) -> Result<ResolvedRoute> {
    let request = DirectionsRequest {
        origin,
        destination,
        avoid_highways: !allow_highway,
        avoid_ferries: true,
    };

    let response = provider.directions(&request).await?;
    select_route(response)
}

/// Apply the route rules to a provider response
pub fn select_route(response: DirectionsResponse) -> Result<ResolvedRoute> {
    if response.status != STATUS_OK {
        warn!("Directions provider returned status {}", response.status);
        return Err(FareError::route_unavailable(response.status));
    }

    let Some(first) = response.routes.first() else {
        warn!("Directions provider returned no routes");
        return Err(FareError::route_unavailable(STATUS_ZERO_RESULTS));
    };
    let first_leg = first
        .first_leg()
        .ok_or_else(|| FareError::api("route without legs in directions response"))?;

    let start_in_hokkaido = is_in_hokkaido(&first_leg.start_address);
    let end_in_hokkaido = is_in_hokkaido(&first_leg.end_address);
    if start_in_hokkaido != end_in_hokkaido {
        info!(
            "Rejecting Hokkaido crossing: {} → {}",
            first_leg.start_address, first_leg.end_address
        );
        return Err(FareError::FerryRegionMismatch);
    }

    let origin_address = normalize_address(&first_leg.start_address);
    let destination_address = normalize_address(&first_leg.end_address);

    let total = response.routes.len();
    let Some(index) = response.routes.iter().position(|route| !route.uses_ferry()) else {
        info!("All {} route alternatives contain a ferry segment", total);
        return Err(FareError::NoLandRoute);
    };
    let route = response
        .routes
        .into_iter()
        .nth(index)
        .ok_or(FareError::NoLandRoute)?;

    let raw_distance_km = route
        .first_leg()
        .map(|leg| leg.distance_km())
        .ok_or_else(|| FareError::api("route without legs in directions response"))?;

    debug!(
        "Selected alternative {} of {} ({:.1} km)",
        index + 1,
        total,
        raw_distance_km
    );

    Ok(ResolvedRoute {
        route,
        raw_distance_km,
        origin_address,
        destination_address,
    })
}

fn is_in_hokkaido(address: &str) -> bool {
    HOKKAIDO_MARKERS
        .iter()
        .any(|marker| address.contains(marker))
}

/// Strip a leading country name, e.g. `日本、〒100-0005 東京都…` → `〒100-0005 東京都…`
#[must_use]
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim_start();
    COUNTRY_PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .map(|rest| rest.strip_prefix(',').unwrap_or(rest).trim_start())
        .unwrap_or(trimmed)
        .to_string()
}
