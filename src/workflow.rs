//! Fare quote workflow
//!
//! `AppState` holds everything the user has picked plus the current result.
//! `FareQuoteService` drives one computation over it:
//!
//! ```text
//! Idle → Resolving → RoundingAndLookup → Quoted
//!   ↑________|______________|   (on any error)
//! ```
//!
//! `QuoteSession` owns a state behind an async mutex so that a second
//! trigger while one computation is running is rejected, and selection
//! changes made meanwhile are applied after it finishes.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::config::{FareConfig, TariffBackend};
use crate::distance::DistanceTable;
use crate::models::{FareQuoteResult, GeoPoint, RegionCode, Selection, VehicleClass};
use crate::routing::{self, DirectionsProvider, GoogleDirectionsClient, ResolvedRoute};
use crate::tariff::{self, InMemoryTariffStore, SupabaseTariffStore, TariffStore};
use crate::{FareError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    Idle,
    Resolving,
    RoundingAndLookup,
    Quoted,
}

impl WorkflowPhase {
    #[must_use]
    pub fn is_in_flight(self) -> bool {
        matches!(self, WorkflowPhase::Resolving | WorkflowPhase::RoundingAndLookup)
    }
}

/// Handle of the visual marker owned by a placed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedPoint {
    pub point: GeoPoint,
    pub marker: MarkerId,
}

/// Result of placing a point: the new marker and the one it replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerUpdate {
    pub placed: MarkerId,
    pub released: Option<MarkerId>,
}

/// Everything the user has selected plus the current result
#[derive(Debug, Clone, Serialize)]
pub struct AppState {
    origin: Option<PlacedPoint>,
    destination: Option<PlacedPoint>,
    selection: Selection,
    result: Option<FareQuoteResult>,
    phase: WorkflowPhase,
    next_marker: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Selection::default())
    }
}

impl AppState {
    #[must_use]
    pub fn new(selection: Selection) -> Self {
        Self {
            origin: None,
            destination: None,
            selection,
            result: None,
            phase: WorkflowPhase::Idle,
            next_marker: 1,
        }
    }

    #[must_use]
    pub fn origin(&self) -> Option<GeoPoint> {
        self.origin.map(|placed| placed.point)
    }

    #[must_use]
    pub fn destination(&self) -> Option<GeoPoint> {
        self.destination.map(|placed| placed.point)
    }

    #[must_use]
    pub fn origin_marker(&self) -> Option<MarkerId> {
        self.origin.map(|placed| placed.marker)
    }

    #[must_use]
    pub fn destination_marker(&self) -> Option<MarkerId> {
        self.destination.map(|placed| placed.marker)
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    #[must_use]
    pub fn result(&self) -> Option<&FareQuoteResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    /// Place the origin, releasing the previous origin marker
    pub fn set_origin(&mut self, point: GeoPoint) -> Result<MarkerUpdate> {
        point.validate()?;
        let placed = self.place(point);
        let released = self.origin.replace(placed).map(|old| old.marker);
        self.invalidate();
        Ok(MarkerUpdate {
            placed: placed.marker,
            released,
        })
    }

    /// Place the destination, releasing the previous destination marker.
    /// An origin must already be set.
    pub fn set_destination(&mut self, point: GeoPoint) -> Result<MarkerUpdate> {
        if self.origin.is_none() {
            return Err(FareError::OriginNotSet);
        }
        point.validate()?;
        let placed = self.place(point);
        let released = self.destination.replace(placed).map(|old| old.marker);
        self.invalidate();
        Ok(MarkerUpdate {
            placed: placed.marker,
            released,
        })
    }

    pub fn set_vehicle(&mut self, vehicle: VehicleClass) {
        if self.selection.vehicle != vehicle {
            self.selection.vehicle = vehicle;
            self.invalidate();
        }
    }

    pub fn set_region(&mut self, region: RegionCode) {
        if self.selection.region != region {
            self.selection.region = region;
            self.invalidate();
        }
    }

    pub fn set_use_highway(&mut self, use_highway: bool) {
        if self.selection.use_highway != use_highway {
            self.selection.use_highway = use_highway;
            self.invalidate();
        }
    }

    /// Drop the current result; points and selection stay
    pub fn invalidate(&mut self) {
        self.result = None;
        self.phase = WorkflowPhase::Idle;
    }

    fn place(&mut self, point: GeoPoint) -> PlacedPoint {
        let marker = MarkerId(self.next_marker);
        self.next_marker += 1;
        PlacedPoint { point, marker }
    }
}

/// Composes route resolution, distance rounding and tariff lookup
pub struct FareQuoteService {
    directions: Arc<dyn DirectionsProvider>,
    tariffs: Arc<dyn TariffStore>,
    distances: DistanceTable,
}

impl FareQuoteService {
    pub fn new(
        directions: Arc<dyn DirectionsProvider>,
        tariffs: Arc<dyn TariffStore>,
        distances: DistanceTable,
    ) -> Self {
        Self {
            directions,
            tariffs,
            distances,
        }
    }

    /// Build the live service. The tariff store is chosen by `tariff.backend`.
    pub fn from_config(config: &FareConfig) -> Result<Self> {
        let directions: Arc<dyn DirectionsProvider> =
            Arc::new(GoogleDirectionsClient::new(&config.directions)?);

        let tariffs: Arc<dyn TariffStore> = match config.tariff.backend {
            TariffBackend::Supabase => Arc::new(SupabaseTariffStore::new(&config.tariff)?),
            TariffBackend::File => {
                let path = config
                    .tariff
                    .rates_file
                    .as_deref()
                    .ok_or_else(|| FareError::config("tariff.rates_file is not set"))?;
                Arc::new(InMemoryTariffStore::load_json(path)?)
            }
        };
        info!("Using {:?} tariff backend", config.tariff.backend);

        Ok(Self::new(directions, tariffs, config.distance_table()?))
    }

    #[must_use]
    pub fn distances(&self) -> &DistanceTable {
        &self.distances
    }

    /// Find a land-only route for the selection's highway preference
    pub async fn resolve(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        selection: &Selection,
    ) -> Result<ResolvedRoute> {
        routing::resolve_route(
            self.directions.as_ref(),
            origin,
            destination,
            selection.use_highway,
        )
        .await
    }

    /// Round the route distance and look up its fare
    pub async fn price(&self, route: ResolvedRoute, selection: &Selection) -> Result<FareQuoteResult> {
        let billing_distance_km = self.distances.round(route.raw_distance_km, selection.region);
        let fare_yen = tariff::lookup_fare(
            self.tariffs.as_ref(),
            selection.region,
            selection.vehicle,
            billing_distance_km,
        )
        .await?;

        Ok(FareQuoteResult {
            raw_distance_km: route.raw_distance_km,
            billing_distance_km,
            fare_yen,
            origin_address: route.origin_address,
            destination_address: route.destination_address,
            vehicle: selection.vehicle,
            region: selection.region,
            use_highway: selection.use_highway,
            quoted_at: Utc::now(),
        })
    }

    /// Resolve and price in one step without touching any state
    pub async fn quote(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        selection: &Selection,
    ) -> Result<FareQuoteResult> {
        let route = self.resolve(origin, destination, selection).await?;
        self.price(route, selection).await
    }

    /// Run the workflow over `state`, leaving it `Quoted` or `Idle`
    #[instrument(skip_all, fields(vehicle = %state.selection.vehicle, region = %state.selection.region))]
    pub async fn run(&self, state: &mut AppState) -> Result<FareQuoteResult> {
        let (Some(origin), Some(destination)) = (state.origin(), state.destination()) else {
            return Err(FareError::MissingEndpoints);
        };
        let selection = state.selection;

        state.invalidate();
        state.phase = WorkflowPhase::Resolving;
        let outcome = match self.resolve(origin, destination, &selection).await {
            Ok(route) => {
                state.phase = WorkflowPhase::RoundingAndLookup;
                self.price(route, &selection).await
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(result) => {
                info!(
                    "Quoted {} for {} km ({:.1} km driven)",
                    result.format_fare(),
                    result.billing_distance_km,
                    result.raw_distance_km
                );
                state.result = Some(result.clone());
                state.phase = WorkflowPhase::Quoted;
                Ok(result)
            }
            Err(err) => {
                if err.is_workflow_outcome() {
                    info!("Quote not possible: {}", err);
                } else {
                    warn!("Quote failed: {}", err);
                }
                state.invalidate();
                Err(err)
            }
        }
    }
}

/// One user's state with serialized fare computation
pub struct QuoteSession {
    service: Arc<FareQuoteService>,
    state: Mutex<AppState>,
}

impl QuoteSession {
    #[must_use]
    pub fn new(service: Arc<FareQuoteService>, selection: Selection) -> Self {
        Self {
            service,
            state: Mutex::new(AppState::new(selection)),
        }
    }

    pub async fn set_origin(&self, point: GeoPoint) -> Result<MarkerUpdate> {
        self.state.lock().await.set_origin(point)
    }

    pub async fn set_destination(&self, point: GeoPoint) -> Result<MarkerUpdate> {
        self.state.lock().await.set_destination(point)
    }

    pub async fn set_vehicle(&self, vehicle: VehicleClass) {
        self.state.lock().await.set_vehicle(vehicle);
    }

    pub async fn set_region(&self, region: RegionCode) {
        self.state.lock().await.set_region(region);
    }

    pub async fn set_use_highway(&self, use_highway: bool) {
        self.state.lock().await.set_use_highway(use_highway);
    }

    /// Compute a quote; rejected while another computation holds the state
    pub async fn compute(&self) -> Result<FareQuoteResult> {
        let mut state = self
            .state
            .try_lock()
            .map_err(|_| FareError::QuoteInProgress)?;

        if state.phase.is_in_flight() {
            // a previous computation was dropped mid-way
            warn!("Resetting abandoned {:?} phase", state.phase);
            state.invalidate();
        }

        self.service.run(&mut state).await
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> AppState {
        self.state.lock().await.clone()
    }
}
