//! `stdfare` - Standard freight fare estimator
//!
//! Computes the standard trucking fare between two map points: a driving
//! route is resolved (rejecting Hokkaido↔Honshu crossings and ferry
//! segments), its distance is rounded to a billing bucket, and the fare is
//! looked up by region, vehicle class and billing distance.

pub mod api;
pub mod config;
pub mod distance;
pub mod error;
pub mod logging;
pub mod models;
pub mod routing;
pub mod tariff;
pub mod web;
pub mod workflow;

// Re-export core types for public API
pub use config::FareConfig;
pub use distance::{DistanceTable, round_distance};
pub use error::FareError;
pub use models::{FareQuoteResult, GeoPoint, RegionCode, RouteCandidate, Selection, VehicleClass};
pub use routing::{DirectionsProvider, resolve_route};
pub use tariff::{TariffStore, lookup_fare};
pub use workflow::{AppState, FareQuoteService, QuoteSession, WorkflowPhase};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, FareError>;
