//! Data models for the fare estimator
//!
//! This module contains the core domain models organized by concern:
//! - Location: map points and bounding boxes
//! - Region / Vehicle: the enumerations a tariff is keyed by
//! - Route: candidate driving routes from a directions provider
//! - Quote: user selections and computed fares

pub mod location;
pub mod quote;
pub mod region;
pub mod route;
pub mod vehicle;

// Re-export all public types for convenient access
pub use location::{BoundingBox, GeoPoint};
pub use quote::{FareQuoteResult, Selection};
pub use region::RegionCode;
pub use route::{Leg, RouteCandidate, Step};
pub use vehicle::VehicleClass;
