//! Tariff lookup
//!
//! Fares live in a `fare_rates` table keyed by region, vehicle class and
//! billing distance. Lookups are exact matches; a missing row is an expected
//! outcome, not a fault.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::models::{RegionCode, VehicleClass};
use crate::{FareError, Result};

pub mod memory;
pub mod supabase;

pub use memory::InMemoryTariffStore;
pub use supabase::SupabaseTariffStore;

/// Exact-match key of a tariff row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TariffKey {
    pub region_code: u8,
    pub vehicle_code: u8,
    pub upto_km: u32,
}

impl TariffKey {
    #[must_use]
    pub fn new(region: RegionCode, vehicle: VehicleClass, upto_km: u32) -> Self {
        Self {
            region_code: region.code(),
            vehicle_code: vehicle.code(),
            upto_km,
        }
    }
}

/// One row of the `fare_rates` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffRow {
    pub region_code: u8,
    pub vehicle_code: u8,
    pub upto_km: u32,
    pub fare_yen: u32,
}

impl TariffRow {
    #[must_use]
    pub fn key(&self) -> TariffKey {
        TariffKey {
            region_code: self.region_code,
            vehicle_code: self.vehicle_code,
            upto_km: self.upto_km,
        }
    }
}

/// Queryable fare table
#[async_trait]
pub trait TariffStore: Send + Sync {
    /// Fare for an exact key, `None` when no row matches
    async fn find_fare(&self, key: &TariffKey) -> Result<Option<u32>>;
}

/// Look up the fare for a billing distance
#[instrument(skip(store))]
pub async fn lookup_fare(
    store: &dyn TariffStore,
    region: RegionCode,
    vehicle: VehicleClass,
    billing_distance_km: u32,
) -> Result<u32> {
    let key = TariffKey::new(region, vehicle, billing_distance_km);
    match store.find_fare(&key).await? {
        Some(fare) => {
            debug!("Tariff hit: {} yen", fare);
            Ok(fare)
        }
        None => {
            debug!("No tariff row for {:?}", key);
            Err(FareError::FareNotFound {
                region_code: key.region_code,
                vehicle_code: key.vehicle_code,
                upto_km: key.upto_km,
            })
        }
    }
}
