//! User selections and computed fare quotes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::region::RegionCode;
use super::vehicle::VehicleClass;

/// Vehicle, region and highway choices that parameterize a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub vehicle: VehicleClass,
    pub region: RegionCode,
    pub use_highway: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            vehicle: VehicleClass::Large,
            region: RegionCode::Kanto,
            use_highway: true,
        }
    }
}

/// A standard fare computed for a resolved route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareQuoteResult {
    /// Driving distance of the selected route
    pub raw_distance_km: f64,
    /// Bucketed distance the tariff was looked up with
    pub billing_distance_km: u32,
    /// Fare before highway tolls and consumption tax
    pub fare_yen: u32,
    pub origin_address: String,
    pub destination_address: String,
    pub vehicle: VehicleClass,
    pub region: RegionCode,
    pub use_highway: bool,
    pub quoted_at: DateTime<Utc>,
}

impl FareQuoteResult {
    /// Route distance with one decimal, e.g. `123.4`
    #[must_use]
    pub fn format_distance(&self) -> String {
        format!("{:.1}", self.raw_distance_km)
    }

    /// Fare with thousands separators, e.g. `¥12,345`
    #[must_use]
    pub fn format_fare(&self) -> String {
        format!("¥{}", group_thousands(self.fare_yen))
    }

    #[must_use]
    pub fn format_highway(&self) -> &'static str {
        if self.use_highway {
            "利用する"
        } else {
            "利用しない"
        }
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
