//! Billing-distance rounding
//!
//! Tariffs are published per distance bucket. A measured driving distance is
//! billed at the smallest bucket that covers it; anything beyond the last
//! bucket is billed at the last bucket.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::RegionCode;
use crate::{FareError, Result};

/// Bucket layout of the published standard fare table: 10 km steps up to
/// 200 km, 20 km steps up to 500 km, then 50 km steps up to 1000 km.
static STANDARD_THRESHOLDS: LazyLock<Vec<u32>> = LazyLock::new(|| {
    (10..=200)
        .step_by(10)
        .chain((220..=500).step_by(20))
        .chain((550..=1000).step_by(50))
        .collect()
});

/// Distance buckets per region
#[derive(Debug, Clone)]
pub struct DistanceTable {
    default: Vec<u32>,
    overrides: HashMap<RegionCode, Vec<u32>>,
}

impl Default for DistanceTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl DistanceTable {
    /// The published layout, shared by every region
    #[must_use]
    pub fn standard() -> Self {
        Self {
            default: STANDARD_THRESHOLDS.clone(),
            overrides: HashMap::new(),
        }
    }

    /// Replace the buckets used for one region
    pub fn with_region(mut self, region: RegionCode, thresholds: Vec<u32>) -> Result<Self> {
        validate_thresholds(&thresholds)
            .map_err(|msg| FareError::config(format!("distance table for {region}: {msg}")))?;
        self.overrides.insert(region, thresholds);
        Ok(self)
    }

    /// Build from slug-keyed overrides as found in configuration
    pub fn from_overrides(overrides: &HashMap<String, Vec<u32>>) -> Result<Self> {
        overrides
            .iter()
            .try_fold(Self::standard(), |table, (slug, thresholds)| {
                let region = slug
                    .parse::<RegionCode>()
                    .map_err(|_| FareError::config(format!("unknown region '{slug}' in distance overrides")))?;
                table.with_region(region, thresholds.clone())
            })
    }

    #[must_use]
    pub fn thresholds(&self, region: RegionCode) -> &[u32] {
        self.overrides.get(&region).unwrap_or(&self.default)
    }

    /// Smallest bucket >= `raw_km`, or the largest bucket when none covers it
    #[must_use]
    pub fn round(&self, raw_km: f64, region: RegionCode) -> u32 {
        let km = if raw_km.is_nan() { 0.0 } else { raw_km.max(0.0) };
        let thresholds = self.thresholds(region);

        thresholds
            .iter()
            .copied()
            .find(|&threshold| f64::from(threshold) >= km)
            .or_else(|| thresholds.last().copied())
            .unwrap_or(0)
    }
}

/// Round with the standard table
#[must_use]
pub fn round_distance(raw_km: f64, region: RegionCode) -> u32 {
    static STANDARD: LazyLock<DistanceTable> = LazyLock::new(DistanceTable::standard);
    STANDARD.round(raw_km, region)
}

fn validate_thresholds(thresholds: &[u32]) -> std::result::Result<(), String> {
    if thresholds.is_empty() {
        return Err("thresholds cannot be empty".to_string());
    }
    if thresholds[0] == 0 {
        return Err("thresholds must be positive".to_string());
    }
    if let Some(pair) = thresholds.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(format!(
            "thresholds must be strictly ascending ({} then {})",
            pair[0], pair[1]
        ));
    }
    Ok(())
}
