//! In-memory tariff table
//!
//! Stands in for the hosted table in tests and offline runs. Rows can be
//! loaded from a JSON array with the same columns as `fare_rates`.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use super::{TariffKey, TariffRow, TariffStore};
use crate::{FareError, Result};

#[derive(Debug, Clone, Default)]
pub struct InMemoryTariffStore {
    rows: HashMap<TariffKey, u32>,
}

impl InMemoryTariffStore {
    /// Build from rows; a repeated key is rejected
    pub fn from_rows(rows: impl IntoIterator<Item = TariffRow>) -> Result<Self> {
        let mut map = HashMap::new();
        for row in rows {
            if map.insert(row.key(), row.fare_yen).is_some() {
                return Err(FareError::validation(format!(
                    "duplicate tariff row for region {}, vehicle {}, {} km",
                    row.region_code, row.vehicle_code, row.upto_km
                )));
            }
        }
        Ok(Self { rows: map })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let rows: Vec<TariffRow> = serde_json::from_str(json)
            .map_err(|e| FareError::validation(format!("invalid tariff rows: {e}")))?;
        Self::from_rows(rows)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&contents)?;
        info!("Loaded {} tariff rows from {}", store.len(), path.display());
        Ok(store)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl TariffStore for InMemoryTariffStore {
    async fn find_fare(&self, key: &TariffKey) -> Result<Option<u32>> {
        Ok(self.rows.get(key).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(region_code: u8, vehicle_code: u8, upto_km: u32, fare_yen: u32) -> TariffRow {
        TariffRow {
            region_code,
            vehicle_code,
            upto_km,
            fare_yen,
        }
    }

    #[tokio::test]
    async fn test_each_key_yields_one_fare() {
        let rows: Vec<TariffRow> = (1..=4)
            .flat_map(|vehicle| {
                (1..=20).map(move |step| row(3, vehicle, step * 10, u32::from(vehicle) * 1000 + step))
            })
            .collect();
        let store = InMemoryTariffStore::from_rows(rows.clone()).unwrap();
        assert_eq!(store.len(), rows.len());

        for r in rows {
            assert_eq!(store.find_fare(&r.key()).await.unwrap(), Some(r.fare_yen));
        }
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = InMemoryTariffStore::from_rows(vec![row(3, 3, 130, 1), row(3, 3, 130, 2)]);
        assert!(matches!(result, Err(FareError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_from_json() {
        let json = r#"[
            {"region_code": 3, "vehicle_code": 3, "upto_km": 130, "fare_yen": 45230},
            {"region_code": 3, "vehicle_code": 3, "upto_km": 140, "fare_yen": 47590}
        ]"#;
        let store = InMemoryTariffStore::from_json_str(json).unwrap();
        assert_eq!(store.len(), 2);
        let key = TariffKey {
            region_code: 3,
            vehicle_code: 3,
            upto_km: 140,
        };
        assert_eq!(store.find_fare(&key).await.unwrap(), Some(47_590));

        assert!(InMemoryTariffStore::from_json_str("{}").is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = InMemoryTariffStore::load_json("/nonexistent/fare_rates.json");
        assert!(matches!(result, Err(FareError::Io { .. })));
    }
}
