//! Hosted tariff table behind a Supabase (PostgREST) endpoint

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{TariffKey, TariffStore};
use crate::config::TariffConfig;
use crate::{FareError, Result};

pub struct SupabaseTariffStore {
    client: Client,
    base_url: String,
    anon_key: String,
    table: String,
}

#[derive(Debug, Deserialize)]
struct FareColumn {
    fare_yen: u32,
}

impl SupabaseTariffStore {
    pub fn new(config: &TariffConfig) -> Result<Self> {
        let base_url = config
            .supabase_url
            .clone()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| FareError::config("tariff.supabase_url is required for the supabase backend"))?;
        let anon_key = config
            .supabase_anon_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| FareError::config("tariff.supabase_anon_key is required for the supabase backend"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("stdfare/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FareError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            table: config.table.clone(),
        })
    }

    fn query_url(&self, key: &TariffKey) -> String {
        format!(
            "{}/rest/v1/{}?select=fare_yen&region_code=eq.{}&vehicle_code=eq.{}&upto_km=eq.{}",
            self.base_url,
            urlencoding::encode(&self.table),
            key.region_code,
            key.vehicle_code,
            key.upto_km
        )
    }
}

/// At most one row may match an exact key
fn single_fare(rows: Vec<FareColumn>, key: &TariffKey) -> Result<Option<u32>> {
    match rows.as_slice() {
        [] => Ok(None),
        [row] => Ok(Some(row.fare_yen)),
        _ => Err(FareError::api(format!(
            "{} tariff rows match region {}, vehicle {}, {} km",
            rows.len(),
            key.region_code,
            key.vehicle_code,
            key.upto_km
        ))),
    }
}

#[async_trait]
impl TariffStore for SupabaseTariffStore {
    #[instrument(skip(self))]
    async fn find_fare(&self, key: &TariffKey) -> Result<Option<u32>> {
        debug!("Querying tariff table {}", self.table);

        let response = self
            .client
            .get(self.query_url(key))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FareError::api(format!("Tariff query HTTP {status}: {body}")));
        }

        let rows: Vec<FareColumn> = response
            .json()
            .await
            .map_err(|e| FareError::api(format!("Failed to parse tariff response: {e}")))?;

        single_fare(rows, key)
    }
}
