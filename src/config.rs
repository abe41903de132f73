//! Configuration management for the fare estimator
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use std::collections::HashMap;
use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::distance::DistanceTable;
use crate::models::{RegionCode, Selection, VehicleClass};
use crate::{FareError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FareConfig {
    /// Directions provider settings
    pub directions: DirectionsConfig,
    /// Tariff table settings
    pub tariff: TariffConfig,
    /// Billing-distance bucket overrides
    pub distance: DistanceConfig,
    /// Initial selections
    pub defaults: DefaultsConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Google Directions settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionsConfig {
    /// Maps platform API key
    pub api_key: Option<String>,
    /// Directions endpoint
    pub base_url: String,
    /// Language of addresses and instructions
    pub language: String,
    /// Region bias (ccTLD)
    pub region: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Which tariff store implementation to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TariffBackend {
    /// Hosted PostgREST table
    Supabase,
    /// JSON file loaded into memory
    File,
}

/// Tariff table settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    pub backend: TariffBackend,
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub supabase_url: Option<String>,
    /// Anonymous (public) API key
    pub supabase_anon_key: Option<String>,
    /// Table name
    pub table: String,
    /// JSON rows for the file backend
    pub rates_file: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Per-region distance buckets, keyed by region slug
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceConfig {
    pub overrides: HashMap<String, Vec<u32>>,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub vehicle: VehicleClass,
    pub region: RegionCode,
    pub use_highway: bool,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for one request, including outbound calls
    pub request_timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_directions_base_url() -> String {
    "https://maps.googleapis.com/maps/api/directions/json".to_string()
}

fn default_language() -> String {
    "ja".to_string()
}

fn default_region_bias() -> String {
    "jp".to_string()
}

fn default_timeout() -> u32 {
    15
}

fn default_table() -> String {
    "fare_rates".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u32 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_directions_base_url(),
            language: default_language(),
            region: default_region_bias(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            backend: TariffBackend::Supabase,
            supabase_url: None,
            supabase_anon_key: None,
            table: default_table(),
            rates_file: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let selection = Selection::default();
        Self {
            vehicle: selection.vehicle,
            region: selection.region,
            use_highway: selection.use_highway,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl DefaultsConfig {
    #[must_use]
    pub fn selection(&self) -> Selection {
        Selection {
            vehicle: self.vehicle,
            region: self.region,
            use_highway: self.use_highway,
        }
    }
}

impl FareConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. STDFARE_DIRECTIONS__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("STDFARE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| FareError::config(format!("Failed to build configuration: {e}")))?;

        let mut config: FareConfig = settings
            .try_deserialize()
            .map_err(|e| FareError::config(format!("Failed to deserialize configuration: {e}")))?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stdfare").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.directions.base_url.is_empty() {
            self.directions.base_url = default_directions_base_url();
        }
        if self.directions.language.is_empty() {
            self.directions.language = default_language();
        }
        if self.directions.timeout_seconds == 0 {
            self.directions.timeout_seconds = default_timeout();
        }
        if self.tariff.table.is_empty() {
            self.tariff.table = default_table();
        }
        if self.tariff.timeout_seconds == 0 {
            self.tariff.timeout_seconds = default_timeout();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_credentials()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.distance_table()?;
        Ok(())
    }

    /// Validate keys and backend requirements
    pub fn validate_credentials(&self) -> Result<()> {
        if let Some(api_key) = &self.directions.api_key {
            if api_key.len() < 8 {
                return Err(FareError::config(
                    "Directions API key appears to be invalid (too short). Please check your API key.",
                ));
            }
        }

        match self.tariff.backend {
            TariffBackend::Supabase => {
                if self.tariff.supabase_url.is_none() || self.tariff.supabase_anon_key.is_none() {
                    return Err(FareError::config(
                        "tariff.supabase_url and tariff.supabase_anon_key are required for the supabase backend",
                    ));
                }
            }
            TariffBackend::File => {
                if self.tariff.rates_file.as_deref().is_none_or(str::is_empty) {
                    return Err(FareError::config(
                        "tariff.rates_file is required for the file backend",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.directions.timeout_seconds > 300 {
            return Err(FareError::config(
                "Directions API timeout cannot exceed 300 seconds",
            ));
        }

        if self.tariff.timeout_seconds > 300 {
            return Err(FareError::config("Tariff query timeout cannot exceed 300 seconds"));
        }

        if self.server.request_timeout_seconds > 600 {
            return Err(FareError::config("Server request timeout cannot exceed 600 seconds"));
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(FareError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(FareError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        let urls = [
            Some(self.directions.base_url.as_str()),
            self.tariff.supabase_url.as_deref(),
        ];
        for url in urls.into_iter().flatten() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(FareError::config(format!(
                    "'{url}' must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        Ok(())
    }

    /// Bucket table with the configured overrides applied
    pub fn distance_table(&self) -> Result<DistanceTable> {
        DistanceTable::from_overrides(&self.distance.overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> FareConfig {
        let mut config = FareConfig::default();
        config.tariff.supabase_url = Some("https://example.supabase.co".to_string());
        config.tariff.supabase_anon_key = Some("anon-key".to_string());
        config
    }

    #[test]
    fn test_default_config() {
        let config = FareConfig::default();
        assert_eq!(
            config.directions.base_url,
            "https://maps.googleapis.com/maps/api/directions/json"
        );
        assert_eq!(config.directions.language, "ja");
        assert_eq!(config.tariff.table, "fare_rates");
        assert_eq!(config.tariff.backend, TariffBackend::Supabase);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.defaults.selection(), Selection::default());
    }

    #[test]
    fn test_supabase_backend_requires_credentials() {
        let config = FareConfig::default();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("supabase_url"));
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_file_backend_requires_path() {
        let mut config = FareConfig::default();
        config.tariff.backend = TariffBackend::File;
        assert!(config.validate().is_err());
        config.tariff.rates_file = Some("fare_rates.json".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = valid_config();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = valid_config();
        config.directions.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_short_api_key_rejected() {
        let mut config = valid_config();
        config.directions.api_key = Some("abc".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_distance_override_rejected() {
        let mut config = valid_config();
        config
            .distance
            .overrides
            .insert("okinawa".to_string(), vec![30, 20]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("stdfare-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
[tariff]
backend = "file"
rates_file = "fare_rates.json"

[defaults]
vehicle = "trailer"
region = "kyushu"
use_highway = false

[distance.overrides]
okinawa = [10, 30, 60]
"#,
        )
        .unwrap();

        let config = FareConfig::load_from_path(Some(path)).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(config.tariff.backend, TariffBackend::File);
        assert_eq!(config.defaults.vehicle, VehicleClass::Trailer);
        assert_eq!(config.defaults.region, RegionCode::Kyushu);
        assert!(!config.defaults.use_highway);
        assert_eq!(config.server.port, 8080);
        let table = config.distance_table().unwrap();
        assert_eq!(table.thresholds(RegionCode::Okinawa), &[10, 30, 60]);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = FareConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("stdfare"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
