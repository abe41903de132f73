//! Error types and handling for the fare estimator

use thiserror::Error;

/// Main error type for the fare estimator
#[derive(Error, Debug)]
pub enum FareError {
    /// Fare computation was triggered before both points were set
    #[error("Origin and destination must both be set")]
    MissingEndpoints,

    /// A destination was picked before any origin
    #[error("Origin must be set before the destination")]
    OriginNotSet,

    /// The directions provider did not return a usable route
    #[error("Route unavailable: provider status {status}")]
    RouteUnavailable { status: String },

    /// Exactly one endpoint lies in Hokkaido
    #[error("Route crosses between Hokkaido and Honshu")]
    FerryRegionMismatch,

    /// Every alternative route contains a ferry segment
    #[error("Every route alternative contains a ferry segment")]
    NoLandRoute,

    /// No tariff row matches the lookup key
    #[error("No tariff for region {region_code}, vehicle {vehicle_code}, {upto_km} km")]
    FareNotFound {
        region_code: u8,
        vehicle_code: u8,
        upto_km: u32,
    },

    /// A computation is already running for this session
    #[error("A fare computation is already in progress")]
    QuoteInProgress,

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl FareError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a route-unavailable error carrying the provider status
    pub fn route_unavailable<S: Into<String>>(status: S) -> Self {
        Self::RouteUnavailable {
            status: status.into(),
        }
    }

    /// Stable machine-readable code for this error
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FareError::MissingEndpoints => "missing_endpoints",
            FareError::OriginNotSet => "origin_not_set",
            FareError::RouteUnavailable { .. } => "route_unavailable",
            FareError::FerryRegionMismatch => "ferry_region_mismatch",
            FareError::NoLandRoute => "no_land_route",
            FareError::FareNotFound { .. } => "fare_not_found",
            FareError::QuoteInProgress => "quote_in_progress",
            FareError::Config { .. } => "config",
            FareError::Api { .. } => "api",
            FareError::Validation { .. } => "validation",
            FareError::Io { .. } => "io",
        }
    }

    /// Whether the error is an expected outcome of the quote workflow
    /// rather than a fault in configuration or transport.
    #[must_use]
    pub fn is_workflow_outcome(&self) -> bool {
        !matches!(
            self,
            FareError::Config { .. } | FareError::Api { .. } | FareError::Io { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FareError::MissingEndpoints => {
                "出発地と目的地をクリックで指定してください".to_string()
            }
            FareError::OriginNotSet => "先に出発地を設定してください".to_string(),
            FareError::RouteUnavailable { status } => format!("ルート取得エラー：{status}"),
            FareError::FerryRegionMismatch => {
                "北海道⇔本州フェリー区間は計算できません".to_string()
            }
            FareError::NoLandRoute => {
                "「高速道路を利用する」にチェックして再計算してください".to_string()
            }
            FareError::FareNotFound { .. } => "運賃計算できません".to_string(),
            FareError::QuoteInProgress => {
                "運賃を計算中です。完了までお待ちください".to_string()
            }
            FareError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            FareError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            FareError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            FareError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for FareError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FareError::api(format!("request timed out: {err}"))
        } else {
            FareError::api(err.to_string())
        }
    }
}
