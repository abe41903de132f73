//! Vehicle classes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FareError;

/// Truck size class a standard fare is published for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum VehicleClass {
    Small,
    Medium,
    Large,
    Trailer,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 4] = [
        VehicleClass::Small,
        VehicleClass::Medium,
        VehicleClass::Large,
        VehicleClass::Trailer,
    ];

    /// `vehicle_code` column value in the tariff table
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            VehicleClass::Small => 1,
            VehicleClass::Medium => 2,
            VehicleClass::Large => 3,
            VehicleClass::Trailer => 4,
        }
    }

    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|vehicle| vehicle.code() == code)
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            VehicleClass::Small => "small",
            VehicleClass::Medium => "medium",
            VehicleClass::Large => "large",
            VehicleClass::Trailer => "trailer",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            VehicleClass::Small => "小型車(2t)",
            VehicleClass::Medium => "中型車(4t)",
            VehicleClass::Large => "大型車(10t)",
            VehicleClass::Trailer => "トレーラー(20t)",
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for VehicleClass {
    type Err = FareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if let Ok(code) = normalized.parse::<u8>() {
            return Self::from_code(code)
                .ok_or_else(|| FareError::validation(format!("unknown vehicle code {code}")));
        }
        Self::ALL
            .into_iter()
            .find(|vehicle| vehicle.slug() == normalized)
            .ok_or_else(|| FareError::validation(format!("unknown vehicle class '{s}'")))
    }
}

impl TryFrom<String> for VehicleClass {
    type Error = FareError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
