//! Transport-bureau regions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::location::BoundingBox;
use crate::FareError;

/// One of the ten regional transport bureaus a fare is filed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum RegionCode {
    Hokkaido,
    Tohoku,
    Kanto,
    HokurikuShinetsu,
    Chubu,
    Kinki,
    Chugoku,
    Shikoku,
    Kyushu,
    Okinawa,
}

impl RegionCode {
    pub const ALL: [RegionCode; 10] = [
        RegionCode::Hokkaido,
        RegionCode::Tohoku,
        RegionCode::Kanto,
        RegionCode::HokurikuShinetsu,
        RegionCode::Chubu,
        RegionCode::Kinki,
        RegionCode::Chugoku,
        RegionCode::Shikoku,
        RegionCode::Kyushu,
        RegionCode::Okinawa,
    ];

    /// `region_code` column value in the tariff table
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            RegionCode::Hokkaido => 1,
            RegionCode::Tohoku => 2,
            RegionCode::Kanto => 3,
            RegionCode::HokurikuShinetsu => 4,
            RegionCode::Chubu => 5,
            RegionCode::Kinki => 6,
            RegionCode::Chugoku => 7,
            RegionCode::Shikoku => 8,
            RegionCode::Kyushu => 9,
            RegionCode::Okinawa => 10,
        }
    }

    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|region| region.code() == code)
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            RegionCode::Hokkaido => "hokkaido",
            RegionCode::Tohoku => "tohoku",
            RegionCode::Kanto => "kanto",
            RegionCode::HokurikuShinetsu => "hokuriku_shinetsu",
            RegionCode::Chubu => "chubu",
            RegionCode::Kinki => "kinki",
            RegionCode::Chugoku => "chugoku",
            RegionCode::Shikoku => "shikoku",
            RegionCode::Kyushu => "kyushu",
            RegionCode::Okinawa => "okinawa",
        }
    }

    /// Japanese name as shown on the region selector
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            RegionCode::Hokkaido => "北海道",
            RegionCode::Tohoku => "東北",
            RegionCode::Kanto => "関東",
            RegionCode::HokurikuShinetsu => "北陸信越",
            RegionCode::Chubu => "中部",
            RegionCode::Kinki => "近畿",
            RegionCode::Chugoku => "中国",
            RegionCode::Shikoku => "四国",
            RegionCode::Kyushu => "九州",
            RegionCode::Okinawa => "沖縄",
        }
    }

    /// Map area used to frame the region on selection
    #[must_use]
    pub const fn bounds(self) -> BoundingBox {
        match self {
            RegionCode::Hokkaido => BoundingBox::new(45.6, 41.2, 139.0, 146.0),
            RegionCode::Tohoku => BoundingBox::new(41.2, 37.5, 139.5, 142.5),
            RegionCode::Kanto => BoundingBox::new(37.0, 35.0, 138.5, 140.5),
            RegionCode::HokurikuShinetsu => BoundingBox::new(37.0, 35.5, 136.0, 139.0),
            RegionCode::Chubu => BoundingBox::new(37.5, 34.5, 136.5, 138.5),
            RegionCode::Kinki => BoundingBox::new(36.0, 33.5, 134.5, 136.5),
            RegionCode::Chugoku => BoundingBox::new(35.0, 32.5, 132.0, 134.0),
            RegionCode::Shikoku => BoundingBox::new(34.5, 32.0, 132.0, 134.0),
            RegionCode::Kyushu => BoundingBox::new(33.0, 30.5, 129.5, 131.5),
            RegionCode::Okinawa => BoundingBox::new(26.8, 24.0, 122.9, 131.3),
        }
    }

    /// Bureau name, e.g. `関東運輸局`
    #[must_use]
    pub fn bureau_name(self) -> String {
        format!("{}運輸局", self.name())
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for RegionCode {
    type Err = FareError;

    /// Accepts the slug, the Japanese name, or the numeric code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_suffix("運輸局").unwrap_or(s);
        let normalized = s.to_ascii_lowercase().replace('-', "_");

        if let Ok(code) = normalized.parse::<u8>() {
            return Self::from_code(code)
                .ok_or_else(|| FareError::validation(format!("unknown region code {code}")));
        }

        Self::ALL
            .into_iter()
            .find(|region| region.slug() == normalized || region.name() == s)
            .ok_or_else(|| FareError::validation(format!("unknown region '{s}'")))
    }
}

impl TryFrom<String> for RegionCode {
    type Error = FareError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
