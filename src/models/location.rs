//! Geographic point and bounding box models

use serde::{Deserialize, Serialize};

use crate::{FareError, Result};

/// A point picked on the map
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Reject coordinates outside the WGS84 range
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(FareError::validation(format!(
                "latitude {} is out of range",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(FareError::validation(format!(
                "longitude {} is out of range",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Format as `lat,lng`, the form directions services expect
    #[must_use]
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Rectangular map area in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(north: f64, south: f64, west: f64, east: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    #[must_use]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }

    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_value() {
        let point = GeoPoint::new(35.6812, 139.7671);
        assert_eq!(point.to_query_value(), "35.6812,139.7671");
        assert_eq!(point.format_coordinates(), "35.6812, 139.7671");
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(GeoPoint::new(35.0, 139.0).validate().is_ok());
        assert!(GeoPoint::new(91.0, 139.0).validate().is_err());
        assert!(GeoPoint::new(35.0, -181.0).validate().is_err());
        assert!(GeoPoint::new(f64::NAN, 139.0).validate().is_err());
    }

    #[test]
    fn test_bounding_box_contains() {
        let kanto = BoundingBox::new(37.0, 35.0, 138.5, 140.5);
        assert!(kanto.contains(&GeoPoint::new(35.6812, 139.7671)));
        assert!(!kanto.contains(&GeoPoint::new(43.0621, 141.3544)));
        assert_eq!(kanto.center(), GeoPoint::new(36.0, 139.5));
    }
}
