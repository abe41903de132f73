//! Driving route models as returned by a directions provider

use serde::{Deserialize, Serialize};

use super::location::BoundingBox;

/// Substring in step instructions that marks a ferry crossing
pub const FERRY_MARKER: &str = "フェリー";

/// Provider maneuver type for boarding a ferry
pub const FERRY_MANEUVER: &str = "ferry";

/// One alternative route between origin and destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    pub legs: Vec<Leg>,
    pub bounds: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub start_address: String,
    pub end_address: String,
    pub distance_meters: u64,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Free-text driving instructions, possibly containing HTML markup
    pub instructions: String,
    /// Maneuver type, when the provider reports one (`ferry`, `turn-right`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maneuver: Option<String>,
}

impl Step {
    #[must_use]
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            maneuver: None,
        }
    }

    #[must_use]
    pub fn with_maneuver(mut self, maneuver: impl Into<String>) -> Self {
        self.maneuver = Some(maneuver.into());
        self
    }

    #[must_use]
    pub fn is_ferry(&self) -> bool {
        self.maneuver
            .as_deref()
            .is_some_and(|maneuver| maneuver.starts_with(FERRY_MANEUVER))
            || self.instructions.contains(FERRY_MARKER)
    }
}

impl Leg {
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_meters as f64 / 1000.0
    }
}

impl RouteCandidate {
    #[must_use]
    pub fn first_leg(&self) -> Option<&Leg> {
        self.legs.first()
    }

    /// True if any step of any leg crosses water by ferry
    #[must_use]
    pub fn uses_ferry(&self) -> bool {
        self.legs
            .iter()
            .any(|leg| leg.steps.iter().any(Step::is_ferry))
    }
}
