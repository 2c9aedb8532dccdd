//! Fixed "what if" perturbations applied to a baseline input set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::InputSet;

/// Multiplier applied to traffic in a traffic surge.
pub const TRAFFIC_SURGE_FACTOR: f64 = 1.5;
/// Burning area added in a burning surge.
pub const BURNING_SURGE_INCREMENT: f64 = 50.0;
/// Multiplier applied to wind speed in a wind drop.
pub const WIND_DROP_FACTOR: f64 = 0.5;

/// The three scenario variants a baseline can be re-run under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    TrafficSurge,
    BurningSurge,
    WindDrop,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::TrafficSurge,
        ScenarioKind::BurningSurge,
        ScenarioKind::WindDrop,
    ];

    /// Derive the scenario inputs from a baseline. Untouched fields are copied.
    pub fn apply(&self, baseline: &InputSet) -> InputSet {
        let mut inputs = *baseline;
        match self {
            ScenarioKind::TrafficSurge => inputs.traffic *= TRAFFIC_SURGE_FACTOR,
            ScenarioKind::BurningSurge => inputs.burning += BURNING_SURGE_INCREMENT,
            ScenarioKind::WindDrop => inputs.wind *= WIND_DROP_FACTOR,
        }
        inputs
    }

    /// Form value of the `action` field that triggers this scenario.
    pub fn action_name(&self) -> &'static str {
        match self {
            ScenarioKind::TrafficSurge => "scenario_traffic",
            ScenarioKind::BurningSurge => "scenario_burning",
            ScenarioKind::WindDrop => "scenario_wind",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_name())
    }
}

impl FromStr for ScenarioKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenarioKind::ALL
            .into_iter()
            .find(|kind| kind.action_name() == s)
            .ok_or_else(|| format!("Unknown scenario: {}", s))
    }
}
