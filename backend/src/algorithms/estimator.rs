//! Linear PM2.5 estimation model.
//!
//! The model sums a fixed background level with one linear term per emission
//! source and divides by a wind dispersion factor:
//!
//! ```text
//! pm25 = (BASE + traffic*T + industry*I + burning*B) / (1 + wind*W)
//! ```
//!
//! The result is then classified against a fixed threshold table.

use serde::{Deserialize, Serialize};

use crate::models::{AirQualityLevel, EstimationResult, InputSet};

/// Background concentration present with no local sources.
pub const BASE_PM25_LEVEL: f64 = 5.0;
/// Contribution per unit of traffic.
pub const TRAFFIC_FACTOR: f64 = 0.025;
/// Contribution per industrial source.
pub const INDUSTRY_FACTOR: f64 = 1.6;
/// Contribution per unit of open burning.
pub const BURNING_FACTOR: f64 = 0.12;
/// Dispersion gained per km/h of wind.
pub const WIND_DISPERSION_FACTOR: f64 = 0.08;

/// Upper bound (inclusive) of the Good band.
pub const GOOD_MAX: f64 = 12.0;
/// Lower bound (inclusive) of the Fair band.
pub const FAIR_MIN: f64 = 12.1;
/// Upper bound (inclusive) of the Fair band.
pub const FAIR_MAX: f64 = 35.4;
/// Lower bound (inclusive) of the Poor-Sensitive band.
pub const POOR_SENSITIVE_MIN: f64 = 35.5;
/// Upper bound (inclusive) of the Poor-Sensitive band.
pub const POOR_SENSITIVE_MAX: f64 = 55.4;

/// Raw contribution of each emission source before wind dispersion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceContributions {
    pub traffic: f64,
    pub industry: f64,
    pub burning: f64,
}

impl SourceContributions {
    pub fn total(&self) -> f64 {
        self.traffic + self.industry + self.burning
    }
}

/// Per-source terms of the numerator, excluding the background level.
pub fn source_contributions(inputs: &InputSet) -> SourceContributions {
    SourceContributions {
        traffic: inputs.traffic * TRAFFIC_FACTOR,
        industry: inputs.industry * INDUSTRY_FACTOR,
        burning: inputs.burning * BURNING_FACTOR,
    }
}

/// Compute the concentration for a set of inputs.
pub fn estimate_concentration(inputs: &InputSet) -> f64 {
    let total_sources = BASE_PM25_LEVEL + source_contributions(inputs).total();
    let wind_dispersion = 1.0 + inputs.wind * WIND_DISPERSION_FACTOR;
    total_sources / wind_dispersion
}

/// Map a concentration to its health band.
///
/// Bands are closed intervals. Values that land in the gaps between bands,
/// (12.0, 12.1) and (35.4, 35.5), match no band and fall through to
/// [`AirQualityLevel::Poor`] together with everything above 55.4.
pub fn classify(concentration: f64) -> AirQualityLevel {
    if (0.0..=GOOD_MAX).contains(&concentration) {
        AirQualityLevel::Good
    } else if (FAIR_MIN..=FAIR_MAX).contains(&concentration) {
        AirQualityLevel::Fair
    } else if (POOR_SENSITIVE_MIN..=POOR_SENSITIVE_MAX).contains(&concentration) {
        AirQualityLevel::PoorSensitive
    } else {
        AirQualityLevel::Poor
    }
}

/// Run the full model: concentration plus classification.
pub fn estimate(inputs: &InputSet) -> EstimationResult {
    let concentration = estimate_concentration(inputs);
    EstimationResult::new(concentration, classify(concentration))
}
