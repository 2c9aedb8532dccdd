//! Input and result types for a single PM2.5 estimation run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four emission/dispersion inputs of one simulation run.
///
/// All fields are expected to be finite and non-negative; form parsing in
/// [`crate::services::simulation`] enforces this before an `InputSet` is built
/// from user data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputSet {
    /// Traffic volume (vehicles)
    pub traffic: f64,
    /// Number of active industrial sources
    pub industry: f64,
    /// Open burning area
    pub burning: f64,
    /// Wind speed in km/h
    pub wind: f64,
}

impl InputSet {
    pub fn new(traffic: f64, industry: f64, burning: f64, wind: f64) -> Self {
        Self {
            traffic,
            industry,
            burning,
            wind,
        }
    }
}

/// Qualitative health band of a PM2.5 concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AirQualityLevel {
    Good,
    Fair,
    #[serde(rename = "Poor-Sensitive")]
    PoorSensitive,
    Poor,
}

impl AirQualityLevel {
    /// Label as stored in the history file.
    pub fn label(&self) -> &'static str {
        match self {
            AirQualityLevel::Good => "Good",
            AirQualityLevel::Fair => "Fair",
            AirQualityLevel::PoorSensitive => "Poor-Sensitive",
            AirQualityLevel::Poor => "Poor",
        }
    }

    /// Health advice shown next to the result.
    pub fn message(&self) -> &'static str {
        match self {
            AirQualityLevel::Good => "Air quality is very good",
            AirQualityLevel::Fair => {
                "People who need extra health care should reduce time spent outdoors"
            }
            AirQualityLevel::PoorSensitive => "Sensitive groups should reduce outdoor activities",
            AirQualityLevel::Poor => {
                "Everyone should stay alert and reduce time spent on outdoor activities"
            }
        }
    }

    /// CSS class used by the frontend to color the result card.
    pub fn css_class(&self) -> &'static str {
        match self {
            AirQualityLevel::Good => "good",
            AirQualityLevel::Fair => "fair",
            AirQualityLevel::PoorSensitive | AirQualityLevel::Poor => "poor",
        }
    }
}

impl fmt::Display for AirQualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of running the estimator over an [`InputSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    pub concentration: f64,
    pub level: AirQualityLevel,
    pub message: String,
    pub css_class: String,
}

impl EstimationResult {
    pub fn new(concentration: f64, level: AirQualityLevel) -> Self {
        Self {
            concentration,
            level,
            message: level.message().to_string(),
            css_class: level.css_class().to_string(),
        }
    }
}
