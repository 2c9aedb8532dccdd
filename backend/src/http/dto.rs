//! Data Transfer Objects for the HTTP API.

use serde::{Deserialize, Serialize};

pub use crate::models::{AirQualityLevel, EstimationResult, HistoryRecord, InputSet};
pub use crate::services::charts::{ThresholdBar, ThresholdChart, TrendChart, TrendPoint};
pub use crate::services::narrator::{AnalysisPoint, ComparativeSummary};
use crate::services::simulation::{RawInputs, SimulationView};

/// Form body of `POST /v1/simulation`.
///
/// Numbers arrive as strings so that malformed values reach the service
/// layer instead of being rejected during decoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationForm {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub traffic: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub burning: Option<String>,
    #[serde(default)]
    pub wind: Option<String>,
}

impl SimulationForm {
    /// Build from decoded `key=value` pairs, keeping the first value of each
    /// known key and ignoring the rest.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "action" => &mut form.action,
                "traffic" => &mut form.traffic,
                "industry" => &mut form.industry,
                "burning" => &mut form.burning,
                "wind" => &mut form.wind,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        form
    }

    pub fn into_parts(self) -> (Option<String>, RawInputs) {
        (
            self.action,
            RawInputs {
                traffic: self.traffic,
                industry: self.industry,
                burning: self.burning,
                wind: self.wind,
            },
        )
    }
}

/// Response of the simulation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub view: SimulationView,
    /// Rendered text of `analysis`, in the same order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_text: Option<Vec<String>>,
}

impl SimulationResponse {
    pub fn new(session_id: String, view: SimulationView) -> Self {
        let analysis_text = view
            .analysis
            .as_ref()
            .map(|points| points.iter().map(AnalysisPoint::message).collect());
        Self {
            session_id,
            view,
            analysis_text,
        }
    }
}

/// Response of `GET /v1/history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub records: Vec<HistoryRecord>,
    pub total: usize,
}

/// Response of `GET /v1/charts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsResponse {
    pub threshold_chart: Option<ThresholdChart>,
    pub trend_chart: Option<TrendChart>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub repository: String,
}
