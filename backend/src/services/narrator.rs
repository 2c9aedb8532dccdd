//! Human-readable explanations of computed results.
//!
//! Two independent generators:
//! - [`comparative_summary`] explains how a scenario differs from its baseline
//! - [`detailed_analysis`] explains a single result on its own

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::algorithms::estimator::{self, FAIR_MAX, GOOD_MAX};
use crate::models::{EstimationResult, InputSet};

/// Wind speed (km/h) below which dispersion is considered poor.
pub const LOW_WIND_THRESHOLD: f64 = 5.0;
/// Wind speed (km/h) below which a stronger wind is worth suggesting.
pub const WIND_BENEFIT_MAX_WIND: f64 = 15.0;
/// Extra wind (km/h) used for the "what if" recomputation.
pub const HYPOTHETICAL_WIND_INCREMENT: f64 = 8.0;

/// One of the four model inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Traffic,
    Industry,
    Burning,
    Wind,
}

impl InputField {
    pub const ALL: [InputField; 4] = [
        InputField::Traffic,
        InputField::Industry,
        InputField::Burning,
        InputField::Wind,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InputField::Traffic => "traffic",
            InputField::Industry => "industry",
            InputField::Burning => "open burning",
            InputField::Wind => "wind speed",
        }
    }

    pub fn value(&self, inputs: &InputSet) -> f64 {
        match self {
            InputField::Traffic => inputs.traffic,
            InputField::Industry => inputs.industry,
            InputField::Burning => inputs.burning,
            InputField::Wind => inputs.wind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increased,
    Decreased,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Increased => f.write_str("increased"),
            Direction::Decreased => f.write_str("decreased"),
        }
    }
}

/// A single input that differs between baseline and scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputChange {
    pub field: InputField,
    pub direction: Direction,
}

/// How a scenario run compares with its baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeSummary {
    pub changes: Vec<InputChange>,
    /// Change of the concentration relative to the baseline, in percent
    pub percent_change: f64,
    pub text: String,
}

/// Relative change from `baseline` to `scenario` in percent.
///
/// A non-positive baseline yields 0 instead of dividing by zero.
pub fn percent_change(baseline: f64, scenario: f64) -> f64 {
    if baseline > 0.0 {
        (scenario - baseline) / baseline * 100.0
    } else {
        0.0
    }
}

/// Describe which inputs moved and by how much the concentration changed.
///
/// Returns `None` when the scenario inputs equal the baseline inputs.
pub fn comparative_summary(
    baseline: &InputSet,
    scenario: &InputSet,
    baseline_result: &EstimationResult,
    scenario_result: &EstimationResult,
) -> Option<ComparativeSummary> {
    let changes: Vec<InputChange> = InputField::ALL
        .into_iter()
        .filter_map(|field| {
            let (before, after) = (field.value(baseline), field.value(scenario));
            if after > before {
                Some(InputChange {
                    field,
                    direction: Direction::Increased,
                })
            } else if after < before {
                Some(InputChange {
                    field,
                    direction: Direction::Decreased,
                })
            } else {
                None
            }
        })
        .collect();

    if changes.is_empty() {
        return None;
    }

    let pct = percent_change(baseline_result.concentration, scenario_result.concentration);
    let described: Vec<String> = changes
        .iter()
        .map(|c| format!("{} {}", c.field.label(), c.direction))
        .collect();
    let text = format!(
        "Compared with the baseline ({}), PM2.5 changed by about {:+.1}%",
        described.join(", "),
        pct
    );

    Some(ComparativeSummary {
        changes,
        percent_change: pct,
        text,
    })
}

/// Emission sources that appear as terms of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionSource {
    Traffic,
    Industry,
    Burning,
}

impl EmissionSource {
    pub fn label(&self) -> &'static str {
        match self {
            EmissionSource::Traffic => "traffic",
            EmissionSource::Industry => "industry",
            EmissionSource::Burning => "open burning",
        }
    }
}

/// One finding of the detailed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisPoint {
    /// The source with the largest raw contribution.
    DominantSource { source: EmissionSource },
    /// Weak wind is keeping the concentration above the Good band.
    LowWindAmplification,
    /// A stronger wind would lower the concentration.
    WindIncreaseBenefit {
        hypothetical_wind: f64,
        reduction_percent: f64,
    },
}

impl AnalysisPoint {
    pub fn message(&self) -> String {
        match self {
            AnalysisPoint::DominantSource { source } => format!(
                "The main factor driving PM2.5 in this scenario is {}.",
                source.label()
            ),
            AnalysisPoint::LowWindAmplification => "Fairly low wind speed keeps pollutants from \
                 dispersing, which pushes PM2.5 higher."
                .to_string(),
            AnalysisPoint::WindIncreaseBenefit {
                hypothetical_wind,
                reduction_percent,
            } => format!(
                "If wind speed rose to {:.1} km/h, PM2.5 would drop by about {:.1}%.",
                hypothetical_wind, reduction_percent
            ),
        }
    }
}

impl fmt::Display for AnalysisPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Source with the largest raw contribution; ties go to the earlier of
/// traffic, industry, burning. `None` when every contribution is zero.
pub fn dominant_source(inputs: &InputSet) -> Option<EmissionSource> {
    let c = estimator::source_contributions(inputs);
    if c.total() <= 0.0 {
        return None;
    }

    let candidates = [
        (EmissionSource::Traffic, c.traffic),
        (EmissionSource::Industry, c.industry),
        (EmissionSource::Burning, c.burning),
    ];
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.1 > best.1 {
            best = *candidate;
        }
    }
    Some(best.0)
}

/// Explain a single result. Each check adds at most one point; `None` when
/// no check fires.
pub fn detailed_analysis(
    inputs: &InputSet,
    result: &EstimationResult,
) -> Option<Vec<AnalysisPoint>> {
    let mut points = Vec::new();
    let current = result.concentration;

    if let Some(source) = dominant_source(inputs) {
        points.push(AnalysisPoint::DominantSource { source });
    }

    if inputs.wind < LOW_WIND_THRESHOLD && current > GOOD_MAX {
        points.push(AnalysisPoint::LowWindAmplification);
    }

    if inputs.wind < WIND_BENEFIT_MAX_WIND && current > FAIR_MAX {
        let hypothetical_wind = inputs.wind + HYPOTHETICAL_WIND_INCREMENT;
        let hypothetical = estimator::estimate_concentration(&InputSet {
            wind: hypothetical_wind,
            ..*inputs
        });
        if hypothetical < current {
            points.push(AnalysisPoint::WindIncreaseBenefit {
                hypothetical_wind,
                reduction_percent: (current - hypothetical) / current * 100.0,
            });
        }
    }

    if points.is_empty() {
        None
    } else {
        Some(points)
    }
}
