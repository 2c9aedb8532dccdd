//! Orchestration of one simulation action.
//!
//! A request carries an `action` and up to four numeric form fields. This
//! module turns that into an estimation, records it in the history and
//! assembles everything the frontend shows: result, history, narrative and
//! chart data.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info};

use super::charts::{self, ThresholdChart, TrendChart};
use super::narrator::{self, AnalysisPoint, ComparativeSummary};
use super::session::{SessionId, SessionStore};
use crate::algorithms::{estimate, source_contributions, ScenarioKind};
use crate::db::repository::{HistoryRepository, RepositoryError};
use crate::db::services as db_services;
use crate::models::{EstimationResult, HistoryRecord, InputSet};

/// Errors raised while handling a simulation action.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// A numeric field was empty, non-numeric, negative or not finite.
    #[error("invalid value for '{field}': {value:?}")]
    InvalidInput { field: &'static str, value: String },

    /// The `action` field was missing or not recognized.
    #[error("unknown action: {0:?}")]
    UnknownAction(String),

    /// A scenario was requested before any baseline was calculated.
    #[error("no baseline has been calculated in this session")]
    MissingBaseline,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl SimulationError {
    /// Errors that should send the client back to the idle view without
    /// surfacing a message.
    pub fn is_soft(&self) -> bool {
        !matches!(self, SimulationError::Repository(_))
    }
}

/// Action requested by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Calculate,
    Scenario(ScenarioKind),
    Clear,
}

impl FromStr for Action {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "calculate" => Ok(Action::Calculate),
            "clear" => Ok(Action::Clear),
            other => other
                .parse::<ScenarioKind>()
                .map(Action::Scenario)
                .map_err(|_| SimulationError::UnknownAction(other.to_string())),
        }
    }
}

impl Action {
    /// Parse the optional `action` form field.
    pub fn parse(raw: Option<&str>) -> Result<Self, SimulationError> {
        raw.ok_or_else(|| SimulationError::UnknownAction(String::new()))?
            .parse()
    }
}

/// Unparsed numeric form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInputs {
    pub traffic: Option<String>,
    pub industry: Option<String>,
    pub burning: Option<String>,
    pub wind: Option<String>,
}

fn parse_field(field: &'static str, raw: Option<&str>) -> Result<f64, SimulationError> {
    let Some(raw) = raw else {
        return Ok(0.0);
    };
    let invalid = || SimulationError::InvalidInput {
        field,
        value: raw.to_string(),
    };
    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok(value)
}

/// Validate form fields into an [`InputSet`].
///
/// Absent fields default to 0; present fields must parse as finite,
/// non-negative numbers.
pub fn parse_inputs(raw: &RawInputs) -> Result<InputSet, SimulationError> {
    Ok(InputSet {
        traffic: parse_field("traffic", raw.traffic.as_deref())?,
        industry: parse_field("industry", raw.industry.as_deref())?,
        burning: parse_field("burning", raw.burning.as_deref())?,
        wind: parse_field("wind", raw.wind.as_deref())?,
    })
}

/// Everything the simulation page displays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationView {
    pub inputs: Option<InputSet>,
    pub result: Option<EstimationResult>,
    pub history: Vec<HistoryRecord>,
    pub summary: Option<ComparativeSummary>,
    pub analysis: Option<Vec<AnalysisPoint>>,
    pub threshold_chart: Option<ThresholdChart>,
    pub trend_chart: Option<TrendChart>,
}

impl SimulationView {
    /// View with no current result, only the history.
    pub fn idle(history: Vec<HistoryRecord>) -> Self {
        let trend_chart = charts::trend_chart(&history);
        Self {
            history,
            trend_chart,
            ..Default::default()
        }
    }

    fn computed(inputs: InputSet, result: EstimationResult, history: Vec<HistoryRecord>) -> Self {
        Self {
            analysis: narrator::detailed_analysis(&inputs, &result),
            threshold_chart: Some(charts::threshold_chart(result.concentration)),
            trend_chart: charts::trend_chart(&history),
            inputs: Some(inputs),
            result: Some(result),
            history,
            summary: None,
        }
    }
}

/// Result of [`run_action`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Computed(Box<SimulationView>),
    Cleared,
}

/// Execute one action for a session.
///
/// Invalid input, an overflowing estimate and a missing baseline are
/// rejected before anything is stored, so neither the history nor the
/// baseline changes. The baseline is only replaced once the run is recorded.
pub async fn run_action(
    repo: &dyn HistoryRepository,
    sessions: &SessionStore,
    session: SessionId,
    action: Action,
    raw: &RawInputs,
) -> Result<Outcome, SimulationError> {
    match action {
        Action::Clear => {
            sessions.clear_baseline(session);
            db_services::clear_history(repo).await?;
            info!(%session, "cleared baseline and history");
            Ok(Outcome::Cleared)
        }
        Action::Calculate => {
            let inputs = parse_inputs(raw)?;
            let (result, history) = compute_and_record(repo, inputs).await?;
            sessions.set_baseline(session, inputs);
            info!(
                %session,
                pm25 = result.concentration,
                level = %result.level,
                "calculated baseline"
            );
            Ok(Outcome::Computed(Box::new(SimulationView::computed(
                inputs, result, history,
            ))))
        }
        Action::Scenario(kind) => {
            let baseline = sessions
                .baseline(session)
                .ok_or(SimulationError::MissingBaseline)?;
            let inputs = kind.apply(&baseline);
            let (result, history) = compute_and_record(repo, inputs).await?;

            let baseline_result = estimate(&baseline);
            let summary = narrator::comparative_summary(&baseline, &inputs, &baseline_result, &result);
            info!(
                %session,
                scenario = %kind,
                pm25 = result.concentration,
                baseline_pm25 = baseline_result.concentration,
                "ran scenario"
            );

            let mut view = SimulationView::computed(inputs, result, history);
            view.summary = summary;
            Ok(Outcome::Computed(Box::new(view)))
        }
    }
}

/// Estimate `inputs`, rejecting values so large that the concentration
/// overflows. Such a result cannot be stored as JSON.
///
/// The error names the field with the largest source term.
fn checked_estimate(inputs: &InputSet) -> Result<EstimationResult, SimulationError> {
    let result = estimate(inputs);
    if result.concentration.is_finite() {
        return Ok(result);
    }

    let terms = source_contributions(inputs);
    let (field, value) = [
        ("traffic", terms.traffic, inputs.traffic),
        ("industry", terms.industry, inputs.industry),
        ("burning", terms.burning, inputs.burning),
    ]
    .into_iter()
    .max_by(|a, b| a.1.total_cmp(&b.1))
    .map(|(field, _, value)| (field, value))
    .unwrap_or(("traffic", inputs.traffic));

    Err(SimulationError::InvalidInput {
        field,
        value: value.to_string(),
    })
}

async fn compute_and_record(
    repo: &dyn HistoryRepository,
    inputs: InputSet,
) -> Result<(EstimationResult, Vec<HistoryRecord>), SimulationError> {
    let result = checked_estimate(&inputs)?;
    db_services::record_run(repo, inputs, &result).await?;
    let history = db_services::list_history(repo).await?;
    Ok((result, history))
}

/// State shown on a plain page load: the most recent run recomputed from its
/// stored inputs, or the idle view when the history is empty.
pub async fn latest_view(repo: &dyn HistoryRepository) -> Result<SimulationView, SimulationError> {
    let history = db_services::list_history(repo).await?;
    let Some(last) = history.last() else {
        debug!("history empty, returning idle view");
        return Ok(SimulationView::idle(history));
    };

    let inputs = last.inputs;
    let result = estimate(&inputs);
    Ok(SimulationView::computed(inputs, result, history))
}
