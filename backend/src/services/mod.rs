//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP handlers and the repository layer. They
//! combine the pure estimator with history storage, session baselines,
//! narrative text and chart data.

pub mod charts;
pub mod narrator;
pub mod session;
pub mod simulation;


#[cfg(test)]
#[path = "simulation_tests.rs"]
mod simulation_tests;

pub use charts::{threshold_chart, trend_chart, ThresholdChart, TrendChart};
pub use narrator::{comparative_summary, detailed_analysis, AnalysisPoint, ComparativeSummary};
pub use session::{SessionId, SessionStore};
pub use simulation::{
    latest_view, parse_inputs, run_action, Action, Outcome, RawInputs, SimulationError,
    SimulationView,
};
