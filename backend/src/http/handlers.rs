//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use tracing::{debug, warn};

use super::dto::{ChartsResponse, HealthResponse, HistoryResponse, SimulationForm, SimulationResponse};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::services::charts;
use crate::services::session::SessionId;
use crate::services::simulation::{self, Action, Outcome};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Header carrying the session identifier in both directions.
pub const SESSION_HEADER: &str = "x-session-id";

/// Path of the simulation view; soft failures redirect here.
pub const SIMULATION_PATH: &str = "/v1/simulation";

/// Resolve the session named by the request header, creating one when the
/// header is absent, malformed or refers to an expired session.
fn resolve_session(state: &AppState, headers: &HeaderMap) -> SessionId {
    let purged = state.sessions.purge_idle(state.session_idle);
    if purged > 0 {
        debug!(purged, "dropped idle sessions");
    }

    let requested = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<SessionId>().ok());
    state.sessions.resolve(requested)
}

fn redirect_to_idle(session: SessionId) -> Response {
    (
        [(SESSION_HEADER, session.to_string())],
        Redirect::to(SIMULATION_PATH),
    )
        .into_response()
}

fn view_response(session: SessionId, view: simulation::SimulationView) -> Response {
    (
        [(SESSION_HEADER, session.to_string())],
        Json(SimulationResponse::new(session.to_string(), view)),
    )
        .into_response()
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the history
/// store is usable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repo_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => format!("{}: ok", state.repository.backend_name()),
        Ok(false) => format!("{}: unavailable", state.repository.backend_name()),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        repository: repo_status,
    }))
}

// =============================================================================
// Simulation
// =============================================================================

/// GET /v1/simulation
///
/// Latest state: the most recent run recomputed, or the idle view.
pub async fn get_simulation(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let session = resolve_session(&state, &headers);
    let view = simulation::latest_view(state.repository.as_ref()).await?;
    Ok(view_response(session, view))
}

/// POST /v1/simulation
///
/// Run `calculate`, a scenario, or `clear`. Invalid input, unknown actions
/// and scenarios without a baseline redirect to the idle view; so does a
/// successful clear. A body that is not a form also redirects. Repeated
/// keys keep their first value.
pub async fn post_simulation(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, AppError> {
    let session = resolve_session(&state, &headers);
    let pairs = match form {
        Ok(Form(pairs)) => pairs,
        Err(rejection) => {
            warn!(%session, "unreadable simulation form: {}", rejection);
            return Ok(redirect_to_idle(session));
        }
    };
    let (action, raw) = SimulationForm::from_pairs(pairs).into_parts();

    let action = match Action::parse(action.as_deref()) {
        Ok(action) => action,
        Err(e) => {
            warn!(%session, "rejected simulation request: {}", e);
            return Ok(redirect_to_idle(session));
        }
    };

    let outcome = simulation::run_action(
        state.repository.as_ref(),
        &state.sessions,
        session,
        action,
        &raw,
    )
    .await;

    match outcome {
        Ok(Outcome::Computed(view)) => Ok(view_response(session, *view)),
        Ok(Outcome::Cleared) => Ok(redirect_to_idle(session)),
        Err(e) if e.is_soft() => {
            warn!(%session, ?action, "rejected simulation request: {}", e);
            Ok(redirect_to_idle(session))
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// History and charts
// =============================================================================

/// GET /v1/history
pub async fn get_history(State(state): State<AppState>) -> HandlerResult<HistoryResponse> {
    let records = db_services::list_history(state.repository.as_ref()).await?;
    let total = records.len();
    Ok(Json(HistoryResponse { records, total }))
}

/// GET /v1/charts
///
/// Threshold chart of the latest run and the trend over the whole history.
pub async fn get_charts(State(state): State<AppState>) -> HandlerResult<ChartsResponse> {
    let history = db_services::list_history(state.repository.as_ref()).await?;
    let threshold_chart = history
        .last()
        .map(|record| charts::threshold_chart(record.pm25_value));
    let trend_chart = charts::trend_chart(&history);

    Ok(Json(ChartsResponse {
        threshold_chart,
        trend_chart,
    }))
}
