use async_trait::async_trait;

use crate::algorithms::ScenarioKind;
use crate::db::repositories::LocalRepository;
use crate::db::repository::{HistoryRepository, RepositoryError, RepositoryResult};
use crate::db::services as db_services;
use crate::models::{AirQualityLevel, HistoryRecord, InputSet};
use crate::services::simulation::{
    latest_view, parse_inputs, run_action, Action, Outcome, RawInputs, SimulationError,
    SimulationView,
};
use crate::services::session::SessionStore;

fn raw(traffic: &str, industry: &str, burning: &str, wind: &str) -> RawInputs {
    RawInputs {
        traffic: Some(traffic.to_string()),
        industry: Some(industry.to_string()),
        burning: Some(burning.to_string()),
        wind: Some(wind.to_string()),
    }
}

/// Repository whose writes always fail.
struct FailingRepository;

#[async_trait]
impl HistoryRepository for FailingRepository {
    async fn append(&self, _record: HistoryRecord) -> RepositoryResult<usize> {
        Err(RepositoryError::storage("disk full"))
    }

    async fn load_all(&self) -> RepositoryResult<Vec<HistoryRecord>> {
        Ok(Vec::new())
    }

    async fn clear(&self) -> RepositoryResult<()> {
        Err(RepositoryError::storage("disk full"))
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(false)
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

fn expect_view(outcome: Outcome) -> SimulationView {
    match outcome {
        Outcome::Computed(view) => *view,
        Outcome::Cleared => panic!("expected a computed view"),
    }
}

#[test]
fn test_action_parse() {
    assert_eq!(Action::parse(Some("calculate")).unwrap(), Action::Calculate);
    assert_eq!(Action::parse(Some("clear")).unwrap(), Action::Clear);
    assert_eq!(
        Action::parse(Some("scenario_wind")).unwrap(),
        Action::Scenario(ScenarioKind::WindDrop)
    );
    assert!(matches!(
        Action::parse(Some("explode")),
        Err(SimulationError::UnknownAction(_))
    ));
    assert!(Action::parse(None).is_err());
}

#[test]
fn test_parse_inputs_defaults_absent_fields() {
    let inputs = parse_inputs(&RawInputs {
        traffic: Some("100".into()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(inputs, InputSet::new(100.0, 0.0, 0.0, 0.0));
}

#[test]
fn test_parse_inputs_rejects_bad_values() {
    for bad in ["", "abc", "-1", "NaN", "inf"] {
        let err = parse_inputs(&raw("1", bad, "1", "1")).unwrap_err();
        match err {
            SimulationError::InvalidInput { field, .. } => assert_eq!(field, "industry"),
            other => panic!("unexpected error {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_calculate_end_to_end() {
    let repo = LocalRepository::new();
    let sessions = SessionStore::new();
    let session = sessions.create();

    let outcome = run_action(
        &repo,
        &sessions,
        session,
        Action::Calculate,
        &raw("100", "10", "0", "10"),
    )
    .await
    .unwrap();
    let view = expect_view(outcome);

    let result = view.result.unwrap();
    assert!((result.concentration - 23.5 / 1.8).abs() < 1e-9);
    assert_eq!(result.level, AirQualityLevel::Fair);
    assert!(view.summary.is_none());
    assert_eq!(view.history.len(), 1);
    assert!(view.threshold_chart.is_some());
    assert_eq!(view.trend_chart.unwrap().points.len(), 1);
    assert_eq!(
        sessions.baseline(session),
        Some(InputSet::new(100.0, 10.0, 0.0, 10.0))
    );
}

#[tokio::test]
async fn test_scenario_without_baseline_is_rejected() {
    let repo = LocalRepository::new();
    let sessions = SessionStore::new();
    let session = sessions.create();

    let err = run_action(
        &repo,
        &sessions,
        session,
        Action::Scenario(ScenarioKind::TrafficSurge),
        &RawInputs::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SimulationError::MissingBaseline));
    assert!(err.is_soft());
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_invalid_input_does_not_touch_state() {
    let repo = LocalRepository::new();
    let sessions = SessionStore::new();
    let session = sessions.create();
    let baseline = InputSet::new(1.0, 1.0, 1.0, 1.0);
    sessions.set_baseline(session, baseline);

    let err = run_action(
        &repo,
        &sessions,
        session,
        Action::Calculate,
        &raw("ten", "1", "1", "1"),
    )
    .await
    .unwrap_err();

    assert!(err.is_soft());
    assert!(repo.is_empty());
    assert_eq!(sessions.baseline(session), Some(baseline));
}

#[tokio::test]
async fn test_scenario_uses_baseline_and_summarizes() {
    let repo = LocalRepository::new();
    let sessions = SessionStore::new();
    let session = sessions.create();

    run_action(
        &repo,
        &sessions,
        session,
        Action::Calculate,
        &raw("10", "2", "3", "8"),
    )
    .await
    .unwrap();

    // scenario actions ignore submitted fields
    let view = expect_view(
        run_action(
            &repo,
            &sessions,
            session,
            Action::Scenario(ScenarioKind::BurningSurge),
            &raw("999", "999", "999", "999"),
        )
        .await
        .unwrap(),
    );

    assert_eq!(view.inputs, Some(InputSet::new(10.0, 2.0, 53.0, 8.0)));
    let summary = view.summary.unwrap();
    assert!(summary.percent_change > 0.0);
    assert_eq!(view.history.len(), 2);

    // the baseline is read-only for scenarios
    assert_eq!(
        sessions.baseline(session),
        Some(InputSet::new(10.0, 2.0, 3.0, 8.0))
    );
}

#[tokio::test]
async fn test_clear_empties_baseline_and_history() {
    let repo = LocalRepository::new();
    let sessions = SessionStore::new();
    let session = sessions.create();

    for traffic in ["1", "2"] {
        run_action(
            &repo,
            &sessions,
            session,
            Action::Calculate,
            &raw(traffic, "0", "0", "0"),
        )
        .await
        .unwrap();
    }

    let outcome = run_action(&repo, &sessions, session, Action::Clear, &RawInputs::default())
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Cleared);
    assert!(sessions.baseline(session).is_none());
    assert!(db_services::list_history(&repo).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_latest_view_idle_when_empty() {
    let repo = LocalRepository::new();
    let view = latest_view(&repo).await.unwrap();
    assert_eq!(view, SimulationView::idle(Vec::new()));
    assert!(view.trend_chart.is_none());
}

#[tokio::test]
async fn test_latest_view_recomputes_last_run() {
    let repo = LocalRepository::new();
    let sessions = SessionStore::new();
    let session = sessions.create();

    run_action(
        &repo,
        &sessions,
        session,
        Action::Calculate,
        &raw("5", "0", "0", "0"),
    )
    .await
    .unwrap();
    run_action(
        &repo,
        &sessions,
        session,
        Action::Scenario(ScenarioKind::TrafficSurge),
        &RawInputs::default(),
    )
    .await
    .unwrap();

    let view = latest_view(&repo).await.unwrap();
    assert_eq!(view.inputs, Some(InputSet::new(7.5, 0.0, 0.0, 0.0)));
    assert!(view.summary.is_none());
    assert_eq!(view.history.len(), 2);
}

#[tokio::test]
async fn test_overflowing_estimate_is_rejected() {
    let repo = LocalRepository::new();
    let sessions = SessionStore::new();
    let session = sessions.create();

    run_action(
        &repo,
        &sessions,
        session,
        Action::Calculate,
        &raw("10", "1", "1", "1"),
    )
    .await
    .unwrap();
    let baseline = sessions.baseline(session);

    let err = run_action(
        &repo,
        &sessions,
        session,
        Action::Calculate,
        &raw("0", "1.2e308", "0", "0"),
    )
    .await
    .unwrap_err();

    match &err {
        SimulationError::InvalidInput { field, .. } => assert_eq!(*field, "industry"),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(err.is_soft());
    assert_eq!(repo.len(), 1);
    assert_eq!(sessions.baseline(session), baseline);
}

#[tokio::test]
async fn test_scenario_overflow_is_rejected() {
    let repo = LocalRepository::new();
    let sessions = SessionStore::new();
    let session = sessions.create();

    // 1.6e308 is finite, 1.5x of it is not
    run_action(
        &repo,
        &sessions,
        session,
        Action::Calculate,
        &raw("1.6e308", "0", "0", "1e300"),
    )
    .await
    .unwrap();

    let err = run_action(
        &repo,
        &sessions,
        session,
        Action::Scenario(ScenarioKind::TrafficSurge),
        &RawInputs::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SimulationError::InvalidInput { field: "traffic", .. }));
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_failed_write_keeps_previous_baseline() {
    let repo = FailingRepository;
    let sessions = SessionStore::new();
    let session = sessions.create();
    let previous = InputSet::new(1.0, 2.0, 3.0, 4.0);
    sessions.set_baseline(session, previous);

    let err = run_action(
        &repo,
        &sessions,
        session,
        Action::Calculate,
        &raw("50", "5", "5", "5"),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SimulationError::Repository(_)));
    assert!(!err.is_soft());
    assert_eq!(sessions.baseline(session), Some(previous));
}
