use super::repositories::LocalRepository;
use super::services;
use crate::algorithms::estimate;
use crate::models::InputSet;

async fn run(repo: &LocalRepository, traffic: f64) -> usize {
    let inputs = InputSet::new(traffic, 2.0, 1.0, 6.0);
    services::record_run(repo, inputs, &estimate(&inputs))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_record_run_is_monotonic_and_ordered() {
    let repo = LocalRepository::new();
    let before = services::list_history(&repo).await.unwrap().len();

    for traffic in [10.0, 20.0, 30.0] {
        run(&repo, traffic).await;
    }

    let history = services::list_history(&repo).await.unwrap();
    assert_eq!(history.len(), before + 3);
    let traffic: Vec<f64> = history.iter().map(|r| r.inputs.traffic).collect();
    assert_eq!(traffic, vec![10.0, 20.0, 30.0]);
}

#[tokio::test]
async fn test_record_run_stores_result_fields() {
    let repo = LocalRepository::new();
    let inputs = InputSet::new(100.0, 10.0, 0.0, 10.0);
    let result = estimate(&inputs);
    services::record_run(&repo, inputs, &result).await.unwrap();

    let history = services::list_history(&repo).await.unwrap();
    let record = history.last().unwrap();
    assert_eq!(record.inputs, inputs);
    assert_eq!(record.pm25_value, result.concentration);
    assert_eq!(record.level, result.level);
}

#[tokio::test]
async fn test_list_history_empty() {
    let repo = LocalRepository::new();
    assert!(services::list_history(&repo).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_history() {
    let repo = LocalRepository::new();
    run(&repo, 1.0).await;
    run(&repo, 2.0).await;

    services::clear_history(&repo).await.unwrap();
    assert!(services::list_history(&repo).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_health_check_local() {
    let repo = LocalRepository::new();
    assert!(services::health_check(&repo).await.unwrap());
}
