//! Integration tests for the dashboard service and security poller
//!
//! Covers the user-facing action surface: refresh sequencing, security
//! status and history, model-load degradation, and the background
//! poller's interaction with the security cache.

mod common;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use aquawatch_core::cache::{FetchCache, QueryKey};
use aquawatch_core::time::FixedClock;
use aquawatch_core::QualityLabel;
use aquawatch_dashboard::{DashboardConfig, DashboardError, DashboardService, SecurityPoller};
use aquawatch_ml::{DecisionTree, ForestNode, QualityForest};
use aquawatch_store::RetryPolicy;

use common::{event, fixed_classifier, reading, MockStore};

fn fast_config() -> DashboardConfig {
    DashboardConfig::default().retry(RetryPolicy::new(3, Duration::from_millis(1)))
}

fn service_with(
    store: Arc<MockStore>,
    clock: Arc<FixedClock>,
) -> DashboardService<MockStore> {
    DashboardService::new(
        store,
        Some(Arc::new(fixed_classifier(0))),
        clock,
        fast_config(),
    )
}

#[tokio::test]
async fn test_refresh_now_bypasses_cache_and_records_snapshot() {
    let store = Arc::new(MockStore::with_readings(vec![reading(
        22.5, 10.0, 7.2, 1_000,
    )]));
    let clock = Arc::new(FixedClock::new(0));
    let service = service_with(Arc::clone(&store), clock);

    assert!(service.last_refresh().is_none());

    service.latest_prediction().await.unwrap();
    service.latest_prediction().await.unwrap();
    assert_eq!(store.reading_calls(), 1);

    let refreshed = service.refresh_now().await.unwrap();
    assert_eq!(store.reading_calls(), 2);
    assert_eq!(refreshed.label, QualityLabel::Excellent);
    assert_eq!(service.last_refresh(), Some(refreshed));
}

#[tokio::test]
async fn test_security_status_is_cached() {
    let store = Arc::new(MockStore::new());
    store.set_security(vec![event(true, 2_000), event(false, 1_000)]);
    let clock = Arc::new(FixedClock::new(0));
    let service = service_with(Arc::clone(&store), clock);

    let status = service.security_status().await.unwrap().unwrap();
    assert!(status.alert);
    assert_eq!(status.timestamp, 2_000);

    service.security_status().await.unwrap();
    assert_eq!(store.security_calls(), 1);
}

#[tokio::test]
async fn test_security_status_empty_table_is_informational() {
    let store = Arc::new(MockStore::new());
    let clock = Arc::new(FixedClock::new(0));
    let service = service_with(store, clock);

    assert_eq!(service.security_status().await.unwrap(), None);
}

#[tokio::test]
async fn test_security_fetch_failure_is_typed() {
    let store = Arc::new(MockStore::new());
    store.fail_next_security_queries(10);
    let clock = Arc::new(FixedClock::new(0));
    let service = service_with(Arc::clone(&store), clock);

    let err = service.security_status().await.unwrap_err();
    assert!(matches!(err, DashboardError::FetchFailure(_)));
    assert_eq!(store.security_calls(), 3);
}

#[tokio::test]
async fn test_security_history_newest_first() {
    let store = Arc::new(MockStore::new());
    // Deliberately scrambled response order
    store.set_security(vec![
        event(false, 2_000),
        event(true, 3_000),
        event(false, 1_000),
    ]);
    let clock = Arc::new(FixedClock::new(0));
    let service = service_with(store, clock);

    let history = service.security_history(10).await.unwrap();
    let timestamps: Vec<u64> = history.iter().map(|e| e.timestamp).collect();
    assert_eq!(timestamps, vec![3_000, 2_000, 1_000]);
}

#[tokio::test]
async fn test_model_file_load_success() {
    let forest = QualityForest::from_trees(vec![DecisionTree::new(vec![
        ForestNode::split(2, 6.8, 1, 2),
        ForestNode::leaf(2),
        ForestNode::leaf(0),
    ])])
    .unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&forest).unwrap().as_bytes())
        .unwrap();

    let store = Arc::new(MockStore::with_readings(vec![reading(
        22.5, 10.0, 7.2, 1_000,
    )]));
    let clock = Arc::new(FixedClock::new(0));
    let service =
        DashboardService::with_model_file(store, file.path(), clock, fast_config());

    assert!(service.predictions_enabled());
    let result = service.latest_prediction().await.unwrap();
    assert_eq!(result.label, QualityLabel::Excellent);
}

#[tokio::test]
async fn test_model_load_failure_degrades_gracefully() {
    let store = Arc::new(MockStore::with_readings(vec![reading(
        22.5, 10.0, 7.2, 1_000,
    )]));
    let clock = Arc::new(FixedClock::new(0));
    let service = DashboardService::with_model_file(
        store,
        "/nonexistent/water_quality_model.json",
        clock,
        fast_config(),
    );

    assert!(!service.predictions_enabled());
    assert!(matches!(
        service.latest_prediction().await,
        Err(DashboardError::PredictionsUnavailable)
    ));

    // Raw historical viewing must keep working
    let series = service.historical_series(None, false).await.unwrap();
    assert_eq!(series.len(), 1);
}

#[tokio::test]
async fn test_poll_once_updates_security_cache() {
    let store = Arc::new(MockStore::new());
    store.set_security(vec![event(true, 8_000)]);
    let cache = Arc::new(FetchCache::new());
    let clock = Arc::new(FixedClock::new(10_000));

    let poller = SecurityPoller::new(
        Arc::clone(&store),
        Arc::clone(&cache),
        RetryPolicy::new(3, Duration::from_millis(1)),
        clock,
        Duration::from_secs(300),
        Duration::from_secs(60),
    );

    poller.poll_once().await.unwrap();
    let cached = cache.get(&QueryKey::LatestSecurity, 10_000).unwrap();
    assert_eq!(cached, vec![event(true, 8_000)]);
}

#[tokio::test]
async fn test_stale_poll_never_clobbers_newer_refresh() {
    let store = Arc::new(MockStore::new());
    store.set_security(vec![event(false, 100)]);
    let cache = Arc::new(FetchCache::new());

    // A foreground refresh already cached fresher data at t=5000
    cache.put(
        QueryKey::LatestSecurity,
        vec![event(true, 900)],
        5_000,
        Duration::from_secs(60),
    );

    // The poller's fetch completes with an older clock reading
    let clock = Arc::new(FixedClock::new(1_000));
    let poller = SecurityPoller::new(
        Arc::clone(&store),
        Arc::clone(&cache),
        RetryPolicy::new(3, Duration::from_millis(1)),
        clock,
        Duration::from_secs(300),
        Duration::from_secs(60),
    );
    poller.poll_once().await.unwrap();

    let cached = cache.get(&QueryKey::LatestSecurity, 5_000).unwrap();
    assert_eq!(cached, vec![event(true, 900)]);
}

#[tokio::test(start_paused = true)]
async fn test_spawned_poller_ticks_and_shuts_down() {
    let store = Arc::new(MockStore::new());
    store.set_security(vec![event(false, 1_000)]);
    let clock = Arc::new(FixedClock::new(0));
    let service = service_with(Arc::clone(&store), clock);

    let handle = service.spawn_security_poller();

    // The first tick fires immediately; paused time auto-advances
    // through later ticks while this sleep completes.
    tokio::time::sleep(Duration::from_secs(301)).await;
    handle.shutdown().await;
    assert!(store.security_calls() >= 2);

    // The primed cache answers without another store query
    let calls_after_shutdown = store.security_calls();
    let status = service.security_status().await.unwrap().unwrap();
    assert!(status.is_safe());
    assert_eq!(store.security_calls(), calls_after_shutdown);
}
