//! # Sweep Integration Tests
//!
//! Verifies tag-based cleanup: only streams carrying this deployment's
//! application-name tag are ever deleted, and only when no longer declared.

mod common;

use common::{broker, throttled, Call, FakeKinesis, Op, APP};
use kinesis_broker::controller::reconciler::{BrokerError, SweepMode};
use kinesis_broker::model::{StreamSpec, StreamStatus};
use kinesis_broker::observability::BufferedBuildLog;
use kinesis_broker::provider::ProviderError;
use std::sync::Arc;

fn deletes(fake: &FakeKinesis) -> Vec<String> {
    fake.calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Delete(name) => Some(name),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_sweep_deletes_only_owned_undeclared_streams() {
    let fake = Arc::new(
        FakeKinesis::new()
            .with_owned_stream("A")
            .with_owned_stream("B")
            .with_stream("C", StreamStatus::Active, &[("appName", "billing-svc")])
            .with_stream("D", StreamStatus::Active, &[]),
    );
    let log = Arc::new(BufferedBuildLog::new());

    let report = broker(&fake, &log)
        .sweep(&[StreamSpec::new("A", 1)], SweepMode::Delete)
        .await
        .unwrap();

    assert_eq!(report.deleted, vec!["B".to_string()]);
    assert_eq!(report.retained, vec!["A".to_string()]);
    assert_eq!(report.not_owned, vec!["C".to_string(), "D".to_string()]);
    assert!(report.failed.is_empty());
    assert_eq!(report.total_seen(), 4);

    assert_eq!(deletes(&fake), vec!["B".to_string()]);
    assert_eq!(fake.stream_names(), vec!["A", "C", "D"]);
    assert_eq!(log.infos(), vec!["Deleted Stream B.".to_string()]);
}

#[tokio::test]
async fn test_empty_desired_list_deletes_every_owned_stream() {
    let fake = Arc::new(
        FakeKinesis::new()
            .with_owned_stream("orders")
            .with_owned_stream("refunds")
            .with_stream("shared", StreamStatus::Active, &[("team", "platform")]),
    );
    let log = Arc::new(BufferedBuildLog::new());

    let report = broker(&fake, &log).sweep(&[], SweepMode::Delete).await.unwrap();

    assert_eq!(report.deleted, vec!["orders".to_string(), "refunds".to_string()]);
    assert_eq!(fake.stream_names(), vec!["shared"]);
}

#[tokio::test]
async fn test_owner_value_must_match_exactly() {
    let fake = Arc::new(
        FakeKinesis::new()
            .with_stream("upper", StreamStatus::Active, &[("appName", "ORDERS-SVC")])
            .with_stream("other-key", StreamStatus::Active, &[("application", APP)]),
    );
    let log = Arc::new(BufferedBuildLog::new());

    let report = broker(&fake, &log).sweep(&[], SweepMode::Delete).await.unwrap();

    assert!(report.deleted.is_empty());
    assert_eq!(report.not_owned.len(), 2);
    assert!(deletes(&fake).is_empty());
}

#[tokio::test]
async fn test_delete_failure_does_not_stop_the_sweep() {
    let fake = Arc::new(
        FakeKinesis::new()
            .with_owned_stream("a-stream")
            .with_owned_stream("b-stream")
            .with_owned_stream("c-stream")
            .with_failure(
                Op::Delete,
                "b-stream",
                ProviderError::Service {
                    code: Some("ResourceInUseException".to_string()),
                    message: "stream is being updated".to_string(),
                },
            ),
    );
    let log = Arc::new(BufferedBuildLog::new());

    let report = broker(&fake, &log).sweep(&[], SweepMode::Delete).await.unwrap();

    assert_eq!(report.deleted, vec!["a-stream".to_string(), "c-stream".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "b-stream");
    assert_eq!(
        deletes(&fake),
        vec!["a-stream".to_string(), "b-stream".to_string(), "c-stream".to_string()]
    );
    assert_eq!(log.errors(), vec!["Error deleting Stream b-stream.".to_string()]);
    assert!(!log.infos().contains(&"Deleted Stream b-stream.".to_string()));
}

#[tokio::test]
async fn test_unreadable_tags_skip_the_stream() {
    let fake = Arc::new(
        FakeKinesis::new()
            .with_owned_stream("orders")
            .with_owned_stream("refunds")
            .with_failure(Op::ListTags, "orders", throttled()),
    );
    let log = Arc::new(BufferedBuildLog::new());

    let report = broker(&fake, &log).sweep(&[], SweepMode::Delete).await.unwrap();

    assert_eq!(report.deleted, vec!["refunds".to_string()]);
    assert_eq!(
        report.skipped,
        vec![("orders".to_string(), BrokerError::Provider(throttled()))]
    );
    assert_eq!(deletes(&fake), vec!["refunds".to_string()]);
    assert!(log.errors()[0].starts_with("Error reading tags for Stream orders:"));
}

#[tokio::test]
async fn test_list_failure_aborts_without_deleting() {
    let fake = Arc::new(
        FakeKinesis::new()
            .with_owned_stream("orders")
            .with_list_failure(ProviderError::service("connection reset")),
    );
    let log = Arc::new(BufferedBuildLog::new());

    let result = broker(&fake, &log).sweep(&[], SweepMode::Delete).await;

    assert_eq!(
        result,
        Err(BrokerError::Provider(ProviderError::service("connection reset")))
    );
    assert_eq!(fake.calls(), vec![Call::List]);
    assert_eq!(
        log.errors(),
        vec!["Failed to list Streams: Provider error: connection reset".to_string()]
    );
}

#[tokio::test]
async fn test_dry_run_reports_without_deleting() {
    let fake = Arc::new(
        FakeKinesis::new()
            .with_owned_stream("orders")
            .with_owned_stream("legacy-orders"),
    );
    let log = Arc::new(BufferedBuildLog::new());

    let report = broker(&fake, &log)
        .sweep(&[StreamSpec::new("orders", 1)], SweepMode::DryRun)
        .await
        .unwrap();

    assert_eq!(report.mode, SweepMode::DryRun);
    assert!(report.deleted.is_empty());
    assert_eq!(report.would_delete, vec!["legacy-orders".to_string()]);
    assert_eq!(report.retained, vec!["orders".to_string()]);
    assert_eq!(report.total_seen(), 2);
    assert!(fake.mutating_calls().is_empty());
    assert_eq!(fake.stream_names(), vec!["legacy-orders", "orders"]);
    assert_eq!(log.infos(), vec!["Would delete Stream legacy-orders.".to_string()]);
}
