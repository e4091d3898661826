//! Dispatch Integration Tests
//!
//! Concurrency cap, settle-all semantics, admission order and failure isolation.

use std::sync::Arc;
use std::time::Duration;

use repo_analyzer::{Batch, BackendError, BackendErrorKind, BatchOutcome, Dispatcher};
use tokio::sync::mpsc;

use crate::support::ScriptedBackend;

fn batches(count: usize) -> Vec<Batch> {
    (1..=count)
        .map(|i| Batch {
            index: i,
            prompt: format!("prompt for batch-{i:03}"),
            files: vec![format!("file{i}.rs")],
            content_chars: 10,
        })
        .collect()
}

#[tokio::test]
async fn test_exactly_m_outcomes_and_cap_respected() {
    for limit in 1..=4 {
        for count in [0, 1, 5, 9] {
            let backend = Arc::new(ScriptedBackend::new(Duration::from_millis(15)));
            let dispatcher = Dispatcher::new(backend.clone(), limit);

            let outcomes = dispatcher.run(batches(count), None).await;

            assert_eq!(outcomes.len(), count, "limit {limit}, batches {count}");
            assert_eq!(backend.calls(), count);
            assert!(
                backend.max_in_flight() <= limit,
                "limit {limit} exceeded: {}",
                backend.max_in_flight()
            );
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cap_reached_under_load() {
    let backend = Arc::new(ScriptedBackend::new(Duration::from_millis(40)));
    let dispatcher = Dispatcher::new(backend.clone(), 3);
    let outcomes = dispatcher.run(batches(12), None).await;

    assert_eq!(outcomes.len(), 12);
    assert!(backend.max_in_flight() <= 3);
    assert!(backend.max_in_flight() >= 2);
}

#[tokio::test]
async fn test_single_slot_calls_never_overlap() {
    let backend = Arc::new(ScriptedBackend::new(Duration::from_millis(10)));
    let dispatcher = Dispatcher::new(backend.clone(), 1);
    dispatcher.run(batches(5), None).await;

    let log = backend.log();
    assert_eq!(log.len(), 5);
    for pair in log.windows(2) {
        assert!(pair[0].finished <= pair[1].started);
    }
}

#[tokio::test]
async fn test_admission_follows_index_order() {
    let backend = Arc::new(ScriptedBackend::new(Duration::from_millis(5)));
    let dispatcher = Dispatcher::new(backend.clone(), 1);
    dispatcher.run(batches(6), None).await;

    let prompts: Vec<String> = backend.log().into_iter().map(|c| c.prompt).collect();
    let expected: Vec<String> = (1..=6).map(|i| format!("prompt for batch-{i:03}")).collect();
    assert_eq!(prompts, expected);
}

#[tokio::test]
async fn test_one_failure_does_not_affect_siblings() {
    let backend = Arc::new(ScriptedBackend::new(Duration::from_millis(5)).failing_on("batch-003"));
    let dispatcher = Dispatcher::new(backend.clone(), 2);
    let outcomes = dispatcher.run(batches(6), None).await;

    assert_eq!(outcomes.len(), 6);
    for outcome in &outcomes {
        if outcome.batch_index() == 3 {
            assert_eq!(outcome.failure_kind(), Some(BackendErrorKind::NonZeroExit));
        } else {
            assert!(outcome.is_success(), "batch {} failed", outcome.batch_index());
        }
    }
}

#[tokio::test]
async fn test_not_found_backend_fails_every_batch() {
    let backend = Arc::new(
        ScriptedBackend::new(Duration::ZERO).always_failing(BackendError::NotFound {
            command: "gemini".to_string(),
        }),
    );
    let dispatcher = Dispatcher::new(backend, 2);
    let outcomes = dispatcher.run(batches(4), None).await;

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes
        .iter()
        .all(|o| o.failure_kind() == Some(BackendErrorKind::NotFound)));
}

#[tokio::test]
async fn test_every_outcome_published_once() {
    let backend = Arc::new(ScriptedBackend::new(Duration::from_millis(3)));
    let dispatcher = Dispatcher::new(backend, 3);
    let (tx, mut rx) = mpsc::channel::<BatchOutcome>(2);

    let drain = tokio::spawn(async move {
        let mut indices = Vec::new();
        while let Some(outcome) = rx.recv().await {
            indices.push(outcome.batch_index());
        }
        indices
    });

    let outcomes = dispatcher.run(batches(10), Some(tx)).await;
    let mut published = drain.await.unwrap();
    published.sort_unstable();

    assert_eq!(published, (1..=10).collect::<Vec<_>>());
    assert_eq!(outcomes.len(), 10);
}

#[tokio::test]
async fn test_timing_recorded_per_batch() {
    let backend = Arc::new(ScriptedBackend::new(Duration::from_millis(20)));
    let dispatcher = Dispatcher::new(backend, 2);
    let outcomes = dispatcher.run(batches(2), None).await;

    for outcome in outcomes {
        let timing = outcome.timing();
        assert!(timing.duration_secs >= 0.02);
        assert!(timing.elapsed_secs >= timing.duration_secs);
        assert!(timing.finished_at >= timing.started_at);
    }
}
