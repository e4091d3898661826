//! Dispatch Scheduler
//!
//! Runs batches through an `AnalysisBackend` with a hard cap on in-flight
//! calls. A fixed pool of `min(limit, batches)` workers pulls from a shared
//! queue in index order, so admission follows batch order while completion
//! order is unconstrained. Each call runs in its own task; a backend that
//! panics settles as a failed outcome like any other error.
//!
//! Every batch is attempted exactly once and the scheduler returns only after
//! all batches have settled.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use chrono::Utc;
use repo_analyzer_backend::{AnalysisBackend, BackendError};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::models::batch::Batch;
use crate::models::outcome::{BatchOutcome, BatchTiming};

type BatchQueue = Arc<Mutex<VecDeque<Batch>>>;

/// Bounded-concurrency batch dispatcher.
pub struct Dispatcher {
    backend: Arc<dyn AnalysisBackend>,
    concurrency_limit: usize,
}

impl Dispatcher {
    /// Create a dispatcher. A zero limit is treated as one.
    pub fn new(backend: Arc<dyn AnalysisBackend>, concurrency_limit: usize) -> Self {
        Self {
            backend,
            concurrency_limit: concurrency_limit.max(1),
        }
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// Dispatch every batch and wait for all of them to settle.
    ///
    /// Each outcome is sent on `events` as soon as it settles. The returned
    /// outcomes are sorted by batch index.
    pub async fn run(
        &self,
        batches: Vec<Batch>,
        events: Option<mpsc::Sender<BatchOutcome>>,
    ) -> Vec<BatchOutcome> {
        let total = batches.len();
        if total == 0 {
            return Vec::new();
        }

        let run_start = Instant::now();
        let queue: BatchQueue = Arc::new(Mutex::new(batches.into_iter().collect()));
        let workers = self.concurrency_limit.min(total);
        tracing::info!(batches = total, workers, "dispatching batches");

        let mut set = JoinSet::new();
        for worker in 0..workers {
            let queue = Arc::clone(&queue);
            let backend = Arc::clone(&self.backend);
            let events = events.clone();
            set.spawn(async move {
                let mut settled = Vec::new();
                while let Some(batch) = next_batch(&queue) {
                    let outcome = run_batch(&backend, batch, total, run_start).await;
                    if let Some(tx) = &events {
                        if tx.send(outcome.clone()).await.is_err() {
                            tracing::debug!(worker, "outcome receiver dropped");
                        }
                    }
                    settled.push(outcome);
                }
                settled
            });
        }
        drop(events);

        let mut outcomes = Vec::with_capacity(total);
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(settled) => outcomes.extend(settled),
                Err(e) => tracing::error!(error = %e, "dispatch worker aborted"),
            }
        }

        outcomes.sort_by_key(BatchOutcome::batch_index);
        tracing::info!(
            settled = outcomes.len(),
            elapsed_secs = run_start.elapsed().as_secs_f64(),
            "all batches settled"
        );
        outcomes
    }
}

fn next_batch(queue: &Mutex<VecDeque<Batch>>) -> Option<Batch> {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front()
}

async fn run_batch(
    backend: &Arc<dyn AnalysisBackend>,
    batch: Batch,
    total: usize,
    run_start: Instant,
) -> BatchOutcome {
    let Batch {
        index,
        prompt,
        files,
        ..
    } = batch;

    tracing::info!(batch = index, total, files = files.len(), "batch admitted");
    let started_at = Utc::now();
    let started = Instant::now();

    let call_backend = Arc::clone(backend);
    let result = match tokio::spawn(async move { call_backend.analyze(&prompt).await }).await {
        Ok(result) => result,
        Err(e) => Err(BackendError::failed(format!("backend task aborted: {e}"))),
    };

    let timing = BatchTiming::new(started_at, started.elapsed(), run_start.elapsed());
    match &result {
        Ok(_) => tracing::info!(
            batch = index,
            duration_secs = timing.duration_secs,
            "batch succeeded"
        ),
        Err(e) => tracing::warn!(
            batch = index,
            kind = %e.kind(),
            error = %e,
            duration_secs = timing.duration_secs,
            "batch failed"
        ),
    }

    BatchOutcome::from_result(index, total, files, result, timing)
}
