//! Batch Outcome Models
//!
//! The settled result of dispatching one batch, and the error record derived
//! from a failed one. Both are immutable once produced.

use std::time::Duration;

use chrono::{DateTime, Utc};
use repo_analyzer_backend::{BackendError, BackendErrorKind, BackendResult};
use serde::{Deserialize, Serialize};

/// Wall-clock bookkeeping for one backend call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchTiming {
    /// When the call was admitted
    pub started_at: DateTime<Utc>,
    /// When the call settled
    pub finished_at: DateTime<Utc>,
    /// Call duration in seconds
    pub duration_secs: f64,
    /// Seconds since the dispatcher started, measured at settlement
    pub elapsed_secs: f64,
}

impl BatchTiming {
    /// Build timing from the admission timestamp and two measured spans.
    pub fn new(started_at: DateTime<Utc>, duration: Duration, since_run_start: Duration) -> Self {
        let finished_at = started_at
            + chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
        Self {
            started_at,
            finished_at,
            duration_secs: duration.as_secs_f64(),
            elapsed_secs: since_run_start.as_secs_f64(),
        }
    }
}

/// Settled result of one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// Backend returned analysis text
    Success {
        batch_index: usize,
        total_batches: usize,
        files: Vec<String>,
        result_text: String,
        timing: BatchTiming,
    },
    /// Backend call failed
    Failure {
        batch_index: usize,
        total_batches: usize,
        files: Vec<String>,
        kind: BackendErrorKind,
        message: String,
        detail: Option<String>,
        timing: BatchTiming,
    },
}

impl BatchOutcome {
    /// Convert a backend result into an outcome.
    pub fn from_result(
        batch_index: usize,
        total_batches: usize,
        files: Vec<String>,
        result: BackendResult<String>,
        timing: BatchTiming,
    ) -> Self {
        match result {
            Ok(result_text) => BatchOutcome::Success {
                batch_index,
                total_batches,
                files,
                result_text,
                timing,
            },
            Err(err) => Self::failure(batch_index, total_batches, files, &err, timing),
        }
    }

    /// Build a failed outcome from a backend error.
    pub fn failure(
        batch_index: usize,
        total_batches: usize,
        files: Vec<String>,
        err: &BackendError,
        timing: BatchTiming,
    ) -> Self {
        BatchOutcome::Failure {
            batch_index,
            total_batches,
            files,
            kind: err.kind(),
            message: err.to_string(),
            detail: err.detail().map(str::to_string),
            timing,
        }
    }

    pub fn batch_index(&self) -> usize {
        match self {
            BatchOutcome::Success { batch_index, .. } | BatchOutcome::Failure { batch_index, .. } => {
                *batch_index
            }
        }
    }

    pub fn total_batches(&self) -> usize {
        match self {
            BatchOutcome::Success { total_batches, .. }
            | BatchOutcome::Failure { total_batches, .. } => *total_batches,
        }
    }

    pub fn files(&self) -> &[String] {
        match self {
            BatchOutcome::Success { files, .. } | BatchOutcome::Failure { files, .. } => files,
        }
    }

    pub fn timing(&self) -> &BatchTiming {
        match self {
            BatchOutcome::Success { timing, .. } | BatchOutcome::Failure { timing, .. } => timing,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Success { .. })
    }

    /// Failure category, `None` for successes.
    pub fn failure_kind(&self) -> Option<BackendErrorKind> {
        match self {
            BatchOutcome::Failure { kind, .. } => Some(*kind),
            BatchOutcome::Success { .. } => None,
        }
    }
}

/// Structured record of one failed batch, kept for the error log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// When the failure settled
    pub timestamp: DateTime<Utc>,
    pub batch_index: usize,
    pub total_batches: usize,
    pub files: Vec<String>,
    pub kind: BackendErrorKind,
    pub message: String,
    pub detail: Option<String>,
    /// Seconds since run start at settlement
    pub elapsed_seconds: f64,
    /// Duration of the failed call
    pub batch_duration_seconds: f64,
}

impl ErrorRecord {
    /// Derive a record from a failed outcome. Successes yield `None`.
    pub fn from_outcome(outcome: &BatchOutcome) -> Option<Self> {
        match outcome {
            BatchOutcome::Failure {
                batch_index,
                total_batches,
                files,
                kind,
                message,
                detail,
                timing,
            } => Some(Self {
                timestamp: timing.finished_at,
                batch_index: *batch_index,
                total_batches: *total_batches,
                files: files.clone(),
                kind: *kind,
                message: message.clone(),
                detail: detail.clone(),
                elapsed_seconds: timing.elapsed_secs,
                batch_duration_seconds: timing.duration_secs,
            }),
            BatchOutcome::Success { .. } => None,
        }
    }
}
