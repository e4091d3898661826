//! Run Models
//!
//! Metadata captured when a run starts and the summary returned when it ends.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use repo_analyzer_core::AnalyzerConfig;
use serde::{Deserialize, Serialize};

/// Facts about a run, written into the report header and the error log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Unique run identifier (UUID v4)
    pub run_id: String,
    /// Run start time
    pub started_at: DateTime<Utc>,
    /// Analyzed directory
    pub root: PathBuf,
    /// Backend label, e.g. `gemini -p`
    pub backend: String,
    pub timeout_secs: u64,
    pub concurrency_limit: usize,
    pub char_budget: usize,
    /// Files that made it into a batch
    pub total_files: usize,
    pub total_batches: usize,
}

impl RunMetadata {
    /// Capture metadata for a run over `config`.
    pub fn new(
        config: &AnalyzerConfig,
        started_at: DateTime<Utc>,
        total_files: usize,
        total_batches: usize,
    ) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at,
            root: config.root.clone(),
            backend: config.backend_label(),
            timeout_secs: config.timeout_secs,
            concurrency_limit: config.concurrency_limit,
            char_budget: config.char_budget,
            total_files,
            total_batches,
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    /// Finalized report file
    pub report_path: PathBuf,
    /// Error log, present only when at least one batch failed
    pub error_log_path: Option<PathBuf>,
    pub files_processed: usize,
    pub total_batches: usize,
    pub succeeded_batches: usize,
    pub failed_batches: usize,
    /// Wall-clock duration of the whole run
    pub duration: Duration,
}

impl RunSummary {
    /// True when every batch succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed_batches == 0
    }
}
