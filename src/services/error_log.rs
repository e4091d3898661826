//! Error Collector
//!
//! Accumulates one `ErrorRecord` per failed batch, in the order failures
//! settle, and writes them to a log file next to the report at run end.

use std::path::Path;

use chrono::{SecondsFormat, Utc};

use crate::models::outcome::ErrorRecord;
use crate::models::run::RunMetadata;
use crate::utils::error::AppResult;

const RULE_WIDTH: usize = 80;

/// Append-only collection of batch failures for one run.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    records: Vec<ErrorRecord>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: ErrorRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    /// Write the log to `path`. Does nothing when no failures were recorded.
    ///
    /// Returns whether a file was written.
    pub async fn write_to(&self, path: &Path, meta: &RunMetadata) -> AppResult<bool> {
        if self.records.is_empty() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, format_error_log(meta, &self.records)).await?;
        tracing::info!(path = %path.display(), errors = self.records.len(), "error log written");
        Ok(true)
    }
}

/// Render the error log: run configuration, then one block per failure.
pub fn format_error_log(meta: &RunMetadata, records: &[ErrorRecord]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str("Repo Analysis Error Log\n");
    out.push_str(&format!(
        "Generated: {}\n",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    out.push_str(&format!("Run ID: {}\n", meta.run_id));
    out.push_str(&format!("Backend: {}\n", meta.backend));
    out.push_str(&format!("Timeout: {} seconds\n", meta.timeout_secs));
    out.push_str(&format!("Concurrency limit: {}\n", meta.concurrency_limit));
    out.push_str(&format!("Character budget: {}\n", meta.char_budget));
    out.push_str(&format!("Total batches: {}\n", meta.total_batches));
    out.push_str(&format!("Total errors: {}\n", records.len()));

    for record in records {
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "Timestamp: {}\n",
            record
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        ));
        out.push_str(&format!(
            "Batch: {}/{}\n",
            record.batch_index, record.total_batches
        ));
        out.push_str(&format!(
            "Batch duration: {:.2}s\n",
            record.batch_duration_seconds
        ));
        out.push_str(&format!(
            "Elapsed since start: {:.2}s\n",
            record.elapsed_seconds
        ));
        out.push_str(&format!("Kind: {}\n", record.kind));
        out.push_str("Files:\n");
        for file in &record.files {
            out.push_str(&format!("  - {}\n", file));
        }
        out.push_str(&format!("Message: {}\n", record.message));
        if let Some(detail) = &record.detail {
            out.push_str("Details:\n");
            out.push_str(detail.trim_end());
            out.push('\n');
        }
    }
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out
}
