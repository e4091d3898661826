//! Report Sink
//!
//! The report is written progressively: a header when the run starts, one
//! section per settled batch in completion order, and a footer once every
//! batch has settled. A single writer task owns the sink and the error
//! collector and drains outcomes from the dispatcher serially, so sections
//! never interleave.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::outcome::{BatchOutcome, ErrorRecord};
use crate::models::run::RunMetadata;
use crate::services::error_log::ErrorCollector;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::numbered_file_name;

const HEADER_RULE_WIDTH: usize = 80;
const SECTION_RULE_WIDTH: usize = 60;
const SECTION_SEPARATOR: &str = "\n\n";
const MAX_NAME_ATTEMPTS: u32 = 1000;

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Append-only report file.
#[derive(Debug)]
pub struct ReportSink {
    dir: PathBuf,
    active: Option<(File, PathBuf)>,
}

impl ReportSink {
    /// Create a sink writing into `dir`. Nothing is touched until `initialize`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Path of the open report, if any.
    pub fn current_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|(_, path)| path.as_path())
    }

    /// Create a new report file and write the header.
    ///
    /// An existing report is never overwritten: `name` gets a `_<n>` suffix
    /// until the file can be created fresh.
    pub async fn initialize(&mut self, name: &str, header: &str) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let (mut file, path) = self.create_unique(name).await?;

        let content = format!(
            "Repo Analysis Report\nGenerated: {}\n{}\n\n{}\n\n",
            timestamp(),
            header,
            "=".repeat(HEADER_RULE_WIDTH)
        );
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        tracing::info!(path = %path.display(), "report initialized");
        self.active = Some((file, path.clone()));
        Ok(path)
    }

    async fn create_unique(&self, name: &str) -> AppResult<(File, PathBuf)> {
        for n in 0..MAX_NAME_ATTEMPTS {
            let path = self.dir.join(numbered_file_name(name, n));
            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => return Ok((file, path)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(AppError::internal(format!(
            "no free report name for {} in {}",
            name,
            self.dir.display()
        )))
    }

    /// Append one section followed by a blank line.
    pub async fn append(&mut self, section: &str) -> AppResult<()> {
        let (file, path) = self.active.as_mut().ok_or(AppError::ReportNotInitialized)?;
        file.write_all(section.as_bytes()).await?;
        file.write_all(SECTION_SEPARATOR.as_bytes()).await?;
        file.flush().await?;
        tracing::debug!(path = %path.display(), bytes = section.len(), "section appended");
        Ok(())
    }

    /// Write the footer and close the report.
    pub async fn finalize(&mut self, footer: &str) -> AppResult<PathBuf> {
        let (mut file, path) = self.active.take().ok_or(AppError::ReportNotInitialized)?;
        let content = format!(
            "\n{}\n\n{}\nReport completed: {}",
            "=".repeat(HEADER_RULE_WIDTH),
            footer,
            timestamp()
        );
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        file.sync_all().await?;
        tracing::info!(path = %path.display(), "report finalized");
        Ok(path)
    }
}

/// Run metadata block placed under the report title.
pub fn format_header(meta: &RunMetadata) -> String {
    format!(
        "Run ID: {}\nRoot: {}\nBackend: {}\nFiles: {}\nBatches: {}\nConcurrency limit: {}\nCharacter budget: {}\nTimeout: {} seconds",
        meta.run_id,
        meta.root.display(),
        meta.backend,
        meta.total_files,
        meta.total_batches,
        meta.concurrency_limit,
        meta.char_budget,
        meta.timeout_secs,
    )
}

/// Section for one settled batch.
pub fn format_section(outcome: &BatchOutcome) -> String {
    let body = match outcome {
        BatchOutcome::Success { result_text, .. } => result_text.clone(),
        BatchOutcome::Failure {
            kind,
            message,
            detail,
            ..
        } => {
            let mut block = format!("ERROR ({}): {}", kind, message);
            if let Some(detail) = detail {
                block.push_str("\n\nDetails:\n");
                block.push_str(detail.trim_end());
            }
            block
        }
    };
    format!(
        "BATCH {}/{} - Files: {}\n{}\n{}",
        outcome.batch_index(),
        outcome.total_batches(),
        outcome.files().len(),
        "=".repeat(SECTION_RULE_WIDTH),
        body
    )
}

/// Summary counts placed before the completion timestamp.
pub fn format_footer(
    files_processed: usize,
    total_batches: usize,
    succeeded: usize,
    failed: usize,
    duration_secs: f64,
) -> String {
    format!(
        "Files processed: {}\nTotal batches: {}\nSuccessful batches: {}\nFailed batches: {}\nTotal duration: {:.2}s",
        files_processed, total_batches, succeeded, failed, duration_secs
    )
}

/// State handed back by the writer task once the channel closes.
#[derive(Debug)]
pub struct WriterOutput {
    pub sink: ReportSink,
    pub errors: ErrorCollector,
    pub succeeded: usize,
    pub failed: usize,
    /// First report write failure, if any
    pub write_error: Option<AppError>,
}

/// Spawn the task that owns the report and the error collector.
///
/// Outcomes are written in arrival order. A failed append is logged and
/// remembered; the task keeps draining so the dispatcher never blocks.
pub fn spawn_report_writer(
    sink: ReportSink,
    errors: ErrorCollector,
    mut rx: mpsc::Receiver<BatchOutcome>,
) -> JoinHandle<WriterOutput> {
    tokio::spawn(async move {
        let mut out = WriterOutput {
            sink,
            errors,
            succeeded: 0,
            failed: 0,
            write_error: None,
        };

        while let Some(outcome) = rx.recv().await {
            print_status(&outcome);
            if outcome.is_success() {
                out.succeeded += 1;
            } else {
                out.failed += 1;
            }
            if let Some(record) = ErrorRecord::from_outcome(&outcome) {
                out.errors.record(record);
            }

            if let Err(e) = out.sink.append(&format_section(&outcome)).await {
                tracing::error!(batch = outcome.batch_index(), error = %e, "failed to append report section");
                if out.write_error.is_none() {
                    out.write_error = Some(e);
                }
            }
        }
        out
    })
}

fn print_status(outcome: &BatchOutcome) {
    match outcome {
        BatchOutcome::Success {
            batch_index,
            total_batches,
            files,
            timing,
            ..
        } => println!(
            "Batch {}/{} completed ({} files, {:.1}s)",
            batch_index,
            total_batches,
            files.len(),
            timing.duration_secs
        ),
        BatchOutcome::Failure {
            batch_index,
            total_batches,
            message,
            ..
        } => eprintln!("Batch {}/{} failed: {}", batch_index, total_batches, message),
    }
}
