//! Analysis Run
//!
//! Wires the pipeline together for one run:
//! list files -> load -> build batches -> initialize report -> dispatch
//! (outcomes stream to the report writer) -> finalize report -> error log.
//!
//! Only run-level problems surface as errors. Backend failures are recorded
//! per batch and reflected in the summary counts.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use repo_analyzer_backend::{AnalysisBackend, CliBackend};
use repo_analyzer_core::AnalyzerConfig;
use tokio::sync::mpsc;

use crate::models::batch::FileEntry;
use crate::models::run::{RunMetadata, RunSummary};
use crate::services::batch_builder::build_batches;
use crate::services::dispatch::Dispatcher;
use crate::services::error_log::ErrorCollector;
use crate::services::file_source::{load_entries, FileSource, WalkFileSource};
use crate::services::report::{
    format_footer, format_header, spawn_report_writer, ReportSink, WriterOutput,
};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{error_log_path, report_file_name};

/// Runs one analysis over a repository.
pub struct RepoAnalyzer {
    config: AnalyzerConfig,
    backend: Arc<dyn AnalysisBackend>,
    source: Arc<dyn FileSource>,
}

impl RepoAnalyzer {
    /// Analyzer with the filesystem source and the configured CLI backend.
    pub fn new(config: AnalyzerConfig) -> AppResult<Self> {
        let source = WalkFileSource::from_config(&config)?;
        let backend = CliBackend::from_config(&config);
        Ok(Self::with_parts(config, Arc::new(backend), Arc::new(source)))
    }

    /// Analyzer with explicit collaborators.
    pub fn with_parts(
        config: AnalyzerConfig,
        backend: Arc<dyn AnalysisBackend>,
        source: Arc<dyn FileSource>,
    ) -> Self {
        Self {
            config,
            backend,
            source,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    async fn collect_entries(&self) -> AppResult<Vec<FileEntry>> {
        let source = Arc::clone(&self.source);
        tokio::task::spawn_blocking(move || -> AppResult<Vec<FileEntry>> {
            let paths = source.list_files()?;
            Ok(load_entries(source.as_ref(), &paths))
        })
        .await
        .map_err(|e| AppError::internal(format!("file collection aborted: {e}")))?
    }

    /// Execute the run.
    pub async fn run(&self) -> AppResult<RunSummary> {
        let started_at = Utc::now();
        let clock = Instant::now();

        let entries = self.collect_entries().await?;
        let files_processed = entries.len();
        if files_processed == 0 {
            tracing::warn!(root = %self.config.root.display(), "no files to analyze");
        }

        let batches = build_batches(entries, &self.config.base_prompt, self.config.char_budget);
        let total_batches = batches.len();

        let mut meta = RunMetadata::new(&self.config, started_at, files_processed, total_batches);
        meta.backend = self.backend.name();
        tracing::info!(
            run_id = %meta.run_id,
            files = files_processed,
            batches = total_batches,
            backend = %meta.backend,
            "starting analysis run"
        );
        println!(
            "Analyzing {} files in {} batches (up to {} at a time)",
            files_processed, total_batches, self.config.concurrency_limit
        );

        let mut sink = ReportSink::new(&self.config.report_dir);
        let report_path = sink
            .initialize(&report_file_name(started_at), &format_header(&meta))
            .await?;

        let (tx, rx) = mpsc::channel(self.config.concurrency_limit.max(1) * 2);
        let writer = spawn_report_writer(sink, ErrorCollector::new(), rx);

        let dispatcher = Dispatcher::new(Arc::clone(&self.backend), self.config.concurrency_limit);
        let outcomes = dispatcher.run(batches, Some(tx)).await;

        let written = writer
            .await
            .map_err(|e| AppError::internal(format!("report writer aborted: {e}")))?;

        let succeeded_batches = outcomes.iter().filter(|o| o.is_success()).count();
        let failed_batches = outcomes.len() - succeeded_batches;
        let duration = clock.elapsed();

        let footer = format_footer(
            files_processed,
            total_batches,
            succeeded_batches,
            failed_batches,
            duration.as_secs_f64(),
        );
        let (log_path, report_error) =
            settle_artifacts(written, &footer, &error_log_path(&report_path), &meta).await;
        if let Some(e) = report_error {
            return Err(e);
        }

        tracing::info!(
            run_id = %meta.run_id,
            succeeded = succeeded_batches,
            failed = failed_batches,
            duration_secs = duration.as_secs_f64(),
            "analysis run finished"
        );

        Ok(RunSummary {
            run_id: meta.run_id,
            report_path,
            error_log_path: log_path,
            files_processed,
            total_batches,
            succeeded_batches,
            failed_batches,
            duration,
        })
    }
}

/// Write the footer and the error log.
///
/// The error log is flushed even when the report cannot be closed. Returns the
/// error log path, if one was written, and the first report failure: a
/// mid-run append error wins over a footer error.
async fn settle_artifacts(
    mut written: WriterOutput,
    footer: &str,
    error_log: &Path,
    meta: &RunMetadata,
) -> (Option<PathBuf>, Option<AppError>) {
    let finalize_error = written.sink.finalize(footer).await.err();

    let error_log_path = match written.errors.write_to(error_log, meta).await {
        Ok(true) => Some(error_log.to_path_buf()),
        Ok(false) => None,
        Err(e) => {
            tracing::warn!(path = %error_log.display(), error = %e, "failed to write error log");
            None
        }
    };

    (error_log_path, written.write_error.or(finalize_error))
}
