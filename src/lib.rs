//! Repo Analyzer
//!
//! Splits a repository into prompt-sized batches, analyzes each batch with an
//! external AI command-line tool under a concurrency cap, and writes the
//! results into a single progressively-built report plus an error log.
//!
//! - `cli` - Command-line definitions and flag-to-config resolution
//! - `models` - Batches, outcomes, run metadata and settings-file data
//! - `services` - File source, batch builder, dispatcher, report sink, error collector
//! - `storage` - Settings file loading
//! - `utils` - Error types and path helpers

pub mod cli;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use models::{Batch, BatchOutcome, BatchTiming, ErrorRecord, FileEntry, RunMetadata, RunSummary};
pub use services::{Dispatcher, RepoAnalyzer};
pub use utils::error::{AppError, AppResult};

pub use repo_analyzer_backend::{AnalysisBackend, BackendError, BackendErrorKind, CliBackend};
pub use repo_analyzer_core::{AnalyzerConfig, AnalyzerConfigBuilder};
