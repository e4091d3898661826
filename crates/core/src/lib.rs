//! Repo Analyzer Core
//!
//! Foundational error types and the immutable run configuration shared by the
//! repo-analyzer workspace. This crate has no dependencies on the backend
//! adapter, the filesystem walker or the CLI.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `config` - Run configuration (`AnalyzerConfig`) and its validating builder

pub mod config;
pub mod error;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Run Configuration ──────────────────────────────────────────────────
pub use config::{
    AnalyzerConfig, AnalyzerConfigBuilder, DEFAULT_BACKEND_ARGS, DEFAULT_BACKEND_COMMAND,
    DEFAULT_CHAR_BUDGET, DEFAULT_CONCURRENCY_LIMIT, DEFAULT_MAX_FILE_SIZE, DEFAULT_REPORT_DIR,
    DEFAULT_TIMEOUT_SECS,
};
