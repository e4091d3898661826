//! Repo Analyzer Backend
//!
//! Provides a unified interface for the external analysis backend that turns a
//! batch prompt into analysis text:
//! - `provider` - the `AnalysisBackend` trait
//! - `types` - the failure taxonomy (`BackendError`, `BackendErrorKind`)
//! - `output` - start-of-analysis marker instruction and output parsing
//! - `cli` - `CliBackend`, which runs an executable such as the Gemini CLI

pub mod cli;
pub mod output;
pub mod provider;
pub mod types;

// Re-export main types
pub use cli::CliBackend;
pub use output::{extract_analysis, with_marker_instruction, ANALYSIS_START_MARKER};
pub use provider::AnalysisBackend;
pub use types::{BackendError, BackendErrorKind, BackendResult};
