//! Run Configuration
//!
//! `AnalyzerConfig` is the immutable description of one analysis run. It is
//! produced once by `AnalyzerConfigBuilder::build()` and then shared by
//! reference with the file source, batch builder, dispatcher and reporters.
//!
//! Validation happens at build time, so a run never starts with a zero budget,
//! a zero concurrency limit or an empty prompt.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Default per-call backend timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Default number of backend calls allowed in flight.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 2;
/// Default character budget for the file blocks of one batch.
pub const DEFAULT_CHAR_BUDGET: usize = 10_000;
/// Default backend executable.
pub const DEFAULT_BACKEND_COMMAND: &str = "gemini";
/// Arguments placed between the backend executable and the prompt.
pub const DEFAULT_BACKEND_ARGS: &[&str] = &["-p"];
/// Default directory for reports and error logs.
pub const DEFAULT_REPORT_DIR: &str = "./reports";
/// Files at or above this size (bytes) are never collected.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Validated configuration for a single analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Directory that is walked and that block paths are relative to
    pub root: PathBuf,
    /// Glob patterns removed from the candidate set
    pub exclude_patterns: Vec<String>,
    /// Glob patterns a candidate must match (empty = everything)
    pub include_patterns: Vec<String>,
    /// Optional file listing paths to analyze instead of walking `root`
    pub file_list: Option<PathBuf>,
    /// Per-call backend timeout in seconds
    pub timeout_secs: u64,
    /// Maximum number of backend calls in flight
    pub concurrency_limit: usize,
    /// Character budget for the file blocks of one batch
    pub char_budget: usize,
    /// Backend executable
    pub backend_command: String,
    /// Arguments passed before the prompt
    pub backend_args: Vec<String>,
    /// Directory receiving the report and error log
    pub report_dir: PathBuf,
    /// Prompt text placed in front of every batch
    pub base_prompt: String,
    /// Upper size bound (exclusive, bytes) for collected files
    pub max_file_size: u64,
    /// Apply the built-in exclude list (VCS dirs, build output, binaries)
    pub default_excludes: bool,
    /// Honour `.gitignore` files while walking
    pub respect_gitignore: bool,
}

impl AnalyzerConfig {
    /// Per-call timeout. Seconds are converted to milliseconds.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_secs.saturating_mul(1000))
    }

    /// Human-readable backend identifier, e.g. `gemini -p`.
    pub fn backend_label(&self) -> String {
        if self.backend_args.is_empty() {
            self.backend_command.clone()
        } else {
            format!("{} {}", self.backend_command, self.backend_args.join(" "))
        }
    }
}

/// Builder for `AnalyzerConfig`.
///
/// `base_prompt` is the only required field; everything else falls back to
/// the defaults of the original command-line tool.
///
/// # Example
/// ```ignore
/// let config = AnalyzerConfigBuilder::new()
///     .base_prompt("Summarize these files")
///     .char_budget(20_000)
///     .concurrency_limit(4)
///     .build()?;
/// ```
#[derive(Debug, Default, Clone)]
pub struct AnalyzerConfigBuilder {
    root: Option<PathBuf>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    file_list: Option<PathBuf>,
    timeout_secs: Option<u64>,
    concurrency_limit: Option<usize>,
    char_budget: Option<usize>,
    backend_command: Option<String>,
    backend_args: Option<Vec<String>>,
    report_dir: Option<PathBuf>,
    base_prompt: Option<String>,
    max_file_size: Option<u64>,
    default_excludes: Option<bool>,
    respect_gitignore: Option<bool>,
}

impl AnalyzerConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory to analyze (default: current directory).
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Add an exclude glob.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Add several exclude globs.
    pub fn excludes(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude_patterns
            .extend(patterns.into_iter().map(|p| p.into()));
        self
    }

    /// Add an include glob.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Add several include globs.
    pub fn includes(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.include_patterns
            .extend(patterns.into_iter().map(|p| p.into()));
        self
    }

    /// Read candidate paths from a list file instead of walking the root.
    pub fn file_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_list = Some(path.into());
        self
    }

    /// Set the per-call timeout in seconds (must be > 0).
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the number of concurrent backend calls (must be > 0).
    pub fn concurrency_limit(mut self, n: usize) -> Self {
        self.concurrency_limit = Some(n);
        self
    }

    /// Set the character budget per batch (must be > 0).
    pub fn char_budget(mut self, budget: usize) -> Self {
        self.char_budget = Some(budget);
        self
    }

    /// Set the backend executable.
    pub fn backend_command(mut self, command: impl Into<String>) -> Self {
        self.backend_command = Some(command.into());
        self
    }

    /// Replace the arguments passed before the prompt.
    pub fn backend_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.backend_args = Some(args.into_iter().map(|a| a.into()).collect());
        self
    }

    /// Set the report directory.
    pub fn report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = Some(dir.into());
        self
    }

    /// Set the base prompt (required).
    pub fn base_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.base_prompt = Some(prompt.into());
        self
    }

    /// Set the exclusive upper bound on collected file sizes.
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Enable or disable the built-in exclude list.
    pub fn default_excludes(mut self, enabled: bool) -> Self {
        self.default_excludes = Some(enabled);
        self
    }

    /// Enable or disable `.gitignore` handling.
    pub fn respect_gitignore(mut self, enabled: bool) -> Self {
        self.respect_gitignore = Some(enabled);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> CoreResult<AnalyzerConfig> {
        let base_prompt = self
            .base_prompt
            .ok_or_else(|| CoreError::config("a base prompt is required"))?;
        if base_prompt.trim().is_empty() {
            return Err(CoreError::validation("base prompt cannot be empty"));
        }

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(CoreError::validation("timeout_secs must be > 0"));
        }

        let concurrency_limit = self.concurrency_limit.unwrap_or(DEFAULT_CONCURRENCY_LIMIT);
        if concurrency_limit == 0 {
            return Err(CoreError::validation("concurrency_limit must be > 0"));
        }

        let char_budget = self.char_budget.unwrap_or(DEFAULT_CHAR_BUDGET);
        if char_budget == 0 {
            return Err(CoreError::validation("char_budget must be > 0"));
        }

        let backend_command = self
            .backend_command
            .unwrap_or_else(|| DEFAULT_BACKEND_COMMAND.to_string());
        if backend_command.trim().is_empty() {
            return Err(CoreError::validation("backend command cannot be empty"));
        }

        let max_file_size = self.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE);
        if max_file_size == 0 {
            return Err(CoreError::validation("max_file_size must be > 0"));
        }

        if self
            .exclude_patterns
            .iter()
            .chain(self.include_patterns.iter())
            .any(|p| p.trim().is_empty())
        {
            return Err(CoreError::validation("file patterns cannot be empty"));
        }

        Ok(AnalyzerConfig {
            root: self.root.unwrap_or_else(|| PathBuf::from(".")),
            exclude_patterns: self.exclude_patterns,
            include_patterns: self.include_patterns,
            file_list: self.file_list,
            timeout_secs,
            concurrency_limit,
            char_budget,
            backend_command,
            backend_args: self.backend_args.unwrap_or_else(|| {
                DEFAULT_BACKEND_ARGS.iter().map(|a| a.to_string()).collect()
            }),
            report_dir: self
                .report_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_DIR)),
            base_prompt,
            max_file_size,
            default_excludes: self.default_excludes.unwrap_or(true),
            respect_gitignore: self.respect_gitignore.unwrap_or(true),
        })
    }
}
