//! Settings Models
//!
//! Partial run settings read from `repo-analyzer.toml`. Every field is
//! optional; present fields are layered onto an `AnalyzerConfigBuilder`
//! before command-line overrides are applied.

use std::path::PathBuf;

use repo_analyzer_core::AnalyzerConfigBuilder;
use serde::{Deserialize, Serialize};

/// Settings file contents (partial update)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub root: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub include: Vec<String>,
    pub file_list: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    #[serde(alias = "instances")]
    pub concurrency_limit: Option<usize>,
    #[serde(alias = "context_size")]
    pub char_budget: Option<usize>,
    #[serde(alias = "cli")]
    pub backend_command: Option<String>,
    pub backend_args: Option<Vec<String>>,
    pub report_dir: Option<PathBuf>,
    /// Prompt file, resolved relative to the settings file's directory
    pub prompt_file: Option<PathBuf>,
    /// Built-in prompt preset name
    pub preset: Option<String>,
    pub max_file_size: Option<u64>,
    pub default_excludes: Option<bool>,
    pub respect_gitignore: Option<bool>,
}

impl ConfigFile {
    /// Apply the present fields to a builder
    pub fn apply_to(&self, mut builder: AnalyzerConfigBuilder) -> AnalyzerConfigBuilder {
        if let Some(root) = &self.root {
            builder = builder.root(root.clone());
        }
        builder = builder
            .excludes(self.exclude.iter().cloned())
            .includes(self.include.iter().cloned());
        if let Some(list) = &self.file_list {
            builder = builder.file_list(list.clone());
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout_secs(secs);
        }
        if let Some(n) = self.concurrency_limit {
            builder = builder.concurrency_limit(n);
        }
        if let Some(budget) = self.char_budget {
            builder = builder.char_budget(budget);
        }
        if let Some(command) = &self.backend_command {
            builder = builder.backend_command(command.clone());
        }
        if let Some(args) = &self.backend_args {
            builder = builder.backend_args(args.iter().cloned());
        }
        if let Some(dir) = &self.report_dir {
            builder = builder.report_dir(dir.clone());
        }
        if let Some(bytes) = self.max_file_size {
            builder = builder.max_file_size(bytes);
        }
        if let Some(enabled) = self.default_excludes {
            builder = builder.default_excludes(enabled);
        }
        if let Some(enabled) = self.respect_gitignore {
            builder = builder.respect_gitignore(enabled);
        }
        builder
    }
}
