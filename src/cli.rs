//! Command-Line Interface
//!
//! clap definitions for the `analyze` and `migrate-mcp` subcommands. Analyze
//! flags are layered over the settings file and the built-in defaults to
//! produce the run configuration.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use repo_analyzer_core::{AnalyzerConfig, AnalyzerConfigBuilder};
use tracing_subscriber::filter::LevelFilter;

use crate::services::prompts::{load_prompt_file, PromptPreset};
use crate::storage::config::ConfigService;
use crate::utils::error::{AppError, AppResult};

/// Top-level CLI entry point.
#[derive(Debug, Parser)]
#[command(
    name = "repo-analyzer",
    version,
    about = "Large-scale code analysis through an external AI command-line tool"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Whether `--debug` was passed to a subcommand that accepts it.
    pub fn debug(&self) -> bool {
        match &self.command {
            Commands::Analyze(args) => args.debug,
            Commands::MigrateMcp(_) => false,
        }
    }

    /// Max log level: -v count, raised to DEBUG by `--debug`.
    pub fn log_level(&self) -> LevelFilter {
        let level = match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        if self.debug() {
            level.max(LevelFilter::DEBUG)
        } else {
            level
        }
    }
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Batch the repository and analyze every batch with the AI CLI.
    Analyze(AnalyzeArgs),
    /// Copy Cursor MCP servers into the Gemini CLI settings.
    MigrateMcp(MigrateMcpArgs),
}

impl Commands {
    /// Prefix printed in front of a top-level failure.
    pub fn failure_label(&self) -> &'static str {
        match self {
            Commands::Analyze(_) => "Analysis failed",
            Commands::MigrateMcp(_) => "Migration failed",
        }
    }
}

/// Analyze a repository.
#[derive(Debug, Default, Args)]
pub struct AnalyzeArgs {
    /// Directory to analyze (default: current directory).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
    /// Patterns for files/directories to exclude from analysis.
    #[arg(long, value_name = "PATTERN", num_args = 1..)]
    pub exclude: Vec<String>,
    /// Patterns a file must match to be analyzed.
    #[arg(long, value_name = "PATTERN", num_args = 1..)]
    pub include: Vec<String>,
    /// File listing the paths to analyze, one per line, relative to the root.
    #[arg(long, value_name = "FILE")]
    pub list: Option<PathBuf>,
    /// Timeout in seconds for each AI call.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
    /// Executable name of the AI command-line tool.
    #[arg(long, value_name = "NAME")]
    pub cli: Option<String>,
    /// Argument passed to the AI tool before the prompt (repeatable, replaces the default `-p`).
    #[arg(long = "backend-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub backend_args: Vec<String>,
    /// Maximum characters of file content per batch.
    #[arg(long, value_name = "CHARS")]
    pub context_size: Option<usize>,
    /// File containing the base prompt.
    #[arg(long, value_name = "FILE")]
    pub prompt_file: Option<PathBuf>,
    /// Built-in base prompt to use instead of a prompt file (`practices` or `knowledge`).
    #[arg(long, value_name = "NAME", conflicts_with = "prompt_file")]
    pub preset: Option<String>,
    /// Maximum number of parallel AI calls.
    #[arg(long, value_name = "N")]
    pub instances: Option<usize>,
    /// Directory to save analysis reports.
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,
    /// Skip files of this size in bytes or larger.
    #[arg(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,
    /// Do not apply the built-in exclude list.
    #[arg(long)]
    pub no_default_excludes: bool,
    /// Do not honour .gitignore files.
    #[arg(long)]
    pub no_gitignore: bool,
    /// Settings file (default: ./repo-analyzer.toml when present).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Enable verbose debug output.
    #[arg(long)]
    pub debug: bool,
}

impl AnalyzeArgs {
    /// Base prompt: flag prompt file, flag preset, then the settings file.
    pub fn resolve_prompt(&self, settings: &ConfigService) -> AppResult<String> {
        if let Some(path) = &self.prompt_file {
            return load_prompt_file(path);
        }
        if let Some(name) = &self.preset {
            return Ok(name.parse::<PromptPreset>()?.prompt().to_string());
        }
        if let Some(path) = settings.prompt_file() {
            return load_prompt_file(&path);
        }
        if let Some(name) = &settings.get_config().preset {
            return Ok(name.parse::<PromptPreset>()?.prompt().to_string());
        }
        Err(AppError::config("--prompt-file or --preset is required"))
    }

    /// Layer defaults, the settings file and these flags into a run config.
    pub fn to_config(&self, settings: &ConfigService) -> AppResult<AnalyzerConfig> {
        let base_prompt = self.resolve_prompt(settings)?;
        let mut builder = settings
            .get_config()
            .apply_to(AnalyzerConfigBuilder::new())
            .base_prompt(base_prompt)
            .excludes(self.exclude.iter().cloned())
            .includes(self.include.iter().cloned());

        if let Some(root) = &self.root {
            builder = builder.root(root.clone());
        }
        if let Some(list) = &self.list {
            builder = builder.file_list(list.clone());
        }
        if let Some(secs) = self.timeout {
            builder = builder.timeout_secs(secs);
        }
        if let Some(cli) = &self.cli {
            builder = builder.backend_command(cli.clone());
        }
        if !self.backend_args.is_empty() {
            builder = builder.backend_args(self.backend_args.iter().cloned());
        }
        if let Some(size) = self.context_size {
            builder = builder.char_budget(size);
        }
        if let Some(n) = self.instances {
            builder = builder.concurrency_limit(n);
        }
        if let Some(dir) = &self.report_dir {
            builder = builder.report_dir(dir.clone());
        }
        if let Some(bytes) = self.max_file_size {
            builder = builder.max_file_size(bytes);
        }
        if self.no_default_excludes {
            builder = builder.default_excludes(false);
        }
        if self.no_gitignore {
            builder = builder.respect_gitignore(false);
        }

        Ok(builder.build()?)
    }
}

/// Migrate MCP server definitions from Cursor to the Gemini CLI.
#[derive(Debug, Default, Args)]
pub struct MigrateMcpArgs {
    /// Cursor MCP file (default: ~/.cursor/mcp.json).
    #[arg(long, value_name = "FILE")]
    pub cursor_config: Option<PathBuf>,
    /// Gemini settings file (default: ~/.gemini/settings.json).
    #[arg(long, value_name = "FILE")]
    pub gemini_settings: Option<PathBuf>,
}
