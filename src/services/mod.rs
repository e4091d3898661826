//! Services
//!
//! The analysis pipeline and the settings migration.
//! Services are called by the CLI layer.

pub mod analyzer;
pub mod batch_builder;
pub mod dispatch;
pub mod error_log;
pub mod file_source;
pub mod mcp_migration;
pub mod prompts;
pub mod report;

pub use analyzer::RepoAnalyzer;
pub use batch_builder::{build_batches, language_for_path, render_file_block};
pub use dispatch::Dispatcher;
pub use error_log::{format_error_log, ErrorCollector};
pub use file_source::{load_entries, FileSource, WalkFileSource};
pub use mcp_migration::{merge_mcp_servers, migrate_mcp_settings, MigrationResult};
pub use prompts::{load_prompt_file, PromptPreset};
pub use report::{format_footer, format_header, format_section, spawn_report_writer, ReportSink, WriterOutput};
