//! repo-analyzer command-line entry point

use std::process;

use repo_analyzer::cli::{AnalyzeArgs, Cli, Commands, MigrateMcpArgs};
use repo_analyzer::services::{migrate_mcp_settings, RepoAnalyzer};
use repo_analyzer::storage::ConfigService;
use repo_analyzer::utils::{cursor_mcp_path, gemini_settings_path, AppResult};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level());
    let debug = cli.debug();
    let label = cli.command.failure_label();

    if let Err(err) = run(cli).await {
        eprintln!("{label}: {err}");
        if debug {
            eprintln!("{err:?}");
        }
        process::exit(1);
    }
}

fn init_tracing(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("Tracing subscriber already set; skipping re-initialization.");
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    match cli.command {
        Commands::Analyze(args) => analyze(args).await,
        Commands::MigrateMcp(args) => migrate_mcp(args),
    }
}

async fn analyze(args: AnalyzeArgs) -> AppResult<()> {
    let cwd = std::env::current_dir()?;
    let settings = ConfigService::discover(args.config.as_deref(), &cwd)?;
    let config = args.to_config(&settings)?;

    let analyzer = RepoAnalyzer::new(config)?;
    let summary = analyzer.run().await?;

    println!(
        "Analysis complete: {}/{} batches succeeded ({} files, {:.1}s).",
        summary.succeeded_batches,
        summary.total_batches,
        summary.files_processed,
        summary.duration.as_secs_f64()
    );
    println!("Report: {}", summary.report_path.display());
    if let Some(path) = &summary.error_log_path {
        println!(
            "{} batch(es) failed; error log: {}",
            summary.failed_batches,
            path.display()
        );
    }
    Ok(())
}

fn migrate_mcp(args: MigrateMcpArgs) -> AppResult<()> {
    let cursor = match args.cursor_config {
        Some(path) => path,
        None => cursor_mcp_path()?,
    };
    let gemini = match args.gemini_settings {
        Some(path) => path,
        None => gemini_settings_path()?,
    };

    let result = migrate_mcp_settings(&cursor, &gemini)?;
    println!(
        "Backed up original Gemini settings to {}",
        result.backup_path.display()
    );
    println!(
        "Successfully migrated {} MCP server(s) to {}",
        result.migrated.len(),
        result.settings_path.display()
    );
    Ok(())
}
