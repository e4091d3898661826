//! Analyzer Integration Tests
//!
//! Complete runs: report layout, error log contents and summary counts.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use repo_analyzer::services::{RepoAnalyzer, WalkFileSource};
use repo_analyzer::{AnalyzerConfig, AnalyzerConfigBuilder, AppError, BackendError};

use crate::support::{MemorySource, ScriptedBackend};

fn config(report_dir: &Path, budget: usize) -> AnalyzerConfig {
    AnalyzerConfigBuilder::new()
        .base_prompt("Review these files")
        .report_dir(report_dir)
        .char_budget(budget)
        .concurrency_limit(2)
        .build()
        .unwrap()
}

/// Six small files; with budget 60 each lands in its own batch.
fn six_files() -> MemorySource {
    MemorySource::new([
        ("a.rs", Some("fn a() {}")),
        ("b.rs", Some("fn b() {}")),
        ("c.rs", Some("fn c() {}")),
        ("d.rs", Some("fn d() {}")),
        ("e.rs", Some("fn e() {}")),
        ("f.rs", Some("fn f() {}")),
    ])
}

fn footer_value(report: &str, label: &str) -> usize {
    report
        .lines()
        .find_map(|line| line.strip_prefix(label))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_else(|| panic!("missing footer line {label}"))
}

#[tokio::test]
async fn test_not_found_backend_records_every_batch() {
    let temp = tempfile::tempdir().unwrap();
    let backend = Arc::new(
        ScriptedBackend::new(Duration::ZERO).always_failing(BackendError::NotFound {
            command: "gemini".to_string(),
        }),
    );
    let analyzer = RepoAnalyzer::with_parts(
        config(temp.path(), 60),
        backend.clone(),
        Arc::new(six_files()),
    );

    let summary = analyzer.run().await.unwrap();
    assert_eq!(summary.total_batches, 6);
    assert_eq!(summary.failed_batches, 6);
    assert_eq!(summary.succeeded_batches, 0);
    assert_eq!(backend.calls(), 6);

    let report = fs::read_to_string(&summary.report_path).unwrap();
    assert_eq!(report.matches("ERROR (not_found): ").count(), 6);
    assert_eq!(report.matches("BATCH ").count(), 6);

    let log_path = summary.error_log_path.expect("error log written");
    let log = fs::read_to_string(log_path).unwrap();
    assert!(log.contains("Total errors: 6\n"));
    assert!(log.contains("Backend: scripted\n"));
    assert_eq!(log.matches("Kind: not_found\n").count(), 6);
    for index in 1..=6 {
        assert!(log.contains(&format!("Batch: {index}/6\n")));
    }
}

#[tokio::test]
async fn test_footer_counts_match_outcomes() {
    let temp = tempfile::tempdir().unwrap();
    let backend = Arc::new(ScriptedBackend::new(Duration::from_millis(5)).failing_on("c.rs"));
    let analyzer = RepoAnalyzer::with_parts(
        config(temp.path(), 60),
        backend,
        Arc::new(six_files()),
    );

    let summary = analyzer.run().await.unwrap();
    let report = fs::read_to_string(&summary.report_path).unwrap();

    assert_eq!(footer_value(&report, "Files processed:"), summary.files_processed);
    assert_eq!(footer_value(&report, "Total batches:"), summary.total_batches);
    assert_eq!(footer_value(&report, "Successful batches:"), summary.succeeded_batches);
    assert_eq!(footer_value(&report, "Failed batches:"), summary.failed_batches);

    assert_eq!(summary.files_processed, 6);
    assert_eq!(summary.failed_batches, 1);
    assert_eq!(report.matches("ERROR (nonzero_exit)").count(), 1);
    assert!(report.contains("Details:\nrefused c.rs"));
    assert!(report.trim_end().lines().last().unwrap().starts_with("Report completed: "));
}

#[tokio::test]
async fn test_unreadable_and_empty_files_skipped() {
    let temp = tempfile::tempdir().unwrap();
    let source = MemorySource::new([
        ("good.py", Some("print('hi')")),
        ("binary.bin", None),
        ("empty.txt", Some("")),
    ]);
    let backend = Arc::new(ScriptedBackend::new(Duration::ZERO));
    let analyzer = RepoAnalyzer::with_parts(
        config(temp.path(), 10_000),
        backend.clone(),
        Arc::new(source),
    );

    let summary = analyzer.run().await.unwrap();
    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.total_batches, 1);
    assert!(summary.all_succeeded());
    assert!(summary.error_log_path.is_none());

    let prompt = &backend.log()[0].prompt;
    assert!(prompt.contains("File: `good.py`\n```python\n"));
    assert!(!prompt.contains("binary.bin"));
}

#[tokio::test]
async fn test_report_dir_unusable_fails_before_dispatch() {
    let temp = tempfile::tempdir().unwrap();
    let blocker = temp.path().join("not-a-dir");
    fs::write(&blocker, "file in the way").unwrap();

    let backend = Arc::new(ScriptedBackend::new(Duration::ZERO));
    let analyzer = RepoAnalyzer::with_parts(
        config(&blocker, 10_000),
        backend.clone(),
        Arc::new(six_files()),
    );

    let err = analyzer.run().await.unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_walk_source_end_to_end() {
    let temp = tempfile::tempdir().unwrap();
    let repo = temp.path().join("repo");
    fs::create_dir_all(repo.join("src")).unwrap();
    fs::create_dir_all(repo.join("node_modules/dep")).unwrap();
    fs::write(repo.join("src/main.rs"), "fn main() {}").unwrap();
    fs::write(repo.join("node_modules/dep/index.js"), "module.exports = 1").unwrap();
    fs::write(repo.join("notes.md"), "notes").unwrap();

    let config = AnalyzerConfigBuilder::new()
        .base_prompt("Review")
        .root(&repo)
        .report_dir(repo.join("reports"))
        .exclude("*.md")
        .build()
        .unwrap();
    let source = WalkFileSource::from_config(&config).unwrap();
    let backend = Arc::new(ScriptedBackend::new(Duration::ZERO));
    let analyzer = RepoAnalyzer::with_parts(config, backend.clone(), Arc::new(source));

    let summary = analyzer.run().await.unwrap();
    assert_eq!(summary.files_processed, 1);
    assert!(summary.report_path.starts_with(repo.join("reports")));

    let prompt = &backend.log()[0].prompt;
    assert!(prompt.contains("File: `src/main.rs`"));
    assert!(!prompt.contains("node_modules"));

    // A second run must not pick up the first run's report.
    let config = AnalyzerConfigBuilder::new()
        .base_prompt("Review")
        .root(&repo)
        .report_dir(repo.join("reports"))
        .exclude("*.md")
        .build()
        .unwrap();
    let source = WalkFileSource::from_config(&config).unwrap();
    let analyzer = RepoAnalyzer::with_parts(config, backend.clone(), Arc::new(source));
    let summary = analyzer.run().await.unwrap();
    assert_eq!(summary.files_processed, 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_cli_backend_strips_marker() {
    let temp = tempfile::tempdir().unwrap();
    let config = AnalyzerConfigBuilder::new()
        .base_prompt("Review")
        .report_dir(temp.path())
        .backend_command("sh")
        .backend_args([
            "-c",
            "echo 'thinking...'; echo '---ANALYSIS-START---'; echo 'all good'",
            "sh",
        ])
        .timeout_secs(10)
        .build()
        .unwrap();
    let source = MemorySource::new([("a.rs", Some("fn a() {}"))]);
    let backend = Arc::new(repo_analyzer::CliBackend::from_config(&config));
    let analyzer = RepoAnalyzer::with_parts(config, backend, Arc::new(source));

    let summary = analyzer.run().await.unwrap();
    assert!(summary.all_succeeded());
    let report = fs::read_to_string(&summary.report_path).unwrap();
    let (_, section) = report
        .split_once("BATCH 1/1 - Files: 1\n")
        .expect("batch section present");
    let body = section.split_once('\n').map(|(_, rest)| rest).unwrap_or_default();
    assert!(body.starts_with("all good"));
    assert!(!body.contains("thinking..."));
    assert!(!body.contains("---ANALYSIS-START---"));
}

#[tokio::test]
async fn test_missing_backend_executable_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let config = AnalyzerConfigBuilder::new()
        .base_prompt("Review")
        .report_dir(temp.path())
        .backend_command("repo-analyzer-no-such-backend-binary")
        .build()
        .unwrap();
    let source = MemorySource::new([("a.rs", Some("fn a() {}"))]);
    let backend = Arc::new(repo_analyzer::CliBackend::from_config(&config));
    let analyzer = RepoAnalyzer::with_parts(config, backend, Arc::new(source));

    let summary = analyzer.run().await.unwrap();
    assert_eq!(summary.failed_batches, 1);
    let report = fs::read_to_string(&summary.report_path).unwrap();
    assert!(report.contains("ERROR (not_found): "));
}
