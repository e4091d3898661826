//! Path Utilities
//!
//! Resolves the artifact names of a run and the third-party config files the
//! MCP migration touches (~/.cursor/mcp.json, ~/.gemini/settings.json).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::utils::error::{AppError, AppResult};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "repo-analyzer.toml";

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Cursor MCP config (~/.cursor/mcp.json)
pub fn cursor_mcp_path() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".cursor").join("mcp.json"))
}

/// Gemini CLI settings (~/.gemini/settings.json)
pub fn gemini_settings_path() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".gemini").join("settings.json"))
}

/// Sibling backup path: `settings.json` -> `settings.json.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".bak");
    path.with_file_name(name)
}

/// Stem shared by the report and the error log of one run.
pub fn run_file_stem(at: DateTime<Utc>) -> String {
    format!("repo_analysis_{}", at.format("%Y%m%d_%H%M%S"))
}

/// Report file name for a run started at `at`.
pub fn report_file_name(at: DateTime<Utc>) -> String {
    format!("{}.txt", run_file_stem(at))
}

/// `name` with `_<n>` before the extension; `n == 0` keeps `name` as is.
pub fn numbered_file_name(name: &str, n: u32) -> String {
    if n == 0 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, n, ext),
        _ => format!("{}_{}", name, n),
    }
}

/// Error log next to a report: `<report stem>_errors.txt`.
pub fn error_log_path(report_path: &Path) -> PathBuf {
    let stem = report_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    report_path.with_file_name(format!("{}_errors.txt", stem))
}

/// Normalize a relative path for display and matching (forward slashes, no `./`).
pub fn normalize_rel_path(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    s.trim_start_matches("./").to_string()
}
