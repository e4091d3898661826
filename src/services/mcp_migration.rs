//! MCP Settings Migration
//!
//! Copies the MCP server definitions of Cursor (`~/.cursor/mcp.json`) into
//! the Gemini CLI settings (`~/.gemini/settings.json`). The Gemini file is
//! backed up first; its other keys are preserved and Cursor entries replace
//! Gemini entries of the same name. Cursor expresses `timeout` in seconds,
//! Gemini in milliseconds.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::backup_path;

const MCP_SERVERS_KEY: &str = "mcpServers";

/// Outcome of a migration.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationResult {
    pub settings_path: PathBuf,
    pub backup_path: PathBuf,
    /// Server names copied from Cursor, sorted
    pub migrated: Vec<String>,
}

fn read_json_object(path: &Path, label: &str) -> AppResult<Map<String, Value>> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found(format!("{} at {}", label, path.display()))
        } else {
            AppError::Io(e)
        }
    })?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::validation(format!(
            "{} at {} is not a JSON object",
            label,
            path.display()
        ))),
    }
}

fn timeout_to_millis(server: &mut Value) {
    let Some(timeout) = server.get_mut("timeout") else {
        return;
    };
    let converted = if let Some(n) = timeout.as_u64() {
        Value::from(n.saturating_mul(1000))
    } else if let Some(n) = timeout.as_i64() {
        Value::from(n.saturating_mul(1000))
    } else if let Some(n) = timeout.as_f64() {
        Value::from(n * 1000.0)
    } else {
        return;
    };
    *timeout = converted;
}

/// Merge Cursor's `mcpServers` into the Gemini settings object.
///
/// Returns the merged settings and the names of the migrated servers.
pub fn merge_mcp_servers(
    cursor: &Map<String, Value>,
    gemini: Map<String, Value>,
) -> (Map<String, Value>, Vec<String>) {
    let mut merged = gemini;
    let slot = merged
        .entry(MCP_SERVERS_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }

    let mut migrated = Vec::new();
    if let (Some(servers), Some(Value::Object(cursor_servers))) =
        (slot.as_object_mut(), cursor.get(MCP_SERVERS_KEY))
    {
        for (name, server) in cursor_servers {
            let mut server = server.clone();
            timeout_to_millis(&mut server);
            servers.insert(name.clone(), server);
            migrated.push(name.clone());
        }
    }
    migrated.sort();

    (merged, migrated)
}

/// Run the migration between two settings files.
pub fn migrate_mcp_settings(cursor_path: &Path, gemini_path: &Path) -> AppResult<MigrationResult> {
    let cursor = read_json_object(cursor_path, "Cursor MCP file")?;
    let gemini = read_json_object(gemini_path, "Gemini settings file")?;

    let backup = backup_path(gemini_path);
    fs::copy(gemini_path, &backup)?;
    tracing::info!(backup = %backup.display(), "backed up Gemini settings");

    let (merged, migrated) = merge_mcp_servers(&cursor, gemini);
    let content = serde_json::to_string_pretty(&Value::Object(merged))?;
    fs::write(gemini_path, content)?;
    tracing::info!(
        path = %gemini_path.display(),
        servers = migrated.len(),
        "migrated MCP settings"
    );

    Ok(MigrationResult {
        settings_path: gemini_path.to_path_buf(),
        backup_path: backup,
        migrated,
    })
}
