//! Command-Line Backend
//!
//! Runs an external executable (the Gemini CLI by default) once per batch,
//! passing the prompt as the final argument and reading the analysis from
//! stdout.

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use repo_analyzer_core::AnalyzerConfig;
use tokio::process::Command;
use tokio::time::timeout;

use crate::output::{extract_analysis, with_marker_instruction};
use crate::provider::AnalysisBackend;
use crate::types::{BackendError, BackendResult};

/// Exit status shells use for "command not found".
const SHELL_NOT_FOUND_STATUS: i32 = 127;

/// Maximum captured stderr kept for diagnostics (bytes).
const DEFAULT_MAX_STDERR: usize = 64 * 1024;

/// Backend that shells out to an analysis executable.
#[derive(Debug, Clone)]
pub struct CliBackend {
    /// Executable name or path
    command: String,
    /// Arguments placed before the prompt
    args: Vec<String>,
    /// Per-call time budget
    timeout: Duration,
    /// Cap on captured stderr
    max_stderr: usize,
}

impl CliBackend {
    /// Create a backend for `command` with the given per-call timeout.
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            timeout,
            max_stderr: DEFAULT_MAX_STDERR,
        }
    }

    /// Create a backend from the run configuration.
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.backend_command.clone(), config.timeout())
            .with_args(config.backend_args.clone())
    }

    /// Set arguments passed before the prompt.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Set the cap on captured stderr.
    pub fn with_max_stderr(mut self, bytes: usize) -> Self {
        self.max_stderr = bytes;
        self
    }

    fn truncate_output(&self, bytes: &[u8]) -> String {
        let s = String::from_utf8_lossy(bytes);
        if s.len() > self.max_stderr {
            let mut cut = self.max_stderr;
            while !s.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}\n... (output truncated)", &s[..cut])
        } else {
            s.into_owned()
        }
    }
}

#[async_trait]
impl AnalysisBackend for CliBackend {
    fn name(&self) -> String {
        if self.args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.args.join(" "))
        }
    }

    async fn analyze(&self, prompt: &str) -> BackendResult<String> {
        let prompt = with_marker_instruction(prompt);
        let start = Instant::now();

        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .arg(&prompt)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            command = %self.command,
            prompt_chars = prompt.chars().count(),
            "spawning backend"
        );

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BackendError::NotFound {
                    command: self.command.clone(),
                }
            } else {
                BackendError::failed(format!("Failed to launch '{}': {}", self.command, e))
            }
        })?;

        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(BackendError::failed(format!(
                    "Failed to collect output from '{}': {}",
                    self.command, e
                )))
            }
            Err(_) => {
                return Err(BackendError::Timeout {
                    seconds: self.timeout.as_secs(),
                })
            }
        };

        tracing::debug!(
            command = %self.command,
            status = ?output.status.code(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "backend exited"
        );

        if !output.status.success() {
            let code = output.status.code();
            let stderr = self.truncate_output(&output.stderr);
            if code == Some(SHELL_NOT_FOUND_STATUS) {
                return Err(BackendError::NotFound {
                    command: self.command.clone(),
                });
            }
            return Err(BackendError::NonZeroExit { code, stderr });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(extract_analysis(&stdout))
    }
}
