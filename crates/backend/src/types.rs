//! Backend Failure Types
//!
//! Every way a single backend call can fail. Failures are values: the
//! dispatcher turns them into failed batch outcomes and never propagates them
//! past the batch boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure category of a backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendErrorKind {
    /// The executable could not be found or launched
    NotFound,
    /// The call exceeded its time budget
    Timeout,
    /// The backend exited abnormally
    NonZeroExit,
    /// Any other I/O or launch problem
    Failed,
}

impl std::fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendErrorKind::NotFound => write!(f, "not_found"),
            BackendErrorKind::Timeout => write!(f, "timeout"),
            BackendErrorKind::NonZeroExit => write!(f, "nonzero_exit"),
            BackendErrorKind::Failed => write!(f, "failed"),
        }
    }
}

/// Error returned by an `AnalysisBackend` call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend executable missing from PATH
    #[error("Backend '{command}' not found. Please ensure it is installed and in your PATH.")]
    NotFound { command: String },

    /// Call exceeded the configured timeout
    #[error("Backend call timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Backend reported an abnormal completion
    #[error("Backend exited with {}", exit_label(.code))]
    NonZeroExit { code: Option<i32>, stderr: String },

    /// Any other failure
    #[error("Backend call failed: {message}")]
    Failed { message: String },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Result type alias for backend calls
pub type BackendResult<T> = Result<T, BackendError>;

impl BackendError {
    /// Create a generic failure
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed {
            message: msg.into(),
        }
    }

    /// Category of this failure.
    pub fn kind(&self) -> BackendErrorKind {
        match self {
            BackendError::NotFound { .. } => BackendErrorKind::NotFound,
            BackendError::Timeout { .. } => BackendErrorKind::Timeout,
            BackendError::NonZeroExit { .. } => BackendErrorKind::NonZeroExit,
            BackendError::Failed { .. } => BackendErrorKind::Failed,
        }
    }

    /// Captured diagnostic output, if the backend produced any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            BackendError::NonZeroExit { stderr, .. } if !stderr.trim().is_empty() => {
                Some(stderr.as_str())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = BackendError::NotFound {
            command: "gemini".to_string(),
        };
        assert_eq!(err.kind(), BackendErrorKind::NotFound);
        assert_eq!(
            BackendError::Timeout { seconds: 5 }.kind(),
            BackendErrorKind::Timeout
        );
        assert_eq!(BackendError::failed("boom").kind(), BackendErrorKind::Failed);
    }

    #[test]
    fn test_display_messages() {
        let err = BackendError::NotFound {
            command: "gemini".to_string(),
        };
        assert!(err.to_string().contains("'gemini' not found"));

        let err = BackendError::Timeout { seconds: 60 };
        assert_eq!(err.to_string(), "Backend call timed out after 60 seconds");

        let err = BackendError::NonZeroExit {
            code: Some(2),
            stderr: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "Backend exited with status 2");
    }

    #[test]
    fn test_detail_only_for_nonempty_stderr() {
        let err = BackendError::NonZeroExit {
            code: Some(1),
            stderr: "quota exceeded\n".to_string(),
        };
        assert_eq!(err.detail(), Some("quota exceeded\n"));

        let err = BackendError::NonZeroExit {
            code: Some(1),
            stderr: "  ".to_string(),
        };
        assert_eq!(err.detail(), None);
        assert_eq!(BackendError::Timeout { seconds: 1 }.detail(), None);
    }

    #[test]
    fn test_signal_exit_display() {
        let err = BackendError::NonZeroExit {
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
        assert_eq!(BackendErrorKind::NonZeroExit.to_string(), "nonzero_exit");
    }
}
