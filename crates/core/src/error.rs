//! Core Error Types
//!
//! Errors raised while building a run configuration. The application crate
//! wraps these in `AppError::Core` and adds its own I/O, pattern and report
//! variants.

use thiserror::Error;

/// Why a run configuration could not be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A required setting is missing
    #[error("Configuration error: {0}")]
    Config(String),

    /// A setting is present but out of range
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
