//! Analysis Backend Trait
//!
//! Defines the common interface for anything that can analyze a batch prompt.

use async_trait::async_trait;

use super::types::BackendResult;

/// Trait that all analysis backends must implement.
///
/// A call is a self-contained unit of work: the backend enforces its own
/// timeout and reports every failure as a `BackendError` value. The
/// dispatcher never cancels a call once it has been admitted.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Identifier used in reports and error logs (e.g. `gemini -p`).
    fn name(&self) -> String;

    /// Analyze one prompt and return the analysis text.
    async fn analyze(&self, prompt: &str) -> BackendResult<String>;
}
