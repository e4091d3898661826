//! Start-of-analysis marker handling.
//!
//! Backends tend to echo preamble text before the actual answer. The adapter
//! asks the backend to open its answer with `ANALYSIS_START_MARKER` and strips
//! everything up to and including the first occurrence. A missing marker is
//! not an error: the raw trimmed output is returned instead.

/// Sentinel the backend is asked to print before its analysis.
pub const ANALYSIS_START_MARKER: &str = "---ANALYSIS-START---";

/// Append the marker instruction to a prompt.
pub fn with_marker_instruction(prompt: &str) -> String {
    format!(
        "{}\n\nYour analysis output must start with the exact text: {}",
        prompt.trim_end(),
        ANALYSIS_START_MARKER
    )
}

/// Extract the analysis from raw backend output.
pub fn extract_analysis(raw: &str) -> String {
    match raw.find(ANALYSIS_START_MARKER) {
        Some(idx) => raw[idx + ANALYSIS_START_MARKER.len()..].trim().to_string(),
        None => {
            tracing::debug!("analysis marker absent; returning raw output");
            raw.trim().to_string()
        }
    }
}
