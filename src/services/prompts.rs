//! Base Prompts
//!
//! The base prompt comes from a user-supplied file or from a built-in preset.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

const PRACTICES_PROMPT: &str = r#"You are a senior tech lead onboarding onto an unfamiliar codebase. Identify the coding practices the files below follow and document them.

Rules:
* Give every practice a short name and a one-sentence description.
* List every file that shows the practice.
* Tag each practice with labels such as `document`, `testing`, `lint`, `code-structure` or `dependency-management`.
* Label a practice `rule` when tooling enforces it (a linter, formatter or CI check).
* Answer as a Markdown bulleted list in this shape:

# Extracted Practices
* **Practice Name**
  * label: a-label
  * file: path/to/file.ext

Files to analyze:"#;

const KNOWLEDGE_PROMPT: &str = r#"You are a senior tech lead onboarding onto an unfamiliar codebase. Document the domain knowledge the files below carry.

Rules:
* Extract the key domain concepts and the business logic that operates on them.
* Define important terminology in a short glossary.
* State the purpose of every file in one or two sentences.
* Answer as a Markdown document with the sections `Concepts`, `Business Logic`, `Terminology` and `Files`.

Files to analyze:"#;

/// Built-in base prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptPreset {
    /// Extract coding practices and conventions
    Practices,
    /// Extract domain concepts, business logic and file purposes
    Knowledge,
}

impl PromptPreset {
    pub fn prompt(&self) -> &'static str {
        match self {
            PromptPreset::Practices => PRACTICES_PROMPT,
            PromptPreset::Knowledge => KNOWLEDGE_PROMPT,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PromptPreset::Practices => "practices",
            PromptPreset::Knowledge => "knowledge",
        }
    }
}

impl FromStr for PromptPreset {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "practices" | "practice" => Ok(PromptPreset::Practices),
            "knowledge" => Ok(PromptPreset::Knowledge),
            other => Err(AppError::validation(format!(
                "unknown prompt preset '{}' (available: practices, knowledge)",
                other
            ))),
        }
    }
}

/// Read a base prompt from a file.
pub fn load_prompt_file(path: &Path) -> AppResult<String> {
    if !path.is_file() {
        return Err(AppError::not_found(format!(
            "prompt file {}",
            path.display()
        )));
    }
    let prompt = std::fs::read_to_string(path)?;
    if prompt.trim().is_empty() {
        return Err(AppError::validation(format!(
            "prompt file {} is empty",
            path.display()
        )));
    }
    tracing::debug!(path = %path.display(), chars = prompt.chars().count(), "loaded prompt file");
    Ok(prompt)
}
