//! Batch Models
//!
//! Files loaded from the source and the prompt-sized batches built from them.

use serde::{Deserialize, Serialize};

/// A readable, non-empty file ready to be folded into a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to the analysis root, forward slashes
    pub path: String,
    /// Full UTF-8 content
    pub content: String,
}

impl FileEntry {
    /// Create a new file entry
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// One prompt sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// 1-based sequence index, assigned at construction
    pub index: usize,
    /// Base prompt followed by the file blocks
    pub prompt: String,
    /// Files contained in this batch, in input order
    pub files: Vec<String>,
    /// Character count of the file blocks (excludes the base prompt)
    pub content_chars: usize,
}

impl Batch {
    /// Number of files in the batch.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}
