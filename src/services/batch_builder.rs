//! Batch Builder
//!
//! Folds file entries into prompt-sized batches. Files are taken in input
//! order and accumulated until the next block would push the accumulated
//! blocks past the character budget; the accumulator is then flushed as a
//! batch. A block that alone exceeds the budget becomes a one-file batch.
//! Files are never split, truncated or reordered.

use std::path::Path;

use crate::models::batch::{Batch, FileEntry};

/// Fence language for a path, empty when unknown.
pub fn language_for_path(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("py") => "python",
        Some("js") | Some("mjs") | Some("cjs") => "javascript",
        Some("ts") => "typescript",
        Some("rs") => "rust",
        Some("java") => "java",
        Some("go") => "go",
        Some("rb") => "ruby",
        Some("php") => "php",
        Some("cs") => "csharp",
        Some("cpp") => "cpp",
        Some("c") | Some("h") => "c",
        Some("html") => "html",
        Some("css") => "css",
        Some("scss") => "scss",
        Some("less") => "less",
        Some("json") => "json",
        Some("xml") => "xml",
        Some("yaml") | Some("yml") => "yaml",
        Some("toml") => "toml",
        Some("md") => "markdown",
        Some("sh") => "bash",
        Some("bat") => "batch",
        Some("ps1") => "powershell",
        Some("sql") => "sql",
        _ => "",
    }
}

/// Render one file as a path-tagged fenced block.
pub fn render_file_block(entry: &FileEntry) -> String {
    format!(
        "File: `{}`\n```{}\n{}\n```\n",
        entry.path,
        language_for_path(&entry.path),
        entry.content
    )
}

struct Accumulator {
    blocks: String,
    chars: usize,
    files: Vec<String>,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            blocks: String::new(),
            chars: 0,
            files: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn push(&mut self, path: String, block: &str, block_chars: usize) {
        self.blocks.push_str(block);
        self.chars += block_chars;
        self.files.push(path);
    }

    fn flush(&mut self, index: usize, base_prompt: &str) -> Batch {
        let acc = std::mem::replace(self, Self::new());
        Batch {
            index,
            prompt: format!("{}\n{}", base_prompt, acc.blocks),
            files: acc.files,
            content_chars: acc.chars,
        }
    }
}

/// Group entries into batches under `budget` characters of file blocks.
///
/// Budget is measured in Unicode scalar values. Indices start at 1.
pub fn build_batches(
    entries: impl IntoIterator<Item = FileEntry>,
    base_prompt: &str,
    budget: usize,
) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut acc = Accumulator::new();

    for entry in entries {
        let block = render_file_block(&entry);
        let block_chars = block.chars().count();

        if acc.chars + block_chars > budget && !acc.is_empty() {
            let batch = acc.flush(batches.len() + 1, base_prompt);
            tracing::debug!(
                index = batch.index,
                files = batch.file_count(),
                chars = batch.content_chars,
                "batch built"
            );
            batches.push(batch);
        }
        if block_chars > budget {
            tracing::debug!(
                path = %entry.path,
                chars = block_chars,
                budget,
                "file exceeds budget, batching alone"
            );
        }
        acc.push(entry.path, &block, block_chars);
    }

    if !acc.is_empty() {
        let batch = acc.flush(batches.len() + 1, base_prompt);
        tracing::debug!(
            index = batch.index,
            files = batch.file_count(),
            chars = batch.content_chars,
            "batch built"
        );
        batches.push(batch);
    }

    batches
}
