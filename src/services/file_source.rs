//! File Source
//!
//! Produces the ordered list of candidate files for a run and reads their
//! contents. Candidates come either from a gitignore-aware walk of the root
//! or from a list file; both paths go through the same exclude, include and
//! size rules.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;
use repo_analyzer_core::AnalyzerConfig;

use crate::models::batch::FileEntry;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::normalize_rel_path;

/// Directory names pruned anywhere in the tree.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    "build",
    "dist",
    ".vscode",
    ".idea",
    "venv",
];

/// Extensions (lowercase, no dot) that are never analyzed.
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &[
    "pyc", "pyo", "pyd", "so", "o", "dll", "exe", "jpg", "jpeg", "png", "gif", "bmp", "tiff",
    "zip", "tar", "gz", "rar", "7z", "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "pb",
];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Source of candidate files.
pub trait FileSource: Send + Sync {
    /// Ordered candidate paths, relative to the source root.
    fn list_files(&self) -> AppResult<Vec<PathBuf>>;

    /// Read one candidate as UTF-8 text.
    fn read_file(&self, path: &Path) -> AppResult<String>;
}

/// Compiled exclude/include rules.
#[derive(Debug, Clone)]
struct FileFilter {
    excludes: Vec<Pattern>,
    includes: Vec<Pattern>,
    default_excludes: bool,
    /// Extra directories (relative to root) pruned from the walk
    skip_dirs: Vec<String>,
}

impl FileFilter {
    fn compile(patterns: &[String]) -> AppResult<Vec<Pattern>> {
        patterns
            .iter()
            .map(|p| Pattern::new(p).map_err(|e| AppError::pattern(p, e.msg)))
            .collect()
    }

    fn is_excluded_dir_name(&self, name: &str) -> bool {
        self.default_excludes && DEFAULT_EXCLUDED_DIRS.contains(&name)
    }

    fn is_skipped_dir(&self, rel: &str) -> bool {
        self.skip_dirs
            .iter()
            .any(|dir| rel == dir || rel.starts_with(&format!("{dir}/")))
    }

    /// Whether a relative, normalized file path survives every rule.
    fn accepts(&self, rel: &str) -> bool {
        if self.default_excludes {
            let mut components = rel.split('/').collect::<Vec<_>>();
            let file_name = components.pop().unwrap_or_default();
            if components.iter().any(|c| self.is_excluded_dir_name(c)) {
                return false;
            }
            let ext = Path::new(file_name)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase());
            if let Some(ext) = ext {
                if DEFAULT_EXCLUDED_EXTENSIONS.contains(&ext.as_str()) {
                    return false;
                }
            }
        }
        if self.is_skipped_dir(rel) {
            return false;
        }
        if self
            .excludes
            .iter()
            .any(|p| p.matches_with(rel, MATCH_OPTIONS))
        {
            return false;
        }
        self.includes.is_empty()
            || self
                .includes
                .iter()
                .any(|p| p.matches_with(rel, MATCH_OPTIONS))
    }
}

/// File source over the local filesystem.
#[derive(Debug, Clone)]
pub struct WalkFileSource {
    root: PathBuf,
    file_list: Option<PathBuf>,
    filter: FileFilter,
    max_file_size: u64,
    respect_gitignore: bool,
}

impl WalkFileSource {
    /// Build a source from the run configuration.
    ///
    /// Fails with `AppError::Pattern` when any glob is malformed.
    pub fn from_config(config: &AnalyzerConfig) -> AppResult<Self> {
        let mut skip_dirs = Vec::new();
        if let Some(rel) = report_dir_within_root(&config.root, &config.report_dir) {
            tracing::debug!(dir = %rel, "excluding report directory from the walk");
            skip_dirs.push(rel);
        }

        Ok(Self {
            root: config.root.clone(),
            file_list: config.file_list.clone(),
            filter: FileFilter {
                excludes: FileFilter::compile(&config.exclude_patterns)?,
                includes: FileFilter::compile(&config.include_patterns)?,
                default_excludes: config.default_excludes,
                skip_dirs,
            },
            max_file_size: config.max_file_size,
            respect_gitignore: config.respect_gitignore,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn size_ok(&self, path: &Path) -> bool {
        match fs::metadata(path) {
            Ok(meta) => meta.len() > 0 && meta.len() < self.max_file_size,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "could not stat file");
                false
            }
        }
    }

    fn walk(&self) -> Vec<PathBuf> {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .follow_links(false)
            .require_git(false)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .git_global(self.respect_gitignore);

        let prune = self.filter.clone();
        let root = self.root.clone();
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            if prune.is_excluded_dir_name(&name) {
                return false;
            }
            match entry.path().strip_prefix(&root) {
                Ok(rel) => !prune.is_skipped_dir(&normalize_rel_path(rel)),
                Err(_) => true,
            }
        });

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "walk error");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let rel_norm = normalize_rel_path(rel);
            if rel_norm.is_empty() || !self.filter.accepts(&rel_norm) {
                continue;
            }
            if !self.size_ok(entry.path()) {
                continue;
            }
            files.push(PathBuf::from(rel_norm));
        }
        files.sort();
        files
    }

    fn read_list(&self, list: &Path) -> AppResult<Vec<PathBuf>> {
        let content = fs::read_to_string(list).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("file list {}", list.display()))
            } else {
                AppError::Io(e)
            }
        })?;

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let rel_norm = normalize_rel_path(Path::new(line));
            if !seen.insert(rel_norm.clone()) {
                continue;
            }
            if !self.filter.accepts(&rel_norm) {
                tracing::debug!(path = %rel_norm, "listed file excluded");
                continue;
            }
            if !self.size_ok(&self.root.join(&rel_norm)) {
                continue;
            }
            files.push(PathBuf::from(rel_norm));
        }
        Ok(files)
    }
}

impl FileSource for WalkFileSource {
    fn list_files(&self) -> AppResult<Vec<PathBuf>> {
        let files = match &self.file_list {
            Some(list) => {
                tracing::info!(list = %list.display(), "collecting files from list");
                self.read_list(list)?
            }
            None => {
                tracing::info!(root = %self.root.display(), "collecting files from directory");
                self.walk()
            }
        };
        tracing::info!(count = files.len(), "collected files");
        Ok(files)
    }

    fn read_file(&self, path: &Path) -> AppResult<String> {
        let bytes = fs::read(self.root.join(path))?;
        String::from_utf8(bytes)
            .map_err(|_| AppError::validation(format!("{} is not valid UTF-8", path.display())))
    }
}

/// Read every candidate, skipping unreadable and empty files.
pub fn load_entries(source: &dyn FileSource, paths: &[PathBuf]) -> Vec<FileEntry> {
    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let rel_path = normalize_rel_path(path);
        match source.read_file(path) {
            Ok(content) if content.is_empty() => {
                tracing::debug!(path = %rel_path, "skipping empty file");
            }
            Ok(content) => entries.push(FileEntry::new(rel_path, content)),
            Err(e) => {
                tracing::warn!(path = %rel_path, error = %e, "could not read file, skipping");
            }
        }
    }
    entries
}

/// Report directory relative to the root, when it lives inside it.
fn report_dir_within_root(root: &Path, report_dir: &Path) -> Option<String> {
    let root = root.canonicalize().ok()?;
    let report = report_dir.canonicalize().ok()?;
    let rel = report.strip_prefix(&root).ok()?;
    if rel.components().all(|c| matches!(c, Component::CurDir)) {
        return None;
    }
    Some(normalize_rel_path(rel))
}
