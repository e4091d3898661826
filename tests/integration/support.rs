//! Shared fixtures: an instrumented in-process backend and an in-memory file source.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use repo_analyzer::services::FileSource;
use repo_analyzer::{AnalysisBackend, AppError, AppResult, BackendError};
use repo_analyzer_backend::BackendResult;

/// Backend that sleeps, records call intervals and fails on request.
pub struct ScriptedBackend {
    delay: Duration,
    fail_when_contains: Option<String>,
    always: Option<BackendError>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
    log: Mutex<Vec<CallRecord>>,
}

#[derive(Debug, Clone)]
pub struct CallRecord {
    pub prompt: String,
    pub started: Instant,
    pub finished: Instant,
}

impl ScriptedBackend {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail_when_contains: None,
            always: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Fail every prompt containing `needle` with a non-zero exit.
    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_when_contains = Some(needle.into());
        self
    }

    /// Fail every call with `err`.
    pub fn always_failing(mut self, err: BackendError) -> Self {
        self.always = Some(err);
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Calls ordered by start time.
    pub fn log(&self) -> Vec<CallRecord> {
        let mut log = self.log.lock().unwrap().clone();
        log.sort_by_key(|c| c.started);
        log
    }
}

#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    fn name(&self) -> String {
        "scripted".to_string()
    }

    async fn analyze(&self, prompt: &str) -> BackendResult<String> {
        let started = Instant::now();
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(CallRecord {
            prompt: prompt.to_string(),
            started,
            finished: Instant::now(),
        });

        if let Some(err) = &self.always {
            return Err(err.clone());
        }
        if let Some(needle) = &self.fail_when_contains {
            if prompt.contains(needle.as_str()) {
                return Err(BackendError::NonZeroExit {
                    code: Some(1),
                    stderr: format!("refused {needle}"),
                });
            }
        }
        Ok(format!("analyzed {} chars", prompt.len()))
    }
}

/// File source backed by a map; `None` content simulates an unreadable file.
pub struct MemorySource {
    files: BTreeMap<String, Option<String>>,
}

impl MemorySource {
    pub fn new<'a>(files: impl IntoIterator<Item = (&'a str, Option<&'a str>)>) -> Self {
        Self {
            files: files
                .into_iter()
                .map(|(p, c)| (p.to_string(), c.map(str::to_string)))
                .collect(),
        }
    }
}

impl FileSource for MemorySource {
    fn list_files(&self) -> AppResult<Vec<PathBuf>> {
        Ok(self.files.keys().map(PathBuf::from).collect())
    }

    fn read_file(&self, path: &Path) -> AppResult<String> {
        let key = path.to_string_lossy().to_string();
        match self.files.get(&key) {
            Some(Some(content)) => Ok(content.clone()),
            Some(None) => Err(AppError::validation(format!("{key} is not valid UTF-8"))),
            None => Err(AppError::not_found(key)),
        }
    }
}
