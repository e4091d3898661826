//! TOML Configuration Loading
//!
//! Reads the optional `repo-analyzer.toml` settings file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::ConfigFile;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::DEFAULT_CONFIG_FILE;

/// Configuration service for the settings file of one run
#[derive(Debug, Default)]
pub struct ConfigService {
    config_path: Option<PathBuf>,
    config: ConfigFile,
}

impl ConfigService {
    /// Resolve the settings file.
    ///
    /// An explicit path must exist. Without one, `repo-analyzer.toml` in
    /// `cwd` is used when present, otherwise every field stays unset.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> AppResult<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(AppError::not_found(format!(
                        "config file {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let candidate = cwd.join(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    tracing::debug!(path = %candidate.display(), "no settings file");
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let config = Self::load_from_file(&path)?;
        tracing::info!(path = %path.display(), "loaded settings file");
        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Load settings from a file
    fn load_from_file(path: &Path) -> AppResult<ConfigFile> {
        let content = fs::read_to_string(path)?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the loaded settings
    pub fn get_config(&self) -> &ConfigFile {
        &self.config
    }

    /// Path of the loaded file, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// `prompt_file` resolved against the settings file's directory.
    pub fn prompt_file(&self) -> Option<PathBuf> {
        let prompt = self.config.prompt_file.as_ref()?;
        if prompt.is_absolute() {
            return Some(prompt.clone());
        }
        let base = self
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("."));
        Some(base.join(prompt))
    }
}
