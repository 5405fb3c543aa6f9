//! Configuration System
//!
//! Layered configuration: built-in defaults, the global user file, the
//! config directory's `config.toml`, then `DDD__*` environment overrides.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

mod facade;
mod merge;
mod paths;
mod sources;

pub use facade::ConfigLoader;
pub use paths::{ConfigDir, ConfigDirSource, CONFIG_DIR_ENV, HOME_DIR_NAME, LOCAL_DIR_NAME};
pub use sources::config_dir_file::CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DddConfig {
    #[serde(default)]
    pub completion: CompletionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Completion cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Seconds a cached child list stays fresh
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    60
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CompletionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// File names inside the config directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_structure_file")]
    pub structure_file: String,

    #[serde(default = "default_paths_file")]
    pub paths_file: String,
}

fn default_structure_file() -> String {
    "structure.json".to_string()
}

fn default_paths_file() -> String {
    "paths.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            structure_file: default_structure_file(),
            paths_file: default_paths_file(),
        }
    }
}

impl StorageConfig {
    pub fn structure_path(&self, config_dir: &ConfigDir) -> PathBuf {
        config_dir.join(&self.structure_file)
    }

    pub fn paths_path(&self, config_dir: &ConfigDir) -> PathBuf {
        config_dir.join(&self.paths_file)
    }
}

impl DddConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.completion.ttl_secs == 0 {
            errors.push("completion.ttl_secs must be greater than zero".to_string());
        }
        if self.storage.structure_file.trim().is_empty() {
            errors.push("storage.structure_file cannot be empty".to_string());
        }
        if self.storage.paths_file.trim().is_empty() {
            errors.push("storage.paths_file cannot be empty".to_string());
        }
        if self.storage.structure_file == self.storage.paths_file {
            errors.push("storage.structure_file and storage.paths_file must differ".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }
}
