//! Config directory resolution
//!
//! Precedence: explicit `--config-dir`, then `DDD_CONFIG_DIR`, then a
//! project-local `.ddd_config/` found by walking up from the working directory,
//! then `~/.ddd_toolbox`.

use crate::error::ApiError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR_ENV: &str = "DDD_CONFIG_DIR";
pub const LOCAL_DIR_NAME: &str = ".ddd_config";
pub const HOME_DIR_NAME: &str = ".ddd_toolbox";

/// Where the config directory came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigDirSource {
    Explicit,
    Environment,
    ProjectLocal,
    Home,
}

impl fmt::Display for ConfigDirSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigDirSource::Explicit => "--config-dir",
            ConfigDirSource::Environment => CONFIG_DIR_ENV,
            ConfigDirSource::ProjectLocal => "project-local",
            ConfigDirSource::Home => "home",
        };
        f.write_str(label)
    }
}

/// A resolved config directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigDir {
    pub path: PathBuf,
    pub source: ConfigDirSource,
}

impl ConfigDir {
    /// Resolve the config directory; nothing is created
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ApiError> {
        if let Some(path) = explicit {
            return Ok(Self::new(path, cwd, ConfigDirSource::Explicit));
        }
        if let Some(value) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(Path::new(&value), cwd, ConfigDirSource::Environment));
        }
        if let Some(found) = find_project_local(cwd) {
            return Ok(Self {
                path: found,
                source: ConfigDirSource::ProjectLocal,
            });
        }
        let home = directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .ok_or_else(|| ApiError::ConfigError("Cannot determine home directory".to_string()))?;
        Ok(Self {
            path: home.join(HOME_DIR_NAME),
            source: ConfigDirSource::Home,
        })
    }

    fn new(path: &Path, cwd: &Path, source: ConfigDirSource) -> Self {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };
        Self { path, source }
    }

    /// Create the directory if missing
    pub fn ensure(&self) -> Result<(), ApiError> {
        std::fs::create_dir_all(&self.path).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to create config directory {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    pub fn join(&self, file: &str) -> PathBuf {
        self.path.join(file)
    }
}

fn find_project_local(cwd: &Path) -> Option<PathBuf> {
    cwd.ancestors()
        .map(|dir| dir.join(LOCAL_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}
