//! Layered configuration loading.

use super::merge::builder_with_defaults;
use super::sources;
use super::DddConfig;
use crate::error::ApiError;
use config::File;
use std::path::{Path, PathBuf};

/// Loads [`DddConfig`] from defaults, the global file, the config dir and the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate the configuration for `config_dir`
    pub fn load(config_dir: &Path) -> Result<DddConfig, ApiError> {
        let builder = builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::config_dir_file::add_to_builder(builder, config_dir)?;
        let builder = sources::add_environment(builder);

        let config: DddConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load a single TOML file over the defaults
    pub fn load_from_file(path: &Path) -> Result<DddConfig, ApiError> {
        let config: DddConfig = builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the global config file, if a home directory is known
    pub fn global_config_path() -> Option<PathBuf> {
        sources::global_file::global_config_path()
    }

    /// Defaults only
    pub fn default() -> DddConfig {
        DddConfig::default()
    }
}
