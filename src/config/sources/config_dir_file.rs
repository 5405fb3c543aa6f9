//! Config-dir file source: <config_dir>/config.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;

pub const CONFIG_FILE: &str = "config.toml";

/// Add `<config_dir>/config.toml` to the builder; it overrides the global file.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    config_dir: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = config_dir.join(CONFIG_FILE);
    if path.exists() {
        return Ok(builder.add_source(File::from(path).required(false)));
    }
    Ok(builder)
}
