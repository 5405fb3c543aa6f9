//! Merge rules: defaults first, later sources override earlier ones.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("completion.ttl_secs", 60)?
        .set_default("storage.structure_file", "structure.json")?
        .set_default("storage.paths_file", "paths.json")?
        .set_default("logging.level", "warn")?
        .set_default("logging.output", "stderr")
}
