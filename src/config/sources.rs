//! Configuration sources, lowest precedence first.

pub mod config_dir_file;
pub mod global_file;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

/// Environment overrides such as `DDD__COMPLETION__TTL_SECS=5`.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("DDD")
            .separator("__")
            .try_parsing(true),
    )
}
