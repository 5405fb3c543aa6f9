//! ddd CLI Binary
//!
//! Command-line interface for the toolbox structure registry.

use clap::Parser;
use ddd::cli::{Cli, Commands, RunContext};
use ddd::config::{ConfigDir, ConfigLoader, DddConfig};
use ddd::error::ApiError;
use ddd::logging::{init_logging, LoggingConfig};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Loaded once: logging and the run context share the same settings.
    let loaded = load_settings(&cli);

    let logging_config = build_logging_config(&cli, loaded.as_ref().ok().map(|(_, c, _)| c));
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("ddd starting");

    // Completion runs inside the shell's completion hook: never fail, never print errors.
    // Corruption is still reported through the log on stderr.
    let completing = matches!(cli.command, Commands::Complete { .. });

    let context = match loaded {
        Ok((config_dir, config, cwd)) => RunContext::with_config(config_dir, config, cwd),
        Err(e) => {
            if completing {
                process::exit(0);
            }
            error!("Error initializing: {}", e);
            eprintln!("{}", ddd::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            if completing {
                process::exit(0);
            }
            error!("Command failed: {}", e);
            eprintln!("{}", ddd::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Resolve the config directory and load settings from the process working directory
fn load_settings(cli: &Cli) -> Result<(ConfigDir, DddConfig, PathBuf), ApiError> {
    let cwd = std::env::current_dir().map_err(|e| {
        ApiError::ConfigError(format!("Cannot determine current directory: {}", e))
    })?;
    let config_dir = ConfigDir::resolve(cli.config_dir.as_deref(), &cwd)?;
    let config = ConfigLoader::load(&config_dir.path)?;
    Ok((config_dir, config, cwd))
}

/// Build logging configuration from CLI args and loaded settings.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, settings: Option<&DddConfig>) -> LoggingConfig {
    let mut config = settings.map(|c| c.logging.clone()).unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }

    config
}
