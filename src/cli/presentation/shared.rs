//! Shared presentation: json helper and the `config` report.

use crate::config::{ConfigDir, DddConfig};
use crate::error::ApiError;
use serde::Serialize;
use std::path::Path;

pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::InvalidOperation(format!("Failed to serialize output: {}", e)))
}

pub fn format_config_text(
    config_dir: &ConfigDir,
    config: &DddConfig,
    structure_path: &Path,
    paths_path: &Path,
) -> String {
    let mut lines = vec![
        format!(
            "Config directory: {} ({})",
            config_dir.path.display(),
            config_dir.source
        ),
        format!(
            "Structure document: {}{}",
            structure_path.display(),
            if structure_path.exists() { "" } else { " (not created yet)" }
        ),
        format!(
            "Alias document: {}{}",
            paths_path.display(),
            if paths_path.exists() { "" } else { " (not created yet)" }
        ),
        format!("Completion TTL: {}s", config.completion.ttl_secs),
        format!(
            "Logging: level={} format={} output={}",
            config.logging.level, config.logging.format, config.logging.output
        ),
    ];
    if let Some(global) = crate::config::ConfigLoader::global_config_path() {
        lines.push(format!("Global config: {}", global.display()));
    }
    lines.join("\n")
}

pub fn format_config_json(
    config_dir: &ConfigDir,
    config: &DddConfig,
    structure_path: &Path,
    paths_path: &Path,
) -> Result<String, ApiError> {
    let out = serde_json::json!({
        "config_dir": config_dir,
        "structure_document": structure_path,
        "alias_document": paths_path,
        "settings": config,
    });
    to_pretty_json(&out)
}

/// Effective settings in the same shape as `config.toml`
pub fn format_config_toml(config: &DddConfig) -> Result<String, ApiError> {
    toml::to_string_pretty(config)
        .map_err(|e| ApiError::InvalidOperation(format!("Failed to serialize output: {}", e)))
}
