//! Alias presentation: saved path listings and health checks.

use super::shared::to_pretty_json;
use crate::alias::{AliasCheck, AliasEntry};
use crate::error::ApiError;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::collections::BTreeMap;

pub fn format_alias_list_text(entries: &BTreeMap<String, AliasEntry>) -> String {
    if entries.is_empty() {
        return "No saved paths. Add one with `ddd cd add <name> [path]`.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Path", "Description"]);
    for (name, entry) in entries {
        table.add_row(vec![
            name.clone(),
            entry.path.clone(),
            entry.description.clone().unwrap_or_default(),
        ]);
    }
    table.to_string()
}

pub fn format_alias_list_json(entries: &BTreeMap<String, AliasEntry>) -> Result<String, ApiError> {
    let out: BTreeMap<&str, serde_json::Value> = entries
        .iter()
        .map(|(name, entry)| {
            (
                name.as_str(),
                serde_json::json!({
                    "path": entry.path,
                    "description": entry.description,
                    "created_at": entry.created_at(),
                }),
            )
        })
        .collect();
    to_pretty_json(&out)
}

pub fn format_alias_checks(checks: &[AliasCheck]) -> String {
    if checks.is_empty() {
        return "No saved paths.".to_string();
    }
    let missing = checks.iter().filter(|c| !c.exists).count();
    let mut lines: Vec<String> = checks
        .iter()
        .map(|check| {
            let status = if check.exists {
                "ok".green().to_string()
            } else {
                "missing".red().to_string()
            };
            format!("  {} {} -> {}", status, check.name, check.path)
        })
        .collect();
    let summary = if missing == 0 {
        format!("All {} saved paths exist.", checks.len())
    } else {
        format!("{} of {} saved paths are missing.", missing, checks.len())
    };
    lines.insert(0, summary);
    lines.join("\n")
}
