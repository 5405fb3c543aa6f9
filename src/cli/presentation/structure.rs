//! Structure presentation: child tables, node details, statistics.

use super::shared::to_pretty_json;
use crate::error::ApiError;
use crate::store::{NodeStore, StoreStatistics};
use crate::tree::node::Node;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

pub fn format_tree_json(store: &NodeStore) -> Result<String, ApiError> {
    to_pretty_json(store)
}

pub fn format_children_text(children: &[Node]) -> String {
    if children.is_empty() {
        return "No children.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Kind", "Enabled", "Description"]);
    for node in children {
        let enabled = if node.enabled {
            "yes".green().to_string()
        } else {
            "no".red().to_string()
        };
        table.add_row(vec![
            node.name.clone(),
            node.kind.to_string(),
            enabled,
            node.description.clone().unwrap_or_default(),
        ]);
    }
    table.to_string()
}

pub fn format_children_json(children: &[Node]) -> Result<String, ApiError> {
    to_pretty_json(children)
}

pub fn format_node_text(node: &Node, path: &[String]) -> String {
    let mut lines = vec![
        format!("{}", node.label().bold()),
        format!("  Path: /{}", path.join("/")),
        format!("  Id: {}", node.id),
        format!("  Kind: {}", node.kind),
        format!("  Enabled: {}", node.enabled),
    ];
    let optional = [
        ("Description", &node.description),
        ("Summary", &node.summary),
        ("Category", &node.category),
        ("Icon", &node.icon),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            lines.push(format!("  {}: {}", label, value));
        }
    }
    lines.push(format!("  Children: {}", node.children.len()));
    lines.join("\n")
}

pub fn format_node_json(node: &Node, path: &[String]) -> Result<String, ApiError> {
    let out = serde_json::json!({
        "path": path,
        "node": node,
    });
    to_pretty_json(&out)
}

pub fn format_statistics_text(stats: &StoreStatistics) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Metric", "Count"]);
    let rows = [
        ("Nodes", stats.nodes),
        ("Pages", stats.pages),
        ("Plugins", stats.plugins),
        ("Enabled", stats.enabled),
        ("Disabled", stats.disabled),
        ("Unreachable", stats.unreachable),
        ("Max depth", stats.max_depth),
    ];
    for (metric, count) in rows {
        table.add_row(vec![metric.to_string(), count.to_string()]);
    }
    table.to_string()
}

pub fn format_statistics_json(stats: &StoreStatistics) -> Result<String, ApiError> {
    to_pretty_json(stats)
}
