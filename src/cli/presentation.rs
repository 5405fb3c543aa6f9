//! CLI presentation: text and json formatters per command family.

mod alias;
mod shared;
mod structure;

pub use alias::{format_alias_checks, format_alias_list_json, format_alias_list_text};
pub use shared::{format_config_json, format_config_text, format_config_toml};
pub use structure::{
    format_children_json, format_children_text, format_node_json, format_node_text,
    format_statistics_json, format_statistics_text, format_tree_json,
};
