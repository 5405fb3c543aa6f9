//! Built-in pages and plugins shipped with the toolbox.

use super::{Capability, ChildDecl, Descriptor, InvocationContext, Outcome};
use crate::error::ApiError;
use crate::tree::node::NodeKind;
use std::path::PathBuf;

/// Root page; declares the default top-level menu.
pub struct HomePage;

impl Capability for HomePage {
    fn describe(&self) -> Descriptor {
        Descriptor {
            display_name: Some("DDD Toolbox".to_string()),
            description: Some("Developer toolbox home".to_string()),
            summary: Some("Main page listing every available tool".to_string()),
            icon: Some("🏠".to_string()),
            ..Descriptor::new("home", NodeKind::Page)
        }
    }

    fn default_children(&self) -> Vec<ChildDecl> {
        vec![
            ChildDecl::plugin("path").with_description("Manage short names for common paths"),
            ChildDecl::plugin("set").with_description("Organize pages and plugins"),
            ChildDecl::page("env_config").with_description("Environment configuration"),
        ]
    }

    fn invoke(&self, ctx: &InvocationContext<'_>, _args: &[String]) -> Result<Outcome, ApiError> {
        Ok(Outcome::Navigate(ctx.path.to_vec()))
    }
}

/// Page showing the toolbox's own environment variables.
pub struct EnvConfigPage;

impl Capability for EnvConfigPage {
    fn describe(&self) -> Descriptor {
        Descriptor {
            display_name: Some("Environment".to_string()),
            description: Some("Environment variables and configuration".to_string()),
            icon: Some("⚙️".to_string()),
            ..Descriptor::new("env_config", NodeKind::Page)
        }
    }

    fn invoke(&self, _ctx: &InvocationContext<'_>, _args: &[String]) -> Result<Outcome, ApiError> {
        let mut vars: Vec<(String, String)> = std::env::vars()
            .filter(|(key, _)| key.starts_with("DDD_"))
            .collect();
        vars.sort();
        if vars.is_empty() {
            return Ok(Outcome::Message("No DDD_* variables set".to_string()));
        }
        let lines: Vec<String> = vars
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        Ok(Outcome::Message(lines.join("\n")))
    }
}

/// Plugin jumping to an aliased directory.
pub struct PathPlugin;

impl Capability for PathPlugin {
    fn describe(&self) -> Descriptor {
        Descriptor {
            summary: Some("Manage short names for common paths".to_string()),
            category: Some("system".to_string()),
            ..Descriptor::new("path", NodeKind::Plugin)
        }
    }

    fn invoke(&self, ctx: &InvocationContext<'_>, args: &[String]) -> Result<Outcome, ApiError> {
        match args.first() {
            Some(name) => {
                let target = ctx.aliases.resolve_alias(name)?;
                Ok(Outcome::ChangeDirectory(PathBuf::from(target)))
            }
            None => {
                let aliases = ctx.aliases.list_aliases();
                if aliases.is_empty() {
                    return Ok(Outcome::Message("No saved paths".to_string()));
                }
                let lines: Vec<String> = aliases
                    .iter()
                    .map(|(name, path)| format!("{} -> {}", name, path))
                    .collect();
                Ok(Outcome::Message(lines.join("\n")))
            }
        }
    }
}

/// Plugin for organizing the structure tree; mutations go through the CLI.
pub struct SetPlugin;

impl Capability for SetPlugin {
    fn describe(&self) -> Descriptor {
        Descriptor {
            summary: Some("Organize pages and plugins".to_string()),
            category: Some("system".to_string()),
            ..Descriptor::new("set", NodeKind::Plugin)
        }
    }

    fn invoke(&self, _ctx: &InvocationContext<'_>, _args: &[String]) -> Result<Outcome, ApiError> {
        Ok(Outcome::Message(
            "Use `ddd enable`, `ddd disable`, `ddd add`, `ddd remove` or `ddd reorder` to organize the tree"
                .to_string(),
        ))
    }
}
