//! CLI route: single route table and run context. Dispatches to the structure
//! manager, alias registry and completion cache, then to presentation.

use crate::alias::{absolutize, AliasRegistry};
use crate::capability::CapabilityRegistry;
use crate::cli::help::{command_name, is_mutating};
use crate::cli::parse::{CdCommands, Commands};
use crate::cli::presentation::{
    format_alias_checks, format_alias_list_json, format_alias_list_text, format_children_json,
    format_children_text, format_config_json, format_config_text, format_config_toml,
    format_node_json, format_node_text, format_statistics_json, format_statistics_text,
    format_tree_json,
};
use crate::completion::CompletionCache;
use crate::config::{ConfigDir, ConfigLoader, DddConfig};
use crate::error::ApiError;
use crate::store::{JsonStructureStorage, StructureStorage};
use crate::structure::StructureManager;
use crate::tree::node::{NewNode, NodeKind};
use crate::tree::path::parse_path;
use crate::types::NodeId;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};

/// Runtime context for CLI execution: config directory, settings and storage.
pub struct RunContext {
    config_dir: ConfigDir,
    config: DddConfig,
    cwd: PathBuf,
    storage: Arc<JsonStructureStorage>,
}

impl RunContext {
    /// Resolve the config directory relative to `cwd`; nothing is written
    pub fn with_cwd(config_dir: Option<PathBuf>, cwd: PathBuf) -> Result<Self, ApiError> {
        let config_dir = ConfigDir::resolve(config_dir.as_deref(), &cwd)?;
        let config = ConfigLoader::load(&config_dir.path)?;
        Ok(Self::with_config(config_dir, config, cwd))
    }

    /// Build from an already resolved directory and loaded settings
    pub fn with_config(config_dir: ConfigDir, config: DddConfig, cwd: PathBuf) -> Self {
        let storage = Arc::new(JsonStructureStorage::new(
            config.storage.structure_path(&config_dir),
        ));
        debug!(
            config_dir = %config_dir.path.display(),
            source = %config_dir.source,
            "Resolved config directory"
        );
        Self {
            config_dir,
            config,
            cwd,
            storage,
        }
    }

    pub fn config_dir(&self) -> &ConfigDir {
        &self.config_dir
    }

    pub fn config(&self) -> &DddConfig {
        &self.config
    }

    fn paths_file(&self) -> PathBuf {
        self.config.storage.paths_path(&self.config_dir)
    }

    fn open_aliases(&self) -> Result<AliasRegistry, ApiError> {
        Ok(AliasRegistry::open(self.paths_file())?)
    }

    fn completion_cache(&self) -> Arc<CompletionCache> {
        let storage: Arc<dyn StructureStorage> = self.storage.clone();
        Arc::new(CompletionCache::new(storage, self.config.completion.ttl()))
    }

    /// Open the structure manager, creating the config directory and seeding on first use
    pub fn open_manager(&self) -> Result<StructureManager, ApiError> {
        self.config_dir.ensure()?;
        let storage: Arc<dyn StructureStorage> = self.storage.clone();
        let manager = StructureManager::open(
            storage,
            Arc::new(CapabilityRegistry::with_builtins()),
            self.open_aliases()?,
        )?;
        Ok(manager.with_cache(self.completion_cache()))
    }

    /// Completion candidates; never fails and never writes
    pub fn complete(&self, partial: &str) -> Vec<String> {
        self.completion_cache().complete(partial)
    }

    /// Short-name candidates; never fails and never writes
    pub fn complete_aliases(&self, partial: &str) -> Vec<String> {
        match AliasRegistry::open(self.paths_file()) {
            Ok(aliases) => aliases.complete(partial),
            Err(e) => {
                if e.is_corrupt() {
                    warn!(error = %e, "Alias document unreadable, no completions");
                } else {
                    debug!(error = %e, "Alias completion failed");
                }
                Vec::new()
            }
        }
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let name = command_name(command);
        let _span = info_span!("command", name = %name).entered();
        let result = self.execute_inner(command);
        if is_mutating(command) && result.is_ok() {
            info!(command = %name, "Command applied");
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Complete { partial, aliases } => {
                let candidates = if *aliases {
                    self.complete_aliases(partial)
                } else {
                    self.complete(partial)
                };
                Ok(candidates.join("\n"))
            }
            Commands::Tree { format } => {
                let mut manager = self.open_manager()?;
                if format == "json" {
                    let store = manager.refresh()?;
                    format_tree_json(store)
                } else {
                    manager.render_tree()
                }
            }
            Commands::Ls { path, all, format } => {
                let mut manager = self.open_manager()?;
                let id = resolve_arg(&mut manager, path.as_deref().unwrap_or(""))?;
                let children = if *all {
                    manager.get_child_nodes(&id)?
                } else {
                    manager.get_enabled_children(&id)?
                };
                if format == "json" {
                    format_children_json(&children)
                } else {
                    Ok(format_children_text(&children))
                }
            }
            Commands::Show { path, format } => {
                let mut manager = self.open_manager()?;
                let segments = parse_path(path);
                let node = manager.find_node_by_path(&segments)?;
                if format == "json" {
                    format_node_json(&node, &segments)
                } else {
                    Ok(format_node_text(&node, &segments))
                }
            }
            Commands::Enable { path } => self.handle_set_enabled(path, true),
            Commands::Disable { path } => self.handle_set_enabled(path, false),
            Commands::Add {
                parent,
                name,
                kind,
                description,
                disabled,
            } => {
                let kind: NodeKind = kind.parse().map_err(ApiError::InvalidOperation)?;
                let mut node = NewNode::new(name.trim(), kind);
                node.description = description.clone();
                node.enabled = !disabled;

                let mut manager = self.open_manager()?;
                let parent_id = resolve_arg(&mut manager, parent)?;
                let id = manager.add_node(&parent_id, node)?;
                Ok(format!("Added {} '{}' (id {})", kind, name.trim(), id))
            }
            Commands::Remove { path, yes } => self.handle_remove(path, *yes),
            Commands::Reorder { parent, names } => {
                let mut manager = self.open_manager()?;
                let parent_id = resolve_arg(&mut manager, parent)?;
                manager.reorder_children(&parent_id, names)?;
                Ok(manager.completions_for_node(&parent_id)?.join("\n"))
            }
            Commands::Rescan { path } => {
                let mut manager = self.open_manager()?;
                let id = resolve_arg(&mut manager, path.as_deref().unwrap_or(""))?;
                let removed = manager.rescan_node(&id)?;
                let restored = manager.completions_for_node(&id)?;
                Ok(format!(
                    "Rescanned: removed {} node(s), children now: {}",
                    removed.len(),
                    restored.join(", ")
                ))
            }
            Commands::Reset { yes } => self.handle_reset(*yes),
            Commands::Stats { format } => {
                let stats = self.open_manager()?.statistics()?;
                if format == "json" {
                    format_statistics_json(&stats)
                } else {
                    Ok(format_statistics_text(&stats))
                }
            }
            Commands::Config { format } => {
                let structure = self.storage.path().to_path_buf();
                let paths = self.paths_file();
                if format == "json" {
                    format_config_json(&self.config_dir, &self.config, &structure, &paths)
                } else if format == "toml" {
                    format_config_toml(&self.config)
                } else {
                    Ok(format_config_text(
                        &self.config_dir,
                        &self.config,
                        &structure,
                        &paths,
                    ))
                }
            }
            Commands::Cd { command } => match command {
                None => self.handle_cd_list("text"),
                Some(command) => self.handle_cd_command(command),
            },
        }
    }

    fn handle_set_enabled(&self, path: &str, enabled: bool) -> Result<String, ApiError> {
        let mut manager = self.open_manager()?;
        let id = resolve_arg(&mut manager, path)?;
        if id.is_root() {
            return Err(ApiError::InvalidOperation(
                "the root node cannot be enabled or disabled".to_string(),
            ));
        }
        let changed = if enabled {
            manager.enable(&id)?
        } else {
            manager.disable(&id)?
        };
        let state = if enabled { "enabled" } else { "disabled" };
        Ok(if changed {
            format!("'{}' {}", path, state)
        } else {
            format!("'{}' already {}", path, state)
        })
    }

    fn handle_remove(&self, path: &str, yes: bool) -> Result<String, ApiError> {
        let mut manager = self.open_manager()?;
        let id = resolve_arg(&mut manager, path)?;
        if !yes {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!("Remove '{}' and everything below it?", path))
                .interact()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;
            if !confirmed {
                return Ok("Removal cancelled".to_string());
            }
        }
        let removed = manager.remove_node(&id)?;
        Ok(format!("Removed '{}' ({} node(s))", path, removed.len()))
    }

    fn handle_reset(&self, yes: bool) -> Result<String, ApiError> {
        if !yes {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt("Discard the structure document and rebuild it from defaults?")
                .interact()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;
            if !confirmed {
                return Ok("Reset cancelled".to_string());
            }
        }
        self.config_dir.ensure()?;
        // Seed directly: the current document may be corrupt and unloadable.
        let registry = CapabilityRegistry::with_builtins();
        let fresh = crate::tree::seed::seed_structure(&registry)?;
        self.storage.save(&fresh)?;
        self.completion_cache().clear();
        Ok(format!("Structure document rebuilt ({} nodes)", fresh.len()))
    }

    fn handle_cd_command(&self, command: &CdCommands) -> Result<String, ApiError> {
        match command {
            CdCommands::Add {
                name,
                path,
                description,
            } => {
                let target = match path {
                    Some(p) => absolutize(p, &self.cwd),
                    None => self.cwd.clone(),
                };
                self.config_dir.ensure()?;
                let mut aliases = self.open_aliases()?;
                let target_str = target.to_string_lossy().to_string();
                aliases.set_alias_with_description(name, &target_str, description.clone())?;
                Ok(format!("Saved '{}' -> {}", name.trim(), target_str))
            }
            CdCommands::Remove { name } => {
                let mut aliases = self.open_aliases()?;
                let removed = aliases.remove_alias(name)?;
                Ok(format!("Removed '{}' ({})", name.trim(), removed.path))
            }
            CdCommands::List { format } => self.handle_cd_list(format),
            CdCommands::Test => {
                let aliases = self.open_aliases()?;
                Ok(format_alias_checks(&aliases.check_aliases()))
            }
            CdCommands::Jump(args) => {
                let name = args.first().map(String::as_str).unwrap_or_default();
                let aliases = self.open_aliases()?;
                let target = aliases.resolve_alias(name)?;
                if !Path::new(target).is_dir() {
                    return Err(ApiError::InvalidOperation(format!(
                        "saved path for '{}' no longer exists: {}",
                        name, target
                    )));
                }
                Ok(target.to_string())
            }
        }
    }

    fn handle_cd_list(&self, format: &str) -> Result<String, ApiError> {
        let aliases = self.open_aliases()?;
        if format == "json" {
            format_alias_list_json(aliases.entries())
        } else {
            Ok(format_alias_list_text(aliases.entries()))
        }
    }
}

/// Resolve a CLI path argument; "" and "/" name the root.
fn resolve_arg(manager: &mut StructureManager, path: &str) -> Result<NodeId, ApiError> {
    manager.resolve_path(&parse_path(path))
}
