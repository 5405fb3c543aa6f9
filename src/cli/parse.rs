//! CLI parse: clap types for ddd. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ddd - developer toolbox structure registry
#[derive(Parser)]
#[command(name = "ddd")]
#[command(about = "Organize toolbox pages and plugins, complete paths, jump to saved directories")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config directory (overrides DDD_CONFIG_DIR and discovery)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path when output is "file"
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the whole structure tree
    Tree {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List the children of a node (root when PATH is omitted)
    Ls {
        /// Slash-separated path of child names
        path: Option<String>,
        /// Include disabled children
        #[arg(long)]
        all: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print completion candidates for a partially typed path
    Complete {
        /// Typed text, e.g. "tools/f"
        #[arg(default_value = "")]
        partial: String,
        /// Complete saved directory short names instead of structure paths
        #[arg(long)]
        aliases: bool,
    },
    /// Show one node's fields
    Show {
        path: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Enable a node so it appears in listings and completion
    Enable { path: String },
    /// Disable a node; it stays in the tree but is hidden
    Disable { path: String },
    /// Add a page or plugin under PARENT
    Add {
        /// Parent path ("/" for the root)
        parent: String,
        name: String,
        /// Node kind (page or plugin)
        #[arg(long, default_value = "plugin")]
        kind: String,
        #[arg(long)]
        description: Option<String>,
        /// Create the node disabled
        #[arg(long)]
        disabled: bool,
    },
    /// Remove a node and everything below it
    Remove {
        path: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Move the named children of PARENT to the front, in order
    Reorder {
        parent: String,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Rebuild a page's children from its declared defaults
    Rescan {
        /// Page path (root when omitted)
        path: Option<String>,
    },
    /// Discard the structure document and rebuild it from defaults
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Node counts and tree depth
    Stats {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the resolved config directory and effective settings
    Config {
        /// Output format (text, json or toml)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Saved directory short names (list when no subcommand is given)
    Cd {
        #[command(subcommand)]
        command: Option<CdCommands>,
    },
}

#[derive(Subcommand)]
pub enum CdCommands {
    /// Save a short name for a directory (current directory by default)
    Add {
        name: String,
        path: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a short name
    Remove { name: String },
    /// List saved short names
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Check that every saved directory still exists
    Test,
    /// Print the directory saved under a short name
    #[command(external_subcommand)]
    Jump(Vec<String>),
}
