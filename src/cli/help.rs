//! CLI command-name contract for log spans.

use crate::cli::parse::{CdCommands, Commands};

/// Command name string for logging (e.g. "ls", "cd.add").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Tree { .. } => "tree".to_string(),
        Commands::Ls { .. } => "ls".to_string(),
        Commands::Complete { .. } => "complete".to_string(),
        Commands::Show { .. } => "show".to_string(),
        Commands::Enable { .. } => "enable".to_string(),
        Commands::Disable { .. } => "disable".to_string(),
        Commands::Add { .. } => "add".to_string(),
        Commands::Remove { .. } => "remove".to_string(),
        Commands::Reorder { .. } => "reorder".to_string(),
        Commands::Rescan { .. } => "rescan".to_string(),
        Commands::Reset { .. } => "reset".to_string(),
        Commands::Stats { .. } => "stats".to_string(),
        Commands::Config { .. } => "config".to_string(),
        Commands::Cd { command } => match command {
            Some(command) => format!("cd.{}", cd_command_name(command)),
            None => "cd.list".to_string(),
        },
    }
}

pub fn cd_command_name(command: &CdCommands) -> &'static str {
    match command {
        CdCommands::Add { .. } => "add",
        CdCommands::Remove { .. } => "remove",
        CdCommands::List { .. } => "list",
        CdCommands::Test => "test",
        CdCommands::Jump(_) => "jump",
    }
}

/// Whether the command writes to the config directory
pub fn is_mutating(command: &Commands) -> bool {
    match command {
        Commands::Enable { .. }
        | Commands::Disable { .. }
        | Commands::Add { .. }
        | Commands::Remove { .. }
        | Commands::Reorder { .. }
        | Commands::Rescan { .. }
        | Commands::Reset { .. } => true,
        Commands::Cd {
            command: Some(CdCommands::Add { .. } | CdCommands::Remove { .. }),
        } => true,
        _ => false,
    }
}
