//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::{cd_command_name, command_name, is_mutating};
pub use output::map_error;
pub use parse::{CdCommands, Cli, Commands};
pub use route::RunContext;
