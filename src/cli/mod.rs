/// CLI argument parsing and command handling - Gateway
mod args;
mod commands;

pub use args::{Cli, Commands, ListArgs, OutputFormat, StatsArgs};
pub use commands::{handle_command, show_version};
