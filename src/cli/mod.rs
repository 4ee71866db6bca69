//! CLI module - The bootstrap collaborator
//!
//! Owns process startup and the command surface; only ever calls
//! `register`, `store`, `fetch`, `publish`, `rollback` on the engine.

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::run_command;
pub use errors::{CliError, CliResult};

/// Parses arguments and runs the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}
