use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, init::init, sync::sync},
};

/// Dispatch the parsed command to its handler.
///
/// # Returns
/// - `Ok(CommandResult)` with the summary to print and the exit status
/// - `Err` if the command could not run (configuration, missing locale root...)
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Sync(cmd)) => sync(cmd),
        Some(Command::Init(cmd)) => init(cmd),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
