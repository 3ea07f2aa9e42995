use std::{env, fs};

use anyhow::{Context, Result};

use super::super::{args::InitArgs, exit_status::ExitStatus};
use super::{CommandResult, CommandSummary, InitSummary};
use crate::config::{CONFIG_FILE_NAME, default_config_json};
use crate::error::SyncError;

pub fn init(args: InitArgs) -> Result<CommandResult> {
    let dir = match args.root {
        Some(root) => root,
        None => env::current_dir().context("Failed to read the current directory")?,
    };
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        return Err(SyncError::Configuration(format!("{} already exists", config_path.display())).into());
    }

    let content = default_config_json()?;
    fs::write(&config_path, format!("{content}\n"))
        .map_err(|e| SyncError::io("cannot write", &config_path, e))?;

    Ok(CommandResult {
        summary: CommandSummary::Init(InitSummary { path: config_path }),
        status: ExitStatus::Success,
    })
}
