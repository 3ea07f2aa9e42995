use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use lemmasync::cli::{Arguments, ExitStatus};

fn main() -> ExitCode {
    let args = Arguments::parse();

    match lemmasync::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("{} {:#}", "error:".bold().red(), err);
            ExitStatus::from_error(&err).into()
        }
    }
}
