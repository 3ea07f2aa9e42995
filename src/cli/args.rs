//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `sync` (alias `missing`): synchronize catalogs with the lemmas used in code
//! - `init`: write a default `.lemmasyncrc.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Sync(args)) => args.common.verbose,
            Some(Command::Init(_)) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SyncArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Locale root relative to the project root (overrides config file)
    #[arg(long, value_name = "DIR")]
    pub lang_root: Option<String>,

    /// Run the whole process but do not write anything
    #[arg(short = 'r', long)]
    pub dry_run: bool,

    /// Rewrite catalogs even if there is nothing to do
    #[arg(short, long)]
    pub force: bool,

    /// Translate new lemmas into the target locale
    #[arg(short, long)]
    pub translation: bool,

    /// Value of new lemmas (%LEMMA is replaced by the lemma or its translation,
    /// `null` writes null values)
    #[arg(short = 'l', long, value_name = "TEMPLATE")]
    pub new_value: Option<String>,

    /// Do not back up catalogs before rewriting them
    #[arg(short = 'b', long)]
    pub no_backup: bool,

    /// Do not write where new lemmas are defined
    #[arg(short = 'c', long)]
    pub no_comment: bool,

    /// Do not write the generation date in catalogs
    #[arg(short = 'd', long)]
    pub no_date: bool,

    /// Drop obsolete lemmas instead of keeping them under the obsolete key
    #[arg(short = 'o', long)]
    pub no_obsolete: bool,

    /// Keep dotted keys flat instead of nesting them
    #[arg(short = 'w', long)]
    pub output_flat: bool,

    /// Print nothing and write nothing; exit with 1 when new lemmas exist
    #[arg(short = 'q', long)]
    pub silent: bool,

    /// Extension of scanned source files (overrides config file)
    #[arg(short = 'x', long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Keep obsolete lemmas as regular translations
    #[arg(short = 'z', long)]
    pub disable_obsolete_check: bool,

    /// Subscription key of the translation service
    #[arg(long, env = "LEMMASYNC_TRANSLATOR_KEY", hide_env_values = true)]
    pub translator_key: Option<String>,

    /// Region of the translation service (overrides config file)
    #[arg(long, env = "LEMMASYNC_TRANSLATOR_REGION")]
    pub translator_region: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    /// Directory to write the configuration file into
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add missing lemmas to every catalog and flag obsolete ones
    #[command(visible_alias = "missing")]
    Sync(SyncArgs),
    /// Initialize a new .lemmasyncrc.json configuration file
    Init(InitArgs),
}
