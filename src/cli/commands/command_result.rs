use std::path::PathBuf;

use super::super::exit_status::ExitStatus;
use crate::core::{ApplySummary, Lemmas, ReportCollector};

#[derive(Debug)]
pub enum CommandSummary {
    Sync(Box<SyncSummary>),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct SyncSummary {
    /// Project root; printed paths are relative to it.
    pub root: PathBuf,
    pub lemmas: Lemmas,
    pub files_scanned: usize,
    pub source_roots: Vec<String>,
    pub trans_methods: Vec<String>,
    pub extension: String,
    pub missing_roots: Vec<PathBuf>,
    pub unreadable: Vec<PathBuf>,
    pub collector: ReportCollector,
    /// `None` when no catalog needed rewriting or in silent mode.
    pub apply: Option<ApplySummary>,
    pub dry_run: bool,
    pub silent: bool,
    pub include_obsolete: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
}

/// Result of running a lemmasync command.
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub status: ExitStatus,
}
