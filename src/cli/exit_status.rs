use std::process::ExitCode;

use crate::error::SyncError;

/// Exit status for CLI commands.
///
/// - `Success` (0): nothing to do, every catalog is up to date
/// - `Changes` (1): catalogs were (or in dry-run/silent mode, would be) rewritten
/// - `Error` (2): internal error
/// - `Configuration` (3): invalid configuration, missing locale root, bad split rule
/// - `Io` (4): a catalog could not be read, parsed or written
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Changes,
    Error,
    Configuration,
    Io,
}

impl ExitStatus {
    /// Pick the status for an error that reached the top level.
    pub fn from_error(err: &anyhow::Error) -> Self {
        let Some(sync_error) = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<SyncError>())
        else {
            return if err.chain().any(|cause| cause.is::<std::io::Error>()) {
                ExitStatus::Io
            } else {
                ExitStatus::Error
            };
        };

        match sync_error {
            SyncError::Configuration(_) | SyncError::InvalidRule { .. } => ExitStatus::Configuration,
            SyncError::Io { .. } | SyncError::Parse { .. } => ExitStatus::Io,
            SyncError::Render { .. } => ExitStatus::Error,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Changes => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
            ExitStatus::Configuration => ExitCode::from(3),
            ExitStatus::Io => ExitCode::from(4),
        }
    }
}
