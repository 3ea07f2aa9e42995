//! Error types for the reconciliation engine and its collaborators.
//!
//! Library code returns [`SyncError`]; the CLI wraps it in `anyhow` and maps
//! it back to an exit status at the top level.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// Fatal setup problem, reported before any catalog is touched.
    #[error("{0}")]
    Configuration(String),

    #[error("invalid split rule `{rule}`: {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to render {}: {message}", path.display())]
    Render { path: PathBuf, message: String },
}

impl SyncError {
    pub fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, message: impl ToString) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// True for errors that must abort the whole run.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::InvalidRule { .. })
    }
}

/// Failure of the optional translation backend. Never fatal.
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("translator request failed: {0}")]
    Request(String),

    #[error("translator returned no text for `{0}`")]
    Empty(String),
}
