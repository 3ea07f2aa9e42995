//! Catalog persistence.
//!
//! The engine only talks to [`CatalogStore`]; [`FsStore`] is the filesystem
//! implementation used by the CLI.

mod catalog;
mod locales;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::error::SyncError;

pub use catalog::{CatalogFile, GENERIC_EXTENSION, JSON_EXTENSION};
pub use locales::{discover_locales, resolve_lang_root};

pub trait CatalogStore {
    fn exists(&self, file: &CatalogFile) -> bool;

    /// Load the nested tree of a catalog, `None` when the file is absent.
    fn load(&self, file: &CatalogFile) -> Result<Option<Value>, SyncError>;

    /// Write the rendered catalog, creating parent directories.
    fn save(&self, file: &CatalogFile, content: &[u8]) -> Result<(), SyncError>;

    /// Copy the current file aside. Returns the backup path, or `None` when
    /// there was nothing to back up.
    fn backup(
        &self,
        file: &CatalogFile,
        timestamp: &NaiveDateTime,
    ) -> Result<Option<PathBuf>, SyncError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsStore;

impl CatalogStore for FsStore {
    fn exists(&self, file: &CatalogFile) -> bool {
        file.path().is_file()
    }

    fn load(&self, file: &CatalogFile) -> Result<Option<Value>, SyncError> {
        if !self.exists(file) {
            return Ok(None);
        }
        let content = fs::read_to_string(file.path())
            .map_err(|e| SyncError::io("cannot read", file.path(), e))?;
        file.parse(&content).map(Some)
    }

    fn save(&self, file: &CatalogFile, content: &[u8]) -> Result<(), SyncError> {
        if let Some(parent) = file.path().parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SyncError::io("cannot create directory", parent, e))?;
        }
        fs::write(file.path(), content).map_err(|e| SyncError::io("cannot write", file.path(), e))
    }

    fn backup(
        &self,
        file: &CatalogFile,
        timestamp: &NaiveDateTime,
    ) -> Result<Option<PathBuf>, SyncError> {
        if !self.exists(file) {
            return Ok(None);
        }
        let target = backup_path(file.path(), timestamp);
        fs::copy(file.path(), &target).map_err(|e| SyncError::io("cannot back up", file.path(), e))?;
        Ok(Some(target))
    }
}

/// Timestamp inserted between the stem and the extension of backups.
pub const BACKUP_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `messages.yaml` → `messages.20240131_235959.yaml`, next to the original.
pub fn backup_path(path: &Path, timestamp: &NaiveDateTime) -> PathBuf {
    let stamp = timestamp.format(BACKUP_STAMP_FORMAT);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}.{stamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{stamp}"),
    };
    path.with_file_name(name)
}
