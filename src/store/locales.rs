use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::SyncError;

use super::{BACKUP_STAMP_FORMAT, JSON_EXTENSION};

/// Directory under the locale root that holds third-party catalogs.
const VENDOR_DIR: &str = "vendor";

/// First existing directory of `candidates`, relative to `project_root`.
pub fn resolve_lang_root(project_root: &Path, candidates: &[String]) -> Result<PathBuf, SyncError> {
    candidates
        .iter()
        .map(|candidate| project_root.join(candidate))
        .find(|path| path.is_dir())
        .ok_or_else(|| {
            SyncError::Configuration(format!(
                "no lang folder found in {} (looked for {})",
                project_root.display(),
                candidates.join(", ")
            ))
        })
}

/// Locales present under `lang_root`: one per sub-directory and per
/// top-level JSON catalog, plus the configured JSON-only locales.
pub fn discover_locales(lang_root: &Path, json_locales: &[String]) -> Result<Vec<String>, SyncError> {
    let entries =
        fs::read_dir(lang_root).map_err(|e| SyncError::io("cannot list", lang_root, e))?;

    let mut locales: BTreeSet<String> = json_locales.iter().cloned().collect();
    for entry in entries {
        let entry = entry.map_err(|e| SyncError::io("cannot list", lang_root, e))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        if path.is_dir() {
            if name != VENDOR_DIR && !is_backup_name(&name) {
                locales.insert(name);
            }
        } else if path.extension().is_some_and(|ext| ext == JSON_EXTENSION)
            && let Some(stem) = path.file_stem()
        {
            let stem = stem.to_string_lossy();
            if !is_backup_name(&stem) {
                locales.insert(stem.into_owned());
            }
        }
    }

    Ok(locales.into_iter().collect())
}

/// `fr.20240131_235959` is the stem of a backup of `fr.json`.
fn is_backup_name(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, stamp)| {
        NaiveDateTime::parse_from_str(stamp, BACKUP_STAMP_FORMAT).is_ok()
    })
}
