//! Common utility functions shared across the codebase.

use std::path::Path;

/// Plural suffix for English nouns.
///
/// # Examples
///
/// ```
/// use lemmasync::utils::plural;
///
/// assert_eq!(format!("1 string{}", plural(1)), "1 string");
/// assert_eq!(format!("3 string{}", plural(3)), "3 strings");
/// assert_eq!(format!("0 string{}", plural(0)), "0 strings");
/// ```
pub fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Display `path` relative to `base` when possible, with forward slashes.
pub fn short_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
