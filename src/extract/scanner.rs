use std::path::{Path, PathBuf};

use colored::Colorize;
use glob::Pattern;
use walkdir::WalkDir;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning source roots.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Matching files in walk order (sorted by name within each directory).
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
    /// Configured roots that do not exist.
    pub missing_roots: Vec<PathBuf>,
}

pub fn scan_files(
    base_dir: &Path,
    roots: &[String],
    ignore_patterns: &[String],
    extension: &str,
    verbose: bool,
) -> ScanResult {
    let mut result = ScanResult::default();

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();
    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    let is_ignored = |path: &Path| {
        literal_ignore_paths
            .iter()
            .any(|ignore_path| path.starts_with(ignore_path))
            || glob_patterns
                .iter()
                .any(|p| p.matches(&path.to_string_lossy()))
    };

    for root in roots {
        let dir = base_dir.join(root);
        if !dir.exists() {
            result.missing_roots.push(dir);
            continue;
        }

        let walker = WalkDir::new(&dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_ignored(entry.path()));
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    result.skipped_count += 1;
                    if verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };

            let path = entry.path();
            if entry.file_type().is_file() && has_extension(path, extension) {
                result.files.push(path.to_path_buf());
            }
        }
    }

    result
}

/// `views/home.blade.php` has extension `php` (and `blade.php`).
fn has_extension(path: &Path, extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        return true;
    }
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(&format!(".{extension}")))
        .unwrap_or(false)
}
