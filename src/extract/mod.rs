//! Lemma extraction from application source files.
//!
//! Every configured translation function comes with one or more regexes whose
//! first capture group is the quoted key literal. The literal is unquoted;
//! interpolated double-quoted strings are skipped.

mod scanner;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::core::lemmas::Lemmas;
use crate::error::SyncError;
use crate::utils::short_path;

pub use scanner::{ScanResult, scan_files};

#[derive(Debug, Default)]
pub struct Extraction {
    /// Lemma → first file (relative to the project root) that uses it.
    pub lemmas: Lemmas,
    pub files_scanned: usize,
    pub unreadable: Vec<PathBuf>,
    pub missing_roots: Vec<PathBuf>,
}

pub trait Extractor {
    fn extract(
        &self,
        roots: &[String],
        call_patterns: &BTreeMap<String, Vec<String>>,
        extension: &str,
    ) -> Result<Extraction, SyncError>;
}

pub struct RegexExtractor {
    base_dir: PathBuf,
    ignores: Vec<String>,
    verbose: bool,
}

impl RegexExtractor {
    pub fn new(base_dir: &Path, ignores: &[String]) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            ignores: ignores.to_vec(),
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Extractor for RegexExtractor {
    fn extract(
        &self,
        roots: &[String],
        call_patterns: &BTreeMap<String, Vec<String>>,
        extension: &str,
    ) -> Result<Extraction, SyncError> {
        let patterns = compile_patterns(call_patterns)?;
        let scan = scan_files(&self.base_dir, roots, &self.ignores, extension, self.verbose);

        let mut extraction = Extraction {
            missing_roots: scan.missing_roots,
            ..Default::default()
        };

        for file in &scan.files {
            let bytes = match fs::read(file) {
                Ok(bytes) => bytes,
                Err(_) => {
                    extraction.unreadable.push(file.clone());
                    continue;
                }
            };
            extraction.files_scanned += 1;

            let content = String::from_utf8_lossy(&bytes);
            let source = short_path(file, &self.base_dir);
            for lemma in lemmas_in(&content, &patterns) {
                extraction
                    .lemmas
                    .entry(lemma)
                    .or_insert_with(|| source.clone());
            }
        }

        Ok(extraction)
    }
}

fn compile_patterns(call_patterns: &BTreeMap<String, Vec<String>>) -> Result<Vec<Regex>, SyncError> {
    call_patterns
        .iter()
        .flat_map(|(name, patterns)| patterns.iter().map(move |p| (name, p)))
        .map(|(name, pattern)| {
            Regex::new(pattern).map_err(|e| {
                SyncError::Configuration(format!("invalid pattern for `{name}`: {e}"))
            })
        })
        .collect()
}

/// Lemmas found in one file, in order of appearance.
fn lemmas_in(content: &str, patterns: &[Regex]) -> Vec<String> {
    let mut found = Vec::new();
    for pattern in patterns {
        for captures in pattern.captures_iter(content) {
            if let Some(lemma) = captures.get(1).and_then(|m| unquote(m.as_str())) {
                found.push(lemma);
            }
        }
    }
    found
}

/// Strip the quotes of a string literal and resolve its escapes.
///
/// Returns `None` for empty literals and for double-quoted literals that
/// interpolate variables.
pub fn unquote(literal: &str) -> Option<String> {
    let quote = literal.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let inner = literal
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))?;

    if quote == '"' && contains_interpolation(inner) {
        return None;
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match (quote, chars.next()) {
            (_, Some('\\')) => out.push('\\'),
            (q, Some(next)) if next == q => out.push(q),
            ('"', Some('n')) => out.push('\n'),
            ('"', Some('t')) => out.push('\t'),
            ('"', Some('$')) => out.push('$'),
            (_, Some(next)) => {
                out.push('\\');
                out.push(next);
            }
            (_, None) => out.push('\\'),
        }
    }

    (!out.is_empty()).then_some(out)
}

/// An unescaped `$` in a double-quoted literal.
fn contains_interpolation(inner: &str) -> bool {
    let mut escaped = false;
    for c in inner.chars() {
        match c {
            '\\' if !escaped => escaped = true,
            '$' if !escaped => return true,
            _ => escaped = false,
        }
    }
    false
}

/// Default regexes for a translation function: a single-quoted and a
/// double-quoted first argument, followed by `,` or `)`.
pub fn call_patterns_for(name: &str) -> Vec<String> {
    let name = regex::escape(name);
    [r#"'(?:[^'\\]|\\.)*'"#, r#""(?:[^"\\]|\\.)*""#]
        .iter()
        .map(|literal| format!(r"(?:^|[^\w$]){name}\s*\(\s*({literal})\s*[,)]"))
        .collect()
}
