//! Conversion between dotted keys and nested tree paths.
//!
//! Flat catalogs always join segments with [`DELIMITER`]; the [`SplitRule`]
//! only decides how a dotted key is cut into segments when it is placed into
//! a tree.

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::SyncError;

/// Separator used when joining segments into a flat key.
pub const DELIMITER: char = '.';

/// How a dotted key is cut into path segments.
#[derive(Debug, Clone)]
pub enum SplitRule {
    Literal(String),
    Pattern(Regex),
}

impl Default for SplitRule {
    fn default() -> Self {
        Self::Literal(DELIMITER.to_string())
    }
}

impl SplitRule {
    pub fn literal(separator: &str) -> Result<Self, SyncError> {
        if separator.is_empty() {
            return Err(SyncError::InvalidRule {
                rule: separator.to_string(),
                reason: "separator must not be empty".to_string(),
            });
        }
        Ok(Self::Literal(separator.to_string()))
    }

    /// Build a rule from a regular expression.
    ///
    /// Patterns that match the empty string would split between every
    /// character and are rejected.
    pub fn pattern(pattern: &str) -> Result<Self, SyncError> {
        let regex = Regex::new(pattern).map_err(|e| SyncError::InvalidRule {
            rule: pattern.to_string(),
            reason: e.to_string(),
        })?;
        if regex.is_match("") {
            return Err(SyncError::InvalidRule {
                rule: pattern.to_string(),
                reason: "pattern matches the empty string".to_string(),
            });
        }
        Ok(Self::Pattern(regex))
    }

    /// `None` selects the default literal `.` rule.
    pub fn from_config(pattern: Option<&str>) -> Result<Self, SyncError> {
        match pattern {
            None => Ok(Self::default()),
            Some(pattern) => Self::pattern(pattern),
        }
    }

    pub fn split<'a>(&self, key: &'a str) -> Vec<&'a str> {
        match self {
            Self::Literal(separator) => key.split(separator.as_str()).collect(),
            Self::Pattern(regex) => regex.split(key).collect(),
        }
    }

    /// Split into at most `limit` segments; the remainder stays in the last one.
    ///
    /// A limit of 2 turns `"family.a.b"` into `["family", "a.b"]`.
    pub fn splitn<'a>(&self, key: &'a str, limit: usize) -> Vec<&'a str> {
        match self {
            Self::Literal(separator) => key.splitn(limit, separator.as_str()).collect(),
            Self::Pattern(regex) => regex.splitn(key, limit).collect(),
        }
    }

    pub fn last_segment<'a>(&self, key: &'a str) -> &'a str {
        self.split(key).last().copied().unwrap_or(key)
    }
}

/// Result of placing a value into a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Inserted,
    Replaced,
    /// A leaf stood where a subtree was needed (or the reverse) and was overwritten.
    Conflict,
}

impl SetOutcome {
    /// Combine the outcome of an intermediate step with the outcome of the rest of the path.
    pub(crate) fn then(self, inner: SetOutcome) -> SetOutcome {
        match self {
            SetOutcome::Conflict => SetOutcome::Conflict,
            _ => inner,
        }
    }
}

/// Set `value` at the dotted `key`, creating intermediate objects as needed.
pub fn set(tree: &mut Map<String, Value>, key: &str, value: Value, rule: &SplitRule) -> SetOutcome {
    let segments = rule.split(key);
    set_path(tree, &segments, value)
}

pub fn set_path(tree: &mut Map<String, Value>, segments: &[&str], value: Value) -> SetOutcome {
    let Some((last, parents)) = segments.split_last() else {
        return SetOutcome::Inserted;
    };

    let mut outcome = SetOutcome::Inserted;
    let mut node = tree;
    for segment in parents {
        let next = node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !next.is_object() {
            *next = Value::Object(Map::new());
            outcome = SetOutcome::Conflict;
        }
        let Value::Object(map) = next else {
            return SetOutcome::Conflict;
        };
        node = map;
    }

    let leaf = match node.insert(last.to_string(), value) {
        None => SetOutcome::Inserted,
        Some(Value::Object(_)) => SetOutcome::Conflict,
        Some(_) => SetOutcome::Replaced,
    };
    outcome.then(leaf)
}
