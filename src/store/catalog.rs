//! One catalog file: where it lives and how its bytes map to a tree.

use std::path::{Path, PathBuf};

use serde_json::{Map, Number, Value};

use crate::core::builder::Dialect;
use crate::core::document::Document;
use crate::core::lemmas::Family;
use crate::core::render::{render_generic, render_json};
use crate::error::SyncError;

pub const GENERIC_EXTENSION: &str = "yaml";
pub const JSON_EXTENSION: &str = "json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    pub locale: String,
    pub family: Family,
    path: PathBuf,
}

impl CatalogFile {
    /// `<root>/<locale>/<family>.yaml` for generic families,
    /// `<root>/<locale>.json` for the JSON catalog.
    pub fn new(lang_root: &Path, locale: &str, family: &Family) -> Self {
        let path = match family {
            Family::Generic(name) => lang_root
                .join(locale)
                .join(format!("{name}.{GENERIC_EXTENSION}")),
            Family::Json => lang_root.join(format!("{locale}.{JSON_EXTENSION}")),
        };
        Self {
            locale: locale.to_string(),
            family: family.clone(),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dialect(&self) -> Dialect {
        match self.family {
            Family::Generic(_) => Dialect::Generic,
            Family::Json => Dialect::Json,
        }
    }

    /// Parse file content into a nested tree.
    ///
    /// Empty files and a `null` root read as an empty catalog; any other
    /// non-mapping root is rejected.
    pub fn parse(&self, content: &str) -> Result<Value, SyncError> {
        if content.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        let value = match self.family {
            Family::Generic(_) => {
                let yaml: serde_yaml::Value = serde_yaml::from_str(content)
                    .map_err(|e| SyncError::parse(&self.path, e))?;
                yaml_to_json(yaml)
            }
            Family::Json => {
                serde_json::from_str(content).map_err(|e| SyncError::parse(&self.path, e))?
            }
        };

        match value {
            Value::Object(_) => Ok(value),
            Value::Null => Ok(Value::Object(Map::new())),
            _ => Err(SyncError::parse(&self.path, "root must be a mapping")),
        }
    }

    pub fn render(
        &self,
        document: &Document,
        header: Option<&str>,
        escape_unicode: bool,
    ) -> Result<String, SyncError> {
        let rendered = match self.family {
            Family::Generic(_) => render_generic(document, header).map_err(|e| e.to_string()),
            Family::Json => render_json(document, escape_unicode).map_err(|e| e.to_string()),
        };
        rendered.map_err(|message| SyncError::Render {
            path: self.path.clone(),
            message,
        })
    }
}

fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                if let Some(key) = yaml_key(&key) {
                    map.entry(key).or_insert_with(|| yaml_to_json(value));
                }
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(n.to_string()))
    }
}

/// Catalog keys are strings; scalar YAML keys are stringified.
fn yaml_key(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(&tagged.value),
        _ => None,
    }
}
