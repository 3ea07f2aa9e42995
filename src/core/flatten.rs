//! Flattening of nested catalogs into dotted keys and back.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::key_path::{DELIMITER, SplitRule, set};

/// Dotted key → value (`None` for null), in first-seen order.
pub type FlatCatalog = IndexMap<String, Option<String>>;

/// Flatten a nested tree depth-first.
///
/// Arrays contribute their indices as segments, numbers and booleans are
/// stringified, empty objects produce nothing. When two paths flatten to the
/// same key the first one wins.
pub fn flatten(tree: &Value) -> FlatCatalog {
    let mut flat = FlatCatalog::new();
    flatten_into(tree, "", &mut flat);
    flat
}

fn flatten_into(value: &Value, prefix: &str, out: &mut FlatCatalog) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(child, &join(prefix, key), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, &join(prefix, &index.to_string()), out);
            }
        }
        // A bare scalar at the root is not a catalog
        _ if prefix.is_empty() => {}
        Value::Null => {
            out.entry(prefix.to_string()).or_insert(None);
        }
        Value::String(s) => {
            out.entry(prefix.to_string()).or_insert(Some(s.clone()));
        }
        Value::Bool(_) | Value::Number(_) => {
            out.entry(prefix.to_string())
                .or_insert(Some(value.to_string()));
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{DELIMITER}{key}")
    }
}

/// Rebuild a nested tree from a flat catalog.
pub fn unflatten(flat: &FlatCatalog) -> Value {
    let rule = SplitRule::default();
    let mut tree = Map::new();
    for (key, value) in flat {
        let value = value.clone().map(Value::String).unwrap_or(Value::Null);
        set(&mut tree, key, value, &rule);
    }
    Value::Object(tree)
}

/// Remove the obsolete namespace from every key.
///
/// Entries outside the namespace always win; among namespaced entries the
/// first one seen is kept.
pub fn strip_prefix(flat: FlatCatalog, prefix: &str) -> FlatCatalog {
    if prefix.is_empty() {
        return flat;
    }

    let namespace = format!("{prefix}{DELIMITER}");
    let mut stripped = FlatCatalog::with_capacity(flat.len());
    for (key, value) in flat {
        match key.strip_prefix(&namespace) {
            Some(inner) => {
                stripped.entry(inner.to_string()).or_insert(value);
            }
            None => {
                stripped.insert(key, value);
            }
        }
    }
    stripped
}
