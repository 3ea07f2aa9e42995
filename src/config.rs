use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::key_path::SplitRule;
use crate::error::SyncError;
use crate::extract::call_patterns_for;
use crate::translate::DEFAULT_ENDPOINT;

pub const CONFIG_FILE_NAME: &str = ".lemmasyncrc.json";

/// Translation helpers recognized out of the box.
pub const DEFAULT_TRANS_METHODS: &[&str] = &[
    "trans",
    "trans_choice",
    "Lang::get",
    "Lang::choice",
    "Lang::trans",
    "Lang::transChoice",
    "@lang",
    "@choice",
    "__",
    "$trans.get",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directories scanned for lemmas, relative to the project root.
    #[serde(default = "default_source_roots", alias = "folders")]
    pub source_roots: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Function name → regexes whose first group is the quoted key.
    #[serde(default = "default_trans_methods")]
    pub trans_methods: BTreeMap<String, Vec<String>>,
    #[serde(default = "default_lang_roots")]
    pub lang_roots: Vec<String>,
    /// Locales that only have a JSON catalog.
    #[serde(default)]
    pub json_locales: Vec<String>,
    /// Family names (`validation`) or catalog paths (`en/auth.yaml`) to leave alone.
    #[serde(default)]
    pub ignore_families: Vec<String>,
    #[serde(default = "default_never_obsolete_keys")]
    pub never_obsolete_keys: Vec<String>,
    /// `null` writes obsolete entries at the catalog root.
    #[serde(default = "default_obsolete_array_key")]
    pub obsolete_array_key: Option<String>,
    #[serde(default = "default_todo_prefix")]
    pub todo_prefix: String,
    #[serde(default = "default_new_value")]
    pub new_value: String,
    #[serde(default = "default_fallback_locale")]
    pub fallback_locale: String,
    /// Regex used to split dotted keys; `null` splits on literal dots.
    #[serde(default)]
    pub split_pattern: Option<String>,
    #[serde(default = "default_escape_unicode")]
    pub escape_unicode: bool,
    #[serde(default)]
    pub translator: TranslatorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatorConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub region: Option<String>,
    /// Prefer the `LEMMASYNC_TRANSLATOR_KEY` environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            region: None,
            key: None,
        }
    }
}

fn default_source_roots() -> Vec<String> {
    ["app", "resources/views"].map(String::from).to_vec()
}

fn default_extension() -> String {
    "php".to_string()
}

fn default_trans_methods() -> BTreeMap<String, Vec<String>> {
    DEFAULT_TRANS_METHODS
        .iter()
        .map(|name| (name.to_string(), call_patterns_for(name)))
        .collect()
}

fn default_lang_roots() -> Vec<String> {
    ["lang", "resources/lang"].map(String::from).to_vec()
}

fn default_never_obsolete_keys() -> Vec<String> {
    ["dynamic", "fields"].map(String::from).to_vec()
}

fn default_obsolete_array_key() -> Option<String> {
    Some("LLH:obsolete".to_string())
}

fn default_todo_prefix() -> String {
    "TODO: ".to_string()
}

fn default_new_value() -> String {
    "TODO: %LEMMA".to_string()
}

fn default_fallback_locale() -> String {
    "en".to_string()
}

fn default_escape_unicode() -> bool {
    true
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_roots: default_source_roots(),
            ignores: Vec::new(),
            extension: default_extension(),
            trans_methods: default_trans_methods(),
            lang_roots: default_lang_roots(),
            json_locales: Vec::new(),
            ignore_families: Vec::new(),
            never_obsolete_keys: default_never_obsolete_keys(),
            obsolete_array_key: default_obsolete_array_key(),
            todo_prefix: default_todo_prefix(),
            new_value: default_new_value(),
            fallback_locale: default_fallback_locale(),
            split_pattern: None,
            escape_unicode: default_escape_unicode(),
            translator: TranslatorConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Every problem found here is a configuration error: nothing has been
    /// read or written yet.
    pub fn validate(&self) -> Result<(), SyncError> {
        for pattern in &self.ignores {
            Pattern::new(pattern).map_err(|e| {
                SyncError::Configuration(format!(
                    "Invalid glob pattern in 'ignores': \"{}\" ({})",
                    pattern, e
                ))
            })?;
        }

        for (name, patterns) in &self.trans_methods {
            for pattern in patterns {
                Regex::new(pattern).map_err(|e| {
                    SyncError::Configuration(format!(
                        "Invalid regex for '{}' in 'transMethods': {}",
                        name, e
                    ))
                })?;
            }
        }

        if self.lang_roots.is_empty() {
            return Err(SyncError::Configuration(
                "'langRoots' must name at least one directory".to_string(),
            ));
        }

        self.split_rule()?;
        Ok(())
    }

    pub fn split_rule(&self) -> Result<SplitRule, SyncError> {
        SplitRule::from_config(self.split_pattern.as_deref())
    }

    /// Namespace of obsolete entries, empty when disabled.
    pub fn obsolete_prefix(&self) -> &str {
        self.obsolete_array_key.as_deref().unwrap_or_default()
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the file the config was read from, `None` for defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content =
                fs::read_to_string(&path).map_err(|e| SyncError::io("cannot read", &path, e))?;
            let config: Config = serde_json::from_str(&content).map_err(|e| {
                SyncError::Configuration(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
