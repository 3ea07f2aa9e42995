//! Assembly of diff partitions into a catalog document.
//!
//! Section order is fixed: new strings first (so translators see them at the
//! top of the file), then existing translations, protected dynamic strings
//! and finally obsolete strings under the obsolete namespace.

use super::diff::Partitions;
use super::document::{Document, Section};
use super::key_path::{SetOutcome, SplitRule};
use crate::translate::Translator;

/// Placeholder replaced by the lemma (or its translation) in new values.
pub const LEMMA_PLACEHOLDER: &str = "%LEMMA";

/// Output flavour of a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Nested catalog file with section markers and comments.
    Generic,
    /// Per-locale JSON catalog keyed by whole sentences.
    Json,
}

pub struct BuildOptions<'a> {
    pub dialect: Dialect,
    pub output_flat: bool,
    pub include_comments: bool,
    pub include_obsolete: bool,
    pub obsolete_prefix: &'a str,
    /// Template for new values; `null` (any case) writes null values.
    pub new_value: &'a str,
    pub todo_prefix: &'a str,
    pub locale: &'a str,
    pub is_fallback_locale: bool,
    pub split_rule: &'a SplitRule,
    /// Set when new values should be machine translated.
    pub translator: Option<&'a dyn Translator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// Translation failed and the raw lemma was used instead.
    Translation { key: String, error: String },
    /// Two entries fought over the same path; the later one won.
    Conflict { key: String },
}

#[derive(Debug)]
pub struct Built {
    pub document: Document,
    pub something_to_do: bool,
    pub warnings: Vec<BuildWarning>,
}

pub struct CatalogBuilder<'a> {
    options: BuildOptions<'a>,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(options: BuildOptions<'a>) -> Self {
        Self { options }
    }

    pub fn build(&self, partitions: &Partitions) -> Built {
        let mut document = Document::new();
        let mut warnings = Vec::new();

        if !partitions.new.is_empty() {
            document.push_marker(Section::New);
            for (key, provenance) in &partitions.new {
                let comment = match provenance {
                    Some(file) if self.options.include_comments => {
                        Some(format!("Defined in file {file}"))
                    }
                    _ => None,
                };
                let (value, warning) = self.new_value(key);
                warnings.extend(warning);
                let outcome = document.insert(&self.segments(key), value, comment);
                self.check(outcome, key, &mut warnings);
            }
        }

        if !partitions.kept.is_empty() {
            document.push_marker(Section::Kept);
            for (key, value) in &partitions.kept {
                let outcome = document.insert(&self.segments(key), value.clone(), None);
                self.check(outcome, key, &mut warnings);
            }
        }

        if !partitions.protected.is_empty() {
            document.push_marker(Section::Protected);
            for (key, value) in &partitions.protected {
                let outcome = document.insert(&self.segments(key), value.clone(), None);
                self.check(outcome, key, &mut warnings);
            }
        }

        if self.options.include_obsolete && !partitions.obsolete.is_empty() {
            document.push_marker(Section::Obsolete);
            for (key, value) in &partitions.obsolete {
                let mut segments = self.prefix_segments();
                segments.extend(self.segments(key));
                let outcome = document.insert(&segments, value.clone(), None);
                self.check(outcome, key, &mut warnings);
            }
        }

        if self.options.output_flat {
            document = document.flattened();
        }

        Built {
            document,
            something_to_do: partitions.something_to_do(),
            warnings,
        }
    }

    /// Value written for a freshly discovered key.
    pub fn new_value(&self, key: &str) -> (Option<String>, Option<BuildWarning>) {
        let options = &self.options;
        if options.new_value.eq_ignore_ascii_case("null") {
            return (None, None);
        }

        let lemma = match options.dialect {
            Dialect::Json => key,
            Dialect::Generic => options.split_rule.last_segment(key),
        };

        let (text, warning) = match options.translator {
            Some(translator) => match translator.translate(lemma, options.locale, None) {
                Ok(text) => (text, None),
                Err(e) => (
                    lemma.to_string(),
                    Some(BuildWarning::Translation {
                        key: key.to_string(),
                        error: e.to_string(),
                    }),
                ),
            },
            None => (lemma.to_string(), None),
        };

        let mut value = options.new_value.to_string();
        if options.is_fallback_locale {
            // The fallback catalog gets the bare lemma, without the to-do marker
            let todo = format!("{}{}", options.todo_prefix, LEMMA_PLACEHOLDER);
            value = value.replace(&todo, &text);
        }
        (Some(value.replace(LEMMA_PLACEHOLDER, &text)), warning)
    }

    fn segments<'k>(&self, key: &'k str) -> Vec<&'k str> {
        match self.options.dialect {
            // JSON keys are whole sentences and never nested
            Dialect::Json => vec![key],
            Dialect::Generic => self.options.split_rule.split(key),
        }
    }

    fn prefix_segments(&self) -> Vec<&'a str> {
        if self.options.obsolete_prefix.is_empty() {
            Vec::new()
        } else {
            self.options.split_rule.split(self.options.obsolete_prefix)
        }
    }

    fn check(&self, outcome: SetOutcome, key: &str, warnings: &mut Vec<BuildWarning>) {
        if outcome == SetOutcome::Conflict {
            warnings.push(BuildWarning::Conflict {
                key: key.to_string(),
            });
        }
    }
}
