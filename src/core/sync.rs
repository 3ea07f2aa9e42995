//! The two-phase synchronization pipeline.
//!
//! [`Synchronizer::plan`] visits every (locale, family) pair, diffs the
//! extracted keys against the stored catalog and renders the new content in
//! memory. [`Synchronizer::apply`] then backs up every planned file before
//! saving any of them. A pair that fails never stops the others.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use super::builder::{BuildOptions, CatalogBuilder};
use super::diff::{DiffOptions, diff};
use super::flatten::{FlatCatalog, flatten, strip_prefix};
use super::key_path::SplitRule;
use super::lemmas::Family;
use super::report::{PairOutcome, PairReport, ReportCollector};
use crate::store::{CatalogFile, CatalogStore, backup_path};
use crate::translate::Translator;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub dry_run: bool,
    /// Rewrite files even when nothing changed.
    pub force: bool,
    pub no_backup: bool,
    pub include_comments: bool,
    pub include_obsolete: bool,
    pub output_flat: bool,
    pub disable_obsolete_check: bool,
    /// Header comment of generic catalogs.
    pub header: Option<String>,
    pub new_value: String,
    pub todo_prefix: String,
    pub obsolete_prefix: String,
    pub never_obsolete: Vec<String>,
    pub fallback_locale: String,
    pub escape_unicode: bool,
    /// Family names or `<locale>/<file>` paths left untouched.
    pub ignore_families: Vec<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            force: false,
            no_backup: false,
            include_comments: true,
            include_obsolete: true,
            output_flat: false,
            disable_obsolete_check: false,
            header: None,
            new_value: "TODO: %LEMMA".to_string(),
            todo_prefix: "TODO: ".to_string(),
            obsolete_prefix: "LLH:obsolete".to_string(),
            never_obsolete: vec!["dynamic".to_string(), "fields".to_string()],
            fallback_locale: "en".to_string(),
            escape_unicode: true,
            ignore_families: Vec::new(),
        }
    }
}

/// Rendered content waiting for the apply phase.
#[derive(Debug, Clone)]
pub struct Plan {
    pub file: CatalogFile,
    pub content: String,
    pub exists: bool,
}

#[derive(Debug, Default)]
pub struct ApplySummary {
    /// Original → backup copy.
    pub backups: Vec<(PathBuf, PathBuf)>,
    pub saved: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, String)>,
}

pub struct Synchronizer<'a, S: CatalogStore> {
    store: &'a S,
    lang_root: &'a Path,
    options: &'a SyncOptions,
    split_rule: &'a SplitRule,
    translator: Option<&'a dyn Translator>,
}

impl<'a, S: CatalogStore> Synchronizer<'a, S> {
    pub fn new(
        store: &'a S,
        lang_root: &'a Path,
        options: &'a SyncOptions,
        split_rule: &'a SplitRule,
    ) -> Self {
        Self {
            store,
            lang_root,
            options,
            split_rule,
            translator: None,
        }
    }

    pub fn with_translator(mut self, translator: Option<&'a dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// Compute the new content of every catalog that needs rewriting.
    pub fn plan(
        &self,
        locales: &[String],
        families: &BTreeMap<Family, FlatCatalog>,
        collector: &mut ReportCollector,
    ) -> Vec<Plan> {
        let mut plans = Vec::new();
        for locale in locales {
            for (family, lemmas) in families {
                let file = CatalogFile::new(self.lang_root, locale, family);
                let mut report = PairReport::new(locale, family, file.path().to_path_buf());

                if self.is_ignored(locale, family, &file) {
                    report.outcome = PairOutcome::Skipped;
                    collector.record(report);
                    continue;
                }

                if let Some(plan) = self.plan_pair(file, lemmas, &mut report) {
                    plans.push(plan);
                }
                collector.record(report);
            }
        }
        plans
    }

    fn plan_pair(&self, file: CatalogFile, lemmas: &FlatCatalog, report: &mut PairReport) -> Option<Plan> {
        let options = self.options;
        let exists = self.store.exists(&file);
        report.created = !exists;

        let tree = match self.store.load(&file) {
            Ok(tree) => tree.unwrap_or_else(|| Value::Object(Map::new())),
            Err(e) => {
                report.outcome = PairOutcome::Failed(e.to_string());
                return None;
            }
        };

        let old = strip_prefix(flatten(&tree), &options.obsolete_prefix);
        let partitions = diff(
            &old,
            lemmas,
            &DiffOptions {
                never_obsolete: options.never_obsolete.clone(),
                disable_obsolete_check: options.disable_obsolete_check,
            },
        );
        report.record_partitions(&partitions);

        let builder = CatalogBuilder::new(BuildOptions {
            dialect: file.dialect(),
            output_flat: options.output_flat,
            include_comments: options.include_comments,
            include_obsolete: options.include_obsolete,
            obsolete_prefix: &options.obsolete_prefix,
            new_value: &options.new_value,
            todo_prefix: &options.todo_prefix,
            locale: &file.locale,
            is_fallback_locale: file.locale == options.fallback_locale,
            split_rule: self.split_rule,
            translator: self.translator,
        });
        let built = builder.build(&partitions);
        report.warnings = built.warnings;

        if !built.something_to_do && !options.force {
            report.outcome = PairOutcome::Unchanged;
            return None;
        }

        match file.render(&built.document, options.header.as_deref(), options.escape_unicode) {
            Ok(content) => {
                report.outcome = PairOutcome::Planned;
                Some(Plan {
                    file,
                    content,
                    exists,
                })
            }
            Err(e) => {
                report.outcome = PairOutcome::Failed(e.to_string());
                None
            }
        }
    }

    fn is_ignored(&self, locale: &str, family: &Family, file: &CatalogFile) -> bool {
        let Family::Generic(name) = family else {
            return false;
        };
        let short_path = file
            .path()
            .file_name()
            .map(|name| format!("{locale}/{}", name.to_string_lossy()))
            .unwrap_or_default();
        self.options
            .ignore_families
            .iter()
            .any(|ignored| ignored == name || *ignored == short_path)
    }

    /// Back up every planned file, then save them.
    ///
    /// A file whose backup failed is not overwritten. Dry runs only report
    /// what would happen.
    pub fn apply(
        &self,
        plans: &[Plan],
        timestamp: &NaiveDateTime,
        collector: &mut ReportCollector,
    ) -> ApplySummary {
        let mut summary = ApplySummary::default();

        if self.options.dry_run {
            if !self.options.no_backup {
                summary.backups = plans
                    .iter()
                    .filter(|plan| plan.exists)
                    .map(|plan| {
                        let path = plan.file.path();
                        (path.to_path_buf(), backup_path(path, timestamp))
                    })
                    .collect();
            }
            summary.saved = plans.iter().map(|plan| plan.file.path().to_path_buf()).collect();
            return summary;
        }

        let mut blocked: HashSet<&Path> = HashSet::new();
        if !self.options.no_backup {
            for plan in plans {
                match self.store.backup(&plan.file, timestamp) {
                    Ok(Some(backup)) => {
                        summary
                            .backups
                            .push((plan.file.path().to_path_buf(), backup));
                    }
                    Ok(None) => {}
                    Err(e) => {
                        blocked.insert(plan.file.path());
                        self.fail(&mut summary, collector, plan.file.path(), e.to_string());
                    }
                }
            }
        }

        for plan in plans {
            if blocked.contains(plan.file.path()) {
                continue;
            }
            match self.store.save(&plan.file, plan.content.as_bytes()) {
                Ok(()) => summary.saved.push(plan.file.path().to_path_buf()),
                Err(e) => self.fail(&mut summary, collector, plan.file.path(), e.to_string()),
            }
        }

        summary
    }

    fn fail(
        &self,
        summary: &mut ApplySummary,
        collector: &mut ReportCollector,
        path: &Path,
        reason: String,
    ) {
        collector.mark_failed(path, reason.clone());
        summary.failures.push((path.to_path_buf(), reason));
    }
}
