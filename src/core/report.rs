//! Per-catalog bookkeeping for progress output and audits.
//!
//! The collector is purely observational: it never feeds back into the diff
//! or the builder.

use std::ops::AddAssign;
use std::path::PathBuf;

use super::builder::BuildWarning;
use super::diff::{Collision, Partitions};
use super::lemmas::Family;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub new: usize,
    pub kept: usize,
    pub protected: usize,
    pub obsolete: usize,
}

impl AddAssign for Counts {
    fn add_assign(&mut self, other: Self) {
        self.new += other.new;
        self.kept += other.kept;
        self.protected += other.protected;
        self.obsolete += other.obsolete;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    /// Nothing changed and the file is left alone.
    Unchanged,
    /// New content was computed and waits for the apply phase.
    Planned,
    /// The family is listed in `ignoreFamilies`.
    Skipped,
    Failed(String),
}

/// What happened to one (locale, family) catalog.
#[derive(Debug, Clone)]
pub struct PairReport {
    pub locale: String,
    pub family: Family,
    pub path: PathBuf,
    /// The catalog did not exist before this run.
    pub created: bool,
    pub counts: Counts,
    /// New key → file that defines it.
    pub new_keys: Vec<(String, String)>,
    /// Protected key → never-obsolete rule that matched.
    pub protected_keys: Vec<(String, String)>,
    pub obsolete_keys: Vec<String>,
    pub collisions: Vec<Collision>,
    pub warnings: Vec<BuildWarning>,
    pub outcome: PairOutcome,
}

impl PairReport {
    pub fn new(locale: &str, family: &Family, path: PathBuf) -> Self {
        Self {
            locale: locale.to_string(),
            family: family.clone(),
            path,
            created: false,
            counts: Counts::default(),
            new_keys: Vec::new(),
            protected_keys: Vec::new(),
            obsolete_keys: Vec::new(),
            collisions: Vec::new(),
            warnings: Vec::new(),
            outcome: PairOutcome::Unchanged,
        }
    }

    pub fn record_partitions(&mut self, partitions: &Partitions) {
        self.counts = Counts {
            new: partitions.new.len(),
            kept: partitions.kept.len(),
            protected: partitions.protected.len(),
            obsolete: partitions.obsolete.len(),
        };
        self.new_keys = partitions
            .new
            .iter()
            .map(|(key, file)| (key.clone(), file.clone().unwrap_or_default()))
            .collect();
        self.protected_keys = partitions
            .protected_by
            .iter()
            .map(|(key, rule)| (key.clone(), rule.clone()))
            .collect();
        self.obsolete_keys = partitions.obsolete.keys().cloned().collect();
        self.collisions = partitions.collisions.clone();
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, PairOutcome::Failed(_))
    }
}

#[derive(Debug, Default)]
pub struct ReportCollector {
    pairs: Vec<PairReport>,
}

impl ReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: PairReport) {
        self.pairs.push(report);
    }

    pub fn pairs(&self) -> &[PairReport] {
        &self.pairs
    }

    pub fn get(&self, locale: &str, family: &Family) -> Option<&PairReport> {
        self.pairs
            .iter()
            .find(|pair| pair.locale == locale && &pair.family == family)
    }

    /// Mark the pair written to `path` as failed (used by the apply phase).
    pub fn mark_failed(&mut self, path: &std::path::Path, reason: String) {
        if let Some(pair) = self.pairs.iter_mut().find(|pair| pair.path == path) {
            pair.outcome = PairOutcome::Failed(reason);
        }
    }

    pub fn totals(&self) -> Counts {
        let mut totals = Counts::default();
        for pair in &self.pairs {
            totals += pair.counts;
        }
        totals
    }

    pub fn has_new(&self) -> bool {
        self.pairs.iter().any(|pair| pair.counts.new > 0)
    }

    pub fn failures(&self) -> impl Iterator<Item = &PairReport> {
        self.pairs.iter().filter(|pair| pair.is_failed())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}
