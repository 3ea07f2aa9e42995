//! Reconciliation engine.
//!
//! Leaves first: key paths, flattening, the diff, the document builder and
//! its renderers, then the per-catalog report and the two-phase pipeline that
//! ties them to a [`crate::store::CatalogStore`].

pub mod builder;
pub mod diff;
pub mod document;
pub mod flatten;
pub mod key_path;
pub mod lemmas;
pub mod render;
pub mod report;
pub mod sync;

pub use builder::{BuildOptions, BuildWarning, CatalogBuilder, Dialect};
pub use diff::{Collision, DiffOptions, Partitions, diff};
pub use lemmas::{Family, Lemmas, group_by_family};
pub use report::{Counts, PairOutcome, PairReport, ReportCollector};
pub use sync::{ApplySummary, Plan, SyncOptions, Synchronizer};
