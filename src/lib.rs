//! lemmasync - keep translation catalogs in sync with the source code
//!
//! lemmasync scans source files for translation calls (`__('...')`,
//! `trans('...')`, `@lang('...')`), collects the lemmas they use and rewrites
//! every locale's catalogs so that new lemmas get a placeholder value, known
//! ones keep their translation and obsolete ones are flagged or dropped.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, commands, output)
//! - `config`: Configuration file loading and validation
//! - `core`: Catalog engine (key paths, diff, builder, rendering, sync)
//! - `error`: Typed errors shared by every layer
//! - `extract`: Source scanning and lemma extraction
//! - `store`: Catalog files on disk, backups and locale discovery
//! - `translate`: Machine translation of new lemmas
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod extract;
pub mod store;
pub mod translate;
pub mod utils;
