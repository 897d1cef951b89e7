//! # tagstudio-core
//!
//! The library engine for a local, file-oriented metadata manager
//! (`spec.md` §1). A *library* is a filesystem directory; this crate
//! discovers files beneath it, persists per-file **entries** with tags and
//! typed fields, reconciles on-disk state against stored entries, and
//! answers a small query language over the result.
//!
//! Layout mirrors the component table in `SPEC_FULL.md` §2:
//!
//! - [`path`] — ignore patterns, path normalisation, media-type tables.
//! - [`storage`] — the relational schema and its migrations.
//! - [`tags`] — descendant closure, name resolution, mutation contracts.
//! - [`query`] — tokenizer, parser, AST, and predicate compiler.
//! - [`engine`] — the `Library` facade: CRUD, search, grouping.
//! - [`refresh`] — directory scan and new/missing/relink reconciliation.
//! - [`thumb_cache`] — the sharded thumbnail artifact store.
//!
//! Nothing here is specific to any UI toolkit; `tagstudio-cli` is one
//! possible consumer, not the only one.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod path;
pub mod query;
pub mod refresh;
pub mod storage;
pub mod tags;
pub mod thumb_cache;

pub use error::{Error, Result};
