//! # Storage Schema
//!
//! The relational backing store (`spec.md` §4.B). [`Storage`] wraps a
//! single `rusqlite::Connection` behind a mutex; every other file in this
//! module is an `impl Storage` block grouping the CRUD surface for one
//! part of the data model (entries, tags, fields, preferences, folder).
//!
//! Callers outside this crate never see `rusqlite` types: every public
//! method here takes and returns [`crate::model`] values and
//! [`crate::error::Result`].

mod connection;
mod entries;
mod fields;
mod folders;
mod migrations;
mod preferences;
mod schema;
mod tags;

pub use connection::Storage;
pub use migrations::CURRENT_SCHEMA_VERSION;
