//! # Tag Hierarchy
//!
//! Descendant closure, name resolution, and mutation contracts over the
//! tag DAG stored by [`crate::storage`] (`spec.md` §4.C).

pub mod closure;
pub mod mutate;
pub mod resolve;
pub mod validation;

pub use closure::descendant_closure;
pub use mutate::{add_tag, remove_tag, update_tag};
pub use resolve::{resolve_tag_name, MatchReason};
