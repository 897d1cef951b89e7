//! # Domain model
//!
//! Plain Rust types for every entity in the data model (`spec.md` §3):
//! [`Folder`], [`Entry`], [`Tag`], [`TagAlias`], [`Namespace`],
//! [`TagColorGroup`], field types/instances, and [`Preferences`].
//!
//! Like the teacher's `model.rs`, nothing here performs I/O — these are
//! value types constructed and consumed by the `storage` and `library`
//! layers.

pub mod color;
pub mod entry;
pub mod field;
pub mod folder;
pub mod namespace;
pub mod preferences;
pub mod tag;

pub use color::TagColorGroup;
pub use entry::{Entry, EntryId};
pub use field::{FieldInstanceValue, FieldType, FieldTypeKind};
pub use folder::Folder;
pub use namespace::Namespace;
pub use preferences::Preferences;
pub use tag::{Tag, TagAlias, TagId};

/// Reserved entry-tag id range for built-in "meta tags" (archived, favorite).
///
/// Ids in this range are seeded at library creation and are never assigned
/// to user-created tags.
pub const RESERVED_TAG_ID_START: i64 = 1;
pub const RESERVED_TAG_ID_END: i64 = 999;

pub const ARCHIVED_TAG_ID: i64 = 1;
pub const FAVORITE_TAG_ID: i64 = 2;

/// Namespace slugs beginning with this prefix are system-owned: immutable,
/// never renamed or deleted by user action (`spec.md` §3).
pub const RESERVED_NAMESPACE_PREFIX: &str = "tagstudio-";

pub fn is_reserved_namespace(slug: &str) -> bool {
    slug.starts_with(RESERVED_NAMESPACE_PREFIX)
}
