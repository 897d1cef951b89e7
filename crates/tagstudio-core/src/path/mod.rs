//! # Path & Ignore
//!
//! Pattern compilation, path normalisation, and media-type classification
//! (`spec.md` §4.A). This module feeds both the refresh scanner
//! ([`crate::refresh`]) and the query compiler's `Path`/`MediaType`/
//! `FileType` constraints ([`crate::query`]).

pub mod ignore;
pub mod media_type;
pub mod normalize;

pub use ignore::CompiledIgnore;
pub use media_type::MediaCategory;
