//! Stable, user-surfaceable error kinds for the library engine.
//!
//! Every fallible operation in `tagstudio_core` returns this crate's
//! [`Result`]. Variants are deliberately coarse — callers match on kind,
//! not on the wrapped cause — mirroring how the teacher's `PadzError`
//! is consumed by its CLI layer.

use std::path::PathBuf;

/// The reason a library failed to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenFailureReason {
    NotReadable,
    IncompatibleVersion { found: i64, current: i64 },
    Corrupt,
}

impl std::fmt::Display for OpenFailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenFailureReason::NotReadable => write!(f, "directory is not readable"),
            OpenFailureReason::IncompatibleVersion { found, current } => write!(
                f,
                "schema version {found} is newer than supported version {current}"
            ),
            OpenFailureReason::Corrupt => write!(f, "database file is corrupt"),
        }
    }
}

/// Which kind of entity a `NotFound` error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    Entry,
    Tag,
    Namespace,
    ColorGroup,
    FieldType,
}

impl std::fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotFoundKind::Entry => "entry",
            NotFoundKind::Tag => "tag",
            NotFoundKind::Namespace => "namespace",
            NotFoundKind::ColorGroup => "color group",
            NotFoundKind::FieldType => "field type",
        };
        write!(f, "{s}")
    }
}

/// A byte-offset span into the original query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn point(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open library: {reason}")]
    OpenFailure { reason: OpenFailureReason },

    #[error("query error at {span:?}: {message}")]
    ParseError { span: Span, message: String },

    #[error("not implemented: {feature}")]
    NotImplemented { feature: String },

    #[error("path already taken by another entry: {0}")]
    ConflictingPath(String),

    #[error("namespace '{0}' is reserved and cannot be mutated")]
    ReservedNamespace(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: NotFoundKind, id: String },

    #[error("I/O failure at {path}: {cause}")]
    IOFailure { path: PathBuf, cause: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn not_found(kind: NotFoundKind, id: impl std::fmt::Display) -> Self {
        Error::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn io_failure(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        Error::IOFailure {
            path: path.into(),
            cause: cause.to_string(),
        }
    }
}
