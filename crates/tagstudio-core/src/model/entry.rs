use crate::path::normalize::{posix_suffix, to_posix_string};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Stable 64-bit entry identifier. Newtype so callers cannot accidentally
/// mix an `EntryId` with a `TagId` or a raw rowid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub i64);

impl From<i64> for EntryId {
    fn from(v: i64) -> Self {
        EntryId(v)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row per discovered file (`spec.md` §3).
///
/// `path` is always POSIX-form (forward slashes) and relative to its
/// folder. `suffix` is always the lower-cased extension of `path` without
/// the leading dot — this is an invariant enforced at construction, not
/// merely documented: there is no way to build an `Entry` with a suffix
/// that disagrees with its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub folder_id: i64,
    pub path: String,
    pub suffix: String,
    pub date_added: DateTime<Utc>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl Entry {
    /// Build a new, not-yet-persisted entry from a path relative to its
    /// folder. `relative_path` may use either separator; it is normalized
    /// to POSIX form and the suffix is derived from it, never supplied
    /// independently.
    pub fn new(folder_id: i64, relative_path: &Path, now: DateTime<Utc>) -> Self {
        let path = to_posix_string(relative_path);
        let suffix = posix_suffix(&path);
        Self {
            id: EntryId(0),
            folder_id,
            path,
            suffix,
            date_added: now,
            date_created: now,
            date_modified: now,
        }
    }

    /// Rewrite this entry's path (used by relink), re-deriving `suffix`
    /// so the coherence invariant can never drift.
    pub fn set_path(&mut self, relative_path: &Path) {
        self.path = to_posix_string(relative_path);
        self.suffix = posix_suffix(&self.path);
    }

    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn suffix_matches_path_extension() {
        let e = Entry::new(1, &PathBuf::from("a/b/Photo.JPG"), Utc::now());
        assert_eq!(e.path, "a/b/Photo.JPG");
        assert_eq!(e.suffix, "jpg");
    }

    #[test]
    fn no_extension_gives_empty_suffix() {
        let e = Entry::new(1, &PathBuf::from("README"), Utc::now());
        assert_eq!(e.suffix, "");
    }

    #[test]
    fn set_path_rederives_suffix() {
        let mut e = Entry::new(1, &PathBuf::from("a/x.png"), Utc::now());
        e.set_path(&PathBuf::from("b/x.gif"));
        assert_eq!(e.path, "b/x.gif");
        assert_eq!(e.suffix, "gif");
    }

    #[test]
    fn basename_extracts_last_segment() {
        let e = Entry::new(1, &PathBuf::from("a/b/c.txt"), Utc::now());
        assert_eq!(e.basename(), "c.txt");
    }
}
