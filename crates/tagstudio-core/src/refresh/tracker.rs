//! The refresh tracker (`spec.md` §4.F): diffs a directory scan against
//! stored paths, relinks moved files by basename, and commits new/missing
//! sets in batches.
//!
//! State lives entirely in [`RefreshTracker`] until [`RefreshTracker::save_new_files`]
//! or [`RefreshTracker::remove_unlinked_entries`] is called — a scan never
//! mutates storage by itself (`spec.md` §4.F: "scan is non-committing").

use super::scanner::{ScanStream, ScannerStrategy};
use crate::error::Result;
use crate::model::{Entry, EntryId};
use crate::path::CompiledIgnore;
use crate::storage::Storage;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Number of new paths inserted per transaction in [`RefreshTracker::save_new_files`]
/// (`spec.md` §4.F.3).
const SAVE_BATCH_SIZE: usize = 200;

/// Tracks the result of diffing a directory scan against stored paths.
///
/// `expected_paths` and `paths_to_id` are loaded once from storage at
/// [`RefreshTracker::new`] time (`spec.md` §5: "The refresh tracker observes the
/// database only at `all_paths()` time"); everything after that is
/// in-memory bookkeeping until explicitly committed.
pub struct RefreshTracker {
    storage: Storage,
    folder_id: i64,
    root: PathBuf,
    expected_paths: HashSet<String>,
    paths_to_id: HashMap<String, EntryId>,
    new_paths: Vec<String>,
    missing_paths: HashMap<String, EntryId>,
}

impl RefreshTracker {
    /// Load current stored paths for `folder_id` and prepare to scan `root`.
    pub fn new(storage: Storage, folder_id: i64, root: impl Into<PathBuf>) -> Result<Self> {
        let paths_to_id: HashMap<String, EntryId> = storage
            .all_paths()?
            .into_iter()
            .map(|(id, path)| (path, id))
            .collect();
        let expected_paths = paths_to_id.keys().cloned().collect();
        Ok(Self {
            storage,
            folder_id,
            root: root.into(),
            expected_paths,
            paths_to_id,
            new_paths: Vec::new(),
            missing_paths: HashMap::new(),
        })
    }

    pub fn new_paths(&self) -> &[String] {
        &self.new_paths
    }

    pub fn missing_paths(&self) -> impl Iterator<Item = &str> {
        self.missing_paths.keys().map(String::as_str)
    }

    /// Scan the root directory with `scanner` (falling back to the
    /// internal walker if unavailable or unable to spawn), returning a
    /// lazy iterator of running file counts (`spec.md` §4.F.1: "yields
    /// progress integers ... so a progress indicator can run concurrently").
    /// Dropping the iterator before exhaustion cancels the scan; any
    /// external process already spawned is allowed to run to completion
    /// with its output discarded (`spec.md` §5).
    pub fn scan<'a>(
        &'a mut self,
        scanner: &dyn ScannerStrategy,
        ignore: &CompiledIgnore,
    ) -> Result<ScanProgress<'a>> {
        let stream = if scanner.available() {
            match scanner.spawn(&self.root, ignore) {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::warn!(error = %e, "external scanner failed to spawn, falling back");
                    super::scanner::InternalWalker.spawn(&self.root, ignore)?
                }
            }
        } else {
            super::scanner::InternalWalker.spawn(&self.root, ignore)?
        };
        Ok(ScanProgress {
            tracker: self,
            stream,
            found: HashSet::new(),
            count: 0,
        })
    }

    /// For each missing path, relink it to the single new path sharing its
    /// basename, if exactly one exists (`spec.md` §4.F.2). Ambiguous
    /// basename matches are left untouched for manual resolution. Returns
    /// the number of entries relinked.
    pub fn fix_unlinked_entries(&mut self) -> Result<usize> {
        let mut candidates_by_basename: HashMap<&str, Vec<&str>> = HashMap::new();
        for new_path in &self.new_paths {
            let basename = basename_of(new_path);
            candidates_by_basename.entry(basename).or_default().push(new_path);
        }

        let mut relinked = Vec::new();
        for (missing_path, &id) in &self.missing_paths {
            let basename = basename_of(missing_path);
            let Some(candidates) = candidates_by_basename.get(basename) else {
                continue;
            };
            if candidates.len() != 1 {
                tracing::debug!(basename, count = candidates.len(), "ambiguous relink candidate");
                continue;
            }
            let new_path = candidates[0].to_string();
            let suffix = crate::path::normalize::posix_suffix(&new_path);
            if self.storage.update_entry_path(id, &new_path, &suffix)? {
                relinked.push((missing_path.clone(), new_path, id));
            }
        }

        let count = relinked.len();
        for (missing_path, new_path, id) in relinked {
            self.missing_paths.remove(&missing_path);
            self.paths_to_id.remove(&missing_path);
            self.paths_to_id.insert(new_path.clone(), id);
            self.new_paths.retain(|p| p != &new_path);
        }
        Ok(count)
    }

    /// Insert `new_paths` in batches of [`SAVE_BATCH_SIZE`], one
    /// transaction per batch, yielding a running count after each
    /// (`spec.md` §4.F.3, §5: "each batch is committed; the caller must
    /// handle resume" on cancellation).
    pub fn save_new_files(&mut self) -> SaveProgress<'_> {
        SaveProgress {
            tracker: self,
            saved: 0,
        }
    }

    /// Remove every entry in `missing_paths` and clear the set
    /// (`spec.md` §4.F.4).
    pub fn remove_unlinked_entries(&mut self) -> Result<usize> {
        let ids: Vec<EntryId> = self.missing_paths.values().copied().collect();
        if ids.is_empty() {
            return Ok(0);
        }
        self.storage.remove_entries(&ids)?;
        for path in self.missing_paths.keys() {
            self.paths_to_id.remove(path);
        }
        let count = self.missing_paths.len();
        self.missing_paths.clear();
        Ok(count)
    }
}

fn basename_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Lazily drains a [`ScanStream`], computing `new = found - expected` and
/// `missing = expected - found` once the stream is exhausted.
pub struct ScanProgress<'a> {
    tracker: &'a mut RefreshTracker,
    stream: ScanStream,
    found: HashSet<String>,
    count: usize,
}

impl Iterator for ScanProgress<'_> {
    type Item = Result<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.stream.next_path() {
            Some(Ok(path)) => {
                self.found.insert(path);
                self.count += 1;
                Some(Ok(self.count))
            }
            Some(Err(e)) => Some(Err(e)),
            None => {
                self.tracker.new_paths = self
                    .found
                    .difference(&self.tracker.expected_paths)
                    .cloned()
                    .collect();
                self.tracker.missing_paths = self
                    .tracker
                    .expected_paths
                    .difference(&self.found)
                    .filter_map(|path| {
                        self.tracker
                            .paths_to_id
                            .get(path)
                            .map(|&id| (path.clone(), id))
                    })
                    .collect();
                None
            }
        }
    }
}

/// Lazily inserts [`RefreshTracker::new_paths`] in batches, yielding the
/// cumulative count of entries saved so far after each batch commits.
pub struct SaveProgress<'a> {
    tracker: &'a mut RefreshTracker,
    saved: usize,
}

impl Iterator for SaveProgress<'_> {
    type Item = Result<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.saved >= self.tracker.new_paths.len() {
            return None;
        }
        let now = Utc::now();
        let folder_id = self.tracker.folder_id;
        let end = (self.saved + SAVE_BATCH_SIZE).min(self.tracker.new_paths.len());
        let batch: Vec<Entry> = self.tracker.new_paths[self.saved..end]
            .iter()
            .map(|path| Entry::new(folder_id, Path::new(path), now))
            .collect();

        let result = self.tracker.storage.insert_entries(&batch);
        match result {
            Ok(ids) => {
                for (path, id) in self.tracker.new_paths[self.saved..end].iter().zip(ids) {
                    if let Some(id) = id {
                        self.tracker.paths_to_id.insert(path.clone(), id);
                        self.tracker.expected_paths.insert(path.clone());
                    }
                }
                self.saved = end;
                Some(Ok(self.saved))
            }
            Err(e) => {
                self.saved = end;
                Some(Err(e))
            }
        }
    }
}
