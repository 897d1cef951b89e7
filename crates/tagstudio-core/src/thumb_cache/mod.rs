//! # Thumb Cache
//!
//! A size-bounded artifact store that memoises externally-produced
//! thumbnail bytes (`spec.md` §4.G). Never on the query path: nothing in
//! [`crate::engine`] or [`crate::query`] consults it.
//!
//! Layout: `<library>/.tagstudio/thumb_cache/<unix-ts>/<file_name>`, one
//! shard folder per generation. Shards are evicted whole, oldest first,
//! whenever a write pushes the total size over `max_total_bytes`.
//!
//! All mutations are serialised by a single [`std::sync::Mutex`]
//! (`spec.md` §5 calls for a re-entrant lock; every public method here
//! acquires the lock exactly once and never calls another locked method
//! while holding it, so a plain non-reentrant mutex is equivalent in
//! practice — see `DESIGN.md`).

use crate::error::Error;
use crate::Result;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

struct Shard {
    timestamp: u64,
    size: u64,
}

struct CacheState {
    shards: VecDeque<Shard>,
    total_size: u64,
}

/// Outcome of [`ThumbCache::clear`]. `fully_cleared` is `false` when one
/// or more shard files could not be deleted; those shards are retained
/// with their size re-measured (`spec.md` §4.G: "clear reports partial
/// failure").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearOutcome {
    pub fully_cleared: bool,
    pub shards_removed: usize,
}

/// A snapshot of cache occupancy, for `thumb-cache stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub shard_count: usize,
    pub total_size_bytes: u64,
}

pub struct ThumbCache {
    root: PathBuf,
    max_folder_bytes: u64,
    max_total_bytes: u64,
    state: Mutex<CacheState>,
}

impl ThumbCache {
    /// Open (creating if absent) the shard root under `root`, and measure
    /// every existing shard's size so eviction bookkeeping starts
    /// accurate rather than assuming an empty cache.
    pub fn open(root: &Path, max_folder_size_mb: u64, max_total_size_mb: u64) -> Result<Self> {
        Self::open_with_byte_caps(
            root,
            max_folder_size_mb.saturating_mul(1024 * 1024),
            max_total_size_mb.saturating_mul(1024 * 1024),
        )
    }

    fn open_with_byte_caps(root: &Path, max_folder_bytes: u64, max_total_bytes: u64) -> Result<Self> {
        std::fs::create_dir_all(root).map_err(|e| Error::io_failure(root, e))?;
        let mut shards = Vec::new();
        for entry in std::fs::read_dir(root).map_err(|e| Error::io_failure(root, e))? {
            let entry = entry.map_err(|e| Error::io_failure(root, e))?;
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_dir() {
                continue;
            }
            let Some(timestamp) = entry.file_name().to_str().and_then(|s| s.parse::<u64>().ok())
            else {
                continue;
            };
            let size = shard_size(&entry.path())?;
            shards.push(Shard { timestamp, size });
        }
        shards.sort_by_key(|s| s.timestamp);
        let total_size = shards.iter().map(|s| s.size).sum();

        Ok(Self {
            root: root.to_path_buf(),
            max_folder_bytes,
            max_total_bytes,
            state: Mutex::new(CacheState {
                shards: shards.into(),
                total_size,
            }),
        })
    }

    /// Write `bytes` into the current shard under `file_name`, creating a
    /// new shard (named with the current unix timestamp) if the current
    /// one would exceed `max_folder_size` (`spec.md` §4.G). After the
    /// write, evicts whole shards oldest-first while total size exceeds
    /// `max_total_size`.
    pub fn save(&self, bytes: &[u8], file_name: &str) -> Result<PathBuf> {
        let mut state = self.state.lock().expect("thumb cache mutex poisoned");
        let incoming = bytes.len() as u64;

        let needs_new_shard = match state.shards.back() {
            Some(shard) => shard.size + incoming > self.max_folder_bytes,
            None => true,
        };
        if needs_new_shard {
            // Guarantee a strictly greater timestamp than the shard it
            // replaces, even when two saves land in the same wall-clock
            // second — shard names must stay unique and ascending for
            // `get`'s scan order and eviction's oldest-first order to hold.
            let mut timestamp = current_unix_timestamp();
            if let Some(back) = state.shards.back() {
                if timestamp <= back.timestamp {
                    timestamp = back.timestamp + 1;
                }
            }
            let shard_dir = self.root.join(timestamp.to_string());
            match std::fs::create_dir(&shard_dir) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(Error::io_failure(&shard_dir, e)),
            }
            state.shards.push_back(Shard { timestamp, size: 0 });
        }

        let shard = state.shards.back_mut().expect("shard just ensured");
        let shard_path = self.root.join(shard.timestamp.to_string()).join(file_name);
        std::fs::write(&shard_path, bytes).map_err(|e| Error::io_failure(&shard_path, e))?;
        shard.size += incoming;
        state.total_size += incoming;

        self.evict_while_over_budget(&mut state);
        Ok(shard_path)
    }

    /// Scan shards in ascending (oldest-first) order and return the first
    /// matching file's bytes, or `None` (`spec.md` §4.G). A file observed
    /// in the directory listing but removed before the read completes is
    /// a miss, not an error.
    pub fn get(&self, file_name: &str) -> Result<Option<Vec<u8>>> {
        let timestamps: Vec<u64> = {
            let state = self.state.lock().expect("thumb cache mutex poisoned");
            state.shards.iter().map(|s| s.timestamp).collect()
        };
        for timestamp in timestamps {
            let path = self.root.join(timestamp.to_string()).join(file_name);
            match std::fs::read(&path) {
                Ok(bytes) => return Ok(Some(bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::io_failure(&path, e)),
            }
        }
        Ok(None)
    }

    /// Remove every shard, then the containing folder. A shard whose
    /// file cannot be removed is retained with its size re-measured, and
    /// the outcome reports partial failure (`spec.md` §4.G).
    pub fn clear(&self) -> Result<ClearOutcome> {
        let mut state = self.state.lock().expect("thumb cache mutex poisoned");
        let mut fully_cleared = true;
        let mut removed = 0;
        let mut retained = VecDeque::new();

        while let Some(shard) = state.shards.pop_front() {
            let shard_dir = self.root.join(shard.timestamp.to_string());
            match std::fs::remove_dir_all(&shard_dir) {
                Ok(()) => {
                    state.total_size = state.total_size.saturating_sub(shard.size);
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!(shard = shard.timestamp, error = %e, "failed to remove thumb cache shard");
                    fully_cleared = false;
                    let resized = shard_size(&shard_dir).unwrap_or(shard.size);
                    retained.push_back(Shard {
                        timestamp: shard.timestamp,
                        size: resized,
                    });
                }
            }
        }
        state.total_size = retained.iter().map(|s| s.size).sum();
        state.shards = retained;

        if fully_cleared {
            match std::fs::remove_dir(&self.root) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(error = %e, "failed to remove thumb cache root");
                    fully_cleared = false;
                }
            }
        }

        Ok(ClearOutcome {
            fully_cleared,
            shards_removed: removed,
        })
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock().expect("thumb cache mutex poisoned");
        CacheStats {
            shard_count: state.shards.len(),
            total_size_bytes: state.total_size,
        }
    }

    fn evict_while_over_budget(&self, state: &mut CacheState) {
        while state.total_size > self.max_total_bytes {
            let Some(oldest) = state.shards.pop_front() else {
                break;
            };
            let shard_dir = self.root.join(oldest.timestamp.to_string());
            if let Err(e) = std::fs::remove_dir_all(&shard_dir) {
                tracing::warn!(shard = oldest.timestamp, error = %e, "eviction failed to remove shard");
                state.shards.push_front(oldest);
                break;
            }
            state.total_size = state.total_size.saturating_sub(oldest.size);
        }
    }
}

fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn shard_size(shard_dir: &Path) -> Result<u64> {
    let mut total = 0u64;
    let entries = match std::fs::read_dir(shard_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(Error::io_failure(shard_dir, e)),
    };
    for entry in entries {
        let entry = entry.map_err(|e| Error::io_failure(shard_dir, e))?;
        if let Ok(metadata) = entry.metadata() {
            total += metadata.len();
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ThumbCache::open(dir.path(), 10, 500).unwrap();
        cache.save(b"hello", "a.webp").unwrap();
        let bytes = cache.get("a.webp").unwrap();
        assert_eq!(bytes, Some(b"hello".to_vec()));
    }

    #[test]
    fn get_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ThumbCache::open(dir.path(), 10, 500).unwrap();
        assert_eq!(cache.get("nope.webp").unwrap(), None);
    }

    #[test]
    fn folder_size_cap_creates_new_shard() {
        let dir = tempfile::tempdir().unwrap();
        // A 1-byte folder cap forces every write after the first into a new shard.
        let cache = ThumbCache::open_with_byte_caps(dir.path(), 1, 500 * 1024 * 1024).unwrap();
        cache.save(b"one", "a.webp").unwrap();
        cache.save(b"two", "b.webp").unwrap();
        assert_eq!(cache.stats().shard_count, 2);
    }

    #[test]
    fn total_size_cap_evicts_oldest_shard_whole() {
        let dir = tempfile::tempdir().unwrap();
        // Every write gets its own shard (folder cap 1 byte); a 6-byte total
        // cap leaves room for exactly the most recent shard after eviction.
        let cache = ThumbCache::open_with_byte_caps(dir.path(), 1, 6).unwrap();
        cache.save(b"first", "a.webp").unwrap();
        cache.save(b"second", "b.webp").unwrap();
        assert_eq!(cache.stats().shard_count, 1);
        assert_eq!(cache.get("a.webp").unwrap(), None);
        assert_eq!(cache.get("b.webp").unwrap(), Some(b"second".to_vec()));
    }

    #[test]
    fn clear_removes_all_shards_and_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("thumb_cache");
        let cache = ThumbCache::open(&root, 10, 500).unwrap();
        cache.save(b"x", "a.webp").unwrap();
        let outcome = cache.clear().unwrap();
        assert!(outcome.fully_cleared);
        assert_eq!(outcome.shards_removed, 1);
        assert!(!root.exists());
    }

    #[test]
    fn reopen_measures_existing_shards() {
        let dir = tempfile::tempdir().unwrap();
        {
            let cache = ThumbCache::open(dir.path(), 10, 500).unwrap();
            cache.save(b"hello", "a.webp").unwrap();
        }
        let reopened = ThumbCache::open(dir.path(), 10, 500).unwrap();
        let stats = reopened.stats();
        assert_eq!(stats.shard_count, 1);
        assert_eq!(stats.total_size_bytes, 5);
    }
}
