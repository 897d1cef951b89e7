//! # Library Engine
//!
//! [`Library`] is the facade over every other component: opening a
//! library directory, entry/tag/field CRUD, search, and grouping
//! (`spec.md` §4.E). Like the teacher's `PadzApi<S: DataStore>`, it is
//! the one type most callers (including `tagstudio-cli`) ever touch
//! directly — everything else in this crate is a supporting layer it
//! composes.

mod group;
mod search;

pub use group::{GroupCriteria, GroupKey, GroupedResult, ResultGroup};
pub use search::{FilterState, SearchResult, SortDirection, SortKey};

use crate::config::EngineConfig;
use crate::error::{Error, OpenFailureReason};
use crate::model::field::default_field_types;
use crate::model::{Entry, EntryId, Folder, Tag, TagId};
use crate::path::CompiledIgnore;
use crate::refresh::{ExternalScanner, RefreshTracker};
use crate::storage::Storage;
use crate::thumb_cache::ThumbCache;
use crate::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const LIBRARY_SUBDIR: &str = ".tagstudio";
const DB_FILENAME: &str = "ts_library.sqlite";

/// The library engine facade. One instance per opened library directory.
pub struct Library {
    storage: Storage,
    root: PathBuf,
    folder: Folder,
    config: EngineConfig,
}

impl Library {
    /// Open the library rooted at `dir`, creating `.tagstudio/` and the
    /// database on first open (`spec.md` §4.E `open`). Fails with
    /// [`Error::OpenFailure`] if `dir` is not a readable directory, or if
    /// the stored schema is newer than this binary understands.
    pub fn open(dir: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(dir).map_err(|_| Error::OpenFailure {
            reason: OpenFailureReason::NotReadable,
        })?;
        if !metadata.is_dir() {
            return Err(Error::OpenFailure {
                reason: OpenFailureReason::NotReadable,
            });
        }

        let tagstudio_dir = dir.join(LIBRARY_SUBDIR);
        std::fs::create_dir_all(&tagstudio_dir).map_err(|e| Error::io_failure(&tagstudio_dir, e))?;

        let config = EngineConfig::load(dir);
        let storage = Storage::open(&tagstudio_dir.join(DB_FILENAME))?;

        let folder = match storage.get_folder()? {
            Some(folder) => folder,
            None => {
                let folder = storage.create_folder(dir)?;
                storage.seed_field_types(&default_field_types())?;
                folder
            }
        };

        Ok(Self {
            storage,
            root: dir.to_path_buf(),
            folder,
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Insert entries from paths relative to the library root. Duplicate
    /// `(folder, path)` rows are rejected per-row, yielding `None` in the
    /// matching output slot (`spec.md` §4.E).
    pub fn add_entries(&self, relative_paths: &[PathBuf]) -> Result<Vec<Option<EntryId>>> {
        let now = chrono::Utc::now();
        let entries: Vec<Entry> = relative_paths
            .iter()
            .map(|p| Entry::new(self.folder.id, p, now))
            .collect();
        self.storage.insert_entries(&entries)
    }

    pub fn remove_entries(&self, ids: &[EntryId]) -> Result<()> {
        self.storage.remove_entries(ids)
    }

    pub fn update_entry_path(&self, id: EntryId, new_path: &Path) -> Result<bool> {
        let posix = crate::path::normalize::to_posix_string(new_path);
        let suffix = crate::path::normalize::posix_suffix(&posix);
        self.storage.update_entry_path(id, &posix, &suffix)
    }

    pub fn all_paths(&self) -> Result<Vec<(EntryId, String)>> {
        self.storage.all_paths()
    }

    pub fn get_entry(&self, id: EntryId) -> Result<Entry> {
        self.storage.get_entry(id)
    }

    pub fn add_tag(&self, tag: &Tag) -> Result<TagId> {
        crate::tags::add_tag(&self.storage, tag)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update_tag(
        &self,
        id: TagId,
        name: &str,
        shorthand: Option<&str>,
        is_category: bool,
        parents: &[TagId],
        alias_ids: &[i64],
        alias_names: &[String],
    ) -> Result<()> {
        crate::tags::update_tag(
            &self.storage,
            id,
            name,
            shorthand,
            is_category,
            parents,
            alias_ids,
            alias_names,
        )
    }

    pub fn remove_tag(&self, id: TagId) -> Result<()> {
        crate::tags::remove_tag(&self.storage, id)
    }

    pub fn get_tag(&self, id: TagId) -> Result<Tag> {
        self.storage.get_tag(id)
    }

    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        self.storage.list_tags()
    }

    pub fn add_entry_tag(&self, entry_id: EntryId, tag_id: TagId) -> Result<()> {
        self.storage.add_entry_tag(entry_id, tag_id)
    }

    pub fn remove_entry_tag(&self, entry_id: EntryId, tag_id: TagId) -> Result<()> {
        self.storage.remove_entry_tag(entry_id, tag_id)
    }

    /// Which of `entry_ids` bear each of `tag_ids` (`spec.md` §4.E).
    pub fn get_tag_entries(
        &self,
        tag_ids: &[TagId],
        entry_ids: &[EntryId],
    ) -> Result<HashMap<TagId, Vec<EntryId>>> {
        self.storage.get_tag_entries(tag_ids, entry_ids)
    }

    pub fn search_library(&self, filter: &FilterState) -> Result<SearchResult> {
        search::search_library(&self.storage, filter)
    }

    pub fn group(&self, entry_ids: &[EntryId], criteria: &GroupCriteria) -> Result<GroupedResult> {
        group::group(&self.storage, entry_ids, criteria)
    }

    /// Build a [`RefreshTracker`] for this library's root, loading ignore
    /// patterns from `Preferences` (falling back to the engine config's
    /// defaults for a library that has never set the preference).
    pub fn refresh_tracker(&self) -> Result<RefreshTracker> {
        RefreshTracker::new(self.storage.clone(), self.folder.id, self.root.clone())
    }

    /// Compile this library's ignore patterns (`spec.md` §4.A, §6:
    /// `.compiled_ignore`).
    pub fn compiled_ignore(&self) -> Result<CompiledIgnore> {
        let prefs = self.storage.load_preferences()?;
        let patterns = prefs
            .get_string_list(crate::model::preferences::IGNORE_EXTENSION_LIST_KEY)
            .unwrap_or_else(|| self.config.default_ignore_patterns.clone());
        CompiledIgnore::compile(&patterns)
    }

    /// The external scanner strategy configured for this library
    /// (`spec.md` §4.F.1, §9).
    pub fn external_scanner(&self) -> ExternalScanner {
        ExternalScanner::new(self.config.scanner_binary.clone())
    }

    pub fn thumb_cache(&self) -> Result<ThumbCache> {
        ThumbCache::open(
            &self.root.join(LIBRARY_SUBDIR).join("thumb_cache"),
            self.config.thumb_cache_folder_mb,
            self.config.thumb_cache_total_mb,
        )
    }
}
