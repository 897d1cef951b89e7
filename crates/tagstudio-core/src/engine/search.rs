//! Search execution (`spec.md` §4.D.6): parse, compile, evaluate per
//! entry, sort, and paginate.

use crate::model::{Entry, EntryId, TagId};
use crate::query::{compile, evaluate, parse};
use crate::storage::Storage;
use crate::Result;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Path,
    DateAdded,
    DateCreated,
    DateModified,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A search request (`spec.md` §4.D.6).
#[derive(Debug, Clone)]
pub struct FilterState {
    pub query: String,
    pub page: u32,
    pub page_size: u32,
    pub sort_key: SortKey,
    pub sort_dir: SortDirection,
}

/// A search response: the exact cardinality of the predicate result, plus
/// one zero-indexed page of `(id, path)` pairs.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub total_count: usize,
    pub items: Vec<(EntryId, String)>,
}

/// Run `filter` against every entry in `storage`. An empty query matches
/// everything (`spec.md` §8: "An empty query returns `total_count =
/// |entries|`").
pub fn search_library(storage: &Storage, filter: &FilterState) -> Result<SearchResult> {
    let ast = parse(&filter.query)?;
    let predicate = compile(&ast, storage)?;

    let mut matches: Vec<Entry> = Vec::new();
    for (id, _) in storage.all_paths()? {
        let entry = storage.get_entry(id)?;
        let tag_ids: HashSet<TagId> = storage.entry_tags(id)?.into_iter().collect();
        if evaluate(&predicate, &entry, &tag_ids) {
            matches.push(entry);
        }
    }

    sort_entries(&mut matches, filter.sort_key, filter.sort_dir);

    let total_count = matches.len();
    let start = (filter.page as usize).saturating_mul(filter.page_size as usize);
    let items = matches
        .into_iter()
        .skip(start)
        .take(filter.page_size as usize)
        .map(|e| (e.id, e.path))
        .collect();

    Ok(SearchResult { total_count, items })
}

/// Ties are broken by `entry.id` ascending regardless of `sort_dir`
/// (`spec.md` §4.D.6).
fn sort_entries(entries: &mut [Entry], key: SortKey, dir: SortDirection) {
    entries.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Path => a.path.cmp(&b.path),
            SortKey::DateAdded => a.date_added.cmp(&b.date_added),
            SortKey::DateCreated => a.date_created.cmp(&b.date_created),
            SortKey::DateModified => a.date_modified.cmp(&b.date_modified),
            SortKey::Name => a.basename().cmp(b.basename()),
        };
        let ordering = match dir {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;
    use std::path::PathBuf;

    fn storage_with_entries(paths: &[&str]) -> Storage {
        let storage = Storage::open_in_memory().unwrap();
        let conn = storage.lock();
        conn.execute(
            "INSERT INTO folder (absolute_path, uuid) VALUES ('/tmp', 'u')",
            (),
        )
        .unwrap();
        drop(conn);
        let now = chrono::Utc::now();
        let entries: Vec<Entry> = paths
            .iter()
            .map(|p| Entry::new(1, &PathBuf::from(p), now))
            .collect();
        storage.insert_entries(&entries).unwrap();
        storage
    }

    #[test]
    fn empty_query_matches_every_entry() {
        let storage = storage_with_entries(&["b.txt", "a.txt"]);
        let filter = FilterState {
            query: String::new(),
            page: 0,
            page_size: 10,
            sort_key: SortKey::Path,
            sort_dir: SortDirection::Ascending,
        };
        let result = search_library(&storage, &filter).unwrap();
        assert_eq!(result.total_count, 2);
        assert_eq!(result.items[0].1, "a.txt");
        assert_eq!(result.items[1].1, "b.txt");
    }

    #[test]
    fn pagination_slices_the_sorted_result() {
        let storage = storage_with_entries(&["c.txt", "a.txt", "b.txt"]);
        let filter = FilterState {
            query: String::new(),
            page: 1,
            page_size: 1,
            sort_key: SortKey::Path,
            sort_dir: SortDirection::Ascending,
        };
        let result = search_library(&storage, &filter).unwrap();
        assert_eq!(result.total_count, 3);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].1, "b.txt");
    }

    #[test]
    fn tag_query_filters_down_to_bearers() {
        let storage = storage_with_entries(&["a.txt", "b.txt"]);
        let tag_id = storage.insert_tag(&Tag::new("red")).unwrap();
        let ids = storage.all_paths().unwrap();
        storage.add_entry_tag(ids[0].0, tag_id).unwrap();

        let filter = FilterState {
            query: "red".to_string(),
            page: 0,
            page_size: 10,
            sort_key: SortKey::Path,
            sort_dir: SortDirection::Ascending,
        };
        let result = search_library(&storage, &filter).unwrap();
        assert_eq!(result.total_count, 1);
    }
}
