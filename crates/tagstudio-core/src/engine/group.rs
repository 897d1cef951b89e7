//! Grouping strategies (`spec.md` §4.E): bucket a set of entries by tag
//! hierarchy or by file type.

use crate::model::{EntryId, TagId};
use crate::storage::Storage;
use crate::tags::descendant_closure;
use crate::Result;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub enum GroupCriteria {
    /// One bucket per direct child tag of `parent_tag_id`, in the
    /// descendant closure. An entry can appear in multiple buckets.
    ByTag(TagId),
    /// One bucket per lower-case suffix.
    ByFiletype,
}

/// A single bucket in a [`GroupedResult`]. `key` is `Tag(id)` for tag
/// grouping, `Filetype(suffix)` for filetype grouping.
#[derive(Debug, Clone)]
pub struct ResultGroup {
    pub key: GroupKey,
    pub entry_ids: Vec<EntryId>,
    pub is_special: bool,
    pub special_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKey {
    Tag(TagId),
    Filetype(String),
}

#[derive(Debug, Clone)]
pub struct GroupedResult {
    pub total_count: usize,
    pub groups: Vec<ResultGroup>,
}

pub fn group(storage: &Storage, entry_ids: &[EntryId], criteria: &GroupCriteria) -> Result<GroupedResult> {
    match criteria {
        GroupCriteria::ByTag(parent) => group_by_tag(storage, entry_ids, *parent),
        GroupCriteria::ByFiletype => group_by_filetype(storage, entry_ids),
    }
}

/// Buckets are the direct children of `parent`, each expanded through its
/// own descendant closure so an entry bearing any descendant of a child
/// still lands in that child's bucket (`spec.md` §4.E `ByTag`). Non-empty
/// buckets are sorted alphabetically by tag name (case-insensitive);
/// entries bearing none of the child tags fall into a `"No Tag"` bucket.
fn group_by_tag(storage: &Storage, entry_ids: &[EntryId], parent: TagId) -> Result<GroupedResult> {
    let children = storage.tag_children(parent)?;

    let mut entry_tags: HashMap<EntryId, std::collections::HashSet<TagId>> = HashMap::new();
    for &id in entry_ids {
        entry_tags.insert(id, storage.entry_tags(id)?.into_iter().collect());
    }

    let mut named_buckets: Vec<(String, TagId, Vec<EntryId>)> = Vec::new();
    let mut bucketed: std::collections::HashSet<EntryId> = std::collections::HashSet::new();
    for &child in &children {
        let closure = descendant_closure(storage, child)?;
        let tag = storage.get_tag(child)?;
        let members: Vec<EntryId> = entry_ids
            .iter()
            .copied()
            .filter(|id| {
                entry_tags
                    .get(id)
                    .is_some_and(|tags| tags.intersection(&closure).next().is_some())
            })
            .collect();
        if !members.is_empty() {
            bucketed.extend(&members);
            named_buckets.push((tag.name.to_lowercase(), child, members));
        }
    }
    named_buckets.sort_by(|a, b| a.0.cmp(&b.0));

    let mut groups: Vec<ResultGroup> = named_buckets
        .into_iter()
        .map(|(_, tag_id, members)| ResultGroup {
            key: GroupKey::Tag(tag_id),
            entry_ids: members,
            is_special: false,
            special_label: None,
        })
        .collect();

    let untagged: Vec<EntryId> = entry_ids
        .iter()
        .copied()
        .filter(|id| !bucketed.contains(id))
        .collect();
    if !untagged.is_empty() {
        groups.push(ResultGroup {
            key: GroupKey::Tag(parent),
            entry_ids: untagged,
            is_special: true,
            special_label: Some("No Tag".to_string()),
        });
    }

    Ok(GroupedResult {
        total_count: entry_ids.len(),
        groups,
    })
}

/// Buckets by lower-case suffix, sorted ascending; empty suffix bucketed
/// as `"(no extension)"` (`spec.md` §4.E `ByFiletype`).
fn group_by_filetype(storage: &Storage, entry_ids: &[EntryId]) -> Result<GroupedResult> {
    let mut buckets: HashMap<String, Vec<EntryId>> = HashMap::new();
    for &id in entry_ids {
        let entry = storage.get_entry(id)?;
        buckets.entry(entry.suffix.clone()).or_default().push(id);
    }

    let mut suffixes: Vec<String> = buckets.keys().cloned().collect();
    suffixes.sort();

    let groups = suffixes
        .into_iter()
        .map(|suffix| {
            let entry_ids = buckets.remove(&suffix).unwrap_or_default();
            let is_special = suffix.is_empty();
            ResultGroup {
                key: GroupKey::Filetype(suffix),
                entry_ids,
                is_special,
                special_label: is_special.then(|| "(no extension)".to_string()),
            }
        })
        .collect();

    Ok(GroupedResult {
        total_count: entry_ids.len(),
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entry, Tag};
    use std::path::PathBuf;

    fn storage_with_entries(paths: &[&str]) -> (Storage, Vec<EntryId>) {
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
        let ids = storage
            .insert_entries(&entries)
            .unwrap()
            .into_iter()
            .map(Option::unwrap)
            .collect();
        (storage, ids)
    }

    #[test]
    fn group_by_filetype_buckets_by_suffix_with_no_extension_special() {
        let (storage, ids) = storage_with_entries(&["a.txt", "b.txt", "README"]);
        let result = group(&storage, &ids, &GroupCriteria::ByFiletype).unwrap();
        assert_eq!(result.total_count, 3);
        assert_eq!(result.groups.len(), 2);
        assert_eq!(result.groups[0].key, GroupKey::Filetype("txt".to_string()));
        assert_eq!(result.groups[0].entry_ids.len(), 2);
        assert!(result.groups[1].is_special);
        assert_eq!(result.groups[1].special_label.as_deref(), Some("(no extension)"));
    }

    #[test]
    fn group_by_tag_multi_buckets_and_no_tag_bucket() {
        let (storage, ids) = storage_with_entries(&["a.txt", "b.txt", "c.txt"]);
        let shape = storage.insert_tag(&Tag::new("shape")).unwrap();
        let mut square = Tag::new("square");
        square.parents = vec![shape];
        let square_id = storage.insert_tag(&square).unwrap();
        let mut circle = Tag::new("circle");
        circle.parents = vec![shape];
        let circle_id = storage.insert_tag(&circle).unwrap();

        storage.add_entry_tag(ids[0], square_id).unwrap();
        storage.add_entry_tag(ids[1], circle_id).unwrap();
        storage.add_entry_tag(ids[1], square_id).unwrap();

        let result = group(&storage, &ids, &GroupCriteria::ByTag(shape)).unwrap();
        assert_eq!(result.total_count, 3);
        // "circle" sorts before "square" alphabetically.
        assert_eq!(result.groups[0].key, GroupKey::Tag(circle_id));
        assert_eq!(result.groups[0].entry_ids, vec![ids[1]]);
        assert_eq!(result.groups[1].key, GroupKey::Tag(square_id));
        assert_eq!(result.groups[1].entry_ids, vec![ids[0], ids[1]]);
        let no_tag = result.groups.last().unwrap();
        assert!(no_tag.is_special);
        assert_eq!(no_tag.entry_ids, vec![ids[2]]);
    }
}
