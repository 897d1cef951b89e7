//! Tag, alias, namespace, and color-group storage (`spec.md` §3, §4.C).

use super::connection::Storage;
use crate::error::{Error, NotFoundKind, Result};
use crate::model::{Entry, EntryId, Namespace, Tag, TagAlias, TagColorGroup, TagId};
use rusqlite::{params, OptionalExtension};

impl Storage {
    pub fn insert_tag(&self, tag: &Tag) -> Result<TagId> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO tag (name, shorthand, is_category, color_namespace, color_slug, icon)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                tag.name,
                tag.shorthand,
                tag.is_category,
                tag.color.as_ref().map(|c| &c.0),
                tag.color.as_ref().map(|c| &c.1),
                tag.icon,
            ],
        )?;
        let id = TagId(tx.last_insert_rowid());
        for parent in &tag.parents {
            tx.execute(
                "INSERT INTO tag_parent (child_id, parent_id) VALUES (?1, ?2)",
                (id.0, parent.0),
            )?;
        }
        tx.commit()?;
        Ok(id)
    }

    pub fn get_tag(&self, id: TagId) -> Result<Tag> {
        let conn = self.lock();
        let mut tag = conn
            .query_row(
                "SELECT id, name, shorthand, is_category, color_namespace, color_slug, icon
                 FROM tag WHERE id = ?1",
                (id.0,),
                row_to_tag,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Error::not_found(NotFoundKind::Tag, id),
                other => Error::Database(other),
            })?;
        let mut stmt = conn.prepare("SELECT parent_id FROM tag_parent WHERE child_id = ?1")?;
        tag.parents = stmt
            .query_map((id.0,), |row| Ok(TagId(row.get(0)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tag)
    }

    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, shorthand, is_category, color_namespace, color_slug, icon FROM tag",
        )?;
        let mut tags = stmt
            .query_map((), row_to_tag)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for tag in &mut tags {
            let mut stmt = conn.prepare("SELECT parent_id FROM tag_parent WHERE child_id = ?1")?;
            tag.parents = stmt
                .query_map((tag.id.0,), |row| Ok(TagId(row.get(0)?)))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
        }
        Ok(tags)
    }

    /// Update a tag's scalar fields, parent set, and alias set. Alias
    /// updates are diff-based (`spec.md` §4.C): `alias_names` is the new
    /// complete set, keyed against `alias_ids` for rows that already
    /// exist; anything not matched by id is inserted, anything existing
    /// but absent from `alias_ids` is deleted.
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
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "UPDATE tag SET name = ?1, shorthand = ?2, is_category = ?3 WHERE id = ?4",
            (name, shorthand, is_category, id.0),
        )?;

        tx.execute("DELETE FROM tag_parent WHERE child_id = ?1", (id.0,))?;
        for parent in parents {
            tx.execute(
                "INSERT INTO tag_parent (child_id, parent_id) VALUES (?1, ?2)",
                (id.0, parent.0),
            )?;
        }

        let existing_ids: Vec<i64> = {
            let mut stmt = tx.prepare("SELECT id FROM tag_alias WHERE tag_id = ?1")?;
            stmt.query_map((id.0,), |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?
        };
        for existing in &existing_ids {
            if !alias_ids.contains(existing) {
                tx.execute("DELETE FROM tag_alias WHERE id = ?1", (existing,))?;
            }
        }
        for (i, name) in alias_names.iter().enumerate() {
            match alias_ids.get(i) {
                Some(alias_id) if existing_ids.contains(alias_id) => {
                    tx.execute(
                        "UPDATE tag_alias SET name = ?1 WHERE id = ?2",
                        (name, alias_id),
                    )?;
                }
                _ => {
                    tx.execute(
                        "INSERT INTO tag_alias (tag_id, name) VALUES (?1, ?2)",
                        (id.0, name),
                    )?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Deletion cascades to aliases, parent edges, and entry-tag joins
    /// via `ON DELETE CASCADE`.
    pub fn remove_tag(&self, id: TagId) -> Result<()> {
        let conn = self.lock();
        conn.execute("DELETE FROM tag WHERE id = ?1", (id.0,))?;
        Ok(())
    }

    pub fn tag_aliases(&self, id: TagId) -> Result<Vec<TagAlias>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT id, tag_id, name FROM tag_alias WHERE tag_id = ?1")?;
        let rows = stmt
            .query_map((id.0,), |row| {
                Ok(TagAlias {
                    id: row.get(0)?,
                    tag_id: TagId(row.get(1)?),
                    name: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Direct parent ids of a tag (one hop, not the transitive closure:
    /// that is computed by [`crate::tags::closure`]).
    pub fn tag_parents(&self, id: TagId) -> Result<Vec<TagId>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT parent_id FROM tag_parent WHERE child_id = ?1")?;
        let rows = stmt
            .query_map((id.0,), |row| Ok(TagId(row.get(0)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Direct child ids of a tag, used by `ByTag` grouping (`spec.md` §4.E).
    pub fn tag_children(&self, id: TagId) -> Result<Vec<TagId>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT child_id FROM tag_parent WHERE parent_id = ?1")?;
        let rows = stmt
            .query_map((id.0,), |row| Ok(TagId(row.get(0)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn add_entry_tag(&self, entry_id: EntryId, tag_id: TagId) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT OR IGNORE INTO entry_tag (entry_id, tag_id) VALUES (?1, ?2)",
            (entry_id.0, tag_id.0),
        )?;
        Ok(())
    }

    pub fn remove_entry_tag(&self, entry_id: EntryId, tag_id: TagId) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            "DELETE FROM entry_tag WHERE entry_id = ?1 AND tag_id = ?2",
            (entry_id.0, tag_id.0),
        )?;
        Ok(())
    }

    pub fn entry_tags(&self, entry_id: EntryId) -> Result<Vec<TagId>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT tag_id FROM entry_tag WHERE entry_id = ?1")?;
        let rows = stmt
            .query_map((entry_id.0,), |row| Ok(TagId(row.get(0)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Entries with no tag joins at all, used by the `untagged` special
    /// constraint (`spec.md` §4.D.3).
    pub fn untagged_entries(&self) -> Result<Vec<EntryId>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id FROM entry WHERE id NOT IN (SELECT entry_id FROM entry_tag)",
        )?;
        let rows = stmt
            .query_map((), |row| Ok(EntryId(row.get(0)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Which of `entry_ids` bear each of `tag_ids` (`spec.md` §4.E
    /// `get_tag_entries`).
    pub fn get_tag_entries(
        &self,
        tag_ids: &[TagId],
        entry_ids: &[EntryId],
    ) -> Result<std::collections::HashMap<TagId, Vec<EntryId>>> {
        let conn = self.lock();
        let mut result = std::collections::HashMap::new();
        for tag_id in tag_ids {
            let mut stmt = conn.prepare("SELECT entry_id FROM entry_tag WHERE tag_id = ?1")?;
            let bearers: std::collections::HashSet<i64> = stmt
                .query_map((tag_id.0,), |row| row.get(0))?
                .collect::<std::result::Result<_, _>>()?;
            let matched: Vec<EntryId> = entry_ids
                .iter()
                .filter(|e| bearers.contains(&e.0))
                .copied()
                .collect();
            result.insert(*tag_id, matched);
        }
        Ok(result)
    }

    pub fn insert_namespace(&self, namespace: &Namespace) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO namespace (slug, name) VALUES (?1, ?2)",
            (&namespace.slug, &namespace.name),
        )?;
        Ok(())
    }

    pub fn remove_namespace(&self, slug: &str) -> Result<()> {
        if crate::model::is_reserved_namespace(slug) {
            return Err(Error::ReservedNamespace(slug.to_string()));
        }
        let conn = self.lock();
        conn.execute("DELETE FROM namespace WHERE slug = ?1", (slug,))?;
        Ok(())
    }

    pub fn insert_color_group(&self, group: &TagColorGroup) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO tag_color_group (namespace, slug, name, primary_color, secondary_color, color_border)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &group.namespace,
                &group.slug,
                &group.name,
                &group.primary,
                &group.secondary,
                group.color_border,
            ),
        )?;
        Ok(())
    }
}

fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
    let color_namespace: Option<String> = row.get(4)?;
    let color_slug: Option<String> = row.get(5)?;
    Ok(Tag {
        id: TagId(row.get(0)?),
        name: row.get(1)?,
        shorthand: row.get(2)?,
        is_category: row.get(3)?,
        parents: Vec::new(),
        color: color_namespace.zip(color_slug),
        icon: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_update_is_diff_based() {
        let storage = Storage::open_in_memory().unwrap();
        let id = storage.insert_tag(&Tag::new("red")).unwrap();
        storage
            .update_tag(id, "red", None, false, &[], &[], &["scarlet".to_string()])
            .unwrap();
        let aliases = storage.tag_aliases(id).unwrap();
        assert_eq!(aliases.len(), 1);
        let alias_id = aliases[0].id;

        storage
            .update_tag(
                id,
                "red",
                None,
                false,
                &[],
                &[alias_id],
                &["crimson".to_string(), "rouge".to_string()],
            )
            .unwrap();
        let aliases = storage.tag_aliases(id).unwrap();
        let names: Vec<&str> = aliases.iter().map(|a| a.name.as_str()).collect();
        assert!(names.contains(&"crimson"));
        assert!(names.contains(&"rouge"));
        assert!(!names.contains(&"scarlet"));
    }

    #[test]
    fn remove_tag_cascades_aliases_and_parents() {
        let storage = Storage::open_in_memory().unwrap();
        let parent = storage.insert_tag(&Tag::new("color")).unwrap();
        let mut child = Tag::new("red");
        child.parents = vec![parent];
        let child_id = storage.insert_tag(&child).unwrap();
        storage
            .update_tag(child_id, "red", None, false, &[parent], &[], &["scarlet".into()])
            .unwrap();

        storage.remove_tag(child_id).unwrap();
        let aliases = storage.tag_aliases(child_id).unwrap();
        assert!(aliases.is_empty());
        let children_of_parent = storage.tag_children(parent).unwrap();
        assert!(children_of_parent.is_empty());
    }

    #[test]
    fn reserved_namespace_rejects_removal() {
        let storage = Storage::open_in_memory().unwrap();
        let ns = Namespace::new("tagstudio-builtin", "Built-in");
        storage.insert_namespace(&ns).unwrap();
        let result = storage.remove_namespace("tagstudio-builtin");
        assert!(matches!(result, Err(Error::ReservedNamespace(_))));
    }

    #[test]
    fn untagged_entries_excludes_tagged() {
        let storage = Storage::open_in_memory().unwrap();
        let conn = storage.lock();
        conn.execute(
            "INSERT INTO folder (absolute_path, uuid) VALUES ('/tmp', 'u')",
            (),
        )
        .unwrap();
        drop(conn);
        let now = chrono::Utc::now();
        let e1 = Entry::new(1, &std::path::PathBuf::from("a.txt"), now);
        let e2 = Entry::new(1, &std::path::PathBuf::from("b.txt"), now);
        let ids = storage.insert_entries(&[e1, e2]).unwrap();
        let tag_id = storage.insert_tag(&Tag::new("x")).unwrap();
        storage.add_entry_tag(ids[0].unwrap(), tag_id).unwrap();
        let untagged = storage.untagged_entries().unwrap();
        assert_eq!(untagged, vec![ids[1].unwrap()]);
    }
}
