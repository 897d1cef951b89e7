//! Entry CRUD (`spec.md` §3, §4.E).

use super::connection::Storage;
use crate::error::{Error, Result};
use crate::model::{Entry, EntryId};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::OptionalExtension;

impl Storage {
    /// Insert a batch of not-yet-persisted entries. Each row is attempted
    /// independently inside one transaction: a `(folder_id, path)` clash
    /// on one row does not abort the others, matching `spec.md` §4.E
    /// ("duplicate rejected per-row").
    pub fn insert_entries(&self, entries: &[Entry]) -> Result<Vec<Option<EntryId>>> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(entries.len());
        for entry in entries {
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM entry WHERE folder_id = ?1 AND path = ?2",
                    (entry.folder_id, &entry.path),
                    |row| row.get(0),
                )
                .optional()?;
            if existing.is_some() {
                ids.push(None);
                continue;
            }
            tx.execute(
                "INSERT INTO entry (folder_id, path, suffix, date_added, date_created, date_modified)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (
                    entry.folder_id,
                    &entry.path,
                    &entry.suffix,
                    entry.date_added.to_rfc3339(),
                    entry.date_created.to_rfc3339(),
                    entry.date_modified.to_rfc3339(),
                ),
            )?;
            ids.push(Some(EntryId(tx.last_insert_rowid())));
        }
        tx.commit()?;
        Ok(ids)
    }

    /// Remove entries by id. Field instances and tag joins cascade via
    /// `ON DELETE CASCADE` foreign keys (`spec.md` §3).
    pub fn remove_entries(&self, ids: &[EntryId]) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        for id in ids {
            tx.execute("DELETE FROM entry WHERE id = ?1", (id.0,))?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Rewrite an entry's path. Returns `false`, leaving the row
    /// untouched, if `new_path` is already taken within the same folder.
    pub fn update_entry_path(&self, id: EntryId, new_path: &str, new_suffix: &str) -> Result<bool> {
        let conn = self.lock();
        let folder_id: i64 = conn.query_row(
            "SELECT folder_id FROM entry WHERE id = ?1",
            (id.0,),
            |row| row.get(0),
        )?;
        let clash: Option<i64> = conn
            .query_row(
                "SELECT id FROM entry WHERE folder_id = ?1 AND path = ?2 AND id != ?3",
                (folder_id, new_path, id.0),
                |row| row.get(0),
            )
            .optional()?;
        if clash.is_some() {
            return Ok(false);
        }
        conn.execute(
            "UPDATE entry SET path = ?1, suffix = ?2 WHERE id = ?3",
            (new_path, new_suffix, id.0),
        )?;
        Ok(true)
    }

    /// Fetch a single entry by id.
    pub fn get_entry(&self, id: EntryId) -> Result<Entry> {
        let conn = self.lock();
        conn.query_row(
            "SELECT id, folder_id, path, suffix, date_added, date_created, date_modified
             FROM entry WHERE id = ?1",
            (id.0,),
            row_to_entry,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                Error::not_found(crate::error::NotFoundKind::Entry, id)
            }
            other => Error::Database(other),
        })
    }

    /// All `(id, path)` pairs, ordered by id, for diffing against a
    /// directory scan (`spec.md` §4.F).
    pub fn all_paths(&self) -> Result<Vec<(EntryId, String)>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT id, path FROM entry ORDER BY id ASC")?;
        let rows = stmt
            .query_map((), |row| {
                Ok((EntryId(row.get(0)?), row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

pub(crate) fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: EntryId(row.get(0)?),
        folder_id: row.get(1)?,
        path: row.get(2)?,
        suffix: row.get(3)?,
        date_added: parse_rfc3339(row, 4)?,
        date_created: parse_rfc3339(row, 5)?,
        date_modified: parse_rfc3339(row, 6)?,
    })
}

fn parse_rfc3339(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| Ok(Utc.timestamp_opt(0, 0).single().unwrap()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn storage_with_folder() -> (Storage, i64) {
        let storage = Storage::open_in_memory().unwrap();
        let folder_id = {
            let conn = storage.lock();
            conn.execute(
                "INSERT INTO folder (absolute_path, uuid) VALUES (?1, ?2)",
                ("/tmp/lib", uuid::Uuid::new_v4().to_string()),
            )
            .unwrap();
            conn.last_insert_rowid()
        };
        (storage, folder_id)
    }

    #[test]
    fn duplicate_path_is_rejected_per_row() {
        let (storage, folder_id) = storage_with_folder();
        let now = Utc::now();
        let a = Entry::new(folder_id, &PathBuf::from("a.txt"), now);
        let b = Entry::new(folder_id, &PathBuf::from("a.txt"), now);
        let c = Entry::new(folder_id, &PathBuf::from("b.txt"), now);
        let results = storage.insert_entries(&[a, b, c]).unwrap();
        assert!(results[0].is_some());
        assert!(results[1].is_none());
        assert!(results[2].is_some());
    }

    #[test]
    fn update_entry_path_rejects_collision() {
        let (storage, folder_id) = storage_with_folder();
        let now = Utc::now();
        let a = Entry::new(folder_id, &PathBuf::from("a.txt"), now);
        let b = Entry::new(folder_id, &PathBuf::from("b.txt"), now);
        let ids = storage.insert_entries(&[a, b]).unwrap();
        let id_a = ids[0].unwrap();
        let ok = storage.update_entry_path(id_a, "c.txt", "txt").unwrap();
        assert!(ok);
        let blocked = storage.update_entry_path(id_a, "b.txt", "txt").unwrap();
        assert!(!blocked);
    }

    #[test]
    fn remove_entries_cascades_to_tags() {
        let (storage, folder_id) = storage_with_folder();
        let now = Utc::now();
        let a = Entry::new(folder_id, &PathBuf::from("a.txt"), now);
        let ids = storage.insert_entries(&[a]).unwrap();
        let id_a = ids[0].unwrap();
        let tag_id = storage.insert_tag(&crate::model::Tag::new("red")).unwrap();
        storage.add_entry_tag(id_a, tag_id).unwrap();
        storage.remove_entries(&[id_a]).unwrap();
        let conn = storage.lock();
        let count: i64 = conn
            .query_row("SELECT count(*) FROM entry_tag", (), |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
