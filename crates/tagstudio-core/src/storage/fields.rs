//! Field type catalog and per-entry field instance storage (`spec.md` §3).
//!
//! A `TAGS`-typed field has no value row of its own: it is realised
//! entirely through [`super::tags`]'s entry-tag joins.

use super::connection::Storage;
use crate::error::{Error, NotFoundKind, Result};
use crate::model::field::{FieldInstance, FieldInstanceValue};
use crate::model::{EntryId, FieldType, FieldTypeKind};
use chrono::{DateTime, Utc};

impl Storage {
    /// Seed the field type catalog. Called once at library creation.
    pub fn seed_field_types(&self, types: &[FieldType]) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        for ty in types {
            tx.execute(
                "INSERT OR IGNORE INTO field_type (key, display_name, kind, is_default, position)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (
                    &ty.key,
                    &ty.display_name,
                    ty.kind.as_str(),
                    ty.is_default,
                    ty.position,
                ),
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn list_field_types(&self) -> Result<Vec<FieldType>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT key, display_name, kind, is_default, position FROM field_type ORDER BY position ASC",
        )?;
        let rows = stmt
            .query_map((), |row| {
                let kind_str: String = row.get(2)?;
                Ok(FieldType {
                    key: row.get(0)?,
                    display_name: row.get(1)?,
                    kind: FieldTypeKind::from_str(&kind_str).unwrap_or(FieldTypeKind::TextLine),
                    is_default: row.get(3)?,
                    position: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_field_type(&self, key: &str) -> Result<FieldType> {
        self.list_field_types()?
            .into_iter()
            .find(|t| t.key == key)
            .ok_or_else(|| Error::not_found(NotFoundKind::FieldType, key))
    }

    /// Write a field instance, replacing any existing value for the same
    /// `(entry_id, type_key)`. Routed to the value table matching the
    /// field type's kind.
    pub fn set_field_instance(&self, instance: &FieldInstance) -> Result<()> {
        let conn = self.lock();
        match &instance.value {
            FieldInstanceValue::Text(value) => conn.execute(
                "INSERT INTO field_text (entry_id, type_key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(entry_id, type_key) DO UPDATE SET value = excluded.value",
                (instance.entry_id.0, &instance.type_key, value),
            )?,
            FieldInstanceValue::DateTime(value) => conn.execute(
                "INSERT INTO field_datetime (entry_id, type_key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(entry_id, type_key) DO UPDATE SET value = excluded.value",
                (instance.entry_id.0, &instance.type_key, value.to_rfc3339()),
            )?,
            FieldInstanceValue::Boolean(value) => conn.execute(
                "INSERT INTO field_boolean (entry_id, type_key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(entry_id, type_key) DO UPDATE SET value = excluded.value",
                (instance.entry_id.0, &instance.type_key, value),
            )?,
        };
        Ok(())
    }

    pub fn remove_field_instance(&self, entry_id: EntryId, type_key: &str) -> Result<()> {
        let conn = self.lock();
        conn.execute(
            "DELETE FROM field_text WHERE entry_id = ?1 AND type_key = ?2",
            (entry_id.0, type_key),
        )?;
        conn.execute(
            "DELETE FROM field_datetime WHERE entry_id = ?1 AND type_key = ?2",
            (entry_id.0, type_key),
        )?;
        conn.execute(
            "DELETE FROM field_boolean WHERE entry_id = ?1 AND type_key = ?2",
            (entry_id.0, type_key),
        )?;
        Ok(())
    }

    /// All field instances attached to an entry, across all three value
    /// tables.
    pub fn entry_field_instances(&self, entry_id: EntryId) -> Result<Vec<FieldInstance>> {
        let conn = self.lock();
        let mut instances = Vec::new();

        let mut stmt =
            conn.prepare("SELECT type_key, value FROM field_text WHERE entry_id = ?1")?;
        for row in stmt.query_map((entry_id.0,), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })? {
            let (type_key, value) = row?;
            instances.push(FieldInstance {
                entry_id,
                type_key,
                value: FieldInstanceValue::Text(value),
            });
        }

        let mut stmt =
            conn.prepare("SELECT type_key, value FROM field_datetime WHERE entry_id = ?1")?;
        for row in stmt.query_map((entry_id.0,), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })? {
            let (type_key, value) = row?;
            let parsed: DateTime<Utc> = DateTime::parse_from_rfc3339(&value)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());
            instances.push(FieldInstance {
                entry_id,
                type_key,
                value: FieldInstanceValue::DateTime(parsed),
            });
        }

        let mut stmt =
            conn.prepare("SELECT type_key, value FROM field_boolean WHERE entry_id = ?1")?;
        for row in stmt.query_map((entry_id.0,), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
        })? {
            let (type_key, value) = row?;
            instances.push(FieldInstance {
                entry_id,
                type_key,
                value: FieldInstanceValue::Boolean(value),
            });
        }

        Ok(instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::default_field_types;

    fn storage_with_entry() -> (Storage, EntryId) {
        let storage = Storage::open_in_memory().unwrap();
        storage.seed_field_types(&default_field_types()).unwrap();
        let conn = storage.lock();
        conn.execute(
            "INSERT INTO folder (absolute_path, uuid) VALUES ('/tmp', 'u')",
            (),
        )
        .unwrap();
        drop(conn);
        let now = chrono::Utc::now();
        let entry = crate::model::Entry::new(1, &std::path::PathBuf::from("a.txt"), now);
        let ids = storage.insert_entries(&[entry]).unwrap();
        (storage, ids[0].unwrap())
    }

    #[test]
    fn set_field_instance_upserts() {
        let (storage, entry_id) = storage_with_entry();
        storage
            .set_field_instance(&FieldInstance {
                entry_id,
                type_key: "description".to_string(),
                value: FieldInstanceValue::Text("first".to_string()),
            })
            .unwrap();
        storage
            .set_field_instance(&FieldInstance {
                entry_id,
                type_key: "description".to_string(),
                value: FieldInstanceValue::Text("second".to_string()),
            })
            .unwrap();
        let instances = storage.entry_field_instances(entry_id).unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(
            instances[0].value,
            FieldInstanceValue::Text("second".to_string())
        );
    }

    #[test]
    fn seeded_field_types_are_idempotent() {
        let storage = Storage::open_in_memory().unwrap();
        storage.seed_field_types(&default_field_types()).unwrap();
        storage.seed_field_types(&default_field_types()).unwrap();
        assert_eq!(storage.list_field_types().unwrap().len(), 4);
    }
}
