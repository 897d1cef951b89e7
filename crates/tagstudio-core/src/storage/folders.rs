//! Folder row storage. One row per library (`spec.md` §3): created at
//! library-open, never deleted while the library exists.

use super::connection::Storage;
use crate::error::Result;
use crate::model::Folder;
use rusqlite::OptionalExtension;
use std::path::{Path, PathBuf};
use uuid::Uuid;

impl Storage {
    /// Fetch the library's folder row if one already exists.
    pub fn get_folder(&self) -> Result<Option<Folder>> {
        let conn = self.lock();
        let row = conn
            .query_row(
                "SELECT id, absolute_path, uuid FROM folder LIMIT 1",
                (),
                |row| {
                    let absolute_path: String = row.get(1)?;
                    let uuid: String = row.get(2)?;
                    Ok((row.get::<_, i64>(0)?, absolute_path, uuid))
                },
            )
            .optional()?;
        Ok(row.map(|(id, absolute_path, uuid)| Folder {
            id,
            absolute_path: PathBuf::from(absolute_path),
            uuid: Uuid::parse_str(&uuid).unwrap_or_else(|_| Uuid::new_v4()),
        }))
    }

    /// Create the library's folder row. Only ever called once per
    /// library, at first open.
    pub fn create_folder(&self, absolute_path: &Path) -> Result<Folder> {
        let folder = Folder::new(0, absolute_path.to_path_buf());
        let conn = self.lock();
        conn.execute(
            "INSERT INTO folder (absolute_path, uuid) VALUES (?1, ?2)",
            (
                folder.absolute_path.to_string_lossy().to_string(),
                folder.uuid.to_string(),
            ),
        )?;
        Ok(Folder {
            id: conn.last_insert_rowid(),
            ..folder
        })
    }
}
