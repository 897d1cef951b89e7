//! Forward-only migration runner (`spec.md` §4.B, §6).
//!
//! On open, the stored schema version (kept in the `preferences` row named
//! [`crate::model::preferences::DB_VERSION_CURRENT_KEY`]) is compared
//! against [`CURRENT_SCHEMA_VERSION`]; any migrations between the two are
//! applied in order inside a single transaction. A stored version newer
//! than this binary understands fails open with
//! [`crate::error::Error::OpenFailure`] — downgrade is not supported.

use super::connection::Storage;
use super::schema::V1_INITIAL_SCHEMA;
use crate::error::{Error, OpenFailureReason, Result};
use crate::model::preferences::DB_VERSION_CURRENT_KEY;
use rusqlite::Connection;

pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub up_sql: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    up_sql: V1_INITIAL_SCHEMA,
}];

pub const CURRENT_SCHEMA_VERSION: i64 = MIGRATIONS[MIGRATIONS.len() - 1].version;

impl Storage {
    pub(crate) fn run_migrations(&self) -> Result<()> {
        let mut conn = self.lock();
        let stored_version = read_stored_version(&conn)?;

        if stored_version > CURRENT_SCHEMA_VERSION {
            return Err(Error::OpenFailure {
                reason: OpenFailureReason::IncompatibleVersion {
                    found: stored_version,
                    current: CURRENT_SCHEMA_VERSION,
                },
            });
        }

        let tx = conn.transaction()?;
        for migration in MIGRATIONS
            .iter()
            .filter(|m| m.version > stored_version)
        {
            tracing::info!(version = migration.version, name = migration.name, "applying migration");
            tx.execute_batch(migration.up_sql)?;
        }
        if stored_version < CURRENT_SCHEMA_VERSION {
            tx.execute(
                "INSERT INTO preferences(key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                (DB_VERSION_CURRENT_KEY, CURRENT_SCHEMA_VERSION.to_string()),
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn read_stored_version(conn: &Connection) -> Result<i64> {
    let preferences_table_exists: bool = conn
        .query_row(
            "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = 'preferences'",
            (),
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count > 0)?;

    if !preferences_table_exists {
        return Ok(0);
    }

    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            (DB_VERSION_CURRENT_KEY,),
            |row| row.get(0),
        )
        .ok();

    Ok(stored.and_then(|s| s.parse::<i64>().ok()).unwrap_or(0))
}
