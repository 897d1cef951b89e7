//! Persistence for the `preferences` key/value store (`spec.md` §3).
//!
//! Values are stored as their JSON text representation so any
//! `serde_json::Value` round-trips without a second schema per value
//! type.

use super::connection::Storage;
use crate::error::Result;
use crate::model::Preferences;
use serde_json::Value;
use std::collections::HashMap;

impl Storage {
    pub fn load_preferences(&self) -> Result<Preferences> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT key, value FROM preferences")?;
        let mut values = HashMap::new();
        let rows = stmt.query_map((), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, raw) = row?;
            if let Ok(value) = serde_json::from_str::<Value>(&raw) {
                values.insert(key, value);
            }
        }
        Ok(Preferences::from_map(values))
    }

    pub fn set_preference(&self, key: &str, value: &Value) -> Result<()> {
        let conn = self.lock();
        let raw = serde_json::to_string(value)?;
        conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, raw),
        )?;
        Ok(())
    }

    pub fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        for (key, value) in preferences.entries() {
            self.set_preference(key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::preferences::IGNORE_INCLUDE_KEY;

    #[test]
    fn round_trips_through_storage() {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .set_preference(IGNORE_INCLUDE_KEY, &Value::Bool(true))
            .unwrap();
        let prefs = storage.load_preferences().unwrap();
        assert_eq!(prefs.get_bool(IGNORE_INCLUDE_KEY), Some(true));
    }

    #[test]
    fn save_preferences_persists_every_entry() {
        let storage = Storage::open_in_memory().unwrap();
        let mut prefs = Preferences::new();
        prefs.set("a", Value::from(1));
        prefs.set("b", Value::from("two"));
        storage.save_preferences(&prefs).unwrap();

        let reloaded = storage.load_preferences().unwrap();
        assert_eq!(reloaded.get_i64("a"), Some(1));
        assert_eq!(
            reloaded.get("b").and_then(|v| v.as_str()),
            Some("two")
        );
    }
}
