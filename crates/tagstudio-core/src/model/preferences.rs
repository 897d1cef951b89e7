use serde_json::Value;
use std::collections::HashMap;

/// Reserved preference key holding the schema version integer
/// (`spec.md` §6, "a `preferences` row named `DB_VERSION_CURRENT_KEY`").
pub const DB_VERSION_CURRENT_KEY: &str = "db_version_current";

pub const IGNORE_INCLUDE_KEY: &str = "ignore_include";
pub const IGNORE_EXTENSION_LIST_KEY: &str = "ignore_extension_list";

/// A `key → JSON value` store for library-scoped options (`spec.md` §3).
///
/// This is an in-memory view; [`crate::storage::preferences`] is
/// responsible for loading/persisting it against the `preferences` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    values: HashMap<String, Value>,
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: HashMap<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key)?
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_scalars_and_lists() {
        let mut prefs = Preferences::new();
        prefs.set(DB_VERSION_CURRENT_KEY, Value::from(3));
        prefs.set(IGNORE_INCLUDE_KEY, Value::from(true));
        prefs.set(
            IGNORE_EXTENSION_LIST_KEY,
            Value::from(vec!["png".to_string(), "jpg".to_string()]),
        );

        assert_eq!(prefs.get_i64(DB_VERSION_CURRENT_KEY), Some(3));
        assert_eq!(prefs.get_bool(IGNORE_INCLUDE_KEY), Some(true));
        assert_eq!(
            prefs.get_string_list(IGNORE_EXTENSION_LIST_KEY),
            Some(vec!["png".to_string(), "jpg".to_string()])
        );
    }

    #[test]
    fn missing_key_is_none() {
        let prefs = Preferences::new();
        assert_eq!(prefs.get_i64("nope"), None);
    }
}
