use super::entry::EntryId;
use chrono::{DateTime, Utc};

/// The type of value a field instance holds (`spec.md` §3). `Tags` is not
/// realized as a value row — a TAGS-typed field is direct entry↔tag joins
/// handled entirely by [`crate::storage::tags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTypeKind {
    TextLine,
    TextBox,
    DateTime,
    Boolean,
    Tags,
}

impl FieldTypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldTypeKind::TextLine => "TEXT_LINE",
            FieldTypeKind::TextBox => "TEXT_BOX",
            FieldTypeKind::DateTime => "DATETIME",
            FieldTypeKind::Boolean => "BOOLEAN",
            FieldTypeKind::Tags => "TAGS",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "TEXT_LINE" => Some(FieldTypeKind::TextLine),
            "TEXT_BOX" => Some(FieldTypeKind::TextBox),
            "DATETIME" => Some(FieldTypeKind::DateTime),
            "BOOLEAN" => Some(FieldTypeKind::Boolean),
            "TAGS" => Some(FieldTypeKind::Tags),
            _ => None,
        }
    }
}

/// A row in the field type catalog, seeded at library creation and
/// extensible at runtime (`spec.md` §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    pub key: String,
    pub display_name: String,
    pub kind: FieldTypeKind,
    pub is_default: bool,
    pub position: i32,
}

/// The concrete value of a field instance attached to an entry. Lives in
/// exactly one of the per-type value tables at the storage layer.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInstanceValue {
    Text(String),
    DateTime(DateTime<Utc>),
    Boolean(bool),
}

/// A field instance attached to an entry, tagged by `type_key`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInstance {
    pub entry_id: EntryId,
    pub type_key: String,
    pub value: FieldInstanceValue,
}

/// The seed catalog every freshly created library starts with.
pub fn default_field_types() -> Vec<FieldType> {
    vec![
        FieldType {
            key: "notes".to_string(),
            display_name: "Notes".to_string(),
            kind: FieldTypeKind::TextBox,
            is_default: true,
            position: 0,
        },
        FieldType {
            key: "description".to_string(),
            display_name: "Description".to_string(),
            kind: FieldTypeKind::TextLine,
            is_default: true,
            position: 1,
        },
        FieldType {
            key: "date_taken".to_string(),
            display_name: "Date Taken".to_string(),
            kind: FieldTypeKind::DateTime,
            is_default: true,
            position: 2,
        },
        FieldType {
            key: "tags".to_string(),
            display_name: "Tags".to_string(),
            kind: FieldTypeKind::Tags,
            is_default: true,
            position: 3,
        },
    ]
}
