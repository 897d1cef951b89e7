//! Relational schema DDL (`spec.md` §3, §4.B), one `&'static str` block per
//! migration, applied in order by [`super::migrations`].

pub const V1_INITIAL_SCHEMA: &str = r#"
CREATE TABLE folder (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    absolute_path TEXT NOT NULL UNIQUE,
    uuid TEXT NOT NULL
);

CREATE TABLE entry (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    folder_id INTEGER NOT NULL REFERENCES folder(id),
    path TEXT NOT NULL,
    suffix TEXT NOT NULL,
    date_added TEXT NOT NULL,
    date_created TEXT NOT NULL,
    date_modified TEXT NOT NULL,
    UNIQUE (folder_id, path)
);

CREATE INDEX idx_entry_suffix ON entry(suffix);

CREATE TABLE namespace (
    slug TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE tag_color_group (
    namespace TEXT NOT NULL REFERENCES namespace(slug) ON DELETE CASCADE,
    slug TEXT NOT NULL,
    name TEXT NOT NULL,
    primary_color TEXT NOT NULL,
    secondary_color TEXT,
    color_border INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (namespace, slug)
);

CREATE TABLE tag (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    shorthand TEXT,
    is_category INTEGER NOT NULL DEFAULT 0,
    color_namespace TEXT,
    color_slug TEXT,
    icon TEXT,
    FOREIGN KEY (color_namespace, color_slug)
        REFERENCES tag_color_group(namespace, slug) ON DELETE SET NULL
);

CREATE TABLE tag_parent (
    child_id INTEGER NOT NULL REFERENCES tag(id) ON DELETE CASCADE,
    parent_id INTEGER NOT NULL REFERENCES tag(id) ON DELETE CASCADE,
    PRIMARY KEY (child_id, parent_id)
);

CREATE INDEX idx_tag_parent_parent ON tag_parent(parent_id);

CREATE TABLE tag_alias (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tag_id INTEGER NOT NULL REFERENCES tag(id) ON DELETE CASCADE,
    name TEXT NOT NULL
);

CREATE INDEX idx_tag_alias_tag ON tag_alias(tag_id);

CREATE TABLE entry_tag (
    entry_id INTEGER NOT NULL REFERENCES entry(id) ON DELETE CASCADE,
    tag_id INTEGER NOT NULL REFERENCES tag(id) ON DELETE CASCADE,
    PRIMARY KEY (entry_id, tag_id)
);

CREATE INDEX idx_entry_tag_tag ON entry_tag(tag_id);

CREATE TABLE field_type (
    key TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    kind TEXT NOT NULL,
    is_default INTEGER NOT NULL DEFAULT 0,
    position INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE field_text (
    entry_id INTEGER NOT NULL REFERENCES entry(id) ON DELETE CASCADE,
    type_key TEXT NOT NULL REFERENCES field_type(key),
    value TEXT NOT NULL,
    PRIMARY KEY (entry_id, type_key)
);

CREATE TABLE field_datetime (
    entry_id INTEGER NOT NULL REFERENCES entry(id) ON DELETE CASCADE,
    type_key TEXT NOT NULL REFERENCES field_type(key),
    value TEXT NOT NULL,
    PRIMARY KEY (entry_id, type_key)
);

CREATE TABLE field_boolean (
    entry_id INTEGER NOT NULL REFERENCES entry(id) ON DELETE CASCADE,
    type_key TEXT NOT NULL REFERENCES field_type(key),
    value INTEGER NOT NULL,
    PRIMARY KEY (entry_id, type_key)
);

CREATE TABLE preferences (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;
