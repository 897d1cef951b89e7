/// `(namespace, slug)` composite key (`spec.md` §3). Deleting a namespace
/// deletes its color groups; tags referencing a deleted color group fall
/// back to an uncolored state but remain valid (enforced at the storage
/// layer via `ON DELETE SET NULL` on `tag.color_namespace`/`color_slug`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagColorGroup {
    pub namespace: String,
    pub slug: String,
    pub name: String,
    pub primary: String,
    pub secondary: Option<String>,
    pub color_border: bool,
}

impl TagColorGroup {
    pub fn new(
        namespace: impl Into<String>,
        slug: impl Into<String>,
        name: impl Into<String>,
        primary: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            slug: slug.into(),
            name: name.into(),
            primary: primary.into(),
            secondary: None,
            color_border: false,
        }
    }
}
