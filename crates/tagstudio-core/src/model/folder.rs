use std::path::PathBuf;
use uuid::Uuid;

/// A library root. Exactly one per library; created at library-open and
/// never deleted while the library exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: i64,
    pub absolute_path: PathBuf,
    pub uuid: Uuid,
}

impl Folder {
    pub fn new(id: i64, absolute_path: PathBuf) -> Self {
        Self {
            id,
            absolute_path,
            uuid: Uuid::new_v4(),
        }
    }
}
