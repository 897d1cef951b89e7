//! Mutation contracts (`spec.md` §4.C): `add_tag`, `update_tag`,
//! `remove_tag`, layered over [`crate::storage`] with name validation and
//! reserved-namespace rejection.

use super::validation::validate_tag_name;
use crate::error::Error;
use crate::model::{Tag, TagId};
use crate::storage::Storage;
use crate::Result;

pub fn add_tag(storage: &Storage, tag: &Tag) -> Result<TagId> {
    validate_tag_name(&tag.name).map_err(|e| Error::ParseError {
        span: crate::error::Span::point(0),
        message: e.to_string(),
    })?;
    if let Some((namespace, _)) = &tag.color {
        if crate::model::is_reserved_namespace(namespace) {
            return Err(Error::ReservedNamespace(namespace.clone()));
        }
    }
    storage.insert_tag(tag)
}

#[allow(clippy::too_many_arguments)]
pub fn update_tag(
    storage: &Storage,
    id: TagId,
    name: &str,
    shorthand: Option<&str>,
    is_category: bool,
    parents: &[TagId],
    alias_ids: &[i64],
    alias_names: &[String],
) -> Result<()> {
    validate_tag_name(name).map_err(|e| Error::ParseError {
        span: crate::error::Span::point(0),
        message: e.to_string(),
    })?;
    for alias in alias_names {
        validate_tag_name(alias).map_err(|e| Error::ParseError {
            span: crate::error::Span::point(0),
            message: e.to_string(),
        })?;
    }
    storage.update_tag(id, name, shorthand, is_category, parents, alias_ids, alias_names)
}

pub fn remove_tag(storage: &Storage, id: TagId) -> Result<()> {
    storage.remove_tag(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_tag_rejects_invalid_name() {
        let storage = Storage::open_in_memory().unwrap();
        let result = add_tag(&storage, &Tag::new("7invalid"));
        assert!(matches!(result, Err(Error::ParseError { .. })));
    }

    #[test]
    fn add_tag_accepts_valid_name() {
        let storage = Storage::open_in_memory().unwrap();
        let result = add_tag(&storage, &Tag::new("valid-tag"));
        assert!(result.is_ok());
    }
}
