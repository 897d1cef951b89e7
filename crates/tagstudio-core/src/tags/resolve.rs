//! Name resolution (`spec.md` §4.C): `resolve_tag_name(q)` unions tags
//! whose name/shorthand matches `q` case-insensitively with tags whose
//! alias matches `q`. Ambiguity (more than one match) is permitted; a
//! `tracing` event records it and every match flows forward — callers
//! decide what, if anything, to do about the ambiguity.

use crate::model::TagId;
use crate::storage::Storage;
use crate::Result;
use std::collections::HashSet;

/// Why a given tag id matched a `resolve_tag_name` query. Exposed so
/// callers that need to show *which* name matched (`SPEC_FULL.md` §9)
/// can, without the engine picking a display name on their behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    Name,
    Shorthand,
    Alias,
}

pub fn resolve_tag_name(storage: &Storage, query: &str) -> Result<Vec<(TagId, MatchReason)>> {
    let needle = query.to_lowercase();
    let mut matches = Vec::new();
    let mut seen: HashSet<TagId> = HashSet::new();

    for tag in storage.list_tags()? {
        if tag.name.to_lowercase() == needle {
            if seen.insert(tag.id) {
                matches.push((tag.id, MatchReason::Name));
            }
            continue;
        }
        if let Some(shorthand) = &tag.shorthand {
            if shorthand.to_lowercase() == needle && seen.insert(tag.id) {
                matches.push((tag.id, MatchReason::Shorthand));
                continue;
            }
        }
        for alias in storage.tag_aliases(tag.id)? {
            if alias.name.to_lowercase() == needle && seen.insert(tag.id) {
                matches.push((tag.id, MatchReason::Alias));
                break;
            }
        }
    }

    if matches.len() > 1 {
        tracing::warn!(query, count = matches.len(), "ambiguous tag name resolution");
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;

    #[test]
    fn matches_name_shorthand_and_alias() {
        let storage = Storage::open_in_memory().unwrap();
        let mut red = Tag::new("Red");
        red.shorthand = Some("r".to_string());
        let red_id = storage.insert_tag(&red).unwrap();
        storage
            .update_tag(red_id, "Red", Some("r"), false, &[], &[], &["scarlet".into()])
            .unwrap();

        assert_eq!(
            resolve_tag_name(&storage, "red").unwrap(),
            vec![(red_id, MatchReason::Name)]
        );
        assert_eq!(
            resolve_tag_name(&storage, "R").unwrap(),
            vec![(red_id, MatchReason::Shorthand)]
        );
        assert_eq!(
            resolve_tag_name(&storage, "Scarlet").unwrap(),
            vec![(red_id, MatchReason::Alias)]
        );
    }

    #[test]
    fn ambiguous_name_returns_all_matches() {
        let storage = Storage::open_in_memory().unwrap();
        let a = storage.insert_tag(&Tag::new("dup")).unwrap();
        let b = storage.insert_tag(&Tag::new("dup")).unwrap();
        let matches = resolve_tag_name(&storage, "dup").unwrap();
        let ids: HashSet<TagId> = matches.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, HashSet::from([a, b]));
    }

    #[test]
    fn no_match_returns_empty() {
        let storage = Storage::open_in_memory().unwrap();
        assert!(resolve_tag_name(&storage, "nope").unwrap().is_empty());
    }
}
