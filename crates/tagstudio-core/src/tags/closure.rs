//! Descendant closure (`spec.md` §3, §4.C).
//!
//! "Descendant" here follows the spec's own framing: the parent edge
//! points from child to parent, and the closure we want for a given tag
//! is that tag plus every tag that has it as an ancestor — i.e. every
//! tag reachable by walking *child* edges outward from it.

use crate::model::TagId;
use crate::storage::Storage;
use crate::Result;
use std::collections::HashSet;

/// `tag_id` plus every tag reachable by repeatedly following child
/// edges. Idempotent and finite even if storage ever contained a
/// malformed cycle, thanks to the visited set.
pub fn descendant_closure(storage: &Storage, tag_id: TagId) -> Result<HashSet<TagId>> {
    let mut visited = HashSet::new();
    let mut stack = vec![tag_id];
    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        for child in storage.tag_children(current)? {
            if !visited.contains(&child) {
                stack.push(child);
            }
        }
    }
    Ok(visited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;

    #[test]
    fn closure_includes_self_and_all_descendants() {
        let storage = Storage::open_in_memory().unwrap();
        let root = storage.insert_tag(&Tag::new("color")).unwrap();
        let mut red = Tag::new("red");
        red.parents = vec![root];
        let red_id = storage.insert_tag(&red).unwrap();
        let mut crimson = Tag::new("crimson");
        crimson.parents = vec![red_id];
        let crimson_id = storage.insert_tag(&crimson).unwrap();

        let closure = descendant_closure(&storage, root).unwrap();
        assert_eq!(closure.len(), 3);
        assert!(closure.contains(&root));
        assert!(closure.contains(&red_id));
        assert!(closure.contains(&crimson_id));
    }

    #[test]
    fn leaf_tag_closure_is_itself() {
        let storage = Storage::open_in_memory().unwrap();
        let leaf = storage.insert_tag(&Tag::new("solo")).unwrap();
        let closure = descendant_closure(&storage, leaf).unwrap();
        assert_eq!(closure, std::iter::once(leaf).collect());
    }

    #[test]
    fn malformed_cycle_does_not_loop_forever() {
        let storage = Storage::open_in_memory().unwrap();
        let a = storage.insert_tag(&Tag::new("a")).unwrap();
        let b = storage.insert_tag(&Tag::new("b")).unwrap();
        {
            let conn = storage.lock();
            conn.execute(
                "INSERT INTO tag_parent (child_id, parent_id) VALUES (?1, ?2)",
                (a.0, b.0),
            )
            .unwrap();
            conn.execute(
                "INSERT INTO tag_parent (child_id, parent_id) VALUES (?1, ?2)",
                (b.0, a.0),
            )
            .unwrap();
        }
        let closure = descendant_closure(&storage, a).unwrap();
        assert_eq!(closure.len(), 2);
    }
}
