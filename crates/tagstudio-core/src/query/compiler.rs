//! Predicate compiler (`spec.md` §4.D.5).
//!
//! Walks the AST once, resolving every `Tag` literal against the storage
//! layer up front, and returns a [`Predicate`] tree that can be evaluated
//! per-entry without further database access. `OR`/`AND` bucket plain tag
//! literals into a single `entry_has_any_tags`/`entry_has_all_tags` leaf,
//! exactly as specified; everything else composes as ordinary logical
//! combinators.

use super::ast::{Ast, Constraint, ConstraintKind};
use super::smartcase::{self, PathMatch};
use crate::error::Error;
use crate::model::{Entry, TagId};
use crate::storage::Storage;
use crate::tags::{descendant_closure, resolve_tag_name};
use crate::Result;
use globset::GlobBuilder;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub enum Predicate {
    True,
    False,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    HasAnyTag(HashSet<TagId>),
    HasAllTags(HashSet<TagId>),
    Path(PathMatch),
    Suffix(HashSet<String>),
    Untagged,
}

pub fn compile(ast: &Ast, storage: &Storage) -> Result<Predicate> {
    match ast {
        Ast::Boolean(b) => Ok(if *b { Predicate::True } else { Predicate::False }),
        Ast::Not(inner) => Ok(Predicate::Not(Box::new(compile(inner, storage)?))),
        Ast::Constraint(c) => compile_constraint(c, storage),
        Ast::Or(children) => compile_or(children, storage),
        Ast::And(children) => compile_and(children, storage),
    }
}

fn compile_or(children: &[Ast], storage: &Storage) -> Result<Predicate> {
    let mut tag_ids: HashSet<TagId> = HashSet::new();
    let mut others = Vec::new();
    for child in children {
        if let Ast::Constraint(c) = child {
            if c.kind == ConstraintKind::Tag && c.props.is_empty() {
                tag_ids.extend(resolve_and_expand(storage, &c.value)?);
                continue;
            }
        }
        others.push(compile(child, storage)?);
    }
    let mut combined = others;
    if !tag_ids.is_empty() {
        combined.push(Predicate::HasAnyTag(tag_ids));
    }
    Ok(match combined.len() {
        0 => Predicate::False,
        1 => combined.pop().unwrap(),
        _ => Predicate::Or(combined),
    })
}

fn compile_and(children: &[Ast], storage: &Storage) -> Result<Predicate> {
    let mut all_tag_ids: HashSet<TagId> = HashSet::new();
    let mut others = Vec::new();
    for child in children {
        if let Ast::Constraint(c) = child {
            if c.kind == ConstraintKind::Tag && c.props.is_empty() {
                // Expand to the descendant closure first, then branch on
                // its size: only a single resolved id joins the combined
                // relational-division set, otherwise (ambiguous name, or
                // a parent with descendants) it falls back to its own
                // `HasAnyTag` subpredicate.
                let expanded = resolve_and_expand(storage, &c.value)?;
                if expanded.len() == 1 {
                    all_tag_ids.extend(expanded);
                } else if expanded.is_empty() {
                    others.push(Predicate::False);
                } else {
                    others.push(Predicate::HasAnyTag(expanded));
                }
                continue;
            }
        }
        others.push(compile(child, storage)?);
    }
    let mut combined = others;
    if !all_tag_ids.is_empty() {
        combined.push(Predicate::HasAllTags(all_tag_ids));
    }
    Ok(match combined.len() {
        0 => Predicate::True,
        1 => combined.pop().unwrap(),
        _ => Predicate::And(combined),
    })
}

fn resolve_and_expand(storage: &Storage, query: &str) -> Result<HashSet<TagId>> {
    let matches = resolve_tag_name(storage, query)?;
    let mut ids = HashSet::new();
    for (id, _) in matches {
        ids.extend(descendant_closure(storage, id)?);
    }
    Ok(ids)
}

fn compile_constraint(c: &Constraint, storage: &Storage) -> Result<Predicate> {
    if !c.props.is_empty() {
        return Err(Error::NotImplemented {
            feature: "constraint properties".to_string(),
        });
    }
    match c.kind {
        ConstraintKind::Tag => {
            let ids = resolve_and_expand(storage, &c.value)?;
            Ok(if ids.is_empty() {
                Predicate::False
            } else {
                Predicate::HasAnyTag(ids)
            })
        }
        ConstraintKind::TagId => {
            let id: i64 = c.value.parse().map_err(|_| Error::ParseError {
                span: crate::error::Span::point(0),
                message: format!("'{}' is not a valid tag id", c.value),
            })?;
            Ok(Predicate::HasAnyTag(HashSet::from([TagId(id)])))
        }
        ConstraintKind::Path => Ok(Predicate::Path(smartcase::classify(&c.value))),
        ConstraintKind::MediaType => {
            let suffixes = crate::path::media_type::suffixes_for_query(&c.value).ok_or_else(|| {
                Error::ParseError {
                    span: crate::error::Span::point(0),
                    message: format!("unknown media category '{}'", c.value),
                }
            })?;
            Ok(Predicate::Suffix(
                suffixes.into_iter().map(str::to_string).collect(),
            ))
        }
        ConstraintKind::FileType => Ok(Predicate::Suffix(
            crate::path::media_type::equivalence_class(&c.value.to_lowercase()),
        )),
        ConstraintKind::Special => {
            if c.value.eq_ignore_ascii_case("untagged") {
                Ok(Predicate::Untagged)
            } else {
                Err(Error::NotImplemented {
                    feature: format!("special:{}", c.value),
                })
            }
        }
    }
}

/// Evaluate a compiled predicate against one entry. `tag_ids` is the set
/// of tags the entry directly bears (join rows), fetched once per entry
/// by the caller.
pub fn evaluate(predicate: &Predicate, entry: &Entry, tag_ids: &HashSet<TagId>) -> bool {
    match predicate {
        Predicate::True => true,
        Predicate::False => false,
        Predicate::And(children) => children.iter().all(|p| evaluate(p, entry, tag_ids)),
        Predicate::Or(children) => children.iter().any(|p| evaluate(p, entry, tag_ids)),
        Predicate::Not(inner) => !evaluate(inner, entry, tag_ids),
        Predicate::HasAnyTag(ids) => tag_ids.iter().any(|id| ids.contains(id)),
        Predicate::HasAllTags(ids) => ids.iter().all(|id| tag_ids.contains(id)),
        Predicate::Untagged => tag_ids.is_empty(),
        Predicate::Suffix(suffixes) => suffixes.contains(&entry.suffix),
        Predicate::Path(path_match) => match path_match {
            PathMatch::Substring(needle) => entry.path.to_lowercase().contains(needle),
            PathMatch::Literal(needle) => entry.path.contains(needle.as_str()),
            PathMatch::Glob(pattern) => glob_matches(pattern, &entry.path, false),
            PathMatch::GlobCaseInsensitive(pattern) => {
                glob_matches(pattern, &entry.path.to_lowercase(), true)
            }
        },
    }
}

fn glob_matches(pattern: &str, path: &str, case_insensitive: bool) -> bool {
    GlobBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .literal_separator(false)
        .build()
        .map(|g| g.compile_matcher().is_match(path))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;
    use crate::query::parser::parse;

    #[test]
    fn tag_and_requires_both_via_relational_division() {
        let storage = Storage::open_in_memory().unwrap();
        let square = storage.insert_tag(&Tag::new("square")).unwrap();
        let circle = storage.insert_tag(&Tag::new("circle")).unwrap();
        let conn = storage.lock();
        conn.execute("INSERT INTO folder (absolute_path, uuid) VALUES ('/tmp', 'u')", ())
            .unwrap();
        drop(conn);
        let now = chrono::Utc::now();
        let e1 = Entry::new(1, &std::path::PathBuf::from("e1"), now);
        let e2 = Entry::new(1, &std::path::PathBuf::from("e2"), now);
        let ids = storage.insert_entries(&[e1, e2]).unwrap();
        storage.add_entry_tag(ids[0].unwrap(), circle).unwrap();
        storage.add_entry_tag(ids[1].unwrap(), square).unwrap();

        let ast = parse("square AND circle").unwrap();
        let predicate = compile(&ast, &storage).unwrap();
        let e1 = storage.get_entry(ids[0].unwrap()).unwrap();
        let tags_e1: HashSet<TagId> = storage.entry_tags(e1.id).unwrap().into_iter().collect();
        assert!(!evaluate(&predicate, &e1, &tags_e1));
    }

    #[test]
    fn and_of_two_parents_matches_entry_bearing_only_descendants() {
        let storage = Storage::open_in_memory().unwrap();
        let shape = storage.insert_tag(&Tag::new("shape")).unwrap();
        let mut circle = Tag::new("circle");
        circle.parents = vec![shape];
        let circle_id = storage.insert_tag(&circle).unwrap();
        let animal = storage.insert_tag(&Tag::new("animal")).unwrap();
        let mut cat = Tag::new("cat");
        cat.parents = vec![animal];
        let cat_id = storage.insert_tag(&cat).unwrap();

        let conn = storage.lock();
        conn.execute("INSERT INTO folder (absolute_path, uuid) VALUES ('/tmp', 'u')", ())
            .unwrap();
        drop(conn);
        let now = chrono::Utc::now();
        let e1 = Entry::new(1, &std::path::PathBuf::from("e1"), now);
        let ids = storage.insert_entries(&[e1]).unwrap();
        storage.add_entry_tag(ids[0].unwrap(), circle_id).unwrap();
        storage.add_entry_tag(ids[0].unwrap(), cat_id).unwrap();

        let ast = parse("shape AND animal").unwrap();
        let predicate = compile(&ast, &storage).unwrap();
        let e1 = storage.get_entry(ids[0].unwrap()).unwrap();
        let tags_e1: HashSet<TagId> = storage.entry_tags(e1.id).unwrap().into_iter().collect();
        assert!(evaluate(&predicate, &e1, &tags_e1));
    }

    #[test]
    fn parent_tag_query_matches_descendants() {
        let storage = Storage::open_in_memory().unwrap();
        let shape = storage.insert_tag(&Tag::new("shape")).unwrap();
        let mut ellipse = Tag::new("ellipse");
        ellipse.parents = vec![shape];
        let ellipse_id = storage.insert_tag(&ellipse).unwrap();
        let mut circle = Tag::new("circle");
        circle.parents = vec![ellipse_id];
        let circle_id = storage.insert_tag(&circle).unwrap();

        let conn = storage.lock();
        conn.execute("INSERT INTO folder (absolute_path, uuid) VALUES ('/tmp', 'u')", ())
            .unwrap();
        drop(conn);
        let now = chrono::Utc::now();
        let e1 = Entry::new(1, &std::path::PathBuf::from("e1"), now);
        let ids = storage.insert_entries(&[e1]).unwrap();
        storage.add_entry_tag(ids[0].unwrap(), circle_id).unwrap();

        let ast = parse("shape").unwrap();
        let predicate = compile(&ast, &storage).unwrap();
        let e1 = storage.get_entry(ids[0].unwrap()).unwrap();
        let tags_e1: HashSet<TagId> = storage.entry_tags(e1.id).unwrap().into_iter().collect();
        assert!(evaluate(&predicate, &e1, &tags_e1));
    }

    #[test]
    fn constraint_properties_are_not_implemented() {
        let storage = Storage::open_in_memory().unwrap();
        let ast = parse("tag:foo[parent=bar]").unwrap();
        let result = compile(&ast, &storage);
        assert!(matches!(result, Err(Error::NotImplemented { .. })));
    }

    #[test]
    fn unsupported_special_value_is_not_implemented() {
        let storage = Storage::open_in_memory().unwrap();
        let ast = parse("special:bogus").unwrap();
        let result = compile(&ast, &storage);
        assert!(matches!(result, Err(Error::NotImplemented { .. })));
    }
}
