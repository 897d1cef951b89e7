//! The query AST: a closed sum (`spec.md` §9) —
//! `Or | And | Not | Constraint | Boolean`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    Or(Vec<Ast>),
    And(Vec<Ast>),
    Not(Box<Ast>),
    Constraint(Constraint),
    Boolean(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Tag,
    TagId,
    Path,
    MediaType,
    FileType,
    Special,
}

impl ConstraintKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ConstraintKind::Tag => "tag",
            ConstraintKind::TagId => "tag_id",
            ConstraintKind::Path => "path",
            ConstraintKind::MediaType => "mediatype",
            ConstraintKind::FileType => "filetype",
            ConstraintKind::Special => "special",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "tag" => Some(ConstraintKind::Tag),
            "tag_id" => Some(ConstraintKind::TagId),
            "path" => Some(ConstraintKind::Path),
            "mediatype" => Some(ConstraintKind::MediaType),
            "filetype" => Some(ConstraintKind::FileType),
            "special" => Some(ConstraintKind::Special),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub value: String,
    /// Reserved for future use (`spec.md` §4.D.3); always parses, never
    /// compiles (see [`crate::query::compiler`]).
    pub props: Vec<(String, String)>,
}

impl Ast {
    /// Double negation simplifies: `Not(Not(x))` is built as `x`
    /// directly by the parser, but this helper lets other code construct
    /// a `Not` node with the same normalisation applied.
    pub fn negate(inner: Ast) -> Ast {
        match inner {
            Ast::Not(child) => *child,
            other => Ast::Not(Box::new(other)),
        }
    }

    /// Reconstruct a query string from this AST (`spec.md` §8 round-trip
    /// law). Not guaranteed to match the original text byte-for-byte,
    /// only to parse back to a semantically equivalent AST.
    pub fn render(&self) -> String {
        match self {
            Ast::Boolean(true) => "TRUE".to_string(),
            Ast::Boolean(false) => "FALSE".to_string(),
            Ast::Not(child) => format!("NOT ({})", child.render()),
            Ast::And(children) => render_list(children, "AND"),
            Ast::Or(children) => render_list(children, "OR"),
            Ast::Constraint(c) => render_constraint(c),
        }
    }
}

fn render_list(children: &[Ast], op: &str) -> String {
    if children.len() == 1 {
        return children[0].render();
    }
    let parts: Vec<String> = children.iter().map(|c| format!("({})", c.render())).collect();
    parts.join(&format!(" {op} "))
}

fn render_constraint(c: &Constraint) -> String {
    let value = render_literal(&c.value);
    let mut out = format!("{}:{}", c.kind.keyword(), value);
    if !c.props.is_empty() {
        let props: Vec<String> = c
            .props
            .iter()
            .map(|(k, v)| format!("{k}={}", render_literal(v)))
            .collect();
        out.push('[');
        out.push_str(&props.join(","));
        out.push(']');
    }
    out
}

fn render_literal(value: &str) -> String {
    let needs_quoting = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || "\"'[](),=:".contains(c));
    if needs_quoting {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_quotes_values_containing_spaces() {
        let c = Constraint {
            kind: ConstraintKind::Path,
            value: "my photo.jpg".to_string(),
            props: Vec::new(),
        };
        assert_eq!(Ast::Constraint(c).render(), r#"path:"my photo.jpg""#);
    }

    #[test]
    fn render_plain_word_is_unquoted() {
        let c = Constraint {
            kind: ConstraintKind::Tag,
            value: "red".to_string(),
            props: Vec::new(),
        };
        assert_eq!(Ast::Constraint(c).render(), "tag:red");
    }
}
