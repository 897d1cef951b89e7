//! Recursive-descent parser implementing the grammar in `spec.md` §4.D.2.

use super::ast::{Ast, Constraint, ConstraintKind};
use super::lexer::tokenize;
use super::token::{Token, TokenKind};
use crate::error::{Error, Span};
use crate::Result;

pub fn parse(source: &str) -> Result<Ast> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        current_kind: ConstraintKind::Tag,
    };
    parser.parse_query()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    current_kind: ConstraintKind,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.tokens[self.pos].kind.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn is_keyword(&self, word: &str) -> bool {
        matches!(self.peek(), TokenKind::ULiteral(s) if s.eq_ignore_ascii_case(word))
    }

    fn parse_query(&mut self) -> Result<Ast> {
        if matches!(self.peek(), TokenKind::Eof) {
            return Ok(Ast::Boolean(true));
        }
        let ast = self.parse_or_list()?;
        if !matches!(self.peek(), TokenKind::Eof) {
            return Err(Error::ParseError {
                span: self.peek_span(),
                message: "unexpected trailing input".to_string(),
            });
        }
        Ok(ast)
    }

    fn parse_or_list(&mut self) -> Result<Ast> {
        let mut children = vec![self.parse_and_list()?];
        while self.is_keyword("OR") {
            self.advance();
            children.push(self.parse_and_list()?);
        }
        Ok(if children.len() == 1 {
            children.pop().unwrap()
        } else {
            Ast::Or(children)
        })
    }

    fn parse_and_list(&mut self) -> Result<Ast> {
        let mut children = vec![self.parse_term()?];
        while self.starts_term() {
            if self.is_keyword("AND") {
                self.advance();
            }
            children.push(self.parse_term()?);
        }
        Ok(if children.len() == 1 {
            children.pop().unwrap()
        } else {
            Ast::And(children)
        })
    }

    /// Whether the current token can begin a new `term`, used to decide
    /// whether an implicit-AND continuation is present. `OR`/`)`/`EOF`
    /// and a dangling `AND` keyword itself all terminate the list.
    fn starts_term(&self) -> bool {
        if self.is_keyword("OR") {
            return false;
        }
        !matches!(self.peek(), TokenKind::Eof | TokenKind::RBracketClose)
    }

    fn parse_term(&mut self) -> Result<Ast> {
        if self.is_keyword("NOT") {
            self.advance();
            let inner = self.parse_term()?;
            return Ok(Ast::negate(inner));
        }
        if self.is_keyword("TRUE") {
            self.advance();
            return Ok(Ast::Boolean(true));
        }
        if self.is_keyword("FALSE") {
            self.advance();
            return Ok(Ast::Boolean(false));
        }
        if matches!(self.peek(), TokenKind::RBracketOpen) {
            self.advance();
            let inner = self.parse_or_list()?;
            self.expect(TokenKind::RBracketClose)?;
            return Ok(inner);
        }
        self.parse_constraint()
    }

    fn parse_constraint(&mut self) -> Result<Ast> {
        if let TokenKind::ConstraintType(keyword) = self.peek().clone() {
            self.advance();
            self.current_kind = ConstraintKind::from_keyword(&keyword).ok_or_else(|| {
                Error::ParseError {
                    span: self.peek_span(),
                    message: format!("unknown constraint type '{keyword}'"),
                }
            })?;
        }

        let value = self.parse_literal()?;
        let mut props = Vec::new();
        if matches!(self.peek(), TokenKind::SBracketOpen) {
            self.advance();
            props.push(self.parse_prop()?);
            while matches!(self.peek(), TokenKind::Comma) {
                self.advance();
                props.push(self.parse_prop()?);
            }
            self.expect(TokenKind::SBracketClose)?;
        }

        Ok(Ast::Constraint(Constraint {
            kind: self.current_kind,
            value,
            props,
        }))
    }

    fn parse_prop(&mut self) -> Result<(String, String)> {
        let key = match self.advance() {
            TokenKind::ULiteral(s) => s,
            other => {
                return Err(Error::ParseError {
                    span: self.peek_span(),
                    message: format!("expected property name, found {other:?}"),
                })
            }
        };
        self.expect(TokenKind::Equals)?;
        let value = self.parse_literal()?;
        Ok((key, value))
    }

    fn parse_literal(&mut self) -> Result<String> {
        match self.advance() {
            TokenKind::QLiteral(s) | TokenKind::ULiteral(s) => Ok(s),
            other => Err(Error::ParseError {
                span: self.peek_span(),
                message: format!("expected a literal, found {other:?}"),
            }),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<()> {
        if *self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(Error::ParseError {
                span: self.peek_span(),
                message: format!("expected {expected:?}, found {:?}", self.peek()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_matches_everything() {
        assert_eq!(parse("").unwrap(), Ast::Boolean(true));
        assert_eq!(parse("   ").unwrap(), Ast::Boolean(true));
    }

    #[test]
    fn constraint_type_carries_forward() {
        let ast = parse("tag:red blue green").unwrap();
        match ast {
            Ast::And(children) => {
                assert_eq!(children.len(), 3);
                for child in &children {
                    match child {
                        Ast::Constraint(c) => assert_eq!(c.kind, ConstraintKind::Tag),
                        _ => panic!("expected constraint"),
                    }
                }
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn double_negation_simplifies() {
        let ast = parse("NOT NOT tag:red").unwrap();
        match ast {
            Ast::Constraint(c) => assert_eq!(c.value, "red"),
            other => panic!("expected bare constraint after double negation, got {other:?}"),
        }
    }

    #[test]
    fn or_and_not_compose() {
        let ast = parse("NOT (filetype:gif OR filetype:apng)").unwrap();
        match ast {
            Ast::Not(inner) => match *inner {
                Ast::Or(children) => assert_eq!(children.len(), 2),
                other => panic!("expected Or inside Not, got {other:?}"),
            },
            other => panic!("expected Not, got {other:?}"),
        }
    }

    #[test]
    fn properties_parse_but_are_not_evaluated_here() {
        let ast = parse("tag:foo[parent=bar]").unwrap();
        match ast {
            Ast::Constraint(c) => {
                assert_eq!(c.props, vec![("parent".to_string(), "bar".to_string())]);
            }
            other => panic!("expected constraint, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_bracket_is_parse_error() {
        let result = parse("tag:foo[parent=bar");
        assert!(matches!(result, Err(Error::ParseError { .. })));
    }

    #[test]
    fn round_trip_law_holds_for_representative_queries() {
        for source in [
            "tag:red",
            "NOT tag:red",
            "tag:red AND tag:blue",
            "tag:red OR tag:blue",
            "NOT (filetype:gif OR filetype:apng)",
        ] {
            let ast = parse(source).unwrap();
            let rendered = ast.render();
            let reparsed = parse(&rendered).unwrap();
            assert_eq!(ast, reparsed, "round-trip failed for {source:?} -> {rendered:?}");
        }
    }
}
