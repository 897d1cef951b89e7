//! Tokenizer (`spec.md` §4.D.1).
//!
//! Bare words stop at `: space [ ] ( ) = ,`. A bare word immediately
//! followed by `:` is promoted to a [`TokenKind::ConstraintType`] only if
//! it matches a known constraint keyword; anything else immediately
//! followed by `:` is a parse error, since no other token stands for a
//! bare colon.

use super::token::{Token, TokenKind};
use crate::error::{Error, Span};
use crate::Result;

const DELIMITERS: &[char] = &[':', ' ', '\t', '\n', '[', ']', '(', ')', '=', ','];

pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = source.chars().collect();
    let mut pos = 0usize;
    let mut tokens = Vec::new();

    while pos < chars.len() {
        let ch = chars[pos];
        if ch.is_whitespace() {
            pos += 1;
            continue;
        }
        let start = pos;
        match ch {
            '(' => {
                tokens.push(Token::new(TokenKind::RBracketOpen, Span::new(start, start + 1)));
                pos += 1;
            }
            ')' => {
                tokens.push(Token::new(TokenKind::RBracketClose, Span::new(start, start + 1)));
                pos += 1;
            }
            '[' => {
                tokens.push(Token::new(TokenKind::SBracketOpen, Span::new(start, start + 1)));
                pos += 1;
            }
            ']' => {
                tokens.push(Token::new(TokenKind::SBracketClose, Span::new(start, start + 1)));
                pos += 1;
            }
            ',' => {
                tokens.push(Token::new(TokenKind::Comma, Span::new(start, start + 1)));
                pos += 1;
            }
            '=' => {
                tokens.push(Token::new(TokenKind::Equals, Span::new(start, start + 1)));
                pos += 1;
            }
            '"' | '\'' => {
                let (literal, end) = scan_quoted(&chars, pos)?;
                tokens.push(Token::new(TokenKind::QLiteral(literal), Span::new(start, end)));
                pos = end;
            }
            _ => {
                let (word, end) = scan_bare_word(&chars, pos);
                if end < chars.len() && chars[end] == ':' {
                    if let Some(keyword) = normalize_constraint_keyword(&word) {
                        tokens.push(Token::new(
                            TokenKind::ConstraintType(keyword),
                            Span::new(start, end + 1),
                        ));
                        pos = end + 1;
                        continue;
                    }
                    return Err(Error::ParseError {
                        span: Span::new(start, end + 1),
                        message: format!("unknown constraint type '{word}'"),
                    });
                }
                tokens.push(Token::new(TokenKind::ULiteral(word), Span::new(start, end)));
                pos = end;
            }
        }
    }

    let eof_at = chars.len();
    tokens.push(Token::new(TokenKind::Eof, Span::point(eof_at)));
    Ok(tokens)
}

fn scan_bare_word(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && !DELIMITERS.contains(&chars[end]) {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

fn scan_quoted(chars: &[char], start: usize) -> Result<(String, usize)> {
    let quote = chars[start];
    let mut pos = start + 1;
    let mut literal = String::new();
    while pos < chars.len() {
        let ch = chars[pos];
        if ch == '\\' && pos + 1 < chars.len() {
            let escaped = chars[pos + 1];
            match escaped {
                '\\' | '"' | '\'' => {
                    literal.push(escaped);
                    pos += 2;
                    continue;
                }
                _ => {
                    literal.push(ch);
                    pos += 1;
                    continue;
                }
            }
        }
        if ch == quote {
            return Ok((literal, pos + 1));
        }
        literal.push(ch);
        pos += 1;
    }
    Err(Error::ParseError {
        span: Span::new(start, pos),
        message: "unterminated quoted string".to_string(),
    })
}

fn normalize_constraint_keyword(word: &str) -> Option<String> {
    match word.to_lowercase().as_str() {
        "tag" => Some("tag".to_string()),
        "tagid" | "tag_id" => Some("tag_id".to_string()),
        "path" => Some("path".to_string()),
        "mediatype" => Some("mediatype".to_string()),
        "filetype" => Some("filetype".to_string()),
        "special" => Some("special".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_constraint_and_bare_word() {
        let tokens = tokenize("tag:red blue").unwrap();
        assert_eq!(
            tokens[0].kind,
            TokenKind::ConstraintType("tag".to_string())
        );
        assert_eq!(tokens[1].kind, TokenKind::ULiteral("red".to_string()));
        assert_eq!(tokens[2].kind, TokenKind::ULiteral("blue".to_string()));
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    }

    #[test]
    fn quoted_literal_handles_escapes() {
        let tokens = tokenize(r#"path:"a\"b""#).unwrap();
        assert_eq!(
            tokens[1].kind,
            TokenKind::QLiteral("a\"b".to_string())
        );
    }

    #[test]
    fn unterminated_quote_is_parse_error() {
        let result = tokenize(r#"path:"unterminated"#);
        assert!(matches!(result, Err(Error::ParseError { .. })));
    }

    #[test]
    fn unknown_constraint_type_is_parse_error() {
        let result = tokenize("bogus:value");
        assert!(matches!(result, Err(Error::ParseError { .. })));
    }

    #[test]
    fn brackets_and_props_tokenize() {
        let tokens = tokenize("tag:foo[parent=bar]").unwrap();
        let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
        assert!(kinds.contains(&&TokenKind::SBracketOpen));
        assert!(kinds.contains(&&TokenKind::Equals));
        assert!(kinds.contains(&&TokenKind::SBracketClose));
    }
}
