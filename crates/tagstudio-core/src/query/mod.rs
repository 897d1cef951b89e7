//! # Query Language
//!
//! A small boolean query language over tags, paths, and media types
//! (`spec.md` §4.D): [`token`]/[`lexer`] turn source text into a token
//! stream, [`parser`] builds an [`ast::Ast`], and [`compiler`] resolves it
//! against storage into an evaluable [`compiler::Predicate`] tree.

pub mod ast;
pub mod compiler;
pub mod lexer;
pub mod parser;
pub mod smartcase;
pub mod token;

pub use ast::{Ast, Constraint, ConstraintKind};
pub use compiler::{compile, evaluate, Predicate};
pub use parser::parse;
