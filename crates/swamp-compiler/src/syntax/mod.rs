//! Source text to module tree.
//!
//! A small frontend: a `logos` lexer and a recursive-descent parser with an
//! offside rule. Errors are reported as `TokenizeError` and `ParseError`
//! diagnostics; the returned module holds whatever parsed cleanly.

pub mod ast;
mod grammar;
mod lexer;
mod parser;

#[cfg(test)]
mod lexer_tests;

pub use lexer::{Token, TokenKind, lex};
pub use parser::{ParseResult, parse};
