//! NumScript Parser Component
//!
//! Turns NumScript source text into a typed syntax tree, or into a single
//! positioned [`ScriptError`].
//!
//! # Overview
//!
//! - [`Lexer`] - Tokenizes source, emitting newline tokens and skipping comments
//! - [`Token`] - Token kind, source text and position
//! - [`Parser`] - Recursive descent parser producing a [`Script`]
//! - [`ast`] - Syntax tree types
//! - [`printer`] - Canonical source printing through `Display`
//!
//! # Example
//!
//! ```
//! use parser::{parse, Statement};
//!
//! let source = "send [USD 100] (\n  source = @alice\n  destination = @bob\n)";
//! let script = parse(source).unwrap();
//!
//! assert!(matches!(script.statements[0], Statement::Send { .. }));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;

pub use ast::{Destination, Expr, Script, Source, Statement, TypeTag, ValueAwareSource};
pub use core_types::{ErrorKind, ScriptError, SourcePosition};
pub use lexer::{Keyword, Lexer, Punctuator, Token, TokenKind};
pub use parser::Parser;

/// Scan `source` into tokens, ending with `EOF`
pub fn scan(source: &str) -> Result<Vec<Token>, ScriptError> {
    Lexer::new(source).tokenize()
}

/// Parse `source` into a [`Script`]
pub fn parse(source: &str) -> Result<Script, ScriptError> {
    Parser::new(source).parse()
}

/// Parse an already-scanned token sequence into a [`Script`]
pub fn parse_tokens(tokens: Vec<Token>) -> Result<Script, ScriptError> {
    Parser::from_tokens(tokens).parse()
}
