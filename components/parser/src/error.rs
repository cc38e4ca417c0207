//! Parser error types and helpers

use crate::lexer::Token;
use core_types::{ErrorKind, ScriptError, SourcePosition};

/// Create a lex error at a given position
pub fn lex_error(message: impl Into<String>, position: SourcePosition) -> ScriptError {
    ScriptError::new(ErrorKind::LexError, message, position)
}

/// Create a lex error for a character no token can start with
pub fn unexpected_character(ch: char, position: SourcePosition) -> ScriptError {
    lex_error(format!("unexpected character {:?}", ch), position).with_found(format!("{:?}", ch))
}

/// Create an unterminated string error pointing at the opening quote
pub fn unterminated_string(position: SourcePosition) -> ScriptError {
    lex_error("unterminated string literal", position)
}

/// Create an unterminated block comment error pointing at the opening `/*`
pub fn unterminated_comment(position: SourcePosition) -> ScriptError {
    lex_error("unterminated block comment", position)
}

/// Create a syntax error at a given position
pub fn syntax_error(message: impl Into<String>, position: SourcePosition) -> ScriptError {
    ScriptError::new(ErrorKind::ParseError, message, position)
}

/// Create an unexpected token error at `found`
pub fn unexpected_token<I, S>(expected: I, found: &Token) -> ScriptError
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let error = syntax_error("", found.position)
        .with_expected(expected)
        .with_found(found.describe());
    let message = format!("expected {}, found {}", alternatives(&error.expected), found.describe());
    ScriptError { message, ..error }
}

/// `a`, `a or b`, `a, b or c`
fn alternatives(expected: &[String]) -> String {
    match expected {
        [] => "a different token".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}
