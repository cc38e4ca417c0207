//! Script error types and diagnostic rendering.
//!
//! A script is rejected by exactly one of two front-end stages: the scanner
//! ([`ErrorKind::LexError`]) or the syntax analyzer
//! ([`ErrorKind::ParseError`]). Both report through [`ScriptError`].

use crate::SourcePosition;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The kind of script error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Unterminated string or comment, or a character no token starts with
    LexError,
    /// Token stream does not match the grammar
    ParseError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::LexError => write!(f, "lex error"),
            ErrorKind::ParseError => write!(f, "syntax error"),
        }
    }
}

/// A lexical or syntax error with its source position.
///
/// Parse errors raised at a decision point also list the token kinds that
/// would have been accepted (`expected`) and describe the token actually
/// seen (`found`).
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, ScriptError, SourcePosition};
///
/// let error = ScriptError::new(ErrorKind::LexError, "unexpected character '#'", SourcePosition::new(1, 7, 6))
///     .with_found("#");
///
/// assert_eq!(error.column(), 7);
/// assert_eq!(error.found.as_deref(), Some("#"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{kind} at {position}: {message}")]
pub struct ScriptError {
    /// The stage that rejected the script
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Source position where the error occurred
    pub position: SourcePosition,
    /// Token kinds acceptable at this point, sorted and deduplicated
    pub expected: Vec<String>,
    /// Description of the offending token or character
    pub found: Option<String>,
}

impl ScriptError {
    /// Create an error without expected/found details
    pub fn new(kind: ErrorKind, message: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
            expected: Vec::new(),
            found: None,
        }
    }

    /// Attach the set of acceptable token kinds
    pub fn with_expected<I, S>(mut self, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut expected: Vec<String> = expected.into_iter().map(Into::into).collect();
        expected.sort();
        expected.dedup();
        self.expected = expected;
        self
    }

    /// Attach a description of what was actually found
    pub fn with_found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    /// 1-based line of the error
    pub fn line(&self) -> u32 {
        self.position.line
    }

    /// 1-based column of the error
    pub fn column(&self) -> u32 {
        self.position.column
    }

    /// Render a compiler-style diagnostic for a script author.
    ///
    /// ```text
    /// error: syntax error: expected `remaining`, found `}`
    ///   --> payout.num:6:5
    ///    |
    ///  6 |     }
    ///    |     ^
    ///    = expected one of: `max`, `remaining`
    /// ```
    pub fn render(&self, source: &str, file_name: &str) -> String {
        let line = self.position.line;
        let column = self.position.column;
        let src_line = source_line(source, line.saturating_sub(1) as usize);
        let gutter = " ".repeat(line.to_string().len());

        // Copy tabs from the source line so the caret stays aligned.
        let underline: String = src_line
            .chars()
            .take(column.saturating_sub(1) as usize)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();

        let mut out = format!(
            "error: {}: {}\n{} --> {}:{}:{}\n{} |\n{} | {}\n{} | {}^",
            self.kind, self.message, gutter, file_name, line, column, gutter, line, src_line, gutter, underline
        );

        if !self.expected.is_empty() {
            out.push_str(&format!("\n{} = expected one of: {}", gutter, self.expected.join(", ")));
        }

        out
    }
}

/// Line `index` (0-based), splitting on `\r\n`, `\n` and a bare `\r`
fn source_line(source: &str, index: usize) -> &str {
    source
        .split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
        .nth(index)
        .unwrap_or("")
}
