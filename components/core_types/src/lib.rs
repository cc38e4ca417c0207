//! Core NumScript front-end types and error handling.
//!
//! This crate provides the foundational types shared by the scanner, the
//! parser and every tool built on top of them: source location tracking
//! and the structured error reported when a script cannot be read.
//!
//! # Overview
//!
//! - [`SourcePosition`] - Line/column location inside a script
//! - [`ScriptError`] - Lexical or syntax error with its position
//! - [`ErrorKind`] - Which front-end stage rejected the script
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, ScriptError, SourcePosition};
//!
//! let error = ScriptError::new(
//!     ErrorKind::ParseError,
//!     "missing remaining clause",
//!     SourcePosition::new(4, 9, 61),
//! );
//! assert_eq!(error.line(), 4);
//! assert_eq!(error.to_string(), "syntax error at 4:9: missing remaining clause");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;

pub use error::{ErrorKind, ScriptError};
pub use source::SourcePosition;
