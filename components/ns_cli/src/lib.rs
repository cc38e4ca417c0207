//! NumScript CLI Library
//!
//! Provides the Checker struct and supporting modules for the `numscript`
//! command-line tool.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checker;
pub mod cli;
pub mod error;
pub mod repl;

pub use checker::Checker;
pub use cli::Cli;
pub use error::{CliError, CliResult};
