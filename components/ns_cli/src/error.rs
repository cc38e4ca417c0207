//! Error types for the CLI

use core_types::ScriptError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// The script was rejected by the scanner or parser
    #[error("{file_name}: {error}")]
    Script {
        /// The structured error
        error: ScriptError,
        /// Full text of the rejected script
        text: String,
        /// Name shown in the rendered diagnostic
        file_name: String,
    },

    /// File I/O error
    #[error("could not read file '{path}': {error}")]
    Io {
        /// Path that failed to load
        path: String,
        /// Underlying I/O failure
        #[source]
        error: std::io::Error,
    },

    /// REPL error
    #[error("REPL error: {0}")]
    Repl(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Wrap a script error together with the text it refers to
    pub fn script(error: ScriptError, text: &str, file_name: &str) -> Self {
        CliError::Script {
            error,
            text: text.to_string(),
            file_name: file_name.to_string(),
        }
    }

    /// Text shown to the user on stderr
    pub fn render(&self) -> String {
        match self {
            CliError::Script {
                error,
                text,
                file_name,
            } => error.render(text, file_name),
            other => format!("Error: {}", other),
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
