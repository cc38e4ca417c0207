//! Command-line arguments

use clap::Parser as ClapParser;

/// Check NumScript files from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, ClapParser)]
#[command(name = "numscript", version, about = "Check and inspect NumScript programs")]
pub struct Cli {
    /// Script file to check
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<String>,

    /// Inline script source to check
    #[arg(short, long, value_name = "CODE", conflicts_with = "file")]
    pub eval: Option<String>,

    /// Start the interactive REPL
    #[arg(short, long)]
    pub repl: bool,

    /// Print the token stream
    #[arg(long)]
    pub print_tokens: bool,

    /// Print the syntax tree
    #[arg(long)]
    pub print_ast: bool,

    /// Print the syntax tree as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the script in canonical form
    #[arg(long)]
    pub format: bool,

    /// Report each stage on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Arguments for checking a single file with no dump flags
    pub fn with_file(file: impl Into<String>) -> Self {
        Self {
            file: Some(file.into()),
            ..Self::default()
        }
    }
}
