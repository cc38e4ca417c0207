//! Script checking orchestration
//!
//! The Checker runs the scanner and parser over one script and builds the
//! text the CLI prints on success: a one-line summary, or the dumps selected
//! by the command-line flags.

use crate::cli::Cli;
use crate::error::{CliError, CliResult};
use parser::{Script, Token, TokenKind};

/// Checks scripts and renders the requested output
#[derive(Debug, Clone, Default)]
pub struct Checker {
    /// Whether to print the token stream
    print_tokens: bool,
    /// Whether to print the Debug form of the syntax tree
    print_ast: bool,
    /// Whether to print the syntax tree as JSON
    json: bool,
    /// Whether to print the canonical source
    format: bool,
    /// Whether to report stages on stderr
    verbose: bool,
}

impl Checker {
    /// Create a checker that only prints the summary
    ///
    /// # Example
    /// ```
    /// use ns_cli::Checker;
    ///
    /// let output = Checker::new().check_string("fail").unwrap();
    /// assert_eq!(output, "ok: 1 statement(s), 0 variable(s)\n");
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a checker configured from command-line flags
    pub fn from_cli(cli: &Cli) -> Self {
        Self::new()
            .with_print_tokens(cli.print_tokens)
            .with_print_ast(cli.print_ast)
            .with_json(cli.json)
            .with_format(cli.format)
            .with_verbose(cli.verbose)
    }

    /// Enable token printing
    pub fn with_print_tokens(mut self, enabled: bool) -> Self {
        self.print_tokens = enabled;
        self
    }

    /// Enable AST printing
    pub fn with_print_ast(mut self, enabled: bool) -> Self {
        self.print_ast = enabled;
        self
    }

    /// Enable JSON AST printing
    pub fn with_json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// Enable canonical source printing
    pub fn with_format(mut self, enabled: bool) -> Self {
        self.format = enabled;
        self
    }

    /// Enable stage reporting on stderr
    pub fn with_verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    /// Whether token printing is on
    pub fn prints_tokens(&self) -> bool {
        self.print_tokens
    }

    /// Whether canonical source printing is on
    pub fn prints_format(&self) -> bool {
        self.format
    }

    /// Flip token printing, returning the new state
    pub fn toggle_print_tokens(&mut self) -> bool {
        self.print_tokens = !self.print_tokens;
        self.print_tokens
    }

    /// Flip canonical source printing, returning the new state
    pub fn toggle_format(&mut self) -> bool {
        self.format = !self.format;
        self.format
    }

    /// Check a script file
    ///
    /// # Errors
    /// Returns `CliError::Io` if the file cannot be read and
    /// `CliError::Script` if the script is rejected
    pub fn check_file(&self, path: &str) -> CliResult<String> {
        let source = std::fs::read_to_string(path).map_err(|error| CliError::Io {
            path: path.to_string(),
            error,
        })?;
        self.check_source(&source, path)
    }

    /// Check inline script source
    pub fn check_string(&self, source: &str) -> CliResult<String> {
        self.check_source(source, "<eval>")
    }

    /// Check `source`, naming it `file_name` in diagnostics
    pub fn check_source(&self, source: &str, file_name: &str) -> CliResult<String> {
        self.note(format!("scanning {} ({} chars)", file_name, source.chars().count()));

        let mut output = String::new();
        let parsed = if self.print_tokens {
            let tokens = parser::scan(source).map_err(|e| CliError::script(e, source, file_name))?;
            self.note(format!("{} token(s)", tokens.len()));
            output.push_str(&render_tokens(&tokens));
            parser::parse_tokens(tokens)
        } else {
            parser::parse(source)
        };
        let script = parsed.map_err(|e| CliError::script(e, source, file_name))?;
        self.note(summary(&script));

        if self.print_ast {
            output.push_str(&format!("{:#?}\n", script));
        }
        if self.json {
            output.push_str(&serde_json::to_string_pretty(&script)?);
            output.push('\n');
        }
        if self.format {
            output.push_str(&script.to_string());
        }
        if !self.dumps_output() {
            output.push_str(&summary(&script));
            output.push('\n');
        }
        Ok(output)
    }

    /// Any dump flag replaces the one-line summary
    fn dumps_output(&self) -> bool {
        self.print_tokens || self.print_ast || self.json || self.format
    }

    fn note(&self, message: String) {
        if self.verbose {
            eprintln!("[numscript] {}", message);
        }
    }
}

/// `ok: <n> statement(s), <m> variable(s)`
pub fn summary(script: &Script) -> String {
    format!(
        "ok: {} statement(s), {} variable(s)",
        script.statement_count(),
        script.variables.len()
    )
}

/// One token per line: `line:column KIND lexeme`
pub fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| {
            format!(
                "{}:{} {} {}\n",
                token.line(),
                token.column(),
                kind_name(token.kind),
                token.lexeme.escape_debug()
            )
        })
        .collect()
}

fn kind_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Keyword(_) => "KEYWORD",
        TokenKind::Type(_) => "TYPE",
        TokenKind::Punctuator(_) => "PUNCT",
        TokenKind::String => "STRING",
        TokenKind::Portion => "PORTION",
        TokenKind::Number => "NUMBER",
        TokenKind::Account => "ACCOUNT",
        TokenKind::Asset => "ASSET",
        TokenKind::Variable => "VARIABLE_NAME",
        TokenKind::Newline => "NEWLINE",
        TokenKind::EOF => "EOF",
    }
}
