//! REPL (Read-Eval-Print Loop) implementation

use crate::checker::{render_tokens, Checker};
use crate::error::{CliError, CliResult};
use core_types::{ErrorKind, ScriptError};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Result of feeding a buffer to the REPL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// The buffer ends mid-construct; keep reading lines
    Incomplete,
    /// Text to print on stdout
    Output(String),
    /// Rendered diagnostic to print on stderr
    Error(String),
}

/// Run the interactive REPL
///
/// # Arguments
/// * `checker` - Output settings; `.tokens` and `.format` toggle them
///
/// # Returns
/// `Ok(())` when REPL exits normally
pub fn run_repl(checker: &mut Checker) -> CliResult<()> {
    let mut editor =
        DefaultEditor::new().map_err(|e| CliError::Repl(format!("Failed to initialize editor: {}", e)))?;

    println!("NumScript v{}", env!("CARGO_PKG_VERSION"));
    println!("Type a script, .help for commands, or 'exit' to quit.");
    println!();

    let mut line_buffer = String::new();
    let mut in_multiline = false;

    loop {
        let prompt = if in_multiline { "... " } else { "> " };

        match editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                if !in_multiline && (trimmed == "exit" || trimmed == ".exit" || trimmed == "quit") {
                    println!("Goodbye!");
                    break;
                }

                if !in_multiline && trimmed.starts_with('.') {
                    handle_repl_command(trimmed, checker);
                    continue;
                }

                if !in_multiline && trimmed.is_empty() {
                    continue;
                }

                if in_multiline {
                    line_buffer.push('\n');
                }
                line_buffer.push_str(&line);

                match evaluate(checker, &line_buffer) {
                    Evaluation::Incomplete => {
                        in_multiline = true;
                        continue;
                    }
                    Evaluation::Output(text) => print!("{}", text),
                    Evaluation::Error(text) => eprintln!("{}", text),
                }

                let _ = editor.add_history_entry(&line_buffer);
                line_buffer.clear();
                in_multiline = false;
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                if in_multiline {
                    println!("^C");
                    line_buffer.clear();
                    in_multiline = false;
                } else {
                    println!("Press Ctrl-D or type 'exit' to quit");
                }
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                return Err(CliError::Repl(format!("Readline error: {}", err)));
            }
        }
    }

    Ok(())
}

/// Parse the accumulated buffer and decide what to show
pub fn evaluate(checker: &Checker, buffer: &str) -> Evaluation {
    if !is_input_complete(buffer) {
        return Evaluation::Incomplete;
    }

    let tokens = match parser::scan(buffer) {
        Ok(tokens) => tokens,
        Err(error) => return Evaluation::Error(CliError::script(error, buffer, "<repl>").render()),
    };
    let token_dump = if checker.prints_tokens() {
        render_tokens(&tokens)
    } else {
        String::new()
    };

    match parser::parse_tokens(tokens) {
        Ok(script) if checker.prints_format() => Evaluation::Output(format!("{}{}", token_dump, script)),
        Ok(script) => Evaluation::Output(format!("{}{:#?}\n", token_dump, script)),
        Err(error) if ends_early(&error) => Evaluation::Incomplete,
        Err(error) => Evaluation::Error(CliError::script(error, buffer, "<repl>").render()),
    }
}

/// A parse that ran out of input may succeed once more lines arrive
fn ends_early(error: &ScriptError) -> bool {
    error.kind == ErrorKind::ParseError && error.found.as_deref() == Some("end of input")
}

/// Handle special REPL commands
fn handle_repl_command(command: &str, checker: &mut Checker) {
    match command {
        ".help" => {
            println!("REPL Commands:");
            println!("  .help     - Show this help message");
            println!("  .tokens   - Toggle the token dump");
            println!("  .format   - Toggle canonical output instead of the syntax tree");
            println!("  .exit     - Exit the REPL");
            println!("  exit      - Exit the REPL");
            println!("  quit      - Exit the REPL");
        }
        ".tokens" => {
            let on = checker.toggle_print_tokens();
            println!("Token dump: {}", if on { "on" } else { "off" });
        }
        ".format" => {
            let on = checker.toggle_format();
            println!("Canonical output: {}", if on { "on" } else { "off" });
        }
        _ => {
            println!("Unknown command: {}", command);
            println!("Type .help for available commands");
        }
    }
}

/// Check if the input appears to be complete
///
/// Brackets, braces and parentheses must balance outside strings and
/// comments, and no string or block comment may be left open.
fn is_input_complete(input: &str) -> bool {
    let mut depth: i32 = 0;
    let mut comment_depth = 0;
    let mut in_string = false;
    let mut in_line_comment = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_line_comment {
            if c == '\n' || c == '\r' {
                in_line_comment = false;
            }
            continue;
        }
        if in_string {
            if c == '"' {
                in_string = false;
            }
            continue;
        }
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            comment_depth += 1;
            continue;
        }
        if comment_depth > 0 {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                comment_depth -= 1;
            }
            continue;
        }

        match c {
            '/' if chars.peek() == Some(&'/') => in_line_comment = true,
            '"' => in_string = true,
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth -= 1,
            _ => {}
        }
    }

    depth <= 0 && comment_depth == 0 && !in_string
}
