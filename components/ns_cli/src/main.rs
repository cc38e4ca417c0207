//! NumScript CLI
//!
//! Entry point for the `numscript` tool. Parses CLI arguments and
//! delegates to the Checker.

use clap::Parser as ClapParser;
use ns_cli::{repl, Checker, Cli, CliResult};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut checker = Checker::from_cli(&cli);

    if let Some(file) = &cli.file {
        report(checker.check_file(file));
    } else if let Some(code) = &cli.eval {
        report(checker.check_string(code));
    } else if cli.repl {
        repl::run_repl(&mut checker)?;
    } else {
        // Default: show usage
        println!("NumScript v{}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Usage:");
        println!("  numscript --file <FILE>     Check a NumScript file");
        println!("  numscript --eval <CODE>     Check inline NumScript source");
        println!("  numscript --repl            Start interactive REPL");
        println!();
        println!("Run 'numscript --help' for more options.");
    }

    Ok(())
}

fn report(result: CliResult<String>) {
    match result {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("{}", e.render());
            std::process::exit(1);
        }
    }
}
