//! End-to-End CLI Integration Tests
//!
//! Tests the complete front end through the ns_cli Checker API.
//! This is the highest level integration test - script file to CLI output.

use integration_tests::fixtures::*;
use ns_cli::{Checker, CliError};
use std::fs;
use tempfile::TempDir;

fn write_script(dir: &TempDir, name: &str, source: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, source).unwrap();
    path.to_str().unwrap().to_string()
}

/// Test: summary line for every fixture
#[test]
fn test_e2e_summaries() {
    let dir = TempDir::new().unwrap();
    let cases = [
        ("simple.num", SIMPLE_SEND, "ok: 1 statement(s), 0 variable(s)\n"),
        ("ride.num", RIDE, "ok: 3 statement(s), 5 variable(s)\n"),
        ("sale.num", SALE, "ok: 2 statement(s), 4 variable(s)\n"),
        ("waterfall.num", WATERFALL, "ok: 3 statement(s), 0 variable(s)\n"),
    ];

    for (name, source, expected) in cases {
        let path = write_script(&dir, name, source);
        assert_eq!(Checker::new().check_file(&path).unwrap(), expected);
    }
}

/// Test: JSON dump is valid JSON mirroring the tree
#[test]
fn test_e2e_json() {
    let output = Checker::new().with_json(true).check_string(SWEEP).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    let send_all = &value["statements"][0]["SendAll"];
    assert_eq!(send_all["monetary"]["asset"]["Literal"]["Asset"], "USD/2");
    assert_eq!(
        send_all["clauses"]["destination"]["ToAccount"]["Literal"]["Account"],
        "platform"
    );
}

/// Test: token dump lists newline tokens and ends with EOF
#[test]
fn test_e2e_tokens() {
    let output = Checker::new().with_print_tokens(true).check_string(SIMPLE_SEND).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "1:1 KEYWORD send");
    assert_eq!(lines[1], "1:6 PUNCT [");
    assert_eq!(lines[2], "1:7 ASSET EUR/2");
    assert!(lines.contains(&"2:2 KEYWORD source"));
    assert_eq!(lines.last(), Some(&"4:2 EOF "));
}

/// Test: rendered diagnostic for a lex error in a file
#[test]
fn test_e2e_lex_error() {
    let dir = TempDir::new().unwrap();
    let path = write_script(&dir, "bad.num", "send [COIN 10] (\n  source = @a\n  destination = #b\n)\n");

    let err = Checker::new().check_file(&path).unwrap_err();
    assert!(matches!(&err, CliError::Script { error, .. } if error.column() == 17));
    let rendered = err.render();
    assert!(rendered.starts_with("error: lex error: unexpected character '#'"));
    assert!(rendered.contains("3 |   destination = #b"));
    assert!(rendered.ends_with("|                 ^"));
}

/// Test: unreadable file
#[test]
fn test_e2e_missing_file() {
    let err = Checker::new().check_file("/no/such/dir/script.num").unwrap_err();
    assert!(err.render().starts_with("Error: could not read file '/no/such/dir/script.num'"));
}
