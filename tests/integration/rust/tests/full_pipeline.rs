//! Full Pipeline Integration Tests
//!
//! Tests the complete flow: Source -> Lexer -> Tokens -> Parser -> AST -> Printer

use core_types::ErrorKind;
use integration_tests::fixtures::*;
use parser::ast::*;
use parser::{parse, parse_tokens, scan, Parser, TokenKind};

/// Helper: scan, then parse the materialized tokens
fn scan_then_parse(source: &str) -> Script {
    let tokens = scan(source).expect("scan failed");
    parse_tokens(tokens).expect("parse failed")
}

/// Test: lazy and materialized parsing agree on every fixture
#[test]
fn test_full_pipeline_entry_points_agree() {
    for source in [SIMPLE_SEND, RIDE, SPLIT, SWEEP, SALE, WATERFALL] {
        let lazy = Parser::new(source).parse().expect("lazy parse failed");
        assert_eq!(lazy, scan_then_parse(source));
    }
}

/// Test: tab-indented send without spaces around `=`
#[test]
fn test_full_pipeline_simple_send() {
    let script = scan_then_parse(SIMPLE_SEND);
    assert_eq!(
        script.statements,
        vec![Statement::Send {
            monetary: Expr::monetary(Expr::asset("EUR/2"), Expr::number("100")),
            clauses: SendClauses {
                source: ValueAwareSource::Plain(Source::FromAccount {
                    account: Expr::account("alice"),
                    overdraft: None,
                }),
                destination: Destination::ToAccount(Expr::account("bob")),
            },
        }]
    );
}

/// Test: variables and metadata statements
#[test]
fn test_full_pipeline_ride() {
    let script = parse(RIDE).unwrap();
    let types: Vec<TypeTag> = script.variables.iter().map(|v| v.ty).collect();
    assert_eq!(
        types,
        vec![TypeTag::Account, TypeTag::Account, TypeTag::String, TypeTag::Number, TypeTag::Asset]
    );
    assert_eq!(script.statement_count(), 3);
    assert_eq!(
        script.statements[2],
        Statement::SetTxMeta {
            key: "ride".into(),
            value: Expr::variable("nb"),
        }
    );
}

/// Test: send-all over an in-order source
#[test]
fn test_full_pipeline_sweep() {
    let script = parse(SWEEP).unwrap();
    let Statement::SendAll { monetary, clauses } = &script.statements[0] else {
        panic!("expected send all, got {:?}", script.statements[0]);
    };
    assert_eq!(monetary.asset, Expr::asset("USD/2"));
    assert_eq!(
        clauses.source,
        Source::InOrder {
            sequence: vec![
                Source::FromAccount {
                    account: Expr::account("users:001:wallet"),
                    overdraft: None,
                },
                Source::FromAccount {
                    account: Expr::account("users:001:credit"),
                    overdraft: None,
                },
            ],
        }
    );
}

/// Test: origins, nested comments, reversed clauses and save
#[test]
fn test_full_pipeline_sale() {
    let script = parse(SALE).unwrap();
    assert_eq!(script.variables.len(), 4);
    assert_eq!(
        script.variable("bal").and_then(|v| v.origin.clone()),
        Some(Origin::BalanceOf {
            account: Expr::variable("sale"),
            asset: Expr::asset("EUR/2"),
        })
    );

    let Statement::Send { clauses, .. } = &script.statements[0] else {
        panic!("expected send");
    };
    assert!(matches!(
        clauses.source,
        ValueAwareSource::Plain(Source::FromAccount {
            overdraft: Some(Overdraft::Bounded(_)),
            ..
        })
    ));
    assert!(matches!(script.statements[1], Statement::Save { amount: SaveAmount::All(_), .. }));
}

/// Test: nested allotments and capped destinations
#[test]
fn test_full_pipeline_waterfall() {
    let script = parse(WATERFALL).unwrap();
    assert_eq!(script.statement_count(), 3);

    let Statement::Send { clauses, .. } = &script.statements[0] else {
        panic!("expected send");
    };
    let ValueAwareSource::Allotted { entries } = &clauses.source else {
        panic!("expected allotted source");
    };
    assert_eq!(entries[0].portion, AllotmentPortion::Const("1/3".into()));
    assert!(matches!(entries[1].source, Source::InOrder { ref sequence } if sequence.len() == 2));

    let Destination::InOrder { capped, remainder } = &clauses.destination else {
        panic!("expected in-order destination");
    };
    assert_eq!(capped.len(), 2);
    assert_eq!(capped[1].cap, Expr::variable("cap"));
    assert_eq!(capped[1].target, KeptOrDestination::Kept);
    assert_eq!(
        *remainder,
        KeptOrDestination::To(Box::new(Destination::ToAccount(Expr::account("rest"))))
    );

    let Statement::Print { expr } = &script.statements[1] else {
        panic!("expected print");
    };
    let Expr::Ternary { cond, .. } = expr else {
        panic!("expected ternary, got {:?}", expr);
    };
    assert!(matches!(**cond, Expr::LogicalAnd { .. }));
}

/// Test: token stream shape for the sale script
#[test]
fn test_full_pipeline_tokens() {
    let tokens = scan(SALE).unwrap();
    let portions = tokens.iter().filter(|t| t.kind == TokenKind::Portion).count();
    assert_eq!(portions, 0);
    let comment_line = SALE.lines().position(|l| l.starts_with("/*")).unwrap() as u32 + 1;
    assert!(tokens.iter().all(|t| t.line() != comment_line || t.kind == TokenKind::Newline));
}

/// Test: errors point at the first offending token
#[test]
fn test_full_pipeline_errors() {
    let cases: Vec<(&str, ErrorKind, u32, u32)> = vec![
        ("", ErrorKind::ParseError, 1, 1),
        ("print \"open", ErrorKind::LexError, 1, 7),
        ("fail\n/* open", ErrorKind::LexError, 2, 1),
        ("send [COIN 1] (\n source = @a\n destination = @b)", ErrorKind::ParseError, 3, 18),
        ("vars { account $a }\nfail", ErrorKind::ParseError, 1, 8),
        ("print 1 +", ErrorKind::ParseError, 1, 10),
        ("send [COIN *] (\n source = {\n  1/2 from @a\n  remaining from @b\n }\n destination = @c\n)", ErrorKind::ParseError, 2, 11),
    ];

    for (source, kind, line, column) in cases {
        let err = parse(source).expect_err(source);
        assert_eq!(err.kind, kind, "{:?}", source);
        assert_eq!((err.line(), err.column()), (line, column), "{:?}: {}", source, err);
    }
}
