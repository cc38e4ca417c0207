//! Contract tests for parser API
//!
//! These tests verify the parser component implements its contract correctly.

use core_types::{ErrorKind, ScriptError};
use parser::ast::{AllotmentPortion, Destination, Expr, KeptOrDestination, Literal, Source, ValueAwareSource};
use parser::{parse, parse_tokens, scan, Keyword, Lexer, Parser, Punctuator, Script, Statement, Token, TokenKind};

// =============================================================================
// Lexer Contract Tests
// =============================================================================

#[test]
fn test_lexer_next_token_returns_result() {
    let mut lexer = Lexer::new("send [USD 100]");
    let result: Result<Token, ScriptError> = lexer.next_token();
    assert_eq!(result.unwrap().kind, TokenKind::Keyword(Keyword::Send));
}

#[test]
fn test_scan_ends_with_single_eof() {
    let tokens = scan("fail\n").unwrap();
    let eofs = tokens.iter().filter(|t| t.kind == TokenKind::EOF).count();
    assert_eq!(eofs, 1);
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EOF));
}

#[test]
fn test_token_records_lexeme_and_position() {
    let tokens = scan("print\n  @users:001").unwrap();
    let account = &tokens[2];
    assert_eq!(account.kind, TokenKind::Account);
    assert_eq!(account.lexeme, "@users:001");
    assert_eq!((account.line(), account.column()), (2, 3));
}

#[test]
fn test_portion_is_one_token() {
    for text in ["50%", "12.5%", "1/3", "1 / 3"] {
        let tokens = scan(text).unwrap();
        assert_eq!(tokens.len(), 2, "{:?} should be one token", text);
        assert_eq!(tokens[0].kind, TokenKind::Portion);
        assert_eq!(tokens[0].lexeme, text);
    }
}

#[test]
fn test_monetary_literal_tokens() {
    let kinds: Vec<TokenKind> = scan("[EUR/2 43]").unwrap().into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Punctuator(Punctuator::LBracket),
            TokenKind::Asset,
            TokenKind::Number,
            TokenKind::Punctuator(Punctuator::RBracket),
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_lex_error_reports_character_and_position() {
    let err = scan("print @a\nprint ~").unwrap_err();
    assert_eq!(err.kind, ErrorKind::LexError);
    assert_eq!((err.line(), err.column()), (2, 7));
    assert_eq!(err.found.as_deref(), Some("'~'"));
}

#[test]
fn test_comments_only_leave_newlines() {
    let kinds: Vec<TokenKind> = scan("/* header\n comment */ // trailing\n").unwrap().into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Newline, TokenKind::EOF]);
}

// =============================================================================
// Parser Contract Tests
// =============================================================================

#[test]
fn test_parser_parse_returns_script() {
    let mut parser = Parser::new("fail");
    let result: Result<Script, ScriptError> = parser.parse();
    assert_eq!(result.unwrap().statements, vec![Statement::Fail]);
}

#[test]
fn test_parse_tokens_matches_parse() {
    let source = "send [USD 100] (\n  source = @alice\n  destination = @bob\n)";
    let tokens = scan(source).unwrap();
    assert_eq!(parse_tokens(tokens).unwrap(), parse(source).unwrap());
}

#[test]
fn test_parse_error_is_parse_kind() {
    let err = parse("send [USD 100]").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ParseError);
    assert_eq!(err.found.as_deref(), Some("end of input"));
    assert_eq!(err.expected, vec!["`(`".to_string()]);
}

#[test]
fn test_empty_script_is_rejected() {
    assert!(parse("").is_err());
    assert!(parse("\n\n").is_err());
}

#[test]
fn test_commission_split() {
    let source = r#"vars {
  monetary $amount
  account $seller
  portion $commission
}

send $amount (
  source = @world
  destination = {
    $commission to @platform
    remaining to $seller
  }
)
"#;
    let script = parse(source).unwrap();
    assert_eq!(script.variables.len(), 3);

    let Statement::Send { monetary, clauses } = &script.statements[0] else {
        panic!("expected send");
    };
    assert_eq!(*monetary, Expr::variable("amount"));
    assert_eq!(clauses.source, ValueAwareSource::Plain(Source::FromAccount {
        account: Expr::account("world"),
        overdraft: None,
    }));
    let Destination::Allotted { entries } = &clauses.destination else {
        panic!("expected allotment");
    };
    assert!(matches!(entries[0].portion, AllotmentPortion::VariablePortion(_)));
    assert_eq!(entries[1].portion, AllotmentPortion::Remaining);
    assert_eq!(
        entries[1].target,
        KeptOrDestination::To(Box::new(Destination::ToAccount(Expr::variable("seller"))))
    );
}

#[test]
fn test_ternary_send_amount() {
    let source = "send $cond ? [COIN 1] : [COIN 2] (\n source = @a\n destination = @b\n)";
    let script = parse(source).unwrap();
    let Statement::Send { monetary, .. } = &script.statements[0] else {
        panic!("expected send");
    };
    assert!(matches!(monetary, Expr::Ternary { .. }));
}

#[test]
fn test_literals_strip_sigils_and_quotes() {
    let script = parse("print \"hi\"\nprint @acc\nprint $v").unwrap();
    let exprs: Vec<&Expr> = script
        .statements
        .iter()
        .map(|s| match s {
            Statement::Print { expr } => expr,
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(*exprs[0], Expr::Literal(Literal::String("hi".into())));
    assert_eq!(*exprs[1], Expr::Literal(Literal::Account("acc".into())));
    assert_eq!(*exprs[2], Expr::variable("v"));
}

#[test]
fn test_script_serializes_to_json() {
    let script = parse("print [USD 1]").unwrap();
    let json = serde_json::to_value(&script).unwrap();
    assert!(json["statements"][0]["Print"]["expr"]["MonetaryNew"].is_object());
}

#[test]
fn test_printed_script_reparses() {
    let source = "send [COIN 10] (\n destination = { max [COIN 1] to @x\n remaining kept }\n source = @a\n)";
    // `{` must be followed by a newline
    assert!(parse(source).is_err());

    let source = "send [COIN 10] (\n destination = {\n max [COIN 1] to @x\n remaining kept\n }\n source = @a\n)";
    let script = parse(source).unwrap();
    assert_eq!(parse(&script.to_string()).unwrap(), script);
}
