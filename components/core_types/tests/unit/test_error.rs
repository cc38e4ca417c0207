//! Unit tests for ScriptError and ErrorKind

use core_types::{ErrorKind, ScriptError, SourcePosition};

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn test_error_kind_lex_error() {
        let kind = ErrorKind::LexError;
        assert!(matches!(kind, ErrorKind::LexError));
    }

    #[test]
    fn test_error_kind_parse_error() {
        let kind = ErrorKind::ParseError;
        assert!(matches!(kind, ErrorKind::ParseError));
    }

    #[test]
    fn test_error_kind_equality() {
        assert_eq!(ErrorKind::LexError, ErrorKind::LexError);
        assert_ne!(ErrorKind::LexError, ErrorKind::ParseError);
    }
}

#[cfg(test)]
mod script_error_tests {
    use super::*;

    fn sample() -> ScriptError {
        ScriptError::new(
            ErrorKind::ParseError,
            "expected `remaining`, found `}`",
            SourcePosition::new(6, 5, 88),
        )
        .with_expected(["`remaining`", "`max`"])
        .with_found("`}`")
    }

    #[test]
    fn test_script_error_exposes_line_column_message() {
        let error = sample();
        assert_eq!(error.line(), 6);
        assert_eq!(error.column(), 5);
        assert_eq!(error.message, "expected `remaining`, found `}`");
    }

    #[test]
    fn test_script_error_display() {
        assert_eq!(
            sample().to_string(),
            "syntax error at 6:5: expected `remaining`, found `}`"
        );
    }

    #[test]
    fn test_script_error_is_std_error() {
        let boxed: Box<dyn std::error::Error> = Box::new(sample());
        assert!(boxed.to_string().starts_with("syntax error"));
    }

    #[test]
    fn test_script_error_expected_sorted() {
        assert_eq!(sample().expected, vec!["`max`", "`remaining`"]);
    }

    #[test]
    fn test_render_includes_expected_note() {
        let source = "send [COIN 10] (\n  source = @a\n  destination = {\n    max [COIN 1] to @b\n\n    }\n)";
        let rendered = sample().render(source, "payout.num");
        assert!(rendered.starts_with("error: syntax error: expected `remaining`"));
        assert!(rendered.contains("--> payout.num:6:5"));
        assert!(rendered.contains("6 |     }"));
        assert!(rendered.contains("= expected one of: `max`, `remaining`"));
    }

    #[test]
    fn test_render_keeps_tabs_aligned() {
        let error = ScriptError::new(ErrorKind::LexError, "unexpected character '#'", SourcePosition::new(1, 3, 2));
        let rendered = error.render("\t\t#", "tabs.num");
        assert!(rendered.ends_with("| \t\t^"));
    }

    #[test]
    fn test_render_splits_lines_like_the_scanner() {
        let error = ScriptError::new(ErrorKind::LexError, "unexpected character '#'", SourcePosition::new(2, 7, 11));
        let rendered = error.render("fail\rprint #", "cr.num");
        assert!(rendered.contains("2 | print #"));
        assert!(rendered.ends_with("|       ^"));

        let crlf = ScriptError::new(ErrorKind::LexError, "unexpected character '#'", SourcePosition::new(3, 1, 12));
        let rendered = crlf.render("fail\r\nfail\n#", "mixed.num");
        assert!(rendered.contains("3 | #"));
    }

    #[test]
    fn test_script_error_serializes() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["kind"], "ParseError");
        assert_eq!(json["position"]["line"], 6);
        assert_eq!(json["found"], "`}`");
    }
}
