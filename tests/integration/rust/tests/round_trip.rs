//! Print -> parse round trip over fixtures and generated expressions

use integration_tests::fixtures::*;
use parser::parse;
use proptest::prelude::*;

#[test]
fn test_fixtures_round_trip() {
    for source in [SIMPLE_SEND, RIDE, SPLIT, SWEEP, SALE, WATERFALL] {
        let script = parse(source).unwrap();
        let printed = script.to_string();
        assert_eq!(parse(&printed).unwrap(), script, "printed form:\n{}", printed);
        assert_eq!(parse(&printed).unwrap().to_string(), printed);
    }
}

/// Expression source text built from the grammar's operators
fn expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[a-z][a-z0-9_]{0,6}".prop_map(|v| format!("${}", v)),
        "[a-z][a-z0-9:]{0,6}".prop_map(|a| format!("@{}", a)),
        (0u32..10_000).prop_map(|n| n.to_string()),
        (1u32..100).prop_map(|n| format!("{}%", n)),
        (1u32..10, 1u32..10).prop_map(|(n, d)| format!("{}/{}", n, d)),
        "[A-Z]{1,4}",
        "[a-z ]{0,8}".prop_map(|s| format!("\"{}\"", s)),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(vec!["+", "-", "==", "!=", "<", "<=", ">", ">=", "&&", "||"]), inner.clone())
                .prop_map(|(l, op, r)| format!("{} {} {}", l, op, r)),
            inner.clone().prop_map(|e| format!("({})", e)),
            inner.clone().prop_map(|e| format!("!({})", e)),
            (inner.clone(), inner.clone()).prop_map(|(a, n)| format!("[({}) ({})]", a, n)),
            (inner.clone(), inner.clone(), inner).prop_map(|(c, t, f)| format!("({}) ? {} : {}", c, t, f)),
        ]
    })
}

proptest! {
    #[test]
    fn printed_expressions_reparse(expr in expression()) {
        let script = parse(&format!("print {}", expr)).unwrap();
        prop_assert_eq!(parse(&script.to_string()).unwrap(), script);
    }

    #[test]
    fn clause_order_does_not_matter(amount in 1u32..1000, from in "[a-z]{1,8}", to in "[a-z]{1,8}") {
        let forward = format!("send [COIN {}] (\n source = @{}\n destination = @{}\n)", amount, from, to);
        let reversed = format!("send [COIN {}] (\n destination = @{}\n source = @{}\n)", amount, to, from);
        prop_assert_eq!(parse(&forward).unwrap(), parse(&reversed).unwrap());
    }
}
