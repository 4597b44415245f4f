// Invariants of the parser over generated sources.

use glyph_front::{Syntax, parse_source};
use proptest::prelude::*;

fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "@", "GET", "/users", ":", "User", "{", "}", "(", ")", "[", "]", "$", "x", "=", "1", "2.5", "\"s\"", ">",
        "!", "--flag", "->", "int", "str", "|>", "+", "*", ",", ".", "\n", "~", "&", "%", "<", "?", "if", "else",
        "match", "=>", "_", "macro", "import", "from", "const", "test", "trait", "route", "let", "return",
    ])
}

fn soup() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..60).prop_map(|parts| parts.join(" "))
}

/// Parsing either fails cleanly or succeeds; it never panics.
#[test]
fn prop_parser_never_panics() {
    proptest!(|(source in soup())| {
        let _ = parse_source(&source, Syntax::Compact);
        let _ = parse_source(&source, Syntax::Expanded);
    });
}

#[test]
fn prop_parser_never_panics_on_any_text() {
    proptest!(|(source in "\\PC{0,300}")| {
        let _ = parse_source(&source, Syntax::Compact);
    });
}

#[test]
fn prop_parse_is_deterministic() {
    proptest!(|(source in soup())| {
        prop_assert_eq!(parse_source(&source, Syntax::Compact), parse_source(&source, Syntax::Compact));
    });
}

/// Error positions always fall inside the source.
#[test]
fn prop_error_positions_in_range() {
    proptest!(|(source in soup())| {
        if let Err(err) = parse_source(&source, Syntax::Compact) {
            let lines = source.split('\n').count();
            prop_assert!(err.line() >= 1 && err.line() <= lines);
            prop_assert!(err.column() >= 1);
            prop_assert!(err.span().start <= source.len());
        }
    });
}

#[derive(Debug, Clone)]
enum Body {
    Let(String, i64),
    Return(String),
    Call(String, i64),
}

fn body_stmt() -> impl Strategy<Value = Body> {
    let name = "[a-z][a-z0-9]{0,5}".prop_filter("not a keyword", |n| {
        !matches!(
            n.as_str(),
            "if" | "in" | "for" | "as" | "let" | "type" | "func" | "cron" | "queue" | "route" | "return" | "handle"
                | "inject" | "expects" | "command" | "validate" | "middleware" | "while" | "match" | "when" | "case"
                | "async" | "await" | "true" | "false" | "null" | "from" | "const" | "macro" | "quote" | "switch"
                | "default" | "import" | "module" | "assert" | "break" | "continue"
        )
    });
    prop_oneof![
        (name.clone(), 0i64..1000).prop_map(|(n, v)| Body::Let(n, v)),
        name.clone().prop_map(Body::Return),
        (name, 0i64..1000).prop_map(|(n, v)| Body::Call(n, v)),
    ]
}

fn render(name: &str, body: &[Body], syntax: Syntax) -> String {
    let (func, let_kw, ret) = match syntax {
        Syntax::Compact => ("=", "$", ">"),
        Syntax::Expanded => ("func", "let", "return"),
    };
    let mut out = format!("{func} {name}(a: int!, b: str = \"x\") -> int {{\n");
    for stmt in body {
        let line = match stmt {
            Body::Let(n, v) => format!("  {let_kw} {n} = {v} + a\n"),
            Body::Return(n) => format!("  {ret} {n}\n"),
            Body::Call(n, v) => format!("  log.info({n}, {v})\n"),
        };
        out.push_str(&line);
    }
    out.push_str("}\n");
    out
}

/// A program spelled in either dialect parses to the same items.
#[test]
fn prop_dialects_parse_alike() {
    proptest!(|(name in "fn_[a-z]{0,6}", body in prop::collection::vec(body_stmt(), 0..8))| {
        let compact = parse_source(&render(&name, &body, Syntax::Compact), Syntax::Compact).unwrap();
        let expanded = parse_source(&render(&name, &body, Syntax::Expanded), Syntax::Expanded).unwrap();
        prop_assert_eq!(compact.nodes().collect::<Vec<_>>(), expanded.nodes().collect::<Vec<_>>());
    });
}
