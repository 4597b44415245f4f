//! Parameter ordering, flags, and default-value checking.

mod common;

use common::{compact, expanded, only_item, parse_fails};
use glyph_front::parser::ast::{BinOp, Expr, Item, Literal, Param, TypeAnnotation};
use glyph_front::Syntax;

fn function_params(src: &str) -> Vec<Param> {
    match only_item(compact(src)) {
        Item::Function(f) => f.params,
        other => panic!("expected function, got {other:#?}"),
    }
}

fn command_params(src: &str) -> Vec<Param> {
    match only_item(compact(src)) {
        Item::Command(c) => c.params,
        other => panic!("expected command, got {other:#?}"),
    }
}

#[test]
fn required_after_optional_is_rejected() {
    let err = parse_fails("! greet(greeting: str = \"Hello\", name: str!) {\n  > name\n}", Syntax::Compact);
    assert_eq!(err.message(), "required parameter 'name' cannot come after optional parameters");
    assert_eq!((err.line(), err.column()), (1, 34));
}

#[test]
fn required_after_optional_in_commands() {
    let err = parse_fails("! run --level: int = 1 target: str! {\n}", Syntax::Compact);
    assert_eq!(err.message(), "required parameter 'target' cannot come after optional parameters");
}

#[test]
fn unmarked_params_are_optional() {
    let params = function_params("! f(a: int!, b: int, c) {\n}");
    let optional: Vec<_> = params.iter().map(Param::is_optional).collect();
    assert_eq!(optional, vec![false, true, true]);
    assert_eq!(params[2].ty, None);
}

#[test]
fn required_with_default_counts_as_optional() {
    let params = function_params("! f(a: int! = 1, b: str = \"x\") {\n}");
    assert!(params[0].required);
    assert!(params[0].is_optional());
}

#[test]
fn literal_default_mismatches() {
    let cases = [
        ("! f(port: int = \"80\") {\n}", "default value type mismatch for 'port': expects int, got string"),
        ("! f(ratio: float = 1) {\n}", "default value type mismatch for 'ratio': expects float, got int"),
        ("! f(on: bool = 0) {\n}", "default value type mismatch for 'on': expects bool, got int"),
        ("! f(name: str = true) {\n}", "default value type mismatch for 'name': expects string, got bool"),
        ("! f(n: int = 1.5) {\n}", "default value type mismatch for 'n': expects int, got float"),
    ];
    for (src, message) in cases {
        assert_eq!(parse_fails(src, Syntax::Compact).message(), message, "for {src:?}");
    }
}

#[test]
fn mismatch_points_at_the_parameter_name() {
    let err = parse_fails("! f(\n  a: int,\n  b: int = \"x\"\n) {\n}", Syntax::Compact);
    assert_eq!((err.line(), err.column()), (3, 3));
}

#[test]
fn defaults_that_are_not_checked() {
    let params = function_params("! f(a: int = null, b: int = base + 1, c: User = 1, d: int[] = [1]) {\n}");
    assert_eq!(params[0].default, Some(Expr::Literal(Literal::Null)));
    assert!(matches!(params[1].default, Some(Expr::Binary { op: BinOp::Add, .. })));
    assert_eq!(params[2].ty, Some(TypeAnnotation::Named("User".into())));
    assert_eq!(params[3].default, Some(Expr::Array(vec![Expr::Literal(Literal::Int(1))])));
}

#[test]
fn negative_defaults() {
    let params = function_params("! f(offset: int = -5, scale: float = -0.5) {\n}");
    assert_eq!(params[0].default, Some(Expr::Literal(Literal::Int(-5))));
    assert_eq!(params[1].default, Some(Expr::Literal(Literal::Float(-0.5))));
}

#[test]
fn flags_stop_the_previous_default() {
    let params = command_params("! serve --host: str = \"0.0.0.0\" --port: int = 8080 --verbose {\n}");
    let names: Vec<_> = params.iter().map(|p| (p.name.as_str(), p.is_flag)).collect();
    assert_eq!(names, vec![("host", true), ("port", true), ("verbose", true)]);
    assert_eq!(params[2].ty, None);
}

#[test]
fn spaced_flag_form() {
    let params = command_params("! run - -verbose: bool = false {\n}");
    assert_eq!(params.len(), 1);
    assert!(params[0].is_flag);
    assert_eq!(params[0].name, "verbose");
}

#[test]
fn flag_named_after_an_expanded_keyword() {
    let Item::Command(cmd) = only_item(expanded("command fetch --type: str = \"json\" --return: int = 1 {\n}")) else {
        panic!("expected command");
    };
    let names: Vec<_> = cmd.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["type", "return"]);
    assert!(cmd.params.iter().all(|p| p.is_flag));
}

#[test]
fn flag_default_mismatch() {
    let err = parse_fails("! serve --port: int = \"eighty\" {\n}", Syntax::Compact);
    assert_eq!(err.message(), "default value type mismatch for 'port': expects int, got string");
    assert_eq!(err.column(), 9);
}

#[test]
fn const_and_field_defaults_are_checked() {
    let err = parse_fails("const MAX: int = \"ten\"", Syntax::Compact);
    assert_eq!(err.message(), "default value type mismatch for 'MAX': expects int, got string");

    let err = parse_fails(": Settings {\n  debug: bool = \"yes\"\n}", Syntax::Compact);
    assert_eq!(err.message(), "default value type mismatch for 'debug': expects bool, got string");
    assert_eq!((err.line(), err.column()), (2, 3));
}
