//! Operator precedence and associativity, through full statement parsing.

mod common;

use common::{expr, fn_body};
use glyph_front::parser::ast::{BinOp, Expr, LambdaBody, Literal, Pattern, Stmt, UnaryOp};

fn var(name: &str) -> Expr {
    Expr::Var(name.into())
}

fn int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

fn bin(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary { op, left: Box::new(left), right: Box::new(right) }
}

fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::Unary { op, operand: Box::new(operand) }
}

#[test]
fn multiplicative_over_additive() {
    assert_eq!(expr("a + b * c"), bin(BinOp::Add, var("a"), bin(BinOp::Mul, var("b"), var("c"))));
    assert_eq!(expr("a * b + c"), bin(BinOp::Add, bin(BinOp::Mul, var("a"), var("b")), var("c")));
    assert_eq!(expr("a - b % c"), bin(BinOp::Sub, var("a"), bin(BinOp::Mod, var("b"), var("c"))));
}

#[test]
fn left_associative_levels() {
    assert_eq!(expr("a - b + c"), bin(BinOp::Add, bin(BinOp::Sub, var("a"), var("b")), var("c")));
    assert_eq!(expr("a / b * c"), bin(BinOp::Mul, bin(BinOp::Div, var("a"), var("b")), var("c")));
    assert_eq!(expr("a == b == c"), bin(BinOp::Eq, bin(BinOp::Eq, var("a"), var("b")), var("c")));
}

#[test]
fn relational_over_equality_over_logic() {
    assert_eq!(
        expr("a < b == c >= d"),
        bin(BinOp::Eq, bin(BinOp::Lt, var("a"), var("b")), bin(BinOp::Ge, var("c"), var("d")))
    );
    assert_eq!(
        expr("a || b && c"),
        bin(BinOp::Or, var("a"), bin(BinOp::And, var("b"), var("c")))
    );
    assert_eq!(
        expr("x != 1 && y <= 2"),
        bin(BinOp::And, bin(BinOp::Ne, var("x"), int(1)), bin(BinOp::Le, var("y"), int(2)))
    );
}

#[test]
fn pipe_binds_loosest() {
    assert_eq!(
        expr("a + 1 |> inc |> double(2)"),
        Expr::Pipe {
            left: Box::new(Expr::Pipe {
                left: Box::new(bin(BinOp::Add, var("a"), int(1))),
                right: Box::new(var("inc")),
            }),
            right: Box::new(Expr::Call { name: "double".into(), args: vec![int(2)] }),
        }
    );
}

#[test]
fn unary_binds_tighter_than_binary() {
    assert_eq!(expr("!a && b"), bin(BinOp::And, unary(UnaryOp::Not, var("a")), var("b")));
    assert_eq!(expr("-x * 2"), bin(BinOp::Mul, unary(UnaryOp::Neg, var("x")), int(2)));
    assert_eq!(expr("-3 + 4"), bin(BinOp::Add, int(-3), int(4)));
}

#[test]
fn grouping_overrides() {
    assert_eq!(expr("(a + b) * c"), bin(BinOp::Mul, bin(BinOp::Add, var("a"), var("b")), var("c")));
}

#[test]
fn postfix_binds_tightest() {
    assert_eq!(
        expr("-user.age"),
        unary(UnaryOp::Neg, Expr::FieldAccess { object: Box::new(var("user")), field: "age".into() })
    );
    assert_eq!(
        expr("xs[i + 1] * 2"),
        bin(
            BinOp::Mul,
            Expr::Index { object: Box::new(var("xs")), index: Box::new(bin(BinOp::Add, var("i"), int(1))) },
            int(2)
        )
    );
}

#[test]
fn operator_at_line_end_continues() {
    assert_eq!(expr("a +\n  b"), bin(BinOp::Add, var("a"), var("b")));
}

#[test]
fn newline_ends_an_expression() {
    let body = fn_body("$ a = 1\n$ b = -2");
    assert_eq!(body.len(), 2);
    assert_eq!(body[1], Stmt::Let { name: "b".into(), ty: None, value: Some(int(-2)) });
}

#[test]
fn flag_spelling_outside_params_is_subtraction() {
    assert_eq!(expr("a --b"), bin(BinOp::Sub, var("a"), unary(UnaryOp::Neg, var("b"))));
}

#[test]
fn lambda_body_takes_whole_expression() {
    assert_eq!(
        expr("(x) => x * 2 + 1"),
        Expr::Lambda {
            params: vec!["x".into()],
            body: LambdaBody::Expr(Box::new(bin(BinOp::Add, bin(BinOp::Mul, var("x"), int(2)), int(1)))),
        }
    );
}

#[test]
fn match_guards_and_patterns() {
    let Expr::Match { value, arms } = expr("match n {\n  0 => \"zero\"\n  x when x < 0 => \"neg\"\n  _ => \"pos\"\n}") else {
        panic!("expected match");
    };
    assert_eq!(*value, var("n"));
    assert_eq!(arms.len(), 3);
    assert_eq!(arms[0].pattern, Pattern::Literal(Literal::Int(0)));
    assert_eq!(arms[1].guard, Some(bin(BinOp::Lt, var("x"), int(0))));
    assert_eq!(arms[2].pattern, Pattern::Wildcard);
}

#[test]
fn await_applies_to_the_operand() {
    assert_eq!(
        expr("await fetch(url) + 1"),
        bin(BinOp::Add, Expr::Await(Box::new(Expr::Call { name: "fetch".into(), args: vec![var("url")] })), int(1))
    );
}
