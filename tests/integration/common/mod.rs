#![allow(dead_code)]

use glyph_front::parser::ast::{Expr, Item, Module, Stmt};
use glyph_front::{Syntax, SyntaxError, TokenType, parse_source, tokenize};

/// Parse source and expect success
pub fn parse_ok(source: &str, syntax: Syntax) -> Module {
    match parse_source(source, syntax) {
        Ok(module) => module,
        Err(err) => panic!("parsing should succeed for {source:?}:\n{err}"),
    }
}

pub fn compact(source: &str) -> Module {
    parse_ok(source, Syntax::Compact)
}

pub fn expanded(source: &str) -> Module {
    parse_ok(source, Syntax::Expanded)
}

/// Parse source and expect failure
pub fn parse_fails(source: &str, syntax: Syntax) -> SyntaxError {
    match parse_source(source, syntax) {
        Ok(module) => panic!("parsing should fail for {source:?}, got {module:#?}"),
        Err(err) => err,
    }
}

/// The single item of a one-item module
pub fn only_item(module: Module) -> Item {
    let mut nodes: Vec<Item> = module.items.into_iter().map(|i| i.node).collect();
    assert_eq!(nodes.len(), 1, "expected exactly one item, got {nodes:#?}");
    nodes.remove(0)
}

/// Item kinds in source order
pub fn item_kinds(module: &Module) -> Vec<&'static str> {
    module.nodes().map(Item::kind).collect()
}

/// Body of a compact function wrapping `body`
pub fn fn_body(body: &str) -> Vec<Stmt> {
    let source = format!("! wrapper() {{\n{body}\n}}");
    match only_item(compact(&source)) {
        Item::Function(f) => f.body,
        other => panic!("expected function, got {other:#?}"),
    }
}

/// Expression on the right of `$ it = <expr>`
pub fn expr(source: &str) -> Expr {
    match fn_body(&format!("$ it = {source}")).remove(0) {
        Stmt::Let { value: Some(value), .. } => value,
        other => panic!("expected let, got {other:#?}"),
    }
}

pub fn token_kinds(source: &str, syntax: Syntax) -> Vec<TokenType> {
    tokenize(source, syntax).expect("lexing should succeed").into_iter().map(|t| t.kind).collect()
}

/// One `KIND "literal"` line per token, for snapshots.
pub fn dump_tokens(source: &str, syntax: Syntax) -> String {
    tokenize(source, syntax)
        .expect("lexing should succeed")
        .iter()
        .map(|t| format!("{} {:?}", t.kind, t.literal))
        .collect::<Vec<_>>()
        .join("\n")
}
