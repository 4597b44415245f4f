//! Token streams for both dialects.
//!
//! Snapshot output is one `KIND "literal"` line per token.

mod common;

use common::{dump_tokens, token_kinds};
use glyph_front::{Syntax, SyntaxError, TokenType, tokenize};
use insta::assert_snapshot;

use TokenType::*;

#[test]
fn compact_route_header() {
    assert_snapshot!(dump_tokens("@ GET /users -> User", Syntax::Compact), @r#"
    @ "@"
    IDENT "GET"
    IDENT "/users"
    -> "->"
    IDENT "User"
    EOF ""
    "#);
}

#[test]
fn expanded_route_keeps_keyword_literals() {
    assert_snapshot!(dump_tokens("route /users/:id {\n  return user\n}", Syntax::Expanded), @r#"
    @ "route"
    IDENT "/users/:id"
    { "{"
    NEWLINE ""
    > "return"
    IDENT "user"
    NEWLINE ""
    } "}"
    EOF ""
    "#);
}

#[test]
fn command_flags_are_single_tokens() {
    assert_snapshot!(dump_tokens("! serve --port: int = 8080", Syntax::Compact), @r#"
    ! "!"
    IDENT "serve"
    IDENT "--port"
    : ":"
    IDENT "int"
    = "="
    INTEGER "8080"
    EOF ""
    "#);
}

#[test]
fn expanded_flag_named_after_keyword() {
    let tokens = tokenize("command run --type: str", Syntax::Expanded).unwrap();
    assert_eq!(tokens[0].kind, Bang);
    assert_eq!(tokens[2].literal, "--type");
    assert_eq!(tokens[2].kind, Colon);
    assert!(tokens[2].is_flag());
}

#[test]
fn slash_is_division_after_a_value() {
    assert_eq!(token_kinds("$ x = a / b", Syntax::Compact), vec![Dollar, Ident, Equals, Ident, Slash, Ident, Eof]);
    assert_eq!(token_kinds("$ x = 10 / 2", Syntax::Compact), vec![Dollar, Ident, Equals, Integer, Slash, Integer, Eof]);
}

#[test]
fn slash_opens_a_path_after_an_operator() {
    let tokens = tokenize("$ p = /static/css", Syntax::Compact).unwrap();
    assert_eq!(tokens[3].kind, Ident);
    assert_eq!(tokens[3].literal, "/static/css");
}

#[test]
fn numbers() {
    assert_eq!(token_kinds("42 3.14 0", Syntax::Compact), vec![Integer, Float, Integer, Eof]);
}

#[test]
fn comments_are_dropped() {
    assert_eq!(token_kinds("# heading\n$ x = 1 // trailing", Syntax::Compact), vec![
        Newline, Dollar, Ident, Equals, Integer, Eof
    ]);
}

#[test]
fn reserved_words_in_both_dialects() {
    for syntax in [Syntax::Compact, Syntax::Expanded] {
        assert_eq!(token_kinds("match x when true", syntax), vec![Match, Ident, When, True, Eof]);
        assert_eq!(token_kinds("for k, v in xs", syntax), vec![For, Ident, Comma, Ident, In, Ident, Eof]);
    }
}

#[test]
fn expanded_words_are_plain_identifiers_in_compact() {
    assert_eq!(token_kinds("route let return", Syntax::Compact), vec![Ident, Ident, Ident, Eof]);
    assert_eq!(token_kinds("route let return", Syntax::Expanded), vec![At, Dollar, Greater, Eof]);
}

#[test]
fn positions_are_one_based() {
    let tokens = tokenize("a\n  bc", Syntax::Compact).unwrap();
    let positions: Vec<_> = tokens.iter().map(|t| (t.kind, t.line, t.column)).collect();
    assert_eq!(positions, vec![(Ident, 1, 1), (Newline, 1, 2), (Ident, 2, 3), (Eof, 2, 5)]);
    assert_eq!((tokens[2].span.start, tokens[2].span.end), (4, 6));
}

#[test]
fn empty_source_is_just_eof() {
    let tokens = tokenize("", Syntax::Expanded).unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!((tokens[0].kind, tokens[0].line, tokens[0].column), (Eof, 1, 1));
}

#[test]
fn semicolon_is_illegal() {
    let err = tokenize("$ x = 1;", Syntax::Compact).unwrap_err();
    assert_eq!((err.line, err.column, err.ch), (1, 8, ';'));
    assert!(err.message.starts_with("Unexpected character ';' (0x3B)."));
    assert!(err.message.contains("semicolons"));
}

#[test]
fn unterminated_string_points_at_the_quote() {
    let err = tokenize("$ s = \"abc", Syntax::Expanded).unwrap_err();
    assert_eq!((err.line, err.column, err.ch), (1, 7, '"'));
    assert!(err.message.starts_with("Unterminated string literal starting with \""));
}

#[test]
fn lex_error_renders_excerpt() {
    let err: SyntaxError = tokenize("$ ok = 1\n$ bad = `x`", Syntax::Compact).unwrap_err().into();
    assert_snapshot!(err.to_string(), @r#"
    Lexer error at line 2, column 9:
         2 | $ bad = `x`
           |         ^

    Unexpected character '`' (0x60). Use double quotes (") or single quotes (') for strings
    "#);
}
