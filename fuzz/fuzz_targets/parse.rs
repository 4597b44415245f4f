#![no_main]
use arbitrary::Arbitrary;
use glyph_front::lexer::{Token, TokenType};
use glyph_front::span::Span;
use libfuzzer_sys::fuzz_target;

/// Token kinds worth feeding the parser directly, bypassing the lexer.
#[derive(Arbitrary, Debug)]
enum FuzzToken {
    Ident,
    Path,
    Flag,
    Integer,
    Float,
    Str,
    At,
    Colon,
    Dollar,
    Greater,
    Bang,
    Question,
    Tilde,
    Ampersand,
    Star,
    Plus,
    Percent,
    Less,
    Equals,
    Arrow,
    FatArrow,
    PipeOp,
    Pipe,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Match,
    Macro,
    Newline,
}

impl FuzzToken {
    fn to_token(&self, offset: usize) -> Token {
        let (kind, literal) = match self {
            FuzzToken::Ident => (TokenType::Ident, "x"),
            FuzzToken::Path => (TokenType::Ident, "/users/:id"),
            FuzzToken::Flag => (TokenType::Ident, "--force"),
            FuzzToken::Integer => (TokenType::Integer, "42"),
            FuzzToken::Float => (TokenType::Float, "1.5"),
            FuzzToken::Str => (TokenType::String, "s"),
            FuzzToken::At => (TokenType::At, "@"),
            FuzzToken::Colon => (TokenType::Colon, ":"),
            FuzzToken::Dollar => (TokenType::Dollar, "$"),
            FuzzToken::Greater => (TokenType::Greater, ">"),
            FuzzToken::Bang => (TokenType::Bang, "!"),
            FuzzToken::Question => (TokenType::Question, "?"),
            FuzzToken::Tilde => (TokenType::Tilde, "~"),
            FuzzToken::Ampersand => (TokenType::Ampersand, "&"),
            FuzzToken::Star => (TokenType::Star, "*"),
            FuzzToken::Plus => (TokenType::Plus, "+"),
            FuzzToken::Percent => (TokenType::Percent, "%"),
            FuzzToken::Less => (TokenType::Less, "<"),
            FuzzToken::Equals => (TokenType::Equals, "="),
            FuzzToken::Arrow => (TokenType::Arrow, "->"),
            FuzzToken::FatArrow => (TokenType::FatArrow, "=>"),
            FuzzToken::PipeOp => (TokenType::PipeOp, "|>"),
            FuzzToken::Pipe => (TokenType::Pipe, "|"),
            FuzzToken::LParen => (TokenType::LParen, "("),
            FuzzToken::RParen => (TokenType::RParen, ")"),
            FuzzToken::LBrace => (TokenType::LBrace, "{"),
            FuzzToken::RBrace => (TokenType::RBrace, "}"),
            FuzzToken::LBracket => (TokenType::LBracket, "["),
            FuzzToken::RBracket => (TokenType::RBracket, "]"),
            FuzzToken::Comma => (TokenType::Comma, ","),
            FuzzToken::Dot => (TokenType::Dot, "."),
            FuzzToken::Match => (TokenType::Match, "match"),
            FuzzToken::Macro => (TokenType::Macro, "macro"),
            FuzzToken::Newline => (TokenType::Newline, ""),
        };
        Token::new(kind, literal, 1, offset + 1, Span::new(offset, offset + 1))
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzTokens {
    tokens: Vec<FuzzToken>,
    terminate: bool,
}

fuzz_target!(|input: FuzzTokens| {
    let mut tokens: Vec<Token> = input.tokens.iter().enumerate().map(|(i, t)| t.to_token(i)).collect();

    // The parser must cope with a stream that lacks its EOF, too
    if input.terminate {
        let end = tokens.len();
        tokens.push(Token::new(TokenType::Eof, "", 1, end + 1, Span::new(end, end)));
    }

    let source = "x ".repeat(tokens.len() + 1);
    let _ = glyph_front::parse(&tokens, &source);
});
