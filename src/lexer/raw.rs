use logos::Logos;

/// Context-free lexemes. The dialect drivers turn these into `Token`s,
/// resolving words, paths and flags with the cursor state.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r]+")]
pub enum Lexeme {
    #[token("\n")]
    Newline,

    #[regex(r"#[^\n]*", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)]
    Comment,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[0-9]+\.[0-9]+")]
    Float,

    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    #[regex(r#"'([^'\\\n]|\\[^\n])*'"#)]
    Str,

    #[regex(r#""([^"\\\n]|\\[^\n])*\\?"#)]
    #[regex(r#"'([^'\\\n]|\\[^\n])*\\?"#)]
    UnterminatedStr,

    #[token("@")]
    At,
    #[token(":")]
    Colon,
    #[token("$")]
    Dollar,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("--")]
    MinusMinus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEq,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEq,
    #[token("!")]
    Bang,
    #[token("!=")]
    NotEq,
    #[token("==")]
    EqEq,
    #[token("?")]
    Question,
    #[token("~")]
    Tilde,
    #[token("&")]
    Ampersand,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("..")]
    DotDot,
    #[token("...")]
    DotDotDot,
    #[token("->")]
    Arrow,
    #[token("|")]
    Pipe,
    #[token("|>")]
    PipeOp,
    #[token("=")]
    Equals,
    #[token("=>")]
    FatArrow,
}

/// Decode backslash escapes in a quoted literal (quotes included in `raw`).
pub fn unescape(raw: &str) -> String {
    let body = &raw[1..raw.len().saturating_sub(1).max(1)];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
