use serde::Serialize;

use crate::span::Span;

/// Every token category produced by either dialect.
///
/// Symbol variants are shared: the expanded dialect emits `At` for `route`,
/// `Dollar` for `let` and so on, which is what lets a single parser serve
/// both surface syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    Illegal,
    Eof,
    Newline,

    // Symbols
    At,
    Colon,
    Dollar,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    Bang,
    NotEq,
    EqEq,
    Question,
    Tilde,
    Ampersand,
    And,
    Or,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Arrow,
    Pipe,
    PipeOp,
    Equals,
    FatArrow,
    DotDotDot,

    // Literals
    Ident,
    String,
    Integer,
    Float,
    True,
    False,
    Null,

    // Reserved words
    While,
    Switch,
    Case,
    Default,
    For,
    In,
    Macro,
    Quote,
    Match,
    When,
    Async,
    Await,
    Import,
    From,
    As,
    Module,
    Const,
    Assert,
    Break,
    Continue,
}

impl TokenType {
    /// Tokens after which a `/` reads as division rather than a path start.
    pub fn is_value(self) -> bool {
        matches!(
            self,
            TokenType::Ident
                | TokenType::Integer
                | TokenType::Float
                | TokenType::String
                | TokenType::RParen
                | TokenType::RBracket
                | TokenType::True
                | TokenType::False
        )
    }

    /// Canonical display name, used verbatim in "Expected X, but found Y".
    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Illegal => "ILLEGAL",
            TokenType::Eof => "EOF",
            TokenType::Newline => "NEWLINE",
            TokenType::At => "@",
            TokenType::Colon => ":",
            TokenType::Dollar => "$",
            TokenType::Plus => "+",
            TokenType::Minus => "-",
            TokenType::Star => "*",
            TokenType::Slash => "/",
            TokenType::Percent => "%",
            TokenType::Greater => ">",
            TokenType::GreaterEq => ">=",
            TokenType::Less => "<",
            TokenType::LessEq => "<=",
            TokenType::Bang => "!",
            TokenType::NotEq => "!=",
            TokenType::EqEq => "==",
            TokenType::Question => "?",
            TokenType::Tilde => "~",
            TokenType::Ampersand => "&",
            TokenType::And => "&&",
            TokenType::Or => "||",
            TokenType::LParen => "(",
            TokenType::RParen => ")",
            TokenType::LBrace => "{",
            TokenType::RBrace => "}",
            TokenType::LBracket => "[",
            TokenType::RBracket => "]",
            TokenType::Comma => ",",
            TokenType::Dot => ".",
            TokenType::Arrow => "->",
            TokenType::Pipe => "|",
            TokenType::PipeOp => "|>",
            TokenType::Equals => "=",
            TokenType::FatArrow => "=>",
            TokenType::DotDotDot => "...",
            TokenType::Ident => "IDENT",
            TokenType::String => "STRING",
            TokenType::Integer => "INTEGER",
            TokenType::Float => "FLOAT",
            TokenType::True => "TRUE",
            TokenType::False => "FALSE",
            TokenType::Null => "NULL",
            TokenType::While => "WHILE",
            TokenType::Switch => "SWITCH",
            TokenType::Case => "CASE",
            TokenType::Default => "DEFAULT",
            TokenType::For => "FOR",
            TokenType::In => "IN",
            TokenType::Macro => "MACRO",
            TokenType::Quote => "QUOTE",
            TokenType::Match => "MATCH",
            TokenType::When => "WHEN",
            TokenType::Async => "ASYNC",
            TokenType::Await => "AWAIT",
            TokenType::Import => "IMPORT",
            TokenType::From => "FROM",
            TokenType::As => "AS",
            TokenType::Module => "MODULE",
            TokenType::Const => "CONST",
            TokenType::Assert => "ASSERT",
            TokenType::Break => "BREAK",
            TokenType::Continue => "CONTINUE",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reserved words shared by both dialects.
pub fn reserved_word(word: &str) -> Option<TokenType> {
    let kind = match word {
        "true" => TokenType::True,
        "false" => TokenType::False,
        "null" => TokenType::Null,
        "while" => TokenType::While,
        "switch" => TokenType::Switch,
        "case" => TokenType::Case,
        "default" => TokenType::Default,
        "for" => TokenType::For,
        "in" => TokenType::In,
        "macro" => TokenType::Macro,
        "quote" => TokenType::Quote,
        "match" => TokenType::Match,
        "when" => TokenType::When,
        "async" => TokenType::Async,
        "await" => TokenType::Await,
        "import" => TokenType::Import,
        "from" => TokenType::From,
        "as" => TokenType::As,
        "module" => TokenType::Module,
        "const" => TokenType::Const,
        "assert" => TokenType::Assert,
        "break" => TokenType::Break,
        "continue" => TokenType::Continue,
        _ => return None,
    };
    Some(kind)
}

/// A scanned token. `line` and `column` are 1-based; `span` holds byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenType,
    pub literal: String,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenType, literal: impl Into<String>, line: usize, column: usize, span: Span) -> Self {
        Self { kind, literal: literal.into(), line, column, span }
    }

    /// True for a word token carrying a `--name` flag literal. The kind is
    /// whatever the dialect typed the bare word as, so `--in` counts too.
    pub fn is_flag(&self) -> bool {
        self.kind != TokenType::String && self.literal.len() > 2 && self.literal.starts_with("--")
    }

    /// True for an identifier spelled exactly `word` (soft keywords like `if`, `trait`).
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenType::Ident && self.literal == word
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenType::Ident | TokenType::Integer | TokenType::Float => write!(f, "{}({})", self.kind, self.literal),
            TokenType::String => write!(f, "{}({:?})", self.kind, self.literal),
            _ => write!(f, "{}", self.kind),
        }
    }
}
