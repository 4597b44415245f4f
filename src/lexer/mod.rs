pub mod compact;
pub mod expanded;
pub mod raw;
pub mod token;

pub use compact::CompactLexer;
pub use expanded::ExpandedLexer;
pub use token::{Token, TokenType};

use logos::Logos;
use serde::{Deserialize, Serialize};

use crate::diagnostics::LexError;
use crate::span::{LineIndex, Span};
use raw::Lexeme;

/// The two surface syntaxes of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    /// Symbol-based: `@ $ > ! ~ & * % < ?`
    #[default]
    Compact,
    /// Keyword-based: `route let return command handle ...`
    Expanded,
}

impl std::fmt::Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Syntax::Compact => f.write_str("compact"),
            Syntax::Expanded => f.write_str("expanded"),
        }
    }
}

/// How a dialect types identifier-shaped words.
pub trait Dialect {
    const SYNTAX: Syntax;

    fn classify(word: &str) -> TokenType;
}

/// Tokenize `source` with the chosen dialect.
pub fn tokenize(source: &str, syntax: Syntax) -> Result<Vec<Token>, LexError> {
    match syntax {
        Syntax::Compact => CompactLexer::tokenize(source),
        Syntax::Expanded => ExpandedLexer::tokenize(source),
    }
}

/// Words that, right after `@`, introduce a route path.
const ROUTE_VERBS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "ws", "websocket"];

/// Lookbehind state for the context-sensitive rules. Owned per tokenize call.
#[derive(Debug, Default)]
struct Cursor {
    last_was_value: bool,
    last_literal: String,
    last_kind: Option<TokenType>,
    prev_kind: Option<TokenType>,
}

impl Cursor {
    fn record(&mut self, token: &Token) {
        self.last_was_value = token.kind.is_value();
        self.last_literal.clone_from(&token.literal);
        self.prev_kind = self.last_kind;
        self.last_kind = Some(token.kind);
    }

    fn reset_line(&mut self) {
        *self = Cursor::default();
    }

    /// `/` may open a path here: after `route`, after an `@ VERB` pair,
    /// or after anything that is not a value.
    fn in_path_context(&self) -> bool {
        if self.last_literal == "route" || !self.last_was_value {
            return true;
        }
        self.last_kind == Some(TokenType::Ident)
            && self.prev_kind == Some(TokenType::At)
            && ROUTE_VERBS.contains(&self.last_literal.as_str())
    }
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '/' | ':' | '-')
}

fn ident_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }
    s.char_indices()
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn symbol(lexeme: Lexeme) -> Option<TokenType> {
    use TokenType as T;
    let kind = match lexeme {
        Lexeme::At => T::At,
        Lexeme::Colon => T::Colon,
        Lexeme::Dollar => T::Dollar,
        Lexeme::Plus => T::Plus,
        Lexeme::Minus => T::Minus,
        Lexeme::Star => T::Star,
        Lexeme::Slash => T::Slash,
        Lexeme::Percent => T::Percent,
        Lexeme::Greater => T::Greater,
        Lexeme::GreaterEq => T::GreaterEq,
        Lexeme::Less => T::Less,
        Lexeme::LessEq => T::LessEq,
        Lexeme::Bang => T::Bang,
        Lexeme::NotEq => T::NotEq,
        Lexeme::EqEq => T::EqEq,
        Lexeme::Question => T::Question,
        Lexeme::Tilde => T::Tilde,
        Lexeme::Ampersand => T::Ampersand,
        Lexeme::And => T::And,
        Lexeme::Or => T::Or,
        Lexeme::LParen => T::LParen,
        Lexeme::RParen => T::RParen,
        Lexeme::LBrace => T::LBrace,
        Lexeme::RBrace => T::RBrace,
        Lexeme::LBracket => T::LBracket,
        Lexeme::RBracket => T::RBracket,
        Lexeme::Comma => T::Comma,
        Lexeme::Dot => T::Dot,
        Lexeme::DotDotDot => T::DotDotDot,
        Lexeme::Arrow => T::Arrow,
        Lexeme::Pipe => T::Pipe,
        Lexeme::PipeOp => T::PipeOp,
        Lexeme::Equals => T::Equals,
        Lexeme::FatArrow => T::FatArrow,
        _ => return None,
    };
    Some(kind)
}

/// Shared scanning driver. Dialects only differ in how words are typed.
pub(crate) fn scan<D: Dialect>(source: &str) -> Result<Vec<Token>, LexError> {
    let index = LineIndex::new(source);
    let mut lexer = Lexeme::lexer(source);
    let mut cursor = Cursor::default();
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let (line, column) = index.position(range.start);

        let lexeme = match result {
            Ok(lexeme) => lexeme,
            Err(()) => {
                let ch = source[range.start..].chars().next().unwrap_or('\0');
                let span = Span::new(range.start, range.start + ch.len_utf8());
                return Err(LexError::illegal_char(ch, line, column, span, source));
            }
        };

        let token = match lexeme {
            Lexeme::Newline => {
                tokens.push(Token::new(TokenType::Newline, "", line, column, Span::new(range.start, range.end)));
                cursor.reset_line();
                continue;
            }
            Lexeme::Comment => continue,
            Lexeme::UnterminatedStr => {
                let quote = source[range.start..].chars().next().unwrap_or('"');
                return Err(LexError::unterminated_string(
                    quote,
                    line,
                    column,
                    Span::new(range.start, range.end),
                    source,
                ));
            }
            Lexeme::Word => {
                let word = lexer.slice();
                Token::new(D::classify(word), word, line, column, Span::new(range.start, range.end))
            }
            Lexeme::Integer => {
                Token::new(TokenType::Integer, lexer.slice(), line, column, Span::new(range.start, range.end))
            }
            Lexeme::Float => {
                Token::new(TokenType::Float, lexer.slice(), line, column, Span::new(range.start, range.end))
            }
            Lexeme::Str => Token::new(
                TokenType::String,
                raw::unescape(lexer.slice()),
                line,
                column,
                Span::new(range.start, range.end),
            ),
            Lexeme::Slash => {
                let starts_word = lexer.remainder().starts_with(|c: char| c.is_ascii_alphabetic());
                if cursor.in_path_context() && starts_word {
                    let extra = lexer.remainder().find(|c: char| !is_path_char(c)).unwrap_or(lexer.remainder().len());
                    lexer.bump(extra);
                    Token::new(TokenType::Ident, lexer.slice(), line, column, Span::new(range.start, range.end + extra))
                } else {
                    Token::new(TokenType::Slash, "/", line, column, Span::new(range.start, range.end))
                }
            }
            Lexeme::MinusMinus => {
                // `--name` is a single flag token; a bare `--` stays two minus signs.
                let len = ident_len(lexer.remainder());
                if len > 0 {
                    lexer.bump(len);
                    let word = &lexer.slice()[2..];
                    let literal = format!("--{word}");
                    Token::new(D::classify(word), literal, line, column, Span::new(range.start, range.end + len))
                } else {
                    let first = Token::new(TokenType::Minus, "-", line, column, Span::new(range.start, range.start + 1));
                    cursor.record(&first);
                    tokens.push(first);
                    Token::new(TokenType::Minus, "-", line, column + 1, Span::new(range.start + 1, range.end))
                }
            }
            Lexeme::DotDot => {
                let first = Token::new(TokenType::Dot, ".", line, column, Span::new(range.start, range.start + 1));
                cursor.record(&first);
                tokens.push(first);
                Token::new(TokenType::Dot, ".", line, column + 1, Span::new(range.start + 1, range.end))
            }
            other => match symbol(other) {
                Some(kind) => Token::new(kind, lexer.slice(), line, column, Span::new(range.start, range.end)),
                None => continue,
            },
        };

        cursor.record(&token);
        tokens.push(token);
    }

    let (line, column) = index.position(source.len());
    tokens.push(Token::new(TokenType::Eof, "", line, column, Span::new(source.len(), source.len())));

    tracing::debug!(syntax = %D::SYNTAX, tokens = tokens.len(), "tokenized source");
    Ok(tokens)
}
