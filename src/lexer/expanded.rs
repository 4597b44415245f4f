use super::token::{Token, TokenType, reserved_word};
use super::{Dialect, Syntax, scan};
use crate::diagnostics::LexError;

/// Keyword spellings and the symbol token each one stands for.
pub const KEYWORD_SYMBOLS: &[(&str, TokenType)] = &[
    ("route", TokenType::At),
    ("type", TokenType::Colon),
    ("let", TokenType::Dollar),
    ("return", TokenType::Greater),
    ("middleware", TokenType::Plus),
    ("inject", TokenType::Percent),
    ("expects", TokenType::Less),
    ("validate", TokenType::Question),
    ("handle", TokenType::Tilde),
    ("cron", TokenType::Star),
    ("command", TokenType::Bang),
    ("queue", TokenType::Ampersand),
    ("func", TokenType::Equals),
];

/// Keyword-based dialect (`.glyphx`).
///
/// Each keyword in [`KEYWORD_SYMBOLS`] is emitted with the token type of its
/// compact symbol while the literal keeps the keyword text, so `route` still
/// opens a path for the `/` that follows it.
pub struct ExpandedLexer;

impl Dialect for ExpandedLexer {
    const SYNTAX: Syntax = Syntax::Expanded;

    fn classify(word: &str) -> TokenType {
        KEYWORD_SYMBOLS
            .iter()
            .find(|(keyword, _)| *keyword == word)
            .map(|&(_, kind)| kind)
            .or_else(|| reserved_word(word))
            .unwrap_or(TokenType::Ident)
    }
}

impl ExpandedLexer {
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
        scan::<Self>(source)
    }
}
