use super::token::{Token, TokenType, reserved_word};
use super::{Dialect, Syntax, scan};
use crate::diagnostics::LexError;

/// Symbol-based dialect (`.glyph`): `@ $ > ! ~ & * % < ?` spell the constructs.
pub struct CompactLexer;

impl Dialect for CompactLexer {
    const SYNTAX: Syntax = Syntax::Compact;

    fn classify(word: &str) -> TokenType {
        reserved_word(word).unwrap_or(TokenType::Ident)
    }
}

impl CompactLexer {
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
        scan::<Self>(source)
    }
}
