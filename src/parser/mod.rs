pub mod ast;
mod expr;
mod items;
mod stmt;
mod types;
pub mod validate;

use crate::diagnostics::{ParseError, hints};
use crate::lexer::token::{Token, TokenType};
use crate::span::{LineIndex, Span, Spanned};
use ast::*;

/// Recursive-descent parser over a materialized token list.
///
/// The parser is driven purely by `TokenType`, so one instance serves both
/// dialects. It owns its cursor and fails fast on the first error.
pub struct Parser<'a> {
    tokens: &'a [Token],
    source: &'a str,
    pos: usize,
    eof: Token,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], source: &'a str) -> Self {
        let eof = match tokens.last() {
            Some(last) if last.kind == TokenType::Eof => last.clone(),
            _ => {
                let (line, column) = LineIndex::new(source).position(source.len());
                Token::new(TokenType::Eof, "", line, column, Span::new(source.len(), source.len()))
            }
        };
        Self { tokens, source, pos: 0, eof }
    }

    fn peek_raw(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    /// Raw lookahead `offset` tokens past the cursor.
    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).unwrap_or(&self.eof)
    }

    /// Next token, skipping newlines.
    fn peek(&self) -> &Token {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .find(|t| t.kind != TokenType::Newline)
            .unwrap_or(&self.eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek_raw().clone();
        if self.pos < self.tokens.len() && tok.kind != TokenType::Eof {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: TokenType) -> bool {
        self.peek_raw().kind == kind
    }

    fn check_word(&self, word: &str) -> bool {
        self.peek_raw().is_word(word)
    }

    fn eat(&mut self, kind: TokenType) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_at_end(&self) -> bool {
        self.check(TokenType::Eof)
    }

    fn skip_newlines(&mut self) {
        while self.check(TokenType::Newline) {
            self.advance();
        }
    }

    /// Consume a token of `kind` at the cursor. Newlines are not skipped.
    fn expect(&mut self, kind: TokenType) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(kind, self.peek_raw(), self.source))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        if self.check(TokenType::Ident) {
            return Ok(self.advance().literal);
        }
        let found = self.peek_raw().kind;
        Err(self.error_hint(
            self.peek_raw(),
            format!("Expected identifier, but found {found}"),
            hints::IDENT_HINT,
        ))
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if self.check_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Name in member position (fields, keys, `.name`). Reserved words and
    /// remapped keywords keep their spelling, so `x.default` reads as a name.
    fn member_name(&mut self) -> Result<String, ParseError> {
        let tok = self.peek_raw();
        let is_word = tok.kind != TokenType::String
            && tok.literal.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_');
        if is_word { Ok(self.advance().literal) } else { self.expect_ident() }
    }

    fn expect_string(&mut self, what: &str) -> Result<String, ParseError> {
        if self.check(TokenType::String) {
            return Ok(self.advance().literal);
        }
        let tok = self.peek_raw();
        Err(self.error(tok, format!("Expected {what}, but found {}", tok.kind)))
    }

    /// A quoted name or a dotted identifier path such as `user.created`.
    fn parse_dotted_name(&mut self, what: &str) -> Result<String, ParseError> {
        if self.check(TokenType::String) {
            return Ok(self.advance().literal);
        }
        if !self.check(TokenType::Ident) {
            let tok = self.peek_raw();
            return Err(self.error(tok, format!("Expected {what}, but found {}", tok.kind)));
        }
        let mut name = self.advance().literal;
        while self.check(TokenType::Dot) {
            self.advance();
            name.push('.');
            name.push_str(&self.member_name()?);
        }
        Ok(name)
    }

    fn error(&self, tok: &Token, message: impl Into<String>) -> ParseError {
        ParseError::at(tok, message, self.source)
    }

    fn error_hint(&self, tok: &Token, message: impl Into<String>, hint: &str) -> ParseError {
        ParseError::at(tok, message, self.source).with_hint(hint)
    }

    fn prev_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(tok) => tok.span,
            None => self.eof.span,
        }
    }

    pub fn parse_module(&mut self) -> Result<Module, ParseError> {
        tracing::debug!(tokens = self.tokens.len(), "parsing module");
        let mut items = Vec::new();

        loop {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }
            let start = self.peek_raw().span;
            let line = self.peek_raw().line;
            let item = self.parse_item()?;
            tracing::trace!(kind = item.kind(), line, "parsed item");
            items.push(Spanned::new(item, start.to(self.prev_span())));
        }

        tracing::debug!(items = items.len(), "parsed module");
        Ok(Module { items })
    }

    /// True when the cursor sits on a token that opens a top-level item.
    fn starts_item(&self) -> bool {
        let tok = self.peek_raw();
        match tok.kind {
            TokenType::At
            | TokenType::Colon
            | TokenType::Bang
            | TokenType::Equals
            | TokenType::Star
            | TokenType::Tilde
            | TokenType::Ampersand
            | TokenType::Macro
            | TokenType::Import
            | TokenType::From
            | TokenType::Module
            | TokenType::Const => true,
            TokenType::Ident => {
                matches!(tok.literal.as_str(), "type" | "trait" | "contract")
                    || (tok.literal == "test" && self.peek_at(1).kind == TokenType::String)
                    || self.at_macro_invocation()
            }
            _ => false,
        }
    }

    fn at_macro_invocation(&self) -> bool {
        self.check(TokenType::Ident)
            && self.peek_at(1).kind == TokenType::Bang
            && self.peek_at(2).kind == TokenType::LParen
    }

    fn parse_item(&mut self) -> Result<Item, ParseError> {
        let tok = self.peek_raw().clone();
        match tok.kind {
            TokenType::Colon => {
                self.advance();
                self.parse_type_def()
            }
            TokenType::At => {
                self.advance();
                self.parse_at_item()
            }
            TokenType::Bang => {
                self.advance();
                if matches!(self.peek_at(1).kind, TokenType::LParen | TokenType::Less) {
                    self.parse_function()
                } else {
                    self.parse_command()
                }
            }
            TokenType::Equals => {
                self.advance();
                self.parse_function()
            }
            TokenType::Star => {
                self.advance();
                self.parse_cron_task()
            }
            TokenType::Tilde => {
                self.advance();
                self.parse_event_handler()
            }
            TokenType::Ampersand => {
                self.advance();
                self.parse_queue_worker()
            }
            TokenType::Macro => self.parse_macro_def(),
            TokenType::Import | TokenType::From => self.parse_import(),
            TokenType::Module => self.parse_module_decl(),
            TokenType::Const => self.parse_const(),
            TokenType::Ident if tok.literal == "type" => {
                self.advance();
                self.parse_type_def()
            }
            TokenType::Ident if tok.literal == "trait" => self.parse_trait(),
            TokenType::Ident if tok.literal == "contract" => self.parse_contract(),
            TokenType::Ident if tok.literal == "test" => self.parse_test_block(),
            TokenType::Ident if self.at_macro_invocation() => self.parse_macro_invocation(),
            _ => Err(self.error_hint(&tok, format!("Unexpected token {}", tok.kind), hints::TOP_LEVEL_HINT)),
        }
    }
}
