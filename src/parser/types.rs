use super::Parser;
use super::ast::TypeAnnotation;
use crate::diagnostics::{ParseError, hints};
use crate::lexer::token::TokenType;

impl Parser<'_> {
    /// `int`, `User`, `T[]`, `[T]`, `Map[str, T]`, or a union `A | B | C`.
    pub(super) fn parse_type(&mut self) -> Result<TypeAnnotation, ParseError> {
        let first = self.parse_single_type()?;
        if !self.check(TokenType::Pipe) {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.eat(TokenType::Pipe) {
            members.push(self.parse_single_type()?);
        }
        Ok(TypeAnnotation::Union(members))
    }

    /// A type followed by an optional `!` (required) or `?` (optional) marker.
    pub(super) fn parse_marked_type(&mut self) -> Result<(TypeAnnotation, bool), ParseError> {
        let ty = self.parse_type()?;
        if self.eat(TokenType::Bang) {
            return Ok((ty, true));
        }
        self.eat(TokenType::Question);
        Ok((ty, false))
    }

    /// `<T, U>` on functions and traits.
    pub(super) fn parse_type_params(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(TokenType::Less)?;
        let mut params = vec![self.expect_ident()?];
        while self.eat(TokenType::Comma) {
            params.push(self.expect_ident()?);
        }
        self.expect(TokenType::Greater)?;
        Ok(params)
    }

    fn parse_single_type(&mut self) -> Result<TypeAnnotation, ParseError> {
        if self.eat(TokenType::LBracket) {
            let element = self.parse_type()?;
            self.expect(TokenType::RBracket)?;
            return Ok(self.parse_array_suffix(TypeAnnotation::Array(Box::new(element))));
        }

        let tok = self.peek_raw();
        if tok.kind != TokenType::Ident || tok.is_flag() || tok.literal.starts_with('/') {
            let found = tok.kind;
            return Err(self.error_hint(tok, format!("Expected type name, but found {found}"), hints::TYPE_HINT));
        }
        let name = self.advance().literal;

        let ty = if self.check(TokenType::LBracket) && self.peek_at(1).kind != TokenType::RBracket {
            self.advance();
            let mut args = vec![self.parse_type()?];
            while self.eat(TokenType::Comma) {
                args.push(self.parse_type()?);
            }
            self.expect(TokenType::RBracket)?;
            TypeAnnotation::Generic { base: name, args }
        } else {
            TypeAnnotation::primitive(&name).unwrap_or(TypeAnnotation::Named(name))
        };
        Ok(self.parse_array_suffix(ty))
    }

    fn parse_array_suffix(&mut self, mut ty: TypeAnnotation) -> TypeAnnotation {
        while self.check(TokenType::LBracket) && self.peek_at(1).kind == TokenType::RBracket {
            self.advance();
            self.advance();
            ty = TypeAnnotation::Array(Box::new(ty));
        }
        ty
    }
}
