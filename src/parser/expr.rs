//! Precedence-climbing expression grammar.
//!
//! Binding powers, loosest first: `|>` < `||` < `&&` < equality < relational
//! < additive < multiplicative < unary < postfix. Every level is
//! left-associative. A newline ends the expression unless it sits inside a
//! bracketed construct.

use super::Parser;
use super::ast::*;
use crate::diagnostics::{ParseError, hints};
use crate::lexer::token::{Token, TokenType};

#[derive(Debug, Clone, Copy)]
enum Infix {
    Pipe,
    Binary(BinOp),
}

/// Additive level; flag tokens in infix position read as subtraction.
const ADDITIVE: (u8, u8) = (11, 12);

fn infix_binding(kind: TokenType) -> Option<(Infix, u8, u8)> {
    use TokenType as T;
    let (op, (l_bp, r_bp)) = match kind {
        T::PipeOp => (Infix::Pipe, (1, 2)),
        T::Or => (Infix::Binary(BinOp::Or), (3, 4)),
        T::And => (Infix::Binary(BinOp::And), (5, 6)),
        T::EqEq => (Infix::Binary(BinOp::Eq), (7, 8)),
        T::NotEq => (Infix::Binary(BinOp::Ne), (7, 8)),
        T::Less => (Infix::Binary(BinOp::Lt), (9, 10)),
        T::LessEq => (Infix::Binary(BinOp::Le), (9, 10)),
        T::Greater => (Infix::Binary(BinOp::Gt), (9, 10)),
        T::GreaterEq => (Infix::Binary(BinOp::Ge), (9, 10)),
        T::Plus => (Infix::Binary(BinOp::Add), ADDITIVE),
        T::Minus => (Infix::Binary(BinOp::Sub), ADDITIVE),
        T::Star => (Infix::Binary(BinOp::Mul), (13, 14)),
        T::Slash => (Infix::Binary(BinOp::Div), (13, 14)),
        T::Percent => (Infix::Binary(BinOp::Mod), (13, 14)),
        _ => return None,
    };
    Some((op, l_bp, r_bp))
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary { op, left: Box::new(left), right: Box::new(right) }
}

fn negate(operand: Expr) -> Expr {
    Expr::Unary { op: UnaryOp::Neg, operand: Box::new(operand) }
}

impl Parser<'_> {
    pub(super) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0, false)
    }

    /// Default value in a flag-bearing parameter list: stops before the
    /// next `--name` instead of reading it as subtraction.
    pub(super) fn parse_default_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0, true)
    }

    fn parse_expr_bp(&mut self, min_bp: u8, flag_stop: bool) -> Result<Expr, ParseError> {
        let lhs = self.parse_unary()?;
        self.parse_infix(lhs, min_bp, flag_stop)
    }

    fn at_flag_boundary(&self) -> bool {
        self.peek_raw().is_flag() || (self.check(TokenType::Minus) && self.peek_at(1).kind == TokenType::Minus)
    }

    fn parse_infix(&mut self, mut lhs: Expr, min_bp: u8, flag_stop: bool) -> Result<Expr, ParseError> {
        loop {
            if flag_stop && self.at_flag_boundary() {
                break;
            }

            if self.peek_raw().is_flag() {
                // `a --b` is `a - (-b)`
                let (l_bp, r_bp) = ADDITIVE;
                if l_bp < min_bp {
                    break;
                }
                let tok = self.advance();
                let operand = self.parse_postfix(Expr::Var(tok.literal[2..].to_string()))?;
                let right = self.parse_infix(negate(operand), r_bp, flag_stop)?;
                lhs = binary(BinOp::Sub, lhs, right);
                continue;
            }

            let Some((op, l_bp, r_bp)) = infix_binding(self.peek_raw().kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.advance();
            self.skip_newlines();
            let rhs_tok = self.peek_raw().clone();
            let rhs = self.parse_expr_bp(r_bp, flag_stop)?;

            lhs = match op {
                Infix::Binary(op) => binary(op, lhs, rhs),
                Infix::Pipe => {
                    if !matches!(rhs, Expr::Var(_) | Expr::Call { .. } | Expr::MethodCall { .. }) {
                        return Err(self.error_hint(
                            &rhs_tok,
                            "Right side of '|>' must be a function name or call",
                            hints::EXPRESSION_HINT,
                        ));
                    }
                    Expr::Pipe { left: Box::new(lhs), right: Box::new(rhs) }
                }
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.peek_raw().clone();
        match tok.kind {
            TokenType::Bang => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expr::Unary { op: UnaryOp::Not, operand: Box::new(operand) })
            }
            TokenType::Minus => {
                self.advance();
                if matches!(self.peek_raw().kind, TokenType::Integer | TokenType::Float) {
                    let number = self.advance();
                    let literal = self.number_literal(&number, true)?;
                    return self.parse_postfix(Expr::Literal(literal));
                }
                Ok(negate(self.parse_unary()?))
            }
            TokenType::Await => {
                self.advance();
                Ok(Expr::Await(Box::new(self.parse_unary()?)))
            }
            _ if tok.is_flag() => {
                self.advance();
                let operand = self.parse_postfix(Expr::Var(tok.literal[2..].to_string()))?;
                Ok(negate(negate(operand)))
            }
            _ => {
                let primary = self.parse_primary()?;
                self.parse_postfix(primary)
            }
        }
    }

    fn parse_postfix(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        loop {
            match self.peek_raw().kind {
                TokenType::LParen => {
                    let Expr::Var(name) = &expr else { break };
                    let name = name.clone();
                    let args = self.parse_args()?;
                    expr = Expr::Call { name, args };
                }
                TokenType::Dot => {
                    self.advance();
                    let member = self.member_name()?;
                    if self.check(TokenType::LParen) {
                        let args = self.parse_args()?;
                        expr = match expr {
                            Expr::Var(object) => Expr::Call { name: format!("{object}.{member}"), args },
                            object => Expr::MethodCall { object: Box::new(object), method: member, args },
                        };
                    } else {
                        expr = Expr::FieldAccess { object: Box::new(expr), field: member };
                    }
                }
                TokenType::LBracket => {
                    self.advance();
                    self.skip_newlines();
                    let index = self.parse_expr()?;
                    self.skip_newlines();
                    self.expect(TokenType::RBracket)?;
                    expr = Expr::Index { object: Box::new(expr), index: Box::new(index) };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// `( expr, ... )` with newlines allowed between arguments.
    pub(super) fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenType::LParen)?;
        let mut args = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RParen) {
                break;
            }
            args.push(self.parse_expr()?);
            self.skip_newlines();
            if !self.eat(TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RParen)?;
        Ok(args)
    }

    fn number_literal(&self, tok: &Token, negative: bool) -> Result<Literal, ParseError> {
        let text = if negative { format!("-{}", tok.literal) } else { tok.literal.clone() };
        let literal = match tok.kind {
            TokenType::Integer => text.parse::<i64>().ok().map(Literal::Int),
            _ => text.parse::<f64>().ok().map(Literal::Float),
        };
        literal.ok_or_else(|| self.error(tok, format!("Invalid number literal '{text}'")))
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.peek_raw().clone();
        let expr = match tok.kind {
            TokenType::Integer | TokenType::Float => {
                self.advance();
                Expr::Literal(self.number_literal(&tok, false)?)
            }
            TokenType::String => {
                self.advance();
                Expr::Literal(Literal::Str(tok.literal))
            }
            TokenType::True | TokenType::False => {
                self.advance();
                Expr::Literal(Literal::Bool(tok.kind == TokenType::True))
            }
            TokenType::Null => {
                self.advance();
                Expr::Literal(Literal::Null)
            }
            TokenType::Ident => {
                self.advance();
                Expr::Var(tok.literal)
            }
            TokenType::LParen if self.lambda_ahead() => self.parse_lambda()?,
            TokenType::LParen => {
                self.advance();
                self.skip_newlines();
                let inner = self.parse_expr()?;
                self.skip_newlines();
                self.expect(TokenType::RParen)?;
                inner
            }
            TokenType::LBrace => self.parse_object()?,
            TokenType::LBracket => self.parse_array()?,
            TokenType::Match => self.parse_match()?,
            TokenType::Async => {
                self.advance();
                Expr::Async(self.parse_block()?)
            }
            _ => {
                return Err(self.error_hint(
                    &tok,
                    format!("Unexpected token in expression: {}", tok.kind),
                    hints::EXPRESSION_HINT,
                ));
            }
        };
        Ok(expr)
    }

    /// At `(`: true when the matching `)` is followed by `=>`.
    fn lambda_ahead(&self) -> bool {
        let mut depth = 0usize;
        for (offset, tok) in self.tokens[self.pos.min(self.tokens.len())..].iter().enumerate() {
            match tok.kind {
                TokenType::LParen => depth += 1,
                TokenType::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.peek_at(offset + 1).kind == TokenType::FatArrow;
                    }
                }
                TokenType::Eof => return false,
                _ => {}
            }
        }
        false
    }

    fn parse_lambda(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenType::LParen)?;
        let mut params = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RParen) {
                break;
            }
            params.push(self.expect_ident()?);
            self.skip_newlines();
            if !self.eat(TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RParen)?;
        self.expect(TokenType::FatArrow)?;
        self.skip_newlines();

        let body = if self.check(TokenType::LBrace) {
            LambdaBody::Block(self.parse_block()?)
        } else {
            LambdaBody::Expr(Box::new(self.parse_expr()?))
        };
        Ok(Expr::Lambda { params, body })
    }

    /// `{k: v, "k": v}` or `{:k = v}`; commas or newlines separate entries.
    fn parse_object(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenType::LBrace)?;
        let mut fields = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RBrace) || self.is_at_end() {
                break;
            }
            let shorthand = self.check(TokenType::Colon) && self.peek_raw().literal == ":";
            let key = if shorthand {
                self.advance();
                let key = self.member_name()?;
                self.expect(TokenType::Equals)?;
                key
            } else {
                let key = if self.check(TokenType::String) { self.advance().literal } else { self.member_name()? };
                self.expect(TokenType::Colon)?;
                key
            };
            self.skip_newlines();
            let value = self.parse_expr()?;
            fields.push(ObjectField { key, value });
            self.skip_newlines();
            self.eat(TokenType::Comma);
        }
        self.expect(TokenType::RBrace)?;
        Ok(Expr::Object(fields))
    }

    fn parse_array(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenType::LBracket)?;
        let mut elements = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RBracket) {
                break;
            }
            elements.push(self.parse_expr()?);
            self.skip_newlines();
            if !self.eat(TokenType::Comma) {
                break;
            }
        }
        self.skip_newlines();
        self.expect(TokenType::RBracket)?;
        Ok(Expr::Array(elements))
    }

    fn parse_match(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenType::Match)?;
        let value = self.parse_expr()?;
        self.skip_newlines();
        self.expect(TokenType::LBrace)?;

        let mut arms = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RBrace) || self.is_at_end() {
                break;
            }
            let pattern = self.parse_pattern()?;
            let guard = if self.eat(TokenType::When) { Some(self.parse_expr()?) } else { None };
            self.expect(TokenType::FatArrow)?;
            self.skip_newlines();
            let body = self.parse_expr()?;
            arms.push(MatchArm { pattern, guard, body });
            self.skip_newlines();
            self.eat(TokenType::Comma);
        }
        self.expect(TokenType::RBrace)?;
        Ok(Expr::Match { value: Box::new(value), arms })
    }

    fn parse_pattern(&mut self) -> Result<Pattern, ParseError> {
        let tok = self.peek_raw().clone();
        let pattern = match tok.kind {
            TokenType::Integer | TokenType::Float => {
                self.advance();
                Pattern::Literal(self.number_literal(&tok, false)?)
            }
            TokenType::Minus if matches!(self.peek_at(1).kind, TokenType::Integer | TokenType::Float) => {
                self.advance();
                let number = self.advance();
                Pattern::Literal(self.number_literal(&number, true)?)
            }
            TokenType::String => {
                self.advance();
                Pattern::Literal(Literal::Str(tok.literal))
            }
            TokenType::True | TokenType::False => {
                self.advance();
                Pattern::Literal(Literal::Bool(tok.kind == TokenType::True))
            }
            TokenType::Null => {
                self.advance();
                Pattern::Literal(Literal::Null)
            }
            TokenType::Ident if tok.literal == "_" => {
                self.advance();
                Pattern::Wildcard
            }
            TokenType::Ident => {
                self.advance();
                Pattern::Var(tok.literal)
            }
            TokenType::LBrace => {
                self.advance();
                let mut fields = Vec::new();
                loop {
                    self.skip_newlines();
                    if self.check(TokenType::RBrace) || self.is_at_end() {
                        break;
                    }
                    let name = self.member_name()?;
                    let sub = if self.eat(TokenType::Colon) { Some(self.parse_pattern()?) } else { None };
                    fields.push((name, sub));
                    self.skip_newlines();
                    if !self.eat(TokenType::Comma) {
                        break;
                    }
                }
                self.skip_newlines();
                self.expect(TokenType::RBrace)?;
                Pattern::Object(fields)
            }
            TokenType::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                let mut rest = None;
                loop {
                    self.skip_newlines();
                    if self.check(TokenType::RBracket) {
                        break;
                    }
                    if self.eat(TokenType::DotDotDot) {
                        rest = Some(self.expect_ident()?);
                    } else {
                        elements.push(self.parse_pattern()?);
                    }
                    self.skip_newlines();
                    if !self.eat(TokenType::Comma) {
                        break;
                    }
                }
                self.skip_newlines();
                self.expect(TokenType::RBracket)?;
                Pattern::Array { elements, rest }
            }
            _ => return Err(self.error(&tok, format!("Expected pattern, but found {}", tok.kind))),
        };
        Ok(pattern)
    }
}
