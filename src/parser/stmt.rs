use super::Parser;
use super::ast::*;
use crate::diagnostics::{ParseError, hints};
use crate::lexer::token::TokenType;

const ASSIGN_HINT: &str = "Did you mean to assign a variable? Use '$ varName = value'";

/// Handler directives gathered from `+`, `%` and `<` lines.
#[derive(Debug, Default)]
pub(super) struct Directives {
    pub auth: Option<AuthConfig>,
    pub rate_limit: Option<RateLimit>,
    pub middleware: Vec<Middleware>,
    pub injections: Vec<Injection>,
    pub input: Option<InputBinding>,
}

impl Directives {
    /// Integer setting such as `+ retries(3)`, or 0 when absent.
    pub fn setting(&self, name: &str) -> u32 {
        self.middleware
            .iter()
            .find(|m| m.name == name)
            .and_then(|m| match m.args.first() {
                Some(Expr::Literal(Literal::Int(n))) => u32::try_from(*n).ok(),
                _ => None,
            })
            .unwrap_or(0)
    }
}

impl Parser<'_> {
    /// `{ stmt* }`
    pub(super) fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(TokenType::LBrace)?;
        let mut body = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RBrace) || self.is_at_end() {
                break;
            }
            body.push(self.parse_stmt()?);
        }
        self.expect(TokenType::RBrace)?;
        Ok(body)
    }

    pub(super) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let tok = self.peek_raw().clone();
        match tok.kind {
            TokenType::Dollar => self.parse_let(),
            TokenType::Greater => {
                self.advance();
                if matches!(self.peek_raw().kind, TokenType::Newline | TokenType::RBrace | TokenType::Eof) {
                    Ok(Stmt::Return(None))
                } else {
                    Ok(Stmt::Return(Some(self.parse_expr()?)))
                }
            }
            TokenType::Question => {
                self.advance();
                let name = self.parse_dotted_name("validator name")?;
                let args = self.parse_args()?;
                Ok(Stmt::Validate { name, args })
            }
            TokenType::While => {
                self.advance();
                let condition = self.parse_expr()?;
                let body = self.parse_block()?;
                Ok(Stmt::While { condition, body })
            }
            TokenType::For => self.parse_for(),
            TokenType::Switch => self.parse_switch(),
            TokenType::Assert => self.parse_assert(),
            TokenType::Break => {
                self.advance();
                Ok(Stmt::Break)
            }
            TokenType::Continue => {
                self.advance();
                Ok(Stmt::Continue)
            }
            TokenType::Ident if tok.literal == "if" => self.parse_if(),
            TokenType::Ident => self.parse_ident_stmt(),
            TokenType::Await | TokenType::Match | TokenType::Async => Ok(Stmt::Expr(self.parse_expr()?)),
            _ => Err(self.error_hint(&tok, format!("Expected statement, but found {}", tok.kind), hints::STATEMENT_HINT)),
        }
    }

    /// Tokens that may open a statement in a brace-less handler body.
    pub(super) fn starts_loose_stmt(&self) -> bool {
        matches!(
            self.peek_raw().kind,
            TokenType::Dollar
                | TokenType::Greater
                | TokenType::Question
                | TokenType::While
                | TokenType::For
                | TokenType::Switch
                | TokenType::Assert
        ) || self.check_word("if")
    }

    fn parse_let(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenType::Dollar)?;
        let mut name = self.expect_ident()?;
        let dotted = self.check(TokenType::Dot);
        while self.eat(TokenType::Dot) {
            name.push('.');
            name.push_str(&self.member_name()?);
        }
        if dotted {
            self.expect(TokenType::Equals)?;
            let value = self.parse_expr()?;
            return Ok(Stmt::Assign { target: name, value });
        }

        let ty = if self.eat(TokenType::Colon) { Some(self.parse_type()?) } else { None };
        let value = if ty.is_none() || self.check(TokenType::Equals) {
            self.expect(TokenType::Equals)?;
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Stmt::Let { name, ty, value })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let condition = self.parse_expr()?;
        let then_block = self.parse_block()?;

        if !self.peek().is_word("else") {
            return Ok(Stmt::If { condition, then_block, else_block: None });
        }
        self.skip_newlines();
        self.advance();
        let else_block = if self.check_word("if") { vec![self.parse_if()?] } else { self.parse_block()? };
        Ok(Stmt::If { condition, then_block, else_block: Some(else_block) })
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenType::For)?;
        let first = self.expect_ident()?;
        let (key, value) = if self.eat(TokenType::Comma) { (Some(first), self.expect_ident()?) } else { (None, first) };
        self.expect(TokenType::In)?;
        let iterable = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::For { key, value, iterable, body })
    }

    fn parse_switch(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenType::Switch)?;
        let value = self.parse_expr()?;
        self.expect(TokenType::LBrace)?;

        let mut cases = Vec::new();
        let mut default = None;
        loop {
            self.skip_newlines();
            let tok = self.peek_raw().clone();
            match tok.kind {
                TokenType::RBrace | TokenType::Eof => break,
                TokenType::Case => {
                    self.advance();
                    let value = self.parse_expr()?;
                    let body = self.parse_block()?;
                    cases.push(SwitchCase { value, body });
                }
                TokenType::Default => {
                    self.advance();
                    default = Some(self.parse_block()?);
                }
                _ => {
                    return Err(self.error(
                        &tok,
                        format!("Expected 'case' or 'default' in switch body, but found {}", tok.kind),
                    ));
                }
            }
        }
        self.expect(TokenType::RBrace)?;
        Ok(Stmt::Switch { value, cases, default })
    }

    fn parse_assert(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenType::Assert)?;
        self.expect(TokenType::LParen)?;
        self.skip_newlines();
        let condition = self.parse_expr()?;
        self.skip_newlines();
        let message = if self.eat(TokenType::Comma) {
            self.skip_newlines();
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.skip_newlines();
        self.expect(TokenType::RParen)?;
        Ok(Stmt::Assert { condition, message })
    }

    /// `name (. member)* =` at the cursor.
    fn assignment_ahead(&self) -> bool {
        let mut offset = 1;
        while self.peek_at(offset).kind == TokenType::Dot {
            offset += 2;
        }
        let tok = self.peek_at(offset);
        tok.kind == TokenType::Equals && tok.literal == "="
    }

    fn parse_ident_stmt(&mut self) -> Result<Stmt, ParseError> {
        if self.assignment_ahead() {
            let mut target = self.advance().literal;
            while self.eat(TokenType::Dot) {
                target.push('.');
                target.push_str(&self.member_name()?);
            }
            self.expect(TokenType::Equals)?;
            let value = self.parse_expr()?;
            return Ok(Stmt::Assign { target, value });
        }

        let start = self.peek_raw().clone();
        let expr = self.parse_expr()?;
        match expr {
            Expr::Call { .. } | Expr::MethodCall { .. } | Expr::FieldAccess { .. } | Expr::Pipe { .. } | Expr::Await(_) => {
                Ok(Stmt::Expr(expr))
            }
            _ => Err(self.error_hint(&start, "Unexpected identifier in statement position", ASSIGN_HINT)),
        }
    }

    /// Handler body: directives and statements, in braces or (when
    /// `require_braces` is false) on the following lines.
    pub(super) fn parse_handler(&mut self, require_braces: bool) -> Result<(Directives, Vec<Stmt>), ParseError> {
        let mut directives = Directives::default();
        let mut body = Vec::new();
        let mut saw_block = false;

        loop {
            self.skip_newlines();
            match self.peek_raw().kind {
                TokenType::Plus | TokenType::Percent | TokenType::Less => self.parse_directive(&mut directives)?,
                TokenType::LBrace if body.is_empty() => {
                    body = self.parse_handler_block(&mut directives)?;
                    saw_block = true;
                    break;
                }
                _ if !require_braces && self.starts_loose_stmt() => body.push(self.parse_stmt()?),
                _ => break,
            }
        }

        if require_braces && !saw_block {
            return Err(ParseError::expected(TokenType::LBrace, self.peek_raw(), self.source));
        }
        Ok((directives, body))
    }

    fn parse_handler_block(&mut self, directives: &mut Directives) -> Result<Vec<Stmt>, ParseError> {
        self.expect(TokenType::LBrace)?;
        let mut body = Vec::new();
        loop {
            self.skip_newlines();
            match self.peek_raw().kind {
                TokenType::RBrace | TokenType::Eof => break,
                TokenType::Plus | TokenType::Percent | TokenType::Less => self.parse_directive(directives)?,
                _ => body.push(self.parse_stmt()?),
            }
        }
        self.expect(TokenType::RBrace)?;
        Ok(body)
    }

    fn parse_directive(&mut self, directives: &mut Directives) -> Result<(), ParseError> {
        let marker = self.advance();
        match marker.kind {
            TokenType::Plus => self.parse_middleware(directives),
            TokenType::Percent => {
                let name = self.expect_ident()?;
                self.expect(TokenType::Colon)?;
                let ty = self.parse_type()?;
                directives.injections.push(Injection { name, ty });
                Ok(())
            }
            _ => {
                let name = self.expect_ident()?;
                self.expect(TokenType::Colon)?;
                let ty = self.parse_type()?;
                directives.input = Some(InputBinding { name, ty });
                Ok(())
            }
        }
    }

    fn parse_middleware(&mut self, directives: &mut Directives) -> Result<(), ParseError> {
        let name_tok = self.peek_raw().clone();
        let name = self.expect_ident()?;
        let args = if self.check(TokenType::LParen) { self.parse_args()? } else { Vec::new() };

        match name.as_str() {
            "auth" => {
                let kind = match args.first() {
                    Some(Expr::Var(kind)) | Some(Expr::Literal(Literal::Str(kind))) => kind.clone(),
                    _ => return Err(self.error(&name_tok, "auth middleware requires a kind, e.g. + auth(jwt)")),
                };
                directives.auth = Some(AuthConfig { kind, required: true });
            }
            "ratelimit" => {
                let limit = match args.first() {
                    Some(Expr::Binary { op: BinOp::Div, left, right }) => match (left.as_ref(), right.as_ref()) {
                        (Expr::Literal(Literal::Int(n)), Expr::Var(window)) => {
                            u32::try_from(*n).ok().map(|requests| RateLimit { requests, window: window.clone() })
                        }
                        _ => None,
                    },
                    Some(Expr::Literal(Literal::Str(spec))) => spec.split_once('/').and_then(|(n, window)| {
                        let requests = n.trim().parse().ok()?;
                        Some(RateLimit { requests, window: window.trim().to_string() })
                    }),
                    _ => None,
                };
                let Some(limit) = limit else {
                    return Err(self.error(&name_tok, "rate limit must look like requests/window, e.g. + ratelimit(100/min)"));
                };
                directives.rate_limit = Some(limit);
            }
            _ => directives.middleware.push(Middleware { name, args }),
        }
        Ok(())
    }
}
