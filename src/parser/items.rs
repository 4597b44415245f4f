use super::Parser;
use super::ast::*;
use super::validate::{ParamOrder, check_default};
use crate::diagnostics::{ParseError, hints};
use crate::lexer::token::{Token, TokenType};

const PATH_HINT: &str = "Route paths must start with '/' (e.g., /api/users)";
const WS_BODY_HINT: &str = "Example: @ ws /chat { on connect {...} on message {...} }";
const CRON_HINT: &str = "Example: @ cron \"0 0 * * *\" { ... }";

impl Parser<'_> {
    // ---- routes -------------------------------------------------------

    /// Everything that follows `@` (or `route`).
    pub(super) fn parse_at_item(&mut self) -> Result<Item, ParseError> {
        let tok = self.peek_raw().clone();
        if tok.kind == TokenType::Slash || (tok.kind == TokenType::Ident && tok.literal.starts_with('/')) {
            return self.parse_route(None);
        }

        let word = if tok.kind == TokenType::Ident { tok.literal.as_str() } else { "" };
        if let Some(method) = HttpMethod::from_name(word) {
            self.advance();
            return self.parse_route(Some(method));
        }
        let parse: fn(&mut Self) -> Result<Item, ParseError> = match (tok.kind, word) {
            // expanded `cron`, `queue`, `command` and `handle` arrive as their symbols
            (TokenType::Star, _) => Self::parse_cron_task,
            (TokenType::Ampersand, _) => Self::parse_queue_worker,
            (TokenType::Bang, _) => Self::parse_command,
            (TokenType::Tilde, _) => Self::parse_event_handler,
            (_, "route") => Self::parse_untyped_route,
            (_, "ws" | "websocket") => Self::parse_websocket,
            (_, "query") => Self::parse_query,
            (_, "mutation") => Self::parse_mutation,
            (_, "subscription") => Self::parse_subscription,
            (_, "rpc" | "grpc") => Self::parse_grpc,
            (_, "command" | "cmd") => Self::parse_command,
            (_, "cron" | "schedule") => Self::parse_cron_task,
            (_, "event" | "on") => Self::parse_event_handler,
            (_, "queue" | "worker") => Self::parse_queue_worker,
            _ => {
                let found = if tok.literal.is_empty() { tok.kind.as_str() } else { tok.literal.as_str() };
                return Err(self.error_hint(
                    &tok,
                    format!("Expected 'route', 'ws', 'websocket', or HTTP method after '@', but found '{found}'"),
                    hints::ROUTE_HINT,
                ));
            }
        };
        self.advance();
        parse(self)
    }

    fn parse_untyped_route(&mut self) -> Result<Item, ParseError> {
        self.parse_route(None)
    }

    /// `/users/:id`, or `/`-separated segments when the path did not lex
    /// as one token (`/`, `/:id`).
    fn parse_route_path(&mut self) -> Result<String, ParseError> {
        let tok = self.peek_raw().clone();
        if tok.kind == TokenType::Ident && tok.literal.starts_with('/') {
            self.advance();
            return Ok(tok.literal);
        }
        if tok.kind != TokenType::Slash {
            return Err(self.error_hint(&tok, format!("Expected route path, but found {}", tok.kind), PATH_HINT));
        }

        let mut path = String::new();
        while self.eat(TokenType::Slash) {
            path.push('/');
            if self.eat(TokenType::Colon) {
                path.push(':');
                path.push_str(&self.expect_ident()?);
            } else if self.check(TokenType::Ident) {
                path.push_str(&self.advance().literal);
            }
        }
        Ok(path)
    }

    fn parse_route(&mut self, method: Option<HttpMethod>) -> Result<Item, ParseError> {
        let path = self.parse_route_path()?;

        let mut method = method;
        if self.eat(TokenType::LBracket) {
            let method_tok = self.peek_raw().clone();
            let name = self.expect_ident()?;
            let parsed = HttpMethod::from_name(&name).ok_or_else(|| {
                self.error_hint(&method_tok, format!("Unknown HTTP method: {name}"), hints::HTTP_METHOD_HINT)
            })?;
            method = Some(parsed);
            self.expect(TokenType::RBracket)?;
        }

        let return_type = if self.eat(TokenType::Arrow) { Some(self.parse_type()?) } else { None };
        let (directives, body) = self.parse_handler(false)?;

        Ok(Item::Route(Route {
            path,
            method: method.unwrap_or(HttpMethod::Get),
            input: directives.input,
            return_type,
            auth: directives.auth,
            rate_limit: directives.rate_limit,
            middleware: directives.middleware,
            injections: directives.injections,
            body,
        }))
    }

    fn parse_websocket(&mut self) -> Result<Item, ParseError> {
        let path = self.parse_route_path()?;
        self.skip_newlines();
        if !self.check(TokenType::LBrace) {
            return Err(self.error_hint(self.peek_raw(), "WebSocket route must have a body in braces", WS_BODY_HINT));
        }
        self.advance();

        let mut events = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RBrace) || self.is_at_end() {
                break;
            }
            if !self.eat_word("on") {
                let tok = self.peek_raw();
                return Err(self.error_hint(tok, format!("Expected 'on', but found {}", tok.kind), hints::WS_EVENT_HINT));
            }
            let name_tok = self.peek_raw().clone();
            let name = self.expect_ident()?;
            let kind = WsEventKind::from_name(&name).ok_or_else(|| {
                self.error_hint(&name_tok, format!("Unknown WebSocket event '{name}'"), hints::WS_EVENT_HINT)
            })?;
            let body = self.parse_block()?;
            events.push(WebSocketEvent { kind, body });
        }
        self.expect(TokenType::RBrace)?;
        Ok(Item::WebSocketRoute(WebSocketRoute { path, events }))
    }

    // ---- GraphQL and gRPC ---------------------------------------------

    fn parse_query(&mut self) -> Result<Item, ParseError> {
        self.parse_resolver(ResolverKind::Query)
    }

    fn parse_mutation(&mut self) -> Result<Item, ParseError> {
        self.parse_resolver(ResolverKind::Mutation)
    }

    fn parse_subscription(&mut self) -> Result<Item, ParseError> {
        self.parse_resolver(ResolverKind::Subscription)
    }

    fn parse_resolver(&mut self, kind: ResolverKind) -> Result<Item, ParseError> {
        let field = self.expect_ident()?;
        let params = if self.check(TokenType::LParen) { self.parse_param_list()? } else { Vec::new() };
        let return_type = self.parse_return_type()?;
        let (directives, body) = self.parse_handler(true)?;
        Ok(Item::GraphQLResolver(GraphQLResolver {
            kind,
            field,
            params,
            return_type,
            auth: directives.auth,
            injections: directives.injections,
            body,
        }))
    }

    /// `@ rpc Name { Method(In) -> Out ... }` defines a service;
    /// `@ rpc Name(params) -> Out { ... }` implements a handler.
    fn parse_grpc(&mut self) -> Result<Item, ParseError> {
        let name = self.expect_ident()?;
        if self.check(TokenType::LParen) {
            let params = self.parse_param_list()?;
            let (return_type, server_streaming) = if self.eat(TokenType::Arrow) {
                let streaming = self.eat_stream_marker();
                (Some(self.parse_type()?), streaming)
            } else {
                (None, false)
            };
            let (directives, body) = self.parse_handler(true)?;
            return Ok(Item::GrpcHandler(GrpcHandler {
                name,
                params,
                return_type,
                server_streaming,
                auth: directives.auth,
                injections: directives.injections,
                body,
            }));
        }

        self.skip_newlines();
        self.expect(TokenType::LBrace)?;
        let mut methods = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RBrace) || self.is_at_end() {
                break;
            }
            let name = self.expect_ident()?;
            self.expect(TokenType::LParen)?;
            let client_streaming = self.eat_stream_marker();
            let input = self.parse_type()?;
            self.expect(TokenType::RParen)?;
            self.expect(TokenType::Arrow)?;
            let server_streaming = self.eat_stream_marker();
            let output = self.parse_type()?;
            methods.push(GrpcMethod { name, input, client_streaming, output, server_streaming });
        }
        self.expect(TokenType::RBrace)?;
        Ok(Item::GrpcService(GrpcService { name, methods }))
    }

    /// `stream` before a type; a type literally named `stream` stays a type.
    fn eat_stream_marker(&mut self) -> bool {
        if self.check_word("stream") && self.peek_at(1).kind == TokenType::Ident {
            self.advance();
            true
        } else {
            false
        }
    }

    // ---- types, traits, contracts -------------------------------------

    pub(super) fn parse_type_def(&mut self) -> Result<Item, ParseError> {
        let name = self.expect_ident()?;
        let mut traits = Vec::new();
        if self.eat_word("impl") {
            traits.push(self.expect_ident()?);
            while self.eat(TokenType::Comma) {
                traits.push(self.expect_ident()?);
            }
        }
        self.expect(TokenType::LBrace)?;

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RBrace) || self.is_at_end() {
                break;
            }
            let name_tok = self.peek_raw().clone();
            let member = self.member_name()?;

            if self.check(TokenType::LParen) {
                let params = self.parse_param_list()?;
                let return_type = self.parse_return_type()?;
                let body = self.parse_block()?;
                methods.push(Method { name: member, params, return_type, body });
                continue;
            }

            self.expect(TokenType::Colon)?;
            let (ty, required) = self.parse_marked_type()?;
            let default = if self.eat(TokenType::Equals) { Some(self.parse_expr()?) } else { None };
            if let Some(default) = &default {
                check_default(&member, &ty, default).map_err(|msg| self.error(&name_tok, msg))?;
            }
            fields.push(Field { name: member, ty, required, default });
            self.eat(TokenType::Comma);
        }
        self.expect(TokenType::RBrace)?;
        Ok(Item::TypeDef(TypeDef { name, fields, traits, methods }))
    }

    pub(super) fn parse_trait(&mut self) -> Result<Item, ParseError> {
        self.advance();
        let name = self.expect_ident()?;
        let type_params = if self.check(TokenType::Less) { self.parse_type_params()? } else { Vec::new() };
        self.expect(TokenType::LBrace)?;

        let mut methods = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RBrace) || self.is_at_end() {
                break;
            }
            let name = self.member_name()?;
            let params = self.parse_param_list()?;
            let return_type = self.parse_return_type()?;
            methods.push(MethodSig { name, params, return_type });
        }
        self.expect(TokenType::RBrace)?;
        Ok(Item::TraitDef(TraitDef { name, type_params, methods }))
    }

    pub(super) fn parse_contract(&mut self) -> Result<Item, ParseError> {
        self.advance();
        let name = self.expect_ident()?;
        self.expect(TokenType::LBrace)?;

        let mut endpoints = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RBrace) || self.is_at_end() {
                break;
            }
            self.expect(TokenType::At)?;
            let method_tok = self.peek_raw().clone();
            let method_name = self.expect_ident()?;
            let method = HttpMethod::from_name(&method_name).ok_or_else(|| {
                self.error_hint(&method_tok, format!("Unknown HTTP method: {method_name}"), hints::HTTP_METHOD_HINT)
            })?;
            let path = self.parse_route_path()?;
            let return_type = if self.eat(TokenType::Arrow) { Some(self.parse_type()?) } else { None };
            endpoints.push(ContractEndpoint { method, path, return_type });
        }
        self.expect(TokenType::RBrace)?;
        Ok(Item::ContractDef(ContractDef { name, endpoints }))
    }

    // ---- functions and commands ---------------------------------------

    /// `-> T` or `: T` after a parameter list.
    fn parse_return_type(&mut self) -> Result<Option<TypeAnnotation>, ParseError> {
        if self.eat(TokenType::Arrow) || self.eat(TokenType::Colon) {
            Ok(Some(self.parse_type()?))
        } else {
            Ok(None)
        }
    }

    pub(super) fn parse_function(&mut self) -> Result<Item, ParseError> {
        let name = self.expect_ident()?;
        let type_params = if self.check(TokenType::Less) { self.parse_type_params()? } else { Vec::new() };
        let params = self.parse_param_list()?;
        let return_type = self.parse_return_type()?;
        let body = self.parse_block()?;
        Ok(Item::Function(Function { name, type_params, params, return_type, body }))
    }

    /// `( param, ... )` with ordering and default checks.
    fn parse_param_list(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(TokenType::LParen)?;
        let mut params = Vec::new();
        let mut order = ParamOrder::default();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RParen) {
                break;
            }
            let (param, name_tok) = self.parse_param()?;
            order.admit(&param).map_err(|msg| self.error(&name_tok, msg))?;
            params.push(param);
            self.skip_newlines();
            if !self.eat(TokenType::Comma) {
                break;
            }
        }
        self.skip_newlines();
        self.expect(TokenType::RParen)?;
        Ok(params)
    }

    /// `name[: Type[!|?]] [= default]`; `--name` marks a flag.
    fn parse_param(&mut self) -> Result<(Param, Token), ParseError> {
        let name_tok = self.peek_raw().clone();
        let (name, is_flag) = if name_tok.is_flag() {
            self.advance();
            (name_tok.literal[2..].to_string(), true)
        } else if name_tok.kind == TokenType::Minus && self.peek_at(1).kind == TokenType::Minus {
            self.advance();
            self.advance();
            (self.expect_ident()?, true)
        } else {
            (self.expect_ident()?, false)
        };

        let (ty, required) = if self.eat(TokenType::Colon) {
            let (ty, required) = self.parse_marked_type()?;
            (Some(ty), required)
        } else {
            (None, false)
        };
        let default = if self.eat(TokenType::Equals) { Some(self.parse_default_expr()?) } else { None };
        if let (Some(ty), Some(default)) = (&ty, &default) {
            check_default(&name, ty, default).map_err(|msg| self.error(&name_tok, msg))?;
        }
        Ok((Param { name, ty, required, default, is_flag }, name_tok))
    }

    /// Another bare command parameter follows, possibly on the next line.
    fn command_param_ahead(&self) -> bool {
        let mut offset = 0;
        while self.peek_at(offset).kind == TokenType::Newline {
            offset += 1;
        }
        let tok = self.peek_at(offset);
        let next = self.peek_at(offset + 1);
        if tok.is_flag() || (tok.kind == TokenType::Minus && next.kind == TokenType::Minus) {
            return true;
        }
        tok.kind == TokenType::Ident && !tok.literal.starts_with('/') && (offset == 0 || next.kind == TokenType::Colon)
    }

    pub(super) fn parse_command(&mut self) -> Result<Item, ParseError> {
        let name = self.expect_ident()?;
        let description = if self.check(TokenType::String) { Some(self.advance().literal) } else { None };

        let mut params = Vec::new();
        let mut order = ParamOrder::default();
        while self.command_param_ahead() {
            self.skip_newlines();
            let (param, name_tok) = self.parse_param()?;
            order.admit(&param).map_err(|msg| self.error(&name_tok, msg))?;
            params.push(param);
            self.eat(TokenType::Comma);
        }

        let return_type = if self.eat(TokenType::Arrow) { Some(self.parse_type()?) } else { None };
        let (_, body) = self.parse_handler(false)?;
        Ok(Item::Command(Command { name, description, params, return_type, body }))
    }

    // ---- background work ----------------------------------------------

    pub(super) fn parse_cron_task(&mut self) -> Result<Item, ParseError> {
        let tok = self.peek_raw().clone();
        if tok.kind != TokenType::String {
            return Err(self.error_hint(&tok, "Expected cron schedule string", CRON_HINT));
        }
        let schedule = self.advance().literal;
        let name = if self.check(TokenType::Ident) && !self.check_word("tz") {
            Some(self.advance().literal)
        } else {
            None
        };
        let timezone = if self.eat_word("tz") { Some(self.expect_string("timezone string")?) } else { None };

        let (directives, body) = self.parse_handler(true)?;
        Ok(Item::CronTask(CronTask {
            name,
            schedule,
            timezone,
            retries: directives.setting("retries"),
            injections: directives.injections,
            body,
        }))
    }

    pub(super) fn parse_event_handler(&mut self) -> Result<Item, ParseError> {
        let event = self.parse_dotted_name("event name")?;
        let is_async = self.eat(TokenType::Async);
        let (directives, body) = self.parse_handler(true)?;
        Ok(Item::EventHandler(EventHandler { event, is_async, injections: directives.injections, body }))
    }

    pub(super) fn parse_queue_worker(&mut self) -> Result<Item, ParseError> {
        let queue = self.parse_dotted_name("queue name")?;
        let (directives, body) = self.parse_handler(true)?;
        Ok(Item::QueueWorker(QueueWorker {
            queue,
            concurrency: directives.setting("concurrency"),
            max_retries: directives.setting("retries"),
            timeout: directives.setting("timeout"),
            injections: directives.injections,
            body,
        }))
    }

    // ---- macros, modules, tests ---------------------------------------

    pub(super) fn parse_macro_def(&mut self) -> Result<Item, ParseError> {
        self.expect(TokenType::Macro)?;
        self.expect(TokenType::Bang)?;
        let name = self.expect_ident()?;

        self.expect(TokenType::LParen)?;
        let mut params = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RParen) {
                break;
            }
            params.push(self.expect_ident()?);
            if !self.eat(TokenType::Comma) {
                break;
            }
        }
        self.skip_newlines();
        self.expect(TokenType::RParen)?;
        self.expect(TokenType::LBrace)?;

        let mut body = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RBrace) || self.is_at_end() {
                break;
            }
            if self.starts_item() {
                body.push(MacroNode::Item(Box::new(self.parse_item()?)));
            } else {
                body.push(MacroNode::Stmt(self.parse_stmt()?));
            }
        }
        self.expect(TokenType::RBrace)?;
        Ok(Item::MacroDef(MacroDef { name, params, body }))
    }

    pub(super) fn parse_macro_invocation(&mut self) -> Result<Item, ParseError> {
        let name = self.expect_ident()?;
        self.expect(TokenType::Bang)?;
        let args = self.parse_args()?;
        Ok(Item::MacroInvocation(MacroInvocation { name, args }))
    }

    pub(super) fn parse_import(&mut self) -> Result<Item, ParseError> {
        if !self.eat(TokenType::From) {
            self.expect(TokenType::Import)?;
            let path = self.expect_string("import path")?;
            let alias = if self.eat(TokenType::As) { Some(self.expect_ident()?) } else { None };
            return Ok(Item::Import(ImportStatement { path, alias, selective: false, names: Vec::new() }));
        }

        let path = self.expect_string("import path")?;
        self.expect(TokenType::Import)?;
        self.expect(TokenType::LBrace)?;
        let mut names = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenType::RBrace) {
                break;
            }
            let name = self.expect_ident()?;
            let alias = if self.eat(TokenType::As) { Some(self.expect_ident()?) } else { None };
            names.push(ImportName { name, alias });
            self.skip_newlines();
            if !self.eat(TokenType::Comma) {
                break;
            }
        }
        self.skip_newlines();
        self.expect(TokenType::RBrace)?;
        Ok(Item::Import(ImportStatement { path, alias: None, selective: true, names }))
    }

    pub(super) fn parse_module_decl(&mut self) -> Result<Item, ParseError> {
        self.expect(TokenType::Module)?;
        let name = self.parse_dotted_name("module name")?;
        Ok(Item::ModuleDecl(ModuleDecl { name }))
    }

    pub(super) fn parse_const(&mut self) -> Result<Item, ParseError> {
        self.expect(TokenType::Const)?;
        let name_tok = self.peek_raw().clone();
        let name = self.expect_ident()?;
        let ty = if self.eat(TokenType::Colon) { Some(self.parse_type()?) } else { None };
        self.expect(TokenType::Equals)?;
        let value = self.parse_expr()?;
        if let Some(ty) = &ty {
            check_default(&name, ty, &value).map_err(|msg| self.error(&name_tok, msg))?;
        }
        Ok(Item::Const(ConstDecl { name, ty, value }))
    }

    pub(super) fn parse_test_block(&mut self) -> Result<Item, ParseError> {
        self.advance();
        let tok = self.peek_raw().clone();
        if tok.kind != TokenType::String {
            return Err(self.error_hint(
                &tok,
                format!("Expected test name, but found {}", tok.kind),
                "Example: test \"adds numbers\" { assert(add(1, 2) == 3) }",
            ));
        }
        let name = self.advance().literal;
        let body = self.parse_block()?;
        Ok(Item::TestBlock(TestBlock { name, body }))
    }
}
