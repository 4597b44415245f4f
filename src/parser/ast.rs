use serde::Serialize;

use crate::span::Spanned;

/// A parsed source file: top-level items in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub items: Vec<Spanned<Item>>,
}

impl Module {
    pub fn nodes(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().map(|item| &item.node)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Item {
    Route(Route),
    WebSocketRoute(WebSocketRoute),
    TypeDef(TypeDef),
    TraitDef(TraitDef),
    ContractDef(ContractDef),
    Function(Function),
    Command(Command),
    CronTask(CronTask),
    EventHandler(EventHandler),
    QueueWorker(QueueWorker),
    GraphQLResolver(GraphQLResolver),
    GrpcService(GrpcService),
    GrpcHandler(GrpcHandler),
    MacroDef(MacroDef),
    MacroInvocation(MacroInvocation),
    Import(ImportStatement),
    ModuleDecl(ModuleDecl),
    Const(ConstDecl),
    TestBlock(TestBlock),
}

impl Item {
    /// Short construct name, used in logs and by the CLI.
    pub fn kind(&self) -> &'static str {
        match self {
            Item::Route(_) => "route",
            Item::WebSocketRoute(_) => "websocket",
            Item::TypeDef(_) => "type",
            Item::TraitDef(_) => "trait",
            Item::ContractDef(_) => "contract",
            Item::Function(_) => "function",
            Item::Command(_) => "command",
            Item::CronTask(_) => "cron",
            Item::EventHandler(_) => "event",
            Item::QueueWorker(_) => "queue",
            Item::GraphQLResolver(_) => "graphql",
            Item::GrpcService(_) => "grpc-service",
            Item::GrpcHandler(_) => "grpc-handler",
            Item::MacroDef(_) => "macro",
            Item::MacroInvocation(_) => "macro-call",
            Item::Import(_) => "import",
            Item::ModuleDecl(_) => "module",
            Item::Const(_) => "const",
            Item::TestBlock(_) => "test",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Case-insensitive method lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthConfig {
    pub kind: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimit {
    pub requests: u32,
    pub window: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Middleware {
    pub name: String,
    pub args: Vec<Expr>,
}

/// `% name: Type` dependency declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Injection {
    pub name: String,
    pub ty: TypeAnnotation,
}

/// `< name: Type` request input binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputBinding {
    pub name: String,
    pub ty: TypeAnnotation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub path: String,
    pub method: HttpMethod,
    pub input: Option<InputBinding>,
    pub return_type: Option<TypeAnnotation>,
    pub auth: Option<AuthConfig>,
    pub rate_limit: Option<RateLimit>,
    pub middleware: Vec<Middleware>,
    pub injections: Vec<Injection>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WsEventKind {
    Connect,
    Message,
    Disconnect,
    Error,
}

impl WsEventKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "connect" => Some(WsEventKind::Connect),
            "message" => Some(WsEventKind::Message),
            "disconnect" => Some(WsEventKind::Disconnect),
            "error" => Some(WsEventKind::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebSocketEvent {
    pub kind: WsEventKind,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebSocketRoute {
    pub path: String,
    pub events: Vec<WebSocketEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub ty: TypeAnnotation,
    pub required: bool,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeAnnotation>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDef {
    pub name: String,
    pub fields: Vec<Field>,
    pub traits: Vec<String>,
    pub methods: Vec<Method>,
}

/// Body-less method signature, as declared by traits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSig {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitDef {
    pub name: String,
    pub type_params: Vec<String>,
    pub methods: Vec<MethodSig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractEndpoint {
    pub method: HttpMethod,
    pub path: String,
    pub return_type: Option<TypeAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractDef {
    pub name: String,
    pub endpoints: Vec<ContractEndpoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: Option<TypeAnnotation>,
    pub required: bool,
    pub default: Option<Expr>,
    pub is_flag: bool,
}

impl Param {
    /// Not marked required, or carrying a default.
    pub fn is_optional(&self) -> bool {
        !self.required || self.default.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub name: String,
    pub type_params: Vec<String>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeAnnotation>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeAnnotation>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CronTask {
    pub name: Option<String>,
    pub schedule: String,
    pub timezone: Option<String>,
    pub retries: u32,
    pub injections: Vec<Injection>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventHandler {
    pub event: String,
    pub is_async: bool,
    pub injections: Vec<Injection>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueWorker {
    pub queue: String,
    pub concurrency: u32,
    pub max_retries: u32,
    pub timeout: u32,
    pub injections: Vec<Injection>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolverKind {
    Query,
    Mutation,
    Subscription,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQLResolver {
    pub kind: ResolverKind,
    pub field: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeAnnotation>,
    pub auth: Option<AuthConfig>,
    pub injections: Vec<Injection>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrpcMethod {
    pub name: String,
    pub input: TypeAnnotation,
    pub client_streaming: bool,
    pub output: TypeAnnotation,
    pub server_streaming: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrpcService {
    pub name: String,
    pub methods: Vec<GrpcMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrpcHandler {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeAnnotation>,
    pub server_streaming: bool,
    pub auth: Option<AuthConfig>,
    pub injections: Vec<Injection>,
    pub body: Vec<Stmt>,
}

/// One entry of a macro body: either a whole item or a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MacroNode {
    Item(Box<Item>),
    Stmt(Stmt),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<MacroNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroInvocation {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportName {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportStatement {
    pub path: String,
    pub alias: Option<String>,
    pub selective: bool,
    pub names: Vec<ImportName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDecl {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstDecl {
    pub name: String,
    pub ty: Option<TypeAnnotation>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestBlock {
    pub name: String,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeAnnotation {
    Int,
    Str,
    Bool,
    Float,
    Array(Box<TypeAnnotation>),
    Generic { base: String, args: Vec<TypeAnnotation> },
    Union(Vec<TypeAnnotation>),
    Named(String),
}

impl TypeAnnotation {
    /// Primitive for a fixed type name; `string` is accepted for `str`.
    pub fn primitive(name: &str) -> Option<Self> {
        match name {
            "int" => Some(TypeAnnotation::Int),
            "str" | "string" => Some(TypeAnnotation::Str),
            "bool" => Some(TypeAnnotation::Bool),
            "float" => Some(TypeAnnotation::Float),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Let { name: String, ty: Option<TypeAnnotation>, value: Option<Expr> },
    /// Reassignment; `target` may be a dotted field path.
    Assign { target: String, value: Expr },
    Return(Option<Expr>),
    If { condition: Expr, then_block: Vec<Stmt>, else_block: Option<Vec<Stmt>> },
    While { condition: Expr, body: Vec<Stmt> },
    For { key: Option<String>, value: String, iterable: Expr, body: Vec<Stmt> },
    Switch { value: Expr, cases: Vec<SwitchCase>, default: Option<Vec<Stmt>> },
    Assert { condition: Expr, message: Option<Expr> },
    Validate { name: String, args: Vec<Expr> },
    Break,
    Continue,
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchCase {
    pub value: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
}

impl Literal {
    /// Kind name as used in default-value diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::Str(_) => "string",
            Literal::Bool(_) => "bool",
            Literal::Null => "null",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectField {
    pub key: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Vec<Stmt>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Pattern {
    Literal(Literal),
    Var(String),
    Wildcard,
    /// `{a, b: pat}`; a field without a sub-pattern binds its own name.
    Object(Vec<(String, Option<Pattern>)>),
    Array { elements: Vec<Pattern>, rest: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Literal(Literal),
    Var(String),
    Binary { op: BinOp, left: Box<Expr>, right: Box<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    FieldAccess { object: Box<Expr>, field: String },
    Index { object: Box<Expr>, index: Box<Expr> },
    /// Call by name; `ns.f(x)` on a bare variable keeps the dotted name.
    Call { name: String, args: Vec<Expr> },
    MethodCall { object: Box<Expr>, method: String, args: Vec<Expr> },
    Object(Vec<ObjectField>),
    Array(Vec<Expr>),
    Pipe { left: Box<Expr>, right: Box<Expr> },
    Lambda { params: Vec<String>, body: LambdaBody },
    Match { value: Box<Expr>, arms: Vec<MatchArm> },
    Await(Box<Expr>),
    Async(Vec<Stmt>),
}

impl Expr {
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Expr::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}
