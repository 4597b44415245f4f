pub mod hints;

use serde::Serialize;
use thiserror::Error;

use crate::lexer::token::{Token, TokenType};
use crate::span::Span;

/// Invalid character or unterminated string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_lex(message, *line, *column, source_text))]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub source_text: String,
    /// The offending character (the opening quote for unterminated strings).
    pub ch: char,
    pub hint: Option<String>,
    pub span: Span,
}

impl LexError {
    pub fn illegal_char(ch: char, line: usize, column: usize, span: Span, source: &str) -> Self {
        let code = ch.to_string().as_bytes().first().copied().unwrap_or_default();
        let hint = hints::illegal_char_hint(ch);
        let message = format!("Unexpected character '{ch}' (0x{code:02X}). {hint}");
        Self { message, line, column, source_text: source.to_string(), ch, hint: Some(hint.to_string()), span }
    }

    pub fn unterminated_string(quote: char, line: usize, column: usize, span: Span, source: &str) -> Self {
        let hint = hints::UNTERMINATED_STRING_HINT;
        let message = format!("Unterminated string literal starting with {quote}\n\nHint: {hint}");
        Self { message, line, column, source_text: source.to_string(), ch: quote, hint: Some(hint.to_string()), span }
    }
}

/// Any grammar or parse-time validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_parse(message, *line, *column, source_text, hint.as_deref()))]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub source_text: String,
    pub hint: Option<String>,
    pub span: Span,
}

impl ParseError {
    pub fn at(token: &Token, message: impl Into<String>, source: &str) -> Self {
        Self {
            message: message.into(),
            line: token.line,
            column: token.column,
            source_text: source.to_string(),
            hint: None,
            span: token.span,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// "Expected X, but found Y" with the table hint for the pair, if any.
    pub fn expected(expected: TokenType, found: &Token, source: &str) -> Self {
        let err = Self::at(found, format!("Expected {expected}, but found {}", found.kind), source);
        match hints::expect_hint(expected, found.kind) {
            Some(hint) => err.with_hint(hint),
            None => err,
        }
    }
}

/// Terminal result of a failed tokenize-or-parse run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    pub fn line(&self) -> usize {
        match self {
            SyntaxError::Lex(e) => e.line,
            SyntaxError::Parse(e) => e.line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            SyntaxError::Lex(e) => e.column,
            SyntaxError::Parse(e) => e.column,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SyntaxError::Lex(e) => &e.message,
            SyntaxError::Parse(e) => &e.message,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            SyntaxError::Lex(e) => e.hint.as_deref(),
            SyntaxError::Parse(e) => e.hint.as_deref(),
        }
    }

    pub fn source_text(&self) -> &str {
        match self {
            SyntaxError::Lex(e) => &e.source_text,
            SyntaxError::Parse(e) => &e.source_text,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lex(e) => e.span,
            SyntaxError::Parse(e) => e.span,
        }
    }

    pub fn report(&self) -> DiagnosticReport {
        DiagnosticReport {
            kind: match self {
                SyntaxError::Lex(_) => "lex",
                SyntaxError::Parse(_) => "parse",
            },
            line: self.line(),
            column: self.column(),
            message: self.message().to_string(),
            hint: self.hint().map(str::to_string),
        }
    }
}

/// Structured diagnostic for editor and tooling consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticReport {
    pub kind: &'static str,
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub hint: Option<String>,
}

fn excerpt_line(out: &mut String, number: usize, text: &str) {
    out.push_str(&format!("  {number:4} | {text}\n"));
}

fn caret_line(out: &mut String, column: usize) {
    if column > 0 {
        out.push_str(&format!("       | {}^\n", " ".repeat(column - 1)));
    }
}

fn render_lex(message: &str, line: usize, column: usize, source: &str) -> String {
    let mut out = format!("Lexer error at line {line}, column {column}:\n");
    let lines: Vec<&str> = source.split('\n').collect();
    if !source.is_empty() && line > 0 && line <= lines.len() {
        excerpt_line(&mut out, line, lines[line - 1]);
        caret_line(&mut out, column);
    }
    out.push('\n');
    out.push_str(message);
    out
}

fn render_parse(message: &str, line: usize, column: usize, source: &str, hint: Option<&str>) -> String {
    let mut out = format!("Error at line {line}, column {column}:\n");
    let lines: Vec<&str> = source.split('\n').collect();
    if !source.is_empty() && line > 0 && line <= lines.len() {
        if line > 1 {
            excerpt_line(&mut out, line - 1, lines[line - 2]);
        }
        excerpt_line(&mut out, line, lines[line - 1]);
        caret_line(&mut out, column);
        if line < lines.len() {
            excerpt_line(&mut out, line + 1, lines[line]);
        }
    }
    out.push('\n');
    out.push_str(message);
    if let Some(hint) = hint.filter(|h| !h.is_empty()) {
        out.push_str("\n\nHint: ");
        out.push_str(hint);
    }
    out
}

/// Render a SyntaxError with ariadne for terminal output.
pub fn render_ariadne(err: &SyntaxError, filename: &str, color: bool) -> String {
    use ariadne::{Config, Label, Report, ReportKind, Source};

    let source = err.source_text();
    let span = err.span();
    let end = span.end.max(span.start + 1).min(source.len().max(span.start));
    let headline = match err {
        SyntaxError::Lex(_) => format!("lexer error in {filename}"),
        SyntaxError::Parse(_) => format!("syntax error in {filename}"),
    };
    // The first line of a lex message is the summary; any hint follows a blank line.
    let summary = err.message().lines().next().unwrap_or_default().to_string();

    let mut report = Report::build(ReportKind::Error, (), span.start)
        .with_config(Config::default().with_color(color))
        .with_message(headline)
        .with_label(Label::new(span.start..end).with_message(summary));
    if let Some(hint) = err.hint() {
        report = report.with_note(hint);
    }

    let mut buf = Vec::new();
    match report.finish().write(Source::from(source), &mut buf) {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => err.to_string(),
    }
}
