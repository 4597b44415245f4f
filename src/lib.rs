pub mod span;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod config;

use std::path::{Path, PathBuf};

use thiserror::Error;

use config::GlyphConfig;
pub use diagnostics::{LexError, ParseError, SyntaxError};
pub use lexer::{Syntax, Token, TokenType, tokenize};
pub use parser::ast::Module;

/// Failure to produce a `Module` from a file on disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{}: could not read file: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Parse an already tokenized source. `source` is kept for diagnostics.
pub fn parse(tokens: &[Token], source: &str) -> Result<Module, ParseError> {
    parser::Parser::new(tokens, source).parse_module()
}

/// Tokenize and parse `source` in one step (source → tokens → Module).
pub fn parse_source(source: &str, syntax: Syntax) -> Result<Module, SyntaxError> {
    let tokens = tokenize(source, syntax)?;
    Ok(parse(&tokens, source)?)
}

/// Read and parse a file, picking the dialect from its extension.
pub fn parse_file(path: &Path, config: &GlyphConfig) -> Result<Module, LoadError> {
    let source =
        std::fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let syntax = config.syntax_for(path);
    tracing::debug!(path = %path.display(), %syntax, "parsing file");
    Ok(parse_source(&source, syntax)?)
}

impl Syntax {
    /// Dialect for a file name under the default extension table.
    pub fn from_path(path: &Path) -> Self {
        GlyphConfig::default().syntax_for(path)
    }
}
