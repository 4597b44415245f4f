//! `glyph.toml`: dialect selection and diagnostic output settings.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::lexer::Syntax;

pub const CONFIG_FILE: &str = "glyph.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{}: could not read file: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("{}: invalid syntax: {source}", path.display())]
    Syntax { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticFormat {
    /// Caret excerpt with hint
    #[default]
    Plain,
    /// ariadne report
    Pretty,
    /// One JSON object per diagnostic
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyntaxConfig {
    pub default: Syntax,
    pub compact_extensions: Vec<String>,
    pub expanded_extensions: Vec<String>,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            default: Syntax::Compact,
            compact_extensions: vec!["glyph".to_string()],
            expanded_extensions: vec!["glyphx".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub format: DiagnosticFormat,
    pub color: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { format: DiagnosticFormat::Plain, color: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GlyphConfig {
    pub syntax: SyntaxConfig,
    pub diagnostics: DiagnosticsConfig,
}

impl GlyphConfig {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Syntax { path: path.to_path_buf(), source })
    }

    /// Load an explicit config file. A missing file is an error here.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&content, path)
    }

    /// `glyph.toml` in `dir`, or the defaults when there is none.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            tracing::debug!(dir = %dir.display(), "no glyph.toml, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Dialect for `path` by extension; unknown extensions get the default.
    pub fn syntax_for(&self, path: &Path) -> Syntax {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return self.syntax.default;
        };
        if self.syntax.expanded_extensions.iter().any(|e| e == ext) {
            Syntax::Expanded
        } else if self.syntax.compact_extensions.iter().any(|e| e == ext) {
            Syntax::Compact
        } else {
            self.syntax.default
        }
    }
}
