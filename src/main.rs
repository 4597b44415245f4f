use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use glyph_front::config::{DiagnosticFormat, GlyphConfig};
use glyph_front::diagnostics::render_ariadne;
use glyph_front::{LoadError, Syntax, SyntaxError};

#[derive(Parser)]
#[command(name = "glyph-parse", version, about = "Tokenize, parse and check GLYPH sources")]
struct Cli {
    /// Config file (defaults to ./glyph.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Diagnostic output format; overrides the config file
    #[arg(long, global = true, value_enum)]
    format: Option<DiagnosticFormat>,

    /// Log parser activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream, one token per line
    Tokens {
        file: PathBuf,
        /// Dialect; inferred from the extension when omitted
        #[arg(long, value_enum)]
        syntax: Option<Syntax>,
    },
    /// Parse a file and print its AST
    Parse {
        file: PathBuf,
        #[arg(long, value_enum)]
        syntax: Option<Syntax>,
        /// Print JSON instead of the debug tree
        #[arg(long)]
        json: bool,
    },
    /// Parse each file and report the first error in each
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_ansi(false).init();
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<GlyphConfig> {
    let config = match explicit {
        Some(path) => GlyphConfig::load(path)?,
        None => GlyphConfig::discover(&std::env::current_dir().context("could not read working directory")?)?,
    };
    Ok(config)
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))
}

fn render(err: &SyntaxError, file: &Path, format: DiagnosticFormat, color: bool) -> String {
    match format {
        DiagnosticFormat::Plain => err.to_string(),
        DiagnosticFormat::Pretty => render_ariadne(err, &file.display().to_string(), color),
        DiagnosticFormat::Json => {
            let mut value = serde_json::to_value(err.report()).unwrap_or_default();
            if let Some(obj) = value.as_object_mut() {
                obj.insert("file".to_string(), file.display().to_string().into());
            }
            value.to_string()
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(config.diagnostics.format);
    let color = config.diagnostics.color;

    match cli.command {
        Commands::Tokens { file, syntax } => {
            let source = read_source(&file)?;
            let syntax = syntax.unwrap_or_else(|| config.syntax_for(&file));
            match glyph_front::tokenize(&source, syntax) {
                Ok(tokens) => {
                    for tok in tokens {
                        println!("{}:{} {} {}", tok.line, tok.column, tok.kind, tok.literal.escape_debug());
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    eprintln!("{}", render(&SyntaxError::from(err), &file, format, color));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Parse { file, syntax, json } => {
            let source = read_source(&file)?;
            let syntax = syntax.unwrap_or_else(|| config.syntax_for(&file));
            match glyph_front::parse_source(&source, syntax) {
                Ok(module) if json => {
                    println!("{}", serde_json::to_string_pretty(&module)?);
                    Ok(ExitCode::SUCCESS)
                }
                Ok(module) => {
                    println!("{module:#?}");
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    eprintln!("{}", render(&err, &file, format, color));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Check { files } => {
            let mut failed = 0usize;
            for file in &files {
                match glyph_front::parse_file(file, &config) {
                    Ok(module) => {
                        tracing::debug!(file = %file.display(), items = module.items.len(), "ok");
                        println!("ok {}", file.display());
                    }
                    Err(LoadError::Syntax(err)) => {
                        failed += 1;
                        eprintln!("{}", render(&err, file, format, color));
                    }
                    Err(err @ LoadError::Io { .. }) => return Err(err.into()),
                }
            }
            if failed > 0 {
                eprintln!("{failed} of {} file(s) failed", files.len());
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
