//! File processing API for zl
//!
//! Runs the pipeline (lex → parse → build) and hands the result to the output
//! format selected by [`OutputMode`]. AST formats are looked up by mode name in a
//! [`FormatRegistry`]. The stages are strictly sequential per
//! document and every failure aborts the whole document.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::ast::{self, Ast};
use crate::config::CompilerOptions;
use crate::error::CompileError;
use crate::formats::{to_token_listing, FormatRegistry, MarkdownRenderer};
use crate::lexer::{lex, Token};
use crate::parser::{self, ParseTree};

/// What to produce from a source document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Markdown,
    Tree,
    Tokens,
    Parse,
    Json,
}

impl OutputMode {
    pub const NAMES: [&'static str; 6] = ["md", "markdown", "tree", "tokens", "parse", "json"];

    pub fn name(&self) -> &'static str {
        match self {
            OutputMode::Markdown => "markdown",
            OutputMode::Tree => "tree",
            OutputMode::Tokens => "tokens",
            OutputMode::Parse => "parse",
            OutputMode::Json => "json",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown output mode '{name}' (expected one of: {})", OutputMode::NAMES.join(", "))]
pub struct UnknownModeError {
    pub name: String,
}

impl FromStr for OutputMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "md" | "markdown" => Ok(OutputMode::Markdown),
            "tree" => Ok(OutputMode::Tree),
            "tokens" => Ok(OutputMode::Tokens),
            "parse" => Ok(OutputMode::Parse),
            "json" => Ok(OutputMode::Json),
            _ => Err(UnknownModeError {
                name: s.to_string(),
            }),
        }
    }
}

/// Errors of the file-level API: compilation failures plus the I/O around them
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Mode(#[from] UnknownModeError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("{0}")]
    Format(#[from] crate::formats::FormatError),
}

/// Lex, parse and build the AST of a document.
pub fn build_ast(source: &str, options: &CompilerOptions) -> Result<Ast, CompileError> {
    let tree = parse_source(source, options)?;
    Ok(ast::build(&tree)?)
}

fn parse_source(source: &str, options: &CompilerOptions) -> Result<ParseTree, CompileError> {
    let tokens = tokenize_source(source, options)?;
    Ok(parser::parse(&tokens)?)
}

fn tokenize_source(source: &str, options: &CompilerOptions) -> Result<Vec<Token>, CompileError> {
    lex(source, options.tab_width, options.max_depth)
}

/// Compile a document to Markdown with the default options.
pub fn compile(source: &str) -> Result<String, CompileError> {
    compile_with(source, &CompilerOptions::default())
}

pub fn compile_with(source: &str, options: &CompilerOptions) -> Result<String, CompileError> {
    let ast = build_ast(source, options)?;
    let output = MarkdownRenderer::new(options.wiki_base_url.as_str()).render_document(&ast);
    tracing::debug!(bytes = output.len(), "rendered markdown");
    Ok(output)
}

/// Produce the requested output for in-memory source text.
pub fn process_source(
    source: &str,
    mode: OutputMode,
    options: &CompilerOptions,
) -> Result<String, ProcessingError> {
    tracing::debug!(%mode, "processing source");
    match mode {
        OutputMode::Tokens => Ok(to_token_listing(&tokenize_source(source, options)?)),
        OutputMode::Parse => Ok(parse_source(source, options)?.pretty()),
        OutputMode::Markdown | OutputMode::Tree | OutputMode::Json => {
            let ast = build_ast(source, options)?;
            let registry = FormatRegistry::with_defaults(&options.wiki_base_url);
            Ok(registry.serialize(&ast, mode.name())?)
        }
    }
}

/// Read a zl file and produce the requested output.
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    mode: OutputMode,
    options: &CompilerOptions,
) -> Result<String, ProcessingError> {
    let file_path = file_path.as_ref();
    let content = fs::read_to_string(file_path).map_err(|source| ProcessingError::Io {
        path: file_path.display().to_string(),
        source,
    })?;
    process_source(&content, mode, options)
}
