//! Error types for zl compilation.
//!
//! Every failure aborts the whole document: there is no partial output.

use crate::position::Position;
use thiserror::Error;

/// Inconsistent or excessive indentation found by the normalizer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndentationError {
    /// A line dedents to a width that is not one of the currently open levels.
    #[error("indentation error at {line}:{column}: dedent to width {width} does not match any open level {open_levels:?}")]
    InconsistentDedent {
        line: usize,
        column: usize,
        width: usize,
        open_levels: Vec<usize>,
    },

    /// More indentation levels are open than the configured limit allows.
    #[error("indentation error at {line}:{column}: nesting exceeds {limit} levels")]
    TooDeep {
        line: usize,
        column: usize,
        limit: usize,
    },
}

impl IndentationError {
    pub fn position(&self) -> Position {
        match self {
            IndentationError::InconsistentDedent { line, column, .. }
            | IndentationError::TooDeep { line, column, .. } => Position::new(*line, *column),
        }
    }
}

/// The token stream was rejected by the scanner or the grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at {line}:{column}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            line: position.line,
            column: position.column,
            message: message.into(),
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// A parse-tree node does not have the arity its AST variant requires.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("structural error: rule `{rule}` expects {expected} children, found {actual} (at {})", describe_position(.position))]
pub struct StructuralError {
    pub rule: String,
    pub expected: usize,
    pub actual: usize,
    pub position: Option<Position>,
}

fn describe_position(position: &Option<Position>) -> String {
    match position {
        Some(position) => position.to_string(),
        None => "unknown position".to_string(),
    }
}

/// Any fatal failure of the normalize → parse → build → render pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Indentation(#[from] IndentationError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Structural(#[from] StructuralError),
}

impl CompileError {
    /// Short name of the failure category, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            CompileError::Indentation(_) => "indentation",
            CompileError::Syntax(_) => "syntax",
            CompileError::Structural(_) => "structural",
        }
    }
}
