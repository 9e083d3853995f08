//! Lexer module for the zl format
//!
//! This module contains the tokenization logic for the zl format: token
//! definitions, the logos scanner and the indentation normalizer.
//!
//! Indentation Handling
//!
//! In order to make indented blocks tractable by a parser combinator grammar,
//! indentation is transformed into semantic indent and dedent tokens, which map
//! nicely to brace tokens for more standard syntaxes. The scanner only reports the
//! leading whitespace run of each line; measuring it against the open levels is a
//! separate pass, so the grammar never reasons about whitespace widths.

pub mod indentation_transform;
pub mod lexer_impl;
pub mod tokens;

pub use indentation_transform::{measure_indentation, IndentationNormalizer};
pub use lexer_impl::tokenize;
pub use tokens::{Token, TokenKind};

use crate::error::CompileError;

/// Preprocesses source text to ensure it ends with a newline.
///
/// The grammar terminates every line with a newline token.
pub fn ensure_source_ends_with_newline(source: &str) -> String {
    if !source.is_empty() && !source.ends_with('\n') {
        format!("{}\n", source)
    } else {
        source.to_string()
    }
}

/// Main lexer function: tokenize and normalize indentation.
pub fn lex(source: &str, tab_width: usize, max_depth: usize) -> Result<Vec<Token>, CompileError> {
    let source = ensure_source_ends_with_newline(source);
    let raw_tokens = tokenize(&source)?;
    tracing::debug!(raw_tokens = raw_tokens.len(), "tokenized source");

    let mut normalizer = IndentationNormalizer::new(tab_width, max_depth);
    Ok(normalizer.normalize(raw_tokens)?)
}
