//! Indentation transformation for the zl lexer
//!
//! This module inserts semantic `Indent` and `Dedent` tokens into the raw token
//! stream so that block nesting becomes as explicit as bracket pairs.
//!
//! # Algorithm
//!
//! A stack of open indentation widths starts as `[0]`. For each non-blank line the
//! width `L` of its leading whitespace is compared with the top `T`:
//!
//! - `L > T`: push `L`, emit one `Indent`
//! - `L < T`: pop while the top is greater than `L`, emitting one `Dedent` per pop;
//!   the new top must equal `L`, otherwise the dedent is inconsistent
//! - `L == T`: nothing
//!
//! Delimiters go immediately before the first content token of the line. Blank lines
//! never change the level. At end of input every level above 0 is closed.
//!
//! # Example
//!
//! Input tokens: `[Word, Newline, Indentation, Word, Newline, Word]`
//! Output tokens: `[Word, Newline, Indentation, Indent, Word, Newline, Dedent, Word]`

use crate::error::IndentationError;
use crate::lexer::tokens::{Token, TokenKind};
use crate::position::Position;

pub const DEFAULT_TAB_WIDTH: usize = 2;
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Measure the width of a leading whitespace run; tabs expand to `tab_width` columns.
pub fn measure_indentation(text: &str, tab_width: usize) -> usize {
    text.chars()
        .map(|ch| if ch == '\t' { tab_width } else { 1 })
        .sum()
}

/// Stateful indentation normalizer.
///
/// The stack is exposed so callers can check that a run left it balanced.
#[derive(Debug, Clone)]
pub struct IndentationNormalizer {
    tab_width: usize,
    max_depth: usize,
    stack: Vec<usize>,
}

impl IndentationNormalizer {
    pub fn new(tab_width: usize, max_depth: usize) -> Self {
        Self {
            tab_width,
            max_depth,
            stack: vec![0],
        }
    }

    /// Currently open indentation widths, bottom first.
    pub fn stack(&self) -> &[usize] {
        &self.stack
    }

    /// Insert `Indent`/`Dedent` tokens into a raw token stream.
    pub fn normalize(&mut self, tokens: Vec<Token>) -> Result<Vec<Token>, IndentationError> {
        self.stack = vec![0];
        let eof = tokens.last().map(Token::end).unwrap_or(Position::new(1, 1));
        let mut result = Vec::with_capacity(tokens.len() + 8);
        let mut at_line_start = true;
        let mut width = 0;

        for token in tokens {
            match token.kind {
                TokenKind::Newline => {
                    at_line_start = true;
                    width = 0;
                }
                TokenKind::Indentation if at_line_start => {
                    width = measure_indentation(&token.text, self.tab_width);
                }
                _ if at_line_start => {
                    self.align(width, &token, &mut result)?;
                    at_line_start = false;
                }
                _ => {}
            }
            result.push(token);
        }

        while self.stack.len() > 1 {
            self.stack.pop();
            result.push(Token::synthetic(TokenKind::Dedent, eof));
        }

        tracing::debug!(
            tokens = result.len(),
            indents = result.iter().filter(|t| t.is(TokenKind::Indent)).count(),
            "normalized indentation"
        );

        Ok(result)
    }

    /// Emit the delimiters that bring the stack to `width` before `first`.
    fn align(
        &mut self,
        width: usize,
        first: &Token,
        out: &mut Vec<Token>,
    ) -> Result<(), IndentationError> {
        let top = self.top();

        if width > top {
            if self.stack.len() > self.max_depth {
                return Err(IndentationError::TooDeep {
                    line: first.line,
                    column: first.column,
                    limit: self.max_depth,
                });
            }
            self.stack.push(width);
            out.push(Token::synthetic(TokenKind::Indent, first.position()));
        } else if width < top {
            let open_levels = self.stack.clone();
            while self.top() > width {
                self.stack.pop();
                out.push(Token::synthetic(TokenKind::Dedent, first.position()));
            }
            if self.top() != width {
                return Err(IndentationError::InconsistentDedent {
                    line: first.line,
                    column: first.column,
                    width,
                    open_levels,
                });
            }
        }

        Ok(())
    }

    fn top(&self) -> usize {
        self.stack.last().copied().unwrap_or(0)
    }
}

impl Default for IndentationNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_WIDTH, DEFAULT_MAX_DEPTH)
    }
}
