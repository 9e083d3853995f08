//! Implementation of the zl scanner
//!
//! Tokenization is handled by logos. This module attaches line/column positions
//! and reclassifies the whitespace run at the start of each line as `Indentation`,
//! which is what the indentation normalizer measures.

use crate::error::SyntaxError;
use crate::lexer::tokens::{Token, TokenKind};
use crate::position::SourceLocation;
use logos::Logos;

/// Tokenize a source string into positioned raw tokens.
///
/// Every character belongs to some token kind, so in practice this only fails if
/// the token table and the scanner disagree.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let location = SourceLocation::new(source);
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();
    let mut at_line_start = true;

    while let Some(result) = lexer.next() {
        let position = location.byte_to_position(lexer.span().start);
        let kind = match result {
            Ok(TokenKind::Whitespace) if at_line_start => TokenKind::Indentation,
            Ok(kind) => kind,
            Err(()) => {
                return Err(SyntaxError::new(
                    position,
                    format!("unrecognized character {:?}", lexer.slice()),
                ))
            }
        };
        at_line_start = kind == TokenKind::Newline;
        tokens.push(Token::new(kind, lexer.slice(), position));
    }

    Ok(tokens)
}
