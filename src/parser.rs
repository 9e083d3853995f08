//! Parser module for the zl format
//!
//! The grammar engine: turns the normalized token stream into a generic,
//! rule-tagged parse tree. It knows nothing about rendering; the AST builder gives
//! the rule tags their meaning.

pub mod combinators;
pub mod grammar;
pub mod tree;

pub use combinators::KEYWORDS;
pub use tree::{rules, ParseChild, ParseTree};

use chumsky::error::SimpleReason;
use chumsky::prelude::*;

use crate::error::SyntaxError;
use crate::lexer::Token;
use crate::position::Position;

/// Parse a normalized token stream into a parse tree rooted at `start`.
///
/// `Indentation` tokens are trivia and are dropped before parsing. Only the first
/// grammar error is reported.
pub fn parse(tokens: &[Token]) -> Result<ParseTree, SyntaxError> {
    let significant: Vec<Token> = tokens
        .iter()
        .filter(|t| !t.kind.is_trivia())
        .cloned()
        .collect();

    grammar::document()
        .parse(significant.clone())
        .map_err(|errors| {
            let error = errors
                .into_iter()
                .next()
                .map(|e| to_syntax_error(e, &significant))
                .unwrap_or_else(|| {
                    SyntaxError::new(Position::new(1, 1), "document rejected by grammar")
                });
            tracing::debug!(%error, "grammar rejected token stream");
            error
        })
}

fn describe(token: &Token) -> String {
    if token.kind.is_synthetic() || token.text.trim().is_empty() {
        token.kind.to_string()
    } else {
        format!("{} {:?}", token.kind, token.text)
    }
}

fn to_syntax_error(error: Simple<Token>, tokens: &[Token]) -> SyntaxError {
    let position = error
        .found()
        .map(Token::position)
        .or_else(|| tokens.get(error.span().start).map(Token::position))
        .or_else(|| tokens.last().map(Token::end))
        .unwrap_or(Position::new(1, 1));

    let found = error
        .found()
        .map(describe)
        .unwrap_or_else(|| "end of input".to_string());

    if let SimpleReason::Custom(message) = error.reason() {
        return SyntaxError::new(position, message.clone());
    }

    let message = match error.label() {
        Some(label) => format!("unexpected {} while parsing {}", found, label),
        None => format!("unexpected {}", found),
    };

    SyntaxError::new(position, message)
}
