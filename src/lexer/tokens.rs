//! Token definitions for the zl format
//!
//! Token kinds are defined with the logos derive macro. `Indentation`, `Indent` and
//! `Dedent` are never produced by logos itself: `Indentation` is a reclassified
//! leading whitespace run and the other two are synthesized by the indentation
//! normalizer.
use crate::position::Position;
use logos::Logos;
use serde::Serialize;
use std::fmt;

/// All possible token kinds in the zl format
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    #[regex(r"\r?\n")]
    Newline,

    /// Any run of whitespace other than a line feed, including a lone `\r`
    #[regex(r"[^\S\n]+")]
    Whitespace,

    /// Whitespace run at the start of a line
    Indentation,

    #[regex(r"https?://[^\s\[\]]+")]
    Url,

    #[regex(r#""[^"\n]*""#)]
    Quote,

    #[token(":")]
    Colon,

    #[token("|")]
    Pipe,

    /// Command symbols, e.g. `%` in `%[Rust]`
    #[regex(r"[%@]")]
    Symbol,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[regex(r"[A-Za-z0-9_]+")]
    Word,

    /// Any other single visible character, including a `"` that opens no quote
    #[regex(r"[^\sA-Za-z0-9_:|\[\]%@]")]
    Punct,

    /// Opens a block (synthetic)
    Indent,

    /// Closes a block (synthetic)
    Dedent,
}

impl TokenKind {
    /// Kinds the grammar never sees as content
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Indentation)
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, TokenKind::Indent | TokenKind::Dedent)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Newline => "newline",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Indentation => "indentation",
            TokenKind::Url => "url",
            TokenKind::Quote => "quote",
            TokenKind::Colon => "`:`",
            TokenKind::Pipe => "`|`",
            TokenKind::Symbol => "symbol",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Word => "word",
            TokenKind::Punct => "punctuation",
            TokenKind::Indent => "indent",
            TokenKind::Dedent => "dedent",
        };
        f.write_str(name)
    }
}

/// A lexeme together with its kind and source position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
    /// Length in characters
    pub length: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        let text = text.into();
        let length = text.chars().count();
        Self {
            kind,
            text,
            line: position.line,
            column: position.column,
            length,
        }
    }

    /// A zero-width token that does not come from the source text.
    pub fn synthetic(kind: TokenKind, position: Position) -> Self {
        Self::new(kind, "", position)
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Position just past this token.
    pub fn end(&self) -> Position {
        if self.kind == TokenKind::Newline {
            Position::new(self.line + 1, 1)
        } else {
            Position::new(self.line, self.column + self.length)
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {:?} {:?}", self.line, self.column, self.kind, self.text)
    }
}
