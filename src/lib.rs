//! # zl
//!
//! A compiler from zl, an indentation-sensitive outline markup, to Markdown.
//!
//! The pipeline is strictly sequential per document:
//!
//! 1. [`lexer`]: logos scanner plus the indentation normalizer, which turns
//!    leading whitespace into explicit `Indent`/`Dedent` tokens
//! 2. [`parser`]: chumsky grammar producing a generic, rule-tagged parse tree
//! 3. [`ast`]: builds the typed, immutable AST and resolves node bindings
//! 4. [`formats`]: Markdown renderer and diagnostic dumps
//!
//! [`processor`] ties the stages together and [`config`] loads settings.
//!
//! ```rust,ignore
//! let markdown = zl::compile("Doc\n  title: Hello\n")?;
//! assert_eq!(markdown, "# Doc\ntitle: Hello\n\n");
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod formats;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod processor;

pub use config::CompilerOptions;
pub use error::{CompileError, IndentationError, StructuralError, SyntaxError};
pub use processor::{
    compile, compile_with, process_file, process_source, OutputMode, ProcessingError,
};
