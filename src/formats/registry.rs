//! Output formats that work on a built [`Ast`]
//!
//! The markdown, tree and json modes of the processor are resolved here by name.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::ast::Ast;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("no output format named '{0}'")]
    Unknown(String),

    #[error("cannot serialize AST: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// An AST output format, looked up by [`Formatter::name`]
pub trait Formatter: Send + Sync {
    fn name(&self) -> &'static str;

    fn serialize(&self, ast: &Ast) -> Result<String, FormatError>;

    fn description(&self) -> &'static str {
        ""
    }
}

/// Formatters keyed by name, iterated in name order
#[derive(Default)]
pub struct FormatRegistry {
    formatters: BTreeMap<&'static str, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// The markdown, tree and json formats; markdown links point at `wiki_base_url`.
    pub fn with_defaults(wiki_base_url: &str) -> Self {
        let mut registry = Self::default();
        registry.register(super::MarkdownRenderer::new(wiki_base_url));
        registry.register(super::TreevizFormatter);
        registry.register(super::JsonFormatter);
        registry
    }

    /// Later registrations replace earlier ones of the same name.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters.insert(formatter.name(), Box::new(formatter));
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.formatters.keys().copied()
    }

    pub fn serialize(&self, ast: &Ast, name: &str) -> Result<String, FormatError> {
        let formatter = self
            .formatters
            .get(name)
            .ok_or_else(|| FormatError::Unknown(name.to_string()))?;
        tracing::debug!(format = name, "serializing AST");
        formatter.serialize(ast)
    }
}
