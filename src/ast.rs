//! Typed semantic tree
//!
//! Built once per document from the generic parse tree by [`build`], then read
//! only. Node variants are the closed [`NodeKind`] set; the names a node binds to
//! its children (`items`, `info`, `format`) are resolved during construction.

pub mod builder;
pub mod node;

pub use builder::build;
pub use node::{Ast, Binding, Child, Node, NodeId, NodeKind};
