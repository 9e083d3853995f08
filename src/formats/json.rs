//! JSON dump of the AST
//!
//! Nodes serialize with their variant, rule tag, depth, resolved bindings (as the
//! index of the bound child) and children. Tokens keep their kind, lexeme and
//! position; unmatched optional slots serialize as `null`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ast::{Ast, Binding, Child, Node, NodeKind};
use crate::formats::registry::{FormatError, Formatter};
use crate::lexer::Token;

#[derive(Debug, Serialize)]
struct JsonNode<'a> {
    kind: NodeKind,
    rule: &'a str,
    depth: usize,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    bindings: BTreeMap<&'static str, usize>,
    children: Vec<JsonChild<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum JsonChild<'a> {
    Node(JsonNode<'a>),
    Token(&'a Token),
    Absent(Option<()>),
}

impl<'a> From<Node<'a>> for JsonNode<'a> {
    fn from(node: Node<'a>) -> Self {
        let children: Vec<Child<'a>> = node.children().collect();

        let mut bindings = BTreeMap::new();
        for binding in Binding::ALL {
            if let Some(bound) = node.bound(binding) {
                if let Some(index) = children.iter().position(|c| c.as_node() == Some(bound)) {
                    bindings.insert(binding.name(), index);
                }
            }
        }

        JsonNode {
            kind: node.kind(),
            rule: node.rule(),
            depth: node.depth(),
            bindings,
            children: children
                .into_iter()
                .map(|child| match child {
                    Child::Node(n) => JsonChild::Node(n.into()),
                    Child::Token(t) => JsonChild::Token(t),
                    Child::Absent => JsonChild::Absent(None),
                })
                .collect(),
        }
    }
}

pub fn to_json_string(ast: &Ast) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(&JsonNode::from(ast.root()))?)
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn serialize(&self, ast: &Ast) -> Result<String, FormatError> {
        to_json_string(ast)
    }

    fn description(&self) -> &'static str {
        "AST as pretty-printed JSON"
    }
}
