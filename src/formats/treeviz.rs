//! Treeviz formatter for AST nodes
//!
//! One line per node, nesting drawn with box connectors, so the outline structure
//! can be scanned quickly:
//!
//! ```text
//! └─ Tree: Doc
//!   ├─ Info: Doc
//!   ├─ Pair: title: Hello
//!   └─ Tree: `items`
//!     ├─ Keyword: `items`
//!     └─ Tree: a
//!       └─ Info: a
//! ```
//!
//! Only outline trees and generic block nodes are expanded; every other variant
//! is shown as a single line with its label truncated to 30 characters.

use crate::ast::{Ast, Child, Node, NodeKind};
use crate::formats::registry::{FormatError, Formatter};
use crate::parser::rules;

const LABEL_WIDTH: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

/// Source-like text of a node: inline runs kept whole, elements space separated.
fn plain(node: Node<'_>) -> String {
    if node.is(NodeKind::Command) {
        return format!(
            "{}[{}]",
            child_plain(node.symbol()),
            child_plain(node.content())
        );
    }
    match node.rule() {
        rules::WORD | rules::QUOTE | rules::URL => node.text(),
        rules::WORDLIKE => node.children().map(|child| child_plain(Some(child))).collect(),
        _ => node
            .children()
            .map(|child| match child {
                Child::Node(n) => plain(n),
                Child::Token(t) => t.text.clone(),
                Child::Absent => String::new(),
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn child_plain(child: Option<Child<'_>>) -> String {
    match child {
        Some(Child::Node(n)) => plain(n),
        Some(Child::Token(t)) => t.text.clone(),
        _ => String::new(),
    }
}

fn display_label(node: Node<'_>) -> String {
    match node.kind() {
        NodeKind::Keyword => node.canonical().unwrap_or_default(),
        NodeKind::Tree => match node.head() {
            Some(Child::Node(head)) => display_label(head),
            _ => String::new(),
        },
        NodeKind::Pair => format!("{}: {}", child_plain(node.key()), child_plain(node.value())),
        NodeKind::Command | NodeKind::Info | NodeKind::Multiline | NodeKind::Generic => {
            plain(node)
        }
    }
}

fn node_type(node: Node<'_>) -> String {
    match node.kind() {
        NodeKind::Generic => node.rule().to_string(),
        kind => kind.to_string(),
    }
}

fn expands(node: Node<'_>) -> bool {
    node.is(NodeKind::Tree) || (node.is(NodeKind::Generic) && node.rule() == rules::START)
}

pub fn to_treeviz_str(ast: &Ast) -> String {
    let mut result = String::new();
    append_children(&mut result, ast.root(), "");
    result
}

fn append_node(result: &mut String, node: Node<'_>, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    let display_label = truncate(&display_label(node), LABEL_WIDTH);

    result.push_str(&format!(
        "{}{} {}: {}\n",
        prefix,
        connector,
        node_type(node),
        display_label
    ));

    if expands(node) {
        let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        append_children(result, node, &new_prefix);
    }
}

fn append_children(result: &mut String, node: Node<'_>, prefix: &str) {
    let children: Vec<Node<'_>> = node.children().filter_map(|c| c.as_node()).collect();
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        append_node(result, *child, prefix, is_last);
    }
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn serialize(&self, ast: &Ast) -> Result<String, FormatError> {
        Ok(to_treeviz_str(ast))
    }

    fn description(&self) -> &'static str {
        "One line per AST node with box-drawing connectors"
    }
}
