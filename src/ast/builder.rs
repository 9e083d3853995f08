//! Parse tree → AST construction
//!
//! A single recursive pass. Each node is classified by its rule tag, checked for
//! the arity its variant requires, given its children in source order, and then
//! has its named bindings resolved from those finished children.

use crate::ast::node::{collect_text, Ast, Binding, Bindings, Element, NodeData, NodeId, NodeKind};
use crate::error::StructuralError;
use crate::lexer::Token;
use crate::parser::{ParseChild, ParseTree};

/// Build an immutable AST from a parse tree.
///
/// Fails with [`StructuralError`] when a `pair` or `command` node does not have
/// exactly two children; no partially built tree is returned.
pub fn build(tree: &ParseTree) -> Result<Ast, StructuralError> {
    let mut builder = AstBuilder::default();
    let root = builder.build_node(tree, None, 0)?;
    tracing::debug!(nodes = builder.nodes.len(), "built ast");
    Ok(Ast {
        nodes: builder.nodes,
        root,
    })
}

#[derive(Default)]
struct AstBuilder {
    nodes: Vec<NodeData>,
}

impl AstBuilder {
    fn build_node(
        &mut self,
        tree: &ParseTree,
        parent: Option<NodeId>,
        depth: usize,
    ) -> Result<NodeId, StructuralError> {
        let kind = NodeKind::for_rule(&tree.rule);

        if let Some(expected) = kind.required_arity() {
            if tree.children.len() != expected {
                return Err(StructuralError {
                    rule: tree.rule.clone(),
                    expected,
                    actual: tree.children.len(),
                    position: tree.first_token().map(Token::position),
                });
            }
        }

        // Reserve the slot first so children can point back at it.
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            rule: tree.rule.clone(),
            depth,
            parent,
            children: Vec::new(),
            bindings: Bindings::default(),
        });

        let mut children = Vec::with_capacity(tree.children.len());
        for child in &tree.children {
            children.push(match child {
                ParseChild::Token(token) => Element::Token(token.clone()),
                ParseChild::Node(node) => {
                    Element::Node(self.build_node(node, Some(id), depth + 1)?)
                }
                ParseChild::Absent => Element::Absent,
            });
        }

        let bindings = self.resolve_bindings(id, &children);
        let data = &mut self.nodes[id.0];
        data.children = children;
        data.bindings = bindings;
        Ok(id)
    }

    /// Bind each recognized name to the first `Pair` or `Tree` child whose head
    /// text equals it.
    fn resolve_bindings(&self, owner: NodeId, children: &[Element]) -> Bindings {
        let mut bindings = Bindings::default();
        for element in children {
            let Element::Node(child) = element else {
                continue;
            };
            let data = &self.nodes[child.0];
            if !matches!(data.kind, NodeKind::Pair | NodeKind::Tree) {
                continue;
            }
            let Some(head) = data.children.first() else {
                continue;
            };

            let mut head_text = String::new();
            collect_text(&self.nodes, head, &mut head_text);
            if let Some(binding) = Binding::from_name(&head_text) {
                if !bindings.bind(binding, *child) {
                    tracing::trace!(
                        owner = owner.0,
                        candidate = child.0,
                        binding = binding.name(),
                        "ignoring later binding candidate"
                    );
                }
            }
        }
        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::node::Child;
    use crate::lexer::{lex, TokenKind};
    use crate::parser::{parse, rules};
    use crate::position::Position;

    fn ast_for(source: &str) -> Ast {
        let tokens = lex(source, 2, 64).unwrap();
        build(&parse(&tokens).unwrap()).unwrap()
    }

    fn word(text: &str, line: usize, column: usize) -> ParseChild {
        ParseTree::new(
            rules::WORD,
            vec![Token::new(TokenKind::Word, text, Position::new(line, column)).into()],
        )
        .into()
    }

    #[test]
    fn test_depth_follows_nesting() {
        let ast = ast_for("Doc\n  child\n");
        for node in ast.nodes() {
            match node.parent() {
                Some(parent) => assert_eq!(node.depth(), parent.depth() + 1),
                None => assert_eq!(node.depth(), 0),
            }
        }
        assert_eq!(ast.root().rule(), rules::START);
    }

    #[test]
    fn test_kinds_come_from_rule_tags() {
        let ast = ast_for("Doc\n  title: Hello\n");
        let doc = ast.root().child(0).and_then(|c| c.as_node()).unwrap();
        assert_eq!(doc.kind(), NodeKind::Tree);
        let info = doc.head().and_then(|c| c.as_node()).unwrap();
        assert_eq!(info.kind(), NodeKind::Info);
        let pair = doc.child(1).and_then(|c| c.as_node()).unwrap();
        assert_eq!(pair.kind(), NodeKind::Pair);
        assert_eq!(pair.key().unwrap().text(), "title");
        assert_eq!(pair.value().unwrap().text(), "Hello");
    }

    #[test]
    fn test_absent_marker_is_preserved() {
        let ast = ast_for("Leaf\n");
        let leaf = ast.root().child(0).and_then(|c| c.as_node()).unwrap();
        assert_eq!(leaf.child_count(), 2);
        assert!(leaf.child(1).unwrap().is_absent());
    }

    #[test]
    fn test_text_has_no_separators() {
        let ast = ast_for("Hello big world\n");
        assert_eq!(ast.root().text(), "Hellobigworld");
    }

    #[test]
    fn test_bindings_resolved_from_heads() {
        let ast = ast_for("Doc\n  info: summary\n  items:\n    a\n");
        let doc = ast.root().child(0).and_then(|c| c.as_node()).unwrap();

        let info = doc.bound(Binding::Info).unwrap();
        assert_eq!(info.kind(), NodeKind::Pair);
        let items = doc.bound(Binding::Items).unwrap();
        assert_eq!(items.kind(), NodeKind::Tree);
        assert_eq!(doc.bound(Binding::Format), None);
    }

    #[test]
    fn test_first_binding_candidate_wins() {
        let ast = ast_for("format: first .key\nformat: second .key\n");
        let root = ast.root();
        let bound = root.bound(Binding::Format).unwrap();
        assert_eq!(bound, root.child(0).and_then(|c| c.as_node()).unwrap());
        assert_eq!(bound.value().unwrap().text(), "first.key");
    }

    #[test]
    fn test_info_outline_line_does_not_bind() {
        // only Pair and Tree children are candidates
        let ast = ast_for("items\n");
        let tree = ast.root().child(0).and_then(|c| c.as_node()).unwrap();
        assert_eq!(tree.bound(Binding::Items), None);
        assert_eq!(ast.root().bound(Binding::Items), Some(tree));
    }

    #[test]
    fn test_pair_with_three_children_is_structural_error() {
        let tree = ParseTree::new(
            rules::START,
            vec![ParseTree::new(
                rules::PAIR,
                vec![word("a", 4, 3), word("b", 4, 6), word("c", 4, 8)],
            )
            .into()],
        );
        let err = build(&tree).unwrap_err();
        assert_eq!(err.rule, "pair");
        assert_eq!(err.expected, 2);
        assert_eq!(err.actual, 3);
        assert_eq!(err.position, Some(Position::new(4, 3)));
    }

    #[test]
    fn test_command_with_one_child_is_structural_error() {
        let tree = ParseTree::new(rules::COMMAND, vec![ParseChild::Absent]);
        let err = build(&tree).unwrap_err();
        assert_eq!(err.rule, "command");
        assert_eq!(err.actual, 1);
        assert_eq!(err.position, None);
    }

    #[test]
    fn test_command_accessors() {
        let ast = ast_for("see %[Rust]\n");
        let command = ast
            .nodes()
            .find(|n| n.kind() == NodeKind::Command)
            .unwrap();
        assert!(matches!(command.symbol(), Some(Child::Token(t)) if t.text == "%"));
        assert_eq!(command.content().unwrap().text(), "Rust");
    }

    #[test]
    fn test_keyword_canonical() {
        let ast = ast_for("items:\n  a\n");
        let keyword = ast
            .nodes()
            .find(|n| n.kind() == NodeKind::Keyword)
            .unwrap();
        assert_eq!(keyword.canonical().as_deref(), Some("`items`"));
        assert_eq!(keyword.text(), "items");
    }
}
