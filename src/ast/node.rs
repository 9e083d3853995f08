//! AST node definitions
//!
//! The tree lives in an arena owned by [`Ast`]. Nodes refer to their children and
//! parent by [`NodeId`], so parent links are plain indices and never own anything.
//! [`Node`] is a borrowed handle that offers the read-only accessors; the tree has
//! no mutating API once built.

use serde::Serialize;
use std::fmt;

use crate::lexer::Token;
use crate::parser::rules;

/// Index of a node inside its [`Ast`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The AST variant a rule tag maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Generic,
    Keyword,
    Tree,
    Info,
    Pair,
    Command,
    Multiline,
}

impl NodeKind {
    /// Fixed rule tag → variant table; anything unlisted is `Generic`.
    pub fn for_rule(rule: &str) -> Self {
        match rule {
            rules::PAIR => NodeKind::Pair,
            rules::MULTILINE => NodeKind::Multiline,
            rules::INFO => NodeKind::Info,
            rules::TREE => NodeKind::Tree,
            rules::COMMAND => NodeKind::Command,
            rules::KEYWORD => NodeKind::Keyword,
            _ => NodeKind::Generic,
        }
    }

    /// Exact number of children the variant requires, if it constrains arity.
    pub fn required_arity(&self) -> Option<usize> {
        match self {
            NodeKind::Pair | NodeKind::Command => Some(2),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Generic => "Generic",
            NodeKind::Keyword => "Keyword",
            NodeKind::Tree => "Tree",
            NodeKind::Info => "Info",
            NodeKind::Pair => "Pair",
            NodeKind::Command => "Command",
            NodeKind::Multiline => "Multiline",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Names a node can bind to one of its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Binding {
    Items,
    Info,
    Format,
}

impl Binding {
    pub const ALL: [Binding; 3] = [Binding::Items, Binding::Info, Binding::Format];

    pub fn name(&self) -> &'static str {
        match self {
            Binding::Items => "items",
            Binding::Info => "info",
            Binding::Format => "format",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Binding::ALL.into_iter().find(|b| b.name() == name)
    }

    fn slot(&self) -> usize {
        match self {
            Binding::Items => 0,
            Binding::Info => 1,
            Binding::Format => 2,
        }
    }
}

/// Resolved bindings of one node: at most one child per name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Bindings([Option<NodeId>; 3]);

impl Bindings {
    pub(crate) fn get(&self, binding: Binding) -> Option<NodeId> {
        self.0[binding.slot()]
    }

    /// Record `id` unless the name is already bound. Returns whether it was recorded.
    pub(crate) fn bind(&mut self, binding: Binding, id: NodeId) -> bool {
        let slot = &mut self.0[binding.slot()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(id);
        true
    }
}

/// A stored child: nested node, owned token, or an unmatched optional slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Element {
    Node(NodeId),
    Token(Token),
    Absent,
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) rule: String,
    pub(crate) depth: usize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<Element>,
    pub(crate) bindings: Bindings,
}

/// Concatenate the token texts below `element` without separators.
pub(crate) fn collect_text(nodes: &[NodeData], element: &Element, out: &mut String) {
    match element {
        Element::Token(token) => out.push_str(&token.text),
        Element::Node(id) => {
            for child in &nodes[id.0].children {
                collect_text(nodes, child, out);
            }
        }
        Element::Absent => {}
    }
}

/// An immutable document tree
#[derive(Debug, Clone)]
pub struct Ast {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) root: NodeId,
}

impl Ast {
    pub fn root(&self) -> Node<'_> {
        self.node(self.root)
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        assert!(id.0 < self.nodes.len(), "node id out of range");
        Node { ast: self, id }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in construction (pre-order) order
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        (0..self.nodes.len()).map(move |i| Node {
            ast: self,
            id: NodeId(i),
        })
    }
}

/// Borrowed handle to one node of an [`Ast`]
#[derive(Clone, Copy)]
pub struct Node<'a> {
    ast: &'a Ast,
    id: NodeId,
}

impl<'a> Node<'a> {
    fn data(&self) -> &'a NodeData {
        &self.ast.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind() == kind
    }

    pub fn rule(&self) -> &'a str {
        &self.data().rule
    }

    pub fn depth(&self) -> usize {
        self.data().depth
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|id| self.ast.node(id))
    }

    pub fn grandparent(&self) -> Option<Node<'a>> {
        self.parent().and_then(|p| p.parent())
    }

    pub fn children(&self) -> impl Iterator<Item = Child<'a>> + 'a {
        let ast = self.ast;
        self.data()
            .children
            .iter()
            .map(move |element| Child::from_element(ast, element))
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn child(&self, index: usize) -> Option<Child<'a>> {
        self.data()
            .children
            .get(index)
            .map(|element| Child::from_element(self.ast, element))
    }

    /// First child: the key of a pair, the head line of a tree
    pub fn head(&self) -> Option<Child<'a>> {
        self.child(0)
    }

    /// The child bound to `binding`, resolved once when the tree was built
    pub fn bound(&self, binding: Binding) -> Option<Node<'a>> {
        self.data().bindings.get(binding).map(|id| self.ast.node(id))
    }

    /// Concatenation of all descendant token texts, with no separators
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.ast.nodes, &Element::Node(self.id), &mut out);
        out
    }

    pub fn key(&self) -> Option<Child<'a>> {
        self.pair_slot(0)
    }

    pub fn value(&self) -> Option<Child<'a>> {
        self.pair_slot(1)
    }

    fn pair_slot(&self, index: usize) -> Option<Child<'a>> {
        if self.is(NodeKind::Pair) {
            self.child(index)
        } else {
            None
        }
    }

    pub fn symbol(&self) -> Option<Child<'a>> {
        self.command_slot(0)
    }

    pub fn content(&self) -> Option<Child<'a>> {
        self.command_slot(1)
    }

    fn command_slot(&self, index: usize) -> Option<Child<'a>> {
        if self.is(NodeKind::Command) {
            self.child(index)
        } else {
            None
        }
    }

    /// Inline-code form of a keyword, e.g. `` `items` ``
    pub fn canonical(&self) -> Option<String> {
        if self.is(NodeKind::Keyword) {
            Some(format!("`{}`", self.text()))
        } else {
            None
        }
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ast, other.ast) && self.id == other.id
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id.0)
            .field("kind", &self.kind())
            .field("rule", &self.rule())
            .field("depth", &self.depth())
            .finish()
    }
}

/// Borrowed view of a child slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Child<'a> {
    Node(Node<'a>),
    Token(&'a Token),
    Absent,
}

impl<'a> Child<'a> {
    fn from_element(ast: &'a Ast, element: &'a Element) -> Self {
        match element {
            Element::Node(id) => Child::Node(ast.node(*id)),
            Element::Token(token) => Child::Token(token),
            Element::Absent => Child::Absent,
        }
    }

    pub fn as_node(&self) -> Option<Node<'a>> {
        match self {
            Child::Node(node) => Some(*node),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Child::Absent)
    }

    pub fn text(&self) -> String {
        match self {
            Child::Node(node) => node.text(),
            Child::Token(token) => token.text.clone(),
            Child::Absent => String::new(),
        }
    }
}
