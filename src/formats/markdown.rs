//! Markdown renderer
//!
//! A pure post-order walk over the AST. The only state threaded through the
//! recursion is the `as_list_item` flag, so any subtree can be rendered on its own
//! and renders of independent subtrees may run concurrently.
//!
//! Per variant:
//!
//! - inline runs (`word`, `wordlike`, `quote`, `url`) concatenate their tokens
//! - `text` joins its elements with a single space; elements written without
//!   whitespace between them arrive glued in one `wordlike` run
//! - other generic nodes join their children with newlines
//! - outline trees emit their head, their body, the `info` binding and the
//!   entries of the `items` binding as a list
//! - info lines at depth 2 and 3 become `#` and `##` headings
//! - pairs print as `key: value`, through the nearest `format` template, or not at
//!   all for reserved metadata keys
//! - `%[...]` commands become wiki links

use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};

use crate::ast::{Ast, Binding, Child, Node, NodeKind};
use crate::formats::registry::{FormatError, Formatter};
use crate::parser::rules;

pub const DEFAULT_WIKI_BASE_URL: &str = "https://en.wikipedia.org/wiki/";

/// Pair keys that carry document metadata and never render as lines.
pub const RESERVED_KEYS: [&str; 5] = ["info", "format", "filters", "repo", "keywords"];

/// Symbol that turns a command into a wiki link
pub const LINK_SYMBOL: &str = "%";

/// Characters left as-is in link targets
const LINK_TARGET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(key|value)").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownRenderer {
    wiki_base_url: String,
}

impl MarkdownRenderer {
    pub fn new(wiki_base_url: impl Into<String>) -> Self {
        Self {
            wiki_base_url: wiki_base_url.into(),
        }
    }

    pub fn wiki_base_url(&self) -> &str {
        &self.wiki_base_url
    }

    pub fn render_document(&self, ast: &Ast) -> String {
        self.render(ast.root(), false)
    }

    /// Render one node. `as_list_item` is set for the entries of an `items` section.
    pub fn render(&self, node: Node<'_>, as_list_item: bool) -> String {
        match node.kind() {
            NodeKind::Generic => self.render_generic(node, as_list_item),
            NodeKind::Keyword => self.concat(node, as_list_item),
            NodeKind::Tree => self.render_tree(node, as_list_item),
            NodeKind::Info => self.render_info(node, as_list_item),
            NodeKind::Pair => self.render_pair(node),
            NodeKind::Command => self.render_command(node),
            NodeKind::Multiline => self.render_multiline(node),
        }
    }

    pub fn render_child(&self, child: Child<'_>, as_list_item: bool) -> String {
        match child {
            Child::Node(node) => self.render(node, as_list_item),
            Child::Token(token) => token.text.clone(),
            Child::Absent => String::new(),
        }
    }

    /// `[display](base + encoded display)`
    pub fn link(&self, display: &str) -> String {
        format!(
            "[{}]({}{})",
            display,
            self.wiki_base_url,
            utf8_percent_encode(display, LINK_TARGET)
        )
    }

    fn rendered_children(&self, node: Node<'_>, as_list_item: bool) -> Vec<String> {
        node.children()
            .map(|child| self.render_child(child, as_list_item))
            .collect()
    }

    fn concat(&self, node: Node<'_>, as_list_item: bool) -> String {
        self.rendered_children(node, as_list_item).concat()
    }

    fn render_generic(&self, node: Node<'_>, as_list_item: bool) -> String {
        match node.rule() {
            rules::WORD | rules::WORDLIKE | rules::QUOTE | rules::URL => {
                self.concat(node, as_list_item)
            }
            rules::TEXT => self.rendered_children(node, as_list_item).join(" "),
            _ => self.rendered_children(node, as_list_item).join("\n"),
        }
    }

    fn render_tree(&self, node: Node<'_>, as_list_item: bool) -> String {
        if node.head().map(|head| head.text()).as_deref() == Some("items") {
            return String::new();
        }

        let mut out = String::new();
        for child in node.children() {
            let rendered = self.render_child(child, as_list_item);
            // nested entries keep to their own lines
            if as_list_item && child.as_node().is_some_and(|n| n.is(NodeKind::Tree)) {
                push_line(&mut out, &rendered);
            } else {
                out.push_str(&rendered);
            }
        }

        if let Some(info) = node.bound(Binding::Info) {
            let rendered = self.render_child(binding_payload(info), false);
            out.push_str(&rendered);
            if !rendered.is_empty() && !rendered.ends_with('\n') {
                out.push('\n');
            }
        }

        if let Some(items) = node.bound(Binding::Items) {
            tracing::trace!(
                node = node.id().index(),
                entries = items.child_count().saturating_sub(1),
                "rendering items"
            );
            for item in items.children().skip(1).filter(|c| !c.is_absent()) {
                let rendered = self.render_child(item, true);
                push_line(&mut out, &rendered);
            }
        }

        if as_list_item {
            let indent = " ".repeat(2 * node.depth().saturating_sub(3));
            out = format!("{}- {}", indent, out);
        } else {
            out.push('\n');
        }
        out
    }

    fn render_info(&self, node: Node<'_>, as_list_item: bool) -> String {
        let content = self.concat(node, as_list_item);
        let depth = node.depth();
        let under_tree = node.parent().is_some_and(|p| p.is(NodeKind::Tree));

        if depth > 1 && depth < 4 && under_tree {
            format!("{} {}\n", "#".repeat(depth - 1), content)
        } else if as_list_item {
            content
        } else {
            format!("{}\n", content)
        }
    }

    fn render_pair(&self, node: Node<'_>) -> String {
        let (Some(key), Some(value)) = (node.key(), node.value()) else {
            return String::new();
        };

        if RESERVED_KEYS.contains(&key.text().as_str()) {
            return String::new();
        }

        let key = self.render_child(key, false);
        let value = self.render_child(value, false);

        match node.grandparent().and_then(|g| g.bound(Binding::Format)) {
            Some(format) => {
                tracing::trace!(node = node.id().index(), "applying format template");
                let template = self.render_child(binding_payload(format), false);
                format!("{}\n", substitute(&template, &key, &value))
            }
            None => format!("{}: {}\n", key, value),
        }
    }

    fn render_command(&self, node: Node<'_>) -> String {
        let (Some(symbol), Some(content)) = (node.symbol(), node.content()) else {
            return String::new();
        };

        let rendered = self.render_child(content, false);
        if symbol.text() == LINK_SYMBOL {
            self.link(&rendered)
        } else {
            rendered
        }
    }

    fn render_multiline(&self, node: Node<'_>) -> String {
        format!("{}\n", self.rendered_children(node, false).join(" "))
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_WIKI_BASE_URL)
    }
}

impl Formatter for MarkdownRenderer {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn serialize(&self, ast: &Ast) -> Result<String, FormatError> {
        Ok(self.render_document(ast))
    }

    fn description(&self) -> &'static str {
        "Rendered Markdown document"
    }
}

/// What a binding contributes: the value of a bound pair, or a bound tree itself.
fn binding_payload(bound: Node<'_>) -> Child<'_> {
    match bound.value() {
        Some(value) => value,
        None => Child::Node(bound),
    }
}

/// Replace `.key` and `.value` in one pass; substituted text is not rescanned.
fn substitute(template: &str, key: &str, value: &str) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "key" => key.to_string(),
            _ => value.to_string(),
        })
        .into_owned()
}

/// Append `item` as a line of its own.
fn push_line(out: &mut String, item: &str) {
    if item.is_empty() {
        return;
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(item);
    if !item.ends_with('\n') {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build;
    use crate::lexer::lex;
    use crate::parser::parse;

    fn ast_for(source: &str) -> Ast {
        let tokens = lex(source, 2, 64).unwrap();
        build(&parse(&tokens).unwrap()).unwrap()
    }

    fn render(source: &str) -> String {
        MarkdownRenderer::default().render_document(&ast_for(source))
    }

    fn find<'a>(ast: &'a Ast, kind: NodeKind, text: &str) -> Node<'a> {
        ast.nodes()
            .find(|n| n.kind() == kind && n.text() == text)
            .unwrap()
    }

    #[test]
    fn test_outline_document() {
        assert_eq!(
            render("Doc\n  title: Hello\n  items:\n    a\n    b\n"),
            "# Doc\ntitle: Hello\n- a\n- b\n\n"
        );
    }

    #[test]
    fn test_items_render_one_line_per_entry() {
        let output = render("List\n  items:\n    a\n    b\n    c\n");
        let lines: Vec<&str> = output.lines().filter(|l| l.starts_with("- ")).collect();
        assert_eq!(lines, vec!["- a", "- b", "- c"]);
        assert!(!output.contains("items"));
    }

    #[test]
    fn test_nested_items_are_indented() {
        let output = render("List\n  items:\n    a\n      items:\n        x\n    b\n");
        assert_eq!(output, "# List\n- a\n    - x\n- b\n\n");
    }

    #[test]
    fn test_heading_levels_by_depth() {
        let ast = ast_for("A\n  B\n    C\n");
        let renderer = MarkdownRenderer::default();

        let a = find(&ast, NodeKind::Info, "A");
        let b = find(&ast, NodeKind::Info, "B");
        let c = find(&ast, NodeKind::Info, "C");
        assert_eq!(a.depth(), 2);
        assert_eq!(renderer.render(a, false), "# A\n");
        assert_eq!(b.depth(), 3);
        assert_eq!(renderer.render(b, false), "## B\n");
        assert_eq!(c.depth(), 4);
        assert_eq!(renderer.render(c, false), "C\n");
    }

    #[test]
    fn test_info_pair_is_suppressed() {
        let output = render("Doc\n  info: short summary\n  title: Hi\n");
        assert!(!output.contains("info:"));
        assert_eq!(output, "# Doc\ntitle: Hi\nshort summary\n\n");
    }

    #[test]
    fn test_reserved_metadata_keys_are_suppressed() {
        let output = render("Doc\n  repo: somewhere\n  keywords: a b\n  filters: none\n");
        assert_eq!(output, "# Doc\n\n");
    }

    #[test]
    fn test_command_renders_wiki_link() {
        let ast = ast_for("see %[Rust]\n");
        let command = ast.nodes().find(|n| n.is(NodeKind::Command)).unwrap();
        assert_eq!(
            MarkdownRenderer::default().render(command, false),
            "[Rust](https://en.wikipedia.org/wiki/Rust)"
        );
    }

    #[test]
    fn test_link_target_is_percent_encoded() {
        let output = render("lang: %[Rust language]\n");
        assert_eq!(
            output,
            "lang: [Rust language](https://en.wikipedia.org/wiki/Rust%20language)\n"
        );
    }

    #[test]
    fn test_link_uses_configured_base() {
        let renderer = MarkdownRenderer::new("https://wiki.example/");
        assert_eq!(renderer.link("a/b"), "[a/b](https://wiki.example/a/b)");
    }

    #[test]
    fn test_other_symbols_pass_through() {
        assert_eq!(render("note: @[plain words]\n"), "note: plain words\n");
    }

    #[test]
    fn test_format_template_on_grandparent() {
        let output = render("format: .key -> .value\nSection\n  x: y\n");
        assert!(output.contains("x -> y\n"), "{:?}", output);
        assert!(!output.contains("format"));
    }

    #[test]
    fn test_template_substitution_is_single_pass() {
        assert_eq!(substitute(".key=.value", ".value", "v"), ".value=v");
    }

    #[test]
    fn test_multiline_is_flowed() {
        assert_eq!(render("| one two\n| three\n"), "one two three\n");
    }

    #[test]
    fn test_inline_runs_keep_punctuation() {
        assert_eq!(render("note: Hello, \"big\" world.\n"), "note: Hello, \"big\" world.\n");
    }

    #[test]
    fn test_punctuation_stays_attached_to_links() {
        assert_eq!(
            render("note: see %[Rust]. (\"q\")\n"),
            "note: see [Rust](https://en.wikipedia.org/wiki/Rust). (\"q\")\n"
        );
    }

    #[test]
    fn test_render_is_reentrant_across_threads() {
        let ast = ast_for("A\n  x: 1\nB\n  items:\n    b1\n    b2\nC\n  | para\n");
        let renderer = MarkdownRenderer::default();
        let roots: Vec<Node<'_>> = ast.root().children().filter_map(|c| c.as_node()).collect();

        let sequential: Vec<String> = roots.iter().map(|n| renderer.render(*n, false)).collect();
        let parallel: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = roots
                .iter()
                .map(|n| {
                    let renderer = &renderer;
                    scope.spawn(move || renderer.render(*n, false))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(sequential, parallel);
        assert_eq!(renderer.render_document(&ast), renderer.render_document(&ast));
    }
}
