//! Block-level grammar: the whole zl document.
//!
//! ```text
//! start     := NL* block* EOF
//! block     := section | pair | multiline | tree
//! section   := 'items' ':' NL+ INDENT block+ DEDENT
//! pair      := key ':' value NL       (key other than a bare 'items')
//! multiline := ('|' text NL)+
//! tree      := info NL+ (INDENT block+ DEDENT)?
//! ```

use chumsky::prelude::*;

use crate::lexer::{Token, TokenKind};
use crate::parser::combinators::{
    blank_lines, colon, items_keyword, key_text, keyword, kind, line_text, newline,
    optional_whitespace, value_text, ParserError,
};
use crate::parser::tree::{rules, ParseChild, ParseTree};

fn node_children(head: ParseTree, blocks: Vec<ParseTree>) -> Vec<ParseChild> {
    let mut children = Vec::with_capacity(blocks.len() + 1);
    children.push(ParseChild::Node(head));
    children.extend(blocks.into_iter().map(ParseChild::Node));
    children
}

/// A key consisting of nothing but the `items` sentinel
fn is_section_head(key: &ParseTree) -> bool {
    match key.children.as_slice() {
        [ParseChild::Token(token)] => token.text == "items",
        [ParseChild::Node(node)] => is_section_head(node),
        _ => false,
    }
}

/// Parse a complete document into a `start` node
pub fn document() -> impl Parser<Token, ParseTree, Error = ParserError> {
    let block = recursive(|block| {
        let body = kind(TokenKind::Indent)
            .ignore_then(block.then_ignore(blank_lines()).repeated().at_least(1))
            .then_ignore(kind(TokenKind::Dedent));

        let section = items_keyword()
            .then_ignore(colon())
            .then_ignore(newline())
            .then_ignore(blank_lines())
            .then(body.clone())
            .map(|(head, blocks)| ParseTree::new(rules::TREE, node_children(head, blocks)))
            .labelled("items section");

        let key = choice((
            keyword().then_ignore(colon()),
            key_text().then_ignore(colon()),
        ))
        .try_map(|key, span| {
            if is_section_head(&key) {
                Err(Simple::custom(
                    span,
                    "`items:` must be followed by an indented block",
                ))
            } else {
                Ok(key)
            }
        });
        let pair = key
            .then(value_text())
            .then_ignore(optional_whitespace())
            .then_ignore(newline())
            .map(|(key, value)| ParseTree::new(rules::PAIR, vec![key.into(), value.into()]))
            .labelled("pair");

        let paragraph_line = kind(TokenKind::Pipe)
            .ignore_then(optional_whitespace())
            .ignore_then(value_text())
            .then_ignore(optional_whitespace())
            .then_ignore(newline());
        let multiline = paragraph_line
            .repeated()
            .at_least(1)
            .map(|lines| {
                ParseTree::new(
                    rules::MULTILINE,
                    lines.into_iter().map(ParseChild::Node).collect(),
                )
            })
            .labelled("paragraph");

        let info = line_text().map(|text| ParseTree::new(rules::INFO, vec![text.into()]));
        let tree = info
            .then_ignore(optional_whitespace())
            .then_ignore(newline())
            .then_ignore(blank_lines())
            .then(body.or_not())
            .map(|(info, blocks)| match blocks {
                Some(blocks) => ParseTree::new(rules::TREE, node_children(info, blocks)),
                None => ParseTree::new(rules::TREE, vec![info.into(), ParseChild::Absent]),
            })
            .labelled("outline line");

        choice((section.boxed(), pair.boxed(), multiline.boxed(), tree.boxed()))
    });

    blank_lines()
        .ignore_then(block.then_ignore(blank_lines()).repeated())
        .then_ignore(end())
        .map(|blocks| {
            ParseTree::new(
                rules::START,
                blocks.into_iter().map(ParseChild::Node).collect(),
            )
        })
}
