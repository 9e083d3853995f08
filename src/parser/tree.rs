//! Generic rule-tagged parse tree
//!
//! This is the grammar engine's output: a node per matched rule, with ordered
//! children that are tokens, nested nodes, or an explicit marker for an optional
//! slot that did not match. Nothing here knows what the rules mean.

use crate::lexer::Token;

/// Rule tags emitted by the zl grammar.
pub mod rules {
    pub const START: &str = "start";
    pub const TREE: &str = "tree";
    pub const INFO: &str = "info";
    pub const PAIR: &str = "pair";
    pub const COMMAND: &str = "command";
    pub const MULTILINE: &str = "multiline";
    pub const KEYWORD: &str = "keyword";
    pub const TEXT: &str = "text";
    pub const WORD: &str = "word";
    pub const WORDLIKE: &str = "wordlike";
    pub const QUOTE: &str = "quote";
    pub const URL: &str = "url";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseChild {
    Token(Token),
    Node(ParseTree),
    /// Optional grammar slot that was not matched
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    pub rule: String,
    pub children: Vec<ParseChild>,
}

impl ParseTree {
    pub fn new(rule: impl Into<String>, children: Vec<ParseChild>) -> Self {
        Self {
            rule: rule.into(),
            children,
        }
    }

    /// First source token in document order, used to locate diagnostics.
    pub fn first_token(&self) -> Option<&Token> {
        self.children.iter().find_map(|child| match child {
            ParseChild::Token(token) => Some(token),
            ParseChild::Node(node) => node.first_token(),
            ParseChild::Absent => None,
        })
    }

    /// Indented multi-line rendering of the tree, one rule or token per line.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.pretty_into(0, &mut out);
        out
    }

    fn pretty_into(&self, level: usize, out: &mut String) {
        let indent = "  ".repeat(level);
        out.push_str(&format!("{}{}\n", indent, self.rule));
        for child in &self.children {
            match child {
                ParseChild::Node(node) => node.pretty_into(level + 1, out),
                ParseChild::Token(token) => {
                    out.push_str(&format!("{}  {:?}\n", indent, token.text));
                }
                ParseChild::Absent => out.push_str(&format!("{}  None\n", indent)),
            }
        }
    }
}

impl From<Token> for ParseChild {
    fn from(token: Token) -> Self {
        ParseChild::Token(token)
    }
}

impl From<ParseTree> for ParseChild {
    fn from(node: ParseTree) -> Self {
        ParseChild::Node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;
    use crate::position::Position;

    fn word(text: &str, column: usize) -> Token {
        Token::new(TokenKind::Word, text, Position::new(1, column))
    }

    #[test]
    fn test_first_token_skips_absent() {
        let tree = ParseTree::new(
            rules::TREE,
            vec![
                ParseChild::Absent,
                ParseTree::new(rules::WORD, vec![word("a", 3).into()]).into(),
            ],
        );
        assert_eq!(tree.first_token().map(|t| t.column), Some(3));
    }

    #[test]
    fn test_pretty() {
        let tree = ParseTree::new(
            rules::TREE,
            vec![
                ParseTree::new(rules::WORD, vec![word("a", 1).into()]).into(),
                ParseChild::Absent,
            ],
        );
        assert_eq!(tree.pretty(), "tree\n  word\n    \"a\"\n  None\n");
    }
}
