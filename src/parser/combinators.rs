//! Parser combinator functions for building the zl grammar.
//!
//! Everything here works on the normalized token stream with `Indentation` trivia
//! already removed. Whitespace tokens only separate inline elements; they never
//! appear in the parse tree.

use chumsky::prelude::*;

use crate::lexer::{Token, TokenKind};
use crate::parser::tree::{rules, ParseChild, ParseTree};

/// Type alias for parser error
pub(crate) type ParserError = Simple<Token>;

/// Words that parse as `keyword` when they stand alone as a key or section head.
pub const KEYWORDS: [&str; 6] = ["items", "info", "format", "filters", "repo", "keywords"];

/// Helper: match a specific token kind
pub(crate) fn kind(kind: TokenKind) -> impl Parser<Token, Token, Error = ParserError> + Clone {
    filter(move |t: &Token| t.kind == kind)
}

pub(crate) fn newline() -> impl Parser<Token, (), Error = ParserError> + Clone {
    kind(TokenKind::Newline).ignored()
}

pub(crate) fn optional_whitespace() -> impl Parser<Token, (), Error = ParserError> + Clone {
    kind(TokenKind::Whitespace).or_not().ignored()
}

/// Zero or more blank lines
pub(crate) fn blank_lines() -> impl Parser<Token, (), Error = ParserError> + Clone {
    newline().repeated().ignored()
}

/// `:` with optional whitespace on both sides
pub(crate) fn colon() -> impl Parser<Token, (), Error = ParserError> + Clone {
    optional_whitespace()
        .ignore_then(kind(TokenKind::Colon))
        .then_ignore(optional_whitespace())
        .ignored()
}

/// Tokens allowed inside atoms of keys and outline lines.
pub(crate) fn line_atom(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Word
            | TokenKind::Punct
            | TokenKind::Symbol
            | TokenKind::LBracket
            | TokenKind::RBracket
            | TokenKind::Pipe
    )
}

/// Pair values and paragraph lines also accept colons.
pub(crate) fn value_atom(kind: TokenKind) -> bool {
    line_atom(kind) || kind == TokenKind::Colon
}

/// Command content stops at the closing bracket.
pub(crate) fn content_atom(kind: TokenKind) -> bool {
    value_atom(kind) && kind != TokenKind::RBracket
}

/// A run of adjacent word/punctuation tokens: `word` when it is a single word,
/// `wordlike` otherwise.
pub(crate) fn atom(
    allow: fn(TokenKind) -> bool,
) -> impl Parser<Token, ParseTree, Error = ParserError> + Clone {
    filter(move |t: &Token| allow(t.kind))
        .repeated()
        .at_least(1)
        .map(|tokens: Vec<Token>| {
            let rule = if tokens.len() == 1 && tokens[0].is(TokenKind::Word) {
                rules::WORD
            } else {
                rules::WORDLIKE
            };
            ParseTree::new(rule, tokens.into_iter().map(ParseChild::Token).collect())
        })
}

pub(crate) fn url() -> impl Parser<Token, ParseTree, Error = ParserError> + Clone {
    kind(TokenKind::Url).map(|t| ParseTree::new(rules::URL, vec![t.into()]))
}

pub(crate) fn quote() -> impl Parser<Token, ParseTree, Error = ParserError> + Clone {
    kind(TokenKind::Quote).map(|t| ParseTree::new(rules::QUOTE, vec![t.into()]))
}

/// A reserved word, e.g. `format` in `format: .key = .value`
pub(crate) fn keyword() -> impl Parser<Token, ParseTree, Error = ParserError> + Clone {
    filter(|t: &Token| t.is(TokenKind::Word) && KEYWORDS.contains(&t.text.as_str()))
        .map(|t| ParseTree::new(rules::KEYWORD, vec![t.into()]))
        .labelled("keyword")
}

/// The sentinel head of an items section
pub(crate) fn items_keyword() -> impl Parser<Token, ParseTree, Error = ParserError> + Clone {
    filter(|t: &Token| t.is(TokenKind::Word) && t.text == "items")
        .map(|t| ParseTree::new(rules::KEYWORD, vec![t.into()]))
}

/// One or more inline elements, optionally separated by whitespace.
///
/// Elements written without whitespace between them, e.g. `%[Rust].`, are kept
/// together in one `wordlike` node.
pub(crate) fn text<P>(inline: P) -> impl Parser<Token, ParseTree, Error = ParserError> + Clone
where
    P: Parser<Token, ParseTree, Error = ParserError> + Clone,
{
    let spaced = kind(TokenKind::Whitespace).or_not().map(|ws| ws.is_some());

    inline
        .clone()
        .then(spaced.then(inline).repeated())
        .map(|(first, rest)| {
            let mut groups = vec![vec![first]];
            for (spaced, element) in rest {
                if spaced {
                    groups.push(Vec::new());
                }
                if let Some(group) = groups.last_mut() {
                    group.push(element);
                }
            }
            let children = groups
                .into_iter()
                .map(|group| ParseChild::Node(glue(group)))
                .collect();
            ParseTree::new(rules::TEXT, children)
        })
        .labelled("text")
}

fn glue(mut group: Vec<ParseTree>) -> ParseTree {
    if group.len() == 1 {
        group.remove(0)
    } else {
        ParseTree::new(
            rules::WORDLIKE,
            group.into_iter().map(ParseChild::Node).collect(),
        )
    }
}

/// `%[content]`: the symbol token followed by the bracketed text
pub(crate) fn command() -> impl Parser<Token, ParseTree, Error = ParserError> + Clone {
    let content = text(choice((url(), quote(), atom(content_atom))).boxed());

    kind(TokenKind::Symbol)
        .then_ignore(kind(TokenKind::LBracket))
        .then_ignore(optional_whitespace())
        .then(content)
        .then_ignore(optional_whitespace())
        .then_ignore(kind(TokenKind::RBracket))
        .map(|(symbol, content)| {
            ParseTree::new(rules::COMMAND, vec![symbol.into(), content.into()])
        })
        .labelled("command")
}

/// Text of outline lines
pub(crate) fn line_text() -> impl Parser<Token, ParseTree, Error = ParserError> + Clone {
    text(choice((command(), url(), quote(), atom(line_atom))).boxed()).boxed()
}

/// Text of pair values and paragraph lines
pub(crate) fn value_text() -> impl Parser<Token, ParseTree, Error = ParserError> + Clone {
    text(choice((command(), url(), quote(), atom(value_atom))).boxed()).boxed()
}

/// Text of pair keys: no commands or links
pub(crate) fn key_text() -> impl Parser<Token, ParseTree, Error = ParserError> + Clone {
    text(choice((quote(), atom(line_atom))).boxed()).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn significant(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect()
    }

    fn rules_of(tree: &ParseTree) -> Vec<&str> {
        tree.children
            .iter()
            .filter_map(|c| match c {
                ParseChild::Node(n) => Some(n.rule.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_text_groups_atoms() {
        let tree = line_text()
            .then_ignore(end())
            .parse(significant("Hello, world e.g. ok"))
            .unwrap();
        assert_eq!(tree.rule, rules::TEXT);
        assert_eq!(
            rules_of(&tree),
            vec![rules::WORDLIKE, rules::WORD, rules::WORDLIKE, rules::WORD]
        );
    }

    #[test]
    fn test_command_inside_text() {
        let tree = line_text()
            .then_ignore(end())
            .parse(significant("see %[Rust language] now"))
            .unwrap();
        assert_eq!(
            rules_of(&tree),
            vec![rules::WORD, rules::COMMAND, rules::WORD]
        );
    }

    #[test]
    fn test_symbol_without_bracket_is_an_atom() {
        let tree = line_text()
            .then_ignore(end())
            .parse(significant("100% sure"))
            .unwrap();
        assert_eq!(rules_of(&tree), vec![rules::WORDLIKE, rules::WORD]);
    }

    #[test]
    fn test_line_text_rejects_colon() {
        assert!(line_text()
            .then_ignore(end())
            .parse(significant("a: b"))
            .is_err());
        assert!(value_text()
            .then_ignore(end())
            .parse(significant("10:30 sharp"))
            .is_ok());
    }

    #[test]
    fn test_unspaced_elements_stay_together() {
        let tree = line_text()
            .then_ignore(end())
            .parse(significant("see %[Rust]. (\"q\")"))
            .unwrap();
        assert_eq!(rules_of(&tree), vec![rules::WORD, rules::WORDLIKE, rules::WORDLIKE]);

        let ParseChild::Node(glued) = &tree.children[1] else {
            panic!("expected node");
        };
        assert_eq!(rules_of(glued), vec![rules::COMMAND, rules::WORDLIKE]);
    }

    #[test]
    fn test_keyword_only_matches_reserved_words() {
        assert!(keyword().parse(significant("format")).is_ok());
        assert!(keyword().parse(significant("title")).is_err());
    }
}
