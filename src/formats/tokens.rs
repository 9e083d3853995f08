//! Token listing
//!
//! One line per token of the normalized stream, as `line:column Kind "text"`.
//! Synthetic indent and dedent tokens show an empty lexeme.

use crate::lexer::Token;

pub fn to_token_listing(tokens: &[Token]) -> String {
    let mut result = String::new();
    for token in tokens {
        result.push_str(&token.to_string());
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    #[test]
    fn test_listing_includes_block_delimiters() {
        let tokens = lex("a\n  b\n", 2, 64).unwrap();
        insta::assert_snapshot!(to_token_listing(&tokens), @r###"
        1:1 Word "a"
        1:2 Newline "\n"
        2:1 Indentation "  "
        2:3 Indent ""
        2:3 Word "b"
        2:4 Newline "\n"
        3:1 Dedent ""
        "###);
    }
}
