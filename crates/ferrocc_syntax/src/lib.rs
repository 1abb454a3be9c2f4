//! Declarative syntax table for the ferrocc C front-end.
//!
//! Nothing in this crate parses or lexes anything; it only *describes* a C
//! dialect as plain data (spec.md §4.B) — keyword/operator/punctuation
//! tables, comment and literal delimiter rules, and a handful of dialect
//! flags — so `ferrocc_lexer` and `ferrocc_parser` can be written once
//! against a [`SyntaxDefinition`] rather than against hardcoded literals.

mod char_class;
mod profile;
mod tables;
mod token_kind;

pub use char_class::{
    is_binary_digit, is_decimal_digit, is_hex_digit, is_horizontal_whitespace,
    is_identifier_continue, is_identifier_start, is_newline, is_octal_digit,
};
pub use profile::{c99, gnu_c11, CommentStyle, NumericLiteralSupport, StringLiteralStyle, SyntaxDefinition};
pub use tables::{
    Associativity, KeywordEntry, OperatorEntry, PunctuationEntry, C99_KEYWORDS, C_OPERATORS,
    C_PUNCTUATION, COMMA_PRECEDENCE, GNU_C11_KEYWORDS, GNU_KEYWORDS, POSTFIX_PRECEDENCE,
    TERNARY_PRECEDENCE, UNARY_PRECEDENCE,
};
pub use token_kind::TokenKind;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn token_kind_ranges_hold() {
        assert!(TokenKind::KwInt.is_keyword());
        assert!(TokenKind::Plus.is_operator());
        assert!(TokenKind::LParen.is_punctuation());
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(TokenKind::StringLiteral.is_literal());
        assert!(!TokenKind::Plus.is_literal());
    }

    #[test]
    fn c99_profile_omits_gnu_keywords() {
        let def = c99();
        assert_eq!(def.lookup_keyword("int"), Some(TokenKind::KwInt));
        assert_eq!(def.lookup_keyword("__attribute__"), None);
    }

    #[test]
    fn gnu_profile_recognizes_vendor_keywords() {
        let def = gnu_c11();
        assert_eq!(def.lookup_keyword("__attribute__"), Some(TokenKind::KwAttribute));
        assert_eq!(def.lookup_keyword("typeof"), Some(TokenKind::KwTypeof));
        assert!(def.allow_dollar_in_identifiers);
        assert!(def.supports_statement_expressions);
        assert!(def.supports_computed_goto);
    }

    #[test]
    fn operator_table_is_longest_first() {
        // `<<=` must precede `<<` must precede `<` so a greedy prefix scan
        // over `C_OPERATORS` finds the longest match first.
        let pos = |t: &str| C_OPERATORS.iter().position(|o| o.text == t).unwrap();
        assert!(pos("<<=") < pos("<<"));
        assert!(pos("<<") < pos("<"));
        assert!(pos(">>=") < pos(">>"));
    }

    #[test]
    fn punctuation_table_is_longest_first() {
        let pos = |t: &str| C_PUNCTUATION.iter().position(|p| p.text == t).unwrap();
        assert!(pos("...") < pos("."));
    }
}
