//! Single-pass tokenizer for the ferrocc C front-end (spec.md §4.C).
//!
//! `lex` walks a source buffer once, producing a flat `Vec<Token>` terminated
//! by an `Eof` token. It never allocates a linked list the way
//! `original_source/src/lexer/lexer.c` does (`Token::next`) — a `Vec` is
//! simpler, cache-friendlier, and sidesteps that file's manual
//! free-on-destroy bookkeeping entirely.

mod error;
mod scan;
mod token;

pub use error::LexError;
pub use token::{FloatSuffix, IntegerSuffix, LiteralValue, Token};

use ferrocc_syntax::SyntaxDefinition;

/// Tokenize `source` under `syntax`, returning every token lexed and every
/// error hit along the way. Lexing never stops at the first error (spec.md
/// §4.C's error-recovery note: "skip the offending byte and keep scanning"),
/// so callers get as complete a token stream as possible even from broken
/// input.
pub fn lex(source: &str, file_id: usize, syntax: &SyntaxDefinition) -> (Vec<Token>, Vec<LexError>) {
    let mut cursor = scan::Cursor::new(source, file_id, syntax);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    loop {
        match cursor.next_token() {
            Ok(Some(tok)) => {
                let is_eof = tok.is_eof();
                tokens.push(tok);
                if is_eof {
                    break;
                }
            }
            Ok(None) => continue,
            Err(e) => errors.push(e),
        }
    }

    (tokens, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrocc_syntax::{c99, TokenKind};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let syntax = c99();
        let (tokens, errors) = lex(src, 0, &syntax);
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_yields_only_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn simple_declaration() {
        assert_eq!(
            kinds("int x = 42;"),
            vec![
                TokenKind::KwInt,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::IntegerLiteral,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn longest_match_operators() {
        assert_eq!(
            kinds("a <<= b"),
            vec![
                TokenKind::Identifier,
                TokenKind::ShlAssign,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
        assert_eq!(
            kinds("a << b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Shl,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("int /* comment */ x; // trailing\n"),
            vec![TokenKind::KwInt, TokenKind::Identifier, TokenKind::Semicolon, TokenKind::Eof]
        );
    }

    #[test]
    fn string_literal_decodes_escapes() {
        let syntax = c99();
        let (tokens, errors) = lex(r#""a\nb""#, 0, &syntax);
        assert!(errors.is_empty());
        match &tokens[0].value {
            LiteralValue::Str(s) => assert_eq!(s, "a\nb"),
            other => panic!("expected string literal, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_string_reports_error() {
        let syntax = c99();
        let (_tokens, errors) = lex("\"abc", 0, &syntax);
        assert!(matches!(errors[0], LexError::UnterminatedString { .. }));
    }

    #[test]
    fn unterminated_block_comment_reports_error() {
        let syntax = c99();
        let (_tokens, errors) = lex("/* never closes", 0, &syntax);
        assert!(matches!(errors[0], LexError::UnterminatedComment { .. }));
    }

    #[test]
    fn numeric_suffixes_are_decoded() {
        let syntax = c99();
        let (tokens, errors) = lex("42UL 3.14f 0x2A", 0, &syntax);
        assert!(errors.is_empty());
        match &tokens[0].value {
            LiteralValue::Integer { value, suffix } => {
                assert_eq!(*value, 42);
                assert!(suffix.unsigned);
                assert_eq!(suffix.long_count, 1);
            }
            other => panic!("expected integer literal, got {other:?}"),
        }
        assert!(matches!(
            tokens[1].value,
            LiteralValue::Float { suffix: FloatSuffix::Float, .. }
        ));
    }

    proptest! {
        /// Lexing never panics on arbitrary printable-ASCII input, and every
        /// token's span lands inside the source buffer — spec.md §8.1's
        /// requirement that the lexer degrade to recorded errors, never a
        /// crash, on malformed input.
        #[test]
        fn lexing_arbitrary_ascii_never_panics(src in "[ -~\\n\\t]{0,200}") {
            let syntax = c99();
            let (tokens, _errors) = lex(&src, 0, &syntax);
            for tok in &tokens {
                prop_assert!((tok.location.offset as usize) <= src.len());
            }
        }

        /// Any identifier-shaped string round-trips through the lexer as a
        /// single `Identifier` token with the same lexeme, unless it happens
        /// to collide with a keyword spelling.
        #[test]
        fn identifiers_round_trip(name in "[a-zA-Z_][a-zA-Z0-9_]{0,15}") {
            let syntax = c99();
            if syntax.lookup_keyword(&name).is_some() {
                return Ok(());
            }
            let (tokens, errors) = lex(&name, 0, &syntax);
            prop_assert!(errors.is_empty());
            prop_assert_eq!(tokens[0].kind, TokenKind::Identifier);
            prop_assert_eq!(&tokens[0].lexeme, &name);
        }
    }

    #[test]
    fn gnu_dollar_identifiers_and_binary_literals() {
        let syntax = ferrocc_syntax::gnu_c11();
        let (tokens, errors) = lex("$foo = 0b101;", 0, &syntax);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "$foo");
        match &tokens[2].value {
            LiteralValue::Integer { value, .. } => assert_eq!(*value, 5),
            other => panic!("expected integer literal, got {other:?}"),
        }
    }
}
