//! Recursive-descent parser turning a [`ferrocc_lexer::Token`] stream into a
//! [`ferrocc_ast::Ast`].
//!
//! The grammar is split across this crate by syntactic category — [`decl`]
//! (declarations and declarators), [`stmt`] (statements), [`expr`]
//! (precedence-climbing expressions) — each contributing an `impl<'a>
//! Parser<'a>` block to the single [`Parser`] type defined here, the same
//! way `ferrocc_lexer`'s scanner splits token categories across files
//! without splitting the scanner struct.

mod decl;
mod error;
mod expr;
mod scope;
mod stmt;

pub use error::ParseError;
pub use scope::TypedefScopes;

use ferrocc_ast::{Arena, Ast, NodeId, NodeKind, Payload};
use ferrocc_diag::SourceLocation;
use ferrocc_lexer::Token;
use ferrocc_syntax::TokenKind;

/// Recursion guards (spec.md §5's "recursion-depth limits" — a
/// deliberately malformed or deeply nested input must error out rather
/// than blow the native stack). Expression nesting gets a deeper budget
/// than statement nesting since expressions recurse once per precedence
/// level even for flat input.
const MAX_EXPR_DEPTH: u32 = 250;
const MAX_STMT_DEPTH: u32 = 250;

/// After this many parse errors in a row with no successful construct in
/// between, the parser gives up trying to resynchronize gracefully and
/// skips tokens until the next plausible declaration/statement start
/// (spec.md §5's "aggressive skip" escape hatch for pathological input).
const AGGRESSIVE_SKIP_THRESHOLD: u32 = 10;

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    arena: Arena,
    typedefs: TypedefScopes,
    errors: Vec<ParseError>,
    /// Consecutive failed constructs; reset to 0 on any successful one.
    /// An instance field, not a `static`/thread-local — distinct `Parser`s
    /// (e.g. one per file, parsed concurrently) must not share recovery
    /// state (spec.md §9's resolution of the original's global counter).
    consecutive_errors: u32,
    expr_depth: u32,
    stmt_depth: u32,
}

/// Parses a full translation unit. Always returns an `Ast` — even a
/// badly malformed input yields a (possibly mostly-empty) tree alongside
/// whatever errors were collected, so callers can still run later passes
/// that tolerate partial trees, or simply report the errors and stop.
pub fn parse(tokens: &[Token]) -> (Ast, Vec<ParseError>) {
    let mut parser = Parser::new(tokens);
    let root = parser.parse_translation_unit();
    (
        Ast {
            arena: parser.arena,
            root,
        },
        parser.errors,
    )
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            pos: 0,
            arena: Arena::new(),
            typedefs: TypedefScopes::new(),
            errors: Vec::new(),
            consecutive_errors: 0,
            expr_depth: 0,
            stmt_depth: 0,
        }
    }

    fn parse_translation_unit(&mut self) -> NodeId {
        let location = self.current().location;
        let root = self.arena.push(NodeKind::TranslationUnit, location, Payload::None);
        while !self.is_eof() {
            let before = self.pos;
            match self.parse_external_declaration() {
                Ok(decls) => {
                    for decl in decls {
                        self.arena.add_child(root, decl);
                    }
                    self.consecutive_errors = 0;
                }
                Err(e) => {
                    self.record_error(e);
                    self.synchronize();
                }
            }
            // A production that consumes no tokens and reports no error
            // would otherwise loop forever; force progress.
            if self.pos == before && !self.is_eof() {
                self.advance();
            }
        }
        root
    }

    // ---- token cursor ----

    fn current(&self) -> &'a Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self, offset: usize) -> &'a Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn is_eof(&self) -> bool {
        self.current().is_eof()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current().kind)
    }

    fn advance(&mut self) -> &'a Token {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if !self.is_eof() {
            self.pos += 1;
        }
        tok
    }

    /// Consumes the current token if it matches `kind`.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<&'a Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else if self.is_eof() {
            Err(ParseError::UnexpectedEof {
                expected: expected.to_string(),
                location: self.current().location,
            })
        } else {
            Err(ParseError::Expected {
                expected: expected.to_string(),
                found: self.current().lexeme.clone(),
                location: self.current().location,
            })
        }
    }

    fn location(&self) -> SourceLocation {
        self.current().location
    }

    // ---- error recovery ----

    fn record_error(&mut self, error: ParseError) {
        self.consecutive_errors += 1;
        self.errors.push(error);
    }

    /// Skips tokens until the parser is back at a plausible declaration
    /// or statement boundary (spec.md §5): a `;` (consumed, since it ends
    /// the bad construct), a `}` (left in place, since it probably closes
    /// an enclosing block the caller still needs to see), or a keyword
    /// that only ever starts a new declaration/statement.
    fn synchronize(&mut self) {
        if self.consecutive_errors >= AGGRESSIVE_SKIP_THRESHOLD {
            self.synchronize_aggressive();
            return;
        }
        while !self.is_eof() {
            if self.check(TokenKind::Semicolon) {
                self.advance();
                return;
            }
            if self.check(TokenKind::RBrace) {
                return;
            }
            if self.at_declaration_or_statement_start() {
                return;
            }
            self.advance();
        }
    }

    /// After too many consecutive failures, stop trying to land on a
    /// clean boundary and just skip to the next `;` or `}` (or EOF),
    /// unconditionally consuming at least one token so a broken input
    /// that never produces a recognizable boundary still terminates.
    fn synchronize_aggressive(&mut self) {
        let start = self.pos;
        while !self.is_eof() && !self.check(TokenKind::Semicolon) && !self.check(TokenKind::RBrace)
        {
            self.advance();
        }
        if self.check(TokenKind::Semicolon) {
            self.advance();
        }
        if self.pos == start && !self.is_eof() {
            self.advance();
        }
        self.consecutive_errors = 0;
    }

    fn at_declaration_or_statement_start(&self) -> bool {
        use TokenKind::*;
        matches!(
            self.current().kind,
            KwTypedef
                | KwStruct
                | KwUnion
                | KwEnum
                | KwStatic
                | KwExtern
                | KwConst
                | KwVoid
                | KwInt
                | KwChar
                | KwFloat
                | KwDouble
                | KwShort
                | KwLong
                | KwUnsigned
                | KwSigned
                | KwBool
                | KwIf
                | KwWhile
                | KwFor
                | KwDo
                | KwSwitch
                | KwReturn
                | KwBreak
                | KwContinue
                | KwGoto
                | KwStaticAssert
        )
    }

    fn recurse_expr<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            self.expr_depth -= 1;
            return Err(ParseError::RecursionLimit {
                context: "expression",
                location: self.location(),
            });
        }
        let result = f(self);
        self.expr_depth -= 1;
        result
    }

    fn recurse_stmt<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.stmt_depth += 1;
        if self.stmt_depth > MAX_STMT_DEPTH {
            self.stmt_depth -= 1;
            return Err(ParseError::RecursionLimit {
                context: "statement",
                location: self.location(),
            });
        }
        let result = f(self);
        self.stmt_depth -= 1;
        result
    }
}
