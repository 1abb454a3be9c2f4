//! Expression grammar: the 15-level precedence ladder of spec.md §4.E.6,
//! implemented as precedence climbing over `ferrocc_syntax::tables` rather
//! than one hand-written function per level, plus the cast-vs-parenthesized
//! backtracking disambiguation and the GNU builtin pseudo-functions.

use crate::error::ParseError;
use crate::Parser;
use ferrocc_ast::{NodeId, NodeKind, Payload};
use ferrocc_lexer::LiteralValue;
use ferrocc_syntax::tables::{Associativity, C_OPERATORS, COMMA_PRECEDENCE, TERNARY_PRECEDENCE};
use ferrocc_syntax::TokenKind;

fn binary_node_kind(kind: TokenKind) -> Option<NodeKind> {
    use TokenKind::*;
    Some(match kind {
        Plus => NodeKind::AddExpr,
        Minus => NodeKind::SubExpr,
        Star => NodeKind::MulExpr,
        Slash => NodeKind::DivExpr,
        Percent => NodeKind::ModExpr,
        Amp => NodeKind::AndExpr,
        Pipe => NodeKind::OrExpr,
        Caret => NodeKind::XorExpr,
        Shl => NodeKind::ShlExpr,
        Shr => NodeKind::ShrExpr,
        LogicalAnd => NodeKind::LogicalAndExpr,
        LogicalOr => NodeKind::LogicalOrExpr,
        Eq => NodeKind::EqExpr,
        Ne => NodeKind::NeExpr,
        Less => NodeKind::LtExpr,
        Le => NodeKind::LeExpr,
        Greater => NodeKind::GtExpr,
        Ge => NodeKind::GeExpr,
        _ => return None,
    })
}

fn assign_node_kind(kind: TokenKind) -> Option<NodeKind> {
    use TokenKind::*;
    Some(match kind {
        Assign => NodeKind::AssignExpr,
        PlusAssign => NodeKind::AddAssignExpr,
        MinusAssign => NodeKind::SubAssignExpr,
        StarAssign => NodeKind::MulAssignExpr,
        SlashAssign => NodeKind::DivAssignExpr,
        PercentAssign => NodeKind::ModAssignExpr,
        AmpAssign => NodeKind::AndAssignExpr,
        PipeAssign => NodeKind::OrAssignExpr,
        CaretAssign => NodeKind::XorAssignExpr,
        ShlAssign => NodeKind::ShlAssignExpr,
        ShrAssign => NodeKind::ShrAssignExpr,
        _ => return None,
    })
}

fn lookup_operator(kind: TokenKind) -> Option<(i32, Associativity)> {
    C_OPERATORS
        .iter()
        .find(|entry| entry.kind == kind)
        .map(|entry| (entry.precedence, entry.associativity))
}

impl<'a> Parser<'a> {
    /// `expression`: the comma operator, lowest precedence of all.
    pub(crate) fn parse_expression(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_assignment()?;
        while self.check(TokenKind::Comma) {
            let loc = self.location();
            self.advance();
            let right = self.parse_assignment()?;
            let node = self.arena.push(NodeKind::CommaExpr, loc, Payload::None);
            self.arena.add_child(node, left);
            self.arena.add_child(node, right);
            left = node;
        }
        Ok(left)
    }

    /// `assignment-expression`: right-associative, one level above comma.
    pub(crate) fn parse_assignment(&mut self) -> Result<NodeId, ParseError> {
        let left = self.parse_conditional()?;
        if let Some(kind) = assign_node_kind(self.current().kind) {
            let loc = self.location();
            self.advance();
            let right = self.recurse_expr(|p| p.parse_assignment())?;
            let node = self.arena.push(kind, loc, Payload::None);
            self.arena.add_child(node, left);
            self.arena.add_child(node, right);
            return Ok(node);
        }
        Ok(left)
    }

    /// `conditional-expression`: `cond ? then : else`, right-associative.
    fn parse_conditional(&mut self) -> Result<NodeId, ParseError> {
        let cond = self.parse_binary(COMMA_PRECEDENCE + 1)?;
        if self.check(TokenKind::Question) {
            let loc = self.location();
            self.advance();
            let then_branch = self.recurse_expr(|p| p.parse_expression())?;
            self.expect(TokenKind::Colon, "`:` in conditional expression")?;
            let else_branch = self.recurse_expr(|p| p.parse_conditional())?;
            let node = self.arena.push(NodeKind::ConditionalExpr, loc, Payload::Conditional);
            self.arena.add_child(node, cond);
            self.arena.add_child(node, then_branch);
            self.arena.add_child(node, else_branch);
            return Ok(node);
        }
        let _ = TERNARY_PRECEDENCE;
        Ok(cond)
    }

    /// Precedence climbing over the binary operator table: parses a
    /// left-hand operand, then repeatedly folds in any following operator
    /// whose precedence is at least `min_precedence`.
    fn parse_binary(&mut self, min_precedence: i32) -> Result<NodeId, ParseError> {
        let mut left = self.recurse_expr(|p| p.parse_cast())?;
        loop {
            let Some((precedence, assoc)) = lookup_operator(self.current().kind) else {
                break;
            };
            let Some(node_kind) = binary_node_kind(self.current().kind) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            let loc = self.location();
            self.advance();
            let next_min = match assoc {
                Associativity::Left => precedence + 1,
                Associativity::Right | Associativity::None => precedence,
            };
            let right = self.recurse_expr(|p| p.parse_binary(next_min))?;
            let node = self.arena.push(node_kind, loc, Payload::None);
            self.arena.add_child(node, left);
            self.arena.add_child(node, right);
            left = node;
        }
        Ok(left)
    }

    /// `cast-expression`: `( type-name ) cast-expression` or a plain
    /// `unary-expression`. Disambiguated by looking at what follows `(`
    /// rather than by backtracking: a genuine cast can only start with a
    /// type keyword, a qualifier, or a name the parser has already seen
    /// `typedef`'d (spec.md §5's typedef-driven disambiguation).
    fn parse_cast(&mut self) -> Result<NodeId, ParseError> {
        if self.check(TokenKind::LParen) && self.at_type_start_at(1) {
            let loc = self.location();
            let save = self.pos;
            self.advance();
            let ty = self.parse_type_name()?;
            if self.eat(TokenKind::RParen) {
                if self.check(TokenKind::LBrace) {
                    return self.parse_compound_literal(loc, ty);
                }
                let operand = self.recurse_expr(|p| p.parse_cast())?;
                let node = self.arena.push(NodeKind::CastExpr, loc, Payload::TypeOperand);
                self.arena.add_child(node, ty);
                self.arena.add_child(node, operand);
                return Ok(node);
            }
            // Not actually a cast (e.g. `(int)` followed by something
            // that isn't `)`, or a parse failure inside the type-name);
            // rewind and fall through to ordinary unary parsing.
            self.pos = save;
        }
        self.parse_unary()
    }

    fn parse_compound_literal(&mut self, loc: ferrocc_diag::SourceLocation, ty: NodeId) -> Result<NodeId, ParseError> {
        let init = self.parse_initializer()?;
        let node = self
            .arena
            .push(NodeKind::CompoundLiteralExpr, loc, Payload::TypeOperand);
        self.arena.add_child(node, ty);
        self.arena.add_child(node, init);
        Ok(node)
    }

    /// `unary-expression`.
    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.location();
        let unary_kind = match self.current().kind {
            TokenKind::Plus => Some(NodeKind::UnaryPlusExpr),
            TokenKind::Minus => Some(NodeKind::UnaryMinusExpr),
            TokenKind::Bang => Some(NodeKind::NotExpr),
            TokenKind::Tilde => Some(NodeKind::BitNotExpr),
            TokenKind::Star => Some(NodeKind::DerefExpr),
            TokenKind::Amp => Some(NodeKind::AddrOfExpr),
            TokenKind::Increment => Some(NodeKind::PreIncExpr),
            TokenKind::Decrement => Some(NodeKind::PreDecExpr),
            _ => None,
        };
        if let Some(kind) = unary_kind {
            self.advance();
            let operand = self.recurse_expr(|p| p.parse_cast())?;
            let node = self.arena.push(kind, loc, Payload::Unary { op: unary_op_text(kind) });
            self.arena.add_child(node, operand);
            return Ok(node);
        }

        if self.check(TokenKind::KwExtension) {
            self.advance();
            return self.parse_cast();
        }

        if self.check(TokenKind::KwSizeof) {
            return self.parse_sizeof();
        }
        if self.check(TokenKind::KwAlignof) {
            self.advance();
            self.expect(TokenKind::LParen, "`(` after `_Alignof`")?;
            let ty = self.parse_type_name()?;
            self.expect(TokenKind::RParen, "`)` closing `_Alignof`")?;
            let node = self.arena.push(NodeKind::AlignofExpr, loc, Payload::TypeOperand);
            self.arena.add_child(node, ty);
            return Ok(node);
        }
        if self.check(TokenKind::KwBuiltinOffsetof) {
            return self.parse_builtin_offsetof();
        }
        if self.check(TokenKind::KwBuiltinVaArg) {
            return self.parse_builtin_va_arg();
        }
        if self.check(TokenKind::KwBuiltinTypesCompatibleP) {
            return self.parse_builtin_types_compatible();
        }
        if self.check(TokenKind::KwBuiltinChooseExpr) {
            return self.parse_builtin_choose_expr();
        }
        if self.check(TokenKind::KwBuiltinExpect) {
            return self.parse_builtin_expect();
        }
        if self.check(TokenKind::Amp) {
            unreachable!("handled by unary_kind above");
        }

        self.parse_postfix()
    }

    fn parse_sizeof(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.location();
        self.advance();
        if self.check(TokenKind::LParen) && self.at_type_start_at(1) {
            let save = self.pos;
            self.advance();
            match self.parse_type_name() {
                Ok(ty) if self.check(TokenKind::RParen) => {
                    self.advance();
                    let node = self.arena.push(NodeKind::SizeofTypeExpr, loc, Payload::TypeOperand);
                    self.arena.add_child(node, ty);
                    return Ok(node);
                }
                _ => self.pos = save,
            }
        }
        let operand = self.recurse_expr(|p| p.parse_unary())?;
        let node = self.arena.push(NodeKind::SizeofExpr, loc, Payload::None);
        self.arena.add_child(node, operand);
        Ok(node)
    }

    fn parse_builtin_offsetof(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.location();
        self.advance();
        self.expect(TokenKind::LParen, "`(` after `__builtin_offsetof`")?;
        let ty = self.parse_type_name()?;
        self.expect(TokenKind::Comma, "`,` in `__builtin_offsetof`")?;
        let field = self.expect(TokenKind::Identifier, "field name")?.lexeme.clone();
        self.expect(TokenKind::RParen, "`)` closing `__builtin_offsetof`")?;
        let node = self.arena.push(NodeKind::OffsetofExpr, loc, Payload::Member { field });
        self.arena.add_child(node, ty);
        Ok(node)
    }

    fn parse_builtin_va_arg(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.location();
        self.advance();
        self.expect(TokenKind::LParen, "`(` after `__builtin_va_arg`")?;
        let list = self.parse_assignment()?;
        self.expect(TokenKind::Comma, "`,` in `__builtin_va_arg`")?;
        let ty = self.parse_type_name()?;
        self.expect(TokenKind::RParen, "`)` closing `__builtin_va_arg`")?;
        let node = self.arena.push(NodeKind::VaArgExpr, loc, Payload::None);
        self.arena.add_child(node, list);
        self.arena.add_child(node, ty);
        Ok(node)
    }

    fn parse_builtin_types_compatible(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.location();
        self.advance();
        self.expect(TokenKind::LParen, "`(` after `__builtin_types_compatible_p`")?;
        let lhs = self.parse_type_name()?;
        self.expect(TokenKind::Comma, "`,` in `__builtin_types_compatible_p`")?;
        let rhs = self.parse_type_name()?;
        self.expect(TokenKind::RParen, "`)` closing `__builtin_types_compatible_p`")?;
        let node = self
            .arena
            .push(NodeKind::BuiltinTypesCompatibleExpr, loc, Payload::None);
        self.arena.add_child(node, lhs);
        self.arena.add_child(node, rhs);
        Ok(node)
    }

    fn parse_builtin_choose_expr(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.location();
        self.advance();
        self.expect(TokenKind::LParen, "`(` after `__builtin_choose_expr`")?;
        let cond = self.parse_assignment()?;
        self.expect(TokenKind::Comma, "`,` in `__builtin_choose_expr`")?;
        let then_branch = self.parse_assignment()?;
        self.expect(TokenKind::Comma, "`,` in `__builtin_choose_expr`")?;
        let else_branch = self.parse_assignment()?;
        self.expect(TokenKind::RParen, "`)` closing `__builtin_choose_expr`")?;
        let node = self.arena.push(NodeKind::BuiltinChooseExpr, loc, Payload::None);
        self.arena.add_child(node, cond);
        self.arena.add_child(node, then_branch);
        self.arena.add_child(node, else_branch);
        Ok(node)
    }

    fn parse_builtin_expect(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.location();
        self.advance();
        self.expect(TokenKind::LParen, "`(` after `__builtin_expect`")?;
        let value = self.parse_assignment()?;
        self.expect(TokenKind::Comma, "`,` in `__builtin_expect`")?;
        let expected = self.parse_assignment()?;
        self.expect(TokenKind::RParen, "`)` closing `__builtin_expect`")?;
        let node = self.arena.push(NodeKind::BuiltinExpectExpr, loc, Payload::None);
        self.arena.add_child(node, value);
        self.arena.add_child(node, expected);
        Ok(node)
    }

    /// `postfix-expression`: subscript, call, member access, `++`/`--`,
    /// chained left-to-right onto a primary expression.
    fn parse_postfix(&mut self) -> Result<NodeId, ParseError> {
        let mut node = self.parse_primary()?;
        loop {
            let loc = self.location();
            match self.current().kind {
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket, "`]` closing subscript")?;
                    let n = self.arena.push(NodeKind::ArraySubscriptExpr, loc, Payload::None);
                    self.arena.add_child(n, node);
                    self.arena.add_child(n, index);
                    node = n;
                }
                TokenKind::LParen => {
                    self.advance();
                    let n = self.arena.push(NodeKind::CallExpr, loc, Payload::Call);
                    self.arena.add_child(n, node);
                    if !self.check(TokenKind::RParen) {
                        loop {
                            let arg = self.parse_assignment()?;
                            self.arena.add_child(n, arg);
                            if !self.eat(TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::RParen, "`)` closing call")?;
                    node = n;
                }
                TokenKind::Dot => {
                    self.advance();
                    let field = self.expect(TokenKind::Identifier, "field name")?.lexeme.clone();
                    let n = self.arena.push(NodeKind::MemberExpr, loc, Payload::Member { field });
                    self.arena.add_child(n, node);
                    node = n;
                }
                TokenKind::Arrow => {
                    self.advance();
                    let field = self.expect(TokenKind::Identifier, "field name")?.lexeme.clone();
                    let n = self.arena.push(NodeKind::ArrowExpr, loc, Payload::Member { field });
                    self.arena.add_child(n, node);
                    node = n;
                }
                TokenKind::Increment => {
                    self.advance();
                    let n = self
                        .arena
                        .push(NodeKind::PostIncExpr, loc, Payload::Unary { op: "++" });
                    self.arena.add_child(n, node);
                    node = n;
                }
                TokenKind::Decrement => {
                    self.advance();
                    let n = self
                        .arena
                        .push(NodeKind::PostDecExpr, loc, Payload::Unary { op: "--" });
                    self.arena.add_child(n, node);
                    node = n;
                }
                _ => break,
            }
        }
        Ok(node)
    }

    /// `primary-expression`: literals, identifiers, parenthesized
    /// expressions, GNU statement expressions, and `_Generic`.
    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.location();
        match self.current().kind {
            TokenKind::IntegerLiteral => {
                let tok = self.advance();
                let (value, is_unsigned, long_count) = match &tok.value {
                    LiteralValue::Integer { value, suffix } => {
                        (*value, suffix.unsigned, suffix.long_count)
                    }
                    _ => (0, false, 0),
                };
                Ok(self.arena.push(
                    NodeKind::IntegerLiteral,
                    loc,
                    Payload::Integer { value, is_unsigned, long_count },
                ))
            }
            TokenKind::FloatLiteral => {
                let tok = self.advance();
                let (value, is_float) = match &tok.value {
                    LiteralValue::Float { value, suffix } => {
                        (*value, matches!(suffix, ferrocc_lexer::FloatSuffix::Float))
                    }
                    _ => (0.0, false),
                };
                Ok(self.arena.push(NodeKind::FloatLiteral, loc, Payload::Float { value, is_float }))
            }
            TokenKind::StringLiteral => {
                let tok = self.advance();
                let text = match &tok.value {
                    LiteralValue::Str(s) => s.clone(),
                    _ => String::new(),
                };
                Ok(self.arena.push(NodeKind::StringLiteral, loc, Payload::Str(text)))
            }
            TokenKind::CharLiteral => {
                let tok = self.advance();
                let value = match &tok.value {
                    LiteralValue::Char(c) => *c,
                    _ => 0,
                };
                Ok(self.arena.push(NodeKind::CharLiteral, loc, Payload::Char(value)))
            }
            TokenKind::Identifier => {
                let name = self.advance().lexeme.clone();
                Ok(self.arena.push(NodeKind::Identifier, loc, Payload::Name(name)))
            }
            TokenKind::KwGeneric => self.parse_generic(),
            TokenKind::Amp if self.peek(1).kind == TokenKind::Amp => {
                // `&&label`, computed goto's address-of-label operator.
                self.advance();
                self.advance();
                let label = self.expect(TokenKind::Identifier, "label name")?.lexeme.clone();
                Ok(self.arena.push(NodeKind::AddrOfLabelExpr, loc, Payload::Name(label)))
            }
            TokenKind::LParen => {
                self.advance();
                if self.check(TokenKind::LBrace) {
                    return self.parse_statement_expr(loc);
                }
                let inner = self.recurse_expr(|p| p.parse_expression())?;
                self.expect(TokenKind::RParen, "`)` closing parenthesized expression")?;
                Ok(inner)
            }
            _ => Err(ParseError::UnexpectedToken {
                found: self.current().lexeme.clone(),
                location: loc,
            }),
        }
    }

    /// GNU statement expression `({ stmt...; expr; })`: lowers to the
    /// value of its last statement (spec.md §9's resolution of the
    /// original's placeholder-identifier stand-in).
    fn parse_statement_expr(&mut self, loc: ferrocc_diag::SourceLocation) -> Result<NodeId, ParseError> {
        let body = self.parse_compound_statement()?;
        self.expect(TokenKind::RParen, "`)` closing statement expression")?;
        let node = self.arena.push(NodeKind::StatementExpr, loc, Payload::None);
        self.arena.add_child(node, body);
        Ok(node)
    }

    fn parse_generic(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.location();
        self.advance();
        self.expect(TokenKind::LParen, "`(` after `_Generic`")?;
        let controlling = self.parse_assignment()?;
        let node = self.arena.push(NodeKind::GenericExpr, loc, Payload::None);
        self.arena.add_child(node, controlling);
        while self.eat(TokenKind::Comma) {
            let assoc_loc = self.location();
            if self.eat(TokenKind::KwDefault) {
                self.expect(TokenKind::Colon, "`:` after `default`")?;
                let expr = self.parse_assignment()?;
                let assoc = self
                    .arena
                    .push(NodeKind::GenericAssoc, assoc_loc, Payload::GenericAssoc { is_default: true });
                self.arena.add_child(assoc, expr);
                self.arena.add_child(node, assoc);
            } else {
                let ty = self.parse_type_name()?;
                self.expect(TokenKind::Colon, "`:` in `_Generic` association")?;
                let expr = self.parse_assignment()?;
                let assoc = self
                    .arena
                    .push(NodeKind::GenericAssoc, assoc_loc, Payload::GenericAssoc { is_default: false });
                self.arena.add_child(assoc, ty);
                self.arena.add_child(assoc, expr);
                self.arena.add_child(node, assoc);
            }
        }
        self.expect(TokenKind::RParen, "`)` closing `_Generic`")?;
        Ok(node)
    }

    /// Whether the token `offset` positions ahead could start a
    /// `type-name` — the decision point for cast/sizeof/compound-literal
    /// disambiguation.
    pub(crate) fn at_type_start_at(&self, offset: usize) -> bool {
        use TokenKind::*;
        let tok = self.peek(offset);
        match tok.kind {
            KwVoid | KwChar | KwShort | KwInt | KwLong | KwFloat | KwDouble | KwSigned
            | KwUnsigned | KwBool | KwComplex | KwStruct | KwUnion | KwEnum | KwConst
            | KwVolatile | KwConst2 | KwVolatile2 | KwRestrict | KwRestrict2 | KwAtomic
            | KwTypeof => true,
            Identifier => self.typedefs.is_type_name(&tok.lexeme),
            _ => false,
        }
    }
}

fn unary_op_text(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::UnaryPlusExpr => "+",
        NodeKind::UnaryMinusExpr => "-",
        NodeKind::NotExpr => "!",
        NodeKind::BitNotExpr => "~",
        NodeKind::DerefExpr => "*",
        NodeKind::AddrOfExpr => "&",
        NodeKind::PreIncExpr => "++",
        NodeKind::PreDecExpr => "--",
        _ => "?",
    }
}
