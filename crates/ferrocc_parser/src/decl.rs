//! Declarations, declarators and type names — spec.md §4.E.4/§4.E.5.
//!
//! A declarator is parsed into a small [`Declarator`] skeleton (pointer
//! levels, a name-or-nested-declarator core, and array/function suffixes)
//! and only then folded against a base type into an actual
//! [`ferrocc_ast`] type tree. Parsing the skeleton first and building the
//! type second is what makes `int (*p)[3]` and `int (*f(void))[3]`
//! resolvable without backtracking: the shape is known before any type
//! node is allocated.

use crate::error::ParseError;
use crate::Parser;
use ferrocc_ast::{DeclFlags, NodeId, NodeKind, Payload};
use ferrocc_diag::SourceLocation;
use ferrocc_syntax::TokenKind;

pub(crate) enum Core {
    Name(String),
    Nested(Box<Declarator>),
    Abstract,
}

pub(crate) enum Suffix {
    Array(Option<NodeId>),
    Function(Vec<NodeId>, bool),
}

pub(crate) struct Declarator {
    pointers: Vec<DeclFlags>,
    core: Core,
    suffixes: Vec<Suffix>,
}

impl<'a> Parser<'a> {
    // ---- top level ----

    /// `external-declaration`: a function definition, a declaration, or a
    /// file-scope `_Static_assert`. Returns an empty `Vec` for constructs
    /// that are recognized and consumed but produce no AST node (a lone
    /// `;`, a skipped `__attribute__` on its own), and more than one node
    /// for a comma-separated declarator list (`int a, *b;` is two sibling
    /// `VarDecl`s, not one node hiding the rest — each gets its own spot
    /// as a child of the translation unit, same as a block-scope
    /// `DeclStmt` keeps every declarator reachable from the tree).
    pub(crate) fn parse_external_declaration(&mut self) -> Result<Vec<NodeId>, ParseError> {
        if self.eat(TokenKind::Semicolon) {
            return Ok(Vec::new());
        }
        self.skip_attributes();
        if self.check(TokenKind::KwStaticAssert) {
            return Ok(vec![self.parse_static_assert()?]);
        }
        if self.check(TokenKind::KwAsm) {
            return Ok(vec![self.parse_asm_statement()?]);
        }

        let loc = self.location();
        let (base_type, flags) = self.parse_declaration_specifiers()?;

        if flags.is_typedef {
            return self.finish_typedef(loc, base_type);
        }

        if self.eat(TokenKind::Semicolon) {
            // A bare `struct Foo;` or `int;` — the specifier parse already
            // registered any struct/union/enum tag, nothing more to do.
            return Ok(vec![base_type]);
        }

        let declarator = self.parse_declarator()?;
        let (name, full_type) = build_type(declarator, base_type, &mut self.arena);

        if self.check(TokenKind::LBrace) {
            return Ok(vec![self.finish_function_definition(loc, name, full_type, flags)?]);
        }

        self.finish_declaration(loc, name, full_type, flags)
    }

    fn finish_typedef(&mut self, loc: SourceLocation, base_type: NodeId) -> Result<Vec<NodeId>, ParseError> {
        let declarator = self.parse_declarator()?;
        let (name, full_type) = build_type(declarator, base_type, &mut self.arena);
        self.typedefs.declare(&name);
        let node = self.arena.push(
            NodeKind::TypedefDecl,
            loc,
            Payload::Decl { name, flags: DeclFlags::default() },
        );
        self.arena.add_child(node, full_type);
        let mut nodes = vec![node];
        while self.eat(TokenKind::Comma) {
            let declarator = self.parse_declarator()?;
            let (name, full_type) = build_type(declarator, base_type, &mut self.arena);
            self.typedefs.declare(&name);
            let extra = self.arena.push(
                NodeKind::TypedefDecl,
                loc,
                Payload::Decl { name, flags: DeclFlags::default() },
            );
            self.arena.add_child(extra, full_type);
            nodes.push(extra);
        }
        self.expect(TokenKind::Semicolon, "`;` after typedef")?;
        Ok(nodes)
    }

    fn finish_function_definition(
        &mut self,
        loc: SourceLocation,
        name: String,
        full_type: NodeId,
        flags: DeclFlags,
    ) -> Result<NodeId, ParseError> {
        let node = self.arena.push(NodeKind::FunctionDecl, loc, Payload::Decl { name, flags });
        self.arena.add_child(node, full_type);
        self.typedefs.push();
        let body = self.parse_compound_statement()?;
        self.typedefs.pop();
        self.arena.add_child(node, body);
        Ok(node)
    }

    fn finish_declaration(
        &mut self,
        loc: SourceLocation,
        name: String,
        full_type: NodeId,
        flags: DeclFlags,
    ) -> Result<Vec<NodeId>, ParseError> {
        let is_function = matches!(self.arena.get(full_type).kind, NodeKind::FunctionType);
        let kind = if is_function {
            NodeKind::FunctionProto
        } else {
            NodeKind::VarDecl
        };
        let node = self.arena.push(kind, loc, Payload::Decl { name, flags });
        self.arena.add_child(node, full_type);
        if self.eat(TokenKind::Assign) {
            let init = self.parse_initializer()?;
            self.arena.add_child(node, init);
        }
        let mut nodes = vec![node];
        while self.eat(TokenKind::Comma) {
            let declarator = self.parse_declarator()?;
            // NB: each base type read is shared structurally; distinct
            // declarators in one `int a, *b;` each get their own pointer
            // wrapping but the same underlying base-type node, matching
            // how the original shares one parsed base type across a
            // declarator list.
            let (extra_name, extra_type) = build_type(declarator, full_type_base(self, full_type), &mut self.arena);
            let extra_is_function = matches!(self.arena.get(extra_type).kind, NodeKind::FunctionType);
            let extra_kind = if extra_is_function {
                NodeKind::FunctionProto
            } else {
                NodeKind::VarDecl
            };
            let extra = self.arena.push(
                extra_kind,
                loc,
                Payload::Decl { name: extra_name, flags },
            );
            self.arena.add_child(extra, extra_type);
            if self.eat(TokenKind::Assign) {
                let init = self.parse_initializer()?;
                self.arena.add_child(extra, init);
            }
            nodes.push(extra);
        }
        self.expect(TokenKind::Semicolon, "`;` after declaration")?;
        Ok(nodes)
    }

    // ---- declaration-specifiers ----

    /// Consumes storage-class specifiers, type qualifiers, and type
    /// specifiers in any order (C allows `const unsigned static long int`)
    /// and folds them into one base-type node plus the storage flags.
    pub(crate) fn parse_declaration_specifiers(&mut self) -> Result<(NodeId, DeclFlags), ParseError> {
        let loc = self.location();
        let mut flags = DeclFlags::default();
        let mut words: Vec<&'static str> = Vec::new();
        let mut tag_node: Option<NodeId> = None;
        let mut typedef_name: Option<String> = None;

        loop {
            match self.current().kind {
                TokenKind::KwTypedef => { flags.is_typedef = true; self.advance(); }
                TokenKind::KwStatic => { flags.is_static = true; self.advance(); }
                TokenKind::KwExtern => { flags.is_extern = true; self.advance(); }
                TokenKind::KwInline | TokenKind::KwInline2 => { flags.is_inline = true; self.advance(); }
                TokenKind::KwRegister => { flags.is_register = true; self.advance(); }
                TokenKind::KwThreadLocal => { flags.is_thread_local = true; self.advance(); }
                TokenKind::KwConst | TokenKind::KwConst2 => { flags.is_const = true; self.advance(); }
                TokenKind::KwVolatile | TokenKind::KwVolatile2 => { flags.is_volatile = true; self.advance(); }
                TokenKind::KwRestrict | TokenKind::KwRestrict2 => { flags.is_restrict = true; self.advance(); }
                TokenKind::KwAtomic if self.peek(1).kind != TokenKind::LParen => {
                    flags.is_atomic = true;
                    self.advance();
                }
                TokenKind::KwAtomic => {
                    // `_Atomic(T)` type-operator form.
                    self.advance();
                    self.advance();
                    let (inner, _) = self.parse_declaration_specifiers_inline()?;
                    self.expect(TokenKind::RParen, "`)` closing `_Atomic(...)`")?;
                    tag_node = Some(inner);
                    flags.is_atomic = true;
                }
                TokenKind::KwVoid => { words.push("void"); self.advance(); }
                TokenKind::KwChar => { words.push("char"); self.advance(); }
                TokenKind::KwShort => { words.push("short"); self.advance(); }
                TokenKind::KwInt => { words.push("int"); self.advance(); }
                TokenKind::KwLong => { words.push("long"); self.advance(); }
                TokenKind::KwFloat => { words.push("float"); self.advance(); }
                TokenKind::KwDouble => { words.push("double"); self.advance(); }
                TokenKind::KwSigned => { words.push("signed"); self.advance(); }
                TokenKind::KwUnsigned => { words.push("unsigned"); self.advance(); }
                TokenKind::KwBool => { words.push("_Bool"); self.advance(); }
                TokenKind::KwComplex => { words.push("_Complex"); self.advance(); }
                TokenKind::KwStruct => {
                    tag_node = Some(self.parse_struct_or_union_specifier(NodeKind::StructType)?);
                }
                TokenKind::KwUnion => {
                    tag_node = Some(self.parse_struct_or_union_specifier(NodeKind::UnionType)?);
                }
                TokenKind::KwEnum => {
                    tag_node = Some(self.parse_enum_specifier()?);
                }
                TokenKind::KwTypeof => {
                    self.advance();
                    self.expect(TokenKind::LParen, "`(` after `typeof`")?;
                    // `typeof` applied to a type or an expression; either
                    // way we only need *a* type node to carry the
                    // qualifiers onward, so parse permissively.
                    let inner = if self.at_type_start_at(0) {
                        self.parse_type_name()?
                    } else {
                        self.parse_expression()?
                    };
                    self.expect(TokenKind::RParen, "`)` closing `typeof`")?;
                    tag_node = Some(inner);
                }
                TokenKind::Identifier if tag_node.is_none() && words.is_empty() && self.typedefs.is_type_name(&self.current().lexeme) => {
                    typedef_name = Some(self.advance().lexeme.clone());
                }
                TokenKind::KwAttribute => {
                    self.skip_attributes();
                }
                _ => break,
            }
        }

        if let Some(tag) = tag_node {
            return Ok((tag, flags));
        }
        if let Some(name) = typedef_name {
            let node = self.arena.push(
                NodeKind::TypedefType,
                loc,
                Payload::Type { name, size: 0, is_signed: true, flags },
            );
            return Ok((node, flags));
        }

        let (name, size, is_signed) = resolve_builtin_spelling(&words);
        let node = self.arena.push(
            NodeKind::BuiltinType,
            loc,
            Payload::Type { name, size, is_signed, flags },
        );
        Ok((node, flags))
    }

    fn parse_declaration_specifiers_inline(&mut self) -> Result<(NodeId, DeclFlags), ParseError> {
        self.parse_declaration_specifiers()
    }

    /// `struct`/`union` specifier: `struct [tag] { member... }`, `struct
    /// tag { ... }`, or a bare forward reference `struct tag`. A body's
    /// field declarations become children of the returned node directly
    /// (rather than a separate, discarded declaration node) so the same
    /// node serves both as the type reference threaded into a declarator
    /// and as the definition itself when this specifier stands alone as
    /// a top-level declaration (`struct Point { ... };`); a reference with
    /// no body has no children and is resolved by tag name later.
    fn parse_struct_or_union_specifier(&mut self, type_kind: NodeKind) -> Result<NodeId, ParseError> {
        let loc = self.location();
        self.advance();
        self.skip_attributes();
        let tag = if self.check(TokenKind::Identifier) {
            Some(self.advance().lexeme.clone())
        } else {
            None
        };

        if self.check(TokenKind::LBrace) {
            self.advance();
            let node = self.arena.push(type_kind, loc, Payload::Tag { name: tag });
            while !self.check(TokenKind::RBrace) && !self.is_eof() {
                if self.eat(TokenKind::Semicolon) {
                    continue;
                }
                let field = self.parse_field_declaration()?;
                for f in field {
                    self.arena.add_child(node, f);
                }
            }
            self.expect(TokenKind::RBrace, "`}` closing struct/union body")?;
            return Ok(node);
        }

        Ok(self.arena.push(type_kind, loc, Payload::Tag { name: tag }))
    }

    fn parse_field_declaration(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let loc = self.location();
        let (base_type, _flags) = self.parse_declaration_specifiers()?;
        let mut fields = Vec::new();
        loop {
            let declarator = self.parse_declarator()?;
            let (name, field_type) = build_type(declarator, base_type, &mut self.arena);
            if self.eat(TokenKind::Colon) {
                let width = self.parse_conditional_expression_for_bitfield()?;
                let node = self.arena.push(NodeKind::BitfieldDecl, loc, Payload::Field { name });
                self.arena.add_child(node, field_type);
                self.arena.add_child(node, width);
                fields.push(node);
            } else {
                let node = self.arena.push(NodeKind::FieldDecl, loc, Payload::Field { name });
                self.arena.add_child(node, field_type);
                fields.push(node);
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Semicolon, "`;` after field declaration")?;
        Ok(fields)
    }

    fn parse_conditional_expression_for_bitfield(&mut self) -> Result<NodeId, ParseError> {
        self.parse_assignment()
    }

    fn parse_enum_specifier(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.location();
        self.advance();
        let tag = if self.check(TokenKind::Identifier) {
            Some(self.advance().lexeme.clone())
        } else {
            None
        };

        if self.check(TokenKind::LBrace) {
            self.advance();
            // As with struct/union (see `parse_struct_or_union_specifier`),
            // the enumerator constants become children of the returned
            // `EnumType` node directly, not a separate discarded node.
            let node = self.arena.push(NodeKind::EnumType, loc, Payload::Tag { name: tag });
            loop {
                if self.check(TokenKind::RBrace) {
                    break;
                }
                let const_loc = self.location();
                let const_name = self.expect(TokenKind::Identifier, "enumerator name")?.lexeme.clone();
                let constant = self.arena.push(
                    NodeKind::EnumConstant,
                    const_loc,
                    Payload::EnumConstant { name: const_name },
                );
                if self.eat(TokenKind::Assign) {
                    let value = self.parse_assignment()?;
                    self.arena.add_child(constant, value);
                }
                self.arena.add_child(node, constant);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RBrace, "`}` closing enum body")?;
            return Ok(node);
        }

        Ok(self.arena.push(NodeKind::EnumType, loc, Payload::Tag { name: tag }))
    }

    // ---- declarators ----

    pub(crate) fn parse_declarator(&mut self) -> Result<Declarator, ParseError> {
        let pointers = self.parse_pointer_levels()?;
        let core = self.parse_declarator_core()?;
        let suffixes = self.parse_declarator_suffixes()?;
        Ok(Declarator { pointers, core, suffixes })
    }

    fn parse_pointer_levels(&mut self) -> Result<Vec<DeclFlags>, ParseError> {
        let mut levels = Vec::new();
        while self.eat(TokenKind::Star) {
            let mut flags = DeclFlags::default();
            loop {
                match self.current().kind {
                    TokenKind::KwConst | TokenKind::KwConst2 => { flags.is_const = true; self.advance(); }
                    TokenKind::KwVolatile | TokenKind::KwVolatile2 => { flags.is_volatile = true; self.advance(); }
                    TokenKind::KwRestrict | TokenKind::KwRestrict2 => { flags.is_restrict = true; self.advance(); }
                    TokenKind::KwAttribute => self.skip_attributes(),
                    _ => break,
                }
            }
            levels.push(flags);
        }
        Ok(levels)
    }

    fn parse_declarator_core(&mut self) -> Result<Core, ParseError> {
        if self.check(TokenKind::Identifier) {
            return Ok(Core::Name(self.advance().lexeme.clone()));
        }
        if self.check(TokenKind::LParen) {
            // A parenthesized group is a nested declarator unless what
            // follows looks like a parameter list (`()`, `(void)`, or a
            // type-starting token) — in which case these parens are an
            // abstract declarator's function suffix, handled by the
            // suffix loop instead.
            let looks_like_params =
                self.peek(1).kind == TokenKind::RParen || self.at_type_start_at(1);
            if !looks_like_params {
                self.advance();
                let inner = self.parse_declarator()?;
                self.expect(TokenKind::RParen, "`)` closing declarator group")?;
                return Ok(Core::Nested(Box::new(inner)));
            }
        }
        Ok(Core::Abstract)
    }

    fn parse_declarator_suffixes(&mut self) -> Result<Vec<Suffix>, ParseError> {
        let mut suffixes = Vec::new();
        loop {
            if self.eat(TokenKind::LBracket) {
                // Leading qualifiers/`static` inside `[]` (C99 VLA
                // parameter syntax) are accepted and discarded; ferrocc
                // treats every array parameter as decaying to a pointer
                // regardless.
                while matches!(
                    self.current().kind,
                    TokenKind::KwStatic | TokenKind::KwConst | TokenKind::KwVolatile | TokenKind::KwRestrict
                ) {
                    self.advance();
                }
                let size = if self.check(TokenKind::RBracket) {
                    None
                } else if self.eat(TokenKind::Star) {
                    None
                } else {
                    Some(self.parse_assignment()?)
                };
                self.expect(TokenKind::RBracket, "`]` closing array declarator")?;
                suffixes.push(Suffix::Array(size));
            } else if self.eat(TokenKind::LParen) {
                let (params, variadic) = self.parse_parameter_list()?;
                self.expect(TokenKind::RParen, "`)` closing parameter list")?;
                suffixes.push(Suffix::Function(params, variadic));
            } else {
                break;
            }
        }
        Ok(suffixes)
    }

    /// `parameter-type-list`: zero or more parameter declarations, with an
    /// optional trailing `...` marking the function variadic. `(void)`
    /// is recognized as "no parameters", not a single `void` parameter.
    fn parse_parameter_list(&mut self) -> Result<(Vec<NodeId>, bool), ParseError> {
        let mut params = Vec::new();
        if self.check(TokenKind::RParen) {
            return Ok((params, false));
        }
        if self.check(TokenKind::KwVoid) && self.peek(1).kind == TokenKind::RParen {
            self.advance();
            return Ok((params, false));
        }
        loop {
            if self.eat(TokenKind::Ellipsis) {
                return Ok((params, true));
            }
            let loc = self.location();
            let (base_type, flags) = self.parse_declaration_specifiers()?;
            let declarator = self.parse_declarator()?;
            let (name, full_type) = build_type(declarator, base_type, &mut self.arena);
            let node = self.arena.push(NodeKind::ParamDecl, loc, Payload::Decl { name, flags });
            self.arena.add_child(node, full_type);
            params.push(node);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok((params, false))
    }

    // ---- type names (abstract declarators, for casts/sizeof/_Alignof) ----

    pub(crate) fn parse_type_name(&mut self) -> Result<NodeId, ParseError> {
        let (base_type, _) = self.parse_declaration_specifiers()?;
        let declarator = self.parse_declarator()?;
        let (_, full_type) = build_type(declarator, base_type, &mut self.arena);
        Ok(full_type)
    }

    // ---- initializers ----

    pub(crate) fn parse_initializer(&mut self) -> Result<NodeId, ParseError> {
        if self.check(TokenKind::LBrace) {
            return self.parse_initializer_list();
        }
        self.parse_assignment()
    }

    fn parse_initializer_list(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.location();
        self.advance();
        let node = self.arena.push(NodeKind::InitListExpr, loc, Payload::None);
        while !self.check(TokenKind::RBrace) && !self.is_eof() {
            let entry = if self.check(TokenKind::Dot) || self.check(TokenKind::LBracket) {
                self.parse_designated_initializer()?
            } else {
                self.parse_initializer()?
            };
            self.arena.add_child(node, entry);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}` closing initializer list")?;
        Ok(node)
    }

    fn parse_designated_initializer(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.location();
        let (field, index) = if self.eat(TokenKind::Dot) {
            let name = self.expect(TokenKind::Identifier, "designator field name")?.lexeme.clone();
            (Some(name), None)
        } else {
            self.advance();
            let idx = self.parse_assignment()?;
            self.expect(TokenKind::RBracket, "`]` closing array designator")?;
            (None, Some(idx))
        };
        self.expect(TokenKind::Assign, "`=` in designated initializer")?;
        let value = self.parse_initializer()?;
        let node = self.arena.push(NodeKind::DesignatedInitExpr, loc, Payload::Designated { field });
        if let Some(idx) = index {
            self.arena.add_child(node, idx);
        }
        self.arena.add_child(node, value);
        Ok(node)
    }

    // ---- misc top-level constructs ----

    pub(crate) fn parse_static_assert(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.location();
        self.advance();
        self.expect(TokenKind::LParen, "`(` after `_Static_assert`")?;
        let cond = self.parse_assignment()?;
        let message = if self.eat(TokenKind::Comma) {
            match &self.expect(TokenKind::StringLiteral, "assertion message")?.value {
                ferrocc_lexer::LiteralValue::Str(s) => s.clone(),
                _ => String::new(),
            }
        } else {
            String::new()
        };
        self.expect(TokenKind::RParen, "`)` closing `_Static_assert`")?;
        self.expect(TokenKind::Semicolon, "`;` after `_Static_assert`")?;
        let node = self.arena.push(NodeKind::StaticAssertDecl, loc, Payload::StaticAssert { message });
        self.arena.add_child(node, cond);
        Ok(node)
    }

    /// `__asm__("template" : outputs : inputs : clobbers);` — operands are
    /// parsed (so the token stream stays balanced) but, like the original,
    /// not interpreted: ferrocc doesn't generate or schedule around
    /// inline asm (spec.md §4.E.7's explicit non-goal for operand
    /// semantics).
    pub(crate) fn parse_asm_statement(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.location();
        self.advance();
        let is_volatile = self.eat(TokenKind::KwVolatile) || self.eat(TokenKind::KwVolatile2);
        self.expect(TokenKind::LParen, "`(` after `asm`")?;
        let template = match &self.expect(TokenKind::StringLiteral, "asm template string")?.value {
            ferrocc_lexer::LiteralValue::Str(s) => s.clone(),
            _ => String::new(),
        };
        let mut clobbers = Vec::new();
        for _ in 0..3 {
            if !self.eat(TokenKind::Colon) {
                break;
            }
            loop {
                if self.check(TokenKind::Colon) || self.check(TokenKind::RParen) {
                    break;
                }
                if self.check(TokenKind::StringLiteral) {
                    if let ferrocc_lexer::LiteralValue::Str(s) = &self.advance().value {
                        clobbers.push(s.clone());
                    }
                } else if self.check(TokenKind::LParen) {
                    self.advance();
                    let _ = self.parse_expression()?;
                    self.expect(TokenKind::RParen, "`)` closing asm operand")?;
                } else {
                    self.advance();
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "`)` closing `asm`")?;
        self.expect(TokenKind::Semicolon, "`;` after `asm`")?;
        Ok(self
            .arena
            .push(NodeKind::AsmStmt, loc, Payload::Asm { template, is_volatile, clobbers }))
    }

    /// Skips one or more `__attribute__((...))` annotations, balancing
    /// parens so arbitrary content inside doesn't confuse the cursor
    /// (spec.md §4.E.7: attributes are recognized syntax, not semantics).
    pub(crate) fn skip_attributes(&mut self) {
        while self.check(TokenKind::KwAttribute) {
            self.advance();
            if self.eat(TokenKind::LParen) {
                let mut depth = 1;
                while depth > 0 && !self.is_eof() {
                    if self.check(TokenKind::LParen) {
                        depth += 1;
                    } else if self.check(TokenKind::RParen) {
                        depth -= 1;
                    }
                    self.advance();
                }
            }
        }
    }
}

/// Resolves a bag of type-specifier keywords (`unsigned`, `long`, `long`,
/// `int`, ...) to a canonical spelling, bit width, and signedness, per
/// spec.md §4.F.3's integer-type table. Order doesn't matter to C, so
/// this sorts by counting rather than matching sequences.
fn resolve_builtin_spelling(words: &[&'static str]) -> (String, u32, bool) {
    if words.is_empty() {
        return ("int".to_string(), 32, true);
    }
    let long_count = words.iter().filter(|w| **w == "long").count();
    let has_unsigned = words.contains(&"unsigned");
    let has_signed = words.contains(&"signed");
    let has = |w: &str| words.contains(&w);

    if has("void") {
        return ("void".to_string(), 0, false);
    }
    if has("_Bool") {
        return ("_Bool".to_string(), 8, false);
    }
    if has("float") {
        return ("float".to_string(), 32, true);
    }
    if has("double") {
        return (if long_count > 0 { "long double".to_string() } else { "double".to_string() }, if long_count > 0 { 128 } else { 64 }, true);
    }
    if has("char") {
        return ("char".to_string(), 8, !has_unsigned);
    }
    if has("short") {
        return ("short".to_string(), 16, !has_unsigned);
    }
    if long_count >= 2 {
        return ("long long".to_string(), 64, !has_unsigned);
    }
    if long_count == 1 {
        return ("long".to_string(), 64, !has_unsigned);
    }
    let _ = has_signed;
    ("int".to_string(), 32, !has_unsigned)
}

/// Folds a parsed [`Declarator`] skeleton against `base` to produce the
/// final type tree and the declared name (empty for abstract
/// declarators). Pointers bind to `base` first (closest to the type
/// named on the left, `int *p[3]` is an array of pointers, not a
/// pointer to an array), then the direct-declarator suffixes wrap that
/// result (`p[3]` binds to `p` tighter than the leading `*` does, same
/// as subscripting binds tighter than dereference in `*p[3]` used as
/// an expression). Both lists apply innermost-first, i.e. the entry
/// closest to the name is applied first. A parenthesized group
/// (`Core::Nested`) hands its fully-built type down as the next `base`,
/// so whatever the outer group's own pointers/suffixes produced becomes
/// what the inner declarator's pointers/suffixes wrap in turn.
pub(crate) fn build_type(declarator: Declarator, base: NodeId, arena: &mut ferrocc_ast::Arena) -> (String, NodeId) {
    let loc = arena.get(base).location;
    let mut t = base;
    for flags in declarator.pointers.into_iter().rev() {
        let node = arena.push(
            NodeKind::PointerType,
            loc,
            Payload::Type { name: "*".to_string(), size: 64, is_signed: false, flags },
        );
        arena.add_child(node, t);
        t = node;
    }
    for suffix in declarator.suffixes.into_iter().rev() {
        t = match suffix {
            Suffix::Array(size) => {
                let node = arena.push(NodeKind::ArrayType, loc, Payload::ArrayType { is_variable_length: false });
                arena.add_child(node, t);
                if let Some(size) = size {
                    arena.add_child(node, size);
                }
                node
            }
            Suffix::Function(params, variadic) => {
                let node = arena.push(NodeKind::FunctionType, loc, Payload::FunctionType { is_variadic: variadic });
                arena.add_child(node, t);
                for p in params {
                    arena.add_child(node, p);
                }
                node
            }
        };
    }
    match declarator.core {
        Core::Name(name) => (name, t),
        Core::Abstract => (String::new(), t),
        Core::Nested(inner) => build_type(*inner, t, arena),
    }
}

/// Finds the innermost (base) type node wrapped by `full_type`'s chain of
/// `PointerType`/`ArrayType`/`FunctionType` nodes, so a second declarator
/// in a comma-separated list (`int a, *b;`) starts from the same base
/// type `a`'s declarator did rather than from `a`'s fully-built type.
fn full_type_base(parser: &Parser<'_>, full_type: NodeId) -> NodeId {
    let mut current = full_type;
    loop {
        let node = parser.arena_ref().get(current);
        match node.kind {
            NodeKind::PointerType | NodeKind::ArrayType | NodeKind::FunctionType => {
                current = node.children[0];
            }
            _ => return current,
        }
    }
}

impl<'a> Parser<'a> {
    pub(crate) fn arena_ref(&self) -> &ferrocc_ast::Arena {
        &self.arena
    }
}
