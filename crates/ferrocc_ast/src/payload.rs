/// Storage-class / qualifier bits collected off a declaration's
/// declaration-specifiers (spec.md §4.E.4). Kept as a small flag struct
/// rather than four separate `bool` fields scattered across `Payload`
/// variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeclFlags {
    pub is_typedef: bool,
    pub is_static: bool,
    pub is_extern: bool,
    pub is_inline: bool,
    pub is_register: bool,
    pub is_const: bool,
    pub is_volatile: bool,
    pub is_restrict: bool,
    pub is_atomic: bool,
    pub is_thread_local: bool,
}

/// Per-kind payload data for a [`crate::Node`]. Children that are themselves
/// nodes live in `Node::children`, in the order documented on each variant
/// below (spec.md §3.4); `Payload` only carries the leaf data a child vector
/// can't (names, literal values, flags).
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No payload beyond children (e.g. `CompoundStmt`, `NullStmt`,
    /// `BreakStmt`, `ContinueStmt`, `ParamList` without a name).
    None,

    /// `Identifier`, a bare `Attribute` name, a `LabelStmt`/`GotoStmt`
    /// target, or a struct/union/enum tag.
    Name(String),

    /// `IntegerLiteral`. `is_unsigned`/`long_count` mirror the suffix the
    /// lexer decoded (spec.md §9's "numeric literal suffixes" resolution).
    Integer {
        value: u64,
        is_unsigned: bool,
        long_count: u8,
    },

    /// `FloatLiteral`. `is_float` picks `f32` vs `f64` lowering.
    Float { value: f64, is_float: bool },

    /// `StringLiteral`, already escape-decoded by the lexer.
    Str(String),

    /// `CharLiteral`.
    Char(u32),

    /// Declarations: `FunctionDecl`/`FunctionProto` (children: params...,
    /// then body if present), `VarDecl` (children: \[type, init?\]),
    /// `ParamDecl` (children: \[type\]), `TypedefDecl` (children: \[type\]).
    Decl { name: String, flags: DeclFlags },

    /// `StructDecl`/`UnionDecl`/`EnumDecl` tag name, if any (anonymous
    /// aggregates carry `None`). Children: field/constant declarations.
    Tag { name: Option<String> },

    /// `FieldDecl` (children: \[type\]); `BitfieldDecl` additionally carries
    /// the declared bit width (children: \[type, width_expr\]).
    Field { name: String },

    /// `EnumConstant` (children: \[value_expr?\]).
    EnumConstant { name: String },

    /// `BuiltinType`/derived type nodes: the spelled name plus the
    /// qualifier flags spec.md §3.4 calls `{size, is_signed, is_const,
    /// is_volatile}`. `size` is the type's width in bits, 0 when unknown
    /// (aggregate/typedef — resolved later by `ferrocc_codegen::layout`).
    Type {
        name: String,
        size: u32,
        is_signed: bool,
        flags: DeclFlags,
    },

    /// `ArrayType` (children: \[element_type, size_expr?\]).
    ArrayType { is_variable_length: bool },

    /// `FunctionType`/`ParamList` variadic flag (spec.md §4.E.4: "the
    /// variadic flag stored on the parameter-list node").
    FunctionType { is_variadic: bool },

    /// `ForStmt` — each clause of `for (init; cond; inc)` is independently
    /// optional, so which of the (up to three) leading children are
    /// present can't be told apart by child count or node kind alone
    /// (a lone remaining child could be `cond` or `inc`). Children, in
    /// order: whichever of \[init?, cond?, inc?\] these flags say are
    /// present, then `body` always last.
    ForHeader {
        has_init: bool,
        has_cond: bool,
        has_inc: bool,
    },

    /// Binary operator expressions: `op` is kept for printing/diagnostics
    /// even though the node's `kind` already dispatches without a string
    /// compare (spec.md §3.4). Children: \[left, right\].
    Binary { op: &'static str },

    /// Unary/postfix operator expressions. Children: \[operand\].
    Unary { op: &'static str },

    /// `MemberExpr`/`ArrowExpr`. Children: \[object\].
    Member { field: String },

    /// `CallExpr`. Children: \[callee, arg...\].
    Call,

    /// `CastExpr`/`CompoundLiteralExpr`/`SizeofTypeExpr`/`AlignofExpr`
    /// applied to a type name. Children: \[type, operand_or_init?\].
    TypeOperand,

    /// `ConditionalExpr`. Children: \[cond, then, else\].
    Conditional,

    /// `DesignatedInitExpr` — `.field = v` or `[i] = v`. `field` is set for
    /// the former, `None` for the latter (the index expression is a
    /// child). Children: \[index_expr?, value\].
    Designated { field: Option<String> },

    /// `GenericAssoc` — one `type: expr` (or `default: expr`) arm of a
    /// `_Generic`. Children: \[type?, expr\].
    GenericAssoc { is_default: bool },

    /// `StaticAssertDecl`. Children: \[condition\]; `message` is the
    /// string literal's decoded text.
    StaticAssert { message: String },

    /// `AsmStmt`: the template string, `is_volatile`, and the raw clobber
    /// list (spec.md §4.E.7: operands are parsed then discarded).
    Asm {
        template: String,
        is_volatile: bool,
        clobbers: Vec<String>,
    },

    /// `AttributeList`/`Attribute` — the vendor `__attribute__((...))`
    /// annotation is recognized and skipped (spec.md §4.E.7), so only the
    /// raw token text between the outer parens is retained for debugging.
    Attribute { raw: String },
}
