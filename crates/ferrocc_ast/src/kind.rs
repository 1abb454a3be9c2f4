/// The tag of an [`crate::Node`] — spec.md §3.4's "~140 node kinds", grouped
/// the way `original_source/src/common/types.h`'s `ASTNodeType` enum groups
/// them (declarations, statements, expressions, types, literals). The
/// original's LLVM-level node kinds (`AST_ALLOCA`, `AST_GEP`, `AST_PHI`, ...)
/// have no counterpart here: `ferrocc_codegen` builds `inkwell` values
/// directly during lowering rather than representing IR as AST nodes, so
/// there is nothing for this enum to name for that tier — see DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // ---- top level ----
    TranslationUnit,

    // ---- declarations ----
    FunctionDecl,
    FunctionProto,
    ParamDecl,
    ParamList,
    VarDecl,
    TypedefDecl,
    StructDecl,
    UnionDecl,
    EnumDecl,
    EnumConstant,
    FieldDecl,
    BitfieldDecl,

    // ---- statements ----
    CompoundStmt,
    ExprStmt,
    DeclStmt,
    NullStmt,
    IfStmt,
    WhileStmt,
    DoWhileStmt,
    ForStmt,
    SwitchStmt,
    CaseStmt,
    DefaultStmt,
    ReturnStmt,
    BreakStmt,
    ContinueStmt,
    GotoStmt,
    LabelStmt,
    AsmStmt,
    AsmOperand,
    AttributeStmt,

    // ---- binary expressions (spec.md §3.4: specialized kinds so lowering
    // dispatches without a string compare) ----
    AddExpr,
    SubExpr,
    MulExpr,
    DivExpr,
    ModExpr,
    AndExpr,
    OrExpr,
    XorExpr,
    ShlExpr,
    ShrExpr,
    LogicalAndExpr,
    LogicalOrExpr,
    EqExpr,
    NeExpr,
    LtExpr,
    LeExpr,
    GtExpr,
    GeExpr,

    // ---- assignment expressions ----
    AssignExpr,
    AddAssignExpr,
    SubAssignExpr,
    MulAssignExpr,
    DivAssignExpr,
    ModAssignExpr,
    AndAssignExpr,
    OrAssignExpr,
    XorAssignExpr,
    ShlAssignExpr,
    ShrAssignExpr,

    // ---- unary expressions ----
    UnaryPlusExpr,
    UnaryMinusExpr,
    NotExpr,
    BitNotExpr,
    DerefExpr,
    AddrOfExpr,
    PreIncExpr,
    PreDecExpr,
    PostIncExpr,
    PostDecExpr,

    // ---- other expressions ----
    CallExpr,
    CastExpr,
    MemberExpr,
    ArrowExpr,
    ArraySubscriptExpr,
    ConditionalExpr,
    CommaExpr,
    SizeofExpr,
    SizeofTypeExpr,
    AlignofExpr,
    OffsetofExpr,
    VaArgExpr,
    CompoundLiteralExpr,
    InitListExpr,
    DesignatedInitExpr,
    GenericExpr,
    GenericAssoc,
    StaticAssertDecl,
    StatementExpr,
    AddrOfLabelExpr,
    BuiltinTypesCompatibleExpr,
    BuiltinChooseExpr,
    BuiltinExpectExpr,

    // ---- literals & names ----
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,
    Identifier,

    // ---- types ----
    BuiltinType,
    PointerType,
    ArrayType,
    FunctionType,
    StructType,
    UnionType,
    EnumType,
    TypedefType,
    AtomicType,

    // ---- attributes ----
    Attribute,
    AttributeList,
}

impl NodeKind {
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDecl
                | NodeKind::FunctionProto
                | NodeKind::ParamDecl
                | NodeKind::ParamList
                | NodeKind::VarDecl
                | NodeKind::TypedefDecl
                | NodeKind::StructDecl
                | NodeKind::UnionDecl
                | NodeKind::EnumDecl
                | NodeKind::EnumConstant
                | NodeKind::FieldDecl
                | NodeKind::BitfieldDecl
        )
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::CompoundStmt
                | NodeKind::ExprStmt
                | NodeKind::DeclStmt
                | NodeKind::NullStmt
                | NodeKind::IfStmt
                | NodeKind::WhileStmt
                | NodeKind::DoWhileStmt
                | NodeKind::ForStmt
                | NodeKind::SwitchStmt
                | NodeKind::CaseStmt
                | NodeKind::DefaultStmt
                | NodeKind::ReturnStmt
                | NodeKind::BreakStmt
                | NodeKind::ContinueStmt
                | NodeKind::GotoStmt
                | NodeKind::LabelStmt
                | NodeKind::AsmStmt
                | NodeKind::AsmOperand
                | NodeKind::AttributeStmt
        )
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            NodeKind::BuiltinType
                | NodeKind::PointerType
                | NodeKind::ArrayType
                | NodeKind::FunctionType
                | NodeKind::StructType
                | NodeKind::UnionType
                | NodeKind::EnumType
                | NodeKind::TypedefType
                | NodeKind::AtomicType
        )
    }
}
