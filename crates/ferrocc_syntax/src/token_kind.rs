/// A tagged token category, numbered per spec.md §3.3: special tokens occupy
/// 0–99, keywords 100–299, operators 300–499, punctuation 500–699. Grouping by
/// numeric range lets the diagnostics layer answer "what category is this
/// token?" with a single range test instead of a table lookup.
///
/// `#[repr(u16)]` pins the discriminants so `as u16` round-trips through the
/// range boundaries below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TokenKind {
    // ---- special: 0-99 ----
    Eof = 0,
    Error = 1,
    Identifier = 10,
    IntegerLiteral = 11,
    FloatLiteral = 12,
    StringLiteral = 13,
    CharLiteral = 14,

    // ---- keywords: 100-299 ----
    KwAuto = 100,
    KwBreak,
    KwCase,
    KwChar,
    KwConst,
    KwContinue,
    KwDefault,
    KwDo,
    KwDouble,
    KwElse,
    KwEnum,
    KwExtern,
    KwFloat,
    KwFor,
    KwGoto,
    KwIf,
    KwInline,
    KwInt,
    KwLong,
    KwRegister,
    KwRestrict,
    KwReturn,
    KwShort,
    KwSigned,
    KwSizeof,
    KwStatic,
    KwStruct,
    KwSwitch,
    KwTypedef,
    KwUnion,
    KwUnsigned,
    KwVoid,
    KwVolatile,
    KwWhile,
    // C99/C11
    KwBool,
    KwComplex,
    KwImaginary,
    KwAlignas,
    KwAlignof,
    KwAtomic,
    KwGeneric,
    KwNoreturn,
    KwStaticAssert,
    KwThreadLocal,
    // GNU/Clang extensions seen pervasively in real headers
    KwAsm,
    KwAttribute,
    KwExtension,
    KwTypeof,
    KwInline2,   // __inline / __inline__
    KwRestrict2, // __restrict / __restrict__
    KwConst2,    // __const
    KwVolatile2, // __volatile / __volatile__
    KwBuiltinOffsetof,
    KwBuiltinVaArg,
    KwBuiltinTypesCompatibleP,
    KwBuiltinChooseExpr,
    KwBuiltinExpect,
    KwLabel, // __label__ (for computed goto local labels)
    KeywordMax = 299,

    // ---- operators: 300-499 ----
    Plus = 300,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Less,
    Greater,
    Assign,
    LogicalAnd,
    LogicalOr,
    Shl,
    Shr,
    Eq,
    Ne,
    Le,
    Ge,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    ShlAssign,
    ShrAssign,
    Increment,
    Decrement,
    Arrow,
    OperatorMax = 499,

    // ---- punctuation: 500-699 ----
    LParen = 500,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    Colon,
    Question,
    Hash,
    HashHash,
    PunctuationMax = 699,

    // ---- comments/whitespace (not emitted as tokens, reserved) ----
    Comment = 700,
    Whitespace = 701,
    Newline = 702,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        (100..=299).contains(&(self as u16))
    }

    pub fn is_operator(self) -> bool {
        (300..=499).contains(&(self as u16))
    }

    pub fn is_punctuation(self) -> bool {
        (500..=699).contains(&(self as u16))
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::StringLiteral
                | TokenKind::CharLiteral
        )
    }
}
