use crate::token_kind::TokenKind;

/// Associativity for an operator in the precedence table — spec.md §4.B.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
    None,
}

/// One entry in the keyword table: literal text → token kind.
#[derive(Debug, Clone, Copy)]
pub struct KeywordEntry {
    pub text: &'static str,
    pub kind: TokenKind,
}

/// One entry in the operator table: literal text, token kind, precedence,
/// and associativity (spec.md §4.B). The lexer only consults `text`/`kind`;
/// the parser's precedence-climbing loop consults `precedence`/`associativity`.
#[derive(Debug, Clone, Copy)]
pub struct OperatorEntry {
    pub text: &'static str,
    pub kind: TokenKind,
    pub precedence: i32,
    pub associativity: Associativity,
}

/// One entry in the punctuation table: literal text → token kind. No
/// precedence — punctuation never participates in expression climbing.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationEntry {
    pub text: &'static str,
    pub kind: TokenKind,
}

/// The full C99 keyword set plus the built-in type/qualifier keywords, in
/// `original_source/src/syntax/c_syntax.c`'s order. GNU/Clang-only keywords
/// live in [`GNU_KEYWORDS`] so a strict-C99 profile can omit them.
pub const C99_KEYWORDS: &[KeywordEntry] = &[
    kw("auto", TokenKind::KwAuto),
    kw("break", TokenKind::KwBreak),
    kw("case", TokenKind::KwCase),
    kw("char", TokenKind::KwChar),
    kw("const", TokenKind::KwConst),
    kw("continue", TokenKind::KwContinue),
    kw("default", TokenKind::KwDefault),
    kw("do", TokenKind::KwDo),
    kw("double", TokenKind::KwDouble),
    kw("else", TokenKind::KwElse),
    kw("enum", TokenKind::KwEnum),
    kw("extern", TokenKind::KwExtern),
    kw("float", TokenKind::KwFloat),
    kw("for", TokenKind::KwFor),
    kw("goto", TokenKind::KwGoto),
    kw("if", TokenKind::KwIf),
    kw("inline", TokenKind::KwInline),
    kw("int", TokenKind::KwInt),
    kw("long", TokenKind::KwLong),
    kw("register", TokenKind::KwRegister),
    kw("restrict", TokenKind::KwRestrict),
    kw("return", TokenKind::KwReturn),
    kw("short", TokenKind::KwShort),
    kw("signed", TokenKind::KwSigned),
    kw("sizeof", TokenKind::KwSizeof),
    kw("static", TokenKind::KwStatic),
    kw("struct", TokenKind::KwStruct),
    kw("switch", TokenKind::KwSwitch),
    kw("typedef", TokenKind::KwTypedef),
    kw("union", TokenKind::KwUnion),
    kw("unsigned", TokenKind::KwUnsigned),
    kw("void", TokenKind::KwVoid),
    kw("volatile", TokenKind::KwVolatile),
    kw("while", TokenKind::KwWhile),
    kw("_Bool", TokenKind::KwBool),
    kw("_Complex", TokenKind::KwComplex),
    kw("_Imaginary", TokenKind::KwImaginary),
    kw("_Alignas", TokenKind::KwAlignas),
    kw("_Alignof", TokenKind::KwAlignof),
    kw("_Atomic", TokenKind::KwAtomic),
    kw("_Generic", TokenKind::KwGeneric),
    kw("_Noreturn", TokenKind::KwNoreturn),
    kw("_Static_assert", TokenKind::KwStaticAssert),
    kw("_Thread_local", TokenKind::KwThreadLocal),
];

/// GNU/Clang extension keywords seen pervasively in real-world system
/// headers (spec.md §1's motivation for treating the lexer as needing
/// "hundreds of keywords including vendor-specific type names").
pub const GNU_KEYWORDS: &[KeywordEntry] = &[
    kw("asm", TokenKind::KwAsm),
    kw("__asm__", TokenKind::KwAsm),
    kw("__asm", TokenKind::KwAsm),
    kw("__attribute__", TokenKind::KwAttribute),
    kw("__attribute", TokenKind::KwAttribute),
    kw("__extension__", TokenKind::KwExtension),
    kw("typeof", TokenKind::KwTypeof),
    kw("__typeof__", TokenKind::KwTypeof),
    kw("__typeof", TokenKind::KwTypeof),
    kw("__inline__", TokenKind::KwInline2),
    kw("__inline", TokenKind::KwInline2),
    kw("__restrict__", TokenKind::KwRestrict2),
    kw("__restrict", TokenKind::KwRestrict2),
    kw("__const", TokenKind::KwConst2),
    kw("__volatile__", TokenKind::KwVolatile2),
    kw("__volatile", TokenKind::KwVolatile2),
    kw("__builtin_offsetof", TokenKind::KwBuiltinOffsetof),
    kw("__builtin_va_arg", TokenKind::KwBuiltinVaArg),
    kw(
        "__builtin_types_compatible_p",
        TokenKind::KwBuiltinTypesCompatibleP,
    ),
    kw("__builtin_choose_expr", TokenKind::KwBuiltinChooseExpr),
    kw("__builtin_expect", TokenKind::KwBuiltinExpect),
    kw("__label__", TokenKind::KwLabel),
];

/// `C99_KEYWORDS` followed by `GNU_KEYWORDS` — the full vocabulary the
/// `gnu_c11()` profile recognizes. A literal concatenation rather than a
/// runtime `chain()` so `SyntaxDefinition::keywords` can stay a plain
/// `&'static [KeywordEntry]` slice.
pub const GNU_C11_KEYWORDS: &[KeywordEntry] = &[
    kw("auto", TokenKind::KwAuto),
    kw("break", TokenKind::KwBreak),
    kw("case", TokenKind::KwCase),
    kw("char", TokenKind::KwChar),
    kw("const", TokenKind::KwConst),
    kw("continue", TokenKind::KwContinue),
    kw("default", TokenKind::KwDefault),
    kw("do", TokenKind::KwDo),
    kw("double", TokenKind::KwDouble),
    kw("else", TokenKind::KwElse),
    kw("enum", TokenKind::KwEnum),
    kw("extern", TokenKind::KwExtern),
    kw("float", TokenKind::KwFloat),
    kw("for", TokenKind::KwFor),
    kw("goto", TokenKind::KwGoto),
    kw("if", TokenKind::KwIf),
    kw("inline", TokenKind::KwInline),
    kw("int", TokenKind::KwInt),
    kw("long", TokenKind::KwLong),
    kw("register", TokenKind::KwRegister),
    kw("restrict", TokenKind::KwRestrict),
    kw("return", TokenKind::KwReturn),
    kw("short", TokenKind::KwShort),
    kw("signed", TokenKind::KwSigned),
    kw("sizeof", TokenKind::KwSizeof),
    kw("static", TokenKind::KwStatic),
    kw("struct", TokenKind::KwStruct),
    kw("switch", TokenKind::KwSwitch),
    kw("typedef", TokenKind::KwTypedef),
    kw("union", TokenKind::KwUnion),
    kw("unsigned", TokenKind::KwUnsigned),
    kw("void", TokenKind::KwVoid),
    kw("volatile", TokenKind::KwVolatile),
    kw("while", TokenKind::KwWhile),
    kw("_Bool", TokenKind::KwBool),
    kw("_Complex", TokenKind::KwComplex),
    kw("_Imaginary", TokenKind::KwImaginary),
    kw("_Alignas", TokenKind::KwAlignas),
    kw("_Alignof", TokenKind::KwAlignof),
    kw("_Atomic", TokenKind::KwAtomic),
    kw("_Generic", TokenKind::KwGeneric),
    kw("_Noreturn", TokenKind::KwNoreturn),
    kw("_Static_assert", TokenKind::KwStaticAssert),
    kw("_Thread_local", TokenKind::KwThreadLocal),
    kw("asm", TokenKind::KwAsm),
    kw("__asm__", TokenKind::KwAsm),
    kw("__asm", TokenKind::KwAsm),
    kw("__attribute__", TokenKind::KwAttribute),
    kw("__attribute", TokenKind::KwAttribute),
    kw("__extension__", TokenKind::KwExtension),
    kw("typeof", TokenKind::KwTypeof),
    kw("__typeof__", TokenKind::KwTypeof),
    kw("__typeof", TokenKind::KwTypeof),
    kw("__inline__", TokenKind::KwInline2),
    kw("__inline", TokenKind::KwInline2),
    kw("__restrict__", TokenKind::KwRestrict2),
    kw("__restrict", TokenKind::KwRestrict2),
    kw("__const", TokenKind::KwConst2),
    kw("__volatile__", TokenKind::KwVolatile2),
    kw("__volatile", TokenKind::KwVolatile2),
    kw("__builtin_offsetof", TokenKind::KwBuiltinOffsetof),
    kw("__builtin_va_arg", TokenKind::KwBuiltinVaArg),
    kw(
        "__builtin_types_compatible_p",
        TokenKind::KwBuiltinTypesCompatibleP,
    ),
    kw("__builtin_choose_expr", TokenKind::KwBuiltinChooseExpr),
    kw("__builtin_expect", TokenKind::KwBuiltinExpect),
    kw("__label__", TokenKind::KwLabel),
];

const fn kw(text: &'static str, kind: TokenKind) -> KeywordEntry {
    KeywordEntry { text, kind }
}

const fn op(
    text: &'static str,
    kind: TokenKind,
    precedence: i32,
    associativity: Associativity,
) -> OperatorEntry {
    OperatorEntry {
        text,
        kind,
        precedence,
        associativity,
    }
}

const fn punct(text: &'static str, kind: TokenKind) -> PunctuationEntry {
    PunctuationEntry { text, kind }
}

/// Operators, **ordered longest-first** so the lexer's prefix scan finds the
/// longest match (spec.md §4.B / §4.C's ordering guarantee: `<<=` before
/// `<<` before `<`). Precedence follows the 15-level ladder in spec.md
/// §4.E.6, numbered so a higher value binds tighter; assignment and the
/// ternary are right-associative, everything else left-associative.
pub const C_OPERATORS: &[OperatorEntry] = &[
    // 3-char
    op("<<=", TokenKind::ShlAssign, 2, Associativity::Right),
    op(">>=", TokenKind::ShrAssign, 2, Associativity::Right),
    // 2-char
    op("&&", TokenKind::LogicalAnd, 5, Associativity::Left),
    op("||", TokenKind::LogicalOr, 4, Associativity::Left),
    op("<<", TokenKind::Shl, 11, Associativity::Left),
    op(">>", TokenKind::Shr, 11, Associativity::Left),
    op("==", TokenKind::Eq, 9, Associativity::Left),
    op("!=", TokenKind::Ne, 9, Associativity::Left),
    op("<=", TokenKind::Le, 10, Associativity::Left),
    op(">=", TokenKind::Ge, 10, Associativity::Left),
    op("+=", TokenKind::PlusAssign, 2, Associativity::Right),
    op("-=", TokenKind::MinusAssign, 2, Associativity::Right),
    op("*=", TokenKind::StarAssign, 2, Associativity::Right),
    op("/=", TokenKind::SlashAssign, 2, Associativity::Right),
    op("%=", TokenKind::PercentAssign, 2, Associativity::Right),
    op("&=", TokenKind::AmpAssign, 2, Associativity::Right),
    op("|=", TokenKind::PipeAssign, 2, Associativity::Right),
    op("^=", TokenKind::CaretAssign, 2, Associativity::Right),
    op("++", TokenKind::Increment, 14, Associativity::None),
    op("--", TokenKind::Decrement, 14, Associativity::None),
    op("->", TokenKind::Arrow, 14, Associativity::Left),
    // 1-char
    op("+", TokenKind::Plus, 12, Associativity::Left),
    op("-", TokenKind::Minus, 12, Associativity::Left),
    op("*", TokenKind::Star, 13, Associativity::Left),
    op("/", TokenKind::Slash, 13, Associativity::Left),
    op("%", TokenKind::Percent, 13, Associativity::Left),
    op("&", TokenKind::Amp, 8, Associativity::Left),
    op("|", TokenKind::Pipe, 6, Associativity::Left),
    op("^", TokenKind::Caret, 7, Associativity::Left),
    op("~", TokenKind::Tilde, 14, Associativity::None),
    op("!", TokenKind::Bang, 14, Associativity::None),
    op("<", TokenKind::Less, 10, Associativity::Left),
    op(">", TokenKind::Greater, 10, Associativity::Left),
    op("=", TokenKind::Assign, 2, Associativity::Right),
];

/// Punctuation, also **ordered longest-first** (`...` before `.`).
pub const C_PUNCTUATION: &[PunctuationEntry] = &[
    punct("...", TokenKind::Ellipsis),
    punct("##", TokenKind::HashHash),
    punct("(", TokenKind::LParen),
    punct(")", TokenKind::RParen),
    punct("{", TokenKind::LBrace),
    punct("}", TokenKind::RBrace),
    punct("[", TokenKind::LBracket),
    punct("]", TokenKind::RBracket),
    punct(";", TokenKind::Semicolon),
    punct(",", TokenKind::Comma),
    punct(".", TokenKind::Dot),
    punct(":", TokenKind::Colon),
    punct("?", TokenKind::Question),
    punct("#", TokenKind::Hash),
];

/// Precedence level for the ternary `?:` — just below assignment so
/// `a = b ? c : d` parses as `a = (b ? c : d)`.
pub const TERNARY_PRECEDENCE: i32 = 3;
/// Precedence level for the comma operator — lowest of all, below
/// assignment, so `a = b, c` parses as `(a = b), c`.
pub const COMMA_PRECEDENCE: i32 = 1;
/// Precedence of unary operators (`+x`, `-x`, `!x`, `~x`, `*x`, `&x`,
/// `sizeof x`, prefix `++`/`--`) and casts — one level below postfix.
pub const UNARY_PRECEDENCE: i32 = 14;
/// Precedence of postfix operators (`[]`, `()`, `.`, `->`, postfix `++`/`--`).
pub const POSTFIX_PRECEDENCE: i32 = 15;
