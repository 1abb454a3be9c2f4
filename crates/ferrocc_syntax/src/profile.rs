use crate::char_class;
use crate::tables::{
    KeywordEntry, OperatorEntry, PunctuationEntry, C99_KEYWORDS, C_OPERATORS, C_PUNCTUATION,
    GNU_C11_KEYWORDS,
};

/// Delimiters and escape rules for string/char literals (spec.md §4.C's
/// literal scanner needs to know what quote closes a string, what
/// introduces an escape, and which escapes are legal).
#[derive(Debug, Clone, Copy)]
pub struct StringLiteralStyle {
    pub quote: char,
    pub escape: char,
    pub allows_multiline: bool,
}

/// Which numeric literal forms the lexer should recognize — spec.md §4.C
/// lists hex (`0x`), octal (leading `0`), binary (`0b`, a GNU extension),
/// floating point with exponents, and the usual integer/float suffixes.
#[derive(Debug, Clone, Copy)]
pub struct NumericLiteralSupport {
    pub hex: bool,
    pub octal: bool,
    pub binary: bool,
    pub float: bool,
    pub scientific_notation: bool,
    pub hex_float: bool,
}

/// Line-comment and block-comment introducers (spec.md §4.C:
/// `skip_single_line_comment` / `skip_multi_line_comment`).
#[derive(Debug, Clone, Copy)]
pub struct CommentStyle {
    pub line_comment: &'static str,
    pub block_comment_open: &'static str,
    pub block_comment_close: &'static str,
    pub nested_block_comments: bool,
}

/// A complete, data-driven description of one dialect of C (spec.md §4.B:
/// "a `SyntaxDefinition` is a plain data value"). The lexer and parser are
/// written against this type rather than against hardcoded literals, so a
/// caller can swap in a stricter or looser dialect without touching either
/// crate.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxDefinition {
    pub keywords: &'static [KeywordEntry],
    pub operators: &'static [OperatorEntry],
    pub punctuation: &'static [PunctuationEntry],
    pub comment_style: CommentStyle,
    pub string_style: StringLiteralStyle,
    pub char_style: StringLiteralStyle,
    pub numeric_support: NumericLiteralSupport,
    pub allow_dollar_in_identifiers: bool,
    pub case_sensitive: bool,
    pub requires_semicolons: bool,
    pub supports_preprocessor: bool,
    pub supports_statement_expressions: bool,
    pub supports_computed_goto: bool,
}

impl SyntaxDefinition {
    pub fn is_identifier_start(&self, c: char) -> bool {
        char_class::is_identifier_start(c, self.allow_dollar_in_identifiers)
    }

    pub fn is_identifier_continue(&self, c: char) -> bool {
        char_class::is_identifier_continue(c, self.allow_dollar_in_identifiers)
    }

    /// Look up a keyword by its exact spelling, honoring `case_sensitive`
    /// (C is always case-sensitive, but the flag exists so a caller cannot
    /// silently assume otherwise from outside this crate).
    pub fn lookup_keyword(&self, text: &str) -> Option<crate::token_kind::TokenKind> {
        if self.case_sensitive {
            self.keywords.iter().find(|k| k.text == text).map(|k| k.kind)
        } else {
            self.keywords
                .iter()
                .find(|k| k.text.eq_ignore_ascii_case(text))
                .map(|k| k.kind)
        }
    }
}

const BASE_COMMENT_STYLE: CommentStyle = CommentStyle {
    line_comment: "//",
    block_comment_open: "/*",
    block_comment_close: "*/",
    nested_block_comments: false,
};

const BASE_STRING_STYLE: StringLiteralStyle = StringLiteralStyle {
    quote: '"',
    escape: '\\',
    allows_multiline: false,
};

const BASE_CHAR_STYLE: StringLiteralStyle = StringLiteralStyle {
    quote: '\'',
    escape: '\\',
    allows_multiline: false,
};

const BASE_NUMERIC_SUPPORT: NumericLiteralSupport = NumericLiteralSupport {
    hex: true,
    octal: true,
    binary: false,
    float: true,
    scientific_notation: true,
    hex_float: false,
};

/// Standard C99, no vendor extensions: the keyword set is exactly
/// `C99_KEYWORDS`, no `$` in identifiers, no binary literals, no statement
/// expressions or computed goto.
pub const fn c99() -> SyntaxDefinition {
    SyntaxDefinition {
        keywords: C99_KEYWORDS,
        operators: C_OPERATORS,
        punctuation: C_PUNCTUATION,
        comment_style: BASE_COMMENT_STYLE,
        string_style: BASE_STRING_STYLE,
        char_style: BASE_CHAR_STYLE,
        numeric_support: BASE_NUMERIC_SUPPORT,
        allow_dollar_in_identifiers: false,
        case_sensitive: true,
        requires_semicolons: true,
        supports_preprocessor: true,
        supports_statement_expressions: false,
        supports_computed_goto: false,
    }
}

/// GNU C11: the full `GNU_C11_KEYWORDS` vocabulary (C99 plus vendor
/// keywords) and the extensions real-world headers lean on — `$` in
/// identifiers, binary literals, statement expressions `({ ... })`, and
/// computed goto `&&label`.
pub const fn gnu_c11() -> SyntaxDefinition {
    SyntaxDefinition {
        keywords: GNU_C11_KEYWORDS,
        operators: C_OPERATORS,
        punctuation: C_PUNCTUATION,
        comment_style: BASE_COMMENT_STYLE,
        string_style: BASE_STRING_STYLE,
        char_style: BASE_CHAR_STYLE,
        numeric_support: NumericLiteralSupport {
            binary: true,
            hex_float: true,
            ..BASE_NUMERIC_SUPPORT
        },
        allow_dollar_in_identifiers: true,
        case_sensitive: true,
        requires_semicolons: true,
        supports_preprocessor: true,
        supports_statement_expressions: true,
        supports_computed_goto: true,
    }
}
