use ferrocc_diag::SourceLocation;
use ferrocc_syntax::TokenKind;

/// The decoded payload of a literal token. Identifiers and punctuation carry
/// no payload beyond their lexeme text; spec.md §3.2 calls this the token's
/// "value union" — here it's a proper Rust enum instead of a C union, so
/// there's no way to read the wrong variant.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    None,
    Integer { value: u64, suffix: IntegerSuffix },
    Float { value: f64, suffix: FloatSuffix },
    Str(String),
    Char(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegerSuffix {
    pub unsigned: bool,
    /// 0, 1 (`L`), or 2 (`LL`).
    pub long_count: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatSuffix {
    #[default]
    Double,
    Float,
    LongDouble,
}

/// A single lexed token: category, source span, lexeme text, and decoded
/// literal value (spec.md §3.2's `Token` struct, minus the original's
/// intrusive `next` pointer — `ferrocc_lexer::lex` returns a `Vec<Token>`
/// rather than a hand-linked list).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
    pub value: LiteralValue,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            location,
            value: LiteralValue::None,
        }
    }

    pub fn with_value(mut self, value: LiteralValue) -> Self {
        self.value = value;
        self
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}
