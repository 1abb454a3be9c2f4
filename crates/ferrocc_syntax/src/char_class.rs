//! Character classification predicates used by the lexer's identifier,
//! number, and whitespace scanners (spec.md §4.C). Kept separate from the
//! lexer crate itself so the syntax profile can describe *which* characters
//! are legal without the lexer crate depending on anything but this table.

/// True for `[A-Za-z_]` and, for a GNU profile, `$` — the set that may start
/// an identifier.
pub fn is_identifier_start(c: char, allow_dollar: bool) -> bool {
    c.is_ascii_alphabetic() || c == '_' || (allow_dollar && c == '$')
}

/// True for `[A-Za-z0-9_]` and, for a GNU profile, `$` — the set that may
/// continue an identifier after its first character.
pub fn is_identifier_continue(c: char, allow_dollar: bool) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || (allow_dollar && c == '$')
}

pub fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_octal_digit(c: char) -> bool {
    ('0'..='7').contains(&c)
}

pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

pub fn is_binary_digit(c: char) -> bool {
    c == '0' || c == '1'
}

/// Horizontal whitespace the lexer skips without producing a token
/// (spec.md §4.C's `skip_whitespace`); newlines are tracked separately for
/// line/column bookkeeping.
pub fn is_horizontal_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\x0b' | '\x0c')
}

pub fn is_newline(c: char) -> bool {
    c == '\n'
}
