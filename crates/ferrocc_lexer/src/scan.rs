use ferrocc_diag::SourceLocation;
use ferrocc_syntax::{self as syn, SyntaxDefinition, TokenKind};

use crate::error::LexError;
use crate::token::{FloatSuffix, IntegerSuffix, LiteralValue, Token};

/// A char-indexed cursor over one source buffer. Tracking `chars` as a
/// `Vec<char>` (rather than walking `str::char_indices` by hand, the way
/// `original_source/src/lexer/lexer.c` walks a raw `const char*`) lets
/// `peek_at` look arbitrarily far ahead without re-decoding UTF-8, which the
/// longest-match operator/punctuation scan and the cast-vs-paren lookahead
/// both rely on.
pub(crate) struct Cursor<'a> {
    source: &'a str,
    chars: Vec<char>,
    byte_offsets: Vec<u32>,
    pos: usize,
    line: u32,
    column: u32,
    file_id: usize,
    syntax: &'a SyntaxDefinition,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str, file_id: usize, syntax: &'a SyntaxDefinition) -> Self {
        let mut chars = Vec::with_capacity(source.len());
        let mut byte_offsets = Vec::with_capacity(source.len() + 1);
        for (i, c) in source.char_indices() {
            chars.push(c);
            byte_offsets.push(i as u32);
        }
        byte_offsets.push(source.len() as u32);
        Cursor {
            source,
            chars,
            byte_offsets,
            pos: 0,
            line: 1,
            column: 1,
            file_id,
            syntax,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn location(&self) -> SourceLocation {
        SourceLocation::new(self.file_id, self.line, self.column, self.byte_offsets[self.pos])
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Char-distance from the cursor to the next occurrence of `needle`,
    /// found via `memchr::memmem` over the raw byte buffer rather than a
    /// char-by-char scan — this is the "fast literal/comment scanning" the
    /// workspace pulls `memchr` in for.
    fn find_ahead(&self, needle: &str) -> Option<usize> {
        let start_byte = self.byte_offsets[self.pos] as usize;
        let haystack = self.source.as_bytes().get(start_byte..)?;
        let rel_byte = memchr::memmem::find(haystack, needle.as_bytes())?;
        let target_byte = (start_byte + rel_byte) as u32;
        self.byte_offsets[self.pos..]
            .iter()
            .position(|&b| b == target_byte)
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if syn::is_horizontal_whitespace(c) || syn::is_newline(c) => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let start = self.location();
                    self.advance();
                    self.advance();
                    match self.find_ahead("*/") {
                        Some(distance) => {
                            for _ in 0..distance + 2 {
                                self.advance();
                            }
                        }
                        None => {
                            while self.advance().is_some() {}
                            return Err(LexError::UnterminatedComment { location: start });
                        }
                    }
                }
                // A `#` in column 1 past the preprocessor is a leftover line
                // marker (`# 1 "foo.c"`) rather than the `#`/`##` punctuation
                // tokens macros use — spec.md's `skip_preprocessor_line_marker`.
                Some('#') if self.column == 1 && self.syntax.supports_preprocessor => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_trivia()?;
        let start = self.location();

        let Some(c) = self.peek() else {
            return Ok(Some(Token::new(TokenKind::Eof, "", start)));
        };

        if self.syntax.is_identifier_start(c) {
            return Ok(Some(self.scan_identifier_or_keyword(start)));
        }
        if syn::is_decimal_digit(c)
            || (c == '.' && matches!(self.peek_at(1), Some(d) if syn::is_decimal_digit(d)))
        {
            return self.scan_number(start).map(Some);
        }
        if c == self.syntax.string_style.quote {
            return self.scan_string(start).map(Some);
        }
        if c == self.syntax.char_style.quote {
            return self.scan_char(start).map(Some);
        }
        if let Some(tok) = self.scan_operator_or_punct(start) {
            return Ok(Some(tok));
        }

        self.advance();
        Err(LexError::UnexpectedChar { location: start, ch: c })
    }

    fn scan_identifier_or_keyword(&mut self, start: SourceLocation) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if self.syntax.is_identifier_continue(c) {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = self
            .syntax
            .lookup_keyword(&text)
            .unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, start)
    }

    fn scan_operator_or_punct(&mut self, start: SourceLocation) -> Option<Token> {
        for entry in self.syntax.operators {
            if self.matches_ahead(entry.text) {
                self.advance_by_chars(entry.text);
                return Some(Token::new(entry.kind, entry.text, start));
            }
        }
        for entry in self.syntax.punctuation {
            if self.matches_ahead(entry.text) {
                self.advance_by_chars(entry.text);
                return Some(Token::new(entry.kind, entry.text, start));
            }
        }
        None
    }

    fn matches_ahead(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn advance_by_chars(&mut self, text: &str) {
        for _ in 0..text.chars().count() {
            self.advance();
        }
    }

    /// Decodes one escape sequence (the caller has already consumed the
    /// backslash) into the text it contributes to the literal's decoded
    /// value. Standard escapes resolve to their single character; an escape
    /// this dialect doesn't recognize is preserved verbatim with its
    /// backslash rather than rejected, per spec.md §4.C.
    fn decode_escape(&mut self, location: SourceLocation) -> Result<String, LexError> {
        let Some(c) = self.advance() else {
            return Err(LexError::UnterminatedString { location });
        };
        let decoded = match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            '?' => '?',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            'x' => {
                let mut value: u32 = 0;
                let mut any = false;
                while let Some(h) = self.peek() {
                    if !syn::is_hex_digit(h) {
                        break;
                    }
                    value = value * 16 + h.to_digit(16).unwrap();
                    any = true;
                    self.advance();
                }
                if !any {
                    return Ok(format!("\\{c}"));
                }
                return Ok(char::from_u32(value).map(String::from).unwrap_or_else(|| format!("\\{c}")));
            }
            octal if syn::is_octal_digit(octal) => {
                let mut value = octal.to_digit(8).unwrap();
                for _ in 0..2 {
                    match self.peek() {
                        Some(o) if syn::is_octal_digit(o) => {
                            value = value * 8 + o.to_digit(8).unwrap();
                            self.advance();
                        }
                        _ => break,
                    }
                }
                return Ok(char::from_u32(value).map(String::from).unwrap_or_else(|| format!("\\{c}")));
            }
            other => return Ok(format!("\\{other}")),
        };
        Ok(decoded.to_string())
    }

    fn scan_string(&mut self, start: SourceLocation) -> Result<Token, LexError> {
        let quote = self.syntax.string_style.quote;
        self.advance();
        let mut value = String::new();
        let mut lexeme = String::new();
        lexeme.push(quote);
        loop {
            match self.peek() {
                None => return Err(LexError::UnterminatedString { location: start }),
                Some(c) if c == quote => {
                    self.advance();
                    lexeme.push(quote);
                    break;
                }
                Some('\n') if !self.syntax.string_style.allows_multiline => {
                    return Err(LexError::UnterminatedString { location: start });
                }
                Some(c) if c == self.syntax.string_style.escape => {
                    lexeme.push(c);
                    self.advance();
                    let esc_start = self.location();
                    let pre_pos = self.pos;
                    let decoded = self.decode_escape(esc_start)?;
                    lexeme.push_str(&self.chars[pre_pos..self.pos].iter().collect::<String>());
                    value.push_str(&decoded);
                }
                Some(c) => {
                    value.push(c);
                    lexeme.push(c);
                    self.advance();
                }
            }
        }
        Ok(Token::new(TokenKind::StringLiteral, lexeme, start).with_value(LiteralValue::Str(value)))
    }

    fn scan_char(&mut self, start: SourceLocation) -> Result<Token, LexError> {
        let quote = self.syntax.char_style.quote;
        self.advance();
        let value = match self.peek() {
            None => return Err(LexError::UnterminatedChar { location: start }),
            Some(c) if c == quote => {
                self.advance();
                return Err(LexError::EmptyCharLiteral { location: start });
            }
            Some(c) if c == self.syntax.char_style.escape => {
                self.advance();
                let decoded = self.decode_escape(start)?;
                decoded.chars().next_back().unwrap_or('\0') as u32
            }
            Some(c) => {
                self.advance();
                c as u32
            }
        };
        match self.peek() {
            Some(c) if c == quote => {
                self.advance();
            }
            _ => return Err(LexError::UnterminatedChar { location: start }),
        }
        let lexeme = format!("'{}'", char::from_u32(value).unwrap_or('\u{fffd}'));
        Ok(Token::new(TokenKind::CharLiteral, lexeme, start).with_value(LiteralValue::Char(value)))
    }

    fn scan_number(&mut self, start: SourceLocation) -> Result<Token, LexError> {
        let support = self.syntax.numeric_support;
        let mut text = String::new();
        let mut is_float = false;
        let mut base = 10u32;
        let mut prefix_len = 0usize;

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x') | Some('X')) {
            text.push(self.advance().unwrap());
            text.push(self.advance().unwrap());
            base = 16;
            prefix_len = 2;
            while let Some(c) = self.peek() {
                if syn::is_hex_digit(c) {
                    text.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
            if support.hex_float && matches!(self.peek(), Some('.') | Some('p') | Some('P')) {
                is_float = true;
                if self.peek() == Some('.') {
                    text.push(self.advance().unwrap());
                    while let Some(c) = self.peek() {
                        if syn::is_hex_digit(c) {
                            text.push(c);
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                if matches!(self.peek(), Some('p') | Some('P')) {
                    text.push(self.advance().unwrap());
                    if matches!(self.peek(), Some('+') | Some('-')) {
                        text.push(self.advance().unwrap());
                    }
                    while let Some(c) = self.peek() {
                        if syn::is_decimal_digit(c) {
                            text.push(c);
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
            }
        } else if support.binary
            && self.peek() == Some('0')
            && matches!(self.peek_at(1), Some('b') | Some('B'))
        {
            text.push(self.advance().unwrap());
            text.push(self.advance().unwrap());
            base = 2;
            prefix_len = 2;
            while let Some(c) = self.peek() {
                if syn::is_binary_digit(c) {
                    text.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        } else if support.octal
            && self.peek() == Some('0')
            && matches!(self.peek_at(1), Some(d) if syn::is_octal_digit(d))
        {
            text.push(self.advance().unwrap());
            base = 8;
            prefix_len = 1;
            while let Some(c) = self.peek() {
                if syn::is_octal_digit(c) {
                    text.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        } else {
            while let Some(c) = self.peek() {
                if syn::is_decimal_digit(c) {
                    text.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
            if support.float
                && self.peek() == Some('.')
                && !matches!(self.peek_at(1), Some('.'))
            {
                is_float = true;
                text.push(self.advance().unwrap());
                while let Some(c) = self.peek() {
                    if syn::is_decimal_digit(c) {
                        text.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
            if support.scientific_notation && matches!(self.peek(), Some('e') | Some('E')) {
                is_float = true;
                text.push(self.advance().unwrap());
                if matches!(self.peek(), Some('+') | Some('-')) {
                    text.push(self.advance().unwrap());
                }
                while let Some(c) = self.peek() {
                    if syn::is_decimal_digit(c) {
                        text.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        if is_float {
            let mut suffix = FloatSuffix::Double;
            let mut full_text = text.clone();
            match self.peek() {
                Some('f') | Some('F') => {
                    full_text.push(self.advance().unwrap());
                    suffix = FloatSuffix::Float;
                }
                Some('l') | Some('L') => {
                    full_text.push(self.advance().unwrap());
                    suffix = FloatSuffix::LongDouble;
                }
                _ => {}
            }
            let value = if base == 16 {
                parse_hex_float(&text).ok_or_else(|| LexError::MalformedNumber {
                    location: start,
                    text: full_text.clone(),
                })?
            } else {
                text.parse().map_err(|_| LexError::MalformedNumber {
                    location: start,
                    text: full_text.clone(),
                })?
            };
            Ok(Token::new(TokenKind::FloatLiteral, full_text, start)
                .with_value(LiteralValue::Float { value, suffix }))
        } else {
            let mut suffix = IntegerSuffix::default();
            let mut full_text = text.clone();
            loop {
                match self.peek() {
                    Some('u') | Some('U') if !suffix.unsigned => {
                        suffix.unsigned = true;
                        full_text.push(self.advance().unwrap());
                    }
                    Some('l') | Some('L') if suffix.long_count < 2 => {
                        suffix.long_count += 1;
                        full_text.push(self.advance().unwrap());
                    }
                    _ => break,
                }
            }
            let digits = &text[prefix_len..];
            let value = u64::from_str_radix(digits, base).map_err(|_| LexError::MalformedNumber {
                location: start,
                text: full_text.clone(),
            })?;
            Ok(Token::new(TokenKind::IntegerLiteral, full_text, start)
                .with_value(LiteralValue::Integer { value, suffix }))
        }
    }
}

/// Parses a C hex-float literal body (no `0x` prefix, no `p` exponent sign
/// already stripped) of the form `1A.8p3` into its `f64` value: mantissa in
/// base 16, exponent is a power of two per C99 §6.4.4.2.
fn parse_hex_float(text: &str) -> Option<f64> {
    let rest = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))?;
    let (mantissa_part, exponent_part) = match rest.split_once(['p', 'P']) {
        Some((m, e)) => (m, e),
        None => (rest, "0"),
    };
    let (int_part, frac_part) = match mantissa_part.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa_part, ""),
    };
    let mut mantissa = 0f64;
    for c in int_part.chars() {
        mantissa = mantissa * 16.0 + c.to_digit(16)? as f64;
    }
    let mut scale = 1.0 / 16.0;
    for c in frac_part.chars() {
        mantissa += c.to_digit(16)? as f64 * scale;
        scale /= 16.0;
    }
    let exponent: i32 = exponent_part.parse().ok()?;
    Some(mantissa * 2f64.powi(exponent))
}
