use crate::model::{ScanError, TokenKind};

/// A JSONC lexer over an in-memory string.
///
/// The scanner never fails: malformed input degrades to a best-effort token
/// whose [`token_error`] is non-[`ScanError::None`], and the caller decides
/// severity. Offsets are byte offsets into the UTF-8 input; lines are
/// zero-indexed and a `\r\n` pair counts as a single line break.
///
/// Created with [`Scanner::new`] the scanner reports every token including
/// whitespace, line breaks, and comments; [`Scanner::skipping_trivia`] yields
/// only structurally significant tokens.
///
/// [`token_error`]: Scanner::token_error
pub struct Scanner<'a> {
    text: &'a str,
    ignore_trivia: bool,

    pos: usize,
    line: usize,
    line_start: usize,

    token: TokenKind,
    value: String,
    token_offset: usize,
    token_line: usize,
    token_line_start: usize,
    error: ScanError,
}

impl<'a> Scanner<'a> {
    /// Scanner that reports every token, trivia included. Used by the
    /// formatter, which needs exact whitespace and comment positions.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            ignore_trivia: false,
            pos: 0,
            line: 0,
            line_start: 0,
            token: TokenKind::Unknown,
            value: String::new(),
            token_offset: 0,
            token_line: 0,
            token_line_start: 0,
            error: ScanError::None,
        }
    }

    /// Scanner whose `scan()` loops internally, discarding whitespace, line
    /// breaks, and comments, and returns only structural tokens.
    pub fn skipping_trivia(text: &'a str) -> Self {
        let mut scanner = Self::new(text);
        scanner.ignore_trivia = true;
        scanner
    }

    /// Scans the next token and returns its kind.
    pub fn scan(&mut self) -> TokenKind {
        if self.ignore_trivia {
            loop {
                let kind = self.scan_next();
                if !kind.is_trivia() {
                    return kind;
                }
            }
        } else {
            self.scan_next()
        }
    }

    /// Kind of the most recently scanned token.
    pub fn token(&self) -> TokenKind {
        self.token
    }

    /// Text of the current token. For string tokens all escape sequences
    /// have already been decoded; for structural tokens (braces, separators)
    /// this is empty.
    pub fn token_value(&self) -> &str {
        &self.value
    }

    /// Byte offset of the current token's first character.
    pub fn token_offset(&self) -> usize {
        self.token_offset
    }

    /// Byte length of the current token.
    pub fn token_length(&self) -> usize {
        self.pos - self.token_offset
    }

    /// Zero-indexed line on which the current token starts.
    pub fn token_start_line(&self) -> usize {
        self.token_line
    }

    /// Byte offset of the current token from the start of its line.
    pub fn token_start_character(&self) -> usize {
        self.token_offset - self.token_line_start
    }

    /// Lexical error attached to the current token, if any.
    pub fn token_error(&self) -> ScanError {
        self.error
    }

    /// Current scan cursor (byte offset just past the current token).
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the scan cursor and clears the current token state.
    ///
    /// The line counter is deliberately not recomputed: line and column
    /// reporting is only meaningful when scanning starts from offset 0.
    /// Callers that seek must treat subsequent line numbers as relative.
    pub fn set_position(&mut self, pos: usize) {
        let mut pos = pos.min(self.text.len());
        while pos > 0 && !self.text.is_char_boundary(pos) {
            pos -= 1;
        }
        self.pos = pos;
        self.token_offset = pos;
        self.token = TokenKind::Unknown;
        self.value.clear();
        self.error = ScanError::None;
    }

    fn scan_next(&mut self) -> TokenKind {
        self.value.clear();
        self.error = ScanError::None;
        self.token_offset = self.pos;
        self.token_line = self.line;
        self.token_line_start = self.line_start;

        let Some(ch) = self.peek() else {
            self.token = TokenKind::Eof;
            return self.token;
        };

        self.token = match ch {
            ' ' | '\t' | '\u{0B}' | '\u{0C}' => {
                while let Some(c) = self.peek() {
                    if !matches!(c, ' ' | '\t' | '\u{0B}' | '\u{0C}') {
                        break;
                    }
                    self.value.push(c);
                    self.pos += c.len_utf8();
                }
                TokenKind::Whitespace
            }
            '\r' | '\n' => {
                self.consume_line_break(ch);
                TokenKind::LineBreak
            }
            '{' => self.single_char(TokenKind::OpenBrace),
            '}' => self.single_char(TokenKind::CloseBrace),
            '[' => self.single_char(TokenKind::OpenBracket),
            ']' => self.single_char(TokenKind::CloseBracket),
            ':' => self.single_char(TokenKind::Colon),
            ',' => self.single_char(TokenKind::Comma),
            '"' => {
                self.pos += 1;
                self.scan_string();
                TokenKind::String
            }
            '-' => {
                self.pos += 1;
                if self.peek().map_or(true, |c| !c.is_ascii_digit()) {
                    self.value.push('-');
                    TokenKind::Unknown
                } else {
                    self.scan_number();
                    TokenKind::Number
                }
            }
            '0'..='9' => {
                self.scan_number();
                TokenKind::Number
            }
            '/' => self.scan_comment_or_slash(),
            _ => self.scan_word(),
        };
        self.token
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.text.get(self.pos + offset..)?.chars().next()
    }

    fn single_char(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    // Consumes one line break, treating \r\n as a single break, and resets
    // the column origin.
    fn consume_line_break(&mut self, ch: char) {
        self.value.push(ch);
        self.pos += 1;
        if ch == '\r' && self.peek() == Some('\n') {
            self.value.push('\n');
            self.pos += 1;
        }
        self.line += 1;
        self.line_start = self.pos;
    }

    // Entered just past the opening quote. Produces the decoded string
    // value; lexical problems set `self.error` and scanning continues where
    // it safely can.
    fn scan_string(&mut self) {
        loop {
            let Some(ch) = self.peek() else {
                self.error = ScanError::UnexpectedEndOfString;
                return;
            };
            match ch {
                '"' => {
                    self.pos += 1;
                    return;
                }
                '\\' => {
                    self.pos += 1;
                    self.scan_escape();
                    if self.error == ScanError::UnexpectedEndOfString {
                        return;
                    }
                }
                '\r' | '\n' => {
                    // A raw line break terminates the string token.
                    self.error = ScanError::UnexpectedEndOfString;
                    return;
                }
                c if (c as u32) < 0x20 => {
                    self.error = ScanError::InvalidCharacter;
                    self.value.push(c);
                    self.pos += 1;
                }
                c => {
                    self.value.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
    }

    // Entered just past a backslash inside a string.
    fn scan_escape(&mut self) {
        let Some(ch) = self.peek() else {
            self.error = ScanError::UnexpectedEndOfString;
            return;
        };
        self.pos += ch.len_utf8();
        match ch {
            '"' => self.value.push('"'),
            '\\' => self.value.push('\\'),
            '/' => self.value.push('/'),
            'b' => self.value.push('\u{08}'),
            'f' => self.value.push('\u{0C}'),
            'n' => self.value.push('\n'),
            'r' => self.value.push('\r'),
            't' => self.value.push('\t'),
            'u' => match self.scan_hex4() {
                Some(unit) => self.push_unicode_escape(unit),
                None => self.error = ScanError::InvalidUnicode,
            },
            _ => self.error = ScanError::InvalidEscapeCharacter,
        }
    }

    fn scan_hex4(&mut self) -> Option<u32> {
        let mut value = 0u32;
        for _ in 0..4 {
            let digit = self.peek().and_then(|c| c.to_digit(16))?;
            value = value * 16 + digit;
            self.pos += 1;
        }
        Some(value)
    }

    // A \uXXXX escape names a UTF-16 code unit. High/low surrogate pairs
    // are combined into one scalar; a lone surrogate half cannot exist in a
    // Rust string and is flagged InvalidUnicode.
    fn push_unicode_escape(&mut self, unit: u32) {
        if let Some(c) = char::from_u32(unit) {
            self.value.push(c);
            return;
        }
        if (0xD800..0xDC00).contains(&unit)
            && self.peek() == Some('\\')
            && self.peek_at(1) == Some('u')
        {
            let saved = self.pos;
            self.pos += 2;
            if let Some(low) = self.scan_hex4() {
                if (0xDC00..0xE000).contains(&low) {
                    let scalar = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    if let Some(c) = char::from_u32(scalar) {
                        self.value.push(c);
                        return;
                    }
                }
            }
            self.pos = saved;
        }
        self.error = ScanError::InvalidUnicode;
    }

    // Entered at the first digit (or past a leading minus). The token value
    // is the raw source slice; decoding happens in the parser.
    fn scan_number(&mut self) {
        if self.peek() == Some('0') {
            self.pos += 1;
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                // Legacy leading-zero run: consumed as one token, flagged.
                self.consume_digits();
                self.error = ScanError::UnexpectedEndOfNumber;
            }
        } else {
            self.consume_digits();
        }

        if self.peek() == Some('.') {
            self.pos += 1;
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.consume_digits();
            } else {
                self.error = ScanError::UnexpectedEndOfNumber;
                self.finish_number();
                return;
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            self.pos += 1;
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.pos += 1;
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.consume_digits();
            } else {
                self.error = ScanError::UnexpectedEndOfNumber;
            }
        }
        self.finish_number();
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn finish_number(&mut self) {
        self.value.clear();
        self.value.push_str(&self.text[self.token_offset..self.pos]);
    }

    fn scan_comment_or_slash(&mut self) -> TokenKind {
        match self.peek_at(1) {
            Some('/') => {
                self.pos += 2;
                while let Some(c) = self.peek() {
                    if c == '\r' || c == '\n' {
                        break;
                    }
                    self.pos += c.len_utf8();
                }
                self.value.push_str(&self.text[self.token_offset..self.pos]);
                TokenKind::LineComment
            }
            Some('*') => {
                self.pos += 2;
                let mut terminated = false;
                while let Some(c) = self.peek() {
                    if c == '*' && self.peek_at(1) == Some('/') {
                        self.pos += 2;
                        terminated = true;
                        break;
                    }
                    if c == '\r' || c == '\n' {
                        self.consume_comment_line_break(c);
                    } else {
                        self.pos += c.len_utf8();
                    }
                }
                if !terminated {
                    self.error = ScanError::UnexpectedEndOfComment;
                }
                self.value.push_str(&self.text[self.token_offset..self.pos]);
                TokenKind::BlockComment
            }
            _ => {
                self.value.push('/');
                self.pos += 1;
                TokenKind::Unknown
            }
        }
    }

    // Line breaks embedded in a block comment still advance the line
    // counter and column origin.
    fn consume_comment_line_break(&mut self, ch: char) {
        self.pos += 1;
        if ch == '\r' && self.peek() == Some('\n') {
            self.pos += 1;
        }
        self.line += 1;
        self.line_start = self.pos;
    }

    // Bareword run: exactly true/false/null become keywords, anything else
    // is Unknown.
    fn scan_word(&mut self) -> TokenKind {
        while let Some(c) = self.peek() {
            if !is_word_character(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        // The dispatch in scan_next guarantees at least one word character.
        debug_assert!(self.pos > self.token_offset);
        self.value.push_str(&self.text[self.token_offset..self.pos]);
        match self.value.as_str() {
            "true" => TokenKind::TrueKeyword,
            "false" => TokenKind::FalseKeyword,
            "null" => TokenKind::NullKeyword,
            _ => TokenKind::Unknown,
        }
    }
}

fn is_word_character(c: char) -> bool {
    !matches!(
        c,
        ' ' | '\t' | '\u{0B}' | '\u{0C}' | '\r' | '\n' | '{' | '}' | '[' | ']' | ':' | ',' | '"'
            | '/'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(text);
        let mut out = Vec::new();
        loop {
            let kind = scanner.scan();
            if kind == TokenKind::Eof {
                return out;
            }
            out.push(kind);
        }
    }

    #[test]
    fn structural_tokens() {
        assert_eq!(
            kinds("{}[],:"),
            vec![
                TokenKind::OpenBrace,
                TokenKind::CloseBrace,
                TokenKind::OpenBracket,
                TokenKind::CloseBracket,
                TokenKind::Comma,
                TokenKind::Colon,
            ]
        );
    }

    #[test]
    fn crlf_is_one_line_break() {
        let mut scanner = Scanner::new("\r\n\n");
        assert_eq!(scanner.scan(), TokenKind::LineBreak);
        assert_eq!(scanner.token_length(), 2);
        assert_eq!(scanner.scan(), TokenKind::LineBreak);
        assert_eq!(scanner.token_start_line(), 1);
    }

    #[test]
    fn surrogate_pair_escape() {
        let mut scanner = Scanner::new(r#""\uD83D\uDE00""#);
        assert_eq!(scanner.scan(), TokenKind::String);
        assert_eq!(scanner.token_error(), ScanError::None);
        assert_eq!(scanner.token_value(), "\u{1F600}");
    }

    #[test]
    fn lone_surrogate_is_invalid() {
        let mut scanner = Scanner::new(r#""\uD83D x""#);
        assert_eq!(scanner.scan(), TokenKind::String);
        assert_eq!(scanner.token_error(), ScanError::InvalidUnicode);
    }
}
