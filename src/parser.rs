use serde_json::Value;

use crate::model::{ParseErrorCode, PathSegment, ScanError, Span, TokenKind};
use crate::scanner::Scanner;

/// Options controlling what the event parser accepts beyond strict JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Permit `//` and `/* */` comments. When `false` each comment is
    /// reported as an [`ParseErrorCode::InvalidCommentToken`] error (and
    /// still surfaced through [`ParseVisitor::on_comment`]).
    pub allow_comments: bool,
    /// Permit a trailing comma before `}` or `]`.
    pub allow_trailing_commas: bool,
    /// Treat an empty (or whitespace/comment-only) document as valid.
    pub allow_empty_content: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allow_comments: true,
            allow_trailing_commas: false,
            allow_empty_content: false,
        }
    }
}

/// Receiver for parse events. Every method has a default no-op body, so
/// implementors override only the events they care about.
///
/// `path` describes the position of the event in the document tree as a
/// sequence of object keys and array indices. The slice is borrowed from
/// the parser's internal stack; clone it to retain it beyond the call.
pub trait ParseVisitor {
    fn on_object_begin(&mut self, span: Span, path: &[PathSegment]) {
        let _ = (span, path);
    }

    /// A property name inside an object. `name` has escapes decoded.
    fn on_object_property(&mut self, name: &str, span: Span, path: &[PathSegment]) {
        let _ = (name, span, path);
    }

    fn on_object_end(&mut self, span: Span) {
        let _ = span;
    }

    fn on_array_begin(&mut self, span: Span, path: &[PathSegment]) {
        let _ = (span, path);
    }

    fn on_array_end(&mut self, span: Span) {
        let _ = span;
    }

    /// A scalar value: null, boolean, number, or string.
    fn on_literal_value(&mut self, value: Value, span: Span, path: &[PathSegment]) {
        let _ = (value, span, path);
    }

    /// A `:` or `,` token.
    fn on_separator(&mut self, separator: char, span: Span) {
        let _ = (separator, span);
    }

    fn on_comment(&mut self, span: Span) {
        let _ = span;
    }

    fn on_error(&mut self, code: ParseErrorCode, span: Span) {
        let _ = (code, span);
    }
}

/// Parses `text` as a JSONC document, reporting each structural event to
/// `visitor`.
///
/// Returns `true` whenever a top-level value was structurally obtained,
/// even if errors were reported along the way; malformed regions are
/// skipped using bounded recovery and parsing continues. Callers judging
/// validity must aggregate [`ParseVisitor::on_error`] calls rather than
/// rely on the return value — the two channels are deliberately decoupled
/// so that best-effort consumers (editors, config loaders) can use partial
/// results.
pub fn parse(text: &str, visitor: &mut dyn ParseVisitor, options: &ParseOptions) -> bool {
    let mut parser = Parser {
        scanner: Scanner::new(text),
        visitor,
        options: *options,
        path: Vec::new(),
    };
    parser.run()
}

struct Parser<'a, 'v> {
    scanner: Scanner<'a>,
    visitor: &'v mut dyn ParseVisitor,
    options: ParseOptions,
    path: Vec<PathSegment>,
}

impl Parser<'_, '_> {
    fn run(&mut self) -> bool {
        self.scan_next();
        if self.scanner.token() == TokenKind::Eof {
            if self.options.allow_empty_content {
                return true;
            }
            self.handle_error(ParseErrorCode::ValueExpected, &[], &[]);
            return false;
        }
        if !self.parse_value() {
            self.handle_error(ParseErrorCode::ValueExpected, &[], &[]);
            return false;
        }
        if self.scanner.token() != TokenKind::Eof {
            self.handle_error(ParseErrorCode::EndOfFileExpected, &[], &[]);
        }
        true
    }

    fn token_span(&self) -> Span {
        Span {
            offset: self.scanner.token_offset(),
            length: self.scanner.token_length(),
            line: self.scanner.token_start_line(),
            column: self.scanner.token_start_character(),
        }
    }

    // Advances to the next structural token, reporting scan errors,
    // comments, and unknown symbols along the way.
    fn scan_next(&mut self) -> TokenKind {
        loop {
            let token = self.scanner.scan();
            match self.scanner.token_error() {
                ScanError::None => {}
                ScanError::InvalidUnicode => {
                    self.handle_error(ParseErrorCode::InvalidUnicode, &[], &[]);
                }
                ScanError::InvalidEscapeCharacter => {
                    self.handle_error(ParseErrorCode::InvalidEscapeCharacter, &[], &[]);
                }
                ScanError::UnexpectedEndOfNumber => {
                    self.handle_error(ParseErrorCode::UnexpectedEndOfNumber, &[], &[]);
                }
                ScanError::UnexpectedEndOfComment => {
                    // Suppressed when comments are rejected outright: the
                    // InvalidCommentToken error below already covers it.
                    if self.options.allow_comments {
                        self.handle_error(ParseErrorCode::UnexpectedEndOfComment, &[], &[]);
                    }
                }
                ScanError::UnexpectedEndOfString => {
                    self.handle_error(ParseErrorCode::UnexpectedEndOfString, &[], &[]);
                }
                ScanError::InvalidCharacter => {
                    self.handle_error(ParseErrorCode::InvalidCharacter, &[], &[]);
                }
            }
            match token {
                TokenKind::LineComment | TokenKind::BlockComment => {
                    if !self.options.allow_comments {
                        self.handle_error(ParseErrorCode::InvalidCommentToken, &[], &[]);
                    }
                    let span = self.token_span();
                    self.visitor.on_comment(span);
                }
                TokenKind::Unknown => {
                    self.handle_error(ParseErrorCode::InvalidSymbol, &[], &[]);
                }
                TokenKind::Whitespace | TokenKind::LineBreak => {}
                _ => return token,
            }
        }
    }

    // Reports the error, then resynchronizes: tokens are discarded until
    // one in `skip_until_after` (consumed) or `skip_until` (left in place)
    // is found, or EOF. Every iteration advances, so recovery terminates.
    fn handle_error(
        &mut self,
        code: ParseErrorCode,
        skip_until_after: &[TokenKind],
        skip_until: &[TokenKind],
    ) {
        let span = self.token_span();
        self.visitor.on_error(code, span);
        if skip_until_after.is_empty() && skip_until.is_empty() {
            return;
        }
        let mut token = self.scanner.token();
        while token != TokenKind::Eof {
            if skip_until_after.contains(&token) {
                self.scan_next();
                break;
            }
            if skip_until.contains(&token) {
                break;
            }
            token = self.scan_next();
        }
    }

    fn parse_value(&mut self) -> bool {
        match self.scanner.token() {
            TokenKind::OpenBracket => self.parse_array(),
            TokenKind::OpenBrace => self.parse_object(),
            TokenKind::String => self.parse_string(true),
            _ => self.parse_literal(),
        }
    }

    fn parse_string(&mut self, is_value: bool) -> bool {
        let value = self.scanner.token_value().to_string();
        let span = self.token_span();
        if is_value {
            self.visitor
                .on_literal_value(Value::String(value), span, &self.path);
        } else {
            self.visitor.on_object_property(&value, span, &self.path);
            // Pushed after the callback so the name is part of the path
            // only inside the property's value.
            self.path.push(PathSegment::Key(value));
        }
        self.scan_next();
        true
    }

    fn parse_literal(&mut self) -> bool {
        let span = self.token_span();
        let value = match self.scanner.token() {
            TokenKind::NullKeyword => Value::Null,
            TokenKind::TrueKeyword => Value::Bool(true),
            TokenKind::FalseKeyword => Value::Bool(false),
            TokenKind::Number => {
                let raw = self.scanner.token_value();
                let number = raw.parse::<serde_json::Number>().ok().or_else(|| {
                    // Tolerated-but-flagged shapes like `01` or `1.` still
                    // denote a numeric value.
                    raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
                });
                match number {
                    Some(n) => Value::Number(n),
                    None => {
                        // Reported but never dropped; zero stands in.
                        self.handle_error(ParseErrorCode::InvalidNumberFormat, &[], &[]);
                        Value::Number(0.into())
                    }
                }
            }
            _ => return false,
        };
        self.visitor.on_literal_value(value, span, &self.path);
        self.scan_next();
        true
    }

    fn parse_property(&mut self) -> bool {
        if self.scanner.token() != TokenKind::String {
            self.handle_error(
                ParseErrorCode::PropertyNameExpected,
                &[],
                &[TokenKind::CloseBrace, TokenKind::Comma],
            );
            return false;
        }
        self.parse_string(false);
        if self.scanner.token() == TokenKind::Colon {
            self.visitor.on_separator(':', self.token_span());
            self.scan_next();
            if !self.parse_value() {
                self.handle_error(
                    ParseErrorCode::ValueExpected,
                    &[],
                    &[TokenKind::CloseBrace, TokenKind::Comma],
                );
            }
        } else {
            self.handle_error(
                ParseErrorCode::ColonExpected,
                &[],
                &[TokenKind::CloseBrace, TokenKind::Comma],
            );
        }
        self.path.pop();
        true
    }

    fn parse_object(&mut self) -> bool {
        let span = self.token_span();
        self.visitor.on_object_begin(span, &self.path);
        self.scan_next();

        let mut seen_property = false;
        while self.scanner.token() != TokenKind::CloseBrace
            && self.scanner.token() != TokenKind::Eof
        {
            if self.scanner.token() == TokenKind::Comma {
                if !seen_property {
                    self.handle_error(ParseErrorCode::ValueExpected, &[], &[]);
                }
                self.visitor.on_separator(',', self.token_span());
                self.scan_next();
                if self.scanner.token() == TokenKind::CloseBrace
                    && self.options.allow_trailing_commas
                {
                    break;
                }
            } else if seen_property {
                self.handle_error(ParseErrorCode::CommaExpected, &[], &[]);
            }
            if !self.parse_property() {
                self.handle_error(
                    ParseErrorCode::ValueExpected,
                    &[],
                    &[TokenKind::CloseBrace, TokenKind::Comma],
                );
            }
            seen_property = true;
        }

        // Emitted even for malformed objects so begin/end always pair up.
        self.visitor.on_object_end(self.token_span());
        if self.scanner.token() != TokenKind::CloseBrace {
            self.handle_error(
                ParseErrorCode::CloseBraceExpected,
                &[TokenKind::CloseBrace],
                &[],
            );
        } else {
            self.scan_next();
        }
        true
    }

    fn parse_array(&mut self) -> bool {
        let span = self.token_span();
        self.visitor.on_array_begin(span, &self.path);
        self.scan_next();

        let mut is_first_element = true;
        let mut seen_element = false;
        while self.scanner.token() != TokenKind::CloseBracket
            && self.scanner.token() != TokenKind::Eof
        {
            if self.scanner.token() == TokenKind::Comma {
                if !seen_element {
                    self.handle_error(ParseErrorCode::ValueExpected, &[], &[]);
                }
                self.visitor.on_separator(',', self.token_span());
                self.scan_next();
                if self.scanner.token() == TokenKind::CloseBracket
                    && self.options.allow_trailing_commas
                {
                    break;
                }
            } else if seen_element {
                self.handle_error(ParseErrorCode::CommaExpected, &[], &[]);
            }
            if is_first_element {
                self.path.push(PathSegment::Index(0));
                is_first_element = false;
            } else if let Some(PathSegment::Index(i)) = self.path.last_mut() {
                *i += 1;
            }
            if !self.parse_value() {
                self.handle_error(
                    ParseErrorCode::ValueExpected,
                    &[],
                    &[TokenKind::CloseBracket, TokenKind::Comma],
                );
            }
            seen_element = true;
        }

        self.visitor.on_array_end(self.token_span());
        if !is_first_element {
            self.path.pop();
        }
        if self.scanner.token() != TokenKind::CloseBracket {
            self.handle_error(
                ParseErrorCode::CloseBracketExpected,
                &[TokenKind::CloseBracket],
                &[],
            );
        } else {
            self.scan_next();
        }
        true
    }
}
