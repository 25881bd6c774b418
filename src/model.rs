use serde::{Deserialize, Serialize};

/// Classification of a single scanned token.
///
/// Trivia kinds (whitespace, line breaks, comments) carry no structural
/// meaning but are reported by the scanner so that the formatter can see
/// exact source positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Colon,
    Comma,
    String,
    Number,
    NullKeyword,
    TrueKeyword,
    FalseKeyword,
    LineComment,
    BlockComment,
    LineBreak,
    Whitespace,
    Unknown,
    Eof,
}

impl TokenKind {
    /// True for tokens that carry no structural meaning.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::LineBreak
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }

    /// True for comment tokens.
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// Lexical error attached to a token. Orthogonal to [`TokenKind`]: a token
/// can be classified and still carry an error (e.g. an unterminated string
/// is a `String` token with `UnexpectedEndOfString`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanError {
    #[default]
    None,
    UnexpectedEndOfComment,
    UnexpectedEndOfString,
    UnexpectedEndOfNumber,
    InvalidUnicode,
    InvalidEscapeCharacter,
    InvalidCharacter,
}

/// Structural error reported through [`ParseVisitor::on_error`].
///
/// The lexical [`ScanError`] codes have counterparts here so that a parse
/// run surfaces every anomaly through a single channel.
///
/// [`ParseVisitor::on_error`]: crate::ParseVisitor::on_error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorCode {
    InvalidSymbol,
    InvalidNumberFormat,
    PropertyNameExpected,
    ValueExpected,
    ColonExpected,
    CommaExpected,
    CloseBraceExpected,
    CloseBracketExpected,
    EndOfFileExpected,
    InvalidCommentToken,
    UnexpectedEndOfComment,
    UnexpectedEndOfString,
    UnexpectedEndOfNumber,
    InvalidUnicode,
    InvalidEscapeCharacter,
    InvalidCharacter,
}

impl ParseErrorCode {
    /// Short human-readable description, used in diagnostics.
    pub fn description(self) -> &'static str {
        match self {
            ParseErrorCode::InvalidSymbol => "invalid symbol",
            ParseErrorCode::InvalidNumberFormat => "invalid number format",
            ParseErrorCode::PropertyNameExpected => "property name expected",
            ParseErrorCode::ValueExpected => "value expected",
            ParseErrorCode::ColonExpected => "colon expected",
            ParseErrorCode::CommaExpected => "comma expected",
            ParseErrorCode::CloseBraceExpected => "closing brace expected",
            ParseErrorCode::CloseBracketExpected => "closing bracket expected",
            ParseErrorCode::EndOfFileExpected => "end of file expected",
            ParseErrorCode::InvalidCommentToken => "comments are not permitted",
            ParseErrorCode::UnexpectedEndOfComment => "unexpected end of comment",
            ParseErrorCode::UnexpectedEndOfString => "unexpected end of string",
            ParseErrorCode::UnexpectedEndOfNumber => "unexpected end of number",
            ParseErrorCode::InvalidUnicode => "invalid unicode escape",
            ParseErrorCode::InvalidEscapeCharacter => "invalid escape character",
            ParseErrorCode::InvalidCharacter => "invalid character",
        }
    }
}

/// Source location of a token or event.
///
/// `offset` and `length` are byte positions in the UTF-8 input. `line` is
/// zero-indexed; `column` is the byte offset from the start of that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub offset: usize,
    pub length: usize,
    pub line: usize,
    pub column: usize,
}

/// A byte range of the input, used to scope formatting to a sub-document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub offset: usize,
    pub length: usize,
}

/// One step in the path from the document root to the current parse
/// position: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(k) => Some(k),
            PathSegment::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Key(_) => None,
            PathSegment::Index(i) => Some(*i),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A single replacement instruction produced by the formatter: remove
/// `length` bytes starting at `offset` and insert `content` there.
///
/// Edits returned by [`format`] are sorted left to right and never overlap.
///
/// [`format`]: crate::format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub offset: usize,
    pub length: usize,
    pub content: String,
}
