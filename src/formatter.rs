use serde::{Deserialize, Serialize};

use crate::model::{Range, ScanError, TextEdit, TokenKind};
use crate::scanner::Scanner;

/// Line ending style for formatted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EolStyle {
    /// Unix-style line endings (`\n`).
    Lf,
    /// Windows-style line endings (`\r\n`).
    Crlf,
}

impl EolStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            EolStyle::Lf => "\n",
            EolStyle::Crlf => "\r\n",
        }
    }
}

/// Options controlling whitespace normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Width of one indentation level, in spaces. Default: 4.
    pub tab_size: usize,
    /// Indent with spaces rather than tabs. Default: true.
    pub insert_spaces: bool,
    /// Preserve the document's existing line-break placement instead of
    /// forcing the canonical one-token-per-line layout; runs of blank
    /// lines are kept at their original count. Default: false.
    pub keep_lines: bool,
    /// Ensure the document ends with a line break. Default: false.
    pub insert_final_newline: bool,
    /// Line ending to use. `None` adopts the first line break found in the
    /// document, falling back to [`EolStyle::Lf`].
    pub eol: Option<EolStyle>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            insert_spaces: true,
            keep_lines: false,
            insert_final_newline: false,
            eol: None,
        }
    }
}

/// Computes the minimal whitespace edits that normalize `text` (or the
/// line-expanded `range` within it) according to `options`.
///
/// The returned edits are sorted left to right, never overlap, and are
/// only produced where the desired whitespace differs from the source, so
/// formatting already-formatted text yields an empty list. On the first
/// lexical error or impossible token adjacency the formatter stops
/// emitting edits rather than risk corrupting a document it cannot fully
/// understand; everything before the error point is still normalized.
pub fn format(text: &str, range: Option<Range>, options: &FormatOptions) -> Vec<TextEdit> {
    FormatRun::new(text, range, options).run()
}

// Bounded cache of precomputed line-break-plus-indentation strings. Deeper
// nesting falls back to direct repetition with identical output.
struct IndentCache {
    eol: String,
    unit: String,
    levels: Vec<String>,
}

const CACHED_INDENT_DEPTH: usize = 10;

impl IndentCache {
    fn new(eol: String, unit: String) -> Self {
        Self {
            eol,
            unit,
            levels: Vec::new(),
        }
    }

    fn line_and_indent(&mut self, level: usize) -> String {
        if level >= CACHED_INDENT_DEPTH {
            return format!("{}{}", self.eol, self.unit.repeat(level));
        }
        while self.levels.len() <= level {
            let entry = format!("{}{}", self.eol, self.unit.repeat(self.levels.len()));
            self.levels.push(entry);
        }
        self.levels[level].clone()
    }
}

struct FormatRun<'a> {
    document: &'a str,
    scanner: Scanner<'a>,
    // Offset of the scanned slice within the full document.
    base: usize,
    // Requested (unexpanded) range; edits outside it are discarded.
    clip: Option<(usize, usize)>,
    initial_indent: usize,
    indent_level: isize,
    indent_unit: String,
    eol: String,
    keep_lines: bool,
    insert_final_newline: bool,
    line_breaks: usize,
    has_error: bool,
    cache: IndentCache,
    edits: Vec<TextEdit>,
}

impl<'a> FormatRun<'a> {
    fn new(document: &'a str, range: Option<Range>, options: &FormatOptions) -> Self {
        let (base, end, clip, initial_indent) = match range {
            Some(r) => {
                let clip_start = r.offset.min(document.len());
                let clip_end = (r.offset + r.length).min(document.len());
                let start = expand_to_line_start(document, clip_start);
                let end = expand_to_line_end(document, clip_end);
                let indent = compute_indent_level(&document[start..end], options);
                (start, end, Some((clip_start, clip_end)), indent)
            }
            None => (0, document.len(), None, 0),
        };

        let eol = match options.eol {
            Some(style) => style.as_str().to_string(),
            None => detect_eol(document).as_str().to_string(),
        };
        let indent_unit = if options.insert_spaces {
            " ".repeat(options.tab_size.max(1))
        } else {
            "\t".to_string()
        };

        Self {
            document,
            scanner: Scanner::new(&document[base..end]),
            base,
            clip,
            initial_indent,
            indent_level: 0,
            indent_unit: indent_unit.clone(),
            eol: eol.clone(),
            keep_lines: options.keep_lines,
            insert_final_newline: options.insert_final_newline,
            line_breaks: 0,
            has_error: false,
            cache: IndentCache::new(eol, indent_unit),
            edits: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<TextEdit> {
        let mut first = self.scan_next();
        if first != TokenKind::Eof {
            // Preserved leading breaks and the initial indent form one
            // replacement, so an already-formatted prefix compares equal
            // to the source and produces no edit.
            let first_start = self.token_start();
            let mut prefix = if self.keep_lines && self.line_breaks > 0 {
                self.eol.repeat(self.line_breaks)
            } else {
                String::new()
            };
            prefix.push_str(&self.indent_unit.repeat(self.initial_indent));
            self.add_edit(prefix, self.base, first_start);
        }

        while first != TokenKind::Eof {
            let mut first_end = self.token_end();
            let mut second = self.scan_next();

            let mut replace = String::new();
            let mut needs_break = false;
            // Comments directly following a token stay on its line,
            // separated by a single space.
            while self.line_breaks == 0 && second.is_comment() {
                let comment_start = self.token_start();
                self.add_edit(" ".to_string(), first_end, comment_start);
                first_end = self.token_end();
                needs_break = second == TokenKind::LineComment;
                replace = if needs_break {
                    self.line_and_indent()
                } else {
                    String::new()
                };
                second = self.scan_next();
            }

            if second == TokenKind::CloseBrace {
                if first != TokenKind::OpenBrace {
                    self.indent_level -= 1;
                }
                if (self.keep_lines && self.line_breaks > 0)
                    || (!self.keep_lines && first != TokenKind::OpenBrace)
                {
                    replace = self.line_and_indent();
                } else if self.keep_lines {
                    replace = " ".to_string();
                }
            } else if second == TokenKind::CloseBracket {
                if first != TokenKind::OpenBracket {
                    self.indent_level -= 1;
                }
                if (self.keep_lines && self.line_breaks > 0)
                    || (!self.keep_lines && first != TokenKind::OpenBracket)
                {
                    replace = self.line_and_indent();
                } else if self.keep_lines {
                    replace = " ".to_string();
                }
            } else {
                match first {
                    TokenKind::OpenBrace | TokenKind::OpenBracket => {
                        self.indent_level += 1;
                        if !self.keep_lines || self.line_breaks > 0 {
                            replace = self.line_and_indent();
                        } else {
                            replace = " ".to_string();
                        }
                    }
                    TokenKind::Comma => {
                        if !self.keep_lines || self.line_breaks > 0 {
                            replace = self.line_and_indent();
                        } else {
                            replace = " ".to_string();
                        }
                    }
                    TokenKind::LineComment => {
                        replace = self.line_and_indent();
                    }
                    TokenKind::BlockComment => {
                        if self.line_breaks > 0 {
                            replace = self.line_and_indent();
                        } else if !needs_break {
                            replace = " ".to_string();
                        }
                    }
                    TokenKind::Colon => {
                        if self.keep_lines && self.line_breaks > 0 {
                            replace = self.line_and_indent();
                        } else if !needs_break {
                            replace = " ".to_string();
                        }
                    }
                    TokenKind::String if second == TokenKind::Colon => {
                        if self.keep_lines && self.line_breaks > 0 {
                            replace = self.line_and_indent();
                        } else if !needs_break {
                            replace = String::new();
                        }
                    }
                    TokenKind::String
                    | TokenKind::Number
                    | TokenKind::NullKeyword
                    | TokenKind::TrueKeyword
                    | TokenKind::FalseKeyword
                    | TokenKind::CloseBrace
                    | TokenKind::CloseBracket => {
                        if self.keep_lines && self.line_breaks > 0 {
                            replace = self.line_and_indent();
                        } else if second.is_comment() && !needs_break {
                            replace = " ".to_string();
                        } else if second != TokenKind::Comma && second != TokenKind::Eof {
                            // Two values with no separator between them.
                            self.has_error = true;
                        }
                    }
                    TokenKind::Unknown => {
                        self.has_error = true;
                    }
                    _ => {}
                }
                // A comment preceded by a line break keeps its own line.
                if self.line_breaks > 0 && second.is_comment() {
                    replace = self.line_and_indent();
                }
            }

            if second == TokenKind::Eof {
                replace = if self.keep_lines && self.line_breaks > 0 {
                    self.eol.repeat(self.line_breaks)
                } else if self.insert_final_newline {
                    self.eol.clone()
                } else {
                    String::new()
                };
            }

            let second_start = self.token_start();
            self.add_edit(replace, first_end, second_start);
            first = second;
        }
        self.edits
    }

    fn token_start(&self) -> usize {
        self.scanner.token_offset() + self.base
    }

    fn token_end(&self) -> usize {
        self.scanner.token_offset() + self.scanner.token_length() + self.base
    }

    // Advances past whitespace and line breaks, counting the latter, and
    // latches the error flag on any lexical problem.
    fn scan_next(&mut self) -> TokenKind {
        let mut token = self.scanner.scan();
        self.line_breaks = 0;
        while matches!(token, TokenKind::Whitespace | TokenKind::LineBreak) {
            if token == TokenKind::LineBreak {
                if self.keep_lines {
                    self.line_breaks += 1;
                } else {
                    self.line_breaks = 1;
                }
            }
            token = self.scanner.scan();
        }
        if token == TokenKind::Unknown || self.scanner.token_error() != ScanError::None {
            self.has_error = true;
        }
        token
    }

    fn line_and_indent(&mut self) -> String {
        let level = (self.initial_indent as isize + self.indent_level).max(0) as usize;
        if self.keep_lines && self.line_breaks > 1 {
            return format!("{}{}", self.eol.repeat(self.line_breaks), self.unit_repeat(level));
        }
        self.cache.line_and_indent(level)
    }

    fn unit_repeat(&self, level: usize) -> String {
        self.indent_unit.repeat(level)
    }

    fn add_edit(&mut self, content: String, start: usize, end: usize) {
        if self.has_error {
            return;
        }
        if let Some((clip_start, clip_end)) = self.clip {
            if start >= clip_end || end <= clip_start {
                return;
            }
        }
        if self.document[start..end] != content {
            self.edits.push(TextEdit {
                offset: start,
                length: end - start,
                content,
            });
        }
    }
}

fn expand_to_line_start(text: &str, mut offset: usize) -> usize {
    let bytes = text.as_bytes();
    while offset > 0 && bytes[offset - 1] != b'\n' && bytes[offset - 1] != b'\r' {
        offset -= 1;
    }
    offset
}

fn expand_to_line_end(text: &str, mut offset: usize) -> usize {
    let bytes = text.as_bytes();
    while offset < bytes.len() && bytes[offset] != b'\n' && bytes[offset] != b'\r' {
        offset += 1;
    }
    offset
}

// Indentation already present at the start of the formatted slice, in
// units of the configured tab size. Keeps range-scoped formatting aligned
// with the surrounding, unformatted context.
fn compute_indent_level(text: &str, options: &FormatOptions) -> usize {
    let tab_size = options.tab_size.max(1);
    let mut chars = 0usize;
    for c in text.chars() {
        match c {
            ' ' => chars += 1,
            '\t' => chars += tab_size,
            _ => break,
        }
    }
    chars / tab_size
}

fn detect_eol(text: &str) -> EolStyle {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'\r' => {
                if bytes.get(i + 1) == Some(&b'\n') {
                    return EolStyle::Crlf;
                }
                return EolStyle::Lf;
            }
            b'\n' => return EolStyle::Lf,
            _ => {}
        }
    }
    EolStyle::Lf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_cache_matches_direct_repetition() {
        let mut cache = IndentCache::new("\n".to_string(), "  ".to_string());
        for level in [0, 1, 5, CACHED_INDENT_DEPTH, CACHED_INDENT_DEPTH + 3] {
            assert_eq!(
                cache.line_and_indent(level),
                format!("\n{}", "  ".repeat(level))
            );
        }
    }

    #[test]
    fn eol_detection() {
        assert_eq!(detect_eol("a\r\nb"), EolStyle::Crlf);
        assert_eq!(detect_eol("a\nb"), EolStyle::Lf);
        assert_eq!(detect_eol("ab"), EolStyle::Lf);
    }

    #[test]
    fn indent_level_of_leading_whitespace() {
        let options = FormatOptions {
            tab_size: 4,
            ..Default::default()
        };
        assert_eq!(compute_indent_level("        {", &options), 2);
        assert_eq!(compute_indent_level("\t\t{", &options), 2);
        assert_eq!(compute_indent_level("{", &options), 0);
    }
}
