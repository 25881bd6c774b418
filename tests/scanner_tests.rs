use jsonc_tools::{ScanError, Scanner, TokenKind};

fn all_tokens(text: &str) -> Vec<(TokenKind, String)> {
    let mut scanner = Scanner::new(text);
    let mut out = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == TokenKind::Eof {
            return out;
        }
        out.push((kind, scanner.token_value().to_string()));
    }
}

#[test]
fn object_with_trivia_skipped() {
    let mut scanner = Scanner::skipping_trivia("{ \"key\": 42 }");
    assert_eq!(scanner.scan(), TokenKind::OpenBrace);
    assert_eq!(scanner.scan(), TokenKind::String);
    assert_eq!(scanner.token_value(), "key");
    assert_eq!(scanner.scan(), TokenKind::Colon);
    assert_eq!(scanner.scan(), TokenKind::Number);
    assert_eq!(scanner.token_value(), "42");
    assert_eq!(scanner.token_offset(), 9);
    assert_eq!(scanner.token_length(), 2);
    assert_eq!(scanner.scan(), TokenKind::CloseBrace);
    assert_eq!(scanner.scan(), TokenKind::Eof);
}

#[test]
fn string_escapes_are_decoded() {
    let mut scanner = Scanner::new(r#""a\nb\tA\\""#);
    assert_eq!(scanner.scan(), TokenKind::String);
    assert_eq!(scanner.token_error(), ScanError::None);
    assert_eq!(scanner.token_value(), "a\nb\tA\\");
}

#[test]
fn invalid_escape_is_flagged_but_token_survives() {
    let mut scanner = Scanner::new(r#""a\qb""#);
    assert_eq!(scanner.scan(), TokenKind::String);
    assert_eq!(scanner.token_error(), ScanError::InvalidEscapeCharacter);
    assert_eq!(scanner.scan(), TokenKind::Eof);
}

#[test]
fn unterminated_string_at_eof() {
    let mut scanner = Scanner::new("\"abc");
    assert_eq!(scanner.scan(), TokenKind::String);
    assert_eq!(scanner.token_error(), ScanError::UnexpectedEndOfString);
    assert_eq!(scanner.token_value(), "abc");
}

#[test]
fn line_break_terminates_string() {
    // The break is not part of the string token; it is scanned next.
    let mut scanner = Scanner::new("\"ab\ncd\"");
    assert_eq!(scanner.scan(), TokenKind::String);
    assert_eq!(scanner.token_error(), ScanError::UnexpectedEndOfString);
    assert_eq!(scanner.token_value(), "ab");
    assert_eq!(scanner.scan(), TokenKind::LineBreak);
}

#[test]
fn raw_control_character_inside_string() {
    let mut scanner = Scanner::new("\"a\u{01}b\"");
    assert_eq!(scanner.scan(), TokenKind::String);
    assert_eq!(scanner.token_error(), ScanError::InvalidCharacter);
    // Scanning still reaches the closing quote.
    assert_eq!(scanner.token_value(), "a\u{01}b");
    assert_eq!(scanner.scan(), TokenKind::Eof);
}

#[test]
fn leading_zero_run_is_one_flagged_token() {
    let mut scanner = Scanner::new("0123");
    assert_eq!(scanner.scan(), TokenKind::Number);
    assert_eq!(scanner.token_error(), ScanError::UnexpectedEndOfNumber);
    assert_eq!(scanner.token_value(), "0123");
    assert_eq!(scanner.token_length(), 4);
    assert_eq!(scanner.scan(), TokenKind::Eof);
}

#[test]
fn bare_fraction_and_exponent_are_flagged() {
    let mut scanner = Scanner::new("1.");
    assert_eq!(scanner.scan(), TokenKind::Number);
    assert_eq!(scanner.token_error(), ScanError::UnexpectedEndOfNumber);
    assert_eq!(scanner.token_value(), "1.");

    let mut scanner = Scanner::new("2e");
    assert_eq!(scanner.scan(), TokenKind::Number);
    assert_eq!(scanner.token_error(), ScanError::UnexpectedEndOfNumber);

    let mut scanner = Scanner::new("2e+3");
    assert_eq!(scanner.scan(), TokenKind::Number);
    assert_eq!(scanner.token_error(), ScanError::None);
    assert_eq!(scanner.token_value(), "2e+3");
}

#[test]
fn lone_minus_is_unknown() {
    let tokens = all_tokens("- 3");
    assert_eq!(tokens[0], (TokenKind::Unknown, "-".to_string()));
    assert_eq!(tokens[1].0, TokenKind::Whitespace);
    assert_eq!(tokens[2], (TokenKind::Number, "3".to_string()));
}

#[test]
fn keywords_and_barewords() {
    let mut scanner = Scanner::skipping_trivia("true false null truely");
    assert_eq!(scanner.scan(), TokenKind::TrueKeyword);
    assert_eq!(scanner.scan(), TokenKind::FalseKeyword);
    assert_eq!(scanner.scan(), TokenKind::NullKeyword);
    assert_eq!(scanner.scan(), TokenKind::Unknown);
    assert_eq!(scanner.token_value(), "truely");
}

#[test]
fn line_comment_stops_at_break() {
    let tokens = all_tokens("// note\n1");
    assert_eq!(tokens[0], (TokenKind::LineComment, "// note".to_string()));
    assert_eq!(tokens[1].0, TokenKind::LineBreak);
    assert_eq!(tokens[2].0, TokenKind::Number);
}

#[test]
fn unterminated_block_comment_keeps_its_text() {
    let mut scanner = Scanner::new("/* abc");
    assert_eq!(scanner.scan(), TokenKind::BlockComment);
    assert_eq!(scanner.token_error(), ScanError::UnexpectedEndOfComment);
    assert_eq!(scanner.token_value(), "/* abc");
}

#[test]
fn block_comment_spans_lines() {
    let mut scanner = Scanner::new("/* a\nb */ 1");
    assert_eq!(scanner.scan(), TokenKind::BlockComment);
    assert_eq!(scanner.token_start_line(), 0);
    // The line counter advanced past the embedded break.
    assert_eq!(scanner.scan(), TokenKind::Whitespace);
    assert_eq!(scanner.scan(), TokenKind::Number);
    assert_eq!(scanner.token_start_line(), 1);
}

#[test]
fn lines_and_columns() {
    let mut scanner = Scanner::skipping_trivia("  {\r\n   \"a\": 1\n}");
    assert_eq!(scanner.scan(), TokenKind::OpenBrace);
    assert_eq!(scanner.token_start_line(), 0);
    assert_eq!(scanner.token_start_character(), 2);
    assert_eq!(scanner.scan(), TokenKind::String);
    assert_eq!(scanner.token_start_line(), 1);
    assert_eq!(scanner.token_start_character(), 3);
    assert_eq!(scanner.scan(), TokenKind::Colon);
    assert_eq!(scanner.scan(), TokenKind::Number);
    assert_eq!(scanner.scan(), TokenKind::CloseBrace);
    assert_eq!(scanner.token_start_line(), 2);
    assert_eq!(scanner.token_start_character(), 0);
}

#[test]
fn tokens_never_overlap() {
    let text = "{\"a\": [1, tru, \"x\n], // note\n/* y */ 0123}";
    let mut scanner = Scanner::new(text);
    let mut previous_end = 0;
    while scanner.scan() != TokenKind::Eof {
        assert!(scanner.token_offset() >= previous_end);
        previous_end = scanner.token_offset() + scanner.token_length();
    }
    assert_eq!(previous_end, text.len());
}

#[test]
fn set_position_resumes_midway() {
    let text = "[1, 2, 3]";
    let mut scanner = Scanner::skipping_trivia(text);
    scanner.set_position(4);
    assert_eq!(scanner.token(), TokenKind::Unknown);
    assert_eq!(scanner.token_value(), "");
    assert_eq!(scanner.scan(), TokenKind::Number);
    assert_eq!(scanner.token_value(), "2");
    assert_eq!(scanner.token_offset(), 4);
}
