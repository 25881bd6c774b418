use jsonc_tools::{parse_to_value, serialize_formatted, FormatOptions, ParseErrorCode, ParseOptions};
use serde::Serialize;
use serde_json::json;

fn lenient() -> ParseOptions {
    ParseOptions {
        allow_trailing_commas: true,
        ..Default::default()
    }
}

#[test]
fn reads_a_config_file() {
    let source = r#"{
  // server settings
  "host": "localhost",
  "port": 8080,
  "features": ["a", "b"], // enabled features
}"#;
    let (value, issues) = parse_to_value(source, &lenient());
    assert!(issues.is_empty(), "{:?}", issues);
    assert_eq!(
        value,
        json!({
            "host": "localhost",
            "port": 8080,
            "features": ["a", "b"],
        })
    );
}

#[test]
fn duplicate_keys_keep_the_last() {
    let (value, issues) = parse_to_value("{\"a\": 1, \"a\": 2}", &ParseOptions::default());
    assert!(issues.is_empty());
    assert_eq!(value, json!({"a": 2}));
}

#[test]
fn malformed_property_is_dropped_from_the_value() {
    let (value, issues) = parse_to_value("{\"a\": }", &ParseOptions::default());
    assert_eq!(value, json!({}));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, ParseErrorCode::ValueExpected);
}

#[test]
fn empty_input_yields_null() {
    let (value, issues) = parse_to_value("", &ParseOptions::default());
    assert!(value.is_null());
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, ParseErrorCode::ValueExpected);
}

#[test]
fn overflowing_number_substitutes_zero() {
    let (value, issues) = parse_to_value("[1, 2e999]", &ParseOptions::default());
    assert_eq!(value, json!([1, 0]));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, ParseErrorCode::InvalidNumberFormat);
}

#[test]
fn issue_spans_carry_positions() {
    let (_, issues) = parse_to_value("{\n  \"a\" 1\n}", &ParseOptions::default());
    assert_eq!(issues[0].code, ParseErrorCode::ColonExpected);
    assert_eq!(issues[0].span.line, 1);
    assert_eq!(issues[0].span.column, 6);
}

#[test]
fn serializes_a_struct_formatted() {
    #[derive(Serialize)]
    struct Config {
        name: String,
        port: u16,
    }

    let config = Config {
        name: "demo".to_string(),
        port: 8080,
    };
    let options = FormatOptions {
        tab_size: 2,
        ..Default::default()
    };
    let out = serialize_formatted(&config, &options).unwrap();
    assert_eq!(out, "{\n  \"name\": \"demo\",\n  \"port\": 8080\n}");
}
