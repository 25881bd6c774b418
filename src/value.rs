use serde_json::Value;

use crate::edit::format_text;
use crate::error::JsoncError;
use crate::formatter::FormatOptions;
use crate::model::{ParseErrorCode, PathSegment, Span};
use crate::parser::{parse, ParseOptions, ParseVisitor};

/// One problem found while materializing a document into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseIssue {
    pub code: ParseErrorCode,
    pub span: Span,
}

/// Materializes a JSONC document into a [`serde_json::Value`], collecting
/// every reported problem as a [`ParseIssue`].
///
/// The value is best-effort: malformed regions are skipped by the parser's
/// recovery and whatever was structurally obtained is returned, with
/// `Value::Null` standing in when nothing was. An empty issue list is the
/// signal that the document was valid; the value alone is not.
/// Duplicate object keys keep the last occurrence.
pub fn parse_to_value(text: &str, options: &ParseOptions) -> (Value, Vec<ParseIssue>) {
    let mut builder = ValueBuilder::default();
    parse(text, &mut builder, options);
    let value = match builder.roots.into_iter().next() {
        Some(v) => v,
        None => Value::Null,
    };
    (value, builder.issues)
}

/// Serializes any [`serde::Serialize`] type and formats the result with
/// the given options.
pub fn serialize_formatted<T: serde::Serialize>(
    value: &T,
    options: &FormatOptions,
) -> Result<String, JsoncError> {
    let text = serde_json::to_string(value)
        .map_err(|e| JsoncError::simple(format!("serialization failed: {e}")))?;
    format_text(&text, options)
}

// Containers under construction. Values attach to their parent when the
// container closes, since a Rust value cannot be both owned by its parent
// and still being filled in.
enum Open {
    Object(serde_json::Map<String, Value>, Option<String>),
    Array(Vec<Value>),
}

#[derive(Default)]
struct ValueBuilder {
    stack: Vec<Open>,
    roots: Vec<Value>,
    issues: Vec<ParseIssue>,
}

impl ValueBuilder {
    fn attach(&mut self, value: Value) {
        match self.stack.last_mut() {
            Some(Open::Array(items)) => items.push(value),
            Some(Open::Object(map, property)) => {
                if let Some(name) = property.take() {
                    map.insert(name, value);
                }
            }
            None => self.roots.push(value),
        }
    }
}

impl ParseVisitor for ValueBuilder {
    fn on_object_begin(&mut self, _span: Span, _path: &[PathSegment]) {
        self.stack.push(Open::Object(serde_json::Map::new(), None));
    }

    fn on_object_property(&mut self, name: &str, _span: Span, _path: &[PathSegment]) {
        if let Some(Open::Object(_, property)) = self.stack.last_mut() {
            *property = Some(name.to_string());
        }
    }

    fn on_object_end(&mut self, _span: Span) {
        if let Some(Open::Object(map, _)) = self.stack.pop() {
            self.attach(Value::Object(map));
        }
    }

    fn on_array_begin(&mut self, _span: Span, _path: &[PathSegment]) {
        self.stack.push(Open::Array(Vec::new()));
    }

    fn on_array_end(&mut self, _span: Span) {
        if let Some(Open::Array(items)) = self.stack.pop() {
            self.attach(Value::Array(items));
        }
    }

    fn on_literal_value(&mut self, value: Value, _span: Span, _path: &[PathSegment]) {
        self.attach(value);
    }

    fn on_error(&mut self, code: ParseErrorCode, span: Span) {
        self.issues.push(ParseIssue { code, span });
    }
}
