//! # jsonc-tools
//!
//! A scanner, event-driven parser, and minimal-edit formatter for JSONC —
//! JSON extended with `//` and `/* */` comments and (optionally) trailing
//! commas.
//!
//! The crate is built around three layered pieces:
//!
//! - [`Scanner`] turns a character buffer into classified tokens with byte
//!   offsets, line/column positions, and granular lexical error codes. It
//!   never fails; malformed input degrades to flagged tokens.
//! - [`parse`] drives a recursive-descent walk over the token stream,
//!   reporting structural events (object/array begin and end, properties,
//!   literals, separators, comments, errors) to a [`ParseVisitor`], with
//!   the current property path available at every event. Malformed input
//!   is skipped over with bounded recovery rather than aborting the walk.
//! - [`format`] re-scans a document (or a line-aligned sub-range) and
//!   computes the minimal list of text edits that normalizes whitespace,
//!   indentation, and line endings — comments and data are never touched,
//!   and formatting already-formatted text produces no edits.
//!
//! ## Command-Line Tool
//!
//! The crate ships the `jfmt` binary for formatting and validating JSONC
//! from the terminal:
//!
//! ```sh
//! # Format a file in place of stdout
//! jfmt settings.jsonc
//!
//! # Two-space indent, reject comments, validate only
//! jfmt --indent 2 --no-comments --check settings.json
//! ```
//!
//! ## Formatting
//!
//! ```rust
//! use jsonc_tools::{format_text, FormatOptions};
//!
//! let options = FormatOptions { tab_size: 2, ..Default::default() };
//! let output = format_text("{\"a\":1}", &options).unwrap();
//! assert_eq!(output, "{\n  \"a\": 1\n}");
//! ```
//!
//! ## Reading configuration files
//!
//! ```rust
//! use jsonc_tools::{parse_to_value, ParseOptions};
//!
//! let source = "{\n  // listen here\n  \"port\": 8080,\n}";
//! let options = ParseOptions { allow_trailing_commas: true, ..Default::default() };
//! let (value, issues) = parse_to_value(source, &options);
//! assert!(issues.is_empty());
//! assert_eq!(value["port"], 8080);
//! ```
//!
//! ## Walking a document
//!
//! ```rust
//! use jsonc_tools::{parse, ParseOptions, ParseVisitor, PathSegment, Span};
//!
//! #[derive(Default)]
//! struct KeyCollector(Vec<String>);
//!
//! impl ParseVisitor for KeyCollector {
//!     fn on_object_property(&mut self, name: &str, _span: Span, _path: &[PathSegment]) {
//!         self.0.push(name.to_string());
//!     }
//! }
//!
//! let mut keys = KeyCollector::default();
//! parse("{\"a\": 1, \"b\": 2}", &mut keys, &ParseOptions::default());
//! assert_eq!(keys.0, ["a", "b"]);
//! ```
//!
//! ## Error reporting
//!
//! Validity and "did we get a value" are deliberately separate channels:
//! [`parse`] returns `true` whenever a top-level value was structurally
//! obtained, and every anomaly — lexical or structural — is reported
//! through [`ParseVisitor::on_error`]. Best-effort consumers (editors,
//! config loaders) use the partial result; strict ones check the error
//! channel.

mod edit;
mod error;
mod formatter;
mod model;
mod parser;
mod scanner;
mod value;

pub use crate::edit::{apply_edits, format_text};
pub use crate::error::JsoncError;
pub use crate::formatter::{format, EolStyle, FormatOptions};
pub use crate::model::{
    ParseErrorCode, PathSegment, Range, ScanError, Span, TextEdit, TokenKind,
};
pub use crate::parser::{parse, ParseOptions, ParseVisitor};
pub use crate::scanner::Scanner;
pub use crate::value::{parse_to_value, serialize_formatted, ParseIssue};
