use std::fmt::{self, Display};

use crate::model::Span;

/// Error type for the fallible surfaces of the crate: edit application,
/// whole-document formatting, and serialization. The scanner and the event
/// parser never produce this — they degrade to error codes instead.
#[derive(Debug, Clone)]
pub struct JsoncError {
    pub message: String,
    pub span: Option<Span>,
}

impl JsoncError {
    pub fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    pub fn simple(message: impl Into<String>) -> Self {
        Self::new(message, None)
    }
}

impl Display for JsoncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(
                f,
                "{} at line {}, column {}",
                self.message,
                span.line + 1,
                span.column + 1
            ),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for JsoncError {}
