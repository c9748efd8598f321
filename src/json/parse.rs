//! Purpose: Decode JSON documents and describe decode failures for users.
//! Exports: `from_str`, `ParseFailureCategory`, `categorize_error`, `hint_for_error`,
//!          `parse_error`.
//! Role: Parser boundary that centralizes serde_json usage and error mapping.
//! Invariants: Category labels are stable; hints never echo document contents.
use serde::de::DeserializeOwned;

use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseFailureCategory {
    Syntax,
    Data,
    Eof,
    Io,
}

impl ParseFailureCategory {
    pub fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Data => "data",
            ParseFailureCategory::Eof => "unexpected-eof",
            ParseFailureCategory::Io => "io",
        }
    }
}

pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(input)
}

pub fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    match err.classify() {
        serde_json::error::Category::Syntax => ParseFailureCategory::Syntax,
        serde_json::error::Category::Data => ParseFailureCategory::Data,
        serde_json::error::Category::Eof => ParseFailureCategory::Eof,
        serde_json::error::Category::Io => ParseFailureCategory::Io,
    }
}

pub fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    format!(
        "parse category: {}; line {}, column {}; context: {context}",
        categorize_error(err).label(),
        err.line(),
        err.column()
    )
}

/// Wrap a decode failure as a malformed-input error.
pub fn parse_error(err: serde_json::Error, context: &str) -> Error {
    let hint = hint_for_error(&err, context);
    Error::new(ErrorKind::Malformed)
        .with_message("input is not valid JSON")
        .with_hint(hint)
        .with_source(err)
}
