//! Structured error type produced when a Papyrus script fails to parse.
//!
//! The parser never recovers: the first [`ParseError`] produced ends the parse, so unlike a
//! recovering parser there is no diagnostic list, budget tracker, or suggestion machinery here —
//! just the error itself plus an optional [`ErrorContext`] for rendering it against source text.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use papyrus_position::{ByteSpan, LineIndex};
use thiserror::Error;

/// The taxonomy of errors the parser can produce, per the grammar's error table.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An unknown token, a missing expected token, an unclosed string/char literal, or an
    /// invalid number.
    #[error("unexpected token")]
    UnexpectedToken,
    /// A missing, duplicated, or filename-mismatched `ScriptName` declaration.
    #[error("script name")]
    ScriptName,
    /// A violated property semantic rule (flag combination, missing init, empty full body, ...).
    #[error("property")]
    Property,
    /// An invalid, out-of-line, or duplicate `FunctionStatement` flag.
    #[error("function flag")]
    FunctionFlag,
    /// An invalid or duplicate `EventStatement` flag.
    #[error("event flag")]
    EventFlag,
    /// Reached `Eof` while a block was still expecting a closing keyword.
    #[error("block statement")]
    BlockStatement,
    /// A `StateStatement` body contained something other than a function or event.
    #[error("state statement")]
    StateStatement,
    /// Misuse of the `Parent` keyword (as a callee, or chained off another member).
    #[error("parent member")]
    ParentMember,
}

/// A parse failure: its taxonomy, a human-readable message, and the byte span it applies to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ParseError {
    /// Which row of the error taxonomy this is.
    pub kind: ErrorKind,
    /// Human-readable description of what went wrong.
    pub message: String,
    /// Starting byte offset (inclusive).
    pub start: usize,
    /// Ending byte offset (exclusive).
    pub end: usize,
}

impl ParseError {
    /// Builds a new error of `kind` covering `[start, end)`.
    pub fn new(kind: ErrorKind, message: impl Into<String>, start: usize, end: usize) -> Self {
        ParseError { kind, message: message.into(), start, end }
    }

    /// Builds a new error of `kind` at the single-point span `[pos, pos)`.
    pub fn at(kind: ErrorKind, message: impl Into<String>, pos: usize) -> Self {
        ParseError::new(kind, message, pos, pos)
    }

    /// This error's span.
    pub fn span(&self) -> ByteSpan {
        ByteSpan::new(self.start, self.end)
    }
}

/// Result type returned by every parsing operation.
pub type ParseResult<T> = Result<T, ParseError>;

/// A [`ParseError`] enriched with a line/column position and the offending source line, suitable
/// for rendering to a terminal or log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// The underlying parse error.
    pub error: ParseError,
    /// Zero-indexed line number.
    pub line: u32,
    /// Zero-indexed, UTF-16-code-unit column.
    pub column: u32,
    /// The full text of the source line the error starts on.
    pub source_line: String,
}

impl ErrorContext {
    /// Builds an [`ErrorContext`] by looking `error`'s start offset up in `index`.
    pub fn new(error: ParseError, source: &str, index: &LineIndex) -> Self {
        let safe_start = error.start.min(source.len());
        let (line, column) = index.offset_to_position(safe_start);
        let source_line = index.line_text(safe_start).to_string();
        ErrorContext { error, line, column, source_line }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_combines_kind_and_message() {
        let err = ParseError::new(ErrorKind::ScriptName, "duplicate ScriptName", 10, 20);
        assert_eq!(err.to_string(), "script name: duplicate ScriptName");
    }

    #[test]
    fn span_reflects_start_and_end() {
        let err = ParseError::at(ErrorKind::UnexpectedToken, "bad token", 7);
        assert_eq!(err.span(), ByteSpan::new(7, 7));
    }

    #[test]
    fn error_context_locates_line_and_column() {
        let source = "ScriptName Foo\nInt Property P = 1\n";
        let index = LineIndex::new(source);
        let err = ParseError::at(ErrorKind::Property, "Missing Hidden flag for Full Property", 15);
        let ctx = ErrorContext::new(err, source, &index);
        assert_eq!(ctx.line, 1);
        assert_eq!(ctx.column, 0);
        assert_eq!(ctx.source_line, "Int Property P = 1");
    }
}
