//! Diagnostics support for grammar layers
//!
//! The tokenizer itself never fails — every input produces a complete token
//! stream. [`SyntaxError`] is the diagnostic type for the grammar-driven
//! parsers layered on top of this crate: built from a resolved
//! [`SourceLocation`], it carries the precise position data those layers
//! need for reporting.

use thiserror::Error;

use crate::location::SourceLocation;

/// A grammar-level syntax error with a resolved source position
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({source_name}:{line}:{column})")]
pub struct SyntaxError {
    /// What went wrong
    pub message: String,
    /// Name of the source the error belongs to
    pub source_name: String,
    /// Byte offset of the error
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column number
    pub column: usize,
}

impl SyntaxError {
    /// Creates an error from a message and a resolved location
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        SyntaxError {
            message: message.into(),
            source_name: location.source,
            offset: location.offset,
            line: location.line,
            column: location.column,
        }
    }

    /// Renders the error with the offending source line and a caret marker
    pub fn format_with_source(&self, source: &str) -> String {
        let mut rendered = format!("{self}\n");

        if let Some(line_text) = source.lines().nth(self.line.saturating_sub(1)) {
            let gutter = self.line.to_string();
            rendered.push_str(&format!("{gutter} | {line_text}\n"));
            let spaces = " ".repeat(gutter.len() + 3 + self.column.saturating_sub(1));
            rendered.push_str(&format!("{spaces}^\n"));
        }

        rendered
    }
}
