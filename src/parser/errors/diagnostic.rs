//! Parse diagnostics
//!
//! Provides rich error information including:
//! - Error codes for categorization
//! - Hints/suggestions for fixes

use text_size::{TextRange, TextSize};

use super::codes::ErrorCode;
use crate::base::Position;

/// An error recorded while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Human-readable error message
    pub message: String,
    /// Source location (byte offsets into the parsed input)
    pub range: TextRange,
    /// Categorized error code
    pub code: ErrorCode,
    /// Optional suggestion for fixing the error
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal information
    pub fn new(message: impl Into<String>, range: TextRange, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            range,
            code,
            hint: None,
        }
    }

    /// Create a builder for more complex diagnostic construction
    pub fn builder(code: ErrorCode) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code)
    }

    /// Line/column of the start of the range within `source`
    pub fn position(&self, source: &str) -> Position {
        Position::at_offset(source, self.range.start())
    }

    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        let mut result = format!("{}: {}", self.code, self.message);
        if let Some(hint) = &self.hint {
            result.push_str(&format!("\n  hint: {}", hint));
        }
        result
    }

    /// Format the diagnostic with a `line:column` prefix (1-based)
    pub fn format_with_source(&self, source: &str) -> String {
        let pos = self.position(source);
        format!("{}:{}: error {}", pos.line + 1, pos.column + 1, self.format())
    }
}

/// Builder for creating complex diagnostics
pub struct DiagnosticBuilder {
    code: ErrorCode,
    message: Option<String>,
    range: Option<TextRange>,
    hint: Option<String>,
}

impl DiagnosticBuilder {
    /// Create a new builder with an error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: None,
            range: None,
            hint: None,
        }
    }

    /// Set the error message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the source range
    pub fn range(mut self, range: TextRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Add a hint
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Build the diagnostic
    ///
    /// A missing message falls back to the code's default message and a
    /// missing range to an empty range at offset 0.
    pub fn build(self) -> Diagnostic {
        Diagnostic {
            message: self
                .message
                .unwrap_or_else(|| self.code.default_message().to_string()),
            range: self
                .range
                .unwrap_or_else(|| TextRange::empty(TextSize::new(0))),
            code: self.code,
            hint: self.hint,
        }
    }
}
