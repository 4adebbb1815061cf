//! Error code definitions for grammar diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Registry errors (declarations, kinds, names)
//! - E02xx: Parse errors (repetitions, tokens, rules, precedence)
//! - E03xx: Quotation errors

use std::fmt;

/// Error codes for grammar diagnostics
///
/// Registry and quotation codes are attached to
/// [`GrammarError`](crate::grammar::GrammarError) values; parse codes are
/// attached to recorded [`Diagnostic`](super::Diagnostic)s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Registry errors
    // =========================================================================
    /// Category declared twice
    DuplicateCategory,
    /// Reference to a category that was never declared
    UnknownCategory,
    /// Explicit rule kind collides with an existing kind
    DuplicateKind,
    /// Named parser declared twice
    DuplicateName,

    // =========================================================================
    // E02xx: Parse errors
    // =========================================================================
    /// One-or-more repetition matched nothing
    EmptyRepetition,
    /// Separator not followed by an item
    DanglingSeparator,
    /// Token does not fit the expected terminal
    UnexpectedToken,
    /// No rule of the category applies at this position
    NoMatchingRule,
    /// A rule would start here but binds too loosely for the position
    PrecedenceViolation,

    // =========================================================================
    // E03xx: Quotation errors
    // =========================================================================
    /// Capture count differs from the quotation's placeholder count
    ArityMismatch,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            // Registry
            Self::DuplicateCategory => "E0101",
            Self::UnknownCategory => "E0102",
            Self::DuplicateKind => "E0103",
            Self::DuplicateName => "E0104",
            // Parse
            Self::EmptyRepetition => "E0201",
            Self::DanglingSeparator => "E0202",
            Self::UnexpectedToken => "E0203",
            Self::NoMatchingRule => "E0204",
            Self::PrecedenceViolation => "E0205",
            // Quotation
            Self::ArityMismatch => "E0301",
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::DuplicateCategory => "category already declared",
            Self::UnknownCategory => "unknown category",
            Self::DuplicateKind => "rule kind already registered",
            Self::DuplicateName => "named parser already declared",
            Self::EmptyRepetition => "expected at least one item",
            Self::DanglingSeparator => "separator must be followed by an item",
            Self::UnexpectedToken => "unexpected token",
            Self::NoMatchingRule => "no rule matches",
            Self::PrecedenceViolation => "operator binds too loosely here",
            Self::ArityMismatch => "wrong number of captures",
        }
    }

    /// Rank used to pick the most specific failure among those recorded at
    /// the same token position.
    pub(crate) fn specificity(&self) -> u8 {
        match self {
            Self::UnexpectedToken => 0,
            Self::NoMatchingRule | Self::UnknownCategory => 1,
            Self::PrecedenceViolation => 2,
            Self::EmptyRepetition | Self::DanglingSeparator => 3,
            Self::DuplicateCategory | Self::DuplicateKind | Self::DuplicateName | Self::ArityMismatch => 4,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
