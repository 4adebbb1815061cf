//! Error types for registration and quotation operations.

use thiserror::Error;

use crate::base::Symbol;
use crate::parser::ErrorCode;

/// Errors returned by registry and quotation calls.
///
/// A registration call that fails leaves the registry unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// Category declared twice.
    #[error("category `{0}` is already declared")]
    DuplicateCategory(Symbol),

    /// Reference to an undeclared category.
    #[error("unknown category `{0}`")]
    UnknownCategory(Symbol),

    /// Explicit rule kind collides with an existing rule or named parser.
    #[error("kind `{0}` is already registered")]
    DuplicateKind(Symbol),

    /// Named parser declared twice.
    #[error("named parser `{0}` is already declared")]
    DuplicateName(Symbol),

    /// Kind that names neither a rule nor a named parser.
    #[error("unknown kind `{0}`")]
    UnknownKind(Symbol),

    /// Reference to an undeclared named parser.
    #[error("unknown named parser `{0}`")]
    UnknownNamedParser(Symbol),

    /// Capture count differs from the quotation's placeholder count.
    #[error("`{kind}` expects {expected} capture(s), found {found}")]
    ArityMismatch {
        kind: Symbol,
        expected: usize,
        found: usize,
    },

    /// Quotation template that does not parse or repeats a capture name.
    #[error("malformed quotation: {0}")]
    MalformedQuotation(String),

    /// Registration attempted on a frozen grammar.
    #[error("grammar is frozen")]
    Frozen,
}

impl GrammarError {
    /// Create a malformed quotation error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedQuotation(message.into())
    }

    /// The diagnostic code for this error, where one exists.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::DuplicateCategory(_) => Some(ErrorCode::DuplicateCategory),
            Self::UnknownCategory(_) => Some(ErrorCode::UnknownCategory),
            Self::DuplicateKind(_) => Some(ErrorCode::DuplicateKind),
            Self::DuplicateName(_) => Some(ErrorCode::DuplicateName),
            Self::ArityMismatch { .. } => Some(ErrorCode::ArityMismatch),
            Self::UnknownKind(_)
            | Self::UnknownNamedParser(_)
            | Self::MalformedQuotation(_)
            | Self::Frozen => None,
        }
    }
}

/// Result alias for registry and quotation calls.
pub type Result<T, E = GrammarError> = std::result::Result<T, E>;
