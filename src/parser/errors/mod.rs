//! Parser error handling module
//!
//! This module provides diagnostics for the grammar engine:
//! - Categorized error codes for filtering and documentation
//! - Suggestions/hints for common mistakes

mod codes;
mod diagnostic;

pub use codes::ErrorCode;
pub use diagnostic::{Diagnostic, DiagnosticBuilder};
