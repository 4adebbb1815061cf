//! Foundation types for the grammar engine.
//!
//! This module provides the primitive vocabulary shared by every other layer:
//! - [`Symbol`] - Interned-style names for categories, rule kinds and parsers
//! - [`Name`] - Possibly qualified identifier names (`Nat.add`)
//! - [`HygieneScope`] - Opaque scope tags distinguishing expansion sites
//! - [`Position`] - Line/column positions for diagnostics
//!
//! This module has NO dependencies on other crate modules.

mod position;
mod scope;
mod symbol;

pub use position::Position;
pub use scope::HygieneScope;
pub use symbol::{Name, Symbol};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
