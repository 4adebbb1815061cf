//! # mixgram
//!
//! Extensible grammar engine: register mixfix notations, custom token
//! sequences and whole new categories at runtime, parse text into a uniform
//! syntax tree, and build or destructure trees through quotations.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! quote     → Quotations: builder + matcher per rule / template
//!   ↓
//! parser    → Logos lexer, precedence-climbing engine, diagnostics
//!   ↓
//! grammar   → Registry, combinator shapes, built-in `term` grammar
//!   ↓
//! syntax    → SyntaxNode tree model and constructors
//!   ↓
//! base      → Primitives (Symbol, Name, HygieneScope, Position)
//! ```
//!
//! ## Example
//!
//! ```
//! use mixgram::grammar::Grammar;
//!
//! let grammar = Grammar::new();
//! grammar.infixl("term", "⊕", 60).unwrap();
//! grammar.infixl("term", "LXOR", 10).unwrap();
//!
//! let flat = grammar.parse_category("term", "a ⊕ b LXOR c");
//! let grouped = grammar.parse_category("term", "(a ⊕ b) LXOR c");
//! assert!(flat.ok());
//! assert_eq!(flat.tree, grouped.tree);
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → grammar → parser → quote)
// ============================================================================

/// Foundation types: Symbol, Name, HygieneScope, Position
pub mod base;

/// Syntax: the SyntaxNode tree and its constructors
pub mod syntax;

/// Grammar: registry, rules, combinator shapes, shared handle
pub mod grammar;

/// Parser: lexer, precedence-climbing engine, diagnostics
pub mod parser;

/// Quotations: compiled build/match patterns
pub mod quote;

// Re-export foundation types
pub use base::{HygieneScope, Name, Position, Symbol, TextRange, TextSize};

// Re-export the main entry points
pub use grammar::{Grammar, GrammarError, Registry};
pub use parser::{Diagnostic, Parse, ParseItems};
pub use quote::Quotation;
pub use syntax::SyntaxNode;
