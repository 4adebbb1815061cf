//! Parser for registered grammars
//!
//! This module turns text into [`SyntaxNode`] trees using whatever the
//! registry currently holds:
//! - **logos** for the fixed lexical classes, plus the registry's token table
//!   for operators and keywords
//! - a backtracking precedence-climbing engine over rule shapes
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos + TokenTable) → Tokens
//!     ↓
//! Engine (precedence climbing, checkpoints) → SyntaxNode
//!     ↓
//! Diagnostics (furthest failure, recovery)
//! ```
//!
//! ## Recovery
//!
//! A top-level item that fails records one diagnostic and becomes
//! `Missing`; the cursor then skips ahead to the closer of the token after
//! the failure and the next token that can start an item, so the following
//! items still parse.

mod engine;
pub mod errors;
mod lexer;
mod options;

use rayon::prelude::*;

use crate::base::Symbol;
use crate::grammar::Registry;
use crate::syntax::SyntaxNode;

use engine::{Parser, Target};

pub use errors::{Diagnostic, DiagnosticBuilder, ErrorCode};
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use options::ParseOptions;

/// Parse result containing the tree and any diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub tree: SyntaxNode,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parse {
    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Result of parsing a sequence of top-level items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseItems {
    pub items: Vec<SyntaxNode>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseItems {
    pub fn ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse `input` as one item of `category`.
pub fn parse_category(registry: &Registry, category: &str, input: &str) -> Parse {
    parse_category_with(registry, category, input, ParseOptions::default())
}

pub fn parse_category_with(registry: &Registry, category: &str, input: &str, options: ParseOptions) -> Parse {
    parse_single(registry, Target::Category(Symbol::new(category)), input, options)
}

/// Parse `input` as one node of the named parser `name`.
pub fn parse_named(registry: &Registry, name: &str, input: &str) -> Parse {
    parse_single(registry, Target::Named(Symbol::new(name)), input, ParseOptions::default())
}

fn parse_single(registry: &Registry, target: Target, input: &str, options: ParseOptions) -> Parse {
    let mut parser = Parser::new(registry, input, options);
    let tree = parser.parse_item(&target);
    if !tree.is_missing() {
        parser.expect_end();
    }
    Parse {
        tree,
        diagnostics: parser.finish(),
    }
}

/// Parse items of `category` until the input is exhausted, recovering after
/// each malformed item.
pub fn parse_items(registry: &Registry, category: &str, input: &str) -> ParseItems {
    parse_items_with(registry, category, input, ParseOptions::default())
}

pub fn parse_items_with(registry: &Registry, category: &str, input: &str, options: ParseOptions) -> ParseItems {
    let mut parser = Parser::new(registry, input, options);
    let items = parser.parse_all(&Target::Category(Symbol::new(category)));
    ParseItems {
        items,
        diagnostics: parser.finish(),
    }
}

/// Parse independent inputs in parallel over one registry.
pub fn parse_many<S: AsRef<str> + Sync>(registry: &Registry, category: &str, inputs: &[S]) -> Vec<Parse> {
    inputs
        .par_iter()
        .map(|input| parse_category(registry, category, input.as_ref()))
        .collect()
}
