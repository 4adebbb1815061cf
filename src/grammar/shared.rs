//! Shared grammar handle
//!
//! A [`Grammar`] wraps a [`Registry`] behind a `parking_lot::RwLock<Arc<_>>`.
//! Registration clones the registry, applies the change and swaps the new
//! version in under the write lock, so a failed or half-done registration is
//! never visible. Parsing works on a [`snapshot`](Grammar::snapshot) and holds
//! no lock while it runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::base::Symbol;
use crate::parser::{self, Parse, ParseItems};
use crate::quote::Quotation;
use crate::syntax::SyntaxNode;

use super::combinator::CombinatorExpr;
use super::error::{GrammarError, Result};
use super::registry::Registry;
use super::rule::{RuleDecl, RuleHandle};

static GLOBAL: Lazy<Grammar> = Lazy::new(Grammar::new);

#[derive(Debug)]
pub struct Grammar {
    registry: RwLock<Arc<Registry>>,
    frozen: AtomicBool,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    /// A grammar holding the built-in `term` category.
    pub fn new() -> Self {
        Self::from_registry(Registry::with_builtins())
    }

    /// A grammar with no categories at all.
    pub fn empty() -> Self {
        Self::from_registry(Registry::new())
    }

    pub fn from_registry(registry: Registry) -> Self {
        Self {
            registry: RwLock::new(Arc::new(registry)),
            frozen: AtomicBool::new(false),
        }
    }

    /// The process-wide grammar.
    pub fn global() -> &'static Grammar {
        &GLOBAL
    }

    /// The current registry. Later registrations do not affect it.
    pub fn snapshot(&self) -> Arc<Registry> {
        Arc::clone(&self.registry.read())
    }

    /// Reject all further registration.
    pub fn freeze(&self) {
        let _guard = self.registry.write();
        self.frozen.store(true, Ordering::Release);
        debug!("grammar frozen");
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    /// Apply a batch of registrations atomically: either every change in `f`
    /// becomes visible or, if `f` fails, none does.
    pub fn update<T>(&self, f: impl FnOnce(&mut Registry) -> Result<T>) -> Result<T> {
        let mut guard = self.registry.write();
        if self.is_frozen() {
            return Err(GrammarError::Frozen);
        }
        let mut next = Registry::clone(&guard);
        let out = f(&mut next)?;
        *guard = Arc::new(next);
        Ok(out)
    }

    // =========================================================================
    // Registration
    // =========================================================================

    pub fn declare_category(&self, name: impl Into<Symbol>) -> Result<()> {
        self.update(|r| r.declare_category(name))
    }

    pub fn add_rule(
        &self,
        category: impl Into<Symbol>,
        shape: CombinatorExpr,
        precedence: u32,
        kind: Option<&str>,
    ) -> Result<RuleHandle> {
        self.update(|r| r.add_rule(category, shape, precedence, kind))
    }

    pub fn add(&self, decl: RuleDecl) -> Result<RuleHandle> {
        self.update(|r| r.add(decl))
    }

    pub fn infixl(&self, category: impl Into<Symbol>, op: &str, prec: u32) -> Result<RuleHandle> {
        self.update(|r| r.infixl(category, op, prec))
    }

    pub fn infixr(&self, category: impl Into<Symbol>, op: &str, prec: u32) -> Result<RuleHandle> {
        self.update(|r| r.infixr(category, op, prec))
    }

    pub fn prefix(&self, category: impl Into<Symbol>, op: &str, prec: u32) -> Result<RuleHandle> {
        self.update(|r| r.prefix(category, op, prec))
    }

    pub fn postfix(&self, category: impl Into<Symbol>, op: &str, prec: u32) -> Result<RuleHandle> {
        self.update(|r| r.postfix(category, op, prec))
    }

    pub fn declare_named_parser(&self, name: impl Into<Symbol>, shape: CombinatorExpr) -> Result<()> {
        self.update(|r| r.declare_named_parser(name, shape))
    }

    pub fn set_application_rule(&self, kind: &str) -> Result<()> {
        self.update(|r| r.set_application_rule(kind))
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    pub fn parse_category(&self, category: &str, input: &str) -> Parse {
        parser::parse_category(&self.snapshot(), category, input)
    }

    pub fn parse_items(&self, category: &str, input: &str) -> ParseItems {
        parser::parse_items(&self.snapshot(), category, input)
    }

    pub fn parse_named(&self, name: &str, input: &str) -> Parse {
        parser::parse_named(&self.snapshot(), name, input)
    }

    pub fn parse_many<S: AsRef<str> + Sync>(&self, category: &str, inputs: &[S]) -> Vec<Parse> {
        parser::parse_many(&self.snapshot(), category, inputs)
    }

    // =========================================================================
    // Quotations
    // =========================================================================

    pub fn build(&self, kind: &str, captures: Vec<SyntaxNode>) -> Result<SyntaxNode> {
        self.snapshot().build(kind, captures)
    }

    pub fn match_kind(&self, kind: &str, tree: &SyntaxNode) -> Option<Vec<SyntaxNode>> {
        self.snapshot().match_kind(kind, tree)
    }

    pub fn mk_app(&self, func: SyntaxNode, args: Vec<SyntaxNode>) -> Result<SyntaxNode> {
        self.snapshot().mk_app(func, args)
    }

    pub fn quote(&self, template: &str) -> Result<Quotation> {
        self.snapshot().quote(template)
    }

    pub fn quote_in(&self, category: &str, template: &str) -> Result<Quotation> {
        self.snapshot().quote_in(category, template)
    }
}
