//! Grammar registry
//!
//! The append-only table of categories, rules and named parsers. Every
//! registration validates first and mutates second, so a call that returns
//! an error leaves the registry exactly as it was. Each rule and named
//! parser gets its quotation compiled here, at registration time.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::base::Symbol;
use crate::quote::Quotation;
use crate::syntax::{SyntaxNode, mk_group};

use super::builtin;
use super::combinator::{CombinatorExpr, cat, seq, term};
use super::error::{GrammarError, Result};
use super::rule::{NamedParser, Rule, RuleDecl, RuleHandle, RuleId};
use super::tokens::TokenTable;

/// An open, named set of rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: Symbol,
    /// Registration order
    rules: Vec<RuleId>,
    /// Descending precedence, ties in registration order
    ordered: Vec<RuleId>,
    leading: Vec<RuleId>,
    trailing: Vec<RuleId>,
}

impl Category {
    fn new(name: Symbol) -> Self {
        Self {
            name,
            rules: Vec::new(),
            ordered: Vec::new(),
            leading: Vec::new(),
            trailing: Vec::new(),
        }
    }

    pub fn name(&self) -> &Symbol {
        &self.name
    }

    /// Rule ids in registration order.
    pub fn rule_ids(&self) -> &[RuleId] {
        &self.rules
    }

    /// Rule ids in try order.
    pub fn ordered(&self) -> &[RuleId] {
        &self.ordered
    }

    /// Leading rules in try order.
    pub fn leading(&self) -> &[RuleId] {
        &self.leading
    }

    /// Trailing rules in try order.
    pub fn trailing(&self) -> &[RuleId] {
        &self.trailing
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn insert(&mut self, rule: &Rule, precedence_of: impl Fn(RuleId) -> u32) {
        // After every rule with the same or higher precedence
        let slot = |ids: &[RuleId]| {
            ids.iter()
                .position(|id| precedence_of(*id) < rule.precedence)
                .unwrap_or(ids.len())
        };
        self.rules.push(rule.id);
        let at = slot(self.ordered.as_slice());
        self.ordered.insert(at, rule.id);
        let list = if rule.trailing { &mut self.trailing } else { &mut self.leading };
        let at = slot(list.as_slice());
        list.insert(at, rule.id);
    }
}

/// What a kind refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindInfo<'a> {
    Rule(&'a Rule),
    Named(&'a NamedParser),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum KindEntry {
    Rule(RuleId),
    Named,
}

/// The grammar registry.
///
/// Cloning is cheap relative to parsing but not free; shared, lock-guarded
/// access goes through [`Grammar`](super::Grammar).
#[derive(Debug, Clone, Default)]
pub struct Registry {
    categories: IndexMap<Symbol, Category>,
    rules: Vec<Rule>,
    kinds: FxHashMap<Symbol, KindEntry>,
    named: IndexMap<Symbol, NamedParser>,
    quotations: FxHashMap<Symbol, Quotation>,
    tokens: TokenTable,
    app_kind: Option<Symbol>,
}

impl Registry {
    /// An empty registry with no categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in `term` grammar.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::install(&mut registry).expect("built-in grammar installs into an empty registry");
        registry
    }

    // =========================================================================
    // Registration
    // =========================================================================

    pub fn declare_category(&mut self, name: impl Into<Symbol>) -> Result<()> {
        let name = name.into();
        if self.categories.contains_key(&name) {
            return Err(GrammarError::DuplicateCategory(name));
        }
        debug!(category = %name, "declared category");
        self.categories.insert(name.clone(), Category::new(name));
        Ok(())
    }

    /// Register a rule with no precedence bounds.
    pub fn add_rule(
        &mut self,
        category: impl Into<Symbol>,
        shape: CombinatorExpr,
        precedence: u32,
        kind: Option<&str>,
    ) -> Result<RuleHandle> {
        let mut decl = RuleDecl::new(category, shape).precedence(precedence);
        if let Some(kind) = kind {
            decl = decl.kind(kind);
        }
        self.add(decl)
    }

    /// Register a rule.
    pub fn add(&mut self, decl: RuleDecl) -> Result<RuleHandle> {
        if !self.categories.contains_key(&decl.category) {
            return Err(GrammarError::UnknownCategory(decl.category));
        }
        if let Some(kind) = decl.kind.as_ref().filter(|kind| self.kinds.contains_key(*kind)) {
            return Err(GrammarError::DuplicateKind(kind.clone()));
        }
        self.check_refs(&decl.shape, None)?;

        let kind = match decl.kind.clone() {
            Some(kind) => kind,
            None => self.fresh_kind(&decl.category, &decl.shape),
        };
        let id = RuleId(self.rules.len() as u32);
        let category = decl.category.clone();
        let rule = Rule::new(id, category.clone(), kind.clone(), decl);

        rule.shape.for_each_terminal(&mut |t| {
            self.tokens.insert(t);
        });
        let rules = &self.rules;
        if let Some(entry) = self.categories.get_mut(&category) {
            entry.insert(&rule, |other| rules[other.index()].precedence);
        }
        self.quotations.insert(kind.clone(), Quotation::for_rule(&rule));
        self.kinds.insert(kind.clone(), KindEntry::Rule(id));
        debug!(
            kind = %kind,
            category = %category,
            precedence = rule.precedence,
            trailing = rule.trailing,
            "registered rule"
        );
        self.rules.push(rule);
        Ok(RuleHandle { id, kind })
    }

    /// Left-associative binary operator: `cat op cat`.
    pub fn infixl(&mut self, category: impl Into<Symbol>, op: &str, prec: u32) -> Result<RuleHandle> {
        let category = category.into();
        let shape = seq([cat(&category), term(op), cat(&category)]);
        self.add(RuleDecl::new(category, shape).precedence(prec).left_bound(prec).right_bound(prec.saturating_add(1)))
    }

    /// Right-associative binary operator: `cat op cat`.
    pub fn infixr(&mut self, category: impl Into<Symbol>, op: &str, prec: u32) -> Result<RuleHandle> {
        let category = category.into();
        let shape = seq([cat(&category), term(op), cat(&category)]);
        self.add(RuleDecl::new(category, shape).precedence(prec).left_bound(prec.saturating_add(1)).right_bound(prec))
    }

    pub fn prefix(&mut self, category: impl Into<Symbol>, op: &str, prec: u32) -> Result<RuleHandle> {
        let category = category.into();
        let shape = seq([term(op), cat(&category)]);
        self.add(RuleDecl::new(category, shape).precedence(prec).right_bound(prec))
    }

    pub fn postfix(&mut self, category: impl Into<Symbol>, op: &str, prec: u32) -> Result<RuleHandle> {
        let category = category.into();
        let shape = seq([cat(&category), term(op)]);
        self.add(RuleDecl::new(category, shape).precedence(prec).left_bound(prec))
    }

    pub fn declare_named_parser(&mut self, name: impl Into<Symbol>, shape: CombinatorExpr) -> Result<()> {
        let name = name.into();
        if self.named.contains_key(&name) {
            return Err(GrammarError::DuplicateName(name));
        }
        if self.kinds.contains_key(&name) {
            return Err(GrammarError::DuplicateKind(name));
        }
        self.check_refs(&shape, Some(&name))?;

        shape.for_each_terminal(&mut |t| {
            self.tokens.insert(t);
        });
        let parser = NamedParser {
            name: name.clone(),
            shape,
        };
        self.quotations.insert(name.clone(), Quotation::for_named(&parser));
        self.kinds.insert(name.clone(), KindEntry::Named);
        debug!(name = %name, "declared named parser");
        self.named.insert(name, parser);
        Ok(())
    }

    /// Use `kind` as the rule [`mk_app`](Self::mk_app) builds with. Its shape
    /// must be `fn args` where `args` is a repetition.
    pub fn set_application_rule(&mut self, kind: &str) -> Result<()> {
        if self.rule_by_kind(kind).is_none() {
            return Err(GrammarError::UnknownKind(Symbol::new(kind)));
        }
        self.app_kind = Some(Symbol::new(kind));
        Ok(())
    }

    fn check_refs(&self, shape: &CombinatorExpr, own_name: Option<&Symbol>) -> Result<()> {
        let mut error = None;
        shape.for_each_ref(&mut |expr| {
            if error.is_some() {
                return;
            }
            match expr {
                CombinatorExpr::CategoryRef { name, .. } if !self.categories.contains_key(name) => {
                    error = Some(GrammarError::UnknownCategory(name.clone()));
                }
                CombinatorExpr::NamedParserRef(name) if !self.named.contains_key(name) && Some(name) != own_name => {
                    error = Some(GrammarError::UnknownNamedParser(name.clone()));
                }
                _ => {}
            }
        });
        error.map_or(Ok(()), Err)
    }

    /// `{category}_{terminals}`, suffixed with a counter when taken.
    fn fresh_kind(&self, category: &Symbol, shape: &CombinatorExpr) -> Symbol {
        let terminals = shape.terminals();
        let base = if terminals.is_empty() {
            format!("{category}_rule")
        } else {
            format!("{category}_{}", terminals.join("_"))
        };
        if !self.kinds.contains_key(base.as_str()) {
            return Symbol::from(base);
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if !self.kinds.contains_key(candidate.as_str()) {
                return Symbol::from(candidate);
            }
            n += 1;
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Rules of `category` in try order: descending precedence, ties in
    /// registration order.
    pub fn rules_for(&self, category: &str) -> Result<Vec<&Rule>> {
        let entry = self
            .categories
            .get(category)
            .ok_or_else(|| GrammarError::UnknownCategory(Symbol::new(category)))?;
        Ok(entry.ordered.iter().map(|id| self.rule(*id)).collect())
    }

    /// The rule with the given id. Ids are only handed out by this registry
    /// and its clones.
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    pub fn rule_by_kind(&self, kind: &str) -> Option<&Rule> {
        match self.kinds.get(kind)? {
            KindEntry::Rule(id) => Some(self.rule(*id)),
            KindEntry::Named => None,
        }
    }

    pub fn kind_info(&self, kind: &str) -> Option<KindInfo<'_>> {
        match self.kinds.get(kind)? {
            KindEntry::Rule(id) => Some(KindInfo::Rule(self.rule(*id))),
            KindEntry::Named => self.named.get(kind).map(KindInfo::Named),
        }
    }

    pub fn named_parser(&self, name: &str) -> Option<&NamedParser> {
        self.named.get(name)
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn tokens(&self) -> &TokenTable {
        &self.tokens
    }

    /// The quotation compiled for a rule or named parser.
    pub fn quotation(&self, kind: &str) -> Option<&Quotation> {
        self.quotations.get(kind)
    }

    pub fn application_kind(&self) -> Option<&Symbol> {
        self.app_kind.as_ref()
    }

    // =========================================================================
    // Quotations
    // =========================================================================

    /// Build a `kind` node from its captures, left to right.
    pub fn build(&self, kind: &str, captures: Vec<SyntaxNode>) -> Result<SyntaxNode> {
        self.quotations
            .get(kind)
            .ok_or_else(|| GrammarError::UnknownKind(Symbol::new(kind)))?
            .build(captures)
    }

    /// Destructure `tree` against the shape of `kind`. Unknown kinds and
    /// trees of another shape both give `None`.
    pub fn match_kind(&self, kind: &str, tree: &SyntaxNode) -> Option<Vec<SyntaxNode>> {
        self.quotations.get(kind)?.matches(self, tree)
    }

    /// Apply `func` to `args` with the registered application rule. With no
    /// arguments this is `func` itself.
    pub fn mk_app(&self, func: SyntaxNode, args: Vec<SyntaxNode>) -> Result<SyntaxNode> {
        let kind = self
            .app_kind
            .as_ref()
            .ok_or_else(|| GrammarError::UnknownKind(Symbol::new("application")))?;
        if args.is_empty() {
            return Ok(func);
        }
        self.build(kind, vec![func, mk_group(args)])
    }

    /// Compile a text quotation in the `term` category.
    pub fn quote(&self, template: &str) -> Result<Quotation> {
        Quotation::parse(self, builtin::TERM, template)
    }

    /// Compile a text quotation in `category`.
    pub fn quote_in(&self, category: &str, template: &str) -> Result<Quotation> {
        Quotation::parse(self, category, template)
    }
}
