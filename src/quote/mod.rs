//! Quotations
//!
//! A [`Quotation`] is a pattern over syntax trees with numbered capture
//! holes. It runs in two directions:
//! - **build**: fill the holes left to right and produce a tree
//! - **match**: destructure a tree and return what sits in each hole
//!
//! Every registered rule and named parser gets a quotation of its shape at
//! registration time (see [`Registry::build`] and [`Registry::match_kind`]).
//! Text quotations are compiled from concrete syntax with `$name` and
//! `$name:type` placeholders:
//!
//! ```
//! use mixgram::grammar::Grammar;
//! use mixgram::syntax::mk_ident;
//!
//! let grammar = Grammar::new();
//! grammar.infixl("term", "⊕", 60).unwrap();
//! let registry = grammar.snapshot();
//!
//! let quote = registry.quote("$a ⊕ $b").unwrap();
//! let tree = quote.build(vec![mk_ident("x"), mk_ident("y")]).unwrap();
//! assert_eq!(quote.matches(&registry, &tree), Some(vec![mk_ident("x"), mk_ident("y")]));
//! ```

mod compile;
mod typing;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::{HygieneScope, Name, Symbol};
use crate::grammar::{GrammarError, NamedParser, Registry, Result, Rule};
use crate::syntax::SyntaxNode;

pub use typing::{CaptureType, belongs_to};

/// Compiled tree pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Hole number `n`, counted left to right
    Capture(usize),
    Atom(SmolStr),
    /// Matches identifiers by name; scopes are ignored
    Ident(Name),
    Node { kind: Symbol, children: Vec<Pattern> },
}

/// One hole of a quotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSlot {
    /// The `$name` of a text quotation
    pub name: Option<SmolStr>,
    /// Checked when matching, not when building
    pub ty: Option<CaptureType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quotation {
    /// Rule kind, named parser or category, for error messages
    label: Symbol,
    /// Category a matched tree must belong to (text quotations only)
    category: Option<Symbol>,
    pattern: Pattern,
    captures: Vec<CaptureSlot>,
    /// Tag the template's own identifiers with a fresh scope on every build
    hygienic: bool,
}

impl Quotation {
    pub(crate) fn for_rule(rule: &Rule) -> Self {
        let (pattern, captures) = compile::rule_pattern(rule);
        Self {
            label: rule.kind.clone(),
            category: None,
            pattern,
            captures,
            hygienic: false,
        }
    }

    pub(crate) fn for_named(parser: &NamedParser) -> Self {
        let (pattern, captures) = compile::named_pattern(parser);
        Self {
            label: parser.name.clone(),
            category: None,
            pattern,
            captures,
            hygienic: false,
        }
    }

    /// Compile a text template of `category`.
    pub fn parse(registry: &Registry, category: &str, template: &str) -> Result<Self> {
        let (pattern, captures) = compile::template_pattern(registry, category, template)?;
        Ok(Self {
            label: Symbol::new(category),
            category: Some(Symbol::new(category)),
            pattern,
            captures,
            hygienic: true,
        })
    }

    pub fn arity(&self) -> usize {
        self.captures.len()
    }

    pub fn captures(&self) -> &[CaptureSlot] {
        &self.captures
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn category(&self) -> Option<&Symbol> {
        self.category.as_ref()
    }

    /// Fill the holes with `captures`, left to right.
    ///
    /// Captures are not type-checked here; a wrongly typed capture yields a
    /// tree that the matching quotation will reject.
    pub fn build(&self, captures: Vec<SyntaxNode>) -> Result<SyntaxNode> {
        if captures.len() != self.captures.len() {
            return Err(GrammarError::ArityMismatch {
                kind: self.label.clone(),
                expected: self.captures.len(),
                found: captures.len(),
            });
        }
        let scope = if self.hygienic {
            HygieneScope::fresh()
        } else {
            HygieneScope::ROOT
        };
        Ok(instantiate(&self.pattern, &captures, scope))
    }

    /// Destructure `tree`, returning the captures in hole order.
    pub fn matches(&self, registry: &Registry, tree: &SyntaxNode) -> Option<Vec<SyntaxNode>> {
        if let Some(category) = &self.category {
            if !belongs_to(registry, category, tree) {
                return None;
            }
        }
        let mut bound = vec![None; self.captures.len()];
        if !bind(&self.pattern, tree, &mut bound) {
            return None;
        }
        let mut out = Vec::with_capacity(bound.len());
        for (slot, node) in self.captures.iter().zip(bound) {
            let node = node?;
            if let Some(ty) = &slot.ty {
                if !ty.accepts(registry, &node) {
                    return None;
                }
            }
            out.push(node);
        }
        Some(out)
    }

    /// Like [`matches`](Self::matches), keyed by `$name`. Unnamed holes are
    /// keyed by their position.
    pub fn bindings(&self, registry: &Registry, tree: &SyntaxNode) -> Option<IndexMap<SmolStr, SyntaxNode>> {
        let nodes = self.matches(registry, tree)?;
        Some(
            self.captures
                .iter()
                .zip(nodes)
                .enumerate()
                .map(|(i, (slot, node))| {
                    let key = slot.name.clone().unwrap_or_else(|| SmolStr::new(i.to_string()));
                    (key, node)
                })
                .collect(),
        )
    }
}

fn instantiate(pattern: &Pattern, captures: &[SyntaxNode], scope: HygieneScope) -> SyntaxNode {
    match pattern {
        Pattern::Capture(index) => captures.get(*index).cloned().unwrap_or_default(),
        Pattern::Atom(text) => SyntaxNode::Atom { text: text.clone() },
        Pattern::Ident(name) => SyntaxNode::Identifier {
            name: name.clone(),
            scope,
        },
        Pattern::Node { kind, children } => SyntaxNode::Node {
            kind: kind.clone(),
            children: children
                .iter()
                .map(|child| instantiate(child, captures, scope))
                .collect(),
        },
    }
}

fn bind(pattern: &Pattern, tree: &SyntaxNode, bound: &mut [Option<SyntaxNode>]) -> bool {
    match (pattern, tree) {
        (Pattern::Capture(index), _) => match bound.get_mut(*index) {
            Some(slot) => {
                *slot = Some(tree.clone());
                true
            }
            None => false,
        },
        (Pattern::Atom(expected), SyntaxNode::Atom { text }) => expected == text,
        (Pattern::Ident(expected), SyntaxNode::Identifier { name, .. }) => expected == name,
        (
            Pattern::Node { kind, children },
            SyntaxNode::Node {
                kind: tree_kind,
                children: tree_children,
            },
        ) => {
            kind == tree_kind
                && children.len() == tree_children.len()
                && children
                    .iter()
                    .zip(tree_children.iter())
                    .all(|(p, t)| bind(p, t, bound))
        }
        _ => false,
    }
}
