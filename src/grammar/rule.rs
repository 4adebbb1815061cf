//! Rules, named parsers and the declarations that create them.

use crate::base::Symbol;
use crate::syntax::SyntaxNode;

use super::combinator::CombinatorExpr;

/// Index of a rule in its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub(crate) u32);

impl RuleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One production of a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: RuleId,
    /// Unique tag carried by every node the rule produces
    pub kind: Symbol,
    pub category: Symbol,
    pub shape: CombinatorExpr,
    pub precedence: u32,
    /// Minimum precedence of the left operand (trailing rules only)
    pub left_bound: Option<u32>,
    /// Minimum precedence of the last own-category operand
    pub right_bound: Option<u32>,
    /// Collapse to the single non-atom child instead of wrapping it
    pub transparent: bool,
    /// First element is a reference to the rule's own category
    pub trailing: bool,
}

impl Rule {
    pub(crate) fn new(id: RuleId, category: Symbol, kind: Symbol, decl: RuleDecl) -> Self {
        let trailing = matches!(
            decl.shape.items().first(),
            Some(CombinatorExpr::CategoryRef { name, .. }) if *name == category
        );
        Self {
            id,
            kind,
            category,
            shape: decl.shape,
            precedence: decl.precedence,
            left_bound: decl.left_bound,
            right_bound: decl.right_bound,
            transparent: decl.transparent,
            trailing,
        }
    }

    pub fn is_leading(&self) -> bool {
        !self.trailing
    }

    /// Minimum precedence for the top-level shape element at `index`.
    ///
    /// An explicit precedence on the reference wins. Otherwise the last
    /// reference to the rule's own category is parsed at `right_bound`;
    /// every other operand is unrestricted.
    pub fn operand_prec(&self, index: usize) -> u32 {
        let items = self.shape.items();
        match items.get(index) {
            Some(CombinatorExpr::CategoryRef { prec: Some(p), .. }) => *p,
            Some(CombinatorExpr::CategoryRef { name, .. }) if *name == self.category => {
                let last_own = items
                    .iter()
                    .rposition(|item| matches!(item, CombinatorExpr::CategoryRef { name, .. } if *name == self.category));
                if last_own == Some(index) && !(self.trailing && index == 0) {
                    self.right_bound.unwrap_or(0)
                } else {
                    0
                }
            }
            _ => 0,
        }
    }

    /// Apply the transparent collapse to freshly parsed children.
    pub(crate) fn collapse(&self, children: &[SyntaxNode]) -> Option<SyntaxNode> {
        if !self.transparent {
            return None;
        }
        if let [only] = children {
            return Some(only.clone());
        }
        let mut inner = children.iter().filter(|c| !matches!(c, SyntaxNode::Atom { .. }));
        match (inner.next(), inner.next()) {
            (Some(node), None) => Some(node.clone()),
            _ => None,
        }
    }
}

/// A non-extensible sub-grammar. Parses to `Node { kind: name, .. }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedParser {
    pub name: Symbol,
    pub shape: CombinatorExpr,
}

/// Handle returned by rule registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHandle {
    pub id: RuleId,
    pub kind: Symbol,
}

/// Declaration of a rule, passed to [`Registry::add`](super::Registry::add).
///
/// ```
/// use mixgram::grammar::{Grammar, RuleDecl, cat, seq, term};
///
/// let grammar = Grammar::new();
/// let decl = RuleDecl::new("term", seq([cat("term"), term("⊕"), cat("term")]))
///     .precedence(60)
///     .left_bound(60)
///     .right_bound(61);
/// let rule = grammar.add(decl).unwrap();
/// assert_eq!(rule.kind, "term_⊕");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDecl {
    pub category: Symbol,
    pub shape: CombinatorExpr,
    pub precedence: u32,
    pub left_bound: Option<u32>,
    pub right_bound: Option<u32>,
    pub kind: Option<Symbol>,
    pub transparent: bool,
}

impl RuleDecl {
    pub fn new(category: impl Into<Symbol>, shape: CombinatorExpr) -> Self {
        Self {
            category: category.into(),
            shape,
            precedence: 0,
            left_bound: None,
            right_bound: None,
            kind: None,
            transparent: false,
        }
    }

    pub fn precedence(mut self, precedence: u32) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn left_bound(mut self, bound: u32) -> Self {
        self.left_bound = Some(bound);
        self
    }

    pub fn right_bound(mut self, bound: u32) -> Self {
        self.right_bound = Some(bound);
        self
    }

    /// Use an explicit kind instead of a generated one.
    pub fn kind(mut self, kind: impl Into<Symbol>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }
}
