//! Capture types and category membership
//!
//! A tree belongs to a category when its kind is one of the category's
//! rules, or when the category embeds it through a transparent rule whose
//! only non-terminal element is a reference (to another category, a named
//! parser or a token class). Transparent rules collapse at parse time, so
//! membership has to follow them transitively.
//!
//! Optional, repeated and alternative slots are typed by their shape: the
//! bound tree must look like what the parser produces for that slot.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::base::Symbol;
use crate::grammar::{CombinatorExpr, Registry, Rule, TokenClass};
use crate::syntax::SyntaxNode;

/// Constraint on what a capture may bind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CaptureType {
    Category(Symbol),
    Named(Symbol),
    Token(TokenClass),
    /// An `Opt`, `Rep` or `Alt` slot of a rule shape
    Shape(CombinatorExpr),
}

impl CaptureType {
    /// Whether `tree` satisfies the constraint.
    pub fn accepts(&self, registry: &Registry, tree: &SyntaxNode) -> bool {
        match self {
            Self::Category(name) => belongs_to(registry, name, tree),
            Self::Named(name) => tree.is_of_kind(name),
            Self::Token(class) => token_accepts(*class, tree),
            Self::Shape(expr) => slot_accepts(registry, expr, tree),
        }
    }
}

impl fmt::Display for CaptureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(name) | Self::Named(name) => write!(f, "{name}"),
            Self::Token(class) => f.write_str(class.as_str()),
            Self::Shape(expr) => write!(f, "{expr}"),
        }
    }
}

/// Whether `tree` belongs to `category`.
pub fn belongs_to(registry: &Registry, category: &str, tree: &SyntaxNode) -> bool {
    category_accepts(registry, category, tree, &mut FxHashSet::default())
}

fn category_accepts<'r>(
    registry: &'r Registry,
    category: &str,
    tree: &SyntaxNode,
    visited: &mut FxHashSet<&'r str>,
) -> bool {
    let Ok(rules) = registry.rules_for(category) else {
        return false;
    };
    if let Some(rule) = tree.kind().and_then(|kind| registry.rule_by_kind(kind)) {
        if rule.category == *category {
            return true;
        }
    }
    rules.into_iter().any(|rule| match embedding(rule) {
        Some(CaptureType::Category(inner)) => {
            let Some(inner) = registry.category(&inner) else {
                return false;
            };
            visited.insert(inner.name().as_str()) && category_accepts(registry, inner.name(), tree, visited)
        }
        Some(CaptureType::Named(name)) => tree.is_of_kind(&name),
        Some(CaptureType::Token(class)) => token_accepts(class, tree),
        Some(CaptureType::Shape(_)) | None => false,
    })
}

/// What a transparent rule passes through, if anything.
fn embedding(rule: &Rule) -> Option<CaptureType> {
    if !rule.transparent {
        return None;
    }
    let mut inner = rule
        .shape
        .items()
        .iter()
        .filter(|item| !matches!(item, CombinatorExpr::Terminal(_)));
    let only = inner.next()?;
    if inner.next().is_some() {
        return None;
    }
    match only {
        CombinatorExpr::CategoryRef { name, .. } if *name != rule.category => Some(CaptureType::Category(name.clone())),
        CombinatorExpr::NamedParserRef(name) => Some(CaptureType::Named(name.clone())),
        CombinatorExpr::Token(class) => Some(CaptureType::Token(*class)),
        _ => None,
    }
}

/// Whether `tree` is what the parser produces for a one-slot `expr`.
fn slot_accepts(registry: &Registry, expr: &CombinatorExpr, tree: &SyntaxNode) -> bool {
    match expr {
        CombinatorExpr::Terminal(text) => tree.atom_text() == Some(text.trim()),
        CombinatorExpr::Token(class) => token_accepts(*class, tree),
        CombinatorExpr::CategoryRef { name, .. } => belongs_to(registry, name, tree),
        CombinatorExpr::NamedParserRef(name) => tree.is_of_kind(name),
        CombinatorExpr::Seq(_) => slots_accept(registry, expr, std::slice::from_ref(tree)),
        CombinatorExpr::Alt(alternatives) => alternatives.iter().any(|alternative| {
            if alternative.slot_count() == 1 {
                slots_accept(registry, alternative, std::slice::from_ref(tree))
            } else {
                tree.is_group() && slots_accept(registry, alternative, tree.children())
            }
        }),
        CombinatorExpr::Opt(item) => {
            tree.is_group() && (tree.children().is_empty() || slots_accept(registry, item, tree.children()))
        }
        CombinatorExpr::Rep {
            item,
            sep,
            at_least_one,
        } => tree.is_group() && rep_accepts(registry, item, sep.as_deref(), *at_least_one, tree.children()),
    }
}

/// Whether `slots` are exactly the slots `expr` produces.
fn slots_accept(registry: &Registry, expr: &CombinatorExpr, slots: &[SyntaxNode]) -> bool {
    match expr {
        CombinatorExpr::Seq(items) => {
            let mut rest = slots;
            for item in items {
                let Some((head, tail)) = rest.split_at_checked(item.slot_count()) else {
                    return false;
                };
                if !slots_accept(registry, item, head) {
                    return false;
                }
                rest = tail;
            }
            rest.is_empty()
        }
        _ => match slots {
            [slot] => slot_accepts(registry, expr, slot),
            _ => false,
        },
    }
}

/// Items interleaved with separators: `item (sep item)*`.
fn rep_accepts(
    registry: &Registry,
    item: &CombinatorExpr,
    sep: Option<&CombinatorExpr>,
    at_least_one: bool,
    slots: &[SyntaxNode],
) -> bool {
    if slots.is_empty() {
        return !at_least_one;
    }
    let width = item.slot_count();
    let Some((first, rest)) = slots.split_at_checked(width) else {
        return false;
    };
    if !slots_accept(registry, item, first) {
        return false;
    }
    let sep_width = sep.map_or(0, CombinatorExpr::slot_count);
    let stride = sep_width + width;
    if stride == 0 || rest.len() % stride != 0 {
        return rest.is_empty();
    }
    rest.chunks(stride).all(|chunk| {
        let (sep_slots, item_slots) = chunk.split_at(sep_width);
        sep.is_none_or(|sep| slots_accept(registry, sep, sep_slots)) && slots_accept(registry, item, item_slots)
    })
}

fn token_accepts(class: TokenClass, tree: &SyntaxNode) -> bool {
    match (class, tree) {
        (TokenClass::Ident, SyntaxNode::Identifier { .. }) => true,
        (TokenClass::Number, SyntaxNode::Atom { text }) => text.starts_with(|c: char| c.is_ascii_digit()),
        (TokenClass::Str, SyntaxNode::Atom { text }) => text.starts_with('"'),
        _ => false,
    }
}
