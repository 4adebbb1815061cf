//! The uniform syntax tree.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{HygieneScope, Name, Symbol};

/// Kind of the anonymous node produced by `Opt`, `Rep` and multi-slot `Alt`.
pub const GROUP_KIND: &str = "group";

/// Kind of the `$name` / `$name:type` placeholder accepted inside quotations.
pub const ANTIQUOT_KIND: &str = "antiquot";

/// A syntax tree.
///
/// Trees are immutable once built. Children live in an `Arc<[SyntaxNode]>`,
/// so cloning a tree (or reusing it as a sub-tree of a larger build) never
/// copies the structure below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SyntaxNode {
    /// Placeholder for unparseable input
    #[default]
    Missing,
    /// An interior node produced by a rule, a named parser or a built-in
    /// constructor
    Node {
        kind: Symbol,
        children: Arc<[SyntaxNode]>,
    },
    /// A terminal token: operator symbols, punctuation, literals
    Atom { text: SmolStr },
    /// A terminal bound to a name plus its hygiene scope
    Identifier { name: Name, scope: HygieneScope },
}

impl SyntaxNode {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// The node kind, for `Node` variants only.
    pub fn kind(&self) -> Option<&Symbol> {
        match self {
            Self::Node { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Check whether this is a `Node` of the given kind.
    pub fn is_of_kind(&self, kind: &str) -> bool {
        self.kind().is_some_and(|k| k == kind)
    }

    pub fn is_group(&self) -> bool {
        self.is_of_kind(GROUP_KIND)
    }

    /// Children of a `Node`; empty for every other variant.
    pub fn children(&self) -> &[SyntaxNode] {
        match self {
            Self::Node { children, .. } => children,
            _ => &[],
        }
    }

    pub fn child(&self, index: usize) -> Option<&SyntaxNode> {
        self.children().get(index)
    }

    pub fn atom_text(&self) -> Option<&str> {
        match self {
            Self::Atom { text } => Some(text),
            _ => None,
        }
    }

    pub fn ident_name(&self) -> Option<&Name> {
        match self {
            Self::Identifier { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Check whether the tree contains a `Missing` placeholder anywhere.
    pub fn has_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Node { children, .. } => children.iter().any(SyntaxNode::has_missing),
            _ => false,
        }
    }

    /// Collect every identifier in the tree, left to right.
    pub fn identifiers(&self) -> Vec<&Name> {
        let mut out = Vec::new();
        self.collect_identifiers(&mut out);
        out
    }

    fn collect_identifiers<'a>(&'a self, out: &mut Vec<&'a Name>) {
        match self {
            Self::Identifier { name, .. } => out.push(name),
            Self::Node { children, .. } => {
                for child in children.iter() {
                    child.collect_identifiers(out);
                }
            }
            _ => {}
        }
    }
}

/// Renders the tree as an s-expression: `(term_⊕ a "⊕" b)`.
///
/// Identifiers outside the root scope show their scope tag (`x#3`).
impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("<missing>"),
            Self::Atom { text } => write!(f, "{:?}", text.as_str()),
            Self::Identifier { name, scope } => {
                if scope.is_root() {
                    write!(f, "{name}")
                } else {
                    write!(f, "{name}{scope}")
                }
            }
            Self::Node { kind, children } => {
                write!(f, "({kind}")?;
                for child in children.iter() {
                    write!(f, " {child}")?;
                }
                f.write_str(")")
            }
        }
    }
}
