//! Syntax Factory
//!
//! Convenience constructors for building trees by hand. Application nodes
//! need the registered application rule and are built by
//! [`Registry::mk_app`](crate::grammar::Registry::mk_app).

use smol_str::SmolStr;

use super::node::{GROUP_KIND, SyntaxNode};
use crate::base::{HygieneScope, Name, Symbol};

/// Terminal token with the given text.
pub fn mk_atom(text: impl AsRef<str>) -> SyntaxNode {
    SyntaxNode::Atom {
        text: SmolStr::new(text),
    }
}

/// Identifier in the root scope, as if read from source.
pub fn mk_ident(name: impl AsRef<str>) -> SyntaxNode {
    mk_ident_in(name, HygieneScope::ROOT)
}

/// Identifier tagged with an explicit hygiene scope.
pub fn mk_ident_in(name: impl AsRef<str>, scope: HygieneScope) -> SyntaxNode {
    SyntaxNode::Identifier {
        name: Name::new(name),
        scope,
    }
}

/// Interior node. The kind is not validated here; trees meant to satisfy a
/// rule's shape should come from the parser or a quotation builder.
pub fn mk_node(kind: impl Into<Symbol>, children: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::Node {
        kind: kind.into(),
        children: children.into(),
    }
}

/// Anonymous group node, as produced by `Opt` and `Rep`.
pub fn mk_group(children: Vec<SyntaxNode>) -> SyntaxNode {
    mk_node(GROUP_KIND, children)
}
