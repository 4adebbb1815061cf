//! Syntax tree model
//!
//! Every component produces or consumes [`SyntaxNode`]: the parser returns
//! one, quotation builders assemble them and matchers take them apart. A
//! node's `kind` names the rule (or named parser, or built-in constructor)
//! that produced it, which is what downstream consumers dispatch on.

mod factory;
mod node;

pub use factory::{mk_atom, mk_group, mk_ident, mk_ident_in, mk_node};
pub use node::{ANTIQUOT_KIND, GROUP_KIND, SyntaxNode};
