//! The built-in `term` grammar
//!
//! Identifiers, numeric and string literals, parentheses and juxtaposition
//! application. Literal and parenthesis rules are transparent, so `(a)` and
//! `a` parse to the same tree.

use super::combinator::{cat, cat_at, ident, many1, num, seq, str_lit, term};
use super::error::Result;
use super::registry::Registry;
use super::rule::RuleDecl;

/// Precedence levels used by the built-in grammar.
pub mod prec {
    /// Atoms: identifiers, literals, parenthesized terms
    pub const MAX: u32 = 1024;
    /// Application arguments
    pub const ARG: u32 = 1023;
    /// Application itself
    pub const LEAD: u32 = 1022;
    /// Loosest operator level
    pub const MIN: u32 = 10;
}

/// The top-level category.
pub const TERM: &str = "term";

pub const IDENT_KIND: &str = "term_ident";
pub const NUM_KIND: &str = "term_num";
pub const STR_KIND: &str = "term_str";
pub const PAREN_KIND: &str = "term_paren";
pub const APP_KIND: &str = "term_app";

pub(crate) fn install(registry: &mut Registry) -> Result<()> {
    registry.declare_category(TERM)?;
    for (kind, shape) in [(IDENT_KIND, ident()), (NUM_KIND, num()), (STR_KIND, str_lit())] {
        registry.add(RuleDecl::new(TERM, shape).precedence(prec::MAX).kind(kind).transparent())?;
    }
    registry.add(
        RuleDecl::new(TERM, seq([term("("), cat(TERM), term(")")]))
            .precedence(prec::MAX)
            .kind(PAREN_KIND)
            .transparent(),
    )?;
    registry.add(
        RuleDecl::new(TERM, seq([cat(TERM), many1(cat_at(TERM, prec::ARG))]))
            .precedence(prec::LEAD)
            .left_bound(prec::MAX)
            .kind(APP_KIND),
    )?;
    registry.set_application_rule(APP_KIND)
}
