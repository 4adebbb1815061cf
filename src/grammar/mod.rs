//! Grammar registry and shape language
//!
//! ## Architecture
//!
//! ```text
//! Grammar (shared, lock-guarded handle)
//!     ↓ snapshot
//! Registry → categories, rules, named parsers, token table, quotations
//!     ↓
//! Rule / NamedParser → CombinatorExpr shapes
//! ```
//!
//! Categories are open: any number of rules can be added after declaration,
//! and the parser resolves them by lookup at parse time.

mod builtin;
mod combinator;
mod error;
mod registry;
mod rule;
mod shared;
mod tokens;

pub use builtin::{APP_KIND, IDENT_KIND, NUM_KIND, PAREN_KIND, STR_KIND, TERM, prec};
pub use combinator::{
    CombinatorExpr, TokenClass, alt, cat, cat_at, ident, many, many1, named, num, opt, sep_by, sep_by1, seq, str_lit,
    term,
};
pub use error::{GrammarError, Result};
pub use registry::{Category, KindInfo, Registry};
pub use rule::{NamedParser, Rule, RuleDecl, RuleHandle, RuleId};
pub use shared::Grammar;
pub use tokens::{TokenTable, is_ident_like};
