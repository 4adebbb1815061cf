//! Combinator expressions
//!
//! The shape language shared by rules and named parsers. A shape is a plain
//! value; evaluating it against input is the parser engine's job, and
//! building or destructuring trees of that shape is the quotation layer's.

use std::fmt;

use smol_str::SmolStr;

use crate::base::Symbol;

/// Primitive token classes a shape can ask for directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// An identifier (never a keyword); yields an `Identifier` slot
    Ident,
    /// A numeric literal; yields an `Atom` slot
    Number,
    /// A string literal including its quotes; yields an `Atom` slot
    Str,
}

impl TokenClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ident => "ident",
            Self::Number => "num",
            Self::Str => "str",
        }
    }

    /// Parse a capture type annotation (`ident`, `num`, `str`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ident" => Some(Self::Ident),
            "num" => Some(Self::Number),
            "str" => Some(Self::Str),
            _ => None,
        }
    }
}

/// A rule or named parser shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombinatorExpr {
    /// Literal token. Surrounding whitespace is a display concern only and is
    /// trimmed before matching.
    Terminal(SmolStr),
    /// Identifier or literal token
    Token(TokenClass),
    /// Sub-parse of a category. `prec` overrides the minimum precedence the
    /// enclosing rule's bounds would give this operand.
    CategoryRef { name: Symbol, prec: Option<u32> },
    /// Sub-parse of a named parser
    NamedParserRef(Symbol),
    Seq(Vec<CombinatorExpr>),
    /// Ordered choice; the first alternative that succeeds wins
    Alt(Vec<CombinatorExpr>),
    Opt(Box<CombinatorExpr>),
    Rep {
        item: Box<CombinatorExpr>,
        sep: Option<Box<CombinatorExpr>>,
        at_least_one: bool,
    },
}

// ============================================================================
// Constructors
// ============================================================================

pub fn term(text: impl AsRef<str>) -> CombinatorExpr {
    CombinatorExpr::Terminal(SmolStr::new(text))
}

pub fn cat(name: impl Into<Symbol>) -> CombinatorExpr {
    CombinatorExpr::CategoryRef {
        name: name.into(),
        prec: None,
    }
}

/// Category reference with an explicit minimum precedence.
pub fn cat_at(name: impl Into<Symbol>, prec: u32) -> CombinatorExpr {
    CombinatorExpr::CategoryRef {
        name: name.into(),
        prec: Some(prec),
    }
}

pub fn named(name: impl Into<Symbol>) -> CombinatorExpr {
    CombinatorExpr::NamedParserRef(name.into())
}

pub fn ident() -> CombinatorExpr {
    CombinatorExpr::Token(TokenClass::Ident)
}

pub fn num() -> CombinatorExpr {
    CombinatorExpr::Token(TokenClass::Number)
}

pub fn str_lit() -> CombinatorExpr {
    CombinatorExpr::Token(TokenClass::Str)
}

pub fn seq(items: impl IntoIterator<Item = CombinatorExpr>) -> CombinatorExpr {
    CombinatorExpr::Seq(items.into_iter().collect())
}

pub fn alt(items: impl IntoIterator<Item = CombinatorExpr>) -> CombinatorExpr {
    CombinatorExpr::Alt(items.into_iter().collect())
}

pub fn opt(item: CombinatorExpr) -> CombinatorExpr {
    CombinatorExpr::Opt(Box::new(item))
}

/// Zero or more, no separator.
pub fn many(item: CombinatorExpr) -> CombinatorExpr {
    rep(item, None, false)
}

/// One or more, no separator.
pub fn many1(item: CombinatorExpr) -> CombinatorExpr {
    rep(item, None, true)
}

/// Zero or more `item`s separated by `sep`.
pub fn sep_by(item: CombinatorExpr, sep: CombinatorExpr) -> CombinatorExpr {
    rep(item, Some(sep), false)
}

/// One or more `item`s separated by `sep`.
pub fn sep_by1(item: CombinatorExpr, sep: CombinatorExpr) -> CombinatorExpr {
    rep(item, Some(sep), true)
}

fn rep(item: CombinatorExpr, sep: Option<CombinatorExpr>, at_least_one: bool) -> CombinatorExpr {
    CombinatorExpr::Rep {
        item: Box::new(item),
        sep: sep.map(Box::new),
        at_least_one,
    }
}

// ============================================================================
// Queries
// ============================================================================

impl CombinatorExpr {
    /// Top-level elements: the items of a `Seq`, or the expression itself.
    pub fn items(&self) -> &[CombinatorExpr] {
        match self {
            Self::Seq(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// Trimmed text of a `Terminal`.
    pub fn terminal_text(&self) -> Option<&str> {
        match self {
            Self::Terminal(text) => Some(text.trim()),
            _ => None,
        }
    }

    /// Visit every terminal in the expression, left to right (trimmed).
    pub fn for_each_terminal<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Self::Terminal(text) => f(text.trim()),
            Self::Token(_) | Self::CategoryRef { .. } | Self::NamedParserRef(_) => {}
            Self::Seq(items) | Self::Alt(items) => {
                for item in items {
                    item.for_each_terminal(f);
                }
            }
            Self::Opt(item) => item.for_each_terminal(f),
            Self::Rep { item, sep, .. } => {
                item.for_each_terminal(f);
                if let Some(sep) = sep {
                    sep.for_each_terminal(f);
                }
            }
        }
    }

    /// All terminals in the expression, left to right (trimmed).
    pub fn terminals(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.for_each_terminal(&mut |t| out.push(t));
        out
    }

    /// Visit every category and named parser reference.
    pub fn for_each_ref<'a>(&'a self, f: &mut impl FnMut(&'a CombinatorExpr)) {
        match self {
            Self::CategoryRef { .. } | Self::NamedParserRef(_) => f(self),
            Self::Terminal(_) | Self::Token(_) => {}
            Self::Seq(items) | Self::Alt(items) => {
                for item in items {
                    item.for_each_ref(f);
                }
            }
            Self::Opt(item) => item.for_each_ref(f),
            Self::Rep { item, sep, .. } => {
                item.for_each_ref(f);
                if let Some(sep) = sep {
                    sep.for_each_ref(f);
                }
            }
        }
    }

    /// Whether the expression can succeed without consuming input, ignoring
    /// what referenced categories and named parsers might do.
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Terminal(_) | Self::Token(_) | Self::CategoryRef { .. } | Self::NamedParserRef(_) => false,
            Self::Seq(items) => items.iter().all(Self::is_nullable),
            Self::Alt(items) => items.iter().any(Self::is_nullable),
            Self::Opt(_) => true,
            Self::Rep { item, at_least_one, .. } => !at_least_one || item.is_nullable(),
        }
    }

    /// Number of child slots the expression contributes to a node.
    pub fn slot_count(&self) -> usize {
        match self {
            Self::Seq(items) => items.iter().map(Self::slot_count).sum(),
            _ => 1,
        }
    }
}

impl fmt::Display for CombinatorExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(text) => write!(f, "{:?}", text.as_str()),
            Self::Token(class) => f.write_str(class.as_str()),
            Self::CategoryRef { name, prec: None } => write!(f, "{name}"),
            Self::CategoryRef { name, prec: Some(p) } => write!(f, "{name}:{p}"),
            Self::NamedParserRef(name) => write!(f, "@{name}"),
            Self::Seq(items) => write_joined(f, items, " "),
            Self::Alt(items) => {
                f.write_str("(")?;
                write_joined(f, items, " | ")?;
                f.write_str(")")
            }
            Self::Opt(item) => write!(f, "({item})?"),
            Self::Rep {
                item,
                sep,
                at_least_one,
            } => {
                let suffix = if *at_least_one { "+" } else { "*" };
                match sep {
                    Some(sep) => write!(f, "sep({item}, {sep}){suffix}"),
                    None => write!(f, "({item}){suffix}"),
                }
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[CombinatorExpr], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
