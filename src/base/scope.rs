//! Hygiene scopes.
//!
//! A scope is an opaque, equality-comparable tag attached to identifiers.
//! Identifiers read from source text carry [`HygieneScope::ROOT`]; every
//! expansion (a quotation build) draws a fresh tag from a process-wide
//! counter so that identically-named identifiers introduced by different
//! expansions stay distinct.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SCOPE: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HygieneScope(u64);

impl HygieneScope {
    /// Scope of identifiers that come straight from parsed source.
    pub const ROOT: HygieneScope = HygieneScope(0);

    /// Allocate a scope never returned before in this process.
    pub fn fresh() -> Self {
        Self(NEXT_SCOPE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HygieneScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
