//! Token table
//!
//! Every terminal appearing in a registered shape. The lexer consults the
//! table for longest-match symbols; identifier-shaped entries are keywords
//! and never lex as identifiers.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// The set of registered terminal texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTable {
    tokens: FxHashSet<SmolStr>,
    /// Length in chars of the longest entry
    max_chars: usize,
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a terminal; surrounding whitespace is ignored. Returns `true` if
    /// the token was new.
    pub fn insert(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.max_chars = self.max_chars.max(text.chars().count());
        self.tokens.insert(SmolStr::new(text))
    }

    pub fn contains(&self, text: &str) -> bool {
        self.tokens.contains(text)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Byte length of the longest registered token that prefixes `rest`.
    pub fn longest_match(&self, rest: &str) -> Option<usize> {
        let mut best = None;
        for (count, (idx, ch)) in rest.char_indices().enumerate() {
            if count >= self.max_chars {
                break;
            }
            let end = idx + ch.len_utf8();
            if self.tokens.contains(&rest[..end]) {
                best = Some(end);
            }
        }
        best
    }

    /// Whether the text is a registered identifier-shaped token.
    pub fn is_keyword(&self, text: &str) -> bool {
        is_ident_like(text) && self.contains(text)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(SmolStr::as_str)
    }
}

/// Whether `text` has the shape of an identifier (`x`, `if`, `Nat.add`).
pub fn is_ident_like(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c == '_' || unicode_ident::is_xid_start(c) => {}
        _ => return false,
    }
    chars.all(|c| c == '.' || unicode_ident::is_xid_continue(c)) && !text.ends_with('.')
}
