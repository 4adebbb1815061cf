//! Logos-based lexer
//!
//! Logos classifies the fixed lexical classes (whitespace, comments,
//! identifiers, numbers, strings). Operator symbols and keywords are not
//! fixed: they come from the registry's [`TokenTable`], so the lexer runs one
//! token at a time and lets the table's longest match compete with the
//! class logos found.

use logos::Logos;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use crate::grammar::{TokenTable, is_ident_like};

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    Comment,
    Ident,
    /// Identifier-shaped registered token
    Keyword,
    /// Any other registered token, or a single unrecognized character
    Symbol,
    Number,
    Str,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    /// Identifier or keyword.
    pub fn is_word(self) -> bool {
        matches!(self, Self::Ident | Self::Keyword)
    }
}

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: SmolStr,
    pub range: TextRange,
}

impl Token {
    /// Whether `next` starts exactly where this token ends.
    pub fn is_adjacent_to(&self, next: &Token) -> bool {
        self.range.end() == next.range.start()
    }
}

/// Lexer over a source string and a token table
pub struct Lexer<'a> {
    input: &'a str,
    table: &'a TokenTable,
    offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, table: &'a TokenTable) -> Self {
        Self {
            input,
            table,
            offset: 0,
        }
    }

    /// A registered token wins over an identifier or number of the same or
    /// shorter length.
    fn word_or_symbol(&self, rest: &str, kind: TokenKind, len: usize) -> (TokenKind, usize) {
        match self.table.longest_match(rest) {
            Some(n) if n >= len => {
                let kind = if is_ident_like(&rest[..n]) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Symbol
                };
                (kind, n)
            }
            _ => (kind, len),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.input[self.offset..];
        let first = rest.chars().next()?;

        let mut raw = LogosToken::lexer(rest);
        let class = raw.next();
        let raw_len = raw.span().end;

        let (kind, len) = match class {
            Some(Ok(LogosToken::Whitespace)) => (TokenKind::Whitespace, raw_len),
            Some(Ok(LogosToken::LineComment)) => (TokenKind::Comment, raw_len),
            Some(Ok(LogosToken::String)) => (TokenKind::Str, raw_len),
            Some(Ok(LogosToken::Number)) => self.word_or_symbol(rest, TokenKind::Number, raw_len),
            Some(Ok(LogosToken::Ident)) | Some(Err(())) | None => match scan_ident(rest) {
                0 => match self.table.longest_match(rest) {
                    Some(n) => (TokenKind::Symbol, n),
                    None => (TokenKind::Symbol, first.len_utf8()),
                },
                n => self.word_or_symbol(rest, TokenKind::Ident, n),
            },
        };

        let start = self.offset;
        self.offset += len;
        Some(Token {
            kind,
            text: SmolStr::new(&rest[..len]),
            range: TextRange::new(TextSize::new(start as u32), TextSize::new(self.offset as u32)),
        })
    }
}

/// Tokenize an entire string, dropping whitespace and comments
pub fn tokenize(input: &str, table: &TokenTable) -> Vec<Token> {
    Lexer::new(input, table).filter(|t| !t.kind.is_trivia()).collect()
}

/// Byte length of the (possibly dotted) Unicode identifier at the start of
/// `rest`, or 0.
fn scan_ident(rest: &str) -> usize {
    let is_start = |c: char| c == '_' || unicode_ident::is_xid_start(c);
    let mut chars = rest.char_indices().peekable();
    match chars.next() {
        Some((_, c)) if is_start(c) => {}
        _ => return 0,
    }
    let mut end = rest.len();
    while let Some((idx, c)) = chars.next() {
        if c == '.' {
            match chars.peek() {
                Some((_, next)) if is_start(*next) => continue,
                _ => {
                    end = idx;
                    break;
                }
            }
        }
        if !unicode_ident::is_xid_continue(c) {
            end = idx;
            break;
        }
    }
    end
}

/// Fixed lexical classes
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"--[^\n]*")]
    LineComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,
}
