//! Precedence-climbing parser engine
//!
//! A backtracking interpreter over registered shapes:
//!
//! ```text
//! parse_category(cat, min_prec)
//!     leading rules (prec >= min_prec), first success wins
//!     'outer: loop
//!         trailing rules (prec >= min_prec, left prec >= left bound)
//!         first success becomes the new left operand
//! ```
//!
//! Every alternative runs under a checkpoint: on failure the cursor is put
//! back, diagnostics staged since the checkpoint are dropped, and the next
//! alternative is tried. Failures are never reported directly; the furthest
//! one (by token position) is remembered and turned into a diagnostic when a
//! whole top-level item fails, or when a repetition element is skipped.

use rustc_hash::FxHashSet;
use text_size::{TextRange, TextSize};
use tracing::{debug, trace};

use crate::base::Symbol;
use crate::grammar::{Category, CombinatorExpr, Registry, Rule, TokenClass, prec};
use crate::syntax::{ANTIQUOT_KIND, SyntaxNode, mk_atom, mk_group, mk_ident, mk_node};

use super::errors::{Diagnostic, ErrorCode};
use super::lexer::{Token, TokenKind, tokenize};
use super::options::ParseOptions;

/// A failed alternative. The reason is kept as the furthest failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Backtrack;

type PResult<T> = Result<T, Backtrack>;

/// What a top-level item or a recursion frame parses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Target {
    Category(Symbol),
    Named(Symbol),
}

impl Target {
    fn name(&self) -> &Symbol {
        match self {
            Self::Category(name) | Self::Named(name) => name,
        }
    }
}

/// Cursor and diagnostic count to restore when an alternative fails.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    pos: usize,
    diagnostics: usize,
}

/// The furthest failure seen while parsing the current item.
#[derive(Debug, Clone)]
struct Failure {
    pos: usize,
    code: ErrorCode,
    expected: Vec<String>,
}

pub(crate) struct Parser<'r> {
    registry: &'r Registry,
    tokens: Vec<Token>,
    pos: usize,
    options: ParseOptions,
    furthest: Option<Failure>,
    /// Category / named parser entries in progress, with their start position
    active: Vec<(Target, usize)>,
    diagnostics: Vec<Diagnostic>,
    eof: TextSize,
}

impl<'r> Parser<'r> {
    pub(crate) fn new(registry: &'r Registry, input: &str, options: ParseOptions) -> Self {
        Self {
            registry,
            tokens: tokenize(input, registry.tokens()),
            pos: 0,
            options,
            furthest: None,
            active: Vec::new(),
            diagnostics: Vec::new(),
            eof: TextSize::of(input),
        }
    }

    pub(crate) fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            diagnostics: self.diagnostics.len(),
        }
    }

    fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.diagnostics.truncate(checkpoint.diagnostics);
    }

    fn bump(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    fn range_at(&self, pos: usize) -> TextRange {
        self.tokens
            .get(pos)
            .map(|t| t.range)
            .unwrap_or_else(|| TextRange::empty(self.eof))
    }

    fn describe(&self, pos: usize) -> String {
        match self.tokens.get(pos) {
            Some(token) => format!("`{}`", token.text),
            None => "end of input".to_string(),
        }
    }

    // =========================================================================
    // Failure tracking
    // =========================================================================

    fn record(&mut self, pos: usize, code: ErrorCode, expected: String) {
        if let Some(failure) = self.furthest.as_mut() {
            if failure.pos > pos {
                return;
            }
            if failure.pos == pos {
                if code.specificity() > failure.code.specificity() {
                    failure.code = code;
                }
                if !failure.expected.contains(&expected) {
                    failure.expected.push(expected);
                }
                return;
            }
        }
        self.furthest = Some(Failure {
            pos,
            code,
            expected: vec![expected],
        });
    }

    fn fail(&mut self, code: ErrorCode, expected: impl Into<String>) -> Backtrack {
        self.record(self.pos, code, expected.into());
        Backtrack
    }

    fn fail_at(&mut self, pos: usize, code: ErrorCode, expected: impl Into<String>) -> Backtrack {
        self.record(pos, code, expected.into());
        Backtrack
    }

    fn failure_diagnostic(&self, fallback: usize) -> Diagnostic {
        let Some(failure) = &self.furthest else {
            return Diagnostic::new(
                format!("unexpected {}", self.describe(fallback)),
                self.range_at(fallback),
                ErrorCode::UnexpectedToken,
            );
        };
        let expected = failure.expected.join(" or ");
        let found = self.describe(failure.pos);
        let message = match failure.code {
            ErrorCode::UnexpectedToken | ErrorCode::NoMatchingRule | ErrorCode::UnknownCategory => {
                format!("expected {expected}, found {found}")
            }
            code => format!("{}: expected {expected}, found {found}", code.default_message()),
        };
        Diagnostic::new(message, self.range_at(failure.pos), failure.code)
    }

    // =========================================================================
    // Top-level items
    // =========================================================================

    /// Parse one item of `target`, recovering on failure.
    ///
    /// A failed item records a diagnostic and yields `Missing`. With recovery
    /// on, the cursor then skips to whichever comes first: just past the
    /// furthest failure, or the next token that can start the target.
    pub(crate) fn parse_item(&mut self, target: &Target) -> SyntaxNode {
        let checkpoint = self.checkpoint();
        let start = checkpoint.pos;
        self.furthest = None;
        let result = match target {
            Target::Category(name) => self.parse_category(name, 0),
            Target::Named(name) => self.parse_named(name),
        };
        match result {
            Ok(node) => node,
            Err(Backtrack) => {
                self.rewind(checkpoint);
                let diagnostic = self.failure_diagnostic(start);
                debug!(target = %target.name(), diagnostic = %diagnostic.message, "item failed");
                self.diagnostics.push(diagnostic);
                if self.options.recovery && !self.at_eof() {
                    let past_failure = self.furthest.as_ref().map_or(start, |f| f.pos) + 1;
                    let next_start = (start + 1..self.tokens.len())
                        .find(|&pos| self.can_start_at(target, pos))
                        .unwrap_or(self.tokens.len());
                    self.pos = past_failure.min(next_start).clamp(start + 1, self.tokens.len());
                    debug!(skipped = self.pos - start, "resynchronized");
                }
                SyntaxNode::Missing
            }
        }
    }

    /// Report input left over after a single item.
    pub(crate) fn expect_end(&mut self) {
        if self.at_eof() {
            return;
        }
        let mut diagnostic = Diagnostic::builder(ErrorCode::UnexpectedToken)
            .message(format!("unexpected {}", self.describe(self.pos)))
            .range(self.range_at(self.pos));
        if let Some(failure) = self.furthest.as_ref().filter(|f| f.pos >= self.pos) {
            diagnostic = diagnostic.hint(format!("expected {}", failure.expected.join(" or ")));
        }
        self.diagnostics.push(diagnostic.build());
    }

    /// Parse items of `target` until the input is exhausted.
    pub(crate) fn parse_all(&mut self, target: &Target) -> Vec<SyntaxNode> {
        let mut items = Vec::new();
        while !self.at_eof() {
            let before = self.pos;
            let item = self.parse_item(target);
            let failed = item.is_missing();
            items.push(item);
            if self.pos == before && !self.at_eof() {
                // Item matched without consuming anything
                self.expect_end();
                self.bump();
            }
            if failed && !self.options.recovery {
                break;
            }
        }
        items
    }

    // =========================================================================
    // Categories
    // =========================================================================

    fn enter(&mut self, target: Target) -> PResult<()> {
        let frame = (target, self.pos);
        if self.active.contains(&frame) {
            trace!(target = %frame.0.name(), pos = self.pos, "left recursion cut");
            let expected = frame.0.name().to_string();
            return Err(self.fail(ErrorCode::NoMatchingRule, expected));
        }
        self.active.push(frame);
        Ok(())
    }

    pub(crate) fn parse_category(&mut self, name: &Symbol, min_prec: u32) -> PResult<SyntaxNode> {
        let registry = self.registry;
        let Some(category) = registry.category(name) else {
            return Err(self.fail(ErrorCode::UnknownCategory, name.to_string()));
        };
        self.enter(Target::Category(name.clone()))?;
        let result = self.climb(category, min_prec);
        self.active.pop();
        result
    }

    fn climb(&mut self, category: &'r Category, min_prec: u32) -> PResult<SyntaxNode> {
        let registry = self.registry;
        let (mut left, mut left_prec) = match self.antiquotation() {
            Some(node) => (node, prec::MAX),
            None => self.parse_leading(category, min_prec)?,
        };

        'outer: loop {
            let checkpoint = self.checkpoint();
            let at = checkpoint.pos;
            for &id in category.trailing() {
                let rule = registry.rule(id);
                if rule.precedence < min_prec {
                    break;
                }
                if !self.continues_at(rule, at) {
                    continue;
                }
                if left_prec < rule.left_bound.unwrap_or(0) {
                    self.fail(ErrorCode::PrecedenceViolation, category.name().to_string());
                    continue;
                }
                trace!(kind = %rule.kind, pos = at, "trying trailing rule");
                match self.apply_rule(rule, Some(left.clone())) {
                    Ok(node) if self.pos > at => {
                        left = node;
                        left_prec = rule.precedence;
                        continue 'outer;
                    }
                    Ok(_) | Err(Backtrack) => self.rewind(checkpoint),
                }
            }
            break;
        }
        Ok(left)
    }

    fn parse_leading(&mut self, category: &'r Category, min_prec: u32) -> PResult<(SyntaxNode, u32)> {
        let registry = self.registry;
        let checkpoint = self.checkpoint();
        let start = checkpoint.pos;
        for &id in category.leading() {
            let rule = registry.rule(id);
            if !rule.shape.is_nullable() && !self.starts_at(&rule.shape, start) {
                continue;
            }
            if rule.precedence < min_prec {
                self.fail(ErrorCode::PrecedenceViolation, category.name().to_string());
                continue;
            }
            trace!(kind = %rule.kind, pos = start, "trying leading rule");
            match self.apply_rule(rule, None) {
                Ok(node) => return Ok((node, rule.precedence)),
                Err(Backtrack) => self.rewind(checkpoint),
            }
        }
        Err(self.fail_at(start, ErrorCode::NoMatchingRule, category.name().to_string()))
    }

    /// Parse the rest of `rule`. For trailing rules `left` is the already
    /// parsed first operand.
    fn apply_rule(&mut self, rule: &'r Rule, left: Option<SyntaxNode>) -> PResult<SyntaxNode> {
        let mut children = Vec::with_capacity(rule.shape.slot_count());
        let skip = match left {
            Some(left) => {
                children.push(left);
                1
            }
            None => 0,
        };
        let items = rule.shape.items();
        for index in skip..items.len() {
            self.parse_element(items, index, rule.operand_prec(index), &mut children)?;
        }
        Ok(rule
            .collapse(&children)
            .unwrap_or_else(|| mk_node(rule.kind.clone(), children)))
    }

    // =========================================================================
    // Named parsers
    // =========================================================================

    pub(crate) fn parse_named(&mut self, name: &Symbol) -> PResult<SyntaxNode> {
        let registry = self.registry;
        let Some(parser) = registry.named_parser(name) else {
            return Err(self.fail(ErrorCode::NoMatchingRule, name.to_string()));
        };
        if let Some(node) = self.antiquotation() {
            return Ok(node);
        }
        self.enter(Target::Named(name.clone()))?;
        let mut children = Vec::new();
        let result = self.parse_expr(&parser.shape, 0, &mut children);
        self.active.pop();
        result.map(|()| mk_node(name.clone(), children))
    }

    // =========================================================================
    // Combinators
    // =========================================================================

    /// Evaluate `expr`, appending the slots it produces to `out`.
    ///
    /// `min_prec` applies to a bare category reference without an explicit
    /// precedence; nested references are unrestricted.
    fn parse_expr(&mut self, expr: &'r CombinatorExpr, min_prec: u32, out: &mut Vec<SyntaxNode>) -> PResult<()> {
        match expr {
            CombinatorExpr::Terminal(text) => out.push(self.expect_terminal(text.trim())?),
            CombinatorExpr::Token(class) => out.push(self.expect_token(*class)?),
            CombinatorExpr::CategoryRef { name, prec } => {
                out.push(self.parse_category(name, prec.unwrap_or(min_prec))?);
            }
            CombinatorExpr::NamedParserRef(name) => out.push(self.parse_named(name)?),
            CombinatorExpr::Seq(items) => {
                for index in 0..items.len() {
                    self.parse_element(items, index, 0, out)?;
                }
            }
            CombinatorExpr::Alt(alternatives) => {
                let checkpoint = self.checkpoint();
                for alternative in alternatives {
                    let mut slots = Vec::new();
                    match self.parse_expr(alternative, 0, &mut slots) {
                        Ok(()) => {
                            out.push(single_or_group(slots));
                            return Ok(());
                        }
                        Err(Backtrack) => self.rewind(checkpoint),
                    }
                }
                return Err(Backtrack);
            }
            CombinatorExpr::Opt(item) => {
                let checkpoint = self.checkpoint();
                let mut slots = Vec::new();
                if self.parse_expr(item, 0, &mut slots).is_err() {
                    self.rewind(checkpoint);
                    slots.clear();
                }
                out.push(mk_group(slots));
            }
            CombinatorExpr::Rep {
                item,
                sep,
                at_least_one,
            } => out.push(self.parse_rep(item, sep.as_deref(), *at_least_one, None)?),
        }
        Ok(())
    }

    /// Evaluate `items[index]` of a sequence. A repetition directly followed
    /// by a terminal gets that terminal as its closer.
    fn parse_element(
        &mut self,
        items: &'r [CombinatorExpr],
        index: usize,
        min_prec: u32,
        out: &mut Vec<SyntaxNode>,
    ) -> PResult<()> {
        match &items[index] {
            CombinatorExpr::Rep {
                item,
                sep,
                at_least_one,
            } => {
                let closer = items.get(index + 1).and_then(CombinatorExpr::terminal_text);
                out.push(self.parse_rep(item, sep.as_deref(), *at_least_one, closer)?);
                Ok(())
            }
            item => self.parse_expr(item, min_prec, out),
        }
    }

    /// Items interleaved with separators, collected into one group.
    ///
    /// An item missing after a separator is a `DanglingSeparator` failure,
    /// unless recovery is on and the repetition has a closer: then the bad
    /// element is reported, replaced by `Missing`, and skipped up to the next
    /// separator or closer.
    fn parse_rep(
        &mut self,
        item: &'r CombinatorExpr,
        sep: Option<&'r CombinatorExpr>,
        at_least_one: bool,
        closer: Option<&'r str>,
    ) -> PResult<SyntaxNode> {
        let checkpoint = self.checkpoint();
        let start = checkpoint.pos;
        let mut slots = Vec::new();
        if self.parse_expr(item, 0, &mut slots).is_err() {
            self.rewind(checkpoint);
            if at_least_one {
                return Err(self.fail_at(start, ErrorCode::EmptyRepetition, describe_expr(item)));
            }
            return Ok(mk_group(Vec::new()));
        }

        while self.pos > start {
            let before = self.checkpoint();
            let mut more = Vec::new();
            if let Some(sep) = sep {
                if self.parse_expr(sep, 0, &mut more).is_err() {
                    self.rewind(before);
                    break;
                }
                let after_sep = self.checkpoint();
                let sep_slots = more.len();
                if self.parse_expr(item, 0, &mut more).is_err() {
                    self.rewind(after_sep);
                    let resync = match (sep.terminal_text(), closer) {
                        (Some(sep), Some(closer)) => self.skip_element(after_sep.pos, sep, closer),
                        _ => false,
                    };
                    if !resync {
                        return Err(self.fail_at(after_sep.pos, ErrorCode::DanglingSeparator, describe_expr(item)));
                    }
                    more.truncate(sep_slots);
                    more.extend(std::iter::repeat_n(SyntaxNode::Missing, item.slot_count()));
                }
            } else if self.parse_expr(item, 0, &mut more).is_err() {
                self.rewind(before);
                break;
            }
            if self.pos == before.pos {
                break;
            }
            slots.append(&mut more);
        }
        Ok(mk_group(slots))
    }

    /// Skip a bad repetition element starting at `from`, stopping at the next
    /// `sep` or `closer`. Reports the element and returns `true` on success.
    ///
    /// There is nothing to skip when `from` is already at the closer or at
    /// the end of input; the separator then really dangles.
    fn skip_element(&mut self, from: usize, sep: &str, closer: &str) -> bool {
        if !self.options.recovery {
            return false;
        }
        let stops_at = |token: &Token| token.kind != TokenKind::Str && (token.text == sep || token.text == closer);
        match self.tokens.get(from) {
            Some(token) if token.kind == TokenKind::Str || token.text != closer => {}
            _ => return false,
        }
        let Some(stop) = (from..self.tokens.len()).find(|&pos| stops_at(&self.tokens[pos])) else {
            return false;
        };
        let diagnostic = self.failure_diagnostic(from);
        debug!(diagnostic = %diagnostic.message, skipped = stop - from, "element skipped");
        self.diagnostics.push(diagnostic);
        self.furthest = None;
        self.pos = stop;
        true
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    fn expect_terminal(&mut self, text: &str) -> PResult<SyntaxNode> {
        match self.current() {
            Some(token) if token.kind != TokenKind::Str && token.text == text => {
                self.bump();
                Ok(mk_atom(text))
            }
            _ => Err(self.fail(ErrorCode::UnexpectedToken, format!("`{text}`"))),
        }
    }

    fn expect_token(&mut self, class: TokenClass) -> PResult<SyntaxNode> {
        if let Some(node) = self.antiquotation() {
            return Ok(node);
        }
        let node = match (self.current(), class) {
            (Some(token), TokenClass::Ident) if token.kind == TokenKind::Ident => mk_ident(&token.text),
            (Some(token), TokenClass::Number) if token.kind == TokenKind::Number => mk_atom(&token.text),
            (Some(token), TokenClass::Str) if token.kind == TokenKind::Str => mk_atom(&token.text),
            _ => return Err(self.fail(ErrorCode::UnexpectedToken, token_class_name(class))),
        };
        self.bump();
        Ok(node)
    }

    /// `$name` or `$name:type`, tokens adjacent, when antiquotations are on.
    fn antiquotation(&mut self) -> Option<SyntaxNode> {
        if !self.options.antiquotations {
            return None;
        }
        let dollar = self.current()?;
        if dollar.kind != TokenKind::Symbol || dollar.text != "$" {
            return None;
        }
        let name = self.tokens.get(self.pos + 1)?;
        if !name.kind.is_word() || !dollar.is_adjacent_to(name) {
            return None;
        }
        let mut children = vec![mk_ident(&name.text)];
        let mut consumed = 2;
        if let (Some(colon), Some(ty)) = (self.tokens.get(self.pos + 2), self.tokens.get(self.pos + 3)) {
            if colon.kind == TokenKind::Symbol
                && colon.text == ":"
                && ty.kind.is_word()
                && name.is_adjacent_to(colon)
                && colon.is_adjacent_to(ty)
            {
                children.push(mk_ident(&ty.text));
                consumed = 4;
            }
        }
        self.pos += consumed;
        Some(mk_node(ANTIQUOT_KIND, children))
    }

    // =========================================================================
    // First sets
    // =========================================================================

    fn can_start_at(&self, target: &Target, pos: usize) -> bool {
        let mut visited = FxHashSet::default();
        match target {
            Target::Category(name) => self.category_starts(name, pos, &mut visited),
            Target::Named(name) => self.named_starts(name, pos, &mut visited),
        }
    }

    fn starts_at(&self, expr: &CombinatorExpr, pos: usize) -> bool {
        self.expr_starts(expr, pos, &mut FxHashSet::default())
    }

    /// Whether the part of a trailing rule after its left operand can start
    /// at `pos`.
    fn continues_at(&self, rule: &Rule, pos: usize) -> bool {
        let mut visited = FxHashSet::default();
        for item in rule.shape.items().iter().skip(1) {
            if self.expr_starts(item, pos, &mut visited) {
                return true;
            }
            if !item.is_nullable() {
                return false;
            }
        }
        false
    }

    fn category_starts(&self, name: &Symbol, pos: usize, visited: &mut FxHashSet<Target>) -> bool {
        if !visited.insert(Target::Category(name.clone())) {
            return false;
        }
        let Some(category) = self.registry.category(name) else {
            return false;
        };
        category
            .leading()
            .iter()
            .any(|&id| self.expr_starts(&self.registry.rule(id).shape, pos, visited))
    }

    fn named_starts(&self, name: &Symbol, pos: usize, visited: &mut FxHashSet<Target>) -> bool {
        if !visited.insert(Target::Named(name.clone())) {
            return false;
        }
        self.registry
            .named_parser(name)
            .is_some_and(|parser| self.expr_starts(&parser.shape, pos, visited))
    }

    fn expr_starts(&self, expr: &CombinatorExpr, pos: usize, visited: &mut FxHashSet<Target>) -> bool {
        let Some(token) = self.tokens.get(pos) else {
            return false;
        };
        if self.options.antiquotations && token.kind == TokenKind::Symbol && token.text == "$" {
            if let CombinatorExpr::Token(_) | CombinatorExpr::CategoryRef { .. } | CombinatorExpr::NamedParserRef(_) = expr {
                return true;
            }
        }
        match expr {
            CombinatorExpr::Terminal(text) => token.kind != TokenKind::Str && token.text == text.trim(),
            CombinatorExpr::Token(TokenClass::Ident) => token.kind == TokenKind::Ident,
            CombinatorExpr::Token(TokenClass::Number) => token.kind == TokenKind::Number,
            CombinatorExpr::Token(TokenClass::Str) => token.kind == TokenKind::Str,
            CombinatorExpr::CategoryRef { name, .. } => self.category_starts(name, pos, visited),
            CombinatorExpr::NamedParserRef(name) => self.named_starts(name, pos, visited),
            CombinatorExpr::Seq(items) => {
                for item in items {
                    if self.expr_starts(item, pos, visited) {
                        return true;
                    }
                    if !item.is_nullable() {
                        return false;
                    }
                }
                false
            }
            CombinatorExpr::Alt(items) => items.iter().any(|item| self.expr_starts(item, pos, visited)),
            CombinatorExpr::Opt(item) | CombinatorExpr::Rep { item, .. } => self.expr_starts(item, pos, visited),
        }
    }
}

fn single_or_group(mut slots: Vec<SyntaxNode>) -> SyntaxNode {
    if slots.len() == 1 {
        if let Some(slot) = slots.pop() {
            return slot;
        }
    }
    mk_group(slots)
}

/// How an expected item is named in diagnostics.
fn describe_expr(expr: &CombinatorExpr) -> String {
    match expr {
        CombinatorExpr::Terminal(text) => format!("`{}`", text.trim()),
        CombinatorExpr::Token(class) => token_class_name(*class).to_string(),
        CombinatorExpr::CategoryRef { name, .. } | CombinatorExpr::NamedParserRef(name) => name.to_string(),
        other => other.to_string(),
    }
}

fn token_class_name(class: TokenClass) -> &'static str {
    match class {
        TokenClass::Ident => "identifier",
        TokenClass::Number => "number",
        TokenClass::Str => "string",
    }
}
