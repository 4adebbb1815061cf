//! Quotation compilation
//!
//! Two sources of patterns: a registered shape (one typed capture per
//! non-terminal slot) and a text template parsed with antiquotations enabled
//! (one capture per `$name`).

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::base::Symbol;
use crate::grammar::{CombinatorExpr, GrammarError, NamedParser, Registry, Result, Rule, TokenClass};
use crate::parser::{self, ParseOptions};
use crate::syntax::{ANTIQUOT_KIND, SyntaxNode};

use super::typing::CaptureType;
use super::{CaptureSlot, Pattern};

/// Slots of a registered shape, in the order the parser produces them.
pub(super) fn shape_pattern(kind: &Symbol, shape: &CombinatorExpr) -> (Pattern, Vec<CaptureSlot>) {
    let mut captures = Vec::new();
    let mut children = Vec::new();
    push_slots(shape, &mut captures, &mut children);
    (
        Pattern::Node {
            kind: kind.clone(),
            children,
        },
        captures,
    )
}

fn push_slots(expr: &CombinatorExpr, captures: &mut Vec<CaptureSlot>, out: &mut Vec<Pattern>) {
    let ty = match expr {
        CombinatorExpr::Terminal(text) => {
            out.push(Pattern::Atom(SmolStr::new(text.trim())));
            return;
        }
        CombinatorExpr::Seq(items) => {
            for item in items {
                push_slots(item, captures, out);
            }
            return;
        }
        CombinatorExpr::Token(class) => CaptureType::Token(*class),
        CombinatorExpr::CategoryRef { name, .. } => CaptureType::Category(name.clone()),
        CombinatorExpr::NamedParserRef(name) => CaptureType::Named(name.clone()),
        CombinatorExpr::Alt(_) | CombinatorExpr::Opt(_) | CombinatorExpr::Rep { .. } => {
            CaptureType::Shape(expr.clone())
        }
    };
    out.push(Pattern::Capture(captures.len()));
    captures.push(CaptureSlot { name: None, ty: Some(ty) });
}

pub(super) fn rule_pattern(rule: &Rule) -> (Pattern, Vec<CaptureSlot>) {
    shape_pattern(&rule.kind, &rule.shape)
}

pub(super) fn named_pattern(parser: &NamedParser) -> (Pattern, Vec<CaptureSlot>) {
    shape_pattern(&parser.name, &parser.shape)
}

/// Parse `template` as an item of `category` and turn it into a pattern.
pub(super) fn template_pattern(
    registry: &Registry,
    category: &str,
    template: &str,
) -> Result<(Pattern, Vec<CaptureSlot>)> {
    if !registry.has_category(category) {
        return Err(GrammarError::UnknownCategory(Symbol::new(category)));
    }
    let parse = parser::parse_category_with(registry, category, template, ParseOptions::quotation());
    if let Some(diagnostic) = parse.diagnostics.first() {
        return Err(GrammarError::malformed(format!("`{template}`: {}", diagnostic.message)));
    }
    let mut compiler = TemplateCompiler {
        registry,
        captures: Vec::new(),
        names: FxHashSet::default(),
    };
    let pattern = compiler.compile(&parse.tree)?;
    Ok((pattern, compiler.captures))
}

struct TemplateCompiler<'r> {
    registry: &'r Registry,
    captures: Vec<CaptureSlot>,
    names: FxHashSet<SmolStr>,
}

impl TemplateCompiler<'_> {
    fn compile(&mut self, tree: &SyntaxNode) -> Result<Pattern> {
        match tree {
            SyntaxNode::Missing => Err(GrammarError::malformed("template has a missing term")),
            SyntaxNode::Atom { text } => Ok(Pattern::Atom(text.clone())),
            SyntaxNode::Identifier { name, .. } => Ok(Pattern::Ident(name.clone())),
            SyntaxNode::Node { kind, children } if *kind == ANTIQUOT_KIND => self.capture(children),
            SyntaxNode::Node { kind, children } => {
                let children = children
                    .iter()
                    .map(|child| self.compile(child))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Pattern::Node {
                    kind: kind.clone(),
                    children,
                })
            }
        }
    }

    fn capture(&mut self, children: &[SyntaxNode]) -> Result<Pattern> {
        let Some(name) = children.first().and_then(SyntaxNode::ident_name) else {
            return Err(GrammarError::malformed("antiquotation without a name"));
        };
        let name = SmolStr::new(name.as_str());
        if !self.names.insert(name.clone()) {
            return Err(GrammarError::malformed(format!("`${name}` is bound twice")));
        }
        let ty = match children.get(1).and_then(SyntaxNode::ident_name) {
            Some(ty) => Some(self.resolve_type(ty.as_str())?),
            None => None,
        };
        let index = self.captures.len();
        self.captures.push(CaptureSlot { name: Some(name), ty });
        Ok(Pattern::Capture(index))
    }

    /// Token classes first, then categories, then named parsers.
    fn resolve_type(&self, ty: &str) -> Result<CaptureType> {
        if let Some(class) = TokenClass::from_name(ty) {
            return Ok(CaptureType::Token(class));
        }
        if self.registry.has_category(ty) {
            return Ok(CaptureType::Category(Symbol::new(ty)));
        }
        if self.registry.named_parser(ty).is_some() {
            return Ok(CaptureType::Named(Symbol::new(ty)));
        }
        Err(GrammarError::malformed(format!("unknown capture type `{ty}`")))
    }
}
