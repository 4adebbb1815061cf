//! Parse assertion helpers.

use mixgram::SyntaxNode;
use mixgram::grammar::Grammar;
use mixgram::parser::{Diagnostic, ErrorCode};

/// Parse `input` as one `category` item, failing the test on any diagnostic.
pub fn parse_ok(grammar: &Grammar, category: &str, input: &str) -> SyntaxNode {
    let parse = grammar.parse_category(category, input);
    assert!(
        parse.diagnostics.is_empty(),
        "Expected no diagnostics for {input:?}, got:\n{}",
        render(&parse.diagnostics)
    );
    parse.tree
}

/// Parse `input` as one `category` item and return its diagnostics.
pub fn parse_err(grammar: &Grammar, category: &str, input: &str) -> Vec<Diagnostic> {
    let parse = grammar.parse_category(category, input);
    assert!(!parse.ok(), "Expected {input:?} to fail, parsed as {}", parse.tree);
    parse.diagnostics
}

/// Assert that some diagnostic carries `code`.
pub fn assert_has_code(diagnostics: &[Diagnostic], code: ErrorCode) {
    assert!(
        diagnostics.iter().any(|d| d.code == code),
        "Expected a {} diagnostic, got:\n{}",
        code.as_str(),
        render(diagnostics)
    );
}

fn render(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("  {}", d.format()))
        .collect::<Vec<_>>()
        .join("\n")
}
