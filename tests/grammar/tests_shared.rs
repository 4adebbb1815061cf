//! The shared grammar handle: snapshots, transactions, freezing, threads.

use std::thread;

use mixgram::grammar::{Grammar, GrammarError, cat, seq, term};
use mixgram::parser::parse_category;
use rstest::rstest;

use crate::helpers::grammar_fixtures::xor_grammar;
use crate::helpers::parse_assertions::parse_ok;

#[rstest]
fn test_snapshot_unaffected_by_later_registration(xor_grammar: Grammar) {
    let before = xor_grammar.snapshot();
    xor_grammar.infixl("term", "⊗", 70).unwrap();

    assert!(!parse_category(&before, "term", "a ⊗ b").ok());
    assert!(parse_category(&xor_grammar.snapshot(), "term", "a ⊗ b").ok());
}

#[rstest]
fn test_failed_batch_is_invisible(xor_grammar: Grammar) {
    let rules = xor_grammar.snapshot().rule_count();
    let result = xor_grammar.update(|registry| {
        registry.infixl("term", "⊗", 70)?;
        registry.declare_category("term")
    });
    assert_eq!(result, Err(GrammarError::DuplicateCategory("term".into())));
    assert_eq!(xor_grammar.snapshot().rule_count(), rules);
    assert!(!xor_grammar.parse_category("term", "a ⊗ b").ok());
}

#[rstest]
fn test_batch_registration(xor_grammar: Grammar) {
    xor_grammar
        .update(|registry| {
            registry.declare_category("cmd")?;
            registry.add_rule("cmd", seq([term("eval"), cat("term")]), 0, Some("cmd_eval"))?;
            Ok(())
        })
        .unwrap();
    assert!(parse_ok(&xor_grammar, "cmd", "eval a ⊕ b").is_of_kind("cmd_eval"));
}

#[rstest]
fn test_frozen_grammar_rejects_registration(xor_grammar: Grammar) {
    xor_grammar.freeze();
    assert!(xor_grammar.is_frozen());
    assert_eq!(xor_grammar.infixl("term", "⊗", 70), Err(GrammarError::Frozen));
    assert_eq!(xor_grammar.declare_category("cmd"), Err(GrammarError::Frozen));
    // Parsing and quotations keep working.
    assert!(xor_grammar.parse_category("term", "a ⊕ b").ok());
    assert!(xor_grammar.quote("$x ⊕ $y").is_ok());
}

#[rstest]
fn test_parse_many_in_parallel(xor_grammar: Grammar) {
    xor_grammar.freeze();
    let inputs = ["a ⊕ b", "a LXOR b ⊕ c", "⊕", "f (x ⊕ y)"];
    let results = xor_grammar.parse_many("term", &inputs);

    assert_eq!(results.len(), inputs.len());
    let ok: Vec<_> = results.iter().map(|parse| parse.ok()).collect();
    assert_eq!(ok, vec![true, true, false, true]);
    assert_eq!(results[1].tree, parse_ok(&xor_grammar, "term", "a LXOR (b ⊕ c)"));
}

#[rstest]
fn test_readers_see_consistent_snapshots(xor_grammar: Grammar) {
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    let parse = xor_grammar.parse_category("term", "a ⊕ b LXOR c");
                    assert!(parse.ok());
                }
            });
        }
        scope.spawn(|| {
            for (i, op) in ["⊗", "⊘", "⊙", "⊛"].into_iter().enumerate() {
                xor_grammar.infixl("term", op, 20 + i as u32).unwrap();
            }
        });
    });
    assert!(parse_ok(&xor_grammar, "term", "a ⊛ b").is_of_kind("term_⊛"));
}

#[test]
fn test_global_grammar_is_shared() {
    let kind = Grammar::global()
        .add_rule("term", seq([term("%%shared"), cat("term")]), 40, None)
        .unwrap()
        .kind;
    assert!(
        Grammar::global()
            .parse_category("term", "%%shared x")
            .tree
            .is_of_kind(kind.as_str())
    );
}
