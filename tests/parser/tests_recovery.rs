//! Error recovery over item sequences.

use mixgram::grammar::Grammar;
use mixgram::parser::{ErrorCode, ParseOptions, parse_items_with};
use mixgram::SyntaxNode;
use mixgram::syntax::{mk_atom, mk_group, mk_ident, mk_node};
use mixgram::{TextRange, TextSize};
use rstest::rstest;

use crate::helpers::grammar_fixtures::{bracket_grammar, cmd_grammar, xor_grammar};
use crate::helpers::parse_assertions::assert_has_code;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(TextSize::new(start), TextSize::new(end))
}

// ============================================================================
// Resynchronization
// ============================================================================

#[rstest]
fn test_malformed_item_becomes_missing(xor_grammar: Grammar) {
    let parse = xor_grammar.parse_items("term", "⊕ b");
    assert_eq!(parse.items.len(), 2);
    assert!(parse.items[0].is_missing());
    assert_eq!(parse.items[1], mk_ident("b"));

    assert_eq!(parse.diagnostics.len(), 1);
    let diagnostic = &parse.diagnostics[0];
    assert_eq!(diagnostic.code, ErrorCode::NoMatchingRule);
    assert_eq!(diagnostic.message, "expected term, found `⊕`");
    assert_eq!(diagnostic.range, range(0, '⊕'.len_utf8() as u32));
}

#[rstest]
fn test_command_after_error_still_parses(cmd_grammar: Grammar) {
    let parse = cmd_grammar.parse_items("cmd", "show ; show b ;");
    assert_eq!(parse.items.len(), 2);
    assert!(parse.items[0].is_missing());
    assert_eq!(parse.items[1].to_string(), r#"(cmd_show "show" b ";")"#);

    assert_eq!(parse.diagnostics.len(), 1);
    assert_eq!(parse.diagnostics[0].message, "expected term, found `;`");
    assert_eq!(parse.diagnostics[0].range, range(5, 6));
}

#[rstest]
fn test_good_items_around_bad_one(cmd_grammar: Grammar) {
    let parse = cmd_grammar.parse_items("cmd", "show a ; show ; let x := b ;");
    assert_eq!(parse.items.len(), 3);
    assert!(parse.items[0].is_of_kind("cmd_show"));
    assert!(parse.items[1].is_missing());
    assert_eq!(parse.items[2].to_string(), r#"(cmd_let "let" x ":=" b ";")"#);
    assert_eq!(parse.diagnostics.len(), 1);
}

#[rstest]
fn test_each_failed_item_has_one_diagnostic(cmd_grammar: Grammar) {
    let parse = cmd_grammar.parse_items("cmd", "show ; let := x ; show c ;");
    let last = parse.items.last().unwrap();
    assert!(last.is_of_kind("cmd_show"));
    let missing = parse.items.iter().filter(|item| item.is_missing()).count();
    assert_eq!(missing, parse.items.len() - 1);
    assert_eq!(missing, parse.diagnostics.len());
    assert_eq!(parse.diagnostics[1].message, "expected identifier, found `:=`");
}

#[rstest]
#[case::single_garbage(")", 1)]
#[case::all_garbage(") ) )", 3)]
#[case::garbage_then_command(") show a ;", 1)]
fn test_recovery_always_advances(cmd_grammar: Grammar, #[case] input: &str, #[case] errors: usize) {
    let parse = cmd_grammar.parse_items("cmd", input);
    assert_eq!(parse.diagnostics.len(), errors);
    assert!(parse.items.iter().filter(|item| item.is_missing()).count() == errors);
}

#[rstest]
fn test_empty_input_has_no_items(cmd_grammar: Grammar) {
    let parse = cmd_grammar.parse_items("cmd", "  -- nothing here\n");
    assert!(parse.items.is_empty());
    assert!(parse.ok());
}

// ============================================================================
// Repetition elements
// ============================================================================

#[rstest]
fn test_bad_element_is_skipped_to_next_separator(bracket_grammar: Grammar) {
    let parse = bracket_grammar.parse_items("cmd", "[a, ), b]");
    assert_eq!(parse.items.len(), 1);
    let expected = mk_node(
        "cmd_list",
        vec![
            mk_atom("["),
            mk_group(vec![
                mk_ident("a"),
                mk_atom(","),
                SyntaxNode::Missing,
                mk_atom(","),
                mk_ident("b"),
            ]),
            mk_atom("]"),
        ],
    );
    assert_eq!(parse.items[0], expected);

    assert_eq!(parse.diagnostics.len(), 1);
    assert_eq!(parse.diagnostics[0].code, ErrorCode::NoMatchingRule);
    assert_eq!(parse.diagnostics[0].message, "expected term, found `)`");
    assert_eq!(parse.diagnostics[0].range, range(4, 5));
}

#[rstest]
fn test_each_bad_element_has_one_diagnostic(bracket_grammar: Grammar) {
    let parse = bracket_grammar.parse_category("cmd", "[a, ) ), b, ), c]");
    assert_eq!(
        parse.tree.to_string(),
        r#"(cmd_list "[" (group a "," <missing> "," b "," <missing> "," c) "]")"#
    );
    assert_eq!(parse.diagnostics.len(), 2);
    assert!(!parse.ok());
}

#[rstest]
#[case::closer_after_separator("[a, ]")]
#[case::no_resync_point("[a, ) b")]
fn test_separator_without_item_still_dangles(bracket_grammar: Grammar, #[case] input: &str) {
    let parse = bracket_grammar.parse_items("cmd", input);
    assert!(parse.items[0].is_missing());
    assert_eq!(parse.diagnostics[0].code, ErrorCode::DanglingSeparator);
}

#[rstest]
fn test_recovery_disabled_keeps_dangling_separator(bracket_grammar: Grammar) {
    let registry = bracket_grammar.snapshot();
    let options = ParseOptions {
        recovery: false,
        ..ParseOptions::default()
    };
    let parse = parse_items_with(&registry, "cmd", "[a, ), b]", options);
    assert_eq!(parse.items.len(), 1);
    assert!(parse.items[0].is_missing());
    assert_eq!(parse.diagnostics.len(), 1);
    assert_eq!(parse.diagnostics[0].code, ErrorCode::DanglingSeparator);
}

// ============================================================================
// Fatal failures
// ============================================================================

#[rstest]
fn test_failure_at_end_of_input(cmd_grammar: Grammar) {
    let parse = cmd_grammar.parse_category("cmd", "show");
    assert!(parse.tree.is_missing());
    assert_eq!(parse.diagnostics.len(), 1);
    assert_eq!(parse.diagnostics[0].message, "expected term, found end of input");
    assert_eq!(parse.diagnostics[0].range, TextRange::empty(TextSize::new(4)));
}

#[rstest]
fn test_recovery_disabled_stops_at_first_error(cmd_grammar: Grammar) {
    let registry = cmd_grammar.snapshot();
    let options = ParseOptions {
        recovery: false,
        ..ParseOptions::default()
    };
    let parse = parse_items_with(&registry, "cmd", "show ; show b ;", options);
    assert_eq!(parse.items.len(), 1);
    assert!(parse.items[0].is_missing());
    assert_eq!(parse.diagnostics.len(), 1);
}

#[rstest]
fn test_diagnostic_position_in_source(cmd_grammar: Grammar) {
    let source = "show a ;\nshow ;";
    let parse = cmd_grammar.parse_items("cmd", source);
    assert_has_code(&parse.diagnostics, ErrorCode::NoMatchingRule);
    let rendered = parse.diagnostics[0].format_with_source(source);
    assert!(rendered.starts_with("2:6: error E"), "{rendered}");
    assert!(rendered.ends_with("expected term, found `;`"), "{rendered}");
}

#[rstest]
fn test_unknown_category(cmd_grammar: Grammar) {
    let parse = cmd_grammar.parse_category("decl", "x");
    assert!(parse.tree.is_missing());
    assert_has_code(&parse.diagnostics, ErrorCode::UnknownCategory);
}
