//! Repetition, optional and alternative combinators.

use mixgram::grammar::{Grammar, alt, cat, ident, named, num, opt, prec, sep_by, seq, term};
use mixgram::parser::ErrorCode;
use mixgram::syntax::{mk_atom, mk_group, mk_ident, mk_node};
use rstest::rstest;

use crate::helpers::grammar_fixtures::{grammar, list_grammar};
use crate::helpers::parse_assertions::{assert_has_code, parse_ok};

// ============================================================================
// Named parsers
// ============================================================================

#[rstest]
fn test_sep_by1_collects_items_and_separators(list_grammar: Grammar) {
    let parse = list_grammar.parse_named("args", "a, b, c");
    assert!(parse.ok());
    let expected = mk_node(
        "args",
        vec![mk_group(vec![
            mk_ident("a"),
            mk_atom(","),
            mk_ident("b"),
            mk_atom(","),
            mk_ident("c"),
        ])],
    );
    assert_eq!(parse.tree, expected);
}

#[rstest]
fn test_sep_by1_rejects_empty_input(list_grammar: Grammar) {
    let parse = list_grammar.parse_named("args", "");
    assert!(parse.tree.is_missing());
    assert_has_code(&parse.diagnostics, ErrorCode::EmptyRepetition);
    assert!(parse.diagnostics[0].message.ends_with("expected identifier, found end of input"));
}

#[rstest]
fn test_sep_by_accepts_empty_input(list_grammar: Grammar) {
    let parse = list_grammar.parse_named("opt_args", "");
    assert!(parse.ok());
    assert_eq!(parse.tree, mk_node("opt_args", vec![mk_group(vec![])]));
}

#[rstest]
#[case::args("args")]
#[case::opt_args("opt_args")]
fn test_trailing_separator_is_dangling(list_grammar: Grammar, #[case] parser: &str) {
    let parse = list_grammar.parse_named(parser, "a, b,");
    assert!(parse.tree.is_missing());
    assert_has_code(&parse.diagnostics, ErrorCode::DanglingSeparator);
}

#[rstest]
fn test_repetition_stops_at_non_item(list_grammar: Grammar) {
    let parse = list_grammar.parse_named("args", "a b");
    assert_eq!(parse.tree, mk_node("args", vec![mk_group(vec![mk_ident("a")])]));
    assert_has_code(&parse.diagnostics, ErrorCode::UnexpectedToken);
    assert_eq!(parse.diagnostics[0].message, "unexpected `b`");
    assert_eq!(parse.diagnostics[0].hint.as_deref(), Some("expected `,`"));
}

#[rstest]
fn test_named_parser_inside_rule(list_grammar: Grammar) {
    list_grammar
        .add_rule(
            "term",
            seq([term("call"), ident(), term("("), named("opt_args"), term(")")]),
            prec::MAX,
            Some("call"),
        )
        .unwrap();

    let tree = parse_ok(&list_grammar, "term", "call f (x, y)");
    assert_eq!(
        tree.to_string(),
        r#"(call "call" f "(" (opt_args (group x "," y)) ")")"#
    );
    let empty = parse_ok(&list_grammar, "term", "call f ()");
    assert_eq!(empty.child(3), Some(&mk_node("opt_args", vec![mk_group(vec![])])));
}

// ============================================================================
// Rule-level combinators
// ============================================================================

#[rstest]
fn test_list_of_terms(grammar: Grammar) {
    grammar
        .add_rule(
            "term",
            seq([term("["), sep_by(cat("term"), term(",")), term("]")]),
            prec::MAX,
            Some("list"),
        )
        .unwrap();

    let tree = parse_ok(&grammar, "term", "[a, f x, c]");
    assert_eq!(tree.to_string(), r#"(list "[" (group a "," (term_app f (group x)) "," c) "]")"#);
    assert_eq!(parse_ok(&grammar, "term", "[]").to_string(), r#"(list "[" (group) "]")"#);

    let dangling = grammar.parse_category("term", "[a,]");
    assert_has_code(&dangling.diagnostics, ErrorCode::DanglingSeparator);
}

#[rstest]
fn test_optional_slot(grammar: Grammar) {
    grammar
        .add_rule(
            "term",
            seq([term("fun"), ident(), opt(seq([term(":"), cat("term")])), term("=>"), cat("term")]),
            prec::LEAD,
            Some("lambda"),
        )
        .unwrap();

    let typed = parse_ok(&grammar, "term", "fun x : T => x");
    assert_eq!(typed.child(2), Some(&mk_group(vec![mk_atom(":"), mk_ident("T")])));
    let untyped = parse_ok(&grammar, "term", "fun x => x");
    assert_eq!(untyped.child(2), Some(&mk_group(vec![])));
}

#[rstest]
fn test_alternative_slot(grammar: Grammar) {
    grammar
        .add_rule(
            "term",
            seq([term("#"), alt([num(), seq([term("("), ident(), term(")")])])]),
            prec::MAX,
            Some("hash"),
        )
        .unwrap();

    assert_eq!(parse_ok(&grammar, "term", "# 3").child(1), Some(&mk_atom("3")));
    assert_eq!(
        parse_ok(&grammar, "term", "# (x)").child(1),
        Some(&mk_group(vec![mk_atom("("), mk_ident("x"), mk_atom(")")]))
    );
}
