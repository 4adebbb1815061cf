//! Registration: validation errors, rule ordering and generated kinds.

use mixgram::Symbol;
use mixgram::grammar::{Grammar, GrammarError, RuleDecl, cat, ident, named, prec, seq, term};
use mixgram::parser::ErrorCode;
use rstest::rstest;

use crate::helpers::grammar_fixtures::{grammar, xor_grammar};
use crate::helpers::parse_assertions::parse_ok;

// ============================================================================
// Validation
// ============================================================================

#[rstest]
#[case::duplicate_category(
    |g: &Grammar| g.declare_category("term"),
    GrammarError::DuplicateCategory(Symbol::new("term"))
)]
#[case::rule_in_unknown_category(
    |g: &Grammar| g.add_rule("decl", seq([term("def"), ident()]), 0, None).map(drop),
    GrammarError::UnknownCategory(Symbol::new("decl"))
)]
#[case::reference_to_unknown_category(
    |g: &Grammar| g.add_rule("term", seq([term("@"), cat("decl")]), 0, None).map(drop),
    GrammarError::UnknownCategory(Symbol::new("decl"))
)]
#[case::reference_to_unknown_named_parser(
    |g: &Grammar| g.add_rule("term", seq([term("@"), named("binders")]), 0, None).map(drop),
    GrammarError::UnknownNamedParser(Symbol::new("binders"))
)]
#[case::duplicate_kind(
    |g: &Grammar| g.add_rule("term", seq([term("@"), ident()]), 0, Some("term_app")).map(drop),
    GrammarError::DuplicateKind(Symbol::new("term_app"))
)]
#[case::named_parser_shadows_kind(
    |g: &Grammar| g.declare_named_parser("term_paren", ident()),
    GrammarError::DuplicateKind(Symbol::new("term_paren"))
)]
#[case::unknown_application_rule(
    |g: &Grammar| g.set_application_rule("apply"),
    GrammarError::UnknownKind(Symbol::new("apply"))
)]
fn test_registration_errors(
    grammar: Grammar,
    #[case] register: fn(&Grammar) -> Result<(), GrammarError>,
    #[case] expected: GrammarError,
) {
    let before = grammar.snapshot();
    assert_eq!(register(&grammar), Err(expected));
    assert_eq!(grammar.snapshot().rule_count(), before.rule_count());
    assert_eq!(grammar.snapshot().tokens(), before.tokens());
}

#[rstest]
fn test_duplicate_named_parser(grammar: Grammar) {
    grammar.declare_named_parser("binders", ident()).unwrap();
    assert_eq!(
        grammar.declare_named_parser("binders", ident()),
        Err(GrammarError::DuplicateName(Symbol::new("binders")))
    );
}

#[rstest]
fn test_recursive_named_parser_may_reference_itself(grammar: Grammar) {
    use mixgram::grammar::{alt, opt};

    grammar
        .declare_named_parser("nested", alt([ident(), seq([term("{"), opt(named("nested")), term("}")])]))
        .unwrap();
    let parse = grammar.parse_named("nested", "{ { x } }");
    assert!(parse.ok(), "{:?}", parse.diagnostics);
}

#[test]
fn test_error_codes() {
    assert_eq!(
        GrammarError::DuplicateCategory(Symbol::new("term")).code(),
        Some(ErrorCode::DuplicateCategory)
    );
    assert_eq!(GrammarError::Frozen.code(), None);
    assert_eq!(GrammarError::Frozen.to_string(), "grammar is frozen");
}

// ============================================================================
// Ordering and kinds
// ============================================================================

#[rstest]
fn test_rules_ordered_by_precedence_then_registration(xor_grammar: Grammar) {
    xor_grammar.infixl("term", "⊗", 60).unwrap();
    let registry = xor_grammar.snapshot();
    let kinds: Vec<_> = registry
        .rules_for("term")
        .unwrap()
        .into_iter()
        .filter(|rule| rule.precedence < prec::LEAD)
        .map(|rule| rule.kind.as_str())
        .collect();
    assert_eq!(kinds, vec!["term_⊕", "term_⊗", "term_LXOR"]);
}

#[rstest]
fn test_generated_kinds_are_unique(grammar: Grammar) {
    let first = grammar.infixl("term", "⊕", 60).unwrap();
    let second = grammar.infixr("term", "⊕", 30).unwrap();
    let unnamed = grammar.add_rule("term", seq([ident(), ident()]), 0, None).unwrap();
    assert_eq!(first.kind.as_str(), "term_⊕");
    assert_eq!(second.kind.as_str(), "term_⊕_2");
    assert_eq!(unnamed.kind.as_str(), "term_rule");
}

#[rstest]
fn test_explicit_declaration(grammar: Grammar) {
    let handle = grammar
        .add(
            RuleDecl::new("term", seq([cat("term"), term("::"), cat("term")]))
                .precedence(67)
                .left_bound(68)
                .right_bound(67)
                .kind("cons"),
        )
        .unwrap();
    assert_eq!(handle.kind.as_str(), "cons");
    assert_eq!(
        parse_ok(&grammar, "term", "a :: b :: c"),
        parse_ok(&grammar, "term", "a :: (b :: c)")
    );
}

#[rstest]
fn test_new_category_is_isolated(grammar: Grammar) {
    grammar.declare_category("cmd").unwrap();
    grammar
        .add_rule("cmd", seq([term("check"), cat("term")]), 0, Some("cmd_check"))
        .unwrap();
    assert!(parse_ok(&grammar, "cmd", "check f x").is_of_kind("cmd_check"));
    // Commands are not terms and terms are not commands.
    assert!(!grammar.parse_category("term", "check f x").ok());
    assert!(!grammar.parse_category("cmd", "f x").ok());
}

#[rstest]
fn test_registered_keyword_is_not_identifier(xor_grammar: Grammar) {
    assert!(!xor_grammar.parse_category("term", "LXOR").ok());
    assert!(parse_ok(&xor_grammar, "term", "LXORED").ident_name().is_some());
}
