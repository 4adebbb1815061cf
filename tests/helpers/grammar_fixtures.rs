//! Grammar fixtures shared across the integration tests.

use mixgram::grammar::{Grammar, cat, ident, seq, sep_by, sep_by1, term};
use rstest::fixture;

/// The stock grammar: identifiers, literals, parentheses and application.
#[fixture]
pub fn grammar() -> Grammar {
    Grammar::new()
}

/// `⊕` at 60 and `LXOR` at 10, both left-associative.
#[fixture]
pub fn xor_grammar() -> Grammar {
    let grammar = Grammar::new();
    grammar.infixl("term", " ⊕ ", 60).unwrap();
    grammar.infixl("term", " LXOR ", 10).unwrap();
    grammar
}

/// Arithmetic-style operators covering every associativity helper.
#[fixture]
pub fn arith_grammar() -> Grammar {
    let grammar = Grammar::new();
    grammar.infixl("term", "+", 65).unwrap();
    grammar.infixl("term", "*", 70).unwrap();
    grammar.infixr("term", "^", 75).unwrap();
    grammar.prefix("term", "-", 75).unwrap();
    grammar.postfix("term", "!", 80).unwrap();
    grammar
}

/// A `cmd` category of `;`-terminated commands.
#[fixture]
pub fn cmd_grammar() -> Grammar {
    let grammar = Grammar::new();
    grammar.declare_category("cmd").unwrap();
    grammar
        .add_rule("cmd", seq([term("show"), cat("term"), term(";")]), 0, Some("cmd_show"))
        .unwrap();
    grammar
        .add_rule(
            "cmd",
            seq([term("let"), ident(), term(":="), cat("term"), term(";")]),
            0,
            Some("cmd_let"),
        )
        .unwrap();
    grammar
}

/// A `cmd` category of bracketed, comma-separated terms.
#[fixture]
pub fn bracket_grammar() -> Grammar {
    let grammar = Grammar::new();
    grammar.declare_category("cmd").unwrap();
    grammar
        .add_rule(
            "cmd",
            seq([term("["), sep_by(cat("term"), term(",")), term("]")]),
            0,
            Some("cmd_list"),
        )
        .unwrap();
    grammar
}

/// Named parsers over comma-separated identifiers.
#[fixture]
pub fn list_grammar() -> Grammar {
    let grammar = Grammar::new();
    grammar.declare_named_parser("args", sep_by1(ident(), term(","))).unwrap();
    grammar.declare_named_parser("opt_args", sep_by(ident(), term(","))).unwrap();
    grammar
}
