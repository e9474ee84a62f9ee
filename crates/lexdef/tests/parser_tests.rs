//! Tests for the regex parser: tree shapes, the arity collapse, action
//! propagation, and the error-recovery asymmetries (a failed alternative
//! poisons the alternation, a failed later factor keeps the partial
//! concatenation, a missing `)` discards the group, a missing `}` keeps
//! the body).

use lexdef::parser::Parser;
use lexdef::{Scope, Session, SourceText};

/// Parse one braced body with `write` predefined as an action, returning
/// the dump and the diagnostics.
fn parse(body: &str) -> (String, Vec<String>) {
    let text = SourceText::from_text(body);
    let mut sess = Session::new(&text);
    let mut scope = Scope::new();
    let write = sess.ids.intern("write");
    let definition = sess.strs.intern("buffer += ch;");
    scope.define_action(write, definition);

    let ast = Parser::parse(&mut sess, &scope);
    (ast.dump(), sess.diags.messages().to_vec())
}

#[test]
fn test_single_char_body() {
    let (dump, messages) = parse("{a}");
    assert_eq!(dump, "{Char 'a'[action_idx_ : 0]}\n");
    assert!(messages.is_empty());
}

#[test]
fn test_group_of_one_collapses_away() {
    let (dump, messages) = parse("{((a))}");
    assert_eq!(dump, "{Char 'a'[action_idx_ : 0]}\n");
    assert!(messages.is_empty());
}

#[test]
fn test_concat_and_or_keep_source_order() {
    let (dump, _) = parse("{ab}");
    assert_eq!(
        dump,
        "{Concat\n    {Char 'a'[action_idx_ : 0]}\n    {Char 'b'[action_idx_ : 0]}\n}\n"
    );

    let (dump, _) = parse("{a|b|c}");
    assert_eq!(
        dump,
        "{Or\n    {Char 'a'[action_idx_ : 0]}\n    {Char 'b'[action_idx_ : 0]}\n    \
         {Char 'c'[action_idx_ : 0]}\n}\n"
    );
}

#[test]
fn test_postfix_operators_nest() {
    let (dump, messages) = parse("{(a*)+b?}");
    let expected = "{Concat\n    {Positive\n        {Kleene\n            \
                    {Char 'a'[action_idx_ : 0]}\n        }\n    }\n    \
                    {Optional\n        {Char 'b'[action_idx_ : 0]}\n    }\n}\n";
    assert_eq!(dump, expected);
    assert!(messages.is_empty());
}

#[test]
fn test_action_reaches_every_leaf_of_the_subtree() {
    // `write` was interned first, so its display index is 1.
    let (dump, messages) = parse("{(ab)$write}");
    assert_eq!(
        dump,
        "{Concat\n    {Char 'a'[action_idx_ : 1]}\n    {Char 'b'[action_idx_ : 1]}\n}\n"
    );
    assert!(messages.is_empty());

    // Outside the group, the action binds only to the preceding factor.
    let (dump, _) = parse("{ab$write}");
    assert_eq!(
        dump,
        "{Concat\n    {Char 'a'[action_idx_ : 0]}\n    {Char 'b'[action_idx_ : 1]}\n}\n"
    );
}

#[test]
fn test_undefined_action_discards_the_body() {
    let (dump, messages) = parse("{a$nope}");
    assert_eq!(dump, "");
    assert_eq!(messages, vec!["Line 1: the action nope is not defined.".to_owned()]);
}

#[test]
fn test_non_action_identifier_is_rejected() {
    let text = SourceText::from_text("{a$digit}");
    let mut sess = Session::new(&text);
    let mut scope = Scope::new();
    let digit = sess.ids.intern("digit");
    scope.check_rule_name(digit);

    let ast = Parser::parse(&mut sess, &scope);
    assert!(ast.root.is_none());
    assert_eq!(
        sess.diags.messages(),
        ["Line 1: the identifier digit is not an action name."]
    );
}

#[test]
fn test_missing_close_paren_discards_the_group() {
    let (dump, messages) = parse("{(ab}");
    assert_eq!(dump, "");
    assert_eq!(
        messages,
        vec!["Line 1: expected a closing round bracket.".to_owned()]
    );
}

#[test]
fn test_missing_close_brace_keeps_partial_body() {
    let (dump, messages) = parse("{ab");
    assert_eq!(
        dump,
        "{Concat\n    {Char 'a'[action_idx_ : 0]}\n    {Char 'b'[action_idx_ : 0]}\n}\n"
    );
    assert_eq!(
        messages,
        vec!["Line 1: expected a closing curly brace.".to_owned()]
    );
}

#[test]
fn test_empty_input_is_one_error() {
    let (dump, messages) = parse("{");
    assert_eq!(dump, "");
    assert_eq!(messages, vec!["Line 1: unexpected end of regexp.".to_owned()]);
}

#[test]
fn test_missing_open_brace() {
    let (dump, messages) = parse("a}");
    assert_eq!(dump, "");
    assert_eq!(
        messages,
        vec!["Line 1: expected an opening curly brace.".to_owned()]
    );
}

#[test]
fn test_misplaced_operators_are_single_errors() {
    for (body, message) in [
        ("{|a}", "Line 1: unexpected operator |."),
        ("{*a}", "Line 1: unexpected postfix operator."),
        ("{}", "Line 1: unexpected closing curly brace."),
        ("{)a}", "Line 1: unexpected closing round bracket."),
        ("{{a}", "Line 1: unexpected begin of regexp."),
        ("{$write}", "Line 1: unexpected action name."),
    ] {
        let (dump, messages) = parse(body);
        assert_eq!(dump, "", "body {body:?}");
        assert_eq!(messages, vec![message.to_owned()], "body {body:?}");
    }
}

#[test]
fn test_failed_alternative_poisons_the_alternation() {
    let (dump, messages) = parse("{a||b}");
    assert_eq!(dump, "");
    assert_eq!(messages, vec!["Line 1: unexpected operator |.".to_owned()]);
}

#[test]
fn test_line_numbers_cross_newlines() {
    let (dump, messages) = parse("{a\n$nope}");
    assert_eq!(dump, "");
    assert_eq!(messages, vec!["Line 2: the action nope is not defined.".to_owned()]);
}
