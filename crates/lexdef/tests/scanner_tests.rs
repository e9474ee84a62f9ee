//! Tests for the two scanners: token recognition, demotion of incomplete
//! keywords and delimiters, string literals, pushback, and the enrichment
//! of character classes and complements.

use lexdef::scanner::regex::{RegexScanner, RegexTokenKind};
use lexdef::scanner::rule::{Keyword, RuleScanner, RuleTokenKind};
use lexdef::{Session, SourceText};

fn rule_tokens(text: &str) -> (Vec<RuleTokenKind>, Vec<String>) {
    let text = SourceText::from_text(text);
    let mut sess = Session::new(&text);
    let mut scanner = RuleScanner::new();
    let mut kinds = Vec::new();
    loop {
        let token = scanner.next(&mut sess);
        kinds.push(token.kind);
        if token.kind == RuleTokenKind::EndOfText {
            break;
        }
    }
    (kinds, sess.diags.messages().to_vec())
}

#[test]
fn test_rule_scanner_basic_tokens() {
    let text = SourceText::from_text("number -> {d}");
    let mut sess = Session::new(&text);
    let mut scanner = RuleScanner::new();

    let token = scanner.next(&mut sess);
    let RuleTokenKind::Ident(name) = token.kind else {
        panic!("expected an identifier, got {:?}", token.kind);
    };
    assert_eq!(sess.ids.resolve(name), "number");
    assert_eq!(token.line, 1);

    assert_eq!(scanner.next(&mut sess).kind, RuleTokenKind::Arrow);
    assert_eq!(scanner.next(&mut sess).kind, RuleTokenKind::OpenBrace);
    assert_eq!(sess.diags.error_count(), 0);
}

#[test]
fn test_rule_scanner_keywords_and_delimiters() {
    let (kinds, messages) = rule_tokens("%strings , : %codes_type }");
    assert_eq!(
        kinds,
        vec![
            RuleTokenKind::Keyword(Keyword::Strings),
            RuleTokenKind::Comma,
            RuleTokenKind::Colon,
            RuleTokenKind::Keyword(Keyword::CodesType),
            RuleTokenKind::CloseBrace,
            RuleTokenKind::EndOfText,
        ]
    );
    assert!(messages.is_empty());
}

#[test]
fn test_incomplete_keyword_demotes_to_expected_one() {
    let (kinds, messages) = rule_tokens("%strin ,");
    assert_eq!(kinds[0], RuleTokenKind::Keyword(Keyword::Strings));
    assert_eq!(kinds[1], RuleTokenKind::Comma);
    assert_eq!(messages, vec!["Line 1: expects %strings.".to_owned()]);
}

#[test]
fn test_keyword_with_unknown_initial_character() {
    let (kinds, messages) = rule_tokens("%zzz");
    assert_eq!(kinds[0], RuleTokenKind::Unknown);
    assert!(matches!(kinds[1], RuleTokenKind::Ident(_)));
    assert_eq!(
        messages,
        vec![
            "Line 1: one of the following characters is expected: \
             a, c, d, h, i, k, l, m, n, s, t."
                .to_owned()
        ]
    );
}

#[test]
fn test_lone_minus_demotes_to_arrow() {
    let (kinds, messages) = rule_tokens("- x");
    assert_eq!(kinds[0], RuleTokenKind::Arrow);
    assert_eq!(messages, vec!["Line 1: expects ->.".to_owned()]);
}

#[test]
fn test_string_literal_with_doubled_quote_and_newline() {
    let text = SourceText::from_text("\"say \"\"hi\"\"\nbye\" x");
    let mut sess = Session::new(&text);
    let mut scanner = RuleScanner::new();

    let token = scanner.next(&mut sess);
    let RuleTokenKind::String(body) = token.kind else {
        panic!("expected a string literal, got {:?}", token.kind);
    };
    assert_eq!(sess.strs.resolve(body), "say \"hi\"\nbye");
    assert_eq!(token.line, 1);

    // The literal spanned a newline, so the next token is on line 2.
    let token = scanner.next(&mut sess);
    assert!(matches!(token.kind, RuleTokenKind::Ident(_)));
    assert_eq!(token.line, 2);
    assert_eq!(sess.diags.error_count(), 0);
}

#[test]
fn test_unterminated_string_keeps_partial_text() {
    let text = SourceText::from_text("\"abc");
    let mut sess = Session::new(&text);
    let mut scanner = RuleScanner::new();

    let token = scanner.next(&mut sess);
    let RuleTokenKind::String(body) = token.kind else {
        panic!("expected a string literal, got {:?}", token.kind);
    };
    assert_eq!(sess.strs.resolve(body), "abc");
    assert_eq!(
        sess.diags.messages(),
        ["Line 1: unexpected end of a string literal."]
    );
}

#[test]
fn test_pushback_replays_without_reinterning() {
    let text = SourceText::from_text("alpha beta");
    let mut sess = Session::new(&text);
    let mut scanner = RuleScanner::new();

    let first = scanner.next(&mut sess);
    let interned = sess.ids.len();
    scanner.back(&mut sess.cursor);
    let replayed = scanner.next(&mut sess);
    assert_eq!(first, replayed);
    assert_eq!(sess.ids.len(), interned);

    // The stream continues correctly after the replay.
    let second = scanner.next(&mut sess);
    let RuleTokenKind::Ident(name) = second.kind else {
        panic!("expected an identifier, got {:?}", second.kind);
    };
    assert_eq!(sess.ids.resolve(name), "beta");
}

fn regex_tokens(text: &str) -> (Vec<RegexTokenKind>, Vec<String>) {
    let text = SourceText::from_text(text);
    let mut sess = Session::new(&text);
    let mut scanner = RegexScanner::new();
    let mut kinds = Vec::new();
    loop {
        let token = scanner.next(&mut sess);
        kinds.push(token.kind);
        if token.kind == RegexTokenKind::EndOfText {
            break;
        }
    }
    (kinds, sess.diags.messages().to_vec())
}

#[test]
fn test_regex_scanner_operators_and_chars() {
    let (kinds, messages) = regex_tokens("{a|b*}");
    assert_eq!(
        kinds,
        vec![
            RegexTokenKind::OpenBrace,
            RegexTokenKind::Char('a'),
            RegexTokenKind::Or,
            RegexTokenKind::Char('b'),
            RegexTokenKind::Kleene,
            RegexTokenKind::CloseBrace,
            RegexTokenKind::EndOfText,
        ]
    );
    assert!(messages.is_empty());
}

#[test]
fn test_escapes() {
    let (kinds, messages) = regex_tokens(r"\n\q\*");
    assert_eq!(kinds[0], RegexTokenKind::Char('\n'));
    assert_eq!(kinds[1], RegexTokenKind::Char('q'));
    assert_eq!(kinds[2], RegexTokenKind::Char('*'));
    assert!(messages.is_empty());

    // A trailing backslash stands for itself.
    let (kinds, messages) = regex_tokens("a\\");
    assert_eq!(kinds[1], RegexTokenKind::Char('\\'));
    assert!(messages.is_empty());
}

#[test]
fn test_action_and_regexp_references() {
    let text = SourceText::from_text("$write %digit");
    let mut sess = Session::new(&text);
    let mut scanner = RegexScanner::new();

    let token = scanner.next(&mut sess);
    let RegexTokenKind::Action(name) = token.kind else {
        panic!("expected an action reference, got {:?}", token.kind);
    };
    assert_eq!(sess.ids.resolve(name), "write");

    let token = scanner.next(&mut sess);
    let RegexTokenKind::RegexpName(name) = token.kind else {
        panic!("expected a regexp reference, got {:?}", token.kind);
    };
    assert_eq!(sess.ids.resolve(name), "digit");
}

#[test]
fn test_action_name_must_start_with_letter() {
    let (kinds, messages) = regex_tokens("$9");
    assert!(matches!(kinds[0], RegexTokenKind::Action(_)));
    assert_eq!(kinds[1], RegexTokenKind::Char('9'));
    assert_eq!(
        messages,
        vec!["Line 1: a Latin letter or an underscore is expected.".to_owned()]
    );
}

#[test]
fn test_named_class_becomes_interned_set() {
    let text = SourceText::from_text("[:digits:][:digits:][:xdigits:]");
    let mut sess = Session::new(&text);
    let mut scanner = RegexScanner::new();

    let RegexTokenKind::Class(first) = scanner.next(&mut sess).kind else {
        panic!("expected a class token");
    };
    let RegexTokenKind::Class(second) = scanner.next(&mut sess).kind else {
        panic!("expected a class token");
    };
    let RegexTokenKind::Class(third) = scanner.next(&mut sess).kind else {
        panic!("expected a class token");
    };
    // Equal classes share one set; distinct classes do not.
    assert_eq!(first, second);
    assert_ne!(first, third);
    assert_eq!(sess.sets.len(), 2);

    let digits = sess.sets.resolve(first);
    assert!(digits.contains('7'));
    assert!(!digits.contains('a'));
    let xdigits = sess.sets.resolve(third);
    assert!(xdigits.contains('a'));
    assert!(xdigits.contains('F'));
    assert!(!xdigits.contains('g'));
}

#[test]
fn test_incomplete_class_name_demotes() {
    let (kinds, messages) = regex_tokens("[:xdigit");
    assert!(matches!(kinds[0], RegexTokenKind::Class(_)));
    assert_eq!(messages, vec!["Line 1: expects [:xdigits:].".to_owned()]);
}

#[test]
fn test_bad_class_start_falls_back_to_bracket_char() {
    let (kinds, messages) = regex_tokens("[:q");
    assert_eq!(kinds[0], RegexTokenKind::Char('['));
    assert_eq!(kinds[1], RegexTokenKind::Char('q'));
    assert_eq!(
        messages,
        vec![
            "Line 1: one of the following characters is expected: \
             L, R, b, d, l, n, o, r, x."
                .to_owned()
        ]
    );

    let (kinds, _) = regex_tokens("[x");
    assert_eq!(kinds[0], RegexTokenKind::Char('['));
    assert_eq!(kinds[1], RegexTokenKind::Char('x'));
}

#[test]
fn test_class_complement_folds_members() {
    let text = SourceText::from_text("[^ab[:digits:]^]");
    let mut sess = Session::new(&text);
    let mut scanner = RegexScanner::new();

    let RegexTokenKind::ClassComplement(set) = scanner.next(&mut sess).kind else {
        panic!("expected a complement token");
    };
    let set = sess.sets.resolve(set);
    assert!(set.is_negated());
    assert!(!set.contains('a'));
    assert!(!set.contains('b'));
    assert!(!set.contains('5'));
    assert!(set.contains('z'));
    assert_eq!(sess.diags.error_count(), 0);
}

#[test]
fn test_equal_complements_share_one_set() {
    let text = SourceText::from_text("[^ab^][^ba^]");
    let mut sess = Session::new(&text);
    let mut scanner = RegexScanner::new();

    let RegexTokenKind::ClassComplement(first) = scanner.next(&mut sess).kind else {
        panic!("expected a complement token");
    };
    let RegexTokenKind::ClassComplement(second) = scanner.next(&mut sess).kind else {
        panic!("expected a complement token");
    };
    assert_eq!(first, second);
    assert_eq!(sess.sets.len(), 1);
}

#[test]
fn test_unterminated_complement_still_emits_token() {
    let text = SourceText::from_text("[^ab");
    let mut sess = Session::new(&text);
    let mut scanner = RegexScanner::new();

    let token = scanner.next(&mut sess);
    assert!(matches!(token.kind, RegexTokenKind::ClassComplement(_)));
    assert_eq!(
        sess.diags.messages(),
        ["Line 1: unexpected end of a character-class complement."]
    );
}

#[test]
fn test_stray_complement_close_is_two_chars() {
    let (kinds, messages) = regex_tokens("^]");
    assert_eq!(kinds[0], RegexTokenKind::Char('^'));
    assert_eq!(kinds[1], RegexTokenKind::Char(']'));
    assert!(messages.is_empty());

    // A `^` not followed by `]` is an ordinary character.
    let (kinds, _) = regex_tokens("^a");
    assert_eq!(kinds[0], RegexTokenKind::Char('^'));
    assert_eq!(kinds[1], RegexTokenKind::Char('a'));
}
