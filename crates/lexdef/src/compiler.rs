//! The rule compiler: `name -> { body }`.
//!
//! A four-state automaton over the outer-language tokens. On an unexpected
//! token the automaton diagnoses what it wanted, then *resynchronizes* if
//! the token is meaningful for a later state (an identifier restarts the
//! name, an arrow jumps to the arrow state, a `{` jumps straight to the
//! body); any other token aborts the rule. Reaching the body hands the
//! character stream to the regex parser.

use crate::ast::Ast;
use crate::error::Diag;
use crate::intern::Symbol;
use crate::parser::Parser;
use crate::scanner::rule::{RuleScanner, RuleTokenKind};
use crate::scope::{RuleNameCheck, Scope};
use crate::session::Session;

/// One compiled rule. `name` is absent when no rule name was ever seen;
/// `body.root` is absent when the regex failed to parse.
#[derive(Debug, Default)]
pub struct Rule {
    pub name: Option<Symbol>,
    pub body: Ast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    RuleName,
    Arrow,
    Body,
}

/// Compiles rules one at a time against a shared [`Scope`].
#[derive(Default)]
pub struct RuleCompiler {
    scanner: RuleScanner,
    pub scope: Scope,
}

impl RuleCompiler {
    #[must_use]
    pub fn new(scope: Scope) -> Self {
        Self {
            scanner: RuleScanner::new(),
            scope,
        }
    }

    /// Compile the next rule from the cursor's current position.
    pub fn compile(&mut self, sess: &mut Session) -> Rule {
        let mut rule = Rule::default();
        let mut state = State::Start;
        loop {
            let token = self.scanner.next(sess);
            if token.kind == RuleTokenKind::EndOfText {
                break;
            }
            let next = match state {
                State::Start => self.start_state(sess, &mut rule, token.kind, token.line),
                State::RuleName => self.rule_name_state(sess, &mut rule, token.kind, token.line),
                State::Arrow => self.arrow_state(sess, &mut rule, token.kind, token.line),
                State::Body => break,
            };
            match next {
                Some(State::Body) => {
                    state = State::Body;
                    // Hand the `{` and everything after it back to the
                    // character stream; the regex parser re-reads it with
                    // its own scanner.
                    self.scanner.rewind_last(&mut sess.cursor);
                    rule.body = Parser::parse(sess, &self.scope);
                    break;
                }
                Some(s) => state = s,
                None => break,
            }
        }
        if state != State::Body {
            sess.diags
                .report(sess.cursor.line(), Diag::UnexpectedEndOfText);
        }
        rule
    }

    fn start_state(
        &mut self,
        sess: &mut Session,
        rule: &mut Rule,
        kind: RuleTokenKind,
        line: usize,
    ) -> Option<State> {
        if let RuleTokenKind::Ident(name) = kind {
            self.take_rule_name(sess, rule, name, line);
            return Some(State::RuleName);
        }
        sess.diags.report(line, Diag::ExpectedRuleName);
        match kind {
            RuleTokenKind::Arrow => Some(State::Arrow),
            RuleTokenKind::OpenBrace => Some(State::Body),
            _ => None,
        }
    }

    fn rule_name_state(
        &mut self,
        sess: &mut Session,
        rule: &mut Rule,
        kind: RuleTokenKind,
        line: usize,
    ) -> Option<State> {
        if kind == RuleTokenKind::Arrow {
            return Some(State::Arrow);
        }
        sess.diags.report(line, Diag::ExpectedArrow);
        match kind {
            RuleTokenKind::Ident(name) => {
                self.take_rule_name(sess, rule, name, line);
                Some(State::RuleName)
            }
            RuleTokenKind::OpenBrace => Some(State::Body),
            _ => None,
        }
    }

    fn arrow_state(
        &mut self,
        sess: &mut Session,
        rule: &mut Rule,
        kind: RuleTokenKind,
        line: usize,
    ) -> Option<State> {
        if kind == RuleTokenKind::OpenBrace {
            return Some(State::Body);
        }
        sess.diags.report(line, Diag::ExpectedOpeningBrace);
        match kind {
            RuleTokenKind::Ident(name) => {
                self.take_rule_name(sess, rule, name, line);
                Some(State::RuleName)
            }
            RuleTokenKind::Arrow => Some(State::Arrow),
            _ => None,
        }
    }

    fn take_rule_name(&mut self, sess: &mut Session, rule: &mut Rule, name: Symbol, line: usize) {
        rule.name = Some(name);
        if self.scope.check_rule_name(name) == RuleNameCheck::AlreadyDefined {
            let text = sess.ids.resolve(name).to_owned();
            sess.diags.report(line, Diag::RuleNameAlreadyDefined(text));
        }
    }
}
