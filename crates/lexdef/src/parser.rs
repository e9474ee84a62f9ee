//! Recursive-descent parser for a braced regex body.
//!
//! The grammar, with `a` an action reference, `b` the operator `|`, `c` a
//! postfix operator, `d` a leaf token, and `p q l r` the brackets `{ } ( )`:
//!
//! ```text
//! S -> pTq
//! T -> E(bE)*
//! E -> F+
//! F -> Gc?
//! G -> Ha?
//! H -> d | lTr
//! ```
//!
//! Error recovery is by null propagation, with one deliberate asymmetry: a
//! failed *alternative* poisons the whole alternation, but a failed
//! *subsequent* concatenation factor merely ends the concatenation, keeping
//! the factors collected so far. A missing `)` discards the group; a missing
//! `}` keeps the partial body. Either way every problem is diagnosed once
//! and the offending token is left for the caller where recovery needs it.

use crate::ast::{Ast, Leaf, LeafKind, Node};
use crate::error::Diag;
use crate::scanner::regex::{RegexScanner, RegexToken, RegexTokenKind};
use crate::scope::Scope;
use crate::session::Session;

/// Parser over a fresh [`RegexScanner`]; one instance parses one body.
pub struct Parser<'p> {
    scanner: RegexScanner,
    scope: &'p Scope,
}

impl<'p> Parser<'p> {
    /// Parse one `{ … }` body starting at the cursor's current position.
    #[must_use]
    pub fn parse(sess: &mut Session, scope: &'p Scope) -> Ast {
        let mut parser = Self {
            scanner: RegexScanner::new(),
            scope,
        };
        Ast::new(parser.braced_body(sess))
    }

    fn next(&mut self, sess: &mut Session) -> RegexToken {
        self.scanner.next(sess)
    }

    fn back(&mut self, sess: &mut Session) {
        self.scanner.back(&mut sess.cursor);
    }

    /// S -> pTq
    fn braced_body(&mut self, sess: &mut Session) -> Option<Node> {
        let token = self.next(sess);
        if token.kind != RegexTokenKind::OpenBrace {
            sess.diags.report(token.line, Diag::ExpectedOpeningBrace);
            self.back(sess);
            return None;
        }
        // A failed body returns here without looking for the `}`.
        let body = self.alternation(sess)?;
        let token = self.next(sess);
        if token.kind != RegexTokenKind::CloseBrace {
            self.back(sess);
            sess.diags.report(token.line, Diag::ExpectedClosingBrace);
        }
        Some(body)
    }

    /// T -> E(bE)*
    fn alternation(&mut self, sess: &mut Session) -> Option<Node> {
        let mut children = Vec::new();
        loop {
            // Any failed alternative fails the whole alternation.
            children.push(self.concatenation(sess)?);
            let token = self.next(sess);
            if token.kind != RegexTokenKind::Or {
                self.back(sess);
                return Node::or(children);
            }
        }
    }

    /// E -> F+
    fn concatenation(&mut self, sess: &mut Session) -> Option<Node> {
        let mut children = vec![self.factor(sess)?];
        loop {
            let token = self.next(sess);
            self.back(sess);
            if !starts_factor(token.kind) {
                return Node::concat(children);
            }
            match self.factor(sess) {
                Some(node) => children.push(node),
                // A failed subsequent factor ends the concatenation but
                // keeps what was already collected.
                None => return Node::concat(children),
            }
        }
    }

    /// F -> Gc?
    fn factor(&mut self, sess: &mut Session) -> Option<Node> {
        let node = self.annotated_atom(sess)?;
        let token = self.next(sess);
        match token.kind {
            RegexTokenKind::Kleene => Some(Node::Kleene(Box::new(node))),
            RegexTokenKind::Positive => Some(Node::Positive(Box::new(node))),
            RegexTokenKind::Optional => Some(Node::Optional(Box::new(node))),
            _ => {
                self.back(sess);
                Some(node)
            }
        }
    }

    /// G -> Ha?
    fn annotated_atom(&mut self, sess: &mut Session) -> Option<Node> {
        let mut node = self.atom(sess)?;
        let token = self.next(sess);
        let RegexTokenKind::Action(name) = token.kind else {
            self.back(sess);
            return Some(node);
        };
        match self.scope.id_attributes(name) {
            None => {
                let text = sess.ids.resolve(name).to_owned();
                sess.diags.report(token.line, Diag::UndefinedAction(text));
                None
            }
            Some(_) if !self.scope.is_action(name) => {
                let text = sess.ids.resolve(name).to_owned();
                sess.diags.report(token.line, Diag::NotAnActionName(text));
                None
            }
            Some(_) => {
                node.apply_action(name);
                Some(node)
            }
        }
    }

    /// H -> d | lTr
    fn atom(&mut self, sess: &mut Session) -> Option<Node> {
        let token = self.next(sess);
        let leaf = match token.kind {
            RegexTokenKind::Char(c) => LeafKind::Char(c),
            RegexTokenKind::Class(set) => LeafKind::Class(set),
            RegexTokenKind::ClassComplement(set) => LeafKind::ClassComplement(set),
            RegexTokenKind::RegexpName(name) => LeafKind::RegexpName(name),
            RegexTokenKind::OpenParen => return self.group_tail(sess),
            RegexTokenKind::EndOfText => {
                self.back(sess);
                sess.diags.report(token.line, Diag::UnexpectedEndOfRegexp);
                return None;
            }
            RegexTokenKind::Action(_) => {
                sess.diags.report(token.line, Diag::UnexpectedAction);
                return None;
            }
            RegexTokenKind::Or => {
                sess.diags.report(token.line, Diag::UnexpectedOr);
                return None;
            }
            RegexTokenKind::Kleene | RegexTokenKind::Positive | RegexTokenKind::Optional => {
                sess.diags
                    .report(token.line, Diag::UnexpectedPostfixOperator);
                return None;
            }
            RegexTokenKind::OpenBrace => {
                sess.diags.report(token.line, Diag::UnexpectedRegexpBegin);
                return None;
            }
            RegexTokenKind::CloseBrace => {
                sess.diags.report(token.line, Diag::UnexpectedCloseBrace);
                return None;
            }
            RegexTokenKind::CloseParen => {
                sess.diags.report(token.line, Diag::UnexpectedClosingParen);
                return None;
            }
        };
        Some(Node::Leaf(Leaf::new(leaf)))
    }

    /// The `Tr` after a consumed `(`. A missing `)` discards the group.
    fn group_tail(&mut self, sess: &mut Session) -> Option<Node> {
        let node = self.alternation(sess)?;
        let token = self.next(sess);
        if token.kind != RegexTokenKind::CloseParen {
            self.back(sess);
            sess.diags.report(token.line, Diag::ExpectedClosingParen);
            return None;
        }
        Some(node)
    }
}

fn starts_factor(kind: RegexTokenKind) -> bool {
    matches!(
        kind,
        RegexTokenKind::Char(_)
            | RegexTokenKind::Class(_)
            | RegexTokenKind::ClassComplement(_)
            | RegexTokenKind::RegexpName(_)
            | RegexTokenKind::OpenParen
    )
}
