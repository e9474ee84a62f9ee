//! Scanner for the outer rule-definition language.
//!
//! Tokenizes keywords (`%action`, `%codes`, …), identifiers, double-quoted
//! string literals (with `""` as an escaped quote, spanning lines), the
//! delimiters `, : { }`, and the two-character arrow `->`. A lone `-` is
//! diagnosed and demoted to the arrow; an incompletely spelled keyword is
//! diagnosed and demoted to the keyword it was heading toward.

use super::classify::CategoryTable;
use super::engine::{JumpTable, Match, StateId};
use super::Step;
use crate::error::Diag;
use crate::intern::Symbol;
use crate::session::Session;
use crate::source::{Cursor, Pos};

bitflags::bitflags! {
    /// Character categories of the rule-definition language.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RuleCat: u8 {
        const SPACES = 1 << 0;
        const OTHER = 1 << 1;
        const PERCENT = 1 << 2;
        const ID_BEGIN = 1 << 3;
        const ID_BODY = 1 << 4;
        const DELIM_BEGIN = 1 << 5;
        const DOUBLE_QUOTE = 1 << 6;
        const DELIM_BODY = 1 << 7;
    }
}

/// The keyword set of the rule-definition language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Action,
    ClassMembers,
    Codes,
    CodesType,
    Comments,
    Delimiters,
    HeaderAdditions,
    IdentName,
    Idents,
    ImplAdditions,
    Keywords,
    LexemInfoName,
    Multilined,
    Nested,
    NewlineIsLexem,
    Numbers,
    ScanerName,
    SingleLined,
    Strings,
    TokenFields,
}

/// One token of the outer language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTokenKind {
    EndOfText,
    /// A run of characters no automaton claims.
    Unknown,
    Ident(Symbol),
    Keyword(Keyword),
    Comma,
    Colon,
    OpenBrace,
    CloseBrace,
    String(Symbol),
    Arrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleToken {
    pub kind: RuleTokenKind,
    /// 1-based line the token begins on.
    pub line: usize,
}

#[derive(Debug, Clone, Copy)]
enum StrState {
    /// Inside the literal body.
    Body,
    /// Just saw a `"`; one more doubles it, anything else ends the string.
    Closing,
}

#[derive(Debug, Clone, Copy)]
enum Automaton {
    Start,
    Unknown,
    Ident,
    /// `None` until the character after `%` selects a starting state.
    Keyword(Option<StateId>),
    Delimiter(StateId),
    Str(StrState),
}

/// The outer-language scanner with one token of pushback.
pub struct RuleScanner {
    categories: CategoryTable<RuleCat>,
    keywords: JumpTable<Keyword>,
    delimiters: JumpTable<RuleTokenKind>,
    automaton: Automaton,
    buffer: String,
    token_line: usize,
    last: RuleToken,
    last_begin: Pos,
    last_end: Pos,
    pushback: Option<RuleToken>,
}

const KEYWORDS: &[(&str, &str, Keyword)] = &[
    ("action", "%action", Keyword::Action),
    ("class_members", "%class_members", Keyword::ClassMembers),
    ("codes", "%codes", Keyword::Codes),
    ("codes_type", "%codes_type", Keyword::CodesType),
    ("comments", "%comments", Keyword::Comments),
    ("delimiters", "%delimiters", Keyword::Delimiters),
    ("header_additions", "%header_additions", Keyword::HeaderAdditions),
    ("ident_name", "%ident_name", Keyword::IdentName),
    ("idents", "%idents", Keyword::Idents),
    ("impl_additions", "%impl_additions", Keyword::ImplAdditions),
    ("keywords", "%keywords", Keyword::Keywords),
    ("lexem_info_name", "%lexem_info_name", Keyword::LexemInfoName),
    ("multilined", "%multilined", Keyword::Multilined),
    ("nested", "%nested", Keyword::Nested),
    ("newline_is_lexem", "%newline_is_lexem", Keyword::NewlineIsLexem),
    ("numbers", "%numbers", Keyword::Numbers),
    ("scaner_name", "%scaner_name", Keyword::ScanerName),
    ("single_lined", "%single_lined", Keyword::SingleLined),
    ("strings", "%strings", Keyword::Strings),
    ("token_fields", "%token_fields", Keyword::TokenFields),
];

const DELIMITERS: &[(&str, &str, RuleTokenKind)] = &[
    (",", ",", RuleTokenKind::Comma),
    ("->", "->", RuleTokenKind::Arrow),
    (":", ":", RuleTokenKind::Colon),
    ("{", "{", RuleTokenKind::OpenBrace),
    ("}", "}", RuleTokenKind::CloseBrace),
];

fn category_table() -> CategoryTable<RuleCat> {
    let id = RuleCat::ID_BEGIN.union(RuleCat::ID_BODY);
    CategoryTable::new(
        &[
            ('\u{1}', ' ', RuleCat::SPACES),
            ('"', '"', RuleCat::DOUBLE_QUOTE),
            ('%', '%', RuleCat::PERCENT),
            (',', '-', RuleCat::DELIM_BEGIN),
            ('0', '9', RuleCat::ID_BODY),
            (':', ':', RuleCat::DELIM_BEGIN),
            ('>', '>', RuleCat::DELIM_BODY),
            ('A', 'Z', id),
            ('_', '_', id),
            ('a', 'z', id),
            ('{', '{', RuleCat::DELIM_BEGIN),
            ('}', '}', RuleCat::DELIM_BEGIN),
        ],
        RuleCat::OTHER,
    )
}

impl Default for RuleScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleScanner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            categories: category_table(),
            keywords: JumpTable::build(KEYWORDS),
            delimiters: JumpTable::build(DELIMITERS),
            automaton: Automaton::Start,
            buffer: String::new(),
            token_line: 1,
            last: RuleToken {
                kind: RuleTokenKind::EndOfText,
                line: 1,
            },
            last_begin: Pos { offset: 0, line: 1 },
            last_end: Pos { offset: 0, line: 1 },
            pushback: None,
        }
    }

    /// Produce the next token, or replay the pushed-back one.
    pub fn next(&mut self, sess: &mut Session) -> RuleToken {
        if let Some(token) = self.pushback.take() {
            sess.cursor.set_pos(self.last_end);
            return token;
        }
        self.automaton = Automaton::Start;
        self.buffer.clear();
        self.last_begin = sess.cursor.pos();
        self.token_line = sess.cursor.line();
        let kind = loop {
            let Some(c) = sess.cursor.bump() else {
                break self.finish_at_end(sess);
            };
            match self.dispatch(c, sess) {
                Step::Continue => {}
                Step::StopUnread => {
                    sess.cursor.retreat();
                    break self.finish(sess);
                }
                Step::StopConsumed => break self.finish(sess),
            }
        };
        let token = RuleToken {
            kind,
            line: self.token_line,
        };
        self.last = token;
        self.last_end = sess.cursor.pos();
        token
    }

    /// Push the last produced token back: the next [`RuleScanner::next`]
    /// replays it, and the cursor is rewound so another scanner taking over
    /// would see the same characters.
    pub fn back(&mut self, cursor: &mut Cursor) {
        debug_assert!(self.pushback.is_none(), "only one token of pushback");
        self.pushback = Some(self.last);
        cursor.set_pos(self.last_begin);
    }

    /// Rewind the cursor to the start of the last token without queueing a
    /// replay; used to hand the characters to the regex scanner.
    pub fn rewind_last(&mut self, cursor: &mut Cursor) {
        self.pushback = None;
        cursor.set_pos(self.last_begin);
    }

    fn dispatch(&mut self, c: char, sess: &mut Session) -> Step {
        match self.automaton {
            Automaton::Start => self.start_step(c, sess),
            Automaton::Unknown => {
                if self.categories.classify(c).contains(RuleCat::OTHER) {
                    Step::Continue
                } else {
                    Step::StopUnread
                }
            }
            Automaton::Ident => {
                if self.categories.classify(c).contains(RuleCat::ID_BODY) {
                    self.buffer.push(c);
                    Step::Continue
                } else {
                    Step::StopUnread
                }
            }
            Automaton::Keyword(None) => match self.keywords.initial(c) {
                Some(state) => {
                    self.automaton = Automaton::Keyword(Some(state));
                    Step::Continue
                }
                None => {
                    sess.diags.report(
                        sess.cursor.line(),
                        Diag::ExpectsOneOf(self.keywords.initial_chars()),
                    );
                    Step::StopUnread
                }
            },
            Automaton::Keyword(Some(state)) => match self.keywords.step(state, c) {
                Some(next) => {
                    self.automaton = Automaton::Keyword(Some(next));
                    Step::Continue
                }
                None => Step::StopUnread,
            },
            Automaton::Delimiter(state) => match self.delimiters.step(state, c) {
                Some(next) => {
                    self.automaton = Automaton::Delimiter(next);
                    Step::Continue
                }
                None => Step::StopUnread,
            },
            Automaton::Str(StrState::Body) => {
                if c == '"' {
                    self.automaton = Automaton::Str(StrState::Closing);
                } else {
                    self.buffer.push(c);
                }
                sess.cursor.note_newline(c);
                Step::Continue
            }
            Automaton::Str(StrState::Closing) => {
                if c == '"' {
                    // An escaped quote: `""` stands for one `"`.
                    self.buffer.push('"');
                    self.automaton = Automaton::Str(StrState::Body);
                    Step::Continue
                } else {
                    Step::StopUnread
                }
            }
        }
    }

    fn start_step(&mut self, c: char, sess: &mut Session) -> Step {
        let cats = self.categories.classify(c);
        if cats.contains(RuleCat::SPACES) {
            sess.cursor.note_newline(c);
            return Step::Continue;
        }
        self.token_line = sess.cursor.line();
        if cats.contains(RuleCat::PERCENT) {
            self.automaton = Automaton::Keyword(None);
        } else if cats.contains(RuleCat::ID_BEGIN) {
            self.buffer.push(c);
            self.automaton = Automaton::Ident;
        } else if let Some(state) = cats
            .contains(RuleCat::DELIM_BEGIN)
            .then(|| self.delimiters.initial(c))
            .flatten()
        {
            self.automaton = Automaton::Delimiter(state);
        } else if cats.contains(RuleCat::DOUBLE_QUOTE) {
            self.automaton = Automaton::Str(StrState::Body);
        } else {
            self.automaton = Automaton::Unknown;
        }
        Step::Continue
    }

    /// Finalization after a normal stop: interning and code correction.
    fn finish(&mut self, sess: &mut Session) -> RuleTokenKind {
        match self.automaton {
            Automaton::Start => RuleTokenKind::EndOfText,
            Automaton::Unknown => RuleTokenKind::Unknown,
            Automaton::Ident => RuleTokenKind::Ident(sess.ids.intern(&self.buffer)),
            Automaton::Keyword(None) => RuleTokenKind::Unknown,
            Automaton::Keyword(Some(state)) => self.resolve_keyword(state, sess),
            Automaton::Delimiter(state) => self.resolve_delimiter(state, sess),
            Automaton::Str(_) => RuleTokenKind::String(sess.strs.intern(&self.buffer)),
        }
    }

    /// Finalization at end of input with the token still open.
    fn finish_at_end(&mut self, sess: &mut Session) -> RuleTokenKind {
        match self.automaton {
            Automaton::Start => RuleTokenKind::EndOfText,
            Automaton::Unknown => RuleTokenKind::Unknown,
            Automaton::Ident => RuleTokenKind::Ident(sess.ids.intern(&self.buffer)),
            Automaton::Keyword(None) => {
                sess.diags.report(
                    sess.cursor.line(),
                    Diag::ExpectsOneOf(self.keywords.initial_chars()),
                );
                RuleTokenKind::Unknown
            }
            Automaton::Keyword(Some(state)) => self.resolve_keyword(state, sess),
            Automaton::Delimiter(state) => self.resolve_delimiter(state, sess),
            Automaton::Str(state) => {
                if !matches!(state, StrState::Closing) {
                    sess.diags
                        .report(sess.cursor.line(), Diag::UnterminatedString);
                }
                RuleTokenKind::String(sess.strs.intern(&self.buffer))
            }
        }
    }

    fn resolve_keyword(&self, state: StateId, sess: &mut Session) -> RuleTokenKind {
        match self.keywords.resolve(state) {
            Match::Complete(kw) => RuleTokenKind::Keyword(kw),
            Match::Incomplete { code, expected } => {
                sess.diags
                    .report(sess.cursor.line(), Diag::Expects(expected));
                RuleTokenKind::Keyword(code)
            }
        }
    }

    fn resolve_delimiter(&self, state: StateId, sess: &mut Session) -> RuleTokenKind {
        match self.delimiters.resolve(state) {
            Match::Complete(kind) => kind,
            Match::Incomplete { code, expected } => {
                sess.diags
                    .report(sess.cursor.line(), Diag::Expects(expected));
                code
            }
        }
    }
}
