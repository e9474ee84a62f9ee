//! Scanner for the embedded regex mini-language.
//!
//! The raw layer tokenizes operators and brackets (`( ) | * + ? { }`),
//! `$name` action references, `%name` regex references, `\`-escaped
//! characters, named classes `[:Class:]`, and the complement brackets
//! `[^` … `^]`; any other character is itself a one-character token.
//!
//! The enrichment layer sits on top: it interns the character set of a
//! named class, and it folds the whole `[^` … `^]` bracket into a single
//! complement token by collecting the member characters and classes into
//! one set, negating it, and interning the result. The parser above only
//! ever sees enriched tokens.

use super::classify::CategoryTable;
use super::engine::{JumpTable, Match, StateId};
use crate::error::Diag;
use crate::intern::{CharSet, SetIdx, Symbol};
use crate::session::Session;
use crate::source::{Cursor, Pos};

bitflags::bitflags! {
    /// Character categories of the regex mini-language.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RegexCat: u16 {
        const SPACES = 1 << 0;
        const OTHER = 1 << 1;
        const DOLLAR = 1 << 2;
        const PERCENT = 1 << 3;
        const NAME_BEGIN = 1 << 4;
        const NAME_BODY = 1 << 5;
        const DELIMITER = 1 << 6;
        const OPEN_SQUARE = 1 << 7;
        const BACKSLASH = 1 << 8;
        const HAT = 1 << 9;
    }
}

/// The named character classes of the regex mini-language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// `[:Latin:]` — `A`–`Z`.
    Latin,
    /// `[:Letter:]` — upper-case Latin and Cyrillic.
    Letter,
    /// `[:Russian:]` — `А`–`Я` and `Ё`.
    Russian,
    /// `[:bdigits:]` — `0`–`1`.
    BinDigits,
    /// `[:digits:]` — `0`–`9`.
    Digits,
    /// `[:latin:]` — `a`–`z`.
    LowerLatin,
    /// `[:letter:]` — lower-case Latin and Cyrillic.
    LowerLetter,
    /// `[:odigits:]` — `0`–`7`.
    OctDigits,
    /// `[:russian:]` — `а`–`я` and `ё`.
    LowerRussian,
    /// `[:xdigits:]` — `0`–`9`, `A`–`F`, `a`–`f`.
    HexDigits,
    /// `[:ndq:]` — anything but `"`.
    NonDoubleQuote,
    /// `[:nsq:]` — anything but `'`.
    NonSingleQuote,
}

impl CharClass {
    /// The concrete character set of this class.
    #[must_use]
    pub fn set(self) -> CharSet {
        match self {
            Self::Latin => CharSet::from_ranges(&[('A', 'Z')]),
            Self::Letter => CharSet::from_ranges(&[('A', 'Z'), ('Ё', 'Ё'), ('А', 'Я')]),
            Self::Russian => CharSet::from_ranges(&[('Ё', 'Ё'), ('А', 'Я')]),
            Self::BinDigits => CharSet::from_ranges(&[('0', '1')]),
            Self::Digits => CharSet::from_ranges(&[('0', '9')]),
            Self::LowerLatin => CharSet::from_ranges(&[('a', 'z')]),
            Self::LowerLetter => CharSet::from_ranges(&[('a', 'z'), ('а', 'я'), ('ё', 'ё')]),
            Self::OctDigits => CharSet::from_ranges(&[('0', '7')]),
            Self::LowerRussian => CharSet::from_ranges(&[('а', 'я'), ('ё', 'ё')]),
            Self::HexDigits => CharSet::from_ranges(&[('0', '9'), ('A', 'F'), ('a', 'f')]),
            Self::NonDoubleQuote => CharSet::negated_of(&[('"', '"')]),
            Self::NonSingleQuote => CharSet::negated_of(&[('\'', '\'')]),
        }
    }
}

/// A raw token, before class enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawKind {
    EndOfText,
    Char(char),
    ClassName(CharClass),
    /// `[^` — opens a complement bracket.
    BeginComplement,
    /// `^]` — closes a complement bracket.
    EndComplement,
    Action(Symbol),
    RegexpName(Symbol),
    Or,
    Kleene,
    Positive,
    Optional,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
}

#[derive(Debug, Clone, Copy)]
struct RawToken {
    kind: RawKind,
    line: usize,
}

/// One enriched token of the regex mini-language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegexTokenKind {
    EndOfText,
    Char(char),
    /// A named class, as an interned set.
    Class(SetIdx),
    /// A `[^` … `^]` complement, folded to one interned set.
    ClassComplement(SetIdx),
    /// `$name`.
    Action(Symbol),
    /// `%name`.
    RegexpName(Symbol),
    Or,
    Kleene,
    Positive,
    Optional,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegexToken {
    pub kind: RegexTokenKind,
    /// 1-based line the token begins on.
    pub line: usize,
}

#[derive(Debug, Clone, Copy)]
enum NameState {
    /// Right after the `$` or `%`.
    Begin,
    Body,
}

#[derive(Debug, Clone, Copy)]
enum ClassState {
    /// Just saw `[`.
    Bracket,
    /// Saw `[:`; next character must begin a class name.
    Colon,
    /// Inside a class-name jump table.
    Table(StateId),
}

#[derive(Debug, Clone, Copy)]
enum Automaton {
    Start,
    ActionName(NameState),
    RegexpName(NameState),
    CharClass(ClassState),
    /// Just saw `\`.
    Escape,
    /// Just saw `^`.
    Hat,
}

enum RawStep {
    Continue,
    /// Token complete, current character consumed.
    Emit(RawKind),
    /// Token complete, current character given back.
    EmitUnread(RawKind),
}

/// The regex scanner with one token of pushback.
pub struct RegexScanner {
    categories: CategoryTable<RegexCat>,
    classes: JumpTable<CharClass>,
    automaton: Automaton,
    buffer: String,
    token_line: usize,
    last: RegexToken,
    last_begin: Pos,
    last_end: Pos,
    pushback: Option<RegexToken>,
    /// A raw token queued behind the current one; a stray `^]` outside a
    /// complement splits into `^` now and `]` here.
    pending: Option<RawToken>,
}

/// Class-name entries, matched after the `[:` has been consumed.
const CLASSES: &[(&str, &str, CharClass)] = &[
    ("Latin:]", "[:Latin:]", CharClass::Latin),
    ("Letter:]", "[:Letter:]", CharClass::Letter),
    ("Russian:]", "[:Russian:]", CharClass::Russian),
    ("bdigits:]", "[:bdigits:]", CharClass::BinDigits),
    ("digits:]", "[:digits:]", CharClass::Digits),
    ("latin:]", "[:latin:]", CharClass::LowerLatin),
    ("letter:]", "[:letter:]", CharClass::LowerLetter),
    ("ndq:]", "[:ndq:]", CharClass::NonDoubleQuote),
    ("nsq:]", "[:nsq:]", CharClass::NonSingleQuote),
    ("odigits:]", "[:odigits:]", CharClass::OctDigits),
    ("russian:]", "[:russian:]", CharClass::LowerRussian),
    ("xdigits:]", "[:xdigits:]", CharClass::HexDigits),
];

fn category_table() -> CategoryTable<RegexCat> {
    let name = RegexCat::NAME_BEGIN.union(RegexCat::NAME_BODY);
    CategoryTable::new(
        &[
            ('\u{1}', ' ', RegexCat::SPACES),
            ('$', '$', RegexCat::DOLLAR),
            ('%', '%', RegexCat::PERCENT),
            ('(', '+', RegexCat::DELIMITER),
            ('0', '9', RegexCat::NAME_BODY),
            ('?', '?', RegexCat::DELIMITER),
            ('A', 'Z', name),
            ('[', '[', RegexCat::OPEN_SQUARE),
            ('\\', '\\', RegexCat::BACKSLASH),
            ('^', '^', RegexCat::HAT),
            ('_', '_', name),
            ('a', 'z', name),
            ('{', '{', RegexCat::DELIMITER),
            ('|', '|', RegexCat::DELIMITER),
            ('}', '}', RegexCat::DELIMITER),
        ],
        RegexCat::OTHER,
    )
}

fn delimiter_kind(c: char) -> RawKind {
    match c {
        '(' => RawKind::OpenParen,
        ')' => RawKind::CloseParen,
        '*' => RawKind::Kleene,
        '+' => RawKind::Positive,
        '?' => RawKind::Optional,
        '{' => RawKind::OpenBrace,
        '|' => RawKind::Or,
        _ => RawKind::CloseBrace,
    }
}

impl Default for RegexScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl RegexScanner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            categories: category_table(),
            classes: JumpTable::build(CLASSES),
            automaton: Automaton::Start,
            buffer: String::new(),
            token_line: 1,
            last: RegexToken {
                kind: RegexTokenKind::EndOfText,
                line: 1,
            },
            last_begin: Pos { offset: 0, line: 1 },
            last_end: Pos { offset: 0, line: 1 },
            pushback: None,
            pending: None,
        }
    }

    /// Produce the next enriched token, or replay the pushed-back one.
    pub fn next(&mut self, sess: &mut Session) -> RegexToken {
        if let Some(token) = self.pushback.take() {
            sess.cursor.set_pos(self.last_end);
            return token;
        }
        self.last_begin = sess.cursor.pos();
        let raw = self.raw_next(sess);
        let line = raw.line;
        let kind = match raw.kind {
            RawKind::EndOfText => RegexTokenKind::EndOfText,
            RawKind::Char(c) => RegexTokenKind::Char(c),
            RawKind::ClassName(class) => RegexTokenKind::Class(sess.sets.intern(class.set())),
            RawKind::BeginComplement => self.fold_complement(sess),
            RawKind::EndComplement => {
                // A `^]` outside a complement is two literal characters.
                self.pending = Some(RawToken {
                    kind: RawKind::Char(']'),
                    line,
                });
                RegexTokenKind::Char('^')
            }
            RawKind::Action(name) => RegexTokenKind::Action(name),
            RawKind::RegexpName(name) => RegexTokenKind::RegexpName(name),
            RawKind::Or => RegexTokenKind::Or,
            RawKind::Kleene => RegexTokenKind::Kleene,
            RawKind::Positive => RegexTokenKind::Positive,
            RawKind::Optional => RegexTokenKind::Optional,
            RawKind::OpenParen => RegexTokenKind::OpenParen,
            RawKind::CloseParen => RegexTokenKind::CloseParen,
            RawKind::OpenBrace => RegexTokenKind::OpenBrace,
            RawKind::CloseBrace => RegexTokenKind::CloseBrace,
        };
        let token = RegexToken { kind, line };
        self.last = token;
        self.last_end = sess.cursor.pos();
        token
    }

    /// Push the last produced token back; see `RuleScanner::back`.
    pub fn back(&mut self, cursor: &mut Cursor) {
        debug_assert!(self.pushback.is_none(), "only one token of pushback");
        self.pushback = Some(self.last);
        cursor.set_pos(self.last_begin);
    }

    /// Collect the members of a `[^` … `^]` bracket into one negated,
    /// interned set.
    fn fold_complement(&mut self, sess: &mut Session) -> RegexTokenKind {
        let mut set = CharSet::default();
        loop {
            let raw = self.raw_next(sess);
            match raw.kind {
                RawKind::Char(c) => set.add_char(c),
                RawKind::ClassName(class) => set.union_with(&class.set()),
                RawKind::EndComplement => break,
                RawKind::EndOfText => {
                    sess.diags
                        .report(raw.line, Diag::UnterminatedClassComplement);
                    break;
                }
                _ => {
                    sess.diags.report(raw.line, Diag::Expects("^]"));
                    break;
                }
            }
        }
        RegexTokenKind::ClassComplement(sess.sets.intern(set.negate()))
    }

    fn raw_next(&mut self, sess: &mut Session) -> RawToken {
        if let Some(token) = self.pending.take() {
            return token;
        }
        self.automaton = Automaton::Start;
        self.buffer.clear();
        self.token_line = sess.cursor.line();
        let kind = loop {
            let Some(c) = sess.cursor.bump() else {
                break self.finish_at_end(sess);
            };
            match self.dispatch(c, sess) {
                RawStep::Continue => {}
                RawStep::Emit(kind) => break kind,
                RawStep::EmitUnread(kind) => {
                    sess.cursor.retreat();
                    break kind;
                }
            }
        };
        RawToken {
            kind,
            line: self.token_line,
        }
    }

    fn dispatch(&mut self, c: char, sess: &mut Session) -> RawStep {
        match self.automaton {
            Automaton::Start => self.start_step(c, sess),
            Automaton::ActionName(NameState::Begin) => {
                if self.categories.classify(c).contains(RegexCat::NAME_BEGIN) {
                    self.buffer.push(c);
                    self.automaton = Automaton::ActionName(NameState::Body);
                    RawStep::Continue
                } else {
                    sess.diags
                        .report(sess.cursor.line(), Diag::LatinLetterExpected);
                    RawStep::EmitUnread(RawKind::Action(sess.ids.intern(&self.buffer)))
                }
            }
            Automaton::ActionName(NameState::Body) => {
                if self.categories.classify(c).contains(RegexCat::NAME_BODY) {
                    self.buffer.push(c);
                    RawStep::Continue
                } else {
                    RawStep::EmitUnread(RawKind::Action(sess.ids.intern(&self.buffer)))
                }
            }
            Automaton::RegexpName(NameState::Begin) => {
                if self.categories.classify(c).contains(RegexCat::NAME_BEGIN) {
                    self.buffer.push(c);
                    self.automaton = Automaton::RegexpName(NameState::Body);
                    RawStep::Continue
                } else {
                    sess.diags
                        .report(sess.cursor.line(), Diag::LatinLetterExpected);
                    RawStep::EmitUnread(RawKind::RegexpName(sess.ids.intern(&self.buffer)))
                }
            }
            Automaton::RegexpName(NameState::Body) => {
                if self.categories.classify(c).contains(RegexCat::NAME_BODY) {
                    self.buffer.push(c);
                    RawStep::Continue
                } else {
                    RawStep::EmitUnread(RawKind::RegexpName(sess.ids.intern(&self.buffer)))
                }
            }
            Automaton::CharClass(ClassState::Bracket) => match c {
                ':' => {
                    self.automaton = Automaton::CharClass(ClassState::Colon);
                    RawStep::Continue
                }
                '^' => RawStep::Emit(RawKind::BeginComplement),
                _ => RawStep::EmitUnread(RawKind::Char('[')),
            },
            Automaton::CharClass(ClassState::Colon) => match self.classes.initial(c) {
                Some(state) => {
                    self.automaton = Automaton::CharClass(ClassState::Table(state));
                    RawStep::Continue
                }
                None => {
                    sess.diags.report(
                        sess.cursor.line(),
                        Diag::ExpectsOneOf(self.classes.initial_chars()),
                    );
                    RawStep::EmitUnread(RawKind::Char('['))
                }
            },
            Automaton::CharClass(ClassState::Table(state)) => match self.classes.step(state, c) {
                Some(next) => {
                    self.automaton = Automaton::CharClass(ClassState::Table(next));
                    RawStep::Continue
                }
                None => RawStep::EmitUnread(self.resolve_class(state, sess)),
            },
            Automaton::Escape => RawStep::Emit(RawKind::Char(if c == 'n' { '\n' } else { c })),
            Automaton::Hat => {
                if c == ']' {
                    RawStep::Emit(RawKind::EndComplement)
                } else {
                    RawStep::EmitUnread(RawKind::Char('^'))
                }
            }
        }
    }

    fn start_step(&mut self, c: char, sess: &mut Session) -> RawStep {
        let cats = self.categories.classify(c);
        if cats.contains(RegexCat::SPACES) {
            sess.cursor.note_newline(c);
            return RawStep::Continue;
        }
        self.token_line = sess.cursor.line();
        if cats.contains(RegexCat::DELIMITER) {
            RawStep::Emit(delimiter_kind(c))
        } else if cats.contains(RegexCat::DOLLAR) {
            self.automaton = Automaton::ActionName(NameState::Begin);
            RawStep::Continue
        } else if cats.contains(RegexCat::PERCENT) {
            self.automaton = Automaton::RegexpName(NameState::Begin);
            RawStep::Continue
        } else if cats.contains(RegexCat::OPEN_SQUARE) {
            self.automaton = Automaton::CharClass(ClassState::Bracket);
            RawStep::Continue
        } else if cats.contains(RegexCat::BACKSLASH) {
            self.automaton = Automaton::Escape;
            RawStep::Continue
        } else if cats.contains(RegexCat::HAT) {
            self.automaton = Automaton::Hat;
            RawStep::Continue
        } else {
            RawStep::Emit(RawKind::Char(c))
        }
    }

    /// Finalization at end of input with a token still open.
    fn finish_at_end(&mut self, sess: &mut Session) -> RawKind {
        match self.automaton {
            Automaton::Start => RawKind::EndOfText,
            Automaton::ActionName(_) => RawKind::Action(sess.ids.intern(&self.buffer)),
            Automaton::RegexpName(_) => RawKind::RegexpName(sess.ids.intern(&self.buffer)),
            Automaton::CharClass(ClassState::Bracket) => RawKind::Char('['),
            Automaton::CharClass(ClassState::Colon) => RawKind::EndOfText,
            Automaton::CharClass(ClassState::Table(state)) => self.resolve_class(state, sess),
            // A trailing backslash stands for itself.
            Automaton::Escape => RawKind::Char('\\'),
            Automaton::Hat => RawKind::Char('^'),
        }
    }

    fn resolve_class(&self, state: StateId, sess: &mut Session) -> RawKind {
        match self.classes.resolve(state) {
            Match::Complete(class) => RawKind::ClassName(class),
            Match::Incomplete { code, expected } => {
                sess.diags
                    .report(sess.cursor.line(), Diag::Expects(expected));
                RawKind::ClassName(code)
            }
        }
    }
}
