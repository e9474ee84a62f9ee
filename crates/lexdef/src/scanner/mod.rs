//! # Lexical scanners
//!
//! Two cooperating hand-written scanners share one design: a character is
//! read from the shared cursor, classified into a category bitset
//! ([`classify`]), and dispatched to the handler of the current automaton
//! and state; the handler either keeps accumulating or declares the token
//! complete ([`Step`]). Multi-character fixed tokens (keywords, delimiters,
//! character-class names) run on jump tables ([`engine`]).
//!
//! - [`rule`] tokenizes the outer rule-definition language (keywords,
//!   identifiers, strings, `, : { }` and `->`).
//! - [`regex`] tokenizes the embedded regex mini-language and enriches
//!   character classes and complements into interned set indices.
//!
//! Each scanner supports exactly one token of pushback: `back()` stores the
//! produced token and rewinds the cursor to the token start, and the next
//! `next()` replays the stored token — without re-scanning or re-interning —
//! while restoring the cursor to the token end. Rewinding the cursor on
//! pushback is what lets the *other* scanner take over mid-stream and see
//! the same characters again.

pub mod classify;
pub mod engine;
pub mod regex;
pub mod rule;

/// What a state handler decided about the character it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The token continues; feed the next character.
    Continue,
    /// The token ended *before* this character; give it back to the cursor.
    StopUnread,
    /// The token ended *with* this character consumed.
    StopConsumed,
}
