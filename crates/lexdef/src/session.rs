//! The compilation session: every piece of state shared by the scanners,
//! the parser, and the rule compiler, threaded by `&mut` through each
//! `next token` call. Single-threaded by design — there is exactly one
//! active compilation pass and no concurrent access.

use crate::error::Diagnostics;
use crate::intern::{ClassSetInterner, Interner};
use crate::source::{Cursor, SourceText};

/// Shared compilation state: the cursor over the source buffer, the three
/// interning tables, and the diagnostics sink.
pub struct Session<'s> {
    pub cursor: Cursor<'s>,
    /// Identifier table (rule names, action names, regex names).
    pub ids: Interner,
    /// String-literal table.
    pub strs: Interner,
    /// Character-class set table.
    pub sets: ClassSetInterner,
    pub diags: Diagnostics,
}

impl<'s> Session<'s> {
    #[must_use]
    pub fn new(text: &'s SourceText) -> Self {
        Self {
            cursor: text.cursor(),
            ids: Interner::new(),
            strs: Interner::new(),
            sets: ClassSetInterner::new(),
            diags: Diagnostics::new(),
        }
    }
}
