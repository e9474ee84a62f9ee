//! Source text loading and the cursor the scanners share.
//!
//! The whole input is normalized into one in-memory buffer up front; the
//! cursor tracks the current position and the 1-based line number. Both
//! scanners read through the same cursor, so a scanner that stops one
//! character past the end of its token gives that character back with
//! [`Cursor::retreat`], and a scanner handing control to the other one
//! rewinds to a saved [`Pos`].

use std::fs;
use std::io;
use std::path::Path;

/// A normalized source buffer. Line endings are reduced to `\n`.
#[derive(Debug, Clone)]
pub struct SourceText {
    chars: Vec<char>,
}

impl SourceText {
    /// Read and normalize a file.
    pub fn load(path: &Path) -> io::Result<Self> {
        Ok(Self::from_text(&fs::read_to_string(path)?))
    }

    /// Normalize an in-memory string.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            chars: text.replace("\r\n", "\n").chars().collect(),
        }
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor {
            text: &self.chars,
            offset: 0,
            line: 1,
        }
    }
}

/// A saved cursor position, used for one-token pushback and for handing the
/// character stream from one scanner to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: usize,
}

/// Read position in a [`SourceText`] with 1-based line tracking.
///
/// Line numbers are advanced explicitly by the scanners (via
/// [`Cursor::note_newline`]) because only they know which newlines belong to
/// skipped whitespace or to a multi-line string body.
#[derive(Debug, Clone)]
pub struct Cursor<'s> {
    text: &'s [char],
    offset: usize,
    line: usize,
}

impl<'s> Cursor<'s> {
    /// Consume and return the next character, or `None` at end of input.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.text.get(self.offset).copied()?;
        self.offset += 1;
        Some(c)
    }

    /// Give back the most recently consumed character.
    pub fn retreat(&mut self) {
        debug_assert!(self.offset > 0, "retreat past the start of the text");
        self.offset = self.offset.saturating_sub(1);
    }

    /// Count `c` if it is a newline.
    pub fn note_newline(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
        }
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn pos(&self) -> Pos {
        Pos {
            offset: self.offset,
            line: self.line,
        }
    }

    pub fn set_pos(&mut self, pos: Pos) {
        self.offset = pos.offset;
        self.line = pos.line;
    }

    #[must_use]
    pub fn at_end(&self) -> bool {
        self.offset >= self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_bump_retreat() {
        let text = SourceText::from_text("ab");
        let mut cur = text.cursor();
        assert_eq!(cur.bump(), Some('a'));
        cur.retreat();
        assert_eq!(cur.bump(), Some('a'));
        assert_eq!(cur.bump(), Some('b'));
        assert_eq!(cur.bump(), None);
        assert!(cur.at_end());
    }

    #[test]
    fn test_crlf_normalization() {
        let text = SourceText::from_text("a\r\nb");
        let mut cur = text.cursor();
        cur.bump();
        let c = cur.bump().unwrap();
        assert_eq!(c, '\n');
        cur.note_newline(c);
        assert_eq!(cur.line(), 2);
    }

    #[test]
    fn test_pos_roundtrip() {
        let text = SourceText::from_text("a\nb");
        let mut cur = text.cursor();
        let saved = cur.pos();
        cur.bump();
        let c = cur.bump().unwrap();
        cur.note_newline(c);
        assert_eq!(cur.line(), 2);
        cur.set_pos(saved);
        assert_eq!(cur.line(), 1);
        assert_eq!(cur.bump(), Some('a'));
    }
}
