//! Jump tables for multi-character token recognition.
//!
//! Keywords, the two-character arrow, and character-class names are all
//! recognized the same way: an initial-dispatch table sorted by first
//! character selects a starting state, then each state owns a sorted set of
//! expected next characters with a destination state per character. When the
//! current character is not among the expected set the automaton stops; a
//! state that does not correspond to a complete entry then *demotes* to the
//! code of the entry whose text passes through it, and the caller emits a
//! diagnostic naming that entry's text.
//!
//! Tables are built at scanner construction from plain `(match, display,
//! code)` triples; the sorted invariants hold by construction (edges and the
//! initial table are kept ordered with binary-search insertion), so callers
//! never see an unsorted table.

use smallvec::SmallVec;

/// A state in a [`JumpTable`].
#[derive(Debug, Clone)]
struct JumpState<C> {
    /// Sorted outgoing edges: expected character → destination state.
    edges: SmallVec<[(char, u32); 4]>,
    /// The code of the entry this state completes, if any.
    complete: Option<C>,
    /// The first entry whose text passes through this state; used for the
    /// demotion code and the "expects …" diagnostic on a premature stop.
    entry: u32,
}

#[derive(Debug, Clone)]
struct Entry<C> {
    display: &'static str,
    code: C,
}

/// State id inside one jump table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateId(u32);

/// Outcome of stopping the automaton in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match<C> {
    /// The state completes an entry.
    Complete(C),
    /// The state expects more characters; recover with the named entry's
    /// code and diagnose its display text.
    Incomplete { code: C, expected: &'static str },
}

/// A table-driven recognizer for a fixed set of multi-character entries.
#[derive(Debug, Clone)]
pub struct JumpTable<C> {
    states: Vec<JumpState<C>>,
    /// Sorted first-character dispatch: character → starting state.
    init: Vec<(char, u32)>,
    entries: Vec<Entry<C>>,
}

impl<C: Copy> JumpTable<C> {
    /// Build a table from `(match_text, display_text, code)` triples.
    ///
    /// `match_text` is what the automaton consumes (e.g. `action` after the
    /// `%` has been seen, or `Latin:]` after `[:`); `display_text` is the
    /// full surface form named in diagnostics (e.g. `%action`, `[:Latin:]`).
    #[must_use]
    pub fn build(entries: &[(&'static str, &'static str, C)]) -> Self {
        let mut table = Self {
            states: Vec::new(),
            init: Vec::new(),
            entries: Vec::with_capacity(entries.len()),
        };
        for &(text, display, code) in entries {
            assert!(!text.is_empty(), "empty jump-table entry");
            let entry_id = table.entries.len() as u32;
            table.entries.push(Entry { display, code });

            let mut chars = text.chars();
            let first = match chars.next() {
                Some(c) => c,
                None => unreachable!(),
            };
            let mut state = match table.init.binary_search_by_key(&first, |e| e.0) {
                Ok(i) => table.init[i].1,
                Err(i) => {
                    let s = table.new_state(entry_id);
                    table.init.insert(i, (first, s));
                    s
                }
            };
            for c in chars {
                state = match table.states[state as usize]
                    .edges
                    .binary_search_by_key(&c, |e| e.0)
                {
                    Ok(i) => table.states[state as usize].edges[i].1,
                    Err(i) => {
                        let s = table.new_state(entry_id);
                        table.states[state as usize].edges.insert(i, (c, s));
                        s
                    }
                };
            }
            let last = &mut table.states[state as usize];
            assert!(last.complete.is_none(), "duplicate jump-table entry");
            last.complete = Some(code);
        }
        table
    }

    fn new_state(&mut self, entry: u32) -> u32 {
        let id = self.states.len() as u32;
        self.states.push(JumpState {
            edges: SmallVec::new(),
            complete: None,
            entry,
        });
        id
    }

    /// Starting state for a first character, if any entry begins with it.
    #[must_use]
    pub fn initial(&self, c: char) -> Option<StateId> {
        self.init
            .binary_search_by_key(&c, |e| e.0)
            .ok()
            .map(|i| StateId(self.init[i].1))
    }

    /// Follow the edge for `c` out of `state`, if it exists.
    #[must_use]
    pub fn step(&self, state: StateId, c: char) -> Option<StateId> {
        let edges = &self.states[state.0 as usize].edges;
        edges
            .binary_search_by_key(&c, |e| e.0)
            .ok()
            .map(|i| StateId(edges[i].1))
    }

    /// Resolve the state the automaton stopped in.
    #[must_use]
    pub fn resolve(&self, state: StateId) -> Match<C> {
        let s = &self.states[state.0 as usize];
        match s.complete {
            Some(code) => Match::Complete(code),
            None => {
                let entry = &self.entries[s.entry as usize];
                Match::Incomplete {
                    code: entry.code,
                    expected: entry.display,
                }
            }
        }
    }

    /// The characters any entry may start with, comma-separated, for
    /// "one of the following characters is expected" diagnostics.
    #[must_use]
    pub fn initial_chars(&self) -> String {
        let mut out = String::new();
        for (i, &(c, _)) in self.init.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push(c);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kw {
        Codes,
        CodesType,
        Strings,
    }

    fn table() -> JumpTable<Kw> {
        JumpTable::build(&[
            ("codes", "%codes", Kw::Codes),
            ("codes_type", "%codes_type", Kw::CodesType),
            ("strings", "%strings", Kw::Strings),
        ])
    }

    fn run(table: &JumpTable<Kw>, text: &str) -> Match<Kw> {
        let mut chars = text.chars();
        let mut state = table.initial(chars.next().unwrap()).unwrap();
        for c in chars {
            match table.step(state, c) {
                Some(next) => state = next,
                None => break,
            }
        }
        table.resolve(state)
    }

    #[test]
    fn test_complete_match() {
        let t = table();
        assert_eq!(run(&t, "codes"), Match::Complete(Kw::Codes));
        assert_eq!(run(&t, "codes_type"), Match::Complete(Kw::CodesType));
    }

    #[test]
    fn test_shorter_entry_wins_on_shared_prefix() {
        // "codes" is itself complete even though "codes_type" continues.
        let t = table();
        assert_eq!(run(&t, "codes,"), Match::Complete(Kw::Codes));
    }

    #[test]
    fn test_incomplete_demotes_with_expected_text() {
        let t = table();
        assert_eq!(
            run(&t, "strin"),
            Match::Incomplete {
                code: Kw::Strings,
                expected: "%strings"
            }
        );
        // Past the shared prefix, demotion targets the longer entry.
        assert_eq!(
            run(&t, "codes_t"),
            Match::Incomplete {
                code: Kw::CodesType,
                expected: "%codes_type"
            }
        );
    }

    #[test]
    fn test_initial_dispatch() {
        let t = table();
        assert!(t.initial('c').is_some());
        assert!(t.initial('x').is_none());
        assert_eq!(t.initial_chars(), "c, s");
    }
}
