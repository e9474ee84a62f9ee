//! # String and character-set interning
//!
//! Identifiers and string literals are interned into stable integer-indexed
//! symbols so the rest of the front end can compare names in O(1) and store
//! them in tokens, AST leaves, and the symbol table by value.
//!
//! ## Overview
//!
//! - [`Interner`] wraps a [`lasso::Rodeo`]; one instance holds identifiers
//!   (rule names, action names, regex names), a second one holds string
//!   literals. Interning the same text twice yields the same [`Symbol`].
//! - [`ClassSetInterner`] plays the same role for character sets: every
//!   distinct [`CharSet`] (a named class, or the folded member set of a
//!   class complement) gets one stable [`SetIdx`].
//!
//! Display indices of symbols are 1-based; index 0 is reserved to mean
//! "absent" in AST dumps (a leaf with no attached action renders as
//! `action_idx_ : 0`).

use hashbrown::HashMap;
use lasso::{Key, Rodeo, Spur};
use smallvec::SmallVec;
use std::fmt;

/// An interned identifier or string literal.
///
/// A lightweight handle: cheap to copy, O(1) to compare. Resolve it back to
/// text with [`Interner::resolve`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Spur);

impl Symbol {
    /// The 1-based display index of this symbol (0 means "absent").
    #[must_use]
    pub fn as_usize(self) -> usize {
        self.0.into_usize() + 1
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.as_usize())
    }
}

/// A string interner for one table (identifiers or string literals).
#[derive(Debug, Default)]
pub struct Interner {
    rodeo: Rodeo,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its symbol. Re-interning returns the
    /// existing symbol without growing the table.
    pub fn intern(&mut self, text: &str) -> Symbol {
        Symbol(self.rodeo.get_or_intern(text))
    }

    /// Look up a string without interning it.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<Symbol> {
        self.rodeo.get(text).map(Symbol)
    }

    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.rodeo.resolve(&sym.0)
    }

    /// Number of distinct strings interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

/// A set of characters: sorted, coalesced, closed ranges, optionally
/// negated (the set of every character *not* in the ranges).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CharSet {
    ranges: SmallVec<[(char, char); 4]>,
    negated: bool,
}

impl CharSet {
    #[must_use]
    pub fn from_ranges(ranges: &[(char, char)]) -> Self {
        let mut set = Self {
            ranges: SmallVec::from_slice(ranges),
            negated: false,
        };
        set.normalize();
        set
    }

    /// The complement of the given ranges.
    #[must_use]
    pub fn negated_of(ranges: &[(char, char)]) -> Self {
        let mut set = Self::from_ranges(ranges);
        set.negated = true;
        set
    }

    /// Turn this set into its complement.
    #[must_use]
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn add_char(&mut self, c: char) {
        self.ranges.push((c, c));
        self.normalize();
    }

    /// Merge another set's ranges into this one. Negation flags of the
    /// merged-in set are ignored: complement members are positive sets.
    pub fn union_with(&mut self, other: &CharSet) {
        self.ranges.extend_from_slice(&other.ranges);
        self.normalize();
    }

    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        let inside = self
            .ranges
            .binary_search_by(|&(lo, hi)| {
                if c < lo {
                    std::cmp::Ordering::Greater
                } else if c > hi {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok();
        inside != self.negated
    }

    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    #[must_use]
    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    fn normalize(&mut self) {
        self.ranges.sort_unstable();
        let mut merged: SmallVec<[(char, char); 4]> = SmallVec::new();
        for &(lo, hi) in self.ranges.iter() {
            match merged.last_mut() {
                Some(&mut (_, ref mut last_hi))
                    if (lo as u32) <= (*last_hi as u32).saturating_add(1) =>
                {
                    if hi > *last_hi {
                        *last_hi = hi;
                    }
                }
                _ => merged.push((lo, hi)),
            }
        }
        self.ranges = merged;
    }
}

/// Index of an interned character set. Displayed 0-based in AST dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetIdx(u32);

impl SetIdx {
    #[must_use]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Interner for character-class sets, the sibling of [`Interner`].
#[derive(Debug, Default)]
pub struct ClassSetInterner {
    sets: Vec<CharSet>,
    map: HashMap<CharSet, SetIdx>,
}

impl ClassSetInterner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a set, returning its index. Equal sets share one index.
    pub fn intern(&mut self, set: CharSet) -> SetIdx {
        if let Some(&idx) = self.map.get(&set) {
            return idx;
        }
        let idx = SetIdx(self.sets.len() as u32);
        self.sets.push(set.clone());
        self.map.insert(set, idx);
        idx
    }

    #[must_use]
    pub fn resolve(&self, idx: SetIdx) -> &CharSet {
        &self.sets[idx.as_usize()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_indices_are_one_based() {
        let mut ids = Interner::new();
        let a = ids.intern("alpha");
        let b = ids.intern("beta");
        assert_eq!(a.as_usize(), 1);
        assert_eq!(b.as_usize(), 2);
        assert_eq!(ids.intern("alpha"), a);
        assert_eq!(ids.len(), 2);
        assert_eq!(ids.resolve(b), "beta");
    }

    #[test]
    fn test_charset_normalization_and_lookup() {
        let set = CharSet::from_ranges(&[('c', 'e'), ('a', 'b'), ('d', 'f')]);
        assert_eq!(set.ranges(), &[('a', 'f')]);
        assert!(set.contains('d'));
        assert!(!set.contains('g'));
        let neg = set.negate();
        assert!(neg.contains('g'));
        assert!(!neg.contains('d'));
    }

    #[test]
    fn test_set_interner_deduplicates() {
        let mut sets = ClassSetInterner::new();
        let first = sets.intern(CharSet::from_ranges(&[('0', '9')]));
        let second = sets.intern(CharSet::from_ranges(&[('0', '4'), ('5', '9')]));
        assert_eq!(first, second);
        assert_eq!(sets.len(), 1);
        let other = sets.intern(CharSet::from_ranges(&[('a', 'f')]));
        assert_ne!(first, other);
    }
}
