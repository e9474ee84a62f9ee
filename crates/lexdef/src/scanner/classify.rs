//! Character classification: code point → category bitset.
//!
//! Each scanner owns a table of disjoint, sorted, closed intervals, every
//! interval mapped to a set of category flags. Lookup is a binary search
//! for the containing interval; a code point outside every interval gets
//! the scanner's "other" category. The sorted/disjoint invariant is checked
//! when the table is built, not trusted from the caller.

/// An interval-to-categories table for one scanner.
///
/// `F` is a `bitflags`-generated flag set. The table never changes after
/// construction and classification has no side effects.
#[derive(Debug, Clone)]
pub struct CategoryTable<F> {
    entries: Vec<(char, char, F)>,
    other: F,
}

impl<F: Copy> CategoryTable<F> {
    /// Build a table from closed intervals `(lo, hi, flags)`.
    ///
    /// Panics if the intervals are not sorted by start or not disjoint;
    /// the tables are static data, so this runs once per scanner.
    #[must_use]
    pub fn new(entries: &[(char, char, F)], other: F) -> Self {
        for &(lo, hi, _) in entries {
            assert!(lo <= hi, "empty interval in category table");
        }
        for pair in entries.windows(2) {
            assert!(
                pair[0].1 < pair[1].0,
                "category table intervals must be sorted and disjoint"
            );
        }
        Self {
            entries: entries.to_vec(),
            other,
        }
    }

    /// The category set of `c`.
    #[must_use]
    pub fn classify(&self, c: char) -> F {
        self.entries
            .binary_search_by(|&(lo, hi, _)| {
                if c < lo {
                    std::cmp::Ordering::Greater
                } else if c > hi {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .map(|idx| self.entries[idx].2)
            .unwrap_or(self.other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct Cat: u8 {
            const DIGIT = 1 << 0;
            const HEX = 1 << 1;
            const OTHER = 1 << 2;
        }
    }

    #[test]
    fn test_lookup_and_default() {
        let table = CategoryTable::new(
            &[
                ('0', '9', Cat::DIGIT.union(Cat::HEX)),
                ('A', 'F', Cat::HEX),
                ('a', 'f', Cat::HEX),
            ],
            Cat::OTHER,
        );
        assert_eq!(table.classify('5'), Cat::DIGIT | Cat::HEX);
        assert_eq!(table.classify('B'), Cat::HEX);
        assert_eq!(table.classify('z'), Cat::OTHER);
    }

    #[test]
    #[should_panic(expected = "sorted and disjoint")]
    fn test_overlap_rejected() {
        let _ = CategoryTable::new(&[('0', '9', Cat::DIGIT), ('5', 'a', Cat::HEX)], Cat::OTHER);
    }
}
