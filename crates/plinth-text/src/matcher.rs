//! Reusable substring search.
//!
//! [`StringMatcher`] precomputes a Boyer-Moore-Horspool skip table for one
//! pattern so repeated searches (counting, replacing, splitting) do not pay
//! for it again. The table is keyed on the low byte of each (case-folded)
//! unit, so it stays 256 entries wide for any alphabet.

use plinth_mem::DynArray;

use crate::char_traits::{CaseSensitivity, unit_eq};
use crate::uchar::{UChar, UCharExt};

/// A pattern prepared for repeated searching.
///
/// ```
/// use plinth_text::{CaseSensitivity, StringMatcher, UString};
///
/// let text = UString::from("one Two three two");
/// let matcher = StringMatcher::new(UString::from("two").as_units(), CaseSensitivity::Insensitive);
///
/// assert_eq!(matcher.index_in(text.as_units(), 0), Some(4));
/// assert_eq!(matcher.index_in(text.as_units(), 5), Some(14));
/// assert_eq!(matcher.index_in(text.as_units(), 15), None);
/// ```
#[derive(Clone)]
pub struct StringMatcher {
    pattern: DynArray<UChar>,
    case: CaseSensitivity,
    skip: [usize; 256],
}

impl StringMatcher {
    /// Prepares `pattern` for searching under `case`.
    pub fn new(pattern: &[UChar], case: CaseSensitivity) -> Self {
        let len = pattern.len();
        let mut skip = [len.max(1); 256];
        if len > 1 {
            for (i, &unit) in pattern[..len - 1].iter().enumerate() {
                skip[Self::bucket(unit, case)] = len - 1 - i;
            }
        }
        Self {
            pattern: DynArray::from(pattern),
            case,
            skip,
        }
    }

    #[inline]
    fn bucket(unit: UChar, case: CaseSensitivity) -> usize {
        let unit = match case {
            CaseSensitivity::Sensitive => unit,
            CaseSensitivity::Insensitive => unit.fold_case(),
        };
        usize::from(unit & 0xFF)
    }

    /// The pattern being searched for.
    pub fn pattern(&self) -> &[UChar] {
        &self.pattern
    }

    /// The case sensitivity used for matching.
    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case
    }

    fn matches_at(&self, haystack: &[UChar], at: usize) -> bool {
        let window = &haystack[at..at + self.pattern.len()];
        match self.case {
            CaseSensitivity::Sensitive => window == self.pattern.as_slice(),
            CaseSensitivity::Insensitive => window
                .iter()
                .zip(self.pattern.iter())
                .all(|(&a, &b)| unit_eq(a, b, CaseSensitivity::Insensitive)),
        }
    }

    /// Position of the first match at or after `from`.
    ///
    /// An empty pattern matches at `from` as long as `from` is within the
    /// haystack.
    pub fn index_in(&self, haystack: &[UChar], from: usize) -> Option<usize> {
        let len = self.pattern.len();
        if from > haystack.len() || haystack.len() - from < len {
            return None;
        }
        if len == 0 {
            return Some(from);
        }

        let mut at = from;
        while at + len <= haystack.len() {
            if self.matches_at(haystack, at) {
                return Some(at);
            }
            let last = haystack[at + len - 1];
            at += self.skip[Self::bucket(last, self.case)];
        }
        None
    }
}
