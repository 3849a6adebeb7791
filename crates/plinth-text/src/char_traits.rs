//! Comparison and search over raw code-unit sequences.
//!
//! These are the primitives [`UString`](crate::UString) is built on. They work
//! on plain slices, so they also apply to foreign terminated buffers.

use std::cmp::Ordering;

use crate::uchar::{UChar, UCharExt};

/// Whether comparisons distinguish letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseSensitivity {
    /// Units must match exactly.
    #[default]
    Sensitive,
    /// Units match if their case-folded forms match.
    Insensitive,
}

/// Whether splitting keeps empty parts between adjacent separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SplitBehavior {
    /// Keep empty parts.
    #[default]
    KeepEmptyParts,
    /// Drop empty parts.
    SkipEmptyParts,
}

/// Number of units before the first terminator, or the slice length if there
/// is none.
///
/// ```
/// use plinth_text::char_traits;
///
/// assert_eq!(char_traits::length(&[0x61, 0x62, 0, 0x63]), 2);
/// assert_eq!(char_traits::length(&[0x61]), 1);
/// ```
pub fn length(units: &[UChar]) -> usize {
    units.iter().position(|&u| u == 0).unwrap_or(units.len())
}

/// Position of the first `ch` in `units`.
pub fn find(units: &[UChar], ch: UChar) -> Option<usize> {
    units.iter().position(|&u| u == ch)
}

/// Whether two units match under `cs`.
#[inline]
pub fn unit_eq(a: UChar, b: UChar, cs: CaseSensitivity) -> bool {
    match cs {
        CaseSensitivity::Sensitive => a == b,
        CaseSensitivity::Insensitive => a == b || a.fold_case() == b.fold_case(),
    }
}

/// Lexicographic three-way comparison: the first differing unit decides, and
/// if one is a prefix of the other the longer compares greater.
pub fn compare(a: &[UChar], b: &[UChar]) -> Ordering {
    let shared = a.len().min(b.len());
    a[..shared]
        .iter()
        .zip(&b[..shared])
        .map(|(x, y)| x.cmp(y))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

/// Like [`compare`], considering at most `count` units of each side.
pub fn compare_n(a: &[UChar], b: &[UChar], count: usize) -> Ordering {
    compare(&a[..a.len().min(count)], &b[..b.len().min(count)])
}

/// Like [`compare`], on case-folded units.
pub fn compare_insensitive(a: &[UChar], b: &[UChar]) -> Ordering {
    let shared = a.len().min(b.len());
    a[..shared]
        .iter()
        .zip(&b[..shared])
        .map(|(x, y)| x.fold_case().cmp(&y.fold_case()))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

/// Three-way comparison under `cs`.
pub fn compare_with(a: &[UChar], b: &[UChar], cs: CaseSensitivity) -> Ordering {
    match cs {
        CaseSensitivity::Sensitive => compare(a, b),
        CaseSensitivity::Insensitive => compare_insensitive(a, b),
    }
}

/// Whether `a` and `b` have the same length and matching units under `cs`.
pub fn equals(a: &[UChar], b: &[UChar], cs: CaseSensitivity) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| unit_eq(x, y, cs))
}
