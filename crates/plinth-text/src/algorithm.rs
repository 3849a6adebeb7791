//! Single-shot forward and backward searches over code units.
//!
//! Offsets are clamped rather than rejected: a forward search starting past
//! the end finds nothing, and a backward search starting past the end starts
//! at the last position a match could begin.

use crate::char_traits::{CaseSensitivity, equals, unit_eq};
use crate::uchar::UChar;

/// First position at or after `from` where `pattern` occurs.
///
/// An empty pattern matches at `from` when `from <= haystack.len()`.
pub fn find_string(
    haystack: &[UChar],
    pattern: &[UChar],
    from: usize,
    cs: CaseSensitivity,
) -> Option<usize> {
    if from > haystack.len() || haystack.len() - from < pattern.len() {
        return None;
    }
    if pattern.is_empty() {
        return Some(from);
    }
    let first = pattern[0];
    (from..=haystack.len() - pattern.len()).find(|&at| {
        unit_eq(haystack[at], first, cs) && equals(&haystack[at..at + pattern.len()], pattern, cs)
    })
}

/// Last position at or before `from` where `pattern` occurs.
pub fn find_last_string(
    haystack: &[UChar],
    pattern: &[UChar],
    from: usize,
    cs: CaseSensitivity,
) -> Option<usize> {
    let last_start = haystack.len().checked_sub(pattern.len())?;
    let start = from.min(last_start);
    (0..=start)
        .rev()
        .find(|&at| equals(&haystack[at..at + pattern.len()], pattern, cs))
}

/// First position at or after `from` holding `ch`.
pub fn find_char(haystack: &[UChar], ch: UChar, from: usize, cs: CaseSensitivity) -> Option<usize> {
    let tail = haystack.get(from..)?;
    tail.iter()
        .position(|&u| unit_eq(u, ch, cs))
        .map(|offset| from + offset)
}

/// Last position at or before `from` holding `ch`.
pub fn find_last_char(
    haystack: &[UChar],
    ch: UChar,
    from: usize,
    cs: CaseSensitivity,
) -> Option<usize> {
    let end = from.min(haystack.len().checked_sub(1)?);
    haystack[..=end].iter().rposition(|&u| unit_eq(u, ch, cs))
}

/// First position at or after `from` holding any unit of `set`.
pub fn find_any_char(
    haystack: &[UChar],
    set: &[UChar],
    from: usize,
    cs: CaseSensitivity,
) -> Option<usize> {
    let tail = haystack.get(from..)?;
    tail.iter()
        .position(|&u| set.iter().any(|&s| unit_eq(u, s, cs)))
        .map(|offset| from + offset)
}

/// Last position at or before `from` holding any unit of `set`.
pub fn find_last_any_char(
    haystack: &[UChar],
    set: &[UChar],
    from: usize,
    cs: CaseSensitivity,
) -> Option<usize> {
    let end = from.min(haystack.len().checked_sub(1)?);
    haystack[..=end]
        .iter()
        .rposition(|&u| set.iter().any(|&s| unit_eq(u, s, cs)))
}
