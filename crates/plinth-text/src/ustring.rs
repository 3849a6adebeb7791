//! Growable, zero-terminated UTF-16 string.
//!
//! [`UString`] stores UTF-16 code units in a [`DynArray`] followed by one
//! terminator unit that is always zero. [`len`](UString::len) and
//! [`capacity`](UString::capacity) never count the terminator. A string that
//! has never held anything (or was [`clear`](UString::clear)ed) is *null*: it
//! owns no buffer at all. Null and empty strings compare equal; only
//! [`is_null`](UString::is_null) tells them apart.
//!
//! Every conversion from another encoding is two-pass: the input is measured
//! and validated first, then decoded into a buffer of exactly that size.
//! Malformed input is an [`Error`](crate::Error), never an empty string.
//!
//! ```
//! use plinth_text::{CaseSensitivity, UString};
//!
//! let mut s = UString::from_utf8("grüße, welt".as_bytes()).unwrap();
//! s.replace(&UString::from("welt"), &UString::from("plinth"), CaseSensitivity::Sensitive);
//!
//! assert_eq!(s, "grüße, plinth");
//! assert_eq!(s.len(), 13);
//! assert_eq!(s.as_units_with_terminator().last(), Some(&0));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use plinth_log::trace;
use plinth_mem::{DynArray, InlineAllocation, ensure};

use crate::algorithm;
use crate::char_traits::{self, CaseSensitivity, SplitBehavior};
use crate::encoding;
use crate::error::Result;
use crate::matcher::StringMatcher;
use crate::uchar::{UChar, UCharExt};

const TERMINATOR: &[UChar] = &[0];

/// Match positions collected by [`UString::replace`].
type MatchList = DynArray<usize, InlineAllocation<512>>;

/// A UTF-16 string with a trailing zero terminator.
#[derive(Clone, Default)]
pub struct UString {
    source: DynArray<UChar>,
}

impl UString {
    /// Creates a null string. Does not allocate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: DynArray::new(),
        }
    }

    /// Creates an empty, non-null string holding only the terminator.
    #[must_use]
    pub fn empty() -> Self {
        let mut s = Self::new();
        s.set_len(0);
        s
    }

    /// Creates a null string with room for `capacity` units.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut s = Self::new();
        s.reserve(capacity);
        s
    }

    /// Copies `units` into a new string.
    ///
    /// An empty slice gives an empty (not null) string.
    #[must_use]
    pub fn from_units(units: &[UChar]) -> Self {
        let mut s = Self::new();
        s.set_len(units.len());
        s.units_mut().copy_from_slice(units);
        s
    }

    /// A one-unit string.
    #[must_use]
    pub fn from_char(ch: UChar) -> Self {
        Self::from_units(&[ch])
    }

    /// A string of `count` copies of `ch`.
    #[must_use]
    pub fn filled(count: usize, ch: UChar) -> Self {
        let mut s = Self::new();
        s.fill(ch, Some(count));
        s
    }

    fn decoded(len: usize, decode: impl FnOnce(&mut [UChar]) -> Result<usize>) -> Result<Self> {
        let mut s = Self::new();
        s.set_len(len);
        let written = decode(s.units_mut())?;
        ensure!(
            written == len,
            "decoded {} units into a buffer measured for {}",
            written,
            len
        );
        Ok(s)
    }

    /// Zero-extends each Latin-1 byte to one unit.
    #[must_use]
    pub fn from_latin1(bytes: &[u8]) -> Self {
        let mut s = Self::new();
        s.set_len(encoding::measure_latin1(bytes));
        encoding::decode_latin1(bytes, s.units_mut());
        s
    }

    /// Decodes UTF-8 `bytes`.
    ///
    /// # Errors
    ///
    /// [`Error::Malformed`](crate::Error::Malformed) with the byte offset of
    /// the first invalid sequence.
    pub fn from_utf8(bytes: &[u8]) -> Result<Self> {
        let len = encoding::measure_utf8(bytes)?;
        Self::decoded(len, |out| encoding::decode_utf8(bytes, out))
    }

    /// Copies UTF-16 `units` after checking that every surrogate is paired.
    ///
    /// # Errors
    ///
    /// [`Error::Malformed`](crate::Error::Malformed) at the first unpaired
    /// surrogate.
    pub fn from_utf16(units: &[u16]) -> Result<Self> {
        let len = encoding::measure_utf16(units)?;
        Self::decoded(len, |out| encoding::decode_utf16(units, out))
    }

    /// Encodes UTF-32 `code_points` as UTF-16.
    ///
    /// # Errors
    ///
    /// [`Error::Malformed`](crate::Error::Malformed) at the first surrogate
    /// or value above U+10FFFF.
    pub fn from_utf32(code_points: &[u32]) -> Result<Self> {
        let len = encoding::measure_utf32(code_points)?;
        Self::decoded(len, |out| encoding::decode_utf32(code_points, out))
    }

    /// Encodes the string as Latin-1, without a terminator.
    ///
    /// # Errors
    ///
    /// [`Error::Unrepresentable`](crate::Error::Unrepresentable) at the first
    /// unit above U+00FF.
    pub fn to_latin1(&self) -> Result<Vec<u8>> {
        encoding::encode_latin1(self.as_units())
    }

    /// Encodes the string as UTF-8, without a terminator.
    ///
    /// # Errors
    ///
    /// [`Error::Malformed`](crate::Error::Malformed) at the first unpaired
    /// surrogate.
    pub fn to_utf8(&self) -> Result<Vec<u8>> {
        encoding::encode_utf8(self.as_units())
    }

    /// A copy of the code units, without a terminator.
    #[must_use]
    pub fn to_utf16(&self) -> Vec<u16> {
        self.as_units().to_vec()
    }

    /// Encodes the string as UTF-32, without a terminator.
    ///
    /// # Errors
    ///
    /// [`Error::Malformed`](crate::Error::Malformed) at the first unpaired
    /// surrogate.
    pub fn to_utf32(&self) -> Result<Vec<u32>> {
        encoding::encode_utf32(self.as_units())
    }

    /// Converts to a `String`.
    ///
    /// # Errors
    ///
    /// [`Error::Malformed`](crate::Error::Malformed) at the first unpaired
    /// surrogate. Use the `Display` impl for a lossy conversion.
    pub fn to_std_string(&self) -> Result<String> {
        encoding::to_std_string(self.as_units())
    }

    /// Whether the string owns no buffer.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.source.is_empty()
    }

    /// Whether the string has no units. True for null strings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of units, excluding the terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.source.len().saturating_sub(1)
    }

    /// Units the string can hold without reallocating, excluding the
    /// terminator.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.source.capacity().saturating_sub(1)
    }

    /// Reserves room for `additional` more units.
    pub fn reserve(&mut self, additional: usize) {
        let terminator = usize::from(self.is_null());
        self.source.reserve(additional + terminator);
    }

    /// The code units, without the terminator.
    #[inline]
    pub fn as_units(&self) -> &[UChar] {
        &self.source[..self.len()]
    }

    /// The code units followed by the zero terminator. A null string yields
    /// just the terminator.
    pub fn as_units_with_terminator(&self) -> &[UChar] {
        if self.is_null() {
            TERMINATOR
        } else {
            &self.source
        }
    }

    #[inline]
    fn units_mut(&mut self) -> &mut [UChar] {
        let len = self.len();
        &mut self.source[..len]
    }

    /// The unit at `index`, if any.
    pub fn get(&self, index: usize) -> Option<UChar> {
        self.as_units().get(index).copied()
    }

    /// Sets the length and rewrites the terminator. Materializes the buffer
    /// of a null string.
    fn set_len(&mut self, len: usize) {
        self.source.resize_len(len + 1, 0);
        self.source[len] = 0;
    }

    /// Sets the length to `len`. New units are zero.
    pub fn resize(&mut self, len: usize) {
        self.set_len(len);
    }

    /// Shortens the string to `pos` units. Never grows it.
    pub fn truncate(&mut self, pos: usize) {
        if pos < self.len() {
            self.set_len(pos);
        }
    }

    /// Releases the buffer, leaving a null string.
    pub fn clear(&mut self) {
        self.source.clear(0);
    }

    /// Appends `units`.
    pub fn append_units(&mut self, units: &[UChar]) {
        if units.is_empty() {
            return;
        }
        let len = self.len();
        self.set_len(len + units.len());
        self.source[len..len + units.len()].copy_from_slice(units);
    }

    /// Appends another string.
    pub fn append(&mut self, other: &UString) {
        self.append_units(other.as_units());
    }

    /// Appends one unit.
    pub fn push(&mut self, ch: UChar) {
        self.append_units(&[ch]);
    }

    /// Inserts `units` before position `pos`, shifting the tail.
    ///
    /// # Panics
    ///
    /// If `pos > len()`.
    pub fn insert(&mut self, pos: usize, units: impl AsRef<[UChar]>) {
        let units = units.as_ref();
        let len = self.len();
        if pos > len {
            panic!("insert position {pos} out of bounds for length {len}");
        }
        if units.is_empty() {
            return;
        }
        if self.is_null() {
            self.set_len(0);
        }
        self.source.insert_slice(pos, units);
    }

    /// Removes up to `num` units starting at `pos` with one compaction.
    ///
    /// A range reaching past the end truncates at `pos`; a `pos` at or past
    /// the end does nothing.
    pub fn remove_range(&mut self, pos: usize, num: usize) {
        let len = self.len();
        if pos >= len || num == 0 {
            return;
        }
        if num >= len - pos {
            self.set_len(pos);
        } else {
            self.source.remove_range(pos..pos + num);
        }
    }

    /// Removes every occurrence of `ch`. Returns how many were removed.
    pub fn remove_char(&mut self, ch: UChar, cs: CaseSensitivity) -> usize {
        let len = self.len();
        let units = self.units_mut();
        let mut kept = 0;
        for i in 0..len {
            let unit = units[i];
            if !char_traits::unit_eq(unit, ch, cs) {
                units[kept] = unit;
                kept += 1;
            }
        }
        if kept != len {
            self.set_len(kept);
        }
        len - kept
    }

    /// Removes every occurrence of `pattern`. Returns how many were removed.
    ///
    /// After each deletion the search resumes at the deletion point, so a
    /// match that starts exactly where the previous one was removed is also
    /// found.
    ///
    /// ```
    /// use plinth_text::{CaseSensitivity, UString};
    ///
    /// let mut s = UString::from("x<br><br>y");
    /// let removed = s.remove_str(&UString::from("<br>"), CaseSensitivity::Sensitive);
    /// assert_eq!(removed, 2);
    /// assert_eq!(s, "xy");
    /// ```
    pub fn remove_str(&mut self, pattern: impl AsRef<[UChar]>, cs: CaseSensitivity) -> usize {
        let pattern = pattern.as_ref();
        if pattern.is_empty() {
            return 0;
        }
        let matcher = StringMatcher::new(pattern, cs);
        let mut removed = 0;
        let mut from = 0;
        while let Some(at) = matcher.index_in(self.as_units(), from) {
            self.remove_range(at, pattern.len());
            from = at;
            removed += 1;
        }
        removed
    }

    /// Replaces every non-overlapping occurrence of `before` with `after`.
    /// Returns the number of replacements.
    ///
    /// Matches are collected left to right, each search resuming after the
    /// end of the previous match. Does nothing when either operand is empty,
    /// when they are identical, or when the string is shorter than `before`.
    ///
    /// ```
    /// use plinth_text::{CaseSensitivity, UString};
    ///
    /// let mut s = UString::from("aaa");
    /// assert_eq!(s.replace(&UString::from("a"), &UString::from("bb"), CaseSensitivity::Sensitive), 3);
    /// assert_eq!(s, "bbbbbb");
    ///
    /// let mut s = UString::from("aaaa");
    /// assert_eq!(s.replace(&UString::from("aa"), &UString::from("x"), CaseSensitivity::Sensitive), 2);
    /// assert_eq!(s, "xx");
    /// ```
    pub fn replace(
        &mut self,
        before: impl AsRef<[UChar]>,
        after: impl AsRef<[UChar]>,
        cs: CaseSensitivity,
    ) -> usize {
        let (before, after) = (before.as_ref(), after.as_ref());
        let len = self.len();
        let (blen, alen) = (before.len(), after.len());
        if blen == 0 || alen == 0 || len < blen || before == after {
            return 0;
        }

        let matcher = StringMatcher::new(before, cs);
        let mut matches = MatchList::default();
        let mut from = 0;
        while let Some(at) = matcher.index_in(self.as_units(), from) {
            matches.push(at);
            from = at + blen;
        }
        let count = matches.len();
        if count == 0 {
            return 0;
        }

        let new_len = len + count * alen - count * blen;
        match alen.cmp(&blen) {
            Ordering::Equal => {
                let units = self.units_mut();
                for &at in &matches {
                    units[at..at + alen].copy_from_slice(after);
                }
            }
            Ordering::Greater => {
                // Grow first, then fill from the back so text before the
                // current match has not moved yet.
                self.set_len(new_len);
                let units = self.units_mut();
                let mut src_end = len;
                let mut dst_end = new_len;
                for &at in matches.iter().rev() {
                    let tail = at + blen;
                    let tail_len = src_end - tail;
                    units.copy_within(tail..src_end, dst_end - tail_len);
                    dst_end -= tail_len;
                    units[dst_end - alen..dst_end].copy_from_slice(after);
                    dst_end -= alen;
                    src_end = at;
                }
                ensure!(dst_end == src_end, "replace left a gap at {}", dst_end);
            }
            Ordering::Less => {
                let units = self.units_mut();
                let mut dst = matches[0];
                for (n, &at) in matches.iter().enumerate() {
                    units[dst..dst + alen].copy_from_slice(after);
                    dst += alen;
                    let tail = at + blen;
                    let tail_end = matches.get(n + 1).copied().unwrap_or(len);
                    units.copy_within(tail..tail_end, dst);
                    dst += tail_end - tail;
                }
                ensure!(dst == new_len, "compacted to {} units, expected {}", dst, new_len);
            }
        }
        self.set_len(new_len);
        trace!("replaced {} matches, {} -> {} units", count, len, new_len);
        count
    }

    /// Overwrites the string with `ch`. With `Some(len)` the string is
    /// resized to `len` first.
    pub fn fill(&mut self, ch: UChar, len: Option<usize>) {
        let len = len.unwrap_or(self.len());
        if len == 0 && self.is_empty() {
            return;
        }
        self.set_len(len);
        self.units_mut().fill(ch);
    }

    /// Removes `n` units from the end. Removing everything leaves a null
    /// string.
    pub fn chop(&mut self, n: usize) {
        let len = self.len();
        if n >= len {
            self.clear();
        } else if n > 0 {
            self.set_len(len - n);
        }
    }

    /// Upper-cases every unit in place.
    pub fn make_upper(&mut self) {
        for unit in self.units_mut() {
            *unit = unit.to_upper();
        }
    }

    /// Lower-cases every unit in place.
    pub fn make_lower(&mut self) {
        for unit in self.units_mut() {
            *unit = unit.to_lower();
        }
    }

    /// An upper-cased copy.
    #[must_use]
    pub fn to_upper(&self) -> Self {
        let mut s = self.clone();
        s.make_upper();
        s
    }

    /// A lower-cased copy.
    #[must_use]
    pub fn to_lower(&self) -> Self {
        let mut s = self.clone();
        s.make_lower();
        s
    }

    /// Whether upper-casing would leave every unit unchanged. True for an
    /// empty string.
    pub fn is_upper(&self) -> bool {
        self.as_units().iter().all(|u| u.is_upper())
    }

    /// Whether lower-casing would leave every unit unchanged. True for an
    /// empty string.
    pub fn is_lower(&self) -> bool {
        self.as_units().iter().all(|u| u.is_lower())
    }

    /// The `num` units starting at `pos`, or `None` if that range is not
    /// inside the string.
    pub fn substring(&self, pos: usize, num: usize) -> Option<Self> {
        let end = pos.checked_add(num)?;
        self.as_units().get(pos..end).map(Self::from_units)
    }

    /// A copy without the last `n` units. Null if `n >= len()`.
    #[must_use]
    pub fn chopped(&self, n: usize) -> Self {
        let len = self.len();
        if n >= len {
            return Self::new();
        }
        Self::from_units(&self.as_units()[..len - n])
    }

    /// The string repeated `times` times. Null for zero.
    #[must_use]
    pub fn repeated(&self, times: usize) -> Self {
        if times == 0 {
            return Self::new();
        }
        if self.is_empty() || times == 1 {
            return self.clone();
        }
        let mut s = Self::with_capacity(self.len() * times);
        for _ in 0..times {
            s.append_units(self.as_units());
        }
        s
    }

    /// A copy without leading and trailing whitespace.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        let units = self.as_units();
        let Some(start) = units.iter().position(|u| !u.is_space()) else {
            return Self::new();
        };
        let end = units.iter().rposition(|u| !u.is_space()).map_or(start, |e| e + 1);
        Self::from_units(&units[start..end])
    }

    fn push_part(parts: &mut DynArray<UString>, part: &[UChar], behavior: SplitBehavior) {
        if !part.is_empty() || behavior == SplitBehavior::KeepEmptyParts {
            parts.push(Self::from_units(part));
        }
    }

    /// Splits at every occurrence of `sep`.
    ///
    /// An empty separator never matches, so the whole string is the only
    /// part.
    ///
    /// ```
    /// use plinth_text::{CaseSensitivity, SplitBehavior, UString};
    ///
    /// let s = UString::from("a,,b");
    /// let sep = UString::from(",");
    /// let keep = s.split(&sep, SplitBehavior::KeepEmptyParts, CaseSensitivity::Sensitive);
    /// let skip = s.split(&sep, SplitBehavior::SkipEmptyParts, CaseSensitivity::Sensitive);
    ///
    /// assert_eq!(keep.len(), 3);
    /// assert_eq!(skip[1], "b");
    /// ```
    pub fn split(
        &self,
        sep: impl AsRef<[UChar]>,
        behavior: SplitBehavior,
        cs: CaseSensitivity,
    ) -> DynArray<UString> {
        let sep = sep.as_ref();
        let units = self.as_units();
        let mut parts = DynArray::new();
        let mut start = 0;
        if !sep.is_empty() {
            let matcher = StringMatcher::new(sep, cs);
            while let Some(end) = matcher.index_in(units, start) {
                Self::push_part(&mut parts, &units[start..end], behavior);
                start = end + sep.len();
            }
        }
        Self::push_part(&mut parts, &units[start..], behavior);
        parts
    }

    /// Splits at every unit that appears in `seps`.
    pub fn split_any(
        &self,
        seps: impl AsRef<[UChar]>,
        behavior: SplitBehavior,
        cs: CaseSensitivity,
    ) -> DynArray<UString> {
        let seps = seps.as_ref();
        let units = self.as_units();
        let mut parts = DynArray::new();
        let mut start = 0;
        while let Some(end) = algorithm::find_any_char(units, seps, start, cs) {
            Self::push_part(&mut parts, &units[start..end], behavior);
            start = end + 1;
        }
        Self::push_part(&mut parts, &units[start..], behavior);
        parts
    }

    /// Number of non-overlapping occurrences of `pattern`. Zero for an empty
    /// pattern.
    pub fn count(&self, pattern: impl AsRef<[UChar]>, cs: CaseSensitivity) -> usize {
        let pattern = pattern.as_ref();
        if pattern.is_empty() {
            return 0;
        }
        let matcher = StringMatcher::new(pattern, cs);
        let units = self.as_units();
        let mut count = 0;
        let mut from = 0;
        while let Some(at) = matcher.index_in(units, from) {
            count += 1;
            from = at + pattern.len();
        }
        count
    }

    /// Whether `pattern` occurs anywhere.
    pub fn contains(&self, pattern: impl AsRef<[UChar]>, cs: CaseSensitivity) -> bool {
        self.find(pattern, 0, cs).is_some()
    }

    /// Whether the string begins with `prefix`. A null string never does.
    pub fn starts_with(&self, prefix: impl AsRef<[UChar]>, cs: CaseSensitivity) -> bool {
        let prefix = prefix.as_ref();
        !self.is_null()
            && self
                .as_units()
                .get(..prefix.len())
                .is_some_and(|head| char_traits::equals(head, prefix, cs))
    }

    /// Whether the string ends with `suffix`. A null string never does.
    pub fn ends_with(&self, suffix: impl AsRef<[UChar]>, cs: CaseSensitivity) -> bool {
        let suffix = suffix.as_ref();
        let units = self.as_units();
        !self.is_null()
            && units.len() >= suffix.len()
            && char_traits::equals(&units[units.len() - suffix.len()..], suffix, cs)
    }

    /// Three-way comparison: the first differing unit decides, then the
    /// longer string is greater.
    pub fn compare(&self, other: impl AsRef<[UChar]>, cs: CaseSensitivity) -> Ordering {
        char_traits::compare_with(self.as_units(), other.as_ref(), cs)
    }

    /// First occurrence of `pattern` at or after `from`.
    pub fn find(&self, pattern: impl AsRef<[UChar]>, from: usize, cs: CaseSensitivity) -> Option<usize> {
        algorithm::find_string(self.as_units(), pattern.as_ref(), from, cs)
    }

    /// Last occurrence of `pattern` starting at or before `from`.
    pub fn find_last(
        &self,
        pattern: impl AsRef<[UChar]>,
        from: usize,
        cs: CaseSensitivity,
    ) -> Option<usize> {
        algorithm::find_last_string(self.as_units(), pattern.as_ref(), from, cs)
    }

    /// First `ch` at or after `from`.
    pub fn find_char(&self, ch: UChar, from: usize, cs: CaseSensitivity) -> Option<usize> {
        algorithm::find_char(self.as_units(), ch, from, cs)
    }

    /// Last `ch` at or before `from`.
    pub fn find_last_char(&self, ch: UChar, from: usize, cs: CaseSensitivity) -> Option<usize> {
        algorithm::find_last_char(self.as_units(), ch, from, cs)
    }

    /// First unit of `set` at or after `from`.
    pub fn find_any_char(
        &self,
        set: impl AsRef<[UChar]>,
        from: usize,
        cs: CaseSensitivity,
    ) -> Option<usize> {
        algorithm::find_any_char(self.as_units(), set.as_ref(), from, cs)
    }

    /// Last unit of `set` at or before `from`.
    pub fn find_last_any_char(
        &self,
        set: impl AsRef<[UChar]>,
        from: usize,
        cs: CaseSensitivity,
    ) -> Option<usize> {
        algorithm::find_last_any_char(self.as_units(), set.as_ref(), from, cs)
    }
}

impl AsRef<[UChar]> for UString {
    fn as_ref(&self) -> &[UChar] {
        self.as_units()
    }
}

impl From<&str> for UString {
    fn from(s: &str) -> Self {
        let mut out = Self::new();
        out.set_len(s.encode_utf16().count());
        for (dst, unit) in out.units_mut().iter_mut().zip(s.encode_utf16()) {
            *dst = unit;
        }
        out
    }
}

impl Index<usize> for UString {
    type Output = UChar;

    fn index(&self, index: usize) -> &UChar {
        &self.as_units()[index]
    }
}

impl PartialEq for UString {
    fn eq(&self, other: &Self) -> bool {
        self.as_units() == other.as_units()
    }
}

impl Eq for UString {}

impl PartialEq<str> for UString {
    fn eq(&self, other: &str) -> bool {
        self.as_units().iter().copied().eq(other.encode_utf16())
    }
}

impl PartialEq<&str> for UString {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl PartialOrd for UString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UString {
    fn cmp(&self, other: &Self) -> Ordering {
        char_traits::compare(self.as_units(), other.as_units())
    }
}

impl Hash for UString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_units().hash(state);
    }
}

impl fmt::Display for UString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encoding::to_string_lossy(self.as_units()))
    }
}

impl fmt::Debug for UString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&encoding::to_string_lossy(self.as_units()), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Encoding, Error};

    const CS: CaseSensitivity = CaseSensitivity::Sensitive;
    const CI: CaseSensitivity = CaseSensitivity::Insensitive;

    fn u(s: &str) -> UString {
        UString::from(s)
    }

    #[test]
    fn test_null_and_empty() {
        let null = UString::new();
        let empty = UString::empty();

        assert!(null.is_null());
        assert!(!empty.is_null());
        assert!(null.is_empty() && empty.is_empty());
        assert_eq!(null, empty);
        assert_eq!(null.as_units_with_terminator(), &[0]);
        assert_eq!(empty.as_units_with_terminator(), &[0]);
        assert_eq!(null.capacity(), 0);
    }

    #[test]
    fn test_terminator_follows_content() {
        let mut s = u("abc");
        assert_eq!(s.len(), 3);
        assert_eq!(s.as_units_with_terminator(), &[0x61, 0x62, 0x63, 0]);

        s.resize(5);
        assert_eq!(s.as_units_with_terminator(), &[0x61, 0x62, 0x63, 0, 0, 0]);
        s.truncate(1);
        assert_eq!(s.as_units_with_terminator(), &[0x61, 0]);
        s.truncate(4);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_capacity_excludes_terminator() {
        let s = UString::with_capacity(16);
        assert!(s.is_null());
        assert!(s.capacity() >= 16);

        let mut t = u("hello");
        assert!(t.capacity() >= t.len());
        t.reserve(100);
        assert!(t.capacity() >= 105);
    }

    #[test]
    fn test_decoding_rejects_malformed() {
        assert_eq!(
            UString::from_utf8(b"ok\xFF"),
            Err(Error::Malformed {
                encoding: Encoding::Utf8,
                position: 2
            })
        );
        assert!(UString::from_utf16(&[0xDC00]).is_err());
        assert!(UString::from_utf32(&[0x11_0000]).is_err());

        let empty = UString::from_utf8(b"").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_latin1_both_ways() {
        let s = UString::from_latin1(&[b'c', 0xE9]);
        assert_eq!(s, "cé");
        assert_eq!(s.to_latin1().unwrap(), vec![b'c', 0xE9]);
        assert!(u("€").to_latin1().is_err());
    }

    #[test]
    fn test_exports() {
        let s = u("a😀");
        assert_eq!(s.to_utf16(), vec![0x61, 0xD83D, 0xDE00]);
        assert_eq!(s.to_utf32().unwrap(), vec![0x61, 0x1F600]);
        assert_eq!(s.to_utf8().unwrap(), "a😀".as_bytes());
        assert_eq!(s.to_std_string().unwrap(), "a😀");

        let broken = UString::from_units(&[0x61, 0xD800]);
        assert!(broken.to_std_string().is_err());
        assert_eq!(broken.to_string(), "a\u{FFFD}");
    }

    #[test]
    fn test_append_insert_push() {
        let mut s = UString::new();
        s.append(&u("world"));
        s.insert(0, u("hello "));
        s.push(b'!' as UChar);
        assert_eq!(s, "hello world!");

        s.insert(5, u(","));
        assert_eq!(s, "hello, world!");
        s.insert(s.len(), u("?"));
        assert_eq!(s, "hello, world!?");

        let mut null = UString::new();
        null.insert(0, u("x"));
        assert_eq!(null, "x");
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_insert_past_end_panics() {
        let mut s = u("ab");
        s.insert(3, u("x"));
    }

    #[test]
    fn test_remove_range() {
        let mut s = u("0123456789");
        s.remove_range(2, 3);
        assert_eq!(s, "0156789");
        s.remove_range(4, 100);
        assert_eq!(s, "0156");
        s.remove_range(10, 1);
        assert_eq!(s, "0156");
        s.remove_range(0, 0);
        assert_eq!(s.as_units_with_terminator().last(), Some(&0));
    }

    #[test]
    fn test_remove_char_and_str() {
        let mut s = u("a-b-C-c");
        assert_eq!(s.remove_char(b'c' as UChar, CI), 2);
        assert_eq!(s, "a-b--");
        assert_eq!(s.remove_char(b'-' as UChar, CS), 3);
        assert_eq!(s, "ab");

        let mut s = u("xababx");
        assert_eq!(s.remove_str(u("ab"), CS), 2);
        assert_eq!(s, "xx");

        let mut s = u("aXbxc");
        assert_eq!(s.remove_str(u("x"), CI), 2);
        assert_eq!(s, "abc");
        assert_eq!(s.remove_str(UString::new(), CS), 0);
    }

    #[test]
    fn test_remove_str_resumes_at_deletion_point() {
        // Removing "ab" at 1 leaves "a" + "b" adjacent at 0; the scan resumes
        // at 1 and does not revisit it.
        let mut s = u("aabb");
        assert_eq!(s.remove_str(u("ab"), CS), 1);
        assert_eq!(s, "ab");
    }

    #[test]
    fn test_replace_growth() {
        let mut s = u("aaa");
        assert_eq!(s.replace(u("a"), u("bb"), CS), 3);
        assert_eq!(s, "bbbbbb");
        assert_eq!(s.as_units_with_terminator().last(), Some(&0));
    }

    #[test]
    fn test_replace_growth_keeps_unprocessed_text() {
        let mut s = u("x.y.z");
        assert_eq!(s.replace(u("."), u("::"), CS), 2);
        assert_eq!(s, "x::y::z");

        let mut s = u("ab-cd-ef-");
        s.replace(u("-"), u("<->"), CS);
        assert_eq!(s, "ab<->cd<->ef<->");
    }

    #[test]
    fn test_replace_shrink() {
        let mut s = u("aabbaa");
        assert_eq!(s.replace(u("aa"), u("a"), CS), 2);
        assert_eq!(s, "abba");

        let mut s = u("aabaa");
        s.replace(u("aa"), u("a"), CS);
        assert_eq!(s, "aba");

        let mut s = u("<<a>><<b>>");
        s.replace(u("<<"), u("["), CS);
        assert_eq!(s, "[a>>[b>>");
        assert_eq!(s.len(), 8);
    }

    #[test]
    fn test_replace_same_length() {
        let mut s = u("cat hat cat");
        assert_eq!(s.replace(u("CAT"), u("dog"), CI), 2);
        assert_eq!(s, "dog hat dog");
    }

    #[test]
    fn test_replace_is_non_overlapping() {
        let mut s = u("aaaa");
        assert_eq!(s.replace(u("aa"), u("b"), CS), 2);
        assert_eq!(s, "bb");

        let mut s = u("aaa");
        assert_eq!(s.replace(u("aa"), u("b"), CS), 1);
        assert_eq!(s, "ba");
    }

    #[test]
    fn test_replace_no_ops() {
        let mut s = u("unchanged");
        let before = s.clone();

        assert_eq!(s.replace(u("un"), u("un"), CS), 0);
        assert_eq!(s.replace(u("zz"), u("y"), CS), 0);
        assert_eq!(s.replace(u(""), u("y"), CS), 0);
        assert_eq!(s.replace(u("un"), u(""), CS), 0);
        assert_eq!(s.replace(u("unchanged!"), u("y"), CS), 0);
        assert_eq!(s.as_units_with_terminator(), before.as_units_with_terminator());
    }

    #[test]
    fn test_replace_many_matches_spill_inline_list() {
        let mut s = UString::filled(300, b'a' as UChar);
        assert_eq!(s.replace(u("a"), u("bc"), CS), 300);
        assert_eq!(s.len(), 600);
        assert_eq!(s.count(u("bc"), CS), 300);
    }

    #[test]
    fn test_fill_and_chop() {
        let mut s = u("abc");
        s.fill(b'z' as UChar, None);
        assert_eq!(s, "zzz");
        s.fill(b'y' as UChar, Some(5));
        assert_eq!(s, "yyyyy");

        s.chop(2);
        assert_eq!(s, "yyy");
        s.chop(10);
        assert!(s.is_null());

        let mut null = UString::new();
        null.fill(b'x' as UChar, None);
        assert!(null.is_null());
    }

    #[test]
    fn test_case_mapping() {
        let mut s = u("Hello Wörld");
        assert_eq!(s.to_upper(), "HELLO WÖRLD");
        assert_eq!(s.to_lower(), "hello wörld");
        s.make_upper();
        assert!(s.is_upper());
        assert!(!s.is_lower());
    }

    #[test]
    fn test_empty_is_upper_and_lower() {
        assert!(UString::new().is_upper());
        assert!(UString::new().is_lower());
        assert!(UString::empty().is_upper());
        assert!(u("123").is_upper() && u("123").is_lower());
    }

    #[test]
    fn test_substring_chopped_repeated() {
        let s = u("abcdef");
        assert_eq!(s.substring(1, 3), Some(u("bcd")));
        assert_eq!(s.substring(6, 0), Some(UString::empty()));
        assert_eq!(s.substring(4, 3), None);
        assert_eq!(s.substring(usize::MAX, 2), None);

        assert_eq!(s.chopped(2), "abcd");
        assert!(s.chopped(6).is_null());

        assert_eq!(u("ab").repeated(3), "ababab");
        assert!(u("ab").repeated(0).is_null());
        assert_eq!(UString::empty().repeated(4), UString::new());
    }

    #[test]
    fn test_trimmed() {
        assert_eq!(u("  \t hi there \n").trimmed(), "hi there");
        assert_eq!(u("x").trimmed(), "x");
        assert!(u("   ").trimmed().is_empty());
        assert!(UString::new().trimmed().is_empty());
    }

    #[test]
    fn test_split_keep_and_skip() {
        let s = u("a,,b");
        let keep = s.split(u(","), SplitBehavior::KeepEmptyParts, CS);
        assert_eq!(keep.as_slice(), &[u("a"), u(""), u("b")]);

        let skip = s.split(u(","), SplitBehavior::SkipEmptyParts, CS);
        assert_eq!(skip.as_slice(), &[u("a"), u("b")]);
    }

    #[test]
    fn test_split_edges() {
        let keep = SplitBehavior::KeepEmptyParts;
        let skip = SplitBehavior::SkipEmptyParts;

        assert_eq!(u(",a,").split(u(","), keep, CS).len(), 3);
        assert_eq!(u(",a,").split(u(","), skip, CS).as_slice(), &[u("a")]);
        assert_eq!(u("aXbxc").split(u("x"), keep, CI).as_slice(), &[u("a"), u("b"), u("c")]);
        assert_eq!(u("abc").split(u(""), keep, CS).as_slice(), &[u("abc")]);
        assert_eq!(UString::new().split(u(","), keep, CS).len(), 1);
        assert!(UString::new().split(u(","), skip, CS).is_empty());
    }

    #[test]
    fn test_split_any() {
        let parts = u("a b\tc  d").split_any(u(" \t"), SplitBehavior::SkipEmptyParts, CS);
        assert_eq!(parts.as_slice(), &[u("a"), u("b"), u("c"), u("d")]);

        let parts = u("a;b,;c").split_any(u(",;"), SplitBehavior::KeepEmptyParts, CS);
        assert_eq!(parts.as_slice(), &[u("a"), u("b"), u(""), u("c")]);
    }

    #[test]
    fn test_count_is_non_overlapping() {
        assert_eq!(u("ababab").count(u("ab"), CS), 3);
        assert_eq!(u("aaaa").count(u("aa"), CS), 2);
        assert_eq!(u("AbAB").count(u("ab"), CI), 2);
        assert_eq!(u("abc").count(u(""), CS), 0);
        assert!(u("abc").contains(u("bc"), CS));
        assert!(!u("abc").contains(u("BC"), CS));
    }

    #[test]
    fn test_starts_and_ends_with() {
        let s = u("Plinth.toml");
        assert!(s.starts_with(u("Plinth"), CS));
        assert!(s.starts_with(u("plinth"), CI));
        assert!(!s.starts_with(u("plinth"), CS));
        assert!(s.ends_with(u(".TOML"), CI));
        assert!(!s.ends_with(u("Plinth.toml!"), CS));
        assert!(s.starts_with(u(""), CS));

        assert!(!UString::new().starts_with(u(""), CS));
        assert!(!UString::new().ends_with(u(""), CS));
        assert!(UString::empty().ends_with(u(""), CS));
    }

    #[test]
    fn test_compare_and_ord() {
        assert_eq!(u("abc").compare(u("abd"), CS), Ordering::Less);
        assert_eq!(u("abc").compare(u("ab"), CS), Ordering::Greater);
        assert_eq!(u("ABC").compare(u("abc"), CI), Ordering::Equal);
        assert!(u("apple") < u("banana"));
        assert!(u("app") < u("apple"));

        let mut words = vec![u("pear"), u("apple"), u("fig")];
        words.sort();
        assert_eq!(words, vec![u("apple"), u("fig"), u("pear")]);
    }

    #[test]
    fn test_hash_agrees_with_eq() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(UString::new());
        assert!(set.contains(&UString::empty()));
        set.insert(u("k"));
        assert!(set.contains(&UString::from_char(b'k' as UChar)));
    }

    #[test]
    fn test_search() {
        let s = u("one two one two");
        assert_eq!(s.find(u("two"), 0, CS), Some(4));
        assert_eq!(s.find(u("two"), 5, CS), Some(12));
        assert_eq!(s.find_last(u("one"), usize::MAX, CS), Some(8));
        assert_eq!(s.find_char(b'o' as UChar, 1, CS), Some(6));
        assert_eq!(s.find_last_char(b't' as UChar, 11, CS), Some(4));
        assert_eq!(s.find_any_char(u("wx"), 0, CS), Some(5));
        assert_eq!(s.find_last_any_char(u("ne"), usize::MAX, CS), Some(10));
        assert_eq!(s.get(0), Some(b'o' as UChar));
        assert_eq!(s[4], b't' as UChar);
        assert_eq!(s.get(99), None);
    }

    #[test]
    fn test_display_and_debug() {
        let s = u("tab\there");
        assert_eq!(s.to_string(), "tab\there");
        assert_eq!(format!("{s:?}"), "\"tab\\there\"");
    }
}
