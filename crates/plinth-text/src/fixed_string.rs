//! Interned names with an optional numeric suffix.
//!
//! A [`FixedString`] is a pool [`EntryId`] for the name's body plus the number
//! split off its trailing `_<digits>` suffix, so `Mesh_1`, `Mesh_2` and `Mesh`
//! all share one pool entry. Comparing two names never touches their
//! characters: they are equal exactly when both the id and the suffix match.
//!
//! A suffix is only split off when it is a canonical `u32`: ASCII digits, no
//! leading zero unless the suffix is exactly `0`, and a non-empty body before
//! the underscore. Anything else stays part of the body.

use std::fmt;

use plinth_mem::{EntryId, SharedStringPool, global_pool};

use crate::ustring::UString;

/// An interned name.
///
/// ```
/// use plinth_text::FixedString;
///
/// let a = FixedString::new("Light_12");
/// let b = FixedString::new("Light_12");
/// let c = FixedString::new("Light_3");
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(a.entry_id(), c.entry_id());
/// assert_eq!(a.number(), Some(12));
/// assert_eq!(a.to_string(), "Light_12");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedString {
    entry: EntryId,
    number: Option<u32>,
}

/// Splits `name` into its body and numeric suffix.
fn split_number(name: &str) -> (&str, Option<u32>) {
    let Some((body, digits)) = name.rsplit_once('_') else {
        return (name, None);
    };
    let canonical = !body.is_empty()
        && !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'));
    if !canonical {
        return (name, None);
    }
    match digits.parse() {
        Ok(number) => (body, Some(number)),
        Err(_) => (name, None),
    }
}

impl FixedString {
    /// Interns `name` in the process-wide pool.
    pub fn new(name: &str) -> Self {
        Self::new_in(name, global_pool())
    }

    /// Interns `name` in `pool`.
    pub fn new_in(name: &str, pool: &SharedStringPool) -> Self {
        let (body, number) = split_number(name);
        Self {
            entry: pool.find_or_store(body),
            number,
        }
    }

    /// Pool id of the body.
    pub fn entry_id(&self) -> EntryId {
        self.entry
    }

    /// The numeric suffix, if the name had one.
    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn has_number(&self) -> bool {
        self.number.is_some()
    }

    /// Rebuilds the full name from `pool`. Empty if the pool does not know
    /// the id.
    pub fn to_string_in(&self, pool: &SharedStringPool) -> String {
        pool.resolve_with(self.entry, |body| match (body, self.number) {
            (Some(body), Some(number)) => format!("{body}_{number}"),
            (Some(body), None) => body.to_owned(),
            (None, _) => String::new(),
        })
    }

    /// The full name as a [`UString`], resolved through the global pool.
    pub fn to_ustring(&self) -> UString {
        self.to_ustring_in(global_pool())
    }

    /// The full name as a [`UString`], resolved through `pool`.
    pub fn to_ustring_in(&self, pool: &SharedStringPool) -> UString {
        UString::from(self.to_string_in(pool).as_str())
    }
}

impl Default for FixedString {
    fn default() -> Self {
        Self {
            entry: EntryId::INVALID,
            number: None,
        }
    }
}

impl From<&str> for FixedString {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for FixedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_in(global_pool()))
    }
}
