//! Identifiers handed out by the string pool.
//!
//! An [`EntryId`] is a 32-bit handle for one deduplicated body stored in a
//! [`StringPool`](crate::StringPool). Comparing two ids is comparing two
//! integers; the bodies are never looked at. Ids are only meaningful for the
//! pool that issued them.
//!
//! # Examples
//!
//! ```
//! use plinth_mem::EntryId;
//!
//! let a = EntryId::new(3);
//! let b = EntryId::from(3);
//!
//! assert_eq!(a, b);
//! assert_eq!(a.as_usize(), 3);
//! assert!(EntryId::INVALID.is_invalid());
//! ```

use std::fmt;

/// Handle for an interned string body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u32);

impl EntryId {
    /// Placeholder that no pool ever issues.
    pub const INVALID: EntryId = EntryId(u32::MAX);

    /// Creates an id from its raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the raw value as an index.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Whether this is [`EntryId::INVALID`].
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry({})", self.0)
    }
}

impl From<u32> for EntryId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
