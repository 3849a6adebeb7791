//! Index-stable slot storage with free-list reuse.
//!
//! A [`SlotTable`] hands out a [`SlotIndex`] for every inserted value. The
//! index stays valid until that particular slot is removed; removing a slot
//! never moves any other value. Freed slots are threaded onto a free list and
//! reused by later insertions, most recently freed first.
//!
//! # Examples
//!
//! ```
//! use plinth_mem::SlotTable;
//!
//! let mut table = SlotTable::new();
//! let a = table.insert("alpha");
//! let b = table.insert("beta");
//!
//! assert_eq!(table.remove(a), Some("alpha"));
//! assert_eq!(table[b], "beta");
//!
//! // The freed slot is recycled.
//! let c = table.insert("gamma");
//! assert_eq!(c, a);
//! assert_eq!(table.len(), 2);
//! ```

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::array::DynArray;

/// Position of a value inside a [`SlotTable`].
///
/// Deliberately not a `usize`: slot indices are handles, not offsets, and
/// support no arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(u32);

impl SlotIndex {
    /// Sentinel that never refers to a live slot.
    pub const INVALID: SlotIndex = SlotIndex(u32::MAX);

    /// Creates an index from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Whether this is [`SlotIndex::INVALID`].
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    const fn position(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            write!(f, "Slot(invalid)")
        } else {
            write!(f, "Slot({})", self.0)
        }
    }
}

#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: SlotIndex },
}

/// Slot storage over a [`DynArray`] with a free list of recycled positions.
#[derive(Clone)]
pub struct SlotTable<T> {
    slots: DynArray<Slot<T>>,
    free_head: SlotIndex,
    len: usize,
}

impl<T> SlotTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: DynArray::new(),
            free_head: SlotIndex::INVALID,
            len: 0,
        }
    }

    /// Number of live values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no slot is live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots the table can hold without growing, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// One past the highest slot position ever handed out.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Grows the slot storage so that `additional` more values fit.
    pub fn reserve(&mut self, additional: usize) {
        let free = self.slots.len() - self.len;
        if additional > free {
            self.slots.reserve(additional - free);
        }
    }

    /// Inserts the value built by `make`, which receives the slot's index
    /// before the value exists.
    ///
    /// Reuses the most recently freed slot if there is one.
    ///
    /// # Panics
    ///
    /// If the table would exceed `u32::MAX - 1` slots.
    pub fn insert_with<F>(&mut self, make: F) -> SlotIndex
    where
        F: FnOnce(SlotIndex) -> T,
    {
        if self.free_head.is_invalid() {
            let position = self.slots.len();
            let index = match u32::try_from(position) {
                Ok(raw) if raw != u32::MAX => SlotIndex(raw),
                _ => panic!("slot table exceeded {} slots", u32::MAX - 1),
            };
            self.slots.push(Slot::Occupied(make(index)));
            self.len += 1;
            return index;
        }

        let index = self.free_head;
        let slot = &mut self.slots[index.position()];
        match *slot {
            Slot::Vacant { next_free } => self.free_head = next_free,
            Slot::Occupied(_) => {
                crate::contract::violated("free list head is vacant", format_args!("{index}"))
            }
        }
        *slot = Slot::Occupied(make(index));
        self.len += 1;
        index
    }

    /// Inserts a value and returns its index.
    pub fn insert(&mut self, value: T) -> SlotIndex {
        self.insert_with(|_| value)
    }

    /// Frees the slot at `index`, returning its value.
    ///
    /// Returns `None` for a free, invalid or never-issued index. Other slots
    /// are left where they are.
    pub fn remove(&mut self, index: SlotIndex) -> Option<T> {
        let slot = self.slots.as_mut_slice().get_mut(index.position())?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }
        let previous = std::mem::replace(
            slot,
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        self.free_head = index;
        self.len -= 1;
        match previous {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// The value at `index`, if the slot is live.
    pub fn get(&self, index: SlotIndex) -> Option<&T> {
        match self.slots.as_slice().get(index.position())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// The value at `index` for mutation, if the slot is live.
    pub fn get_mut(&mut self, index: SlotIndex) -> Option<&mut T> {
        match self.slots.as_mut_slice().get_mut(index.position())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Whether `index` refers to a live slot.
    pub fn contains(&self, index: SlotIndex) -> bool {
        self.get(index).is_some()
    }

    /// Drops every value and sets the slot capacity to `slack`.
    ///
    /// All previously issued indices become invalid.
    pub fn clear(&mut self, slack: usize) {
        self.slots.clear(slack);
        self.free_head = SlotIndex::INVALID;
        self.len = 0;
    }

    /// Iterates over live values in slot order, with their indices.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.slots.iter().enumerate(),
            remaining: self.len,
        }
    }

    /// Iterates mutably over live values in slot order, with their indices.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            inner: self.slots.iter_mut().enumerate(),
            remaining: self.len,
        }
    }
}

impl<T> Default for SlotTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<SlotIndex> for SlotTable<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: SlotIndex) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("{index} is not a live slot"),
        }
    }
}

impl<T> IndexMut<SlotIndex> for SlotTable<T> {
    #[track_caller]
    fn index_mut(&mut self, index: SlotIndex) -> &mut T {
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("{index} is not a live slot"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SlotTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(index, value)| (index.as_u32(), value)))
            .finish()
    }
}

/// Iterator over the live slots of a [`SlotTable`].
pub struct Iter<'a, T> {
    inner: std::iter::Enumerate<std::slice::Iter<'a, Slot<T>>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (SlotIndex, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        for (position, slot) in self.inner.by_ref() {
            if let Slot::Occupied(value) = slot {
                self.remaining -= 1;
                return Some((SlotIndex(position as u32), value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Mutable iterator over the live slots of a [`SlotTable`].
pub struct IterMut<'a, T> {
    inner: std::iter::Enumerate<std::slice::IterMut<'a, Slot<T>>>,
    remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = (SlotIndex, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        for (position, slot) in self.inner.by_ref() {
            if let Slot::Occupied(value) = slot {
                self.remaining -= 1;
                return Some((SlotIndex(position as u32), value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<'a, T> IntoIterator for &'a SlotTable<T> {
    type Item = (SlotIndex, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
