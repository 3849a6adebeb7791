//! Growable contiguous array over a pluggable allocation strategy.
//!
//! [`DynArray`] is the general-purpose sequence container of the foundation
//! layer. It behaves much like `Vec<T>` but delegates storage and growth to an
//! [`AllocationStrategy`], which lets short-lived scratch arrays live inline
//! (see [`InlineAllocation`](crate::InlineAllocation)).
//!
//! # Reallocation
//!
//! Any operation that may grow the array (`push`, `insert`, `reserve`,
//! `extend_from_slice`, ...) may move the storage. References into the array
//! cannot be held across such a call; the borrow checker rejects it:
//!
//! ```compile_fail
//! use plinth_mem::DynArray;
//!
//! let mut arr: DynArray<String> = DynArray::new();
//! arr.push("first".to_string());
//! let first = &arr[0];
//! arr.push("second".to_string());
//! println!("{first}");
//! ```
//!
//! Appending a slice of the array to itself is rejected the same way:
//!
//! ```compile_fail
//! use plinth_mem::DynArray;
//!
//! let mut arr: DynArray<u32> = DynArray::from(&[1, 2, 3][..]);
//! arr.extend_from_slice(&arr[..]);
//! ```
//!
//! Copying the element out first is fine, since the value is read before the
//! storage is touched:
//!
//! ```
//! use plinth_mem::DynArray;
//!
//! let mut arr: DynArray<u32> = DynArray::from(&[1, 2, 3][..]);
//! let first = arr[0];
//! arr.push(first);
//! assert_eq!(&arr[..], &[1, 2, 3, 1]);
//! ```

use std::alloc::Layout;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut, Range};
use std::ptr::{self, NonNull};
use std::slice;

use plinth_log::trace;

use crate::alloc::{AllocationStrategy, HeapAllocation};
use crate::error::{Error, Result};

/// A growable contiguous array of `T` stored through the strategy `A`.
///
/// # Examples
///
/// ```
/// use plinth_mem::DynArray;
///
/// let mut arr = DynArray::new();
/// arr.push(10);
/// arr.push(20);
/// arr.insert(1, 15);
///
/// assert_eq!(arr.len(), 3);
/// assert_eq!(&arr[..], &[10, 15, 20]);
/// assert!(arr.capacity() >= arr.len());
///
/// assert_eq!(arr.remove_at(0), 10);
/// assert_eq!(arr.at(5).is_err(), true);
/// ```
pub struct DynArray<T, A: AllocationStrategy = HeapAllocation> {
    alloc: A,
    len: usize,
    cap: usize,
    _marker: PhantomData<T>,
}

#[cold]
#[track_caller]
fn index_out_of_bounds(index: usize, len: usize) -> ! {
    panic!("index {index} out of bounds for length {len}")
}

impl<T> DynArray<T, HeapAllocation> {
    /// Creates an empty heap-backed array.
    #[must_use]
    pub fn new() -> Self {
        Self::new_in(HeapAllocation::default())
    }

    /// Creates a heap-backed array able to hold `capacity` elements without
    /// reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut arr = Self::new();
        arr.reserve(capacity);
        arr
    }
}

impl<T, A: AllocationStrategy> DynArray<T, A> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Creates an empty array over the given strategy.
    ///
    /// The strategy's default capacity is allocated up front.
    pub fn new_in(alloc: A) -> Self {
        let default = alloc.default_capacity();
        let mut arr = Self {
            alloc,
            len: 0,
            cap: if Self::IS_ZST { usize::MAX } else { 0 },
            _marker: PhantomData,
        };
        if default > 0 {
            arr.reserve(default);
        }
        arr
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current storage can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// The allocation strategy backing this array.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Raw pointer to the first element. Dangling when nothing is allocated.
    pub fn as_ptr(&self) -> *const T {
        match self.alloc.allocation() {
            Some(ptr) => ptr.as_ptr().cast(),
            None => NonNull::dangling().as_ptr(),
        }
    }

    fn as_mut_ptr(&mut self) -> *mut T {
        match self.alloc.allocation_mut() {
            Some(ptr) => ptr.as_ptr().cast(),
            None => NonNull::dangling().as_ptr(),
        }
    }

    /// The live elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` elements are initialized and the pointer is
        // aligned (dangling only when len == 0 or T is zero-sized).
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;
        // SAFETY: as for as_slice, with unique access through &mut self.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), len) }
    }

    /// Bounds-checked access.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] when `index >= len()`.
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(Error::OutOfRange { index, len })
    }

    /// Bounds-checked mutable access.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] when `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len })
    }

    fn set_capacity(&mut self, new_cap: usize) -> Result<()> {
        crate::ensure!(
            new_cap >= self.len,
            "capacity {} below live count {}",
            new_cap,
            self.len
        );
        if Self::IS_ZST || new_cap == self.cap {
            return Ok(());
        }
        self.alloc.resize(self.len, new_cap, Layout::new::<T>())?;
        trace!(
            "reallocated {} from {} to {} elements",
            std::any::type_name::<T>(),
            self.cap,
            new_cap
        );
        self.cap = new_cap;
        Ok(())
    }

    fn grow_to(&mut self, required: usize) -> Result<()> {
        if required <= self.cap {
            return Ok(());
        }
        let next = self
            .alloc
            .next_capacity(required, self.cap, Layout::new::<T>());
        crate::ensure!(next >= required, "strategy offered {} for {}", next, required);
        self.set_capacity(next.max(required))
    }

    fn handle_reserve(result: Result<()>) {
        match result {
            Ok(()) => {}
            Err(Error::AllocationFailed { bytes }) => {
                let layout = Layout::from_size_align(bytes, mem::align_of::<T>())
                    .unwrap_or(Layout::new::<T>());
                std::alloc::handle_alloc_error(layout)
            }
            Err(err) => panic!("{err}"),
        }
    }

    /// Makes room for at least `additional` more elements.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityOverflow`] or [`Error::AllocationFailed`]; the array is
    /// unchanged on error.
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow)?;
        self.grow_to(required)
    }

    /// Makes room for at least `additional` more elements, growing through the
    /// strategy's capacity formula.
    ///
    /// # Panics
    ///
    /// On capacity overflow. Allocation failure aborts through
    /// [`std::alloc::handle_alloc_error`].
    pub fn reserve(&mut self, additional: usize) {
        Self::handle_reserve(self.try_reserve(additional));
    }

    /// Sets the capacity to exactly `new_capacity`.
    ///
    /// Does nothing unless `new_capacity` is above the live count and differs
    /// from the current capacity, so it never drops elements.
    pub fn resize(&mut self, new_capacity: usize) {
        if new_capacity > self.len && new_capacity != self.cap {
            Self::handle_reserve(self.set_capacity(new_capacity));
        }
    }

    /// Shrinks the capacity to the live count.
    pub fn shrink_to_fit(&mut self) {
        if self.len < self.cap && !Self::IS_ZST {
            Self::handle_reserve(self.set_capacity(self.len));
        }
    }

    /// Appends an element.
    #[inline]
    pub fn push(&mut self, value: T) {
        if self.len == self.cap {
            self.reserve(1);
        }
        // SAFETY: len < cap after reserve.
        unsafe { self.as_mut_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the element at the old last index is initialized and no
        // longer counted as live.
        Some(unsafe { self.as_ptr().add(self.len).read() })
    }

    /// Inserts an element at `index`, shifting the tail right.
    ///
    /// # Panics
    ///
    /// If `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) {
        let len = self.len;
        if index > len {
            index_out_of_bounds(index, len);
        }
        if len == self.cap {
            self.reserve(1);
        }
        // SAFETY: index <= len < cap; the tail is moved one slot right inside
        // the allocation before the hole is written.
        unsafe {
            let at = self.as_mut_ptr().add(index);
            ptr::copy(at, at.add(1), len - index);
            at.write(value);
        }
        self.len = len + 1;
    }

    /// Removes and returns the element at `index`, shifting the tail left.
    ///
    /// # Panics
    ///
    /// If `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> T {
        let len = self.len;
        if index >= len {
            index_out_of_bounds(index, len);
        }
        // SAFETY: index < len; the value is read out before the tail closes
        // the gap.
        unsafe {
            let at = self.as_mut_ptr().add(index);
            let value = at.read();
            ptr::copy(at.add(1), at, len - index - 1);
            self.len = len - 1;
            value
        }
    }

    /// Removes every element matching `predicate`, scanning from the back.
    ///
    /// Scanning backwards keeps the indices of not-yet-visited elements valid
    /// while earlier matches are removed. Returns the number removed.
    ///
    /// ```
    /// use plinth_mem::DynArray;
    ///
    /// let mut arr: DynArray<i32> = (1..=10).collect();
    /// assert_eq!(arr.remove_match(|n| n % 3 == 0), 3);
    /// assert_eq!(&arr[..], &[1, 2, 4, 5, 7, 8, 10]);
    /// ```
    pub fn remove_match<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = 0;
        let mut index = self.len;
        while index > 0 {
            index -= 1;
            if predicate(&self.as_slice()[index]) {
                drop(self.remove_at(index));
                removed += 1;
            }
        }
        removed
    }

    /// Removes every element equal to `value`. Returns whether any was removed.
    pub fn remove(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.remove_match(|elem| elem == value) > 0
    }

    /// Drops the elements in `range` and closes the gap with one block move.
    ///
    /// # Panics
    ///
    /// If the range is decreasing or ends past `len()`.
    pub fn remove_range(&mut self, range: Range<usize>) {
        let len = self.len;
        let Range { start, end } = range;
        if start > end {
            panic!("range start {start} exceeds end {end}");
        }
        if end > len {
            index_out_of_bounds(end, len);
        }
        if start == end {
            return;
        }

        let base = self.as_mut_ptr();
        // Elements past `start` are forgotten first so a panicking destructor
        // leaks instead of double-dropping.
        self.len = start;
        // SAFETY: [start, end) is initialized; the tail [end, len) is moved
        // down into the dropped range afterwards.
        unsafe {
            ptr::drop_in_place(slice::from_raw_parts_mut(base.add(start), end - start));
            ptr::copy(base.add(end), base.add(start), len - end);
        }
        self.len = len - (end - start);
    }

    /// Drops every element past `new_len`.
    pub fn truncate(&mut self, new_len: usize) {
        let len = self.len;
        if new_len >= len {
            return;
        }
        self.len = new_len;
        // SAFETY: [new_len, len) was initialized and is no longer live.
        unsafe {
            let tail = self.as_mut_ptr().add(new_len);
            ptr::drop_in_place(slice::from_raw_parts_mut(tail, len - new_len));
        }
    }

    /// Drops every element and sets the capacity to `slack`.
    ///
    /// ```
    /// use plinth_mem::DynArray;
    ///
    /// let mut arr: DynArray<u64> = (0..100).collect();
    /// arr.clear(8);
    /// assert!(arr.is_empty());
    /// assert_eq!(arr.capacity(), 8);
    ///
    /// arr.clear(0);
    /// assert_eq!(arr.capacity(), 0);
    /// ```
    pub fn clear(&mut self, slack: usize) {
        self.truncate(0);
        if !Self::IS_ZST && slack != self.cap {
            Self::handle_reserve(self.set_capacity(slack));
        }
    }

    /// Sets the live count, cloning `fill` into new positions or dropping the
    /// surplus.
    pub fn resize_len(&mut self, new_len: usize, fill: T)
    where
        T: Clone,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        self.reserve(new_len - self.len);
        while self.len + 1 < new_len {
            self.push(fill.clone());
        }
        self.push(fill);
    }

    /// Appends clones of every element of `other`.
    pub fn extend_from_slice(&mut self, other: &[T])
    where
        T: Clone,
    {
        self.reserve(other.len());
        for item in other {
            self.push(item.clone());
        }
    }

    /// Inserts a copy of `other` at `index`, shifting the tail once.
    ///
    /// # Panics
    ///
    /// If `index > len()`.
    pub fn insert_slice(&mut self, index: usize, other: &[T])
    where
        T: Copy,
    {
        let len = self.len;
        if index > len {
            index_out_of_bounds(index, len);
        }
        let count = other.len();
        if count == 0 {
            return;
        }
        self.reserve(count);
        // SAFETY: capacity covers len + count; `other` cannot alias our
        // storage while we hold &mut self.
        unsafe {
            let at = self.as_mut_ptr().add(index);
            ptr::copy(at, at.add(count), len - index);
            ptr::copy_nonoverlapping(other.as_ptr(), at, count);
        }
        self.len = len + count;
    }

    /// Borrowed iterator over the elements.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Mutable iterator over the elements.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }
}

impl<T, A: AllocationStrategy> Drop for DynArray<T, A> {
    fn drop(&mut self) {
        // SAFETY: drops exactly the live elements; the strategy frees the
        // storage itself when dropped.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T, A: AllocationStrategy> Default for DynArray<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: AllocationStrategy> Deref for DynArray<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: AllocationStrategy> DerefMut for DynArray<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone, A: AllocationStrategy> Clone for DynArray<T, A> {
    fn clone(&self) -> Self {
        let mut out = Self::default();
        out.extend_from_slice(self);
        out
    }
}

impl<T: fmt::Debug, A: AllocationStrategy> fmt::Debug for DynArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: AllocationStrategy, B: AllocationStrategy> PartialEq<DynArray<T, B>>
    for DynArray<T, A>
{
    fn eq(&self, other: &DynArray<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq, A: AllocationStrategy> PartialEq<[T]> for DynArray<T, A> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Eq, A: AllocationStrategy> Eq for DynArray<T, A> {}

impl<T: Hash, A: AllocationStrategy> Hash for DynArray<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, A: AllocationStrategy> Extend<T> for DynArray<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a, A: AllocationStrategy> Extend<&'a T> for DynArray<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, A: AllocationStrategy> FromIterator<T> for DynArray<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = Self::default();
        arr.extend(iter);
        arr
    }
}

impl<T: Clone, A: AllocationStrategy> From<&[T]> for DynArray<T, A> {
    fn from(slice: &[T]) -> Self {
        let mut arr = Self::default();
        arr.extend_from_slice(slice);
        arr
    }
}

impl<T, A: AllocationStrategy> From<Vec<T>> for DynArray<T, A> {
    fn from(vec: Vec<T>) -> Self {
        vec.into_iter().collect()
    }
}

impl<'a, T, A: AllocationStrategy> IntoIterator for &'a DynArray<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: AllocationStrategy> IntoIterator for &'a mut DynArray<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Owning iterator returned by [`DynArray::into_iter`].
pub struct IntoIter<T, A: AllocationStrategy = HeapAllocation> {
    array: ManuallyDrop<DynArray<T, A>>,
    front: usize,
    back: usize,
}

impl<T, A: AllocationStrategy> IntoIterator for DynArray<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        let back = self.len;
        let mut array = ManuallyDrop::new(self);
        // Ownership of the elements moves to the iterator.
        array.len = 0;
        IntoIter {
            array,
            front: 0,
            back,
        }
    }
}

impl<T, A: AllocationStrategy> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: elements in [front, back) are initialized and owned by the
        // iterator; each is read exactly once.
        let item = unsafe { self.array.as_ptr().add(self.front).read() };
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T, A: AllocationStrategy> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: as for next.
        Some(unsafe { self.array.as_ptr().add(self.back).read() })
    }
}

impl<T, A: AllocationStrategy> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: AllocationStrategy> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let remaining = self.back - self.front;
        // SAFETY: drops the elements not yet yielded, then the array, whose
        // len is 0 so only its storage is released.
        unsafe {
            let base = self.array.as_mut_ptr().add(self.front);
            ptr::drop_in_place(slice::from_raw_parts_mut(base, remaining));
            ManuallyDrop::drop(&mut self.array);
        }
    }
}
