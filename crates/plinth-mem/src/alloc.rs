//! Allocation strategies for contiguous containers.
//!
//! A strategy owns the raw storage behind a [`DynArray`](crate::DynArray) and
//! decides how far it grows. Containers never talk to `std::alloc` directly:
//! they ask the strategy for its current allocation, tell it to resize to an
//! exact element capacity and ask it for the next capacity when full.
//!
//! Two strategies are provided:
//!
//! - [`HeapAllocation`]: plain `realloc`-based heap storage with doubling
//!   growth.
//! - [`InlineAllocation`]: a fixed inline buffer that spills to the heap once
//!   the requested capacity no longer fits, used for short-lived scratch
//!   arrays such as match positions during a replace.
//!
//! Strategies deal in bytes and element [`Layout`]s, never in typed values:
//! constructing and dropping elements is the container's job.

use std::alloc::{self, Layout};
use std::mem::MaybeUninit;
use std::ptr::{self, NonNull};

use crate::error::{Error, Result};

/// Raw storage provider for contiguous containers.
///
/// # Safety
///
/// Implementors must guarantee that after a successful
/// `resize(used, capacity, elem)` with `capacity > 0`:
///
/// - [`allocation`](Self::allocation) and
///   [`allocation_mut`](Self::allocation_mut) return `Some` pointer aligned to
///   `elem.align()` and valid for reads and writes of
///   `capacity * elem.size()` bytes until the next `resize` or drop;
/// - the first `used * elem.size()` bytes hold the same contents they held
///   before the call.
///
/// After `resize(_, 0, _)`, both accessors return `None`. Dropping the
/// strategy releases its storage without running any element destructors.
pub unsafe trait AllocationStrategy: Default {
    /// Current storage, or `None` when nothing is allocated.
    fn allocation(&self) -> Option<NonNull<u8>>;

    /// Current storage for writing, or `None` when nothing is allocated.
    fn allocation_mut(&mut self) -> Option<NonNull<u8>>;

    /// Reallocates to exactly `capacity` elements of layout `elem`, keeping
    /// the first `used` elements. A capacity of zero releases the storage.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityOverflow`] if the byte size overflows, or
    /// [`Error::AllocationFailed`] if the allocator refuses. The previous
    /// storage is left untouched on error.
    fn resize(&mut self, used: usize, capacity: usize, elem: Layout) -> Result<()>;

    /// Capacity to grow to when `required` elements no longer fit in
    /// `capacity`. Must return at least `required`.
    fn next_capacity(&self, required: usize, capacity: usize, elem: Layout) -> usize;

    /// Capacity a freshly constructed container starts with.
    fn default_capacity(&self) -> usize;
}

/// Smallest non-zero capacity handed out by the doubling growth formula.
const fn min_non_zero_cap(elem_size: usize) -> usize {
    if elem_size == 1 {
        8
    } else if elem_size <= 1024 {
        4
    } else {
        1
    }
}

/// Doubling growth shared by the provided strategies.
#[must_use]
pub fn grow_capacity(required: usize, capacity: usize, elem: Layout) -> usize {
    capacity
        .saturating_mul(2)
        .max(required)
        .max(min_non_zero_cap(elem.size()))
}

fn array_layout(capacity: usize, elem: Layout) -> Result<Layout> {
    let size = elem
        .size()
        .checked_mul(capacity)
        .ok_or(Error::CapacityOverflow)?;
    Layout::from_size_align(size, elem.align()).map_err(|_| Error::CapacityOverflow)
}

/// Heap storage obtained from the global allocator.
///
/// Grows by doubling, with a small minimum capacity that depends on the
/// element size (8 for bytes, 4 for elements up to 1 KiB, 1 beyond that).
pub struct HeapAllocation {
    ptr: Option<NonNull<u8>>,
    layout: Layout,
}

// SAFETY: HeapAllocation uniquely owns its bytes; nothing is shared.
unsafe impl Send for HeapAllocation {}
// SAFETY: shared access only hands out the pointer value.
unsafe impl Sync for HeapAllocation {}

impl HeapAllocation {
    /// Bytes currently allocated.
    #[must_use]
    pub fn allocated_bytes(&self) -> usize {
        if self.ptr.is_some() { self.layout.size() } else { 0 }
    }

    fn release(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            // SAFETY: ptr was returned by alloc/realloc with self.layout.
            unsafe { alloc::dealloc(ptr.as_ptr(), self.layout) };
        }
    }
}

impl Default for HeapAllocation {
    fn default() -> Self {
        Self {
            ptr: None,
            layout: Layout::new::<()>(),
        }
    }
}

impl Drop for HeapAllocation {
    fn drop(&mut self) {
        self.release();
    }
}

// SAFETY: storage comes straight from the global allocator with the
// requested layout, and realloc preserves the common prefix.
unsafe impl AllocationStrategy for HeapAllocation {
    #[inline]
    fn allocation(&self) -> Option<NonNull<u8>> {
        self.ptr
    }

    #[inline]
    fn allocation_mut(&mut self) -> Option<NonNull<u8>> {
        self.ptr
    }

    fn resize(&mut self, _used: usize, capacity: usize, elem: Layout) -> Result<()> {
        if capacity == 0 || elem.size() == 0 {
            self.release();
            return Ok(());
        }

        let new_layout = array_layout(capacity, elem)?;
        let raw = match self.ptr {
            None => {
                // SAFETY: new_layout has a non-zero size.
                unsafe { alloc::alloc(new_layout) }
            }
            Some(old) => {
                crate::ensure!(
                    self.layout.align() == new_layout.align(),
                    "element alignment changed from {} to {}",
                    self.layout.align(),
                    new_layout.align()
                );
                // SAFETY: old was allocated with self.layout, the new size is
                // non-zero and was validated by Layout::from_size_align.
                unsafe { alloc::realloc(old.as_ptr(), self.layout, new_layout.size()) }
            }
        };

        let ptr = NonNull::new(raw).ok_or(Error::AllocationFailed {
            bytes: new_layout.size(),
        })?;
        self.ptr = Some(ptr);
        self.layout = new_layout;
        Ok(())
    }

    fn next_capacity(&self, required: usize, capacity: usize, elem: Layout) -> usize {
        grow_capacity(required, capacity, elem)
    }

    fn default_capacity(&self) -> usize {
        0
    }
}

/// Maximum element alignment [`InlineAllocation`] can store inline.
pub const INLINE_ALIGNMENT: usize = 16;

#[repr(C, align(16))]
struct InlineBuffer<const BYTES: usize>([MaybeUninit<u8>; BYTES]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Storage {
    Empty,
    Inline,
    Heap,
}

/// Inline storage of `BYTES` bytes that spills to the heap when outgrown.
///
/// While the requested capacity fits in the inline buffer no heap allocation
/// happens at all. Growing past it moves the live elements to a
/// [`HeapAllocation`]; shrinking back below it moves them home again.
/// Elements aligned above [`INLINE_ALIGNMENT`] always live on the heap.
///
/// ```
/// use plinth_mem::{DynArray, InlineAllocation};
///
/// let mut positions: DynArray<u32, InlineAllocation<64>> = DynArray::default();
/// positions.extend_from_slice(&[1, 5, 9]);
/// assert!(positions.allocator().is_inline());
///
/// positions.extend((0..100).collect::<Vec<u32>>());
/// assert!(!positions.allocator().is_inline());
/// assert_eq!(&positions[..3], &[1, 5, 9]);
/// ```
pub struct InlineAllocation<const BYTES: usize> {
    inline: InlineBuffer<BYTES>,
    heap: HeapAllocation,
    storage: Storage,
}

impl<const BYTES: usize> InlineAllocation<BYTES> {
    /// Whether elements currently live in the inline buffer.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.storage == Storage::Inline
    }

    fn fits_inline(capacity: usize, elem: Layout) -> bool {
        elem.align() <= INLINE_ALIGNMENT
            && elem
                .size()
                .checked_mul(capacity)
                .is_some_and(|bytes| bytes <= BYTES)
    }

    fn inline_ptr(&mut self) -> NonNull<u8> {
        NonNull::from(&mut self.inline).cast()
    }
}

impl<const BYTES: usize> Default for InlineAllocation<BYTES> {
    fn default() -> Self {
        Self {
            inline: InlineBuffer([MaybeUninit::uninit(); BYTES]),
            heap: HeapAllocation::default(),
            storage: Storage::Empty,
        }
    }
}

// SAFETY: the inline buffer is 16-byte aligned and only used for layouts
// that fit it; live bytes are copied whenever storage moves between the
// inline buffer and the heap.
unsafe impl<const BYTES: usize> AllocationStrategy for InlineAllocation<BYTES> {
    fn allocation(&self) -> Option<NonNull<u8>> {
        match self.storage {
            Storage::Empty => None,
            Storage::Inline => Some(NonNull::from(&self.inline).cast()),
            Storage::Heap => self.heap.allocation(),
        }
    }

    fn allocation_mut(&mut self) -> Option<NonNull<u8>> {
        match self.storage {
            Storage::Empty => None,
            Storage::Inline => Some(self.inline_ptr()),
            Storage::Heap => self.heap.allocation_mut(),
        }
    }

    fn resize(&mut self, used: usize, capacity: usize, elem: Layout) -> Result<()> {
        if capacity == 0 || elem.size() == 0 {
            self.heap.release();
            self.storage = Storage::Empty;
            return Ok(());
        }

        crate::ensure!(used <= capacity, "keeping {} elements in capacity {}", used, capacity);
        let used_bytes = used * elem.size();

        if Self::fits_inline(capacity, elem) {
            if self.storage == Storage::Heap {
                if let Some(src) = self.heap.allocation() {
                    let dst = self.inline_ptr();
                    // SAFETY: both regions hold at least used_bytes and are
                    // distinct allocations.
                    unsafe { ptr::copy_nonoverlapping(src.as_ptr(), dst.as_ptr(), used_bytes) };
                }
                self.heap.release();
            }
            self.storage = Storage::Inline;
            return Ok(());
        }

        match self.storage {
            Storage::Heap => self.heap.resize(used, capacity, elem)?,
            Storage::Empty => self.heap.resize(0, capacity, elem)?,
            Storage::Inline => {
                let mut heap = HeapAllocation::default();
                heap.resize(0, capacity, elem)?;
                if let Some(dst) = heap.allocation_mut() {
                    let src = self.inline_ptr();
                    // SAFETY: the inline buffer holds used_bytes live bytes
                    // and the fresh heap block is at least that large.
                    unsafe { ptr::copy_nonoverlapping(src.as_ptr(), dst.as_ptr(), used_bytes) };
                }
                self.heap = heap;
            }
        }
        self.storage = Storage::Heap;
        Ok(())
    }

    fn next_capacity(&self, required: usize, capacity: usize, elem: Layout) -> usize {
        if Self::fits_inline(required, elem) && elem.size() > 0 {
            BYTES / elem.size()
        } else {
            grow_capacity(required, capacity, elem)
        }
    }

    fn default_capacity(&self) -> usize {
        0
    }
}
