//! Chunked byte arena for string bodies.
//!
//! [`ByteArena`] appends string bodies into a list of fixed-capacity chunks.
//! A chunk is never grown past the capacity it was created with, so storing a
//! new body never copies earlier ones. Bodies are addressed by a [`StrSpan`]
//! (chunk, offset, length) instead of a pointer, which keeps the arena free of
//! lifetimes and `unsafe`.
//!
//! Chunk sizes start at the requested size (at least 8 KiB) and double up to
//! 1 MiB. A body larger than the next chunk gets a chunk of its own size.
//!
//! # Examples
//!
//! ```
//! use plinth_mem::arena::ByteArena;
//!
//! let mut arena = ByteArena::new(8192);
//! let hello = arena.alloc_str("hello");
//! let world = arena.alloc_str("world");
//!
//! assert_eq!(arena.get(hello), Some("hello"));
//! assert_eq!(arena.get(world), Some("world"));
//! assert_eq!(arena.stats().total_allocated, 10);
//! ```

/// Minimum chunk size (8 KiB).
pub const MIN_CHUNK_SIZE: usize = 8192;

/// Maximum chunk size reached by doubling (1 MiB).
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Arena allocation statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaStats {
    /// Total number of bytes stored across all chunks.
    pub total_allocated: usize,
    /// Number of chunks in the arena.
    pub chunk_count: usize,
    /// Total capacity of all chunks in bytes.
    pub total_capacity: usize,
}

/// Location of one body inside a [`ByteArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrSpan {
    chunk: usize,
    start: usize,
    len: usize,
}

impl StrSpan {
    /// Length of the body in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        self.len
    }

    /// Whether the body is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Append-only storage for string bodies.
#[derive(Debug)]
pub struct ByteArena {
    chunks: Vec<String>,
    next_chunk_size: usize,
    total_allocated: usize,
}

impl ByteArena {
    /// Creates an arena whose first chunk holds `chunk_size` bytes.
    ///
    /// The first chunk is allocated lazily on the first store.
    #[must_use]
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunks: Vec::new(),
            next_chunk_size: chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE),
            total_allocated: 0,
        }
    }

    fn has_room(&self, bytes: usize) -> bool {
        self.chunks
            .last()
            .is_some_and(|chunk| chunk.capacity() - chunk.len() >= bytes)
    }

    /// Copies `s` into the arena and returns where it lives.
    pub fn alloc_str(&mut self, s: &str) -> StrSpan {
        if !self.has_room(s.len()) {
            let size = self.next_chunk_size.max(s.len());
            self.chunks.push(String::with_capacity(size));
            self.next_chunk_size = (self.next_chunk_size * 2).min(MAX_CHUNK_SIZE);
        }

        let chunk_index = self.chunks.len() - 1;
        let chunk = &mut self.chunks[chunk_index];
        let start = chunk.len();
        chunk.push_str(s);
        self.total_allocated += s.len();

        StrSpan {
            chunk: chunk_index,
            start,
            len: s.len(),
        }
    }

    /// The body stored at `span`, or `None` if the span is not from this
    /// arena.
    #[must_use]
    pub fn get(&self, span: StrSpan) -> Option<&str> {
        self.chunks
            .get(span.chunk)?
            .get(span.start..span.start + span.len)
    }

    /// Returns allocation statistics.
    #[must_use]
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            total_allocated: self.total_allocated,
            chunk_count: self.chunks.len(),
            total_capacity: self.chunks.iter().map(String::capacity).sum(),
        }
    }
}

impl Default for ByteArena {
    fn default() -> Self {
        Self::new(MIN_CHUNK_SIZE)
    }
}
