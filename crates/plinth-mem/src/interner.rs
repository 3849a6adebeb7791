//! String pool mapping bodies to small stable identifiers.
//!
//! [`StringPool`] deduplicates string bodies: storing the same body twice
//! returns the same [`EntryId`], and an id resolves back to its body for as
//! long as the pool lives. Bodies are copied into a [`ByteArena`]; lookup goes
//! through a `hashbrown` [`HashTable`] keyed by an `fxhash` of the body.
//!
//! [`SharedStringPool`] wraps a pool in an `RwLock` so it can be shared across
//! threads. Lookups of already-stored bodies only take the read lock.
//! [`global_pool`] is the process-wide shared pool: it is created on first use
//! and never torn down. Explicit pools are torn down by dropping them; ids from
//! one pool mean nothing to another.
//!
//! # Examples
//!
//! ```
//! use plinth_mem::StringPool;
//!
//! let mut pool = StringPool::new();
//!
//! let a = pool.find_or_store("Mesh");
//! let b = pool.find_or_store("Mesh");
//! let c = pool.find_or_store("Texture");
//!
//! assert_eq!(a, b);
//! assert_ne!(a, c);
//! assert_eq!(pool.find(a), Some("Mesh"));
//! ```

use std::sync::{OnceLock, PoisonError, RwLock};

use hashbrown::HashTable;
use plinth_log::trace;

use crate::arena::{ByteArena, StrSpan};
use crate::array::DynArray;
use crate::entry_id::EntryId;

fn hash_body(body: &str) -> u64 {
    fxhash::hash64(body)
}

/// Single-threaded string pool.
pub struct StringPool {
    arena: ByteArena,
    entries: DynArray<StrSpan>,
    table: HashTable<(u64, EntryId)>,
}

impl StringPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: ByteArena::default(),
            entries: DynArray::new(),
            table: HashTable::new(),
        }
    }

    fn body(&self, id: EntryId) -> Option<&str> {
        let span = *self.entries.at(id.as_usize()).ok()?;
        self.arena.get(span)
    }

    /// The id of `body` if it has been stored, without storing it.
    #[must_use]
    pub fn lookup(&self, body: &str) -> Option<EntryId> {
        let hash = hash_body(body);
        self.table
            .find(hash, |&(h, id)| h == hash && self.body(id) == Some(body))
            .map(|&(_, id)| id)
    }

    /// Returns the id of `body`, storing it first if needed.
    ///
    /// # Panics
    ///
    /// If the pool already holds `u32::MAX - 1` distinct bodies.
    pub fn find_or_store(&mut self, body: &str) -> EntryId {
        if let Some(id) = self.lookup(body) {
            return id;
        }

        let id = match u32::try_from(self.entries.len()) {
            Ok(raw) if raw != u32::MAX => EntryId::new(raw),
            _ => panic!("string pool exhausted"),
        };
        let span = self.arena.alloc_str(body);
        self.entries.push(span);
        let hash = hash_body(body);
        self.table.insert_unique(hash, (hash, id), |&(h, _)| h);
        trace!("stored {:?} as {}", body, id);
        id
    }

    /// The body stored under `id`, or `None` if this pool never issued it.
    #[must_use]
    pub fn find(&self, id: EntryId) -> Option<&str> {
        self.body(id)
    }

    /// Number of distinct bodies stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes held by the backing arena.
    #[must_use]
    pub fn arena_stats(&self) -> crate::arena::ArenaStats {
        self.arena.stats()
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe string pool.
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use plinth_mem::SharedStringPool;
///
/// let pool = Arc::new(SharedStringPool::new());
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let pool = Arc::clone(&pool);
///         thread::spawn(move || pool.find_or_store("Shader"))
///     })
///     .collect();
///
/// let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
/// assert!(ids.windows(2).all(|w| w[0] == w[1]));
/// assert_eq!(pool.len(), 1);
/// ```
#[derive(Default)]
pub struct SharedStringPool {
    inner: RwLock<StringPool>,
}

impl SharedStringPool {
    /// Creates an empty shared pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `body`, storing it first if needed.
    ///
    /// Takes the read lock first and only upgrades to the write lock when the
    /// body is new.
    pub fn find_or_store(&self, body: &str) -> EntryId {
        {
            let pool = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(id) = pool.lookup(body) {
                return id;
            }
        }
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .find_or_store(body)
    }

    /// The id of `body` if it has been stored.
    pub fn lookup(&self, body: &str) -> Option<EntryId> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lookup(body)
    }

    /// Runs `f` on the body stored under `id` while holding the read lock.
    pub fn resolve_with<R>(&self, id: EntryId, f: impl FnOnce(Option<&str>) -> R) -> R {
        let pool = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(pool.find(id))
    }

    /// A copy of the body stored under `id`.
    pub fn resolve_owned(&self, id: EntryId) -> Option<String> {
        self.resolve_with(id, |body| body.map(str::to_owned))
    }

    /// Number of distinct bodies stored.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The process-wide string pool, created on first use.
pub fn global_pool() -> &'static SharedStringPool {
    static POOL: OnceLock<SharedStringPool> = OnceLock::new();
    POOL.get_or_init(SharedStringPool::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_deduplicates() {
        let mut pool = StringPool::new();
        let a = pool.find_or_store("myVariable");
        let b = pool.find_or_store("myVariable");
        let c = pool.find_or_store("otherVariable");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_pool_ids_are_sequential() {
        let mut pool = StringPool::new();
        for (n, body) in ["a", "b", "c"].iter().enumerate() {
            assert_eq!(pool.find_or_store(body).as_usize(), n);
        }
    }

    #[test]
    fn test_pool_find_unknown_id() {
        let mut pool = StringPool::new();
        pool.find_or_store("only");
        assert_eq!(pool.find(EntryId::new(9999)), None);
        assert_eq!(pool.find(EntryId::INVALID), None);
    }

    #[test]
    fn test_pool_lookup_does_not_store() {
        let mut pool = StringPool::new();
        assert_eq!(pool.lookup("ghost"), None);
        assert!(pool.is_empty());

        let id = pool.find_or_store("ghost");
        assert_eq!(pool.lookup("ghost"), Some(id));
    }

    #[test]
    fn test_pool_many_bodies() {
        let mut pool = StringPool::new();
        let ids: Vec<_> = (0..2000)
            .map(|n| pool.find_or_store(&format!("identifier_{n}")))
            .collect();

        assert_eq!(pool.len(), 2000);
        for (n, id) in ids.iter().enumerate() {
            assert_eq!(pool.find(*id), Some(format!("identifier_{n}").as_str()));
            assert_eq!(pool.find_or_store(&format!("identifier_{n}")), *id);
        }
    }

    #[test]
    fn test_pool_empty_and_unicode_bodies() {
        let mut pool = StringPool::new();
        let empty = pool.find_or_store("");
        let cjk = pool.find_or_store("变量");
        assert_eq!(pool.find(empty), Some(""));
        assert_eq!(pool.find(cjk), Some("变量"));
    }

    #[test]
    fn test_shared_pool_resolve() {
        let pool = SharedStringPool::new();
        let id = pool.find_or_store("Light");
        assert_eq!(pool.lookup("Light"), Some(id));
        assert_eq!(pool.resolve_owned(id).as_deref(), Some("Light"));
        assert_eq!(pool.resolve_with(id, |body| body.map(str::len)), Some(5));
        assert_eq!(pool.resolve_owned(EntryId::INVALID), None);
    }

    #[test]
    fn test_global_pool_is_shared() {
        let id = global_pool().find_or_store("plinth::global_pool_test");
        assert_eq!(global_pool().find_or_store("plinth::global_pool_test"), id);
        assert_eq!(
            global_pool().resolve_owned(id).as_deref(),
            Some("plinth::global_pool_test")
        );
    }
}
