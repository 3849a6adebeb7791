//! Chained hash set over a slot table.
//!
//! Elements live in a [`SlotTable`]; each entry records its hash and the slot
//! index of the next entry in the same bucket. The bucket array is a
//! power-of-two [`DynArray`] of chain heads, so the bucket of a hash is a
//! mask, not a modulo.
//!
//! How keys are extracted, hashed and compared is a [`KeyFuncs`] policy; how
//! many buckets to keep for a given element count is a [`BucketPolicy`].
//!
//! # Examples
//!
//! ```
//! use plinth_mem::HashSet;
//!
//! let mut names: HashSet<&str> = HashSet::new();
//! assert_eq!(names.add("core"), None);
//! assert_eq!(names.add("core"), Some("core"));
//! names.add("render");
//!
//! assert_eq!(names.len(), 2);
//! assert!(names.contains(&"core"));
//! assert!(names.remove(&"core"));
//! assert!(!names.remove(&"core"));
//! ```
//!
//! Keying tuples on their first field gives a small map:
//!
//! ```
//! use plinth_mem::PairSet;
//!
//! let mut ages: PairSet<&str, u32> = PairSet::new();
//! ages.add(("ada", 36));
//! ages.add(("ada", 37));
//!
//! assert_eq!(ages.len(), 1);
//! assert_eq!(ages.find(&"ada"), Some(&("ada", 37)));
//! ```

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::mem;

use plinth_log::debug;

use crate::array::DynArray;
use crate::slots::{SlotIndex, SlotTable};

/// How a [`HashSet`] extracts, hashes and compares keys.
pub trait KeyFuncs<T> {
    /// The part of an element that identifies it.
    type Key: ?Sized;

    /// Extracts the key of an element.
    fn key(element: &T) -> &Self::Key;

    /// Hashes a key.
    fn hash(key: &Self::Key) -> u32;

    /// Whether two keys are equal. Equal keys must hash equally.
    fn equals(a: &Self::Key, b: &Self::Key) -> bool;
}

/// Uses the whole element as its key, hashed with `fxhash`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKeyFuncs;

impl<T: Hash + Eq> KeyFuncs<T> for DefaultKeyFuncs {
    type Key = T;

    #[inline]
    fn key(element: &T) -> &T {
        element
    }

    #[inline]
    fn hash(key: &T) -> u32 {
        fxhash::hash32(key)
    }

    #[inline]
    fn equals(a: &T, b: &T) -> bool {
        a == b
    }
}

/// Keys a `(K, V)` pair on `K`, turning a set of pairs into a map.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairKeyFuncs;

impl<K: Hash + Eq, V> KeyFuncs<(K, V)> for PairKeyFuncs {
    type Key = K;

    #[inline]
    fn key(element: &(K, V)) -> &K {
        &element.0
    }

    #[inline]
    fn hash(key: &K) -> u32 {
        fxhash::hash32(key)
    }

    #[inline]
    fn equals(a: &K, b: &K) -> bool {
        a == b
    }
}

/// Bucket density policy.
pub trait BucketPolicy {
    /// Target number of elements per bucket.
    const ELEMENTS_PER_BUCKET: usize;
    /// Floor added to the computed bucket count.
    const MIN_BUCKETS: usize;
    /// Below this many elements a single bucket is used.
    const MIN_HASHED_ELEMENTS: usize;

    /// Desired bucket count for `count` elements. Always a power of two.
    fn bucket_count_for(count: usize) -> usize {
        if count >= Self::MIN_HASHED_ELEMENTS {
            (count / Self::ELEMENTS_PER_BUCKET + Self::MIN_BUCKETS).next_power_of_two()
        } else {
            1
        }
    }
}

/// Two elements per bucket, at least eight buckets once four elements are
/// stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBucketPolicy;

impl BucketPolicy for DefaultBucketPolicy {
    const ELEMENTS_PER_BUCKET: usize = 2;
    const MIN_BUCKETS: usize = 8;
    const MIN_HASHED_ELEMENTS: usize = 4;
}

#[derive(Clone)]
struct Entry<T> {
    hash: u32,
    next: SlotIndex,
    element: T,
}

/// A chained hash set with at most one element per distinct key.
pub struct HashSet<T, K = DefaultKeyFuncs, P = DefaultBucketPolicy> {
    slots: SlotTable<Entry<T>>,
    buckets: DynArray<SlotIndex>,
    _policy: PhantomData<fn() -> (K, P)>,
}

/// A map-like set of `(K, V)` pairs keyed on `K`.
pub type PairSet<K, V, P = DefaultBucketPolicy> = HashSet<(K, V), PairKeyFuncs, P>;

impl<T, K, P> HashSet<T, K, P>
where
    K: KeyFuncs<T>,
    P: BucketPolicy,
{
    /// Creates an empty set. No buckets are allocated until the first add.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: SlotTable::new(),
            buckets: DynArray::new(),
            _policy: PhantomData,
        }
    }

    /// Creates an empty set sized for `count` elements.
    #[must_use]
    pub fn with_capacity(count: usize) -> Self {
        let mut set = Self::new();
        set.reserve(count);
        set
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the set holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of buckets. Zero or a power of two.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    fn bucket_of(&self, hash: u32) -> usize {
        hash as usize & (self.buckets.len() - 1)
    }

    fn find_slot(&self, key: &K::Key, hash: u32) -> Option<SlotIndex> {
        if self.buckets.is_empty() {
            return None;
        }
        let mut cursor = self.buckets[self.bucket_of(hash)];
        while !cursor.is_invalid() {
            let entry = &self.slots[cursor];
            if entry.hash == hash && K::equals(K::key(&entry.element), key) {
                return Some(cursor);
            }
            cursor = entry.next;
        }
        None
    }

    /// Adds an element.
    ///
    /// If an element with an equal key is present it is overwritten in place
    /// and returned; the set does not grow. Otherwise the element is linked at
    /// the head of its bucket chain, rehashing first if the density policy
    /// asks for more buckets.
    pub fn add(&mut self, element: T) -> Option<T> {
        let hash = K::hash(K::key(&element));
        if let Some(index) = self.find_slot(K::key(&element), hash) {
            return Some(mem::replace(&mut self.slots[index].element, element));
        }

        self.check_rehash(self.len() + 1);
        let bucket = self.bucket_of(hash);
        let head = self.buckets[bucket];
        let index = self.slots.insert(Entry {
            hash,
            next: head,
            element,
        });
        self.buckets[bucket] = index;
        None
    }

    /// The element stored under `key`.
    pub fn find(&self, key: &K::Key) -> Option<&T> {
        let index = self.find_slot(key, K::hash(key))?;
        Some(&self.slots[index].element)
    }

    /// The element stored under `key`, for mutation.
    ///
    /// The element's key must not be changed through the returned reference.
    pub fn find_mut(&mut self, key: &K::Key) -> Option<&mut T> {
        let index = self.find_slot(key, K::hash(key))?;
        Some(&mut self.slots[index].element)
    }

    /// Whether an element with `key` is present.
    pub fn contains(&self, key: &K::Key) -> bool {
        self.find_slot(key, K::hash(key)).is_some()
    }

    /// Removes the element stored under `key`. Returns `false` if there was
    /// none.
    pub fn remove(&mut self, key: &K::Key) -> bool {
        self.take(key).is_some()
    }

    /// Removes and returns the element stored under `key`.
    pub fn take(&mut self, key: &K::Key) -> Option<T> {
        if self.buckets.is_empty() {
            return None;
        }
        let hash = K::hash(key);
        let bucket = self.bucket_of(hash);

        let mut previous = SlotIndex::INVALID;
        let mut cursor = self.buckets[bucket];
        while !cursor.is_invalid() {
            let entry = &self.slots[cursor];
            let next = entry.next;
            if entry.hash == hash && K::equals(K::key(&entry.element), key) {
                if previous.is_invalid() {
                    self.buckets[bucket] = next;
                } else {
                    self.slots[previous].next = next;
                }
                return self.slots.remove(cursor).map(|entry| entry.element);
            }
            previous = cursor;
            cursor = next;
        }
        None
    }

    /// Makes room for `additional` more elements, rehashing up front if the
    /// larger count calls for more buckets.
    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
        self.check_rehash(self.len() + additional);
    }

    fn check_rehash(&mut self, count: usize) {
        let desired = P::bucket_count_for(count);
        if desired > self.buckets.len() {
            self.rehash(desired);
        }
    }

    /// Rebuilds the bucket array with `bucket_count` buckets (rounded up to a
    /// power of two) and relinks every element in slot order.
    ///
    /// Slot positions are untouched; only the chains change.
    pub fn rehash(&mut self, bucket_count: usize) {
        let count = bucket_count.max(1).next_power_of_two();
        self.buckets.clear(count);
        self.buckets.resize_len(count, SlotIndex::INVALID);

        let mask = count - 1;
        for (index, entry) in self.slots.iter_mut() {
            let bucket = entry.hash as usize & mask;
            entry.next = self.buckets[bucket];
            self.buckets[bucket] = index;
        }
        debug!(
            "rehashed {} elements into {} buckets",
            self.slots.len(),
            count
        );
    }

    /// Drops every element. Keeps room for `slack` elements, or releases all
    /// storage when `slack` is zero.
    pub fn clear(&mut self, slack: usize) {
        self.slots.clear(slack);
        self.buckets.clear(0);
        if slack > 0 {
            self.rehash(P::bucket_count_for(slack));
        }
    }

    /// Moves every element into a new set, leaving this one with no buckets.
    #[must_use]
    pub fn take_all(&mut self) -> Self {
        mem::take(self)
    }

    /// Iterates over the elements in slot order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.slots.iter().map(|(_, entry)| &entry.element)
    }
}

impl<T, K: KeyFuncs<T>, P: BucketPolicy> Default for HashSet<T, K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, K, P> Clone for HashSet<T, K, P> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            buckets: self.buckets.clone(),
            _policy: PhantomData,
        }
    }
}

impl<T: fmt::Debug, K: KeyFuncs<T>, P: BucketPolicy> fmt::Debug for HashSet<T, K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, K: KeyFuncs<T>, P: BucketPolicy> Extend<T> for HashSet<T, K, P> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for element in iter {
            self.add(element);
        }
    }
}

impl<T, K: KeyFuncs<T>, P: BucketPolicy> FromIterator<T> for HashSet<T, K, P> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sends every key to the same bucket to exercise chain handling.
    struct Colliding;

    impl KeyFuncs<u32> for Colliding {
        type Key = u32;

        fn key(element: &u32) -> &u32 {
            element
        }

        fn hash(_key: &u32) -> u32 {
            7
        }

        fn equals(a: &u32, b: &u32) -> bool {
            a == b
        }
    }

    #[test]
    fn test_bucket_count_for() {
        assert_eq!(DefaultBucketPolicy::bucket_count_for(0), 1);
        assert_eq!(DefaultBucketPolicy::bucket_count_for(3), 1);
        assert_eq!(DefaultBucketPolicy::bucket_count_for(4), 16);
        assert_eq!(DefaultBucketPolicy::bucket_count_for(16), 16);
        assert_eq!(DefaultBucketPolicy::bucket_count_for(17), 32);
        assert_eq!(DefaultBucketPolicy::bucket_count_for(100), 64);
    }

    #[test]
    fn test_no_buckets_until_first_add() {
        let mut set: HashSet<u32> = HashSet::new();
        assert_eq!(set.bucket_count(), 0);
        assert!(!set.contains(&1));
        assert!(!set.remove(&1));

        set.add(1);
        assert_eq!(set.bucket_count(), 1);
    }

    #[test]
    fn test_add_find_remove() {
        let mut set: HashSet<String> = HashSet::new();
        for word in ["alpha", "beta", "gamma", "delta", "epsilon"] {
            assert!(set.add(word.to_string()).is_none());
        }
        assert_eq!(set.len(), 5);
        assert_eq!(set.find(&"gamma".to_string()).map(String::as_str), Some("gamma"));

        assert_eq!(set.take(&"beta".to_string()).as_deref(), Some("beta"));
        assert!(set.find(&"beta".to_string()).is_none());
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_duplicate_add_overwrites_in_place() {
        let mut map: PairSet<u32, &str> = PairSet::new();
        map.add((1, "one"));
        let buckets = map.bucket_count();

        assert_eq!(map.add((1, "uno")), Some((1, "one")));
        assert_eq!(map.len(), 1);
        assert_eq!(map.bucket_count(), buckets);
        assert_eq!(map.find(&1), Some(&(1, "uno")));
    }

    #[test]
    fn test_rehash_sequence_preserves_membership() {
        let mut set: HashSet<u64> = HashSet::new();
        let mut seen_counts = vec![];
        for n in 0..1000 {
            set.add(n);
            if seen_counts.last() != Some(&set.bucket_count()) {
                seen_counts.push(set.bucket_count());
            }
        }
        assert_eq!(seen_counts, vec![1, 16, 32, 64, 128, 256, 512]);
        assert!((0..1000).all(|n| set.contains(&n)));
        assert!(set.bucket_count().is_power_of_two());
    }

    #[test]
    fn test_colliding_chain_add_and_unlink() {
        let mut set: HashSet<u32, Colliding> = HashSet::new();
        for n in 0..8 {
            set.add(n);
        }
        // Remove head, middle and tail of the single chain.
        assert!(set.remove(&7));
        assert!(set.remove(&3));
        assert!(set.remove(&0));
        assert!(!set.remove(&3));

        let mut left: Vec<_> = set.iter().copied().collect();
        left.sort_unstable();
        assert_eq!(left, vec![1, 2, 4, 5, 6]);
        assert!(left.iter().all(|n| set.contains(n)));
    }

    #[test]
    fn test_removed_slots_are_reused() {
        let mut set: HashSet<u32> = (0..10).collect();
        let slots = set.slots.slot_count();
        set.remove(&4);
        set.remove(&5);
        set.add(40);
        set.add(50);
        assert_eq!(set.slots.slot_count(), slots);
        assert_eq!(set.len(), 10);
    }

    #[test]
    fn test_reserve_rehashes_once() {
        let mut set: HashSet<u32> = HashSet::new();
        set.reserve(100);
        let buckets = set.bucket_count();
        assert_eq!(buckets, 64);
        for n in 0..100 {
            set.add(n);
        }
        assert_eq!(set.bucket_count(), buckets);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original: HashSet<u32> = (0..20).collect();
        let copy = original.clone();
        original.remove(&3);

        assert!(copy.contains(&3));
        assert_eq!(copy.len(), 20);
        assert_eq!(copy.bucket_count(), original.bucket_count());
    }

    #[test]
    fn test_take_all_leaves_no_buckets() {
        let mut source: HashSet<u32> = (0..6).collect();
        let moved = source.take_all();

        assert_eq!(source.bucket_count(), 0);
        assert!(source.is_empty());
        assert_eq!(moved.len(), 6);
        assert!(moved.contains(&5));
    }

    #[test]
    fn test_clear_with_and_without_slack() {
        let mut set: HashSet<u32> = (0..50).collect();
        set.clear(10);
        assert!(set.is_empty());
        assert_eq!(set.bucket_count(), 16);
        assert!(!set.contains(&1));

        set.add(1);
        assert!(set.contains(&1));

        set.clear(0);
        assert_eq!(set.bucket_count(), 0);
    }

    #[test]
    fn test_find_mut_updates_value() {
        let mut map: PairSet<&str, u32> = PairSet::new();
        map.add(("hits", 0));
        if let Some(entry) = map.find_mut(&"hits") {
            entry.1 += 5;
        }
        assert_eq!(map.find(&"hits").map(|e| e.1), Some(5));
    }

    #[test]
    fn test_debug_lists_elements() {
        let set: HashSet<u8> = [3].into_iter().collect();
        assert_eq!(format!("{set:?}"), "{3}");
    }
}
