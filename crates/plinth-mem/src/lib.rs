//! Plinth memory and container infrastructure
//!
//! This crate provides the general-purpose containers of the plinth
//! foundation layer:
//!
//! - **Allocation strategies**: heap and inline-with-spill storage behind the
//!   [`AllocationStrategy`] trait
//! - **[`DynArray`]**: a growable contiguous array over any strategy
//! - **[`SlotTable`]**: index-stable storage with free-list slot reuse
//! - **[`HashSet`]**: a chained hash set over a slot table, with pluggable key
//!   and bucket-density policies
//! - **String interning**: a deduplicating [`StringPool`], its thread-safe
//!   [`SharedStringPool`] wrapper and the process-wide [`global_pool`]
//!   (requires the `interner` feature, on by default)
//!
//! Internal invariants are checked with [`ensure!`] in debug builds or when
//! the `contracts` feature is enabled.

pub mod alloc;
pub mod arena;
pub mod array;
pub mod contract;
pub mod entry_id;
pub mod error;
pub mod set;
pub mod slots;

#[cfg(feature = "interner")]
pub mod interner;

pub use alloc::{AllocationStrategy, HeapAllocation, InlineAllocation};
pub use array::DynArray;
pub use entry_id::EntryId;
pub use error::{Error, Result};
pub use set::{
    BucketPolicy, DefaultBucketPolicy, DefaultKeyFuncs, HashSet, KeyFuncs, PairKeyFuncs, PairSet,
};
pub use slots::{SlotIndex, SlotTable};

#[cfg(feature = "interner")]
pub use interner::{SharedStringPool, StringPool, global_pool};
