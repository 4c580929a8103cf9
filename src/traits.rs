//! Table trait hierarchy.
//!
//! This module defines the contract shared by the collision-resolution
//! strategies, plus the resize extension implemented by the strategies that
//! support an explicit resize.
//!
//! ## Architecture
//!
//! ```text
//!                ┌──────────────────────────────────────────┐
//!                │              CoreTable<V>                │
//!                │                                          │
//!                │  insert(&mut, String, V) → Option<V>     │
//!                │  find(&, &str) → Option<&V>              │
//!                │  contains(&, &str) → bool                │
//!                │  len(&) / is_empty(&) → usize / bool     │
//!                │  capacity(&) → usize                     │
//!                │  load_factor(&) → f64                    │
//!                │  clear(&mut)                             │
//!                └────────────────────┬─────────────────────┘
//!                                     │
//!                                     ▼
//!                ┌──────────────────────────────────────────┐
//!                │           ResizableTable<V>              │
//!                │                                          │
//!                │  resize(&mut, usize) → Result<(), _>     │
//!                └──────────────────────────────────────────┘
//! ```
//!
//! All three strategies implement [`CoreTable`]. [`ResizableTable`] is
//! implemented where an explicit resize is part of the contract
//! (open addressing, chaining, cuckoo); the lossy
//! [`GrowthPolicy::Overwrite`](crate::table::open_addressing::GrowthPolicy)
//! mode still supports it, it just never resizes on its own.
//!
//! ## Failure semantics
//!
//! A miss is a normal `None`, never an error. Inserts cannot fail: capacity
//! exhaustion and relocation cycles are recovered internally by
//! resize-then-retry. The only `Result` in the hierarchy is explicit
//! [`resize`](ResizableTable::resize), which rejects capacities the table
//! cannot honor.

use crate::error::ConfigError;

/// Operations every collision-resolution strategy supports.
///
/// Keys are strings; values are any payload the caller stores. Duplicate
/// inserts are last-write-wins: inserting a present key replaces its value
/// and returns the previous one.
///
/// # Example
///
/// ```
/// use hashkit::hash::FxSeedHasher;
/// use hashkit::table::chained::ChainedTable;
/// use hashkit::traits::CoreTable;
///
/// fn warm<T: CoreTable<i32>>(table: &mut T, pairs: &[(&str, i32)]) {
///     for (key, value) in pairs {
///         table.insert(key.to_string(), *value);
///     }
/// }
///
/// let mut table = ChainedTable::with_capacity(8, FxSeedHasher::new(1)).unwrap();
/// warm(&mut table, &[("a", 1), ("b", 2)]);
/// assert_eq!(table.len(), 2);
/// ```
pub trait CoreTable<V> {
    /// Inserts a key-value pair, returning the previous value if the key
    /// was already present.
    fn insert(&mut self, key: String, value: V) -> Option<V>;

    /// Looks up a key. A miss is a normal `None`.
    fn find(&self, key: &str) -> Option<&V>;

    /// Checks key presence without borrowing the value.
    fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Returns the number of stored entries.
    fn len(&self) -> usize;

    /// Returns `true` if no entries are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current slot capacity (bucket count for chaining,
    /// per-lane slot count for cuckoo).
    fn capacity(&self) -> usize;

    /// Ratio of stored entries to slot capacity.
    fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Removes all entries, keeping the current capacity.
    fn clear(&mut self);
}

/// Tables that support an explicit, caller-driven resize.
pub trait ResizableTable<V>: CoreTable<V> {
    /// Rehashes every entry into a table of `new_capacity` slots.
    ///
    /// Rejects `new_capacity == 0` and any capacity smaller than the current
    /// entry count. Growth triggered internally by `insert` never takes
    /// this path and cannot fail.
    fn resize(&mut self, new_capacity: usize) -> Result<(), ConfigError>;
}
