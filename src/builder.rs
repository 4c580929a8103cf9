//! Unified table builder for all collision-resolution strategies.
//!
//! Provides a simple API to create tables with different collision
//! policies while hiding the strategy-specific construction details (like
//! the cuckoo table's hasher pair).
//!
//! ## Example
//!
//! ```rust
//! use hashkit::builder::{CollisionPolicy, TableBuilder};
//!
//! let mut table = TableBuilder::new(64)
//!     .build::<i32>(CollisionPolicy::Cuckoo)
//!     .unwrap();
//! table.insert("hello".to_string(), 1);
//! assert_eq!(table.find("hello"), Some(&1));
//! ```

use crate::error::ConfigError;
use crate::hash::FxSeedHasher;
use crate::table::chained::ChainedTable;
use crate::table::cuckoo::CuckooTable;
use crate::table::open_addressing::{GrowthPolicy, OpenAddressingTable};

// Seeds for builder-constructed hashers. Arbitrary odd constants; the
// cuckoo pair must differ so the lanes hash independently.
const PRIMARY_SEED: u64 = 0x5157_5F5A_11;
const SECONDARY_SEED: u64 = 0x2B2D_4B43_57;

/// Available collision-resolution policies.
#[derive(Debug, Clone)]
pub enum CollisionPolicy {
    /// Open addressing with linear probing and a growth mode.
    OpenAddressing { growth: GrowthPolicy },
    /// Separate chaining; never loses or evicts an entry.
    Chaining,
    /// Cuckoo hashing with two lanes and two seeded hash functions.
    Cuckoo,
}

/// Unified table wrapper that provides a consistent API regardless of the
/// collision policy chosen at build time.
pub struct Table<V> {
    inner: TableInner<V>,
}

enum TableInner<V> {
    OpenAddressing(OpenAddressingTable<V, FxSeedHasher>),
    Chained(ChainedTable<V, FxSeedHasher>),
    Cuckoo(CuckooTable<V, FxSeedHasher>),
}

impl<V> Table<V> {
    /// Inserts a key-value pair. Returns the previous value if the key was
    /// already present.
    pub fn insert(&mut self, key: String, value: V) -> Option<V> {
        match &mut self.inner {
            TableInner::OpenAddressing(table) => table.insert(key, value),
            TableInner::Chained(table) => table.insert(key, value),
            TableInner::Cuckoo(table) => table.insert(key, value),
        }
    }

    /// Looks up a key.
    pub fn find(&self, key: &str) -> Option<&V> {
        match &self.inner {
            TableInner::OpenAddressing(table) => table.find(key),
            TableInner::Chained(table) => table.find(key),
            TableInner::Cuckoo(table) => table.find(key),
        }
    }

    /// Checks if a key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        match &self.inner {
            TableInner::OpenAddressing(table) => table.len(),
            TableInner::Chained(table) => table.len(),
            TableInner::Cuckoo(table) => table.len(),
        }
    }

    /// Checks if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current slot capacity.
    pub fn capacity(&self) -> usize {
        match &self.inner {
            TableInner::OpenAddressing(table) => table.capacity(),
            TableInner::Chained(table) => table.capacity(),
            TableInner::Cuckoo(table) => table.capacity(),
        }
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        match &mut self.inner {
            TableInner::OpenAddressing(table) => table.clear(),
            TableInner::Chained(table) => table.clear(),
            TableInner::Cuckoo(table) => table.clear(),
        }
    }
}

/// Builder for creating table instances.
pub struct TableBuilder {
    capacity: usize,
}

impl TableBuilder {
    /// Creates a new table builder with the specified initial capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a table with the specified collision policy.
    ///
    /// Fails with [`ConfigError`] if the capacity is zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hashkit::builder::{CollisionPolicy, TableBuilder};
    /// use hashkit::table::open_addressing::GrowthPolicy;
    ///
    /// // Growing open-addressing table
    /// let table = TableBuilder::new(64).build::<i32>(CollisionPolicy::OpenAddressing {
    ///     growth: GrowthPolicy::Grow,
    /// });
    /// assert!(table.is_ok());
    ///
    /// // Chained table
    /// let table = TableBuilder::new(64).build::<i32>(CollisionPolicy::Chaining);
    /// assert!(table.is_ok());
    ///
    /// // Zero capacity is refused for every policy
    /// let table = TableBuilder::new(0).build::<i32>(CollisionPolicy::Cuckoo);
    /// assert!(table.is_err());
    /// ```
    pub fn build<V>(self, policy: CollisionPolicy) -> Result<Table<V>, ConfigError> {
        let inner = match policy {
            CollisionPolicy::OpenAddressing { growth } => {
                TableInner::OpenAddressing(OpenAddressingTable::with_growth(
                    self.capacity,
                    FxSeedHasher::new(PRIMARY_SEED),
                    growth,
                )?)
            }
            CollisionPolicy::Chaining => TableInner::Chained(ChainedTable::with_capacity(
                self.capacity,
                FxSeedHasher::new(PRIMARY_SEED),
            )?),
            CollisionPolicy::Cuckoo => TableInner::Cuckoo(CuckooTable::with_capacity(
                self.capacity,
                [
                    FxSeedHasher::new(PRIMARY_SEED),
                    FxSeedHasher::new(SECONDARY_SEED),
                ],
            )?),
        };

        Ok(Table { inner })
    }
}
