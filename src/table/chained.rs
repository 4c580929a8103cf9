//! Separate chaining.
//!
//! Each bucket holds a sequence of entries; a collision just appends to the
//! bucket's chain. Insertion never fails and never evicts, so every entry
//! ever inserted stays retrievable. This is the strategy to reach for when
//! retrieval-of-everything-inserted is the requirement and occasional
//! O(chain) lookups are acceptable.
//!
//! Resizing is never required for correctness, only for bounding chain
//! length; [`max_chain_len`](ChainedTable::max_chain_len) tells callers when
//! it is worth paying for.

use crate::error::ConfigError;
use crate::hash::{FxSeedHasher, KeyHasher};
#[cfg(feature = "metrics")]
use crate::metrics::{TableMetrics, TableMetricsSnapshot};
use crate::table::Entry;
use crate::traits::{CoreTable, ResizableTable};

/// Separate-chaining hash table over string keys.
///
/// # Example
///
/// ```
/// use hashkit::hash::FxSeedHasher;
/// use hashkit::table::chained::ChainedTable;
///
/// let mut table = ChainedTable::with_capacity(8, FxSeedHasher::new(1)).unwrap();
/// table.insert("a".to_string(), 1);
/// table.insert("a".to_string(), 3); // last write wins
///
/// assert_eq!(table.find("a"), Some(&3));
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Debug)]
pub struct ChainedTable<V, H = FxSeedHasher> {
    buckets: Vec<Vec<Entry<V>>>,
    len: usize,
    hasher: H,
    #[cfg(feature = "metrics")]
    metrics: TableMetrics,
}

impl<V, H> ChainedTable<V, H>
where
    H: KeyHasher,
{
    /// Creates a table with `capacity` buckets.
    ///
    /// Rejects `capacity == 0`.
    pub fn with_capacity(capacity: usize, hasher: H) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("chained table capacity must be > 0"));
        }
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, Vec::new);
        Ok(Self {
            buckets,
            len: 0,
            hasher,
            #[cfg(feature = "metrics")]
            metrics: TableMetrics::default(),
        })
    }

    /// Returns the number of stored entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no entries are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the bucket count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the length of the longest chain.
    pub fn max_chain_len(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Inserts or updates a key-value pair, returning the previous value if
    /// the key was already present. Never fails, never evicts.
    pub fn insert(&mut self, key: String, value: V) -> Option<V> {
        let bucket = self.bucket_index(&key);
        if let Some(entry) = self.buckets[bucket].iter_mut().find(|entry| entry.key == key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return Some(std::mem::replace(&mut entry.value, value));
        }
        self.buckets[bucket].push(Entry { key, value });
        self.len += 1;
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
        None
    }

    /// Looks up a key by scanning its bucket's chain.
    pub fn find(&self, key: &str) -> Option<&V> {
        let bucket = self.bucket_index(key);
        let found = self.buckets[bucket]
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value);
        #[cfg(feature = "metrics")]
        match found {
            Some(_) => self.metrics.record_find_hit(),
            None => self.metrics.record_find_miss(),
        }
        found
    }

    /// Rehashes every entry into `new_capacity` buckets.
    ///
    /// Advisory: correctness never requires it, chain length does. Rejects
    /// `new_capacity == 0`.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), ConfigError> {
        if new_capacity == 0 {
            return Err(ConfigError::new("chained table capacity must be > 0"));
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_resize();

        let mut buckets = Vec::with_capacity(new_capacity);
        buckets.resize_with(new_capacity, Vec::new);
        let old = std::mem::replace(&mut self.buckets, buckets);
        for entry in old.into_iter().flatten() {
            let bucket = self.bucket_index(&entry.key);
            self.buckets[bucket].push(entry);
        }
        Ok(())
    }

    /// Removes all entries, keeping the current bucket count.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Returns a snapshot of operation counters.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> TableMetricsSnapshot {
        self.metrics.snapshot(self.len, self.buckets.len())
    }

    #[inline]
    fn bucket_index(&self, key: &str) -> usize {
        (self.hasher.hash_key(key) % self.buckets.len() as u64) as usize
    }
}

impl<V, H> CoreTable<V> for ChainedTable<V, H>
where
    H: KeyHasher,
{
    #[inline]
    fn insert(&mut self, key: String, value: V) -> Option<V> {
        ChainedTable::insert(self, key, value)
    }

    #[inline]
    fn find(&self, key: &str) -> Option<&V> {
        ChainedTable::find(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn clear(&mut self) {
        ChainedTable::clear(self);
    }
}

impl<V, H> ResizableTable<V> for ChainedTable<V, H>
where
    H: KeyHasher,
{
    #[inline]
    fn resize(&mut self, new_capacity: usize) -> Result<(), ConfigError> {
        ChainedTable::resize(self, new_capacity)
    }
}
