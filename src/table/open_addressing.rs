//! Open addressing with linear probing.
//!
//! Collisions are resolved inside a single slot array: a colliding entry is
//! placed at the next free slot, scanning forward with wraparound. Lookups
//! follow the same scan and treat the first empty slot as a definitive
//! miss, so the probe convention must match between insert and find. Both
//! go through the same home-slot computation and forward scan.
//!
//! ## Growth modes
//!
//! - [`GrowthPolicy::Grow`] (default): if a full scan finds no free slot,
//!   the array grows to `2n + 1`, every entry is rehashed, and the insert
//!   retries. Post-resize success is guaranteed since the load factor
//!   strictly drops. Every inserted key stays retrievable.
//! - [`GrowthPolicy::Overwrite`]: the entry is written at its home slot
//!   unconditionally, destroying any different-keyed occupant. O(1)
//!   worst-case insert, never resizes on its own, and an overwritten entry
//!   is gone for good. Only suitable for best-effort, cache-like usage;
//!   callers opt in by name.
//!
//! ## Operations
//!
//! | Operation | `Grow`            | `Overwrite` |
//! |-----------|-------------------|-------------|
//! | `insert`  | O(1) amortized    | O(1)        |
//! | `find`    | O(1) expected     | O(1) expected |
//! | `resize`  | O(n)              | O(n)        |

use crate::error::ConfigError;
use crate::hash::{FxSeedHasher, KeyHasher};
#[cfg(feature = "metrics")]
use crate::metrics::{TableMetrics, TableMetricsSnapshot};
use crate::table::{empty_slots, Entry};
use crate::traits::{CoreTable, ResizableTable};

/// What `insert` does when the probe sequence finds no free slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GrowthPolicy {
    /// Grow to `2n + 1` and rehash; every insert eventually succeeds and
    /// every inserted key remains retrievable.
    #[default]
    Grow,
    /// Write at the home slot unconditionally, silently destroying any
    /// different-keyed occupant. Never resizes. Lossy by design.
    Overwrite,
}

/// Linear-probing hash table over string keys.
///
/// # Example
///
/// ```
/// use hashkit::hash::FxSeedHasher;
/// use hashkit::table::open_addressing::OpenAddressingTable;
///
/// let mut table = OpenAddressingTable::with_capacity(4, FxSeedHasher::new(1)).unwrap();
/// table.insert("a".to_string(), 1);
/// table.insert("b".to_string(), 2);
///
/// assert_eq!(table.find("a"), Some(&1));
/// assert_eq!(table.find("missing"), None);
/// ```
#[derive(Debug)]
pub struct OpenAddressingTable<V, H = FxSeedHasher> {
    slots: Vec<Option<Entry<V>>>,
    len: usize,
    hasher: H,
    growth: GrowthPolicy,
    #[cfg(feature = "metrics")]
    metrics: TableMetrics,
}

impl<V, H> OpenAddressingTable<V, H>
where
    H: KeyHasher,
{
    /// Creates a table with the capacity-guaranteeing [`GrowthPolicy::Grow`]
    /// mode.
    ///
    /// Rejects `capacity == 0`.
    pub fn with_capacity(capacity: usize, hasher: H) -> Result<Self, ConfigError> {
        Self::with_growth(capacity, hasher, GrowthPolicy::Grow)
    }

    /// Creates a table with an explicit growth policy.
    ///
    /// Rejects `capacity == 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use hashkit::hash::FxSeedHasher;
    /// use hashkit::table::open_addressing::{GrowthPolicy, OpenAddressingTable};
    ///
    /// let table = OpenAddressingTable::<i32>::with_growth(
    ///     8,
    ///     FxSeedHasher::new(1),
    ///     GrowthPolicy::Overwrite,
    /// );
    /// assert!(table.is_ok());
    /// ```
    pub fn with_growth(
        capacity: usize,
        hasher: H,
        growth: GrowthPolicy,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("open addressing capacity must be > 0"));
        }
        Ok(Self {
            slots: empty_slots(capacity),
            len: 0,
            hasher,
            growth,
            #[cfg(feature = "metrics")]
            metrics: TableMetrics::default(),
        })
    }

    /// Returns the growth policy selected at construction.
    #[inline]
    pub fn growth(&self) -> GrowthPolicy {
        self.growth
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

    /// Returns the slot capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Inserts or updates a key-value pair, returning the previous value if
    /// the key was already present.
    ///
    /// In [`GrowthPolicy::Grow`] mode the table may grow (and rehash) before
    /// the entry is placed; callers must not assume constant-time latency.
    /// In [`GrowthPolicy::Overwrite`] mode a different key occupying the
    /// home slot is silently destroyed.
    pub fn insert(&mut self, key: String, value: V) -> Option<V> {
        match self.growth {
            GrowthPolicy::Grow => self.insert_probing(key, value),
            GrowthPolicy::Overwrite => self.insert_overwrite(key, value),
        }
    }

    /// Looks up a key.
    ///
    /// Scans forward from the home slot; the first empty slot proves the
    /// key absent. A miss is a normal `None`.
    pub fn find(&self, key: &str) -> Option<&V> {
        let capacity = self.slots.len();
        let home = self.home_slot(key, capacity);
        for offset in 0..capacity {
            let index = (home + offset) % capacity;
            match &self.slots[index] {
                None => {
                    #[cfg(feature = "metrics")]
                    self.metrics.record_find_miss();
                    return None;
                }
                Some(entry) if entry.key == key => {
                    #[cfg(feature = "metrics")]
                    self.metrics.record_find_hit();
                    return Some(&entry.value);
                }
                Some(_) => {}
            }
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_find_miss();
        None
    }

    /// Rehashes every entry into a table of `new_capacity` slots.
    ///
    /// Rejects zero and any capacity smaller than the current entry count.
    /// In [`GrowthPolicy::Overwrite`] mode rehashing itself is lossy when
    /// two entries share a home slot in the new array.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), ConfigError> {
        if new_capacity == 0 {
            return Err(ConfigError::new("open addressing capacity must be > 0"));
        }
        if new_capacity < self.len {
            return Err(ConfigError::new(
                "cannot resize below the current entry count",
            ));
        }
        self.rehash_into(new_capacity);
        Ok(())
    }

    /// Removes all entries, keeping the current capacity.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.len = 0;
    }

    /// Returns a snapshot of operation counters.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> TableMetricsSnapshot {
        self.metrics.snapshot(self.len, self.slots.len())
    }

    #[inline]
    fn home_slot(&self, key: &str, capacity: usize) -> usize {
        (self.hasher.hash_key(key) % capacity as u64) as usize
    }

    fn insert_probing(&mut self, key: String, value: V) -> Option<V> {
        loop {
            let capacity = self.slots.len();
            let home = self.home_slot(&key, capacity);
            for offset in 0..capacity {
                let index = (home + offset) % capacity;
                match &mut self.slots[index] {
                    Some(entry) if entry.key == key => {
                        #[cfg(feature = "metrics")]
                        self.metrics.record_insert_update();
                        return Some(std::mem::replace(&mut entry.value, value));
                    }
                    vacant @ None => {
                        *vacant = Some(Entry { key, value });
                        self.len += 1;
                        #[cfg(feature = "metrics")]
                        self.metrics.record_insert_new();
                        return None;
                    }
                    Some(_) => {}
                }
            }
            // Full scan, every slot holds another key: grow and retry. The
            // retry is guaranteed to succeed because the load factor
            // strictly drops.
            self.rehash_into(capacity * 2 + 1);
        }
    }

    fn insert_overwrite(&mut self, key: String, value: V) -> Option<V> {
        let capacity = self.slots.len();
        let index = self.home_slot(&key, capacity);
        match self.slots[index].take() {
            Some(occupant) if occupant.key == key => {
                self.slots[index] = Some(Entry { key, value });
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_update();
                Some(occupant.value)
            }
            occupant => {
                if occupant.is_none() {
                    self.len += 1;
                } else {
                    // the displaced entry is destroyed, not relocated
                    #[cfg(feature = "metrics")]
                    self.metrics.record_lost_overwrite();
                }
                self.slots[index] = Some(Entry { key, value });
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_new();
                None
            }
        }
    }

    fn rehash_into(&mut self, new_capacity: usize) {
        #[cfg(feature = "metrics")]
        self.metrics.record_resize();

        let old = std::mem::replace(&mut self.slots, empty_slots(new_capacity));
        match self.growth {
            GrowthPolicy::Grow => {
                for entry in old.into_iter().flatten() {
                    let home = self.home_slot(&entry.key, new_capacity);
                    let mut index = home;
                    loop {
                        if self.slots[index].is_none() {
                            self.slots[index] = Some(entry);
                            break;
                        }
                        index = (index + 1) % new_capacity;
                    }
                }
            }
            GrowthPolicy::Overwrite => {
                // home-slot placement only, matching the mode's lossy insert
                self.len = 0;
                for entry in old.into_iter().flatten() {
                    let home = self.home_slot(&entry.key, new_capacity);
                    if self.slots[home].is_none() {
                        self.len += 1;
                    }
                    self.slots[home] = Some(entry);
                }
            }
        }
    }
}

impl<V, H> CoreTable<V> for OpenAddressingTable<V, H>
where
    H: KeyHasher,
{
    #[inline]
    fn insert(&mut self, key: String, value: V) -> Option<V> {
        OpenAddressingTable::insert(self, key, value)
    }

    #[inline]
    fn find(&self, key: &str) -> Option<&V> {
        OpenAddressingTable::find(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn clear(&mut self) {
        OpenAddressingTable::clear(self);
    }
}

impl<V, H> ResizableTable<V> for OpenAddressingTable<V, H>
where
    H: KeyHasher,
{
    #[inline]
    fn resize(&mut self, new_capacity: usize) -> Result<(), ConfigError> {
        OpenAddressingTable::resize(self, new_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::AlphaSumHasher;

    fn table(capacity: usize) -> OpenAddressingTable<i32> {
        OpenAddressingTable::with_capacity(capacity, FxSeedHasher::new(11)).unwrap()
    }

    // ==============================================
    // Basic Operations
    // ==============================================

    mod basic_operations {
        use super::*;

        #[test]
        fn new_table_is_empty() {
            let table = table(8);
            assert!(table.is_empty());
            assert_eq!(table.len(), 0);
            assert_eq!(table.capacity(), 8);
        }

        #[test]
        fn zero_capacity_is_rejected() {
            let err = OpenAddressingTable::<i32>::with_capacity(0, FxSeedHasher::new(1));
            assert!(err.is_err());
        }

        #[test]
        fn insert_and_find() {
            let mut table = table(8);
            table.insert("a".to_string(), 1);
            table.insert("b".to_string(), 2);

            assert_eq!(table.len(), 2);
            assert_eq!(table.find("a"), Some(&1));
            assert_eq!(table.find("b"), Some(&2));
        }

        #[test]
        fn miss_is_a_normal_return() {
            let mut table = table(8);
            table.insert("present".to_string(), 1);
            assert_eq!(table.find("absent"), None);
        }

        #[test]
        fn duplicate_insert_is_last_write_wins() {
            let mut table = table(8);
            assert_eq!(table.insert("k".to_string(), 1), None);
            assert_eq!(table.insert("k".to_string(), 2), Some(1));
            assert_eq!(table.find("k"), Some(&2));
            assert_eq!(table.len(), 1);
        }

        #[test]
        fn clear_keeps_capacity() {
            let mut table = table(8);
            table.insert("a".to_string(), 1);
            table.clear();
            assert!(table.is_empty());
            assert_eq!(table.capacity(), 8);
            assert_eq!(table.find("a"), None);
        }
    }

    // ==============================================
    // Probing & Growth
    // ==============================================

    mod growth_behavior {
        use super::*;

        #[test]
        fn colliding_keys_probe_to_free_slots() {
            // AlphaSumHasher sends permutations to the same home slot.
            let mut table =
                OpenAddressingTable::with_capacity(8, AlphaSumHasher).unwrap();
            table.insert("abc".to_string(), 1);
            table.insert("cba".to_string(), 2);
            table.insert("bac".to_string(), 3);

            assert_eq!(table.find("abc"), Some(&1));
            assert_eq!(table.find("cba"), Some(&2));
            assert_eq!(table.find("bac"), Some(&3));
        }

        #[test]
        fn full_table_grows_by_doubling_plus_one() {
            let mut table = table(2);
            table.insert("a".to_string(), 1);
            table.insert("b".to_string(), 2);
            assert_eq!(table.capacity(), 2);

            table.insert("c".to_string(), 3);
            assert_eq!(table.capacity(), 5);
            assert_eq!(table.len(), 3);
        }

        #[test]
        fn everything_stays_findable_across_growth() {
            let mut table = table(2);
            for i in 0..200 {
                table.insert(format!("key{i}"), i);
            }
            assert_eq!(table.len(), 200);
            for i in 0..200 {
                assert_eq!(table.find(&format!("key{i}")), Some(&i), "key{i} lost");
            }
        }

        #[test]
        fn growth_with_adversarial_hasher_still_retains_everything() {
            let mut table =
                OpenAddressingTable::with_capacity(2, AlphaSumHasher).unwrap();
            let keys = ["ab", "ba", "ac", "ca", "bc", "cb", "aa", "bb"];
            for (i, key) in keys.iter().enumerate() {
                table.insert(key.to_string(), i);
            }
            for (i, key) in keys.iter().enumerate() {
                assert_eq!(table.find(key), Some(&i));
            }
        }
    }

    // ==============================================
    // Overwrite Mode (lossy, opt-in)
    // ==============================================

    mod overwrite_mode {
        use super::*;

        fn lossy(capacity: usize) -> OpenAddressingTable<i32, AlphaSumHasher> {
            OpenAddressingTable::with_growth(capacity, AlphaSumHasher, GrowthPolicy::Overwrite)
                .unwrap()
        }

        #[test]
        fn default_policy_is_grow() {
            let table = table(4);
            assert_eq!(table.growth(), GrowthPolicy::Grow);
        }

        #[test]
        fn collision_destroys_the_previous_occupant() {
            let mut table = lossy(8);
            table.insert("abc".to_string(), 1);
            // same letter sum, same home slot
            assert_eq!(table.insert("cba".to_string(), 2), None);

            assert_eq!(table.find("cba"), Some(&2));
            assert_eq!(table.find("abc"), None, "displaced entry must be gone");
            assert_eq!(table.len(), 1);
        }

        #[test]
        fn same_key_overwrite_returns_old_value() {
            let mut table = lossy(8);
            table.insert("abc".to_string(), 1);
            assert_eq!(table.insert("abc".to_string(), 2), Some(1));
            assert_eq!(table.find("abc"), Some(&2));
        }

        #[test]
        fn never_grows_on_its_own() {
            let mut table = lossy(2);
            for i in 0..50 {
                table.insert(format!("k{i}"), i);
            }
            assert_eq!(table.capacity(), 2);
            assert!(table.len() <= 2);
        }
    }

    // ==============================================
    // Explicit Resize
    // ==============================================

    mod resize_behavior {
        use super::*;

        #[test]
        fn resize_preserves_entries() {
            let mut table = table(4);
            for i in 0..4 {
                table.insert(format!("key{i}"), i);
            }
            table.resize(64).unwrap();
            assert_eq!(table.capacity(), 64);
            for i in 0..4 {
                assert_eq!(table.find(&format!("key{i}")), Some(&i));
            }
        }

        #[test]
        fn resize_rejects_zero() {
            let mut table = table(4);
            assert!(table.resize(0).is_err());
        }

        #[test]
        fn resize_rejects_shrink_below_len() {
            let mut table = table(8);
            for i in 0..5 {
                table.insert(format!("key{i}"), i);
            }
            assert!(table.resize(4).is_err());
            // table is untouched after the refusal
            assert_eq!(table.capacity(), 8);
            assert_eq!(table.find("key3"), Some(&3));
        }

        #[test]
        fn resize_to_exact_len_is_allowed() {
            let mut table = table(8);
            for i in 0..3 {
                table.insert(format!("key{i}"), i);
            }
            table.resize(3).unwrap();
            for i in 0..3 {
                assert_eq!(table.find(&format!("key{i}")), Some(&i));
            }
        }
    }

    // ==============================================
    // Property Tests
    // ==============================================

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // The growing mode's guarantee: no insert sequence can make a
            // previously inserted key unfindable.
            #[test]
            fn grow_mode_retains_every_key(keys in proptest::collection::vec("[a-z]{1,12}", 1..200)) {
                let mut table = OpenAddressingTable::with_capacity(2, FxSeedHasher::new(3)).unwrap();
                let mut expected = std::collections::HashMap::new();
                for (i, key) in keys.iter().enumerate() {
                    table.insert(key.clone(), i);
                    expected.insert(key.clone(), i);
                }
                for (key, value) in &expected {
                    prop_assert_eq!(table.find(key), Some(value));
                }
                prop_assert_eq!(table.len(), expected.len());
            }

            #[test]
            fn grow_mode_survives_interleaved_resizes(keys in proptest::collection::vec("[a-z]{1,8}", 1..100)) {
                let mut table = OpenAddressingTable::with_capacity(4, FxSeedHasher::new(5)).unwrap();
                let mut expected = std::collections::HashMap::new();
                for (i, key) in keys.iter().enumerate() {
                    table.insert(key.clone(), i);
                    expected.insert(key.clone(), i);
                    if i % 17 == 0 {
                        let target = (table.len() * 3).max(1);
                        table.resize(target).unwrap();
                    }
                }
                for (key, value) in &expected {
                    prop_assert_eq!(table.find(key), Some(value));
                }
            }
        }
    }
}
