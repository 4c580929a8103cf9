//! Cuckoo hashing: two lanes, two hash functions, displacement on collision.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────┐
//!   │                      CuckooTable<V, H>                        │
//!   │                                                               │
//!   │   hashers[0] ──► lane 0: [ .. ][ e1 ][ .. ][ e4 ][ .. ]       │
//!   │   hashers[1] ──► lane 1: [ e2 ][ .. ][ e3 ][ .. ][ .. ]       │
//!   │                                                               │
//!   │   Every entry lives in exactly one lane, at the slot its      │
//!   │   lane's hasher assigns it (mod that lane's capacity).        │
//!   └───────────────────────────────────────────────────────────────┘
//!
//! Insert (relocation chase)
//! ─────────────────────────
//!
//!   place(e):
//!     lane = 0
//!     loop:
//!       slot = hashers[lane](e.key) % capacity
//!       empty?         → write, done
//!       seen (lane,slot) before?
//!                      → cycle: grow both lanes to 2n+1, reseed both
//!                        hashers, re-place every survivor, retry e
//!       otherwise      → remember (lane,slot), swap e with the
//!                        occupant, flip lane, continue with the evictee
//! ```
//!
//! The per-lane visited set is the safety mechanism, not an optimization:
//! without it an unlucky key set chases relocations forever. Rebuilds run
//! as an explicit work-list loop, never recursion, so stack usage stays
//! O(1) at any load factor.
//!
//! Lookups probe at most two slots (one per lane). An empty probed slot is
//! a definitive miss: the table has no remove operation, so the only way a
//! home slot empties is a full rehash.
//!
//! Expected O(1) insert and find hold while the load factor stays low
//! (below ~50%); resizing is the only recovery from adversarial key sets.

use rustc_hash::FxHashSet;

use crate::error::ConfigError;
#[cfg(any(test, debug_assertions))]
use crate::error::InvariantError;
use crate::hash::{FxSeedHasher, ReseedableHasher};
#[cfg(feature = "metrics")]
use crate::metrics::{TableMetrics, TableMetricsSnapshot};
use crate::table::{empty_slots, Entry};
use crate::traits::{CoreTable, ResizableTable};

/// Two-lane cuckoo hash table over string keys.
///
/// Requires a [`ReseedableHasher`] because a cycle-triggered rebuild
/// rotates both lanes to fresh hash functions; rebuilding under the same
/// pair could cycle again on the same keys.
///
/// # Example
///
/// ```
/// use hashkit::hash::FxSeedHasher;
/// use hashkit::table::cuckoo::CuckooTable;
///
/// let hashers = [FxSeedHasher::new(1), FxSeedHasher::new(2)];
/// let mut table = CuckooTable::with_capacity(8, hashers).unwrap();
/// table.insert("a".to_string(), 1);
/// table.insert("b".to_string(), 2);
///
/// assert_eq!(table.find("a"), Some(&1));
/// assert_eq!(table.find("missing"), None);
/// ```
#[derive(Debug)]
pub struct CuckooTable<V, H = FxSeedHasher> {
    lanes: [Vec<Option<Entry<V>>>; 2],
    hashers: [H; 2],
    len: usize,
    #[cfg(feature = "metrics")]
    metrics: TableMetrics,
}

impl<V, H> CuckooTable<V, H>
where
    H: ReseedableHasher,
{
    /// Creates a table with `capacity` slots per lane and one independent
    /// hasher per lane.
    ///
    /// Rejects `capacity == 0`.
    pub fn with_capacity(capacity: usize, hashers: [H; 2]) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("cuckoo table capacity must be > 0"));
        }
        Ok(Self {
            lanes: [empty_slots(capacity), empty_slots(capacity)],
            hashers,
            len: 0,
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

    /// Returns the slot count per lane. Total slot count is twice this.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.lanes[0].len()
    }

    /// Ratio of stored entries to total slots across both lanes.
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / (2 * self.capacity()) as f64
    }

    /// Inserts or updates a key-value pair, returning the previous value if
    /// the key was already present (in either lane).
    ///
    /// May trigger a relocation chase and, on cycle detection, a rebuild of
    /// both lanes; callers must not assume constant-time latency.
    pub fn insert(&mut self, key: String, value: V) -> Option<V> {
        for lane in 0..2 {
            let slot = self.slot_in(lane, &key);
            if let Some(entry) = self.lanes[lane][slot].as_mut() {
                if entry.key == key {
                    #[cfg(feature = "metrics")]
                    self.metrics.record_insert_update();
                    return Some(std::mem::replace(&mut entry.value, value));
                }
            }
        }
        self.place(Entry { key, value });
        self.len += 1;
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
        None
    }

    /// Looks up a key with at most two probes: the primary lane's slot,
    /// then the secondary's.
    ///
    /// An empty probed slot short-circuits to a miss; sound because slots
    /// only empty during a full rehash (the table has no remove).
    pub fn find(&self, key: &str) -> Option<&V> {
        for lane in 0..2 {
            let slot = self.slot_in(lane, key);
            match &self.lanes[lane][slot] {
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

    /// Rebuilds both lanes at `new_capacity` slots each, rotating to fresh
    /// hash functions.
    ///
    /// Rejects zero and any capacity whose two lanes could not hold the
    /// current entries. The table may end up larger than requested if the
    /// rebuild itself detects relocation cycles.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), ConfigError> {
        if new_capacity == 0 {
            return Err(ConfigError::new("cuckoo table capacity must be > 0"));
        }
        if new_capacity * 2 < self.len {
            return Err(ConfigError::new(
                "cannot resize below the current entry count",
            ));
        }
        let survivors = self.drain_entries();
        self.rebuild(new_capacity);
        for entry in survivors {
            self.place(entry);
        }
        Ok(())
    }

    /// Removes all entries, keeping the current capacity and hashers.
    pub fn clear(&mut self) {
        for lane in &mut self.lanes {
            for slot in lane.iter_mut() {
                *slot = None;
            }
        }
        self.len = 0;
    }

    /// Returns a snapshot of operation counters.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> TableMetricsSnapshot {
        self.metrics.snapshot(self.len, self.capacity())
    }

    /// Validates the cross-lane invariants: each entry sits at the slot its
    /// lane's hasher assigns it, keys are unique across lanes, and the
    /// entry count matches `len`.
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut seen = FxHashSet::default();
        let mut count = 0usize;
        for lane in 0..2 {
            for (slot, occupant) in self.lanes[lane].iter().enumerate() {
                let Some(entry) = occupant else { continue };
                count += 1;
                if self.slot_in(lane, &entry.key) != slot {
                    return Err(InvariantError::new(format!(
                        "entry {:?} stored at lane {lane} slot {slot}, not its hashed slot",
                        entry.key
                    )));
                }
                if !seen.insert(entry.key.as_str()) {
                    return Err(InvariantError::new(format!(
                        "key {:?} present in both lanes",
                        entry.key
                    )));
                }
            }
        }
        if count != self.len {
            return Err(InvariantError::new(format!(
                "len is {} but lanes hold {count} entries",
                self.len
            )));
        }
        Ok(())
    }

    #[inline]
    fn slot_in(&self, lane: usize, key: &str) -> usize {
        (self.hashers[lane].hash_key(key) % self.lanes[lane].len() as u64) as usize
    }

    /// Places an entry that is known not to be in the table, growing through
    /// as many rebuilds as it takes. Work-list loop, O(1) stack.
    fn place(&mut self, entry: Entry<V>) {
        let mut pending = vec![entry];
        while let Some(candidate) = pending.pop() {
            if let Err(homeless) = self.chase(candidate) {
                #[cfg(feature = "metrics")]
                self.metrics.record_cycle();
                pending.push(homeless);
                pending.extend(self.drain_entries());
                let next_capacity = self.capacity() * 2 + 1;
                self.rebuild(next_capacity);
            }
        }
    }

    /// One bounded relocation chase. `Err` carries the entry still without
    /// a slot after a cycle was detected.
    fn chase(&mut self, mut entry: Entry<V>) -> Result<(), Entry<V>> {
        let mut visited: [FxHashSet<usize>; 2] = [FxHashSet::default(), FxHashSet::default()];
        let mut lane = 0;
        loop {
            let slot = self.slot_in(lane, &entry.key);
            match &mut self.lanes[lane][slot] {
                vacant @ None => {
                    *vacant = Some(entry);
                    return Ok(());
                }
                Some(occupant) => {
                    if !visited[lane].insert(slot) {
                        // back at a slot this chase already displaced from:
                        // the chase would loop forever
                        return Err(entry);
                    }
                    std::mem::swap(occupant, &mut entry);
                    #[cfg(feature = "metrics")]
                    self.metrics.record_relocation();
                    lane ^= 1;
                }
            }
        }
    }

    fn drain_entries(&mut self) -> Vec<Entry<V>> {
        let mut out = Vec::with_capacity(self.len);
        for lane in &mut self.lanes {
            for slot in lane.iter_mut() {
                if let Some(entry) = slot.take() {
                    out.push(entry);
                }
            }
        }
        out
    }

    /// Fresh empty lanes at `capacity` slots each, with both hashers
    /// rotated so the new layout is independent of the old one.
    fn rebuild(&mut self, capacity: usize) {
        #[cfg(feature = "metrics")]
        self.metrics.record_resize();
        self.lanes = [empty_slots(capacity), empty_slots(capacity)];
        self.hashers = [self.hashers[0].reseed(), self.hashers[1].reseed()];
    }
}

impl<V, H> CoreTable<V> for CuckooTable<V, H>
where
    H: ReseedableHasher,
{
    #[inline]
    fn insert(&mut self, key: String, value: V) -> Option<V> {
        CuckooTable::insert(self, key, value)
    }

    #[inline]
    fn find(&self, key: &str) -> Option<&V> {
        CuckooTable::find(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn capacity(&self) -> usize {
        CuckooTable::capacity(self)
    }

    #[inline]
    fn load_factor(&self) -> f64 {
        CuckooTable::load_factor(self)
    }

    fn clear(&mut self) {
        CuckooTable::clear(self);
    }
}

impl<V, H> ResizableTable<V> for CuckooTable<V, H>
where
    H: ReseedableHasher,
{
    #[inline]
    fn resize(&mut self, new_capacity: usize) -> Result<(), ConfigError> {
        CuckooTable::resize(self, new_capacity)
    }
}
