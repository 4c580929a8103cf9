//! Operation counters for the table and cache types.
//!
//! Enabled by the `metrics` cargo feature. Recording and snapshotting are
//! split: the structures own private recorder structs and expose immutable
//! `Copy` snapshots, so consumers never observe half-updated counters and
//! the recorders stay out of the public API surface.
//!
//! Lookup-side counters use [`MetricsCell`] because `find` takes `&self` on
//! the table types; mutation-side counters are plain `u64`.

use std::cell::Cell;

/// Interior-mutable counter for recording on `&self` paths.
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Counters recorded by the table types.
#[derive(Debug, Default)]
pub(crate) struct TableMetrics {
    pub find_calls: MetricsCell,
    pub find_hits: MetricsCell,
    pub find_misses: MetricsCell,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub lost_overwrites: u64,
    pub relocations: u64,
    pub cycles: u64,
    pub resizes: u64,
}

impl TableMetrics {
    #[inline]
    pub fn record_find_hit(&self) {
        self.find_calls.incr();
        self.find_hits.incr();
    }

    #[inline]
    pub fn record_find_miss(&self) {
        self.find_calls.incr();
        self.find_misses.incr();
    }

    #[inline]
    pub fn record_insert_update(&mut self) {
        self.insert_calls += 1;
        self.insert_updates += 1;
    }

    #[inline]
    pub fn record_insert_new(&mut self) {
        self.insert_calls += 1;
        self.insert_new += 1;
    }

    #[inline]
    pub fn record_lost_overwrite(&mut self) {
        self.lost_overwrites += 1;
    }

    #[inline]
    pub fn record_relocation(&mut self) {
        self.relocations += 1;
    }

    #[inline]
    pub fn record_cycle(&mut self) {
        self.cycles += 1;
    }

    #[inline]
    pub fn record_resize(&mut self) {
        self.resizes += 1;
    }
}

/// Snapshot of table counters plus gauges captured at snapshot time.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableMetricsSnapshot {
    pub find_calls: u64,
    pub find_hits: u64,
    pub find_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    /// Entries destroyed by the lossy overwrite mode (open addressing only).
    pub lost_overwrites: u64,
    /// Occupants displaced during relocation chases (cuckoo only).
    pub relocations: u64,
    /// Relocation cycles detected (cuckoo only).
    pub cycles: u64,
    pub resizes: u64,

    // gauges captured at snapshot time
    pub table_len: usize,
    pub capacity: usize,
}

impl TableMetrics {
    pub fn snapshot(&self, table_len: usize, capacity: usize) -> TableMetricsSnapshot {
        TableMetricsSnapshot {
            find_calls: self.find_calls.get(),
            find_hits: self.find_hits.get(),
            find_misses: self.find_misses.get(),
            insert_calls: self.insert_calls,
            insert_updates: self.insert_updates,
            insert_new: self.insert_new,
            lost_overwrites: self.lost_overwrites,
            relocations: self.relocations,
            cycles: self.cycles,
            resizes: self.resizes,
            table_len,
            capacity,
        }
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Counters recorded by [`MruCache`](crate::cache::mru::MruCache).
#[derive(Debug, Default)]
pub(crate) struct CacheMetrics {
    pub find_calls: u64,
    pub find_hits: u64,
    pub find_misses: u64,
    pub store_calls: u64,
    pub store_updates: u64,
    pub store_new: u64,
    pub evicted_entries: u64,
}

impl CacheMetrics {
    #[inline]
    pub fn record_find_hit(&mut self) {
        self.find_calls += 1;
        self.find_hits += 1;
    }

    #[inline]
    pub fn record_find_miss(&mut self) {
        self.find_calls += 1;
        self.find_misses += 1;
    }

    #[inline]
    pub fn record_store_update(&mut self) {
        self.store_calls += 1;
        self.store_updates += 1;
    }

    #[inline]
    pub fn record_store_new(&mut self) {
        self.store_calls += 1;
        self.store_new += 1;
    }

    #[inline]
    pub fn record_eviction(&mut self) {
        self.evicted_entries += 1;
    }
}

/// Snapshot of cache counters plus gauges captured at snapshot time.
#[derive(Debug, Default, Clone, Copy)]
pub struct CacheMetricsSnapshot {
    pub find_calls: u64,
    pub find_hits: u64,
    pub find_misses: u64,

    pub store_calls: u64,
    pub store_updates: u64,
    pub store_new: u64,

    pub evicted_entries: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub bound: usize,
}

impl CacheMetrics {
    pub fn snapshot(&self, cache_len: usize, bound: usize) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            find_calls: self.find_calls,
            find_hits: self.find_hits,
            find_misses: self.find_misses,
            store_calls: self.store_calls,
            store_updates: self.store_updates,
            store_new: self.store_new,
            evicted_entries: self.evicted_entries,
            cache_len,
            bound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_increments_through_shared_reference() {
        let cell = MetricsCell::default();
        cell.incr();
        cell.incr();
        assert_eq!(cell.get(), 2);
    }

    #[test]
    fn table_snapshot_copies_counters_and_gauges() {
        let mut metrics = TableMetrics::default();
        metrics.record_find_hit();
        metrics.record_find_miss();
        metrics.record_insert_new();
        metrics.record_insert_update();
        metrics.record_resize();

        let snap = metrics.snapshot(3, 7);
        assert_eq!(snap.find_calls, 2);
        assert_eq!(snap.find_hits, 1);
        assert_eq!(snap.find_misses, 1);
        assert_eq!(snap.insert_calls, 2);
        assert_eq!(snap.insert_new, 1);
        assert_eq!(snap.insert_updates, 1);
        assert_eq!(snap.resizes, 1);
        assert_eq!(snap.table_len, 3);
        assert_eq!(snap.capacity, 7);
    }

    #[test]
    fn cache_snapshot_copies_counters_and_gauges() {
        let mut metrics = CacheMetrics::default();
        metrics.record_find_miss();
        metrics.record_store_new();
        metrics.record_store_new();
        metrics.record_eviction();

        let snap = metrics.snapshot(2, 2);
        assert_eq!(snap.find_misses, 1);
        assert_eq!(snap.store_new, 2);
        assert_eq!(snap.evicted_entries, 1);
        assert_eq!(snap.cache_len, 2);
        assert_eq!(snap.bound, 2);
    }
}
