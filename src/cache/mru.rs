//! Bounded cache that evicts the least recently used entry.
//!
//! Retrieval must be O(1) and so must re-prioritization, so the cache is a
//! composition of two structures that always agree:
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────────┐
//!   │                           MruCache<V>                             │
//!   │                                                                   │
//!   │   index: FxHashMap<String, NodeId>                                │
//!   │   ┌──────────┬────────┐                                           │
//!   │   │  "page1" │  id_2  │──────────┐                                │
//!   │   │  "page2" │  id_0  │────┐     │                                │
//!   │   │  "page3" │  id_1  │──┐ │     │                                │
//!   │   └──────────┴────────┘  │ │     │                                │
//!   │                          ▼ ▼     ▼                                │
//!   │   entries: RecencyList<Entry<V>> (arena-backed)                   │
//!   │   head (most recent) ─► [id_2] ◄──► [id_1] ◄──► [id_0] ◄─ tail    │
//!   │                                                  (evicted first)  │
//!   └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The index maps each key to the [`NodeId`] handle of its list node: a
//! stable arena handle, never a raw pointer, so no dangling state is
//! reachable and the list unambiguously owns every entry. The invariant
//! both operations re-establish before returning: the index keyset equals
//! the list keyset, and every mapped handle designates the live node
//! currently holding that key.
//!
//! ## Contract
//!
//! - `find` is an access: a hit splices the node to the head (pure
//!   relocation, no reallocation) and returns the value. A miss returns
//!   `None`; the cache never calls a backing store itself, the caller
//!   fetches and then calls `store`.
//! - `store` prepends a fresh head node and evicts the tail entry once the
//!   bound is exceeded. At most one eviction per call; `len() <= bound()`
//!   holds after every operation.
//!
//! ## Operations
//!
//! | Operation  | Time | Notes                                 |
//! |------------|------|---------------------------------------|
//! | `find`     | O(1) | Hit moves the entry to most recent    |
//! | `store`    | O(1) | May evict exactly one tail entry      |
//! | `contains` | O(1) | No recency effect                     |
//! | `peek_lru` | O(1) | No recency effect                     |

use rustc_hash::FxHashMap;

use crate::ds::{NodeId, RecencyList};
use crate::error::ConfigError;
#[cfg(any(test, debug_assertions))]
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::{CacheMetrics, CacheMetricsSnapshot};
use crate::table::Entry;

/// Bounded most-recently-used cache over string keys.
///
/// # Example
///
/// ```
/// use hashkit::cache::mru::MruCache;
///
/// let mut cache = MruCache::with_bound(2).unwrap();
/// cache.store("a".to_string(), 1);
/// cache.store("b".to_string(), 2);
///
/// // Access "a": it becomes most recent, so "b" is now the eviction victim
/// assert_eq!(cache.find("a"), Some(&1));
///
/// let evicted = cache.store("c".to_string(), 3);
/// assert_eq!(evicted, Some(("b".to_string(), 2)));
/// assert!(cache.contains("a"));
/// ```
#[derive(Debug)]
pub struct MruCache<V> {
    index: FxHashMap<String, NodeId>,
    entries: RecencyList<Entry<V>>,
    bound: usize,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<V> MruCache<V> {
    /// Creates a cache holding at most `bound` entries.
    ///
    /// Rejects `bound == 0`.
    pub fn with_bound(bound: usize) -> Result<Self, ConfigError> {
        if bound == 0 {
            return Err(ConfigError::new("cache bound must be >= 1"));
        }
        Ok(Self {
            index: FxHashMap::with_capacity_and_hasher(bound, Default::default()),
            entries: RecencyList::with_capacity(bound),
            bound,
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        })
    }

    /// Looks up a key, treating a hit as an access.
    ///
    /// On a hit the entry's node is spliced to the head of the recency list
    /// in O(1) and the value is returned; repeated finds never change the
    /// value, only its recency. On a miss the caller is expected to consult
    /// its backing store and call [`store`](Self::store) with the result.
    pub fn find(&mut self, key: &str) -> Option<&V> {
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_find_miss();
            return None;
        };
        #[cfg(feature = "metrics")]
        self.metrics.record_find_hit();
        self.entries.move_to_front(id);
        self.entries.get(id).map(|entry| &entry.value)
    }

    /// Inserts a key-value pair as the most recent entry, evicting the
    /// least recently used entry if the bound is now exceeded.
    ///
    /// Returns the evicted `(key, value)` pair, if any. Storing a key that
    /// is already cached replaces its entry (and counts as the most recent
    /// use); the bound can only be exceeded by the single most recent
    /// insertion, so at most one eviction happens per call.
    pub fn store(&mut self, key: String, value: V) -> Option<(String, V)> {
        if let Some(id) = self.index.remove(&key) {
            // stale node for the same key: drop it so index and list agree
            self.entries.remove(id);
            #[cfg(feature = "metrics")]
            self.metrics.record_store_update();
        } else {
            #[cfg(feature = "metrics")]
            self.metrics.record_store_new();
        }

        let id = self.entries.push_front(Entry::new(key.clone(), value));
        self.index.insert(key, id);

        if self.entries.len() > self.bound {
            if let Some(evicted) = self.entries.pop_back() {
                self.index.remove(evicted.key.as_str());
                #[cfg(feature = "metrics")]
                self.metrics.record_eviction();
                return Some((evicted.key, evicted.value));
            }
        }
        None
    }

    /// Checks key presence without affecting recency order.
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the least recently used entry without affecting order.
    pub fn peek_lru(&self) -> Option<(&str, &V)> {
        self.entries
            .back()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    /// Returns the number of cached entries. Always `<= bound()`.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the configured capacity bound.
    #[inline]
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Iterates `(key, value)` pairs from most to least recently used,
    /// without affecting order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
    }

    /// Returns a snapshot of operation counters.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.len(), self.bound)
    }

    /// Validates that the index and the recency list agree: same size, and
    /// every mapped handle designates the live node holding that key.
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.entries.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but list holds {} nodes",
                self.index.len(),
                self.entries.len()
            )));
        }
        if self.entries.len() > self.bound {
            return Err(InvariantError::new(format!(
                "size {} exceeds bound {}",
                self.entries.len(),
                self.bound
            )));
        }
        for (key, &id) in &self.index {
            match self.entries.get(id) {
                Some(entry) if entry.key == *key => {}
                Some(entry) => {
                    return Err(InvariantError::new(format!(
                        "index maps {key:?} to a node holding {:?}",
                        entry.key
                    )));
                }
                None => {
                    return Err(InvariantError::new(format!(
                        "index maps {key:?} to a dead node handle"
                    )));
                }
            }
        }
        self.entries.debug_validate();
        Ok(())
    }
}
