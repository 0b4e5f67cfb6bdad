//! Cache Metrics
//!
//! Counters maintained by the engine under its lock, and a [`CacheMetrics`]
//! trait that reports them as a `BTreeMap` so keys always come out in the same
//! order (handy for logs, snapshots and test assertions).
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `requests` | `get` calls that reached the index (hits + misses) |
//! | `cache_hits` / `cache_misses` | successful / `NotFound` gets |
//! | `hit_rate` / `miss_rate` | ratios over `requests`, 0.0 when idle |
//! | `insertions` | successful adds |
//! | `rejected_adds` | adds refused with `AlreadyExists` |
//! | `updates` | successful updates |
//! | `deletions` | successful deletes |
//! | `evictions` | entries removed to make room |
//! | `size` / `capacity` / `utilization` | current fill level |

use std::collections::BTreeMap;

/// Counters common to every cache instance.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Number of `get` lookups (hits + misses).
    pub requests: u64,

    /// Number of lookups that found the key.
    pub cache_hits: u64,

    /// Number of entries created by `add`.
    pub insertions: u64,

    /// Number of `add` calls rejected because the key was present.
    pub rejected_adds: u64,

    /// Number of successful `update` calls.
    pub updates: u64,

    /// Number of successful `delete` calls.
    pub deletions: u64,

    /// Number of entries evicted due to the capacity bound.
    pub evictions: u64,
}

impl CoreCacheMetrics {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cache hit - a `get` that found its key.
    ///
    /// Increments both total requests and cache hits.
    #[inline]
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a cache miss - a `get` for a key that is not cached.
    ///
    /// Only total requests are incremented; misses are derived as
    /// `requests - cache_hits`.
    #[inline]
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records an entry created by `add`.
    #[inline]
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an `add` refused because the key was already cached.
    #[inline]
    pub fn record_rejected_add(&mut self) {
        self.rejected_adds += 1;
    }

    /// Records a successful `update`.
    #[inline]
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records a successful `delete`.
    #[inline]
    pub fn record_deletion(&mut self) {
        self.deletions += 1;
    }

    /// Records an eviction - an entry removed from the tail to make room for
    /// a new one.
    #[inline]
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Number of lookups that did not find the key.
    #[inline]
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Fraction of lookups that hit, between 0.0 and 1.0.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of lookups that missed, between 0.0 and 1.0.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Converts the counters to a `BTreeMap`, adding the fill level of the cache
    /// they were taken from.
    pub fn to_btreemap(&self, size: usize, capacity: usize) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("rejected_adds".to_string(), self.rejected_adds as f64);
        metrics.insert("updates".to_string(), self.updates as f64);
        metrics.insert("deletions".to_string(), self.deletions as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);

        metrics.insert("size".to_string(), size as f64);
        metrics.insert("capacity".to_string(), capacity as f64);
        let utilization = if capacity > 0 {
            size as f64 / capacity as f64
        } else {
            0.0
        };
        metrics.insert("utilization".to_string(), utilization);

        metrics
    }
}

/// Uniform metrics reporting.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Name of the eviction algorithm in use (e.g. "LRU", "FIFO", "LFU").
    fn algorithm_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_when_idle() {
        let metrics = CoreCacheMetrics::new();
        assert_eq!(metrics.hit_rate(), 0.0);
        assert_eq!(metrics.miss_rate(), 0.0);
        assert_eq!(metrics.cache_misses(), 0);
    }

    #[test]
    fn test_hits_and_misses() {
        let mut metrics = CoreCacheMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();
        assert_eq!(metrics.requests, 4);
        assert_eq!(metrics.cache_misses(), 1);
        assert_eq!(metrics.hit_rate(), 0.75);
        assert_eq!(metrics.miss_rate(), 0.25);
    }

    #[test]
    fn test_btreemap_keys_are_sorted_and_complete() {
        let mut metrics = CoreCacheMetrics::new();
        metrics.record_insertion();
        metrics.record_insertion();
        metrics.record_eviction();
        metrics.record_rejected_add();

        let map = metrics.to_btreemap(1, 4);
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);

        assert_eq!(map["insertions"], 2.0);
        assert_eq!(map["evictions"], 1.0);
        assert_eq!(map["rejected_adds"], 1.0);
        assert_eq!(map["size"], 1.0);
        assert_eq!(map["capacity"], 4.0);
        assert_eq!(map["utilization"], 0.25);
    }
}
