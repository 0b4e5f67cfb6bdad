//! Cache Entry Type
//!
//! A [`CacheEntry`] is the unit of storage: the key it is indexed under, the
//! cached value, and the number of times it has been visited.
//!
//! Entries are plain records with public fields. Eviction policies read them
//! through a shared reference (see [`Placement`](crate::policy::Placement));
//! only the cache engine mutates them.
//!
//! # Visit Counting
//!
//! - A freshly added entry starts at `visit_count == 0`.
//! - Every successful `get` and every `update` adds one.
//! - The count is never reset while the entry lives. Adding the same key again
//!   after a delete or an eviction starts a new entry at zero.
//!
//! # Examples
//!
//! ```
//! use policy_cache::entry::CacheEntry;
//!
//! let mut entry = CacheEntry::new("user:42".to_string(), "Alice");
//! assert_eq!(entry.visit_count, 0);
//!
//! entry.record_visit();
//! assert_eq!(entry.visit_count, 1);
//! ```

use core::fmt;

/// A cached key/value pair plus its visit count.
#[derive(Clone)]
pub struct CacheEntry<V> {
    /// The key this entry is indexed under. Never empty.
    pub key: String,

    /// The cached value.
    pub value: V,

    /// Number of reads and updates since the entry was created.
    pub visit_count: u64,
}

impl<V> CacheEntry<V> {
    /// Creates an entry with a zero visit count.
    #[inline]
    pub fn new(key: String, value: V) -> Self {
        Self {
            key,
            value,
            visit_count: 0,
        }
    }

    /// Counts one visit.
    #[inline]
    pub fn record_visit(&mut self) {
        self.visit_count = self.visit_count.saturating_add(1);
    }
}

impl<V> fmt::Debug for CacheEntry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("visit_count", &self.visit_count)
            .finish_non_exhaustive()
    }
}
