//! Eviction Policies
//!
//! An eviction policy decides where an entry sits in the cache's ordered
//! sequence after it has been touched. The engine always evicts the entry at
//! the **tail** of the sequence, so a policy expresses "what goes next" purely by
//! moving the touched entry around.
//!
//! The engine calls the policy after every successful `add`, `get` and
//! `update`. It never calls it after `delete` or on an evicted victim.
//!
//! # Built-in Policies
//!
//! | Variant | Rule | Cost per touch |
//! |---------|------|----------------|
//! | [`Policy::Lru`] | Move the touched entry to the front | O(1) |
//! | [`Policy::Fifo`] | Leave it where it is (new entries start at the front) | O(1) |
//! | [`Policy::Lfu`] | Place it before the first entry with a strictly lower visit count, or at the back | O(n) |
//!
//! # Custom Policies
//!
//! Implement [`EvictionPolicy`] and wrap it with [`Policy::custom`]. A policy
//! only sees a [`Placement`], which can read every entry but move nothing
//! except the touched one.
//!
//! ```
//! use policy_cache::policy::{EvictionPolicy, Placement, Policy};
//! use policy_cache::Cache;
//! use core::num::NonZeroUsize;
//!
//! /// Evicts the most recently touched entry first.
//! #[derive(Debug)]
//! struct Mru;
//!
//! impl<V> EvictionPolicy<V> for Mru {
//!     fn adjust(&self, placement: &mut Placement<'_, V>) {
//!         placement.move_to_back();
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "MRU"
//!     }
//! }
//!
//! let cache = Cache::with_policy(NonZeroUsize::new(2).unwrap(), Policy::custom(Mru));
//! cache.add("a", 1).unwrap();
//! cache.add("b", 2).unwrap();
//! cache.add("c", 3).unwrap(); // "b" was touched last, so it goes
//! assert!(cache.get("b").is_err());
//! assert_eq!(cache.get("a"), Ok(1));
//! ```

mod fifo;
mod lfu;
mod lru;

pub use self::fifo::FifoPolicy;
pub use self::lfu::LfuPolicy;
pub use self::lru::LruPolicy;

use crate::entry::CacheEntry;
use crate::list::{Iter, List, NodeId};
use core::fmt;
use std::sync::Arc;

/// A strategy for repositioning a just-touched entry.
///
/// Implementations must be deterministic and must not assume anything about the
/// entry's position beyond what the [`Placement`] reports.
pub trait EvictionPolicy<V>: Send + Sync {
    /// Repositions the touched entry.
    fn adjust(&self, placement: &mut Placement<'_, V>);

    /// Short name used in logs and metrics.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Restricted view of the ordered sequence handed to an [`EvictionPolicy`].
///
/// Every entry can be inspected, but only the touched entry can be moved.
pub struct Placement<'a, V> {
    list: &'a mut List<CacheEntry<V>>,
    touched: NodeId,
}

impl<'a, V> Placement<'a, V> {
    pub(crate) fn new(list: &'a mut List<CacheEntry<V>>, touched: NodeId) -> Self {
        Self { list, touched }
    }

    /// Handle of the entry that was just touched.
    #[inline]
    pub fn touched(&self) -> NodeId {
        self.touched
    }

    /// The entry that was just touched.
    #[inline]
    pub fn touched_entry(&self) -> Option<&CacheEntry<V>> {
        self.list.get(self.touched)
    }

    /// Looks up any entry in the sequence.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&CacheEntry<V>> {
        self.list.get(id)
    }

    /// Number of entries in the sequence, including the touched one.
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns true if the sequence is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Handle of the first entry.
    #[inline]
    pub fn front(&self) -> Option<NodeId> {
        self.list.front()
    }

    /// Handle of the last entry, the next eviction victim.
    #[inline]
    pub fn back(&self) -> Option<NodeId> {
        self.list.back()
    }

    /// Iterates the sequence front to back.
    pub fn iter(&self) -> Entries<'_, V> {
        Entries {
            inner: self.list.iter(),
        }
    }

    /// Moves the touched entry to the front.
    pub fn move_to_front(&mut self) {
        self.list.move_to_front(self.touched);
    }

    /// Moves the touched entry to the back, making it the next victim.
    pub fn move_to_back(&mut self) {
        self.list.move_to_back(self.touched);
    }

    /// Moves the touched entry immediately before `mark`.
    ///
    /// Returns `false` (and moves nothing) if `mark` is not in the sequence.
    pub fn move_before(&mut self, mark: NodeId) -> bool {
        self.list.move_before(self.touched, mark)
    }
}

impl<V> fmt::Debug for Placement<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Placement")
            .field("touched", &self.touched)
            .field("len", &self.list.len())
            .finish()
    }
}

/// Front-to-back iterator over the entries visible to a policy.
pub struct Entries<'a, V> {
    inner: Iter<'a, CacheEntry<V>>,
}

impl<'a, V> Iterator for Entries<'a, V> {
    type Item = (NodeId, &'a CacheEntry<V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> fmt::Debug for Entries<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entries").finish_non_exhaustive()
    }
}

/// The eviction policy a cache is constructed with.
///
/// Passed by value at construction; there is no process-wide default to
/// mutate. [`Policy::default`] is [`Policy::Lru`].
pub enum Policy<V> {
    /// Recency-based: least recently touched entry is evicted.
    Lru,
    /// Insertion-order-based: oldest entry is evicted, reads do not matter.
    Fifo,
    /// Frequency-based: least visited entry is evicted.
    Lfu,
    /// A caller-supplied strategy.
    Custom(Arc<dyn EvictionPolicy<V>>),
}

impl<V> Policy<V> {
    /// Wraps a caller-supplied strategy.
    pub fn custom<P>(policy: P) -> Self
    where
        P: EvictionPolicy<V> + 'static,
    {
        Policy::Custom(Arc::new(policy))
    }

    /// Short name of the policy ("LRU", "FIFO", "LFU" or the custom name).
    pub fn name(&self) -> &'static str {
        match self {
            Policy::Lru => <LruPolicy as EvictionPolicy<V>>::name(&LruPolicy),
            Policy::Fifo => <FifoPolicy as EvictionPolicy<V>>::name(&FifoPolicy),
            Policy::Lfu => <LfuPolicy as EvictionPolicy<V>>::name(&LfuPolicy),
            Policy::Custom(policy) => policy.name(),
        }
    }

    #[inline]
    pub(crate) fn adjust(&self, placement: &mut Placement<'_, V>) {
        match self {
            Policy::Lru => LruPolicy.adjust(placement),
            Policy::Fifo => FifoPolicy.adjust(placement),
            Policy::Lfu => LfuPolicy.adjust(placement),
            Policy::Custom(policy) => policy.adjust(placement),
        }
    }
}

impl<V> Default for Policy<V> {
    fn default() -> Self {
        Policy::Lru
    }
}

impl<V> Clone for Policy<V> {
    fn clone(&self) -> Self {
        match self {
            Policy::Lru => Policy::Lru,
            Policy::Fifo => Policy::Fifo,
            Policy::Lfu => Policy::Lfu,
            Policy::Custom(policy) => Policy::Custom(Arc::clone(policy)),
        }
    }
}

impl<V> fmt::Debug for Policy<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Lru => f.write_str("Lru"),
            Policy::Fifo => f.write_str("Fifo"),
            Policy::Lfu => f.write_str("Lfu"),
            Policy::Custom(policy) => f.debug_tuple("Custom").field(&policy.name()).finish(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Builds a list from `(key, visit_count)` pairs in front-to-back order.
    pub(crate) fn list_of(entries: &[(&str, u64)]) -> (List<CacheEntry<()>>, Vec<NodeId>) {
        let mut list = List::with_capacity(entries.len());
        let mut ids = Vec::with_capacity(entries.len());
        for (key, visits) in entries.iter().rev() {
            let mut entry = CacheEntry::new((*key).to_string(), ());
            entry.visit_count = *visits;
            ids.push(list.push_front(entry));
        }
        ids.reverse();
        (list, ids)
    }

    pub(crate) fn keys(list: &List<CacheEntry<()>>) -> Vec<String> {
        list.iter().map(|(_, e)| e.key.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{keys, list_of};
    use super::*;

    #[test]
    fn test_default_is_lru() {
        let policy: Policy<i32> = Policy::default();
        assert_eq!(policy.name(), "LRU");
        assert_eq!(Policy::<i32>::Fifo.name(), "FIFO");
        assert_eq!(Policy::<i32>::Lfu.name(), "LFU");
    }

    #[test]
    fn test_placement_moves_only_touched() {
        let (mut list, ids) = list_of(&[("a", 0), ("b", 0), ("c", 0)]);
        let mut placement = Placement::new(&mut list, ids[2]);
        assert_eq!(placement.len(), 3);
        assert_eq!(placement.touched_entry().map(|e| e.key.as_str()), Some("c"));

        placement.move_to_front();
        assert_eq!(placement.front(), Some(ids[2]));
        assert!(placement.move_before(ids[1]));
        assert_eq!(keys(&list), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_placement_iter_is_front_to_back() {
        let (mut list, _) = list_of(&[("x", 3), ("y", 2), ("z", 1)]);
        let front = list.front().unwrap();
        let placement = Placement::new(&mut list, front);
        let seen: Vec<u64> = placement.iter().map(|(_, e)| e.visit_count).collect();
        assert_eq!(seen, vec![3, 2, 1]);
    }

    #[derive(Debug)]
    struct Pin;

    impl<V> EvictionPolicy<V> for Pin {
        fn adjust(&self, _placement: &mut Placement<'_, V>) {}
    }

    #[test]
    fn test_custom_policy_dispatch() {
        let policy: Policy<()> = Policy::custom(Pin);
        assert_eq!(policy.name(), "custom");
        assert_eq!(format!("{:?}", policy), "Custom(\"custom\")");

        let (mut list, ids) = list_of(&[("a", 0), ("b", 0)]);
        policy.adjust(&mut Placement::new(&mut list, ids[1]));
        assert_eq!(keys(&list), vec!["a", "b"]);

        let cloned = policy.clone();
        assert_eq!(cloned.name(), "custom");
    }
}
