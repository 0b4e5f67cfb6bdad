//! Least Recently Used (LRU) placement.
//!
//! Every touch moves the entry to the front, so the tail is always the entry
//! that has gone longest without an add, get or update. Placement is O(1).

use super::{EvictionPolicy, Placement};

/// Recency-based policy: the touched entry always moves to the front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LruPolicy;

impl<V> EvictionPolicy<V> for LruPolicy {
    #[inline]
    fn adjust(&self, placement: &mut Placement<'_, V>) {
        placement.move_to_front();
    }

    fn name(&self) -> &'static str {
        "LRU"
    }
}
