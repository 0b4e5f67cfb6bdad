//! Least Frequently Used (LFU) placement.
//!
//! The sequence is kept sorted by visit count, highest at the front. When an
//! entry is touched it is re-inserted in front of the first entry (scanning from
//! the front) whose visit count is strictly lower than its own. If there is no
//! such entry it goes to the back.
//!
//! Entries with equal counts keep their relative order, like a stable insertion
//! sort. A freshly added entry has zero visits, so it lands behind every entry
//! that has been visited at least once and is the next eviction victim until it
//! is read or updated.
//!
//! The scan is O(n) in the number of cached entries. There are no frequency
//! buckets; callers that need sub-linear placement should supply their own
//! policy.

use super::{EvictionPolicy, Placement};

/// Frequency-based policy: orders entries by descending visit count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LfuPolicy;

impl<V> EvictionPolicy<V> for LfuPolicy {
    fn adjust(&self, placement: &mut Placement<'_, V>) {
        if placement.len() <= 1 {
            return;
        }
        let touched = placement.touched();
        let Some(visits) = placement.touched_entry().map(|entry| entry.visit_count) else {
            return;
        };

        let mark = placement
            .iter()
            .find(|(id, entry)| *id != touched && entry.visit_count < visits)
            .map(|(id, _)| id);

        match mark {
            Some(mark) => {
                placement.move_before(mark);
            }
            None => placement.move_to_back(),
        }
    }

    fn name(&self) -> &'static str {
        "LFU"
    }
}
