//! First In, First Out (FIFO) placement.
//!
//! Entries keep the position they were inserted at. New entries are pushed to
//! the front by the engine, so the tail is always the oldest insertion and reads
//! or updates never change what gets evicted next.

use super::{EvictionPolicy, Placement};

/// Insertion-order policy: touches never reposition anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FifoPolicy;

impl<V> EvictionPolicy<V> for FifoPolicy {
    #[inline]
    fn adjust(&self, _placement: &mut Placement<'_, V>) {}

    fn name(&self) -> &'static str {
        "FIFO"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{keys, list_of};
    use super::*;

    #[test]
    fn test_fifo_never_reorders() {
        let (mut list, ids) = list_of(&[("c", 0), ("b", 3), ("a", 9)]);
        for id in ids {
            FifoPolicy.adjust(&mut Placement::new(&mut list, id));
        }
        assert_eq!(keys(&list), vec!["c", "b", "a"]);
    }
}
