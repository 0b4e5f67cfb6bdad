//! Logging Tests
//!
//! The cache emits `tracing` events for adds, evictions, hits, misses, updates
//! and deletes. These tests install a subscriber layer that inspects the cache
//! each time an event arrives, and check that no event is emitted while the
//! cache lock is held.

use parking_lot::Mutex;
use policy_cache::{Cache, Policy};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

/// Records the level of every event and whether the cache lock was held when
/// it was emitted.
struct LockWatcher {
    cache: Arc<Cache<i32>>,
    seen: Arc<Mutex<Vec<(Level, bool)>>>,
}

impl<S: Subscriber> Layer<S> for LockWatcher {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // Debug uses try_lock and renders "<locked>" while the mutex is held
        let held = format!("{:?}", self.cache).contains("<locked>");
        self.seen.lock().push((*event.metadata().level(), held));
    }
}

fn watch<F: FnOnce(&Cache<i32>)>(cache: Arc<Cache<i32>>, ops: F) -> Vec<(Level, bool)> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(LockWatcher {
        cache: Arc::clone(&cache),
        seen: Arc::clone(&seen),
    });
    tracing::subscriber::with_default(subscriber, || ops(&cache));
    let seen = seen.lock().clone();
    seen
}

#[test]
fn test_events_are_emitted_outside_the_lock() {
    let cache = Arc::new(Cache::with_policy(
        NonZeroUsize::new(1).unwrap(),
        Policy::Lru,
    ));

    let seen = watch(cache, |cache| {
        cache.add("a", 1).unwrap();
        cache.add("b", 2).unwrap(); // evicts "a"
        cache.get("b").unwrap();
        let _ = cache.get("a");
        cache.update("b", 3).unwrap();
        let _ = cache.add("b", 4);
        cache.delete("b").unwrap();
    });

    let levels: Vec<Level> = seen.iter().map(|(level, _)| *level).collect();
    assert_eq!(
        levels,
        vec![
            Level::TRACE, // added a
            Level::DEBUG, // evicted a
            Level::TRACE, // added b
            Level::TRACE, // hit b
            Level::TRACE, // miss a
            Level::TRACE, // updated b
            Level::TRACE, // add of b rejected
            Level::TRACE, // deleted b
        ]
    );
    assert!(
        seen.iter().all(|(_, held)| !held),
        "events emitted under the cache lock: {seen:?}"
    );
}

#[test]
fn test_invalid_keys_are_not_logged() {
    let cache = Arc::new(Cache::with_policy(
        NonZeroUsize::new(2).unwrap(),
        Policy::Fifo,
    ));

    let seen = watch(cache, |cache| {
        let _ = cache.add("", 1);
        let _ = cache.get("");
        let _ = cache.update("", 1);
        let _ = cache.delete("");
    });

    assert!(seen.is_empty(), "unexpected events: {seen:?}");
}
