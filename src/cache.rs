//! Capacity-Bounded Cache Engine
//!
//! [`Cache`] combines three pieces behind a single `parking_lot::Mutex`:
//!
//! - an **index** mapping each key to a [`NodeId`] handle,
//! - an **ordered sequence** (arena-backed doubly linked list) holding the
//!   entries, whose tail is always the next eviction victim,
//! - an eviction [`Policy`] that repositions an entry after it is touched.
//!
//! ```text
//!   index (HashMap<String, NodeId>)          ordered sequence
//!   ┌────────┬────────┐
//!   │ "k2"   │ id 1   │──────┐     head ─► [id 1: k2] ◄──► [id 0: k1] ◄── tail
//!   │ "k1"   │ id 0   │──┐   └───────────────┘                 ▲          (victim)
//!   └────────┴────────┘  └───────────────────────────────────────┘
//! ```
//!
//! # Operation Flow
//!
//! Every operation takes the lock, consults the index, mutates the sequence,
//! runs the policy (except `delete`), and releases the lock on every exit path.
//! Log events are emitted by [`Cache`] after the lock is released; the state
//! methods only report what happened.
//!
//! - `add`: rejects empty and duplicate keys *before* looking at capacity, so a
//!   rejected duplicate never evicts anything. When full, the tail is evicted
//!   first. The new entry is pushed to the front and the policy places it.
//! - `get` / `update`: count a visit, then let the policy reposition the entry.
//! - `delete`: unlinks the entry; no reordering.
//!
//! # Locking
//!
//! `get` moves entries and bumps visit counts, so no operation is read-only at
//! the structural level. All operations are mutually exclusive and their
//! effects are equivalent to some total order of the calls.
//!
//! # Internal Inconsistency
//!
//! If the engine ever finds the index and sequence out of step (for example the
//! cache is full but the sequence has no tail), it logs the problem, marks the
//! instance corrupted and panics. Every later call on that instance panics as
//! well; its contents can no longer be trusted.

use crate::config::CacheConfig;
use crate::entry::CacheEntry;
use crate::error::{CacheError, InconsistencyError};
use crate::list::{List, NodeId};
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use crate::policy::{Placement, Policy};
use core::fmt;
use core::hash::BuildHasher;
use core::num::NonZeroUsize;
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeMap;
use tracing::{debug, error, trace};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Unsynchronized engine state. Everything in here is guarded by the
/// [`Cache`] mutex as one unit.
pub(crate) struct CacheState<V, S = DefaultHashBuilder> {
    capacity: NonZeroUsize,
    policy: Policy<V>,
    list: List<CacheEntry<V>>,
    map: HashMap<String, NodeId, S>,
    metrics: CoreCacheMetrics,
    corrupted: bool,
}

impl<V, S: BuildHasher> CacheState<V, S> {
    pub(crate) fn with_hasher(config: CacheConfig<V>, hash_builder: S) -> Self {
        let cap = config.capacity.get();
        CacheState {
            capacity: config.capacity,
            policy: config.policy,
            list: List::with_capacity(cap),
            map: HashMap::with_capacity_and_hasher(cap, hash_builder),
            metrics: CoreCacheMetrics::new(),
            corrupted: false,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }

    /// Panics if an earlier operation found this instance inconsistent.
    fn ensure_trusted(&self) {
        if self.corrupted {
            panic!(
                "{}",
                InconsistencyError::new("cache was previously found inconsistent")
            );
        }
    }

    /// Marks the instance corrupted, logs `err` and panics.
    fn fatal(&mut self, err: InconsistencyError) -> ! {
        self.corrupted = true;
        error!(
            capacity = self.capacity.get(),
            indexed = self.map.len(),
            sequenced = self.list.len(),
            "{err}"
        );
        panic!("{err}");
    }

    fn node_of(&self, key: &str) -> Result<NodeId, CacheError> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey);
        }
        self.map
            .get(key)
            .copied()
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    /// Lets the policy place the node that was just touched.
    #[inline]
    fn reposition(&mut self, node: NodeId) {
        let mut placement = Placement::new(&mut self.list, node);
        self.policy.adjust(&mut placement);
    }

    /// Inserts `key`, returning the entry evicted to make room, if any.
    fn add(&mut self, key: &str, value: V) -> Result<Option<CacheEntry<V>>, CacheError> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey);
        }
        if self.map.contains_key(key) {
            self.metrics.record_rejected_add();
            return Err(CacheError::AlreadyExists(key.to_string()));
        }

        let evicted = if self.len() >= self.capacity.get() {
            Some(self.evict_one())
        } else {
            None
        };

        let node = self.list.push_front(CacheEntry::new(key.to_string(), value));
        self.map.insert(key.to_string(), node);
        self.metrics.record_insertion();
        self.reposition(node);
        Ok(evicted)
    }

    /// Removes the tail of the sequence to make room for one entry.
    fn evict_one(&mut self) -> CacheEntry<V> {
        let victim = match self.list.remove_last() {
            Some(victim) => victim,
            None => self.fatal(InconsistencyError::new(format!(
                "cache holds {} of {} keys but the ordered sequence has no tail to evict",
                self.map.len(),
                self.capacity
            ))),
        };
        if self.map.remove(victim.key.as_str()).is_none() {
            self.fatal(InconsistencyError::new(format!(
                "evicted key {:?} was not in the index",
                victim.key
            )));
        }
        self.metrics.record_eviction();
        victim
    }

    /// Counts a visit on `key`, optionally replaces its value, and lets the
    /// policy reposition it.
    fn touch(&mut self, key: &str, value: Option<V>) -> Result<NodeId, CacheError> {
        let node = self.node_of(key)?;
        match self.list.get_mut(node) {
            Some(entry) => {
                entry.record_visit();
                if let Some(value) = value {
                    entry.value = value;
                }
            }
            None => self.fatal(InconsistencyError::new(format!(
                "indexed key {key:?} has no node in the ordered sequence"
            ))),
        }
        self.reposition(node);
        Ok(node)
    }

    /// `touch` plus hit/miss accounting for reads.
    fn visit(&mut self, key: &str) -> Result<NodeId, CacheError> {
        match self.touch(key, None) {
            Ok(node) => {
                self.metrics.record_hit();
                Ok(node)
            }
            Err(err) => {
                if let CacheError::NotFound(_) = err {
                    self.metrics.record_miss();
                }
                Err(err)
            }
        }
    }

    fn entry(&mut self, node: NodeId, key: &str) -> &CacheEntry<V> {
        if !self.list.contains(node) {
            self.fatal(InconsistencyError::new(format!(
                "indexed key {key:?} has no node in the ordered sequence"
            )));
        }
        match self.list.get(node) {
            Some(entry) => entry,
            None => unreachable!("node presence checked above"),
        }
    }

    fn get_with<F, R>(&mut self, key: &str, f: F) -> Result<R, CacheError>
    where
        F: FnOnce(&V) -> R,
    {
        let node = self.visit(key)?;
        Ok(f(&self.entry(node, key).value))
    }

    fn update(&mut self, key: &str, value: V) -> Result<(), CacheError> {
        self.touch(key, Some(value))?;
        self.metrics.record_update();
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), CacheError> {
        let node = self.node_of(key)?;
        if self.list.remove(node).is_none() {
            self.fatal(InconsistencyError::new(format!(
                "indexed key {key:?} has no node in the ordered sequence"
            )));
        }
        self.map.remove(key);
        self.metrics.record_deletion();
        Ok(())
    }

    /// Reads an entry without counting a visit or reordering.
    fn peek_with<F, R>(&mut self, key: &str, f: F) -> Result<R, CacheError>
    where
        F: FnOnce(&CacheEntry<V>) -> R,
    {
        let node = self.node_of(key)?;
        Ok(f(self.entry(node, key)))
    }

    fn keys(&self) -> Vec<String> {
        self.list.iter().map(|(_, entry)| entry.key.clone()).collect()
    }

    fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }

    fn check_invariants(&self) -> Result<(), InconsistencyError> {
        if self.corrupted {
            return Err(InconsistencyError::new(
                "cache was previously found inconsistent",
            ));
        }
        if self.map.len() != self.list.len() {
            return Err(InconsistencyError::new(format!(
                "index holds {} keys but the ordered sequence holds {} entries",
                self.map.len(),
                self.list.len()
            )));
        }
        if self.len() > self.capacity.get() {
            return Err(InconsistencyError::new(format!(
                "size {} exceeds capacity {}",
                self.len(),
                self.capacity
            )));
        }
        self.list.verify_links().map_err(InconsistencyError::new)?;
        for (key, &node) in self.map.iter() {
            match self.list.get(node) {
                Some(entry) if entry.key == *key => {}
                Some(entry) => {
                    return Err(InconsistencyError::new(format!(
                        "index maps {key:?} to a node holding {:?}",
                        entry.key
                    )))
                }
                None => {
                    return Err(InconsistencyError::new(format!(
                        "index maps {key:?} to a vacant node"
                    )))
                }
            }
        }
        Ok(())
    }
}

impl<V, S> fmt::Debug for CacheState<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheState")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .field("policy", &self.policy)
            .finish()
    }
}

/// A thread-safe, capacity-bounded cache with a pluggable eviction policy.
///
/// Keys are non-empty strings. Capacity is a number of entries and never
/// changes. Share the cache between threads with an `Arc`.
///
/// # Examples
///
/// ```
/// use policy_cache::{Cache, CacheError};
/// use core::num::NonZeroUsize;
///
/// let cache = Cache::new(NonZeroUsize::new(2).unwrap());
///
/// cache.add("apple", 1).unwrap();
/// cache.add("banana", 2).unwrap();
///
/// // Reading "apple" makes "banana" the least recently used entry
/// assert_eq!(cache.get("apple"), Ok(1));
///
/// cache.add("cherry", 3).unwrap();
/// assert_eq!(cache.get("banana"), Err(CacheError::NotFound("banana".to_string())));
/// assert_eq!(cache.get("cherry"), Ok(3));
///
/// // add never overwrites; update never creates
/// assert!(cache.add("apple", 10).is_err());
/// assert!(cache.update("durian", 4).is_err());
/// ```
pub struct Cache<V, S = DefaultHashBuilder> {
    state: Mutex<CacheState<V, S>>,
    policy_name: &'static str,
}

impl<V> Cache<V, DefaultHashBuilder> {
    /// Creates an LRU cache holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::init(CacheConfig::new(capacity), None)
    }

    /// Creates a cache with the given eviction policy.
    pub fn with_policy(capacity: NonZeroUsize, policy: Policy<V>) -> Self {
        Self::init(CacheConfig { capacity, policy }, None)
    }

    /// Creates a cache from a configuration with an optional hasher.
    ///
    /// If `hasher` is `None`, uses `DefaultHashBuilder`.
    pub fn init(config: CacheConfig<V>, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<V, S: BuildHasher> Cache<V, S> {
    /// Creates a cache with a custom hash builder for the key index.
    pub fn init_with_hasher(config: CacheConfig<V>, hash_builder: S) -> Self {
        debug!(
            capacity = config.capacity.get(),
            policy = config.policy.name(),
            "creating cache"
        );
        Self {
            policy_name: config.policy.name(),
            state: Mutex::new(CacheState::with_hasher(config, hash_builder)),
        }
    }

    /// Locks the state, refusing to hand out an instance known to be corrupt.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, CacheState<V, S>> {
        let state = self.state.lock();
        state.ensure_trusted();
        state
    }

    /// Inserts a new entry.
    ///
    /// If the cache is full, the entry at the tail of the ordered sequence is
    /// evicted first. The new entry starts with zero visits and is placed by
    /// the policy.
    ///
    /// # Errors
    ///
    /// - [`CacheError::InvalidKey`] if `key` is empty.
    /// - [`CacheError::AlreadyExists`] if `key` is cached; the existing entry is
    ///   left untouched and nothing is evicted.
    pub fn add(&self, key: impl Into<String>, value: V) -> Result<(), CacheError> {
        let key = key.into();
        let result = self.lock().add(&key, value);
        match result {
            Ok(evicted) => {
                if let Some(victim) = evicted {
                    debug!(
                        key = %victim.key,
                        visits = victim.visit_count,
                        policy = self.policy_name,
                        "evicted entry"
                    );
                }
                trace!(key = %key, "added entry");
                Ok(())
            }
            Err(err) => {
                if let CacheError::AlreadyExists(_) = err {
                    trace!(key = %key, "add rejected, key already cached");
                }
                Err(err)
            }
        }
    }

    /// Returns a clone of the cached value, counting a visit.
    ///
    /// # Errors
    ///
    /// - [`CacheError::InvalidKey`] if `key` is empty.
    /// - [`CacheError::NotFound`] if `key` is not cached.
    pub fn get(&self, key: &str) -> Result<V, CacheError>
    where
        V: Clone,
    {
        self.get_with(key, V::clone)
    }

    /// Applies `f` to the cached value while the lock is held, counting a visit.
    ///
    /// Avoids cloning when only part of the value is needed. `f` runs inside the
    /// critical section: it must not block, perform I/O, or call back into this
    /// cache.
    ///
    /// ```
    /// use policy_cache::Cache;
    /// use core::num::NonZeroUsize;
    ///
    /// let cache = Cache::new(NonZeroUsize::new(4).unwrap());
    /// cache.add("greeting", "hello world".to_string()).unwrap();
    /// assert_eq!(cache.get_with("greeting", |s| s.len()), Ok(11));
    /// ```
    pub fn get_with<F, R>(&self, key: &str, f: F) -> Result<R, CacheError>
    where
        F: FnOnce(&V) -> R,
    {
        let result = self.lock().get_with(key, f);
        match &result {
            Ok(_) => trace!(key = %key, "cache hit"),
            Err(CacheError::NotFound(_)) => trace!(key = %key, "cache miss"),
            Err(_) => {}
        }
        result
    }

    /// Replaces the value of an existing entry, counting a visit.
    ///
    /// # Errors
    ///
    /// - [`CacheError::InvalidKey`] if `key` is empty.
    /// - [`CacheError::NotFound`] if `key` is not cached; nothing is created.
    pub fn update(&self, key: &str, value: V) -> Result<(), CacheError> {
        self.lock().update(key, value)?;
        trace!(key = %key, "updated entry");
        Ok(())
    }

    /// Removes an entry. The policy is not consulted.
    ///
    /// # Errors
    ///
    /// - [`CacheError::InvalidKey`] if `key` is empty.
    /// - [`CacheError::NotFound`] if `key` is not cached.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.lock().delete(key)?;
        trace!(key = %key, "deleted entry");
        Ok(())
    }

    /// Returns a clone of the cached value without counting a visit or
    /// reordering.
    pub fn peek(&self, key: &str) -> Result<V, CacheError>
    where
        V: Clone,
    {
        self.lock().peek_with(key, |entry| entry.value.clone())
    }

    /// Returns how many times `key` has been read or updated.
    pub fn visits(&self, key: &str) -> Result<u64, CacheError> {
        self.lock().peek_with(key, |entry| entry.visit_count)
    }

    /// Returns true if `key` is cached. Does not count a visit.
    pub fn contains(&self, key: &str) -> bool {
        !key.is_empty() && self.lock().map.contains_key(key)
    }

    /// Returns the keys in sequence order, front to back.
    ///
    /// The last key is the next eviction victim.
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys()
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the cache contains no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> NonZeroUsize {
        self.lock().capacity
    }

    /// Returns the name of the eviction policy.
    pub fn policy_name(&self) -> &'static str {
        self.policy_name
    }

    /// Removes every entry. Counters are kept.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Returns a copy of the raw counters.
    pub fn core_metrics(&self) -> CoreCacheMetrics {
        self.lock().metrics.clone()
    }

    /// Verifies that the index, ordered sequence and size agree.
    ///
    /// Does not panic on a corrupted instance; reports it instead.
    pub fn check_invariants(&self) -> Result<(), InconsistencyError> {
        self.state.lock().check_invariants()
    }
}

impl<V, S: BuildHasher> CacheMetrics for Cache<V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        let state = self.lock();
        state
            .metrics
            .to_btreemap(state.len(), state.capacity.get())
    }

    fn algorithm_name(&self) -> &'static str {
        self.policy_name()
    }
}

impl<V, S> fmt::Debug for Cache<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_lock() {
            Some(state) => f.debug_struct("Cache").field("state", &*state).finish(),
            None => f
                .debug_struct("Cache")
                .field("state", &"<locked>")
                .finish(),
        }
    }
}
