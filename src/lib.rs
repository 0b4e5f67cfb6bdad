#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Choosing a Policy
//!
//! | Policy | Evicts | Best Use Case |
//! |--------|--------|---------------|
//! | [`Policy::Lru`] | Least recently touched entry | General purpose, recency-based access |
//! | [`Policy::Fifo`] | Oldest inserted entry | Streams where reads say nothing about reuse |
//! | [`Policy::Lfu`] | Least visited entry | Stable popularity patterns |
//! | [`Policy::Custom`] | Whatever your [`EvictionPolicy`] places last | Experiments, domain rules |
//!
//! ## Performance Characteristics
//!
//! | Policy | add | get | update | delete |
//! |--------|-----|-----|--------|--------|
//! | LRU    | O(1)| O(1)| O(1)   | O(1)   |
//! | FIFO   | O(1)| O(1)| O(1)   | O(1)   |
//! | LFU    | O(n)| O(n)| O(n)   | O(1)   |
//!
//! LFU pays a linear scan of the ordered sequence on every touch.
//!
//! ## Code Examples
//!
//! ### FIFO (First In, First Out)
//!
//! ```rust
//! use policy_cache::{Cache, Policy};
//! use core::num::NonZeroUsize;
//!
//! let cache = Cache::with_policy(NonZeroUsize::new(2).unwrap(), Policy::Fifo);
//! cache.add("a", 1).unwrap();
//! cache.add("b", 2).unwrap();
//! cache.get("a").unwrap(); // reads do not protect "a"
//! cache.add("c", 3).unwrap();
//! assert!(!cache.contains("a"));
//! assert_eq!(cache.keys(), vec!["c", "b"]);
//! ```
//!
//! ### LFU (Least Frequently Used)
//!
//! ```rust
//! use policy_cache::{Cache, Policy};
//! use core::num::NonZeroUsize;
//!
//! let cache = Cache::with_policy(NonZeroUsize::new(2).unwrap(), Policy::Lfu);
//! cache.add("hot", 1).unwrap();
//! cache.add("cold", 2).unwrap();
//! for _ in 0..3 {
//!     cache.get("hot").unwrap();
//! }
//! cache.add("new", 3).unwrap(); // "cold" has the fewest visits
//! assert!(cache.contains("hot"));
//! assert!(!cache.contains("cold"));
//! ```
//!
//! ## Sharing Between Threads
//!
//! Every operation takes `&self`; wrap the cache in an `Arc`:
//!
//! ```rust
//! use policy_cache::Cache;
//! use core::num::NonZeroUsize;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache: Arc<Cache<u64>> = Arc::new(Cache::new(NonZeroUsize::new(64).unwrap()));
//! let handles: Vec<_> = (0..4u64)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for i in 0..16 {
//!                 cache.add(format!("t{t}-{i}"), i).unwrap();
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 64);
//! ```
//!
//! ## Modules
//!
//! - [`cache`]: The cache engine
//! - [`policy`]: Built-in and custom eviction policies
//! - [`config`]: Construction-time configuration
//! - [`entry`]: The per-key record
//! - [`error`]: Error types
//! - [`metrics`]: Counters and metrics reporting

#[cfg(test)]
extern crate scoped_threadpool;

/// Cache entry type.
///
/// A `CacheEntry<V>` holds the key, the value and the visit count.
pub mod entry;

/// Arena-backed doubly linked list with stable node handles.
///
/// **Note**: This module is internal infrastructure. Only [`NodeId`] is
/// visible to library consumers, through the [`policy`] API.
pub(crate) mod list;

/// Eviction policies.
///
/// Provides LRU, FIFO and LFU plus the [`EvictionPolicy`] trait for custom
/// strategies.
pub mod policy;

/// Cache configuration structures.
pub mod config;

/// Error types.
pub mod error;

/// Cache metrics system.
///
/// Provides counters maintained under the cache lock and a uniform reporting
/// interface.
pub mod metrics;

/// The thread-safe cache engine.
pub mod cache;

pub use cache::Cache;
pub use config::CacheConfig;
pub use entry::CacheEntry;
pub use error::{CacheError, ConfigError, InconsistencyError};
pub use list::NodeId;
pub use metrics::{CacheMetrics, CoreCacheMetrics};
pub use policy::{EvictionPolicy, Placement, Policy};
