//! Cache Configuration
//!
//! A cache is configured with exactly two construction-time parameters:
//!
//! - **`capacity`**: the maximum number of entries. Capacity is counted in
//!   entries only; value sizes are not tracked.
//! - **`policy`**: the [`Policy`] that decides which entry is evicted next.
//!
//! Both are fixed for the lifetime of the cache.
//!
//! # Examples
//!
//! ```
//! use policy_cache::config::CacheConfig;
//! use policy_cache::policy::Policy;
//! use policy_cache::Cache;
//! use core::num::NonZeroUsize;
//!
//! let config = CacheConfig {
//!     capacity: NonZeroUsize::new(1000).unwrap(),
//!     policy: Policy::Lfu,
//! };
//! let cache: Cache<Vec<u8>> = Cache::init(config, None);
//! assert_eq!(cache.capacity().get(), 1000);
//! assert_eq!(cache.policy_name(), "LFU");
//! ```

use crate::error::ConfigError;
use crate::policy::Policy;
use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for a [`Cache`](crate::Cache).
///
/// # Fields
///
/// - `capacity`: Maximum number of entries the cache can hold.
/// - `policy`: Eviction policy; LRU unless stated otherwise.
pub struct CacheConfig<V> {
    /// Maximum number of entries the cache can hold.
    pub capacity: NonZeroUsize,
    /// Eviction policy consulted after every add, get and update.
    pub policy: Policy<V>,
}

impl<V> CacheConfig<V> {
    /// LRU configuration with the given capacity.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            policy: Policy::default(),
        }
    }

    /// Builds a configuration from an unchecked capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] if `capacity` is 0.
    pub fn try_new(capacity: usize, policy: Policy<V>) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(ConfigError::ZeroCapacity)?;
        Ok(Self { capacity, policy })
    }
}

impl<V> Clone for CacheConfig<V> {
    fn clone(&self) -> Self {
        Self {
            capacity: self.capacity,
            policy: self.policy.clone(),
        }
    }
}

impl<V> fmt::Debug for CacheConfig<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .finish()
    }
}
