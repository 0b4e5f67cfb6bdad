//! Error types.
//!
//! - [`CacheError`]: returned by cache operations for caller mistakes (empty
//!   key, duplicate add, missing key). The operation had no effect.
//! - [`ConfigError`]: returned by fallible configuration constructors.
//! - [`InconsistencyError`]: describes a cache whose key index and ordered
//!   sequence have drifted apart. This is a defect, not a caller mistake, and
//!   the engine never returns it from `add`/`get`/`update`/`delete`; it logs it
//!   and panics instead. [`Cache::check_invariants`](crate::Cache::check_invariants)
//!   hands it out as a value for diagnostics.

use thiserror::Error;

/// Errors surfaced to callers of cache operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The key was empty.
    #[error("key can not be empty")]
    InvalidKey,

    /// `add` was called with a key that is already cached.
    #[error("key {0:?} already exists")]
    AlreadyExists(String),

    /// The key is not cached.
    #[error("key {0:?} does not exist")]
    NotFound(String),
}

/// Invalid cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Capacity must hold at least one entry.
    #[error("capacity must be at least 1")]
    ZeroCapacity,
}

/// The cache's index, ordered sequence and size no longer agree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("internal inconsistency: {0}")]
pub struct InconsistencyError(String);

impl InconsistencyError {
    /// Creates a new `InconsistencyError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_display() {
        assert_eq!(CacheError::InvalidKey.to_string(), "key can not be empty");
        assert_eq!(
            CacheError::AlreadyExists("a".to_string()).to_string(),
            "key \"a\" already exists"
        );
        assert_eq!(
            CacheError::NotFound("b".to_string()).to_string(),
            "key \"b\" does not exist"
        );
    }

    #[test]
    fn test_config_error_display() {
        assert!(ConfigError::ZeroCapacity.to_string().contains("capacity"));
    }

    #[test]
    fn test_inconsistency_error() {
        let err = InconsistencyError::new("tail missing");
        assert_eq!(err.message(), "tail missing");
        assert_eq!(err.to_string(), "internal inconsistency: tail missing");
    }

    #[test]
    fn test_errors_are_std_errors() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<CacheError>();
        assert_error::<ConfigError>();
        assert_error::<InconsistencyError>();
    }
}
