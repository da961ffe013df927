//! Configuration Module
//!
//! Construction parameters for a cache instance, with validation.

use std::time::Duration;

use crate::error::{CacheError, Result};

// == Cache Config ==
/// Construction parameters for a cache.
///
/// `max_size` bounds the number of live entries. `max_age` is the default
/// time-to-live applied by `set`; `None` means entries never expire.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of live entries the cache can hold (must be >= 1)
    pub max_size: usize,
    /// Default TTL for new entries, None = no expiration
    pub max_age: Option<Duration>,
}

impl CacheConfig {
    // == Constructor ==
    /// Creates a config with the given capacity and no default TTL.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            max_age: None,
        }
    }

    // == With Max Age ==
    /// Sets the default TTL applied to entries stored via `set`.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    // == Validate ==
    /// Checks the config for invalid parameters.
    ///
    /// Rejects a zero `max_size` and a finite `max_age` of exactly zero.
    /// A missing `max_age` (no expiration) is valid.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be at least 1".to_string(),
            ));
        }
        if self.max_age == Some(Duration::ZERO) {
            return Err(CacheError::InvalidConfig(
                "max_age must be a positive duration".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            max_age: None,
        }
    }
}
