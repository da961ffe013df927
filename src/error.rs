//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Under normal operation the cache raises errors only from construction
/// and `resize`; lookups report absence through `Option`, not errors.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid construction or resize parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
