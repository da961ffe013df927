//! Gencache - a bounded key-value cache with generational LRU eviction
//! and optional TTL expiry.
//!
//! Designed to be embedded as a prepared-statement cache inside a database
//! adapter: the driver supplies SQL text as keys and opaque statement
//! handles as values, reads via `get` before preparing a new statement,
//! and releases native resources from the eviction listener. The cache is
//! not internally synchronized; concurrent callers must serialize access
//! externally.
//!
//! ```
//! use gencache::{CacheConfig, GenerationalCache};
//!
//! let mut cache = GenerationalCache::new(CacheConfig::new(2)).unwrap();
//! cache.set("SELECT 1", 100);
//! assert_eq!(cache.get("SELECT 1"), Some(&100));
//! assert_eq!(cache.get("SELECT 2"), None);
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheEntry, CacheStats, EvictionListener, GenerationalCache, MirroredCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
