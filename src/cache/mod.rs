//! Cache Module
//!
//! Provides bounded in-memory caching with generational LRU eviction and
//! TTL expiration.

mod engine;
mod entry;
mod facade;
mod stats;


// Re-export public types
pub use engine::{EvictionListener, GenerationalCache};
pub use entry::CacheEntry;
pub use facade::MirroredCache;
pub use stats::CacheStats;
