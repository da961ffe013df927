//! Map-Compatible Facade
//!
//! The engine's own iteration order reflects recency, which is the wrong
//! contract for consumers that want to walk "everything in the cache" the
//! way they would walk a map. `MirroredCache` wraps one engine together
//! with an insertion-ordered mirror serving `keys`/`values`/`entries`,
//! while recency-sensitive operations pass straight through.
//!
//! The mirror is reconciled against engine liveness instead of being
//! updated from inside the eviction listener: before every
//! whole-collection iteration, and after any mutation whose eviction
//! counters moved, entries the engine no longer tracks are dropped from
//! the mirror. Reconciliation uses the engine's side-effect-free
//! `contains_live` so it cannot disturb rotation bookkeeping.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use indexmap::IndexMap;

use crate::cache::engine::GenerationalCache;
use crate::cache::CacheStats;
use crate::config::CacheConfig;
use crate::error::Result;

// == Mirrored Cache ==
/// A `GenerationalCache` plus an insertion-ordered view over all live
/// entries.
///
/// Requires `Clone` on keys and values because the mirror stores its own
/// copies; value types that are external handles should be reference
/// counted (`Rc`/`Arc`) so cloning is cheap.
pub struct MirroredCache<K, V> {
    engine: GenerationalCache<K, V>,
    /// Insertion-ordered copy of every live entry
    mirror: IndexMap<K, V>,
    /// Engine removal count (evictions + expirations) at last reconcile
    reconciled_at: u64,
}

impl<K, V> MirroredCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new mirrored cache from a validated config.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` for the same parameters the
    /// engine rejects.
    pub fn new(config: CacheConfig) -> Result<Self> {
        Ok(Self {
            engine: GenerationalCache::new(config)?,
            mirror: IndexMap::new(),
            reconciled_at: 0,
        })
    }

    // == Constructor With Listener ==
    /// Creates a new mirrored cache reporting discarded entries to
    /// `listener`.
    pub fn with_eviction_listener(
        config: CacheConfig,
        listener: impl FnMut(K, V) + Send + 'static,
    ) -> Result<Self> {
        Ok(Self {
            engine: GenerationalCache::with_eviction_listener(config, listener)?,
            mirror: IndexMap::new(),
            reconciled_at: 0,
        })
    }

    // == Set ==
    /// Stores a key-value pair in both the engine and the mirror.
    ///
    /// An overwrite keeps the key's original position in insertion order.
    pub fn set(&mut self, key: K, value: V) {
        self.mirror.insert(key.clone(), value.clone());
        self.engine.set(key, value);
        self.reconcile_if_stale();
    }

    // == Set With TTL ==
    /// Stores a key-value pair with an explicit per-entry TTL.
    pub fn set_with_ttl(&mut self, key: K, value: V, ttl: Option<Duration>) {
        self.mirror.insert(key.clone(), value.clone());
        self.engine.set_with_ttl(key, value, ttl);
        self.reconcile_if_stale();
    }

    // == Get ==
    /// Retrieves a value by key, refreshing its recency in the engine.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.engine.get(key)
    }

    // == Has ==
    /// Checks presence without promoting.
    pub fn has<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.engine.has(key)
    }

    // == Peek ==
    /// Retrieves a value without refreshing its recency.
    pub fn peek<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.engine.peek(key)
    }

    // == Delete ==
    /// Removes a key from the engine and the mirror.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.mirror.shift_remove(key);
        self.engine.delete(key)
    }

    // == Clear ==
    /// Empties the engine and the mirror; no listener notifications.
    pub fn clear(&mut self) {
        self.engine.clear();
        self.mirror.clear();
    }

    // == Resize ==
    /// Changes capacity, evicting oldest-first on shrink.
    pub fn resize(&mut self, new_max_size: usize) -> Result<()> {
        self.engine.resize(new_max_size)?;
        self.reconcile_if_stale();
        Ok(())
    }

    // == Size ==
    pub fn size(&self) -> usize {
        self.engine.size()
    }

    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.engine.max_size()
    }

    // == Stats ==
    pub fn stats(&self) -> &CacheStats {
        self.engine.stats()
    }

    // == Purge Expired ==
    /// Removes every expired entry, with listener notifications.
    pub fn purge_expired(&mut self) -> usize {
        let purged = self.engine.purge_expired();
        if purged > 0 {
            self.reconcile();
        }
        purged
    }

    // == Keys ==
    /// Iterates all live keys in insertion order.
    pub fn keys(&mut self) -> impl Iterator<Item = &K> + '_ {
        self.reconcile();
        self.mirror.keys()
    }

    // == Values ==
    /// Iterates all live values in insertion order.
    pub fn values(&mut self) -> impl Iterator<Item = &V> + '_ {
        self.reconcile();
        self.mirror.values()
    }

    // == Entries ==
    /// Iterates all live entries in insertion order.
    pub fn entries(&mut self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.reconcile();
        self.mirror.iter()
    }

    // == Recency-Ordered Iteration ==
    /// Iterates live entries oldest-first, straight from the engine.
    pub fn entries_ascending(&mut self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.engine.entries_ascending()
    }

    /// Iterates live entries newest-first, straight from the engine.
    pub fn entries_descending(&mut self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.engine.entries_descending()
    }

    // == Internal: Reconcile ==
    /// Drops mirror entries the engine no longer considers live.
    fn reconcile(&mut self) {
        let engine = &self.engine;
        self.mirror.retain(|key, _| engine.contains_live(key));
        self.reconciled_at = engine.stats().removals();
    }

    /// Reconciles only when the engine discarded something since the last
    /// reconcile, keeping mutation cost amortized.
    fn reconcile_if_stale(&mut self) {
        if self.engine.stats().removals() != self.reconciled_at {
            self.reconcile();
        }
    }
}

impl<K, V> fmt::Debug for MirroredCache<K, V>
where
    K: Hash + Eq,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MirroredCache")
            .field("engine", &self.engine)
            .field("mirror_len", &self.mirror.len())
            .finish()
    }
}
