//! Generational Cache Engine
//!
//! Approximates LRU eviction with two insertion-ordered generations instead
//! of per-access reordering. New and recently used entries live in the
//! *active* generation; once `max_size` distinct keys have been inserted the
//! generations rotate: everything still sitting in the *previous* generation
//! is evicted, the filled active generation becomes the new previous one,
//! and an empty active generation starts filling. A `get` that finds its key
//! in the previous generation promotes it back into the active one, which is
//! the only recency bookkeeping performed.
//!
//! TTL expiration is lazy: an expired entry stays in place until an
//! operation visits it, at which point it is removed and the eviction
//! listener fires exactly once.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::mem;
use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Eviction Listener ==
/// Callback invoked with ownership of each entry the cache stops tracking
/// through rotation, TTL expiration, or resize.
///
/// The cache does not own the lifecycle of its values; when they are
/// external resources (e.g. prepared-statement handles) this callback is the
/// owner's only signal to release them. Listeners must not panic: the cache
/// is structurally consistent before the listener runs, but a panic
/// propagates out of whatever operation triggered the eviction.
pub type EvictionListener<K, V> = Box<dyn FnMut(K, V) + Send>;

// == Generational Cache ==
/// Bounded key-value cache with generational LRU eviction and optional TTL.
///
/// Not internally synchronized: a single logical caller at a time is
/// assumed, and concurrent embeddings must serialize access externally
/// (e.g. behind a mutex). No operation blocks or runs background work.
pub struct GenerationalCache<K, V> {
    /// Generation currently being filled; holds the most recent entries
    active: IndexMap<K, CacheEntry<V>>,
    /// The prior full generation, serving as the eviction reservoir
    previous: IndexMap<K, CacheEntry<V>>,
    /// Distinct keys inserted into `active` since the last rotation
    active_count: usize,
    /// Maximum number of live entries
    max_size: usize,
    /// Default TTL for entries stored via `set`, None = no expiration
    max_age: Option<Duration>,
    /// Eviction listener, invoked once per discarded entry
    on_eviction: Option<EvictionListener<K, V>>,
    /// Performance statistics
    stats: CacheStats,
}

impl<K, V> GenerationalCache<K, V>
where
    K: Hash + Eq,
{
    // == Constructor ==
    /// Creates a new cache from a validated config.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` if `max_size` is zero or a
    /// finite `max_age` of exactly zero was supplied.
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::build(config, None)
    }

    // == Constructor With Listener ==
    /// Creates a new cache that reports discarded entries to `listener`.
    pub fn with_eviction_listener(
        config: CacheConfig,
        listener: impl FnMut(K, V) + Send + 'static,
    ) -> Result<Self> {
        Self::build(config, Some(Box::new(listener)))
    }

    fn build(config: CacheConfig, on_eviction: Option<EvictionListener<K, V>>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            active: IndexMap::new(),
            previous: IndexMap::new(),
            active_count: 0,
            max_size: config.max_size,
            max_age: config.max_age,
            on_eviction,
            stats: CacheStats::new(),
        })
    }

    // == Get ==
    /// Retrieves a value by key, refreshing its recency.
    ///
    /// A hit in the active generation needs no structural change. A hit in
    /// the previous generation promotes the entry into the active one via
    /// the insertion path, so a promotion can itself trigger a rotation.
    /// Expired entries encountered either way are removed, reported to the
    /// eviction listener, and counted as misses.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.active.contains_key(key) {
            if self.expire_from_active(key) {
                self.stats.record_miss();
                return None;
            }
            self.stats.record_hit();
            return self.active.get(key).map(|entry| &entry.value);
        }

        if let Some((owned_key, entry)) = self.previous.shift_remove_entry(key) {
            if entry.is_expired() {
                trace!("dropping expired entry from previous generation");
                self.stats.record_expiration();
                self.stats.record_miss();
                self.notify(owned_key, entry);
                return None;
            }

            trace!("promoting entry into active generation");
            self.stats.record_hit();
            self.insert_active(owned_key, entry);
            // A rotation during promotion moves the promoted entry into the
            // previous generation along with the rest of the active one.
            return self
                .active
                .get(key)
                .or_else(|| self.previous.get(key))
                .map(|entry| &entry.value);
        }

        self.stats.record_miss();
        None
    }

    // == Set ==
    /// Stores a key-value pair using the default TTL.
    ///
    /// Overwriting a key already in the active generation replaces the
    /// entry in place. Inserting a new key increments the active count and
    /// rotates the generations once the count reaches `max_size`.
    pub fn set(&mut self, key: K, value: V) {
        self.set_with_ttl(key, value, self.max_age);
    }

    // == Set With TTL ==
    /// Stores a key-value pair with an explicit per-entry TTL.
    ///
    /// `None` stores the entry without expiration, overriding a finite
    /// default `max_age`.
    pub fn set_with_ttl(&mut self, key: K, value: V, ttl: Option<Duration>) {
        self.insert_active(key, CacheEntry::new(value, ttl));
    }

    // == Has ==
    /// Checks whether a key is present and unexpired, without promoting it.
    ///
    /// An expired entry found by the check is removed and reported to the
    /// eviction listener.
    pub fn has<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.active.contains_key(key) {
            return !self.expire_from_active(key);
        }
        if self.previous.contains_key(key) {
            return !self.expire_from_previous(key);
        }
        false
    }

    // == Peek ==
    /// Retrieves a value without refreshing its recency.
    ///
    /// Applies lazy-expiry side effects only; never promotes and never
    /// rotates, so a peeked entry is evicted no later than an untouched one.
    pub fn peek<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.active.contains_key(key) {
            if self.expire_from_active(key) {
                return None;
            }
            return self.active.get(key).map(|entry| &entry.value);
        }
        if self.previous.contains_key(key) {
            if self.expire_from_previous(key) {
                return None;
            }
            return self.previous.get(key).map(|entry| &entry.value);
        }
        None
    }

    // == Contains Live ==
    /// Side-effect-free presence check: present in either generation and
    /// not expired. Unlike `has`, never removes anything.
    pub fn contains_live<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(entry) = self.active.get(key) {
            return !entry.is_expired();
        }
        self.previous
            .get(key)
            .map_or(false, |entry| !entry.is_expired())
    }

    // == Delete ==
    /// Removes a key from both generations.
    ///
    /// Returns whether the key was present in either. The eviction listener
    /// is not invoked: an explicit delete returns responsibility for the
    /// value to the caller.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let in_active = self.active.shift_remove(key).is_some();
        if in_active {
            self.active_count -= 1;
        }
        let in_previous = self.previous.shift_remove(key).is_some();
        in_active || in_previous
    }

    // == Clear ==
    /// Empties both generations and resets the active count.
    ///
    /// A bulk discard, not an eviction: no listener notifications fire.
    pub fn clear(&mut self) {
        self.active.clear();
        self.previous.clear();
        self.active_count = 0;
    }

    // == Resize ==
    /// Changes the capacity, evicting the oldest entries on shrink.
    ///
    /// Live entries are collected oldest-first (previous generation
    /// entries not shadowed by active ones, then active entries, each in
    /// insertion order), purging expired entries along the way. When the
    /// survivors fit the new capacity they all become the active
    /// generation; otherwise the oldest overflow entries are evicted with
    /// one listener call each and the remainder becomes the previous
    /// generation.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` if `new_max_size` is zero.
    pub fn resize(&mut self, new_max_size: usize) -> Result<()> {
        if new_max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be at least 1".to_string(),
            ));
        }

        self.purge_expired();

        let active = mem::take(&mut self.active);
        let previous = mem::take(&mut self.previous);
        let mut entries: Vec<(K, CacheEntry<V>)> =
            Vec::with_capacity(active.len() + previous.len());
        for (key, entry) in previous {
            if !active.contains_key(&key) {
                entries.push((key, entry));
            }
        }
        entries.extend(active);

        let total = entries.len();
        if total <= new_max_size {
            self.active = entries.into_iter().collect();
            self.active_count = total;
        } else {
            let overflow = total - new_max_size;
            debug!(overflow, new_max_size, "resize evicting oldest entries");
            let mut entries = entries.into_iter();
            for (key, entry) in entries.by_ref().take(overflow) {
                self.stats.record_eviction();
                self.notify(key, entry);
            }
            self.previous = entries.collect();
            self.active_count = 0;
        }
        self.max_size = new_max_size;
        Ok(())
    }

    // == Size ==
    /// Number of distinct live keys, bounded by `max_size`.
    ///
    /// Recomputed on demand rather than tracked incrementally, because
    /// shadowing between the generations changes as promotions occur.
    pub fn size(&self) -> usize {
        let unshadowed = self
            .previous
            .keys()
            .filter(|key| !self.active.contains_key(*key))
            .count();
        (self.active_count + unshadowed).min(self.max_size)
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    // == Max Size ==
    /// Current capacity.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == Stats ==
    /// Current performance statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    // == Purge Expired ==
    /// Removes every expired entry from both generations.
    ///
    /// Each removed entry is reported to the eviction listener. Returns
    /// the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let mut purged = 0;

        let active = mem::take(&mut self.active);
        for (key, entry) in active {
            if entry.is_expired() {
                purged += 1;
                self.active_count -= 1;
                self.stats.record_expiration();
                self.notify(key, entry);
            } else {
                self.active.insert(key, entry);
            }
        }

        let previous = mem::take(&mut self.previous);
        for (key, entry) in previous {
            if entry.is_expired() {
                purged += 1;
                self.stats.record_expiration();
                self.notify(key, entry);
            } else {
                self.previous.insert(key, entry);
            }
        }

        if purged > 0 {
            trace!(purged, "purged expired entries");
        }
        purged
    }

    // == Entries Ascending ==
    /// Iterates all live entries oldest-first: previous-generation entries
    /// not shadowed by active ones in insertion order, then active entries
    /// in insertion order.
    ///
    /// Expired entries are purged (with listener notifications) when the
    /// iterator is created. Restartable: each call walks the full cache.
    pub fn entries_ascending(&mut self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.purge_expired();
        let active = &self.active;
        self.previous
            .iter()
            .filter(move |(key, _)| !active.contains_key(*key))
            .chain(active.iter())
            .map(|(key, entry)| (key, &entry.value))
    }

    // == Entries Descending ==
    /// Iterates all live entries newest-first: active entries in reverse
    /// insertion order, then unshadowed previous-generation entries in
    /// reverse insertion order. A true reverse traversal, not a reversed
    /// collect of the ascending walk.
    pub fn entries_descending(&mut self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.purge_expired();
        let active = &self.active;
        active
            .iter()
            .rev()
            .chain(
                self.previous
                    .iter()
                    .rev()
                    .filter(move |(key, _)| !active.contains_key(*key)),
            )
            .map(|(key, entry)| (key, &entry.value))
    }

    // == Internal: Insert Into Active ==
    /// The shared insertion path for `set` and promotion.
    ///
    /// Overwrites in place without touching the count; a genuinely new key
    /// increments the count and rotates once it reaches `max_size`.
    fn insert_active(&mut self, key: K, entry: CacheEntry<V>) {
        if self.active.insert(key, entry).is_none() {
            self.active_count += 1;
            if self.active_count >= self.max_size {
                self.rotate();
            }
        }
    }

    // == Internal: Rotate ==
    /// Retires the previous generation, evicting its contents.
    ///
    /// The generation swap completes before any listener runs, so the
    /// cache is structurally consistent if a listener panics.
    fn rotate(&mut self) {
        self.active_count = 0;
        let retired = mem::replace(&mut self.previous, mem::take(&mut self.active));
        self.stats.record_rotation();
        debug!(evicting = retired.len(), "rotating generations");
        for (key, entry) in retired {
            self.stats.record_eviction();
            self.notify(key, entry);
        }
    }

    // == Internal: Lazy Expiry ==
    /// Removes `key` from the active generation if its entry has expired.
    /// Returns whether an expired entry was removed.
    fn expire_from_active<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.active.get(key) {
            Some(entry) if entry.is_expired() => {}
            _ => return false,
        }
        if let Some((owned_key, entry)) = self.active.shift_remove_entry(key) {
            trace!("dropping expired entry from active generation");
            self.active_count -= 1;
            self.stats.record_expiration();
            self.notify(owned_key, entry);
        }
        true
    }

    /// Removes `key` from the previous generation if its entry has expired.
    fn expire_from_previous<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.previous.get(key) {
            Some(entry) if entry.is_expired() => {}
            _ => return false,
        }
        if let Some((owned_key, entry)) = self.previous.shift_remove_entry(key) {
            trace!("dropping expired entry from previous generation");
            self.stats.record_expiration();
            self.notify(owned_key, entry);
        }
        true
    }

    // == Internal: Notify ==
    fn notify(&mut self, key: K, entry: CacheEntry<V>) {
        if let Some(listener) = self.on_eviction.as_mut() {
            listener(key, entry.value);
        }
    }
}

impl<K, V> fmt::Debug for GenerationalCache<K, V>
where
    K: Hash + Eq,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationalCache")
            .field("max_size", &self.max_size)
            .field("size", &self.size())
            .field("active_count", &self.active_count)
            .field("stats", &self.stats)
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::thread::sleep;

    fn cache(max_size: usize) -> GenerationalCache<String, i32> {
        GenerationalCache::new(CacheConfig::new(max_size)).unwrap()
    }

    fn cache_with_log(
        max_size: usize,
    ) -> (GenerationalCache<String, i32>, Arc<Mutex<Vec<(String, i32)>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let cache = GenerationalCache::with_eviction_listener(
            CacheConfig::new(max_size),
            move |key, value| sink.lock().unwrap().push((key, value)),
        )
        .unwrap();
        (cache, log)
    }

    #[test]
    fn test_new_rejects_zero_max_size() {
        let result = GenerationalCache::<String, i32>::new(CacheConfig::new(0));
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_new_rejects_zero_max_age() {
        let config = CacheConfig::new(10).with_max_age(Duration::ZERO);
        let result = GenerationalCache::<String, i32>::new(config);
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_set_and_get() {
        let mut cache = cache(100);

        cache.set("key1".to_string(), 1);
        assert_eq!(cache.get("key1"), Some(&1));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let mut cache = cache(100);
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let mut cache = cache(100);

        cache.set("key1".to_string(), 1);
        cache.set("key1".to_string(), 2);

        assert_eq!(cache.get("key1"), Some(&2));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_rotation_scenario() {
        // max_size = 2: set a, set b rotates with nothing to evict; a
        // promoted get moves it out of the previous generation, so the
        // rotation caused by set c evicts only b.
        let (mut cache, log) = cache_with_log(2);

        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);
        assert!(log.lock().unwrap().is_empty());

        assert_eq!(cache.get("a"), Some(&1));

        cache.set("c".to_string(), 3);
        assert_eq!(log.lock().unwrap().as_slice(), &[("b".to_string(), 2)]);

        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(&1));
        assert_eq!(cache.get("c"), Some(&3));
    }

    #[test]
    fn test_promotion_survives_rotation() {
        let (mut cache, log) = cache_with_log(2);

        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);

        // Promote a; the rotation triggered by set c then evicts only b.
        assert_eq!(cache.get("a"), Some(&1));
        cache.set("c".to_string(), 3);

        assert_eq!(cache.get("a"), Some(&1));
        assert!(log.lock().unwrap().contains(&("b".to_string(), 2)));
    }

    #[test]
    fn test_peek_has_no_recency_effect() {
        let (mut cache, log) = cache_with_log(2);

        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);

        // a sits in the previous generation; peek must leave it there.
        assert_eq!(cache.peek("a"), Some(&1));

        cache.set("c".to_string(), 3);
        cache.set("d".to_string(), 4);

        assert_eq!(cache.get("a"), None);
        assert!(log.lock().unwrap().contains(&("a".to_string(), 1)));
    }

    #[test]
    fn test_has_does_not_promote() {
        let (mut cache, _log) = cache_with_log(2);

        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);

        assert!(cache.has("a"));

        cache.set("c".to_string(), 3);
        cache.set("d".to_string(), 4);

        assert!(!cache.has("a"));
    }

    #[test]
    fn test_delete_both_generations() {
        let mut cache = cache(2);

        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);
        // a and b are in the previous generation now
        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));

        cache.set("c".to_string(), 1);
        assert!(cache.delete("c"));
        assert_eq!(cache.get("c"), None);
    }

    #[test]
    fn test_delete_fires_no_notification() {
        let (mut cache, log) = cache_with_log(10);

        cache.set("a".to_string(), 1);
        assert!(cache.delete("a"));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_delete_resets_rotation_pressure() {
        let (mut cache, log) = cache_with_log(2);

        cache.set("a".to_string(), 1);
        assert!(cache.delete("a"));
        // Only one distinct key is live after this set; no rotation yet.
        cache.set("b".to_string(), 2);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_clear_discards_without_notifications() {
        let (mut cache, log) = cache_with_log(10);

        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);
        cache.clear();

        assert_eq!(cache.size(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
        assert!(!cache.has("b"));
        assert_eq!(cache.peek("b"), None);
        assert!(log.lock().unwrap().is_empty());

        // Idempotent
        cache.clear();
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_ttl_expiry_notifies_exactly_once() {
        let (mut cache, log) = cache_with_log(10);

        cache.set_with_ttl("x".to_string(), 1, Some(Duration::from_millis(50)));
        assert_eq!(cache.get("x"), Some(&1));

        sleep(Duration::from_millis(60));

        assert_eq!(cache.get("x"), None);
        assert!(!cache.has("x"));
        assert_eq!(cache.peek("x"), None);
        assert_eq!(log.lock().unwrap().as_slice(), &[("x".to_string(), 1)]);
    }

    #[test]
    fn test_default_max_age_applies_to_set() {
        let config = CacheConfig::new(10).with_max_age(Duration::from_millis(40));
        let mut cache = GenerationalCache::<String, i32>::new(config).unwrap();

        cache.set("a".to_string(), 1);
        // Per-entry override: no expiration despite the default.
        cache.set_with_ttl("b".to_string(), 2, None);

        sleep(Duration::from_millis(50));

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(&2));
    }

    #[test]
    fn test_resize_shrink_evicts_oldest_first() {
        // Five live keys, resize to 2: k1..k3 go, in insertion order.
        let (mut cache, log) = cache_with_log(5);

        for i in 1..=5 {
            cache.set(format!("k{i}"), i);
        }
        assert_eq!(cache.size(), 5);

        cache.resize(2).unwrap();

        assert_eq!(
            log.lock().unwrap().as_slice(),
            &[
                ("k1".to_string(), 1),
                ("k2".to_string(), 2),
                ("k3".to_string(), 3)
            ]
        );
        assert_eq!(cache.max_size(), 2);
        assert_eq!(cache.get("k4"), Some(&4));
        assert_eq!(cache.get("k5"), Some(&5));
        assert_eq!(cache.get("k1"), None);
        assert_eq!(cache.get("k2"), None);
        assert_eq!(cache.get("k3"), None);
    }

    #[test]
    fn test_resize_grow_keeps_everything() {
        let (mut cache, log) = cache_with_log(2);

        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);
        cache.resize(10).unwrap();

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(cache.max_size(), 10);
        assert_eq!(cache.get("a"), Some(&1));
        assert_eq!(cache.get("b"), Some(&2));

        // Room for more without rotation pressure
        cache.set("c".to_string(), 3);
        assert_eq!(cache.size(), 3);
    }

    #[test]
    fn test_resize_rejects_zero() {
        let mut cache = cache(5);
        assert!(matches!(
            cache.resize(0),
            Err(CacheError::InvalidConfig(_))
        ));
        assert_eq!(cache.max_size(), 5);
    }

    #[test]
    fn test_size_never_exceeds_max_size() {
        let mut cache = cache(3);

        for i in 0..20 {
            cache.set(format!("k{i}"), i);
            assert!(cache.size() <= 3, "size {} exceeds max", cache.size());
        }
    }

    #[test]
    fn test_shadowed_key_counted_once() {
        let mut cache = cache(3);

        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);
        cache.set("c".to_string(), 3);
        // a, b, c rotated into the previous generation; overwrite a so it
        // is shadowed there.
        cache.set("a".to_string(), 10);

        assert_eq!(cache.size(), 3);
        assert_eq!(cache.get("a"), Some(&10));
    }

    #[test]
    fn test_entries_ascending_order() {
        let mut cache = cache(3);

        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);
        cache.set("c".to_string(), 3);
        // Rotation happened; promote b back into the active generation.
        assert_eq!(cache.get("b"), Some(&2));

        let entries: Vec<(String, i32)> = cache
            .entries_ascending()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("a".to_string(), 1),
                ("c".to_string(), 3),
                ("b".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_entries_descending_order() {
        let mut cache = cache(3);

        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);
        cache.set("c".to_string(), 3);
        assert_eq!(cache.get("b"), Some(&2));

        let entries: Vec<(String, i32)> = cache
            .entries_descending()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("b".to_string(), 2),
                ("c".to_string(), 3),
                ("a".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_entries_skip_shadowed_previous_copies() {
        let mut cache = cache(3);

        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);
        cache.set("c".to_string(), 3);
        cache.set("a".to_string(), 10);

        let keys: Vec<String> = cache.entries_ascending().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["b".to_string(), "c".to_string(), "a".to_string()]);

        let values: Vec<i32> = cache.entries_ascending().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![2, 3, 10]);
    }

    #[test]
    fn test_iteration_purges_expired() {
        let (mut cache, log) = cache_with_log(10);

        cache.set_with_ttl("x".to_string(), 1, Some(Duration::from_millis(30)));
        cache.set("y".to_string(), 2);

        sleep(Duration::from_millis(40));

        let entries: Vec<(String, i32)> = cache
            .entries_ascending()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        assert_eq!(entries, vec![("y".to_string(), 2)]);
        assert_eq!(log.lock().unwrap().as_slice(), &[("x".to_string(), 1)]);
    }

    #[test]
    fn test_purge_expired_counts_removals() {
        let mut cache = cache(10);

        cache.set_with_ttl("a".to_string(), 1, Some(Duration::from_millis(20)));
        cache.set_with_ttl("b".to_string(), 2, Some(Duration::from_millis(20)));
        cache.set("c".to_string(), 3);

        sleep(Duration::from_millis(30));

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.size(), 1);
        assert_eq!(cache.stats().expirations, 2);
    }

    #[test]
    fn test_contains_live_has_no_side_effects() {
        let mut cache = cache(10);

        cache.set_with_ttl("x".to_string(), 1, Some(Duration::from_millis(20)));
        assert!(cache.contains_live("x"));

        sleep(Duration::from_millis(30));

        assert!(!cache.contains_live("x"));
        // The expired entry is still physically present until visited.
        assert_eq!(cache.stats().expirations, 0);
    }

    #[test]
    fn test_stats_track_hits_and_misses() {
        let mut cache = cache(10);

        cache.set("a".to_string(), 1);
        cache.get("a");
        cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }
}
