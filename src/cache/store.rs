//! Response cache storage.
//!
//! Process-wide map of [`CacheKey`] to JSON payload with an optional per-entry
//! expiry. Expiry is lazy: an expired entry is dropped by the next `get` that
//! touches it. Reads never extend an entry's lifetime.
//!
//! Every eviction advances a generation counter. A reader that computed its
//! payload before an eviction stores it with [`ResponseCache::set_if_current`],
//! which refuses once the generation has moved past the one it observed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use metrics::{counter, gauge};
use serde_json::Value;

use super::keys::{CacheKey, KeyFamily};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

fn expiry(ttl: Option<Duration>) -> Option<Instant> {
    ttl.filter(|ttl| !ttl.is_zero())
        .and_then(|ttl| Instant::now().checked_add(ttl))
}

/// Snapshot of the cumulative cache counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub keys: u64,
    /// `hits / (hits + misses)`, `0.0` before the first lookup.
    pub hit_rate: f64,
}

/// In-memory response cache shared by every in-flight request.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: DashMap<CacheKey, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
    generation: AtomicU64,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stored value if present and not expired.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let now = Instant::now();
        let lookup = self
            .entries
            .get(key)
            .map(|entry| (!entry.is_expired(now)).then(|| entry.value.clone()));

        match lookup {
            Some(Some(value)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                counter!("polybites_cache_hit_total").increment(1);
                Some(value)
            }
            Some(None) => {
                self.entries.remove_if(key, |_, entry| entry.is_expired(now));
                self.record_miss();
                self.publish_len();
                None
            }
            None => {
                self.record_miss();
                None
            }
        }
    }

    /// Store `value` under `key`. A `None` or zero TTL keeps the entry until evicted.
    pub fn set(&self, key: CacheKey, value: Value, ttl: Option<Duration>) {
        let expires_at = expiry(ttl);
        self.entries.insert(key, CacheEntry { value, expires_at });
        counter!("polybites_cache_store_total").increment(1);
        self.publish_len();
    }

    /// Current eviction generation. Read it before computing a payload that
    /// will later go through [`Self::set_if_current`].
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store `value` only if no eviction happened since `observed` was read.
    ///
    /// Returns whether the entry was stored. The generation check runs while the
    /// key's shard is locked, and evictions bump the generation before they
    /// sweep, so a payload that loses the race is either refused here or swept
    /// by the eviction that overtook it.
    pub fn set_if_current(
        &self,
        key: CacheKey,
        value: Value,
        ttl: Option<Duration>,
        observed: u64,
    ) -> bool {
        let expires_at = expiry(ttl);
        {
            let slot = self.entries.entry(key);
            if self.generation() != observed {
                return false;
            }
            slot.insert(CacheEntry { value, expires_at });
        }
        counter!("polybites_cache_store_total").increment(1);
        self.publish_len();
        true
    }

    /// Remove `key` if present. Returns whether an entry was removed.
    pub fn delete(&self, key: &CacheKey) -> bool {
        self.advance_generation();
        let removed = self.entries.remove(key).is_some();
        if removed {
            counter!("polybites_cache_evict_total").increment(1);
            self.publish_len();
        }
        removed
    }

    /// Remove the base key of `family` and every variant of it.
    pub fn evict_family(&self, family: &KeyFamily) -> usize {
        self.advance_generation();
        let mut removed = 0_usize;
        self.entries.retain(|key, _| {
            let hit = family.contains(key);
            if hit {
                removed += 1;
            }
            !hit
        });
        if removed > 0 {
            counter!("polybites_cache_evict_total").increment(removed as u64);
            self.publish_len();
        }
        removed
    }

    /// Drop every entry. Counters are kept.
    pub fn flush_all(&self) -> usize {
        self.advance_generation();
        let removed = self.entries.len();
        self.entries.clear();
        if removed > 0 {
            counter!("polybites_cache_evict_total").increment(removed as u64);
        }
        self.publish_len();
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            hits as f64 / lookups as f64
        };

        CacheStats {
            hits,
            misses,
            keys: self.entries.len() as u64,
            hit_rate,
        }
    }

    fn advance_generation(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("polybites_cache_miss_total").increment(1);
    }

    fn publish_len(&self) {
        gauge!("polybites_cache_keys").set(self.entries.len() as f64);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::cache::keys::Resource;

    fn key(resource: Resource, id: i64) -> CacheKey {
        CacheKey::with_id(resource, id)
    }

    #[test]
    fn set_then_get_returns_value() {
        let cache = ResponseCache::new();
        let k = key(Resource::Food, 1);
        cache.set(k.clone(), json!({"id": 1, "value": null}), None);
        assert_eq!(cache.get(&k), Some(json!({"id": 1, "value": null})));
    }

    #[test]
    fn expired_entries_miss_and_are_dropped() {
        let cache = ResponseCache::new();
        let k = key(Resource::Food, 1);
        cache.set(k.clone(), json!([1, 2]), Some(Duration::from_millis(20)));
        std::thread::sleep(Duration::from_millis(40));

        assert_eq!(cache.get(&k), None);
        assert!(!cache.contains(&k));
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn zero_ttl_never_expires() {
        let cache = ResponseCache::new();
        let k = key(Resource::RestaurantStats, 9);
        cache.set(k.clone(), json!({"review_count": 0}), Some(Duration::ZERO));
        std::thread::sleep(Duration::from_millis(10));
        assert!(cache.get(&k).is_some());
    }

    #[test]
    fn reads_do_not_extend_lifetime() {
        let cache = ResponseCache::new();
        let k = key(Resource::Food, 2);
        cache.set(k.clone(), json!(1), Some(Duration::from_millis(60)));
        std::thread::sleep(Duration::from_millis(35));
        assert!(cache.get(&k).is_some());
        std::thread::sleep(Duration::from_millis(35));
        assert!(cache.get(&k).is_none());
    }

    #[test]
    fn delete_missing_key_is_noop() {
        let cache = ResponseCache::new();
        assert!(!cache.delete(&key(Resource::Food, 404)));
        assert!(cache.is_empty());
    }

    #[test]
    fn flush_twice_leaves_cache_empty() {
        let cache = ResponseCache::new();
        cache.set(key(Resource::Food, 1), json!(1), None);
        cache.set(CacheKey::new(Resource::Foods), json!([]), None);

        assert_eq!(cache.flush_all(), 2);
        assert!(cache.is_empty());
        assert_eq!(cache.flush_all(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn evict_family_removes_variants_only_for_that_id() {
        let cache = ResponseCache::new();
        cache.set(key(Resource::FoodsByRestaurant, 9), json!([]), None);
        cache.set(
            key(Resource::FoodsByRestaurant, 9).variant("search?q=a"),
            json!([]),
            None,
        );
        cache.set(key(Resource::FoodsByRestaurant, 10), json!([]), None);

        let removed = cache.evict_family(&KeyFamily::of(Resource::FoodsByRestaurant, 9));
        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&key(Resource::FoodsByRestaurant, 10)));
    }

    #[test]
    fn payload_read_before_an_eviction_is_not_stored() {
        let cache = ResponseCache::new();
        let k = key(Resource::RestaurantStats, 9);
        let observed = cache.generation();

        cache.evict_family(&KeyFamily::of(Resource::RestaurantStats, 9));
        let stored = cache.set_if_current(k.clone(), json!({"review_count": 0}), None, observed);

        assert!(!stored);
        assert!(!cache.contains(&k));
    }

    #[test]
    fn payload_stored_when_nothing_was_evicted() {
        let cache = ResponseCache::new();
        let k = key(Resource::RestaurantStats, 9);
        let observed = cache.generation();

        assert!(cache.set_if_current(k.clone(), json!({"review_count": 1}), None, observed));
        assert_eq!(cache.get(&k), Some(json!({"review_count": 1})));

        cache.flush_all();
        assert!(!cache.set_if_current(k.clone(), json!({"review_count": 1}), None, observed));
        assert!(cache.is_empty());
    }

    #[test]
    fn hit_rate() {
        let cache = ResponseCache::new();
        assert_eq!(cache.stats().hit_rate, 0.0);

        let k = key(Resource::Food, 1);
        assert!(cache.get(&k).is_none());
        cache.set(k.clone(), json!(1), None);
        for _ in 0..3 {
            assert!(cache.get(&k).is_some());
        }

        let stats = cache.stats();
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.keys, 1);
        assert!((stats.hit_rate - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn concurrent_access_keeps_counters_consistent() {
        let cache = Arc::new(ResponseCache::new());
        let k = key(Resource::Food, 7);
        cache.set(k.clone(), json!("x"), None);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let k = k.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(cache.get(&k), Some(json!("x")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }

        assert_eq!(cache.stats().hits, 800);
        assert_eq!(cache.stats().misses, 0);
    }
}
