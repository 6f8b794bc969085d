//! In-memory TTL cache shared by the station, route and geocode lookups.

use dashmap::DashMap;
use fuelstop_core::{BoxError, Station, StationCache};
use std::hash::Hash;
use std::time::{Duration, Instant};

pub trait CacheEntry {
    fn fetched_at(&self) -> Instant;
    fn is_expired(&self, now: Instant) -> bool;
}

/// Drop expired entries, then the oldest ones until at most `max_entries` remain.
///
/// Returns the number of entries removed.
pub fn prune_cache<K, V>(cache: &DashMap<K, V>, max_entries: usize) -> usize
where
    K: Clone + Eq + Hash,
    V: CacheEntry,
{
    let now = Instant::now();
    let before = cache.len();
    let mut entries: Vec<(K, Instant)> = cache
        .iter()
        .filter(|entry| !entry.value().is_expired(now))
        .map(|entry| (entry.key().clone(), entry.value().fetched_at()))
        .collect();

    cache.retain(|_, value| !value.is_expired(now));

    if cache.len() > max_entries {
        entries.sort_by_key(|(_, fetched_at)| *fetched_at);
        for (key, _) in entries {
            if cache.len() <= max_entries {
                break;
            }
            cache.remove(&key);
        }
    }

    before.saturating_sub(cache.len())
}

#[derive(Debug, Clone)]
pub struct CachedValue<V> {
    value: V,
    fetched_at: Instant,
    expires_at: Instant,
}

impl<V> CacheEntry for CachedValue<V> {
    fn fetched_at(&self) -> Instant {
        self.fetched_at
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// String-keyed cache with a per-entry time-to-live.
///
/// Concurrent misses on the same key both go to the backing source; the
/// cache never serializes callers.
#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: DashMap<String, CachedValue<V>>,
    max_entries: usize,
}

impl<V: Clone> MemoryCache<V> {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Fresh value for `key`, evicting it if it has expired.
    pub fn lookup(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
        }
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    pub fn insert(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let now = Instant::now();
        self.entries.insert(
            key.into(),
            CachedValue {
                value,
                fetched_at: now,
                expires_at: now + ttl,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn prune(&self) -> usize {
        prune_cache(&self.entries, self.max_entries)
    }
}

impl StationCache for MemoryCache<Vec<Station>> {
    async fn get(&self, key: &str) -> Result<Option<Vec<Station>>, BoxError> {
        Ok(self.lookup(key))
    }

    async fn set(&self, key: &str, stations: Vec<Station>, ttl: Duration) -> Result<(), BoxError> {
        self.insert(key, stations, ttl);
        Ok(())
    }
}
