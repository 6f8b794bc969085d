//! Candidate lookup: narrow the station dataset to the stations near a route.
//!
//! The station store and the cache are injected collaborators. The cache is
//! purely a performance layer; a cache that always misses (or always fails)
//! only costs extra store queries.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{BoxError, OptimizerError};
use crate::models::{Checkpoint, Station};
use crate::spatial::BoundingBox;

/// Default time-to-live for cached station boxes.
pub const STATION_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Range-query access to the station dataset.
pub trait StationStore: Send + Sync {
    /// Stations whose coordinates fall inside `bbox` (inclusive). No ordering guarantee.
    fn range_query(
        &self,
        bbox: &BoundingBox,
    ) -> impl Future<Output = Result<Vec<Station>, BoxError>> + Send;
}

/// Best-effort key/value cache for station lists.
pub trait StationCache: Send + Sync {
    fn get(&self, key: &str)
        -> impl Future<Output = Result<Option<Vec<Station>>, BoxError>> + Send;

    fn set(
        &self,
        key: &str,
        stations: Vec<Station>,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

impl<T: StationStore> StationStore for Arc<T> {
    fn range_query(
        &self,
        bbox: &BoundingBox,
    ) -> impl Future<Output = Result<Vec<Station>, BoxError>> + Send {
        (**self).range_query(bbox)
    }
}

impl<T: StationCache> StationCache for Arc<T> {
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<Station>>, BoxError>> + Send {
        (**self).get(key)
    }

    fn set(
        &self,
        key: &str,
        stations: Vec<Station>,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        (**self).set(key, stations, ttl)
    }
}

/// A cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl StationCache for NoCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<Station>>, BoxError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _stations: Vec<Station>, _ttl: Duration) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Vector-backed station store, used offline and in tests.
#[derive(Debug, Default)]
pub struct MemoryStationStore {
    stations: Vec<Station>,
    queries: AtomicUsize,
}

impl MemoryStationStore {
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            stations,
            queries: AtomicUsize::new(0),
        }
    }

    /// Number of range queries served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl StationStore for MemoryStationStore {
    async fn range_query(&self, bbox: &BoundingBox) -> Result<Vec<Station>, BoxError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .stations
            .iter()
            .filter(|station| bbox.contains(station.lat, station.lon))
            .cloned()
            .collect())
    }
}

/// Finds the stations that could serve any checkpoint of a route.
#[derive(Debug)]
pub struct CandidateLocator<S, C> {
    store: S,
    cache: C,
    buffer_degrees: f64,
    cache_ttl: Duration,
}

impl<S: StationStore, C: StationCache> CandidateLocator<S, C> {
    pub fn new(store: S, cache: C, buffer_degrees: f64) -> Self {
        Self {
            store,
            cache,
            buffer_degrees,
            cache_ttl: STATION_CACHE_TTL,
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The padded box that `locate` would query for these checkpoints.
    pub fn search_box(&self, checkpoints: &[Checkpoint]) -> Option<BoundingBox> {
        BoundingBox::around(checkpoints).map(|bbox| bbox.expand(self.buffer_degrees))
    }

    /// Issue one range query covering every checkpoint, going through the cache.
    ///
    /// The result over-approximates: it is rectangular and padded, so callers
    /// must still apply the exact radius test per checkpoint.
    pub async fn locate(&self, checkpoints: &[Checkpoint]) -> Result<Vec<Station>, OptimizerError> {
        let Some(bbox) = self.search_box(checkpoints) else {
            return Ok(Vec::new());
        };
        let cache_key = bbox.cache_key();

        match self.cache.get(&cache_key).await {
            // An empty cached list is treated as a miss and re-queried.
            Ok(Some(stations)) if !stations.is_empty() => {
                tracing::info!("Stations retrieved from cache ({})", cache_key);
                return Ok(stations);
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!("Station cache read failed, querying store: {}", err);
            }
        }

        let stations = self
            .store
            .range_query(&bbox)
            .await
            .map_err(OptimizerError::Store)?;

        if let Err(err) = self
            .cache
            .set(&cache_key, stations.clone(), self.cache_ttl)
            .await
        {
            tracing::warn!("Station cache write failed: {}", err);
        }

        tracing::info!("Found {} stations in bounding box", stations.len());
        Ok(stations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn station(id: i64, lat: f64, lon: f64) -> Station {
        Station {
            id,
            name: format!("Stop {id}"),
            price: Decimal::new(329, 2),
            lat,
            lon,
            city: "Amarillo".to_string(),
            state: "TX".to_string(),
        }
    }

    #[derive(Default)]
    struct MapCache {
        entries: Mutex<HashMap<String, Vec<Station>>>,
    }

    impl StationCache for MapCache {
        async fn get(&self, key: &str) -> Result<Option<Vec<Station>>, BoxError> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, stations: Vec<Station>, _ttl: Duration) -> Result<(), BoxError> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), stations);
            Ok(())
        }
    }

    struct BrokenCache;

    impl StationCache for BrokenCache {
        async fn get(&self, _key: &str) -> Result<Option<Vec<Station>>, BoxError> {
            Err("cache offline".into())
        }

        async fn set(&self, _key: &str, _stations: Vec<Station>, _ttl: Duration) -> Result<(), BoxError> {
            Err("cache offline".into())
        }
    }

    struct BrokenStore;

    impl StationStore for BrokenStore {
        async fn range_query(&self, _bbox: &BoundingBox) -> Result<Vec<Station>, BoxError> {
            Err("database is locked".into())
        }
    }

    #[tokio::test]
    async fn empty_checkpoints_skip_the_store() {
        let store = Arc::new(MemoryStationStore::new(vec![station(1, 35.0, -101.0)]));
        let locator = CandidateLocator::new(store.clone(), NoCache, 0.2);
        let stations = locator.locate(&[]).await.unwrap();
        assert!(stations.is_empty());
        assert_eq!(store.query_count(), 0);
    }

    #[tokio::test]
    async fn query_uses_padded_box() {
        let store = Arc::new(MemoryStationStore::new(vec![
            station(1, 35.0, -101.0),
            station(2, 35.15, -101.0),
            station(3, 35.5, -101.0),
        ]));
        let locator = CandidateLocator::new(store.clone(), NoCache, 0.2);
        let stations = locator
            .locate(&[Checkpoint::new(35.0, -101.0)])
            .await
            .unwrap();
        let ids: Vec<i64> = stations.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.query_count(), 1);
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let store = Arc::new(MemoryStationStore::new(vec![station(1, 35.0, -101.0)]));
        let locator = CandidateLocator::new(store.clone(), MapCache::default(), 0.2);
        let checkpoints = [Checkpoint::new(35.0, -101.0)];

        let first = locator.locate(&checkpoints).await.unwrap();
        let second = locator.locate(&checkpoints).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.query_count(), 1);
    }

    #[tokio::test]
    async fn empty_cached_result_is_requeried() {
        let store = Arc::new(MemoryStationStore::new(Vec::new()));
        let locator = CandidateLocator::new(store.clone(), MapCache::default(), 0.2);
        let checkpoints = [Checkpoint::new(35.0, -101.0)];

        locator.locate(&checkpoints).await.unwrap();
        locator.locate(&checkpoints).await.unwrap();
        assert_eq!(store.query_count(), 2);
    }

    #[tokio::test]
    async fn cache_failures_fall_through_to_store() {
        let store = Arc::new(MemoryStationStore::new(vec![station(1, 35.0, -101.0)]));
        let locator = CandidateLocator::new(store.clone(), BrokenCache, 0.2);
        let stations = locator
            .locate(&[Checkpoint::new(35.0, -101.0)])
            .await
            .unwrap();
        assert_eq!(stations.len(), 1);
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let locator = CandidateLocator::new(BrokenStore, NoCache, 0.2);
        let err = locator
            .locate(&[Checkpoint::new(35.0, -101.0)])
            .await
            .unwrap_err();
        assert!(matches!(err, OptimizerError::Store(_)));
        assert!(!err.is_validation());
    }
}
