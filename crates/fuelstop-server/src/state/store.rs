//! Long-lived collaborators wired together at startup.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fuelstop_core::{FuelOptimizer, Station};
use reqwest::Client;
use std::sync::Arc;

use crate::cache::MemoryCache;
use crate::config::Config;
use crate::geocoding::Geocoder;
use crate::persistence::{Database, SqliteStationStore};
use crate::routing::RouteProvider;

pub type StationCacheHandle = Arc<MemoryCache<Vec<Station>>>;

/// Application state: database, caches, providers and the optimizer.
pub struct AppState {
    config: Config,
    db: Database,
    station_cache: StationCacheHandle,
    optimizer: FuelOptimizer<SqliteStationStore, StationCacheHandle>,
    routes: RouteProvider,
    geocoder: Geocoder,
    started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Result<Self> {
        let station_cache: StationCacheHandle =
            Arc::new(MemoryCache::new(config.cache_max_entries));
        let optimizer = FuelOptimizer::new(
            config.optimizer_settings(),
            SqliteStationStore::new(db.pool().clone()),
            station_cache.clone(),
        )
        .context("invalid optimizer settings")?
        .with_cache_ttl(config.station_cache_ttl());

        let client = Client::builder()
            .timeout(config.provider_timeout())
            .build()
            .context("failed to build HTTP client")?;
        let routes = RouteProvider::new(
            client.clone(),
            config.openroute_url.clone(),
            config.openroute_api_key.clone(),
            config.route_cache_ttl(),
            config.cache_max_entries,
        );
        let geocoder = Geocoder::new(
            client,
            config.nominatim_url.clone(),
            config.geocode_country_code.clone(),
            config.geocode_cache_ttl(),
            config.cache_max_entries,
        );

        Ok(Self {
            config,
            db,
            station_cache,
            optimizer,
            routes,
            geocoder,
            started_at: Utc::now(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn optimizer(&self) -> &FuelOptimizer<SqliteStationStore, StationCacheHandle> {
        &self.optimizer
    }

    pub fn routes(&self) -> &RouteProvider {
        &self.routes
    }

    pub fn geocoder(&self) -> &Geocoder {
        &self.geocoder
    }

    pub fn station_cache(&self) -> &StationCacheHandle {
        &self.station_cache
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Prune every in-memory cache. Returns the number of entries removed.
    pub fn prune_caches(&self) -> usize {
        self.station_cache.prune() + self.routes.cache().prune() + self.geocoder.cache().prune()
    }
}
