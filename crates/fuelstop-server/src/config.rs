//! Server configuration from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use fuelstop_core::OptimizerSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_path: String,
    pub database_max_connections: u32,
    pub miles_per_gallon: f64,
    pub segment_distance_mi: f64,
    pub search_radius_mi: f64,
    pub station_cache_ttl_s: u64,
    pub route_cache_ttl_s: u64,
    pub geocode_cache_ttl_s: u64,
    pub cache_max_entries: usize,
    pub cache_prune_interval_s: u64,
    pub openroute_url: String,
    pub openroute_api_key: String,
    pub nominatim_url: String,
    pub geocode_country_code: String,
    pub provider_timeout_s: u64,
    pub fuel_prices_default_limit: i64,
    /// Emit JSON log lines instead of human-readable text
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: parse_env("FUELSTOP_PORT", 3000),
            database_path: env::var("FUELSTOP_DB_PATH")
                .unwrap_or_else(|_| "data/fuelstop.db".to_string()),
            database_max_connections: parse_env("FUELSTOP_DB_MAX_CONNECTIONS", 5),
            miles_per_gallon: parse_env("FUELSTOP_MPG", 10.0),
            segment_distance_mi: parse_env("FUELSTOP_SEGMENT_DISTANCE_MI", 400.0),
            search_radius_mi: parse_env("FUELSTOP_SEARCH_RADIUS_MI", 15.0),
            station_cache_ttl_s: parse_env("FUELSTOP_STATION_CACHE_TTL_S", 60 * 60),
            route_cache_ttl_s: parse_env("FUELSTOP_ROUTE_CACHE_TTL_S", 60 * 60 * 24),
            geocode_cache_ttl_s: parse_env("FUELSTOP_GEOCODE_CACHE_TTL_S", 60 * 60 * 24 * 7),
            cache_max_entries: parse_env("FUELSTOP_CACHE_MAX_ENTRIES", 2048),
            cache_prune_interval_s: parse_env("FUELSTOP_CACHE_PRUNE_INTERVAL_S", 300),
            openroute_url: env::var("OPENROUTE_URL").unwrap_or_else(|_| {
                "https://api.openrouteservice.org/v2/directions/driving-car/geojson".to_string()
            }),
            openroute_api_key: env::var("OPENROUTE_API_KEY").unwrap_or_default(),
            nominatim_url: env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org/search".to_string()),
            geocode_country_code: env::var("GEOCODE_COUNTRY_CODE")
                .unwrap_or_else(|_| "us".to_string()),
            provider_timeout_s: parse_env("PROVIDER_TIMEOUT_S", 10),
            fuel_prices_default_limit: parse_env("FUEL_PRICES_DEFAULT_LIMIT", 10),
            log_json: env::var("FUELSTOP_LOG_FORMAT")
                .map(|value| value.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    pub fn optimizer_settings(&self) -> OptimizerSettings {
        OptimizerSettings {
            miles_per_gallon: self.miles_per_gallon,
            segment_distance_mi: self.segment_distance_mi,
            search_radius_mi: self.search_radius_mi,
        }
    }

    pub fn station_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.station_cache_ttl_s)
    }

    pub fn route_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.route_cache_ttl_s)
    }

    pub fn geocode_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.geocode_cache_ttl_s)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_s.max(1))
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
