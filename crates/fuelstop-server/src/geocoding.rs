//! Place-name geocoding via OpenStreetMap Nominatim.

use fuelstop_core::LatLng;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::cache::MemoryCache;

const USER_AGENT: &str = "FuelStopPlanner/0.2";

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

pub struct Geocoder {
    client: Client,
    url: String,
    country_code: String,
    cache: MemoryCache<LatLng>,
    cache_ttl: Duration,
}

impl Geocoder {
    pub fn new(
        client: Client,
        url: impl Into<String>,
        country_code: impl Into<String>,
        cache_ttl: Duration,
        max_cached: usize,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            country_code: country_code.into(),
            cache: MemoryCache::new(max_cached),
            cache_ttl,
        }
    }

    pub fn cache(&self) -> &MemoryCache<LatLng> {
        &self.cache
    }

    pub fn cache_key(&self, location_name: &str) -> String {
        format!("geocode_{}_{}", location_name.trim(), self.country_code)
    }

    /// Resolve a place name to coordinates.
    ///
    /// Returns `None` when the provider has no match or cannot be reached;
    /// failures are logged, not propagated.
    pub async fn geocode(&self, location_name: &str) -> Option<LatLng> {
        let location_name = location_name.trim();
        if location_name.is_empty() {
            return None;
        }

        let cache_key = self.cache_key(location_name);
        if let Some(coords) = self.cache.lookup(&cache_key) {
            tracing::info!("Coordinates for '{}' retrieved from cache", location_name);
            return Some(coords);
        }

        match self.fetch(location_name).await {
            Ok(Some(coords)) => {
                tracing::info!(
                    "Geocoded '{}' to ({}, {})",
                    location_name,
                    coords.lat,
                    coords.lng
                );
                self.cache.insert(cache_key, coords, self.cache_ttl);
                Some(coords)
            }
            Ok(None) => {
                tracing::warn!("No geocoding results found for '{}'", location_name);
                None
            }
            Err(err) => {
                tracing::error!("Error geocoding '{}': {}", location_name, err);
                None
            }
        }
    }

    async fn fetch(&self, location_name: &str) -> anyhow::Result<Option<LatLng>> {
        let places: Vec<NominatimPlace> = self
            .client
            .get(&self.url)
            .header("User-Agent", USER_AGENT)
            .query(&[
                ("q", location_name),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", self.country_code.as_str()),
                ("addressdetails", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        places.into_iter().next().map(parse_place).transpose()
    }
}

fn parse_place(place: NominatimPlace) -> anyhow::Result<LatLng> {
    Ok(LatLng {
        lat: place.lat.trim().parse()?,
        lng: place.lon.trim().parse()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nominatim_string_coordinates() {
        let places: Vec<NominatimPlace> = serde_json::from_str(
            r#"[{"place_id": 1, "lat": "40.7127281", "lon": "-74.0060152", "display_name": "New York"}]"#,
        )
        .unwrap();
        let coords = parse_place(places.into_iter().next().unwrap()).unwrap();
        assert!((coords.lat - 40.7127281).abs() < 1e-9);
        assert!((coords.lng - -74.0060152).abs() < 1e-9);
    }

    #[tokio::test]
    async fn blank_names_are_not_looked_up() {
        let geocoder = Geocoder::new(
            Client::new(),
            "http://127.0.0.1:9/search",
            "us",
            Duration::from_secs(60),
            8,
        );
        assert!(geocoder.geocode("   ").await.is_none());
    }

    #[tokio::test]
    async fn cached_names_skip_the_provider() {
        let geocoder = Geocoder::new(
            Client::new(),
            "http://127.0.0.1:9/search",
            "us",
            Duration::from_secs(60),
            8,
        );
        let coords = LatLng {
            lat: 41.8781,
            lng: -87.6298,
        };
        geocoder
            .cache()
            .insert(geocoder.cache_key("Chicago, IL"), coords, Duration::from_secs(60));
        assert_eq!(geocoder.geocode(" Chicago, IL ").await, Some(coords));
    }
}
