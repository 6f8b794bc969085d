//! Route provider client (OpenRouteService directions, GeoJSON format).

use anyhow::{anyhow, bail, Context, Result};
use fuelstop_core::{LatLng, RouteGeometry, RouteStep};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::cache::MemoryCache;

/// Route summary plus the step list and geometry the optimizer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    /// Miles
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    pub steps: Vec<RouteStep>,
    pub geometry: RouteGeometry,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    features: Vec<DirectionsFeature>,
}

#[derive(Debug, Deserialize)]
struct DirectionsFeature {
    properties: FeatureProperties,
    geometry: LineString,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    segments: Vec<RouteSegment>,
}

#[derive(Debug, Deserialize)]
struct RouteSegment {
    distance: f64,
    duration: f64,
    #[serde(default)]
    steps: Vec<RouteStep>,
}

#[derive(Debug, Deserialize)]
struct LineString {
    coordinates: Vec<[f64; 2]>,
}

/// Pull distance, duration, steps and coordinates out of a directions response.
///
/// Only the first feature and its first segment are read.
pub fn extract_route_info(body: Value) -> Result<RouteInfo> {
    if body.get("features").is_none() {
        bail!("Failed to fetch route data: response has no features");
    }
    let response: DirectionsResponse =
        serde_json::from_value(body).context("Invalid route data format")?;
    let feature = response
        .features
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Invalid route data format: empty feature list"))?;
    let segment = feature
        .properties
        .segments
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Invalid route data format: route has no segments"))?;

    Ok(RouteInfo {
        distance: segment.distance,
        duration: segment.duration,
        steps: segment.steps,
        geometry: RouteGeometry::new(feature.geometry.coordinates),
    })
}

/// HTTP client for the OpenRouteService directions endpoint.
pub struct RouteProvider {
    client: Client,
    url: String,
    api_key: String,
    cache: MemoryCache<RouteInfo>,
    cache_ttl: Duration,
}

impl RouteProvider {
    pub fn new(
        client: Client,
        url: impl Into<String>,
        api_key: impl Into<String>,
        cache_ttl: Duration,
        max_cached: usize,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            cache: MemoryCache::new(max_cached),
            cache_ttl,
        }
    }

    pub fn cache(&self) -> &MemoryCache<RouteInfo> {
        &self.cache
    }

    pub fn cache_key(start: LatLng, finish: LatLng) -> String {
        format!(
            "route_{}_{}_{}_{}",
            start.lat, start.lng, finish.lat, finish.lng
        )
    }

    /// Driving route between two points, with distances in miles.
    pub async fn get_route(&self, start: LatLng, finish: LatLng) -> Result<RouteInfo> {
        let cache_key = Self::cache_key(start, finish);
        if let Some(route) = self.cache.lookup(&cache_key) {
            tracing::info!("Route retrieved from cache");
            return Ok(route);
        }

        let payload = json!({
            "coordinates": [[start.lng, start.lat], [finish.lng, finish.lat]],
            "units": "mi",
        });

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!("Error fetching route: {}", err);
                anyhow!("Failed to fetch route data: {}", err)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Route provider HTTP {}: {}", status, body);
            bail!("Failed to fetch route data: provider returned HTTP {}", status);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to fetch route data: unreadable response")?;
        let route = extract_route_info(body)?;

        self.cache.insert(cache_key, route.clone(), self.cache_ttl);
        Ok(route)
    }
}
