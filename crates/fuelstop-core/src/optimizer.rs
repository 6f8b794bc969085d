//! Fuel stop optimizer: plan checkpoints, locate candidates, pick stops, total the cost.

use std::time::Duration;

use crate::cost::accumulate_cost;
use crate::error::OptimizerError;
use crate::locator::{CandidateLocator, StationCache, StationStore};
use crate::models::{OptimizationResult, RouteGeometry, RouteStep};
use crate::planner::plan_checkpoints;
use crate::selector::select_stops;
use crate::settings::OptimizerSettings;

/// Stateless orchestrator over an injected station store and cache.
///
/// Each call to [`FuelOptimizer::optimize_fuel_stops`] is independent and
/// runs to completion in the caller's task; nothing is spawned.
#[derive(Debug)]
pub struct FuelOptimizer<S, C> {
    settings: OptimizerSettings,
    locator: CandidateLocator<S, C>,
}

impl<S: StationStore, C: StationCache> FuelOptimizer<S, C> {
    /// Fails fast on invalid settings.
    pub fn new(settings: OptimizerSettings, store: S, cache: C) -> Result<Self, OptimizerError> {
        settings.validate()?;
        Ok(Self {
            settings,
            locator: CandidateLocator::new(store, cache, settings.buffer_degrees()),
        })
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.locator = self.locator.with_cache_ttl(ttl);
        self
    }

    pub fn settings(&self) -> &OptimizerSettings {
        &self.settings
    }

    pub fn locator(&self) -> &CandidateLocator<S, C> {
        &self.locator
    }

    /// Compute the cheapest reachable stop per checkpoint and the total cost.
    ///
    /// A route too short to need fuel returns an empty result without
    /// touching the station store. Checkpoints with no station in range are
    /// coverage gaps, not errors.
    pub async fn optimize_fuel_stops(
        &self,
        route_distance: f64,
        steps: &[RouteStep],
        geometry: &RouteGeometry,
    ) -> Result<OptimizationResult, OptimizerError> {
        if !route_distance.is_finite() || route_distance < 0.0 {
            return Err(OptimizerError::InvalidRouteDistance(route_distance));
        }

        tracing::info!(
            "Calculating fuel stops for {:.1} mile route ({} steps)",
            route_distance,
            steps.len()
        );

        let checkpoints = plan_checkpoints(steps, geometry, self.settings.segment_distance_mi)?;
        if checkpoints.is_empty() {
            tracing::warn!("No check points found along the route");
            return Ok(OptimizationResult::empty());
        }

        let candidates = self.locator.locate(&checkpoints).await?;
        let fuel_stops = select_stops(&checkpoints, &candidates, self.settings.search_radius_mi);
        let total_cost = accumulate_cost(
            &fuel_stops,
            self.settings.segment_distance_mi,
            self.settings.miles_per_gallon,
        );

        tracing::info!(
            "Total fuel stops: {} of {} checkpoints",
            fuel_stops.len(),
            checkpoints.len()
        );
        tracing::info!("Total estimated cost: ${:.2}", total_cost);

        Ok(OptimizationResult {
            fuel_stops,
            total_cost,
            checkpoints,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{MemoryStationStore, NoCache};
    use crate::models::Station;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    #[tokio::test]
    async fn invalid_settings_fail_at_construction() {
        let settings = OptimizerSettings {
            miles_per_gallon: 0.0,
            ..OptimizerSettings::default()
        };
        let result = FuelOptimizer::new(settings, MemoryStationStore::default(), NoCache);
        assert!(matches!(
            result,
            Err(OptimizerError::InvalidSetting {
                field: "miles_per_gallon",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn negative_route_distance_is_rejected() {
        let optimizer = FuelOptimizer::new(
            OptimizerSettings::default(),
            MemoryStationStore::default(),
            NoCache,
        )
        .unwrap();
        let err = optimizer
            .optimize_fuel_stops(-1.0, &[], &RouteGeometry::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn empty_route_returns_empty_result_without_querying() {
        let store = Arc::new(MemoryStationStore::new(vec![Station {
            id: 1,
            name: "Pilot".to_string(),
            price: Decimal::new(300, 2),
            lat: 35.0,
            lon: -101.0,
            city: "Amarillo".to_string(),
            state: "TX".to_string(),
        }]));
        let optimizer =
            FuelOptimizer::new(OptimizerSettings::default(), store.clone(), NoCache).unwrap();
        let result = optimizer
            .optimize_fuel_stops(0.0, &[], &RouteGeometry::default())
            .await
            .unwrap();
        assert_eq!(result, OptimizationResult::empty());
        assert_eq!(store.query_count(), 0);
    }
}
