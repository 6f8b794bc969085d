//! Station price listing and direct fuel-stop planning.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use fuelstop_core::models::StationRecord;
use fuelstop_core::{FuelStopsRequest, OptimizationResult};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::persistence::stations;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FuelPricesQuery {
    pub limit: Option<i64>,
}

/// List station prices, first `limit` rows by id.
pub async fn list_fuel_prices(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FuelPricesQuery>, QueryRejection>,
) -> Result<Json<Vec<StationRecord>>, ApiError> {
    let Query(query) = query?;
    let limit = query
        .limit
        .unwrap_or(state.config().fuel_prices_default_limit);
    if limit < 0 {
        return Err(ApiError::BadRequest(
            "limit must be a non-negative integer".to_string(),
        ));
    }

    let records = stations::list_stations(state.db().pool(), limit)
        .await
        .map_err(|err| ApiError::Internal(err.context("Failed to fetch fuel prices")))?;
    Ok(Json(records))
}

/// Plan fuel stops for a route the caller already has.
pub async fn plan_fuel_stops(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FuelStopsRequest>, JsonRejection>,
) -> Result<Json<OptimizationResult>, ApiError> {
    let Json(req) = payload?;
    let result = state
        .optimizer()
        .optimize_fuel_stops(req.route_distance, &req.steps, &req.geometry)
        .await?;
    Ok(Json(result))
}
