//! REST API routes.

use axum::{
    extract::State,
    http::Uri,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::{fuel, trips};
use crate::persistence::stations;
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/api/fuel-prices", get(fuel::list_fuel_prices))
        .route("/api/fuel-stops", post(fuel::plan_fuel_stops))
        .route("/api/route", post(trips::plan_route))
        .route("/api/route-by-name", post(trips::plan_route_by_name))
        .fallback(not_found)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    stations: i64,
    started_at: String,
}

async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let stations = stations::count_stations(state.db().pool())
        .await
        .map_err(ApiError::Internal)?;
    Ok(Json(HealthResponse {
        status: "ok",
        stations,
        started_at: state.started_at().to_rfc3339(),
    }))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
