//! Route planning endpoints: provider route plus fuel plan.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use fuelstop_core::{
    LatLng, NamedLocation, RouteByNameRequest, RouteRequest, RouteSummary, TripLocations,
    TripResponse,
};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::state::AppState;

/// Plan a trip between two coordinates.
pub async fn plan_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Json<TripResponse>, ApiError> {
    let Json(req) = payload?;
    for (which, point) in [("start", req.start), ("finish", req.finish)] {
        if !point.is_valid() {
            return Err(ApiError::BadRequest(format!(
                "{which} must have lat in [-90, 90] and lng in [-180, 180]"
            )));
        }
    }

    let trip = plan_trip(&state, req.start, req.finish).await?;
    Ok(Json(trip))
}

/// Plan a trip between two place names.
pub async fn plan_route_by_name(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RouteByNameRequest>, JsonRejection>,
) -> Result<Json<TripResponse>, ApiError> {
    let Json(req) = payload?;
    let start_name = req.start_location.trim();
    let finish_name = req.finish_location.trim();
    if start_name.is_empty() || finish_name.is_empty() {
        return Err(ApiError::BadRequest(
            "Start and finish locations are required.".to_string(),
        ));
    }

    tracing::info!("Geocoding start location: {}", start_name);
    let start = state
        .geocoder()
        .geocode(start_name)
        .await
        .ok_or_else(|| ApiError::Geocode {
            which: "start",
            name: start_name.to_string(),
        })?;

    tracing::info!("Geocoding finish location: {}", finish_name);
    let finish = state
        .geocoder()
        .geocode(finish_name)
        .await
        .ok_or_else(|| ApiError::Geocode {
            which: "finish",
            name: finish_name.to_string(),
        })?;

    let trip = plan_trip(&state, start, finish).await?;
    Ok(Json(trip.with_locations(TripLocations {
        start: NamedLocation {
            name: start_name.to_string(),
            coordinates: start,
        },
        finish: NamedLocation {
            name: finish_name.to_string(),
            coordinates: finish,
        },
    })))
}

async fn plan_trip(state: &AppState, start: LatLng, finish: LatLng) -> Result<TripResponse, ApiError> {
    let route = state
        .routes()
        .get_route(start, finish)
        .await
        .map_err(ApiError::Provider)?;

    // Validation failures here come from provider data.
    let result = state
        .optimizer()
        .optimize_fuel_stops(route.distance, &route.steps, &route.geometry)
        .await
        .map_err(|err| {
            if err.is_validation() {
                ApiError::Provider(anyhow::Error::new(err).context("Invalid route data format"))
            } else {
                ApiError::Optimizer(err)
            }
        })?;

    Ok(TripResponse::new(
        RouteSummary::miles(route.distance, route.duration),
        result,
        state.optimizer().settings().miles_per_gallon,
    ))
}
