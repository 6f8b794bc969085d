//! Trip planning request and response payloads.
//!
//! Shared by the HTTP server and its client so both sides agree on the
//! wire shape.

use serde::{Deserialize, Serialize};

use crate::models::{Checkpoint, FuelStop, LatLng, OptimizationResult, RouteGeometry, RouteStep};

pub const ROUTE_FETCHED_MESSAGE: &str = "Route data fetched successfully.";

/// Route between two coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: LatLng,
    pub finish: LatLng,
}

/// Route between two place names, resolved by the geocoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteByNameRequest {
    pub start_location: String,
    pub finish_location: String,
}

/// Caller-supplied route, bypassing the route provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelStopsRequest {
    pub route_distance: f64,
    pub steps: Vec<RouteStep>,
    pub geometry: RouteGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Miles
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    pub unit: String,
}

impl RouteSummary {
    pub fn miles(distance: f64, duration: f64) -> Self {
        Self {
            distance,
            duration,
            unit: "miles".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelSummary {
    pub stops: Vec<FuelStop>,
    pub total_cost: f64,
    pub mpg: f64,
    /// Checkpoints with no station inside the search radius
    pub coverage_gaps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLocation {
    pub name: String,
    pub coordinates: LatLng,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripLocations {
    pub start: NamedLocation,
    pub finish: NamedLocation,
}

/// Route summary plus the fuel plan computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<TripLocations>,
    pub route: RouteSummary,
    pub fuel: FuelSummary,
    pub checkpoints: Vec<Checkpoint>,
}

impl TripResponse {
    pub fn new(route: RouteSummary, result: OptimizationResult, mpg: f64) -> Self {
        let coverage_gaps = result.coverage_gaps();
        Self {
            message: ROUTE_FETCHED_MESSAGE.to_string(),
            locations: None,
            route,
            fuel: FuelSummary {
                stops: result.fuel_stops,
                total_cost: result.total_cost,
                mpg,
                coverage_gaps,
            },
            checkpoints: result.checkpoints,
        }
    }

    pub fn with_locations(mut self, locations: TripLocations) -> Self {
        self.locations = Some(locations);
        self
    }

    /// Route duration in hours.
    pub fn duration_hours(&self) -> f64 {
        self.route.duration / 3600.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Station;
    use rust_decimal::Decimal;

    fn stop() -> FuelStop {
        FuelStop {
            station: Station {
                id: 7,
                name: "PILOT #452".to_string(),
                price: Decimal::new(3459, 3),
                lat: 35.19,
                lon: -101.83,
                city: "Amarillo".to_string(),
                state: "TX".to_string(),
            },
            distance_from_route: 2.5,
            checkpoint: Checkpoint::new(35.2, -101.8),
        }
    }

    #[test]
    fn trip_response_counts_gaps() {
        let result = OptimizationResult {
            fuel_stops: vec![stop()],
            total_cost: 138.36,
            checkpoints: vec![Checkpoint::new(35.2, -101.8), Checkpoint::new(36.0, -96.0)],
        };
        let response = TripResponse::new(RouteSummary::miles(812.0, 43_200.0), result, 10.0);
        assert_eq!(response.fuel.coverage_gaps, 1);
        assert_eq!(response.message, ROUTE_FETCHED_MESSAGE);
        assert!((response.duration_hours() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn stop_serializes_flat_with_string_price() {
        let response = TripResponse::new(
            RouteSummary::miles(10.0, 600.0),
            OptimizationResult {
                fuel_stops: vec![stop()],
                total_cost: 0.0,
                checkpoints: vec![Checkpoint::new(35.2, -101.8)],
            },
            10.0,
        );
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("locations").is_none());
        assert_eq!(value["route"]["unit"], "miles");
        let stop = &value["fuel"]["stops"][0];
        assert_eq!(stop["name"], "PILOT #452");
        assert_eq!(stop["price"], "3.459");
        assert_eq!(stop["checkpoint"]["lat"], 35.2);
    }

    #[test]
    fn named_locations_are_included_when_set() {
        let coords = LatLng {
            lat: 40.71,
            lng: -74.0,
        };
        let response = TripResponse::new(
            RouteSummary::miles(0.0, 0.0),
            OptimizationResult::empty(),
            10.0,
        )
        .with_locations(TripLocations {
            start: NamedLocation {
                name: "New York, NY".to_string(),
                coordinates: coords,
            },
            finish: NamedLocation {
                name: "New York, NY".to_string(),
                coordinates: coords,
            },
        });
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["locations"]["start"]["coordinates"]["lng"], -74.0);
    }
}
