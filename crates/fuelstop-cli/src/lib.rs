//! Fuel Stop CLI - blocking client for the fuel stop server.

use anyhow::{bail, Context, Result};
use fuelstop_core::models::StationRecord;
use fuelstop_core::{LatLng, RouteByNameRequest, RouteRequest, TripResponse};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Write;

/// HTTP client for the fuel stop server API.
pub struct FuelStopClient {
    client: Client,
    base_url: String,
}

impl FuelStopClient {
    /// `base_url` is the server root, e.g. "http://localhost:3000".
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn fuel_prices(&self, limit: u32) -> Result<Vec<StationRecord>> {
        let url = format!("{}/api/fuel-prices", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .with_context(|| format!("request to {} failed", url))?;
        parse_response(response)
    }

    pub fn route(&self, start: LatLng, finish: LatLng) -> Result<TripResponse> {
        let url = format!("{}/api/route", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RouteRequest { start, finish })
            .send()
            .with_context(|| format!("request to {} failed", url))?;
        parse_response(response)
    }

    pub fn route_by_name(&self, start: &str, finish: &str) -> Result<TripResponse> {
        let url = format!("{}/api/route-by-name", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RouteByNameRequest {
                start_location: start.to_string(),
                finish_location: finish.to_string(),
            })
            .send()
            .with_context(|| format!("request to {} failed", url))?;
        parse_response(response)
    }
}

fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().context("failed to read response body")?;
    if !status.is_success() {
        bail!("server returned {}: {}", status, error_message(&body));
    }
    serde_json::from_str(&body).context("unexpected response format")
}

/// The `error` field of a JSON error body, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Human-readable trip summary.
pub fn format_trip(trip: &TripResponse) -> String {
    let mut out = String::new();
    if let Some(locations) = &trip.locations {
        for (label, place) in [("Start", &locations.start), ("Finish", &locations.finish)] {
            let _ = writeln!(
                out,
                "{}: {} ({}, {})",
                label, place.name, place.coordinates.lat, place.coordinates.lng
            );
        }
    }
    let _ = writeln!(out, "Distance: {:.1} {}", trip.route.distance, trip.route.unit);
    let _ = writeln!(out, "Duration: {:.1} hours", trip.duration_hours());
    let _ = writeln!(out, "Total fuel cost: ${:.2}", trip.fuel.total_cost);
    let _ = writeln!(out, "\nFuel stops:");
    if trip.fuel.stops.is_empty() {
        let _ = writeln!(out, "(none needed)");
    }
    for stop in &trip.fuel.stops {
        let _ = writeln!(
            out,
            "- {} in {}, {}: ${}/gallon ({:.1} mi off route)",
            stop.station.name,
            stop.station.city,
            stop.station.state,
            stop.station.price.round_dp(2),
            stop.distance_from_route
        );
    }
    if trip.fuel.coverage_gaps > 0 {
        let _ = writeln!(
            out,
            "\nWarning: {} checkpoint(s) had no station within range",
            trip.fuel.coverage_gaps
        );
    }
    out
}

/// One line per station record.
pub fn format_prices(records: &[StationRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(
            out,
            "{:>8}  {:<32} {}, {}  ${}",
            record.opis_id, record.name, record.city, record.state, record.price
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelstop_core::{
        Checkpoint, FuelStop, NamedLocation, OptimizationResult, RouteSummary, Station,
        TripLocations,
    };
    use rust_decimal::Decimal;

    fn trip() -> TripResponse {
        let stop = FuelStop {
            station: Station {
                id: 1,
                name: "LOVES TRAVEL STOP #315".to_string(),
                price: Decimal::new(3459, 3),
                lat: 41.1,
                lon: -80.6,
                city: "Hubbard".to_string(),
                state: "OH".to_string(),
            },
            distance_from_route: 4.25,
            checkpoint: Checkpoint::new(41.15, -80.55),
        };
        TripResponse::new(
            RouteSummary::miles(790.4, 45_000.0),
            OptimizationResult {
                fuel_stops: vec![stop],
                total_cost: 138.36,
                checkpoints: vec![Checkpoint::new(41.15, -80.55), Checkpoint::new(41.6, -86.0)],
            },
            10.0,
        )
    }

    #[test]
    fn trip_summary_lists_stops_and_gaps() {
        let text = format_trip(&trip());
        assert!(text.contains("Distance: 790.4 miles"));
        assert!(text.contains("Duration: 12.5 hours"));
        assert!(text.contains("Total fuel cost: $138.36"));
        assert!(text.contains("- LOVES TRAVEL STOP #315 in Hubbard, OH: $3.46/gallon"));
        assert!(text.contains("1 checkpoint(s) had no station"));
    }

    #[test]
    fn trip_summary_includes_named_locations() {
        let coords = LatLng {
            lat: 40.7128,
            lng: -74.006,
        };
        let trip = trip().with_locations(TripLocations {
            start: NamedLocation {
                name: "New York, NY".to_string(),
                coordinates: coords,
            },
            finish: NamedLocation {
                name: "Chicago, IL".to_string(),
                coordinates: LatLng {
                    lat: 41.8781,
                    lng: -87.6298,
                },
            },
        });
        let text = format_trip(&trip);
        assert!(text.starts_with("Start: New York, NY (40.7128, -74.006)\n"));
        assert!(text.contains("Finish: Chicago, IL"));
    }

    #[test]
    fn error_message_prefers_json_field() {
        assert_eq!(
            error_message(r#"{"error":"Could not geocode start location: X"}"#),
            "Could not geocode start location: X"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = FuelStopClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}
