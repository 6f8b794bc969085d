//! Core data models for fuel stop planning.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A fuel station snapshot read from the station store.
///
/// The optimizer never mutates stations; they are owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub name: String,
    /// Retail price per gallon
    pub price: Decimal,
    pub lat: f64,
    pub lon: f64,
    pub city: String,
    pub state: String,
}

/// Full station row as imported from the price dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub id: i64,
    pub opis_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub rack_id: String,
    pub price: Decimal,
    pub lat: f64,
    pub lon: f64,
}

impl StationRecord {
    /// Project the record onto the fields the optimizer reads.
    pub fn to_station(&self) -> Station {
        Station {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            lat: self.lat,
            lon: self.lon,
            city: self.city.clone(),
            state: self.state.clone(),
        }
    }
}

/// One maneuver of a route as returned by the routing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Incremental distance in miles
    pub distance: f64,
    /// Index range into the route geometry covered by this step.
    /// Only the last index is used.
    #[serde(alias = "way_points")]
    pub waypoints: Vec<usize>,
}

impl RouteStep {
    pub fn new(distance: f64, start: usize, end: usize) -> Self {
        Self {
            distance,
            waypoints: vec![start, end],
        }
    }

    pub fn last_waypoint(&self) -> Option<usize> {
        self.waypoints.last().copied()
    }
}

/// Route path as `[longitude, latitude]` pairs (GeoJSON order).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteGeometry {
    pub coordinates: Vec<[f64; 2]>,
}

impl RouteGeometry {
    pub fn new(coordinates: Vec<[f64; 2]>) -> Self {
        Self { coordinates }
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Resolve a waypoint index to a checkpoint, swapping to (lat, lon) order.
    pub fn checkpoint_at(&self, index: usize) -> Option<Checkpoint> {
        self.coordinates
            .get(index)
            .map(|[lon, lat]| Checkpoint::new(*lat, *lon))
    }
}

/// A point along the route where a refuel decision is made.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub lat: f64,
    pub lon: f64,
}

impl Checkpoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A user-facing coordinate, as accepted by the route endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Finite and within WGS84 latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A station chosen for a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelStop {
    #[serde(flatten)]
    pub station: Station,
    /// Great-circle miles from the checkpoint to the station
    pub distance_from_route: f64,
    pub checkpoint: Checkpoint,
}

/// Output of a single optimization call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub fuel_stops: Vec<FuelStop>,
    pub total_cost: f64,
    pub checkpoints: Vec<Checkpoint>,
}

impl OptimizationResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of checkpoints that had no station within the search radius.
    pub fn coverage_gaps(&self) -> usize {
        self.checkpoints.len().saturating_sub(self.fuel_stops.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_swaps_to_lat_lon() {
        let geometry = RouteGeometry::new(vec![[-97.74, 30.27], [-96.80, 32.78]]);
        let checkpoint = geometry.checkpoint_at(1).unwrap();
        assert_eq!(checkpoint, Checkpoint::new(32.78, -96.80));
        assert!(geometry.checkpoint_at(2).is_none());
    }

    #[test]
    fn route_step_accepts_provider_field_name() {
        let step: RouteStep =
            serde_json::from_str(r#"{"distance": 12.5, "way_points": [0, 7], "name": "I-35"}"#)
                .unwrap();
        assert_eq!(step.last_waypoint(), Some(7));
        assert!((step.distance - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn lat_lng_range_check() {
        assert!(LatLng { lat: 40.7, lng: -74.0 }.is_valid());
        assert!(!LatLng { lat: 91.0, lng: 0.0 }.is_valid());
        assert!(!LatLng { lat: 0.0, lng: f64::NAN }.is_valid());
    }

    #[test]
    fn geometry_deserializes_from_bare_array() {
        let geometry: RouteGeometry = serde_json::from_str("[[-80.1, 25.7], [-80.2, 26.1]]").unwrap();
        assert_eq!(geometry.len(), 2);
    }
}
