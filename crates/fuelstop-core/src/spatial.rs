//! Spatial math for candidate filtering and distance calculations.

use serde::{Deserialize, Serialize};

use crate::models::{Checkpoint, Station};

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MI: f64 = 3_958.8;

/// Approximate miles per degree of latitude.
pub const MILES_PER_DEGREE: f64 = 69.0;

/// Calculate distance between two points in miles using the Haversine formula.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MI * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Convert a radius in miles to a coarse degree padding.
///
/// Accurate for latitude only. Longitude degrees shrink toward the poles, so
/// anything built from this is over-inclusive there and must be followed by
/// an exact distance check.
pub fn buffer_degrees(radius_mi: f64) -> f64 {
    radius_mi / MILES_PER_DEGREE
}

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Smallest box covering every checkpoint, or `None` for an empty slice.
    pub fn around(points: &[Checkpoint]) -> Option<Self> {
        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        let mut min_lon = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        for point in points {
            if !point.lat.is_finite() || !point.lon.is_finite() {
                continue;
            }
            min_lat = min_lat.min(point.lat);
            max_lat = max_lat.max(point.lat);
            min_lon = min_lon.min(point.lon);
            max_lon = max_lon.max(point.lon);
        }
        if !min_lat.is_finite() || !min_lon.is_finite() {
            return None;
        }
        Some(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    /// Grow the box by `degrees` on every side.
    pub fn expand(&self, degrees: f64) -> Self {
        Self {
            min_lat: self.min_lat - degrees,
            max_lat: self.max_lat + degrees,
            min_lon: self.min_lon - degrees,
            max_lon: self.max_lon + degrees,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Cache key rounded to 4 decimal places so near-identical routes share entries.
    pub fn cache_key(&self) -> String {
        format!(
            "stations_bbox_{:.4}_{:.4}_{:.4}_{:.4}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

/// Cheap rectangular reject: both coordinate deltas must be within `buffer_deg`.
pub fn within_buffer(checkpoint: &Checkpoint, station: &Station, buffer_deg: f64) -> bool {
    (station.lat - checkpoint.lat).abs() <= buffer_deg
        && (station.lon - checkpoint.lon).abs() <= buffer_deg
}

/// Exact test: great-circle distance in miles if it is within `radius_mi`.
pub fn within_radius(checkpoint: &Checkpoint, station: &Station, radius_mi: f64) -> Option<f64> {
    let distance = haversine_miles(checkpoint.lat, checkpoint.lon, station.lat, station.lon);
    (distance <= radius_mi).then_some(distance)
}
