//! Nearest-cheapest station selection for a single checkpoint.
//!
//! Selection is greedy and independent per checkpoint: it never looks ahead
//! or backtracks to trade price against route continuity.

use std::cmp::Ordering;

use crate::models::{Checkpoint, FuelStop, Station};
use crate::spatial::{buffer_degrees, within_buffer, within_radius};

/// Pick the cheapest station within `search_radius` miles of `checkpoint`.
///
/// Candidates first pass a rectangular degree prefilter, then an exact
/// great-circle test. Among survivors, price wins and distance breaks ties.
/// Returns `None` when nothing is in range.
pub fn select_station(
    checkpoint: &Checkpoint,
    candidates: &[Station],
    search_radius: f64,
) -> Option<FuelStop> {
    let buffer_deg = buffer_degrees(search_radius);

    candidates
        .iter()
        .filter(|station| within_buffer(checkpoint, station, buffer_deg))
        .filter_map(|station| {
            within_radius(checkpoint, station, search_radius).map(|distance| (station, distance))
        })
        .min_by(compare_candidates)
        .map(|(station, distance)| FuelStop {
            station: station.clone(),
            distance_from_route: distance,
            checkpoint: *checkpoint,
        })
}

/// Price ascending, then distance ascending.
fn compare_candidates(a: &(&Station, f64), b: &(&Station, f64)) -> Ordering {
    a.0.price
        .cmp(&b.0.price)
        .then_with(|| a.1.total_cmp(&b.1))
}

/// Run `select_station` for every checkpoint, logging coverage gaps.
pub fn select_stops(
    checkpoints: &[Checkpoint],
    candidates: &[Station],
    search_radius: f64,
) -> Vec<FuelStop> {
    let mut stops = Vec::with_capacity(checkpoints.len());
    for checkpoint in checkpoints {
        tracing::debug!(
            "Checking stations near ({:.5}, {:.5})",
            checkpoint.lat,
            checkpoint.lon
        );
        match select_station(checkpoint, candidates, search_radius) {
            Some(stop) => {
                tracing::debug!(
                    "Selected cheapest: {} at ${} ({:.1} mi)",
                    stop.station.name,
                    stop.station.price,
                    stop.distance_from_route
                );
                stops.push(stop);
            }
            None => {
                tracing::warn!(
                    "No stations found within {} miles of ({:.5}, {:.5})",
                    search_radius,
                    checkpoint.lat,
                    checkpoint.lon
                );
            }
        }
    }
    stops
}
