//! Fuel cost estimate for a set of chosen stops.
//!
//! Each stop is charged for a full notional segment of driving, regardless of
//! the actual leg length since the previous stop. Legs shorter than a segment
//! (notably the trailing checkpoint) are therefore overcounted.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::FuelStop;

/// Cost of refuelling one segment at `price`.
pub fn leg_cost(price: Decimal, segment_distance: f64, miles_per_gallon: f64) -> f64 {
    let gallons = segment_distance / miles_per_gallon;
    gallons * price.to_f64().unwrap_or(0.0)
}

/// Sum of `leg_cost` over every stop. Checkpoints without a stop add nothing.
pub fn accumulate_cost(stops: &[FuelStop], segment_distance: f64, miles_per_gallon: f64) -> f64 {
    stops
        .iter()
        .map(|stop| leg_cost(stop.station.price, segment_distance, miles_per_gallon))
        .sum()
}
