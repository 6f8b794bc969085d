//! Error taxonomy for the optimizer.

use thiserror::Error;

/// Boxed error returned by injected collaborators (station store, cache).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum OptimizerError {
    /// A tuning parameter is zero, negative or not finite.
    #[error("invalid configuration: {field} must be a positive number, got {value}")]
    InvalidSetting { field: &'static str, value: f64 },

    #[error("invalid route: total distance must be a non-negative number, got {0}")]
    InvalidRouteDistance(f64),

    #[error("invalid route: step {step} has no waypoint indices")]
    MissingWaypoints { step: usize },

    #[error("invalid route: step {step} has distance {distance}")]
    InvalidStepDistance { step: usize, distance: f64 },

    #[error(
        "invalid route: step {step} references waypoint {waypoint} but geometry has {len} points"
    )]
    WaypointOutOfBounds {
        step: usize,
        waypoint: usize,
        len: usize,
    },

    #[error("station store query failed: {0}")]
    Store(#[source] BoxError),
}

impl OptimizerError {
    /// True for errors caused by the caller's input rather than a collaborator.
    pub fn is_validation(&self) -> bool {
        !matches!(self, OptimizerError::Store(_))
    }
}
