//! Checkpoint planning: split a route into refuel decision points.

use crate::error::OptimizerError;
use crate::models::{Checkpoint, RouteGeometry, RouteStep};

/// Reject steps the planner cannot resolve against the geometry.
///
/// Every step is checked, not only the ones that end up producing a
/// checkpoint, so a malformed route never yields a partial plan.
pub fn validate_steps(steps: &[RouteStep], geometry: &RouteGeometry) -> Result<(), OptimizerError> {
    for (index, step) in steps.iter().enumerate() {
        if !step.distance.is_finite() || step.distance < 0.0 {
            return Err(OptimizerError::InvalidStepDistance {
                step: index,
                distance: step.distance,
            });
        }
        let waypoint = step
            .last_waypoint()
            .ok_or(OptimizerError::MissingWaypoints { step: index })?;
        if waypoint >= geometry.len() {
            return Err(OptimizerError::WaypointOutOfBounds {
                step: index,
                waypoint,
                len: geometry.len(),
            });
        }
    }
    Ok(())
}

/// Walk the steps and emit a checkpoint each time the accumulated distance
/// reaches `segment_distance`.
///
/// Checkpoints snap to the last waypoint of the step that crossed the
/// threshold; nothing is interpolated mid-step. A trailing checkpoint is
/// added at the final step when the leftover distance exceeds half a segment.
pub fn plan_checkpoints(
    steps: &[RouteStep],
    geometry: &RouteGeometry,
    segment_distance: f64,
) -> Result<Vec<Checkpoint>, OptimizerError> {
    validate_steps(steps, geometry)?;

    let mut checkpoints = Vec::new();
    let mut accumulated = 0.0;

    for (index, step) in steps.iter().enumerate() {
        accumulated += step.distance;
        if accumulated >= segment_distance {
            checkpoints.push(resolve(step, index, geometry)?);
            accumulated = 0.0;
        }
    }

    if let Some(last) = steps.last() {
        if accumulated > segment_distance / 2.0 {
            checkpoints.push(resolve(last, steps.len() - 1, geometry)?);
        }
    }

    Ok(checkpoints)
}

fn resolve(
    step: &RouteStep,
    index: usize,
    geometry: &RouteGeometry,
) -> Result<Checkpoint, OptimizerError> {
    let waypoint = step
        .last_waypoint()
        .ok_or(OptimizerError::MissingWaypoints { step: index })?;
    geometry
        .checkpoint_at(waypoint)
        .ok_or(OptimizerError::WaypointOutOfBounds {
            step: index,
            waypoint,
            len: geometry.len(),
        })
}
