//! Vehicle and search parameters for the optimizer.

use serde::{Deserialize, Serialize};

use crate::error::OptimizerError;
use crate::spatial::buffer_degrees;

/// Configuration for fuel stop planning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSettings {
    /// Fuel economy of the vehicle
    pub miles_per_gallon: f64,
    /// Maximum miles between refuel checkpoints
    pub segment_distance_mi: f64,
    /// Maximum miles from a checkpoint to an acceptable station
    pub search_radius_mi: f64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            miles_per_gallon: 10.0,
            segment_distance_mi: 400.0,
            search_radius_mi: 15.0,
        }
    }
}

impl OptimizerSettings {
    /// Reject non-positive or non-finite parameters.
    pub fn validate(&self) -> Result<(), OptimizerError> {
        check_positive("miles_per_gallon", self.miles_per_gallon)?;
        check_positive("segment_distance_mi", self.segment_distance_mi)?;
        check_positive("search_radius_mi", self.search_radius_mi)?;
        Ok(())
    }

    /// Coarse degree padding derived from the search radius.
    pub fn buffer_degrees(&self) -> f64 {
        buffer_degrees(self.search_radius_mi)
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), OptimizerError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(OptimizerError::InvalidSetting { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = OptimizerSettings::default();
        assert!(settings.validate().is_ok());
        assert!((settings.buffer_degrees() - 15.0 / 69.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_values() {
        let mut settings = OptimizerSettings::default();
        settings.miles_per_gallon = 0.0;
        assert!(matches!(
            settings.validate(),
            Err(OptimizerError::InvalidSetting {
                field: "miles_per_gallon",
                ..
            })
        ));

        let mut settings = OptimizerSettings::default();
        settings.search_radius_mi = -1.0;
        assert!(settings.validate().is_err());

        let mut settings = OptimizerSettings::default();
        settings.segment_distance_mi = f64::NAN;
        assert!(settings.validate().is_err());
    }
}
