//! Verification parameters shared by the normalizer and the criteria validator.

use crate::{ActivityType, FitstakeError};
use serde::{Deserialize, Serialize};

/// Tunable acceptance and plausibility thresholds.
///
/// One set per deployment scope. Individual challenges may override the
/// distance tolerance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationParams {
    /// Slack (meters) applied to distance bounds. Default: 0.
    pub distance_tolerance_m: f64,

    /// Average speed above this (m/s) is implausible for a human effort.
    /// Default: 10 m/s (~36 km/h).
    pub max_average_speed_mps: f64,

    /// Distances above this (meters) are implausible for one activity.
    /// Default: 100 km.
    pub max_distance_m: f64,

    /// Activity type required when a challenge does not name one.
    pub default_activity_type: ActivityType,
}

impl VerificationParams {
    pub const DEFAULT_MAX_AVERAGE_SPEED_MPS: f64 = 10.0;
    pub const DEFAULT_MAX_DISTANCE_M: f64 = 100_000.0;

    /// Reject values that would make every activity pass or fail.
    pub fn validate(&self) -> Result<(), FitstakeError> {
        if !self.distance_tolerance_m.is_finite() || self.distance_tolerance_m < 0.0 {
            return Err(FitstakeError::InvalidParams(format!(
                "distance_tolerance_m must be a non-negative number, got {}",
                self.distance_tolerance_m
            )));
        }
        if !self.max_average_speed_mps.is_finite() || self.max_average_speed_mps <= 0.0 {
            return Err(FitstakeError::InvalidParams(format!(
                "max_average_speed_mps must be positive, got {}",
                self.max_average_speed_mps
            )));
        }
        if !self.max_distance_m.is_finite() || self.max_distance_m <= 0.0 {
            return Err(FitstakeError::InvalidParams(format!(
                "max_distance_m must be positive, got {}",
                self.max_distance_m
            )));
        }
        if self.default_activity_type.as_str().is_empty() {
            return Err(FitstakeError::InvalidParams(
                "default_activity_type must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for VerificationParams {
    fn default() -> Self {
        Self {
            distance_tolerance_m: 0.0,
            max_average_speed_mps: Self::DEFAULT_MAX_AVERAGE_SPEED_MPS,
            max_distance_m: Self::DEFAULT_MAX_DISTANCE_M,
            default_activity_type: ActivityType::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = VerificationParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.distance_tolerance_m, 0.0);
        assert_eq!(params.default_activity_type.as_str(), "Run");
    }

    #[test]
    fn negative_tolerance_rejected() {
        let params = VerificationParams {
            distance_tolerance_m: -1.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn nan_bound_rejected() {
        let params = VerificationParams {
            max_distance_m: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
