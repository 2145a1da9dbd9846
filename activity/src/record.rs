//! Normalized activity record.

use fitstake_types::{ActivityType, Timestamp, VerificationParams};
use serde::{Deserialize, Serialize};

/// A structurally complete activity, ready for criteria validation.
///
/// Constructed per verification request and never persisted beyond the
/// audit trail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Provider-side activity identifier.
    pub id: String,
    pub name: String,
    pub activity_type: ActivityType,
    /// Meters.
    pub distance_m: f64,
    /// Seconds in motion.
    pub moving_time_s: u64,
    /// Wall-clock seconds from start to finish.
    pub elapsed_time_s: u64,
    pub start_time: Timestamp,
    /// Meters per second, as provided or derived from distance / moving time.
    pub average_speed_mps: f64,
    /// Whether `average_speed_mps` was derived rather than provided.
    #[serde(default)]
    pub speed_derived: bool,
}

impl ActivityRecord {
    /// Re-derive the completeness flag against the given bounds.
    pub fn is_complete(&self, params: &VerificationParams) -> bool {
        self.issues(params).is_empty()
    }

    /// Positivity and plausibility issues for an already-typed record.
    pub fn issues(&self, params: &VerificationParams) -> Vec<String> {
        let mut issues = Vec::new();
        if self.id.is_empty() {
            issues.push("missing id".to_string());
        }
        if self.name.is_empty() {
            issues.push("missing name".to_string());
        }
        if self.activity_type.as_str().is_empty() {
            issues.push("missing type".to_string());
        }
        check_positive(&mut issues, "distance", self.distance_m);
        check_positive(&mut issues, "moving_time", self.moving_time_s as f64);
        check_positive(&mut issues, "average_speed", self.average_speed_mps);
        check_plausible(&mut issues, self.distance_m, self.average_speed_mps, params);
        issues
    }
}

pub(crate) fn check_positive(issues: &mut Vec<String>, field: &str, value: f64) {
    if value.is_nan() || value <= 0.0 {
        issues.push(format!("{field} must be positive (got {value})"));
    }
}

pub(crate) fn check_plausible(
    issues: &mut Vec<String>,
    distance_m: f64,
    average_speed_mps: f64,
    params: &VerificationParams,
) {
    if average_speed_mps > params.max_average_speed_mps {
        issues.push(format!(
            "average speed {average_speed_mps} m/s exceeds plausible maximum {} m/s",
            params.max_average_speed_mps
        ));
    }
    if distance_m > params.max_distance_m {
        issues.push(format!(
            "distance {distance_m} m exceeds plausible maximum {} m",
            params.max_distance_m
        ));
    }
}
