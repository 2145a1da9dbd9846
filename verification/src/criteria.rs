//! Challenge acceptance criteria, as supplied by the ledger.

use crate::VerificationError;
use fitstake_types::{ActivityType, ChallengeId, Timestamp};
use serde::{Deserialize, Serialize};

/// What an activity must satisfy to complete one challenge.
///
/// Distances are meters, times are Unix seconds. The wire form uses
/// camelCase (`challengeId`, `targetDistance`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeCriteria {
    pub challenge_id: ChallengeId,
    pub target_distance: f64,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Falls back to the deployment default (normally `Run`).
    #[serde(default)]
    pub required_activity_type: Option<ActivityType>,
    /// Overrides `target_distance` as the lower bound when set.
    #[serde(default)]
    pub min_distance: Option<f64>,
    #[serde(default)]
    pub max_distance: Option<f64>,
    /// Per-challenge override of the deployment distance tolerance.
    #[serde(default)]
    pub distance_tolerance: Option<f64>,
}

impl ChallengeCriteria {
    /// Criteria with just a target and a window; everything else defaulted.
    pub fn new(
        challenge_id: ChallengeId,
        target_distance: f64,
        start_time: Timestamp,
        end_time: Timestamp,
    ) -> Self {
        Self {
            challenge_id,
            target_distance,
            start_time,
            end_time,
            required_activity_type: None,
            min_distance: None,
            max_distance: None,
            distance_tolerance: None,
        }
    }

    pub fn with_activity_type(mut self, activity_type: impl Into<ActivityType>) -> Self {
        self.required_activity_type = Some(activity_type.into());
        self
    }

    pub fn with_max_distance(mut self, max: f64) -> Self {
        self.max_distance = Some(max);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.distance_tolerance = Some(tolerance);
        self
    }

    /// Lower distance bound before tolerance.
    pub fn required_distance(&self) -> f64 {
        self.min_distance.unwrap_or(self.target_distance)
    }

    pub fn validate(&self) -> Result<(), VerificationError> {
        if self.end_time <= self.start_time {
            return Err(VerificationError::EmptyWindow {
                start: self.start_time.as_secs(),
                end: self.end_time.as_secs(),
            });
        }
        if !self.target_distance.is_finite() || self.target_distance <= 0.0 {
            return Err(VerificationError::InvalidTarget(self.target_distance));
        }
        if let Some(min) = self.min_distance {
            if !min.is_finite() || min <= 0.0 {
                return Err(VerificationError::InvalidTarget(min));
            }
        }
        if let Some(max) = self.max_distance {
            let min = self.required_distance();
            if max.is_nan() || min > max {
                return Err(VerificationError::InconsistentBounds { min, max });
            }
        }
        if let Some(t) = self.distance_tolerance {
            if !t.is_finite() || t < 0.0 {
                return Err(VerificationError::InvalidTolerance(t));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria() -> ChallengeCriteria {
        ChallengeCriteria::new(
            ChallengeId::new(7),
            5000.0,
            Timestamp::new(1_000),
            Timestamp::new(2_000),
        )
    }

    #[test]
    fn parses_camel_case_wire_form() {
        let c: ChallengeCriteria = serde_json::from_str(
            r#"{"challengeId":7,"targetDistance":5000,"startTime":1000,"endTime":2000,
                "requiredActivityType":"Walk","maxDistance":8000}"#,
        )
        .unwrap();
        assert_eq!(c.challenge_id, ChallengeId::new(7));
        assert_eq!(c.required_activity_type.as_ref().unwrap().as_str(), "Walk");
        assert_eq!(c.max_distance, Some(8000.0));
        assert_eq!(c.min_distance, None);
    }

    #[test]
    fn min_distance_overrides_target() {
        let mut c = criteria();
        assert_eq!(c.required_distance(), 5000.0);
        c.min_distance = Some(4000.0);
        assert_eq!(c.required_distance(), 4000.0);
    }

    #[test]
    fn validate_rejects_bad_windows_and_bounds() {
        let mut c = criteria();
        c.end_time = c.start_time;
        assert!(matches!(c.validate(), Err(VerificationError::EmptyWindow { .. })));

        let c = criteria().with_max_distance(1000.0);
        assert!(matches!(c.validate(), Err(VerificationError::InconsistentBounds { .. })));

        let mut c = criteria();
        c.target_distance = 0.0;
        assert!(matches!(c.validate(), Err(VerificationError::InvalidTarget(_))));

        let c = criteria().with_tolerance(-5.0);
        assert!(matches!(c.validate(), Err(VerificationError::InvalidTolerance(_))));

        let mut c = criteria();
        c.min_distance = Some(-1.0);
        assert!(matches!(c.validate(), Err(VerificationError::InvalidTarget(_))));

        assert!(criteria().validate().is_ok());
    }
}
