//! Pipeline stages and their pure predicate checks.

use crate::ChallengeCriteria;
use fitstake_activity::ActivityRecord;
use fitstake_types::{ActivityType, Timestamp, VerificationParams};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One stage of the verification pipeline, in evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Completeness,
    ActivityType,
    Distance,
    Timestamp,
}

impl Stage {
    /// Fixed evaluation order. A wrong type is reported before a short distance.
    pub const PIPELINE: [Stage; 4] = [
        Stage::Completeness,
        Stage::ActivityType,
        Stage::Distance,
        Stage::Timestamp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completeness => "completeness",
            Self::ActivityType => "type",
            Self::Distance => "distance",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable classification of a stage failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
    Incomplete,
    WrongType,
    InsufficientDistance,
    ExcessiveDistance,
    TooEarly,
    TooLate,
}

impl FailureCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::WrongType => "wrong_type",
            Self::InsufficientDistance => "insufficient_distance",
            Self::ExcessiveDistance => "excessive_distance",
            Self::TooEarly => "too_early",
            Self::TooLate => "too_late",
        }
    }

    /// The stage that produces this code.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Incomplete => Stage::Completeness,
            Self::WrongType => Stage::ActivityType,
            Self::InsufficientDistance | Self::ExcessiveDistance => Stage::Distance,
            Self::TooEarly | Self::TooLate => Stage::Timestamp,
        }
    }
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed stage: classification, human-readable reason, and for the
/// completeness stage the individual issues.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFailure {
    pub code: FailureCode,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

impl StageFailure {
    pub fn new(code: FailureCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
            issues: Vec::new(),
        }
    }

    pub fn incomplete(issues: Vec<String>) -> Self {
        Self {
            code: FailureCode::Incomplete,
            reason: format!("incomplete activity: {}", issues.join("; ")),
            issues,
        }
    }

    pub fn stage(&self) -> Stage {
        self.code.stage()
    }
}

pub type StageCheck = Result<(), StageFailure>;

/// Resolved distance bounds for one challenge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceBounds {
    pub min_m: f64,
    pub max_m: Option<f64>,
    pub tolerance_m: f64,
}

impl DistanceBounds {
    /// Challenge tolerance wins over the deployment default.
    pub fn resolve(criteria: &ChallengeCriteria, params: &VerificationParams) -> Self {
        Self {
            min_m: criteria.required_distance(),
            max_m: criteria.max_distance,
            tolerance_m: criteria
                .distance_tolerance
                .unwrap_or(params.distance_tolerance_m),
        }
    }

    pub fn lower_threshold(&self) -> f64 {
        self.min_m - self.tolerance_m
    }

    pub fn upper_threshold(&self) -> Option<f64> {
        self.max_m.map(|max| max + self.tolerance_m)
    }
}

/// Stage 2: exact, case-sensitive type match.
pub fn check_activity_type(record: &ActivityRecord, required: &ActivityType) -> StageCheck {
    if record.activity_type == *required {
        Ok(())
    } else {
        Err(StageFailure::new(
            FailureCode::WrongType,
            format!(
                "wrong activity type: got {}, required {}",
                record.activity_type, required
            ),
        ))
    }
}

/// Stage 3: distance within the tolerance-adjusted bounds, both inclusive.
pub fn check_distance(record: &ActivityRecord, bounds: &DistanceBounds) -> StageCheck {
    let actual = record.distance_m;
    let lower = bounds.lower_threshold();
    if actual < lower {
        return Err(StageFailure::new(
            FailureCode::InsufficientDistance,
            format!(
                "insufficient distance: {actual} m covered, {} m required{}",
                bounds.min_m,
                tolerance_note(bounds.tolerance_m)
            ),
        ));
    }
    if let Some(upper) = bounds.upper_threshold() {
        if actual > upper {
            return Err(StageFailure::new(
                FailureCode::ExcessiveDistance,
                format!(
                    "excessive distance: {actual} m covered, at most {} m allowed{}",
                    bounds.max_m.unwrap_or(upper),
                    tolerance_note(bounds.tolerance_m)
                ),
            ));
        }
    }
    Ok(())
}

/// Stage 4: start time inside `[start, end]`, both inclusive.
pub fn check_timestamp(record: &ActivityRecord, start: Timestamp, end: Timestamp) -> StageCheck {
    let at = record.start_time;
    if at < start {
        Err(StageFailure::new(
            FailureCode::TooEarly,
            format!("too_early: activity started at {at}, challenge window opens at {start}"),
        ))
    } else if at > end {
        Err(StageFailure::new(
            FailureCode::TooLate,
            format!("too_late: activity started at {at}, challenge window closed at {end}"),
        ))
    } else {
        Ok(())
    }
}

fn tolerance_note(tolerance_m: f64) -> String {
    if tolerance_m > 0.0 {
        format!(" (tolerance {tolerance_m} m)")
    } else {
        String::new()
    }
}
