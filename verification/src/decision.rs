//! The immutable, auditable outcome of one verification attempt.

use crate::{FailureCode, Stage, StageFailure};
use fitstake_activity::ActivityRecord;
use fitstake_types::{ActivityType, ChallengeId, Timestamp};
use serde::Serialize;

/// Per-stage results. A stage skipped by short-circuiting reads `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StageResults {
    pub completeness: bool,
    #[serde(rename = "type")]
    pub activity_type: bool,
    pub distance: bool,
    pub timestamp: bool,
}

impl StageResults {
    pub fn all_passed(&self) -> bool {
        self.completeness && self.activity_type && self.distance && self.timestamp
    }

    pub fn passed(&self, stage: Stage) -> bool {
        match stage {
            Stage::Completeness => self.completeness,
            Stage::ActivityType => self.activity_type,
            Stage::Distance => self.distance,
            Stage::Timestamp => self.timestamp,
        }
    }

    pub(crate) fn mark_passed(&mut self, stage: Stage) {
        match stage {
            Stage::Completeness => self.completeness = true,
            Stage::ActivityType => self.activity_type = true,
            Stage::Distance => self.distance = true,
            Stage::Timestamp => self.timestamp = true,
        }
    }
}

/// Facts about the accepted activity, carried so completion metadata can be
/// recorded without re-reading the payload.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActivityEvidence {
    pub activity_id: String,
    pub activity_type: ActivityType,
    pub start_time: Timestamp,
    pub distance_m: f64,
    pub moving_time_s: u64,
    pub elapsed_time_s: u64,
}

impl From<&ActivityRecord> for ActivityEvidence {
    fn from(record: &ActivityRecord) -> Self {
        Self {
            activity_id: record.id.clone(),
            activity_type: record.activity_type.clone(),
            start_time: record.start_time,
            distance_m: record.distance_m,
            moving_time_s: record.moving_time_s,
            elapsed_time_s: record.elapsed_time_s,
        }
    }
}

/// Pass/fail decision with stage-level detail.
///
/// Only [`crate::ActivityVerifier`] constructs decisions, which keeps the
/// invariant: `success` holds exactly when every stage passed, and `reason`
/// is non-empty exactly when `success` is false.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VerificationDecision {
    success: bool,
    reason: String,
    failed_stage: Option<Stage>,
    failure: Option<FailureCode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<String>,
    stages: StageResults,
    challenge_id: ChallengeId,
    activity_id: Option<String>,
    evaluated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    evidence: Option<ActivityEvidence>,
}

impl VerificationDecision {
    pub const SUCCESS_MESSAGE: &'static str = "activity meets all challenge criteria";

    pub(crate) fn passed(
        challenge_id: ChallengeId,
        record: &ActivityRecord,
        evaluated_at: Timestamp,
    ) -> Self {
        Self {
            success: true,
            reason: String::new(),
            failed_stage: None,
            failure: None,
            issues: Vec::new(),
            stages: StageResults {
                completeness: true,
                activity_type: true,
                distance: true,
                timestamp: true,
            },
            challenge_id,
            activity_id: Some(record.id.clone()),
            evaluated_at,
            evidence: Some(ActivityEvidence::from(record)),
        }
    }

    pub(crate) fn failed(
        challenge_id: ChallengeId,
        activity_id: Option<String>,
        stages: StageResults,
        failure: StageFailure,
        evaluated_at: Timestamp,
    ) -> Self {
        let reason = if failure.reason.is_empty() {
            format!("{} check failed", failure.stage())
        } else {
            failure.reason
        };
        Self {
            success: false,
            reason,
            failed_stage: Some(failure.code.stage()),
            failure: Some(failure.code),
            issues: failure.issues,
            stages,
            challenge_id,
            activity_id,
            evaluated_at,
            evidence: None,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Failure reason; empty on success.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Reason on failure, [`Self::SUCCESS_MESSAGE`] on success.
    pub fn summary(&self) -> &str {
        if self.success {
            Self::SUCCESS_MESSAGE
        } else {
            &self.reason
        }
    }

    pub fn failed_stage(&self) -> Option<Stage> {
        self.failed_stage
    }

    pub fn failure(&self) -> Option<FailureCode> {
        self.failure
    }

    /// Completeness issues, when that stage failed.
    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    pub fn stages(&self) -> &StageResults {
        &self.stages
    }

    pub fn challenge_id(&self) -> ChallengeId {
        self.challenge_id
    }

    pub fn activity_id(&self) -> Option<&str> {
        self.activity_id.as_deref()
    }

    pub fn evaluated_at(&self) -> Timestamp {
        self.evaluated_at
    }

    /// Present only on success.
    pub fn evidence(&self) -> Option<&ActivityEvidence> {
        self.evidence.as_ref()
    }
}
