//! The verification pipeline driver.

use crate::stage::{check_activity_type, check_distance, check_timestamp, StageCheck};
use crate::{
    ChallengeCriteria, DistanceBounds, Stage, StageFailure, StageResults, VerificationDecision,
    VerificationError,
};
use fitstake_activity::{normalize, ActivityPayload, ActivityRecord};
use fitstake_types::{Timestamp, VerificationParams};

/// Runs the stage pipeline for one deployment's parameters.
///
/// Stateless apart from the parameters, so one verifier can serve
/// concurrent requests.
#[derive(Clone, Debug, Default)]
pub struct ActivityVerifier {
    params: VerificationParams,
}

impl ActivityVerifier {
    pub fn new(params: VerificationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &VerificationParams {
        &self.params
    }

    /// Verify a raw payload: normalize, then run the criteria stages.
    ///
    /// Criteria that fail [`ChallengeCriteria::validate`] are an error, not a
    /// failed decision: no activity is evaluated against them.
    pub fn verify(
        &self,
        payload: &ActivityPayload,
        criteria: &ChallengeCriteria,
        now: Timestamp,
    ) -> Result<VerificationDecision, VerificationError> {
        criteria.validate()?;
        match normalize(payload, &self.params) {
            Ok(record) => self.verify_record(&record, criteria, now),
            Err(report) => {
                tracing::debug!(
                    challenge_id = %criteria.challenge_id,
                    issues = report.issues.len(),
                    "completeness stage failed"
                );
                Ok(VerificationDecision::failed(
                    criteria.challenge_id,
                    payload.source_id(),
                    StageResults::default(),
                    StageFailure::incomplete(report.issues),
                    now,
                ))
            }
        }
    }

    /// Verify an already-normalized record. Completeness is re-derived from
    /// the record so a hand-built record cannot skip the plausibility filter.
    pub fn verify_record(
        &self,
        record: &ActivityRecord,
        criteria: &ChallengeCriteria,
        now: Timestamp,
    ) -> Result<VerificationDecision, VerificationError> {
        criteria.validate()?;
        let mut stages = StageResults::default();
        for stage in Stage::PIPELINE {
            if let Err(failure) = self.run_stage(stage, record, criteria) {
                tracing::debug!(
                    challenge_id = %criteria.challenge_id,
                    activity_id = %record.id,
                    %stage,
                    reason = %failure.reason,
                    "verification stage failed"
                );
                return Ok(VerificationDecision::failed(
                    criteria.challenge_id,
                    Some(record.id.clone()),
                    stages,
                    failure,
                    now,
                ));
            }
            stages.mark_passed(stage);
        }
        Ok(VerificationDecision::passed(criteria.challenge_id, record, now))
    }

    fn run_stage(
        &self,
        stage: Stage,
        record: &ActivityRecord,
        criteria: &ChallengeCriteria,
    ) -> StageCheck {
        match stage {
            Stage::Completeness => {
                let issues = record.issues(&self.params);
                if issues.is_empty() {
                    Ok(())
                } else {
                    Err(StageFailure::incomplete(issues))
                }
            }
            Stage::ActivityType => {
                let required = criteria
                    .required_activity_type
                    .as_ref()
                    .unwrap_or(&self.params.default_activity_type);
                check_activity_type(record, required)
            }
            Stage::Distance => {
                check_distance(record, &DistanceBounds::resolve(criteria, &self.params))
            }
            Stage::Timestamp => check_timestamp(record, criteria.start_time, criteria.end_time),
        }
    }
}
