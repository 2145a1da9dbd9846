//! End-to-end oracle service: verify, audit, authorize.

use crate::{
    CompletionAuthorizer, ConfigError, OracleAuthorization, OracleConfig, OracleError, AUDIT_TARGET,
};
use fitstake_activity::ActivityPayload;
use fitstake_ledger::{ChallengeLedger, ChallengeTerms, CompletionEvent, FinalizationSummary};
use fitstake_types::{ChallengeId, Clock, Identity, StakeAmount, SystemClock};
use fitstake_verification::{ActivityVerifier, ChallengeCriteria, VerificationDecision};

/// One oracle deployment: a verifier, an authorizer bound to a ledger, and a
/// clock.
///
/// Verification is pure and may run on any number of threads; only
/// [`OracleService::verify_and_complete`] touches the ledger.
pub struct OracleService<L, C = SystemClock> {
    verifier: ActivityVerifier,
    authorizer: CompletionAuthorizer<L>,
    clock: C,
}

impl<L: ChallengeLedger> OracleService<L, SystemClock> {
    pub fn new(config: &OracleConfig, ledger: L) -> Result<Self, ConfigError> {
        Self::with_clock(config, ledger, SystemClock)
    }
}

impl<L: ChallengeLedger, C: Clock> OracleService<L, C> {
    pub fn with_clock(config: &OracleConfig, ledger: L, clock: C) -> Result<Self, ConfigError> {
        let authorization = OracleAuthorization::from_config(config)?;
        tracing::debug!(
            scope = %authorization.scope(),
            oracle = %authorization.oracle(),
            "oracle service configured"
        );
        Ok(Self {
            verifier: ActivityVerifier::new(config.verification.clone()),
            authorizer: CompletionAuthorizer::new(authorization, ledger),
            clock,
        })
    }

    pub fn ledger(&self) -> &L {
        self.authorizer.ledger()
    }

    pub fn authorizer(&self) -> &CompletionAuthorizer<L> {
        &self.authorizer
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Evaluate an activity and record the decision in the audit log.
    ///
    /// Invalid criteria are reported as [`OracleError::MalformedInput`].
    pub fn verify(
        &self,
        payload: &ActivityPayload,
        criteria: &ChallengeCriteria,
    ) -> Result<VerificationDecision, OracleError> {
        let decision = self.verifier.verify(payload, criteria, self.clock.now())?;
        audit(&decision);
        Ok(decision)
    }

    /// [`Self::verify`] for a raw JSON payload.
    pub fn verify_json(
        &self,
        raw: &str,
        criteria: &ChallengeCriteria,
    ) -> Result<VerificationDecision, OracleError> {
        let payload = ActivityPayload::from_json_str(raw)?;
        self.verify(&payload, criteria)
    }

    /// Verify, then mark `participant` complete if the activity passes.
    ///
    /// Before anything is written, the supplied criteria are checked against
    /// the ledger's terms for the challenge: the window, target and activity
    /// type must match, and optional bounds may only tighten acceptance.
    pub fn verify_and_complete(
        &self,
        caller: &Identity,
        participant: &Identity,
        payload: &ActivityPayload,
        criteria: &ChallengeCriteria,
    ) -> Result<CompletionEvent, OracleError> {
        let decision = self.verify(payload, criteria)?;
        if decision.success() && self.authorizer.authorization().is_oracle(caller) {
            self.check_against_ledger(criteria)?;
        }
        self.authorizer.authorize(caller, participant, &decision)
    }

    fn check_against_ledger(&self, criteria: &ChallengeCriteria) -> Result<(), OracleError> {
        let recorded = self.criteria_for(criteria.challenge_id)?;
        let params = self.verifier.params();
        let required_type = criteria
            .required_activity_type
            .as_ref()
            .unwrap_or(&params.default_activity_type);
        let detail = if criteria.start_time != recorded.start_time
            || criteria.end_time != recorded.end_time
        {
            format!(
                "window [{}, {}] differs from [{}, {}]",
                criteria.start_time, criteria.end_time, recorded.start_time, recorded.end_time
            )
        } else if criteria.target_distance != recorded.target_distance {
            format!(
                "target {} m differs from {} m",
                criteria.target_distance, recorded.target_distance
            )
        } else if recorded.required_activity_type.as_ref() != Some(required_type) {
            format!("activity type {required_type} differs from the ledger")
        } else if criteria.required_distance() < recorded.required_distance() {
            format!(
                "minimum {} m is below the target {} m",
                criteria.required_distance(),
                recorded.required_distance()
            )
        } else if criteria
            .distance_tolerance
            .is_some_and(|t| t > params.distance_tolerance_m)
        {
            format!(
                "tolerance {} m exceeds the deployment tolerance {} m",
                criteria.distance_tolerance.unwrap_or_default(),
                params.distance_tolerance_m
            )
        } else {
            return Ok(());
        };
        tracing::warn!(challenge_id = %criteria.challenge_id, %detail, "criteria rejected");
        Err(OracleError::CriteriaMismatch {
            challenge: criteria.challenge_id,
            detail,
        })
    }

    /// Criteria for a challenge as recorded on the ledger.
    pub fn criteria_for(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<ChallengeCriteria, OracleError> {
        let challenge = self.ledger().challenge(challenge_id)?;
        Ok(ChallengeCriteria::new(
            challenge.id,
            challenge.target_distance_m as f64,
            challenge.start_time,
            challenge.end_time,
        )
        .with_activity_type(challenge.activity_type))
    }

    /// Verify against the ledger's own criteria for the challenge, then authorize.
    pub fn submit(
        &self,
        caller: &Identity,
        challenge_id: ChallengeId,
        participant: &Identity,
        payload: &ActivityPayload,
    ) -> Result<CompletionEvent, OracleError> {
        let criteria = self.criteria_for(challenge_id)?;
        let decision = self.verify(payload, &criteria)?;
        self.authorizer.authorize(caller, participant, &decision)
    }

    pub fn create_challenge(
        &self,
        creator: &Identity,
        terms: ChallengeTerms,
        stake: StakeAmount,
    ) -> Result<ChallengeId, OracleError> {
        Ok(self
            .ledger()
            .create_challenge(creator, terms, stake, self.clock.now())?)
    }

    pub fn join(
        &self,
        challenge_id: ChallengeId,
        participant: &Identity,
        stake: StakeAmount,
    ) -> Result<(), OracleError> {
        Ok(self
            .ledger()
            .join(challenge_id, participant, stake, self.clock.now())?)
    }

    /// Close a challenge. Anyone may call this once the end time has passed.
    pub fn finalize(&self, challenge_id: ChallengeId) -> Result<FinalizationSummary, OracleError> {
        Ok(self.ledger().finalize(challenge_id, self.clock.now())?)
    }
}

/// Write one audit line for a decision: `info` when it passed, `warn` when not.
pub fn audit(decision: &VerificationDecision) {
    let activity_id = decision.activity_id().unwrap_or("-");
    if decision.success() {
        tracing::info!(
            target: AUDIT_TARGET,
            challenge_id = %decision.challenge_id(),
            activity_id,
            success = true,
            "activity verified"
        );
    } else {
        tracing::warn!(
            target: AUDIT_TARGET,
            challenge_id = %decision.challenge_id(),
            activity_id,
            success = false,
            stage = decision.failed_stage().map(|s| s.as_str()).unwrap_or("-"),
            reason = %decision.reason(),
            "activity rejected"
        );
    }
}
