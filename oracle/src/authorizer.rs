//! The one permitted ledger mutation: marking a participant complete.

use crate::{OracleAuthorization, OracleError};
use fitstake_ledger::{ChallengeLedger, CompletionEvent, CompletionMetadata, LedgerError};
use fitstake_types::Identity;
use fitstake_utils::{format_distance, format_duration};
use fitstake_verification::VerificationDecision;

/// Applies passing decisions to the ledger on behalf of the oracle.
///
/// Checks run in a fixed order: the decision must pass, then the caller must
/// be the oracle, then the ledger enforces participant state atomically.
/// Acceptance rules are never re-derived here; the decision is the only
/// validation input.
pub struct CompletionAuthorizer<L> {
    authorization: OracleAuthorization,
    ledger: L,
}

impl<L: ChallengeLedger> CompletionAuthorizer<L> {
    pub fn new(authorization: OracleAuthorization, ledger: L) -> Self {
        Self {
            authorization,
            ledger,
        }
    }

    pub fn authorization(&self) -> &OracleAuthorization {
        &self.authorization
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mark `participant` complete on the decision's challenge.
    ///
    /// A second call for the same participant returns
    /// [`OracleError::AlreadyCompleted`] and changes nothing.
    pub fn authorize(
        &self,
        caller: &Identity,
        participant: &Identity,
        decision: &VerificationDecision,
    ) -> Result<CompletionEvent, OracleError> {
        let challenge_id = decision.challenge_id();
        let evidence = match decision.evidence() {
            Some(evidence) if decision.success() => evidence,
            _ => {
                return Err(OracleError::ValidationFailed {
                    stage: decision.failed_stage(),
                    reason: decision.reason().to_string(),
                })
            }
        };
        self.authorization.check(caller)?;

        let metadata = CompletionMetadata {
            completed_at: evidence.start_time,
            distance_m: evidence.distance_m,
            duration_s: evidence.moving_time_s,
            source_activity_id: evidence.activity_id.clone(),
        };
        match self.ledger.mark_complete(challenge_id, participant, metadata) {
            Ok(event) => {
                tracing::info!(
                    scope = %self.authorization.scope(),
                    %challenge_id,
                    %participant,
                    event_id = %event.event_id(),
                    distance = %format_distance(event.distance),
                    duration = %format_duration(event.duration),
                    "completion authorized"
                );
                Ok(event)
            }
            Err(LedgerError::Unavailable(msg)) => {
                tracing::error!(%challenge_id, %participant, error = %msg, "ledger unavailable");
                Err(OracleError::LedgerUnavailable(msg))
            }
            Err(err) => {
                tracing::info!(%challenge_id, %participant, error = %err, "completion rejected");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitstake_activity::ActivityPayload;
    use fitstake_ledger::{ChallengeTerms, InMemoryLedger, ParticipantPhase};
    use fitstake_types::{ActivityType, ChallengeId, ErrorKind, StakeAmount, Timestamp};
    use fitstake_verification::{ActivityVerifier, ChallengeCriteria};
    use serde_json::json;

    const START: u64 = 1_700_000_000;
    const END: u64 = START + 7 * 86_400;

    fn setup() -> (CompletionAuthorizer<InMemoryLedger>, ChallengeId, Identity) {
        let ledger = InMemoryLedger::new();
        let terms = ChallengeTerms {
            description: "5k".into(),
            target_distance_m: 5000,
            start_time: Timestamp::new(START),
            end_time: Timestamp::new(END),
            activity_type: ActivityType::run(),
        };
        let creator = Identity::new("0xcreator");
        let stake = StakeAmount::new(1_000);
        let id = ledger
            .create_challenge(&creator, terms, stake, Timestamp::new(START - 10))
            .unwrap();
        let runner = Identity::new("0xRunner");
        ledger.join(id, &runner, stake, Timestamp::new(START)).unwrap();
        let auth = OracleAuthorization::new("test", Identity::new("0xOracle"));
        (CompletionAuthorizer::new(auth, ledger), id, runner)
    }

    fn decision(id: ChallengeId, distance: f64) -> VerificationDecision {
        let payload = ActivityPayload::from_value(json!({
            "id": 42,
            "name": "Morning run",
            "type": "Run",
            "distance": distance,
            "moving_time": 1800,
            "start_date": START + 86_400,
        }))
        .unwrap();
        let criteria =
            ChallengeCriteria::new(id, 5000.0, Timestamp::new(START), Timestamp::new(END));
        ActivityVerifier::default()
            .verify(&payload, &criteria, Timestamp::new(END))
            .unwrap()
    }

    #[test]
    fn passing_decision_marks_complete_once() {
        let (authorizer, id, runner) = setup();
        let oracle = Identity::new("0xoracle");
        let decision = decision(id, 5200.0);

        let event = authorizer.authorize(&oracle, &runner, &decision).unwrap();
        assert_eq!(event.source_activity_id, "42");
        assert_eq!(event.completion_timestamp, Timestamp::new(START + 86_400));
        assert_eq!(event.duration, 1800);

        let again = authorizer.authorize(&oracle, &runner, &decision).unwrap_err();
        assert_eq!(again.kind(), ErrorKind::AlreadyCompleted);
        assert!(again.is_success_equivalent());
    }

    #[test]
    fn failed_decision_is_rejected_before_identity() {
        let (authorizer, id, runner) = setup();
        let decision = decision(id, 3000.0);
        let err = authorizer
            .authorize(&Identity::new("0xmallory"), &runner, &decision)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[test]
    fn non_oracle_leaves_participant_untouched() {
        let (authorizer, id, runner) = setup();
        let err = authorizer
            .authorize(&Identity::new("0xmallory"), &runner, &decision(id, 5200.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnauthorizedOracle);
        assert_eq!(
            authorizer.ledger().participant_phase(id, &runner).unwrap(),
            ParticipantPhase::Joined
        );
    }

    #[test]
    fn unjoined_participant_is_not_joined() {
        let (authorizer, id, _) = setup();
        let stranger = Identity::new("0xstranger");
        let err = authorizer
            .authorize(&Identity::new("0xoracle"), &stranger, &decision(id, 5200.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotJoined);
    }
}
