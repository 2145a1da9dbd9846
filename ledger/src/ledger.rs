//! The ledger interface the oracle core calls through.

use crate::{
    Challenge, ChallengeTerms, CompletionEvent, CompletionMetadata, FinalizationSummary,
    LedgerError, Participant, ParticipantPhase,
};
use fitstake_types::{ChallengeId, Identity, StakeAmount, Timestamp};

/// A ledger holding challenge escrow and participant state.
///
/// Every mutating call is a potentially-failing remote call: a failure to
/// reach the ledger surfaces as [`LedgerError::Unavailable`] and is never
/// retried here. Implementations must evaluate the lifecycle guard and apply
/// the mutation atomically per (challenge, participant), so that of two
/// concurrent `mark_complete` calls exactly one succeeds and the other sees
/// [`LedgerError::AlreadyCompleted`].
pub trait ChallengeLedger: Send + Sync {
    /// Create a challenge; the creator joins with the initial stake.
    fn create_challenge(
        &self,
        creator: &Identity,
        terms: ChallengeTerms,
        stake: StakeAmount,
        now: Timestamp,
    ) -> Result<ChallengeId, LedgerError>;

    /// Stake into a challenge. The stake must equal the challenge stake.
    fn join(
        &self,
        challenge_id: ChallengeId,
        participant: &Identity,
        stake: StakeAmount,
        now: Timestamp,
    ) -> Result<(), LedgerError>;

    /// Mark a joined participant complete, writing the metadata once.
    fn mark_complete(
        &self,
        challenge_id: ChallengeId,
        participant: &Identity,
        metadata: CompletionMetadata,
    ) -> Result<CompletionEvent, LedgerError>;

    /// Close a challenge after its end time.
    fn finalize(
        &self,
        challenge_id: ChallengeId,
        now: Timestamp,
    ) -> Result<FinalizationSummary, LedgerError>;

    fn challenge(&self, challenge_id: ChallengeId) -> Result<Challenge, LedgerError>;

    fn participant(
        &self,
        challenge_id: ChallengeId,
        participant: &Identity,
    ) -> Result<Option<Participant>, LedgerError>;

    /// Lifecycle phase of an identity within a challenge.
    fn participant_phase(
        &self,
        challenge_id: ChallengeId,
        participant: &Identity,
    ) -> Result<ParticipantPhase, LedgerError> {
        Ok(ParticipantPhase::of(
            self.participant(challenge_id, participant)?.as_ref(),
        ))
    }
}
