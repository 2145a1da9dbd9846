//! Lifecycle rules shared by every ledger implementation.
//!
//! Each `check_*` function is a pure guard over the current records. A
//! ledger evaluates the guard and applies the mutation as one atomic step.

use crate::{Challenge, ChallengeTerms, CompletionMetadata, LedgerError, Participant};
use fitstake_types::{Identity, StakeAmount, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantPhase {
    NotJoined,
    Joined,
    /// Terminal.
    Completed,
}

impl ParticipantPhase {
    pub fn of(participant: Option<&Participant>) -> Self {
        participant.map_or(Self::NotJoined, Participant::phase)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengePhase {
    Open,
    /// Terminal.
    Finalized,
}

/// Terms must describe a non-empty window, a positive target and a positive stake.
pub fn check_terms(terms: &ChallengeTerms, stake: StakeAmount) -> Result<(), LedgerError> {
    if terms.end_time <= terms.start_time {
        return Err(LedgerError::InvalidChallenge(format!(
            "end time {} must be after start time {}",
            terms.end_time, terms.start_time
        )));
    }
    if terms.target_distance_m == 0 {
        return Err(LedgerError::InvalidChallenge(
            "target distance must be positive".into(),
        ));
    }
    if stake.is_zero() {
        return Err(LedgerError::InvalidChallenge("stake must be positive".into()));
    }
    if terms.activity_type.as_str().is_empty() {
        return Err(LedgerError::InvalidChallenge(
            "activity type must not be empty".into(),
        ));
    }
    Ok(())
}

/// `NotJoined → Joined`.
pub fn check_join(
    challenge: &Challenge,
    existing: Option<&Participant>,
    identity: &Identity,
    stake: StakeAmount,
    now: Timestamp,
) -> Result<(), LedgerError> {
    if challenge.finalized {
        return Err(LedgerError::ChallengeFinalized(challenge.id));
    }
    if existing.is_some() {
        return Err(LedgerError::AlreadyJoined {
            challenge: challenge.id,
            participant: identity.clone(),
        });
    }
    if challenge.has_ended(now) {
        return Err(LedgerError::ChallengeClosed {
            challenge: challenge.id,
            end_time: challenge.end_time,
        });
    }
    if stake != challenge.stake {
        return Err(LedgerError::StakeMismatch {
            expected: challenge.stake,
            provided: stake,
        });
    }
    Ok(())
}

/// `Joined → Completed`.
///
/// Order matters: an idempotent retry of a completed participant reports
/// `AlreadyCompleted`, never `DuplicateActivity`.
pub fn check_complete(
    challenge: &Challenge,
    existing: Option<&Participant>,
    identity: &Identity,
    metadata: &CompletionMetadata,
    activity_already_used: bool,
) -> Result<(), LedgerError> {
    if challenge.finalized {
        return Err(LedgerError::ChallengeFinalized(challenge.id));
    }
    match ParticipantPhase::of(existing) {
        ParticipantPhase::NotJoined => Err(LedgerError::NotJoined {
            challenge: challenge.id,
            participant: identity.clone(),
        }),
        ParticipantPhase::Completed => Err(LedgerError::AlreadyCompleted {
            challenge: challenge.id,
            participant: identity.clone(),
        }),
        ParticipantPhase::Joined if activity_already_used => Err(LedgerError::DuplicateActivity {
            challenge: challenge.id,
            activity_id: metadata.source_activity_id.clone(),
        }),
        ParticipantPhase::Joined => Ok(()),
    }
}

/// `Open → Finalized`, only once the end time has passed.
pub fn check_finalize(challenge: &Challenge, now: Timestamp) -> Result<(), LedgerError> {
    if challenge.finalized {
        return Err(LedgerError::ChallengeFinalized(challenge.id));
    }
    if !challenge.has_ended(now) {
        return Err(LedgerError::NotYetEnded {
            challenge: challenge.id,
            end_time: challenge.end_time,
            now,
        });
    }
    Ok(())
}
