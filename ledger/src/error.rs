use fitstake_types::{ChallengeId, Identity, StakeAmount, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("challenge {0} does not exist")]
    UnknownChallenge(ChallengeId),

    #[error("invalid challenge: {0}")]
    InvalidChallenge(String),

    #[error("{participant} has already joined challenge {challenge}")]
    AlreadyJoined {
        challenge: ChallengeId,
        participant: Identity,
    },

    #[error("stake mismatch: challenge requires {expected}, provided {provided}")]
    StakeMismatch {
        expected: StakeAmount,
        provided: StakeAmount,
    },

    #[error("challenge {challenge} closed at {end_time}")]
    ChallengeClosed {
        challenge: ChallengeId,
        end_time: Timestamp,
    },

    #[error("{participant} has not joined challenge {challenge}")]
    NotJoined {
        challenge: ChallengeId,
        participant: Identity,
    },

    #[error("{participant} has already completed challenge {challenge}")]
    AlreadyCompleted {
        challenge: ChallengeId,
        participant: Identity,
    },

    #[error("challenge {0} is finalized")]
    ChallengeFinalized(ChallengeId),

    #[error("activity {activity_id} was already used to complete challenge {challenge}")]
    DuplicateActivity {
        challenge: ChallengeId,
        activity_id: String,
    },

    #[error("challenge {challenge} cannot be finalized before {end_time} (now {now})")]
    NotYetEnded {
        challenge: ChallengeId,
        end_time: Timestamp,
        now: Timestamp,
    },

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}
