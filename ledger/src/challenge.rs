//! Ledger records: challenges, participants and completion metadata.

use crate::lifecycle::{ChallengePhase, ParticipantPhase};
use fitstake_types::{ActivityType, ChallengeId, Identity, StakeAmount, Timestamp};
use serde::{Deserialize, Serialize};

/// Creator-supplied terms of a new challenge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChallengeTerms {
    pub description: String,
    /// Meters; must be positive.
    pub target_distance_m: u64,
    pub start_time: Timestamp,
    /// Must be after `start_time`.
    pub end_time: Timestamp,
    #[serde(default)]
    pub activity_type: ActivityType,
}

/// A staking competition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub creator: Identity,
    pub description: String,
    pub target_distance_m: u64,
    /// Stake every participant pays to join.
    pub stake: StakeAmount,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub activity_type: ActivityType,
    /// Monotonic: never goes back to `false`.
    pub finalized: bool,
    pub participant_count: u32,
    pub total_staked: StakeAmount,
}

impl Challenge {
    pub fn phase(&self) -> ChallengePhase {
        if self.finalized {
            ChallengePhase::Finalized
        } else {
            ChallengePhase::Open
        }
    }

    /// Inside the activity window, inclusive on both ends.
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.start_time <= now && now <= self.end_time
    }

    pub fn has_ended(&self, now: Timestamp) -> bool {
        now > self.end_time
    }
}

/// Completion record, written at most once per participant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletionMetadata {
    /// Start time of the qualifying activity.
    pub completed_at: Timestamp,
    pub distance_m: f64,
    /// Moving time in seconds.
    pub duration_s: u64,
    pub source_activity_id: String,
}

/// A (challenge, identity) pair. A record exists only once the identity
/// has joined; absence is the `NotJoined` phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub identity: Identity,
    pub staked: StakeAmount,
    pub joined_at: Timestamp,
    /// Present exactly when the participant has completed.
    pub completion: Option<CompletionMetadata>,
}

impl Participant {
    pub fn joined(identity: Identity, staked: StakeAmount, joined_at: Timestamp) -> Self {
        Self {
            identity,
            staked,
            joined_at,
            completion: None,
        }
    }

    pub fn has_completed(&self) -> bool {
        self.completion.is_some()
    }

    pub fn phase(&self) -> ParticipantPhase {
        if self.has_completed() {
            ParticipantPhase::Completed
        } else {
            ParticipantPhase::Joined
        }
    }
}

/// Result of finalizing a challenge. Payout distribution happens elsewhere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinalizationSummary {
    pub challenge_id: ChallengeId,
    pub finalized_at: Timestamp,
    pub participant_count: u32,
    pub total_staked: StakeAmount,
    /// Participants eligible for payout, in join order.
    pub completed: Vec<Identity>,
}
