//! Events emitted by the ledger for downstream indexers.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use fitstake_types::{ChallengeId, Identity, StakeAmount, Timestamp};
use serde::{Deserialize, Serialize};

type Blake2b256 = Blake2b<U32>;

/// Immutable record of one participant completing one challenge.
///
/// Emitted exactly once per (challenge, participant).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    pub challenge_id: ChallengeId,
    pub participant_identity: Identity,
    pub completion_timestamp: Timestamp,
    pub distance: f64,
    pub duration: u64,
    pub source_activity_id: String,
}

impl CompletionEvent {
    /// Stable dedup key: Blake2b-256 over the challenge id, the canonical
    /// participant identity and the source activity id, hex-encoded.
    pub fn event_id(&self) -> String {
        let mut hasher = Blake2b256::new();
        hasher.update(self.challenge_id.raw().to_be_bytes());
        hasher.update(self.participant_identity.canonical().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.source_activity_id.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Ledger-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A challenge was created; the creator is its first participant.
    ChallengeCreated {
        challenge_id: ChallengeId,
        creator: Identity,
        stake: StakeAmount,
    },
    /// A participant staked into a challenge.
    ParticipantJoined {
        challenge_id: ChallengeId,
        participant: Identity,
        stake: StakeAmount,
    },
    /// The oracle marked a participant complete.
    TaskCompleted(CompletionEvent),
    /// The challenge closed; payouts go to the completed participants.
    ChallengeFinalized {
        challenge_id: ChallengeId,
        completed: u32,
        total_staked: StakeAmount,
    },
}

impl LedgerEvent {
    pub fn challenge_id(&self) -> ChallengeId {
        match self {
            Self::ChallengeCreated { challenge_id, .. }
            | Self::ParticipantJoined { challenge_id, .. }
            | Self::ChallengeFinalized { challenge_id, .. } => *challenge_id,
            Self::TaskCompleted(event) => event.challenge_id,
        }
    }
}

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast to
/// avoid stalling ledger mutations.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
