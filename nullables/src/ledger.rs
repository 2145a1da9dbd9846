//! Nullable ledger: an in-memory ledger that records every call and can be
//! told to fail as if the backing store were unreachable.

use fitstake_ledger::{
    Challenge, ChallengeLedger, ChallengeTerms, CompletionEvent, CompletionMetadata,
    FinalizationSummary, InMemoryLedger, LedgerError, LedgerEvent, Participant,
};
use fitstake_types::{ChallengeId, Identity, StakeAmount, Timestamp};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

/// A ledger operation as observed by [`NullLedger`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerCall {
    CreateChallenge { creator: Identity },
    Join { challenge: ChallengeId, participant: Identity },
    MarkComplete { challenge: ChallengeId, participant: Identity },
    Finalize { challenge: ChallengeId },
    Read { challenge: ChallengeId },
}

/// Test double for [`ChallengeLedger`].
pub struct NullLedger {
    inner: InMemoryLedger,
    calls: Mutex<Vec<LedgerCall>>,
    unavailable: AtomicBool,
    failures_remaining: AtomicU32,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::wrapping(InMemoryLedger::new())
    }

    pub fn wrapping(inner: InMemoryLedger) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            unavailable: AtomicBool::new(false),
            failures_remaining: AtomicU32::new(0),
        }
    }

    /// Fail every call with `Unavailable` until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Fail the next `count` calls with `Unavailable`.
    pub fn fail_next(&self, count: u32) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Every call received so far, including failed ones.
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn mark_complete_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, LedgerCall::MarkComplete { .. }))
            .count()
    }

    pub fn events(&self) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.inner.events()
    }

    pub fn inner(&self) -> &InMemoryLedger {
        &self.inner
    }

    fn enter(&self, call: LedgerCall) -> Result<(), LedgerError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("ledger offline".into()));
        }
        let consumed = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if consumed.is_ok() {
            tracing::debug!("injected ledger failure");
            return Err(LedgerError::Unavailable("injected failure".into()));
        }
        Ok(())
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ChallengeLedger for NullLedger {
    fn create_challenge(
        &self,
        creator: &Identity,
        terms: ChallengeTerms,
        stake: StakeAmount,
        now: Timestamp,
    ) -> Result<ChallengeId, LedgerError> {
        self.enter(LedgerCall::CreateChallenge {
            creator: creator.clone(),
        })?;
        self.inner.create_challenge(creator, terms, stake, now)
    }

    fn join(
        &self,
        challenge_id: ChallengeId,
        participant: &Identity,
        stake: StakeAmount,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.enter(LedgerCall::Join {
            challenge: challenge_id,
            participant: participant.clone(),
        })?;
        self.inner.join(challenge_id, participant, stake, now)
    }

    fn mark_complete(
        &self,
        challenge_id: ChallengeId,
        participant: &Identity,
        metadata: CompletionMetadata,
    ) -> Result<CompletionEvent, LedgerError> {
        self.enter(LedgerCall::MarkComplete {
            challenge: challenge_id,
            participant: participant.clone(),
        })?;
        self.inner.mark_complete(challenge_id, participant, metadata)
    }

    fn finalize(
        &self,
        challenge_id: ChallengeId,
        now: Timestamp,
    ) -> Result<FinalizationSummary, LedgerError> {
        self.enter(LedgerCall::Finalize {
            challenge: challenge_id,
        })?;
        self.inner.finalize(challenge_id, now)
    }

    fn challenge(&self, challenge_id: ChallengeId) -> Result<Challenge, LedgerError> {
        self.enter(LedgerCall::Read {
            challenge: challenge_id,
        })?;
        self.inner.challenge(challenge_id)
    }

    fn participant(
        &self,
        challenge_id: ChallengeId,
        participant: &Identity,
    ) -> Result<Option<Participant>, LedgerError> {
        self.enter(LedgerCall::Read {
            challenge: challenge_id,
        })?;
        self.inner.participant(challenge_id, participant)
    }
}
