//! Thread-safe in-memory ledger.
//!
//! A single mutex guards all state, so every lifecycle guard and its
//! mutation run as one atomic step. Events are appended to the log under the
//! lock and fanned out to the [`EventBus`] after it is released.

use crate::lifecycle::{check_complete, check_finalize, check_join, check_terms};
use crate::{
    Challenge, ChallengeLedger, ChallengeTerms, CompletionEvent, CompletionMetadata, EventBus,
    FinalizationSummary, LedgerError, LedgerEvent, Participant,
};
use fitstake_types::{ChallengeId, Identity, StakeAmount, Timestamp};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

struct ChallengeRecord {
    challenge: Challenge,
    /// Join order.
    participants: Vec<Participant>,
    index: HashMap<Identity, usize>,
    used_activities: HashSet<String>,
}

impl ChallengeRecord {
    fn participant(&self, identity: &Identity) -> Option<&Participant> {
        self.index.get(identity).map(|&i| &self.participants[i])
    }

    fn enroll(&mut self, identity: &Identity, stake: StakeAmount, now: Timestamp) {
        self.index.insert(identity.clone(), self.participants.len());
        self.participants
            .push(Participant::joined(identity.clone(), stake, now));
        self.challenge.participant_count += 1;
        self.challenge.total_staked = self.challenge.total_staked.saturating_add(stake);
    }
}

struct LedgerState {
    next_id: ChallengeId,
    challenges: BTreeMap<ChallengeId, ChallengeRecord>,
    log: Vec<LedgerEvent>,
}

impl LedgerState {
    fn record(&self, id: ChallengeId) -> Result<&ChallengeRecord, LedgerError> {
        self.challenges
            .get(&id)
            .ok_or(LedgerError::UnknownChallenge(id))
    }

    fn record_mut(&mut self, id: ChallengeId) -> Result<&mut ChallengeRecord, LedgerError> {
        self.challenges
            .get_mut(&id)
            .ok_or(LedgerError::UnknownChallenge(id))
    }
}

/// In-process [`ChallengeLedger`].
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
    bus: EventBus,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::with_event_bus(EventBus::new())
    }

    pub fn with_event_bus(bus: EventBus) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                next_id: ChallengeId::FIRST,
                challenges: BTreeMap::new(),
                log: Vec::new(),
            }),
            bus,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerState>, LedgerError> {
        self.state
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger state lock poisoned".into()))
    }

    fn publish(&self, event: &LedgerEvent) {
        self.bus.emit(event);
    }

    /// Append-only event log, oldest first.
    pub fn events(&self) -> Result<Vec<LedgerEvent>, LedgerError> {
        Ok(self.lock()?.log.clone())
    }

    pub fn challenges(&self) -> Result<Vec<Challenge>, LedgerError> {
        Ok(self
            .lock()?
            .challenges
            .values()
            .map(|r| r.challenge.clone())
            .collect())
    }

    /// Participants of a challenge in join order.
    pub fn participants(&self, challenge_id: ChallengeId) -> Result<Vec<Participant>, LedgerError> {
        Ok(self.lock()?.record(challenge_id)?.participants.clone())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ChallengeLedger for InMemoryLedger {
    fn create_challenge(
        &self,
        creator: &Identity,
        terms: ChallengeTerms,
        stake: StakeAmount,
        now: Timestamp,
    ) -> Result<ChallengeId, LedgerError> {
        check_terms(&terms, stake)?;
        let event = {
            let mut state = self.lock()?;
            let id = state.next_id;
            state.next_id = id.next();
            let mut record = ChallengeRecord {
                challenge: Challenge {
                    id,
                    creator: creator.clone(),
                    description: terms.description,
                    target_distance_m: terms.target_distance_m,
                    stake,
                    start_time: terms.start_time,
                    end_time: terms.end_time,
                    activity_type: terms.activity_type,
                    finalized: false,
                    participant_count: 0,
                    total_staked: StakeAmount::ZERO,
                },
                participants: Vec::new(),
                index: HashMap::new(),
                used_activities: HashSet::new(),
            };
            record.enroll(creator, stake, now);
            state.challenges.insert(id, record);
            let event = LedgerEvent::ChallengeCreated {
                challenge_id: id,
                creator: creator.clone(),
                stake,
            };
            state.log.push(event.clone());
            event
        };
        tracing::info!(
            challenge_id = %event.challenge_id(),
            creator = %creator,
            "challenge created"
        );
        self.publish(&event);
        Ok(event.challenge_id())
    }

    fn join(
        &self,
        challenge_id: ChallengeId,
        participant: &Identity,
        stake: StakeAmount,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let event = {
            let mut state = self.lock()?;
            let record = state.record_mut(challenge_id)?;
            check_join(
                &record.challenge,
                record.participant(participant),
                participant,
                stake,
                now,
            )?;
            record.enroll(participant, stake, now);
            let event = LedgerEvent::ParticipantJoined {
                challenge_id,
                participant: participant.clone(),
                stake,
            };
            state.log.push(event.clone());
            event
        };
        tracing::info!(%challenge_id, %participant, "participant joined");
        self.publish(&event);
        Ok(())
    }

    fn mark_complete(
        &self,
        challenge_id: ChallengeId,
        participant: &Identity,
        metadata: CompletionMetadata,
    ) -> Result<CompletionEvent, LedgerError> {
        let completion = {
            let mut state = self.lock()?;
            let record = state.record_mut(challenge_id)?;
            let used = record
                .used_activities
                .contains(&metadata.source_activity_id);
            check_complete(
                &record.challenge,
                record.participant(participant),
                participant,
                &metadata,
                used,
            )?;
            let slot = record
                .index
                .get(participant)
                .copied()
                .ok_or_else(|| LedgerError::NotJoined {
                    challenge: challenge_id,
                    participant: participant.clone(),
                })?;
            let completion = CompletionEvent {
                challenge_id,
                participant_identity: record.participants[slot].identity.clone(),
                completion_timestamp: metadata.completed_at,
                distance: metadata.distance_m,
                duration: metadata.duration_s,
                source_activity_id: metadata.source_activity_id.clone(),
            };
            record
                .used_activities
                .insert(metadata.source_activity_id.clone());
            record.participants[slot].completion = Some(metadata);
            state.log.push(LedgerEvent::TaskCompleted(completion.clone()));
            completion
        };
        tracing::info!(
            %challenge_id,
            %participant,
            activity_id = %completion.source_activity_id,
            "participant marked complete"
        );
        self.publish(&LedgerEvent::TaskCompleted(completion.clone()));
        Ok(completion)
    }

    fn finalize(
        &self,
        challenge_id: ChallengeId,
        now: Timestamp,
    ) -> Result<FinalizationSummary, LedgerError> {
        let (summary, event) = {
            let mut state = self.lock()?;
            let record = state.record_mut(challenge_id)?;
            check_finalize(&record.challenge, now)?;
            record.challenge.finalized = true;
            let completed: Vec<Identity> = record
                .participants
                .iter()
                .filter(|p| p.has_completed())
                .map(|p| p.identity.clone())
                .collect();
            let summary = FinalizationSummary {
                challenge_id,
                finalized_at: now,
                participant_count: record.challenge.participant_count,
                total_staked: record.challenge.total_staked,
                completed,
            };
            let event = LedgerEvent::ChallengeFinalized {
                challenge_id,
                completed: summary.completed.len() as u32,
                total_staked: summary.total_staked,
            };
            state.log.push(event.clone());
            (summary, event)
        };
        tracing::info!(
            %challenge_id,
            completed = summary.completed.len(),
            participants = summary.participant_count,
            "challenge finalized"
        );
        self.publish(&event);
        Ok(summary)
    }

    fn challenge(&self, challenge_id: ChallengeId) -> Result<Challenge, LedgerError> {
        Ok(self.lock()?.record(challenge_id)?.challenge.clone())
    }

    fn participant(
        &self,
        challenge_id: ChallengeId,
        participant: &Identity,
    ) -> Result<Option<Participant>, LedgerError> {
        Ok(self
            .lock()?
            .record(challenge_id)?
            .participant(participant)
            .cloned())
    }
}
