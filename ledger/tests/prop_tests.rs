use proptest::prelude::*;

use fitstake_ledger::{
    ChallengeLedger, ChallengeTerms, CompletionEvent, CompletionMetadata, InMemoryLedger,
    LedgerError, LedgerEvent, ParticipantPhase,
};
use fitstake_types::{ActivityType, ChallengeId, Identity, StakeAmount, Timestamp};

fn terms() -> ChallengeTerms {
    ChallengeTerms {
        description: "weekly 5k".into(),
        target_distance_m: 5000,
        start_time: Timestamp::new(1_000),
        end_time: Timestamp::new(2_000),
        activity_type: ActivityType::run(),
    }
}

proptest! {
    /// Any sequence of completion attempts yields at most one completion
    /// event per participant, and every repeat is `AlreadyCompleted`.
    #[test]
    fn completion_at_most_once(attempts in prop::collection::vec((0usize..4, 0u32..6), 1..40)) {
        let ledger = InMemoryLedger::new();
        let stake = StakeAmount::new(50);
        let people: Vec<Identity> = (0..4).map(|i| Identity::new(format!("0xp{i}"))).collect();
        let id = ledger.create_challenge(&people[0], terms(), stake, Timestamp::new(0)).unwrap();
        for who in &people[1..] {
            ledger.join(id, who, stake, Timestamp::new(10)).unwrap();
        }

        let mut completed = [false; 4];
        for (who, activity) in attempts {
            let metadata = CompletionMetadata {
                completed_at: Timestamp::new(1_500),
                distance_m: 5000.0,
                duration_s: 1_800,
                source_activity_id: format!("{who}-{activity}"),
            };
            match ledger.mark_complete(id, &people[who], metadata) {
                Ok(_) => {
                    prop_assert!(!completed[who]);
                    completed[who] = true;
                }
                Err(LedgerError::AlreadyCompleted { .. }) => prop_assert!(completed[who]),
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }

        let events = ledger.events().unwrap();
        let completions = events
            .iter()
            .filter(|e| matches!(e, LedgerEvent::TaskCompleted(_)))
            .count();
        prop_assert_eq!(completions, completed.iter().filter(|c| **c).count());
        for (who, done) in completed.iter().enumerate() {
            let phase = ledger.participant_phase(id, &people[who]).unwrap();
            let expected = if *done {
                ParticipantPhase::Completed
            } else {
                ParticipantPhase::Joined
            };
            prop_assert_eq!(phase, expected);
        }
    }

    /// Finalization succeeds only strictly after the end time, and only once.
    #[test]
    fn finalize_after_end_only(at in 0u64..4_000) {
        let ledger = InMemoryLedger::new();
        let creator = Identity::new("0xc");
        let id = ledger
            .create_challenge(&creator, terms(), StakeAmount::new(1), Timestamp::new(0))
            .unwrap();
        let result = ledger.finalize(id, Timestamp::new(at));
        if at > 2_000 {
            prop_assert!(result.is_ok());
            let again = ledger.finalize(id, Timestamp::new(at));
            let finalized_twice = !matches!(again, Err(LedgerError::ChallengeFinalized(_)));
            prop_assert!(!finalized_twice);
        } else {
            prop_assert!(matches!(result, Err(LedgerError::NotYetEnded { .. })), "finalized early");
        }
    }

    /// Event ids ignore the case of the participant identity.
    #[test]
    fn event_id_case_insensitive(raw in "0x[0-9a-fA-F]{12}", challenge in 1u64..1_000) {
        let event = |who: String| CompletionEvent {
            challenge_id: ChallengeId::new(challenge),
            participant_identity: Identity::new(who),
            completion_timestamp: Timestamp::new(1),
            distance: 1.0,
            duration: 1,
            source_activity_id: "a".into(),
        };
        prop_assert_eq!(
            event(raw.to_ascii_uppercase()).event_id(),
            event(raw.to_ascii_lowercase()).event_id()
        );
    }
}
