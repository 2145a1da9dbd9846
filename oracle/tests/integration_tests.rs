//! End-to-end flows through the oracle service against a nullable ledger.

use std::sync::Arc;
use std::thread;

use fitstake_activity::ActivityPayload;
use fitstake_ledger::{ChallengeLedger, ChallengeTerms, LedgerEvent, ParticipantPhase};
use fitstake_nullables::{NullClock, NullLedger};
use fitstake_oracle::{OracleConfig, OracleService};
use fitstake_types::{ActivityType, ChallengeId, ErrorKind, Identity, StakeAmount, Timestamp};
use fitstake_verification::{ChallengeCriteria, FailureCode, Stage};
use serde_json::{json, Value};

const T0: u64 = 1_709_251_200; // 2024-03-01T00:00:00Z
const DAY: u64 = 86_400;

struct Harness {
    service: OracleService<NullLedger, NullClock>,
    challenge: ChallengeId,
    oracle: Identity,
    runner: Identity,
    stake: StakeAmount,
}

fn harness() -> Harness {
    let config = OracleConfig::from_toml_str(
        r#"
scope = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
oracle_identity = "0xF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266"
"#,
    )
    .unwrap();
    let service =
        OracleService::with_clock(&config, NullLedger::new(), NullClock::new(T0 - DAY)).unwrap();
    let stake = StakeAmount::new(10_000_000_000_000_000);
    let creator = Identity::new("0xCreator");
    let terms = ChallengeTerms {
        description: "Run 5km within a week".into(),
        target_distance_m: 5000,
        start_time: Timestamp::new(T0),
        end_time: Timestamp::new(T0 + 7 * DAY),
        activity_type: ActivityType::run(),
    };
    let challenge = service.create_challenge(&creator, terms, stake).unwrap();
    let runner = Identity::new("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
    service.join(challenge, &runner, stake).unwrap();
    Harness {
        service,
        challenge,
        oracle: Identity::new("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
        runner,
        stake,
    }
}

fn activity(id: u64, kind: &str, distance: f64, start: u64) -> ActivityPayload {
    ActivityPayload::from_value(json!({
        "id": id,
        "name": "Morning Run",
        "type": kind,
        "distance": distance,
        "moving_time": 1800,
        "elapsed_time": 1900,
        "start_date": start,
    }))
    .unwrap()
}

fn criteria(h: &Harness) -> ChallengeCriteria {
    h.service.criteria_for(h.challenge).unwrap()
}

#[test]
fn scenario_a_qualifying_run_passes() {
    let h = harness();
    let decision = h
        .service
        .verify(&activity(1, "Run", 5200.0, T0 + DAY), &criteria(&h))
        .unwrap();
    assert!(decision.success());
    assert!(decision.reason().is_empty());
    assert!(decision.stages().all_passed());
}

#[test]
fn scenario_b_short_run_names_both_distances() {
    let h = harness();
    let decision = h
        .service
        .verify(&activity(2, "Run", 3000.0, T0 + DAY), &criteria(&h))
        .unwrap();
    assert!(!decision.success());
    assert!(decision.reason().contains("3000"), "{}", decision.reason());
    assert!(decision.reason().contains("5000"), "{}", decision.reason());
    assert_eq!(decision.failed_stage(), Some(Stage::Distance));
}

#[test]
fn scenario_c_walk_names_both_types() {
    let h = harness();
    let decision = h
        .service
        .verify(&activity(3, "Walk", 6000.0, T0 + DAY), &criteria(&h))
        .unwrap();
    assert!(!decision.success());
    assert!(decision.reason().contains("Walk"));
    assert!(decision.reason().contains("Run"));
    assert_eq!(decision.failure(), Some(FailureCode::WrongType));
}

#[test]
fn scenario_d_run_before_window_is_too_early() {
    let h = harness();
    let decision = h
        .service
        .verify(&activity(4, "Run", 6000.0, T0 - DAY), &criteria(&h))
        .unwrap();
    assert!(!decision.success());
    assert_eq!(decision.failure(), Some(FailureCode::TooEarly));
    assert!(decision.reason().starts_with("too_early"));
}

#[test]
fn scenario_e_non_oracle_cannot_complete() {
    let h = harness();
    let err = h
        .service
        .verify_and_complete(
            &Identity::new("0xmallory"),
            &h.runner,
            &activity(5, "Run", 5200.0, T0 + DAY),
            &criteria(&h),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnauthorizedOracle);
    assert_eq!(
        h.service
            .ledger()
            .participant_phase(h.challenge, &h.runner)
            .unwrap(),
        ParticipantPhase::Joined
    );
    assert_eq!(h.service.ledger().mark_complete_calls(), 0);
}

#[test]
fn wrong_type_reported_before_short_distance() {
    let h = harness();
    let decision = h
        .service
        .verify(&activity(6, "Walk", 100.0, T0 + DAY), &criteria(&h))
        .unwrap();
    assert_eq!(decision.failed_stage(), Some(Stage::ActivityType));
    assert!(!decision.stages().distance);
}

#[test]
fn exact_target_at_end_of_window_passes() {
    let h = harness();
    let decision = h
        .service
        .verify(&activity(7, "Run", 5000.0, T0 + 7 * DAY), &criteria(&h))
        .unwrap();
    assert!(decision.success(), "{}", decision.reason());
}

#[test]
fn incomplete_activity_lists_issues() {
    let h = harness();
    let payload = ActivityPayload::from_value(json!({ "id": 8, "type": "Run" })).unwrap();
    let decision = h.service.verify(&payload, &criteria(&h)).unwrap();
    assert_eq!(decision.failure(), Some(FailureCode::Incomplete));
    assert!(decision.reason().contains("missing distance"));
    assert!(!decision.stages().completeness);
}

#[test]
fn completion_is_idempotent() {
    let h = harness();
    let run = activity(9, "Run", 5200.0, T0 + DAY);
    let event = h
        .service
        .verify_and_complete(&h.oracle, &h.runner, &run, &criteria(&h))
        .unwrap();
    assert_eq!(event.challenge_id, h.challenge);
    assert_eq!(event.distance, 5200.0);

    let err = h
        .service
        .verify_and_complete(&h.oracle, &h.runner, &run, &criteria(&h))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyCompleted);
    assert!(err.is_success_equivalent());

    let completions: Vec<_> = h
        .service
        .ledger()
        .events()
        .unwrap()
        .into_iter()
        .filter(|e| matches!(e, LedgerEvent::TaskCompleted(_)))
        .collect();
    assert_eq!(completions.len(), 1);
}

#[test]
fn concurrent_authorizations_have_one_winner() {
    let h = Arc::new(harness());
    let handles: Vec<_> = (0..2)
        .map(|i| {
            let h = Arc::clone(&h);
            thread::spawn(move || {
                let run = activity(100 + i, "Run", 5200.0, T0 + DAY);
                h.service
                    .verify_and_complete(&h.oracle, &h.runner, &run, &criteria(&h))
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|t| t.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let rejected: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].kind(), ErrorKind::AlreadyCompleted);
}

#[test]
fn same_activity_cannot_complete_two_participants() {
    let h = harness();
    let partner = Identity::new("0xpartner");
    h.service.join(h.challenge, &partner, h.stake).unwrap();
    let run = activity(10, "Run", 5200.0, T0 + DAY);
    h.service
        .verify_and_complete(&h.oracle, &h.runner, &run, &criteria(&h))
        .unwrap();
    let err = h
        .service
        .verify_and_complete(&h.oracle, &partner, &run, &criteria(&h))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateActivity);
}

#[test]
fn ledger_outage_is_retryable_and_changes_nothing() {
    let h = harness();
    let run = activity(11, "Run", 5200.0, T0 + DAY);
    let criteria = criteria(&h);
    h.service.ledger().fail_next(1);
    let err = h
        .service
        .verify_and_complete(&h.oracle, &h.runner, &run, &criteria)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LedgerUnavailable);
    assert!(err.is_retryable());

    h.service
        .verify_and_complete(&h.oracle, &h.runner, &run, &criteria)
        .unwrap();
}

#[test]
fn finalization_is_monotonic() {
    let h = harness();
    let run = activity(12, "Run", 5200.0, T0 + DAY);
    let criteria = criteria(&h);

    h.service.clock().set(T0 + 8 * DAY);
    let summary = h.service.finalize(h.challenge).unwrap();
    assert_eq!(summary.participant_count, 2);
    assert!(summary.completed.is_empty());

    let err = h
        .service
        .verify_and_complete(&h.oracle, &h.runner, &run, &criteria)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ChallengeFinalized);

    let late = h
        .service
        .join(h.challenge, &Identity::new("0xlate"), h.stake)
        .unwrap_err();
    assert_eq!(late.kind(), ErrorKind::ChallengeFinalized);
}

#[test]
fn decision_serializes_for_the_audit_trail() {
    let h = harness();
    let decision = h
        .service
        .verify(&activity(13, "Run", 3000.0, T0 + DAY), &criteria(&h))
        .unwrap();
    let value: Value = serde_json::to_value(&decision).unwrap();
    assert_eq!(value["success"], json!(false));
    assert_eq!(value["failed_stage"], json!("distance"));
    assert_eq!(value["stages"]["type"], json!(true));
}

#[test]
fn invalid_criteria_are_malformed_input_and_write_nothing() {
    let h = harness();
    let run = activity(20, "Run", 5200.0, T0 + DAY);

    let mut negative = criteria(&h);
    negative.target_distance = -5000.0;
    let mut inverted = criteria(&h);
    inverted.end_time = Timestamp::new(T0 - DAY);
    let mut crossed = criteria(&h).with_max_distance(4000.0);
    crossed.min_distance = Some(4500.0);

    for bad in [negative, inverted, crossed] {
        let err = h.service.verify(&run, &bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        let err = h
            .service
            .verify_and_complete(&h.oracle, &h.runner, &run, &bad)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(!err.is_retryable());
    }
    assert_eq!(h.service.ledger().mark_complete_calls(), 0);
}

#[test]
fn criteria_looser_than_the_ledger_are_refused() {
    let h = harness();
    let short = activity(21, "Run", 1000.0, T0 + DAY);

    let mut lower_target = criteria(&h);
    lower_target.target_distance = 500.0;
    let mut wider_window = criteria(&h);
    wider_window.start_time = Timestamp::new(T0 - 60 * DAY);
    let mut lower_minimum = criteria(&h);
    lower_minimum.min_distance = Some(500.0);
    let mut walk = criteria(&h);
    walk.required_activity_type = Some(ActivityType::new("Walk"));
    let looser_tolerance = criteria(&h).with_tolerance(4500.0);

    // Each activity passes the supplied criteria but not the ledger's.
    let cases = [
        (lower_target, short.clone()),
        (wider_window, activity(22, "Run", 5200.0, T0 - 30 * DAY)),
        (lower_minimum, short.clone()),
        (walk, activity(23, "Walk", 5200.0, T0 + DAY)),
        (looser_tolerance, short),
    ];
    for (loose, run) in cases {
        assert!(h.service.verify(&run, &loose).unwrap().success());
        let err = h
            .service
            .verify_and_complete(&h.oracle, &h.runner, &run, &loose)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CriteriaMismatch, "{err}");
        assert!(!err.is_retryable());
    }
    assert_eq!(h.service.ledger().mark_complete_calls(), 0);
    assert_eq!(
        h.service
            .ledger()
            .participant_phase(h.challenge, &h.runner)
            .unwrap(),
        ParticipantPhase::Joined
    );
}

#[test]
fn stricter_supplied_bounds_are_accepted() {
    let h = harness();
    let run = activity(24, "Run", 5200.0, T0 + DAY);
    let strict = criteria(&h).with_max_distance(6000.0).with_tolerance(0.0);
    let event = h
        .service
        .verify_and_complete(&h.oracle, &h.runner, &run, &strict)
        .unwrap();
    assert_eq!(event.challenge_id, h.challenge);
}
