//! Session and replay tests
//!
//! These tests verify:
//! - Rejected intents leave the state fingerprint unchanged
//! - Observers see every accepted event in order
//! - Replaying the same intent log reproduces the same match

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use scorebook::{
    BatOrBowl, CoinFace, DeliveryType, FixedCoin, Intent, JsonSerializer, LogLevel, MatchConfig,
    MatchContext, MatchEvent, MatchObserver, MatchPhase, MatchSession, ReplayEngine, SessionOptions,
    StateSerializer, TeamId,
};
use std::sync::{Arc, Mutex};

// ============================================================================
// Helpers
// ============================================================================

#[derive(Clone, Default)]
struct Recorder {
    events: Arc<Mutex<Vec<MatchEvent>>>,
}

impl MatchObserver for Recorder {
    fn on_event(&mut self, event: &MatchEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn kickoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap()
}

fn session(options: SessionOptions) -> MatchSession {
    let context = MatchContext::builder()
        .with_fixed_time(kickoff())
        .with_coin(FixedCoin(CoinFace::Heads))
        .build();
    MatchSession::with_context(options, context)
}

fn opening() -> Vec<Intent> {
    Intent::opening(
        MatchConfig::new("Lions", "Tigers", 1),
        TeamId::Team1,
        CoinFace::Heads,
        BatOrBowl::Bat,
    )
}

fn arbitrary_intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        6 => (0u8..=6).prop_map(|runs| Intent::SelectRuns { runs }),
        1 => Just(Intent::SelectDeliveryType { delivery_type: DeliveryType::Wide }),
        1 => Just(Intent::SelectDeliveryType { delivery_type: DeliveryType::NoBall }),
        1 => Just(Intent::ToggleWicket),
        6 => Just(Intent::RecordDelivery),
        1 => Just(Intent::EndInnings),
        1 => Just(Intent::AcknowledgeTossReveal),
    ]
}

// ============================================================================
// Session behaviour
// ============================================================================

#[test]
fn test_out_of_order_intents_leave_state_unchanged() {
    let mut session = session(SessionOptions::default());
    session.apply_all(&opening()).unwrap();
    let before = session.current_hash().unwrap();

    for intent in [
        Intent::AcknowledgeTossReveal,
        Intent::CallToss { call: CoinFace::Tails },
        Intent::ChooseBatOrBowl { choice: BatOrBowl::Bowl },
        Intent::ConfigureMatch { config: MatchConfig::new("A", "B", 3) },
        Intent::RecordDelivery,
    ] {
        assert!(session.apply(&intent).is_err(), "{} should be rejected", intent.name());
        assert_eq!(session.current_hash().unwrap(), before);
    }
    assert_eq!(session.trace().intents_rejected, 5);
}

#[test]
fn test_observers_receive_events_in_order() {
    let recorder = Recorder::default();
    let mut session = session(SessionOptions::default());
    session.subscribe(recorder.clone());

    session.apply_all(&opening()).unwrap();
    session
        .apply_all(&Intent::delivery(4, DeliveryType::Normal, false))
        .unwrap();

    let events = recorder.events.lock().unwrap();
    assert!(matches!(events[0], MatchEvent::Configured { .. }));
    assert!(matches!(events[2], MatchEvent::TossResolved { .. }));
    assert!(matches!(
        events.last(),
        Some(MatchEvent::DeliveryRecorded { team: TeamId::Team1, .. })
    ));
}

#[test]
fn test_snapshot_tracks_recent_deliveries() {
    let options = SessionOptions::builder().with_history_window(3).build();
    let mut session = session(options);
    session.apply_all(&opening()).unwrap();

    for (runs, delivery_type) in [
        (1, DeliveryType::Normal),
        (0, DeliveryType::Wide),
        (4, DeliveryType::Normal),
        (6, DeliveryType::Normal),
    ] {
        session
            .apply_all(&Intent::delivery(runs, delivery_type, false))
            .unwrap();
    }

    let snapshot = session.snapshot();
    let labels: Vec<_> = snapshot.recent_deliveries.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Wd", "4", "6"]);
    assert_eq!(snapshot.innings_label, Some("First Innings"));
    assert_eq!(snapshot.teams[0].score, "12/0");
    assert_eq!(snapshot.teams[0].remaining_balls, Some(3));
    assert!(snapshot.target.is_none());
    assert!((snapshot.progress - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_completed_snapshot_has_summary() {
    let mut session = session(SessionOptions::default());
    session.apply_all(&opening()).unwrap();
    session.apply_all(&Intent::delivery(2, DeliveryType::Normal, false)).unwrap();
    session.apply(&Intent::EndInnings).unwrap();
    session.apply_all(&Intent::delivery(6, DeliveryType::Normal, false)).unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, MatchPhase::Completed);
    assert_eq!(snapshot.result_text.as_deref(), Some("Tigers won by 10 wickets!"));
    assert_eq!(
        snapshot.summary,
        vec!["Lions: 2/0 (0.1 overs)".to_string(), "Tigers: 6/0 (0.1 overs)".to_string()]
    );
}

#[test]
fn test_log_is_reproducible_under_fixed_clock() {
    let options = SessionOptions::builder().with_log_level(LogLevel::Debug).build();
    let mut first = session(options.clone());
    let mut second = session(options);

    for s in [&mut first, &mut second] {
        s.apply_all(&opening()).unwrap();
        s.apply_all(&Intent::delivery(1, DeliveryType::NoBall, false)).unwrap();
    }

    assert_eq!(first.log().entries(), second.log().entries());
    assert!(!first.log().filter_by_intent("select_runs").is_empty());
    assert!(first.log().entries().iter().all(|e| e.timestamp == kickoff()));
}

// ============================================================================
// Replay
// ============================================================================

#[test]
fn test_json_intent_log_replays_to_same_state() {
    let mut intents = opening();
    intents.extend(Intent::delivery(4, DeliveryType::NoBall, true));
    intents.extend(Intent::delivery(0, DeliveryType::Wide, false));

    let engine = ReplayEngine::builder().with_seed(7).with_start_time(kickoff()).build();
    let direct = engine.replay(&intents).unwrap();

    let serializer = JsonSerializer::new();
    let bytes = serializer.serialize(&intents).unwrap();
    let decoded: Vec<Intent> = serializer.deserialize(&bytes).unwrap();
    let replayed = engine.replay(&decoded).unwrap();

    assert_eq!(direct.final_hash, replayed.final_hash);
    assert_eq!(direct.trace.chain_hash, replayed.trace.chain_hash);
    let lions = replayed.final_state.as_ref().unwrap().team(TeamId::Team1);
    assert_eq!((lions.runs(), lions.wickets(), lions.extras()), (6, 1, 2));
    assert!(replayed.snapshot_json().unwrap().contains("\"recording_enabled\":true"));
}

#[test]
fn test_replays_ending_in_different_phases_do_not_verify() {
    let intents = opening();
    let engine = ReplayEngine::builder().with_seed(1).build();

    let revealing = engine.replay(&intents[..3]).unwrap();
    let acknowledged = engine.replay(&intents[..4]).unwrap();

    assert_eq!(revealing.snapshot.phase, MatchPhase::RevealingToss);
    assert_eq!(acknowledged.snapshot.phase, MatchPhase::AwaitingBatOrBowl);
    assert_ne!(revealing.final_hash, acknowledged.final_hash);
    assert!(!engine.verify(&intents[..4], &revealing.final_hash).unwrap());

    let mut armed = intents.clone();
    armed.push(Intent::SelectRuns { runs: 6 });
    armed.push(Intent::ToggleWicket);
    let unarmed = engine.replay(&intents).unwrap();
    assert!(!engine.verify(&armed, &unarmed.final_hash).unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// **Feature: cricket-scorebook, Property 9: Replay Determinism**
    ///
    /// Replaying any intent log twice under the same seed yields identical
    /// states, hashes, traces and rejections.
    #[test]
    fn property_replay_determinism(
        seed in any::<u64>(),
        tail in prop::collection::vec(arbitrary_intent(), 0..80)
    ) {
        let mut intents = opening();
        intents.extend(tail);

        let engine = ReplayEngine::builder().with_seed(seed).build();
        let first = engine.replay(&intents).unwrap();
        let second = engine.replay(&intents).unwrap();

        prop_assert_eq!(&first.final_state, &second.final_state);
        prop_assert_eq!(&first.final_hash, &second.final_hash);
        prop_assert_eq!(&first.trace.chain_hash, &second.trace.chain_hash);
        prop_assert_eq!(first.rejections.len(), second.rejections.len());
        prop_assert_eq!(
            first.trace.intents_accepted + first.trace.intents_rejected,
            intents.len()
        );
        prop_assert!(engine.verify(&intents, &first.final_hash).unwrap());
    }

    /// **Feature: cricket-scorebook, Property 10: Rejections Are Side-Effect Free**
    #[test]
    fn property_rejections_do_not_move_the_hash(
        tail in prop::collection::vec(arbitrary_intent(), 0..60)
    ) {
        let mut session = session(SessionOptions::default());
        session.apply_all(&opening()).unwrap();

        for intent in &tail {
            let before = session.current_hash().unwrap();
            if session.apply(intent).is_err() {
                prop_assert_eq!(session.current_hash().unwrap(), before);
            }
        }
        if let Some(state) = session.state() {
            prop_assert!(state.validate().is_ok());
        }
    }
}
