//! Error reporting tests for configuration, sequencing and input

use proptest::prelude::*;
use scorebook::{
    ConfigurationError, InputError, Intent, MatchConfig, MatchController, MatchPhase, MatchSession,
    ScorebookError, SequenceError, TeamId,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Feature: cricket-scorebook, Property 11: Configuration Validation**
    ///
    /// Non-positive overs never configure a match and leave the phase untouched.
    #[test]
    fn property_non_positive_overs_rejected(overs in i64::MIN..=0) {
        let mut controller = MatchController::new();
        let result = controller.configure_match(&MatchConfig::new("Lions", "Tigers", overs));

        prop_assert_eq!(
            result.err(),
            Some(ScorebookError::Configuration(ConfigurationError::NonPositiveOvers { overs }))
        );
        prop_assert_eq!(controller.phase(), MatchPhase::AwaitingSetup);
    }

    /// **Feature: cricket-scorebook, Property 12: Blank Names Rejected**
    #[test]
    fn property_blank_names_rejected(blank in "[ \t]{0,5}") {
        let team1 = MatchConfig::new(blank.clone(), "Tigers", 5).validate();
        let team2 = MatchConfig::new("Lions", blank, 5).validate();

        prop_assert_eq!(team1.err(), Some(ConfigurationError::EmptyTeamName { team: TeamId::Team1 }));
        prop_assert_eq!(team2.err(), Some(ConfigurationError::EmptyTeamName { team: TeamId::Team2 }));
    }

    /// **Feature: cricket-scorebook, Property 13: Run Range**
    #[test]
    fn property_runs_out_of_range_rejected(runs in 7u8..) {
        let mut session = MatchSession::default();
        session.apply_all(&Intent::opening(
            MatchConfig::new("Lions", "Tigers", 2),
            TeamId::Team1,
            scorebook::CoinFace::Heads,
            scorebook::BatOrBowl::Bat,
        )).unwrap();

        let result = session.apply(&Intent::SelectRuns { runs });
        prop_assert_eq!(
            result.err(),
            Some(ScorebookError::Input(InputError::RunsOutOfRange { runs }))
        );
        prop_assert_eq!(session.controller().selection().runs, None);
    }
}

#[test]
fn test_error_messages_are_user_facing() {
    assert_eq!(
        ConfigurationError::EmptyTeamName { team: TeamId::Team1 }.to_string(),
        "Please enter Team 1 name"
    );
    assert_eq!(
        InputError::RunsNotSelected.to_string(),
        "Please select runs scored (0-6)"
    );
    assert_eq!(
        SequenceError::TossCallerNotSelected.to_string(),
        "Select which team calls the toss first"
    );

    let wrapped: ScorebookError = SequenceError::MatchEnded.into();
    assert_eq!(wrapped.to_string(), "Sequence error: The match has ended");
}

#[test]
fn test_players_out_of_range() {
    let config = MatchConfig::builder()
        .with_team1("Lions")
        .with_team2("Tigers")
        .with_overs(5)
        .with_players_per_team(12)
        .build();

    assert!(matches!(
        config.validate(),
        Err(ConfigurationError::PlayersOutOfRange { players: 12, .. })
    ));
}

#[test]
fn test_config_document_errors() {
    assert!(matches!(
        MatchConfig::from_json("{\"team1_name\": \"Lions\"}"),
        Err(ConfigurationError::InvalidDocument { .. })
    ));

    let config = MatchConfig::from_json(
        r#"{"team1_name": " Lions ", "team2_name": "Tigers", "overs_per_innings": 20}"#,
    )
    .unwrap();
    let setup = config.validate().unwrap();
    assert_eq!(setup.team_name(TeamId::Team1), "Lions");
    assert_eq!(setup.total_balls(), 120);
    assert_eq!(setup.max_wickets(), 10);
}

#[test]
fn test_huge_overs_rejected() {
    let result = MatchConfig::new("Lions", "Tigers", i64::from(u32::MAX)).validate();
    assert!(matches!(result, Err(ConfigurationError::OversTooLarge { .. })));
}

#[test]
fn test_intent_after_completion_reports_match_ended() {
    let mut session = MatchSession::default();
    session
        .apply_all(&Intent::opening(
            MatchConfig::new("Lions", "Tigers", 1),
            TeamId::Team1,
            scorebook::CoinFace::Heads,
            scorebook::BatOrBowl::Bat,
        ))
        .unwrap();
    session.apply(&Intent::EndInnings).unwrap();
    session.apply(&Intent::EndInnings).unwrap();

    assert_eq!(session.controller().phase(), MatchPhase::Completed);
    assert_eq!(
        session.apply(&Intent::SelectRuns { runs: 1 }).err(),
        Some(ScorebookError::Sequence(SequenceError::MatchEnded))
    );
    assert!(session.apply(&Intent::ResetMatch).is_ok());
    assert_eq!(session.controller().phase(), MatchPhase::AwaitingSetup);
}
