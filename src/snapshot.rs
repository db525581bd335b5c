//! Read-only projection of a match for the view layer

use serde::Serialize;
use crate::controller::{MatchController, MatchState};
use crate::ledger::{BallClass, BallOutcome};
use crate::scoring::DeliverySelection;
use crate::types::{Innings, MatchPhase, TeamId};

/// One delivery as the over strip shows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BallView {
    pub label: String,
    pub class: BallClass,
}

impl From<&BallOutcome> for BallView {
    fn from(outcome: &BallOutcome) -> Self {
        Self {
            label: outcome.label(),
            class: outcome.class(),
        }
    }
}

/// Scoreboard card for one side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamCard {
    pub team: TeamId,
    pub name: String,
    pub score: String,
    pub runs: u32,
    pub wickets: u32,
    pub overs: String,
    pub legal_balls: u32,
    pub extras: u32,
    /// Only shown for the side currently batting
    pub remaining_balls: Option<u32>,
    pub batting: bool,
}

/// What the chasing side needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetView {
    pub runs: u32,
    pub balls_remaining: u32,
}

/// Everything a view needs to render the current screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub phase: MatchPhase,
    pub innings: Option<Innings>,
    pub innings_label: Option<&'static str>,
    pub teams: Vec<TeamCard>,
    pub target: Option<TargetView>,
    pub recent_deliveries: Vec<BallView>,
    /// Share of the batting side's legal balls used, in [0, 1]
    pub progress: f64,
    pub selection: DeliverySelection,
    pub recording_enabled: bool,
    pub result_text: Option<String>,
    pub summary: Vec<String>,
}

impl MatchSnapshot {
    /// Capture the controller's current state, showing the last `history_window` deliveries
    pub fn capture(controller: &MatchController, history_window: usize) -> Self {
        let mut snapshot = Self {
            phase: controller.phase(),
            innings: None,
            innings_label: None,
            teams: Vec::new(),
            target: None,
            recent_deliveries: Vec::new(),
            progress: 0.0,
            selection: *controller.selection(),
            recording_enabled: controller.recording_enabled(),
            result_text: None,
            summary: Vec::new(),
        };

        if let Some(state) = controller.state() {
            snapshot.fill_from(state, history_window);
        }
        snapshot
    }

    fn fill_from(&mut self, state: &MatchState, history_window: usize) {
        let setup = state.setup();
        let total_balls = setup.total_balls();
        let batting_id = state.batting_team_id();

        self.teams = [TeamId::Team1, TeamId::Team2]
            .into_iter()
            .map(|id| {
                let team = state.team(id);
                let batting = batting_id == Some(id);
                TeamCard {
                    team: id,
                    name: team.name().to_string(),
                    score: team.score_line(),
                    runs: team.runs(),
                    wickets: team.wickets(),
                    overs: team.overs(),
                    legal_balls: team.legal_balls(),
                    extras: team.extras(),
                    remaining_balls: batting.then(|| team.remaining_balls(total_balls)),
                    batting,
                }
            })
            .collect();

        if let Some(batting) = state.batting_team() {
            let innings = state.current_innings();
            self.innings = Some(innings);
            self.innings_label = Some(innings.label());
            self.progress = batting.progress(total_balls);
            self.recent_deliveries = batting
                .recent_deliveries(history_window)
                .iter()
                .map(BallView::from)
                .collect();
            self.target = state.target().map(|runs| TargetView {
                runs,
                balls_remaining: batting.remaining_balls(total_balls),
            });
        }

        if let Some(result) = state.result() {
            self.result_text = Some(result.to_string());
            self.summary = vec![
                state.team(TeamId::Team1).summary_line(),
                state.team(TeamId::Team2).summary_line(),
            ];
        }
    }
}
