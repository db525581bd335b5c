//! Match state and the innings/match lifecycle

use serde::{Serialize, Deserialize};
use tracing::{debug, info};
use crate::config::{MatchConfig, MatchSetup};
use crate::error::{ScorebookError, SequenceError, StateError};
use crate::event::{InningsEndReason, MatchEvent};
use crate::ledger::{BallOutcome, Team};
use crate::result::{compute_result, MatchResult};
use crate::scoring::{DeliverySelection, ScoringEngine};
use crate::toss::{TossOutcome, TossState};
use crate::traits::CoinSource;
use crate::types::{BatOrBowl, BattingOrder, CoinFace, DeliveryType, Innings, MatchPhase, TeamId};

/// Aggregate root for one match
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchState {
    setup: MatchSetup,
    team1: Team,
    team2: Team,
    toss: TossState,
    current_innings: Innings,
    match_ended: bool,
    result: Option<MatchResult>,
}

impl MatchState {
    /// Fresh state for a validated setup
    pub fn new(setup: MatchSetup) -> Self {
        Self {
            team1: Team::new(setup.team_name(TeamId::Team1)),
            team2: Team::new(setup.team_name(TeamId::Team2)),
            setup,
            toss: TossState::new(),
            current_innings: Innings::First,
            match_ended: false,
            result: None,
        }
    }

    /// Validated setup the match was configured with
    pub fn setup(&self) -> &MatchSetup {
        &self.setup
    }

    /// Ledger for one side
    pub fn team(&self, team: TeamId) -> &Team {
        match team {
            TeamId::Team1 => &self.team1,
            TeamId::Team2 => &self.team2,
        }
    }

    pub(crate) fn team_mut(&mut self, team: TeamId) -> &mut Team {
        match team {
            TeamId::Team1 => &mut self.team1,
            TeamId::Team2 => &mut self.team2,
        }
    }

    /// Toss caller, outcome and choice
    pub fn toss(&self) -> &TossState {
        &self.toss
    }

    /// Innings currently in play
    pub fn current_innings(&self) -> Innings {
        self.current_innings
    }

    /// Whether the match has a result
    pub fn match_ended(&self) -> bool {
        self.match_ended
    }

    /// Stored once the match completes
    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    /// Order fixed by the toss winner, if chosen yet
    pub fn batting_order(&self) -> Option<BattingOrder> {
        self.toss.batting_order()
    }

    /// Side batting in the current innings
    pub fn batting_team_id(&self) -> Option<TeamId> {
        self.batting_order().map(|order| order.batting_in(self.current_innings))
    }

    /// Side bowling in the current innings
    pub fn bowling_team_id(&self) -> Option<TeamId> {
        self.batting_order().map(|order| order.bowling_in(self.current_innings))
    }

    /// Ledger of the side batting now
    pub fn batting_team(&self) -> Option<&Team> {
        self.batting_team_id().map(|team| self.team(team))
    }

    /// Ledger of the side bowling now
    pub fn bowling_team(&self) -> Option<&Team> {
        self.bowling_team_id().map(|team| self.team(team))
    }

    /// Runs the chasing side needs, only during the second innings
    pub fn target(&self) -> Option<u32> {
        match self.current_innings {
            Innings::First => None,
            Innings::Second => self.bowling_team().map(|defender| defender.runs() + 1),
        }
    }

    /// Why the current innings is over, if it is
    pub fn innings_end_reason(&self) -> Option<InningsEndReason> {
        let batting = self.batting_team()?;
        if batting.wickets() >= self.setup.max_wickets() {
            Some(InningsEndReason::AllOut)
        } else if batting.legal_balls() >= self.setup.total_balls() {
            Some(InningsEndReason::OversComplete)
        } else {
            None
        }
    }

    /// Chasing side has passed the defending total
    pub fn chase_complete(&self) -> bool {
        if self.current_innings != Innings::Second {
            return false;
        }
        match (self.batting_team(), self.bowling_team()) {
            (Some(chaser), Some(defender)) => chaser.runs() > defender.runs(),
            _ => false,
        }
    }

    /// Pure function of both ledgers; `None` until the batting order is known
    pub fn compute_result(&self) -> Option<MatchResult> {
        let order = self.batting_order()?;
        Some(compute_result(
            (order.batting_first, self.team(order.batting_first)),
            (order.bowling_first, self.team(order.bowling_first)),
            self.setup.max_wickets(),
        ))
    }

    /// Check the ledger invariants for both sides
    pub fn validate(&self) -> Result<(), StateError> {
        for team in [&self.team1, &self.team2] {
            let violation = if team.extras() > team.runs() {
                Some(format!("extras {} exceed runs {}", team.extras(), team.runs()))
            } else if team.wickets() > self.setup.max_wickets() {
                Some(format!(
                    "wickets {} exceed maximum {}",
                    team.wickets(),
                    self.setup.max_wickets()
                ))
            } else if team.legal_balls() > self.setup.total_balls() {
                Some(format!(
                    "legal balls {} exceed innings length {}",
                    team.legal_balls(),
                    self.setup.total_balls()
                ))
            } else {
                None
            };

            if let Some(reason) = violation {
                return Err(StateError::InvariantViolated {
                    team: team.name().to_string(),
                    reason,
                });
            }
        }
        Ok(())
    }
}

/// What `end_innings` led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InningsTransition {
    SecondInningsStarted { batting: TeamId, target: u32 },
    MatchCompleted(MatchResult),
}

/// Drives a match through toss, two innings and the result
#[derive(Debug, Clone, Default)]
pub struct MatchController {
    state: Option<MatchState>,
    phase: MatchPhase,
    selection: DeliverySelection,
    engine: ScoringEngine,
    events: Vec<MatchEvent>,
}

impl MatchController {
    /// Controller awaiting setup
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// `None` until the match has been configured
    pub fn state(&self) -> Option<&MatchState> {
        self.state.as_ref()
    }

    /// Inputs armed for the next delivery
    pub fn selection(&self) -> &DeliverySelection {
        &self.selection
    }

    /// Deliveries can be recorded
    pub fn recording_enabled(&self) -> bool {
        self.phase == MatchPhase::InPlay
    }

    #[cfg(test)]
    pub(crate) fn state_mut_for_tests(&mut self) -> Option<&mut MatchState> {
        self.state.as_mut()
    }

    /// Take the events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    fn expect_phase(&self, intent: &'static str, allowed: &[MatchPhase]) -> Result<(), SequenceError> {
        if allowed.contains(&self.phase) {
            return Ok(());
        }
        if self.phase == MatchPhase::Completed {
            return Err(SequenceError::MatchEnded);
        }
        Err(SequenceError::OutOfOrder {
            intent,
            phase: self.phase,
        })
    }

    /// Gate for anything that arms or records a delivery
    fn expect_recording(&self, intent: &'static str) -> Result<(), SequenceError> {
        match self.phase {
            MatchPhase::InPlay => Ok(()),
            MatchPhase::InningsOver => Err(SequenceError::InningsOver {
                batting: self
                    .state
                    .as_ref()
                    .and_then(|state| state.batting_team())
                    .map(|team| team.name().to_string())
                    .unwrap_or_default(),
            }),
            MatchPhase::Completed => Err(SequenceError::MatchEnded),
            phase => Err(SequenceError::OutOfOrder { intent, phase }),
        }
    }

    fn state_mut(&mut self, intent: &'static str) -> Result<&mut MatchState, SequenceError> {
        let phase = self.phase;
        self.state
            .as_mut()
            .ok_or(SequenceError::OutOfOrder { intent, phase })
    }

    /// Validate the setup and start the toss
    pub fn configure_match(&mut self, config: &MatchConfig) -> Result<&MatchSetup, ScorebookError> {
        self.expect_phase("configure the match", &[MatchPhase::AwaitingSetup])?;
        let setup = config.validate()?;

        info!(
            team1 = setup.team_name(TeamId::Team1),
            team2 = setup.team_name(TeamId::Team2),
            overs = setup.overs_per_innings(),
            "match configured"
        );
        self.events.push(MatchEvent::Configured {
            team1: setup.team_name(TeamId::Team1).to_string(),
            team2: setup.team_name(TeamId::Team2).to_string(),
            overs_per_innings: setup.overs_per_innings(),
            players_per_team: setup.players_per_team(),
        });
        self.phase = MatchPhase::AwaitingTossCaller;
        let state = self.state.insert(MatchState::new(setup));
        Ok(&state.setup)
    }

    pub fn select_toss_caller(&mut self, team: TeamId) -> Result<(), ScorebookError> {
        self.expect_phase(
            "select the toss caller",
            &[MatchPhase::AwaitingTossCaller, MatchPhase::AwaitingTossCall],
        )?;
        self.state_mut("select the toss caller")?
            .toss
            .select_calling_team(team)?;

        self.phase = MatchPhase::AwaitingTossCall;
        self.events.push(MatchEvent::TossCallerSelected { team });
        Ok(())
    }

    /// Fix the call and flip. The outcome is final before any reveal.
    pub fn call_toss(&mut self, call: CoinFace, coin: &mut dyn CoinSource) -> Result<TossOutcome, ScorebookError> {
        if self.phase == MatchPhase::AwaitingTossCaller {
            return Err(SequenceError::TossCallerNotSelected.into());
        }
        self.expect_phase("call the toss", &[MatchPhase::AwaitingTossCall])?;
        let outcome = self.state_mut("call the toss")?.toss.make_call(call, coin)?;

        info!(
            call = %outcome.call,
            result = %outcome.result,
            winner = %outcome.winner,
            "toss resolved"
        );
        self.phase = MatchPhase::RevealingToss;
        self.events.push(MatchEvent::TossResolved { outcome });
        Ok(outcome)
    }

    /// The view finished presenting the toss
    pub fn acknowledge_toss_reveal(&mut self) -> Result<(), ScorebookError> {
        self.expect_phase("acknowledge the toss", &[MatchPhase::RevealingToss])?;
        self.phase = MatchPhase::AwaitingBatOrBowl;
        self.events.push(MatchEvent::TossRevealAcknowledged);
        Ok(())
    }

    /// Toss winner elects to bat or bowl; play begins
    pub fn choose_bat_or_bowl(&mut self, choice: BatOrBowl) -> Result<BattingOrder, ScorebookError> {
        self.expect_phase("choose to bat or bowl", &[MatchPhase::AwaitingBatOrBowl])?;
        let order = self.state_mut("choose to bat or bowl")?.toss.choose(choice)?;

        info!(batting_first = %order.batting_first, "batting order decided");
        self.phase = MatchPhase::InPlay;
        self.selection.reset();
        self.events.push(MatchEvent::BattingOrderDecided { order });
        Ok(order)
    }

    pub fn select_runs(&mut self, runs: u8) -> Result<(), ScorebookError> {
        self.expect_recording("select runs")?;
        self.selection.select_runs(runs)?;
        self.push_selection();
        Ok(())
    }

    pub fn select_delivery_type(&mut self, delivery_type: DeliveryType) -> Result<(), ScorebookError> {
        self.expect_recording("select the delivery type")?;
        self.selection.select_delivery_type(delivery_type);
        self.push_selection();
        Ok(())
    }

    /// Returns the new wicket flag
    pub fn toggle_wicket(&mut self) -> Result<bool, ScorebookError> {
        self.expect_recording("toggle the wicket")?;
        let wicket = self.selection.toggle_wicket();
        self.push_selection();
        Ok(wicket)
    }

    fn push_selection(&mut self) {
        self.events.push(MatchEvent::SelectionChanged {
            selection: self.selection,
        });
    }

    /// Record the armed delivery against the batting side, then run the
    /// match-end and innings-end checks.
    pub fn record_delivery(&mut self) -> Result<BallOutcome, ScorebookError> {
        self.expect_recording("record a delivery")?;
        let selection = self.selection;
        let engine = self.engine;

        let state = self.state_mut("record a delivery")?;
        let batting_id = state.batting_team_id().ok_or(SequenceError::OutOfOrder {
            intent: "record a delivery",
            phase: MatchPhase::AwaitingBatOrBowl,
        })?;

        let before = state.team(batting_id).clone();
        let outcome = engine.record_selection(state.team_mut(batting_id), &selection)?;
        if let Err(e) = state.validate() {
            *state.team_mut(batting_id) = before;
            return Err(e.into());
        }

        self.selection.reset();
        self.events.push(MatchEvent::DeliveryRecorded {
            team: batting_id,
            outcome,
        });

        if !self.check_match_end() {
            self.check_innings_end();
        }
        Ok(outcome)
    }

    /// Disable recording once the batting side is all out or out of balls
    pub fn check_innings_end(&mut self) -> Option<InningsEndReason> {
        let state = self.state.as_ref()?;
        let reason = state.innings_end_reason()?;

        if self.phase == MatchPhase::InPlay {
            let innings = state.current_innings();
            let team = state.batting_team_id()?;
            debug!(%team, %reason, "innings over");
            self.phase = MatchPhase::InningsOver;
            self.events.push(MatchEvent::InningsOver { innings, team, reason });
        }
        Some(reason)
    }

    /// End the match early once the chase is complete. Second innings only.
    pub fn check_match_end(&mut self) -> bool {
        let chase_complete = self
            .state
            .as_ref()
            .map(MatchState::chase_complete)
            .unwrap_or(false);

        if chase_complete && self.phase != MatchPhase::Completed {
            self.finish_match();
        }
        chase_complete
    }

    /// Close the current innings: swap sides after the first, decide the
    /// match after the second.
    pub fn end_innings(&mut self) -> Result<InningsTransition, ScorebookError> {
        self.expect_phase("end the innings", &[MatchPhase::InPlay, MatchPhase::InningsOver])?;
        let declared = self.phase == MatchPhase::InPlay;
        let state = self.state_mut("end the innings")?;
        let batting_id = state.batting_team_id().ok_or(SequenceError::OutOfOrder {
            intent: "end the innings",
            phase: MatchPhase::AwaitingBatOrBowl,
        })?;
        let innings = state.current_innings();

        if declared {
            self.events.push(MatchEvent::InningsOver {
                innings,
                team: batting_id,
                reason: InningsEndReason::Declared,
            });
        }

        match innings {
            Innings::First => {
                let state = self.state_mut("end the innings")?;
                state.current_innings = Innings::Second;
                let batting = batting_id.other();
                let target = state.target().unwrap_or(1);

                info!(%batting, target, "second innings starts");
                self.phase = MatchPhase::InPlay;
                self.selection.reset();
                self.events.push(MatchEvent::InningsChanged { batting, target });
                Ok(InningsTransition::SecondInningsStarted { batting, target })
            }
            Innings::Second => {
                let result = self.finish_match();
                Ok(InningsTransition::MatchCompleted(result))
            }
        }
    }

    fn finish_match(&mut self) -> MatchResult {
        let result = self
            .state
            .as_ref()
            .and_then(MatchState::compute_result)
            .unwrap_or(MatchResult::Tied);

        if let Some(state) = self.state.as_mut() {
            state.match_ended = true;
            state.result = Some(result.clone());
        }
        info!(result = %result, "match completed");
        self.phase = MatchPhase::Completed;
        self.selection.reset();
        self.events.push(MatchEvent::MatchCompleted {
            result: result.clone(),
        });
        result
    }

    /// Result over the current ledgers, without ending anything
    pub fn compute_result(&self) -> Option<MatchResult> {
        self.state.as_ref().and_then(MatchState::compute_result)
    }

    /// Discard the whole match and return to setup
    pub fn reset_match(&mut self) {
        info!("match reset");
        *self = Self::default();
        self.events.push(MatchEvent::MatchReset);
    }
}
