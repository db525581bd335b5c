//! Toss resolution

use serde::{Serialize, Deserialize};
use crate::error::SequenceError;
use crate::traits::CoinSource;
use crate::types::{BatOrBowl, BattingOrder, CoinFace, MatchPhase, TeamId};

/// The caller wins iff the call matches the coin
pub fn toss_winner(calling_team: TeamId, call: CoinFace, result: CoinFace) -> TeamId {
    if call == result {
        calling_team
    } else {
        calling_team.other()
    }
}

/// A resolved toss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TossOutcome {
    pub calling_team: TeamId,
    pub call: CoinFace,
    pub result: CoinFace,
    pub winner: TeamId,
}

/// Toss progress, filled in step by step and frozen once the winner chooses
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TossState {
    calling_team: Option<TeamId>,
    outcome: Option<TossOutcome>,
    choice: Option<BatOrBowl>,
}

impl TossState {
    /// Toss with nothing decided
    pub fn new() -> Self {
        Self::default()
    }

    /// Side calling the toss, once selected
    pub fn calling_team(&self) -> Option<TeamId> {
        self.calling_team
    }

    /// Call, landed face and winner, once flipped
    pub fn outcome(&self) -> Option<&TossOutcome> {
        self.outcome.as_ref()
    }

    /// Side that won the toss
    pub fn winner(&self) -> Option<TeamId> {
        self.outcome.map(|outcome| outcome.winner)
    }

    /// The winner's election
    pub fn choice(&self) -> Option<BatOrBowl> {
        self.choice
    }

    /// Record which side calls. Can be changed until the call is made.
    pub fn select_calling_team(&mut self, team: TeamId) -> Result<(), SequenceError> {
        if self.outcome.is_some() {
            return Err(SequenceError::OutOfOrder {
                intent: "select the toss caller",
                phase: MatchPhase::RevealingToss,
            });
        }
        self.calling_team = Some(team);
        Ok(())
    }

    /// Fix the call and flip the coin
    pub fn make_call(
        &mut self,
        call: CoinFace,
        coin: &mut dyn CoinSource,
    ) -> Result<TossOutcome, SequenceError> {
        let calling_team = self.calling_team.ok_or(SequenceError::TossCallerNotSelected)?;
        if self.outcome.is_some() {
            // Already flipped; the stored result stands
            return Err(SequenceError::OutOfOrder {
                intent: "call the toss",
                phase: MatchPhase::RevealingToss,
            });
        }

        let result = coin.flip();
        let outcome = TossOutcome {
            calling_team,
            call,
            result,
            winner: toss_winner(calling_team, call, result),
        };
        self.outcome = Some(outcome);
        Ok(outcome)
    }

    /// The toss winner elects to bat or bowl
    pub fn choose(&mut self, choice: BatOrBowl) -> Result<BattingOrder, SequenceError> {
        let winner = self.winner().ok_or(SequenceError::OutOfOrder {
            intent: "choose to bat or bowl",
            phase: MatchPhase::AwaitingTossCall,
        })?;
        if self.choice.is_some() {
            return Err(SequenceError::OutOfOrder {
                intent: "choose to bat or bowl",
                phase: MatchPhase::InPlay,
            });
        }
        self.choice = Some(choice);
        Ok(BattingOrder::from_choice(winner, choice))
    }

    /// Batting order, once the winner has chosen
    pub fn batting_order(&self) -> Option<BattingOrder> {
        match (self.winner(), self.choice) {
            (Some(winner), Some(choice)) => Some(BattingOrder::from_choice(winner, choice)),
            _ => None,
        }
    }
}
