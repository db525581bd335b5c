//! Match result computation

use serde::{Serialize, Deserialize};
use std::fmt;
use crate::ledger::Team;
use crate::types::TeamId;

/// How a winning side's margin is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinMargin {
    /// Side batting first defended its total
    Runs(u32),
    /// Side batting second chased; wickets still in hand
    Wickets(u32),
}

impl fmt::Display for WinMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (value, unit) = match self {
            WinMargin::Runs(runs) => (*runs, "run"),
            WinMargin::Wickets(wickets) => (*wickets, "wicket"),
        };
        let plural = if value == 1 { "" } else { "s" };
        write!(f, "{} {}{}", value, unit, plural)
    }
}

/// Final result of a match
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    Won {
        winner: TeamId,
        winner_name: String,
        margin: WinMargin,
    },
    Tied,
}

impl MatchResult {
    pub fn winner(&self) -> Option<TeamId> {
        match self {
            MatchResult::Won { winner, .. } => Some(*winner),
            MatchResult::Tied => None,
        }
    }

    pub fn margin(&self) -> Option<WinMargin> {
        match self {
            MatchResult::Won { margin, .. } => Some(*margin),
            MatchResult::Tied => None,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Won { winner_name, margin, .. } => {
                write!(f, "{} won by {}!", winner_name, margin)
            }
            MatchResult::Tied => write!(f, "Match Tied!"),
        }
    }
}

/// Decide the match from both ledgers.
///
/// The margin follows batting order: a side that defended wins by runs, a side
/// that chased wins by the wickets it had left.
pub fn compute_result(
    batting_first: (TeamId, &Team),
    batting_second: (TeamId, &Team),
    max_wickets: u32,
) -> MatchResult {
    let (setter_id, setter) = batting_first;
    let (chaser_id, chaser) = batting_second;

    if setter.runs() > chaser.runs() {
        MatchResult::Won {
            winner: setter_id,
            winner_name: setter.name().to_string(),
            margin: WinMargin::Runs(setter.runs() - chaser.runs()),
        }
    } else if chaser.runs() > setter.runs() {
        MatchResult::Won {
            winner: chaser_id,
            winner_name: chaser.name().to_string(),
            margin: WinMargin::Wickets(max_wickets.saturating_sub(chaser.wickets())),
        }
    } else {
        MatchResult::Tied
    }
}
