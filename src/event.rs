//! Notifications emitted by the controller

use serde::{Serialize, Deserialize};
use std::fmt;
use crate::ledger::BallOutcome;
use crate::result::MatchResult;
use crate::scoring::DeliverySelection;
use crate::toss::TossOutcome;
use crate::types::{BattingOrder, Innings, TeamId};

/// Why an innings came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InningsEndReason {
    AllOut,
    OversComplete,
    /// Ended by the user before the innings was exhausted
    Declared,
}

impl fmt::Display for InningsEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InningsEndReason::AllOut => write!(f, "all out"),
            InningsEndReason::OversComplete => write!(f, "overs completed"),
            InningsEndReason::Declared => write!(f, "declared"),
        }
    }
}

/// State change notification delivered to observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    Configured {
        team1: String,
        team2: String,
        overs_per_innings: u32,
        players_per_team: u32,
    },
    TossCallerSelected {
        team: TeamId,
    },
    /// Outcome is fixed; the view may start its reveal
    TossResolved {
        outcome: TossOutcome,
    },
    TossRevealAcknowledged,
    BattingOrderDecided {
        order: BattingOrder,
    },
    SelectionChanged {
        selection: DeliverySelection,
    },
    DeliveryRecorded {
        team: TeamId,
        outcome: BallOutcome,
    },
    InningsOver {
        innings: Innings,
        team: TeamId,
        reason: InningsEndReason,
    },
    InningsChanged {
        batting: TeamId,
        target: u32,
    },
    MatchCompleted {
        result: MatchResult,
    },
    MatchReset,
}

impl MatchEvent {
    /// Selection changes are chatter; everything else is a match event
    pub fn is_selection(&self) -> bool {
        matches!(self, MatchEvent::SelectionChanged { .. })
    }
}

impl fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchEvent::Configured { team1, team2, overs_per_innings, players_per_team } => write!(
                f,
                "Match configured: {} vs {}, {} overs, {} players",
                team1, team2, overs_per_innings, players_per_team
            ),
            MatchEvent::TossCallerSelected { team } => write!(f, "{} will call the toss", team),
            MatchEvent::TossResolved { outcome } => write!(
                f,
                "It's {}! {} won the toss",
                outcome.result, outcome.winner
            ),
            MatchEvent::TossRevealAcknowledged => write!(f, "Toss reveal acknowledged"),
            MatchEvent::BattingOrderDecided { order } => {
                write!(f, "{} bats first, {} bowls", order.batting_first, order.bowling_first)
            }
            MatchEvent::SelectionChanged { selection } => write!(
                f,
                "Selection: runs={:?} type={} wicket={}",
                selection.runs, selection.delivery_type, selection.wicket
            ),
            MatchEvent::DeliveryRecorded { team, outcome } => {
                write!(f, "{} delivery: {}", team, outcome.label())
            }
            MatchEvent::InningsOver { innings, team, reason } => {
                write!(f, "{} over for {}: {}", innings.label(), team, reason)
            }
            MatchEvent::InningsChanged { batting, target } => {
                write!(f, "Second innings starts! {} needs {} to win", batting, target)
            }
            MatchEvent::MatchCompleted { result } => write!(f, "{}", result),
            MatchEvent::MatchReset => write!(f, "Match reset"),
        }
    }
}
