//! Core data types for the scorebook

use serde::{Serialize, Deserialize};
use std::fmt;

/// Legal deliveries in one over
pub const BALLS_PER_OVER: u32 = 6;

/// One of the two configured sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamId {
    Team1,
    Team2,
}

impl TeamId {
    /// The opposing side
    pub fn other(self) -> Self {
        match self {
            TeamId::Team1 => TeamId::Team2,
            TeamId::Team2 => TeamId::Team1,
        }
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamId::Team1 => write!(f, "Team 1"),
            TeamId::Team2 => write!(f, "Team 2"),
        }
    }
}

/// Which innings is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Innings {
    First,
    Second,
}

impl Innings {
    /// Heading shown above the scoreboard
    pub fn label(self) -> &'static str {
        match self {
            Innings::First => "First Innings",
            Innings::Second => "Second Innings - Chase",
        }
    }
}

/// A face of the toss coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoinFace {
    Heads,
    Tails,
}

impl fmt::Display for CoinFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinFace::Heads => write!(f, "Heads"),
            CoinFace::Tails => write!(f, "Tails"),
        }
    }
}

/// What the toss winner elects to do first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatOrBowl {
    Bat,
    Bowl,
}

/// Kind of delivery bowled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeliveryType {
    #[default]
    Normal,
    Wide,
    NoBall,
}

impl DeliveryType {
    /// Penalty run awarded to the batting side
    pub fn penalty(self) -> u32 {
        match self {
            DeliveryType::Normal => 0,
            DeliveryType::Wide | DeliveryType::NoBall => 1,
        }
    }

    /// Wides and no-balls are re-bowled and never use up a legal ball
    pub fn counts_as_legal_ball(self) -> bool {
        self == DeliveryType::Normal
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryType::Normal => write!(f, "normal"),
            DeliveryType::Wide => write!(f, "wide"),
            DeliveryType::NoBall => write!(f, "no-ball"),
        }
    }
}

/// Lifecycle phase of a match, from setup to result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchPhase {
    #[default]
    AwaitingSetup,
    AwaitingTossCaller,
    AwaitingTossCall,
    /// The toss outcome is fixed and the view is presenting it
    RevealingToss,
    AwaitingBatOrBowl,
    InPlay,
    /// Recording is disabled until the innings is ended
    InningsOver,
    Completed,
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchPhase::AwaitingSetup => "awaiting setup",
            MatchPhase::AwaitingTossCaller => "awaiting toss caller",
            MatchPhase::AwaitingTossCall => "awaiting toss call",
            MatchPhase::RevealingToss => "revealing toss",
            MatchPhase::AwaitingBatOrBowl => "awaiting bat or bowl",
            MatchPhase::InPlay => "in play",
            MatchPhase::InningsOver => "innings over",
            MatchPhase::Completed => "completed",
        };
        write!(f, "{}", name)
    }
}

/// Batting order fixed when the toss winner chooses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattingOrder {
    pub batting_first: TeamId,
    pub bowling_first: TeamId,
}

impl BattingOrder {
    /// Derive the order from the toss winner's election
    pub fn from_choice(toss_winner: TeamId, choice: BatOrBowl) -> Self {
        let batting_first = match choice {
            BatOrBowl::Bat => toss_winner,
            BatOrBowl::Bowl => toss_winner.other(),
        };
        Self {
            batting_first,
            bowling_first: batting_first.other(),
        }
    }

    /// Side batting in the given innings
    pub fn batting_in(&self, innings: Innings) -> TeamId {
        match innings {
            Innings::First => self.batting_first,
            Innings::Second => self.bowling_first,
        }
    }

    /// Side bowling in the given innings
    pub fn bowling_in(&self, innings: Innings) -> TeamId {
        self.batting_in(innings).other()
    }
}

/// Cryptographic fingerprint of a match state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateHash(pub [u8; 32]);

impl fmt::Display for StateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// One accepted intent's effect on the state fingerprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransitionInfo {
    pub intent_index: usize,
    pub intent: String,
    pub from_hash: StateHash,
    pub to_hash: StateHash,
}

/// Trace of a session for audit and replay comparison
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionTrace {
    pub intents_accepted: usize,
    pub intents_rejected: usize,
    pub state_transitions: Vec<StateTransitionInfo>,
    /// Running hash chain over every `to_hash`, `None` before the first transition
    pub chain_hash: Option<StateHash>,
}
