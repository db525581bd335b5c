//! Error types for the scorebook

use thiserror::Error;
use crate::types::{MatchPhase, TeamId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScorebookError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Sequence error: {0}")]
    Sequence(#[from] SequenceError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),
}

/// Invalid setup input. The match is left unconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Please enter {team} name")]
    EmptyTeamName { team: TeamId },

    #[error("Overs per innings must be a positive number, got {overs}")]
    NonPositiveOvers { overs: i64 },

    #[error("Overs per innings is too large: {overs}")]
    OversTooLarge { overs: i64 },

    #[error("Players per team must be between {min} and {max}, got {players}")]
    PlayersOutOfRange { players: u32, min: u32, max: u32 },

    #[error("Invalid match configuration document: {reason}")]
    InvalidDocument { reason: String },
}

/// An intent arrived in a phase that does not accept it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("Cannot {intent} while {phase}")]
    OutOfOrder { intent: &'static str, phase: MatchPhase },

    #[error("Select which team calls the toss first")]
    TossCallerNotSelected,

    #[error("Innings is over for {batting}. End the innings to continue")]
    InningsOver { batting: String },

    #[error("The match has ended")]
    MatchEnded,
}

/// Missing or out-of-range run selection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please select runs scored (0-6)")]
    RunsNotSelected,

    #[error("Runs off the bat must be between 0 and 6, got {runs}")]
    RunsOutOfRange { runs: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Invariant violated for {team}: {reason}")]
    InvariantViolated { team: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    #[error("Serialization failed: {reason}")]
    SerializationFailed { reason: String },

    #[error("Deserialization failed: {reason}")]
    DeserializationFailed { reason: String },
}
