//! Scorebook
//!
//! A deterministic scorekeeping engine for a single limited-overs cricket match:
//! setup, toss, two innings of ball-by-ball recording and the result.

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod event;
pub mod hasher;
pub mod intent;
pub mod ledger;
pub mod logging;
pub mod replay;
pub mod result;
pub mod scoring;
pub mod serialization;
pub mod session;
pub mod snapshot;
pub mod toss;
pub mod traits;
pub mod types;

// Re-export core types and traits
pub use config::{MatchConfig, MatchConfigBuilder, MatchSetup, SessionOptions, SessionOptionsBuilder};
pub use context::{EntropyCoin, FixedCoin, MatchClock, MatchContext, MatchContextBuilder, SeededCoin};
pub use controller::{InningsTransition, MatchController, MatchState};
pub use error::{
    ConfigurationError, InputError, ScorebookError, SequenceError, SerializationError, StateError,
};
pub use event::{InningsEndReason, MatchEvent};
pub use hasher::StateHasher;
pub use intent::Intent;
pub use ledger::{BallClass, BallOutcome, Team};
pub use logging::{LogEntry, LogLevel, MatchLog};
pub use replay::{Rejection, ReplayEngine, ReplayEngineBuilder, ReplayResult};
pub use result::{compute_result, MatchResult, WinMargin};
pub use scoring::{DeliverySelection, ScoringEngine};
pub use serialization::{BincodeSerializer, JsonSerializer, StateSerializer};
pub use session::MatchSession;
pub use snapshot::{BallView, MatchSnapshot, TargetView, TeamCard};
pub use toss::{toss_winner, TossOutcome, TossState};
pub use traits::{CoinSource, MatchObserver};
pub use types::{
    BatOrBowl, BattingOrder, CoinFace, DeliveryType, Innings, MatchPhase, SessionTrace, StateHash,
    TeamId,
};
