//! Core traits for the scorebook

use std::fmt::Debug;
use crate::event::MatchEvent;
use crate::types::CoinFace;

/// Source of toss outcomes.
///
/// Each call is one independent, uniform flip. Tests inject a fixed face.
pub trait CoinSource: Debug + Send {
    fn flip(&mut self) -> CoinFace;
}

/// Receives notifications after every accepted intent
pub trait MatchObserver: Send {
    fn on_event(&mut self, event: &MatchEvent);
}
