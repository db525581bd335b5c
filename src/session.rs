//! Intent processing with logging, tracing and observer fan-out

use serde::Serialize;
use std::fmt;
use tracing::{debug_span, warn};
use crate::config::SessionOptions;
use crate::context::MatchContext;
use crate::controller::{MatchController, MatchState};
use crate::error::ScorebookError;
use crate::event::MatchEvent;
use crate::hasher::StateHasher;
use crate::intent::Intent;
use crate::logging::{LogEntry, LogLevel, MatchLog};
use crate::scoring::DeliverySelection;
use crate::snapshot::MatchSnapshot;
use crate::traits::MatchObserver;
use crate::types::{MatchPhase, SessionTrace, StateHash, StateTransitionInfo};

/// Everything an intent can change, hashed as one value
#[derive(Serialize)]
struct Fingerprint<'a> {
    phase: MatchPhase,
    selection: &'a DeliverySelection,
    state: Option<&'a MatchState>,
}

/// A running scorekeeping session: one owner, one intent at a time
pub struct MatchSession {
    controller: MatchController,
    context: MatchContext,
    options: SessionOptions,
    log: MatchLog,
    trace: SessionTrace,
    hasher: StateHasher,
    observers: Vec<Box<dyn MatchObserver>>,
    intents_seen: usize,
}

impl fmt::Debug for MatchSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchSession")
            .field("phase", &self.controller.phase())
            .field("intents_seen", &self.intents_seen)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl MatchSession {
    /// Create a session using the system clock and the coin the options ask for
    pub fn new(options: SessionOptions) -> Self {
        let mut builder = MatchContext::builder();
        if let Some(seed) = options.coin_seed {
            builder = builder.with_seed(seed);
        }
        Self::with_context(options, builder.build())
    }

    /// Create a session with explicitly injected collaborators
    pub fn with_context(options: SessionOptions, context: MatchContext) -> Self {
        Self {
            controller: MatchController::new(),
            context,
            log: MatchLog::new(options.log_level),
            options,
            trace: SessionTrace::default(),
            hasher: StateHasher::new(),
            observers: Vec::new(),
            intents_seen: 0,
        }
    }

    /// Register an observer for every future event
    pub fn subscribe(&mut self, observer: impl MatchObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// The underlying phase machine
    pub fn controller(&self) -> &MatchController {
        &self.controller
    }

    /// Match state, once configured
    pub fn state(&self) -> Option<&MatchState> {
        self.controller.state()
    }

    /// Options the session was created with
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Entries recorded so far
    pub fn log(&self) -> &MatchLog {
        &self.log
    }

    /// Accepted and rejected intents with their hash transitions
    pub fn trace(&self) -> &SessionTrace {
        &self.trace
    }

    /// Fingerprint of the lifecycle phase, the armed selection and the match state
    pub fn current_hash(&self) -> Result<StateHash, ScorebookError> {
        let fingerprint = Fingerprint {
            phase: self.controller.phase(),
            selection: self.controller.selection(),
            state: self.controller.state(),
        };
        Ok(self.hasher.hash(&fingerprint)?)
    }

    /// Projection for the view layer
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::capture(&self.controller, self.options.history_window)
    }

    /// Apply one intent.
    ///
    /// The controller is checkpointed first. A rejected intent, or one that
    /// leaves the state violating a ledger invariant, is rolled back to the
    /// checkpoint and logged.
    pub fn apply(&mut self, intent: &Intent) -> Result<Vec<MatchEvent>, ScorebookError> {
        let index = self.intents_seen;
        self.intents_seen += 1;
        let name = intent.name();

        let span = debug_span!("intent", index, intent = name);
        let _guard = span.enter();

        let from_hash = self.current_hash()?;
        let checkpoint = self.controller.clone();
        if let Err(e) = self.dispatch(intent) {
            self.controller = checkpoint;
            self.trace.intents_rejected += 1;
            warn!(error = %e, "intent rejected");
            self.log.log(
                LogEntry::new(LogLevel::Warn, self.context.now(), format!("Rejected {}: {}", name, e))
                    .with_intent(name, index)
                    .with_state_hash(from_hash),
            );
            return Err(e);
        }

        if let Some(Err(e)) = self.controller.state().map(MatchState::validate) {
            self.controller = checkpoint;
            self.trace.intents_rejected += 1;
            warn!(error = %e, "intent rolled back");
            self.log.log(
                LogEntry::new(LogLevel::Error, self.context.now(), e.to_string())
                    .with_intent(name, index)
                    .with_state_hash(from_hash),
            );
            return Err(e.into());
        }

        let to_hash = self.current_hash()?;
        self.trace.chain_hash = Some(self.hasher.extend_chain(self.trace.chain_hash.as_ref(), &to_hash));
        self.trace.intents_accepted += 1;
        self.trace.state_transitions.push(StateTransitionInfo {
            intent_index: index,
            intent: name.to_string(),
            from_hash,
            to_hash: to_hash.clone(),
        });

        let events = self.controller.drain_events();
        let now = self.context.now();
        for event in &events {
            let level = if event.is_selection() { LogLevel::Debug } else { LogLevel::Info };
            self.log.log(
                LogEntry::new(level, now, event.to_string())
                    .with_intent(name, index)
                    .with_state_hash(to_hash.clone())
                    .with_metadata("phase", self.controller.phase()),
            );
            for observer in self.observers.iter_mut() {
                observer.on_event(event);
            }
        }
        Ok(events)
    }

    /// Apply intents in order, stopping at the first rejection
    pub fn apply_all(&mut self, intents: &[Intent]) -> Result<Vec<MatchEvent>, ScorebookError> {
        let mut events = Vec::new();
        for intent in intents {
            events.extend(self.apply(intent)?);
        }
        Ok(events)
    }

    fn dispatch(&mut self, intent: &Intent) -> Result<(), ScorebookError> {
        match intent {
            Intent::ConfigureMatch { config } => self.controller.configure_match(config).map(|_| ()),
            Intent::SelectTossCaller { team } => self.controller.select_toss_caller(*team),
            Intent::CallToss { call } => self
                .controller
                .call_toss(*call, self.context.coin())
                .map(|_| ()),
            Intent::AcknowledgeTossReveal => self.controller.acknowledge_toss_reveal(),
            Intent::ChooseBatOrBowl { choice } => self.controller.choose_bat_or_bowl(*choice).map(|_| ()),
            Intent::SelectRuns { runs } => self.controller.select_runs(*runs),
            Intent::SelectDeliveryType { delivery_type } => {
                self.controller.select_delivery_type(*delivery_type)
            }
            Intent::ToggleWicket => self.controller.toggle_wicket().map(|_| ()),
            Intent::RecordDelivery => self.controller.record_delivery().map(|_| ()),
            Intent::EndInnings => self.controller.end_innings().map(|_| ()),
            Intent::ResetMatch => {
                self.controller.reset_match();
                Ok(())
            }
        }
    }
}

impl Default for MatchSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::context::FixedCoin;
    use crate::types::{BatOrBowl, CoinFace, MatchPhase, TeamId};
    use chrono::{TimeZone, Utc};

    fn session() -> MatchSession {
        let context = MatchContext::builder()
            .with_fixed_time(Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap())
            .with_coin(FixedCoin(CoinFace::Tails))
            .build();
        MatchSession::with_context(SessionOptions::default(), context)
    }

    #[test]
    fn test_rejected_intent_is_logged_and_traced() {
        let mut session = session();
        let before = session.current_hash().unwrap();

        assert!(session.apply(&Intent::RecordDelivery).is_err());

        assert_eq!(session.current_hash().unwrap(), before);
        assert_eq!(session.trace().intents_rejected, 1);
        assert_eq!(session.trace().intents_accepted, 0);
        assert_eq!(session.log().filter_by_level(LogLevel::Warn).len(), 1);
    }

    #[test]
    fn test_opening_sequence_reaches_play() {
        let mut session = session();
        let intents = Intent::opening(
            MatchConfig::new("Lions", "Tigers", 2),
            TeamId::Team1,
            CoinFace::Heads,
            BatOrBowl::Bowl,
        );

        let events = session.apply_all(&intents).unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(session.controller().phase(), MatchPhase::InPlay);

        // Tails beats a call of heads, so Team 2 won and chose to bowl
        let state = session.state().unwrap();
        assert_eq!(state.toss().winner(), Some(TeamId::Team2));
        assert_eq!(state.batting_team_id(), Some(TeamId::Team1));
        assert_eq!(session.trace().state_transitions.len(), 5);
        assert!(session.trace().chain_hash.is_some());
    }

    #[test]
    fn test_selection_events_logged_at_debug() {
        let mut session = session();
        session
            .apply_all(&Intent::opening(
                MatchConfig::new("Lions", "Tigers", 2),
                TeamId::Team1,
                CoinFace::Tails,
                BatOrBowl::Bat,
            ))
            .unwrap();
        let logged = session.log().len();

        session.apply(&Intent::SelectRuns { runs: 2 }).unwrap();
        assert_eq!(session.log().len(), logged, "debug entries are below the default level");
    }

    #[test]
    fn test_hash_tracks_phase_and_selection() {
        let mut session = session();
        let opening = Intent::opening(
            MatchConfig::new("Lions", "Tigers", 2),
            TeamId::Team1,
            CoinFace::Heads,
            BatOrBowl::Bat,
        );
        session.apply_all(&opening[..3]).unwrap();
        let revealing = session.current_hash().unwrap();

        session.apply(&Intent::AcknowledgeTossReveal).unwrap();
        assert_ne!(session.current_hash().unwrap(), revealing);
        let ack = &session.trace().state_transitions[3];
        assert_ne!(ack.from_hash, ack.to_hash);

        session.apply(&Intent::ChooseBatOrBowl { choice: BatOrBowl::Bat }).unwrap();
        let unarmed = session.current_hash().unwrap();
        session.apply(&Intent::SelectRuns { runs: 6 }).unwrap();
        session.apply(&Intent::ToggleWicket).unwrap();
        assert_ne!(session.current_hash().unwrap(), unarmed);
    }

    #[test]
    fn test_invariant_violation_rolls_back_intent() {
        let mut session = session();
        session
            .apply_all(&Intent::opening(
                MatchConfig::new("Lions", "Tigers", 2),
                TeamId::Team1,
                CoinFace::Tails,
                BatOrBowl::Bat,
            ))
            .unwrap();
        if let Some(state) = session.controller.state_mut_for_tests() {
            state.team_mut(TeamId::Team1).extras = 3;
        }
        let before = session.current_hash().unwrap();

        let result = session.apply(&Intent::SelectRuns { runs: 2 });

        assert!(matches!(result, Err(ScorebookError::State(_))));
        assert_eq!(session.controller().selection().runs, None);
        assert_eq!(session.current_hash().unwrap(), before);
        assert_eq!(session.trace().intents_rejected, 1);
        assert_eq!(session.log().filter_by_level(LogLevel::Error).len(), 1);
    }
}
