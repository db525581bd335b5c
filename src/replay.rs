//! Deterministic rebuild of a match from an intent log

use chrono::{DateTime, TimeZone, Utc};
use crate::config::SessionOptions;
use crate::context::MatchContext;
use crate::controller::MatchState;
use crate::error::{ScorebookError, SerializationError};
use crate::intent::Intent;
use crate::logging::LogEntry;
use crate::serialization::{JsonSerializer, StateSerializer};
use crate::session::MatchSession;
use crate::snapshot::MatchSnapshot;
use crate::types::{SessionTrace, StateHash};

/// Seed used when the options do not name one
pub const DEFAULT_REPLAY_SEED: u64 = 0;

/// An intent the replayed session refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub index: usize,
    pub intent: &'static str,
    pub error: ScorebookError,
}

/// Outcome of a replay
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub final_state: Option<MatchState>,
    pub final_hash: StateHash,
    pub snapshot: MatchSnapshot,
    pub trace: SessionTrace,
    pub log: Vec<LogEntry>,
    pub rejections: Vec<Rejection>,
}

impl ReplayResult {
    /// Snapshot as JSON, for hosts that render elsewhere
    pub fn snapshot_json(&self) -> Result<String, ScorebookError> {
        let bytes = JsonSerializer::new().serialize(&self.snapshot)?;
        String::from_utf8(bytes).map_err(|e| {
            SerializationError::SerializationFailed {
                reason: format!("Snapshot was not UTF-8: {}", e),
            }
            .into()
        })
    }
}

/// Replays intent logs under a seeded coin and a frozen clock
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    options: SessionOptions,
    start_time: DateTime<Utc>,
    stop_on_rejection: bool,
}

impl ReplayEngine {
    pub fn new(options: SessionOptions, start_time: DateTime<Utc>) -> Self {
        Self {
            options,
            start_time,
            stop_on_rejection: false,
        }
    }

    pub fn builder() -> ReplayEngineBuilder {
        ReplayEngineBuilder::new()
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn session(&self) -> MatchSession {
        let context = MatchContext::builder()
            .with_fixed_time(self.start_time)
            .with_seed(self.options.coin_seed.unwrap_or(DEFAULT_REPLAY_SEED))
            .build();
        MatchSession::with_context(self.options.clone(), context)
    }

    /// Replay every intent in order.
    ///
    /// Rejected intents are recorded and skipped, the way a live session
    /// would have skipped them, unless the engine stops on rejection.
    pub fn replay(&self, intents: &[Intent]) -> Result<ReplayResult, ScorebookError> {
        let mut session = self.session();
        let mut rejections = Vec::new();

        for (index, intent) in intents.iter().enumerate() {
            if let Err(error) = session.apply(intent) {
                if self.stop_on_rejection {
                    return Err(error);
                }
                rejections.push(Rejection {
                    index,
                    intent: intent.name(),
                    error,
                });
            }
        }

        Ok(ReplayResult {
            final_hash: session.current_hash()?,
            final_state: session.state().cloned(),
            snapshot: session.snapshot(),
            trace: session.trace().clone(),
            log: session.log().entries().to_vec(),
            rejections,
        })
    }

    /// Replay and compare the final fingerprint with an expected one
    pub fn verify(&self, intents: &[Intent], expected: &StateHash) -> Result<bool, ScorebookError> {
        Ok(&self.replay(intents)?.final_hash == expected)
    }
}

/// Builder for replay engines
#[derive(Debug, Clone, Default)]
pub struct ReplayEngineBuilder {
    options: Option<SessionOptions>,
    seed: Option<u64>,
    start_time: Option<DateTime<Utc>>,
    stop_on_rejection: bool,
}

impl ReplayEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Overrides any seed in the options
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_start_time(mut self, time: DateTime<Utc>) -> Self {
        self.start_time = Some(time);
        self
    }

    pub fn stop_on_rejection(mut self, stop: bool) -> Self {
        self.stop_on_rejection = stop;
        self
    }

    /// Missing pieces default to session defaults, seed 0 and the Unix epoch
    pub fn build(self) -> ReplayEngine {
        let mut options = self.options.unwrap_or_default();
        if let Some(seed) = self.seed {
            options.coin_seed = Some(seed);
        }
        let start_time = self
            .start_time
            .unwrap_or_else(|| Utc.timestamp_opt(0, 0).single().unwrap_or_default());

        ReplayEngine {
            options,
            start_time,
            stop_on_rejection: self.stop_on_rejection,
        }
    }
}
