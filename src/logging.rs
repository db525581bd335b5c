//! Match log
//!
//! An in-memory, level-filtered record of what happened during a session.
//! Timestamps come from the session clock so a replay under a fixed clock
//! produces the same log.

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use crate::types::StateHash;

/// Log level for match logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level - selection changes
    Debug,
    /// Info level - match events
    Info,
    /// Warning level - rejected intents
    Warn,
    /// Error level - invariant failures
    Error,
}

/// A match log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    /// Position of the intent in the session, if applicable
    pub intent_index: Option<usize>,
    /// Intent name, if applicable
    pub intent: Option<String>,
    /// State fingerprint after the intent was applied
    pub state_hash: Option<StateHash>,
    pub message: String,
    /// Additional structured data
    pub metadata: Vec<(String, String)>,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(level: LogLevel, timestamp: DateTime<Utc>, message: String) -> Self {
        Self {
            level,
            timestamp,
            intent_index: None,
            intent: None,
            state_hash: None,
            message,
            metadata: Vec::new(),
        }
    }

    /// Add intent context to the log entry
    pub fn with_intent(mut self, name: &str, index: usize) -> Self {
        self.intent = Some(name.to_string());
        self.intent_index = Some(index);
        self
    }

    /// Add state hash to the log entry
    pub fn with_state_hash(mut self, hash: StateHash) -> Self {
        self.state_hash = Some(hash);
        self
    }

    /// Add metadata to the log entry
    pub fn with_metadata(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.push((key.to_string(), value.to_string()));
        self
    }
}

/// Collects log entries at or above a minimum level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchLog {
    entries: Vec<LogEntry>,
    min_level: LogLevel,
}

impl MatchLog {
    /// Create a new match log
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            entries: Vec::new(),
            min_level,
        }
    }

    /// Create a log that captures info and above
    pub fn with_info_level() -> Self {
        Self::new(LogLevel::Info)
    }

    /// Log an entry if it meets the minimum level
    pub fn log(&mut self, entry: LogEntry) {
        if self.should_log(entry.level) {
            self.entries.push(entry);
        }
    }

    /// Check if a log level should be recorded
    pub fn should_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Get all log entries
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries recorded
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Filter entries by log level
    pub fn filter_by_level(&self, level: LogLevel) -> Vec<&LogEntry> {
        self.entries.iter()
            .filter(|e| e.level == level)
            .collect()
    }

    /// Filter entries by intent name
    pub fn filter_by_intent(&self, intent: &str) -> Vec<&LogEntry> {
        self.entries.iter()
            .filter(|e| e.intent.as_deref() == Some(intent))
            .collect()
    }
}

impl Default for MatchLog {
    fn default() -> Self {
        Self::with_info_level()
    }
}
