//! Match setup and session configuration

use serde::{Serialize, Deserialize};
use crate::error::ConfigurationError;
use crate::logging::LogLevel;
use crate::types::{TeamId, BALLS_PER_OVER};

pub const DEFAULT_PLAYERS_PER_TEAM: u32 = 11;
pub const MIN_PLAYERS_PER_TEAM: u32 = 2;
pub const MAX_PLAYERS_PER_TEAM: u32 = 11;

/// Deliveries shown in the recent-history strip, one over by default
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

/// Raw setup input as entered by the user, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub team1_name: String,
    pub team2_name: String,
    pub overs_per_innings: i64,
    #[serde(default)]
    pub players_per_team: Option<u32>,
}

impl MatchConfig {
    /// Create a config with the default number of players
    pub fn new(team1_name: impl Into<String>, team2_name: impl Into<String>, overs_per_innings: i64) -> Self {
        Self {
            team1_name: team1_name.into(),
            team2_name: team2_name.into(),
            overs_per_innings,
            players_per_team: None,
        }
    }

    /// Create a builder for constructing a match config
    pub fn builder() -> MatchConfigBuilder {
        MatchConfigBuilder::new()
    }

    /// Parse a config from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::InvalidDocument {
            reason: e.to_string(),
        })
    }

    /// Validate the raw input into an immutable setup
    pub fn validate(&self) -> Result<MatchSetup, ConfigurationError> {
        let team1_name = self.team1_name.trim();
        if team1_name.is_empty() {
            return Err(ConfigurationError::EmptyTeamName { team: TeamId::Team1 });
        }

        let team2_name = self.team2_name.trim();
        if team2_name.is_empty() {
            return Err(ConfigurationError::EmptyTeamName { team: TeamId::Team2 });
        }

        if self.overs_per_innings <= 0 {
            return Err(ConfigurationError::NonPositiveOvers {
                overs: self.overs_per_innings,
            });
        }
        let overs_per_innings = u32::try_from(self.overs_per_innings)
            .ok()
            .filter(|overs| overs.checked_mul(BALLS_PER_OVER).is_some())
            .ok_or(ConfigurationError::OversTooLarge {
                overs: self.overs_per_innings,
            })?;

        let players_per_team = self.players_per_team.unwrap_or(DEFAULT_PLAYERS_PER_TEAM);
        if !(MIN_PLAYERS_PER_TEAM..=MAX_PLAYERS_PER_TEAM).contains(&players_per_team) {
            return Err(ConfigurationError::PlayersOutOfRange {
                players: players_per_team,
                min: MIN_PLAYERS_PER_TEAM,
                max: MAX_PLAYERS_PER_TEAM,
            });
        }

        Ok(MatchSetup {
            team1_name: team1_name.to_string(),
            team2_name: team2_name.to_string(),
            overs_per_innings,
            players_per_team,
        })
    }
}

/// Builder for match configs
#[derive(Debug, Clone, Default)]
pub struct MatchConfigBuilder {
    team1_name: String,
    team2_name: String,
    overs_per_innings: i64,
    players_per_team: Option<u32>,
}

impl MatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_team1(mut self, name: impl Into<String>) -> Self {
        self.team1_name = name.into();
        self
    }

    pub fn with_team2(mut self, name: impl Into<String>) -> Self {
        self.team2_name = name.into();
        self
    }

    pub fn with_overs(mut self, overs: i64) -> Self {
        self.overs_per_innings = overs;
        self
    }

    pub fn with_players_per_team(mut self, players: u32) -> Self {
        self.players_per_team = Some(players);
        self
    }

    pub fn build(self) -> MatchConfig {
        MatchConfig {
            team1_name: self.team1_name,
            team2_name: self.team2_name,
            overs_per_innings: self.overs_per_innings,
            players_per_team: self.players_per_team,
        }
    }
}

/// Validated match parameters, immutable once the match is configured
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchSetup {
    team1_name: String,
    team2_name: String,
    overs_per_innings: u32,
    players_per_team: u32,
}

impl MatchSetup {
    pub fn team_name(&self, team: TeamId) -> &str {
        match team {
            TeamId::Team1 => &self.team1_name,
            TeamId::Team2 => &self.team2_name,
        }
    }

    pub fn overs_per_innings(&self) -> u32 {
        self.overs_per_innings
    }

    pub fn players_per_team(&self) -> u32 {
        self.players_per_team
    }

    /// Legal balls available to each innings
    pub fn total_balls(&self) -> u32 {
        self.overs_per_innings * BALLS_PER_OVER
    }

    /// Wickets that end an innings (all out)
    pub fn max_wickets(&self) -> u32 {
        self.players_per_team - 1
    }
}

/// Options for a scoring session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Deliveries included in the snapshot's recent-history strip
    pub history_window: usize,
    /// Minimum level recorded by the match log
    pub log_level: LogLevel,
    /// Seed for a reproducible toss; entropy when absent
    pub coin_seed: Option<u64>,
}

impl SessionOptions {
    pub fn builder() -> SessionOptionsBuilder {
        SessionOptionsBuilder::new()
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            log_level: LogLevel::Info,
            coin_seed: None,
        }
    }
}

/// Builder for session options
#[derive(Debug, Clone, Default)]
pub struct SessionOptionsBuilder {
    options: SessionOptions,
}

impl SessionOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.options.history_window = window;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.options.log_level = level;
        self
    }

    pub fn with_coin_seed(mut self, seed: u64) -> Self {
        self.options.coin_seed = Some(seed);
        self
    }

    pub fn build(self) -> SessionOptions {
        self.options
    }
}
