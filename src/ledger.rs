//! Per-team innings ledger and delivery outcomes

use serde::{Serialize, Deserialize};
use crate::types::{DeliveryType, BALLS_PER_OVER};

/// Immutable record of one recorded delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BallOutcome {
    runs_off_bat: u8,
    delivery_type: DeliveryType,
    wicket_taken: bool,
    total_runs: u32,
    counts_as_legal_ball: bool,
}

impl BallOutcome {
    /// Built by the scoring engine once the input has been validated
    pub(crate) fn new(runs_off_bat: u8, delivery_type: DeliveryType, wicket_taken: bool) -> Self {
        Self {
            runs_off_bat,
            delivery_type,
            wicket_taken,
            total_runs: u32::from(runs_off_bat) + delivery_type.penalty(),
            counts_as_legal_ball: delivery_type.counts_as_legal_ball(),
        }
    }

    /// Runs scored off the bat, 0 to 6
    pub fn runs_off_bat(&self) -> u8 {
        self.runs_off_bat
    }

    /// Normal, wide or no-ball
    pub fn delivery_type(&self) -> DeliveryType {
        self.delivery_type
    }

    /// Whether the delivery took a wicket
    pub fn wicket_taken(&self) -> bool {
        self.wicket_taken
    }

    /// Runs off the bat plus any penalty run
    pub fn total_runs(&self) -> u32 {
        self.total_runs
    }

    pub fn penalty(&self) -> u32 {
        self.delivery_type.penalty()
    }

    pub fn counts_as_legal_ball(&self) -> bool {
        self.counts_as_legal_ball
    }

    /// Short label shown in the over strip
    pub fn label(&self) -> String {
        let runs = self.runs_off_bat;
        let with_runs = |prefix: &str| {
            if runs > 0 {
                format!("{}+{}", prefix, runs)
            } else {
                prefix.to_string()
            }
        };

        match self.class() {
            BallClass::Wide => with_runs("Wd"),
            BallClass::Wicket => with_runs("W"),
            BallClass::NoBall => with_runs("NB"),
            BallClass::Dot => "•".to_string(),
            BallClass::Four | BallClass::Six | BallClass::Runs => runs.to_string(),
        }
    }

    /// Styling class for the label
    pub fn class(&self) -> BallClass {
        match (self.delivery_type, self.wicket_taken, self.runs_off_bat) {
            (DeliveryType::Wide, _, _) => BallClass::Wide,
            (_, true, _) => BallClass::Wicket,
            (DeliveryType::NoBall, false, _) => BallClass::NoBall,
            (DeliveryType::Normal, false, 0) => BallClass::Dot,
            (DeliveryType::Normal, false, 4) => BallClass::Four,
            (DeliveryType::Normal, false, 6) => BallClass::Six,
            (DeliveryType::Normal, false, _) => BallClass::Runs,
        }
    }
}

/// Presentation class derived from a delivery outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallClass {
    Wide,
    NoBall,
    Wicket,
    Dot,
    Four,
    Six,
    Runs,
}

impl BallClass {
    pub fn as_str(self) -> &'static str {
        match self {
            BallClass::Wide => "wide",
            BallClass::NoBall => "noball",
            BallClass::Wicket => "wicket",
            BallClass::Dot => "dot",
            BallClass::Four => "four",
            BallClass::Six => "six",
            BallClass::Runs => "runs",
        }
    }
}

/// Format legal balls as overs, e.g. 27 balls -> "4.3"
pub fn overs_string(legal_balls: u32) -> String {
    format!("{}.{}", legal_balls / BALLS_PER_OVER, legal_balls % BALLS_PER_OVER)
}

/// Cumulative innings state for one side
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    pub(crate) name: String,
    pub(crate) runs: u32,
    pub(crate) wickets: u32,
    pub(crate) legal_balls: u32,
    pub(crate) extras: u32,
    pub(crate) delivery_history: Vec<BallOutcome>,
}

impl Team {
    /// Create an empty ledger for a named side
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            runs: 0,
            wickets: 0,
            legal_balls: 0,
            extras: 0,
            delivery_history: Vec::new(),
        }
    }

    /// Display name of the side
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total runs, extras included
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Wickets fallen
    pub fn wickets(&self) -> u32 {
        self.wickets
    }

    /// Legal deliveries faced
    pub fn legal_balls(&self) -> u32 {
        self.legal_balls
    }

    /// Penalty runs from wides and no-balls
    pub fn extras(&self) -> u32 {
        self.extras
    }

    /// Every delivery faced, oldest first
    pub fn delivery_history(&self) -> &[BallOutcome] {
        &self.delivery_history
    }

    /// The most recent `count` deliveries, oldest first
    pub fn recent_deliveries(&self, count: usize) -> &[BallOutcome] {
        let start = self.delivery_history.len().saturating_sub(count);
        &self.delivery_history[start..]
    }

    /// Overs faced, e.g. "4.3"
    pub fn overs(&self) -> String {
        overs_string(self.legal_balls)
    }

    /// Legal balls left in an innings of `total_balls`
    pub fn remaining_balls(&self, total_balls: u32) -> u32 {
        total_balls.saturating_sub(self.legal_balls)
    }

    /// Score as "runs/wickets"
    pub fn score_line(&self) -> String {
        format!("{}/{}", self.runs, self.wickets)
    }

    /// Fraction of the innings' legal balls used, in [0, 1]
    pub fn progress(&self, total_balls: u32) -> f64 {
        if total_balls == 0 {
            return 0.0;
        }
        (f64::from(self.legal_balls) / f64::from(total_balls)).min(1.0)
    }

    /// Summary line for the result screen
    pub fn summary_line(&self) -> String {
        format!("{}: {} ({} overs)", self.name, self.score_line(), self.overs())
    }
}
