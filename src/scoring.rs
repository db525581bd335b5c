//! Delivery recording

use serde::{Serialize, Deserialize};
use tracing::trace;
use crate::error::InputError;
use crate::ledger::{BallOutcome, Team};
use crate::types::DeliveryType;

/// Highest run value a user can select for one delivery
pub const MAX_RUNS_OFF_BAT: u8 = 6;

/// Inputs armed before a delivery is recorded. Reset after every recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliverySelection {
    pub runs: Option<u8>,
    pub delivery_type: DeliveryType,
    pub wicket: bool,
}

impl DeliverySelection {
    pub fn select_runs(&mut self, runs: u8) -> Result<(), InputError> {
        check_runs(runs)?;
        self.runs = Some(runs);
        Ok(())
    }

    pub fn select_delivery_type(&mut self, delivery_type: DeliveryType) {
        self.delivery_type = delivery_type;
    }

    /// Flip the wicket flag, returning the new value
    pub fn toggle_wicket(&mut self) -> bool {
        self.wicket = !self.wicket;
        self.wicket
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn check_runs(runs: u8) -> Result<(), InputError> {
    if runs > MAX_RUNS_OFF_BAT {
        return Err(InputError::RunsOutOfRange { runs });
    }
    Ok(())
}

/// Applies the delivery accounting rules to a batting ledger
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Work out what a delivery is worth without touching any ledger.
    ///
    /// A wicket cannot fall on a wide; a no-ball still allows one (run out).
    pub fn assess(
        &self,
        runs_off_bat: Option<u8>,
        delivery_type: DeliveryType,
        wicket_requested: bool,
    ) -> Result<BallOutcome, InputError> {
        let runs = runs_off_bat.ok_or(InputError::RunsNotSelected)?;
        check_runs(runs)?;

        let wicket_taken = wicket_requested && delivery_type != DeliveryType::Wide;
        Ok(BallOutcome::new(runs, delivery_type, wicket_taken))
    }

    /// Apply an assessed outcome to the batting ledger
    pub fn apply(&self, batting: &mut Team, outcome: BallOutcome) {
        batting.runs += outcome.total_runs();
        batting.extras += outcome.penalty();
        if outcome.wicket_taken() {
            batting.wickets += 1;
        }
        if outcome.counts_as_legal_ball() {
            batting.legal_balls += 1;
        }
        batting.delivery_history.push(outcome);

        trace!(
            team = %batting.name,
            label = %outcome.label(),
            runs = batting.runs,
            wickets = batting.wickets,
            legal_balls = batting.legal_balls,
            "delivery applied"
        );
    }

    /// Assess and apply in one step. The ledger is untouched on error.
    pub fn record_delivery(
        &self,
        batting: &mut Team,
        runs_off_bat: Option<u8>,
        delivery_type: DeliveryType,
        wicket_requested: bool,
    ) -> Result<BallOutcome, InputError> {
        let outcome = self.assess(runs_off_bat, delivery_type, wicket_requested)?;
        self.apply(batting, outcome);
        Ok(outcome)
    }

    /// Record whatever the selection has armed
    pub fn record_selection(
        &self,
        batting: &mut Team,
        selection: &DeliverySelection,
    ) -> Result<BallOutcome, InputError> {
        self.record_delivery(batting, selection.runs, selection.delivery_type, selection.wicket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_adds_penalty_without_legal_ball() {
        let mut team = Team::new("Lions");
        let outcome = ScoringEngine::new()
            .record_delivery(&mut team, Some(0), DeliveryType::Wide, false)
            .unwrap();

        assert_eq!(team.runs(), 1);
        assert_eq!(team.extras(), 1);
        assert_eq!(team.legal_balls(), 0);
        assert_eq!(outcome.label(), "Wd");
    }

    #[test]
    fn test_wicket_ignored_on_wide() {
        let mut team = Team::new("Lions");
        let outcome = ScoringEngine::new()
            .record_delivery(&mut team, Some(1), DeliveryType::Wide, true)
            .unwrap();

        assert!(!outcome.wicket_taken());
        assert_eq!(team.wickets(), 0);
        assert_eq!(outcome.label(), "Wd+1");
    }

    #[test]
    fn test_no_ball_with_wicket() {
        let mut team = Team::new("Lions");
        let outcome = ScoringEngine::new()
            .record_delivery(&mut team, Some(4), DeliveryType::NoBall, true)
            .unwrap();

        assert_eq!(team.runs(), 5);
        assert_eq!(team.extras(), 1);
        assert_eq!(team.wickets(), 1);
        assert_eq!(team.legal_balls(), 0);
        assert_eq!(outcome.label(), "W+4");
    }

    #[test]
    fn test_missing_runs_leaves_ledger_untouched() {
        let mut team = Team::new("Lions");
        let before = team.clone();

        let result = ScoringEngine::new().record_delivery(&mut team, None, DeliveryType::Normal, true);

        assert_eq!(result, Err(InputError::RunsNotSelected));
        assert_eq!(team, before);
    }

    #[test]
    fn test_out_of_range_runs_rejected() {
        let mut team = Team::new("Lions");
        let result = ScoringEngine::new().record_delivery(&mut team, Some(7), DeliveryType::Normal, false);
        assert_eq!(result, Err(InputError::RunsOutOfRange { runs: 7 }));
        assert!(team.delivery_history().is_empty());
    }

    #[test]
    fn test_selection_toggle_and_reset() {
        let mut selection = DeliverySelection::default();
        selection.select_runs(3).unwrap();
        selection.select_delivery_type(DeliveryType::NoBall);
        assert!(selection.toggle_wicket());

        selection.reset();
        assert_eq!(selection, DeliverySelection::default());
        assert!(selection.select_runs(9).is_err());
        assert_eq!(selection.runs, None);
    }

    #[test]
    fn test_record_selection_uses_armed_inputs() {
        let mut team = Team::new("Lions");
        let mut selection = DeliverySelection::default();
        selection.select_runs(4).unwrap();
        selection.select_delivery_type(DeliveryType::NoBall);
        selection.toggle_wicket();

        let outcome = ScoringEngine::new().record_selection(&mut team, &selection).unwrap();
        assert_eq!(outcome.label(), "W+4");
        assert_eq!((team.runs(), team.wickets(), team.extras()), (5, 1, 1));

        let unarmed = ScoringEngine::new().record_selection(&mut team, &DeliverySelection::default());
        assert_eq!(unarmed, Err(InputError::RunsNotSelected));
        assert_eq!(team.delivery_history().len(), 1);
    }
}
