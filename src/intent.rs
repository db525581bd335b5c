//! Inbound user intents

use serde::{Serialize, Deserialize};
use crate::config::MatchConfig;
use crate::types::{BatOrBowl, CoinFace, DeliveryType, TeamId};

/// One user action, processed to completion before the next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    ConfigureMatch { config: MatchConfig },
    SelectTossCaller { team: TeamId },
    CallToss { call: CoinFace },
    AcknowledgeTossReveal,
    ChooseBatOrBowl { choice: BatOrBowl },
    SelectRuns { runs: u8 },
    SelectDeliveryType { delivery_type: DeliveryType },
    ToggleWicket,
    RecordDelivery,
    EndInnings,
    ResetMatch,
}

impl Intent {
    /// Stable name used in logs and traces
    pub fn name(&self) -> &'static str {
        match self {
            Intent::ConfigureMatch { .. } => "configure_match",
            Intent::SelectTossCaller { .. } => "select_toss_caller",
            Intent::CallToss { .. } => "call_toss",
            Intent::AcknowledgeTossReveal => "acknowledge_toss_reveal",
            Intent::ChooseBatOrBowl { .. } => "choose_bat_or_bowl",
            Intent::SelectRuns { .. } => "select_runs",
            Intent::SelectDeliveryType { .. } => "select_delivery_type",
            Intent::ToggleWicket => "toggle_wicket",
            Intent::RecordDelivery => "record_delivery",
            Intent::EndInnings => "end_innings",
            Intent::ResetMatch => "reset_match",
        }
    }

    /// Arm and record a delivery in one go
    pub fn delivery(runs: u8, delivery_type: DeliveryType, wicket: bool) -> Vec<Intent> {
        let mut intents = vec![Intent::SelectRuns { runs }];
        if delivery_type != DeliveryType::Normal {
            intents.push(Intent::SelectDeliveryType { delivery_type });
        }
        if wicket {
            intents.push(Intent::ToggleWicket);
        }
        intents.push(Intent::RecordDelivery);
        intents
    }

    /// Configure, toss and choose in one sequence
    pub fn opening(config: MatchConfig, caller: TeamId, call: CoinFace, choice: BatOrBowl) -> Vec<Intent> {
        vec![
            Intent::ConfigureMatch { config },
            Intent::SelectTossCaller { team: caller },
            Intent::CallToss { call },
            Intent::AcknowledgeTossReveal,
            Intent::ChooseBatOrBowl { choice },
        ]
    }
}
