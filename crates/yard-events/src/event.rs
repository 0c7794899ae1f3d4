//! Event Types
//!
//! One event is emitted per simulated trade.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}

/// Generates a fresh identifier for one simulation run.
pub fn generate_run_id() -> String {
    format!("run_{}", Uuid::new_v4().simple())
}

/// Which side of the trade rule produced the transfer amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeBranch {
    /// The gainer was the poorer agent (or tied); amount scaled by the gain fraction.
    PoorerGains,
    /// The loser was strictly poorer; amount scaled by the loss fraction.
    PoorerLoses,
}

impl TradeBranch {
    /// Returns the snake_case label used in the JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeBranch::PoorerGains => "poorer_gains",
            TradeBranch::PoorerLoses => "poorer_loses",
        }
    }
}

impl std::fmt::Display for TradeBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single trade as written to the append-only trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub event_id: String,
    /// 1-based index of the round this trade completed.
    pub round: u64,
    pub loser: usize,
    pub gainer: usize,
    pub amount: f64,
    pub branch: TradeBranch,
    /// Loser's wealth after the transfer.
    pub loser_wealth: f64,
    /// Gainer's wealth after the transfer.
    pub gainer_wealth: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_format() {
        assert_eq!(generate_event_id(1), "evt_00000001");
        assert_eq!(generate_event_id(12345678), "evt_12345678");
    }

    #[test]
    fn test_run_ids_are_unique() {
        let a = generate_run_id();
        let b = generate_run_id();
        assert!(a.starts_with("run_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_trade_event_json_shape() {
        let event = TradeEvent {
            event_id: generate_event_id(7),
            round: 7,
            loser: 0,
            gainer: 1,
            amount: 10.0,
            branch: TradeBranch::PoorerGains,
            loser_wealth: 90.0,
            gainer_wealth: 60.0,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["branch"], "poorer_gains");
        assert_eq!(json["event_id"], "evt_00000007");

        let parsed: TradeEvent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_branch_display() {
        assert_eq!(TradeBranch::PoorerLoses.to_string(), "poorer_loses");
    }
}
