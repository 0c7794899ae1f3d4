//! Snapshot Types
//!
//! Serialization structs for wealth snapshots.
//!
//! Snapshots capture the full wealth sequence at a point in the run,
//! used for analysis, charting, and debugging.

use serde::{Deserialize, Serialize};

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// Inequality measures computed over a wealth sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InequalityMetrics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// `max / min`; `None` when the poorest agent holds nothing.
    pub max_min_ratio: Option<f64>,
    pub gini: f64,
    /// Fraction of total wealth held by the richest agent.
    pub top_share: f64,
}

/// Full wealth state at one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WealthSnapshot {
    pub snapshot_id: String,
    pub run_id: String,
    pub round: u64,
    /// What caused the snapshot ("periodic", "simulation_start", "simulation_end")
    pub trigger: String,
    pub wealth: Vec<f64>,
    pub total_wealth: f64,
    pub metrics: InequalityMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_id_format() {
        assert_eq!(generate_snapshot_id(1), "snap_000001");
        assert_eq!(generate_snapshot_id(42), "snap_000042");
    }

    #[test]
    fn test_zero_min_ratio_serializes_as_null() {
        let metrics = InequalityMetrics {
            mean: 50.0,
            min: 0.0,
            max: 100.0,
            max_min_ratio: None,
            gini: 0.5,
            top_share: 1.0,
        };
        let json = serde_json::to_value(metrics).unwrap();
        assert!(json["max_min_ratio"].is_null());
    }
}
