//! Snapshot Generation
//!
//! Writes the full wealth sequence to disk at regular round intervals.

use std::fs;
use std::path::{Path, PathBuf};

use yard_events::{generate_snapshot_id, WealthSnapshot};

use crate::components::Population;
use crate::error::ObserverError;
use crate::output::stats::inequality;
use crate::simulation::{RoundObserver, SimulationResult};
use crate::systems::Trade;

/// Observer that writes periodic wealth snapshots
///
/// Layout under the output directory:
/// `snapshots/snap_NNNNNN.json` for every snapshot, plus
/// `current_state.json`, overwritten each time.
pub struct SnapshotWriter {
    output_dir: PathBuf,
    run_id: String,
    snapshot_interval: u64,
    next_snapshot_id: u64,
}

impl SnapshotWriter {
    /// Snapshot every `snapshot_interval` rounds; 0 writes only the start
    /// and end states.
    pub fn new(
        output_dir: impl Into<PathBuf>,
        run_id: impl Into<String>,
        snapshot_interval: u64,
    ) -> std::io::Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(output_dir.join("snapshots"))?;
        Ok(Self {
            output_dir,
            run_id: run_id.into(),
            snapshot_interval,
            next_snapshot_id: 1,
        })
    }

    pub fn should_snapshot(&self, round: u64) -> bool {
        self.snapshot_interval > 0 && round % self.snapshot_interval == 0
    }

    pub fn snapshot_count(&self) -> u64 {
        self.next_snapshot_id - 1
    }

    /// Build a snapshot of `population` and write it out.
    pub fn capture(
        &mut self,
        round: u64,
        trigger: &str,
        population: &Population,
    ) -> Result<WealthSnapshot, ObserverError> {
        let snapshot = WealthSnapshot {
            snapshot_id: generate_snapshot_id(self.next_snapshot_id),
            run_id: self.run_id.clone(),
            round,
            trigger: trigger.to_string(),
            wealth: population.as_slice().to_vec(),
            total_wealth: population.total_wealth(),
            metrics: inequality(population.as_slice()),
        };
        self.next_snapshot_id += 1;

        let path = self
            .output_dir
            .join("snapshots")
            .join(format!("{}.json", snapshot.snapshot_id));
        write_snapshot(&snapshot, path)?;
        write_snapshot(&snapshot, self.output_dir.join("current_state.json"))?;
        Ok(snapshot)
    }
}

impl RoundObserver for SnapshotWriter {
    fn on_round(
        &mut self,
        round: u64,
        _trade: &Trade,
        population: &Population,
    ) -> Result<(), ObserverError> {
        if self.should_snapshot(round) {
            self.capture(round, "periodic", population)?;
        }
        Ok(())
    }

    fn on_finish(
        &mut self,
        result: &SimulationResult,
        population: &Population,
    ) -> Result<(), ObserverError> {
        self.capture(result.total_rounds, "simulation_end", population)?;
        Ok(())
    }
}

/// Write snapshot to file
pub fn write_snapshot(snapshot: &WealthSnapshot, path: impl AsRef<Path>) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::EndReason;

    #[test]
    fn test_should_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path(), "run", 100).unwrap();
        assert!(!writer.should_snapshot(50));
        assert!(writer.should_snapshot(100));
        assert!(writer.should_snapshot(300));

        let disabled = SnapshotWriter::new(dir.path(), "run", 0).unwrap();
        assert!(!disabled.should_snapshot(100));
    }

    #[test]
    fn test_capture_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SnapshotWriter::new(dir.path(), "run_snap", 10).unwrap();
        let population = Population::initialize(4, 25.0).unwrap();

        writer.capture(0, "simulation_start", &population).unwrap();
        let result = SimulationResult {
            end_reason: EndReason::Completed,
            total_rounds: 0,
            total_wealth: 100.0,
        };
        writer.on_finish(&result, &population).unwrap();

        assert_eq!(writer.snapshot_count(), 2);
        assert!(dir.path().join("snapshots/snap_000001.json").exists());

        let current: WealthSnapshot = serde_json::from_str(
            &fs::read_to_string(dir.path().join("current_state.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(current.snapshot_id, "snap_000002");
        assert_eq!(current.trigger, "simulation_end");
        assert_eq!(current.wealth, vec![25.0; 4]);
    }
}
