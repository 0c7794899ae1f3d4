//! Periodic progress logging through `tracing`.

use tracing::info;

use crate::components::Population;
use crate::error::ObserverError;
use crate::output::stats::inequality;
use crate::simulation::RoundObserver;
use crate::systems::Trade;

/// Logs round count and inequality every `interval` rounds
pub struct ProgressObserver {
    interval: u64,
    total_rounds: u64,
}

impl ProgressObserver {
    pub fn new(interval: u64, total_rounds: u64) -> Self {
        Self {
            interval,
            total_rounds,
        }
    }
}

impl RoundObserver for ProgressObserver {
    fn on_round(
        &mut self,
        round: u64,
        _: &Trade,
        population: &Population,
    ) -> Result<(), ObserverError> {
        if self.interval == 0 || round % self.interval != 0 {
            return Ok(());
        }

        let metrics = inequality(population.as_slice());
        info!(
            round,
            total = self.total_rounds,
            gini = metrics.gini,
            richest = metrics.max,
            poorest = metrics.min,
            "Round {} / {}",
            round,
            self.total_rounds
        );
        Ok(())
    }
}
