//! Statistics Output
//!
//! Inequality measures over the population, sampled during the run and
//! written as a run summary for analysis.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use yard_events::{InequalityMetrics, TradeBranch};

use crate::components::Population;
use crate::config::SimulationConfig;
use crate::error::ObserverError;
use crate::simulation::{RoundObserver, SimulationResult};
use crate::systems::Trade;

/// Summary file name inside the output directory
pub const SUMMARY_FILE_NAME: &str = "summary.json";

/// Compute inequality measures for a wealth sequence.
pub fn inequality(wealth: &[f64]) -> InequalityMetrics {
    if wealth.is_empty() {
        return InequalityMetrics::default();
    }

    let total: f64 = wealth.iter().sum();
    let n = wealth.len() as f64;
    let min = wealth.iter().copied().fold(f64::INFINITY, f64::min);
    let max = wealth.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    InequalityMetrics {
        mean: total / n,
        min,
        max,
        max_min_ratio: (min > 0.0).then(|| max / min),
        gini: gini(wealth, total),
        top_share: if total > 0.0 { max / total } else { 0.0 },
    }
}

/// Gini coefficient: 0 for perfect equality, `(n - 1) / n` when one agent
/// holds everything.
fn gini(wealth: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }

    let mut sorted = wealth.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, &w)| (2.0 * (i as f64 + 1.0) - n - 1.0) * w)
        .sum();

    weighted / (n * total)
}

/// One sampled point of the inequality history
#[derive(Debug, Clone, Serialize)]
pub struct StatsSample {
    pub round: u64,
    pub gini: f64,
    pub top_share: f64,
    pub max_min_ratio: Option<f64>,
}

/// How often each side of the trade rule fired
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BranchCounts {
    pub poorer_gains: u64,
    pub poorer_loses: u64,
}

/// Everything known about a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub seed: Option<u64>,
    pub config: SimulationConfig,
    pub result: SimulationResult,
    pub initial_metrics: InequalityMetrics,
    pub final_metrics: InequalityMetrics,
    pub final_wealth: Vec<f64>,
    pub branch_counts: BranchCounts,
    /// Sum of all transfer amounts
    pub total_volume: f64,
    pub history: Vec<StatsSample>,
}

/// Observer that accumulates statistics during the run
#[derive(Debug)]
pub struct StatsCollector {
    run_id: String,
    seed: Option<u64>,
    config: SimulationConfig,
    sample_interval: u64,
    initial_metrics: InequalityMetrics,
    branch_counts: BranchCounts,
    total_volume: f64,
    history: Vec<StatsSample>,
    summary_path: Option<PathBuf>,
    summary: Option<RunSummary>,
}

impl StatsCollector {
    /// Sample inequality every `sample_interval` rounds (0 keeps only the
    /// final state).
    pub fn new(
        run_id: impl Into<String>,
        seed: Option<u64>,
        config: SimulationConfig,
        sample_interval: u64,
    ) -> Self {
        let initial = vec![config.initial_wealth; config.number_of_agents];
        Self {
            run_id: run_id.into(),
            seed,
            initial_metrics: inequality(&initial),
            config,
            sample_interval,
            branch_counts: BranchCounts::default(),
            total_volume: 0.0,
            history: Vec::new(),
            summary_path: None,
            summary: None,
        }
    }

    /// Also write the summary as pretty JSON to `path` when the run ends.
    pub fn write_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary_path = Some(path.into());
        self
    }

    pub fn branch_counts(&self) -> BranchCounts {
        self.branch_counts
    }

    pub fn history(&self) -> &[StatsSample] {
        &self.history
    }

    /// The finished summary, available after the run ends.
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    fn sample(&mut self, round: u64, population: &Population) {
        let metrics = inequality(population.as_slice());
        self.history.push(StatsSample {
            round,
            gini: metrics.gini,
            top_share: metrics.top_share,
            max_min_ratio: metrics.max_min_ratio,
        });
    }
}

impl RoundObserver for StatsCollector {
    fn on_round(
        &mut self,
        round: u64,
        trade: &Trade,
        population: &Population,
    ) -> Result<(), ObserverError> {
        match trade.branch {
            TradeBranch::PoorerGains => self.branch_counts.poorer_gains += 1,
            TradeBranch::PoorerLoses => self.branch_counts.poorer_loses += 1,
        }
        self.total_volume += trade.amount;

        if self.sample_interval > 0 && round % self.sample_interval == 0 {
            self.sample(round, population);
        }
        Ok(())
    }

    fn on_finish(
        &mut self,
        result: &SimulationResult,
        population: &Population,
    ) -> Result<(), ObserverError> {
        let summary = RunSummary {
            run_id: self.run_id.clone(),
            seed: self.seed,
            config: self.config.clone(),
            result: result.clone(),
            initial_metrics: self.initial_metrics,
            final_metrics: inequality(population.as_slice()),
            final_wealth: population.as_slice().to_vec(),
            branch_counts: self.branch_counts,
            total_volume: self.total_volume,
            history: self.history.clone(),
        };

        if let Some(path) = &self.summary_path {
            write_summary(&summary, path)?;
        }
        self.summary = Some(summary);
        Ok(())
    }
}

/// Write a run summary as pretty JSON, creating parent directories
pub fn write_summary(summary: &RunSummary, path: impl AsRef<Path>) -> Result<(), ObserverError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)?;
    Ok(())
}
