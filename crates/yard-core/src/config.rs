//! Configuration System
//!
//! Market parameters and output settings, loadable from a TOML file so runs
//! can be adjusted without recompiling. Defaults reproduce the classic
//! ten-agent casino market.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::components::Population;
use crate::error::ConfigError;
use crate::systems::TradeRule;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "yard_sale.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub output: OutputConfig,
}

/// Market parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of agents in the market
    pub number_of_agents: usize,
    /// Wealth every agent starts with
    pub initial_wealth: f64,
    /// How many trades to simulate
    pub rounds: u64,
    /// Fraction of the poorer agent's wealth that moves when it gains
    pub gain_fraction: f64,
    /// Fraction of the poorer agent's wealth that moves when it loses
    pub loss_fraction: f64,
    /// Random seed; `None` draws one from entropy
    pub seed: Option<u64>,
}

/// Where and how often results are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
    /// Rounds between wealth snapshots; 0 disables periodic snapshots
    pub snapshot_interval: u64,
    /// Rounds between progress log lines and statistics samples
    pub progress_interval: u64,
    /// Write every trade to `trades.jsonl`
    pub trade_log: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            number_of_agents: 10,
            initial_wealth: 100.0,
            rounds: 10_000,
            gain_fraction: 0.20,
            loss_fraction: 0.17,
            seed: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            snapshot_interval: 1000,
            progress_interval: 1000,
            trade_log: true,
        }
    }
}

impl SimulationConfig {
    /// Check every constraint without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.trade_rule()?;
        self.population()?;
        Ok(())
    }

    /// The validated gain/loss rule.
    pub fn trade_rule(&self) -> Result<TradeRule, ConfigError> {
        TradeRule::new(self.gain_fraction, self.loss_fraction)
    }

    /// The starting population.
    pub fn population(&self) -> Result<Population, ConfigError> {
        Population::initialize(self.number_of_agents, self.initial_wealth)
    }

    /// Largest wealth any single agent could hold: everything in the market.
    pub fn max_possible_wealth(&self) -> f64 {
        self.initial_wealth * self.number_of_agents as f64
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from `path`, or use defaults if it cannot be read
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", path.display(), e);
            Self::default()
        })
    }
}
