//! Error types for the simulation core.

use crate::simulation::SimStatus;

/// Problems with a simulation configuration, detected before any round runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A trade needs two distinct agents.
    #[error("number_of_agents must be at least 2, got {count}")]
    TooFewAgents {
        /// Requested population size.
        count: usize,
    },

    /// Initial wealth is negative, NaN or infinite, or the market total
    /// overflows to infinity.
    #[error("initial_wealth must be a finite value >= 0 with a finite market total, got {value}")]
    InvalidInitialWealth {
        /// Rejected value.
        value: f64,
    },

    /// A fraction lies outside `[0, 1]` or is not finite.
    #[error("{name} must lie in [0, 1], got {value}")]
    FractionOutOfRange {
        /// Field name, `gain_fraction` or `loss_fraction`.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// The poorer agent's downside must stay strictly below its upside.
    #[error("loss_fraction ({loss}) must be strictly less than gain_fraction ({gain})")]
    LossNotBelowGain {
        /// Configured loss fraction.
        loss: f64,
        /// Configured gain fraction.
        gain: f64,
    },

    /// IO error reading a config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a TOML config.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Rejections from the population's single mutation primitive.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransferError {
    #[error("agent {index} cannot trade with itself")]
    SameAgent { index: usize },

    #[error("agent index {index} out of range for population of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("transfer amount {amount} is negative or not finite")]
    InvalidAmount { amount: f64 },

    #[error("transfer of {amount} from agent {index} exceeds its wealth of {wealth}")]
    InsufficientWealth { index: usize, wealth: f64, amount: f64 },
}

/// Failure reported by a round observer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    #[error("observer IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("observer serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("observer failed: {0}")]
    Failed(String),
}

/// Errors that end a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Observer(#[from] ObserverError),

    /// `run` was called on a simulator that already left the ready state.
    #[error("simulator is not ready to run (status: {0:?})")]
    NotReady(SimStatus),
}
