//! Yard Sale Market Simulation Library
//!
//! A closed market of agents that trade in random pairs. Every trade moves a
//! fraction of the poorer party's wealth, with a better deal for the poorer
//! party when it gains than when it loses, and wealth still concentrates.
//!
//! Public API for the simulation engine.

use rand::rngs::SmallRng;
use rand::SeedableRng;

pub mod components;
pub mod config;
pub mod error;
pub mod output;
pub mod simulation;
pub mod systems;

pub use components::Population;
pub use config::{Config, OutputConfig, SimulationConfig};
pub use error::{ConfigError, ObserverError, SimError, TransferError};
pub use simulation::{
    CancelToken, CancellationSource, EndReason, NeverCancel, NullObserver, Observers,
    RoundObserver, SimStatus, SimulationResult, Simulator,
};
pub use systems::{pick_two_random_agents, RandomSource, Trade, TradeRule};

/// Seeded random number generator
#[derive(Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    /// A generator that replays the same sequence for the same seed.
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}
