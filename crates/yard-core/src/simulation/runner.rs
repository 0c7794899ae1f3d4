//! Simulation loop.
//!
//! [`Simulator`] owns the population and drives it through the configured
//! number of rounds. Each round picks a pair, applies one trade, shows the
//! result to the observer and then polls for cancellation:
//!
//! ```text
//! Ready ──run──▶ Running ──rounds reached──▶ Completed
//!                   │
//!                   └──cancellation seen──▶ Cancelled
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::components::Population;
use crate::config::SimulationConfig;
use crate::error::{ConfigError, SimError};
use crate::simulation::{CancellationSource, RoundObserver};
use crate::systems::{pick_two_random_agents, RandomSource, Trade, TradeRule};
use crate::SimRng;

/// Lifecycle of a simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SimStatus {
    /// Population initialized, no round played yet.
    Ready,
    /// At least one round played, run still in progress.
    Running { round: u64 },
    /// All configured rounds played.
    Completed { rounds: u64 },
    /// Stopped by a cancellation signal. A signal raised during the final
    /// round still ends here, with `rounds` equal to the configured total.
    Cancelled { rounds: u64 },
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Completed,
    Cancelled,
}

/// Result of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub end_reason: EndReason,
    /// Rounds applied to the population.
    pub total_rounds: u64,
    pub total_wealth: f64,
}

/// Drives a population through the round loop.
#[derive(Debug)]
pub struct Simulator<R = SimRng> {
    config: SimulationConfig,
    rule: TradeRule,
    population: Population,
    rng: R,
    seed: Option<u64>,
    round: u64,
    status: SimStatus,
}

impl Simulator<SimRng> {
    /// Build a simulator seeded from `config.seed`, or from entropy when no
    /// seed is configured. The seed in use is available via [`Simulator::seed`].
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut simulator = Self::with_rng(config, SimRng::seeded(seed))?;
        simulator.seed = Some(seed);
        Ok(simulator)
    }
}

impl<R: RandomSource> Simulator<R> {
    /// Build a simulator that draws pairs from `rng`.
    ///
    /// The configuration is validated here; nothing is created if it is
    /// malformed.
    pub fn with_rng(config: SimulationConfig, rng: R) -> Result<Self, ConfigError> {
        let rule = config.trade_rule()?;
        let population = config.population()?;

        Ok(Self {
            config,
            rule,
            population,
            rng,
            seed: None,
            round: 0,
            status: SimStatus::Ready,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn rule(&self) -> &TradeRule {
        &self.rule
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Rounds applied so far.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn status(&self) -> SimStatus {
        self.status
    }

    /// Seed of the built-in RNG; `None` for a caller-supplied source.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Play the configured rounds.
    ///
    /// `cancel` is polled once per round, after `observer` has returned. An
    /// observer failure ends the run and is returned as is.
    pub fn run<O, C>(&mut self, observer: &mut O, cancel: &C) -> Result<SimulationResult, SimError>
    where
        O: RoundObserver + ?Sized,
        C: CancellationSource + ?Sized,
    {
        if self.status != SimStatus::Ready {
            return Err(SimError::NotReady(self.status));
        }

        info!(
            agents = self.population.len(),
            rounds = self.config.rounds,
            gain_fraction = self.rule.gain_fraction(),
            loss_fraction = self.rule.loss_fraction(),
            seed = ?self.seed,
            "Starting simulation"
        );

        let mut end_reason = EndReason::Completed;
        while self.round < self.config.rounds {
            let trade = self.play_round();
            observer.on_round(self.round, &trade, &self.population)?;

            if cancel.is_cancelled() {
                debug!(round = self.round, "Cancellation requested");
                end_reason = EndReason::Cancelled;
                break;
            }
        }

        self.status = match end_reason {
            EndReason::Completed => SimStatus::Completed { rounds: self.round },
            EndReason::Cancelled => SimStatus::Cancelled { rounds: self.round },
        };

        let result = SimulationResult {
            end_reason,
            total_rounds: self.round,
            total_wealth: self.population.total_wealth(),
        };
        observer.on_finish(&result, &self.population)?;

        info!(
            rounds = result.total_rounds,
            reason = ?result.end_reason,
            "Simulation finished"
        );
        Ok(result)
    }

    /// Apply one trade between a random pair.
    ///
    /// Panics if the population rejects the transfer: the trade rule never
    /// asks for more than the loser owns, so a rejection means a logic bug,
    /// and clamping would hide it.
    fn play_round(&mut self) -> Trade {
        let round = self.round + 1;
        let (loser, gainer) = pick_two_random_agents(&mut self.rng, self.population.len());
        let trade = match self.rule.apply(&mut self.population, loser, gainer) {
            Ok(trade) => trade,
            Err(e) => panic!("trade invariant violated in round {round}: {e}"),
        };

        self.round = round;
        self.status = SimStatus::Running { round };
        trade
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObserverError;
    use crate::simulation::{CancelToken, NeverCancel, NullObserver};

    fn config(rounds: u64) -> SimulationConfig {
        SimulationConfig {
            rounds,
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_simulator_is_ready() {
        let simulator = Simulator::new(config(100)).unwrap();
        assert_eq!(simulator.status(), SimStatus::Ready);
        assert_eq!(simulator.round(), 0);
        assert_eq!(simulator.seed(), Some(42));
        assert_eq!(simulator.population().total_wealth(), 1000.0);
    }

    #[test]
    fn test_entropy_seed_is_recorded() {
        let simulator = Simulator::new(SimulationConfig::default()).unwrap();
        assert!(simulator.seed().is_some());
    }

    #[test]
    fn test_run_completes() {
        let mut simulator = Simulator::new(config(250)).unwrap();
        let result = simulator.run(&mut NullObserver, &NeverCancel).unwrap();

        assert_eq!(result.end_reason, EndReason::Completed);
        assert_eq!(result.total_rounds, 250);
        assert_eq!(simulator.status(), SimStatus::Completed { rounds: 250 });
    }

    #[test]
    fn test_zero_rounds_leaves_population_untouched() {
        let mut simulator = Simulator::new(config(0)).unwrap();
        let result = simulator.run(&mut NullObserver, &NeverCancel).unwrap();

        assert_eq!(result.total_rounds, 0);
        assert!(simulator.population().as_slice().iter().all(|&w| w == 100.0));
    }

    #[test]
    fn test_run_twice_is_rejected() {
        let mut simulator = Simulator::new(config(5)).unwrap();
        simulator.run(&mut NullObserver, &NeverCancel).unwrap();
        let err = simulator.run(&mut NullObserver, &NeverCancel).unwrap_err();
        assert!(matches!(err, SimError::NotReady(SimStatus::Completed { rounds: 5 })));
    }

    #[test]
    fn test_observer_sees_running_rounds_in_order() {
        let mut simulator = Simulator::new(config(20)).unwrap();
        let mut seen = Vec::new();
        let mut observer = |round: u64, trade: &Trade, population: &Population| {
            assert_ne!(trade.loser, trade.gainer);
            assert_eq!(population.len(), 10);
            seen.push(round);
            Ok::<(), ObserverError>(())
        };
        simulator.run(&mut observer, &NeverCancel).unwrap();
        assert_eq!(seen, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_cancel_before_run_still_plays_one_round() {
        let token = CancelToken::new();
        token.cancel();

        let mut simulator = Simulator::new(config(100)).unwrap();
        let result = simulator.run(&mut NullObserver, &token).unwrap();
        assert_eq!(result.end_reason, EndReason::Cancelled);
        assert_eq!(result.total_rounds, 1);
    }

    #[test]
    fn test_observer_error_ends_run() {
        let mut simulator = Simulator::new(config(100)).unwrap();
        let mut observer = |round: u64, _: &Trade, _: &Population| {
            if round == 3 {
                return Err(ObserverError::Failed("display closed".into()));
            }
            Ok(())
        };

        let err = simulator.run(&mut observer, &NeverCancel).unwrap_err();
        assert!(matches!(err, SimError::Observer(ObserverError::Failed(_))));
        assert_eq!(simulator.round(), 3);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = SimulationConfig {
            loss_fraction: 0.3,
            ..config(10)
        };
        assert!(matches!(
            Simulator::new(bad),
            Err(ConfigError::LossNotBelowGain { .. })
        ));
    }
}
