//! Round observers.
//!
//! Everything that watches the market (charts, logs, statistics) does so
//! through [`RoundObserver`]. Observers get a shared borrow of the
//! population, so they can read it but never change it, and the simulator
//! cannot start the next round until the observer returns.

use crate::components::Population;
use crate::error::ObserverError;
use crate::simulation::SimulationResult;
use crate::systems::Trade;

/// Callback invoked after each round and once when the run ends.
pub trait RoundObserver {
    /// Called after round `round` (1-based) has been applied.
    fn on_round(
        &mut self,
        round: u64,
        trade: &Trade,
        population: &Population,
    ) -> Result<(), ObserverError>;

    /// Called once after the last round, whether the run completed or was
    /// cancelled.
    fn on_finish(
        &mut self,
        _result: &SimulationResult,
        _population: &Population,
    ) -> Result<(), ObserverError> {
        Ok(())
    }
}

impl<F> RoundObserver for F
where
    F: FnMut(u64, &Trade, &Population) -> Result<(), ObserverError>,
{
    fn on_round(
        &mut self,
        round: u64,
        trade: &Trade,
        population: &Population,
    ) -> Result<(), ObserverError> {
        self(round, trade, population)
    }
}

/// An observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl RoundObserver for NullObserver {
    fn on_round(&mut self, _: u64, _: &Trade, _: &Population) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// Fans each callback out to several observers, in insertion order.
///
/// The first failing observer stops the fan-out and its error is returned.
#[derive(Default)]
pub struct Observers {
    observers: Vec<Box<dyn RoundObserver>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: impl RoundObserver + 'static) -> Self {
        self.push(observer);
        self
    }

    pub fn push(&mut self, observer: impl RoundObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl RoundObserver for Observers {
    fn on_round(
        &mut self,
        round: u64,
        trade: &Trade,
        population: &Population,
    ) -> Result<(), ObserverError> {
        for observer in &mut self.observers {
            observer.as_mut().on_round(round, trade, population)?;
        }
        Ok(())
    }

    fn on_finish(
        &mut self,
        result: &SimulationResult,
        population: &Population,
    ) -> Result<(), ObserverError> {
        for observer in &mut self.observers {
            observer.as_mut().on_finish(result, population)?;
        }
        Ok(())
    }
}
