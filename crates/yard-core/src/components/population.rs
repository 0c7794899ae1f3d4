//! Population
//!
//! The ordered wealth values of every agent in the market. An agent has no
//! identity beyond its index in this sequence.

use serde::Serialize;

use crate::error::{ConfigError, TransferError};

/// Wealth of every agent, indexed `0..len()`.
///
/// The length is fixed at construction and [`Population::apply_transfer`] is
/// the only way to change a value, so the no-debt and conservation invariants
/// are enforced in one place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Population {
    wealth: Vec<f64>,
}

impl Population {
    /// Create `count` agents, each owning `initial_wealth`.
    ///
    /// The market total must stay finite so no trade can produce an
    /// infinite amount.
    pub fn initialize(count: usize, initial_wealth: f64) -> Result<Self, ConfigError> {
        if count < 2 {
            return Err(ConfigError::TooFewAgents { count });
        }
        if !initial_wealth.is_finite()
            || initial_wealth < 0.0
            || !(initial_wealth * count as f64).is_finite()
        {
            return Err(ConfigError::InvalidInitialWealth {
                value: initial_wealth,
            });
        }

        Ok(Self {
            wealth: vec![initial_wealth; count],
        })
    }

    /// Build a population from explicit wealth values.
    ///
    /// Used to set up specific trade scenarios; the same constraints as
    /// [`Population::initialize`] apply to every value.
    pub fn from_wealth(wealth: Vec<f64>) -> Result<Self, ConfigError> {
        if wealth.len() < 2 {
            return Err(ConfigError::TooFewAgents { count: wealth.len() });
        }
        if let Some(&value) = wealth.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(ConfigError::InvalidInitialWealth { value });
        }
        let total: f64 = wealth.iter().sum();
        if !total.is_finite() {
            return Err(ConfigError::InvalidInitialWealth { value: total });
        }
        Ok(Self { wealth })
    }

    /// Wealth of agent `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.wealth.get(index).copied()
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.wealth.len()
    }

    /// Always false; a population holds at least two agents.
    pub fn is_empty(&self) -> bool {
        self.wealth.is_empty()
    }

    /// Sum of all wealth. Constant across rounds up to float rounding.
    pub fn total_wealth(&self) -> f64 {
        self.wealth.iter().sum()
    }

    /// Read-only view of every agent's wealth.
    pub fn as_slice(&self) -> &[f64] {
        &self.wealth
    }

    /// Move `amount` from `loser` to `gainer`.
    ///
    /// Rejects the transfer and leaves the population untouched if the
    /// indices are equal or out of range, if `amount` is negative or not
    /// finite, or if the loser would end up below zero.
    pub fn apply_transfer(
        &mut self,
        loser: usize,
        gainer: usize,
        amount: f64,
    ) -> Result<(), TransferError> {
        let len = self.wealth.len();
        for index in [loser, gainer] {
            if index >= len {
                return Err(TransferError::IndexOutOfRange { index, len });
            }
        }
        if loser == gainer {
            return Err(TransferError::SameAgent { index: loser });
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(TransferError::InvalidAmount { amount });
        }

        let loser_wealth = self.wealth[loser];
        let remaining = loser_wealth - amount;
        if remaining < 0.0 {
            return Err(TransferError::InsufficientWealth {
                index: loser,
                wealth: loser_wealth,
                amount,
            });
        }

        self.wealth[loser] = remaining;
        self.wealth[gainer] += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize() {
        let population = Population::initialize(10, 100.0).unwrap();
        assert_eq!(population.len(), 10);
        assert!(population.as_slice().iter().all(|&w| w == 100.0));
        assert_eq!(population.total_wealth(), 1000.0);
    }

    #[test]
    fn test_initialize_rejects_single_agent() {
        assert!(matches!(
            Population::initialize(1, 100.0),
            Err(ConfigError::TooFewAgents { count: 1 })
        ));
    }

    #[test]
    fn test_initialize_rejects_negative_wealth() {
        assert!(matches!(
            Population::initialize(5, -1.0),
            Err(ConfigError::InvalidInitialWealth { .. })
        ));
        assert!(Population::initialize(5, f64::NAN).is_err());
    }

    #[test]
    fn test_initialize_rejects_overflowing_total() {
        assert!(matches!(
            Population::initialize(10, 1e308),
            Err(ConfigError::InvalidInitialWealth { value }) if value == 1e308
        ));
        assert!(Population::initialize(2, f64::MAX).is_err());
        assert!(Population::initialize(10, 1e307).is_ok());
    }

    #[test]
    fn test_from_wealth_rejects_overflowing_total() {
        assert!(matches!(
            Population::from_wealth(vec![f64::MAX, f64::MAX]),
            Err(ConfigError::InvalidInitialWealth { value }) if value.is_infinite()
        ));
    }

    #[test]
    fn test_zero_initial_wealth_is_allowed() {
        let population = Population::initialize(3, 0.0).unwrap();
        assert_eq!(population.total_wealth(), 0.0);
    }

    #[test]
    fn test_get_out_of_range() {
        let population = Population::initialize(2, 1.0).unwrap();
        assert_eq!(population.get(1), Some(1.0));
        assert_eq!(population.get(2), None);
    }

    #[test]
    fn test_apply_transfer_moves_wealth() {
        let mut population = Population::from_wealth(vec![100.0, 50.0]).unwrap();
        population.apply_transfer(0, 1, 10.0).unwrap();
        assert_eq!(population.as_slice(), &[90.0, 60.0]);
        assert_eq!(population.total_wealth(), 150.0);
    }

    #[test]
    fn test_apply_transfer_full_wealth_reaches_zero() {
        let mut population = Population::from_wealth(vec![5.0, 5.0]).unwrap();
        population.apply_transfer(1, 0, 5.0).unwrap();
        assert_eq!(population.as_slice(), &[10.0, 0.0]);
    }

    #[test]
    fn test_apply_transfer_rejects_debt() {
        let mut population = Population::from_wealth(vec![5.0, 5.0]).unwrap();
        let err = population.apply_transfer(0, 1, 5.5).unwrap_err();
        assert!(matches!(err, TransferError::InsufficientWealth { index: 0, .. }));
        assert_eq!(population.as_slice(), &[5.0, 5.0]);
    }

    #[test]
    fn test_apply_transfer_rejects_bad_indices() {
        let mut population = Population::initialize(3, 10.0).unwrap();
        assert_eq!(
            population.apply_transfer(1, 1, 1.0),
            Err(TransferError::SameAgent { index: 1 })
        );
        assert_eq!(
            population.apply_transfer(0, 3, 1.0),
            Err(TransferError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            population.apply_transfer(7, 0, 1.0),
            Err(TransferError::IndexOutOfRange { index: 7, len: 3 })
        );
        assert_eq!(population.total_wealth(), 30.0);
    }

    #[test]
    fn test_apply_transfer_rejects_invalid_amount() {
        let mut population = Population::initialize(2, 10.0).unwrap();
        assert!(matches!(
            population.apply_transfer(0, 1, -1.0),
            Err(TransferError::InvalidAmount { .. })
        ));
        assert!(population.apply_transfer(0, 1, f64::INFINITY).is_err());
    }
}
