//! Trade rule
//!
//! Wealth always flows from the first agent of a pair to the second. The
//! amount is a fraction of the poorer agent's wealth, and that fraction is
//! larger when the poorer agent is the one receiving.

use yard_events::TradeBranch;

use crate::components::Population;
use crate::error::{ConfigError, TransferError};

/// The asymmetric gain/loss fractions of the casino model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeRule {
    gain_fraction: f64,
    loss_fraction: f64,
}

/// A transfer that was applied to the population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trade {
    pub loser: usize,
    pub gainer: usize,
    pub amount: f64,
    pub branch: TradeBranch,
}

impl TradeRule {
    /// Requires `0 <= loss_fraction < gain_fraction <= 1`.
    pub fn new(gain_fraction: f64, loss_fraction: f64) -> Result<Self, ConfigError> {
        check_fraction("gain_fraction", gain_fraction)?;
        check_fraction("loss_fraction", loss_fraction)?;
        if loss_fraction >= gain_fraction {
            return Err(ConfigError::LossNotBelowGain {
                loss: loss_fraction,
                gain: gain_fraction,
            });
        }
        Ok(Self {
            gain_fraction,
            loss_fraction,
        })
    }

    pub fn gain_fraction(&self) -> f64 {
        self.gain_fraction
    }

    pub fn loss_fraction(&self) -> f64 {
        self.loss_fraction
    }

    /// Amount that moves from a loser holding `loser_wealth` to a gainer
    /// holding `gainer_wealth`.
    ///
    /// Equal wealth takes the gain branch: only a strictly poorer loser
    /// selects the loss fraction.
    pub fn transfer_amount(&self, loser_wealth: f64, gainer_wealth: f64) -> (f64, TradeBranch) {
        if loser_wealth < gainer_wealth {
            (loser_wealth * self.loss_fraction, TradeBranch::PoorerLoses)
        } else {
            (gainer_wealth * self.gain_fraction, TradeBranch::PoorerGains)
        }
    }

    /// Compute and apply the transfer from `loser` to `gainer`.
    pub fn apply(
        &self,
        population: &mut Population,
        loser: usize,
        gainer: usize,
    ) -> Result<Trade, TransferError> {
        let len = population.len();
        let loser_wealth = population
            .get(loser)
            .ok_or(TransferError::IndexOutOfRange { index: loser, len })?;
        let gainer_wealth = population
            .get(gainer)
            .ok_or(TransferError::IndexOutOfRange { index: gainer, len })?;

        let (amount, branch) = self.transfer_amount(loser_wealth, gainer_wealth);
        population.apply_transfer(loser, gainer, amount)?;

        Ok(Trade {
            loser,
            gainer,
            amount,
            branch,
        })
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::FractionOutOfRange { name, value });
    }
    Ok(())
}
