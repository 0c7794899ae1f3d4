//! Systems
//!
//! Per-round logic: who trades, and how much moves.

pub mod selection;
pub mod trade;

pub use selection::{pick_two_random_agents, RandomSource};
pub use trade::{Trade, TradeRule};
