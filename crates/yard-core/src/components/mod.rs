//! Components
//!
//! Market state: the population of agent wealth values.

pub mod population;

pub use population::*;
