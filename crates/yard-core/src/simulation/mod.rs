//! Simulation
//!
//! The round loop and the contracts it uses to talk to the outside world.

pub mod cancel;
pub mod observer;
pub mod runner;

pub use cancel::{CancelToken, CancellationSource, NeverCancel};
pub use observer::{NullObserver, Observers, RoundObserver};
pub use runner::{EndReason, SimStatus, SimulationResult, Simulator};
