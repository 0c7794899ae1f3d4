//! Shared event types and serialization for the yard sale simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! The simulation core writes them; analysis and charting tools read them.

pub mod event;
pub mod snapshot;

// Re-export event types
pub use event::{generate_event_id, generate_run_id, TradeBranch, TradeEvent};

// Re-export snapshot types
pub use snapshot::{generate_snapshot_id, InequalityMetrics, WealthSnapshot};
