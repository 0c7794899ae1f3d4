//! Output
//!
//! Observers that turn the round stream into logs, files and charts.

pub mod chart;
pub mod logger;
pub mod progress;
pub mod snapshot;
pub mod stats;

pub use chart::{chart_scale, render_bar_chart, ChartPrinter};
pub use logger::{TradeLogger, TRADE_LOG_FILE_NAME};
pub use progress::ProgressObserver;
pub use snapshot::{write_snapshot, SnapshotWriter};
pub use stats::{inequality, write_summary, RunSummary, StatsCollector, SUMMARY_FILE_NAME};
