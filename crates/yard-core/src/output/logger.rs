//! Trade Logger
//!
//! Append-only JSONL trade logging.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use yard_events::{generate_event_id, TradeEvent};

use crate::components::Population;
use crate::error::ObserverError;
use crate::simulation::{RoundObserver, SimulationResult};
use crate::systems::Trade;

/// Trade log file name inside the output directory
pub const TRADE_LOG_FILE_NAME: &str = "trades.jsonl";

/// Observer that writes one JSON line per trade
pub struct TradeLogger {
    writer: Option<BufWriter<File>>,
    event_count: u64,
    next_event_id: u64,
}

impl TradeLogger {
    /// Create a new trade logger writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            event_count: 0,
            next_event_id: 1,
        })
    }

    /// Create a logger that discards events (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            event_count: 0,
            next_event_id: 1,
        }
    }

    /// Generate the next event ID
    pub fn next_id(&mut self) -> String {
        let id = generate_event_id(self.next_event_id);
        self.next_event_id += 1;
        id
    }

    /// Get the current event count
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Log an event to the file
    pub fn log(&mut self, event: &TradeEvent) -> Result<(), ObserverError> {
        self.event_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(event)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl RoundObserver for TradeLogger {
    fn on_round(
        &mut self,
        round: u64,
        trade: &Trade,
        population: &Population,
    ) -> Result<(), ObserverError> {
        let event = TradeEvent {
            event_id: self.next_id(),
            round,
            loser: trade.loser,
            gainer: trade.gainer,
            amount: trade.amount,
            branch: trade.branch,
            loser_wealth: population.get(trade.loser).unwrap_or_default(),
            gainer_wealth: population.get(trade.gainer).unwrap_or_default(),
        };
        self.log(&event)
    }

    fn on_finish(&mut self, _: &SimulationResult, _: &Population) -> Result<(), ObserverError> {
        self.flush()?;
        Ok(())
    }
}

impl Drop for TradeLogger {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::EndReason;
    use crate::systems::TradeRule;
    use approx::assert_relative_eq;
    use std::fs;
    use yard_events::TradeBranch;

    #[test]
    fn test_null_logger_counts_without_writing() {
        let mut logger = TradeLogger::null();
        let mut population = Population::from_wealth(vec![100.0, 50.0]).unwrap();
        let trade = TradeRule::new(0.2, 0.17)
            .unwrap()
            .apply(&mut population, 0, 1)
            .unwrap();

        logger.on_round(1, &trade, &population).unwrap();
        logger.on_round(2, &trade, &population).unwrap();
        assert_eq!(logger.event_count(), 2);
        assert_eq!(logger.next_id(), "evt_00000003");
    }

    #[test]
    fn test_writes_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TRADE_LOG_FILE_NAME);
        let mut logger = TradeLogger::new(&path).unwrap();

        let mut population = Population::from_wealth(vec![50.0, 100.0]).unwrap();
        let rule = TradeRule::new(0.2, 0.17).unwrap();
        let trade = rule.apply(&mut population, 0, 1).unwrap();
        logger.on_round(1, &trade, &population).unwrap();

        let result = SimulationResult {
            end_reason: EndReason::Completed,
            total_rounds: 1,
            total_wealth: population.total_wealth(),
        };
        logger.on_finish(&result, &population).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let events: Vec<TradeEvent> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_id, "evt_00000001");
        assert_eq!(events[0].branch, TradeBranch::PoorerLoses);
        assert_relative_eq!(events[0].loser_wealth, 41.5);
        assert_relative_eq!(events[0].gainer_wealth, 108.5);
    }
}
