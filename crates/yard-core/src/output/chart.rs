//! Text bar chart of agents' wealth.

use std::io::Write;

use crate::components::Population;
use crate::error::ObserverError;
use crate::simulation::{RoundObserver, SimulationResult};
use crate::systems::Trade;

/// Upper end of the chart scale.
///
/// Tracks the current richest agent with 5% headroom toward the most any
/// agent could hold, so small differences stay visible early in a run.
pub fn chart_scale(wealth: &[f64], max_possible: f64) -> f64 {
    let current_max = wealth.iter().copied().fold(0.0, f64::max);
    current_max + (max_possible - current_max) * 0.05
}

/// Render one horizontal bar per agent, `width` cells at full scale.
pub fn render_bar_chart(wealth: &[f64], max_possible: f64, width: usize) -> String {
    let scale = chart_scale(wealth, max_possible);
    let mut out = String::new();

    for (i, &w) in wealth.iter().enumerate() {
        let cells = if scale > 0.0 {
            ((w / scale) * width as f64).round().clamp(0.0, width as f64) as usize
        } else {
            0
        };
        let bar = "█".repeat(cells);
        out.push_str(&format!("{:>3} |{:<width$}| {:>3.1}\n", i, bar, w, width = width));
    }
    out
}

/// Observer that prints the chart every `every` rounds and at the end
pub struct ChartPrinter<W: Write> {
    out: W,
    max_possible: f64,
    width: usize,
    every: u64,
}

impl<W: Write> ChartPrinter<W> {
    pub fn new(out: W, max_possible: f64, width: usize, every: u64) -> Self {
        Self {
            out,
            max_possible,
            width,
            every,
        }
    }

    fn draw(&mut self, title: &str, population: &Population) -> std::io::Result<()> {
        writeln!(self.out, "Agents' Wealth ({title})")?;
        write!(
            self.out,
            "{}",
            render_bar_chart(population.as_slice(), self.max_possible, self.width)
        )?;
        self.out.flush()
    }
}

impl<W: Write> RoundObserver for ChartPrinter<W> {
    fn on_round(
        &mut self,
        round: u64,
        _: &Trade,
        population: &Population,
    ) -> Result<(), ObserverError> {
        if self.every > 0 && round % self.every == 0 {
            self.draw(&format!("round {round}"), population)?;
        }
        Ok(())
    }

    fn on_finish(
        &mut self,
        result: &SimulationResult,
        population: &Population,
    ) -> Result<(), ObserverError> {
        self.draw(&format!("final, {} rounds", result.total_rounds), population)?;
        Ok(())
    }
}
