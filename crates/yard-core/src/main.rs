//! Yard Sale Market Simulation
//!
//! Runs the casino trading model and shows how wealth concentrates even
//! though every trade favours the poorer party. Press Enter to stop early.

use clap::Parser;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use yard_core::config::DEFAULT_CONFIG_PATH;
use yard_core::output::{
    inequality, ChartPrinter, ProgressObserver, SnapshotWriter, StatsCollector, TradeLogger,
    SUMMARY_FILE_NAME, TRADE_LOG_FILE_NAME,
};
use yard_core::{CancelToken, Config, EndReason, ObserverError, Observers, SimError, Simulator};
use yard_events::generate_run_id;

/// Width of the wealth bars, in terminal cells
const CHART_WIDTH: usize = 50;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "yard_sale")]
#[command(about = "Yard sale (casino) wealth concentration simulation")]
struct Args {
    /// TOML config file (defaults to ./yard_sale.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of agents in the market
    #[arg(long)]
    agents: Option<usize>,

    /// Wealth each agent starts with
    #[arg(long)]
    initial_wealth: Option<f64>,

    /// Number of trades to simulate
    #[arg(long)]
    rounds: Option<u64>,

    /// Fraction of the poorer agent's wealth that moves when it gains
    #[arg(long)]
    gain: Option<f64>,

    /// Fraction of the poorer agent's wealth that moves when it loses
    #[arg(long)]
    loss: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for summary, trade log and snapshots
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Interval between wealth snapshots (in rounds)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Print the wealth chart every N rounds (0: only at the end)
    #[arg(long, default_value_t = 0)]
    render_every: u64,

    /// Do not write the per-trade log
    #[arg(long)]
    no_trade_log: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };

    match run(config, args.render_every) {
        Ok(()) => ExitCode::SUCCESS,
        Err(SimError::Config(e)) => {
            error!("Invalid configuration: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("Simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Read the config file, then let command line flags override it
fn load_config(args: &Args) -> Result<Config, yard_core::ConfigError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH)?,
        None => Config::default(),
    };

    let sim = &mut config.simulation;
    if let Some(agents) = args.agents {
        sim.number_of_agents = agents;
    }
    if let Some(wealth) = args.initial_wealth {
        sim.initial_wealth = wealth;
    }
    if let Some(rounds) = args.rounds {
        sim.rounds = rounds;
    }
    if let Some(gain) = args.gain {
        sim.gain_fraction = gain;
    }
    if let Some(loss) = args.loss {
        sim.loss_fraction = loss;
    }
    if args.seed.is_some() {
        sim.seed = args.seed;
    }

    let output = &mut config.output;
    if let Some(dir) = &args.output_dir {
        output.output_dir = dir.clone();
    }
    if let Some(interval) = args.snapshot_interval {
        output.snapshot_interval = interval;
    }
    if args.no_trade_log {
        output.trade_log = false;
    }

    Ok(config)
}

fn run(config: Config, render_every: u64) -> Result<(), SimError> {
    let mut simulator = Simulator::new(config.simulation.clone())?;
    let sim = simulator.config().clone();
    let output = &config.output;
    let run_id = generate_run_id();

    println!("Yard Sale Simulation");
    println!("====================");
    println!("Run: {}", run_id);
    println!("Seed: {}", simulator.seed().unwrap_or_default());
    println!("Agents: {} x {:.1}", sim.number_of_agents, sim.initial_wealth);
    println!("Rounds: {}", sim.rounds);
    println!("Gain/loss: {} / {}", sim.gain_fraction, sim.loss_fraction);
    println!("Press Enter to stop early.");
    println!();

    fs::create_dir_all(&output.output_dir).map_err(ObserverError::from)?;

    let mut snapshots =
        SnapshotWriter::new(&output.output_dir, run_id.as_str(), output.snapshot_interval)
            .map_err(ObserverError::from)?;
    snapshots.capture(0, "simulation_start", simulator.population())?;

    let mut observers = Observers::new()
        .with(ProgressObserver::new(output.progress_interval, sim.rounds))
        .with(
            StatsCollector::new(
                run_id.as_str(),
                simulator.seed(),
                sim.clone(),
                output.progress_interval,
            )
            .write_to(output.output_dir.join(SUMMARY_FILE_NAME)),
        )
        .with(snapshots);
    if output.trade_log {
        let logger = TradeLogger::new(output.output_dir.join(TRADE_LOG_FILE_NAME))
            .map_err(ObserverError::from)?;
        observers.push(logger);
    }
    observers.push(ChartPrinter::new(
        io::stdout(),
        sim.max_possible_wealth(),
        CHART_WIDTH,
        render_every,
    ));

    let cancel = CancelToken::new();
    spawn_stop_listener(cancel.clone());

    let result = simulator.run(&mut observers, &cancel)?;

    let metrics = inequality(simulator.population().as_slice());
    println!();
    match result.end_reason {
        EndReason::Completed => {
            println!("Simulation complete. Ran {} rounds.", result.total_rounds)
        }
        EndReason::Cancelled => {
            println!("Simulation stopped after {} rounds.", result.total_rounds)
        }
    }
    println!("Total wealth: {:.3}", result.total_wealth);
    println!("Gini coefficient: {:.4}", metrics.gini);
    println!("Richest agent holds {:.1}% of all wealth", metrics.top_share * 100.0);
    match metrics.max_min_ratio {
        Some(ratio) => println!("Richest / poorest: {:.1}", ratio),
        None => println!("Richest / poorest: unbounded (an agent is broke)"),
    }
    info!(output_dir = %output.output_dir.display(), "Wrote run output");
    Ok(())
}

/// Cancel the run on the first line read from stdin.
fn spawn_stop_listener(cancel: CancelToken) {
    thread::spawn(move || {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).unwrap_or(0) > 0 {
            cancel.cancel();
        }
    });
}
