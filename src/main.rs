//! Binary entrypoint: runs one simulated working day.
//!
//! Delegates all logic to the library crate.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use barbershop::{Config, DelayRange, LogWriter, Simulation, Subscribe, Tally};
use clap::{ArgAction, Parser};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "barbershop", about = "Sleeping-barber simulation")]
struct Cli {
    /// Path to YAML config file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of barbers
    #[arg(long, value_name = "N")]
    barbers: Option<usize>,

    /// Number of waiting chairs
    #[arg(long, value_name = "N")]
    chairs: Option<usize>,

    /// Length of the working day (e.g. "10s", "1m")
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    open_for: Option<Duration>,

    /// Upper bound of a single haircut
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    service_max: Option<Duration>,

    /// Upper bound of the gap between arrivals
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    arrival_max: Option<Duration>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_yaml_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(n) = self.barbers {
            cfg.workers = n;
        }
        if let Some(n) = self.chairs {
            cfg.capacity = n;
        }
        if let Some(d) = self.open_for {
            cfg.operating = d;
        }
        if let Some(max) = self.service_max {
            cfg.service = DelayRange::new(cfg.service.min.min(max), max);
        }
        if let Some(max) = self.arrival_max {
            cfg.arrival = DelayRange::new(cfg.arrival.min.min(max), max);
        }

        cfg.validate().context("validating configuration")?;
        Ok(cfg)
    }
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(
        format!("barbershop={level}")
            .parse()
            .context("building log filter")?,
    );
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = cli.load_config()?;
    info!(
        barbers = cfg.workers,
        chairs = cfg.capacity,
        open_for = %humantime::format_duration(cfg.operating),
        "opening for the day"
    );

    let tally = Arc::new(Tally::new());
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new()), tally.clone()];

    let report = Simulation::new(cfg)
        .with_subscribers(subs)
        .run()
        .await
        .context("running the shop")?;

    let snap = tally.snapshot();
    info!(
        arrivals = report.arrivals,
        admitted = snap.admitted,
        served = snap.served,
        rejected_full = snap.rejected_full,
        rejected_closed = snap.rejected_closed,
        drained = report.closing.backlog,
        interrupted = report.interrupted,
        "day finished"
    );
    Ok(())
}
