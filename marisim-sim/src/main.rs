//! marisim - maritime NMEA 0183 / AIS traffic simulator
//!
//! Loads a YAML scenario, simulates the configured fleet, and streams the
//! resulting GPS sentences and `!AIVDM` messages to the configured output
//! sinks until the scenario duration elapses or Ctrl+C is received.
//!
//! # Usage
//!
//! ```bash
//! marisim -c scenario.yaml
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use marisim_common::{init_logging_with_filter, ScenarioConfig};
use marisim_sim::SimulationEngine;
use tokio::signal;
use tracing::{error, info};

/// marisim - maritime NMEA/AIS traffic simulator
#[derive(Parser, Debug)]
#[command(name = "marisim")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the scenario file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config_file: String,

    /// Log filter, e.g. "info" or "info,marisim_sim=debug"
    #[arg(short = 'l', long = "log", default_value = "info")]
    log_filter: String,

    /// Validate the scenario and exit without simulating
    #[arg(long = "check")]
    check_only: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging_with_filter(&args.log_filter);

    println!("marisim - maritime NMEA/AIS traffic simulator");
    println!("=============================================");

    match run_simulator(args).await {
        Ok(()) => {
            info!("simulator exited successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("simulator failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_simulator(args: Args) -> Result<()> {
    info!("loading scenario from: {}", args.config_file);
    let config = ScenarioConfig::load_from_file(&args.config_file)
        .with_context(|| format!("failed to load scenario from {}", args.config_file))?;

    info!(
        "scenario loaded: {} vessel(s), {} base station(s), {} aid(s) to navigation, {} output(s)",
        config.vessels.len(),
        config.base_stations.len(),
        config.aids_to_navigation.len(),
        config.outputs.len()
    );

    if args.check_only {
        println!("scenario OK");
        return Ok(());
    }

    let mut engine =
        SimulationEngine::from_scenario(&config).context("failed to build simulation engine")?;
    engine.start().await.context("failed to start simulation")?;

    tokio::select! {
        _ = engine.run() => {
            info!("scenario duration elapsed");
        }
        _ = signal::ctrl_c() => {
            info!("received Ctrl+C, shutting down");
        }
    }

    let stats = engine.statistics();
    engine.shutdown().await;

    println!();
    println!("Simulation summary");
    println!("------------------");
    println!("ticks:          {}", stats.ticks);
    println!("elapsed:        {:.1}s", stats.elapsed.as_secs_f64());
    println!("GPS sentences:  {}", stats.gps_sentences);
    println!("AIS sentences:  {}", stats.ais_sentences);
    println!("errors:         {}", stats.errors);
    if stats.trace_events_dropped > 0 {
        println!("trace drops:    {}", stats.trace_events_dropped);
    }
    for (name, status) in &stats.outputs {
        println!(
            "output {name}: {} sentence(s), {} connection(s)",
            status.sentences_sent, status.connections
        );
    }

    Ok(())
}
