#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Quiver gameplay core without a window.

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Result};
use clap::Parser;
use quiver_cli::{GameConfig, RandomInput, Simulation};
use tracing::info;

/// Runs a seeded headless session and prints the resulting totals.
#[derive(Debug, Parser)]
#[command(name = "quiver", version, about)]
struct Args {
    /// TOML file with tunables and level layout. Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Seed of the random input script.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Tick length in milliseconds.
    #[arg(long, default_value_t = 16)]
    dt_ms: u64,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Entry point for the Quiver command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    if args.dt_ms == 0 {
        bail!("--dt-ms must be greater than zero");
    }

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let mut simulation = Simulation::new(&config)?;
    let dt = Duration::from_millis(args.dt_ms);

    info!(ticks = args.ticks, seed = args.seed, "session started");
    let mut input = RandomInput::new(args.seed);
    for _ in 0..args.ticks {
        let snapshot = input.sample();
        simulation.step(dt, &snapshot);
    }

    let stats = simulation.stats();
    info!(
        jumps = stats.jumps,
        wall_jumps = stats.wall_jumps,
        projectiles = stats.projectiles_spawned,
        kills = stats.enemies_killed,
        "session finished"
    );
    println!("{stats:#?}");
    println!("fingerprint: {:#018x}", simulation.fingerprint());
    Ok(())
}
