#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Flash Point hazard simulation to its verdict.

mod scenario_file;
mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flash_point_core::Scenario;
use flash_point_system_ignition::{Config, Ignition, IgnitionRoll};
use flash_point_system_turn::{Idle, TurnDriver};
use flash_point_world::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Deterministic fire, smoke and explosion simulation.
#[derive(Parser, Debug)]
#[command(name = "flash-point")]
#[command(about = "Runs the Flash Point hazard engine until a verdict", long_about = None)]
struct Args {
    /// Seed for the random source driving setup and ignition.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Stops after this many turns even if no verdict was reached.
    #[arg(short = 't', long, default_value_t = 1_000)]
    max_turns: u32,

    /// TOML scenario to load instead of the reference board.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Draws the ignition cell uniformly instead of rolling two dice.
    #[arg(short, long)]
    uniform_ignition: bool,

    /// Caps the number of cells a single cascade may resolve.
    #[arg(long)]
    cascade_limit: Option<u32>,
}

/// Entry point for the Flash Point command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut scenario = match &args.scenario {
        Some(path) => scenario_file::load(path)?,
        None => Scenario::flash_point(),
    };
    if let Some(limit) = args.cascade_limit {
        scenario.rules = scenario.rules.with_cascade_limit(Some(limit));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut world = World::new(&scenario, &mut rng).context("scenario is not a playable board")?;

    let roll = if args.uniform_ignition {
        IgnitionRoll::UniformCell
    } else {
        IgnitionRoll::TwoDice
    };
    let mut driver = TurnDriver::new(Ignition::new(Config::new(roll)));
    info!(seed = args.seed, ?roll, max_turns = args.max_turns, "simulation started");

    while driver.turn() < args.max_turns {
        let report = driver.advance(&mut world, &mut rng, &mut Idle)?;
        if report.terminal.is_some() {
            break;
        }
    }

    println!("{}", summary::render_board(&world));
    println!();
    println!("{}", summary::render_tally(&world, driver.turn()));
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
