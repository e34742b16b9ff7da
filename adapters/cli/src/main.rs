#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line runner for the Strata simulation.

mod policy;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use strata_core::MobCategory;
use strata_session::{Session, SessionConfig};
use strata_world::query;

use crate::policy::{Policy, PolicyKind};

/// Runs a simulation session without a window and prints where it ended up.
#[derive(Debug, Parser)]
#[command(name = "strata", version)]
struct Cli {
    /// World seed, overriding the configuration file.
    #[arg(long)]
    seed: Option<u32>,
    /// Ticks to simulate unless the player dies first.
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// TOML session configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Source of the per-tick intent.
    #[arg(long, value_enum, default_value_t = PolicyKind::Idle)]
    policy: PolicyKind,
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long)]
    verbose: bool,
}

/// Entry point for the Strata command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let mut session = Session::new(config).context("building session")?;
    let mut policy = Policy::new(cli.policy, session.seed());
    info!("running {} ticks with the {:?} policy", cli.ticks, cli.policy);

    let mut ticks_run = 0;
    let mut terminated = false;
    for tick in 0..cli.ticks {
        let outcome = session.step(policy.intent(tick));
        ticks_run += 1;
        if outcome.terminated {
            terminated = true;
            break;
        }
    }

    let world = session.world();
    let observation = session.observation();
    let player = query::player(world);
    let mobs = query::mob_view(world);
    let (columns, rows) = query::tile_grid(world).dimensions();
    println!("seed: {}", session.seed());
    println!("ticks: {ticks_run}{}", if terminated { " (player died)" } else { "" });
    println!("observation: {:?}", observation.to_array());
    println!(
        "vitals: health {:.1}, food {:.1}, oxygen {:.1}",
        player.health.value(),
        player.food.value(),
        player.oxygen.value()
    );
    println!(
        "mobs: {} enemies, {} passive, {} projectiles",
        mobs.count(MobCategory::Enemy),
        mobs.count(MobCategory::Passive),
        query::projectiles(world).len()
    );
    println!(
        "world: {columns}x{rows} tiles starting at global column {}",
        query::x_offset(world)
    );
    Ok(())
}
