//! Headless demo: the auto-battle policy plays a seeded match against the CPU and the battle log
//! is printed at the end.
//!
//! Usage: `portfolio-mon [config.ron]`. Set `RUST_LOG=portfolio_mon=debug` for engine traces.

use anyhow::{Context, Result};
use portfolio_mon::{
    BattleConfig, BattleDriver, BattleRunner, Catalog, GamePhase, PacingConfig, TEAM_SIZE,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEMO_SEED: u64 = 2025;

fn load_config() -> Result<BattleConfig> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => BattleConfig::load(&path).with_context(|| format!("loading {}", path))?,
        None => BattleConfig::bundled()?,
    };
    config.seed.get_or_insert(DEMO_SEED);
    // Nobody is watching the animations.
    config.pacing = PacingConfig {
        event_ms: 1,
        faint_ms: 1,
        auto_battle_interval_ms: 5,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = load_config()?;
    let pacing = config.pacing;
    let catalog = Arc::new(Catalog::standard()?.clone());
    let roster: Vec<u32> = catalog.mons().iter().take(TEAM_SIZE).map(|mon| mon.id).collect();

    let mut driver = BattleDriver::new(BattleRunner::new(catalog, config)?, pacing);
    driver
        .with_runner(|runner| {
            runner.confirm_team(&roster)?;
            runner.start_battle()
        })
        .await?;

    driver.toggle_auto_battle().await?;
    let mut snapshots = driver.subscribe();
    snapshots
        .wait_for(|session| session.phase == GamePhase::GameOver || !session.auto_battle)
        .await
        .context("battle driver stopped")?;

    let session = driver.snapshot().await;
    for line in &session.log {
        println!("{}", line);
    }
    if session.phase != GamePhase::GameOver {
        println!("(auto-battle stopped on turn {})", session.turn_number);
    }
    Ok(())
}
