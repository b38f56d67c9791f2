//! Register a player, give them a few skills, and roll against each.
//!
//! Run with: `RUST_LOG=debug cargo run -p skillcheck-core --example roll_demo`
//!
//! Records are written under `SKILLCHECK_PLAYERS_DIR` (default `players/`).

use skillcheck_core::{PlayerStore, Skill, StoreConfig};
use tracing_subscriber::EnvFilter;

const DEMO_PLAYER: u64 = 1;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (store, report) = PlayerStore::load(StoreConfig::from_env()).await?;
    println!("=== Loaded {} player record(s) ===\n", report.loaded);

    let handle = match store.get(DEMO_PLAYER).await {
        Some(handle) => handle,
        None => store.register(DEMO_PLAYER, None).await?,
    };

    let mut player = handle.acquire().await;
    player.add_skill(Skill::new("Broadsword", 13)?).await?;
    player.add_skill(Skill::new("Stealth", 9)?).await?;
    player
        .add_skill(Skill::new("Fortune", 10)?.with_crit_success_override(6))
        .await?;

    for skill in player.sorted_skills() {
        let roll = player.roll_skill(skill.name())?;
        println!(
            "{skill} (crit <= {}, fumble >= {}) -> {roll}",
            skill.crit_success_threshold(),
            skill.crit_fail_threshold()
        );
    }

    println!("\nLuck roll on Stealth -> {}", player.luck_roll("stealth")?);

    player.release().await?;
    Ok(())
}
