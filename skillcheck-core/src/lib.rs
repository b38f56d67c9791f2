//! Player skill records and 3d6 skill checks.
//!
//! This crate provides:
//! - Skills with derived critical thresholds
//! - Roll-under 3d6 checks with four outcome tiers, plus best-of-N luck rolls
//! - A file-backed player store with one lock per record
//! - Skill import from spreadsheet rows
//!
//! # Quick Start
//!
//! ```ignore
//! use skillcheck_core::{PlayerStore, Skill, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (store, _report) = PlayerStore::load(StoreConfig::from_env()).await?;
//!
//!     let handle = match store.get(1234).await {
//!         Some(handle) => handle,
//!         None => store.register(1234, None).await?,
//!     };
//!
//!     let mut player = handle.acquire().await;
//!     player.add_skill(Skill::new("Broadsword", 13)?).await?;
//!     println!("{}", player.roll_skill("broadsword")?);
//!     player.release().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod persist;
pub mod player;
pub mod roll;
pub mod sheet;
pub mod skill;
pub mod store;

// Primary public API
pub use config::{LoadPolicy, StoreConfig};
pub use persist::PersistError;
pub use player::{Player, PlayerError, Timer};
pub use roll::{Roll, RollError, RollOutcome};
pub use sheet::{import_skills, SheetError, SheetImport};
pub use skill::{canonical_name, Difficulty, Skill, SkillError};
pub use store::{LoadReport, PlayerGuard, PlayerHandle, PlayerStore, StoreError};
