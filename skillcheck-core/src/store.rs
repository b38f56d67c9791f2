//! The player record store.
//!
//! [`PlayerStore`] maps discord ids to [`PlayerHandle`]s. A handle guards one
//! [`Player`] with an async mutex; [`PlayerHandle::acquire`] yields a
//! [`PlayerGuard`] giving exclusive access until it is released or dropped.
//!
//! Every mutation made through a guard is flushed to disk before the method
//! returns, and releasing the guard flushes once more. If a guard is dropped
//! without [`PlayerGuard::release`] (an early `?` return, a panic), the drop
//! performs a blocking flush so the record still reaches disk and the lock
//! is still freed.
//!
//! # Example
//!
//! ```ignore
//! use skillcheck_core::{PlayerStore, Skill, StoreConfig};
//!
//! let (store, _report) = PlayerStore::load(StoreConfig::new("players")).await?;
//! let handle = store.register(1234, None).await?;
//!
//! let mut player = handle.acquire().await;
//! player.add_skill(Skill::new("Stealth", 12)?).await?;
//! let roll = player.roll_skill("stealth")?;
//! player.release().await?;
//! ```

use crate::config::{LoadPolicy, StoreConfig};
use crate::persist::{PersistError, RecordDir};
use crate::player::{Player, PlayerError, Timer};
use crate::roll::Roll;
use crate::skill::Skill;
use std::collections::HashMap;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{info, warn};

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Player {0} is already registered")]
    AlreadyRegistered(u64),

    #[error("Player {0} is not registered")]
    PlayerNotFound(u64),

    #[error("Timed out after {timeout:?} waiting for player {discord_id}")]
    LockTimeout { discord_id: u64, timeout: Duration },

    #[error("Storage error: {0}")]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Player(#[from] PlayerError),
}

/// Shared, lockable access to one player record.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    discord_id: u64,
    player: Arc<Mutex<Player>>,
    records: Arc<RecordDir>,
}

impl PlayerHandle {
    fn new(player: Player, records: Arc<RecordDir>) -> Self {
        Self {
            discord_id: player.discord_id(),
            player: Arc::new(Mutex::new(player)),
            records,
        }
    }

    pub fn discord_id(&self) -> u64 {
        self.discord_id
    }

    /// Wait for exclusive access to the record.
    pub async fn acquire(&self) -> PlayerGuard {
        let player = Arc::clone(&self.player).lock_owned().await;
        PlayerGuard {
            player,
            records: Arc::clone(&self.records),
            released: false,
        }
    }

    /// Like [`PlayerHandle::acquire`], giving up after `timeout`.
    pub async fn acquire_timeout(&self, timeout: Duration) -> Result<PlayerGuard, StoreError> {
        tokio::time::timeout(timeout, self.acquire())
            .await
            .map_err(|_| StoreError::LockTimeout {
                discord_id: self.discord_id,
                timeout,
            })
    }

    /// Acquire, run `f` on the player, flush, and release.
    ///
    /// Use this for several edits with one write, e.g. adding skills and a
    /// timer together. The flush happens whatever `f` returns.
    pub async fn with_player<T>(
        &self,
        f: impl FnOnce(&mut Player) -> T,
    ) -> Result<T, PersistError> {
        let mut guard = self.acquire().await;
        let result = f(guard.player_mut());
        guard.release().await?;
        Ok(result)
    }
}

/// Exclusive access to a player record.
///
/// Derefs to [`Player`] for reads. Mutating methods flush before returning.
///
/// Finish with [`release`](Self::release). A guard that is dropped instead
/// still flushes, but with blocking `std::fs` calls on the current thread,
/// and a failure there can only be logged.
#[derive(Debug)]
pub struct PlayerGuard {
    player: OwnedMutexGuard<Player>,
    records: Arc<RecordDir>,
    // Set by `release` so the drop doesn't flush a second time.
    released: bool,
}

impl PlayerGuard {
    fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Write the full record to disk.
    pub async fn flush(&self) -> Result<(), PersistError> {
        self.records.write(&self.player).await
    }

    async fn mutate<T>(&mut self, f: impl FnOnce(&mut Player) -> T) -> Result<T, PlayerError> {
        let result = f(self.player_mut());
        self.flush().await?;
        Ok(result)
    }

    /// Insert or replace a skill. Returns the skill it replaced, if any.
    pub async fn add_skill(&mut self, skill: Skill) -> Result<Option<Skill>, PlayerError> {
        self.mutate(|p| p.insert_skill(skill)).await
    }

    /// Build a skill from a name and rating, then add it.
    pub async fn set_skill_value(
        &mut self,
        name: &str,
        value: i32,
    ) -> Result<Option<Skill>, PlayerError> {
        let skill = Skill::new(name, value)?;
        self.add_skill(skill).await
    }

    /// Remove a skill by name, in any case. Nothing is written if it is absent.
    pub async fn remove_skill(&mut self, name: &str) -> Result<Skill, PlayerError> {
        let removed = self.player_mut().take_skill(name)?;
        self.flush().await?;
        Ok(removed)
    }

    /// Replace every skill, e.g. after a sheet import.
    pub async fn set_skills(
        &mut self,
        skills: impl IntoIterator<Item = Skill>,
    ) -> Result<(), PlayerError> {
        self.mutate(|p| p.replace_skills(skills)).await
    }

    pub async fn set_google_sheets_id(
        &mut self,
        sheet_id: Option<String>,
    ) -> Result<(), PlayerError> {
        self.mutate(|p| p.google_sheets_id = sheet_id).await
    }

    pub async fn add_timer(&mut self, timer: Timer) -> Result<(), PlayerError> {
        self.mutate(|p| p.push_timer(timer)).await
    }

    /// Roll against a skill. Does not write.
    pub fn roll_skill(&self, name: &str) -> Result<Roll, PlayerError> {
        self.player.roll_skill(name)
    }

    /// Best-of-three roll against a skill. Does not write.
    pub fn luck_roll(&self, name: &str) -> Result<Roll, PlayerError> {
        self.player.luck_roll(name)
    }

    /// Flush and give up exclusive access.
    ///
    /// The lock is freed even if the flush fails.
    pub async fn release(mut self) -> Result<(), PersistError> {
        let result = self.flush().await;
        self.released = true;
        result
    }
}

impl Deref for PlayerGuard {
    type Target = Player;

    fn deref(&self) -> &Player {
        &self.player
    }
}

impl Drop for PlayerGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        if let Err(e) = self.records.write_blocking(&self.player) {
            warn!(
                player = self.player.discord_id(),
                error = %e,
                "Failed to flush player record on drop"
            );
        }
    }
}

/// A record file that was skipped during a lenient load.
#[derive(Debug)]
pub struct SkippedRecord {
    pub path: PathBuf,
    pub error: PersistError,
}

/// Summary of a store load.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// All known players, keyed by discord id.
#[derive(Debug)]
pub struct PlayerStore {
    records: Arc<RecordDir>,
    players: RwLock<HashMap<u64, PlayerHandle>>,
    lock_timeout: Option<Duration>,
}

impl PlayerStore {
    /// Load every record in the configured directory, creating it if needed.
    pub async fn load(config: StoreConfig) -> Result<(Self, LoadReport), StoreError> {
        let records = Arc::new(RecordDir::new(&config.players_dir));
        records.ensure().await?;

        let mut players: HashMap<u64, PlayerHandle> = HashMap::new();
        let mut report = LoadReport::default();

        for path in records.record_files().await? {
            let result = match records.read(&path).await {
                Ok(player) if players.contains_key(&player.discord_id()) => {
                    Err(PersistError::DuplicateRecord {
                        discord_id: player.discord_id(),
                        path: path.clone(),
                    })
                }
                other => other,
            };

            match (result, config.load_policy) {
                (Ok(player), _) => {
                    let handle = PlayerHandle::new(player, Arc::clone(&records));
                    players.insert(handle.discord_id(), handle);
                    report.loaded += 1;
                }
                (Err(error), LoadPolicy::Strict) => return Err(error.into()),
                (Err(error), LoadPolicy::SkipMalformed) => {
                    warn!(path = %path.display(), error = %error, "Skipping malformed player record");
                    report.skipped.push(SkippedRecord { path, error });
                }
            }
        }

        info!(
            dir = %records.path().display(),
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "Loaded player records"
        );

        let store = Self {
            records,
            players: RwLock::new(players),
            lock_timeout: config.lock_timeout,
        };
        Ok((store, report))
    }

    pub async fn get(&self, discord_id: u64) -> Option<PlayerHandle> {
        self.players.read().await.get(&discord_id).cloned()
    }

    pub async fn contains(&self, discord_id: u64) -> bool {
        self.players.read().await.contains_key(&discord_id)
    }

    pub async fn len(&self) -> usize {
        self.players.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.players.read().await.is_empty()
    }

    /// Registered ids, ascending.
    pub async fn ids(&self) -> Vec<u64> {
        let mut ids: Vec<_> = self.players.read().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Create and persist a new player.
    ///
    /// The check and the insert happen under one write lock, so concurrent
    /// registrations for the same id cannot both succeed. The record is
    /// written before it becomes visible; if that write fails nothing is
    /// inserted.
    pub async fn register(
        &self,
        discord_id: u64,
        google_sheets_id: Option<String>,
    ) -> Result<PlayerHandle, StoreError> {
        // Held across the file write: lookups for other players wait for it.
        let mut players = self.players.write().await;
        if players.contains_key(&discord_id) {
            return Err(StoreError::AlreadyRegistered(discord_id));
        }

        let player = Player::new(discord_id, google_sheets_id);
        self.records.write(&player).await?;

        let handle = PlayerHandle::new(player, Arc::clone(&self.records));
        players.insert(discord_id, handle.clone());
        info!(player = discord_id, "Registered player");

        Ok(handle)
    }

    /// Look up a player and wait for its lock, honouring the configured timeout.
    pub async fn acquire(&self, discord_id: u64) -> Result<PlayerGuard, StoreError> {
        let handle = self
            .get(discord_id)
            .await
            .ok_or(StoreError::PlayerNotFound(discord_id))?;

        match self.lock_timeout {
            Some(timeout) => handle.acquire_timeout(timeout).await,
            None => Ok(handle.acquire().await),
        }
    }
}
