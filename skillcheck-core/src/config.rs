//! Store configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default directory for player records.
pub const DEFAULT_PLAYERS_DIR: &str = "players";

/// Environment variable overriding the players directory.
pub const PLAYERS_DIR_ENV: &str = "SKILLCHECK_PLAYERS_DIR";

/// Environment variable setting the lock timeout, in milliseconds.
pub const LOCK_TIMEOUT_ENV: &str = "SKILLCHECK_LOCK_TIMEOUT_MS";

/// What to do with a record file that fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Abort the whole load on the first bad file.
    #[default]
    Strict,
    /// Skip bad files and report them.
    SkipMalformed,
}

/// Configuration for opening a [`crate::PlayerStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding one JSON file per player.
    pub players_dir: PathBuf,

    pub load_policy: LoadPolicy,

    /// How long [`crate::PlayerStore::acquire`] waits for a record lock.
    /// `None` waits indefinitely.
    pub lock_timeout: Option<Duration>,
}

impl StoreConfig {
    pub fn new(players_dir: impl Into<PathBuf>) -> Self {
        Self {
            players_dir: players_dir.into(),
            load_policy: LoadPolicy::default(),
            lock_timeout: None,
        }
    }

    /// Build a config from `SKILLCHECK_PLAYERS_DIR` and
    /// `SKILLCHECK_LOCK_TIMEOUT_MS`, falling back to defaults.
    ///
    /// An unparsable timeout is ignored.
    pub fn from_env() -> Self {
        let mut config = match std::env::var(PLAYERS_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Self::new(dir.trim()),
            _ => Self::default(),
        };

        if let Some(ms) = std::env::var(LOCK_TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            config.lock_timeout = Some(Duration::from_millis(ms));
        }

        config
    }

    pub fn with_load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYERS_DIR)
    }
}
