//! File persistence for player records.
//!
//! Each player is stored as pretty-printed JSON at `<dir>/<discord_id>.json`.
//! Writes go to a temporary file in the same directory and are renamed over
//! the record, so a crash mid-write leaves the previous version intact.

use crate::player::Player;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid record {path}: {reason}")]
    InvalidRecord { path: PathBuf, reason: String },

    #[error("Duplicate record for player {discord_id} in {path}")]
    DuplicateRecord { discord_id: u64, path: PathBuf },
}

/// A directory of player record files.
#[derive(Debug, Clone)]
pub struct RecordDir {
    dir: PathBuf,
}

impl RecordDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Where a player's record lives.
    pub fn record_path(&self, discord_id: u64) -> PathBuf {
        self.dir.join(format!("{discord_id}.json"))
    }

    fn temp_path(&self, discord_id: u64) -> PathBuf {
        self.dir
            .join(format!(".{discord_id}.{}.tmp", Uuid::new_v4().simple()))
    }

    /// Create the directory if it doesn't exist.
    pub async fn ensure(&self) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Write the full record.
    pub async fn write(&self, player: &Player) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(player)?;
        let path = self.record_path(player.discord_id());
        let temp = self.temp_path(player.discord_id());

        if let Err(e) = fs::write(&temp, &content).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp, &path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        debug!(
            player = player.discord_id(),
            skills = player.skills().len(),
            bytes = content.len(),
            "Flushed player record"
        );
        Ok(())
    }

    /// Blocking variant of [`RecordDir::write`], for contexts that cannot await.
    pub fn write_blocking(&self, player: &Player) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(player)?;
        let path = self.record_path(player.discord_id());
        let temp = self.temp_path(player.discord_id());

        if let Err(e) = std::fs::write(&temp, &content) {
            let _ = std::fs::remove_file(&temp);
            return Err(e.into());
        }
        if let Err(e) = std::fs::rename(&temp, &path) {
            let _ = std::fs::remove_file(&temp);
            return Err(e.into());
        }

        debug!(player = player.discord_id(), "Flushed player record (blocking)");
        Ok(())
    }

    /// Read and validate a single record file.
    pub async fn read(&self, path: impl AsRef<Path>) -> Result<Player, PersistError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let player: Player = serde_json::from_str(&content)?;

        player
            .validate()
            .map_err(|reason| PersistError::InvalidRecord {
                path: path.to_path_buf(),
                reason,
            })?;

        Ok(player)
    }

    /// List record files, sorted by path. Temp files are skipped.
    pub async fn record_files(&self) -> Result<Vec<PathBuf>, PersistError> {
        let mut files = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_json = path.extension().map(|e| e == "json").unwrap_or(false);
            let is_hidden = path
                .file_name()
                .map(|n| n.to_string_lossy().starts_with('.'))
                .unwrap_or(true);

            if is_json && !is_hidden && entry.file_type().await?.is_file() {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}
