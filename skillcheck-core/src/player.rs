//! Player records: identity, skills, and timers.
//!
//! A [`Player`] is plain data. Mutations that must reach disk go through
//! [`crate::store::PlayerGuard`], which flushes after each one.

use crate::persist::PersistError;
use crate::roll::{self, Roll};
use crate::skill::{canonical_name, Skill, SkillError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from player record operations.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Skill not found: {0}")]
    SkillNotFound(String),

    #[error("Invalid skill: {0}")]
    Validation(#[from] SkillError),

    #[error("Record changed in memory but not flushed: {0}")]
    Persist(#[from] PersistError),
}

/// A pending reminder attached to a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub description: String,

    /// Unix timestamp, seconds.
    pub trigger_time: i64,
}

impl Timer {
    pub fn new(description: impl Into<String>, trigger_time: i64) -> Self {
        Self {
            description: description.into(),
            trigger_time,
        }
    }
}

/// A registered player and their skills.
///
/// The mutators here only change memory. Stored records are changed through
/// [`PlayerGuard`](crate::PlayerGuard) or
/// [`PlayerHandle::with_player`](crate::PlayerHandle::with_player), which write
/// the record afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    discord_id: u64,

    /// Spreadsheet the skills were imported from, if any.
    pub google_sheets_id: Option<String>,

    /// Skills keyed by canonical name.
    skills: HashMap<String, Skill>,

    #[serde(default)]
    timers: Vec<Timer>,
}

impl Player {
    pub fn new(discord_id: u64, google_sheets_id: Option<String>) -> Self {
        Self {
            discord_id,
            google_sheets_id,
            skills: HashMap::new(),
            timers: Vec::new(),
        }
    }

    pub fn discord_id(&self) -> u64 {
        self.discord_id
    }

    pub fn skills(&self) -> &HashMap<String, Skill> {
        &self.skills
    }

    /// Look up a skill by name, in any case.
    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.get(&canonical_name(name))
    }

    /// Skills sorted by canonical name, for stable listings.
    pub fn sorted_skills(&self) -> Vec<&Skill> {
        let mut skills: Vec<_> = self.skills.values().collect();
        skills.sort_by_key(|s| s.canonical_name());
        skills
    }

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    /// Insert or replace a skill under its canonical name.
    pub fn insert_skill(&mut self, skill: Skill) -> Option<Skill> {
        self.skills.insert(skill.canonical_name(), skill)
    }

    pub fn take_skill(&mut self, name: &str) -> Result<Skill, PlayerError> {
        let key = canonical_name(name);
        self.skills
            .remove(&key)
            .ok_or(PlayerError::SkillNotFound(key))
    }

    /// Replace all skills. Later duplicates overwrite earlier ones.
    pub fn replace_skills(&mut self, skills: impl IntoIterator<Item = Skill>) {
        self.skills = skills
            .into_iter()
            .map(|skill| (skill.canonical_name(), skill))
            .collect();
    }

    pub fn push_timer(&mut self, timer: Timer) {
        self.timers.push(timer);
    }

    /// Roll a check against the named skill.
    pub fn roll_skill(&self, name: &str) -> Result<Roll, PlayerError> {
        self.skill(name)
            .map(roll::roll)
            .ok_or_else(|| PlayerError::SkillNotFound(canonical_name(name)))
    }

    /// Best of [`roll::LUCK_ROLLS`] checks against the named skill.
    pub fn luck_roll(&self, name: &str) -> Result<Roll, PlayerError> {
        self.skill(name)
            .map(roll::luck_roll)
            .ok_or_else(|| PlayerError::SkillNotFound(canonical_name(name)))
    }

    /// Check invariants that deserialization alone cannot enforce.
    pub fn validate(&self) -> Result<(), String> {
        for (key, skill) in &self.skills {
            if skill.name().trim().is_empty() {
                return Err(format!("skill under key {key:?} has an empty name"));
            }
            if skill.name() != skill.name().trim() {
                return Err(format!(
                    "skill name {:?} has surrounding whitespace",
                    skill.name()
                ));
            }
            if *key != skill.canonical_name() {
                return Err(format!(
                    "skill {:?} stored under key {key:?}",
                    skill.name()
                ));
            }
        }
        Ok(())
    }
}
