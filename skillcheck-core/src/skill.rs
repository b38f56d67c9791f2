//! Skills and their derived roll thresholds.
//!
//! A skill is a named integer rating. Checks are made by rolling 3d6 under
//! the rating; the critical bands are derived from the rating unless the
//! skill carries explicit overrides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from constructing or parsing a skill.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkillError {
    #[error("Skill name is empty")]
    EmptyName,

    #[error("Invalid skill value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },

    #[error("Unknown difficulty: {0:?}")]
    UnknownDifficulty(String),
}

/// Normalize a skill name for lookups and map keys.
pub fn canonical_name(raw: &str) -> String {
    raw.to_lowercase()
}

/// How hard a skill is to learn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Average,
    Hard,
    VeryHard,
    Wildcard,
}

impl Difficulty {
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Average => "Average",
            Difficulty::Hard => "Hard",
            Difficulty::VeryHard => "Very Hard",
            Difficulty::Wildcard => "Wildcard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "e" | "easy" | "esy" => Ok(Difficulty::Easy),
            "a" | "avg" | "average" => Ok(Difficulty::Average),
            "h" | "hard" | "hrd" => Ok(Difficulty::Hard),
            "vh" | "very hard" | "very_hard" | "v hard" | "v. hard" => Ok(Difficulty::VeryHard),
            "wildcard" | "wldcrd" | "wild" => Ok(Difficulty::Wildcard),
            _ => Err(SkillError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named skill rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    name: String,

    /// The rating rolled against.
    pub value: i32,

    /// Free-text note, e.g. from the character sheet.
    pub note: Option<String>,

    /// Highest total that counts as a critical success.
    pub crit_success_override: Option<i32>,

    /// Lowest total that counts as a critical failure.
    pub crit_fail_override: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl Skill {
    /// Create a skill. The name is trimmed and must not be empty.
    pub fn new(name: impl Into<String>, value: i32) -> Result<Self, SkillError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(SkillError::EmptyName);
        }

        Ok(Self {
            name,
            value,
            note: None,
            crit_success_override: None,
            crit_fail_override: None,
            difficulty: None,
        })
    }

    /// Create a skill from a textual rating, as found in sheet cells.
    pub fn parse(name: impl Into<String>, value: &str) -> Result<Self, SkillError> {
        let name = name.into();
        let parsed = value
            .trim()
            .parse::<i32>()
            .map_err(|_| SkillError::InvalidValue {
                name: name.trim().to_string(),
                value: value.to_string(),
            })?;
        Self::new(name, parsed)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_crit_success_override(mut self, threshold: i32) -> Self {
        self.crit_success_override = Some(threshold);
        self
    }

    pub fn with_crit_fail_override(mut self, threshold: i32) -> Self {
        self.crit_fail_override = Some(threshold);
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// The display name, as entered.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name used as this skill's key.
    pub fn canonical_name(&self) -> String {
        canonical_name(&self.name)
    }

    /// Totals at or above this are critical failures.
    ///
    /// Low ratings fail critically more easily (10 + rating); mid ratings
    /// only on 17 or 18; ratings of 16 and up only on 18.
    pub fn crit_fail_threshold(&self) -> i32 {
        if let Some(threshold) = self.crit_fail_override {
            return threshold;
        }

        match self.value {
            v if v < 7 => 10 + v,
            v if v < 16 => 17,
            _ => 18,
        }
    }

    /// Totals at or below this are critical successes.
    ///
    /// Always 4 to 6 without an override: ratings of 15 and 16 widen the
    /// band to 5 and 6.
    pub fn crit_success_threshold(&self) -> i32 {
        if let Some(threshold) = self.crit_success_override {
            return threshold;
        }

        self.value.saturating_sub(10).clamp(4, 6)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}
