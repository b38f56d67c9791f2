//! 3d6 roll-under skill checks.
//!
//! Three six-sided dice are summed and compared against a [`Skill`]:
//! low totals succeed, very low totals succeed critically, and very high
//! totals fail critically.

use crate::skill::Skill;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of rolls made for a luck roll, keeping the best.
pub const LUCK_ROLLS: usize = 3;

/// Error type for building rolls from explicit dice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RollError {
    #[error("Die face out of range: {0} (expected 1-6)")]
    FaceOutOfRange(u8),

    #[error("Unknown roll outcome: {0:?}")]
    UnknownOutcome(String),
}

/// Outcome tier of a check, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RollOutcome {
    CriticalFailure,
    Failure,
    Success,
    CriticalSuccess,
}

impl RollOutcome {
    /// Classify a dice total against a skill.
    ///
    /// Checked in order: critical success, success, critical failure,
    /// failure. A total inside both critical bands (only reachable with
    /// overrides) is a critical success.
    pub fn classify(total: i32, skill: &Skill) -> Self {
        if total <= skill.crit_success_threshold() {
            RollOutcome::CriticalSuccess
        } else if total <= skill.value {
            RollOutcome::Success
        } else if total >= skill.crit_fail_threshold() {
            RollOutcome::CriticalFailure
        } else {
            RollOutcome::Failure
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RollOutcome::Success | RollOutcome::CriticalSuccess)
    }

    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            RollOutcome::CriticalSuccess | RollOutcome::CriticalFailure
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            RollOutcome::CriticalFailure => "CRITICAL FAILURE",
            RollOutcome::Failure => "FAILURE",
            RollOutcome::Success => "SUCCESS",
            RollOutcome::CriticalSuccess => "CRITICAL SUCCESS",
        }
    }
}

impl FromStr for RollOutcome {
    type Err = RollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', " ").as_str() {
            "critical failure" | "crit fail" => Ok(RollOutcome::CriticalFailure),
            "failure" => Ok(RollOutcome::Failure),
            "success" => Ok(RollOutcome::Success),
            "critical success" | "crit success" => Ok(RollOutcome::CriticalSuccess),
            _ => Err(RollError::UnknownOutcome(s.to_string())),
        }
    }
}

impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The dice and outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    pub dice: [u8; 3],
    pub outcome: RollOutcome,
}

impl Roll {
    /// Resolve explicit dice against a skill.
    pub fn from_dice(dice: [u8; 3], skill: &Skill) -> Result<Self, RollError> {
        if let Some(&face) = dice.iter().find(|&&d| !(1..=6).contains(&d)) {
            return Err(RollError::FaceOutOfRange(face));
        }

        let total = dice.iter().map(|&d| i32::from(d)).sum();
        Ok(Self {
            dice,
            outcome: RollOutcome::classify(total, skill),
        })
    }

    pub fn total(&self) -> i32 {
        self.dice.iter().map(|&d| i32::from(d)).sum()
    }

    /// Compare how good two rolls are.
    ///
    /// Better outcome wins; within an outcome, the lower total wins. Rolls
    /// with the same outcome and total are equally good even when their
    /// dice differ, which is why this is not `Ord`.
    pub fn cmp_strength(&self, other: &Self) -> Ordering {
        self.outcome
            .cmp(&other.outcome)
            .then_with(|| other.total().cmp(&self.total()))
    }

    pub fn is_better_than(&self, other: &Self) -> bool {
        self.cmp_strength(other) == Ordering::Greater
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.dice;
        write!(f, "{}: {a}, {b}, {c}", self.outcome)
    }
}

/// Roll 3d6 against a skill.
pub fn roll(skill: &Skill) -> Roll {
    roll_with_rng(skill, &mut rand::thread_rng())
}

/// Roll with a specific RNG (useful for testing).
pub fn roll_with_rng<R: Rng>(skill: &Skill, rng: &mut R) -> Roll {
    let dice = [
        rng.gen_range(1..=6u8),
        rng.gen_range(1..=6u8),
        rng.gen_range(1..=6u8),
    ];
    let total = dice.iter().map(|&d| i32::from(d)).sum();

    Roll {
        dice,
        outcome: RollOutcome::classify(total, skill),
    }
}

/// Roll `n` times and keep the best. `n == 0` rolls once.
pub fn best_of_n(skill: &Skill, n: usize) -> Roll {
    best_of_n_with_rng(skill, n, &mut rand::thread_rng())
}

pub fn best_of_n_with_rng<R: Rng>(skill: &Skill, n: usize, rng: &mut R) -> Roll {
    let mut best = roll_with_rng(skill, rng);
    for _ in 1..n {
        let next = roll_with_rng(skill, rng);
        if next.is_better_than(&best) {
            best = next;
        }
    }
    best
}

/// Best of [`LUCK_ROLLS`] rolls.
pub fn luck_roll(skill: &Skill) -> Roll {
    best_of_n(skill, LUCK_ROLLS)
}
