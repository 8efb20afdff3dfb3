//! Level identifiers, scores, and the completion event passed to the aggregator.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{FIRST_LEVEL, LEVEL_COUNT, SCORE_MAX};
use crate::error::ValidationError;

/// One of the five levels, `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LevelNumber(u8);

impl LevelNumber {
    pub const CLEANUP: Self = Self(1);
    pub const PLANTING: Self = Self(2);
    pub const HUSBANDRY: Self = Self(3);
    pub const HARVEST: Self = Self(4);
    pub const QUIZ: Self = Self(5);

    pub const ALL: [Self; LEVEL_COUNT as usize] = [
        Self::CLEANUP,
        Self::PLANTING,
        Self::HUSBANDRY,
        Self::HARVEST,
        Self::QUIZ,
    ];

    /// # Errors
    ///
    /// Returns [`ValidationError::LevelOutOfRange`] outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (FIRST_LEVEL..=LEVEL_COUNT).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::LevelOutOfRange {
                value: i64::from(value),
            })
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The level unlocked by completing this one. Completing the last level
    /// yields `LEVEL_COUNT + 1`, mirroring the service's formula.
    #[must_use]
    pub const fn unlocks(self) -> u8 {
        self.0 + 1
    }
}

impl TryFrom<u8> for LevelNumber {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for LevelNumber {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| ValidationError::LevelOutOfRange { value })
            .and_then(Self::new)
    }
}

impl From<LevelNumber> for u8 {
    fn from(level: LevelNumber) -> Self {
        level.0
    }
}

impl fmt::Display for LevelNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A level score, `0..=100`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const PERFECT: Self = Self(SCORE_MAX);

    /// # Errors
    ///
    /// Returns [`ValidationError::ScoreOutOfRange`] above 100.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if value <= SCORE_MAX {
            Ok(Self(value))
        } else {
            Err(ValidationError::ScoreOutOfRange {
                value: i64::from(value),
            })
        }
    }

    /// Build a score from an accumulated value, capping at 100.
    #[must_use]
    pub fn saturating(value: u32) -> Self {
        Self(u8::try_from(value.min(u32::from(SCORE_MAX))).unwrap_or(SCORE_MAX))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Score {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for Score {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| ValidationError::ScoreOutOfRange { value })
            .and_then(Self::new)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Emitted once by a level when it reaches victory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub level: LevelNumber,
    pub score: Score,
    #[serde(default)]
    pub completion_time: Option<u32>,
}

impl CompletionEvent {
    #[must_use]
    pub const fn new(level: LevelNumber, score: Score) -> Self {
        Self {
            level,
            score,
            completion_time: None,
        }
    }

    #[must_use]
    pub const fn with_completion_time(mut self, seconds: Option<u32>) -> Self {
        self.completion_time = seconds;
        self
    }
}
