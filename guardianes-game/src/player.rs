//! Player identity and the cumulative progress record.
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

use crate::constants::{FIRST_LEVEL, PLAYER_NAME_MAX_CHARS};
use crate::error::ValidationError;
use crate::score::{LevelNumber, Score};

fn name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[\p{L}\p{N} _\-]+$").ok())
        .as_ref()
}

/// A trimmed, validated display name. Names are the player's unique key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Trim and validate `raw`.
    ///
    /// # Errors
    ///
    /// Rejects empty names, names over 30 characters, and anything other
    /// than letters, digits, spaces, `_` and `-`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if trimmed.chars().count() > PLAYER_NAME_MAX_CHARS {
            return Err(ValidationError::NameTooLong {
                max: PLAYER_NAME_MAX_CHARS,
            });
        }
        if !name_pattern().is_some_and(|re| re.is_match(trimmed)) {
            return Err(ValidationError::InvalidNameChars {
                name: trimmed.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for PlayerName {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client-side view of a player's progress.
///
/// Only [`crate::progress::reduce_completion`] and a fresh fetch from the
/// service produce new values of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: PlayerName,
    pub current_level: u8,
    pub levels_completed: BTreeSet<LevelNumber>,
    pub total_score: u32,
    pub level_scores: BTreeMap<LevelNumber, Score>,
    pub achievements: BTreeSet<String>,
}

impl PlayerRecord {
    /// A brand-new record: level 1 open, nothing completed.
    #[must_use]
    pub fn new(id: impl Into<String>, name: PlayerName) -> Self {
        Self {
            id: id.into(),
            name,
            current_level: FIRST_LEVEL,
            levels_completed: BTreeSet::new(),
            total_score: 0,
            level_scores: BTreeMap::new(),
            achievements: BTreeSet::new(),
        }
    }

    /// Whether the menu lets the player start `level`.
    #[must_use]
    pub fn is_unlocked(&self, level: LevelNumber) -> bool {
        level.get() <= self.current_level
    }

    /// Best score recorded for `level`, or zero.
    #[must_use]
    pub fn best_score(&self, level: LevelNumber) -> Score {
        self.level_scores.get(&level).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn has_completed(&self, level: LevelNumber) -> bool {
        self.levels_completed.contains(&level)
    }

    #[must_use]
    pub fn has_achievement(&self, tag: &str) -> bool {
        self.achievements.contains(tag)
    }

    /// Sum of best scores, the figure the service reports as its total.
    #[must_use]
    pub fn best_total(&self) -> u32 {
        self.level_scores
            .values()
            .map(|score| u32::from(score.get()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_validated() {
        assert_eq!(PlayerName::parse("  Ana  ").unwrap().as_str(), "Ana");
        assert!(PlayerName::parse("José Pérez-Ñahui_2").is_ok());
        assert_eq!(PlayerName::parse("   "), Err(ValidationError::EmptyName));
        assert!(matches!(
            PlayerName::parse("<script>"),
            Err(ValidationError::InvalidNameChars { .. })
        ));
        assert_eq!(
            PlayerName::parse(&"x".repeat(31)),
            Err(ValidationError::NameTooLong { max: 30 })
        );
        assert!(PlayerName::parse(&"ñ".repeat(30)).is_ok());
    }

    #[test]
    fn name_deserialization_validates() {
        assert!(serde_json::from_str::<PlayerName>("\"Ana\"").is_ok());
        assert!(serde_json::from_str::<PlayerName>("\"\"").is_err());
    }

    #[test]
    fn new_record_unlocks_only_first_level() {
        let record = PlayerRecord::new("p-1", PlayerName::parse("Ana").unwrap());
        assert!(record.is_unlocked(LevelNumber::CLEANUP));
        assert!(!record.is_unlocked(LevelNumber::PLANTING));
        assert_eq!(record.best_score(LevelNumber::CLEANUP), Score::default());
        assert_eq!(record.best_total(), 0);
    }
}
