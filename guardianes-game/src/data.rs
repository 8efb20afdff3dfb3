//! Level tuning and quiz content loaded from embedded JSON assets.
use serde::{Deserialize, Serialize};

use crate::constants::{
    CLEANUP_CONTAMINANTS, CLEANUP_SCORE, HARVEST_COUNTDOWN_SECS, HARVEST_EARS, HARVEST_FINAL_DAY,
    HARVEST_HEALTH_GATE, HARVEST_START_HEALTH, HARVEST_START_NUTRIENTS, HARVEST_START_SUN,
    HARVEST_START_WATER, HUSBANDRY_HOT_CHANCE_PCT, HUSBANDRY_INFUSION_SCORE,
    HUSBANDRY_INFUSIONS_TO_WIN, HUSBANDRY_START_HEALTH, HUSBANDRY_START_NUTRIENTS,
    HUSBANDRY_START_SUN, HUSBANDRY_START_WATER, HUSBANDRY_STREAK_FOR_INFUSION, PLANTING_FERTILIZER,
    PLANTING_PATCHES, PLANTING_TARGET, SCORE_MAX,
};
use crate::error::ConfigError;

const DEFAULT_LEVELS_DATA: &str = include_str!("../assets/levels.json");
const DEFAULT_QUIZ_DATA: &str = include_str!("../assets/quiz.json");

/// Starting meter values for a plant-care level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartMeters {
    pub water: u8,
    pub sun: u8,
    pub nutrients: u8,
    pub health: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupConfig {
    pub contaminants: Vec<String>,
    pub score: u8,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            contaminants: ["plastic_bottle", "tin_can", "plastic_bag"]
                .iter()
                .take(usize::from(CLEANUP_CONTAMINANTS))
                .map(ToString::to_string)
                .collect(),
            score: CLEANUP_SCORE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantingConfig {
    pub patches: usize,
    pub fertilizer: u8,
    pub target: u8,
}

impl Default for PlantingConfig {
    fn default() -> Self {
        Self {
            patches: PLANTING_PATCHES,
            fertilizer: PLANTING_FERTILIZER,
            target: PLANTING_TARGET,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HusbandryConfig {
    pub start: StartMeters,
    pub hot_chance_pct: u8,
    pub streak_for_infusion: u8,
    pub infusion_score: u32,
    pub infusions_to_win: u8,
}

impl Default for HusbandryConfig {
    fn default() -> Self {
        Self {
            start: StartMeters {
                water: HUSBANDRY_START_WATER,
                sun: HUSBANDRY_START_SUN,
                nutrients: HUSBANDRY_START_NUTRIENTS,
                health: HUSBANDRY_START_HEALTH,
            },
            hot_chance_pct: HUSBANDRY_HOT_CHANCE_PCT,
            streak_for_infusion: HUSBANDRY_STREAK_FOR_INFUSION,
            infusion_score: HUSBANDRY_INFUSION_SCORE,
            infusions_to_win: HUSBANDRY_INFUSIONS_TO_WIN,
        }
    }
}

/// One-time scripted effects on fixed days of level 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialEventKind {
    /// Heavy rain: water rises and counts as today's watering.
    Rain,
    /// Leaf worms: hurts a plant that is short on nutrients.
    Plague,
    /// Hot day: water evaporates.
    Heat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialEvent {
    pub day: u32,
    pub kind: SpecialEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestConfig {
    pub start: StartMeters,
    pub final_day: u32,
    pub health_gate: u8,
    pub countdown_secs: u32,
    pub ears: usize,
    #[serde(default)]
    pub events: Vec<SpecialEvent>,
    #[serde(default)]
    pub facts: Vec<String>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            start: StartMeters {
                water: HARVEST_START_WATER,
                sun: HARVEST_START_SUN,
                nutrients: HARVEST_START_NUTRIENTS,
                health: HARVEST_START_HEALTH,
            },
            final_day: HARVEST_FINAL_DAY,
            health_gate: HARVEST_HEALTH_GATE,
            countdown_secs: HARVEST_COUNTDOWN_SECS,
            ears: HARVEST_EARS,
            events: vec![
                SpecialEvent {
                    day: 3,
                    kind: SpecialEventKind::Rain,
                },
                SpecialEvent {
                    day: 4,
                    kind: SpecialEventKind::Plague,
                },
                SpecialEvent {
                    day: 6,
                    kind: SpecialEventKind::Heat,
                },
            ],
            facts: Vec::new(),
        }
    }
}

impl HarvestConfig {
    #[must_use]
    pub fn event_on(&self, day: u32) -> Option<SpecialEventKind> {
        self.events
            .iter()
            .find(|event| event.day == day)
            .map(|event| event.kind)
    }
}

/// Tuning for every level, as shipped in `assets/levels.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LevelsConfig {
    #[serde(default)]
    pub cleanup: CleanupConfig,
    #[serde(default)]
    pub planting: PlantingConfig,
    #[serde(default)]
    pub husbandry: HusbandryConfig,
    #[serde(default)]
    pub harvest: HarvestConfig,
}

impl LevelsConfig {
    /// Load level tuning from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Embedded configuration, falling back to compiled defaults.
    #[must_use]
    pub fn default_config() -> Self {
        Self::from_json(DEFAULT_LEVELS_DATA).unwrap_or_default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cleanup.contaminants.is_empty() {
            return Err(invalid("cleanup.contaminants", "at least one contaminant required"));
        }
        if self.cleanup.score > SCORE_MAX {
            return Err(invalid("cleanup.score", "must be at most 100"));
        }
        if self.planting.patches == 0 || self.planting.target == 0 {
            return Err(invalid("planting", "patches and target must be positive"));
        }
        if usize::from(self.planting.target) > self.planting.patches {
            return Err(invalid("planting.target", "exceeds patch count"));
        }
        if self.husbandry.hot_chance_pct > 100 {
            return Err(invalid("husbandry.hot_chance_pct", "must be a percentage"));
        }
        if self.husbandry.streak_for_infusion == 0 || self.husbandry.infusions_to_win == 0 {
            return Err(invalid("husbandry", "streak and infusion goals must be positive"));
        }
        if self.harvest.countdown_secs == 0 || self.harvest.ears == 0 {
            return Err(invalid("harvest", "countdown and ears must be positive"));
        }
        if self.harvest.health_gate > 100 {
            return Err(invalid("harvest.health_gate", "must be a percentage"));
        }
        Ok(())
    }
}

/// A multiple-choice question for the final level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: usize,
}

impl Question {
    #[must_use]
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct).map(String::as_str)
    }
}

/// Ordered question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuizBank {
    pub questions: Vec<Question>,
}

impl QuizBank {
    pub const OPTIONS_PER_QUESTION: usize = 3;

    /// Load a quiz bank from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or a question is malformed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let bank: Self = serde_json::from_str(json)?;
        bank.validate()?;
        Ok(bank)
    }

    /// The shipped five-question bank.
    #[must_use]
    pub fn default_bank() -> Self {
        Self::from_json(DEFAULT_QUIZ_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.questions.is_empty() {
            return Err(invalid("questions", "quiz needs at least one question"));
        }
        for (idx, question) in self.questions.iter().enumerate() {
            if question.options.len() != Self::OPTIONS_PER_QUESTION {
                return Err(invalid(
                    "questions.options",
                    format!("question {idx} has {} options", question.options.len()),
                ));
            }
            if question.correct >= question.options.len() {
                return Err(invalid(
                    "questions.correct",
                    format!("question {idx} points at option {}", question.correct),
                ));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
