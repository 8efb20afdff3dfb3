//! Turn-based simulators for the five levels.
//!
//! Each level is a small state machine over bounded meters. The
//! [`LevelSimulator`] trait is the common contract; [`ActiveLevel`] wraps the
//! concrete simulators so a session can hold "whichever level is open"
//! without generics.
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{RNG_DOMAIN_FACTS, RNG_DOMAIN_WEATHER};
use crate::data::{LevelsConfig, QuizBank};
use crate::error::SessionError;
use crate::meter::MeterSnapshot;
use crate::rng::SeededRandom;
use crate::score::{CompletionEvent, LevelNumber};

pub mod cleanup;
pub mod harvest;
pub mod husbandry;
pub mod notice;
pub mod planting;
pub mod quiz;

pub use cleanup::{CleanupAction, CleanupSim};
pub use harvest::{HarvestAction, HarvestPhase, HarvestSim};
pub use husbandry::{Boost, HusbandrySim, Weather};
pub use notice::{Notice, Tone};
pub use planting::{Patch, PlantingAction, PlantingSim};
pub use quiz::{QuizAction, QuizSim};

/// Lifecycle of a level instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl LevelStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Contract shared by every level simulator.
///
/// Once [`status`](Self::status) is terminal, actions and turns change
/// nothing and answer with [`Notice::LevelOver`].
pub trait LevelSimulator {
    type Action;

    fn number(&self) -> LevelNumber;

    fn status(&self) -> LevelStatus;

    fn apply_action(&mut self, action: Self::Action) -> Vec<Notice>;

    /// Decay, derived health, and win/loss evaluation for one turn.
    fn advance_turn(&mut self) -> Vec<Notice>;

    /// `Some` exactly when the level is won.
    fn completion(&self) -> Option<CompletionEvent>;

    fn meters(&self) -> MeterSnapshot;

    /// Advance wall-clock driven state. Most levels have none.
    fn tick(&mut self, _dt: Duration) -> Vec<Notice> {
        Vec::new()
    }

    /// Cancel anything scheduled by this level.
    fn teardown(&mut self) {}
}

/// Action addressed to one of the five levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", content = "action", rename_all = "snake_case")]
pub enum LevelAction {
    Cleanup(CleanupAction),
    Planting(PlantingAction),
    Husbandry(Boost),
    Harvest(HarvestAction),
    Quiz(QuizAction),
}

impl LevelAction {
    #[must_use]
    pub const fn level(self) -> LevelNumber {
        match self {
            Self::Cleanup(_) => LevelNumber::CLEANUP,
            Self::Planting(_) => LevelNumber::PLANTING,
            Self::Husbandry(_) => LevelNumber::HUSBANDRY,
            Self::Harvest(_) => LevelNumber::HARVEST,
            Self::Quiz(_) => LevelNumber::QUIZ,
        }
    }
}

/// The level instance currently owned by a session.
#[derive(Debug)]
pub enum ActiveLevel {
    Cleanup(CleanupSim),
    Planting(PlantingSim),
    Husbandry(HusbandrySim),
    Harvest(HarvestSim),
    Quiz(QuizSim),
}

impl ActiveLevel {
    /// Build a fresh instance of `level`; `seed` feeds the levels that roll dice.
    #[must_use]
    pub fn start(level: LevelNumber, config: &LevelsConfig, quiz: &QuizBank, seed: u64) -> Self {
        match level {
            LevelNumber::PLANTING => Self::Planting(PlantingSim::new(config.planting)),
            LevelNumber::HUSBANDRY => Self::Husbandry(HusbandrySim::new(
                config.husbandry,
                Box::new(SeededRandom::from_user_seed(seed, RNG_DOMAIN_WEATHER)),
            )),
            LevelNumber::HARVEST => Self::Harvest(HarvestSim::new(
                config.harvest.clone(),
                Box::new(SeededRandom::from_user_seed(seed, RNG_DOMAIN_FACTS)),
            )),
            LevelNumber::QUIZ => Self::Quiz(QuizSim::new(quiz.clone())),
            _ => Self::Cleanup(CleanupSim::new(&config.cleanup)),
        }
    }

    #[must_use]
    pub fn number(&self) -> LevelNumber {
        match self {
            Self::Cleanup(sim) => sim.number(),
            Self::Planting(sim) => sim.number(),
            Self::Husbandry(sim) => sim.number(),
            Self::Harvest(sim) => sim.number(),
            Self::Quiz(sim) => sim.number(),
        }
    }

    #[must_use]
    pub fn status(&self) -> LevelStatus {
        match self {
            Self::Cleanup(sim) => sim.status(),
            Self::Planting(sim) => sim.status(),
            Self::Husbandry(sim) => sim.status(),
            Self::Harvest(sim) => sim.status(),
            Self::Quiz(sim) => sim.status(),
        }
    }

    /// Dispatch `action` to the matching simulator.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongLevel`] when the action targets a level
    /// other than the one that is open.
    pub fn apply_action(&mut self, action: LevelAction) -> Result<Vec<Notice>, SessionError> {
        let notices = match (&mut *self, action) {
            (Self::Cleanup(sim), LevelAction::Cleanup(a)) => sim.apply_action(a),
            (Self::Planting(sim), LevelAction::Planting(a)) => sim.apply_action(a),
            (Self::Husbandry(sim), LevelAction::Husbandry(a)) => sim.apply_action(a),
            (Self::Harvest(sim), LevelAction::Harvest(a)) => sim.apply_action(a),
            (Self::Quiz(sim), LevelAction::Quiz(a)) => sim.apply_action(a),
            (active, action) => {
                return Err(SessionError::WrongLevel {
                    action: action.level(),
                    active: active.number(),
                });
            }
        };
        Ok(notices)
    }

    pub fn advance_turn(&mut self) -> Vec<Notice> {
        match self {
            Self::Cleanup(sim) => sim.advance_turn(),
            Self::Planting(sim) => sim.advance_turn(),
            Self::Husbandry(sim) => sim.advance_turn(),
            Self::Harvest(sim) => sim.advance_turn(),
            Self::Quiz(sim) => sim.advance_turn(),
        }
    }

    pub fn tick(&mut self, dt: Duration) -> Vec<Notice> {
        match self {
            Self::Cleanup(sim) => sim.tick(dt),
            Self::Planting(sim) => sim.tick(dt),
            Self::Husbandry(sim) => sim.tick(dt),
            Self::Harvest(sim) => sim.tick(dt),
            Self::Quiz(sim) => sim.tick(dt),
        }
    }

    #[must_use]
    pub fn completion(&self) -> Option<CompletionEvent> {
        match self {
            Self::Cleanup(sim) => sim.completion(),
            Self::Planting(sim) => sim.completion(),
            Self::Husbandry(sim) => sim.completion(),
            Self::Harvest(sim) => sim.completion(),
            Self::Quiz(sim) => sim.completion(),
        }
    }

    #[must_use]
    pub fn meters(&self) -> MeterSnapshot {
        match self {
            Self::Cleanup(sim) => sim.meters(),
            Self::Planting(sim) => sim.meters(),
            Self::Husbandry(sim) => sim.meters(),
            Self::Harvest(sim) => sim.meters(),
            Self::Quiz(sim) => sim.meters(),
        }
    }

    pub fn teardown(&mut self) {
        match self {
            Self::Cleanup(sim) => sim.teardown(),
            Self::Planting(sim) => sim.teardown(),
            Self::Husbandry(sim) => sim.teardown(),
            Self::Harvest(sim) => sim.teardown(),
            Self::Quiz(sim) => sim.teardown(),
        }
    }

    #[must_use]
    pub const fn as_planting(&self) -> Option<&PlantingSim> {
        match self {
            Self::Planting(sim) => Some(sim),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_husbandry(&self) -> Option<&HusbandrySim> {
        match self {
            Self::Husbandry(sim) => Some(sim),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_harvest(&self) -> Option<&HarvestSim> {
        match self {
            Self::Harvest(sim) => Some(sim),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_quiz(&self) -> Option<&QuizSim> {
        match self {
            Self::Quiz(sim) => Some(sim),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(level: LevelNumber) -> ActiveLevel {
        ActiveLevel::start(
            level,
            &LevelsConfig::default_config(),
            &QuizBank::default_bank(),
            7,
        )
    }

    #[test]
    fn start_builds_matching_level() {
        for level in LevelNumber::ALL {
            let active = start(level);
            assert_eq!(active.number(), level);
            assert_eq!(active.status(), LevelStatus::Playing);
            assert!(active.completion().is_none());
        }
    }

    #[test]
    fn mismatched_action_is_rejected() {
        let mut active = start(LevelNumber::CLEANUP);
        let err = active
            .apply_action(LevelAction::Quiz(QuizAction::Answer(0)))
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::WrongLevel {
                action: LevelNumber::QUIZ,
                active: LevelNumber::CLEANUP,
            }
        );
    }

    #[test]
    fn action_json_names_level() {
        let action = LevelAction::Planting(PlantingAction::Plant(3));
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("\"level\":\"planting\""));
        let back: LevelAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }
}
